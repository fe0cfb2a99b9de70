/// Receiver of completed payloads.
///
/// Called once per completed message, or once per document produced by a
/// Sink parser, in emission order and never concurrently. Handlers report
/// their own failures. A handler may stop the loop through a
/// [`StopHandle`](super::StopHandle); the remaining units of the current
/// event are still delivered and the record is committed first.
pub trait PayloadHandler {
    /// Consume one completed unit.
    fn handle(&mut self, payload: &[u8]);
}

impl<F> PayloadHandler for F
where
    F: FnMut(&[u8]),
{
    fn handle(&mut self, payload: &[u8]) { self(payload); }
}
