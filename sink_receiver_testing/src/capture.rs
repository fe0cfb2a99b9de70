//! Capture files understood by [`ReplayTransport`](sink_receiver::ReplayTransport).

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Encoder, LengthDelimitedCodec};

/// Encode `records` as consecutive length-delimited frames.
///
/// # Panics
///
/// Panics if a record exceeds the codec's default maximum frame length.
#[must_use]
pub fn encode_capture<I, B>(records: I) -> Bytes
where
    I: IntoIterator<Item = B>,
    B: Into<Bytes>,
{
    let mut codec = LengthDelimitedCodec::new();
    let mut buf = BytesMut::new();
    for record in records {
        codec
            .encode(record.into(), &mut buf)
            .expect("record fits in a frame");
    }
    buf.freeze()
}
