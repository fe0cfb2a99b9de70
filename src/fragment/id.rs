use std::sync::Arc;

use derive_more::Display;

/// Identity shared by every fragment of one logical message.
///
/// The identity is reference counted so the reassembly table, log lines and
/// completed messages can share it without copying the string.
///
/// # Examples
///
/// ```
/// use sink_receiver::fragment::MessageId;
/// let id = MessageId::new("a1b2");
/// assert_eq!(id.as_str(), "a1b2");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("{_0}")]
pub struct MessageId(Arc<str>);

impl MessageId {
    /// Create a new identifier.
    #[must_use]
    pub fn new(value: impl AsRef<str>) -> Self { Self(Arc::from(value.as_ref())) }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str { &self.0 }

    /// Return `true` when the identifier is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self { Self::new(value) }
}

impl From<String> for MessageId {
    fn from(value: String) -> Self { Self(Arc::from(value)) }
}
