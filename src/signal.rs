//!
//! Control signals exchanged between a running case body and the framework.
//!
//! A case body never reports its outcome through a side channel. It returns a
//! [`CaseResult`], and the `Err` arm carries one of the [`Signal`] variants. The
//! probing runtimes and the dispatcher interpret these signals; nothing else is
//! allowed to flow back out of a case.

use std::fmt;

use crate::case::Ordinal;

/// Upper bound, in bytes, for any message carried by a signal.
pub const MAX_MESSAGE: usize = 1024;

/// What a case body hands back to the framework.
pub type CaseResult = Result<(), Signal>;

// ============================================================================
// MESSAGE - bounded text payload
// ============================================================================

/// A short diagnostic message, truncated to [`MAX_MESSAGE`] bytes.
///
/// Truncation always lands on a `char` boundary so the stored text stays valid
/// UTF-8.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Message(String);

impl Message {
    pub fn new(text: &str) -> Self {
        if text.len() <= MAX_MESSAGE {
            return Self(text.to_owned());
        }
        let mut end = MAX_MESSAGE;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        Self(text[..end].to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self::new(&text)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SIGNAL - the closed vocabulary of case outcomes
// ============================================================================

/// Every non-normal way a case body can finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Produced by a probing runtime the moment a case announces itself.
    Real,
    /// Produced by [`crate::case::stub`]: the slot holds no case.
    Stub,
    /// The case opted out of this run.
    Skipped,
    /// The case announced a name excluded by the active filter.
    Filtered,
    /// An assertion did not hold.
    Failed(Message),
    /// The process can no longer be trusted; the rest of the run is aborted.
    ProcessCorrupted(Message),
    /// A slot broke the announce protocol during discovery.
    CollectionFailed { ordinal: Ordinal, message: Message },
}

impl Signal {
    /// Short, stable name used in logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Signal::Real => "real",
            Signal::Stub => "stub",
            Signal::Skipped => "skipped",
            Signal::Filtered => "filtered",
            Signal::Failed(_) => "failed",
            Signal::ProcessCorrupted(_) => "process-corrupted",
            Signal::CollectionFailed { .. } => "collection-failed",
        }
    }

    pub(crate) fn collection_failed(ordinal: Ordinal, message: impl Into<Message>) -> Self {
        Signal::CollectionFailed {
            ordinal,
            message: message.into(),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Failed(message) | Signal::ProcessCorrupted(message) if !message.is_empty() => {
                write!(f, "{}: {}", self.name(), message)
            }
            Signal::CollectionFailed { ordinal, message } => {
                write!(f, "{} at #{}: {}", self.name(), ordinal, message)
            }
            _ => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_messages_are_kept_verbatim() {
        let message = Message::new("Addition does not work");
        assert_eq!(message.as_str(), "Addition does not work");
    }

    #[test]
    fn long_messages_are_truncated_to_the_limit() {
        let text = "x".repeat(MAX_MESSAGE + 100);
        assert_eq!(Message::new(&text).as_str().len(), MAX_MESSAGE);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'é' is two bytes, so the limit falls in the middle of a character.
        let text = format!("{}é", "a".repeat(MAX_MESSAGE - 1));
        let message = Message::new(&text);
        assert_eq!(message.as_str().len(), MAX_MESSAGE - 1);
        assert!(message.as_str().chars().all(|c| c == 'a'));
    }

    #[test]
    fn display_includes_payload() {
        assert_eq!(Signal::Failed("boom".into()).to_string(), "failed: boom");
        assert_eq!(Signal::Failed(Message::default()).to_string(), "failed");
        assert_eq!(
            Signal::collection_failed(3, "bad slot").to_string(),
            "collection-failed at #3: bad slot"
        );
    }
}
