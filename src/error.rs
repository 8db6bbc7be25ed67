//! Error taxonomy for document building, rendering and serialization.
//!
//! Relationship resolution never fails on a missing partner note: a tie or
//! hammer-on without a partner is downgraded, not reported here.

/// Convenience result type used across tablib.
pub type TabResult<T> = Result<T, TabError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TabError {
    /// A note was placed on a string the instrument does not have.
    #[error("string {string} is out of range (instrument has {string_count} strings)")]
    StringOutOfRange { string: usize, string_count: usize },

    /// A beat already holds a note on this string.
    #[error("beat already has a note on string {string}")]
    StringOccupied { string: usize },

    #[error("unknown bar id {0}")]
    UnknownBar(usize),

    #[error("unknown voice id {0}")]
    UnknownVoice(usize),

    #[error("unknown beat id {0}")]
    UnknownBeat(usize),

    #[error("unknown note id {0}")]
    UnknownNote(usize),

    /// Number glyphs only visualize non-negative values.
    #[error("cannot render negative number {0}")]
    NegativeNumber(i32),

    /// Rendering was requested before note relationships were resolved.
    #[error("track '{0}' must be finished before rendering")]
    TrackNotFinished(String),

    /// A deserialized track whose ids or beat links do not fit together.
    #[error("track '{track}' is inconsistent: {reason}")]
    InconsistentTrack { track: String, reason: String },

    #[error("invalid layout settings: {0}")]
    InvalidSettings(String),

    #[error("serialization error: {0}")]
    Serde(String),
}

impl TabError {
    /// Build a [`TabError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for TabError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_name_the_problem() {
        let e = TabError::StringOutOfRange { string: 7, string_count: 6 };
        assert_eq!(e.to_string(), "string 7 is out of range (instrument has 6 strings)");
        assert!(TabError::NegativeNumber(-4).to_string().contains("-4"));
        assert!(TabError::serde("bad").to_string().starts_with("serialization error:"));
    }

    #[test]
    fn json_errors_convert_to_serde_variant() {
        let err: TabError = serde_json::from_str::<i32>("nope").unwrap_err().into();
        assert!(matches!(err, TabError::Serde(_)));
    }
}
