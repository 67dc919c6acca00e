use std::fmt;
use std::io;
use thiserror::Error;

/// A pipeline primitive that has to be configured before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    Inflater,
    TagDecoder,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::Inflater => write!(f, "decompression primitive"),
            Dependency::TagDecoder => write!(f, "tag-tree decoder"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShulkerError {
    #[error("Missing dependency: no {0} is configured")]
    MissingDependency(Dependency),

    #[error("Decompression failed: {source}")]
    Decompression {
        #[source]
        source: io::Error,
    },

    /// Both decoder input forms were tried and rejected.
    #[error("Decode failed: primary form: {primary}; fallback form: {fallback}")]
    Decode { primary: io::Error, fallback: io::Error },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ShulkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency_messages_differ() {
        let inflater = ShulkerError::MissingDependency(Dependency::Inflater).to_string();
        let decoder = ShulkerError::MissingDependency(Dependency::TagDecoder).to_string();
        assert_eq!(
            inflater,
            "Missing dependency: no decompression primitive is configured"
        );
        assert_eq!(decoder, "Missing dependency: no tag-tree decoder is configured");
    }

    #[test]
    fn test_decode_error_keeps_both_causes() {
        let err = ShulkerError::Decode {
            primary: io::Error::new(io::ErrorKind::UnexpectedEof, "short name"),
            fallback: io::Error::new(io::ErrorKind::InvalidData, "Invalid tag type: 99"),
        };
        let message = err.to_string();
        assert!(message.contains("short name"));
        assert!(message.contains("Invalid tag type: 99"));
    }

    #[test]
    fn test_decompression_error_source() {
        let err = ShulkerError::Decompression {
            source: io::Error::new(io::ErrorKind::InvalidInput, "corrupt deflate stream"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("corrupt deflate stream"));
    }
}
