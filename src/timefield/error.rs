use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimeFieldError {
    #[error("Unknown preparser method: {0}")]
    UnknownPreparser(String),

    #[error("Invalid format pattern: {0}")]
    InvalidPattern(String),

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Attribute already registered: {0}")]
    DuplicateAttribute(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TimeFieldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            TimeFieldError::UnknownPreparser("normalize".into()).to_string(),
            "Unknown preparser method: normalize"
        );
        assert_eq!(
            TimeFieldError::DuplicateAttribute("starts_at".into()).to_string(),
            "Attribute already registered: starts_at"
        );
    }
}
