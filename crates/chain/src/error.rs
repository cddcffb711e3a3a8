use thiserror::Error;

use crate::constants::MIN_CONTROL_POINTS;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Closed curve needs at least {min} control points, got {0}", min = MIN_CONTROL_POINTS)]
    TooFewControlPoints(usize),
    #[error("Control point index {index} out of range ({len} points)")]
    ControlPointOutOfRange { index: usize, len: usize },
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),
    #[error("Persisted state is inconsistent: {0}")]
    CorruptState(String),
    #[error("Failed to encode or decode state: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_limit() {
        let err = ChainError::TooFewControlPoints(2);
        assert_eq!(
            err.to_string(),
            format!("Closed curve needs at least {} control points, got 2", MIN_CONTROL_POINTS)
        );

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(ChainError::from(io), ChainError::Io(_)));
    }
}
