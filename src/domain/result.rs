//! Result type alias for snapshot-sender

use super::errors::SenderError;

/// Result type alias for snapshot-sender operations
///
/// # Examples
///
/// ```
/// use snapshot_sender::domain::result::Result;
/// use snapshot_sender::domain::errors::SenderError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SenderError::Status("status file missing".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(SenderError::Other("test error".to_string()));
        assert!(result.is_err());
    }
}
