//! Result type alias for the collector
//!
//! Uses [`CollectorError`] as the error type.

use super::errors::CollectorError;

/// Result type alias for collector operations
///
/// # Examples
///
/// ```
/// use notion_collector::domain::result::Result;
/// use notion_collector::domain::errors::CollectorError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CollectorError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CollectorError>;

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
}
