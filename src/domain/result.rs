//! Result type alias for the mediator

use super::errors::MediatorError;

/// Result type alias for mediator operations
///
/// # Examples
///
/// ```
/// use dhis_mediator::domain::result::Result;
/// use dhis_mediator::domain::errors::MediatorError;
///
/// fn failing_function() -> Result<()> {
///     Err(MediatorError::Configuration("missing port".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, MediatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<u16> {
            Ok(3001)
        }

        let value = inner()?;
        assert_eq!(value, 3001);
        Ok(())
    }
}
