//! Validation helpers for DTOs.

use validator::ValidationError;

/// Rejects empty or whitespace-only identifiers and names.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be empty".into());
        return Err(err);
    }
    Ok(())
}

/// Rejects a zero score, which the client only sends when no score was provided.
pub fn validate_non_zero(score: i64) -> Result<(), ValidationError> {
    if score == 0 {
        let mut err = ValidationError::new("zero_score");
        err.message = Some("score is required and must not be zero".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("u1").is_ok());
        assert!(validate_not_blank(" player one ").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err()); // whitespace only
    }

    #[test]
    fn test_validate_non_zero() {
        assert!(validate_non_zero(1_500).is_ok());
        assert!(validate_non_zero(-20).is_ok());
        assert!(validate_non_zero(0).is_err());
    }
}
