use validator::ValidationError;
use zxcvbn::zxcvbn;

const MIN_LENGTH: usize = 12;
const MIN_STRENGTH_SCORE: u8 = 3;

/// Strength check for admin passwords. `user_inputs` (email, site name)
/// count against the score so they cannot be the password's backbone.
pub fn validate_password_strength(password: &str, user_inputs: &[&str]) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_LENGTH {
        let mut error = ValidationError::new("password_length");
        error.message = Some(format!("Must be at least {} characters", MIN_LENGTH).into());
        return Err(error);
    }

    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_upper && has_lower && has_digit) {
        let mut error = ValidationError::new("password_complexity");
        error.message = Some("Must mix uppercase, lowercase and digits".into());
        return Err(error);
    }

    let estimate = zxcvbn(password, user_inputs);
    let score = estimate.score() as u8;

    if score < MIN_STRENGTH_SCORE {
        let feedback = estimate.feedback()
            .and_then(|f| f.warning().map(|w| w.to_string()))
            .unwrap_or_else(|| "Password is too easy to guess".to_string());

        let mut error = ValidationError::new("password_weak");
        error.message = Some(feedback.into());
        return Err(error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passwords_fail() {
        let err = validate_password_strength("Ab1", &[]).unwrap_err();
        assert_eq!(err.code, "password_length");
    }

    #[test]
    fn predictable_passwords_fail() {
        assert!(validate_password_strength("Password1234", &[]).is_err());
    }

    #[test]
    fn strong_passphrase_passes() {
        assert!(validate_password_strength("Tangerine-Orbit-Velvet-91", &["admin@janedoe.dev"]).is_ok());
    }
}
