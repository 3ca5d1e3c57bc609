//! Signed-in identity and the client-side checks run before any account
//! request leaves the machine.
//!
//! The backend re-validates everything; these checks only exist so the
//! obvious mistakes (empty fields, mismatched confirmations, short
//! passwords) are caught without a round trip.

use crate::api::CurrentUser;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Default)]
pub struct AuthSession {
    pub user: Option<CurrentUser>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Admin surfaces are only offered to superusers; the backend enforces
    /// the same gate on its side.
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map(|u| u.is_superuser).unwrap_or(false)
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    pub fn set_user(&mut self, user: Option<CurrentUser>) {
        self.user = user;
    }

    pub fn clear(&mut self) {
        self.user = None;
    }
}

/// Percentage of finished games won, rounded to the nearest whole number.
pub fn win_rate(correct: u32, wrong: u32) -> u32 {
    let total = correct + wrong;
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

fn looks_like_email(value: &str) -> bool {
    value.contains('@')
}

pub fn validate_login(username: &str, password: &str) -> Result<(), String> {
    if username.trim().is_empty() || password.is_empty() {
        return Err("Please fill in all fields".to_string());
    }
    Ok(())
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<(), String> {
    if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err("Please fill in all fields".to_string());
    }
    if !looks_like_email(email.trim()) {
        return Err("Please enter a valid email".to_string());
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    if password != confirm {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

pub fn validate_email_change(new_email: &str, confirm: &str) -> Result<(), String> {
    if new_email.trim().is_empty() {
        return Err("Please fill in all fields".to_string());
    }
    if !looks_like_email(new_email.trim()) {
        return Err("Please enter a valid email".to_string());
    }
    if new_email.trim() != confirm.trim() {
        return Err("Emails do not match".to_string());
    }
    Ok(())
}

pub fn validate_password_change(
    current: &str,
    new_password: &str,
    confirm: &str,
) -> Result<(), String> {
    if current.is_empty() {
        return Err("Please enter your current password".to_string());
    }
    if new_password.len() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    if new_password != confirm {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

pub fn validate_reset_request(email: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err("Please fill in all fields".to_string());
    }
    if !looks_like_email(email.trim()) {
        return Err("Please enter a valid email".to_string());
    }
    Ok(())
}

pub fn validate_reset_confirm(new_password: &str, confirm: &str) -> Result<(), String> {
    if new_password.len() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    if new_password != confirm {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_superuser: bool) -> CurrentUser {
        CurrentUser {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            is_superuser,
        }
    }

    #[test]
    fn admin_requires_superuser_flag() {
        let mut session = AuthSession::new();
        assert!(!session.is_admin());
        session.set_user(Some(user(false)));
        assert!(session.is_signed_in());
        assert!(!session.is_admin());
        session.set_user(Some(user(true)));
        assert!(session.is_admin());
        session.clear();
        assert!(!session.is_signed_in());
    }

    #[test]
    fn win_rate_rounds_to_nearest() {
        assert_eq!(win_rate(0, 0), 0);
        assert_eq!(win_rate(1, 0), 100);
        assert_eq!(win_rate(2, 1), 67);
        assert_eq!(win_rate(1, 2), 33);
        assert_eq!(win_rate(1, 1), 50);
    }

    #[test]
    fn login_requires_both_fields() {
        assert!(validate_login("ada", "secret").is_ok());
        assert!(validate_login("", "secret").is_err());
        assert!(validate_login("ada", "").is_err());
        assert!(validate_login("   ", "secret").is_err());
    }

    #[test]
    fn registration_checks_email_shape() {
        let err = validate_registration("ada", "not-an-email", "secret1", "secret1");
        assert_eq!(err.unwrap_err(), "Please enter a valid email");
        assert!(validate_registration("ada", "ada@example.com", "secret1", "secret1").is_ok());
    }

    #[test]
    fn registration_enforces_password_rules() {
        let short = validate_registration("ada", "ada@example.com", "abc", "abc");
        assert_eq!(short.unwrap_err(), "Password must be at least 6 characters");
        let mismatch = validate_registration("ada", "ada@example.com", "secret1", "secret2");
        assert_eq!(mismatch.unwrap_err(), "Passwords do not match");
    }

    #[test]
    fn email_change_requires_matching_confirmation() {
        assert!(validate_email_change("new@example.com", "new@example.com").is_ok());
        assert_eq!(
            validate_email_change("new@example.com", "other@example.com").unwrap_err(),
            "Emails do not match"
        );
        assert_eq!(
            validate_email_change("bad-email", "bad-email").unwrap_err(),
            "Please enter a valid email"
        );
    }

    #[test]
    fn password_change_needs_the_current_password() {
        assert_eq!(
            validate_password_change("", "secret1", "secret1").unwrap_err(),
            "Please enter your current password"
        );
        assert!(validate_password_change("old", "secret1", "secret1").is_ok());
    }

    #[test]
    fn reset_flow_validators() {
        assert!(validate_reset_request("ada@example.com").is_ok());
        assert!(validate_reset_request("nope").is_err());
        assert!(validate_reset_confirm("secret1", "secret1").is_ok());
        assert!(validate_reset_confirm("short", "short").is_err());
        assert!(validate_reset_confirm("secret1", "secret2").is_err());
    }
}
