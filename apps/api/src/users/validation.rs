//! Field validators for user registration, login and profile updates.
//!
//! Validators collect every failing field before returning, so clients can
//! show all problems at once.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::user::{ROLE_ADMIN, ROLE_USER};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub path: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, path: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            path,
            message: message.into(),
        });
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let message = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(AppError::Validation(message))
    }

    pub fn name(&mut self, value: &str) -> &mut Self {
        let value = value.trim();
        let len = value.chars().count();
        if !(3..=32).contains(&len) {
            self.fail("name", "must be between 3 and 32 characters");
        } else if !name_regex().is_match(value) {
            self.fail("name", "must contain only letters and spaces");
        }
        self
    }

    pub fn email(&mut self, value: &str) -> &mut Self {
        let value = value.trim();
        let len = value.chars().count();
        if !(3..=32).contains(&len) {
            self.fail("email", "must be between 3 and 32 characters");
        } else if !email_regex().is_match(value) {
            self.fail("email", "is not a valid email address");
        }
        self
    }

    pub fn mobile(&mut self, value: &str) -> &mut Self {
        if !mobile_regex().is_match(value.trim()) {
            self.fail("mobile", "must be 10-11 digits");
        }
        self
    }

    pub fn password(&mut self, path: &'static str, value: &str) -> &mut Self {
        let len = value.chars().count();
        if !(8..=31).contains(&len) {
            self.fail(path, "must be between 8 and 31 characters");
        } else if !(value.chars().any(|c| c.is_ascii_lowercase())
            && value.chars().any(|c| c.is_ascii_uppercase())
            && value.chars().any(|c| c.is_ascii_digit())
            && value.chars().any(|c| !c.is_ascii_alphanumeric()))
        {
            self.fail(
                path,
                "must contain a lowercase letter, an uppercase letter, a number and a symbol",
            );
        }
        self
    }

    pub fn gender(&mut self, value: &str) -> &mut Self {
        if !matches!(value, "Male" | "Female") {
            self.fail("gender", "must be Male or Female");
        }
        self
    }

    pub fn date_of_birth(&mut self, value: &str) -> &mut Self {
        if NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").is_err() {
            self.fail("dateOfBirth", "must be a date in YYYY-MM-DD format");
        }
        self
    }

    pub fn address(&mut self, value: &str) -> &mut Self {
        if !address_regex().is_match(value.trim()) {
            self.fail(
                "address",
                "may only contain letters, numbers, spaces, commas, periods, and hyphens",
            );
        }
        self
    }

    pub fn user_type(&mut self, value: &str) -> &mut Self {
        if value != ROLE_USER && value != ROLE_ADMIN {
            self.fail("userType", "must be 'user' or 'admin'");
        }
        self
    }

    pub fn user_status(&mut self, value: &str) -> &mut Self {
        let len = value.len();
        if !(3..=16).contains(&len) || !value.chars().all(|c| c.is_ascii_lowercase()) {
            self.fail("userStatus", "must be 3-16 lowercase letters");
        }
        self
    }

    /// Login requires exactly one identity field.
    pub fn login_identity(&mut self, email: Option<&str>, mobile: Option<&str>) -> &mut Self {
        let email = email.map(str::trim).filter(|s| !s.is_empty());
        let mobile = mobile.map(str::trim).filter(|s| !s.is_empty());
        match (email, mobile) {
            (Some(email), None) => {
                self.email(email);
            }
            (None, Some(mobile)) => {
                self.mobile(mobile);
            }
            _ => self.fail(
                "identity",
                "provide either mobile number or email, but not both",
            ),
        }
        self
    }
}

fn name_regex() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| Regex::new(r"^[A-Za-z\s]+$").expect("name pattern is valid"))
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("email pattern is valid")
    })
}

fn mobile_regex() -> &'static Regex {
    static MOBILE: OnceLock<Regex> = OnceLock::new();
    MOBILE.get_or_init(|| Regex::new(r"^[0-9]{10,11}$").expect("mobile pattern is valid"))
}

fn address_regex() -> &'static Regex {
    static ADDRESS: OnceLock<Regex> = OnceLock::new();
    ADDRESS.get_or_init(|| Regex::new(r"^[A-Za-z0-9\s,.-]+$").expect("address pattern is valid"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_registration_fields_pass() {
        let mut v = Validator::new();
        v.name("Ada Lovelace")
            .email("ada@example.com")
            .mobile("01712345678")
            .password("password", "Secr3t!Pass");
        assert!(v.errors().is_empty(), "{:?}", v.errors());
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_email_rules() {
        let mut v = Validator::new();
        v.email("not-an-email");
        v.email("a@b.c");
        v.email("someone.with.a.very.long.name@example.com");
        assert_eq!(v.errors().len(), 3);
        assert!(v.errors().iter().all(|e| e.path == "email"));
    }

    #[test]
    fn test_mobile_must_be_10_or_11_digits() {
        let mut v = Validator::new();
        v.mobile("123456789").mobile("123456789012").mobile("12345abcde");
        assert_eq!(v.errors().len(), 3);

        let mut ok = Validator::new();
        ok.mobile("0123456789").mobile("01234567890");
        assert!(ok.errors().is_empty());
    }

    #[test]
    fn test_password_strength() {
        let mut v = Validator::new();
        v.password("password", "short1A");
        v.password("password", "alllowercase1");
        v.password("password", "NoDigitsHere");
        v.password("password", "NoSymbol1Here");
        v.password("password", "Aa1!aaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        assert_eq!(v.errors().len(), 5);

        let mut ok = Validator::new();
        ok.password("password", "Str0ng#Pass");
        assert!(ok.errors().is_empty());
    }

    #[test]
    fn test_login_identity_requires_exactly_one() {
        let mut both = Validator::new();
        both.login_identity(Some("a@example.com"), Some("0123456789"));
        assert_eq!(both.errors()[0].path, "identity");

        let mut neither = Validator::new();
        neither.login_identity(None, Some("  "));
        assert_eq!(neither.errors()[0].path, "identity");

        let mut email_only = Validator::new();
        email_only.login_identity(Some("a@example.com"), None);
        assert!(email_only.errors().is_empty());
    }

    #[test]
    fn test_profile_fields() {
        let mut v = Validator::new();
        v.gender("other")
            .date_of_birth("31/12/1999")
            .address("12 Main St; Apt #4")
            .user_type("root")
            .user_status("Active!");
        let paths: Vec<_> = v.errors().iter().map(|e| e.path).collect();
        assert_eq!(
            paths,
            vec!["gender", "dateOfBirth", "address", "userType", "userStatus"]
        );
    }

    #[test]
    fn test_finish_joins_messages() {
        let mut v = Validator::new();
        v.name("A1");
        match v.finish() {
            Err(AppError::Validation(msg)) => assert!(msg.starts_with("name:")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
