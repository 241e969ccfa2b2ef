use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::error::AppError;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const READ_ONLY: &str = "This field is read-only.";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    email.len() <= 254 && EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Per-field error messages, serialized as `{"field": ["message", ...]}`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Checks a mandatory text field, returning the trimmed value when usable.
    pub fn required<'a>(
        &mut self,
        field: &'static str,
        value: Option<&'a str>,
        max_len: Option<usize>,
    ) -> Option<&'a str> {
        match value {
            None => {
                self.add(field, REQUIRED);
                None
            }
            Some(v) => self.present(field, v, max_len),
        }
    }

    /// Checks a supplied text field: non-blank and within `max_len` chars.
    pub fn present<'a>(
        &mut self,
        field: &'static str,
        value: &'a str,
        max_len: Option<usize>,
    ) -> Option<&'a str> {
        let v = value.trim();
        if v.is_empty() {
            self.add(field, BLANK);
            return None;
        }
        if let Some(max) = max_len {
            if v.chars().count() > max {
                self.add(
                    field,
                    format!("Ensure this field has no more than {max} characters."),
                );
                return None;
            }
        }
        Some(v)
    }

    /// Like [`FieldErrors::required`], additionally checking the email format.
    pub fn required_email<'a>(
        &mut self,
        field: &'static str,
        value: Option<&'a str>,
    ) -> Option<&'a str> {
        let v = self.required(field, value, None)?;
        self.email_format(field, v)
    }

    pub fn email_format<'a>(&mut self, field: &'static str, value: &'a str) -> Option<&'a str> {
        if is_valid_email(value) {
            Some(value)
        } else {
            self.add(field, INVALID_EMAIL);
            None
        }
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}
