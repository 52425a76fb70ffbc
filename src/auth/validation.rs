use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::auth::repo_types::Role;

const NAME_LEN: (usize, usize) = (2, 255);
const EMAIL_MAX_LEN: usize = 255;
const PASSWORD_LEN: (usize, usize) = (6, 128);

/// Raw sign-up body. Every field is optional so that a missing field is
/// reported as a validation issue instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct SignupPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Sign-up input after trimming, lowercasing and defaulting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSignup {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", self.details())]
pub struct ValidationFailure {
    pub issues: Vec<FieldIssue>,
}

impl ValidationFailure {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue {
                field,
                message: message.into(),
            }],
        }
    }

    /// Issues joined into one display string, in field order.
    pub fn details(&self) -> String {
        self.issues
            .iter()
            .map(|i| format!("{}: {}", i.field, i.message))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn validate_signup(payload: SignupPayload) -> Result<NormalizedSignup, ValidationFailure> {
    let mut issues = Vec::new();
    let mut issue =
        |field: &'static str, message: String| issues.push(FieldIssue { field, message });

    let name = payload.name.as_deref().map(str::trim).unwrap_or_default().to_string();
    let name_len = name.chars().count();
    if payload.name.is_none() {
        issue("name", "Name is required".into());
    } else if name_len < NAME_LEN.0 {
        issue("name", format!("Name must be at least {} characters long", NAME_LEN.0));
    } else if name_len > NAME_LEN.1 {
        issue("name", format!("Name must be at most {} characters long", NAME_LEN.1));
    }

    let email = payload
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .unwrap_or_default();
    if payload.email.is_none() {
        issue("email", "Email is required".into());
    } else if !is_valid_email(&email) {
        issue("email", "Email must be a valid email address".into());
    } else if email.chars().count() > EMAIL_MAX_LEN {
        issue("email", format!("Email must be at most {EMAIL_MAX_LEN} characters long"));
    }

    let password_missing = payload.password.is_none();
    let password = payload.password.unwrap_or_default();
    let password_len = password.chars().count();
    if password_missing {
        issue("password", "Password is required".into());
    } else if password_len < PASSWORD_LEN.0 {
        issue(
            "password",
            format!("Password must be at least {} characters long", PASSWORD_LEN.0),
        );
    } else if password_len > PASSWORD_LEN.1 {
        issue(
            "password",
            format!("Password must be at most {} characters long", PASSWORD_LEN.1),
        );
    }

    let role = match payload.role.as_deref() {
        None => Role::default(),
        Some(r) => r.parse::<Role>().unwrap_or_else(|_| {
            issue("role", "Role must be one of: user, admin".into());
            Role::default()
        }),
    };

    if !issues.is_empty() {
        return Err(ValidationFailure { issues });
    }
    Ok(NormalizedSignup {
        name,
        email,
        password,
        role,
    })
}
