use secrecy::{ExposeSecret, Secret};

use std::hash::Hash;

use super::ValidationError;

/// A lowercased, syntactically valid email address.
#[derive(Debug, Clone)]
pub struct Email(Secret<String>);

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Hash for Email {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.expose_secret().hash(state);
    }
}

impl Eq for Email {}

impl Email {
    /// Lowercases `s` and checks it is a valid address. Two spellings that
    /// differ only in case therefore parse to the same `Email`.
    pub fn parse(s: Secret<String>) -> Result<Self, ValidationError> {
        let normalized = s.expose_secret().trim().to_lowercase();

        if normalized.is_empty() {
            return Err(ValidationError::new(
                "Users must have an email address".to_owned(),
            ));
        }

        if !validator::validate_email(&normalized) {
            return Err(ValidationError::new(
                "Invalid email address".to_owned(),
            ));
        }

        Ok(Self(Secret::new(normalized)))
    }
}

impl AsRef<Secret<String>> for Email {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
