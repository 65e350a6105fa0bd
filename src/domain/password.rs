use super::ValidationError;
use secrecy::{ExposeSecret, Secret};

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_PASSWORD_CHARS: usize = 128;

/// A plaintext password accepted by the registration and profile endpoints.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Password {
    pub fn parse(s: Secret<String>) -> Result<Password, ValidationError> {
        let char_count = s.expose_secret().chars().count();

        if char_count < MIN_PASSWORD_CHARS {
            return Err(ValidationError::new(format!(
                "Password too short. Should be {} to {} characters.",
                MIN_PASSWORD_CHARS, MAX_PASSWORD_CHARS
            )));
        }

        if char_count > MAX_PASSWORD_CHARS {
            return Err(ValidationError::new(format!(
                "Password too long. Should be {} to {} characters.",
                MIN_PASSWORD_CHARS, MAX_PASSWORD_CHARS
            )));
        }

        Ok(Self(s))
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
