use serde::Serialize;

use super::ValidationError;

pub const MAX_ATTRIBUTE_NAME_CHARS: usize = 255;

/// Name of a tag or ingredient: 1 to 255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AttributeName(String);

impl AttributeName {
    pub fn parse(name: String) -> Result<Self, ValidationError> {
        match name.chars().count() {
            0 => Err(ValidationError::new(
                "Name cannot be empty".to_owned(),
            )),
            x if x > MAX_ATTRIBUTE_NAME_CHARS => Err(ValidationError::new(
                format!(
                    "Max name length is {} characters",
                    MAX_ATTRIBUTE_NAME_CHARS
                ),
            )),
            _ => Ok(Self(name)),
        }
    }
}

impl AsRef<String> for AttributeName {
    fn as_ref(&self) -> &String {
        &self.0
    }
}

impl std::fmt::Display for AttributeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[test]
fn test_valid_attribute_names() {
    for valid_name in ["a".to_owned(), "Salt".to_owned(), "a".repeat(255)] {
        let parsed = AttributeName::parse(valid_name.clone())
            .expect("Failed to parse valid name");
        assert_eq!(parsed.as_ref(), &valid_name);
    }
}

#[test]
fn test_empty_attribute_name() {
    let error = AttributeName::parse(String::new()).unwrap_err();
    assert_eq!(error.as_ref(), "Name cannot be empty");
}

#[test]
fn test_long_attribute_name() {
    let error = AttributeName::parse("a".repeat(256)).unwrap_err();
    assert_eq!(error.as_ref(), "Max name length is 255 characters");
}
