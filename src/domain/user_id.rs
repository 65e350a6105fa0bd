use color_eyre::eyre::{Context, Result};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    pub fn parse(id: &str) -> Result<Self> {
        let parsed = Uuid::try_parse(id).wrap_err("Invalid user ID")?;
        Ok(Self(parsed))
    }

    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}

impl AsRef<Uuid> for UserId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[test]
fn test_user_id_round_trips_through_display() {
    let id = UserId::default();
    let parsed = UserId::parse(&id.to_string()).expect("valid user ID");
    assert_eq!(parsed, id);
}

#[test]
fn test_invalid_user_ids() {
    for invalid_id in ["", "42", "5b5b32e3a66cc-45bc-82d1-d41582139f1e"] {
        let error = UserId::parse(invalid_id).expect_err(invalid_id);
        assert_eq!(error.to_string(), "Invalid user ID");
    }
}
