use secrecy::{ExposeSecret, Secret};

use super::{
    Email, UserCreationError, UserId, UserPasswordHash, ValidationError,
};

pub const MAX_USER_NAME_CHARS: usize = 255;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: UserName,
    pub hash: UserPasswordHash,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl User {
    /// Creates a regular account. A missing or blank email is a
    /// validation error; the email is lowercased before it is checked.
    /// Password strength is not enforced here, only by the HTTP layer.
    #[tracing::instrument(name = "Creating user", skip_all)]
    pub async fn create_user(
        email: Option<Secret<String>>,
        password: Secret<String>,
    ) -> Result<Self, UserCreationError> {
        let email = email.ok_or_else(|| {
            ValidationError::new("Users must have an email address".to_owned())
        })?;
        let email = Email::parse(email)?;
        let hash = UserPasswordHash::compute(password)
            .await
            .map_err(UserCreationError::UnexpectedError)?;

        Ok(Self {
            id: UserId::default(),
            email,
            name: UserName::default(),
            hash,
            is_active: true,
            is_staff: false,
            is_superuser: false,
        })
    }

    #[tracing::instrument(name = "Creating superuser", skip_all)]
    pub async fn create_superuser(
        email: Option<Secret<String>>,
        password: Secret<String>,
    ) -> Result<Self, UserCreationError> {
        let mut user = Self::create_user(email, password).await?;
        user.is_staff = true;
        user.is_superuser = true;
        Ok(user)
    }

    pub fn with_name(mut self, name: UserName) -> Self {
        self.name = name;
        self
    }

    pub async fn check_password(&self, candidate: &Secret<String>) -> bool {
        self.hash.verify(candidate.clone()).await.is_ok()
    }

    pub fn with_password_hash(mut self, hash: UserPasswordHash) -> Self {
        self.hash = hash;
        self
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.email.as_ref().expose_secret())
    }
}

/// Display name; may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserName(String);

impl UserName {
    pub fn parse(name: String) -> Result<Self, ValidationError> {
        if name.chars().count() > MAX_USER_NAME_CHARS {
            return Err(ValidationError::new(format!(
                "Max name length is {} characters",
                MAX_USER_NAME_CHARS
            )));
        }
        Ok(Self(name))
    }
}

impl AsRef<String> for UserName {
    fn as_ref(&self) -> &String {
        &self.0
    }
}
