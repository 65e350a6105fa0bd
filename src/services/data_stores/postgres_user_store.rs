use color_eyre::eyre::{eyre, Result};
use secrecy::{ExposeSecret, Secret};
use sqlx::PgPool;

use crate::domain::{
    Email, User, UserId, UserName, UserPasswordHash, UserStore,
    UserStoreError,
};

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    email: String,
    name: String,
    password_hash: String,
    is_active: bool,
    is_staff: bool,
    is_superuser: bool,
}

impl TryFrom<UserRow> for User {
    type Error = UserStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::new(row.id),
            email: Email::parse(Secret::new(row.email))
                .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?,
            name: UserName::parse(row.name)
                .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?,
            hash: UserPasswordHash::parse(Secret::new(row.password_hash))
                .map_err(UserStoreError::UnexpectedError)?,
            is_active: row.is_active,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
        })
    }
}

const SELECT_USER: &str = r#"
    SELECT id, email, name, password_hash, is_active, is_staff, is_superuser
    FROM users
"#;

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash, is_active, is_staff, is_superuser)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.as_ref())
        .bind(user.email.as_ref().expose_secret())
        .bind(user.name.as_ref())
        .bind(user.hash.as_ref().expose_secret())
        .bind(user.is_active)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                UserStoreError::UserAlreadyExists
            }
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?;
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip_all)]
    async fn get_user(&self, email: &Email) -> Result<User, UserStoreError> {
        sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE email = $1"))
            .bind(email.as_ref().expose_secret())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => UserStoreError::UserNotFound,
                err => UserStoreError::UnexpectedError(eyre!(err)),
            })?
            .try_into()
    }

    #[tracing::instrument(
        name = "Retrieving user by ID from PostgreSQL",
        skip_all
    )]
    async fn get_user_by_id(
        &self,
        id: &UserId,
    ) -> Result<User, UserStoreError> {
        sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id.as_ref())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => UserStoreError::UserNotFound,
                err => UserStoreError::UnexpectedError(eyre!(err)),
            })?
            .try_into()
    }

    #[tracing::instrument(name = "Updating user in PostgreSQL", skip_all)]
    async fn update_user(
        &mut self,
        user: &User,
    ) -> Result<(), UserStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, name = $3, password_hash = $4,
                is_active = $5, is_staff = $6, is_superuser = $7
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_ref())
        .bind(user.email.as_ref().expose_secret())
        .bind(user.name.as_ref())
        .bind(user.hash.as_ref().expose_secret())
        .bind(user.is_active)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                UserStoreError::UserAlreadyExists
            }
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(
        name = "Validating user credentials in PostgreSQL",
        skip_all
    )]
    async fn validate_user(
        &self,
        email: &Email,
        password: &Secret<String>,
    ) -> Result<User, UserStoreError> {
        let user = self.get_user(email).await?;
        if !user.is_active {
            return Err(UserStoreError::InvalidCredentials);
        }

        user.hash
            .verify(password.clone())
            .await
            .map_err(|_| UserStoreError::InvalidCredentials)?;

        Ok(user)
    }
}
