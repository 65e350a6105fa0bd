use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use color_eyre::eyre::{eyre, Context, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{AuthAPIError, User, UserId, UserStoreError},
};

use super::constants::{AUTH_SCHEME, JWT_COOKIE_NAME, JWT_SECRET};

// This value determines how long the JWT auth token is valid for
pub const TOKEN_TTL_SECONDS: i64 = 60 * 60 * 24; // 1 day

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

// Create JWT auth token for the given user
#[tracing::instrument(name = "Generating auth token", skip_all)]
pub fn generate_auth_token(user_id: &UserId) -> Result<Secret<String>> {
    let delta = chrono::Duration::try_seconds(TOKEN_TTL_SECONDS)
        .ok_or(eyre!("failed to create token TTL time delta"))?;

    let exp = Utc::now()
        .checked_add_signed(delta)
        .ok_or(eyre!("failed to add to current time"))?
        .timestamp();

    let exp: usize = exp.try_into().wrap_err(format!(
        "failed to cast exp time to usize. exp time: {}",
        exp
    ))?;

    let claims = Claims {
        sub: user_id.to_string(),
        exp,
    };

    create_token(&claims)
}

// Cookie carrying the token, for browser clients
#[tracing::instrument(name = "Creating auth cookie", skip_all)]
pub fn create_auth_cookie(token: &Secret<String>) -> Cookie<'static> {
    Cookie::build((JWT_COOKIE_NAME, token.expose_secret().to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

// Check if JWT auth token is valid by decoding it using the JWT secret
#[tracing::instrument(name = "Validating auth token", skip_all)]
pub fn validate_token(token: &Secret<String>) -> Result<Claims> {
    decode::<Claims>(
        token.expose_secret(),
        &DecodingKey::from_secret(JWT_SECRET.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .wrap_err("failed to decode token")
}

#[tracing::instrument(name = "Creating auth token", skip_all)]
fn create_token(claims: &Claims) -> Result<Secret<String>> {
    let token_string = encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.expose_secret().as_bytes()),
    )
    .wrap_err("failed to create token")?;

    Ok(Secret::new(token_string))
}

/// Reads the token from `Authorization: Token <jwt>` (or `Bearer <jwt>`),
/// falling back to the auth cookie.
pub fn extract_token(
    headers: &HeaderMap,
    jar: &CookieJar,
) -> Result<Secret<String>, AuthAPIError> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        let value = value.to_str().map_err(|_| AuthAPIError::InvalidToken)?;
        let (scheme, token) = value
            .trim()
            .split_once(' ')
            .ok_or(AuthAPIError::InvalidToken)?;

        let known_scheme = scheme.eq_ignore_ascii_case(AUTH_SCHEME)
            || scheme.eq_ignore_ascii_case("Bearer");
        let token = token.trim();
        if !known_scheme || token.is_empty() {
            return Err(AuthAPIError::InvalidToken);
        }
        return Ok(Secret::new(token.to_owned()));
    }

    jar.get(JWT_COOKIE_NAME)
        .map(|cookie| Secret::new(cookie.value().to_owned()))
        .ok_or(AuthAPIError::MissingToken)
}

/// The caller, resolved from their token. Rejects with 401 before any
/// body extractor runs.
pub struct AuthenticatedUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthAPIError;

    #[tracing::instrument(name = "Authenticating request", skip_all)]
    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = extract_token(&parts.headers, &jar)?;

        let claims =
            validate_token(&token).map_err(|_| AuthAPIError::InvalidToken)?;
        let user_id = UserId::parse(&claims.sub)
            .map_err(|_| AuthAPIError::InvalidToken)?;

        let user = state
            .user_store
            .read()
            .await
            .get_user_by_id(&user_id)
            .await
            .map_err(|e| match e {
                UserStoreError::UserNotFound => AuthAPIError::InvalidToken,
                e => AuthAPIError::UnexpectedError(eyre!(e)),
            })?;

        if !user.is_active {
            return Err(AuthAPIError::InvalidToken);
        }

        Ok(Self(user))
    }
}
