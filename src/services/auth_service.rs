use sea_orm::SqlErr;

use crate::{
    auth::{
        AuthUser,
        jwt::{JwtKeys, encode_token, make_access_claims},
        password::{MIN_PASSWORD_LEN, hash_password, verify_password},
    },
    db::{
        dao::{DaoLayerError, TokenBlacklistDao, UserDao},
        entities::user,
    },
    error::AppError,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// A freshly issued access token and the account it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: user::Model,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct AuthService<'a> {
    users: UserDao,
    blacklist: TokenBlacklistDao,
    jwt: &'a JwtKeys,
    token_ttl_secs: u64,
}

impl<'a> AuthService<'a> {
    pub fn new(
        users: UserDao,
        blacklist: TokenBlacklistDao,
        jwt: &'a JwtKeys,
        token_ttl_secs: u64,
    ) -> Self {
        Self {
            users,
            blacklist,
            jwt,
            token_ttl_secs,
        }
    }

    pub async fn register(&self, registration: Registration) -> Result<Session, AppError> {
        if registration.password != registration.confirm_password {
            return Err(AppError::bad_request("Passwords do not match"));
        }
        if registration.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::bad_request("Password too short"));
        }

        let email = normalize_email(&registration.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User with this email already exists"));
        }

        let password_hash = hash_password(&registration.password)?;
        let created = self
            .users
            .create_user(
                registration.first_name.trim(),
                registration.last_name.trim(),
                &email,
                &password_hash,
            )
            .await;
        let user = match created {
            Ok(user) => user,
            Err(DaoLayerError::Db(err))
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                return Err(AppError::conflict("User with this email already exists"));
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(user_id = %user.id, "user registered");
        self.issue(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        tracing::info!(user_id = %user.id, "user logged in");
        self.issue(user)
    }

    pub async fn logout(&self, caller: &AuthUser) -> Result<(), AppError> {
        let revoked = self
            .blacklist
            .blacklist(&caller.token, &caller.user_id)
            .await?;
        if !revoked {
            // A concurrent logout with the same token won the insert.
            return Err(AppError::unauthorized("Token is blacklisted"));
        }
        tracing::info!(user_id = %caller.user_id, "token blacklisted");
        Ok(())
    }

    fn issue(&self, user: user::Model) -> Result<Session, AppError> {
        let claims = make_access_claims(&user.id, &user.email, self.token_ttl_secs as usize);
        let token = encode_token(self.jwt, &claims)?;
        Ok(Session { token, user })
    }
}
