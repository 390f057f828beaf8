//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::{AuthConfig, BootstrapConfig},
    error::{AppError, AppResult},
    models::user::{
        AdminRegisterUser, CreateUser, Role, UpdateProfile, UpdateUser, User, UserClaims,
    },
    repository::Repository,
};

/// Hash a password using Argon2 with a random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Self-registration. New accounts are readers.
    pub async fn register(&self, user: CreateUser) -> AppResult<User> {
        if self.repository.users.email_exists(&user.email, None).await? {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let hash = hash_password(&user.password)?;
        self.repository
            .users
            .create(&user.username, &user.email, &hash, Role::Reader)
            .await
    }

    /// Authenticate by email and password, returning a signed token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<String> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

        if !verify_password(&user.password, password)? {
            return Err(AppError::Authentication("Invalid credentials".to_string()));
        }

        self.issue_token(&user)
    }

    /// Create a signed token carrying the user's identity claims
    fn issue_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            iat: now,
            exp,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// List users (admin)
    pub async fn list_users(&self, skip: i64, limit: i64) -> AppResult<Vec<User>> {
        self.repository.users.list(skip, limit).await
    }

    /// Create a user with an explicit role (admin)
    pub async fn register_new(&self, user: AdminRegisterUser) -> AppResult<User> {
        let (Some(username), Some(email), Some(password)) =
            (user.username, user.email, user.password)
        else {
            return Err(AppError::BadRequest(
                "The email password and username are not specified.".to_string(),
            ));
        };

        if self.repository.users.email_exists(&email, None).await? {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let hash = hash_password(&password)?;
        let created = self
            .repository
            .users
            .create(&username, &email, &hash, user.role.unwrap_or(Role::Reader))
            .await?;

        tracing::info!("Registered new user by admin, ID:{}", created.id);

        Ok(created)
    }

    /// Replace every field of a user account (admin)
    pub async fn update_user(&self, id: i32, user: UpdateUser) -> AppResult<User> {
        if self.repository.users.email_exists(&user.email, Some(id)).await? {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let hash = hash_password(&user.password)?;
        let updated = self
            .repository
            .users
            .update(id, &user.username, &user.email, &hash, user.role)
            .await?;

        tracing::info!("Updated user by admin, ID:{}", updated.id);

        Ok(updated)
    }

    /// Self-service profile update
    pub async fn update_profile(&self, user_id: i32, profile: UpdateProfile) -> AppResult<User> {
        if let Some(ref email) = profile.email {
            if self.repository.users.email_exists(email, Some(user_id)).await? {
                return Err(AppError::BadRequest("Email already registered".to_string()));
            }
        }

        let hash = match profile.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        self.repository
            .users
            .update_profile(user_id, &profile, hash)
            .await
    }

    /// Create the seed admin account if configured and none exists yet
    pub async fn ensure_bootstrap_admin(&self, bootstrap: &BootstrapConfig) -> AppResult<()> {
        let (Some(email), Some(password)) =
            (bootstrap.admin_email.as_deref(), bootstrap.admin_password.as_deref())
        else {
            return Ok(());
        };

        if self.repository.users.admin_exists().await? {
            return Ok(());
        }

        let username = bootstrap.admin_username.as_deref().unwrap_or("admin");
        let hash = hash_password(password)?;
        let admin = self
            .repository
            .users
            .create(username, email, &hash, Role::Admin)
            .await?;

        tracing::info!("Created bootstrap admin account, ID:{}", admin.id);

        Ok(())
    }
}
