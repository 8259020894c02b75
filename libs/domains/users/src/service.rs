//! User Service - validation, uniqueness, credentials and permissions

use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::credentials::{hash_password, validate_password_strength, verify_password};
use crate::error::{UserError, UserResult};
use crate::models::{
    CreateUser, LoginRequest, LoginResponse, Role, UpdateUser, User, UserResponse, UserSummary,
};
use crate::permission::{Action, Module};
use crate::repository::UserRepository;
use crate::validation::{normalize_email, validate_dates, validate_phone};

/// Service layer for User business logic
///
/// Users are only ever created through [`UserService::create_user`], which
/// runs every check before anything is written.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate, check uniqueness, hash and store a new user
    #[instrument(skip(self, input), fields(role = %input.role))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        validate_password_strength(&input.password)?;
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        validate_phone(&input.personal_info.phone)?;
        validate_dates(
            input.personal_info.birth_date,
            input.professional_info.hire_date,
            Utc::now().date_naive(),
        )?;

        let mut personal_info = input.personal_info;
        personal_info.email = normalize_email(&personal_info.email);

        self.ensure_email_available(&personal_info.email, None)
            .await?;

        if input.role == Role::Lawyer {
            self.ensure_bar_registration_available(
                &input.professional_info.oab_number,
                &input.professional_info.oab_state,
                None,
            )
            .await?;
        }

        let password_hash = hash_password(&input.password)?;

        let now = Utc::now();
        let user = User {
            id: Uuid::nil(),
            personal_info,
            professional_info: input.professional_info,
            role: input.role,
            password_hash,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.create(user).await?;

        tracing::info!(user_id = %created.id, "User created");
        Ok(created.into())
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        let user = self.find_existing(id).await?;
        Ok(user.into())
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_email(&self, email: &str) -> UserResult<UserResponse> {
        let email = normalize_email(email);
        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or(UserError::EmailNotFound(email))?;

        Ok(user.into())
    }

    /// Get the lawyer holding a bar registration
    #[instrument(skip(self))]
    pub async fn get_user_by_oab(&self, number: &str, state: &str) -> UserResult<UserResponse> {
        let user = self
            .repository
            .find_by_bar_registration(number, state)
            .await?
            .ok_or_else(|| UserError::OabNotFound {
                number: number.to_string(),
                state: state.to_string(),
            })?;

        Ok(user.into())
    }

    #[instrument(skip(self))]
    pub async fn get_users_by_department(
        &self,
        department: &str,
    ) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.find_by_department(department).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Merge `input` onto the stored user, re-running only the checks the
    /// changed fields need
    #[instrument(skip(self, input))]
    pub async fn update_user(
        &self,
        id: Uuid,
        mut input: UpdateUser,
    ) -> UserResult<UserResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let existing = self.find_existing(id).await?;
        let new_password = input.password.take();

        let mut user = existing.clone();
        user.apply_update(input);
        user.personal_info.email = normalize_email(&user.personal_info.email);

        if user.personal_info.phone != existing.personal_info.phone {
            validate_phone(&user.personal_info.phone)?;
        }

        if user.personal_info.birth_date != existing.personal_info.birth_date
            || user.professional_info.hire_date != existing.professional_info.hire_date
        {
            validate_dates(
                user.personal_info.birth_date,
                user.professional_info.hire_date,
                Utc::now().date_naive(),
            )?;
        }

        if user.personal_info.email != existing.personal_info.email {
            self.ensure_email_available(&user.personal_info.email, Some(id))
                .await?;
        }

        let registration_changed = user.bar_registration() != existing.bar_registration();
        if user.is_lawyer() && (registration_changed || !existing.is_lawyer()) {
            let (number, state) = user.bar_registration();
            self.ensure_bar_registration_available(number, state, Some(id))
                .await?;
        }

        // The stored hash is never re-hashed nor replaced by plaintext
        let new_password =
            new_password.filter(|p| !p.trim().is_empty() && *p != existing.password_hash);
        if let Some(password) = new_password {
            validate_password_strength(&password)?;
            user.password_hash = hash_password(&password)?;
            tracing::info!(user_id = %id, "Password changed");
        }

        user.id = existing.id;
        user.created_at = existing.created_at;
        user.updated_at = Utc::now();

        let updated = self.repository.update(user).await?;

        tracing::info!(user_id = %id, "User updated");
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id));
        }

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn touch_last_login(&self, id: Uuid) -> UserResult<()> {
        self.repository.touch_last_login(id).await
    }

    /// Check credentials and record the login. No token is issued.
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> UserResult<LoginResponse> {
        let email = normalize_email(&request.email);

        let Some(user) = self.repository.find_by_email(&email).await? else {
            tracing::warn!("Login rejected: unknown email");
            return Err(UserError::InvalidCredentials);
        };

        if !verify_password(&request.password, &user.password_hash) {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(UserError::InvalidCredentials);
        }

        if !user.is_active {
            tracing::warn!(user_id = %user.id, "Login rejected: inactive account");
            return Err(UserError::AccountInactive);
        }

        self.touch_last_login(user.id).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse {
            message: "Login successful".to_string(),
            user: UserSummary::from(&user),
        })
    }

    /// Whether the user's role grants `action` on `module`
    ///
    /// Admins are granted everything. For other roles a module or action
    /// outside the policy is simply not granted.
    #[instrument(skip(self))]
    pub async fn has_permission(
        &self,
        user_id: Uuid,
        module: &str,
        action: &str,
    ) -> UserResult<bool> {
        let user = self.find_existing(user_id).await?;
        if user.role == Role::Admin {
            return Ok(true);
        }

        match (module.parse::<Module>(), action.parse::<Action>()) {
            (Ok(module), Ok(action)) => Ok(user.role.can(module, action)),
            _ => Ok(false),
        }
    }

    async fn find_existing(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Fail with `DuplicateEmail` if someone other than `owner` holds `email`
    async fn ensure_email_available(&self, email: &str, owner: Option<Uuid>) -> UserResult<()> {
        match self.repository.find_by_email(email).await? {
            Some(other) if Some(other.id) != owner => {
                Err(UserError::DuplicateEmail(email.to_string()))
            }
            _ => Ok(()),
        }
    }

    async fn ensure_bar_registration_available(
        &self,
        number: &str,
        state: &str,
        owner: Option<Uuid>,
    ) -> UserResult<()> {
        match self
            .repository
            .find_by_bar_registration(number, state)
            .await?
        {
            Some(other) if Some(other.id) != owner => Err(UserError::DuplicateOab {
                number: number.to_string(),
                state: state.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
