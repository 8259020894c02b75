use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence
///
/// Lookups return `Ok(None)` for "no such user" so callers can tell absence
/// from a failed lookup. Implementations must enforce email uniqueness and
/// bar registration uniqueness among lawyers on their own, independently of
/// any check done by the service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, assigning its id
    async fn create(&self, user: User) -> UserResult<User>;

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Find the lawyer holding a bar registration
    async fn find_by_bar_registration(&self, number: &str, state: &str)
        -> UserResult<Option<User>>;

    async fn find_by_department(&self, department: &str) -> UserResult<Vec<User>>;

    /// Replace the stored record with the same id
    async fn update(&self, user: User) -> UserResult<User>;

    /// Delete a user by ID, `false` when nothing was removed
    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    /// Set `last_login_at` and `updated_at` to now
    async fn touch_last_login(&self, id: Uuid) -> UserResult<()>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject `user` if another record already holds its email or, for a
    /// lawyer, its bar registration. Runs under the write lock.
    fn check_unique(users: &HashMap<Uuid, User>, user: &User) -> UserResult<()> {
        let others = || users.values().filter(|u| u.id != user.id);

        let email = user.personal_info.email.to_lowercase();
        if others().any(|u| u.personal_info.email.to_lowercase() == email) {
            return Err(UserError::DuplicateEmail(user.personal_info.email.clone()));
        }

        if user.is_lawyer() {
            let registration = user.bar_registration();
            if others().any(|u| u.is_lawyer() && u.bar_registration() == registration) {
                let (number, state) = registration;
                return Err(UserError::DuplicateOab {
                    number: number.to_string(),
                    state: state.to_string(),
                });
            }
        }

        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, mut user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        user.id = Uuid::now_v7();
        Self::check_unique(&users, &user)?;
        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        let email = email.to_lowercase();
        Ok(users
            .values()
            .find(|u| u.personal_info.email.to_lowercase() == email)
            .cloned())
    }

    async fn find_by_bar_registration(
        &self,
        number: &str,
        state: &str,
    ) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.is_lawyer() && u.bar_registration() == (number, state))
            .cloned())
    }

    async fn find_by_department(&self, department: &str) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users
            .values()
            .filter(|u| u.professional_info.department == department)
            .cloned()
            .collect();

        result.sort_by(|a, b| a.personal_info.name.cmp(&b.personal_info.name));
        Ok(result)
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id));
        }
        Self::check_unique(&users, &user)?;

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;

        if users.remove(&id).is_some() {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn touch_last_login(&self, id: Uuid) -> UserResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(UserError::NotFound(id))?;

        let now = chrono::Utc::now();
        user.last_login_at = Some(now);
        user.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::test_support::{professional_info, sample_user};

    fn user_with(email: &str, role: Role, oab: (&str, &str)) -> User {
        let mut user = sample_user();
        user.personal_info.email = email.to_string();
        user.role = role;
        user.professional_info = professional_info(oab.0, oab.1);
        user
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_get() {
        let repo = InMemoryUserRepository::new();

        let mut user = sample_user();
        user.id = Uuid::nil();

        let created = repo.create(user).await.unwrap();
        assert!(!created.id.is_nil());

        let fetched = repo.find_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_find_by_email_ignores_case() {
        let repo = InMemoryUserRepository::new();
        repo.create(sample_user()).await.unwrap();

        assert!(repo.find_by_email("ANA@example.com").await.unwrap().is_some());
        assert!(repo.find_by_email("bia@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_error() {
        let repo = InMemoryUserRepository::new();
        repo.create(user_with("a@x.com", Role::Secretary, ("", "")))
            .await
            .unwrap();

        let result = repo
            .create(user_with("a@x.com", Role::Intern, ("", "")))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_bar_registration_unique_among_lawyers_only() {
        let repo = InMemoryUserRepository::new();
        repo.create(user_with("a@x.com", Role::Lawyer, ("100", "RJ")))
            .await
            .unwrap();

        let result = repo
            .create(user_with("b@x.com", Role::Lawyer, ("100", "RJ")))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateOab { .. })));

        // same registration on non-lawyers is fine
        repo.create(user_with("c@x.com", Role::Intern, ("100", "RJ")))
            .await
            .unwrap();
        repo.create(user_with("d@x.com", Role::Intern, ("100", "RJ")))
            .await
            .unwrap();

        let found = repo
            .find_by_bar_registration("100", "RJ")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.personal_info.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        let result = repo.update(sample_user()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_own_email() {
        let repo = InMemoryUserRepository::new();
        let mut user = repo.create(sample_user()).await.unwrap();

        user.personal_info.name = "Ana Lima".to_string();
        let updated = repo.update(user).await.unwrap();
        assert_eq!(updated.personal_info.name, "Ana Lima");
    }

    #[tokio::test]
    async fn test_find_by_department() {
        let repo = InMemoryUserRepository::new();
        repo.create(user_with("a@x.com", Role::Secretary, ("", "")))
            .await
            .unwrap();
        let mut other = user_with("b@x.com", Role::Secretary, ("", ""));
        other.professional_info.department = "tax".to_string();
        repo.create(other).await.unwrap();

        let litigation = repo.find_by_department("litigation").await.unwrap();
        assert_eq!(litigation.len(), 1);
        assert!(repo.find_by_department("family").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_and_touch() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(sample_user()).await.unwrap();

        repo.touch_last_login(user.id).await.unwrap();
        let touched = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert!(touched.last_login_at.is_some());
        assert!(touched.updated_at >= user.updated_at);

        assert!(repo.delete(user.id).await.unwrap());
        assert!(!repo.delete(user.id).await.unwrap());
        assert!(matches!(
            repo.touch_last_login(user.id).await,
            Err(UserError::NotFound(_))
        ));
    }
}
