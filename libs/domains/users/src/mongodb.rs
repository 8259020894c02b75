//! MongoDB implementation of UserRepository

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use database::mongodb::uuid_filter;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Document},
    error::{ErrorKind, WriteFailure},
    options::{FindOptions, IndexOptions},
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

const EMAIL_INDEX: &str = "idx_email_unique";
const OAB_INDEX: &str = "idx_oab_unique";
const DUPLICATE_KEY: i32 = 11000;

/// MongoDB implementation of the UserRepository
///
/// Every call is bounded by `operation_timeout`; an elapsed call surfaces
/// as [`UserError::Timeout`].
pub struct MongoUserRepository {
    collection: Collection<User>,
    operation_timeout: Duration,
}

impl MongoUserRepository {
    pub fn new(db: &Database, operation_timeout: Duration) -> Self {
        Self::with_collection(db, "users", operation_timeout)
    }

    pub fn with_collection(
        db: &Database,
        collection_name: &str,
        operation_timeout: Duration,
    ) -> Self {
        Self {
            collection: db.collection::<User>(collection_name),
            operation_timeout,
        }
    }

    /// Create the unique indexes that back email and bar registration
    /// uniqueness, plus the department lookup index
    pub async fn init_indexes(&self) -> UserResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "personal_info.email": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(EMAIL_INDEX.to_string())
                        .build(),
                )
                .build(),
            // Only lawyers hold a registration that must be unique
            IndexModel::builder()
                .keys(doc! {
                    "professional_info.oab_number": 1,
                    "professional_info.oab_state": 1,
                })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .partial_filter_expression(doc! { "role": "lawyer" })
                        .name(OAB_INDEX.to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "professional_info.department": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_department".to_string())
                        .build(),
                )
                .build(),
        ];

        self.bounded("init_indexes", async {
            self.collection
                .create_indexes(indexes)
                .await
                .map(|_| ())
                .map_err(UserError::from)
        })
        .await?;

        tracing::info!("User indexes created successfully");
        Ok(())
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<User> {
        &self.collection
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> UserResult<T>
    where
        F: Future<Output = UserResult<T>>,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.operation_timeout.as_millis() as u64,
                    "MongoDB operation timed out"
                );
                Err(UserError::Timeout(operation.to_string()))
            }
        }
    }

    fn id_filter(id: Uuid) -> Document {
        uuid_filter("_id", id)
    }
}

/// Map a write failure, turning duplicate-key errors on the unique
/// indexes into the matching conflict
fn map_write_error(err: mongodb::error::Error, user: &User) -> UserError {
    if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = err.kind.as_ref() {
        if write_error.code == DUPLICATE_KEY {
            if let Some(conflict) = duplicate_conflict(&write_error.message, user) {
                return conflict;
            }
        }
    }
    err.into()
}

fn duplicate_conflict(message: &str, user: &User) -> Option<UserError> {
    if message.contains(EMAIL_INDEX) {
        Some(UserError::DuplicateEmail(user.personal_info.email.clone()))
    } else if message.contains(OAB_INDEX) {
        let (number, state) = user.bar_registration();
        Some(UserError::DuplicateOab {
            number: number.to_string(),
            state: state.to_string(),
        })
    } else {
        None
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(role = %user.role))]
    async fn create(&self, mut user: User) -> UserResult<User> {
        user.id = Uuid::now_v7();

        self.bounded("create", async {
            self.collection
                .insert_one(&user)
                .await
                .map_err(|e| map_write_error(e, &user))
        })
        .await?;

        tracing::info!(user_id = %user.id, "User created successfully");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        self.bounded("find_by_id", async {
            self.collection
                .find_one(Self::id_filter(id))
                .await
                .map_err(UserError::from)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let filter = doc! { "personal_info.email": email.to_lowercase() };
        self.bounded("find_by_email", async {
            self.collection.find_one(filter).await.map_err(UserError::from)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_bar_registration(
        &self,
        number: &str,
        state: &str,
    ) -> UserResult<Option<User>> {
        let filter = doc! {
            "role": "lawyer",
            "professional_info.oab_number": number,
            "professional_info.oab_state": state,
        };
        self.bounded("find_by_bar_registration", async {
            self.collection.find_one(filter).await.map_err(UserError::from)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_department(&self, department: &str) -> UserResult<Vec<User>> {
        let filter = doc! { "professional_info.department": department };
        let options = FindOptions::builder()
            .sort(doc! { "personal_info.name": 1 })
            .build();

        self.bounded("find_by_department", async {
            let cursor = self.collection.find(filter).with_options(options).await?;
            let users: Vec<User> = cursor.try_collect().await?;
            Ok::<_, UserError>(users)
        })
        .await
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: User) -> UserResult<User> {
        let result = self
            .bounded("update", async {
                self.collection
                    .replace_one(Self::id_filter(user.id), &user)
                    .await
                    .map_err(|e| map_write_error(e, &user))
            })
            .await?;

        if result.matched_count == 0 {
            return Err(UserError::NotFound(user.id));
        }

        tracing::info!(user_id = %user.id, "User updated successfully");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let result = self
            .bounded("delete", async {
                self.collection
                    .delete_one(Self::id_filter(id))
                    .await
                    .map_err(UserError::from)
            })
            .await?;

        if result.deleted_count == 0 {
            return Ok(false);
        }

        tracing::info!(user_id = %id, "User deleted successfully");
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn touch_last_login(&self, id: Uuid) -> UserResult<()> {
        let now =
            to_bson(&chrono::Utc::now()).map_err(|e| UserError::Internal(e.to_string()))?;
        let update = doc! {
            "$set": { "last_login_at": now.clone(), "updated_at": now }
        };

        let result = self
            .bounded("touch_last_login", async {
                self.collection
                    .update_one(Self::id_filter(id), update)
                    .await
                    .map_err(UserError::from)
            })
            .await?;

        if result.matched_count == 0 {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_user;

    #[test]
    fn test_duplicate_email_is_recognized_by_index_name() {
        let user = sample_user();
        let message = "E11000 duplicate key error collection: jurisconnect.users index: \
                       idx_email_unique dup key: { personal_info.email: \"ana@example.com\" }";

        match duplicate_conflict(message, &user) {
            Some(UserError::DuplicateEmail(email)) => assert_eq!(email, "ana@example.com"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_oab_is_recognized_by_index_name() {
        let user = sample_user();
        let message =
            "E11000 duplicate key error collection: jurisconnect.users index: idx_oab_unique";

        assert!(matches!(
            duplicate_conflict(message, &user),
            Some(UserError::DuplicateOab { number, state }) if number == "123456" && state == "SP"
        ));
    }

    #[test]
    fn test_duplicate_on_other_index_is_not_a_conflict() {
        let message = "E11000 duplicate key error collection: jurisconnect.users index: _id_";
        assert!(duplicate_conflict(message, &sample_user()).is_none());
    }

    #[test]
    fn test_id_filter_matches_stored_id() {
        let mut user = sample_user();
        user.id = Uuid::now_v7();
        let stored = mongodb::bson::to_raw_document_buf(&user)
            .unwrap()
            .to_document()
            .unwrap();

        let filter = MongoUserRepository::id_filter(user.id);
        assert_eq!(stored.get("_id"), filter.get("_id"));
        assert_ne!(filter.get("_id"), Some(&to_bson(&user.id).unwrap()));
    }

    async fn live_repository() -> MongoUserRepository {
        let url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = mongodb::Client::with_uri_str(&url).await.unwrap();
        let db = client.database("jurisconnect_test");
        let repo = MongoUserRepository::with_collection(
            &db,
            &format!("users_{}", Uuid::now_v7().simple()),
            Duration::from_secs(5),
        );
        repo.init_indexes().await.unwrap();
        repo
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB"]
    async fn test_unique_indexes_reject_duplicates() {
        let repo = live_repository().await;

        let first = repo.create(sample_user()).await.unwrap();
        assert!(repo.find_by_id(first.id).await.unwrap().is_some());

        let result = repo.create(sample_user()).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));

        let mut other_lawyer = sample_user();
        other_lawyer.personal_info.email = "bia@example.com".to_string();
        let result = repo.create(other_lawyer).await;
        assert!(matches!(result, Err(UserError::DuplicateOab { .. })));

        repo.collection().drop().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB"]
    async fn test_touch_and_delete() {
        let repo = live_repository().await;
        let user = repo.create(sample_user()).await.unwrap();

        repo.touch_last_login(user.id).await.unwrap();
        let touched = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert!(touched.last_login_at.is_some());

        assert!(repo.delete(user.id).await.unwrap());
        assert!(!repo.delete(user.id).await.unwrap());

        repo.collection().drop().await.unwrap();
    }
}
