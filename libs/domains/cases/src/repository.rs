use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CaseResult;
use crate::models::{Case, Document, NewCase, NewDocument};

/// Repository trait for Case persistence
#[async_trait]
pub trait CaseRepository: Send + Sync {
    async fn create(&self, input: NewCase) -> CaseResult<Case>;

    async fn find_by_id(&self, id: Uuid) -> CaseResult<Option<Case>>;

    async fn find_by_client(&self, client_id: Uuid) -> CaseResult<Vec<Case>>;

    async fn find_by_lawyer(&self, lawyer_id: Uuid) -> CaseResult<Vec<Case>>;

    /// Replace the stored case, refreshing `updated_at`
    async fn update(&self, case: Case) -> CaseResult<Case>;

    /// Delete a case by ID, `false` when nothing was removed
    async fn delete(&self, id: Uuid) -> CaseResult<bool>;
}

/// Repository trait for Document persistence
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn create(&self, input: NewDocument) -> CaseResult<Document>;

    async fn find_by_id(&self, id: Uuid) -> CaseResult<Option<Document>>;

    async fn find_by_case(&self, case_id: Uuid) -> CaseResult<Vec<Document>>;

    /// Replace the stored document, refreshing `updated_at`
    async fn update(&self, document: Document) -> CaseResult<Document>;

    async fn delete(&self, id: Uuid) -> CaseResult<bool>;
}
