//! MongoDB implementations of CaseRepository and DocumentRepository

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use database::mongodb::uuid_filter;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, Document as BsonDocument},
    options::{FindOptions, IndexOptions},
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CaseError, CaseResult};
use crate::models::{Case, Document, NewCase, NewDocument};
use crate::repository::{CaseRepository, DocumentRepository};

async fn bounded<T, F>(timeout: Duration, operation: &'static str, fut: F) -> CaseResult<T>
where
    F: Future<Output = CaseResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, "MongoDB operation timed out");
            Err(CaseError::Timeout(operation.to_string()))
        }
    }
}

fn newest_first() -> FindOptions {
    FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build()
}

pub struct MongoCaseRepository {
    collection: Collection<Case>,
    operation_timeout: Duration,
}

impl MongoCaseRepository {
    pub fn new(db: &Database, operation_timeout: Duration) -> Self {
        Self {
            collection: db.collection::<Case>("cases"),
            operation_timeout,
        }
    }

    pub async fn init_indexes(&self) -> CaseResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "client_id": 1, "created_at": -1 })
                .options(IndexOptions::builder().name("idx_client".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "lawyer_id": 1, "created_at": -1 })
                .options(IndexOptions::builder().name("idx_lawyer".to_string()).build())
                .build(),
        ];

        bounded(self.operation_timeout, "init_indexes", async {
            self.collection
                .create_indexes(indexes)
                .await
                .map(|_| ())
                .map_err(CaseError::from)
        })
        .await?;

        tracing::info!("Case indexes created successfully");
        Ok(())
    }

    async fn find_many(
        &self,
        operation: &'static str,
        filter: BsonDocument,
    ) -> CaseResult<Vec<Case>> {
        bounded(self.operation_timeout, operation, async {
            let cursor = self
                .collection
                .find(filter)
                .with_options(newest_first())
                .await?;
            let cases: Vec<Case> = cursor.try_collect().await?;
            Ok::<_, CaseError>(cases)
        })
        .await
    }
}

#[async_trait]
impl CaseRepository for MongoCaseRepository {
    #[instrument(skip(self, input), fields(title = %input.title))]
    async fn create(&self, input: NewCase) -> CaseResult<Case> {
        input.validate()?;
        let case = Case::new(input);

        bounded(self.operation_timeout, "create_case", async {
            self.collection
                .insert_one(&case)
                .await
                .map_err(CaseError::from)
        })
        .await?;

        tracing::info!(case_id = %case.id, "Case created successfully");
        Ok(case)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> CaseResult<Option<Case>> {
        bounded(self.operation_timeout, "find_case", async {
            self.collection
                .find_one(uuid_filter("_id", id))
                .await
                .map_err(CaseError::from)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_client(&self, client_id: Uuid) -> CaseResult<Vec<Case>> {
        self.find_many("find_cases_by_client", uuid_filter("client_id", client_id))
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_lawyer(&self, lawyer_id: Uuid) -> CaseResult<Vec<Case>> {
        self.find_many("find_cases_by_lawyer", uuid_filter("lawyer_id", lawyer_id))
            .await
    }

    #[instrument(skip(self, case), fields(case_id = %case.id))]
    async fn update(&self, mut case: Case) -> CaseResult<Case> {
        case.updated_at = Utc::now();

        let result = bounded(self.operation_timeout, "update_case", async {
            self.collection
                .replace_one(uuid_filter("_id", case.id), &case)
                .await
                .map_err(CaseError::from)
        })
        .await?;

        if result.matched_count == 0 {
            return Err(CaseError::CaseNotFound(case.id));
        }
        Ok(case)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CaseResult<bool> {
        let result = bounded(self.operation_timeout, "delete_case", async {
            self.collection
                .delete_one(uuid_filter("_id", id))
                .await
                .map_err(CaseError::from)
        })
        .await?;

        Ok(result.deleted_count > 0)
    }
}

pub struct MongoDocumentRepository {
    collection: Collection<Document>,
    operation_timeout: Duration,
}

impl MongoDocumentRepository {
    pub fn new(db: &Database, operation_timeout: Duration) -> Self {
        Self {
            collection: db.collection::<Document>("documents"),
            operation_timeout,
        }
    }

    pub async fn init_indexes(&self) -> CaseResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "case_id": 1, "created_at": -1 })
            .options(IndexOptions::builder().name("idx_case".to_string()).build())
            .build();

        bounded(self.operation_timeout, "init_indexes", async {
            self.collection
                .create_index(index)
                .await
                .map(|_| ())
                .map_err(CaseError::from)
        })
        .await?;

        tracing::info!("Document indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl DocumentRepository for MongoDocumentRepository {
    #[instrument(skip(self, input), fields(case_id = %input.case_id))]
    async fn create(&self, input: NewDocument) -> CaseResult<Document> {
        input.validate()?;
        let document = Document::new(input);

        bounded(self.operation_timeout, "create_document", async {
            self.collection
                .insert_one(&document)
                .await
                .map_err(CaseError::from)
        })
        .await?;

        tracing::info!(document_id = %document.id, "Document created successfully");
        Ok(document)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> CaseResult<Option<Document>> {
        bounded(self.operation_timeout, "find_document", async {
            self.collection
                .find_one(uuid_filter("_id", id))
                .await
                .map_err(CaseError::from)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_case(&self, case_id: Uuid) -> CaseResult<Vec<Document>> {
        bounded(self.operation_timeout, "find_documents_by_case", async {
            let cursor = self
                .collection
                .find(uuid_filter("case_id", case_id))
                .with_options(newest_first())
                .await?;
            let documents: Vec<Document> = cursor.try_collect().await?;
            Ok::<_, CaseError>(documents)
        })
        .await
    }

    #[instrument(skip(self, document), fields(document_id = %document.id))]
    async fn update(&self, mut document: Document) -> CaseResult<Document> {
        document.updated_at = Utc::now();

        let result = bounded(self.operation_timeout, "update_document", async {
            self.collection
                .replace_one(uuid_filter("_id", document.id), &document)
                .await
                .map_err(CaseError::from)
        })
        .await?;

        if result.matched_count == 0 {
            return Err(CaseError::DocumentNotFound(document.id));
        }
        Ok(document)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CaseResult<bool> {
        let result = bounded(self.operation_timeout, "delete_document", async {
            self.collection
                .delete_one(uuid_filter("_id", id))
                .await
                .map_err(CaseError::from)
        })
        .await?;

        Ok(result.deleted_count > 0)
    }
}
