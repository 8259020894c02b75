//! Cases Domain
//!
//! Legal cases and the documents attached to them. Both are plain records:
//! the crate offers the entities, repository traits and their MongoDB
//! implementations, with no business rules on top.
//!
//! ```rust,no_run
//! use domain_cases::{CaseRepository, MongoCaseRepository, NewCase};
//! use std::time::Duration;
//! use uuid::Uuid;
//!
//! # async fn example(db: mongodb::Database) -> Result<(), Box<dyn std::error::Error>> {
//! let cases = MongoCaseRepository::new(&db, Duration::from_secs(10));
//! cases.init_indexes().await?;
//!
//! let case = cases
//!     .create(NewCase {
//!         title: "Silva v. Banco Central".to_string(),
//!         description: String::new(),
//!         status: Default::default(),
//!         client_id: Uuid::now_v7(),
//!         lawyer_id: Uuid::now_v7(),
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod mongodb;
pub mod repository;

pub use error::{CaseError, CaseResult};
pub use models::{Case, CaseStatus, Document, NewCase, NewDocument};
pub use mongodb::{MongoCaseRepository, MongoDocumentRepository};
pub use repository::{CaseRepository, DocumentRepository};
