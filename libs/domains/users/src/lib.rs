//! Users Domain
//!
//! Staff accounts of the law office: validation, uniqueness of email and
//! bar registration (OAB), Argon2id credentials, and the static role policy.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, uniqueness checks, hashing, permissions
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory and MongoDB implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, roles
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, MongoUserRepository, UserService};
//! use mongodb::Client;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("jurisconnect");
//!
//! let repository = MongoUserRepository::new(&db, Duration::from_secs(10));
//! repository.init_indexes().await?;
//!
//! let router = handlers::router(UserService::new(repository));
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod permission;
pub mod repository;
pub mod service;
pub mod validation;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{
    Address, CreateUser, LoginRequest, LoginResponse, PersonalInfo, ProfessionalInfo, Role,
    UpdatePersonalInfo, UpdateProfessionalInfo, UpdateUser, User, UserResponse, UserSummary,
};
pub use mongodb::MongoUserRepository;
pub use permission::{Action, Module, RolePermissions};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
