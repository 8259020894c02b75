//! Users API routes

use axum::Router;
use domain_users::{handlers, MongoUserRepository, UserService};

use crate::state::AppState;

fn repository(state: &AppState) -> MongoUserRepository {
    MongoUserRepository::new(&state.db, state.config.mongodb.operation_timeout())
}

/// Create users router
pub fn router(state: &AppState) -> Router {
    let service = UserService::new(repository(state));
    handlers::router(service)
}

/// Initialize users indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    repository(state).init_indexes().await?;
    Ok(())
}
