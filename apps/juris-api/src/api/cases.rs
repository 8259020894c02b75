//! Case and document collections
//!
//! No HTTP surface yet; only the indexes are prepared at startup.

use domain_cases::{MongoCaseRepository, MongoDocumentRepository};

use crate::state::AppState;

/// Initialize case and document indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    let timeout = state.config.mongodb.operation_timeout();
    MongoCaseRepository::new(&state.db, timeout)
        .init_indexes()
        .await?;
    MongoDocumentRepository::new(&state.db, timeout)
        .init_indexes()
        .await?;
    Ok(())
}
