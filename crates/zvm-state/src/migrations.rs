//! SurrealDB schema initialization
//!
//! Defines one table per [`Collection`] with a unique index on `identifier`.
//! Every statement uses `IF NOT EXISTS`, so running this on an existing
//! file-backed store is a no-op.

use crate::error::StateError;
use crate::storage_traits::Collection;
use crate::Result;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

/// Initialize the seen-set tables.
///
/// Safe to call on every open (idempotent).
pub async fn init_schema(db: &Surreal<Any>) -> Result<()> {
    info!("Initializing seen-store schema");

    for collection in Collection::ALL {
        init_seen_table(db, collection).await?;
    }

    info!("Seen-store schema initialization complete");
    Ok(())
}

/// Initialize the seen table for one collection
///
/// Schema:
/// ```text
/// TABLE <collection> {
///   identifier: STRING (unique)
/// }
/// ```
///
/// Rows are append-only: update and delete are not permitted.
async fn init_seen_table(db: &Surreal<Any>, collection: Collection) -> Result<()> {
    let table = collection.table();
    debug!("Initializing {} table", table);

    let sql = format!(
        r#"
        DEFINE TABLE IF NOT EXISTS {table} SCHEMALESS
            PERMISSIONS
                FOR create FULL
                FOR read FULL
                FOR update NONE
                FOR delete NONE;

        DEFINE INDEX IF NOT EXISTS idx_{table}_identifier ON TABLE {table} COLUMNS identifier UNIQUE;
    "#
    );

    db.query(sql)
        .await
        .and_then(|response| response.check())
        .map_err(|e| StateError::SchemaSetup(format!("{table}: {e}")))?;

    debug!("{} table initialized", table);
    Ok(())
}
