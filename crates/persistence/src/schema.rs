//! ScyllaDB schema creation

use scylla::Session;

use crate::error::PersistenceError;

pub async fn create_keyspace(
    session: &Session,
    keyspace: &str,
    replication_factor: u8,
) -> Result<(), PersistenceError> {
    let query = format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
        keyspace, replication_factor
    );

    session
        .query_unpaged(query, &[])
        .await
        .map_err(|e| PersistenceError::SchemaError(format!("Failed to create keyspace: {}", e)))?;

    Ok(())
}

pub async fn create_tables(session: &Session, keyspace: &str) -> Result<(), PersistenceError> {
    let submissions_table = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.submissions (
            id UUID,
            input_type TEXT,
            input_content TEXT,
            status TEXT,
            created_at BIGINT,
            PRIMARY KEY (id)
        )
    "#,
        keyspace
    );

    session
        .query_unpaged(submissions_table, &[])
        .await
        .map_err(|e| {
            PersistenceError::SchemaError(format!("Failed to create submissions table: {}", e))
        })?;

    // One partition per submission, newest correction first
    let corrections_table = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {}.corrections (
            submission_id UUID,
            created_at BIGINT,
            id UUID,
            corrected_content TEXT,
            verified BOOLEAN,
            PRIMARY KEY ((submission_id), created_at, id)
        ) WITH CLUSTERING ORDER BY (created_at DESC, id DESC)
    "#,
        keyspace
    );

    session
        .query_unpaged(corrections_table, &[])
        .await
        .map_err(|e| {
            PersistenceError::SchemaError(format!("Failed to create corrections table: {}", e))
        })?;

    tracing::info!("All tables created successfully");
    Ok(())
}
