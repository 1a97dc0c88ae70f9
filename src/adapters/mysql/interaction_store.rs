//! MySQL implementation of InteractionStore.
//!
//! Persists interaction rows to the `hcp_interactions` table and owns the
//! startup schema check.

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};
use tracing::info;

use crate::domain::interaction::{
    InteractionId, InteractionMethod, InteractionRecord, NewInteraction, Sentiment,
};
use crate::ports::{InteractionStore, StoreError};

/// MySQL implementation of InteractionStore.
#[derive(Clone)]
pub struct MySqlInteractionStore {
    pool: MySqlPool,
}

impl MySqlInteractionStore {
    /// Creates a new MySqlInteractionStore.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates the `hcp_interactions` table if it does not exist. Run once
    /// at startup, before the server accepts traffic.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS hcp_interactions (
                id INT AUTO_INCREMENT PRIMARY KEY,
                hcp_name VARCHAR(255) NOT NULL,
                interaction_date DATE NOT NULL,
                products_discussed TEXT,
                key_discussion_points TEXT,
                sentiment ENUM('Positive', 'Neutral', 'Negative'),
                follow_up_actions TEXT,
                interaction_method ENUM('form', 'chat') NOT NULL,
                raw_transcript TEXT,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        info!("Database schema ensured, hcp_interactions table ready");
        Ok(())
    }
}

#[async_trait]
impl InteractionStore for MySqlInteractionStore {
    async fn insert(&self, interaction: &NewInteraction) -> Result<InteractionId, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let result = sqlx::query(
            r#"
            INSERT INTO hcp_interactions (
                hcp_name, interaction_date, products_discussed,
                key_discussion_points, sentiment, follow_up_actions,
                interaction_method, raw_transcript
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&interaction.hcp_name)
        .bind(interaction.interaction_date)
        .bind(&interaction.products_discussed)
        .bind(&interaction.key_discussion_points)
        .bind(interaction.sentiment.map(|s| s.as_str()))
        .bind(&interaction.follow_up_actions)
        .bind(interaction.method.as_str())
        .bind(&interaction.raw_transcript)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(InteractionId::new(result.last_insert_id()))
    }

    async fn fetch(&self, id: InteractionId) -> Result<Option<InteractionRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, hcp_name, interaction_date, products_discussed,
                   key_discussion_points, sentiment, follow_up_actions,
                   interaction_method, raw_transcript, created_at
            FROM hcp_interactions
            WHERE id = ?
            "#,
        )
        .bind(id.as_u64())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(row_to_record).transpose()
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) => match db.kind() {
            sqlx::error::ErrorKind::UniqueViolation
            | sqlx::error::ErrorKind::ForeignKeyViolation
            | sqlx::error::ErrorKind::NotNullViolation
            | sqlx::error::ErrorKind::CheckViolation => {
                StoreError::constraint_violation(db.message())
            }
            _ => StoreError::database(db.message()),
        },
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => StoreError::unavailable(err.to_string()),
        _ => StoreError::database(err.to_string()),
    }
}

fn row_to_record(row: sqlx::mysql::MySqlRow) -> Result<InteractionRecord, StoreError> {
    let id: i64 = column(&row, "id")?;
    let method_str: String = column(&row, "interaction_method")?;
    let method = InteractionMethod::parse(&method_str).ok_or_else(|| {
        StoreError::database(format!("Unknown interaction_method: {}", method_str))
    })?;
    let sentiment: Option<String> = column(&row, "sentiment")?;

    Ok(InteractionRecord {
        id: InteractionId::new(id as u64),
        hcp_name: column(&row, "hcp_name")?,
        interaction_date: column(&row, "interaction_date")?,
        products_discussed: column(&row, "products_discussed")?,
        key_discussion_points: column(&row, "key_discussion_points")?,
        sentiment: sentiment.as_deref().and_then(Sentiment::parse),
        follow_up_actions: column(&row, "follow_up_actions")?,
        method,
        raw_transcript: column(&row, "raw_transcript")?,
        created_at: column(&row, "created_at")?,
    })
}

fn column<'r, T>(row: &'r sqlx::mysql::MySqlRow, name: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    row.try_get(name)
        .map_err(|e| StoreError::database(format!("Failed to get {}: {}", name, e)))
}
