//! Reference data service: routes, payment methods, delivery terms, item types
//! and order statuses

use shared::{OrderStatus, ReferenceItem, ReferenceKind};
use sqlx::PgPool;

use crate::error::AppResult;

/// Reference data service
#[derive(Clone)]
pub struct ReferenceService {
    db: PgPool,
}

impl ReferenceService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All rows of a plain id/name lookup table, ordered by id
    pub async fn list(&self, kind: ReferenceKind) -> AppResult<Vec<ReferenceItem>> {
        let query = format!("SELECT id, name FROM {} ORDER BY id", kind.table());
        let rows = sqlx::query_as::<_, (i32, String)>(&query)
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Error fetching {}: {}", kind.table(), e);
                e
            })?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| ReferenceItem { id, name })
            .collect())
    }

    /// Order statuses with their badge colors
    pub async fn list_statuses(&self) -> AppResult<Vec<OrderStatus>> {
        let rows = sqlx::query_as::<_, (i32, String, Option<String>)>(
            "SELECT id, name, color FROM order_status ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, color)| OrderStatus { id, name, color })
            .collect())
    }
}
