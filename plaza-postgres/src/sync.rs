//! Schema synchronizer: descriptor-driven, additive-only DDL.
//!
//! Existence checks are read from the database catalog
//! (`information_schema`), so re-running against an up-to-date table is a
//! silent no-op. Columns are only ever added, never dropped or retyped.

use plaza_core::{AttributeDescriptor, AttributeKind, EntityDescriptor, Error, Result};
use sqlx::PgPool;
use tracing::{debug, error, info};

pub struct SchemaSync {
    pool: PgPool,
}

impl SchemaSync {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ensure the entity's backing table exists with a column per attribute.
    ///
    /// An absent table is created from the descriptor; an existing table
    /// gains any missing columns. Statement errors surface as
    /// [`Error::Store`], never a panic.
    pub async fn ensure_table(&self, descriptor: &EntityDescriptor) -> Result<()> {
        if !self.table_exists(descriptor.table).await? {
            let ddl = create_table_sql(descriptor);
            debug!(table = descriptor.table, "creating table");
            sqlx::query(&ddl).execute(&self.pool).await.map_err(|e| {
                error!(table = descriptor.table, error = %e, "CREATE TABLE failed");
                Error::Store(format!("Failed to create table {}: {}", descriptor.table, e))
            })?;
            info!(table = descriptor.table, entity = descriptor.entity, "table created");
            return Ok(());
        }

        for attr in descriptor.attributes {
            if self.column_exists(descriptor.table, attr.name).await? {
                continue;
            }
            let ddl = add_column_sql(descriptor.table, attr);
            debug!(table = descriptor.table, column = attr.name, "adding missing column");
            sqlx::query(&ddl).execute(&self.pool).await.map_err(|e| {
                error!(
                    table = descriptor.table,
                    column = attr.name,
                    error = %e,
                    "ALTER TABLE failed"
                );
                Error::Store(format!(
                    "Failed to add column {}.{}: {}",
                    descriptor.table, attr.name, e
                ))
            })?;
            info!(table = descriptor.table, column = attr.name, "column added");
        }

        Ok(())
    }

    async fn table_exists(&self, table: &str) -> Result<bool> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Error::Store(format!("Failed to check table {}: {}", table, e)))
    }

    async fn column_exists(&self, table: &str, column: &str) -> Result<bool> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT FROM information_schema.columns
                WHERE table_schema = 'public' AND table_name = $1 AND column_name = $2
            )
            "#,
        )
        .bind(table)
        .bind(column)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Error::Store(format!("Failed to check column {}.{}: {}", table, column, e)))
    }
}

/// CREATE TABLE statement from the descriptor rule table.
pub fn create_table_sql(descriptor: &EntityDescriptor) -> String {
    let columns: Vec<String> = descriptor
        .attributes
        .iter()
        .map(AttributeDescriptor::column_def)
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        descriptor.table,
        columns.join(", ")
    )
}

/// ALTER TABLE statement for one missing column.
///
/// Added columns stay nullable regardless of `required`: existing rows
/// would violate a NOT NULL constraint.
pub fn add_column_sql(table: &str, attr: &AttributeDescriptor) -> String {
    let mut ddl = format!(
        "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} {}",
        table,
        attr.name,
        attr.kind.column_type()
    );
    if matches!(attr.kind, AttributeKind::Timestamp) {
        ddl.push_str(" DEFAULT now()");
    }
    ddl
}

#[cfg(test)]
mod tests {
    use super::*;
    use plaza_core::AttributeKind;

    const HALL: EntityDescriptor = EntityDescriptor::new(
        "Hall",
        "hall",
        &[
            AttributeDescriptor::required("id", AttributeKind::Uuid),
            AttributeDescriptor::required("organizationid", AttributeKind::Text),
            AttributeDescriptor::required("name", AttributeKind::Text),
            AttributeDescriptor::new("capacity", AttributeKind::Integer),
            AttributeDescriptor::new("dayprice", AttributeKind::Decimal),
            AttributeDescriptor::new("active", AttributeKind::Boolean),
            AttributeDescriptor::new("amenities", AttributeKind::Json),
            AttributeDescriptor::new("createdat", AttributeKind::Timestamp),
        ],
    );

    #[test]
    fn create_table_follows_the_rule_table() {
        let ddl = create_table_sql(&HALL);
        assert_eq!(
            ddl,
            "CREATE TABLE IF NOT EXISTS hall (\
             id UUID PRIMARY KEY, \
             organizationid TEXT NOT NULL, \
             name TEXT NOT NULL, \
             capacity BIGINT, \
             dayprice DECIMAL(18,2), \
             active BOOLEAN, \
             amenities JSONB, \
             createdat TIMESTAMPTZ DEFAULT now())"
        );
    }

    #[test]
    fn added_columns_are_nullable() {
        let attr = AttributeDescriptor::required("notes", AttributeKind::Text);
        assert_eq!(
            add_column_sql("hall", &attr),
            "ALTER TABLE hall ADD COLUMN IF NOT EXISTS notes TEXT"
        );
    }

    #[test]
    fn added_timestamp_columns_keep_their_default() {
        let attr = AttributeDescriptor::new("updatedat", AttributeKind::Timestamp);
        assert_eq!(
            add_column_sql("hall", &attr),
            "ALTER TABLE hall ADD COLUMN IF NOT EXISTS updatedat TIMESTAMPTZ DEFAULT now()"
        );
    }
}
