//! The user/credential entity and its store.
//!
//! `UserStore` is the reference specialization of the generic CRUD engine:
//! its table, statements and tenant scoping all come from the descriptor,
//! and it adds only what the engine cannot know — credential hashing and
//! the email/tenant lookups the auth flows need. Hashing happens here, at
//! the lowest-level create path, never in callers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use plaza_core::mapper::{json_array_field, opt_str_field, str_field, timestamp_field};
use plaza_core::{
    AttributeDescriptor, AttributeKind, EntityDescriptor, EntityStore, RecordMapper,
    RequestContext, Result, RowValues, TenantId,
};
use plaza_postgres::PgEntityStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::password;

/// A user with credentials, scoped to one tenant.
///
/// `password_hash` is empty for a never-logged-in seed account, an adaptive
/// hash after the first successful authentication, and anything else is a
/// legacy plaintext credential awaiting one-time migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub organization_id: String,
    pub role: String,
    pub accessible_resources: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new<E, N, O, R>(email: E, name: N, organization_id: O, role: R) -> Self
    where
        E: Into<String>,
        N: Into<String>,
        O: Into<String>,
        R: Into<String>,
    {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            name: name.into(),
            password_hash: String::new(),
            organization_id: organization_id.into(),
            role: role.into(),
            accessible_resources: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Drop the credential before handing the user to a caller.
    pub fn strip_secret(mut self) -> Self {
        self.password_hash.clear();
        self
    }
}

/// The entity name is `User`; the table name overrides it because `user`
/// is reserved in Postgres.
pub const USER_DESCRIPTOR: EntityDescriptor = EntityDescriptor::new(
    "User",
    "users",
    &[
        AttributeDescriptor::required("id", AttributeKind::Uuid),
        AttributeDescriptor::required("email", AttributeKind::Text),
        AttributeDescriptor::new("name", AttributeKind::Text),
        AttributeDescriptor::new("passwordhash", AttributeKind::Text),
        AttributeDescriptor::required("organizationid", AttributeKind::Text),
        AttributeDescriptor::new("role", AttributeKind::Text),
        AttributeDescriptor::new("accessibleresources", AttributeKind::Json),
        AttributeDescriptor::new("createdat", AttributeKind::Timestamp),
    ],
);

pub struct UserMapper;

impl RecordMapper<User> for UserMapper {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &USER_DESCRIPTOR
    }

    fn from_row(&self, row: &RowValues) -> Result<User> {
        Ok(User {
            id: str_field(row, "id")?,
            email: str_field(row, "email")?,
            name: opt_str_field(row, "name").unwrap_or_default(),
            password_hash: opt_str_field(row, "passwordhash").unwrap_or_default(),
            organization_id: opt_str_field(row, "organizationid").unwrap_or_default(),
            role: opt_str_field(row, "role").unwrap_or_default(),
            accessible_resources: serde_json::from_value(json_array_field(
                row,
                "accessibleresources",
            ))?,
            created_at: timestamp_field(row, "createdat"),
        })
    }

    fn to_row(&self, user: &User) -> Result<RowValues> {
        let mut row = RowValues::new();
        row.insert("id".into(), Value::String(user.id.clone()));
        row.insert("email".into(), Value::String(user.email.clone()));
        row.insert("name".into(), Value::String(user.name.clone()));
        row.insert(
            "passwordhash".into(),
            Value::String(user.password_hash.clone()),
        );
        row.insert(
            "organizationid".into(),
            Value::String(user.organization_id.clone()),
        );
        row.insert("role".into(), Value::String(user.role.clone()));
        row.insert(
            "accessibleresources".into(),
            serde_json::to_value(&user.accessible_resources)?,
        );
        row.insert(
            "createdat".into(),
            Value::String(user.created_at.to_rfc3339()),
        );
        Ok(row)
    }
}

/// Tenant-scoped user persistence built on the generic engine.
pub struct UserStore {
    engine: PgEntityStore<User>,
}

impl UserStore {
    pub async fn new(pool: PgPool) -> Result<Self> {
        Ok(Self {
            engine: PgEntityStore::new(pool, Arc::new(UserMapper)).await?,
        })
    }

    /// Create a user, hashing the raw secret centrally. An empty secret
    /// leaves the hash empty (seed state).
    pub async fn create(&self, ctx: &RequestContext, mut user: User, secret: &str) -> Result<User> {
        if !secret.is_empty() {
            user.password_hash = password::hash_secret(secret)?;
        }
        self.engine.create(ctx, user).await
    }

    pub async fn find_by_email(&self, tenant: &TenantId, email: &str) -> Result<Option<User>> {
        // Scoped to the tenant first; the email match stays in memory, so
        // a descriptor change cannot widen the lookup across tenants.
        Ok(self
            .engine
            .get_by_tenant(tenant)
            .await?
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    pub async fn find_by_id(&self, tenant: &TenantId, id: &str) -> Result<Option<User>> {
        Ok(self
            .engine
            .get_by_id(id)
            .await?
            .filter(|u| u.organization_id == tenant.as_str()))
    }

    pub async fn count_for_tenant(&self, tenant: &TenantId) -> Result<usize> {
        Ok(self.engine.get_by_tenant(tenant).await?.len())
    }

    /// Persist a fresh adaptive hash for the user.
    pub async fn set_password(
        &self,
        ctx: &RequestContext,
        user: &User,
        secret: &str,
    ) -> Result<User> {
        let mut updated = user.clone();
        updated.password_hash = password::hash_secret(secret)?;
        self.engine.update(ctx, updated).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mapper_round_trips_a_user() {
        let mapper = UserMapper;
        let mut user = User::new("jon@aretoa.eus", "Jon", "org-u-1", "member");
        user.accessible_resources = vec!["halls".to_string(), "bookings".to_string()];
        // RFC 3339 strings carry whole seconds through the row layer.
        user.created_at = DateTime::parse_from_rfc3339("2024-05-10T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let row = mapper.to_row(&user).unwrap();
        assert_eq!(row.get("email"), Some(&json!("jon@aretoa.eus")));
        assert_eq!(
            row.get("accessibleresources"),
            Some(&json!(["halls", "bookings"]))
        );

        let back = mapper.from_row(&row).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn null_resources_default_to_an_empty_list() {
        let mapper = UserMapper;
        let mut row = mapper
            .to_row(&User::new("jon@aretoa.eus", "Jon", "org-u-1", "member"))
            .unwrap();
        row.insert("accessibleresources".into(), Value::Null);

        let user = mapper.from_row(&row).unwrap();
        assert!(user.accessible_resources.is_empty());
    }

    #[test]
    fn users_table_is_tenant_scoped() {
        assert_eq!(USER_DESCRIPTOR.table, "users");
        assert!(USER_DESCRIPTOR.tenant_attribute().is_some());
        assert_eq!(USER_DESCRIPTOR.primary_key().unwrap().kind, AttributeKind::Uuid);
    }
}
