use async_trait::async_trait;

use crate::errors::Result;
use crate::tenant::{RequestContext, TenantId};

/// Standard operations every Plaza entity store exposes.
///
/// All methods return typed results — a missing row is `Ok(None)`, a store
/// fault is a typed `Err` — and never panic across the boundary; callers
/// branch on the value.
#[async_trait]
pub trait EntityStore<T>: Send + Sync
where
    T: Send + 'static,
{
    /// Single row by primary key. No tenant filter unless a concrete store
    /// narrows it.
    async fn get_by_id(&self, id: &str) -> Result<Option<T>>;

    /// All rows, in no implicit order. Concrete stores that need an order
    /// add one in their own statements.
    async fn get_all(&self) -> Result<Vec<T>>;

    /// All rows belonging to one tenant.
    async fn get_by_tenant(&self, tenant: &TenantId) -> Result<Vec<T>>;

    /// Insert one entity. An empty tenant field is auto-assigned from the
    /// request context; a non-empty one is never overwritten.
    async fn create(&self, ctx: &RequestContext, entity: T) -> Result<T>;

    /// Full-row update by identity. Same tenant-assignment rule as `create`.
    async fn update(&self, ctx: &RequestContext, entity: T) -> Result<T>;

    async fn delete(&self, id: &str) -> Result<bool>;

    async fn exists(&self, id: &str) -> Result<bool>;
}
