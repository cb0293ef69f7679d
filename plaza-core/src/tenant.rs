//! Tenant types and the explicit request context.
//!
//! Plaza never reads tenant identity from ambient/thread-local state: every
//! core operation takes a [`RequestContext`] so all logic is explicitly
//! tenant-aware. The resolver checks, first match wins:
//!
//! 1. an explicit tenant marker placed on the context items,
//! 2. a resolved organization object on the context items,
//! 3. a tenant claim on the caller's authenticated identity.
//!
//! An unresolvable tenant means "tenant unknown" — tenant-scoped operations
//! must fail instead of falling back to a wildcard tenant.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Error, Result};

/// A tenant (organization) identifier, as persisted in `organizationid`
/// columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single claim from the caller's authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub name: String,
    pub value: String,
}

/// Context item keys holding an explicit tenant marker.
pub const TENANT_ITEM_KEYS: &[&str] = &["TenantId", "OrganizationId"];

/// Context item key holding a resolved organization object.
pub const TENANT_OBJECT_KEY: &str = "Organization";

/// Claim names accepted as a tenant identity.
pub const TENANT_CLAIM_NAMES: &[&str] = &["org", "orgid", "organizationId", "tenant_id"];

/// Context carried with every Plaza operation.
///
/// The transport layer (HTTP adapter, job runner, ...) fills this in; the
/// core only performs `items`-style lookups and claim scans on it.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub items: Map<String, Value>,
    pub claims: Vec<Claim>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor with an explicit tenant marker.
    pub fn for_tenant<S: Into<String>>(tenant: S) -> Self {
        Self::new().with_item("TenantId", Value::String(tenant.into()))
    }

    pub fn with_item<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.items.insert(key.into(), value);
        self
    }

    pub fn with_claim<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.claims.push(Claim {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Resolve the current tenant, or `None` when the context carries no
    /// usable tenant identity.
    pub fn tenant_id(&self) -> Option<TenantId> {
        for key in TENANT_ITEM_KEYS {
            if let Some(id) = self.items.get(*key).and_then(value_as_id) {
                return Some(TenantId(id));
            }
        }

        if let Some(id) = self
            .items
            .get(TENANT_OBJECT_KEY)
            .and_then(|org| org.get("id"))
            .and_then(value_as_id)
        {
            return Some(TenantId(id));
        }

        for name in TENANT_CLAIM_NAMES {
            if let Some(claim) = self.claims.iter().find(|c| c.name == *name) {
                if !claim.value.trim().is_empty() {
                    return Some(TenantId(claim.value.clone()));
                }
            }
        }

        None
    }

    /// Resolve the current tenant or fail closed with `TenantUnresolved`.
    pub fn require_tenant(&self) -> Result<TenantId> {
        self.tenant_id().ok_or(Error::TenantUnresolved)
    }
}

fn value_as_id(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn explicit_marker_wins_over_claims() {
        let ctx = RequestContext::for_tenant("org-a").with_claim("org", "org-b");
        assert_eq!(ctx.tenant_id(), Some(TenantId::new("org-a")));
    }

    #[test]
    fn organization_object_wins_over_claims() {
        let ctx = RequestContext::new()
            .with_item("Organization", json!({ "id": "org-a", "name": "Aretoa" }))
            .with_claim("org", "org-b");
        assert_eq!(ctx.tenant_id(), Some(TenantId::new("org-a")));
    }

    #[test]
    fn claim_fallback_scans_accepted_names() {
        let ctx = RequestContext::new().with_claim("organizationId", "org-c");
        assert_eq!(ctx.tenant_id(), Some(TenantId::new("org-c")));
    }

    #[test]
    fn empty_marker_does_not_resolve() {
        let ctx = RequestContext::for_tenant("  ");
        assert_eq!(ctx.tenant_id(), None);
        assert!(matches!(
            ctx.require_tenant(),
            Err(Error::TenantUnresolved)
        ));
    }

    #[test]
    fn unrelated_claims_do_not_resolve() {
        let ctx = RequestContext::new().with_claim("sub", "user-1");
        assert_eq!(ctx.tenant_id(), None);
    }
}
