//! plaza-postgres: descriptor-driven PostgreSQL storage for Plaza.
//!
//! Two pieces carry the weight here: [`sync::SchemaSync`], which keeps each
//! entity's backing table in step with its descriptor (additive-only), and
//! [`engine::PgEntityStore`], the generic CRUD engine every per-entity
//! service specializes.
//!
//! Every operation acquires a connection from the shared pool for its own
//! duration and is a plain future: dropping it (a disconnected client)
//! abandons the in-flight query and releases the connection.

pub mod engine;
pub mod row;
pub mod sync;

pub use engine::{connect, PgEntityStore};
pub use sync::SchemaSync;
