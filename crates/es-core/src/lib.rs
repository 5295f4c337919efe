//! es-core: shared vocabulary for the stepwise EPANET tools.
//!
//! Contains:
//! - ids (1-based entity indices as used by the toolkit)
//! - entity (entity classes and the node/link type tables)
//! - attribute (node/link attribute enums and name resolution)
//! - request (attribute export requests)
//! - error (shared error types)

pub mod attribute;
pub mod entity;
pub mod error;
pub mod ids;
pub mod request;

// Re-exports: nice ergonomics for downstream crates
pub use attribute::{Attribute, LinkAttribute, NodeAttribute};
pub use entity::{EntityClass, LinkType, NodeType, type_label};
pub use error::{CoreError, CoreResult};
pub use ids::EntityIndex;
pub use request::{AttributeRequest, resolve_requests};

/// Simulation clock value in whole seconds, as reported by the engine.
pub type Seconds = i64;
