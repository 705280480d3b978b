//! # modmap-core
//!
//! The catalog/SLO query engine for modmap - THE LOGIC.
//!
//! This crate implements the CORE of the architecture discovery service:
//! a read-oriented relational model of software modules, the interfaces
//! they expose and consume, the teams that own them, and the databases
//! and business flows they participate in, with a companion SLO dataset.
//!
//! ## Architecture
//!
//! - `catalog` / `slo` — typed query functions over the two pre-populated
//!   SQLite datasets (catalog read-only; SLO read-write solely for
//!   idempotent table creation at open).
//! - `metrics` — pure derived scores: module complexity, SLO operational
//!   readiness, SLO business criticality.
//! - `suggest` — the startup-built fuzzy suggestion index behind every
//!   not-found response.
//! - `facade` — the uniform validate/query/enrich/suggest shape shared
//!   by every lookup operation.
//! - `envelope` — the three transport-agnostic response shapes.
//!
//! ## Architectural Constraints
//!
//! - Read-only: the engine never mutates the catalog; datasets are
//!   populated out-of-band and a restart picks up changes.
//! - Stateless across requests; no async, no network dependencies.
//! - No retry anywhere: callers needing retry re-invoke the operation.

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod envelope;
pub mod facade;
pub mod metrics;
pub mod slo;
pub mod suggest;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    Capability, CatalogEntity, Category, Flow, Interface, ModmapError, Module, NamedEntity, Slo,
};

// =============================================================================
// RE-EXPORTS: Query Engine
// =============================================================================

pub use catalog::CatalogStore;
pub use envelope::{ErrorBody, Response};
pub use facade::{Engine, Lookup, RankedModule, SloReport};
pub use metrics::{business_criticality, complexity_score, operational_readiness};
pub use slo::SloStore;
pub use suggest::{SUGGESTION_LIMIT, SuggestionIndex, SuggestionMap};
