//! # Core Type Definitions
//!
//! This module contains all catalog entity types for the modmap query engine:
//! - Category/capability dispatch (`Category`, `Capability`)
//! - Catalog entities (`Module`, `Interface`, `NamedEntity`, `Flow`)
//! - SLO rows (`Slo`)
//! - Error types (`ModmapError`)
//!
//! ## Immutability Guarantees
//!
//! Every entity in this module is a read-only snapshot of a pre-populated
//! dataset. Nothing here mutates the underlying store; a changed dataset
//! requires a process restart to be reflected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// CATEGORY & CAPABILITY DISPATCH
// =============================================================================

/// The lookup categories the engine knows about.
///
/// Every lookup operation is parameterized by one of these instead of
/// duplicating a near-identical function per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Module,
    Interface,
    Team,
    Database,
    Flow,
    Kind,
    Slo,
}

/// What a category can do through the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Full or keyword-filtered listing.
    List,
    /// Exact identifier lookup.
    Get,
    /// Modules related to an anchor identifier.
    Related,
}

impl Category {
    /// Every category, in suggestion-index order.
    pub const ALL: [Category; 7] = [
        Category::Module,
        Category::Interface,
        Category::Team,
        Category::Database,
        Category::Flow,
        Category::Kind,
        Category::Slo,
    ];

    /// The six categories backed by the catalog dataset (everything but SLO).
    pub const CATALOG: [Category; 6] = [
        Category::Module,
        Category::Interface,
        Category::Team,
        Category::Database,
        Category::Flow,
        Category::Kind,
    ];

    /// Stable lowercase name, used in CLI arguments and log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Module => "module",
            Category::Interface => "interface",
            Category::Team => "team",
            Category::Database => "database",
            Category::Flow => "flow",
            Category::Kind => "kind",
            Category::Slo => "slo",
        }
    }

    /// Field name used for this category inside a `suggestion` map.
    #[must_use]
    pub const fn suggestion_field(self) -> &'static str {
        match self {
            Category::Module => "modules",
            Category::Interface => "interfaces",
            Category::Team => "teams",
            Category::Database => "databases",
            Category::Flow => "flows",
            Category::Kind => "kinds",
            Category::Slo => "slos",
        }
    }

    /// Whether an operation is defined for this category.
    ///
    /// `Related` answers "which modules touch this anchor", so it exists
    /// only for the anchor categories; a module's own relations are part
    /// of its `Get` hydration instead.
    #[must_use]
    pub const fn supports(self, capability: Capability) -> bool {
        match capability {
            Capability::List | Capability::Get => true,
            Capability::Related => matches!(
                self,
                Category::Team
                    | Category::Database
                    | Category::Interface
                    | Category::Flow
                    | Category::Kind
            ),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ModmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "module" | "modules" => Ok(Category::Module),
            "interface" | "interfaces" => Ok(Category::Interface),
            "team" | "teams" => Ok(Category::Team),
            "database" | "databases" => Ok(Category::Database),
            "flow" | "flows" => Ok(Category::Flow),
            "kind" | "kinds" => Ok(Category::Kind),
            "slo" | "slos" => Ok(Category::Slo),
            other => Err(ModmapError::InvalidInput {
                field: "category".to_string(),
                hint: format!(
                    "unknown category '{other}'; expected one of: module, interface, team, database, flow, kind, slo"
                ),
            }),
        }
    }
}

// =============================================================================
// MODULE
// =============================================================================

/// A deployable unit of software tracked in the catalog.
///
/// Listing rows carry `None` for every relation count ("not computed for
/// this listing"); a `get_by_id` hydration populates both the relation
/// sets and the matching counts. When a count is `Some`, it equals the
/// cardinality of the corresponding relation set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Module {
    pub id: String,
    pub name: String,
    pub description: String,
    pub spec_path: String,
    pub file_count: u32,
    pub line_count: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposed_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_count: Option<u32>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub kinds: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub teams: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub flows: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub exposed: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub consumed: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub databases: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub jobs: Vec<String>,
}

// =============================================================================
// INTERFACE
// =============================================================================

/// A web or RPC contract, exposed by exactly one module and consumed by
/// zero or more.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Interface {
    pub id: String,
    pub description: String,
    /// Contract kind, e.g. "RPL" or "OpenAPI".
    pub kind: String,
    /// Specification reference appropriate to the kind, when recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_ref: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_count: Option<u32>,
    /// Method identifiers in dataset order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub methods: Vec<String>,

    /// The single exposing module, populated on hydration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposed_by: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub consumed_by: Vec<String>,
}

// =============================================================================
// SIMPLE NAMED ENTITIES
// =============================================================================

/// A team, database, or kind: a bare unique identifier related to modules
/// through a join relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub id: String,
}

/// A named critical business process spanning multiple modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub id: String,
    /// Participant module identifiers, populated on hydration.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub modules: Vec<String>,
}

/// Tagged union returned by the generic catalog lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CatalogEntity {
    Module(Box<Module>),
    Interface(Box<Interface>),
    Flow(Flow),
    Named(NamedEntity),
}

impl CatalogEntity {
    /// The entity's unique identifier, regardless of shape.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            CatalogEntity::Module(m) => &m.id,
            CatalogEntity::Interface(i) => &i.id,
            CatalogEntity::Flow(f) => &f.id,
            CatalogEntity::Named(n) => &n.id,
        }
    }
}

// =============================================================================
// SLO
// =============================================================================

/// A service-level objective row from the companion dataset.
///
/// Operational readiness and business criticality are derived on every
/// read (see `metrics`); they are intentionally absent here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Slo {
    pub id: String,
    pub created_at: String,
    pub modified_at: String,
    pub revision: u32,

    pub team: String,
    pub application: String,
    pub service: String,
    pub component: String,
    pub category: String,

    /// Relative throughput weight of the covered traffic.
    pub weight: f64,
    pub query_ref: String,
    pub target: f64,
    pub current: f64,
    pub window: String,

    pub dashboard_count: u32,
    pub alert_count: u32,
    pub email_channel_count: u32,
    pub chat_channel_count: u32,

    pub is_critical: bool,
    pub is_front_door: bool,
    pub is_enriched: bool,

    pub flow_online_payments: bool,
    pub flow_ipp_payments: bool,
    pub flow_payout: bool,
    pub flow_reporting: bool,
    pub flow_onboarding: bool,
    pub flow_customer_portal: bool,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by the query engine.
///
/// "No matching row" is never an error; misses are represented by
/// `Option`/`Lookup::Missing` so the facade can attach suggestions.
#[derive(Debug, Error)]
pub enum ModmapError {
    /// A lookup was attempted against a dataset that was never opened.
    /// Treated as a lifecycle error, fatal to the calling operation.
    #[error("{0} dataset is not open")]
    NotReady(&'static str),

    /// The underlying storage engine reported a fault.
    #[error("storage access failed: {0}")]
    Access(String),

    /// The caller left a required field missing or empty.
    #[error("missing required field: {field}")]
    InvalidInput { field: String, hint: String },

    /// The category does not support the requested operation.
    #[error("category '{category}' does not support {operation}")]
    Unsupported {
        category: Category,
        operation: &'static str,
    },
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_roundtrip_names() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().expect("parse");
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn category_accepts_plural_aliases() {
        assert_eq!("modules".parse::<Category>().expect("parse"), Category::Module);
        assert_eq!("slos".parse::<Category>().expect("parse"), Category::Slo);
    }

    #[test]
    fn unknown_category_is_invalid_input() {
        let err = "gateway".parse::<Category>().expect_err("must fail");
        assert!(matches!(
            err,
            ModmapError::InvalidInput { ref field, .. } if field == "category"
        ));
    }

    #[test]
    fn related_capability_excludes_modules_and_slos() {
        assert!(!Category::Module.supports(Capability::Related));
        assert!(!Category::Slo.supports(Capability::Related));
        assert!(Category::Team.supports(Capability::Related));
        assert!(Category::Interface.supports(Capability::Related));
        assert!(Category::Flow.supports(Capability::Related));
    }

    #[test]
    fn every_category_lists_and_gets() {
        for category in Category::ALL {
            assert!(category.supports(Capability::List));
            assert!(category.supports(Capability::Get));
        }
    }

    #[test]
    fn module_counts_skipped_when_absent() {
        let module = Module {
            id: "checkout".to_string(),
            name: "Checkout".to_string(),
            line_count: 1200,
            ..Module::default()
        };
        let json = serde_json::to_value(&module).expect("serialize");
        assert!(json.get("team_count").is_none());
        assert!(json.get("kinds").is_none());
        assert_eq!(json["line_count"], 1200);
    }
}
