//! # Catalog Query Facade
//!
//! The uniform shape every lookup operation follows:
//!
//! 1. validate required arguments are present and non-empty;
//! 2. delegate to the relational access layer;
//! 3. surface storage faults with the underlying cause, no retry;
//! 4. on a miss, attach ranked suggestions for the failed identifier;
//! 5. on a hit, optionally enrich with derived metrics.
//!
//! Per request: `Validating → Querying → {Found → Enriching → Succeeded}
//! | {NotFound → Suggesting → Failed} | {StorageFault → Failed}`, all
//! reported synchronously.

use crate::catalog::CatalogStore;
use crate::metrics::{business_criticality, complexity_score, operational_readiness};
use crate::slo::SloStore;
use crate::suggest::{SUGGESTION_LIMIT, SuggestionIndex, SuggestionMap};
use crate::types::{Capability, CatalogEntity, Category, ModmapError, Slo};
use serde::Serialize;
use std::path::Path;

// =============================================================================
// RESULT CONTRACT
// =============================================================================

/// Outcome of an exact lookup: the entity, or a miss with ranked
/// alternatives. A miss is never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    Missing {
        message: String,
        suggestion: SuggestionMap,
    },
}

/// A module paired with its complexity score, for top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedModule {
    #[serde(flatten)]
    pub module: crate::types::Module,
    pub complexity_score: f64,
}

/// An SLO row enriched with both derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SloReport {
    #[serde(flatten)]
    pub slo: Slo,
    pub operational_readiness: f64,
    pub business_criticality: f64,
}

impl From<Slo> for SloReport {
    fn from(slo: Slo) -> Self {
        Self {
            operational_readiness: operational_readiness(&slo),
            business_criticality: business_criticality(&slo),
            slo,
        }
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// The query engine: both datasets plus the startup-built suggestion
/// index. Stateless across requests; everything inside is immutable
/// after construction.
#[derive(Debug)]
pub struct Engine {
    catalog: CatalogStore,
    slo: Option<SloStore>,
    index: SuggestionIndex,
}

impl Engine {
    /// Open the datasets and build the suggestion index once.
    pub fn open(
        catalog_path: impl AsRef<Path>,
        slo_path: Option<&Path>,
    ) -> Result<Self, ModmapError> {
        let catalog = CatalogStore::open(catalog_path)?;
        let slo = slo_path.map(SloStore::open).transpose()?;
        Self::new(catalog, slo)
    }

    /// Assemble an engine from already-open stores.
    pub fn new(catalog: CatalogStore, slo: Option<SloStore>) -> Result<Self, ModmapError> {
        let index = SuggestionIndex::build(&catalog, slo.as_ref())?;
        Ok(Self {
            catalog,
            slo,
            index,
        })
    }

    /// The startup identifier snapshot backing every suggestion.
    #[must_use]
    pub fn index(&self) -> &SuggestionIndex {
        &self.index
    }

    // =========================================================================
    // CATALOG OPERATIONS
    // =========================================================================

    /// List a catalog category. An empty keyword lists everything; a
    /// non-empty keyword filters by case-sensitive identifier substring.
    pub fn list(
        &self,
        category: Category,
        keyword: &str,
    ) -> Result<Vec<CatalogEntity>, ModmapError> {
        match category {
            Category::Module => Ok(self
                .catalog
                .list_modules(keyword)?
                .into_iter()
                .map(|m| CatalogEntity::Module(Box::new(m)))
                .collect()),
            Category::Interface => Ok(self
                .catalog
                .list_interfaces(keyword)?
                .into_iter()
                .map(|i| CatalogEntity::Interface(Box::new(i)))
                .collect()),
            Category::Flow => Ok(self
                .catalog
                .list_flows(keyword)?
                .into_iter()
                .map(CatalogEntity::Flow)
                .collect()),
            Category::Team | Category::Database | Category::Kind => Ok(self
                .catalog
                .list_ids(category, keyword)?
                .into_iter()
                .map(|id| CatalogEntity::Named(crate::types::NamedEntity { id }))
                .collect()),
            Category::Slo => Err(ModmapError::Unsupported {
                category,
                operation: "catalog listing (use the slo operations)",
            }),
        }
    }

    /// Exact, case-sensitive lookup in a catalog category. Modules and
    /// interfaces come back fully hydrated; misses carry suggestions
    /// drawn from the failed identifier.
    pub fn get(&self, category: Category, id: &str) -> Result<Lookup<CatalogEntity>, ModmapError> {
        require("id", id, category)?;

        let entity = match category {
            Category::Module => self
                .catalog
                .get_module(id)?
                .map(|m| CatalogEntity::Module(Box::new(m))),
            Category::Interface => self
                .catalog
                .get_interface(id)?
                .map(|i| CatalogEntity::Interface(Box::new(i))),
            Category::Flow => self.catalog.get_flow(id)?.map(CatalogEntity::Flow),
            Category::Team | Category::Database | Category::Kind => {
                self.catalog.get_named(category, id)?.map(CatalogEntity::Named)
            }
            Category::Slo => {
                return Err(ModmapError::Unsupported {
                    category,
                    operation: "catalog lookup (use get_slo for the enriched row)",
                });
            }
        };

        Ok(match entity {
            Some(found) => Lookup::Found(found),
            None => self.miss(category, id),
        })
    }

    /// Modules related to an anchor identifier through the category's
    /// join relation. An existing anchor with zero relations is a found,
    /// empty result; only a missing anchor is a miss.
    pub fn related(&self, category: Category, id: &str) -> Result<Lookup<Vec<String>>, ModmapError> {
        if !category.supports(Capability::Related) {
            return Err(ModmapError::Unsupported {
                category,
                operation: "related-module lookup",
            });
        }
        require("id", id, category)?;

        Ok(match self.catalog.related_modules(category, id)? {
            Some(modules) => Lookup::Found(modules),
            None => self.miss(category, id),
        })
    }

    /// Ranked fuzzy search across every category. Empty keywords yield
    /// empty lists rather than an error.
    #[must_use]
    pub fn search(&self, keyword: &str, limit: usize) -> SuggestionMap {
        self.index.search(keyword, limit)
    }

    /// The `count` most complex modules, scored over the full relation
    /// counts. Ties keep the store's line-count ordering.
    pub fn top_complex(&self, count: usize) -> Result<Vec<RankedModule>, ModmapError> {
        let mut ranked: Vec<RankedModule> = self
            .catalog
            .list_modules_with_counts()?
            .into_iter()
            .map(|module| RankedModule {
                complexity_score: complexity_score(&module),
                module,
            })
            .collect();
        ranked.sort_by(|a, b| b.complexity_score.total_cmp(&a.complexity_score));
        ranked.truncate(count);
        Ok(ranked)
    }

    // =========================================================================
    // SLO OPERATIONS
    // =========================================================================

    /// Fetch an SLO by id, enriched with operational readiness and
    /// business criticality.
    pub fn get_slo(&self, id: &str) -> Result<Lookup<SloReport>, ModmapError> {
        require("id", id, Category::Slo)?;
        Ok(match self.slo_store()?.get_by_id(id)? {
            Some(slo) => Lookup::Found(SloReport::from(slo)),
            None => self.miss(Category::Slo, id),
        })
    }

    /// List SLO rows, optionally filtered by identifier substring.
    pub fn list_slos(&self, keyword: &str) -> Result<Vec<Slo>, ModmapError> {
        self.slo_store()?.list_all(keyword)
    }

    /// SLOs owned by a team. A team with no SLOs is an empty, successful
    /// listing.
    pub fn slos_by_team(&self, team: &str) -> Result<Vec<Slo>, ModmapError> {
        require("team", team, Category::Slo)?;
        self.slo_store()?.list_by_team(team)
    }

    /// SLOs attached to an application.
    pub fn slos_by_application(&self, application: &str) -> Result<Vec<Slo>, ModmapError> {
        require("application", application, Category::Slo)?;
        self.slo_store()?.list_by_application(application)
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn slo_store(&self) -> Result<&SloStore, ModmapError> {
        self.slo.as_ref().ok_or(ModmapError::NotReady("slo"))
    }

    /// A miss with up to `SUGGESTION_LIMIT` ranked alternatives from the
    /// queried category's index, keyed by the failed identifier.
    fn miss<T>(&self, category: Category, id: &str) -> Lookup<T> {
        let mut suggestion = SuggestionMap::new();
        suggestion.insert(
            category.suggestion_field().to_string(),
            self.index.search_category(category, id, SUGGESTION_LIMIT),
        );
        Lookup::Missing {
            message: format!("{category} '{id}' not found"),
            suggestion,
        }
    }
}

/// Reject absent or empty required arguments before touching storage.
fn require(field: &'static str, value: &str, category: Category) -> Result<(), ModmapError> {
    if value.trim().is_empty() {
        return Err(ModmapError::InvalidInput {
            field: field.to_string(),
            hint: format!("pass a non-empty {field} for the {category} lookup"),
        });
    }
    Ok(())
}
