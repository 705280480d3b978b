//! # Suggestion Index
//!
//! The "did you mean" side of every not-found response. Built exactly
//! once at startup from full category listings, then never mutated; a
//! changed dataset needs a process restart to be reflected. Concurrent
//! readers therefore need no synchronization.

use crate::catalog::CatalogStore;
use crate::slo::SloStore;
use crate::types::{Category, ModmapError};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use std::collections::{BTreeMap, BTreeSet};

/// Maximum suggestions attached per category to a not-found response.
pub const SUGGESTION_LIMIT: usize = 10;

/// Per-category ranked identifier lists, keyed by the category's
/// suggestion field name.
pub type SuggestionMap = BTreeMap<String, Vec<String>>;

/// Immutable per-category identifier snapshot with ranked fuzzy lookup.
#[derive(Debug, Clone)]
pub struct SuggestionIndex {
    buckets: Vec<(Category, Vec<String>)>,
}

impl SuggestionIndex {
    /// Build the index from full unfiltered listings of every category.
    ///
    /// SLO rows contribute their team, application, service, component,
    /// and category values in addition to their identifier. A missing
    /// SLO store simply leaves that bucket empty.
    pub fn build(catalog: &CatalogStore, slo: Option<&SloStore>) -> Result<Self, ModmapError> {
        let mut entries: Vec<(Category, Vec<String>)> = Vec::with_capacity(Category::ALL.len());

        for category in Category::CATALOG {
            let ids = match category {
                Category::Module => catalog
                    .list_modules("")?
                    .into_iter()
                    .map(|m| m.id)
                    .collect(),
                Category::Interface => catalog
                    .list_interfaces("")?
                    .into_iter()
                    .map(|i| i.id)
                    .collect(),
                _ => catalog.list_ids(category, "")?,
            };
            entries.push((category, ids));
        }

        let slo_terms = match slo {
            Some(store) => store.suggestion_terms()?,
            None => Vec::new(),
        };
        entries.push((Category::Slo, slo_terms));

        Ok(Self::from_entries(entries))
    }

    /// Build from raw per-category identifier lists, deduplicating while
    /// preserving dataset order and dropping empty strings.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (Category, Vec<String>)>) -> Self {
        let buckets = entries
            .into_iter()
            .map(|(category, ids)| {
                let mut seen = BTreeSet::new();
                let deduped = ids
                    .into_iter()
                    .filter(|id| !id.is_empty() && seen.insert(id.clone()))
                    .collect();
                (category, deduped)
            })
            .collect();
        Self { buckets }
    }

    /// Number of indexed identifiers in a category.
    #[must_use]
    pub fn len(&self, category: Category) -> usize {
        self.bucket(category).map_or(0, Vec::len)
    }

    /// Whether the whole index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|(_, ids)| ids.is_empty())
    }

    /// Ranked fuzzy lookup within a single category.
    ///
    /// A match requires every keyword character to appear in order within
    /// the candidate; tighter clustering and case-consistent matches rank
    /// higher. Only strictly positive scores are kept, ordered by
    /// descending score; score ties prefer exact substring containment,
    /// then shorter candidates, then indexed (dataset) order. The result
    /// is truncated to `limit`. An empty or non-matching keyword yields
    /// an empty list, never an error.
    #[must_use]
    pub fn search_category(&self, category: Category, keyword: &str, limit: usize) -> Vec<String> {
        self.search_category_with(&SkimMatcherV2::default(), category, keyword, limit)
    }

    /// Ranked fuzzy lookup across every category, each truncated to
    /// `limit` independently. One matcher serves all seven buckets.
    #[must_use]
    pub fn search(&self, keyword: &str, limit: usize) -> SuggestionMap {
        let matcher = SkimMatcherV2::default();
        Category::ALL
            .iter()
            .map(|category| {
                (
                    category.suggestion_field().to_string(),
                    self.search_category_with(&matcher, *category, keyword, limit),
                )
            })
            .collect()
    }

    fn search_category_with(
        &self,
        matcher: &SkimMatcherV2,
        category: Category,
        keyword: &str,
        limit: usize,
    ) -> Vec<String> {
        if keyword.is_empty() || limit == 0 {
            return Vec::new();
        }
        let Some(ids) = self.bucket(category) else {
            return Vec::new();
        };

        let mut scored: Vec<(i64, bool, usize, &String)> = ids
            .iter()
            .filter_map(|id| {
                matcher
                    .fuzzy_match(id, keyword)
                    .filter(|score| *score > 0)
                    .map(|score| (score, id.contains(keyword), id.len(), id))
            })
            .collect();

        // The matcher scores "partner" and "partner-jobs" identically for
        // the keyword "partner", so raw scores cannot rank the exact id
        // first. Ties fall through to containment, then length; the
        // stable sort keeps dataset order for full ties.
        scored.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| b.1.cmp(&a.1))
                .then_with(|| a.2.cmp(&b.2))
        });
        scored
            .into_iter()
            .take(limit)
            .map(|(.., id)| id.clone())
            .collect()
    }

    fn bucket(&self, category: Category) -> Option<&Vec<String>> {
        self.buckets
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, ids)| ids)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn module_index(ids: &[&str]) -> SuggestionIndex {
        SuggestionIndex::from_entries([(
            Category::Module,
            ids.iter().map(|s| s.to_string()).collect(),
        )])
    }

    #[test]
    fn partner_scenario_ranks_exact_containment_first() {
        let index = module_index(&["partner", "partner-jobs", "common/partner"]);
        let hits = index.search_category(Category::Module, "partner", 5);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0], "partner");
        assert!(hits.contains(&"partner-jobs".to_string()));
        assert!(hits.contains(&"common/partner".to_string()));
    }

    #[test]
    fn exact_containment_outranks_dataset_order_on_score_ties() {
        // "partner" last in the index, behind ids the matcher scores
        // identically: the exact id must still rank first.
        let index = module_index(&["partner-jobs", "common/partner", "partner"]);
        let hits = index.search_category(Category::Module, "partner", 5);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0], "partner");
    }

    #[test]
    fn shorter_candidate_wins_among_equal_containment() {
        let index = module_index(&["partner-jobs-extended", "partner-jobs"]);
        let hits = index.search_category(Category::Module, "partner-jobs", 5);
        assert_eq!(hits[0], "partner-jobs");
    }

    #[test]
    fn search_shares_ranking_with_per_category_lookup() {
        let index = SuggestionIndex::from_entries([
            (
                Category::Module,
                vec!["partner-jobs".to_string(), "partner".to_string()],
            ),
            (
                Category::Team,
                vec!["team-partners".to_string(), "team-payments".to_string()],
            ),
        ]);
        let map = index.search("partner", 5);
        assert_eq!(
            map["modules"],
            index.search_category(Category::Module, "partner", 5)
        );
        assert_eq!(
            map["teams"],
            index.search_category(Category::Team, "partner", 5)
        );
    }

    #[test]
    fn empty_keyword_yields_empty_list() {
        let index = module_index(&["partner"]);
        assert!(index.search_category(Category::Module, "", 5).is_empty());
        let map = index.search("", 5);
        assert!(map.values().all(Vec::is_empty));
    }

    #[test]
    fn non_matching_keyword_yields_empty_list() {
        let index = module_index(&["checkout", "billing"]);
        assert!(index.search_category(Category::Module, "zzz", 5).is_empty());
    }

    #[test]
    fn limit_is_respected_per_category() {
        let ids: Vec<String> = (0..30).map(|i| format!("svc-payments-{i}")).collect();
        let index = SuggestionIndex::from_entries([(Category::Module, ids)]);
        let hits = index.search_category(Category::Module, "payments", 10);
        assert_eq!(hits.len(), 10);
    }

    #[test]
    fn duplicates_and_empty_ids_are_dropped_at_build() {
        let index = SuggestionIndex::from_entries([(
            Category::Team,
            vec![
                "checkout".to_string(),
                String::new(),
                "checkout".to_string(),
                "billing".to_string(),
            ],
        )]);
        assert_eq!(index.len(Category::Team), 2);
    }

    #[test]
    fn subsequence_match_does_not_require_contiguity() {
        let index = module_index(&["payment-gateway"]);
        let hits = index.search_category(Category::Module, "pygtwy", 5);
        assert_eq!(hits, vec!["payment-gateway".to_string()]);
    }

    #[test]
    fn search_keys_are_suggestion_fields() {
        let index = module_index(&["partner"]);
        let map = index.search("partner", 5);
        assert_eq!(
            map.get("modules").map(Vec::len),
            Some(1),
            "module hits live under the 'modules' field"
        );
        assert!(map.contains_key("teams"));
    }
}
