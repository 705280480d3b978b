//! # Derived Metrics
//!
//! Pure scoring functions over already-loaded attributes. Nothing here is
//! persisted; every score is recomputed on read, which is free to do
//! because the datasets are immutable per process.

use crate::types::{Module, Slo};

// =============================================================================
// MODULE COMPLEXITY
// =============================================================================

/// Weight applied to line count, in thousands of lines.
pub const WEIGHT_KLOC: f64 = 0.25;
/// Weight per attached database.
pub const WEIGHT_DATABASES: f64 = 0.20;
/// Weight per owning team.
pub const WEIGHT_TEAMS: f64 = 0.15;
/// Weight per exposed interface.
pub const WEIGHT_EXPOSED: f64 = 0.15;
/// Weight per consumed interface.
pub const WEIGHT_CONSUMED: f64 = 0.15;
/// Weight per scheduled job.
pub const WEIGHT_JOBS: f64 = 0.10;
/// Weight per file. Listed in the weighting table but deliberately not
/// applied to the sum: wiring it in would reshuffle every established
/// ranking.
pub const WEIGHT_FILES: f64 = 0.10;
/// Weight per business flow.
pub const WEIGHT_FLOWS: f64 = 0.05;
/// Weight per kind tag.
pub const WEIGHT_KINDS: f64 = 0.05;

/// Weighted, normalized complexity score for a module, scaled by 100.
///
/// Counts that were not computed for the row (`None`) contribute zero.
/// The score exists purely for ranking ("top-N most complex modules");
/// it carries no unit.
#[must_use]
pub fn complexity_score(module: &Module) -> f64 {
    let count = |value: Option<u32>| f64::from(value.unwrap_or(0));

    let sum = (f64::from(module.line_count) / 1000.0) * WEIGHT_KLOC
        + count(module.database_count) * WEIGHT_DATABASES
        + count(module.team_count) * WEIGHT_TEAMS
        + count(module.exposed_count) * WEIGHT_EXPOSED
        + count(module.consumed_count) * WEIGHT_CONSUMED
        + count(module.job_count) * WEIGHT_JOBS
        + count(module.flow_count) * WEIGHT_FLOWS
        + count(module.kind_count) * WEIGHT_KINDS;

    sum * 100.0
}

// =============================================================================
// SLO METRICS
// =============================================================================

/// Operational readiness multiplier for an SLO.
///
/// Additive onto a base of 1.0: +0.1 for any dashboard link, +0.1 for
/// any alert link, +0.05 for any notification channel (email or chat),
/// +0.1 when the SLO is flagged enriched.
#[must_use]
pub fn operational_readiness(slo: &Slo) -> f64 {
    let mut score = 1.0;
    if slo.dashboard_count > 0 {
        score += 0.1;
    }
    if slo.alert_count > 0 {
        score += 0.1;
    }
    if slo.email_channel_count > 0 || slo.chat_channel_count > 0 {
        score += 0.05;
    }
    if slo.is_enriched {
        score += 0.1;
    }
    score
}

/// Business criticality multiplier for an SLO.
///
/// (1.0, +0.5 if critical, +0.5 if front-door) scaled by the SLO's
/// relative-throughput weight.
#[must_use]
pub fn business_criticality(slo: &Slo) -> f64 {
    let mut score = 1.0;
    if slo.is_critical {
        score += 0.5;
    }
    if slo.is_front_door {
        score += 0.5;
    }
    score * slo.weight
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Module, Slo};

    fn module_with_counts(lines: u32, databases: u32, teams: u32) -> Module {
        Module {
            id: "m".to_string(),
            line_count: lines,
            database_count: Some(databases),
            team_count: Some(teams),
            flow_count: Some(0),
            exposed_count: Some(0),
            consumed_count: Some(0),
            job_count: Some(0),
            kind_count: Some(0),
            ..Module::default()
        }
    }

    #[test]
    fn complexity_reference_scenario() {
        // 5000 lines, 4 databases, 2 teams, everything else zero.
        let module = module_with_counts(5000, 4, 2);
        let expected = ((5.0 * WEIGHT_KLOC) + (4.0 * WEIGHT_DATABASES) + (2.0 * WEIGHT_TEAMS)) * 100.0;
        assert!((complexity_score(&module) - expected).abs() < 1e-9);
    }

    #[test]
    fn complexity_null_counts_are_zero() {
        let module = Module {
            id: "m".to_string(),
            line_count: 2000,
            ..Module::default()
        };
        let expected = 2.0 * WEIGHT_KLOC * 100.0;
        assert!((complexity_score(&module) - expected).abs() < 1e-9);
    }

    #[test]
    fn complexity_ignores_file_count() {
        let mut a = module_with_counts(1000, 1, 1);
        let mut b = module_with_counts(1000, 1, 1);
        a.file_count = 0;
        b.file_count = 5000;
        assert!((complexity_score(&a) - complexity_score(&b)).abs() < 1e-9);
    }

    #[test]
    fn complexity_monotone_in_database_count() {
        let low = module_with_counts(3000, 2, 1);
        let high = module_with_counts(3000, 3, 1);
        assert!(complexity_score(&high) > complexity_score(&low));
    }

    #[test]
    fn readiness_reference_scenario() {
        // Dashboard + alert + enriched, no channels: 1.0 + 0.1 + 0.1 + 0.1.
        let slo = Slo {
            dashboard_count: 1,
            alert_count: 1,
            is_enriched: true,
            ..Slo::default()
        };
        assert!((operational_readiness(&slo) - 1.3).abs() < 1e-9);
    }

    #[test]
    fn readiness_base_is_one() {
        assert!((operational_readiness(&Slo::default()) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn readiness_channel_bonus_counts_either_channel() {
        let email = Slo {
            email_channel_count: 2,
            ..Slo::default()
        };
        let chat = Slo {
            chat_channel_count: 1,
            ..Slo::default()
        };
        assert!((operational_readiness(&email) - 1.05).abs() < 1e-9);
        assert!((operational_readiness(&chat) - 1.05).abs() < 1e-9);
    }

    #[test]
    fn criticality_scales_with_weight() {
        let slo = Slo {
            is_critical: true,
            is_front_door: true,
            weight: 0.5,
            ..Slo::default()
        };
        // (1.0 + 0.5 + 0.5) * 0.5
        assert!((business_criticality(&slo) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn criticality_zero_weight_zeroes_the_score() {
        let slo = Slo {
            is_critical: true,
            weight: 0.0,
            ..Slo::default()
        };
        assert!(business_criticality(&slo).abs() < 1e-9);
    }
}
