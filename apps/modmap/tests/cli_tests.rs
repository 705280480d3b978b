//! # CLI Integration Tests
//!
//! Argument parsing plus text rendering against on-disk SQLite fixtures.
//! Commands that only print are exercised end-to-end for their exit
//! status; output shapes are asserted through the `render_*` helpers.

use clap::Parser;
use modmap::cli::{self, Cli, Commands};
use modmap_core::{CatalogEntity, Category, Engine, Flow, Lookup};
use tempfile::TempDir;

// =============================================================================
// FIXTURE
// =============================================================================

const CATALOG_DDL: &str = "
CREATE TABLE modules (id TEXT PRIMARY KEY, name TEXT, description TEXT, spec_path TEXT,
                      file_count INTEGER, line_count INTEGER);
CREATE TABLE interfaces (id TEXT PRIMARY KEY, description TEXT, kind TEXT, spec_ref TEXT);
CREATE TABLE interface_methods (interface_id TEXT, method TEXT, position INTEGER);
CREATE TABLE teams (id TEXT PRIMARY KEY);
CREATE TABLE databases (id TEXT PRIMARY KEY);
CREATE TABLE flows (id TEXT PRIMARY KEY);
CREATE TABLE kinds (id TEXT PRIMARY KEY);
CREATE TABLE jobs (id TEXT PRIMARY KEY);
CREATE TABLE module_kinds (module_id TEXT, kind_id TEXT);
CREATE TABLE module_teams (module_id TEXT, team_id TEXT);
CREATE TABLE module_flows (module_id TEXT, flow_id TEXT);
CREATE TABLE module_databases (module_id TEXT, database_id TEXT);
CREATE TABLE module_jobs (module_id TEXT, job_id TEXT);
CREATE TABLE module_exposes (module_id TEXT, interface_id TEXT);
CREATE TABLE module_consumes (module_id TEXT, interface_id TEXT);

INSERT INTO modules VALUES
  ('billing', 'Billing', 'invoice generation', 'docs/billing.md', 40, 3000),
  ('ledger', 'Ledger', 'double-entry bookkeeping', 'docs/ledger.md', 25, 1500);

INSERT INTO interfaces VALUES ('billing-api', 'billing REST surface', 'OpenAPI', NULL);
INSERT INTO interface_methods VALUES ('billing-api', 'createInvoice', 1);

INSERT INTO teams VALUES ('team-finance');
INSERT INTO module_teams VALUES ('billing', 'team-finance'), ('ledger', 'team-finance');
INSERT INTO module_exposes VALUES ('billing', 'billing-api');
INSERT INTO module_consumes VALUES ('ledger', 'billing-api');
";

fn catalog_engine() -> (TempDir, Engine) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("catalog.db");
    let conn = rusqlite::Connection::open(&path).expect("open catalog");
    conn.execute_batch(CATALOG_DDL).expect("seed catalog");
    drop(conn);

    let engine = Engine::open(&path, None).expect("open engine");
    (dir, engine)
}

// =============================================================================
// ARGUMENT PARSING
// =============================================================================

#[test]
fn global_flags_parse_with_defaults() {
    let cli = Cli::try_parse_from(["modmap"]).expect("parse");
    assert_eq!(cli.catalog.to_string_lossy(), "catalog.db");
    assert!(cli.slo_db.is_none());
    assert!(!cli.json_mode);
    assert!(cli.command.is_none());
}

#[test]
fn list_subcommand_parses_keyword_filter() {
    let cli = Cli::try_parse_from(["modmap", "list", "modules", "--keyword", "bill"])
        .expect("parse");
    match cli.command {
        Some(Commands::List { category, keyword }) => {
            assert_eq!(category, "modules");
            assert_eq!(keyword, "bill");
        }
        other => unreachable!("unexpected command: {other:?}"),
    }
}

#[test]
fn slo_db_flag_is_global() {
    let cli = Cli::try_parse_from(["modmap", "slos", "--slo-db", "slo.db", "--team", "team-finance"])
        .expect("parse");
    assert_eq!(
        cli.slo_db.as_deref().map(|p| p.to_string_lossy().into_owned()),
        Some("slo.db".to_string())
    );
}

#[test]
fn search_limit_defaults_to_ten() {
    let cli = Cli::try_parse_from(["modmap", "search", "bill"]).expect("parse");
    match cli.command {
        Some(Commands::Search { keyword, limit }) => {
            assert_eq!(keyword, "bill");
            assert_eq!(limit, 10);
        }
        other => unreachable!("unexpected command: {other:?}"),
    }
}

// =============================================================================
// TEXT RENDERING
// =============================================================================

#[test]
fn module_listing_renders_one_line_per_module() {
    let (_dir, engine) = catalog_engine();
    let entities = engine.list(Category::Module, "").expect("list");
    let text = cli::render_listing(Category::Module, &entities);
    assert!(text.starts_with("2 modules:"));
    assert!(text.contains("billing  (3000 lines across 40 files)"));
    assert!(text.contains("ledger  (1500 lines across 25 files)"));
}

#[test]
fn empty_listing_renders_plural_category_name() {
    let text = cli::render_listing(Category::Flow, &[]);
    assert_eq!(text, "No flows found.");
}

#[test]
fn flow_listing_renders_participant_counts() {
    let entities = vec![CatalogEntity::Flow(Flow {
        id: "settlement".to_string(),
        modules: vec!["billing".to_string(), "ledger".to_string()],
    })];
    let text = cli::render_listing(Category::Flow, &entities);
    assert!(text.contains("settlement  (2 modules)"));
}

#[test]
fn module_detail_renders_relation_sets() {
    let (_dir, engine) = catalog_engine();
    let Lookup::Found(entity) = engine.get(Category::Module, "billing").expect("get") else {
        unreachable!("billing exists");
    };
    let text = cli::render_entity(&entity);
    assert!(text.starts_with("Module: billing"));
    assert!(text.contains("Teams:       team-finance"));
    assert!(text.contains("Exposes:     billing-api"));
    assert!(text.contains("Databases:   (none)"));
}

#[test]
fn interface_detail_renders_consumers() {
    let (_dir, engine) = catalog_engine();
    let Lookup::Found(entity) = engine.get(Category::Interface, "billing-api").expect("get")
    else {
        unreachable!("billing-api exists");
    };
    let text = cli::render_entity(&entity);
    assert!(text.contains("Exposed by:  billing"));
    assert!(text.contains("Consumed by: ledger"));
    assert!(text.contains("Methods:     createInvoice"));
}

#[test]
fn miss_rendering_includes_suggestions() {
    let (_dir, engine) = catalog_engine();
    let Lookup::Missing {
        message,
        suggestion,
    } = engine.get(Category::Module, "billng").expect("get")
    else {
        unreachable!("billng does not exist");
    };
    let text = cli::render_miss(&message, &suggestion);
    assert!(text.contains("billng"));
    assert!(text.contains("Did you mean:"));
    assert!(text.contains("modules: billing"));
}

#[test]
fn miss_rendering_without_hits_says_so() {
    let (_dir, engine) = catalog_engine();
    let Lookup::Missing {
        message,
        suggestion,
    } = engine.get(Category::Module, "zzzzqq").expect("get")
    else {
        unreachable!("zzzzqq does not exist");
    };
    let text = cli::render_miss(&message, &suggestion);
    assert!(text.contains("No close matches."));
}

#[test]
fn search_rendering_skips_empty_buckets() {
    let (_dir, engine) = catalog_engine();
    let map = engine.search("billing", 10);
    let text = cli::render_search("billing", &map);
    assert!(text.contains("modules:\n  billing"));
    assert!(text.contains("interfaces:\n  billing-api"));
    assert!(!text.contains("flows:"));
}

#[test]
fn search_rendering_reports_no_matches() {
    let (_dir, engine) = catalog_engine();
    let map = engine.search("zzzzqq", 10);
    assert_eq!(cli::render_search("zzzzqq", &map), "No matches for 'zzzzqq'.");
}

#[test]
fn ranking_renders_highest_first() {
    let (_dir, engine) = catalog_engine();
    let ranked = engine.top_complex(5).expect("rank");
    let text = cli::render_ranking(&ranked);
    assert!(text.starts_with("Top 2 modules by complexity:"));
    let billing_pos = text.find("billing").expect("billing listed");
    let ledger_pos = text.find("ledger").expect("ledger listed");
    assert!(billing_pos < ledger_pos, "larger module ranks first");
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

#[test]
fn commands_run_against_a_catalog_without_an_slo_db() {
    let (_dir, engine) = catalog_engine();
    cli::cmd_list(&engine, "modules", "", false).expect("list");
    cli::cmd_get(&engine, "module", "billing", true).expect("get");
    cli::cmd_related(&engine, "team", "team-finance", false).expect("related");
    cli::cmd_search(&engine, "bil", 5, true).expect("search");
    cli::cmd_top(&engine, 3, false).expect("top");
}

#[test]
fn slo_commands_fail_cleanly_without_an_slo_db() {
    let (_dir, engine) = catalog_engine();
    let err = cli::cmd_slo(&engine, "slo-anything", false).expect_err("no slo dataset");
    assert!(matches!(err, modmap_core::ModmapError::NotReady(_)));
}

#[test]
fn unknown_category_is_an_input_error() {
    let (_dir, engine) = catalog_engine();
    let err = cli::cmd_list(&engine, "widgets", "", false).expect_err("unknown category");
    assert!(matches!(
        err,
        modmap_core::ModmapError::InvalidInput { ref field, .. } if field == "category"
    ));
}

#[test]
fn slos_rejects_conflicting_filters() {
    let (_dir, engine) = catalog_engine();
    let err = cli::cmd_slos(&engine, "", Some("team-finance"), Some("billing"), false)
        .expect_err("conflicting filters");
    assert!(matches!(
        err,
        modmap_core::ModmapError::InvalidInput { ref field, .. } if field == "team"
    ));
}
