//! # CLI Command Implementations
//!
//! Each command opens nothing itself; the engine is constructed once in
//! [`super::execute`] and every command borrows it. Text rendering lives
//! in `render_*` helpers so tests can assert on output without capturing
//! stdout; JSON mode prints the same envelopes the facade serializes.

use modmap_core::{
    CatalogEntity, Category, Engine, Lookup, ModmapError, RankedModule, Response, Slo, SloReport,
    SuggestionMap,
};
use std::path::Path;

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

fn print_json<T: serde::Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

fn join_or_none(ids: &[String]) -> String {
    if ids.is_empty() {
        "(none)".to_string()
    } else {
        ids.join(", ")
    }
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// List a catalog category, optionally keyword-filtered.
pub fn cmd_list(
    engine: &Engine,
    category: &str,
    keyword: &str,
    json_mode: bool,
) -> Result<(), ModmapError> {
    let category: Category = category.parse()?;

    if category == Category::Slo {
        let slos = engine.list_slos(keyword)?;
        if json_mode {
            print_json(&Response::success(slos));
        } else {
            println!("{}", render_slo_listing(&slos));
        }
        return Ok(());
    }

    let entities = engine.list(category, keyword)?;
    if json_mode {
        print_json(&Response::success(entities));
    } else {
        println!("{}", render_listing(category, &entities));
    }
    Ok(())
}

/// One-line-per-entity listing for a catalog category.
#[must_use]
pub fn render_listing(category: Category, entities: &[CatalogEntity]) -> String {
    if entities.is_empty() {
        return format!("No {} found.", category.suggestion_field());
    }

    let mut out = format!("{} {}:\n", entities.len(), category.suggestion_field());
    for entity in entities {
        match entity {
            CatalogEntity::Module(m) => {
                out.push_str(&format!(
                    "  {}  ({} lines across {} files)\n",
                    m.id, m.line_count, m.file_count
                ));
            }
            CatalogEntity::Interface(i) => {
                out.push_str(&format!("  {}  [{}]\n", i.id, i.kind));
            }
            CatalogEntity::Flow(f) => {
                out.push_str(&format!("  {}  ({} modules)\n", f.id, f.modules.len()));
            }
            CatalogEntity::Named(n) => {
                out.push_str(&format!("  {}\n", n.id));
            }
        }
    }
    out.trim_end().to_string()
}

/// One-line-per-SLO listing.
#[must_use]
pub fn render_slo_listing(slos: &[Slo]) -> String {
    if slos.is_empty() {
        return "No slos found.".to_string();
    }

    let mut out = format!("{} slos:\n", slos.len());
    for slo in slos {
        out.push_str(&format!(
            "  {}  [{}/{}]  target {} current {}\n",
            slo.id, slo.team, slo.application, slo.target, slo.current
        ));
    }
    out.trim_end().to_string()
}

// =============================================================================
// GET COMMAND
// =============================================================================

/// Fetch one entity by identifier.
pub fn cmd_get(
    engine: &Engine,
    category: &str,
    id: &str,
    json_mode: bool,
) -> Result<(), ModmapError> {
    let category: Category = category.parse()?;

    // SLO lookups go through the reporting path so derived metrics come along.
    if category == Category::Slo {
        return cmd_slo(engine, id, json_mode);
    }

    let lookup = engine.get(category, id)?;
    if json_mode {
        print_json(&Response::from_lookup(Ok(lookup)));
        return Ok(());
    }
    match lookup {
        Lookup::Found(entity) => println!("{}", render_entity(&entity)),
        Lookup::Missing {
            message,
            suggestion,
        } => println!("{}", render_miss(&message, &suggestion)),
    }
    Ok(())
}

/// Full detail view of one hydrated entity.
#[must_use]
pub fn render_entity(entity: &CatalogEntity) -> String {
    match entity {
        CatalogEntity::Module(m) => {
            let mut out = format!("Module: {}\n", m.id);
            out.push_str(&format!("  Name:        {}\n", m.name));
            out.push_str(&format!("  Description: {}\n", m.description));
            out.push_str(&format!("  Spec:        {}\n", m.spec_path));
            out.push_str(&format!(
                "  Size:        {} lines across {} files\n",
                m.line_count, m.file_count
            ));
            out.push_str(&format!("  Kinds:       {}\n", join_or_none(&m.kinds)));
            out.push_str(&format!("  Teams:       {}\n", join_or_none(&m.teams)));
            out.push_str(&format!("  Flows:       {}\n", join_or_none(&m.flows)));
            out.push_str(&format!("  Exposes:     {}\n", join_or_none(&m.exposed)));
            out.push_str(&format!("  Consumes:    {}\n", join_or_none(&m.consumed)));
            out.push_str(&format!("  Databases:   {}\n", join_or_none(&m.databases)));
            out.push_str(&format!("  Jobs:        {}", join_or_none(&m.jobs)));
            out
        }
        CatalogEntity::Interface(i) => {
            let mut out = format!("Interface: {}\n", i.id);
            out.push_str(&format!("  Kind:        {}\n", i.kind));
            out.push_str(&format!("  Description: {}\n", i.description));
            if let Some(spec_ref) = &i.spec_ref {
                out.push_str(&format!("  Spec ref:    {spec_ref}\n"));
            }
            out.push_str(&format!("  Methods:     {}\n", join_or_none(&i.methods)));
            out.push_str(&format!(
                "  Exposed by:  {}\n",
                i.exposed_by.as_deref().unwrap_or("(none)")
            ));
            out.push_str(&format!("  Consumed by: {}", join_or_none(&i.consumed_by)));
            out
        }
        CatalogEntity::Flow(f) => {
            format!("Flow: {}\n  Modules:     {}", f.id, join_or_none(&f.modules))
        }
        CatalogEntity::Named(n) => n.id.clone(),
    }
}

/// Not-found message with the ranked "did you mean" suggestions.
#[must_use]
pub fn render_miss(message: &str, suggestion: &SuggestionMap) -> String {
    let mut out = message.to_string();
    let mut any = false;
    for (field, ids) in suggestion {
        if ids.is_empty() {
            continue;
        }
        if !any {
            out.push_str("\nDid you mean:");
            any = true;
        }
        out.push_str(&format!("\n  {}: {}", field, ids.join(", ")));
    }
    if !any {
        out.push_str("\nNo close matches.");
    }
    out
}

// =============================================================================
// RELATED COMMAND
// =============================================================================

/// List modules related to an anchor entity.
pub fn cmd_related(
    engine: &Engine,
    category: &str,
    id: &str,
    json_mode: bool,
) -> Result<(), ModmapError> {
    let category: Category = category.parse()?;
    let lookup = engine.related(category, id)?;
    if json_mode {
        print_json(&Response::from_lookup(Ok(lookup)));
        return Ok(());
    }
    match lookup {
        Lookup::Found(modules) => {
            if modules.is_empty() {
                println!("No modules related to {category} '{id}'.");
            } else {
                println!(
                    "{} modules related to {category} '{id}':\n  {}",
                    modules.len(),
                    modules.join("\n  ")
                );
            }
        }
        Lookup::Missing {
            message,
            suggestion,
        } => println!("{}", render_miss(&message, &suggestion)),
    }
    Ok(())
}

// =============================================================================
// SEARCH COMMAND
// =============================================================================

/// Fuzzy search identifiers across every category.
pub fn cmd_search(
    engine: &Engine,
    keyword: &str,
    limit: usize,
    json_mode: bool,
) -> Result<(), ModmapError> {
    let map = engine.search(keyword, limit);
    if json_mode {
        print_json(&Response::success(map));
    } else {
        println!("{}", render_search(keyword, &map));
    }
    Ok(())
}

/// Per-category hit listing; empty buckets are skipped.
#[must_use]
pub fn render_search(keyword: &str, map: &SuggestionMap) -> String {
    let mut out = String::new();
    for (field, ids) in map {
        if ids.is_empty() {
            continue;
        }
        out.push_str(&format!("{}:\n  {}\n", field, ids.join("\n  ")));
    }
    if out.is_empty() {
        return format!("No matches for '{keyword}'.");
    }
    out.trim_end().to_string()
}

// =============================================================================
// TOP COMMAND
// =============================================================================

/// Rank modules by complexity score.
pub fn cmd_top(engine: &Engine, count: usize, json_mode: bool) -> Result<(), ModmapError> {
    let ranked = engine.top_complex(count)?;
    if json_mode {
        print_json(&Response::success(ranked));
    } else {
        println!("{}", render_ranking(&ranked));
    }
    Ok(())
}

/// Ranked complexity table, highest first.
#[must_use]
pub fn render_ranking(ranked: &[RankedModule]) -> String {
    if ranked.is_empty() {
        return "No modules found.".to_string();
    }

    let mut out = format!("Top {} modules by complexity:\n", ranked.len());
    for (position, entry) in ranked.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {:>8.1}  {}\n",
            position + 1,
            entry.complexity_score,
            entry.module.id
        ));
    }
    out.trim_end().to_string()
}

// =============================================================================
// SLO COMMANDS
// =============================================================================

/// Fetch one SLO with derived metrics.
pub fn cmd_slo(engine: &Engine, id: &str, json_mode: bool) -> Result<(), ModmapError> {
    let lookup = engine.get_slo(id)?;
    if json_mode {
        print_json(&Response::from_lookup(Ok(lookup)));
        return Ok(());
    }
    match lookup {
        Lookup::Found(report) => println!("{}", render_slo_report(&report)),
        Lookup::Missing {
            message,
            suggestion,
        } => println!("{}", render_miss(&message, &suggestion)),
    }
    Ok(())
}

/// Full detail view of one SLO with its derived metrics.
#[must_use]
pub fn render_slo_report(report: &SloReport) -> String {
    let slo = &report.slo;
    let mut out = format!("SLO: {}\n", slo.id);
    out.push_str(&format!(
        "  Owner:        {} / {} / {} / {}\n",
        slo.team, slo.application, slo.service, slo.component
    ));
    out.push_str(&format!("  Category:     {}\n", slo.category));
    out.push_str(&format!(
        "  Objective:    target {} current {} over {}\n",
        slo.target, slo.current, slo.window
    ));
    out.push_str(&format!("  Weight:       {}\n", slo.weight));
    out.push_str(&format!(
        "  Monitoring:   {} dashboards, {} alerts, {} email + {} chat channels\n",
        slo.dashboard_count, slo.alert_count, slo.email_channel_count, slo.chat_channel_count
    ));
    let mut flags = Vec::new();
    if slo.is_critical {
        flags.push("critical");
    }
    if slo.is_front_door {
        flags.push("front-door");
    }
    if slo.is_enriched {
        flags.push("enriched");
    }
    out.push_str(&format!(
        "  Flags:        {}\n",
        if flags.is_empty() {
            "(none)".to_string()
        } else {
            flags.join(", ")
        }
    ));
    out.push_str(&format!(
        "  Readiness:    {:.2}\n",
        report.operational_readiness
    ));
    out.push_str(&format!(
        "  Criticality:  {:.2}",
        report.business_criticality
    ));
    out
}

/// List SLOs, filtered by keyword, team, or application.
pub fn cmd_slos(
    engine: &Engine,
    keyword: &str,
    team: Option<&str>,
    application: Option<&str>,
    json_mode: bool,
) -> Result<(), ModmapError> {
    let slos = match (team, application) {
        (Some(_), Some(_)) => {
            return Err(ModmapError::InvalidInput {
                field: "team".to_string(),
                hint: "pass either --team or --application, not both".to_string(),
            });
        }
        (Some(team), None) => engine.slos_by_team(team)?,
        (None, Some(application)) => engine.slos_by_application(application)?,
        (None, None) => engine.list_slos(keyword)?,
    };

    if json_mode {
        print_json(&Response::success(slos));
    } else {
        println!("{}", render_slo_listing(&slos));
    }
    Ok(())
}

// =============================================================================
// OVERVIEW COMMAND
// =============================================================================

/// Show an overview of the configured datasets.
pub fn cmd_overview(
    engine: &Engine,
    catalog_path: &Path,
    slo_path: Option<&Path>,
    json_mode: bool,
) -> Result<(), ModmapError> {
    let index = engine.index();

    if json_mode {
        let output = serde_json::json!({
            "catalog": catalog_path.to_string_lossy(),
            "slo_db": slo_path.map(|p| p.to_string_lossy().into_owned()),
            "indexed": Category::ALL
                .iter()
                .map(|c| (c.suggestion_field().to_string(), index.len(*c)))
                .collect::<std::collections::BTreeMap<_, _>>(),
        });
        print_json(&output);
        return Ok(());
    }

    println!("Datasets:");
    println!("  catalog: {}", catalog_path.display());
    match slo_path {
        Some(path) => println!("  slo:     {}", path.display()),
        None => println!("  slo:     (not configured)"),
    }
    println!();
    println!("Indexed identifiers:");
    for category in Category::ALL {
        println!(
            "  {:<11} {}",
            format!("{}:", category.suggestion_field()),
            index.len(category)
        );
    }
    Ok(())
}
