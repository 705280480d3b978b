//! # Catalog Relational Access Layer
//!
//! Typed query functions over the pre-populated catalog dataset. The
//! dataset is opened read-only; this layer never issues a write or a
//! schema migration.
//!
//! ## Expected schema
//!
//! ```text
//! modules(id PK, name, description, spec_path, file_count, line_count)
//! interfaces(id PK, description, kind, spec_ref)
//! interface_methods(interface_id, method, position)
//! teams(id PK)   databases(id PK)   flows(id PK)   kinds(id PK)   jobs(id PK)
//! module_kinds(module_id, kind_id)        module_teams(module_id, team_id)
//! module_flows(module_id, flow_id)        module_databases(module_id, database_id)
//! module_jobs(module_id, job_id)          module_exposes(module_id, interface_id)
//! module_consumes(module_id, interface_id)
//! ```
//!
//! Keyword filtering uses `instr` rather than `LIKE`: identifier matching
//! is case-sensitive and SQLite `LIKE` is case-insensitive for ASCII.

use crate::types::{Category, Flow, Interface, Module, ModmapError, NamedEntity};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use std::path::Path;

impl From<rusqlite::Error> for ModmapError {
    fn from(e: rusqlite::Error) -> Self {
        ModmapError::Access(e.to_string())
    }
}

/// Read-only handle to the catalog dataset.
///
/// The connection is opened once at startup and treated as immutable;
/// concurrency is left to SQLite's own read guarantees.
pub struct CatalogStore {
    conn: Connection,
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore").finish_non_exhaustive()
    }
}

impl CatalogStore {
    /// Open the catalog dataset at the given path, read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ModmapError> {
        let conn = Connection::open_with_flags(path.as_ref(), OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self { conn })
    }

    // =========================================================================
    // LISTINGS
    // =========================================================================

    /// List module summaries. Empty keyword returns every row; a non-empty
    /// keyword filters by case-sensitive identifier substring. Ordered by
    /// descending line count, then id, for a stable default ranking.
    ///
    /// Relation counts are not computed for listings (`None` throughout).
    pub fn list_modules(&self, keyword: &str) -> Result<Vec<Module>, ModmapError> {
        let base = "SELECT id, name, description, spec_path, file_count, line_count \
                    FROM modules";
        let order = " ORDER BY line_count DESC, id ASC";
        let sql = if keyword.is_empty() {
            format!("{base}{order}")
        } else {
            format!("{base} WHERE instr(id, ?1) > 0{order}")
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let map = |row: &rusqlite::Row<'_>| {
            Ok(Module {
                id: row.get(0)?,
                name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                spec_path: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                file_count: row.get::<_, Option<u32>>(4)?.unwrap_or(0),
                line_count: row.get::<_, Option<u32>>(5)?.unwrap_or(0),
                ..Module::default()
            })
        };
        let rows = if keyword.is_empty() {
            stmt.query_map([], map)?
        } else {
            stmt.query_map(params![keyword], map)?
        };

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// List module rows with every relation count populated, in one pass.
    /// Backs the complexity ranking, which needs the counts without the
    /// per-module relation sets.
    pub fn list_modules_with_counts(&self) -> Result<Vec<Module>, ModmapError> {
        let sql = "SELECT m.id, m.name, m.description, m.spec_path, m.file_count, m.line_count, \
                   (SELECT COUNT(*) FROM module_kinds r WHERE r.module_id = m.id), \
                   (SELECT COUNT(*) FROM module_teams r WHERE r.module_id = m.id), \
                   (SELECT COUNT(*) FROM module_flows r WHERE r.module_id = m.id), \
                   (SELECT COUNT(*) FROM module_exposes r WHERE r.module_id = m.id), \
                   (SELECT COUNT(*) FROM module_consumes r WHERE r.module_id = m.id), \
                   (SELECT COUNT(*) FROM module_databases r WHERE r.module_id = m.id), \
                   (SELECT COUNT(*) FROM module_jobs r WHERE r.module_id = m.id) \
                   FROM modules m ORDER BY m.line_count DESC, m.id ASC";

        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(Module {
                id: row.get(0)?,
                name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                spec_path: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                file_count: row.get::<_, Option<u32>>(4)?.unwrap_or(0),
                line_count: row.get::<_, Option<u32>>(5)?.unwrap_or(0),
                kind_count: Some(row.get(6)?),
                team_count: Some(row.get(7)?),
                flow_count: Some(row.get(8)?),
                exposed_count: Some(row.get(9)?),
                consumed_count: Some(row.get(10)?),
                database_count: Some(row.get(11)?),
                job_count: Some(row.get(12)?),
                ..Module::default()
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// List interface summaries (no methods loaded), ordered by id.
    pub fn list_interfaces(&self, keyword: &str) -> Result<Vec<Interface>, ModmapError> {
        let base = "SELECT id, description, kind, spec_ref FROM interfaces";
        let sql = if keyword.is_empty() {
            format!("{base} ORDER BY id ASC")
        } else {
            format!("{base} WHERE instr(id, ?1) > 0 ORDER BY id ASC")
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let map = |row: &rusqlite::Row<'_>| {
            Ok(Interface {
                id: row.get(0)?,
                description: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                kind: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                spec_ref: row.get(3)?,
                ..Interface::default()
            })
        };
        let rows = if keyword.is_empty() {
            stmt.query_map([], map)?
        } else {
            stmt.query_map(params![keyword], map)?
        };

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// List flows with their participant module ids, ordered by flow id.
    pub fn list_flows(&self, keyword: &str) -> Result<Vec<Flow>, ModmapError> {
        let ids = self.list_ids(Category::Flow, keyword)?;
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let modules = self.id_rows(
                "SELECT module_id FROM module_flows WHERE flow_id = ?1 ORDER BY module_id",
                params![id],
            )?;
            out.push(Flow { id, modules });
        }
        Ok(out)
    }

    /// List identifiers for a simple named category (team, database, flow,
    /// kind), ordered by id.
    pub fn list_ids(&self, category: Category, keyword: &str) -> Result<Vec<String>, ModmapError> {
        let table = named_table(category)?;
        let sql = if keyword.is_empty() {
            format!("SELECT id FROM {table} ORDER BY id ASC")
        } else {
            format!("SELECT id FROM {table} WHERE instr(id, ?1) > 0 ORDER BY id ASC")
        };
        if keyword.is_empty() {
            self.id_rows(&sql, params![])
        } else {
            self.id_rows(&sql, params![keyword])
        }
    }

    // =========================================================================
    // EXACT LOOKUPS
    // =========================================================================

    /// Fetch a module by exact id with every relation set hydrated and the
    /// counts populated from those sets.
    pub fn get_module(&self, id: &str) -> Result<Option<Module>, ModmapError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, description, spec_path, file_count, line_count \
                 FROM modules WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Module {
                        id: row.get(0)?,
                        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        spec_path: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                        file_count: row.get::<_, Option<u32>>(4)?.unwrap_or(0),
                        line_count: row.get::<_, Option<u32>>(5)?.unwrap_or(0),
                        ..Module::default()
                    })
                },
            )
            .optional()?;

        let Some(mut module) = row else {
            return Ok(None);
        };

        module.kinds = self.id_rows(
            "SELECT kind_id FROM module_kinds WHERE module_id = ?1 ORDER BY kind_id",
            params![id],
        )?;
        module.teams = self.id_rows(
            "SELECT team_id FROM module_teams WHERE module_id = ?1 ORDER BY team_id",
            params![id],
        )?;
        module.flows = self.id_rows(
            "SELECT flow_id FROM module_flows WHERE module_id = ?1 ORDER BY flow_id",
            params![id],
        )?;
        module.exposed = self.id_rows(
            "SELECT interface_id FROM module_exposes WHERE module_id = ?1 ORDER BY interface_id",
            params![id],
        )?;
        module.consumed = self.id_rows(
            "SELECT interface_id FROM module_consumes WHERE module_id = ?1 ORDER BY interface_id",
            params![id],
        )?;
        module.databases = self.id_rows(
            "SELECT database_id FROM module_databases WHERE module_id = ?1 ORDER BY database_id",
            params![id],
        )?;
        module.jobs = self.id_rows(
            "SELECT job_id FROM module_jobs WHERE module_id = ?1 ORDER BY job_id",
            params![id],
        )?;

        module.kind_count = Some(module.kinds.len() as u32);
        module.team_count = Some(module.teams.len() as u32);
        module.flow_count = Some(module.flows.len() as u32);
        module.exposed_count = Some(module.exposed.len() as u32);
        module.consumed_count = Some(module.consumed.len() as u32);
        module.database_count = Some(module.databases.len() as u32);
        module.job_count = Some(module.jobs.len() as u32);

        Ok(Some(module))
    }

    /// Fetch an interface by exact id with its ordered method set, the
    /// exposing module, and its consumers.
    pub fn get_interface(&self, id: &str) -> Result<Option<Interface>, ModmapError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, description, kind, spec_ref FROM interfaces WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Interface {
                        id: row.get(0)?,
                        description: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        kind: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        spec_ref: row.get(3)?,
                        ..Interface::default()
                    })
                },
            )
            .optional()?;

        let Some(mut interface) = row else {
            return Ok(None);
        };

        interface.methods = self.id_rows(
            "SELECT method FROM interface_methods WHERE interface_id = ?1 ORDER BY position ASC",
            params![id],
        )?;
        interface.method_count = Some(interface.methods.len() as u32);
        interface.exposed_by = self
            .conn
            .query_row(
                "SELECT module_id FROM module_exposes WHERE interface_id = ?1 \
                 ORDER BY module_id LIMIT 1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        interface.consumed_by = self.id_rows(
            "SELECT module_id FROM module_consumes WHERE interface_id = ?1 ORDER BY module_id",
            params![id],
        )?;

        Ok(Some(interface))
    }

    /// Fetch a flow by exact id, hydrating its participant modules.
    pub fn get_flow(&self, id: &str) -> Result<Option<Flow>, ModmapError> {
        if !self.row_exists("flows", id)? {
            return Ok(None);
        }
        let modules = self.id_rows(
            "SELECT module_id FROM module_flows WHERE flow_id = ?1 ORDER BY module_id",
            params![id],
        )?;
        Ok(Some(Flow {
            id: id.to_string(),
            modules,
        }))
    }

    /// Fetch a bare named entity (team, database, kind) by exact id.
    pub fn get_named(&self, category: Category, id: &str) -> Result<Option<NamedEntity>, ModmapError> {
        let table = named_table(category)?;
        if !self.row_exists(table, id)? {
            return Ok(None);
        }
        Ok(Some(NamedEntity { id: id.to_string() }))
    }

    // =========================================================================
    // RELATED MODULES
    // =========================================================================

    /// Identifiers of modules related to an anchor through the category's
    /// join relation. `None` only when the anchor id itself does not
    /// exist; an existing anchor with zero relations yields an empty set.
    ///
    /// Interface anchors resolve through the consumed relation: "which
    /// modules call this contract".
    pub fn related_modules(
        &self,
        category: Category,
        id: &str,
    ) -> Result<Option<Vec<String>>, ModmapError> {
        let (anchor_table, sql) = match category {
            Category::Team => (
                "teams",
                "SELECT module_id FROM module_teams WHERE team_id = ?1 ORDER BY module_id",
            ),
            Category::Database => (
                "databases",
                "SELECT module_id FROM module_databases WHERE database_id = ?1 ORDER BY module_id",
            ),
            Category::Kind => (
                "kinds",
                "SELECT module_id FROM module_kinds WHERE kind_id = ?1 ORDER BY module_id",
            ),
            Category::Flow => (
                "flows",
                "SELECT module_id FROM module_flows WHERE flow_id = ?1 ORDER BY module_id",
            ),
            Category::Interface => (
                "interfaces",
                "SELECT module_id FROM module_consumes WHERE interface_id = ?1 ORDER BY module_id",
            ),
            other => {
                return Err(ModmapError::Unsupported {
                    category: other,
                    operation: "related-module lookup",
                });
            }
        };

        if !self.row_exists(anchor_table, id)? {
            return Ok(None);
        }
        Ok(Some(self.id_rows(sql, params![id])?))
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn row_exists(&self, table: &str, id: &str) -> Result<bool, ModmapError> {
        let sql = format!("SELECT 1 FROM {table} WHERE id = ?1");
        let hit: Option<i64> = self
            .conn
            .query_row(&sql, params![id], |row| row.get(0))
            .optional()?;
        Ok(hit.is_some())
    }

    fn id_rows(&self, sql: &str, args: impl rusqlite::Params) -> Result<Vec<String>, ModmapError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

/// Table name for a bare named category.
fn named_table(category: Category) -> Result<&'static str, ModmapError> {
    match category {
        Category::Team => Ok("teams"),
        Category::Database => Ok("databases"),
        Category::Flow => Ok("flows"),
        Category::Kind => Ok("kinds"),
        other => Err(ModmapError::Unsupported {
            category: other,
            operation: "named-entity lookup",
        }),
    }
}
