//! # SLO Relational Access Layer
//!
//! Typed queries over the companion service-level-objective dataset.
//!
//! Unlike the catalog, the SLO dataset is opened read-write for exactly
//! one reason: idempotent `CREATE TABLE IF NOT EXISTS` at open time. No
//! row is ever written by this layer.

use crate::types::{ModmapError, Slo};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

/// Table creation issued once at open. Running it against an already
/// populated dataset is a no-op.
const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS slos (\
    id TEXT PRIMARY KEY, \
    created_at TEXT NOT NULL DEFAULT '', \
    modified_at TEXT NOT NULL DEFAULT '', \
    revision INTEGER NOT NULL DEFAULT 0, \
    team TEXT NOT NULL DEFAULT '', \
    application TEXT NOT NULL DEFAULT '', \
    service TEXT NOT NULL DEFAULT '', \
    component TEXT NOT NULL DEFAULT '', \
    category TEXT NOT NULL DEFAULT '', \
    weight REAL NOT NULL DEFAULT 0, \
    query_ref TEXT NOT NULL DEFAULT '', \
    target REAL NOT NULL DEFAULT 0, \
    current REAL NOT NULL DEFAULT 0, \
    duration_window TEXT NOT NULL DEFAULT '', \
    dashboard_count INTEGER NOT NULL DEFAULT 0, \
    alert_count INTEGER NOT NULL DEFAULT 0, \
    email_channel_count INTEGER NOT NULL DEFAULT 0, \
    chat_channel_count INTEGER NOT NULL DEFAULT 0, \
    is_critical INTEGER NOT NULL DEFAULT 0, \
    is_front_door INTEGER NOT NULL DEFAULT 0, \
    is_enriched INTEGER NOT NULL DEFAULT 0, \
    flow_online_payments INTEGER NOT NULL DEFAULT 0, \
    flow_ipp_payments INTEGER NOT NULL DEFAULT 0, \
    flow_payout INTEGER NOT NULL DEFAULT 0, \
    flow_reporting INTEGER NOT NULL DEFAULT 0, \
    flow_onboarding INTEGER NOT NULL DEFAULT 0, \
    flow_customer_portal INTEGER NOT NULL DEFAULT 0)";

const SLO_COLUMNS: &str = "id, created_at, modified_at, revision, team, application, \
    service, component, category, weight, query_ref, target, current, duration_window, \
    dashboard_count, alert_count, email_channel_count, chat_channel_count, \
    is_critical, is_front_door, is_enriched, \
    flow_online_payments, flow_ipp_payments, flow_payout, flow_reporting, \
    flow_onboarding, flow_customer_portal";

/// Handle to the SLO dataset.
pub struct SloStore {
    conn: Connection,
}

impl std::fmt::Debug for SloStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SloStore").finish_non_exhaustive()
    }
}

impl SloStore {
    /// Open the SLO dataset at the given path, creating the table when it
    /// is absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ModmapError> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute(SCHEMA, [])?;
        Ok(Self { conn })
    }

    /// List SLO rows, ordered by id. A non-empty keyword filters by
    /// case-sensitive identifier substring.
    pub fn list_all(&self, keyword: &str) -> Result<Vec<Slo>, ModmapError> {
        if keyword.is_empty() {
            self.slo_rows(
                &format!("SELECT {SLO_COLUMNS} FROM slos ORDER BY id ASC"),
                params![],
            )
        } else {
            self.slo_rows(
                &format!("SELECT {SLO_COLUMNS} FROM slos WHERE instr(id, ?1) > 0 ORDER BY id ASC"),
                params![keyword],
            )
        }
    }

    /// Fetch an SLO by exact id.
    pub fn get_by_id(&self, id: &str) -> Result<Option<Slo>, ModmapError> {
        let sql = format!("SELECT {SLO_COLUMNS} FROM slos WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], slo_from_row)
            .optional()?)
    }

    /// SLOs owned by a team, ordered by id.
    pub fn list_by_team(&self, team: &str) -> Result<Vec<Slo>, ModmapError> {
        self.slo_rows(
            &format!("SELECT {SLO_COLUMNS} FROM slos WHERE team = ?1 ORDER BY id ASC"),
            params![team],
        )
    }

    /// SLOs attached to an application, ordered by id.
    pub fn list_by_application(&self, application: &str) -> Result<Vec<Slo>, ModmapError> {
        self.slo_rows(
            &format!("SELECT {SLO_COLUMNS} FROM slos WHERE application = ?1 ORDER BY id ASC"),
            params![application],
        )
    }

    /// Every searchable term for the suggestion index, in dataset order:
    /// id, team, application, service, component, and category per row.
    /// Deduplication is the index builder's job.
    pub fn suggestion_terms(&self) -> Result<Vec<String>, ModmapError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, team, application, service, component, category FROM slos ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok([
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ])
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.extend(row?);
        }
        Ok(out)
    }

    fn slo_rows(&self, sql: &str, args: impl rusqlite::Params) -> Result<Vec<Slo>, ModmapError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, slo_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

fn slo_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Slo> {
    Ok(Slo {
        id: row.get(0)?,
        created_at: row.get(1)?,
        modified_at: row.get(2)?,
        revision: row.get(3)?,
        team: row.get(4)?,
        application: row.get(5)?,
        service: row.get(6)?,
        component: row.get(7)?,
        category: row.get(8)?,
        weight: row.get(9)?,
        query_ref: row.get(10)?,
        target: row.get(11)?,
        current: row.get(12)?,
        window: row.get(13)?,
        dashboard_count: row.get(14)?,
        alert_count: row.get(15)?,
        email_channel_count: row.get(16)?,
        chat_channel_count: row.get(17)?,
        is_critical: row.get(18)?,
        is_front_door: row.get(19)?,
        is_enriched: row.get(20)?,
        flow_online_payments: row.get(21)?,
        flow_ipp_payments: row.get(22)?,
        flow_payout: row.get(23)?,
        flow_reporting: row.get(24)?,
        flow_onboarding: row.get(25)?,
        flow_customer_portal: row.get(26)?,
    })
}
