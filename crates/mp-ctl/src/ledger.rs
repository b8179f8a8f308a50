//! Version ledger access.
//!
//! All ledger SQL is derived from one fixed column list, so the insert
//! statement, the select list, and row decoding cannot drift out of step
//! with each other. The table name is the only configurable part.

use crate::error::{CtlError, CtlResult};
use mp_core::{BaselineEntry, ScriptFile, VersionTag};
use mp_db::{Database, SqlValue};

/// Timestamp format recorded in `install_time`.
pub(crate) const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Ledger columns without the auto-increment id, in insert order.
const LEDGER_COLUMNS: [&str; 14] = [
    "business_space",
    "major_version",
    "minor_version",
    "patch_version",
    "extend_version",
    "version",
    "custom_name",
    "version_type",
    "script_file_name",
    "script_digest_hex",
    "success",
    "execution_time",
    "install_time",
    "install_user",
];

/// Ledger row type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionType {
    /// Row produced by executing an increment script
    Sql,
    /// Row declared by a baseline spec
    BaseLine,
}

impl VersionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionType::Sql => "SQL",
            VersionType::BaseLine => "BaseLine",
        }
    }
}

/// One decoded ledger row.
#[derive(Debug, Clone)]
pub struct VersionRecord {
    pub id: i64,
    pub business_space: String,
    pub version: VersionTag,
    /// Display string, `"{businessSpace}_V{major}.{minor}.{patch}.{extend}"`
    pub version_str: String,
    pub custom_name: String,
    pub version_type: String,
    pub script_file_name: String,
    pub script_digest_hex: String,
    /// 1 = completed, 0 = pending
    pub success: i64,
    /// Elapsed milliseconds, -1 = pending
    pub execution_time: i64,
    pub install_time: String,
    pub install_user: String,
}

impl VersionRecord {
    /// Decode a row returned by [`LedgerStore::select_sql`], cells in
    /// `id` + [`LEDGER_COLUMNS`] order.
    fn from_row(row: &[SqlValue]) -> CtlResult<Self> {
        if row.len() != LEDGER_COLUMNS.len() + 1 {
            return Err(CtlError::LedgerRow {
                message: format!(
                    "expected {} cells, got {}",
                    LEDGER_COLUMNS.len() + 1,
                    row.len()
                ),
            });
        }
        let int = |idx: usize| -> CtlResult<i64> {
            row[idx].as_i64().ok_or_else(|| CtlError::LedgerRow {
                message: format!("cell {idx} is not an integer"),
            })
        };
        let text = |idx: usize| -> CtlResult<String> {
            row[idx]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| CtlError::LedgerRow {
                    message: format!("cell {idx} is not text"),
                })
        };
        let component = |idx: usize| -> CtlResult<u32> {
            u32::try_from(int(idx)?).map_err(|_| CtlError::LedgerRow {
                message: format!("cell {idx} is not a valid version component"),
            })
        };
        Ok(Self {
            id: int(0)?,
            business_space: text(1)?,
            version: VersionTag::new(component(2)?, component(3)?, component(4)?, component(5)?),
            version_str: text(6)?,
            custom_name: text(7)?,
            version_type: text(8)?,
            script_file_name: text(9)?,
            script_digest_hex: text(10)?,
            success: int(11)?,
            execution_time: int(12)?,
            install_time: text(13)?,
            install_user: text(14)?,
        })
    }
}

/// Statement builder and query helpers for one configured ledger table.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    table: String,
}

impl LedgerStore {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// `INSERT INTO <table>(<cols>) VALUES (?, ...)` over the fixed column
    /// list.
    pub fn insert_sql(&self) -> String {
        let placeholders = vec!["?"; LEDGER_COLUMNS.len()].join(", ");
        format!(
            "INSERT INTO {}({}) VALUES ({})",
            self.table,
            LEDGER_COLUMNS.join(", "),
            placeholders
        )
    }

    /// Update a pending row to completed, matched on the full logical key.
    pub fn update_sql(&self) -> String {
        format!(
            "UPDATE {} SET success = 1, execution_time = ? \
             WHERE business_space = ? AND major_version = ? AND minor_version = ? \
             AND patch_version = ? AND extend_version = ?",
            self.table
        )
    }

    /// Rows of one business space, newest version tuple first.
    pub fn select_sql(&self, success_only: bool) -> String {
        let success_filter = if success_only { " AND success = 1" } else { "" };
        format!(
            "SELECT id, {} FROM {} WHERE business_space = ?{} \
             ORDER BY major_version DESC, minor_version DESC, patch_version DESC, \
             extend_version DESC",
            LEDGER_COLUMNS.join(", "),
            self.table,
            success_filter
        )
    }

    /// All ledger rows of `business_space`, newest first.
    pub async fn records(
        &self,
        db: &dyn Database,
        business_space: &str,
    ) -> CtlResult<Vec<VersionRecord>> {
        let rows = db
            .query(&self.select_sql(false), &[business_space.into()])
            .await?;
        rows.iter().map(|r| VersionRecord::from_row(r)).collect()
    }

    /// The latest recorded version tuple for `business_space`, or `None` if
    /// the ledger has no rows for it.
    ///
    /// With `success_only` unset this reads the first row ordered by version
    /// tuple descending regardless of the success flag, so a row left
    /// pending by a failed run counts as current.
    pub async fn latest_version(
        &self,
        db: &dyn Database,
        business_space: &str,
        success_only: bool,
    ) -> CtlResult<Option<VersionTag>> {
        let rows = db
            .query(&self.select_sql(success_only), &[business_space.into()])
            .await?;
        match rows.first() {
            Some(row) => Ok(Some(VersionRecord::from_row(row)?.version)),
            None => Ok(None),
        }
    }

    /// Insert the pending row for a script about to run: success = 0,
    /// execution_time = -1.
    pub async fn insert_pending(
        &self,
        db: &dyn Database,
        script: &ScriptFile,
        install_time: &str,
        install_user: &str,
    ) -> CtlResult<()> {
        db.execute(
            &self.insert_sql(),
            &[
                script.business_space.as_str().into(),
                script.version.major.into(),
                script.version.minor.into(),
                script.version.patch.into(),
                script.version.extend.into(),
                script.qualified_version().into(),
                script.custom_name.as_str().into(),
                VersionType::Sql.as_str().into(),
                script.file_name.as_str().into(),
                "none".into(),
                SqlValue::Int(0),
                SqlValue::Int(-1),
                install_time.into(),
                install_user.into(),
            ],
        )
        .await?;
        Ok(())
    }

    /// Flip the pending row of `script` to success with its elapsed time.
    pub async fn mark_success(
        &self,
        db: &dyn Database,
        script: &ScriptFile,
        elapsed_ms: i64,
    ) -> CtlResult<()> {
        db.execute(
            &self.update_sql(),
            &[
                elapsed_ms.into(),
                script.business_space.as_str().into(),
                script.version.major.into(),
                script.version.minor.into(),
                script.version.patch.into(),
                script.version.extend.into(),
            ],
        )
        .await?;
        Ok(())
    }

    /// Insert a baseline row: success = 1, execution_time = 0, no script.
    pub async fn insert_baseline(
        &self,
        db: &dyn Database,
        entry: &BaselineEntry,
        install_time: &str,
        install_user: &str,
    ) -> CtlResult<()> {
        db.execute(
            &self.insert_sql(),
            &[
                entry.business_space.as_str().into(),
                entry.version.major.into(),
                entry.version.minor.into(),
                entry.version.patch.into(),
                entry.version.extend.into(),
                format!("{}_{}", entry.business_space, entry.version).into(),
                "none".into(),
                VersionType::BaseLine.as_str().into(),
                "none".into(),
                "none".into(),
                SqlValue::Int(1),
                SqlValue::Int(0),
                install_time.into(),
                install_user.into(),
            ],
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
