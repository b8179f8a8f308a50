//! Versioned SQL script files.
//!
//! A [`ScriptFile`] is parsed from a filename following the convention
//! `<businessSpace>_V<major>.<minor>.<patch>[.<extend>]_<customName>.sql`,
//! e.g. `orders_V1.2.0_addcol.sql`. The business space is restricted to
//! alphanumerics, the custom name to word characters, and the trailing
//! extend component is optional (defaulting to 0).

use crate::error::{CoreError, CoreResult};
use crate::reader::split_statements;
use crate::version::VersionTag;
use regex::Regex;
use std::sync::LazyLock;

/// Unified script filename grammar. A single optional fourth numeric
/// component covers both the historical three-part and four-part forms.
static SCRIPT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9]+)_V(\d+)\.(\d+)\.(\d+)(?:\.(\d+))?_(\w+)\.sql$")
        .expect("script filename regex is valid")
});

/// A SQL script discovered in a configured directory, with its version
/// metadata parsed out of the filename and its body loaded as UTF-8 text.
#[derive(Debug, Clone)]
pub struct ScriptFile {
    /// Original filename, e.g. `orders_V1.2.0_addcol.sql`
    pub file_name: String,
    /// Business space the script belongs to
    pub business_space: String,
    /// Version tuple encoded in the filename
    pub version: VersionTag,
    /// Custom name segment of the filename
    pub custom_name: String,
    /// Raw SQL body
    pub sql: String,
}

impl ScriptFile {
    /// Parse `file_name` against the filename grammar and attach `sql` as the
    /// script body. Fails with [`CoreError::ScriptNameInvalid`] on mismatch.
    pub fn parse(file_name: &str, sql: String) -> CoreResult<Self> {
        let caps =
            SCRIPT_NAME_RE
                .captures(file_name)
                .ok_or_else(|| CoreError::ScriptNameInvalid {
                    file_name: file_name.to_string(),
                })?;

        // The numeric groups only admit \d+, so parse failures can only come
        // from overflow; treat those as a bad filename too.
        let number = |idx: usize| -> CoreResult<u32> {
            caps.get(idx)
                .map(|m| m.as_str())
                .unwrap_or("0")
                .parse()
                .map_err(|_| CoreError::ScriptNameInvalid {
                    file_name: file_name.to_string(),
                })
        };

        Ok(Self {
            file_name: file_name.to_string(),
            business_space: caps[1].to_string(),
            version: VersionTag::new(number(2)?, number(3)?, number(4)?, number(5)?),
            custom_name: caps[6].to_string(),
            sql,
        })
    }

    /// Display version string recorded in the ledger,
    /// `"{businessSpace}_V{major}.{minor}.{patch}.{extend}"`.
    pub fn qualified_version(&self) -> String {
        format!("{}_{}", self.business_space, self.version)
    }

    /// Split the script body into discrete executable statements.
    pub fn statements(&self) -> Vec<String> {
        split_statements(&self.sql)
    }
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
