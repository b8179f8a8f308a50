//! Script catalog — discovery, grouping, and selection.
//!
//! The catalog scans the configured script directories, parses every
//! filename into a [`ScriptFile`] (failing fast on a malformed name), and
//! groups scripts by business space. Selection of pending scripts against a
//! ledger version happens per group via [`ScriptCatalog::pending`].

use crate::error::CoreResult;
use crate::script::ScriptFile;
use crate::source::ScriptSource;
use crate::version::VersionTag;
use std::collections::HashMap;

/// All discovered scripts, grouped by business space.
///
/// Group iteration order is hash order; no cross-domain ordering is
/// guaranteed or provided.
#[derive(Debug, Default)]
pub struct ScriptCatalog {
    groups: HashMap<String, Vec<ScriptFile>>,
}

impl ScriptCatalog {
    /// Scan `dirs` through `source` and build the catalog.
    pub fn discover(source: &dyn ScriptSource, dirs: &[String]) -> CoreResult<Self> {
        let mut groups: HashMap<String, Vec<ScriptFile>> = HashMap::new();
        for dir in dirs {
            for raw in source.list_scripts(dir)? {
                let script = ScriptFile::parse(&raw.file_name, raw.contents)?;
                groups
                    .entry(script.business_space.clone())
                    .or_default()
                    .push(script);
            }
        }
        log::debug!(
            "script catalog: {} business space(s), {} script(s)",
            groups.len(),
            groups.values().map(Vec::len).sum::<usize>()
        );
        Ok(Self { groups })
    }

    /// Business spaces present in the catalog, in arbitrary order.
    pub fn business_spaces(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// All scripts of one business space, in discovery order.
    pub fn group(&self, business_space: &str) -> &[ScriptFile] {
        self.groups
            .get(business_space)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Scripts of `business_space` strictly newer than `current`, sorted
    /// ascending by version tuple.
    pub fn pending(&self, business_space: &str, current: VersionTag) -> Vec<&ScriptFile> {
        let mut selected: Vec<&ScriptFile> = self
            .group(business_space)
            .iter()
            .filter(|s| s.version.needed_after(current))
            .collect();
        selected.sort_by_key(|s| s.version);
        selected
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
