//! Baseline spec parsing.
//!
//! A baseline spec is a comma-separated list of
//! `<businessSpace>_V<major>.<minor>.<patch>[.<extend>]` tokens declaring the
//! starting version of each business space for a database populated outside
//! version control, e.g. `"orders_V2.0.0,billing_V1.1.2"`.

use crate::error::{CoreError, CoreResult};
use crate::version::VersionTag;
use regex::Regex;
use std::sync::LazyLock;

/// Baseline token grammar — the filename grammar minus custom name and
/// extension, with the same optional extend component.
static BASELINE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9]+)_V(\d+)\.(\d+)\.(\d+)(?:\.(\d+))?$")
        .expect("baseline token regex is valid")
});

/// One parsed baseline entry. The ledger records the normalized four-part
/// version string, not the original token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineEntry {
    /// Business space the baseline applies to
    pub business_space: String,
    /// Declared starting version
    pub version: VersionTag,
}

/// Parse a baseline spec string into its entries.
///
/// Fails fast on a blank spec or on any token that does not match the
/// grammar. Surrounding whitespace per token is tolerated.
pub fn parse_baseline_spec(spec: &str) -> CoreResult<Vec<BaselineEntry>> {
    if spec.trim().is_empty() {
        return Err(CoreError::BaselineSpecEmpty);
    }
    let mut entries = Vec::new();
    for raw in spec.split(',') {
        let token = raw.trim();
        let caps = BASELINE_TOKEN_RE
            .captures(token)
            .ok_or_else(|| CoreError::BaselineSpecInvalid {
                token: token.to_string(),
            })?;
        let number = |idx: usize| -> CoreResult<u32> {
            caps.get(idx)
                .map(|m| m.as_str())
                .unwrap_or("0")
                .parse()
                .map_err(|_| CoreError::BaselineSpecInvalid {
                    token: token.to_string(),
                })
        };
        entries.push(BaselineEntry {
            business_space: caps[1].to_string(),
            version: VersionTag::new(number(2)?, number(3)?, number(4)?, number(5)?),
        });
    }
    Ok(entries)
}

#[cfg(test)]
#[path = "baseline_test.rs"]
mod tests;
