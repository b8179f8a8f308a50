//! Version tags for business-space scripts.
//!
//! A [`VersionTag`] is the (major, minor, patch, extend) 4-tuple encoded in a
//! script filename or baseline spec token. Ordering is derived field by
//! field, major most significant, extend least — the comparison used both to
//! decide whether a script is still needed and to sort pending scripts.

use std::fmt;

/// A (major, minor, patch, extend) version tuple.
///
/// `extend` defaults to 0 when a filename or baseline token uses the
/// three-component form. Field order matters: the derived `Ord` compares
/// components most-significant first, as integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionTag {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub extend: u32,
}

impl VersionTag {
    pub fn new(major: u32, minor: u32, patch: u32, extend: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            extend,
        }
    }

    /// Whether a script carrying this tag still needs to run when the ledger's
    /// latest recorded tag is `current`.
    ///
    /// True iff `self` is strictly greater under tuple order.
    pub fn needed_after(&self, current: VersionTag) -> bool {
        *self > current
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "V{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.extend
        )
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
