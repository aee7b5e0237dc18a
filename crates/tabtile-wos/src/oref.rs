//! Object references
//!
//! An oref addresses any persisted entity as `(otype, oid)`. The string form
//! is `"<otype>:<oid>"`, e.g. `tab:9f1c...`.

use std::fmt;
use std::str::FromStr;

use crate::error::WosError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ORef {
    pub otype: String,
    pub oid: String,
}

impl ORef {
    pub fn new(otype: impl Into<String>, oid: impl Into<String>) -> Self {
        Self {
            otype: otype.into(),
            oid: oid.into(),
        }
    }
}

/// Build the reference for an object of kind `otype` with id `oid`.
pub fn make_oref(otype: &str, oid: &str) -> ORef {
    ORef::new(otype, oid)
}

impl fmt::Display for ORef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.otype, self.oid)
    }
}

impl FromStr for ORef {
    type Err = WosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((otype, oid)) if !otype.is_empty() && !oid.is_empty() => {
                Ok(ORef::new(otype, oid))
            }
            _ => Err(WosError::InvalidORef(s.to_string())),
        }
    }
}
