//! Naming strategies and per-group evaluation
//!
//! A strategy is a pure function from (desired name, module) to a proposed
//! name. Strategies are ordered from cheapest/most stable to most
//! discriminating; hash-based proposals carry a one-letter tag so hashes
//! produced by different strategies can never collide with each other.
//!
//! The structural fingerprint is the first 4 bytes of a SHA-256 digest over
//! the deterministic serialization of the erased module, rendered as 8
//! uppercase hex digits. Identical erased structures hash identically across
//! runs; this is a correctness requirement, not a performance detail.

use crate::canonicalize::{erase_all_names, erase_info, erase_port_names};
use crate::circuit::Module;
use crate::error::{Result, StabilizeError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Strategy for deriving a module's stable name from its desired name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamingStrategy {
    /// The desired name itself, ignoring module structure
    Exact,
    /// Desired name plus a hash of the name-erased port list
    PortStructure,
    /// Desired name plus a hash of the fully name-erased module
    ContentStructure,
    /// Desired name plus a hash of the info-erased module, names kept,
    /// own name blanked
    Content,
}

/// Fallback priority order, cheapest and most stable first
pub const FALLBACK_ORDER: [NamingStrategy; 4] = [
    NamingStrategy::Exact,
    NamingStrategy::PortStructure,
    NamingStrategy::ContentStructure,
    NamingStrategy::Content,
];

impl NamingStrategy {
    /// Compute this strategy's proposed name for one module
    pub fn propose(&self, desired: &str, module: &Module) -> String {
        match self {
            NamingStrategy::Exact => desired.to_string(),
            NamingStrategy::PortStructure => {
                format!("{}_p{}", desired, hash8(&erase_port_names(&module.ports)))
            }
            NamingStrategy::ContentStructure => {
                format!("{}_c{}", desired, hash8(&erase_all_names(module)))
            }
            NamingStrategy::Content => {
                let mut canon = erase_info(module);
                canon.name = String::new();
                format!("{}_C{}", desired, hash8(&canon))
            }
        }
    }
}

impl fmt::Display for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NamingStrategy::Exact => "exact",
            NamingStrategy::PortStructure => "port-structure",
            NamingStrategy::ContentStructure => "content-structure",
            NamingStrategy::Content => "content",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for NamingStrategy {
    type Err = StabilizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "exact" => Ok(NamingStrategy::Exact),
            "port-structure" => Ok(NamingStrategy::PortStructure),
            "content-structure" => Ok(NamingStrategy::ContentStructure),
            "content" => Ok(NamingStrategy::Content),
            other => Err(StabilizeError::UnknownStrategy {
                name: other.to_string(),
            }),
        }
    }
}

/// Compute proposed names for every module in a collision group.
///
/// Returns the assignment only when the proposed names are pairwise
/// distinct; a collision is a fallback signal, not an error.
pub fn evaluate(
    strategy: NamingStrategy,
    desired: &str,
    modules: &[&Module],
) -> Option<IndexMap<String, String>> {
    let mut assigned = IndexMap::with_capacity(modules.len());
    let mut seen = HashSet::with_capacity(modules.len());
    for module in modules {
        let proposed = strategy.propose(desired, module);
        if !seen.insert(proposed.clone()) {
            return None;
        }
        assigned.insert(module.name.clone(), proposed);
    }
    Some(assigned)
}

/// 8 uppercase hex digits of a SHA-256 digest over the serialized value
fn hash8<T: Serialize>(value: &T) -> String {
    let bytes = serde_json::to_vec(value).expect("circuit IR always serializes");
    let digest = Sha256::digest(&bytes);
    format!(
        "{:02X}{:02X}{:02X}{:02X}",
        digest[0], digest[1], digest[2], digest[3]
    )
}
