use crate::counters::jail_names_oid;
use crate::snmp::WalkResult;
use std::num::ParseIntError;
use thiserror::Error;

/// Numeric index of a jail in the agent's jail table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JailIndex(pub u32);

impl std::fmt::Display for JailIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Jail {0} not found")]
    NotFound(String),
    #[error("Can't determine jail index: {oid}: {source}")]
    InvalidIndex {
        oid: String,
        #[source]
        source: ParseIntError,
    },
}

/// Find the index of the jail named `jail` in the jail-name column.
///
/// Only entries whose value equals `jail` have their suffix parsed. If the
/// name appears more than once the lowest index wins.
pub fn resolve_index(walk: &WalkResult, jail: &str) -> Result<JailIndex, ResolveError> {
    let prefix = format!("{}.", jail_names_oid());
    let mut found: Option<JailIndex> = None;

    for (oid, value) in walk {
        let Some(suffix) = oid.strip_prefix(&prefix) else {
            continue;
        };
        if value.as_str() != Some(jail) {
            continue;
        }

        let index = suffix
            .parse::<u32>()
            .map(JailIndex)
            .map_err(|source| ResolveError::InvalidIndex {
                oid: oid.clone(),
                source,
            })?;

        found = match found {
            Some(previous) => {
                tracing::warn!(
                    "Jail {} appears at index {} and {}, using the lower",
                    jail,
                    previous,
                    index
                );
                Some(previous.min(index))
            }
            None => Some(index),
        };
    }

    found.ok_or_else(|| ResolveError::NotFound(jail.to_string()))
}
