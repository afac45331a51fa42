//! Picking the newest record of a package line.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::record::FormulaRecord;
use crate::version::compare_tags;

/// Errors from [`resolve_latest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no records to resolve")]
    Empty,

    #[error("records belong to different packages: {first} and {other}")]
    MixedPackages { first: String, other: String },
}

/// Total order used to rank records of one package.
///
/// Version first; records with equal version tags are ranked by origin path
/// and then checksum so the winner never depends on input order.
fn rank(a: &FormulaRecord, b: &FormulaRecord) -> Ordering {
    compare_tags(&a.version, &b.version)
        .then_with(|| a.origin.cmp(&b.origin))
        .then_with(|| a.checksum.hex.cmp(&b.checksum.hex))
}

/// Returns the record with the highest version.
///
/// All records must share one package name.
pub fn resolve_latest(records: &[FormulaRecord]) -> Result<&FormulaRecord, ResolveError> {
    let first = records.first().ok_or(ResolveError::Empty)?;
    if let Some(other) = records.iter().find(|r| r.name != first.name) {
        return Err(ResolveError::MixedPackages {
            first: first.name.clone(),
            other: other.name.clone(),
        });
    }
    records
        .iter()
        .max_by(|a, b| rank(a, b))
        .ok_or(ResolveError::Empty)
}

/// Returns the newest record of every package present.
pub fn latest_by_name(records: &[FormulaRecord]) -> BTreeMap<&str, &FormulaRecord> {
    let mut latest: BTreeMap<&str, &FormulaRecord> = BTreeMap::new();
    for record in records {
        latest
            .entry(record.name.as_str())
            .and_modify(|current| {
                if rank(record, *current) == Ordering::Greater {
                    *current = record;
                }
            })
            .or_insert(record);
    }
    latest
}
