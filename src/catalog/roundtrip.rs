// SPDX-License-Identifier: PMPL-1.0-or-later

//! Write-then-read verification

use super::{Catalog, Triple};
use crate::error::Result;
use serde::Serialize;
use tracing::warn;

/// Outcome of serializing a catalog and parsing the result again.
#[derive(Debug, Clone, Serialize)]
pub struct RoundTrip {
    pub triples: usize,
    /// Present before writing, absent after reading back.
    pub lost: Vec<Triple>,
    /// Absent before writing, present after reading back.
    pub gained: Vec<Triple>,
    #[serde(skip)]
    pub xml: String,
}

impl RoundTrip {
    pub fn is_lossless(&self) -> bool {
        self.lost.is_empty() && self.gained.is_empty()
    }
}

/// Serialize `catalog`, parse the output, and compare the
/// `(context, source, comment, translation)` sets. Ordering is ignored.
pub fn round_trip(catalog: &Catalog) -> Result<RoundTrip> {
    let xml = catalog.to_xml();
    let reparsed = Catalog::parse(&xml)?;

    let before = catalog.triples();
    let after = reparsed.triples();
    let lost: Vec<Triple> = before.difference(&after).cloned().collect();
    let gained: Vec<Triple> = after.difference(&before).cloned().collect();
    if !lost.is_empty() || !gained.is_empty() {
        warn!(
            lost = lost.len(),
            gained = gained.len(),
            "catalog did not survive a write/read cycle"
        );
    }

    Ok(RoundTrip {
        triples: before.len(),
        lost,
        gained,
        xml,
    })
}
