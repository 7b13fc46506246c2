// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! A parsed GenBank entry.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;
use crate::feature::Feature;
use crate::header::{Header, Topology};

/// One GenBank entry: header, features and sequence, plus the problems
/// met while reading it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Primary accession, or the locus name when the entry has none.
    pub accession: String,
    /// 1-based input line of the LOCUS line.
    pub line: usize,
    pub header: Header,
    /// Nucleotide sequence, concatenated from the ORIGIN block.
    pub sequence: String,
    /// Length declared on the LOCUS line. Falls back to the assembled
    /// length when the LOCUS line declares none.
    pub length: usize,
    /// Features in table order.
    pub features: Vec<Feature>,
    /// Diagnostics ordered by input line.
    pub diagnostics: Vec<Diagnostic>,
    /// `false` when the sequence could not be fully assembled.
    pub complete: bool,
}

impl Record {
    /// Locus name from the LOCUS line.
    pub fn name(&self) -> Option<&str> {
        self.header.locus().map(|locus| locus.name.as_str())
    }

    pub fn is_circular(&self) -> bool {
        self.header
            .locus()
            .and_then(|locus| locus.topology)
            .map_or(false, |topology| topology == Topology::Circular)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Whether the declared length matches the assembled sequence.
    pub fn length_matches(&self) -> bool {
        self.length == self.sequence.len()
    }

    /// Features with the given key, e.g. every `CDS`.
    pub fn features_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Feature> + 'a {
        self.features.iter().filter(move |feature| feature.kind == kind)
    }

    /// Bases covered by `feature`, read on its strand. `None` when the
    /// feature location is unresolved or runs past the sequence.
    pub fn feature_sequence(&self, feature: &Feature) -> Option<String> {
        feature.location.extract(&self.sequence)
    }
}
