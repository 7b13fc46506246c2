// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Strand information for feature locations.

use std::fmt::{self, Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Strand on which a feature location lies.
///
/// Plain ranges and points are on the forward strand; every
/// `complement(...)` around them flips the strand. A join whose parts
/// disagree has no single strand and reports `Unknown`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
    Unknown,
}

impl Strand {
    pub fn is_unknown(&self) -> bool {
        matches!(*self, Strand::Unknown)
    }

    /// Reversed strand. `Unknown` stays `Unknown`.
    pub fn reverse(&self) -> Self {
        match *self {
            Strand::Forward => Strand::Reverse,
            Strand::Reverse => Strand::Forward,
            Strand::Unknown => Strand::Unknown,
        }
    }

    /// Strand shared by two parts of a compound location.
    pub fn combine(self, other: Strand) -> Strand {
        if self == other {
            self
        } else {
            Strand::Unknown
        }
    }

    /// Symbol denoting the strand. By convention, the forward strand
    /// is `+`, the reverse strand is `-`, and unknown or mixed strands
    /// are `.`.
    pub fn strand_symbol(&self) -> &str {
        match *self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
            Strand::Unknown => ".",
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.strand_symbol())
    }
}
