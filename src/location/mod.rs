// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Feature locations: where on the record's sequence a feature lies.
//!
//! A location is a small expression tree. Leaves are single bases
//! (`467`), base ranges (`340..565`, possibly with fuzzy ends such as
//! `<1..>888`) or sites between two bases (`102^103`). Compound
//! locations take the reverse complement of another location
//! (`complement(...)`) or concatenate several locations in order
//! (`join(...)`, `order(...)`). Positions are 1-based and inclusive,
//! exactly as written in the flat file.
//!
//! Locations are parsed with `FromStr` and rendered back to their
//! canonical text with `Display`; the two are inverse operations.
//!
//! ```
//! # use bio_genbank::location::LocationError;
//! # fn try_main() -> Result<(), LocationError> {
//! use bio_genbank::location::{JoinKind, Location};
//! let cds = "complement(join(1..10,20..30))".parse::<Location>()?;
//! assert_eq!(
//!     cds,
//!     Location::Complement(Box::new(Location::Join {
//!         kind: JoinKind::Join,
//!         parts: vec![Location::range(1, 10), Location::range(20, 30)],
//!     }))
//! );
//! assert_eq!(cds.to_string(), "complement(join(1..10,20..30))");
//! # Ok(())
//! # }
//! # fn main() { try_main().unwrap(); }
//! ```

use std::fmt::{self, Formatter};
use std::str::FromStr;

use strum_macros::AsRefStr;
use thiserror::Error;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sequence::revcomp;

pub mod loc;
mod parser;

pub use self::loc::Loc;

/// A 1-based, inclusive base position.
pub type Position = usize;

/// Operator combining the parts of a compound location.
///
/// `join` means the parts are contiguous in the biological product;
/// `order` only says they occur in the given order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, AsRefStr, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum JoinKind {
    Join,
    Order,
}

/// Location of a feature on the record sequence.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum Location {
    /// A single base.
    Point(Position),
    /// An inclusive range of bases. `fuzzy_start` and `fuzzy_end`
    /// mark partial ends (`<start`, `>end`).
    Range {
        start: Position,
        end: Position,
        fuzzy_start: bool,
        fuzzy_end: bool,
    },
    /// A site between two bases, e.g. a cleavage point.
    Between { before: Position, after: Position },
    Complement(Box<Location>),
    Join { kind: JoinKind, parts: Vec<Location> },
    /// Placeholder for location text that could not be parsed. The
    /// raw text is kept so it can still be shown.
    Unresolved(String),
}

impl Location {
    /// An exact range with no fuzzy ends.
    pub fn range(start: Position, end: Position) -> Self {
        Location::Range {
            start,
            end,
            fuzzy_start: false,
            fuzzy_end: false,
        }
    }

    pub fn complement(inner: Location) -> Self {
        Location::Complement(Box::new(inner))
    }

    pub fn join(parts: Vec<Location>) -> Self {
        Location::Join {
            kind: JoinKind::Join,
            parts,
        }
    }

    pub fn is_resolved(&self) -> bool {
        match self {
            Location::Unresolved(_) => false,
            Location::Complement(inner) => inner.is_resolved(),
            Location::Join { parts, .. } => parts.iter().all(Location::is_resolved),
            _ => true,
        }
    }

    /// Leaf locations (points, ranges and sites) in the order they are
    /// written, ignoring `complement` wrappers.
    pub fn leaves(&self) -> Vec<&Location> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a Location>) {
        match self {
            Location::Complement(inner) => inner.collect_leaves(leaves),
            Location::Join { parts, .. } => {
                for part in parts {
                    part.collect_leaves(leaves);
                }
            }
            Location::Unresolved(_) => (),
            leaf => leaves.push(leaf),
        }
    }

    /// Bases of `sequence` covered by this location, read on the
    /// location's strand: parts of a join are concatenated in order and
    /// a complement yields the reverse complement of its inner
    /// location.
    ///
    /// Returns `None` for unresolved locations and for locations that
    /// reach past the end of `sequence`.
    ///
    /// ```
    /// use bio_genbank::location::Location;
    /// let loc: Location = "complement(join(1..2,5..6))".parse().unwrap();
    /// assert_eq!(loc.extract("AACCGGTT").as_deref(), Some("CCTT"));
    /// ```
    pub fn extract(&self, sequence: &str) -> Option<String> {
        match self {
            Location::Point(pos) => slice(sequence, *pos, *pos).map(str::to_owned),
            Location::Range { start, end, .. } => slice(sequence, *start, *end).map(str::to_owned),
            Location::Between { .. } => Some(String::new()),
            Location::Complement(inner) => inner.extract(sequence).map(|s| revcomp(&s)),
            Location::Join { parts, .. } => {
                let mut out = String::new();
                for part in parts {
                    out.push_str(&part.extract(sequence)?);
                }
                Some(out)
            }
            Location::Unresolved(_) => None,
        }
    }
}

fn slice(sequence: &str, start: Position, end: Position) -> Option<&str> {
    if start == 0 {
        return None;
    }
    sequence.get((start - 1)..end)
}

impl fmt::Display for Location {
    /// Canonical GenBank text for the location.
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Location::Point(pos) => write!(f, "{}", pos),
            Location::Range {
                start,
                end,
                fuzzy_start,
                fuzzy_end,
            } => write!(
                f,
                "{}{}..{}{}",
                if *fuzzy_start { "<" } else { "" },
                start,
                if *fuzzy_end { ">" } else { "" },
                end
            ),
            Location::Between { before, after } => write!(f, "{}^{}", before, after),
            Location::Complement(inner) => write!(f, "complement({})", inner),
            Location::Join { kind, parts } => {
                write!(f, "{}(", kind)?;
                let mut sep = false;
                for part in parts {
                    write!(f, "{}{}", if sep { "," } else { "" }, part)?;
                    sep = true;
                }
                write!(f, ")")
            }
            Location::Unresolved(raw) => f.write_str(raw),
        }
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse(s)
    }
}

/// Parse location text into a `Location` tree.
pub fn parse_location(text: &str) -> Result<Location, LocationError> {
    text.parse()
}

/// Errors that arise in parsing location text. Offsets count
/// characters after whitespace has been removed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("empty location")]
    Empty,
    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },
    #[error("location ended early, expected {expected}")]
    UnexpectedEnd { expected: String },
    #[error("unexpected trailing text {rest:?}")]
    TrailingInput { rest: String },
    #[error("invalid position {text:?}")]
    InvalidPosition { text: String },
    #[error("range end {end} precedes start {start}")]
    EndBeforeStart { start: Position, end: Position },
    #[error("{kind}() without any parts")]
    EmptyJoin { kind: JoinKind },
    #[error("operators nested more than {limit} deep")]
    TooDeep { limit: usize },
}
