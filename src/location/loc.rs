// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Trait shared by location trees and the features carrying them.

use crate::location::{Location, Position};
use crate::strand::Strand;

/// A region on the record's sequence, possibly spliced from several
/// parts and possibly on the reverse strand.
///
/// Coordinates are 1-based and inclusive. Unresolved locations have no
/// coordinates, so `start` and `end` return `None` for them.
pub trait Loc {
    /// Lowest (left-most) base touched by the location.
    fn start(&self) -> Option<Position>;
    /// Highest (right-most) base touched by the location.
    fn end(&self) -> Option<Position>;
    /// Number of bases covered. Join parts are summed, so overlapping
    /// parts count twice and a site between bases covers none.
    fn length(&self) -> usize;
    /// `Strand` of the location.
    fn strand(&self) -> Strand;

    /// Whether `pos` lies inside one of the parts of the location.
    fn covers(&self, pos: Position) -> bool;
}

impl Loc for Location {
    fn start(&self) -> Option<Position> {
        self.leaves()
            .into_iter()
            .filter_map(|leaf| match *leaf {
                Location::Point(pos) => Some(pos),
                Location::Range { start, .. } => Some(start),
                Location::Between { before, after } => Some(before.min(after)),
                _ => None,
            })
            .min()
    }

    fn end(&self) -> Option<Position> {
        self.leaves()
            .into_iter()
            .filter_map(|leaf| match *leaf {
                Location::Point(pos) => Some(pos),
                Location::Range { end, .. } => Some(end),
                Location::Between { before, after } => Some(before.max(after)),
                _ => None,
            })
            .max()
    }

    fn length(&self) -> usize {
        match self {
            Location::Point(_) => 1,
            Location::Range { start, end, .. } => {
                end.checked_sub(*start).map_or(0, |span| span.saturating_add(1))
            }
            Location::Between { .. } => 0,
            Location::Complement(inner) => inner.length(),
            Location::Join { parts, .. } => parts
                .iter()
                .map(Loc::length)
                .fold(0, usize::saturating_add),
            Location::Unresolved(_) => 0,
        }
    }

    fn strand(&self) -> Strand {
        match self {
            Location::Complement(inner) => inner.strand().reverse(),
            Location::Join { parts, .. } => {
                let mut strands = parts.iter().map(Loc::strand);
                match strands.next() {
                    Some(first) => strands.fold(first, Strand::combine),
                    None => Strand::Unknown,
                }
            }
            Location::Unresolved(_) => Strand::Unknown,
            _ => Strand::Forward,
        }
    }

    fn covers(&self, pos: Position) -> bool {
        self.leaves().into_iter().any(|leaf| match *leaf {
            Location::Point(p) => p == pos,
            Location::Range { start, end, .. } => start <= pos && pos <= end,
            _ => false,
        })
    }
}
