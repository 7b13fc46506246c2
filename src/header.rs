// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Record header: the keyword fields above the feature table.

use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use regex::Regex;
use strum_macros::AsRefStr;

use crate::error::StructuralErrorKind;

/// One header field. Wrapped values are joined with single spaces.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(new, Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub name: String,
    pub value: String,
}

/// Shape of the sequence molecule.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Topology {
    Linear,
    Circular,
}

impl FromStr for Topology {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("linear") {
            Ok(Topology::Linear)
        } else if s.eq_ignore_ascii_case("circular") {
            Ok(Topology::Circular)
        } else {
            Err(())
        }
    }
}

/// The parsed LOCUS line.
///
/// Only the name is required. The other columns have moved around
/// between format releases, so they are recognized by their shape
/// rather than by position.
///
/// ```
/// use bio_genbank::header::{Locus, Topology};
/// let locus: Locus = "NC_001422  5386 bp  DNA  circular PHG 06-JAN-2023".parse().unwrap();
/// assert_eq!(locus.name, "NC_001422");
/// assert_eq!(locus.length, Some(5386));
/// assert_eq!(locus.molecule.as_deref(), Some("DNA"));
/// assert_eq!(locus.topology, Some(Topology::Circular));
/// assert_eq!(locus.division.as_deref(), Some("PHG"));
/// assert_eq!(locus.date.as_deref(), Some("06-JAN-2023"));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locus {
    pub name: String,
    /// Declared sequence length.
    pub length: Option<usize>,
    pub molecule: Option<String>,
    pub topology: Option<Topology>,
    pub division: Option<String>,
    pub date: Option<String>,
}

lazy_static! {
    static ref LENGTH_RE: Regex = Regex::new(r"\b(\d+)\s*(?:bp|aa)\b").unwrap();
    static ref DATE_RE: Regex = Regex::new(r"^\d{1,2}-[A-Za-z]{3}-\d{4}$").unwrap();
}

impl FromStr for Locus {
    type Err = StructuralErrorKind;

    /// Parse the value of a LOCUS line, i.e. the text after the keyword.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let name = tokens
            .next()
            .ok_or(StructuralErrorKind::MissingLocusName)?
            .to_owned();

        let mut locus = Locus {
            name,
            length: None,
            molecule: None,
            topology: None,
            division: None,
            date: None,
        };

        let rest = match LENGTH_RE.captures(s) {
            Some(caps) => {
                locus.length = caps.get(1).and_then(|m| m.as_str().parse().ok());
                caps.get(0).map_or("", |m| &s[m.end()..])
            }
            None => {
                let after_name = s.trim_start()[locus.name.len()..].trim_start();
                let first = after_name.split_whitespace().next().unwrap_or_default();
                match first.parse() {
                    Ok(length) => {
                        locus.length = Some(length);
                        &after_name[first.len()..]
                    }
                    Err(_) => after_name,
                }
            }
        };

        for token in rest.split_whitespace() {
            if DATE_RE.is_match(token) {
                locus.date = Some(token.to_owned());
            } else if let Ok(topology) = token.parse() {
                locus.topology = Some(topology);
            } else if locus.molecule.is_none()
                && locus.topology.is_none()
                && locus.division.is_none()
            {
                locus.molecule = Some(token.to_owned());
            } else {
                locus.division = Some(token.to_owned());
            }
        }

        Ok(locus)
    }
}

/// All header fields of a record, in input order, with typed
/// accessors for the common ones.
///
/// Sub-fields (ORGANISM under SOURCE, AUTHORS under REFERENCE, ...)
/// are kept as fields of their own.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    fields: Vec<HeaderField>,
    locus: Option<Locus>,
}

impl Header {
    pub fn new() -> Self {
        Header::default()
    }

    pub fn push<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.fields.push(HeaderField::new(name.into(), value.into()));
    }

    /// Continue the value of the last field with wrapped text. Returns
    /// `false` when there is no field to continue.
    pub fn append(&mut self, text: &str) -> bool {
        match self.fields.last_mut() {
            Some(field) => {
                if !field.value.is_empty() {
                    field.value.push(' ');
                }
                field.value.push_str(text);
                true
            }
            None => false,
        }
    }

    pub fn set_locus(&mut self, locus: Locus) {
        self.locus = Some(locus);
    }

    pub fn locus(&self) -> Option<&Locus> {
        self.locus.as_ref()
    }

    /// Value of the first field called `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    /// Values of every field called `name`, e.g. each REFERENCE.
    pub fn fields_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |field| field.name == name)
            .map(|field| field.value.as_str())
    }

    pub fn fields(&self) -> &[HeaderField] {
        &self.fields
    }

    pub fn definition(&self) -> Option<&str> {
        self.field("DEFINITION")
    }

    /// Primary accession followed by any secondary accessions.
    pub fn accessions(&self) -> Vec<&str> {
        self.field("ACCESSION")
            .map(|value| value.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Versioned accession, e.g. `U49845.1`.
    pub fn version(&self) -> Option<&str> {
        self.field("VERSION")
            .and_then(|value| value.split_whitespace().next())
    }

    /// Keywords, without the closing `.`. A KEYWORDS line holding only
    /// `.` gives no keywords.
    pub fn keywords(&self) -> Vec<&str> {
        self.field("KEYWORDS")
            .map(|value| {
                value
                    .trim_end_matches('.')
                    .split(';')
                    .map(str::trim)
                    .filter(|keyword| !keyword.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn source(&self) -> Option<&str> {
        self.field("SOURCE")
    }

    pub fn organism(&self) -> Option<&str> {
        self.field("ORGANISM")
    }
}
