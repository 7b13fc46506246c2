// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Tagging of raw input lines.
//!
//! GenBank records have no delimiters besides the `//` terminator;
//! what a line means depends on its indentation and on the section it
//! appears in. [`classify`] turns one raw line into a [`Line`] given the
//! current [`Section`].

use regex::Regex;
use strum_macros::AsRefStr;

use crate::error::StructuralErrorKind;

/// Column (0-based) where feature kinds start in the feature table.
pub const FEATURE_KIND_COLUMN: usize = 5;
/// Column (0-based) where feature locations and qualifiers start.
pub const QUALIFIER_COLUMN: usize = 21;
/// Column (0-based) where header field values start.
pub const HEADER_VALUE_COLUMN: usize = 12;

/// Section of a record a line is read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Section {
    /// From LOCUS up to the FEATURES marker.
    Header,
    /// The feature table, up to the ORIGIN marker.
    Features,
    /// Sequence data, up to `//`.
    Origin,
}

/// A classified input line. Text borrowed from the line has its
/// indentation and trailing whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// A keyword line, e.g. `DEFINITION  ...` or the `  ORGANISM`
    /// sub-field of SOURCE.
    Header { name: &'a str, value: &'a str },
    /// Wrapped text of the preceding header field.
    HeaderContinuation(&'a str),
    FeaturesMarker,
    /// First line of a feature-table entry.
    FeatureStart { kind: &'a str, location: &'a str },
    /// A wrapped location or a qualifier line.
    FeatureContinuation(&'a str),
    OriginMarker,
    /// A numbered sequence line: the 1-based offset of its first base
    /// and its base chunks.
    SequenceData {
        block_start: usize,
        chunks: Vec<&'a str>,
    },
    /// A line in the ORIGIN section that is not sequence data.
    MalformedSequence(&'a str),
    RecordEnd,
    Blank,
}

lazy_static! {
    static ref KEYWORD_RE: Regex = Regex::new(r"^(BASE COUNT|\S+)\s*(.*)$").unwrap();
    static ref SUBFIELD_RE: Regex = Regex::new(r"^[A-Z][A-Z_]+$").unwrap();
    static ref SEQUENCE_RE: Regex = Regex::new(r"^\s*(\d+)((?:\s+\S+)*)$").unwrap();
}

/// Classify one line read in `section`.
///
/// Fails when the line breaks the order of sections: an ORIGIN marker
/// in the header, or a second FEATURES marker.
///
/// ```
/// use bio_genbank::line::{classify, Line, Section};
/// assert_eq!(
///     classify("     CDS             join(1..10,", Section::Features),
///     Ok(Line::FeatureStart { kind: "CDS", location: "join(1..10," })
/// );
/// assert_eq!(
///     classify("                     /gene=\"thrL\"", Section::Features),
///     Ok(Line::FeatureContinuation("/gene=\"thrL\""))
/// );
/// assert_eq!(classify("//", Section::Origin), Ok(Line::RecordEnd));
/// ```
pub fn classify(line: &str, section: Section) -> Result<Line<'_>, StructuralErrorKind> {
    let line = line.trim_end();
    if line == "//" {
        return Ok(Line::RecordEnd);
    }
    let text = line.trim_start();
    if text.is_empty() {
        return Ok(Line::Blank);
    }
    let indent = line.len() - text.len();

    if indent == 0 {
        let keyword = text.split_whitespace().next().unwrap_or_default();
        match (keyword, section) {
            ("LOCUS", _) => return Ok(keyword_line(text)),
            ("FEATURES", Section::Header) => return Ok(Line::FeaturesMarker),
            ("FEATURES", _) => return Err(StructuralErrorKind::DuplicateFeatures),
            ("ORIGIN", Section::Header) => return Err(StructuralErrorKind::OriginBeforeFeatures),
            ("ORIGIN", Section::Features) => return Ok(Line::OriginMarker),
            _ => (),
        }
    }

    match section {
        Section::Header if indent == 0 => Ok(keyword_line(text)),
        Section::Header => {
            let first = text.split_whitespace().next().unwrap_or_default();
            if indent < HEADER_VALUE_COLUMN && SUBFIELD_RE.is_match(first) {
                Ok(keyword_line(text))
            } else {
                Ok(Line::HeaderContinuation(text))
            }
        }
        Section::Features if indent == 0 => Ok(keyword_line(text)),
        Section::Features if indent <= FEATURE_KIND_COLUMN => {
            let (kind, location) = match text.find(char::is_whitespace) {
                Some(end) => (&text[..end], text[end..].trim_start()),
                None => (text, ""),
            };
            Ok(Line::FeatureStart { kind, location })
        }
        Section::Features => Ok(Line::FeatureContinuation(text)),
        Section::Origin => Ok(sequence_line(line)),
    }
}

fn keyword_line(text: &str) -> Line<'_> {
    match KEYWORD_RE.captures(text) {
        Some(caps) => Line::Header {
            name: caps.get(1).map_or("", |m| m.as_str()),
            value: caps.get(2).map_or("", |m| m.as_str()),
        },
        None => Line::HeaderContinuation(text),
    }
}

fn sequence_line(line: &str) -> Line<'_> {
    let parsed = SEQUENCE_RE.captures(line).and_then(|caps| {
        let block_start = caps.get(1)?.as_str().parse().ok()?;
        let chunks = caps
            .get(2)
            .map_or(Vec::new(), |m| m.as_str().split_whitespace().collect());
        Some(Line::SequenceData {
            block_start,
            chunks,
        })
    });
    parsed.unwrap_or_else(|| Line::MalformedSequence(line.trim_start()))
}
