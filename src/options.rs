// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Settings that adjust how records are read.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parser configuration.
///
/// The defaults follow the usual reading of GenBank files. With the
/// `serde` feature the options can be loaded from any serde format;
/// missing keys keep their default values.
///
/// ```
/// use bio_genbank::ParseOptions;
/// let options = ParseOptions::default().preserve_case(true);
/// assert!(options.preserve_case);
/// assert!(options.check_length);
/// assert!(options.is_unspaced("translation"));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Keep sequence letters as written instead of uppercasing them.
    pub preserve_case: bool,
    /// Log a warning when the LOCUS length differs from the assembled
    /// sequence. The mismatch is kept in the record's diagnostics
    /// either way.
    pub check_length: bool,
    /// Qualifiers whose wrapped lines are merged without a separating
    /// space, because their values are one long token.
    pub unspaced_qualifiers: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            preserve_case: false,
            check_length: true,
            unspaced_qualifiers: vec!["translation".to_owned()],
        }
    }
}

impl ParseOptions {
    pub fn preserve_case(mut self, preserve_case: bool) -> Self {
        self.preserve_case = preserve_case;
        self
    }

    pub fn check_length(mut self, check_length: bool) -> Self {
        self.check_length = check_length;
        self
    }

    pub fn unspaced_qualifiers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unspaced_qualifiers = names.into_iter().map(Into::into).collect();
        self
    }

    /// Whether continuation lines of qualifier `name` are merged
    /// without a space.
    pub fn is_unspaced(&self, name: &str) -> bool {
        self.unspaced_qualifiers.iter().any(|q| q == name)
    }
}
