// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors and diagnostics.
//!
//! A problem confined to one feature, qualifier or sequence line is
//! recorded as a [`Diagnostic`] on the record it belongs to, and the
//! record is still returned. Only problems with the record structure
//! itself ([`Error::Structural`]) or with reading the input
//! ([`Error::Io`]) replace a record with an error.

use std::fmt::{self, Formatter};
use std::io;

use strum_macros::AsRefStr;
use thiserror::Error;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::location::LocationError;
use crate::qualifier::QualifierIssue;
use crate::sequence::SequenceError;

/// Errors that replace a record in the output stream.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {kind}")]
    Structural {
        line: usize,
        kind: StructuralErrorKind,
    },
}

impl Error {
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::Structural { .. })
    }

    /// Input line the error was detected on, for structural errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Structural { line, .. } => Some(*line),
            Error::Io(_) => None,
        }
    }
}

/// Ways a record can be structurally broken.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuralErrorKind {
    #[error("expected a LOCUS line to start a record")]
    ExpectedLocus,
    #[error("LOCUS line without a locus name")]
    MissingLocusName,
    #[error("ORIGIN section before the FEATURES table")]
    OriginBeforeFeatures,
    #[error("second FEATURES table in one record")]
    DuplicateFeatures,
    #[error("new record started before '//' terminated the previous one")]
    UnterminatedRecord,
    #[error("input ended inside a record")]
    Truncated,
    #[error("record has neither an accession nor a locus name")]
    MissingAccession,
}

/// How serious a diagnostic is. Errors mean part of the record could
/// not be read (a location, or the sequence); warnings flag data that
/// was read but looks inconsistent.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// What a diagnostic is about.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    #[error("location {text:?} of feature #{index} ({kind}) is invalid: {error}")]
    LocationSyntax {
        /// 1-based position of the feature in the table.
        index: usize,
        kind: String,
        text: String,
        error: LocationError,
    },
    #[error("sequence is incomplete: {0}")]
    SequenceIntegrity(SequenceError),
    #[error("LOCUS declares {declared} bases but the sequence has {assembled}")]
    LengthMismatch { declared: usize, assembled: usize },
    #[error("qualifier of feature #{index} ({kind}): {issue}")]
    QualifierSyntax {
        index: usize,
        kind: String,
        issue: QualifierIssue,
    },
    #[error("feature table line {text:?} does not belong to a feature")]
    OrphanContinuation { text: String },
    #[error("header line {text:?} does not continue a field")]
    OrphanHeaderLine { text: String },
    #[error("no ACCESSION; using locus name {name:?}")]
    MissingAccession { name: String },
    #[error("accession {accession:?} already appeared earlier in the input")]
    DuplicateAccession { accession: String },
    #[error("LOCUS line {text:?} has no sequence length")]
    InvalidLocus { text: String },
    #[error("line is not valid UTF-8; invalid bytes were replaced")]
    InvalidText,
}

/// A recoverable problem found while reading a record.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(new, Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based input line the problem was found on.
    pub line: usize,
    pub severity: Severity,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn warning(line: usize, kind: DiagnosticKind) -> Self {
        Diagnostic::new(line, Severity::Warning, kind)
    }

    pub fn error(line: usize, kind: DiagnosticKind) -> Self {
        Diagnostic::new(line, Severity::Error, kind)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Log the diagnostic and add it to `sink`.
    pub(crate) fn emit(self, sink: &mut Vec<Diagnostic>) {
        warn!(line = self.line, severity = %self.severity, "{}", self.kind);
        sink.push(self);
    }

    /// Add the diagnostic to `sink` without logging it.
    pub(crate) fn record(self, sink: &mut Vec<Diagnostic>) {
        debug!(line = self.line, severity = %self.severity, "{}", self.kind);
        sink.push(self);
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.severity, self.kind)
    }
}
