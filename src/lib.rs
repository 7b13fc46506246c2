// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Reader for GenBank flat files.
//!
//! A GenBank file holds one or more records, each made of a header
//! (LOCUS, DEFINITION, ACCESSION, ...), a feature table whose entries
//! carry a location and `/name=value` qualifiers, and an ORIGIN block
//! with the numbered sequence. [`parse_all`] and [`parse_str`] return a
//! lazy iterator yielding one [`Record`] per `//`-terminated entry.
//!
//! Problems confined to a feature or to the sequence do not discard a
//! record: they are attached to it as [`Diagnostic`]s. Records that are
//! structurally broken come out as [`Error::Structural`], and reading
//! continues with the next record.
//!
//! ```
//! use bio_genbank::location::{Loc, Location};
//! use bio_genbank::strand::Strand;
//!
//! let input = "\
//! LOCUS       SYNTH          30 bp    DNA     linear   SYN 01-JAN-2024
//! DEFINITION  Synthetic construct.
//! ACCESSION   SY000001
//! VERSION     SY000001.1
//! FEATURES             Location/Qualifiers
//!      gene            complement(join(1..10,21..30))
//!                      /gene=\"syn\"
//!                      /note=\"first\"
//!                      /note=\"second\"
//!      misc_feature    <11..>20
//! ORIGIN
//!         1 aaaaaccccc gggggttttt acgtacgtac
//! //
//! ";
//!
//! for record in bio_genbank::parse_str(input) {
//!     let record = record.unwrap();
//!     assert_eq!(record.accession, "SY000001");
//!     assert_eq!(record.sequence.len(), record.length);
//!     assert!(record.diagnostics.is_empty());
//!
//!     let gene = &record.features[0];
//!     assert_eq!(gene.strand(), Strand::Reverse);
//!     assert_eq!(gene.qualifier_values("note").len(), 2);
//!     assert_eq!(bio_genbank::extract_qualifier(gene, "locus_tag"), None);
//!     assert_eq!(record.feature_sequence(gene).as_deref(), Some("GTACGTACGTGGGGGTTTTT"));
//!
//!     assert_eq!(
//!         record.features[1].location,
//!         Location::Range { start: 11, end: 20, fuzzy_start: true, fuzzy_end: true }
//!     );
//! }
//! ```

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate derive_new;
#[macro_use]
extern crate tracing;

use std::io::{BufReader, Read};

pub mod error;
pub mod feature;
pub mod header;
pub mod line;
pub mod location;
pub mod options;
#[cfg(feature = "rayon")]
pub mod parallel;
pub mod qualifier;
pub mod reader;
pub mod record;
pub mod sequence;
pub mod strand;
pub mod summary;

pub use crate::error::{Diagnostic, DiagnosticKind, Error, Severity, StructuralErrorKind};
pub use crate::feature::{extract_qualifier, Feature};
pub use crate::header::{Header, Locus};
pub use crate::location::{Loc, Location, LocationError};
pub use crate::options::ParseOptions;
pub use crate::qualifier::{QualifierValue, Qualifiers};
pub use crate::reader::Reader;
pub use crate::record::Record;
pub use crate::sequence::format_sequence;
pub use crate::summary::{write_summary, Summary};

/// Lazily read every record of `reader`.
pub fn parse_all<R: Read>(reader: R) -> Reader<BufReader<R>> {
    Reader::new(BufReader::new(reader))
}

/// Lazily read every record of an in-memory input.
pub fn parse_str(input: &str) -> Reader<&[u8]> {
    Reader::new(input.as_bytes())
}
