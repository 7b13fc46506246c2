// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Streaming reader yielding one [`Record`] per `//`-terminated entry.
//!
//! The reader is a state machine driven by the tags of
//! [`classify`](crate::line::classify):
//!
//! ```text
//! AwaitingHeader -> InHeader -> InFeatures -> InSequence -> RecordComplete
//! ```
//!
//! with `Failed` reachable from any state when a record turns out to be
//! structurally broken. A failed record is reported as an
//! [`Error::Structural`] and the reader resumes at the next LOCUS line
//! or `//` terminator, so the following records are still returned.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use strum_macros::AsRefStr;

use crate::error::{Diagnostic, DiagnosticKind, Error, StructuralErrorKind};
use crate::feature::FeatureTable;
use crate::header::{Header, Locus};
use crate::line::{classify, Line, Section};
use crate::options::ParseOptions;
use crate::record::Record;
use crate::sequence::{SequenceAssembler, SequenceError};

/// Position of the reader within the record structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, strum_macros::Display)]
pub enum State {
    AwaitingHeader,
    InHeader,
    InFeatures,
    InSequence,
    RecordComplete,
    Failed,
}

impl State {
    fn section(self) -> Section {
        match self {
            State::InFeatures => Section::Features,
            State::InSequence => Section::Origin,
            _ => Section::Header,
        }
    }
}

/// Iterator over the records of a GenBank stream.
///
/// ```
/// use bio_genbank::Reader;
/// let input = "\
/// LOCUS       TINY         12 bp    DNA     linear   SYN 01-JAN-2024
/// ACCESSION   T00001
/// FEATURES             Location/Qualifiers
///      gene            1..12
///                      /gene=\"tny\"
/// ORIGIN
///         1 acgtacgtac gt
/// //
/// ";
/// let records: Vec<_> = Reader::new(input.as_bytes()).collect::<Result<_, _>>().unwrap();
/// assert_eq!(records[0].accession, "T00001");
/// assert_eq!(records[0].sequence, "ACGTACGTACGT");
/// assert_eq!(records[0].features[0].qualifier_text("gene"), Some("tny"));
/// ```
pub struct Reader<R> {
    reader: R,
    line_no: usize,
    /// Last line whose invalid UTF-8 bytes were replaced.
    replaced: Option<usize>,
    pending: Option<(usize, String)>,
    deferred: Option<io::Error>,
    exhausted: bool,
    options: ParseOptions,
    state: State,
    seen: Option<HashSet<String>>,
}

impl Reader<BufReader<File>> {
    /// Read records from the file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        File::open(path).map(|file| Reader::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Reader<R> {
    pub fn new(reader: R) -> Self {
        Reader::with_options(reader, ParseOptions::default())
    }

    pub fn with_options(reader: R, options: ParseOptions) -> Self {
        Reader {
            reader,
            line_no: 0,
            replaced: None,
            pending: None,
            deferred: None,
            exhausted: false,
            options,
            state: State::AwaitingHeader,
            seen: Some(HashSet::new()),
        }
    }

    /// Number lines as if `offset` lines preceded the input. Used when
    /// the input is a slice of a larger file.
    pub fn line_offset(mut self, offset: usize) -> Self {
        self.line_no = offset;
        self
    }

    /// Whether to warn about accessions repeated within the stream
    /// (on by default).
    pub fn track_duplicates(mut self, track: bool) -> Self {
        self.seen = if track { Some(HashSet::new()) } else { None };
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn state(&self) -> State {
        self.state
    }

    fn next_line(&mut self) -> Option<io::Result<(usize, String)>> {
        if let Some(line) = self.pending.take() {
            return Some(Ok(line));
        }
        if self.exhausted {
            return None;
        }
        let mut buf = Vec::new();
        loop {
            match self.reader.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    self.exhausted = true;
                    return None;
                }
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }
        self.line_no += 1;
        let line = match String::from_utf8(buf) {
            Ok(line) => line,
            Err(e) => {
                self.replaced = Some(self.line_no);
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        Some(Ok((self.line_no, line)))
    }

    /// Note on the record when `line` had invalid UTF-8 replaced.
    fn check_text(&self, line: usize, builder: &mut RecordBuilder) {
        if self.replaced == Some(line) {
            Diagnostic::warning(line, DiagnosticKind::InvalidText).emit(&mut builder.diagnostics);
        }
    }

    fn transition(&mut self, next: State) {
        trace!(from = %self.state, to = %next, line = self.line_no, "reader state");
        self.state = next;
    }

    /// Abandon the current record and skip to the next record boundary.
    fn fail(&mut self, line: usize, kind: StructuralErrorKind) -> Error {
        warn!(line, "{}", kind);
        self.transition(State::Failed);
        loop {
            match self.next_line() {
                Some(Ok((line_no, text))) => {
                    if text.trim_end() == "//" {
                        break;
                    }
                    if is_locus(&text) {
                        self.pending = Some((line_no, text));
                        break;
                    }
                }
                Some(Err(e)) => {
                    self.deferred = Some(e);
                    break;
                }
                None => break,
            }
        }
        self.transition(State::AwaitingHeader);
        Error::Structural { line, kind }
    }

    fn read_record(&mut self, start: usize, locus: &str) -> Result<Record, Error> {
        let mut builder = match RecordBuilder::new(start, locus, &self.options) {
            Ok(builder) => builder,
            Err(kind) => return Err(self.fail(start, kind)),
        };
        self.check_text(start, &mut builder);
        self.transition(State::InHeader);

        loop {
            let (line_no, line) = match self.next_line() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.transition(State::Failed);
                    return Err(e.into());
                }
                None => {
                    self.transition(State::Failed);
                    warn!(line = self.line_no, "input ended inside record {}", builder.name);
                    return Err(Error::Structural {
                        line: self.line_no,
                        kind: StructuralErrorKind::Truncated,
                    });
                }
            };

            self.check_text(line_no, &mut builder);
            let tagged = match classify(&line, self.state.section()) {
                Ok(tagged) => tagged,
                Err(kind) => return Err(self.fail(line_no, kind)),
            };

            match tagged {
                Line::RecordEnd => {
                    self.transition(State::RecordComplete);
                    let record = builder.finish(line_no, self.seen.as_mut());
                    self.transition(State::AwaitingHeader);
                    return record.map_err(|kind| Error::Structural {
                        line: line_no,
                        kind,
                    });
                }
                Line::Header { name: "LOCUS", .. } => {
                    // The next record starts here; this one never ended.
                    self.pending = Some((line_no, line.clone()));
                    self.transition(State::Failed);
                    warn!(line = line_no, "record {} is not terminated", builder.name);
                    self.transition(State::AwaitingHeader);
                    return Err(Error::Structural {
                        line: line_no,
                        kind: StructuralErrorKind::UnterminatedRecord,
                    });
                }
                Line::Header { name, value } => {
                    builder.header.push(name, value);
                    if self.state == State::InFeatures {
                        // A keyword line such as CONTIG ends the open
                        // feature; its wrapped lines continue the field.
                        builder.features.close();
                        builder.header_open = true;
                    }
                }
                Line::HeaderContinuation(text) => {
                    if !builder.header.append(text) {
                        Diagnostic::warning(
                            line_no,
                            DiagnosticKind::OrphanHeaderLine {
                                text: text.to_owned(),
                            },
                        )
                        .emit(&mut builder.diagnostics);
                    }
                }
                Line::FeaturesMarker => self.transition(State::InFeatures),
                Line::FeatureStart { kind, location } => {
                    builder.header_open = false;
                    builder.features.start(line_no, kind, location)
                }
                Line::FeatureContinuation(text) if builder.header_open => {
                    builder.header.append(text);
                }
                Line::FeatureContinuation(text) => builder.features.continuation(line_no, text),
                Line::OriginMarker => self.transition(State::InSequence),
                Line::SequenceData {
                    block_start,
                    chunks,
                } => builder.sequence(line_no, block_start, &chunks),
                Line::MalformedSequence(text) => builder.malformed(line_no, text),
                Line::Blank => (),
            }
        }
    }
}

impl<R: BufRead> Iterator for Reader<R> {
    type Item = Result<Record, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(e) = self.deferred.take() {
            return Some(Err(e.into()));
        }
        loop {
            let (line_no, line) = match self.next_line()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            match classify(&line, Section::Header) {
                Ok(Line::Blank) => continue,
                Ok(Line::Header {
                    name: "LOCUS",
                    value,
                }) => return Some(self.read_record(line_no, value)),
                _ => return Some(Err(self.fail(line_no, StructuralErrorKind::ExpectedLocus))),
            }
        }
    }
}

fn is_locus(line: &str) -> bool {
    line.split_whitespace().next() == Some("LOCUS") && !line.starts_with(char::is_whitespace)
}

/// Everything gathered for the record being read.
struct RecordBuilder {
    name: String,
    start: usize,
    header: Header,
    features: FeatureTable,
    assembler: SequenceAssembler,
    diagnostics: Vec<Diagnostic>,
    check_length: bool,
    /// A keyword field inside the feature table takes the following
    /// indented lines.
    header_open: bool,
}

impl RecordBuilder {
    fn new(start: usize, locus: &str, options: &ParseOptions) -> Result<Self, StructuralErrorKind> {
        let parsed: Locus = locus.parse()?;
        let mut diagnostics = Vec::new();
        if parsed.length.is_none() {
            Diagnostic::warning(
                start,
                DiagnosticKind::InvalidLocus {
                    text: locus.to_owned(),
                },
            )
            .emit(&mut diagnostics);
        }

        let mut header = Header::new();
        header.push("LOCUS", locus);
        let name = parsed.name.clone();
        header.set_locus(parsed);

        Ok(RecordBuilder {
            name,
            start,
            header,
            features: FeatureTable::new(options),
            assembler: SequenceAssembler::new(options.preserve_case),
            diagnostics,
            check_length: options.check_length,
            header_open: false,
        })
    }

    fn sequence(&mut self, line: usize, block_start: usize, chunks: &[&str]) {
        if let Err(e) = self.assembler.push(block_start, chunks) {
            Diagnostic::error(line, DiagnosticKind::SequenceIntegrity(e)).emit(&mut self.diagnostics);
        }
    }

    fn malformed(&mut self, line: usize, text: &str) {
        if self.assembler.is_failed() {
            return;
        }
        self.assembler.abandon();
        Diagnostic::error(
            line,
            DiagnosticKind::SequenceIntegrity(SequenceError::MalformedLine {
                text: text.to_owned(),
            }),
        )
        .emit(&mut self.diagnostics);
    }

    fn finish(
        self,
        end: usize,
        seen: Option<&mut HashSet<String>>,
    ) -> Result<Record, StructuralErrorKind> {
        let RecordBuilder {
            name,
            start,
            header,
            features,
            assembler,
            mut diagnostics,
            check_length,
            ..
        } = self;

        let (features, feature_diagnostics) = features.finish();
        diagnostics.extend(feature_diagnostics);

        let complete = !assembler.is_failed();
        let sequence = assembler.finish();
        let declared = header.locus().and_then(|locus| locus.length);
        let length = declared.unwrap_or_else(|| sequence.len());
        if declared.is_some() && length != sequence.len() {
            let mismatch = Diagnostic::warning(
                end,
                DiagnosticKind::LengthMismatch {
                    declared: length,
                    assembled: sequence.len(),
                },
            );
            if check_length {
                mismatch.emit(&mut diagnostics);
            } else {
                mismatch.record(&mut diagnostics);
            }
        }

        let accession = match header.accessions().first() {
            Some(accession) => (*accession).to_owned(),
            None if name.is_empty() => return Err(StructuralErrorKind::MissingAccession),
            None => {
                Diagnostic::warning(start, DiagnosticKind::MissingAccession { name: name.clone() })
                    .emit(&mut diagnostics);
                name
            }
        };

        if let Some(seen) = seen {
            if !seen.insert(accession.clone()) {
                Diagnostic::warning(
                    start,
                    DiagnosticKind::DuplicateAccession {
                        accession: accession.clone(),
                    },
                )
                .emit(&mut diagnostics);
            }
        }

        diagnostics.sort_by_key(|diagnostic| diagnostic.line);
        debug!(
            accession = %accession,
            features = features.len(),
            bases = sequence.len(),
            diagnostics = diagnostics.len(),
            "parsed record"
        );

        Ok(Record {
            accession,
            line: start,
            header,
            sequence,
            length,
            features,
            diagnostics,
            complete,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Topology;
    use crate::location::{Loc, Location};
    use crate::qualifier::QualifierValue;
    use crate::sequence::format_origin;
    use crate::strand::Strand;

    const U49845: &str = "\
LOCUS       SCU49845     120 bp    DNA             PLN       21-JUN-1999
DEFINITION  Saccharomyces cerevisiae TCP1-beta gene, partial cds, and Axl2p
            (AXL2) and Rev7p (REV7) genes, complete cds.
ACCESSION   U49845
VERSION     U49845.1  GI:1293613
KEYWORDS    .
SOURCE      Saccharomyces cerevisiae (baker's yeast)
  ORGANISM  Saccharomyces cerevisiae
            Eukaryota; Fungi; Ascomycota; Saccharomycotina; Saccharomycetes;
            Saccharomycetales; Saccharomycetaceae; Saccharomyces.
FEATURES             Location/Qualifiers
     source          1..120
                     /organism=\"Saccharomyces cerevisiae\"
                     /db_xref=\"taxon:4932\"
                     /chromosome=\"IX\"
     CDS             <1..60
                     /codon_start=3
                     /product=\"TCP1-beta\"
                     /translation=\"SSIYNGISTSGLDLNNGTIADMRQLGIVESYKLKRAVVSSASEA
                     AEVLLRVDNIIRARPRTANRQHM\"
     gene            complement(join(61..70,
                     101..120))
                     /gene=\"REV7\"
                     /note=\"first\"
                     /note=\"second\"
                     /pseudo
BASE COUNT       30 a     30 c     30 g     30 t
ORIGIN
        1 gatcctccat atacaacggt atctccacct caggtttaga tctcaacaac ggaaccattg
       61 ccgacatgag acagttaggt atcgtcgaga gttacaagct aaaacgagca gtagtcagct
//
";

    fn read_all(input: &str) -> Vec<Result<Record, Error>> {
        Reader::new(input.as_bytes()).collect()
    }

    fn structural(result: &Result<Record, Error>) -> Option<(usize, StructuralErrorKind)> {
        match result {
            Err(Error::Structural { line, kind }) => Some((*line, *kind)),
            _ => None,
        }
    }

    #[test]
    fn reads_a_full_record() {
        let records = read_all(U49845);
        assert_eq!(records.len(), 1);
        let record = records[0].as_ref().unwrap();

        assert_eq!(record.accession, "U49845");
        assert_eq!(record.line, 1);
        assert_eq!(record.name(), Some("SCU49845"));
        assert_eq!(record.length, 120);
        assert_eq!(record.sequence.len(), 120);
        assert!(record.length_matches());
        assert!(record.complete);
        assert!(record.diagnostics.is_empty(), "{:?}", record.diagnostics);
        assert!(record.sequence.starts_with("GATCCTCCAT"));

        assert_eq!(record.header.version(), Some("U49845.1"));
        assert!(record.header.keywords().is_empty());
        assert_eq!(
            record.header.definition(),
            Some("Saccharomyces cerevisiae TCP1-beta gene, partial cds, and Axl2p (AXL2) and Rev7p (REV7) genes, complete cds.")
        );
        assert_eq!(record.header.organism(), Some("Saccharomyces cerevisiae Eukaryota; Fungi; Ascomycota; Saccharomycotina; Saccharomycetes; Saccharomycetales; Saccharomycetaceae; Saccharomyces."));
        assert_eq!(
            record.header.field("BASE COUNT"),
            Some("30 a     30 c     30 g     30 t")
        );
        assert!(!record.is_circular());

        let kinds: Vec<&str> = record.features.iter().map(|f| f.kind.as_str()).collect();
        assert_eq!(kinds, vec!["source", "CDS", "gene"]);

        let cds = &record.features[1];
        assert_eq!(
            cds.location,
            Location::Range {
                start: 1,
                end: 60,
                fuzzy_start: true,
                fuzzy_end: false
            }
        );
        assert_eq!(cds.qualifier_text("codon_start"), Some("3"));
        assert_eq!(
            cds.qualifier_text("translation"),
            Some("SSIYNGISTSGLDLNNGTIADMRQLGIVESYKLKRAVVSSASEAAEVLLRVDNIIRARPRTANRQHM")
        );

        let gene = &record.features[2];
        assert_eq!(gene.location.to_string(), "complement(join(61..70,101..120))");
        assert_eq!(gene.strand(), Strand::Reverse);
        assert_eq!(gene.qualifier_values("note").len(), 2);
        assert_eq!(gene.qualifier("pseudo"), Some(&QualifierValue::Flag));
        assert_eq!(record.features_of_kind("gene").count(), 1);
        assert_eq!(
            record.feature_sequence(gene).map(|s| s.len()),
            Some(30)
        );
    }

    #[test]
    fn length_mismatch_is_a_warning() {
        let input = U49845.replace("120 bp", "125 bp");
        let records = read_all(&input);
        let record = records[0].as_ref().unwrap();
        assert!(record.complete);
        assert_eq!(record.length, 125);
        assert_eq!(record.sequence.len(), 120);
        assert_eq!(record.diagnostics.len(), 1);
        assert_eq!(
            record.diagnostics[0].kind,
            DiagnosticKind::LengthMismatch {
                declared: 125,
                assembled: 120
            }
        );
        assert!(!record.has_errors());

        // not logged, but still on the record
        let quiet = Reader::with_options(input.as_bytes(), ParseOptions::default().check_length(false))
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(quiet.diagnostics, record.diagnostics);
    }

    #[test]
    fn sequence_gap_marks_record_incomplete() {
        let input = U49845.replace("       61 ccgacatgag", "       62 ccgacatgag");
        let records = read_all(&input);
        let record = records[0].as_ref().unwrap();
        assert!(!record.complete);
        assert_eq!(record.sequence.len(), 60);
        assert_eq!(record.features.len(), 3);
        assert!(record.has_errors());
        assert_eq!(
            record.diagnostics[0].kind,
            DiagnosticKind::SequenceIntegrity(SequenceError::Gap {
                expected: 61,
                found: 62
            })
        );
        assert_eq!(record.diagnostics[0].line, 30);
        // the mismatch that follows from the gap is reported too
        assert!(record
            .diagnostics
            .iter()
            .any(|d| matches!(d.kind, DiagnosticKind::LengthMismatch { .. })));
    }

    #[test]
    fn bad_location_keeps_the_feature() {
        let input = U49845.replace("<1..60", "<1..60..");
        let records = read_all(&input);
        let record = records[0].as_ref().unwrap();
        assert_eq!(record.features.len(), 3);
        assert_eq!(
            record.features[1].location,
            Location::Unresolved("<1..60..".to_owned())
        );
        assert_eq!(record.diagnostics.len(), 1);
        assert_eq!(record.diagnostics[0].line, 16);
        assert!(matches!(
            record.diagnostics[0].kind,
            DiagnosticKind::LocationSyntax { index: 2, .. }
        ));
    }

    #[test]
    fn several_records_and_recovery() {
        let second = U49845
            .replace("SCU49845", "SECOND")
            .replace("U49845", "X00002");
        let broken = "LOCUS       BROKEN 10 bp DNA\nORIGIN\n        1 acgtacgtac\n//\n";
        let input = format!("{}\n{}{}", U49845, broken, second);

        let records = read_all(&input);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].as_ref().unwrap().accession, "U49845");
        assert_eq!(
            structural(&records[1]),
            Some((34, StructuralErrorKind::OriginBeforeFeatures))
        );
        let last = records[2].as_ref().unwrap();
        assert_eq!(last.accession, "X00002");
        assert_eq!(last.line, 37);
        assert_eq!(last.name(), Some("SECOND"));
        assert!(last.diagnostics.is_empty());
    }

    #[test]
    fn unterminated_record_yields_to_the_next() {
        let first = "LOCUS       FIRST 4 bp DNA\nACCESSION   A1\nFEATURES\nORIGIN\n        1 acgt\n";
        let second = "LOCUS       NEXT 4 bp DNA\nACCESSION   A2\nFEATURES\nORIGIN\n        1 ttaa\n//\n";
        let records = read_all(&format!("{}{}", first, second));
        assert_eq!(records.len(), 2);
        assert_eq!(
            structural(&records[0]),
            Some((6, StructuralErrorKind::UnterminatedRecord))
        );
        assert_eq!(records[1].as_ref().unwrap().sequence, "TTAA");
    }

    #[test]
    fn truncated_input() {
        let input = "LOCUS       CUT 4 bp DNA\nACCESSION   C1\nFEATURES\n     gene   1..4\n";
        let records = read_all(input);
        assert_eq!(records.len(), 1);
        assert_eq!(
            structural(&records[0]),
            Some((4, StructuralErrorKind::Truncated))
        );
    }

    #[test]
    fn text_before_locus() {
        let input = format!("garbage\nmore garbage\n//\n\n{}", U49845);
        let records = read_all(&input);
        assert_eq!(records.len(), 2);
        assert_eq!(
            structural(&records[0]),
            Some((1, StructuralErrorKind::ExpectedLocus))
        );
        assert!(records[1].is_ok());
    }

    #[test]
    fn duplicate_features_marker() {
        let input = "LOCUS       DUP 4 bp DNA\nFEATURES\nFEATURES\n//\nLOCUS       OK 0 bp DNA\nFEATURES\n//\n";
        let records = read_all(input);
        assert_eq!(
            structural(&records[0]),
            Some((3, StructuralErrorKind::DuplicateFeatures))
        );
        let ok = records[1].as_ref().unwrap();
        assert_eq!(ok.accession, "OK");
        assert!(matches!(
            ok.diagnostics[0].kind,
            DiagnosticKind::MissingAccession { .. }
        ));
    }

    #[test]
    fn duplicate_accessions_are_flagged() {
        let input = format!("{}{}", U49845, U49845);
        let records = read_all(&input);
        assert!(records[0].as_ref().unwrap().diagnostics.is_empty());
        let again = records[1].as_ref().unwrap();
        assert_eq!(
            again.diagnostics[0].kind,
            DiagnosticKind::DuplicateAccession {
                accession: "U49845".to_owned()
            }
        );

        let untracked: Vec<_> = Reader::new(input.as_bytes())
            .track_duplicates(false)
            .collect();
        assert!(untracked[1].as_ref().unwrap().diagnostics.is_empty());
    }

    #[test]
    fn malformed_sequence_line() {
        let input = "LOCUS       M 8 bp DNA\nACCESSION   M1\nFEATURES\nORIGIN\n        1 acgt\n   junk here\n        5 acgt\n//\n";
        let record = Reader::new(input.as_bytes()).next().unwrap().unwrap();
        assert!(!record.complete);
        assert_eq!(record.sequence, "ACGT");
        assert_eq!(record.diagnostics[0].line, 6);
        assert!(record.has_errors());
    }

    #[test]
    fn circular_origin_round_trip() {
        let sequence = "ACGTTGCA".repeat(20);
        let input = format!(
            "LOCUS       CIRC {} bp DNA circular SYN 01-JAN-2024\nACCESSION   C0\nFEATURES\nORIGIN\n{}//\n",
            sequence.len(),
            format_origin(&sequence)
        );
        let record = Reader::new(input.as_bytes()).next().unwrap().unwrap();
        assert_eq!(record.sequence, sequence);
        assert!(record.is_circular());
        assert_eq!(
            record.header.locus().and_then(|l| l.topology),
            Some(Topology::Circular)
        );
    }

    #[test]
    fn wrapped_keyword_field_in_feature_table() {
        let input = "\
LOCUS       WRAP 8 bp DNA
ACCESSION   W1
FEATURES             Location/Qualifiers
     gene            1..8
                     /gene=\"w\"
CONTIG      join(AB000001.1:1..4,
            AB000002.1:1..4)
     misc_feature    2..3
ORIGIN
        1 acgtacgt
//
";
        let record = Reader::new(input.as_bytes()).next().unwrap().unwrap();
        assert!(record.diagnostics.is_empty(), "{:?}", record.diagnostics);
        assert_eq!(record.features.len(), 2);
        assert_eq!(record.features[0].location, Location::range(1, 8));
        assert_eq!(record.features[0].qualifier_text("gene"), Some("w"));
        assert_eq!(record.features[1].location, Location::range(2, 3));
        assert_eq!(
            record.header.field("CONTIG"),
            Some("join(AB000001.1:1..4, AB000002.1:1..4)")
        );
    }

    #[test]
    fn invalid_utf8_stays_in_its_record() {
        let text = "\
LOCUS       A 4 bp DNA
ACCESSION   A1
  TITLE     Caf# culture
FEATURES
ORIGIN
        1 acgt
//
LOCUS       B 4 bp DNA
ACCESSION   B1
FEATURES
ORIGIN
        1 ttaa
//
";
        // Latin-1 e-acute in place of '#'
        let input: Vec<u8> = text
            .bytes()
            .map(|b| if b == b'#' { 0xE9 } else { b })
            .collect();
        let records: Vec<_> = Reader::new(&input[..]).collect();
        assert_eq!(records.len(), 2);

        let first = records[0].as_ref().unwrap();
        assert_eq!(first.header.field("TITLE"), Some("Caf\u{FFFD} culture"));
        assert_eq!(
            first.diagnostics,
            vec![Diagnostic::warning(3, DiagnosticKind::InvalidText)]
        );
        assert_eq!(first.sequence, "ACGT");

        let second = records[1].as_ref().unwrap();
        assert_eq!(second.accession, "B1");
        assert!(second.diagnostics.is_empty());
    }

    #[test]
    fn crlf_line_endings() {
        let input = "LOCUS       W 4 bp DNA\r\nACCESSION   W1\r\nFEATURES\r\nORIGIN\r\n        1 acgt\r\n//\r\n";
        let record = Reader::new(input.as_bytes()).next().unwrap().unwrap();
        assert_eq!(record.accession, "W1");
        assert_eq!(record.sequence, "ACGT");
        assert!(record.diagnostics.is_empty());
    }

    #[test]
    fn line_offset_shifts_reported_lines() {
        let input = "LOCUS       CUT 4 bp DNA\n";
        let mut reader = Reader::new(input.as_bytes()).line_offset(100);
        assert_eq!(
            structural(&reader.next().unwrap()),
            Some((101, StructuralErrorKind::Truncated))
        );
        assert!(reader.next().is_none());
        assert_eq!(reader.state(), State::Failed);
    }
}
