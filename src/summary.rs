// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Plain-text report of a record, as shown by the viewer front end.

use std::fmt::{self, Formatter};
use std::io;

use crate::record::Record;
use crate::sequence::{format_sequence, ORIGIN_LINE_WIDTH};

const MISSING: &str = "N/A";

/// Text report for one record: accession, the wrapped sequence, one
/// line per feature with its `gene` qualifier, and the accession
/// version and molecule type. Diagnostics are listed at the end when
/// there are any.
///
/// ```
/// use bio_genbank::{parse_str, Summary};
/// let input = "\
/// LOCUS       TINY         12 bp    DNA     linear   SYN 01-JAN-2024
/// ACCESSION   T00001
/// VERSION     T00001.2
/// FEATURES             Location/Qualifiers
///      gene            1..12
///                      /gene=\"tny\"
///      misc_feature    3^4
/// ORIGIN
///         1 acgtacgtac gt
/// //
/// ";
/// let record = parse_str(input).next().unwrap().unwrap();
/// let report = Summary::new(&record).line_width(5).to_string();
/// assert_eq!(
///     report,
///     "**Accession**: T00001\n\n\
///      --- DNA ---\nACGTA\nCGTAC\nGT\n\n\
///      Sequence Length: 12\n\n\
///      --- Features ---\n\
///      gene: Location: 1..12, Gene: tny\n\
///      misc_feature: Location: 3^4, Gene: N/A\n\
///      \n--- Accession Information ---\n\
///      Version: T00001.2\nType: DNA\n\n"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Summary<'a> {
    record: &'a Record,
    line_width: usize,
}

impl<'a> Summary<'a> {
    pub fn new(record: &'a Record) -> Self {
        Summary {
            record,
            line_width: ORIGIN_LINE_WIDTH,
        }
    }

    /// Bases per line of the DNA section (60 by default).
    pub fn line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }
}

impl<'a> fmt::Display for Summary<'a> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let record = self.record;
        write!(f, "**Accession**: {}\n\n", record.accession)?;

        f.write_str("--- DNA ---\n")?;
        for line in format_sequence(&record.sequence, self.line_width) {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)?;
        write!(f, "Sequence Length: {}\n\n", record.sequence.len())?;

        f.write_str("--- Features ---\n")?;
        for feature in &record.features {
            let gene = feature
                .qualifier_text("gene")
                .filter(|gene| !gene.is_empty())
                .unwrap_or(MISSING);
            writeln!(
                f,
                "{}: Location: {}, Gene: {}",
                feature.kind, feature.location, gene
            )?;
        }

        let locus = record.header.locus();
        f.write_str("\n--- Accession Information ---\n")?;
        writeln!(f, "Version: {}", record.header.version().unwrap_or(MISSING))?;
        writeln!(
            f,
            "Type: {}",
            locus
                .and_then(|locus| locus.molecule.as_deref())
                .unwrap_or(MISSING)
        )?;
        writeln!(f)?;

        if !record.diagnostics.is_empty() {
            f.write_str("--- Diagnostics ---\n")?;
            for diagnostic in &record.diagnostics {
                writeln!(f, "{}", diagnostic)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Write the summaries of `records` to `out`, one after the other.
pub fn write_summary<'a, W, I>(out: &mut W, records: I, line_width: usize) -> io::Result<()>
where
    W: io::Write,
    I: IntoIterator<Item = &'a Record>,
{
    for record in records {
        write!(out, "{}", Summary::new(record).line_width(line_width))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_str;

    const TWO: &str = "\
LOCUS       ONE 6 bp DNA linear SYN 01-JAN-2024
ACCESSION   A1
FEATURES             Location/Qualifiers
     gene            1..6
                     /gene=\"\"
ORIGIN
        1 acgtac
//
LOCUS       TWO 4 bp
FEATURES             Location/Qualifiers
     CDS             bogus
ORIGIN
        1 ttaa
//
";

    #[test]
    fn missing_values_show_na() {
        let records: Vec<Record> = parse_str(TWO).collect::<Result<_, _>>().unwrap();
        let first = Summary::new(&records[0]).to_string();
        assert!(first.contains("gene: Location: 1..6, Gene: N/A\n"));
        assert!(first.contains("Version: N/A\nType: DNA\n"));
        assert!(!first.contains("--- Diagnostics ---"));

        let second = Summary::new(&records[1]).to_string();
        assert!(second.starts_with("**Accession**: TWO\n"));
        assert!(second.contains("CDS: Location: bogus, Gene: N/A\n"));
        assert!(second.contains("Type: N/A\n"));
        assert!(second.contains("--- Diagnostics ---\nline 9: warning: no ACCESSION"));
        assert!(second.contains("line 11: error: location \"bogus\""));
    }

    #[test]
    fn writes_every_record() {
        let records: Vec<Record> = parse_str(TWO).collect::<Result<_, _>>().unwrap();
        let mut out = Vec::new();
        write_summary(&mut out, &records, 0).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("**Accession**").count(), 2);
        assert!(text.contains("--- DNA ---\nACGTAC\n\nSequence Length: 6\n"));
    }
}
