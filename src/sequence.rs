// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Nucleotide sequences: reassembly from ORIGIN blocks, and the
//! fixed-width renderings used for display and export.

use thiserror::Error;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bases per line of a rendered ORIGIN block.
pub const ORIGIN_LINE_WIDTH: usize = 60;
/// Bases per space-separated group within an ORIGIN line.
pub const ORIGIN_GROUP_WIDTH: usize = 10;

/// Whether `base` is an IUPAC nucleotide code (either case).
pub fn is_nucleotide(base: char) -> bool {
    matches!(
        base.to_ascii_uppercase(),
        'A' | 'C' | 'G' | 'T' | 'U' | 'R' | 'Y' | 'S' | 'W' | 'K' | 'M' | 'B' | 'D' | 'H' | 'V'
            | 'N'
    )
}

/// IUPAC complement of a single base, preserving case. Characters
/// without a complement are returned unchanged.
pub fn complement_base(base: char) -> char {
    let comp = match base.to_ascii_uppercase() {
        'A' => 'T',
        'C' => 'G',
        'G' => 'C',
        'T' | 'U' => 'A',
        'R' => 'Y',
        'Y' => 'R',
        'K' => 'M',
        'M' => 'K',
        'B' => 'V',
        'V' => 'B',
        'D' => 'H',
        'H' => 'D',
        other => other,
    };
    if base.is_ascii_lowercase() {
        comp.to_ascii_lowercase()
    } else {
        comp
    }
}

/// Reverse complement of a sequence.
///
/// ```
/// use bio_genbank::sequence::revcomp;
/// assert_eq!(revcomp("ATGCn"), "nGCAT");
/// ```
pub fn revcomp(sequence: &str) -> String {
    sequence.chars().rev().map(complement_base).collect()
}

/// Break a sequence into lines of `line_width` characters; the last
/// line holds the remainder. A width of 0 puts the whole sequence on
/// one line, and an empty sequence yields no lines.
///
/// ```
/// use bio_genbank::sequence::format_sequence;
/// assert_eq!(format_sequence("ACGTACGTAC", 4), vec!["ACGT", "ACGT", "AC"]);
/// ```
pub fn format_sequence(sequence: &str, line_width: usize) -> Vec<String> {
    if sequence.is_empty() {
        return Vec::new();
    }
    if line_width == 0 {
        return vec![sequence.to_owned()];
    }
    sequence
        .as_bytes()
        .chunks(line_width)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect()
}

/// Render a sequence as the body of a GenBank ORIGIN block: each line
/// starts with the right-justified 1-based offset of its first base,
/// followed by up to 60 lowercase bases in groups of 10.
///
/// ```
/// use bio_genbank::sequence::format_origin;
/// assert_eq!(format_origin("ACGTACGTACGT"), "        1 acgtacgtac gt\n");
/// ```
pub fn format_origin(sequence: &str) -> String {
    let mut out = String::new();
    for (i, line) in sequence.as_bytes().chunks(ORIGIN_LINE_WIDTH).enumerate() {
        out.push_str(&format!("{:>9}", i * ORIGIN_LINE_WIDTH + 1));
        for group in line.chunks(ORIGIN_GROUP_WIDTH) {
            out.push(' ');
            out.push_str(&String::from_utf8_lossy(group).to_ascii_lowercase());
        }
        out.push('\n');
    }
    out
}

/// Reasons a record's ORIGIN block cannot be assembled.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("sequence block {found} does not follow block {previous}")]
    NonIncreasing { previous: usize, found: usize },
    #[error("sequence block starts at {found}, expected {expected}: bases are missing")]
    Gap { expected: usize, found: usize },
    #[error("sequence block starts at {found}, expected {expected}: bases overlap")]
    Overlap { expected: usize, found: usize },
    #[error("invalid base {base:?} at position {position}")]
    InvalidBase { position: usize, base: char },
    #[error("malformed sequence line {text:?}")]
    MalformedLine { text: String },
}

/// Rebuilds a record's sequence from its numbered ORIGIN lines.
///
/// Every block must start right after the bases accumulated so far;
/// line widths are not checked. The first error stops assembly: the
/// bases gathered up to that point are kept and later blocks are
/// ignored.
///
/// ```
/// use bio_genbank::sequence::SequenceAssembler;
/// let mut assembler = SequenceAssembler::new(false);
/// assembler.push(1, &["acgtacgtac", "gg"]).unwrap();
/// assembler.push(13, &["tt"]).unwrap();
/// assert_eq!(assembler.finish(), "ACGTACGTACGGTT");
/// ```
#[derive(Debug, Default)]
pub struct SequenceAssembler {
    bases: String,
    last_block: Option<usize>,
    preserve_case: bool,
    failed: bool,
}

impl SequenceAssembler {
    /// Create an empty assembler. Bases are uppercased unless
    /// `preserve_case` is set.
    pub fn new(preserve_case: bool) -> Self {
        SequenceAssembler {
            preserve_case,
            ..Default::default()
        }
    }

    /// Append one sequence line, given its declared starting offset and
    /// its base chunks. Calls after a failure are ignored.
    pub fn push<S: AsRef<str>>(
        &mut self,
        block_start: usize,
        chunks: &[S],
    ) -> Result<(), SequenceError> {
        if self.failed {
            return Ok(());
        }
        let checked = self.check(block_start, chunks);
        if checked.is_err() {
            self.failed = true;
            return checked;
        }

        for chunk in chunks {
            if self.preserve_case {
                self.bases.push_str(chunk.as_ref());
            } else {
                self.bases.push_str(&chunk.as_ref().to_ascii_uppercase());
            }
        }
        self.last_block = Some(block_start);
        Ok(())
    }

    fn check<S: AsRef<str>>(&self, block_start: usize, chunks: &[S]) -> Result<(), SequenceError> {
        if let Some(previous) = self.last_block {
            if block_start <= previous {
                return Err(SequenceError::NonIncreasing {
                    previous,
                    found: block_start,
                });
            }
        }

        let expected = self.bases.len() + 1;
        if block_start > expected {
            return Err(SequenceError::Gap {
                expected,
                found: block_start,
            });
        } else if block_start < expected {
            return Err(SequenceError::Overlap {
                expected,
                found: block_start,
            });
        }

        let mut position = expected;
        for chunk in chunks {
            for base in chunk.as_ref().chars() {
                if !is_nucleotide(base) {
                    return Err(SequenceError::InvalidBase { position, base });
                }
                position += 1;
            }
        }
        Ok(())
    }

    /// Stop assembly, e.g. after a malformed line was seen.
    pub fn abandon(&mut self) {
        self.failed = true;
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Number of bases assembled so far.
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// The assembled sequence.
    pub fn finish(self) -> String {
        self.bases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(sequence: &str) -> Vec<(usize, Vec<String>)> {
        sequence
            .as_bytes()
            .chunks(ORIGIN_LINE_WIDTH)
            .enumerate()
            .map(|(i, line)| {
                let chunks = line
                    .chunks(ORIGIN_GROUP_WIDTH)
                    .map(|g| String::from_utf8_lossy(g).into_owned())
                    .collect();
                (i * ORIGIN_LINE_WIDTH + 1, chunks)
            })
            .collect()
    }

    #[test]
    fn assembles_125_bases() {
        let seq: String = "acgt".repeat(32)[..125].to_owned();
        let mut assembler = SequenceAssembler::new(false);
        let lines = blocks(&seq);
        assert_eq!(
            lines.iter().map(|(start, _)| *start).collect::<Vec<_>>(),
            vec![1, 61, 121]
        );
        for (start, chunks) in &lines {
            assembler.push(*start, chunks).unwrap();
        }
        let assembled = assembler.finish();
        assert_eq!(assembled.len(), 125);
        assert_eq!(assembled, seq.to_ascii_uppercase());
    }

    #[test]
    fn gap_is_an_error() {
        let seq = "a".repeat(60);
        let mut assembler = SequenceAssembler::new(false);
        assembler.push(1, &[&seq[..]]).unwrap();
        assert_eq!(
            assembler.push(62, &["acgt"]),
            Err(SequenceError::Gap {
                expected: 61,
                found: 62
            })
        );
        assert!(assembler.is_failed());
        // later blocks are ignored, the prefix is kept
        assert_eq!(assembler.push(61, &["acgt"]), Ok(()));
        assert_eq!(assembler.finish().len(), 60);
    }

    #[test]
    fn overlap_is_an_error() {
        let mut assembler = SequenceAssembler::new(false);
        assembler.push(1, &["acgtacgtac"]).unwrap();
        assert_eq!(
            assembler.push(5, &["acgt"]),
            Err(SequenceError::Overlap {
                expected: 11,
                found: 5
            })
        );
    }

    #[test]
    fn decreasing_block_is_an_error() {
        let mut assembler = SequenceAssembler::new(false);
        assembler.push(1, &[] as &[&str]).unwrap();
        assert_eq!(
            assembler.push(1, &["acgt"]),
            Err(SequenceError::NonIncreasing {
                previous: 1,
                found: 1
            })
        );
    }

    #[test]
    fn first_block_must_start_at_one() {
        let mut assembler = SequenceAssembler::new(false);
        assert_eq!(
            assembler.push(61, &["acgt"]),
            Err(SequenceError::Gap {
                expected: 1,
                found: 61
            })
        );
    }

    #[test]
    fn invalid_base() {
        let mut assembler = SequenceAssembler::new(false);
        assert_eq!(
            assembler.push(1, &["acgtn", "ac9t"]),
            Err(SequenceError::InvalidBase {
                position: 8,
                base: '9'
            })
        );
        assert!(assembler.is_empty());
    }

    #[test]
    fn preserve_case() {
        let mut assembler = SequenceAssembler::new(true);
        assembler.push(1, &["acGT"]).unwrap();
        assert_eq!(assembler.finish(), "acGT");
    }

    #[test]
    fn formatting() {
        assert!(format_sequence("", 60).is_empty());
        assert_eq!(format_sequence("ACGT", 0), vec!["ACGT"]);
        assert_eq!(format_sequence("ACGT", 4), vec!["ACGT"]);
        let lines = format_sequence(&"A".repeat(125), 60);
        assert_eq!(
            lines.iter().map(String::len).collect::<Vec<_>>(),
            vec![60, 60, 5]
        );
    }

    #[test]
    fn origin_block_reassembles() {
        let seq = "ACGTTGCA".repeat(16);
        let origin = format_origin(&seq);
        let mut lines = origin.lines();
        assert_eq!(
            lines.next(),
            Some("        1 acgttgcaac gttgcaacgt tgcaacgttg caacgttgca acgttgcaac gttgcaacgt")
        );
        assert_eq!(lines.next(), Some("       61 tgcaacgttg caacgttgca acgttgcaac gttgcaacgt tgcaacgttg caacgttgca"));
        assert_eq!(lines.next(), Some("      121 acgttgca"));
        assert_eq!(lines.next(), None);

        let mut assembler = SequenceAssembler::new(false);
        for line in origin.lines() {
            let mut fields = line.split_whitespace();
            let start = fields.next().unwrap().parse().unwrap();
            let chunks: Vec<&str> = fields.collect();
            assembler.push(start, &chunks).unwrap();
        }
        assert_eq!(assembler.finish(), seq);
    }

    #[test]
    fn reverse_complement() {
        assert_eq!(revcomp("AACCGGTT"), "AACCGGTT");
        assert_eq!(revcomp("ATGRYN"), "NRYCAT");
        assert_eq!(complement_base('u'), 'a');
    }
}
