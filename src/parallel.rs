// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Parsing an in-memory input on several threads.
//!
//! Records never share state, so the input is cut after every `//`
//! line and the pieces are parsed independently with rayon. Line
//! numbers, record order and diagnostics are the same as with the
//! sequential [`Reader`].

use std::collections::HashSet;

use rayon::prelude::*;

use crate::error::{Diagnostic, DiagnosticKind, Error};
use crate::options::ParseOptions;
use crate::reader::Reader;
use crate::record::Record;

/// Parse every record of `input` in parallel. Results are in input
/// order.
///
/// ```
/// use bio_genbank::{parallel::parse_str_parallel, ParseOptions};
/// let input = "\
/// LOCUS       A 4 bp DNA
/// ACCESSION   A1
/// FEATURES             Location/Qualifiers
/// ORIGIN
///         1 acgt
/// //
/// LOCUS       B 4 bp DNA
/// ACCESSION   B1
/// FEATURES             Location/Qualifiers
/// ORIGIN
///         1 ttaa
/// //
/// ";
/// let records = parse_str_parallel(input, &ParseOptions::default());
/// let accessions: Vec<_> = records.iter().map(|r| r.as_ref().unwrap().accession.as_str()).collect();
/// assert_eq!(accessions, vec!["A1", "B1"]);
/// ```
pub fn parse_str_parallel(input: &str, options: &ParseOptions) -> Vec<Result<Record, Error>> {
    let parts = partition(input);
    debug!(partitions = parts.len(), "parsing in parallel");

    let mut results: Vec<Result<Record, Error>> = parts
        .par_iter()
        .map(|&(offset, text)| {
            Reader::with_options(text.as_bytes(), options.clone())
                .line_offset(offset)
                .track_duplicates(false)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    flag_duplicates(&mut results);
    results
}

// Split after each `//` line. Each part comes with the number of lines
// preceding it.
fn partition(input: &str) -> Vec<(usize, &str)> {
    let mut parts = Vec::new();
    let (mut start, mut start_line) = (0, 0);
    let (mut end, mut lines) = (0, 0);
    for line in input.split_inclusive('\n') {
        end += line.len();
        lines += 1;
        if line.trim_end() == "//" {
            parts.push((start_line, &input[start..end]));
            start = end;
            start_line = lines;
        }
    }
    if !input[start..].trim().is_empty() {
        parts.push((start_line, &input[start..]));
    }
    parts
}

fn flag_duplicates(results: &mut [Result<Record, Error>]) {
    let mut seen = HashSet::new();
    for record in results.iter_mut().filter_map(|result| result.as_mut().ok()) {
        if !seen.insert(record.accession.clone()) {
            Diagnostic::warning(
                record.line,
                DiagnosticKind::DuplicateAccession {
                    accession: record.accession.clone(),
                },
            )
            .emit(&mut record.diagnostics);
            record.diagnostics.sort_by_key(|diagnostic| diagnostic.line);
        }
    }
}
