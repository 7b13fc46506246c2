// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Feature table entries and the parser that builds them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Diagnostic, DiagnosticKind};
use crate::location::{Loc, Location, Position};
use crate::options::ParseOptions;
use crate::qualifier::{parse_qualifiers, QualifierValue, Qualifiers};
use crate::strand::Strand;

/// One entry of the feature table.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(new, Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    /// Feature key as written, e.g. `gene`, `CDS` or `misc_feature`.
    pub kind: String,
    pub location: Location,
    pub qualifiers: Qualifiers,
}

impl Feature {
    /// First value of qualifier `name`.
    pub fn qualifier(&self, name: &str) -> Option<&QualifierValue> {
        self.qualifiers.first(name)
    }

    /// Every value of qualifier `name`, in input order.
    pub fn qualifier_values(&self, name: &str) -> &[QualifierValue] {
        self.qualifiers.get(name).unwrap_or(&[])
    }

    /// Text of the first value of qualifier `name`; `None` when the
    /// qualifier is missing or is a flag.
    pub fn qualifier_text(&self, name: &str) -> Option<&str> {
        self.qualifier(name).and_then(QualifierValue::text)
    }

    pub fn is_resolved(&self) -> bool {
        self.location.is_resolved()
    }
}

impl Loc for Feature {
    fn start(&self) -> Option<Position> {
        self.location.start()
    }

    fn end(&self) -> Option<Position> {
        self.location.end()
    }

    fn length(&self) -> usize {
        self.location.length()
    }

    fn strand(&self) -> Strand {
        self.location.strand()
    }

    fn covers(&self, pos: Position) -> bool {
        self.location.covers(pos)
    }
}

/// First value of qualifier `name` on `feature`, or `None` if the
/// feature has no such qualifier. A flag qualifier and an empty value
/// are both `Some`.
///
/// ```
/// use bio_genbank::feature::{extract_qualifier, Feature};
/// use bio_genbank::location::Location;
/// use bio_genbank::qualifier::{QualifierValue, Qualifiers};
///
/// let mut qualifiers = Qualifiers::new();
/// qualifiers.push("note", QualifierValue::Text(String::new()));
/// let feature = Feature::new("misc_feature".to_owned(), Location::Point(7), qualifiers);
/// assert_eq!(extract_qualifier(&feature, "gene"), None);
/// assert_eq!(
///     extract_qualifier(&feature, "note"),
///     Some(&QualifierValue::Text(String::new()))
/// );
/// ```
pub fn extract_qualifier<'a>(feature: &'a Feature, name: &str) -> Option<&'a QualifierValue> {
    feature.qualifier(name)
}

/// A feature whose lines are still being read.
struct Draft {
    line: usize,
    kind: String,
    location: String,
    qualifier_lines: Vec<(usize, String)>,
}

/// Builds the features of one record from its feature-table lines.
///
/// Each entry's location text runs until the first line starting with
/// `/`; the rest of its lines form the qualifier block. An entry is
/// finalized when the next one starts or when the table is finished.
///
/// ```
/// use bio_genbank::feature::FeatureTable;
/// use bio_genbank::location::Location;
/// use bio_genbank::ParseOptions;
///
/// let mut table = FeatureTable::new(&ParseOptions::default());
/// table.start(10, "CDS", "join(1..10,");
/// table.continuation(11, "20..30)");
/// table.continuation(12, "/gene=\"abc\"");
/// let (features, diagnostics) = table.finish();
/// assert!(diagnostics.is_empty());
/// assert_eq!(
///     features[0].location,
///     Location::join(vec![Location::range(1, 10), Location::range(20, 30)])
/// );
/// assert_eq!(features[0].qualifier_text("gene"), Some("abc"));
/// ```
pub struct FeatureTable {
    options: ParseOptions,
    features: Vec<Feature>,
    diagnostics: Vec<Diagnostic>,
    current: Option<Draft>,
}

impl FeatureTable {
    pub fn new(options: &ParseOptions) -> Self {
        FeatureTable {
            options: options.clone(),
            features: Vec::new(),
            diagnostics: Vec::new(),
            current: None,
        }
    }

    /// Start a new feature at input line `line`, finalizing the previous one.
    pub fn start(&mut self, line: usize, kind: &str, location: &str) {
        self.close();
        self.current = Some(Draft {
            line,
            kind: kind.to_owned(),
            location: location.to_owned(),
            qualifier_lines: Vec::new(),
        });
    }

    /// Add a continuation line (indentation removed) to the open feature.
    pub fn continuation(&mut self, line: usize, text: &str) {
        match self.current.as_mut() {
            Some(draft) if draft.qualifier_lines.is_empty() && !text.starts_with('/') => {
                draft.location.push_str(text);
            }
            Some(draft) => draft.qualifier_lines.push((line, text.to_owned())),
            None => Diagnostic::warning(
                line,
                DiagnosticKind::OrphanContinuation {
                    text: text.to_owned(),
                },
            )
            .emit(&mut self.diagnostics),
        }
    }

    /// Number of features finalized so far.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.current.is_none()
    }

    /// Finalize the last feature and return all features in table
    /// order together with the problems found in them.
    pub fn finish(mut self) -> (Vec<Feature>, Vec<Diagnostic>) {
        self.close();
        (self.features, self.diagnostics)
    }

    /// Finalize the open feature, if any. Continuation lines that
    /// follow before the next [`start`](Self::start) are orphans.
    pub fn close(&mut self) {
        let draft = match self.current.take() {
            Some(draft) => draft,
            None => return,
        };
        let index = self.features.len() + 1;

        let location = match draft.location.parse::<Location>() {
            Ok(location) => location,
            Err(error) => {
                Diagnostic::error(
                    draft.line,
                    DiagnosticKind::LocationSyntax {
                        index,
                        kind: draft.kind.clone(),
                        text: draft.location.clone(),
                        error,
                    },
                )
                .emit(&mut self.diagnostics);
                Location::Unresolved(draft.location)
            }
        };

        let lines: Vec<&str> = draft
            .qualifier_lines
            .iter()
            .map(|(_, text)| text.as_str())
            .collect();
        let (qualifiers, issues) = parse_qualifiers(&lines, &self.options);
        for (at, issue) in issues {
            let line = draft
                .qualifier_lines
                .get(at)
                .map_or(draft.line, |(line, _)| *line);
            Diagnostic::warning(
                line,
                DiagnosticKind::QualifierSyntax {
                    index,
                    kind: draft.kind.clone(),
                    issue,
                },
            )
            .emit(&mut self.diagnostics);
        }

        self.features
            .push(Feature::new(draft.kind, location, qualifiers));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qualifier::QualifierIssue;

    fn table() -> FeatureTable {
        FeatureTable::new(&ParseOptions::default())
    }

    #[test]
    fn order_is_kept_with_unresolved_locations() {
        let mut table = table();
        table.start(1, "source", "1..5028");
        table.continuation(2, "/organism=\"Saccharomyces cerevisiae\"");
        table.start(3, "gene", "join(1..10,,");
        table.continuation(4, "/gene=\"broken\"");
        table.start(5, "CDS", "complement(3300..4037)");
        let (features, diagnostics) = table.finish();

        assert_eq!(
            features.iter().map(|f| f.kind.as_str()).collect::<Vec<_>>(),
            vec!["source", "gene", "CDS"]
        );
        assert_eq!(
            features[1].location,
            Location::Unresolved("join(1..10,,".to_owned())
        );
        assert!(!features[1].is_resolved());
        assert_eq!(features[1].qualifier_text("gene"), Some("broken"));
        assert_eq!(features[2].strand(), Strand::Reverse);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 3);
        assert!(diagnostics[0].is_error());
        match &diagnostics[0].kind {
            DiagnosticKind::LocationSyntax { index, kind, .. } => {
                assert_eq!(*index, 2);
                assert_eq!(kind, "gene");
            }
            other => panic!("unexpected diagnostic {:?}", other),
        }
    }

    #[test]
    fn two_notes_stay_two_values() {
        let mut table = table();
        table.start(1, "gene", "687..3158");
        table.continuation(2, "/note=\"first\"");
        table.continuation(3, "/note=\"second\"");
        let (features, _) = table.finish();
        let notes = features[0].qualifier_values("note");
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].text(), Some("first"));
        assert_eq!(notes[1].text(), Some("second"));
    }

    #[test]
    fn absent_qualifier() {
        let mut table = table();
        table.start(1, "repeat_region", "1..10");
        table.continuation(2, "/pseudo");
        let (features, _) = table.finish();
        assert_eq!(extract_qualifier(&features[0], "gene"), None);
        assert_eq!(
            extract_qualifier(&features[0], "pseudo"),
            Some(&QualifierValue::Flag)
        );
        assert!(features[0].qualifier_values("gene").is_empty());
    }

    #[test]
    fn orphan_continuation() {
        let mut table = table();
        table.continuation(7, "/gene=\"lost\"");
        assert!(table.is_empty());
        let (features, diagnostics) = table.finish();
        assert!(features.is_empty());
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::OrphanContinuation {
                text: "/gene=\"lost\"".to_owned()
            }
        );
    }

    #[test]
    fn close_ends_the_open_feature() {
        let mut table = table();
        table.start(1, "gene", "1..8");
        table.close();
        assert_eq!(table.len(), 1);
        table.continuation(3, "AB000002.1:1..4)");
        let (features, diagnostics) = table.finish();
        assert_eq!(features[0].location, Location::range(1, 8));
        assert!(matches!(
            diagnostics[0].kind,
            DiagnosticKind::OrphanContinuation { .. }
        ));
    }

    #[test]
    fn qualifier_issue_lines_map_to_input() {
        let mut table = table();
        table.start(40, "CDS", "1..9");
        table.continuation(41, "/codon_start=1");
        table.continuation(42, "/product=\"never closed");
        let (features, diagnostics) = table.finish();
        assert_eq!(features[0].qualifier_text("product"), Some("never closed"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 42);
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::QualifierSyntax {
                index: 1,
                kind: "CDS".to_owned(),
                issue: QualifierIssue::UnterminatedQuote {
                    name: "product".to_owned()
                }
            }
        );
    }

    #[test]
    fn feature_coordinates() {
        let mut table = table();
        table.start(1, "mRNA", "join(<265..402,673..>1000)");
        let (features, _) = table.finish();
        let mrna = &features[0];
        assert_eq!(mrna.start(), Some(265));
        assert_eq!(mrna.end(), Some(1000));
        assert_eq!(mrna.length(), 138 + 328);
        assert!(mrna.covers(700));
        assert!(!mrna.covers(500));
    }
}
