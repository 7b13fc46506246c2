// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Feature qualifiers: the `/name=value` annotations under each entry
//! of the feature table.

use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use thiserror::Error;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::options::ParseOptions;

/// Value of a single qualifier.
///
/// A flag qualifier such as `/pseudo` carries no value at all, which is
/// different from an explicitly empty value such as `/note=""`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum QualifierValue {
    Flag,
    Text(String),
}

impl QualifierValue {
    /// Text of the value; `None` for flags.
    pub fn text(&self) -> Option<&str> {
        match self {
            QualifierValue::Flag => None,
            QualifierValue::Text(text) => Some(text),
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, QualifierValue::Flag)
    }
}

impl Display for QualifierValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            QualifierValue::Flag => Ok(()),
            QualifierValue::Text(text) => f.write_str(text),
        }
    }
}

/// Qualifiers of one feature, keyed by name in order of first
/// appearance. A name may repeat; all of its values are kept in input
/// order.
///
/// ```
/// use bio_genbank::qualifier::{QualifierValue, Qualifiers};
/// let mut qualifiers = Qualifiers::new();
/// qualifiers.push("note", QualifierValue::Text("first".to_owned()));
/// qualifiers.push("pseudo", QualifierValue::Flag);
/// qualifiers.push("note", QualifierValue::Text("second".to_owned()));
/// assert_eq!(qualifiers.get("note").map(|v| v.len()), Some(2));
/// assert_eq!(qualifiers.first("note").and_then(|v| v.text()), Some("first"));
/// assert_eq!(qualifiers.names().collect::<Vec<_>>(), vec!["note", "pseudo"]);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qualifiers {
    map: IndexMap<String, Vec<QualifierValue>>,
}

impl Qualifiers {
    pub fn new() -> Self {
        Qualifiers::default()
    }

    /// Append a value for `name`, after any earlier values.
    pub fn push<N: Into<String>>(&mut self, name: N, value: QualifierValue) {
        self.map.entry(name.into()).or_default().push(value);
    }

    /// All values for `name`, in input order.
    pub fn get(&self, name: &str) -> Option<&[QualifierValue]> {
        self.map.get(name).map(Vec::as_slice)
    }

    /// First value for `name`.
    pub fn first(&self, name: &str) -> Option<&QualifierValue> {
        self.map.get(name).and_then(|values| values.first())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Distinct qualifier names in order of first appearance.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// Every `(name, value)` pair, grouped by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QualifierValue)> {
        self.map
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name.as_str(), v)))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Problems found while reading a qualifier block. None of them stops
/// parsing; the affected text is kept where possible.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QualifierIssue {
    #[error("quoted value of /{name} is never closed")]
    UnterminatedQuote { name: String },
    #[error("qualifier without a name: {line:?}")]
    EmptyName { line: String },
    #[error("text {text:?} after the closing quote of /{name}")]
    TrailingText { name: String, text: String },
    #[error("text {line:?} does not belong to any qualifier")]
    Stray { line: String },
}

/// Read the qualifier block of one feature.
///
/// `lines` are the block's lines in input order; indentation is ignored.
/// A qualifier starts at a line beginning with `/`, unless that line
/// lies inside a quoted value that is still open. Wrapped values are
/// merged with a single space (no space for the qualifiers listed in
/// [`ParseOptions::unspaced_qualifiers`]); inside quotes, `""` stands
/// for a literal quote. Issues are returned with the index of the line
/// they were found on.
///
/// ```
/// use bio_genbank::ParseOptions;
/// use bio_genbank::qualifier::{parse_qualifiers, QualifierValue};
/// let block = [
///     "/gene=\"thrL\"",
///     "/note=\"leader peptide;",
///     "attenuator\"",
///     "/pseudo",
/// ];
/// let (qualifiers, issues) = parse_qualifiers(&block, &ParseOptions::default());
/// assert!(issues.is_empty());
/// assert_eq!(qualifiers.first("note").and_then(|v| v.text()), Some("leader peptide; attenuator"));
/// assert_eq!(qualifiers.first("pseudo"), Some(&QualifierValue::Flag));
/// ```
pub fn parse_qualifiers<S: AsRef<str>>(
    lines: &[S],
    options: &ParseOptions,
) -> (Qualifiers, Vec<(usize, QualifierIssue)>) {
    let mut block = Block::default();
    for (index, line) in lines.iter().enumerate() {
        block.line(index, line.as_ref().trim(), options);
    }
    block.close();
    (block.qualifiers, block.issues)
}

/// A qualifier whose value may still continue on the next line.
struct Pending {
    name: String,
    value: Option<String>,
    start: usize,
    quoted: bool,
    in_quotes: bool,
    joiner: &'static str,
    discard: bool,
}

#[derive(Default)]
struct Block {
    qualifiers: Qualifiers,
    issues: Vec<(usize, QualifierIssue)>,
    open: Option<Pending>,
}

impl Block {
    fn line(&mut self, index: usize, line: &str, options: &ParseOptions) {
        if let Some(open) = self.open.as_mut() {
            if open.in_quotes {
                let value = open.value.get_or_insert_with(String::new);
                value.push_str(open.joiner);
                if let Some(tail) = scan_quoted(line, value) {
                    open.in_quotes = false;
                    if !tail.trim().is_empty() {
                        self.issues.push((
                            index,
                            QualifierIssue::TrailingText {
                                name: open.name.clone(),
                                text: tail.trim().to_owned(),
                            },
                        ));
                    }
                }
                return;
            }
        }

        if line.starts_with('/') {
            self.close();
            self.start(index, line, options);
        } else if !line.is_empty() {
            match self.open.as_mut() {
                Some(Pending {
                    quoted: false,
                    value: Some(value),
                    joiner,
                    ..
                }) => {
                    value.push_str(*joiner);
                    value.push_str(line);
                }
                _ => self.issues.push((
                    index,
                    QualifierIssue::Stray {
                        line: line.to_owned(),
                    },
                )),
            }
        }
    }

    fn start(&mut self, index: usize, line: &str, options: &ParseOptions) {
        let body = &line[1..];
        let (name, rest) = match body.find('=') {
            Some(eq) => (body[..eq].trim(), Some(&body[eq + 1..])),
            None => (body.trim(), None),
        };
        if name.is_empty() {
            self.issues.push((
                index,
                QualifierIssue::EmptyName {
                    line: line.to_owned(),
                },
            ));
        }

        let mut pending = Pending {
            name: name.to_owned(),
            value: None,
            start: index,
            quoted: false,
            in_quotes: false,
            joiner: if options.is_unspaced(name) { "" } else { " " },
            discard: name.is_empty(),
        };

        if let Some(rest) = rest {
            let mut value = String::new();
            match rest.trim_start().strip_prefix('"') {
                Some(quoted) => {
                    pending.quoted = true;
                    match scan_quoted(quoted, &mut value) {
                        None => pending.in_quotes = true,
                        Some(tail) if !tail.trim().is_empty() => self.issues.push((
                            index,
                            QualifierIssue::TrailingText {
                                name: name.to_owned(),
                                text: tail.trim().to_owned(),
                            },
                        )),
                        Some(_) => (),
                    }
                }
                None => value.push_str(rest.trim()),
            }
            pending.value = Some(value);
        }

        self.open = Some(pending);
    }

    fn close(&mut self) {
        if let Some(pending) = self.open.take() {
            if pending.in_quotes {
                self.issues.push((
                    pending.start,
                    QualifierIssue::UnterminatedQuote {
                        name: pending.name.clone(),
                    },
                ));
            }
            if pending.discard {
                return;
            }
            let value = match pending.value {
                Some(text) => QualifierValue::Text(text),
                None => QualifierValue::Flag,
            };
            self.qualifiers.push(pending.name, value);
        }
    }
}

// Copy quoted text into `out` up to the closing quote and return what
// follows it, or `None` when the quote is still open at the end of
// `text`.
fn scan_quoted<'a>(text: &'a str, out: &mut String) -> Option<&'a str> {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '"' {
            if let Some((_, '"')) = chars.peek() {
                out.push('"');
                chars.next();
            } else {
                return Some(&text[i + 1..]);
            }
        } else {
            out.push(c);
        }
    }
    None
}
