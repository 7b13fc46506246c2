// Copyright 2024 The bio-genbank Developers.
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Recursive-descent parser for location text.
//!
//! ```text
//! location   := operator | simple
//! operator   := "complement(" location ")"
//!             | ("join" | "order") "(" location ("," location)* ")"
//! simple     := ["<"] number [".." [">"] number | "^" number]
//! ```

use crate::location::{JoinKind, Location, LocationError, Position};

/// Deepest nesting of `complement`/`join`/`order` accepted.
const MAX_DEPTH: usize = 1024;

pub(crate) fn parse(text: &str) -> Result<Location, LocationError> {
    // Long locations are wrapped across continuation lines; the wrap
    // may fall anywhere, so whitespace carries no meaning.
    let chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return Err(LocationError::Empty);
    }

    let mut parser = Parser {
        chars,
        pos: 0,
        depth: 0,
    };
    let location = parser.location()?;
    if parser.pos < parser.chars.len() {
        return Err(LocationError::TrailingInput {
            rest: parser.chars[parser.pos..].iter().collect(),
        });
    }
    Ok(location)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let end = self.pos + keyword.len();
        if end > self.chars.len() {
            return false;
        }
        if self.chars[self.pos..end].iter().copied().eq(keyword.chars()) {
            self.pos = end;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char, expected: &str) -> Result<(), LocationError> {
        match self.peek() {
            Some(found) if found == c => {
                self.pos += 1;
                Ok(())
            }
            Some(found) => Err(LocationError::UnexpectedChar {
                found,
                offset: self.pos,
            }),
            None => Err(LocationError::UnexpectedEnd {
                expected: expected.to_owned(),
            }),
        }
    }

    fn location(&mut self) -> Result<Location, LocationError> {
        if self.depth == MAX_DEPTH {
            return Err(LocationError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        let location = self.operator();
        self.depth -= 1;
        location
    }

    fn operator(&mut self) -> Result<Location, LocationError> {
        if self.eat_keyword("complement(") {
            let inner = self.location()?;
            self.expect(')', "')' closing complement")?;
            Ok(Location::Complement(Box::new(inner)))
        } else if self.eat_keyword("join(") {
            self.compound(JoinKind::Join)
        } else if self.eat_keyword("order(") {
            self.compound(JoinKind::Order)
        } else {
            self.simple()
        }
    }

    fn compound(&mut self, kind: JoinKind) -> Result<Location, LocationError> {
        if self.eat(')') {
            return Err(LocationError::EmptyJoin { kind });
        }
        let mut parts = vec![self.location()?];
        while self.eat(',') {
            parts.push(self.location()?);
        }
        self.expect(')', "',' or ')' in join")?;
        Ok(Location::Join { kind, parts })
    }

    fn simple(&mut self) -> Result<Location, LocationError> {
        let fuzzy_start = self.eat('<');
        let start = self.number()?;

        if self.eat_keyword("..") {
            let fuzzy_end = self.eat('>');
            let end = self.number()?;
            if end < start {
                return Err(LocationError::EndBeforeStart { start, end });
            }
            Ok(Location::Range {
                start,
                end,
                fuzzy_start,
                fuzzy_end,
            })
        } else if fuzzy_start {
            // `<N` on its own has no range end to attach the marker to.
            match self.peek() {
                Some(found) => Err(LocationError::UnexpectedChar {
                    found,
                    offset: self.pos,
                }),
                None => Err(LocationError::UnexpectedEnd {
                    expected: "'..' after fuzzy start".to_owned(),
                }),
            }
        } else if self.eat('^') {
            let after = self.number()?;
            Ok(Location::Between {
                before: start,
                after,
            })
        } else {
            Ok(Location::Point(start))
        }
    }

    fn number(&mut self) -> Result<Position, LocationError> {
        let begin = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        if begin == self.pos {
            return match self.peek() {
                Some(found) => Err(LocationError::UnexpectedChar {
                    found,
                    offset: self.pos,
                }),
                None => Err(LocationError::UnexpectedEnd {
                    expected: "a position".to_owned(),
                }),
            };
        }

        let text: String = self.chars[begin..self.pos].iter().collect();
        match text.parse::<Position>() {
            Ok(0) | Err(_) => Err(LocationError::InvalidPosition { text }),
            Ok(pos) => Ok(pos),
        }
    }
}
