//! A small CSS selector engine.
//!
//! Supported syntax: type (`p`), universal (`*`), id (`#intro`), class (`.note`), attribute
//! presence and equality (`[data-x]`, `[lang=en]`, `[title="a b"]`), compounds of those
//! (`p.note#intro`), descendant (`div p`) and child (`div > p`) combinators, and
//! comma-separated lists.

use crate::{Document, NodeId, error::SelectorError};

/// One attribute condition.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeCondition {
    /// Attribute name.
    name: String,
    /// Required value, or `None` for a presence test.
    value: Option<String>,
}

/// Conditions that must all hold on a single element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    /// Required tag, `None` for any.
    tag: Option<String>,
    /// Required id.
    id: Option<String>,
    /// Required classes.
    classes: Vec<String>,
    /// Required attributes.
    attributes: Vec<AttributeCondition>,
}

impl Compound {
    /// Tests a node against every condition.
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(el) = doc.element(node) else {
            return false;
        };
        if self.tag.as_ref().is_some_and(|t| *t != el.tag) {
            return false;
        }
        if self
            .id
            .as_ref()
            .is_some_and(|id| el.attribute("id") != Some(id.as_str()))
        {
            return false;
        }
        if !self
            .classes
            .iter()
            .all(|class| el.classes().any(|c| c == class))
        {
            return false;
        }
        self.attributes.iter().all(|cond| {
            match (el.attribute(&cond.name), &cond.value) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
            }
        })
    }
}

/// Relationship between two adjacent compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    /// Any ancestor (`a b`).
    Descendant,
    /// Direct parent (`a > b`).
    Child,
}

/// A complex selector: compounds joined by combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Selector {
    /// Compounds, left to right.
    parts: Vec<Compound>,
    /// `combinators[i]` joins `parts[i]` and `parts[i + 1]`.
    combinators: Vec<Combinator>,
}

impl Selector {
    /// Tests `node` against `parts[..=index]`, walking up the tree.
    fn matches_at(&self, doc: &Document, node: NodeId, index: usize) -> bool {
        if !self.parts[index].matches(doc, node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => doc
                .parent(node)
                .is_some_and(|parent| self.matches_at(doc, parent, index - 1)),
            Combinator::Descendant => doc
                .ancestors(node)
                .any(|ancestor| self.matches_at(doc, ancestor, index - 1)),
        }
    }
}

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    /// Alternatives; a node matches if any alternative does.
    selectors: Vec<Selector>,
}

impl SelectorList {
    /// Parses a selector list.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse_list()
    }

    /// Returns true if `node` is an element matched by any alternative.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.selectors
            .iter()
            .any(|s| s.matches_at(doc, node, s.parts.len() - 1))
    }
}

/// Recursive-descent parser over the selector characters.
struct Parser {
    /// Characters with their byte offsets.
    chars: Vec<(usize, char)>,
    /// Index into `chars`.
    pos: usize,
    /// Byte length of the input, reported for errors at the end.
    len: usize,
}

impl Parser {
    /// Creates a parser positioned at the start of `input`.
    fn new(input: &str) -> Self {
        Self {
            chars: input.char_indices().collect(),
            pos: 0,
            len: input.len(),
        }
    }

    /// Returns the current character without consuming it.
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    /// Byte offset of the current character.
    fn offset(&self) -> usize {
        self.chars.get(self.pos).map_or(self.len, |&(i, _)| i)
    }

    /// Skips whitespace, returning true if any was consumed.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos != start
    }

    /// Parses `selector (, selector)*`.
    fn parse_list(&mut self) -> Result<SelectorList, SelectorError> {
        let mut selectors = vec![self.parse_selector()?];
        while self.peek() == Some(',') {
            self.pos += 1;
            selectors.push(self.parse_selector()?);
        }
        Ok(SelectorList { selectors })
    }

    /// Parses one complex selector, stopping at `,` or end of input.
    fn parse_selector(&mut self) -> Result<Selector, SelectorError> {
        self.skip_whitespace();
        let mut parts = Vec::new();
        let mut combinators = Vec::new();

        loop {
            let compound = self.parse_compound()?;
            parts.push(compound);

            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    let position = self.offset();
                    self.pos += 1;
                    self.skip_whitespace();
                    if matches!(self.peek(), None | Some(',')) {
                        return Err(SelectorError::DanglingCombinator { position });
                    }
                    Combinator::Child
                }
                Some(_) if had_space => Combinator::Descendant,
                Some(ch) => {
                    return Err(SelectorError::UnexpectedChar {
                        ch,
                        position: self.offset(),
                    });
                }
            };
            combinators.push(combinator);
        }

        Ok(Selector { parts, combinators })
    }

    /// Parses a compound such as `p.note#intro[lang=en]`.
    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let mut any = false;

        match self.peek() {
            Some('*') => {
                self.pos += 1;
                any = true;
            }
            Some(c) if is_name_char(c) => {
                compound.tag = Some(self.parse_name()?.to_ascii_lowercase());
                any = true;
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.parse_name()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.parse_name()?);
                }
                Some('[') => compound.attributes.push(self.parse_attribute()?),
                _ => break,
            }
            any = true;
        }

        if any {
            return Ok(compound);
        }
        match self.peek() {
            None | Some(',') => Err(SelectorError::Empty),
            Some(ch) => Err(SelectorError::UnexpectedChar {
                ch,
                position: self.offset(),
            }),
        }
    }

    /// Parses an identifier made of name characters.
    fn parse_name(&mut self) -> Result<String, SelectorError> {
        let position = self.offset();
        let mut name = String::new();
        while let Some(c) = self.peek().filter(|&c| is_name_char(c)) {
            name.push(c);
            self.pos += 1;
        }
        if name.is_empty() {
            return Err(SelectorError::ExpectedName { position });
        }
        Ok(name)
    }

    /// Parses `[name]` or `[name=value]`, with optional quotes around the value.
    fn parse_attribute(&mut self) -> Result<AttributeCondition, SelectorError> {
        let start = self.offset();
        self.pos += 1;
        self.skip_whitespace();
        let name = self.parse_name()?;
        self.skip_whitespace();

        let value = match self.peek() {
            Some(']') => None,
            Some('=') => {
                self.pos += 1;
                self.skip_whitespace();
                Some(self.parse_attribute_value(start)?)
            }
            None => return Err(SelectorError::UnterminatedAttribute { position: start }),
            Some(ch) => {
                return Err(SelectorError::UnexpectedChar {
                    ch,
                    position: self.offset(),
                });
            }
        };

        self.skip_whitespace();
        if self.peek() != Some(']') {
            return Err(SelectorError::UnterminatedAttribute { position: start });
        }
        self.pos += 1;
        Ok(AttributeCondition { name, value })
    }

    /// Parses a quoted or bare attribute value.
    fn parse_attribute_value(&mut self, start: usize) -> Result<String, SelectorError> {
        let Some(quote) = self.peek().filter(|&c| c == '"' || c == '\'') else {
            return self.parse_name();
        };
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.peek() {
                None => return Err(SelectorError::UnterminatedAttribute { position: start }),
                Some(c) if c == quote => {
                    self.pos += 1;
                    return Ok(value);
                }
                Some(c) => {
                    value.push(c);
                    self.pos += 1;
                }
            }
        }
    }
}

/// Characters allowed in tag, id, class and attribute names.
fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
