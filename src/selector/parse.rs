//! The one selector-parsing routine that is genuinely in scope for the
//! core: turning selector text — already fully interpolated by the
//! expression evaluator — back into a `SelectorList` (spec §7). Handles
//! the grammar interpolation can actually produce: comma-separated
//! complex selectors, the four combinators, compound selectors built
//! from type/universal/id/class/placeholder/attribute/parent/pseudo
//! simple selectors, and pseudo-selectors that recursively nest another
//! selector list (`:not(...)`, `:nth-child(2n of .foo)`, …).

use codemap::Span;

use crate::error::{SassError, SassResult};
use crate::selector::{Combinator, CompoundSelector, SelectorList, SimpleSelector};

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    span: Span,
    source: &'a str,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, span: Span) -> Self {
        Parser {
            chars: source.chars().collect(),
            pos: 0,
            span,
            source,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn error<T>(&self, message: impl Into<String>) -> SassResult<T> {
        Err(SassError::parse(message.into(), self.span))
    }

    fn parse_ident(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '\\' {
                s.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        s
    }

    fn parse_selector_list(&mut self) -> SassResult<SelectorList> {
        let mut complexes = Vec::new();
        loop {
            self.skip_whitespace();
            complexes.push(self.parse_complex_selector()?);
            self.skip_whitespace();
            if self.peek() == Some(',') {
                self.bump();
                continue;
            }
            break;
        }
        Ok(SelectorList { complexes })
    }

    fn parse_complex_selector(&mut self) -> SassResult<crate::selector::ComplexSelector> {
        let mut components = Vec::new();
        let mut pending_combinator = None;
        loop {
            let had_space = self.skip_whitespace();
            match self.peek() {
                Some('>') => {
                    self.bump();
                    pending_combinator = Some(Combinator::Child);
                    continue;
                }
                Some('+') => {
                    self.bump();
                    pending_combinator = Some(Combinator::NextSibling);
                    continue;
                }
                Some('~') => {
                    self.bump();
                    pending_combinator = Some(Combinator::FollowingSibling);
                    continue;
                }
                Some(',') | None => break,
                _ => {}
            }
            if components.is_empty() {
                components.push((None, self.parse_compound_selector()?));
            } else {
                let combinator = pending_combinator.take().or(if had_space {
                    Some(Combinator::Descendant)
                } else {
                    None
                });
                if combinator.is_none() && pending_combinator.is_none() {
                    // Nothing separated this compound from the last one; done.
                    break;
                }
                components.push((combinator, self.parse_compound_selector()?));
            }
            pending_combinator = None;
        }
        if components.is_empty() {
            return self.error("expected selector.");
        }
        Ok(crate::selector::ComplexSelector { components })
    }

    fn parse_compound_selector(&mut self) -> SassResult<CompoundSelector> {
        let mut simples = Vec::new();
        loop {
            match self.peek() {
                Some('.') => {
                    self.bump();
                    simples.push(SimpleSelector::Class(self.parse_ident()));
                }
                Some('#') => {
                    self.bump();
                    simples.push(SimpleSelector::Id(self.parse_ident()));
                }
                Some('%') => {
                    self.bump();
                    simples.push(SimpleSelector::Placeholder(self.parse_ident()));
                }
                Some('&') => {
                    self.bump();
                    simples.push(SimpleSelector::Parent);
                }
                Some('*') => {
                    self.bump();
                    simples.push(SimpleSelector::Universal { namespace: None });
                }
                Some('[') => {
                    self.bump();
                    simples.push(self.parse_attribute()?);
                }
                Some(':') => {
                    self.bump();
                    simples.push(self.parse_pseudo()?);
                }
                Some(c) if c.is_alphabetic() || c == '_' || c == '-' => {
                    let name = self.parse_ident();
                    simples.push(SimpleSelector::Type { namespace: None, name });
                }
                _ => break,
            }
        }
        if simples.is_empty() {
            return self.error("expected selector.");
        }
        Ok(CompoundSelector::new(simples))
    }

    fn parse_attribute(&mut self) -> SassResult<SimpleSelector> {
        self.skip_whitespace();
        let name = self.parse_ident();
        self.skip_whitespace();
        let mut op = None;
        let mut value = None;
        if matches!(self.peek(), Some('=') | Some('~') | Some('|') | Some('^') | Some('$') | Some('*')) {
            let mut op_str = String::new();
            if self.peek() != Some('=') {
                op_str.push(self.bump().unwrap());
            }
            if self.peek() == Some('=') {
                op_str.push(self.bump().unwrap());
            }
            op = Some(op_str);
            self.skip_whitespace();
            let quote = matches!(self.peek(), Some('"') | Some('\''));
            if quote {
                let q = self.bump().unwrap();
                let mut v = String::new();
                while let Some(c) = self.peek() {
                    if c == q {
                        break;
                    }
                    v.push(c);
                    self.pos += 1;
                }
                self.bump();
                value = Some(v);
            } else {
                value = Some(self.parse_ident());
            }
        }
        self.skip_whitespace();
        if self.peek() != Some(']') {
            return self.error("expected \"]\".");
        }
        self.bump();
        Ok(SimpleSelector::Attribute { name, op, value })
    }

    fn parse_pseudo(&mut self) -> SassResult<SimpleSelector> {
        let is_class = if self.peek() == Some(':') {
            self.bump();
            false
        } else {
            true
        };
        let name = self.parse_ident();
        if self.peek() != Some('(') {
            return Ok(SimpleSelector::Pseudo {
                name,
                is_class,
                argument: None,
                selector: None,
            });
        }
        self.bump();
        let nests_selector = matches!(
            name.to_ascii_lowercase().as_str(),
            "not" | "is" | "matches" | "has" | "where"
        ) || name.to_ascii_lowercase().starts_with("nth-");

        let mut depth = 1usize;
        let start = self.pos;
        while let Some(c) = self.peek() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        let inner: String = self.chars[start..self.pos].iter().collect();
        self.bump();

        if nests_selector {
            // `:nth-child(2n of .foo)` keeps the `2n of ` prefix as a
            // plain argument and only the trailing selector is parsed.
            if let Some(of_idx) = inner.find(" of ") {
                let (arg, selector_text) = inner.split_at(of_idx);
                let selector_text = &selector_text[4..];
                let selector = Parser::new(selector_text, self.span).parse_selector_list()?;
                Ok(SimpleSelector::Pseudo {
                    name,
                    is_class,
                    argument: Some(format!("{} of ", arg)),
                    selector: Some(Box::new(selector)),
                })
            } else {
                match Parser::new(&inner, self.span).parse_selector_list() {
                    Ok(selector) => Ok(SimpleSelector::Pseudo {
                        name,
                        is_class,
                        argument: None,
                        selector: Some(Box::new(selector)),
                    }),
                    Err(_) => Ok(SimpleSelector::Pseudo {
                        name,
                        is_class,
                        argument: Some(inner),
                        selector: None,
                    }),
                }
            }
        } else {
            Ok(SimpleSelector::Pseudo {
                name,
                is_class,
                argument: Some(inner),
                selector: None,
            })
        }
    }
}

pub fn parse_selector_list(source: &str, span: Span) -> SassResult<SelectorList> {
    let mut parser = Parser::new(source.trim(), span);
    let result = parser.parse_selector_list()?;
    parser.skip_whitespace();
    if parser.peek().is_some() {
        return parser.error(format!("unexpected token in selector: \"{}\"", parser.source));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        let mut map = codemap::CodeMap::new();
        let file = map.add_file("test".into(), "x".into());
        file.span
    }

    #[test]
    fn parses_comma_separated_compound_selectors() {
        let list = parse_selector_list(".a, .b:hover", span()).unwrap();
        assert_eq!(list.to_string(), ".a, .b:hover");
    }

    #[test]
    fn parses_combinators() {
        let list = parse_selector_list("a > b + c ~ d e", span()).unwrap();
        assert_eq!(list.to_string(), "a > b + c ~ d e");
    }

    #[test]
    fn parses_not_with_nested_selector() {
        let list = parse_selector_list(".a:not(.b, .c)", span()).unwrap();
        assert_eq!(list.complexes.len(), 1);
    }
}
