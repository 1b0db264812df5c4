//! Recursive descent selector parser.
//!
//! Parses selector text (as passed to `query_selector_all` or used as a rule
//! prelude) into [`Selector`]s, using the logos tokenizer from
//! [`crate::css::tokenizer`].

use logos::Logos;

use crate::css::model::*;
use crate::css::tokenizer::Token;

/// Errors from selector parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("unexpected token at position {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of selector: {0}")]
    UnexpectedEof(String),
    #[error("empty selector")]
    Empty,
}

/// A positioned token with byte-level span information for whitespace detection.
#[derive(Debug, Clone)]
struct PToken {
    token: Token,
    text: String,
    /// Index in the token stream (for error reporting).
    pos: usize,
    byte_start: usize,
    byte_end: usize,
}

fn tokenize_with_spans(input: &str) -> Vec<PToken> {
    let lexer = Token::lexer(input);
    let mut tokens = Vec::new();

    for (result, span) in lexer.spanned() {
        if let Ok(token) = result {
            tokens.push(PToken {
                text: input[span.clone()].to_string(),
                token,
                pos: tokens.len(),
                byte_start: span.start,
                byte_end: span.end,
            });
        }
    }

    tokens
}

/// Parse a comma-separated selector list such as `.btn, div > span`.
pub fn parse_selector_list(input: &str) -> Result<Vec<Selector>, SelectorError> {
    let tokens = tokenize_with_spans(input);
    if tokens.is_empty() {
        return Err(SelectorError::Empty);
    }

    let mut parser = Parser { tokens, cursor: 0 };
    let mut selectors = vec![parser.parse_selector()?];

    while parser.peek().is_some_and(|t| t.token == Token::Comma) {
        parser.advance();
        selectors.push(parser.parse_selector()?);
    }

    if let Some(tok) = parser.peek() {
        return Err(SelectorError::UnexpectedToken {
            position: tok.pos,
            message: format!("trailing {:?} '{}'", tok.token, tok.text),
        });
    }

    Ok(selectors)
}

struct Parser {
    tokens: Vec<PToken>,
    cursor: usize,
}

impl Parser {
    fn peek(&self) -> Option<&PToken> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) -> Option<PToken> {
        let tok = self.tokens.get(self.cursor).cloned();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    fn current_pos(&self) -> usize {
        self.peek().map(|t| t.pos).unwrap_or(self.tokens.len())
    }

    /// Returns `true` if the current token immediately follows the previous one.
    fn is_adjacent(&self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = &self.tokens[self.cursor - 1];
        self.peek().is_some_and(|curr| curr.byte_start == prev.byte_end)
    }

    fn parse_selector(&mut self) -> Result<Selector, SelectorError> {
        let mut parts = vec![SelectorPart::Compound(self.parse_compound_selector()?)];

        loop {
            match self.peek().map(|t| &t.token) {
                Some(Token::GreaterThan) => {
                    self.advance();
                    parts.push(SelectorPart::Combinator(Combinator::Child));
                    parts.push(SelectorPart::Compound(self.parse_compound_selector()?));
                }
                // A selector-starting token after whitespace is a descendant combinator.
                // Adjacent ones were already consumed by the compound parser.
                Some(
                    Token::Ident
                    | Token::Hash
                    | Token::Dot
                    | Token::Star
                    | Token::PseudoClass
                    | Token::BracketOpen,
                ) => {
                    parts.push(SelectorPart::Combinator(Combinator::Descendant));
                    parts.push(SelectorPart::Compound(self.parse_compound_selector()?));
                }
                _ => break,
            }
        }

        Ok(Selector { parts })
    }

    /// Parse a compound selector: simple selectors with no whitespace between
    /// them, e.g. `button.btn[disabled]`.
    fn parse_compound_selector(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut compound = CompoundSelector::new();

        match self.peek().map(|t| t.token.clone()) {
            Some(Token::Ident) => {
                let tok = self.advance().ok_or_else(eof("type selector"))?;
                compound.push(SelectorComponent::Type(tok.text.to_ascii_lowercase()));
            }
            Some(Token::Star) => {
                self.advance();
                compound.push(SelectorComponent::Universal);
            }
            Some(Token::Dot | Token::Hash | Token::PseudoClass | Token::BracketOpen) => {
                compound.push(self.parse_simple()?);
            }
            _ => {
                return Err(SelectorError::UnexpectedToken {
                    position: self.current_pos(),
                    message: "expected selector part".into(),
                });
            }
        }

        while self.is_adjacent()
            && matches!(
                self.peek().map(|t| &t.token),
                Some(Token::Dot | Token::Hash | Token::PseudoClass | Token::BracketOpen)
            )
        {
            compound.push(self.parse_simple()?);
        }

        Ok(compound)
    }

    /// Parse one of `.class`, `#id`, `:pseudo`, `[attr]`, `[attr=value]`.
    fn parse_simple(&mut self) -> Result<SelectorComponent, SelectorError> {
        let tok = self.advance().ok_or_else(eof("selector part"))?;
        match tok.token {
            Token::Dot => Ok(SelectorComponent::Class(self.expect_ident("class name")?)),
            Token::Hash => Ok(SelectorComponent::Id(self.expect_ident("id name")?)),
            Token::PseudoClass => Ok(SelectorComponent::PseudoClass(tok.text[1..].to_string())),
            Token::BracketOpen => self.parse_attribute(),
            other => Err(SelectorError::UnexpectedToken {
                position: tok.pos,
                message: format!("expected selector part, got {:?} '{}'", other, tok.text),
            }),
        }
    }

    fn parse_attribute(&mut self) -> Result<SelectorComponent, SelectorError> {
        let name = self.expect_ident("attribute name")?.to_ascii_lowercase();
        let tok = self.advance().ok_or_else(eof("']' or '='"))?;
        match tok.token {
            Token::BracketClose => Ok(SelectorComponent::Attribute { name, value: None }),
            Token::Equals => {
                let value_tok = self.advance().ok_or_else(eof("attribute value"))?;
                let value = match value_tok.token {
                    Token::StringLiteral | Token::StringLiteralSingle => {
                        value_tok.text[1..value_tok.text.len() - 1].to_string()
                    }
                    Token::Ident | Token::Number => value_tok.text,
                    other => {
                        return Err(SelectorError::UnexpectedToken {
                            position: value_tok.pos,
                            message: format!("expected attribute value, got {:?}", other),
                        })
                    }
                };
                let close = self.advance().ok_or_else(eof("']'"))?;
                if close.token != Token::BracketClose {
                    return Err(SelectorError::UnexpectedToken {
                        position: close.pos,
                        message: format!("expected ']', got '{}'", close.text),
                    });
                }
                Ok(SelectorComponent::Attribute {
                    name,
                    value: Some(value),
                })
            }
            other => Err(SelectorError::UnexpectedToken {
                position: tok.pos,
                message: format!("expected ']' or '=', got {:?}", other),
            }),
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, SelectorError> {
        let tok = self.advance().ok_or_else(eof(what))?;
        if tok.token != Token::Ident {
            return Err(SelectorError::UnexpectedToken {
                position: tok.pos,
                message: format!("expected {what}, got {:?} '{}'", tok.token, tok.text),
            });
        }
        Ok(tok.text)
    }
}

fn eof(what: &str) -> impl FnOnce() -> SelectorError + '_ {
    move || SelectorError::UnexpectedEof(format!("expected {what}"))
}
