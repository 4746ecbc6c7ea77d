//! Hand-rolled lexer and recursive-descent parser for condition strings.

use crate::core::condition::{Condition, ConditionPair, Literal, Op};
use crate::core::error::ConditionError;
use crate::core::types::NoResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Op(Op),
    LParen,
    RParen,
    And,
    Or,
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    pos: usize,
}

pub fn parse(input: &str) -> Result<Condition, ConditionError> {
    let tokens = lex(input)?;
    let mut parser = Parser {
        tokens,
        cursor: 0,
        end: input.len(),
    };
    let condition = parser.expr()?;
    if let Some(extra) = parser.peek() {
        return Err(parse_error(extra.pos, "unexpected trailing input"));
    }
    Ok(condition)
}

fn parse_error(pos: usize, message: impl Into<String>) -> ConditionError {
    ConditionError::Parse {
        pos,
        message: message.into(),
    }
}

fn lex(input: &str) -> Result<Vec<Spanned>, ConditionError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let byte = bytes[pos];
        match byte {
            b' ' | b'\t' | b'\n' | b'\r' => pos += 1,
            b'(' => {
                tokens.push(Spanned {
                    token: Token::LParen,
                    pos,
                });
                pos += 1;
            }
            b')' => {
                tokens.push(Spanned {
                    token: Token::RParen,
                    pos,
                });
                pos += 1;
            }
            b'=' | b'!' | b'<' | b'>' => {
                let (op, width) = lex_op(bytes, pos)?;
                tokens.push(Spanned {
                    token: Token::Op(op),
                    pos,
                });
                pos += width;
            }
            _ => {
                let start = pos;
                while pos < bytes.len() && !is_word_boundary(bytes[pos]) {
                    pos += 1;
                }
                let word = &input[start..pos];
                let token = match word {
                    "and" => Token::And,
                    "or" => Token::Or,
                    _ => Token::Ident(word.to_string()),
                };
                tokens.push(Spanned { token, pos: start });
            }
        }
    }

    Ok(tokens)
}

fn is_word_boundary(byte: u8) -> bool {
    matches!(
        byte,
        b' ' | b'\t' | b'\n' | b'\r' | b'(' | b')' | b'=' | b'!' | b'<' | b'>'
    )
}

fn lex_op(bytes: &[u8], pos: usize) -> Result<(Op, usize), ConditionError> {
    let next = bytes.get(pos + 1).copied();
    match (bytes[pos], next) {
        (b'=', Some(b'=')) => Ok((Op::Eq, 2)),
        (b'!', Some(b'=')) => Ok((Op::Ne, 2)),
        (b'<', Some(b'=')) => Ok((Op::Le, 2)),
        (b'>', Some(b'=')) => Ok((Op::Ge, 2)),
        (b'<', _) => Ok((Op::Lt, 1)),
        (b'>', _) => Ok((Op::Gt, 1)),
        (b'=', _) => Err(parse_error(pos, "'=' is not an operator; use '=='")),
        _ => Err(parse_error(pos, "'!' is not an operator; use '!='")),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    cursor: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.cursor).cloned();
        if spanned.is_some() {
            self.cursor += 1;
        }
        spanned
    }

    fn expr(&mut self) -> Result<Condition, ConditionError> {
        let mut parts = vec![self.term()?];
        while matches!(self.peek().map(|s| &s.token), Some(Token::Or)) {
            self.advance();
            parts.push(self.term()?);
        }
        Ok(flatten(parts, true))
    }

    fn term(&mut self) -> Result<Condition, ConditionError> {
        let mut parts = vec![self.factor()?];
        while matches!(self.peek().map(|s| &s.token), Some(Token::And)) {
            self.advance();
            parts.push(self.factor()?);
        }
        Ok(flatten(parts, false))
    }

    fn factor(&mut self) -> Result<Condition, ConditionError> {
        match self.peek().map(|s| (s.token.clone(), s.pos)) {
            Some((Token::LParen, pos)) => {
                self.advance();
                let inner = self.expr()?;
                match self.advance() {
                    Some(Spanned {
                        token: Token::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(parse_error(other.pos, "expected ')'")),
                    None => Err(parse_error(pos, "unclosed '('")),
                }
            }
            Some(_) => self.clause(),
            None => Err(parse_error(self.end, "expected a clause")),
        }
    }

    fn clause(&mut self) -> Result<Condition, ConditionError> {
        let prompt_id = match self.advance() {
            Some(Spanned {
                token: Token::Ident(id),
                ..
            }) => id,
            Some(other) => return Err(parse_error(other.pos, "expected a prompt id")),
            None => return Err(parse_error(self.end, "expected a prompt id")),
        };

        let op = match self.advance() {
            Some(Spanned {
                token: Token::Op(op),
                ..
            }) => op,
            Some(other) => return Err(parse_error(other.pos, "expected an operator")),
            None => return Err(parse_error(self.end, "expected an operator")),
        };

        let literal = match self.advance() {
            Some(Spanned {
                token: Token::Ident(word),
                ..
            }) => classify_literal(&word),
            Some(other) => return Err(parse_error(other.pos, "expected a literal")),
            None => return Err(parse_error(self.end, "expected a literal")),
        };

        Ok(Condition::Clause(ConditionPair {
            prompt_id,
            op,
            literal,
        }))
    }
}

fn classify_literal(word: &str) -> Literal {
    if let Some(sentinel) = NoResponse::from_label(word) {
        return Literal::Sentinel(sentinel);
    }
    if let Ok(number) = word.parse::<i64>() {
        return Literal::Number(number);
    }
    Literal::Text(word.to_string())
}

fn flatten(mut parts: Vec<Condition>, or: bool) -> Condition {
    if parts.len() == 1 {
        return parts.remove(0);
    }
    if or {
        Condition::Or(parts)
    } else {
        Condition::And(parts)
    }
}
