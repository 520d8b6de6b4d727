// lexer.rs — Tokenizer for the constraint expression language.
//
// Hand-written over a char iterator. Each token carries the byte offset
// it starts at so parse errors can point into the constraint text.
//
// Dotted field paths are lexed as a single Path token — the language has
// no other use for `.`, and keeping path assembly out of the parser
// keeps both sides simple. Keywords (and/or/not/in/implies/true/false)
// only apply to single-segment identifiers: `policy.and.more` is a path.

use crate::error::ExprError;

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Dotted field path, e.g. `deployment.encryption.atRest`.
    Path(Vec<String>),
    /// String literal, single- or double-quoted.
    Str(String),
    Number(f64),
    True,
    False,
    LParen,
    RParen,
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
    In,
    Implies,
    And,
    Or,
    Not,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Path(segments) => write!(f, "{}", segments.join(".")),
            Token::Str(s) => write!(f, "'{}'", s),
            Token::Number(n) => write!(f, "{}", n),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Eq => write!(f, "=="),
            Token::Ne => write!(f, "!="),
            Token::Le => write!(f, "<="),
            Token::Ge => write!(f, ">="),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::In => write!(f, "in"),
            Token::Implies => write!(f, "implies"),
            Token::And => write!(f, "and"),
            Token::Or => write!(f, "or"),
            Token::Not => write!(f, "not"),
        }
    }
}

/// A token plus the byte offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// Tokenize a constraint expression.
pub fn tokenize(src: &str) -> Result<Vec<Spanned>, ExprError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos] as char;

        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        match c {
            '(' => {
                tokens.push(Spanned {
                    token: Token::LParen,
                    offset: start,
                });
                pos += 1;
            }
            ')' => {
                tokens.push(Spanned {
                    token: Token::RParen,
                    offset: start,
                });
                pos += 1;
            }
            '=' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    tokens.push(Spanned {
                        token: Token::Eq,
                        offset: start,
                    });
                    pos += 2;
                } else {
                    return Err(ExprError::parse(start, "expected '==' (single '=' is not assignment)"));
                }
            }
            '!' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    tokens.push(Spanned {
                        token: Token::Ne,
                        offset: start,
                    });
                    pos += 2;
                } else {
                    return Err(ExprError::parse(start, "expected '!=' ('!' alone is not negation; use 'not')"));
                }
            }
            '<' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    tokens.push(Spanned {
                        token: Token::Le,
                        offset: start,
                    });
                    pos += 2;
                } else {
                    tokens.push(Spanned {
                        token: Token::Lt,
                        offset: start,
                    });
                    pos += 1;
                }
            }
            '>' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    tokens.push(Spanned {
                        token: Token::Ge,
                        offset: start,
                    });
                    pos += 2;
                } else {
                    tokens.push(Spanned {
                        token: Token::Gt,
                        offset: start,
                    });
                    pos += 1;
                }
            }
            '\'' | '"' => {
                let quote = c;
                pos += 1;
                let content_start = pos;
                while pos < bytes.len() && bytes[pos] as char != quote {
                    pos += 1;
                }
                if pos >= bytes.len() {
                    return Err(ExprError::parse(start, "unterminated string literal"));
                }
                tokens.push(Spanned {
                    token: Token::Str(src[content_start..pos].to_string()),
                    offset: start,
                });
                pos += 1; // closing quote
            }
            _ if c.is_ascii_digit() || (c == '-' && bytes.get(pos + 1).is_some_and(|b| b.is_ascii_digit())) => {
                if c == '-' {
                    pos += 1;
                }
                while pos < bytes.len()
                    && ((bytes[pos] as char).is_ascii_digit() || bytes[pos] == b'.')
                {
                    pos += 1;
                }
                let text = &src[start..pos];
                let number: f64 = text
                    .parse()
                    .map_err(|_| ExprError::parse(start, format!("invalid number '{}'", text)))?;
                tokens.push(Spanned {
                    token: Token::Number(number),
                    offset: start,
                });
            }
            _ if is_ident_start(c) => {
                let mut segments = Vec::new();
                loop {
                    let seg_start = pos;
                    while pos < bytes.len() && is_ident_char(bytes[pos] as char) {
                        pos += 1;
                    }
                    if pos == seg_start {
                        return Err(ExprError::parse(pos, "expected identifier after '.'"));
                    }
                    segments.push(src[seg_start..pos].to_string());
                    if bytes.get(pos) == Some(&b'.') {
                        pos += 1;
                    } else {
                        break;
                    }
                }
                let token = if segments.len() == 1 {
                    keyword(&segments[0]).unwrap_or(Token::Path(segments))
                } else {
                    Token::Path(segments)
                };
                tokens.push(Spanned {
                    token,
                    offset: start,
                });
            }
            _ => {
                return Err(ExprError::parse(
                    start,
                    format!("unexpected character '{}'", c),
                ));
            }
        }
    }

    Ok(tokens)
}

fn keyword(word: &str) -> Option<Token> {
    match word {
        "true" => Some(Token::True),
        "false" => Some(Token::False),
        "in" => Some(Token::In),
        "implies" => Some(Token::Implies),
        "and" => Some(Token::And),
        "or" => Some(Token::Or),
        "not" => Some(Token::Not),
        _ => None,
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}
