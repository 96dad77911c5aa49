use serde_json::Number;

use crate::ast::{Operator, Token, TokenKind};
use crate::parser::ParseError;
use crate::value::Target;

/// Splits query text into [`Token`]s.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn is_target_delimiter(ch: char) -> bool {
        ch.is_whitespace() || matches!(ch, '(' | ')' | '[' | ']' | ',')
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self) -> Result<String, ParseError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    let escape_at = self.position;
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some('"') => result.push('"'),
                        Some('\\') => result.push('\\'),
                        Some('/') => result.push('/'),
                        Some('u') => {
                            result.push(self.read_unicode_escape(escape_at)?);
                            continue;
                        }
                        Some(ch) => {
                            return Err(ParseError::InvalidEscape {
                                ch,
                                position: escape_at,
                            });
                        }
                        None => return Err(ParseError::UnterminatedString { position: start }),
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(ParseError::UnterminatedString { position: start })
    }

    /// Reads the `XXXX` of a `\uXXXX` escape; the lexer sits on the `u`.
    fn read_unicode_escape(&mut self, escape_at: usize) -> Result<char, ParseError> {
        self.advance(); // Consume 'u'
        let digits: String = self.input.iter().skip(self.position).take(4).collect();
        let invalid = ParseError::InvalidEscape {
            ch: 'u',
            position: escape_at,
        };
        if digits.len() != 4 {
            return Err(invalid);
        }
        let code = u32::from_str_radix(&digits, 16).map_err(|_| invalid.clone())?;
        let ch = char::from_u32(code).ok_or(invalid)?;
        self.position += 4;
        Ok(ch)
    }

    fn read_number(&mut self) -> Result<Number, ParseError> {
        let start = self.position;
        let mut text = String::new();

        if self.current_char() == Some('-') {
            text.push('-');
            self.advance();
        }
        while let Some(ch) = self.current_char() {
            let exponent_sign = matches!(ch, '+' | '-') && text.ends_with(['e', 'E']);
            if ch.is_ascii_digit() || matches!(ch, '.' | 'e' | 'E') || exponent_sign {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        serde_json::from_str::<Number>(&text).map_err(|_| ParseError::InvalidNumber {
            text,
            position: start,
        })
    }

    fn read_target(&mut self) -> Result<Target, ParseError> {
        let start = self.position;
        let mut raw = String::new();
        while let Some(ch) = self.current_char() {
            if Self::is_target_delimiter(ch) {
                break;
            }
            raw.push(ch);
            self.advance();
        }

        let decoded = urlencoding::decode(&raw).map_err(|_| ParseError::InvalidTarget {
            pointer: raw.clone(),
            reason: "percent-escapes do not decode to UTF-8".to_string(),
            position: start,
        })?;

        Target::parse(&decoded).map_err(|err| ParseError::InvalidTarget {
            pointer: raw.clone(),
            reason: err.to_string(),
            position: start,
        })
    }

    /// Returns the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_whitespace();

        let position = self.position;
        let Some(ch) = self.current_char() else {
            return Ok(None);
        };

        let kind = match ch {
            '(' => {
                self.advance();
                TokenKind::OpenGroup
            }
            ')' => {
                self.advance();
                TokenKind::CloseGroup
            }
            '[' => {
                self.advance();
                TokenKind::OpenArray
            }
            ']' => {
                self.advance();
                TokenKind::CloseArray
            }
            ',' => {
                self.advance();
                TokenKind::ListDelimiter
            }
            '"' => TokenKind::String(self.read_string()?),
            '/' => TokenKind::Target(self.read_target()?),
            '-' => TokenKind::Number(self.read_number()?),
            ch if ch.is_ascii_digit() => TokenKind::Number(self.read_number()?),
            ch if ch.is_alphabetic() || ch == '_' => {
                let word = self.read_word();
                match word.as_str() {
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    "true" => TokenKind::Boolean(true),
                    "false" => TokenKind::Boolean(false),
                    "nil" => TokenKind::Nil,
                    _ => match Operator::from_keyword(&word) {
                        Some(op) => TokenKind::Operator(op),
                        None => TokenKind::Word(word),
                    },
                }
            }
            ch => return Err(ParseError::UnexpectedCharacter { ch, position }),
        };

        tracing::trace!(position, token = %kind.describe(), "lexed token");
        Ok(Some(Token::new(kind, position)))
    }

    /// Lexes the whole input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Number of characters in the input, i.e. the end-of-input position.
    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }
}

/// A cursor over lexed tokens, consumed by the [`crate::Parser`].
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    index: usize,
    end: usize,
}

impl TokenStream {
    /// Wraps already-lexed tokens. `end` is the position reported for errors
    /// at end of input.
    pub fn new(tokens: Vec<Token>, end: usize) -> Self {
        TokenStream {
            tokens,
            index: 0,
            end,
        }
    }

    /// Lexes `input` into a stream.
    pub fn tokenize(input: &str) -> Result<Self, ParseError> {
        let lexer = Lexer::new(input);
        let end = lexer.len();
        Ok(TokenStream::new(lexer.tokenize()?, end))
    }

    /// The token under the cursor; `None` once the input is exhausted.
    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// Moves past the current token. Returns whether a token is current afterwards.
    pub fn advance(&mut self) -> bool {
        if self.index < self.tokens.len() {
            self.index += 1;
        }
        self.index < self.tokens.len()
    }

    /// Character offset of the current token, or the end of input.
    pub fn position(&self) -> usize {
        self.current().map_or(self.end, |token| token.position)
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }
}

#[test]
fn test_keywords() {
    let tokens = Lexer::new("and or true false nil like").tokenize().unwrap();
    let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Boolean(true),
            TokenKind::Boolean(false),
            TokenKind::Nil,
            TokenKind::Operator(Operator::Like),
        ]
    );
}

#[test]
fn test_clause() {
    let mut lexer = Lexer::new("/foo between -1,4.5");
    let target = lexer.next_token().unwrap().unwrap();
    assert_eq!(target.position, 0);
    assert!(matches!(target.kind, TokenKind::Target(ref t) if t.segments() == ["foo"]));
    assert_eq!(
        lexer.next_token().unwrap().unwrap().kind,
        TokenKind::Operator(Operator::Between)
    );
    let lower = lexer.next_token().unwrap().unwrap();
    assert_eq!(lower.kind, TokenKind::Number((-1).into()));
    assert_eq!(lower.position, 13);
    assert_eq!(lexer.next_token().unwrap().unwrap().kind, TokenKind::ListDelimiter);
    assert!(matches!(
        lexer.next_token().unwrap().unwrap().kind,
        TokenKind::Number(n) if n.as_f64() == Some(4.5)
    ));
    assert_eq!(lexer.next_token().unwrap(), None);
}
