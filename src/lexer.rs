use crate::number::{NumberError, NumericToken};

/// Represents the different kinds of tokens the lexer can produce.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    // == Special Tokens ==
    /// Represents the end of the input.
    Eof,
    /// One or more of space, tab, carriage return or line feed.
    Whitespace,
    /// Input the lexer could not turn into a token. Carries the reason so
    /// the parser can report it at the right offset.
    Invalid(LexFault),

    // == Literals ==
    /// A string literal with its escapes already decoded.
    String(String),
    /// A number literal, tagged by its lexical form.
    Number(NumericToken),

    // == Keywords ==
    True,
    False,
    Null,

    // == Punctuation ==
    /// Left Brace: `{`
    LBrace,
    /// Right Brace: `}`
    RBrace,
    /// Left Bracket: `[`
    LBracket,
    /// Right Bracket: `]`
    RBracket,
    /// Comma: `,`
    Comma,
    /// Colon: `:`
    Colon,
}

/// Why a stretch of input did not form a token.
#[derive(Debug, PartialEq, Clone)]
pub enum LexFault {
    UnexpectedChar(char),
    UnknownLiteral(String),
    UnterminatedString,
    /// A bad escape or raw control character. `at` is the absolute offset
    /// of the offending character.
    MalformedString { at: usize, reason: String },
    MalformedNumber(String),
    NumericOverflow(String),
}

/// A token with its type and position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub ttype: TokenType,
    pub pos_start: usize,
    pub pos_end: usize,
}

impl Token {
    pub fn new(ttype: TokenType, pos_start: usize, pos_end: usize) -> Token {
        Token {
            ttype,
            pos_start,
            pos_end,
        }
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Lexes the whole input. The parser pulls tokens one at a time instead;
    /// this is for tests and benchmarks.
    pub fn lex(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if token.ttype == TokenType::Eof {
                tokens.push(token);
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    pub fn next_token(&mut self) -> Token {
        let start_pos = self.position;

        let ttype = if let Some(char) = self.advance() {
            match char {
                '{' => TokenType::LBrace,
                '}' => TokenType::RBrace,
                '[' => TokenType::LBracket,
                ']' => TokenType::RBracket,
                ',' => TokenType::Comma,
                ':' => TokenType::Colon,
                '"' => self.read_string(),
                ' ' | '\t' | '\n' | '\r' => self.read_whitespace(),
                c if c.is_ascii_alphabetic() => self.read_literal(start_pos),
                c if c.is_ascii_digit() || c == '-' => self.read_number(start_pos),
                c => TokenType::Invalid(LexFault::UnexpectedChar(c)),
            }
        } else {
            TokenType::Eof
        };

        Token::new(ttype, start_pos, self.position)
    }

    fn advance(&mut self) -> Option<char> {
        let char = self.chars.next();
        if let Some(c) = char {
            self.position += c.len_utf8();
        }
        char
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn read_whitespace(&mut self) -> TokenType {
        while let Some(' ' | '\t' | '\n' | '\r') = self.peek() {
            self.advance();
        }
        TokenType::Whitespace
    }

    fn read_string(&mut self) -> TokenType {
        let mut value = String::new();
        loop {
            let char_pos = self.position;
            let Some(c) = self.advance() else {
                return TokenType::Invalid(LexFault::UnterminatedString);
            };

            match c {
                '"' => return TokenType::String(value),
                '\\' => {
                    if let Err(fault) = self.read_escape(char_pos, &mut value) {
                        return TokenType::Invalid(fault);
                    }
                }
                c if (c as u32) < 0x20 => {
                    return TokenType::Invalid(LexFault::MalformedString {
                        at: char_pos,
                        reason: format!("raw control character U+{:04X}", c as u32),
                    });
                }
                c => value.push(c),
            }
        }
    }

    /// Decodes one escape sequence; the backslash at `escape_pos` is already consumed.
    fn read_escape(&mut self, escape_pos: usize, value: &mut String) -> Result<(), LexFault> {
        let Some(escaped_char) = self.advance() else {
            return Err(LexFault::UnterminatedString);
        };

        match escaped_char {
            '"' => value.push('"'),
            '\\' => value.push('\\'),
            '/' => value.push('/'),
            'b' => value.push('\u{08}'),
            'f' => value.push('\u{0C}'),
            'n' => value.push('\n'),
            'r' => value.push('\r'),
            't' => value.push('\t'),
            'u' => {
                let unit = self.read_hex4(escape_pos)?;
                value.push(self.decode_utf16(escape_pos, unit)?);
            }
            other => {
                return Err(LexFault::MalformedString {
                    at: escape_pos,
                    reason: format!("invalid escape `\\{other}`"),
                });
            }
        }
        Ok(())
    }

    fn read_hex4(&mut self, escape_pos: usize) -> Result<u16, LexFault> {
        let mut unit: u16 = 0;
        for _ in 0..4 {
            let digit = self
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| LexFault::MalformedString {
                    at: escape_pos,
                    reason: "`\\u` must be followed by four hex digits".to_string(),
                })?;
            self.advance();
            // Four hex digits always fit in 16 bits.
            unit = (unit << 4) | digit as u16;
        }
        Ok(unit)
    }

    fn decode_utf16(&mut self, escape_pos: usize, unit: u16) -> Result<char, LexFault> {
        let unpaired = || LexFault::MalformedString {
            at: escape_pos,
            reason: format!("unpaired surrogate \\u{unit:04X}"),
        };

        match unit {
            0xD800..=0xDBFF => {
                if self.advance() != Some('\\') || self.advance() != Some('u') {
                    return Err(unpaired());
                }
                let low = self.read_hex4(escape_pos)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(unpaired());
                }
                let code = 0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                char::from_u32(code).ok_or_else(unpaired)
            }
            0xDC00..=0xDFFF => Err(unpaired()),
            _ => char::from_u32(u32::from(unit)).ok_or_else(unpaired),
        }
    }

    fn read_literal(&mut self, start_pos: usize) -> TokenType {
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() {
                self.advance();
            } else {
                break;
            }
        }

        match &self.input[start_pos..self.position] {
            "true" => TokenType::True,
            "false" => TokenType::False,
            "null" => TokenType::Null,
            other => TokenType::Invalid(LexFault::UnknownLiteral(other.to_string())),
        }
    }

    /// Scans greedily over anything that could continue a number and lets
    /// `NumericToken::classify` decide whether the lexeme is well-formed.
    fn read_number(&mut self, start_pos: usize) -> TokenType {
        let mut has_dot = false;
        let mut has_exponent = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else if *c == '.' && !has_dot && !has_exponent {
                has_dot = true;
                self.advance();
            } else if (*c == 'e' || *c == 'E') && !has_exponent {
                has_exponent = true;
                self.advance();
                // Check for optional sign after 'e' or 'E'
                if let Some('+' | '-') = self.peek() {
                    self.advance();
                }
            } else {
                break;
            }
        }

        let lexeme = &self.input[start_pos..self.position];
        match NumericToken::classify(lexeme) {
            Ok(token) => TokenType::Number(token),
            Err(NumberError::Malformed { lexeme }) => {
                TokenType::Invalid(LexFault::MalformedNumber(lexeme))
            }
            Err(NumberError::Overflow { lexeme }) => {
                TokenType::Invalid(LexFault::NumericOverflow(lexeme))
            }
        }
    }
}
