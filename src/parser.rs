use crate::ast::*;
use crate::config::ReaderOptions;
use crate::error::{ParserError, ReportError};
use crate::lexer::{LexFault, Lexer, Token, TokenType};
use miette::NamedSource;
use std::collections::HashSet;
use std::sync::Arc;

/// A recursive descent parser for report documents.
///
/// Tokens are pulled from the lexer one at a time with a single token of
/// lookahead, so the first problem in source order is the one reported.
pub struct Parser<'a> {
    source: Arc<NamedSource<String>>,
    lexer: Lexer<'a>,
    current: Token,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source_text: &'a str) -> Result<Self, ReportError> {
        Self::new_with_name(source_text, "report.json".to_string())
    }

    pub fn new_with_name(source_text: &'a str, name: String) -> Result<Self, ReportError> {
        Self::with_options(source_text, name, &ReaderOptions::default())
    }

    pub fn with_options(
        source_text: &'a str,
        name: String,
        options: &ReaderOptions,
    ) -> Result<Self, ReportError> {
        let source = Arc::new(NamedSource::new(name, source_text.to_string()));
        let mut parser = Self {
            source,
            lexer: Lexer::new(source_text),
            current: Token::new(TokenType::Eof, 0, 0),
            depth: 0,
            max_depth: options.max_depth,
        };
        parser.current = parser.next_significant()?;
        Ok(parser)
    }

    // === Main Parsing Methods ===

    /// Document ::= Value EOF
    pub fn parse_document(&mut self) -> Result<Document, ReportError> {
        let root = self.parse_value()?;
        if !self.check(&TokenType::Eof) {
            return self.err_unexpected("end of input");
        }
        Ok(Document { root })
    }

    /// Value ::= Object | Array | String | Number | "true" | "false" | "null"
    fn parse_value(&mut self) -> Result<Node, ReportError> {
        let start = self.current.clone();
        let kind = match start.ttype {
            TokenType::LBrace => return self.parse_object(),
            TokenType::LBracket => return self.parse_array(),
            TokenType::String(s) => NodeKind::String(s),
            TokenType::Number(n) => NodeKind::Number(n),
            TokenType::True => NodeKind::Boolean(true),
            TokenType::False => NodeKind::Boolean(false),
            TokenType::Null => NodeKind::Null,
            _ => return self.err_unexpected("a value"),
        };
        self.advance()?;
        Ok(Node::new(kind, start.pos_start, start.pos_end))
    }

    /// Object ::= "{" [ Pair { "," Pair } ] "}"
    fn parse_object(&mut self) -> Result<Node, ReportError> {
        let start_pos = self.current.pos_start;
        self.enter()?;
        self.expect(TokenType::LBrace)?;

        let mut pairs: Vec<Pair> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        if !self.check(&TokenType::RBrace) {
            loop {
                pairs.push(self.parse_pair(&mut seen)?);

                if !self.match_token(&TokenType::Comma)? {
                    break;
                }
            }
        }

        let end_pos = self.current.pos_end;
        self.expect(TokenType::RBrace)?;
        self.depth -= 1;
        Ok(Node::new(NodeKind::Object(pairs), start_pos, end_pos))
    }

    /// Pair ::= String ":" Value
    ///
    /// The key is checked against `seen` before its value is parsed.
    fn parse_pair(&mut self, seen: &mut HashSet<String>) -> Result<Pair, ReportError> {
        let key = match &self.current.ttype {
            TokenType::String(s) => s.clone(),
            _ => return self.err_unexpected("a string for a field name"),
        };
        if !seen.insert(key.clone()) {
            return Err(ParserError::DuplicateField {
                src: (*self.source).clone(),
                span: (
                    self.current.pos_start,
                    self.current.pos_end - self.current.pos_start,
                )
                    .into(),
                field: key,
            }
            .into());
        }
        self.advance()?;
        self.expect(TokenType::Colon)?;
        let value = self.parse_value()?;
        Ok(Pair { key, value })
    }

    /// Array ::= "[" [ Value { "," Value } ] "]"
    fn parse_array(&mut self) -> Result<Node, ReportError> {
        let start_pos = self.current.pos_start;
        self.enter()?;
        self.expect(TokenType::LBracket)?;

        let mut values = Vec::new();
        if !self.check(&TokenType::RBracket) {
            loop {
                values.push(self.parse_value()?);
                if !self.match_token(&TokenType::Comma)? {
                    break;
                }
            }
        }

        let end_pos = self.current.pos_end;
        self.expect(TokenType::RBracket)?;
        self.depth -= 1;
        Ok(Node::new(NodeKind::Array(values), start_pos, end_pos))
    }

    // === Tokenizer Helper Methods ===

    /// Pulls the next non-whitespace token, turning lexer faults into errors.
    fn next_significant(&mut self) -> Result<Token, ReportError> {
        loop {
            let token = self.lexer.next_token();
            match token.ttype {
                TokenType::Whitespace => continue,
                TokenType::Invalid(fault) => {
                    return Err(self.lex_error(fault, token.pos_start, token.pos_end))
                }
                _ => return Ok(token),
            }
        }
    }

    fn advance(&mut self) -> Result<(), ReportError> {
        if self.current.ttype != TokenType::Eof {
            self.current = self.next_significant()?;
        }
        Ok(())
    }

    fn expect(&mut self, expected: TokenType) -> Result<(), ReportError> {
        if self.check(&expected) {
            self.advance()
        } else {
            self.err_unexpected(&describe(&expected))
        }
    }

    fn match_token(&mut self, ttype: &TokenType) -> Result<bool, ReportError> {
        if self.check(ttype) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn check(&self, ttype: &TokenType) -> bool {
        std::mem::discriminant(&self.current.ttype) == std::mem::discriminant(ttype)
    }

    fn enter(&mut self) -> Result<(), ReportError> {
        if self.depth >= self.max_depth {
            return Err(ParserError::NestingTooDeep {
                src: (*self.source).clone(),
                span: (self.current.pos_start, 1).into(),
                max_depth: self.max_depth,
            }
            .into());
        }
        self.depth += 1;
        Ok(())
    }

    fn err_unexpected<T>(&self, expected: &str) -> Result<T, ReportError> {
        let token = &self.current;
        Err(ParserError::Syntax {
            src: (*self.source).clone(),
            span: (token.pos_start, token.pos_end - token.pos_start).into(),
            expected: expected.to_string(),
            found: describe(&token.ttype),
        }
        .into())
    }

    fn lex_error(&self, fault: LexFault, pos_start: usize, pos_end: usize) -> ReportError {
        let src = (*self.source).clone();
        let span = (pos_start, pos_end - pos_start).into();
        match fault {
            LexFault::MalformedString { at, reason } => ParserError::MalformedString {
                src,
                span: (at, pos_end.saturating_sub(at).max(1)).into(),
                reason,
            },
            LexFault::NumericOverflow(lexeme) => ParserError::NumericOverflow { src, span, lexeme },
            LexFault::UnexpectedChar(c) => ParserError::Syntax {
                src,
                span,
                expected: "a value or punctuation".to_string(),
                found: format!("unexpected character {c:?}"),
            },
            LexFault::UnknownLiteral(word) => ParserError::Syntax {
                src,
                span,
                expected: "`true`, `false` or `null`".to_string(),
                found: format!("`{word}`"),
            },
            LexFault::UnterminatedString => ParserError::Syntax {
                src,
                span,
                expected: "a closing quote".to_string(),
                found: "end of input".to_string(),
            },
            LexFault::MalformedNumber(lexeme) => ParserError::Syntax {
                src,
                span,
                expected: "a complete number".to_string(),
                found: format!("`{lexeme}`"),
            },
        }
        .into()
    }
}

fn describe(ttype: &TokenType) -> String {
    match ttype {
        TokenType::Eof => "end of input".to_string(),
        TokenType::Whitespace => "whitespace".to_string(),
        TokenType::Invalid(fault) => format!("{fault:?}"),
        TokenType::String(s) => format!("string {s:?}"),
        TokenType::Number(n) => format!("number {n}"),
        TokenType::True => "`true`".to_string(),
        TokenType::False => "`false`".to_string(),
        TokenType::Null => "`null`".to_string(),
        TokenType::LBrace => "`{`".to_string(),
        TokenType::RBrace => "`}`".to_string(),
        TokenType::LBracket => "`[`".to_string(),
        TokenType::RBracket => "`]`".to_string(),
        TokenType::Comma => "`,`".to_string(),
        TokenType::Colon => "`:`".to_string(),
    }
}
