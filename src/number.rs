use std::fmt::{self, Display};
use thiserror::Error;

/// A number exactly as it was written in a report.
///
/// The variant is decided by the lexeme alone: anything with a `.` or an
/// exponent marker is `Real`, integers go to the narrowest of `i32`/`i64`
/// that holds them. Two tokens with the same value but different tags are
/// not equal, and reals compare bit for bit, so `-0.0` and `0.0` differ.
#[derive(Debug, Clone, Copy)]
pub enum NumericToken {
    IntegerSmall(i32),
    /// An integer that needs more than 32 bits. Holding a value inside the
    /// `i32` range breaks round-tripping: it is written as plain digits and
    /// reads back as `IntegerSmall`. Use [`NumericToken::wide`] or
    /// `From<i64>` to construct one safely.
    IntegerWide(i64),
    Real(f64),
}

impl PartialEq for NumericToken {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NumericToken::IntegerSmall(a), NumericToken::IntegerSmall(b)) => a == b,
            (NumericToken::IntegerWide(a), NumericToken::IntegerWide(b)) => a == b,
            (NumericToken::Real(a), NumericToken::Real(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

/// The tag of a [`NumericToken`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    IntegerSmall,
    IntegerWide,
    Real,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberError {
    #[error("`{lexeme}` is not a valid number")]
    Malformed { lexeme: String },
    #[error("`{lexeme}` does not fit in a 64-bit integer or a finite double")]
    Overflow { lexeme: String },
}

impl NumericToken {
    /// Classifies a number lexeme into its tagged form.
    ///
    /// The lexeme must match the JSON number grammar exactly; no surrounding
    /// whitespace and no leading `+` or leading zeros.
    pub fn classify(lexeme: &str) -> Result<Self, NumberError> {
        if !is_number_lexeme(lexeme) {
            return Err(NumberError::Malformed {
                lexeme: lexeme.to_string(),
            });
        }

        let overflow = || NumberError::Overflow {
            lexeme: lexeme.to_string(),
        };

        if lexeme.bytes().any(|b| matches!(b, b'.' | b'e' | b'E')) {
            // std's float parsing is correctly rounded (ties-to-even).
            let value: f64 = lexeme.parse().map_err(|_| NumberError::Malformed {
                lexeme: lexeme.to_string(),
            })?;
            if !value.is_finite() {
                return Err(overflow());
            }
            return Ok(NumericToken::Real(value));
        }

        if let Ok(n) = lexeme.parse::<i32>() {
            Ok(NumericToken::IntegerSmall(n))
        } else if let Ok(n) = lexeme.parse::<i64>() {
            Ok(NumericToken::IntegerWide(n))
        } else {
            Err(overflow())
        }
    }

    /// An `IntegerWide` token, or `None` if `n` fits in 32 bits.
    #[must_use]
    pub fn wide(n: i64) -> Option<Self> {
        i32::try_from(n)
            .is_err()
            .then_some(NumericToken::IntegerWide(n))
    }

    /// Renders the token in the lexical form its tag implies.
    ///
    /// Integers are plain digits. Reals use the shortest representation
    /// that parses back to the same bits, and always keep a `.` or an
    /// exponent so the tag survives a re-parse.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    #[must_use]
    pub fn kind(&self) -> NumberKind {
        match self {
            NumericToken::IntegerSmall(_) => NumberKind::IntegerSmall,
            NumericToken::IntegerWide(_) => NumberKind::IntegerWide,
            NumericToken::Real(_) => NumberKind::Real,
        }
    }

    /// The integer value, or `None` for a `Real` (even an integral one).
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NumericToken::IntegerSmall(n) => Some(i64::from(*n)),
            NumericToken::IntegerWide(n) => Some(*n),
            NumericToken::Real(_) => None,
        }
    }

    /// The value as a double. Wide integers above 2^53 lose precision here.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            NumericToken::IntegerSmall(n) => f64::from(*n),
            NumericToken::IntegerWide(n) => *n as f64,
            NumericToken::Real(v) => *v,
        }
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        !matches!(self, NumericToken::Real(_))
    }
}

impl Display for NumericToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericToken::IntegerSmall(n) => write!(f, "{n}"),
            NumericToken::IntegerWide(n) => write!(f, "{n}"),
            // `Debug` on f64 is shortest round-trip and keeps `.0` or `e`.
            NumericToken::Real(v) => write!(f, "{v:?}"),
        }
    }
}

impl Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NumberKind::IntegerSmall => "32-bit integer",
            NumberKind::IntegerWide => "64-bit integer",
            NumberKind::Real => "double",
        };
        f.write_str(name)
    }
}

impl From<i32> for NumericToken {
    fn from(n: i32) -> Self {
        NumericToken::IntegerSmall(n)
    }
}

impl From<i64> for NumericToken {
    /// Picks the narrowest integer tag, matching what `classify` would give
    /// for the same digits.
    fn from(n: i64) -> Self {
        match i32::try_from(n) {
            Ok(small) => NumericToken::IntegerSmall(small),
            Err(_) => NumericToken::IntegerWide(n),
        }
    }
}

impl From<f64> for NumericToken {
    fn from(v: f64) -> Self {
        NumericToken::Real(v)
    }
}

/// Number ::= "-"? ( "0" | [1-9][0-9]* ) ( "." [0-9]+ )? ( [eE] [+-]? [0-9]+ )?
pub(crate) fn is_number_lexeme(lexeme: &str) -> bool {
    let bytes = lexeme.as_bytes();
    let mut i = 0;

    if bytes.first() == Some(&b'-') {
        i += 1;
    }

    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
        }
        _ => return false,
    }

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let digits_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == digits_start {
            return false;
        }
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let digits_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == digits_start {
            return false;
        }
    }

    i == bytes.len()
}
