//! CSS Token types per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! Only the subset of tokens a selector can contain is produced: there are no
//! `<url-token>`, `<unicode-range-token>`, `<percentage-token>`, CDO/CDC, or
//! bad-string/bad-url recovery tokens. A token sequence is immutable once
//! produced and is itself valid parser input.

use core::fmt;

use serde::Serialize;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A `<hash-token>` with the type flag set to 'id'... or 'unrestricted'."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HashType {
    /// "id" - the hash token's value is a valid identifier
    Id,
    /// "unrestricted" - the hash token's value is not a valid identifier
    Unrestricted,
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A `<number-token>` has a type flag set to either 'integer' or 'number'."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericType {
    /// "integer" - the number is an integer
    Integer,
    /// "number" - the number has a decimal point or exponent
    Number,
}

/// The numeric part shared by `<number-token>` and `<dimension-token>`.
///
/// The source text is kept next to the converted value so the token can be
/// rendered back exactly as written (`+.5e2` stays `+.5e2`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Numeric {
    /// The code points consumed for this number.
    pub repr: String,
    /// "a numeric value"
    pub value: f64,
    /// The integer value if this is an integer type.
    pub int_value: Option<i64>,
    /// "a type flag set to either 'integer' or 'number'"
    pub numeric_type: NumericType,
}

impl Numeric {
    /// [§ 4.3.13 Convert a string to a number](https://www.w3.org/TR/css-syntax-3/#convert-string-to-number)
    #[must_use]
    pub fn from_repr(repr: impl Into<String>) -> Self {
        let repr = repr.into();
        let is_integer = repr
            .trim_start_matches(['+', '-'])
            .chars()
            .all(|c| c.is_ascii_digit());
        let value = repr.parse().unwrap_or(0.0);
        let (int_value, numeric_type) = if is_integer {
            (repr.parse().ok(), NumericType::Integer)
        } else {
            (None, NumericType::Number)
        };
        Self {
            repr,
            value,
            int_value,
            numeric_type,
        }
    }
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// The tokens a selector string breaks into.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Token {
    /// "`<ident-token>`"
    /// "has a value composed of one or more code points"
    Ident(String),

    /// "`<function-token>`"
    /// The name before U+0028 LEFT PARENTHESIS; the parenthesis is part of the token.
    Function(String),

    /// "`<at-keyword-token>`"
    /// The name after U+0040 COMMERCIAL AT (@).
    AtKeyword(String),

    /// "`<hash-token>`"
    /// "has a type flag set to either 'id' or 'unrestricted'"
    Hash {
        /// The code points after U+0023 NUMBER SIGN (#).
        value: String,
        /// "a type flag set to either 'id' or 'unrestricted'"
        hash_type: HashType,
    },

    /// "`<string-token>`"
    /// "has a value composed of zero or more code points"
    String(String),

    /// "`<number-token>`"
    Number(Numeric),

    /// "`<dimension-token>`"
    /// "has a numeric value, a type flag, and a unit"
    Dimension {
        /// The numeric part.
        number: Numeric,
        /// "a unit"
        unit: String,
    },

    /// "`<delim-token>`"
    /// "has a value composed of a single code point"
    ///
    /// Combinators, `*`, `.`, `|` and the attribute matcher characters all
    /// reach the parser this way.
    Delim(char),

    /// "`<whitespace-token>`"
    /// One run of whitespace, however long.
    Whitespace,

    /// "`<colon-token>`"
    Colon,

    /// "`<semicolon-token>`"
    Semicolon,

    /// "`<comma-token>`"
    Comma,

    /// `<[-token>`
    LeftBracket,

    /// `<]-token>`
    RightBracket,

    /// `<(-token>`
    LeftParen,

    /// `<)-token>`
    RightParen,

    /// `<{-token>`
    LeftBrace,

    /// `<}-token>`
    RightBrace,
}

impl Token {
    /// Create a new ident token.
    #[must_use]
    pub fn ident(value: impl Into<String>) -> Self {
        Self::Ident(value.into())
    }

    /// Create a new function token.
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function(name.into())
    }

    /// Create a new hash token with id type.
    #[must_use]
    pub fn hash_id(value: impl Into<String>) -> Self {
        Self::Hash {
            value: value.into(),
            hash_type: HashType::Id,
        }
    }

    /// Create a new string token.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Create a new number token from its source text.
    #[must_use]
    pub fn number(repr: impl Into<String>) -> Self {
        Self::Number(Numeric::from_repr(repr))
    }

    /// Create a new delim token.
    #[must_use]
    pub const fn delim(c: char) -> Self {
        Self::Delim(c)
    }

    /// Returns true if this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }

    /// Returns true if this is a delim token carrying `c`.
    #[must_use]
    pub fn is_delim(&self, c: char) -> bool {
        matches!(self, Self::Delim(d) if *d == c)
    }

    /// Short kind name used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Ident(_) => "ident",
            Self::Function(_) => "function",
            Self::AtKeyword(_) => "at-keyword",
            Self::Hash { .. } => "hash",
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Dimension { .. } => "dimension",
            Self::Delim(_) => "delim",
            Self::Whitespace => "whitespace",
            Self::Colon => "colon",
            Self::Semicolon => "semicolon",
            Self::Comma => "comma",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(v) => write!(f, "<ident:{v}>"),
            Self::Function(v) => write!(f, "<function:{v}(>"),
            Self::AtKeyword(v) => write!(f, "<at-keyword:@{v}>"),
            Self::Hash { value, hash_type } => {
                let t = match hash_type {
                    HashType::Id => "id",
                    HashType::Unrestricted => "unrestricted",
                };
                write!(f, "<hash:#{value} ({t})>")
            }
            Self::String(v) => write!(f, "<string:\"{v}\">"),
            Self::Delim(c) => write!(f, "<delim:{c}>"),
            Self::Number(n) => write!(f, "<number:{}>", n.repr),
            Self::Dimension { number, unit } => write!(f, "<dimension:{}{unit}>", number.repr),
            Self::Whitespace => write!(f, "<whitespace>"),
            Self::Colon => write!(f, "<colon>"),
            Self::Semicolon => write!(f, "<semicolon>"),
            Self::Comma => write!(f, "<comma>"),
            Self::LeftBracket => write!(f, "<[>"),
            Self::RightBracket => write!(f, "<]>"),
            Self::LeftParen => write!(f, "<(>"),
            Self::RightParen => write!(f, "<)>"),
            Self::LeftBrace => write!(f, "<{{>"),
            Self::RightBrace => write!(f, "<}}>"),
        }
    }
}
