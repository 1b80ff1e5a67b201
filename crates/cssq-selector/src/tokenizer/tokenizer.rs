use cssq_common::warning::{warn_once, warnings_enabled};

use super::token::{HashType, Numeric, Token};
use crate::error::SyntaxError;

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// Selector tokenizer following the CSS Syntax Module Level 3 algorithms,
/// restricted to the tokens a selector can contain.
///
/// Unlike a stylesheet tokenizer this one does not recover from errors: an
/// unterminated string, comment, or escape fails the whole input.
pub struct CSSTokenizer {
    /// The preprocessed input being tokenized
    input: Vec<char>,
    /// Current position in the input
    position: usize,
    /// Collected tokens
    tokens: Vec<Token>,
    /// Set once the first undecoded hex escape has been reported
    hex_escape_reported: bool,
}

impl CSSTokenizer {
    /// Create a new tokenizer over `input`, preprocessing it first.
    pub fn new(input: impl AsRef<str>) -> Self {
        Self {
            input: preprocess(input.as_ref()).chars().collect(),
            position: 0,
            tokens: Vec::new(),
            hex_escape_reported: false,
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// Consume the whole input into tokens.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] for an unterminated string, comment, or
    /// escape, or for a backslash followed by a newline.
    pub fn run(&mut self) -> Result<(), SyntaxError> {
        while let Some(c) = self.consume() {
            if let Some(token) = self.consume_token(c)? {
                self.tokens.push(token);
            }
        }
        Ok(())
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Return a reference to the collected tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Dispatch on the code point just consumed. Returns `None` for comments,
    /// which produce no token.
    fn consume_token(&mut self, c: char) -> Result<Option<Token>, SyntaxError> {
        let token = match c {
            // [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
            '/' if self.peek() == Some('*') => {
                let _ = self.consume(); // *
                self.consume_comment()?;
                return Ok(None);
            }

            // "whitespace"
            // "Consume as much whitespace as possible. Return a <whitespace-token>."
            c if is_whitespace(c) => {
                self.consume_whitespace();
                Token::Whitespace
            }

            // "U+0022 QUOTATION MARK (")" / "U+0027 APOSTROPHE (')"
            '"' | '\'' => self.consume_string_token(c)?,

            // "U+0023 NUMBER SIGN (#)"
            '#' => {
                // "If the next input code point is an ident code point or the next
                // two input code points are a valid escape..."
                if self.peek().is_some_and(is_ident_code_point)
                    || is_valid_escape(self.peek(), self.peek_at(1))
                {
                    // "If the next 3 input code points would start an ident sequence,
                    // set the <hash-token>'s type flag to 'id'."
                    let hash_type = if self.would_start_ident_sequence() {
                        HashType::Id
                    } else {
                        HashType::Unrestricted
                    };
                    let value = self.consume_ident_sequence()?;
                    Token::Hash { value, hash_type }
                } else {
                    Token::Delim('#')
                }
            }

            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            ',' => Token::Comma,
            ':' => Token::Colon,
            ';' => Token::Semicolon,
            '[' => Token::LeftBracket,
            ']' => Token::RightBracket,
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,

            // "U+002B PLUS SIGN (+)" / "U+002E FULL STOP (.)"
            '+' | '.' => {
                // "If the input stream starts with a number..."
                self.reconsume();
                if self.would_start_number() {
                    self.consume_numeric_token()?
                } else {
                    let _ = self.consume();
                    Token::Delim(c)
                }
            }

            // "U+002D HYPHEN-MINUS (-)"
            '-' => {
                self.reconsume();
                if self.would_start_number() {
                    self.consume_numeric_token()?
                }
                // "Otherwise, if the input stream starts with an ident sequence..."
                else if self.would_start_ident_sequence() {
                    self.consume_ident_like_token()?
                } else {
                    let _ = self.consume();
                    Token::Delim('-')
                }
            }

            // "U+0040 COMMERCIAL AT (@)"
            '@' => {
                if self.would_start_ident_sequence() {
                    Token::AtKeyword(self.consume_ident_sequence()?)
                } else {
                    Token::Delim('@')
                }
            }

            // "U+005C REVERSE SOLIDUS (\)"
            '\\' => {
                // "If the input stream starts with a valid escape..."
                if self.peek().is_some_and(|next| next != '\n') {
                    self.reconsume();
                    self.consume_ident_like_token()?
                } else {
                    return Err(SyntaxError::InvalidEscape);
                }
            }

            // "digit"
            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()?
            }

            // "ident-start code point"
            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()?
            }

            // "anything else"
            // "Return a <delim-token> with its value set to the current input code point."
            c => Token::Delim(c),
        };
        Ok(Some(token))
    }

    /// Consume up to and including the closing `*/`. The opening `/*` has
    /// already been consumed.
    fn consume_comment(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.consume() {
                Some('*') if self.peek() == Some('/') => {
                    let _ = self.consume(); // /
                    return Ok(());
                }
                Some('\\') => {
                    let _ = self.consume_escaped_code_point()?;
                }
                Some(_) => {}
                None => return Err(SyntaxError::UnterminatedComment),
            }
        }
    }

    /// Consume whitespace characters.
    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, ending_code_point: char) -> Result<Token, SyntaxError> {
        let mut value = String::new();

        loop {
            match self.consume() {
                // "ending code point"
                Some(c) if c == ending_code_point => return Ok(Token::String(value)),

                // "EOF"
                None => return Err(SyntaxError::UnterminatedString(value)),

                // "newline"
                Some('\n') => return Err(SyntaxError::NewlineInString),

                // "U+005C REVERSE SOLIDUS (\)"
                Some('\\') => {
                    // "Otherwise, if the next input code point is a newline, consume it."
                    if self.peek() == Some('\n') {
                        let _ = self.consume();
                    } else {
                        value.push(self.consume_escaped_code_point()?);
                    }
                }

                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> Result<Token, SyntaxError> {
        let number = self.consume_number();

        // "If the next 3 input code points would start an ident sequence..."
        if self.would_start_ident_sequence() {
            let unit = self.consume_ident_sequence()?;
            Ok(Token::Dimension { number, unit })
        } else {
            Ok(Token::Number(number))
        }
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    ///
    /// `url(` is not special-cased: selectors never contain URL tokens.
    fn consume_ident_like_token(&mut self) -> Result<Token, SyntaxError> {
        let string = self.consume_ident_sequence()?;

        // "Otherwise, if the next input code point is U+0028 LEFT PARENTHESIS (()"
        if self.peek() == Some('(') {
            let _ = self.consume();
            Ok(Token::Function(string))
        } else {
            Ok(Token::Ident(string))
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> Result<String, SyntaxError> {
        let mut result = String::new();

        loop {
            match self.peek() {
                Some(c) if is_ident_code_point(c) => {
                    let _ = self.consume();
                    result.push(c);
                }
                // "the stream starts with a valid escape"
                Some('\\') if self.peek_at(1) != Some('\n') => {
                    let _ = self.consume(); // backslash
                    result.push(self.consume_escaped_code_point()?);
                }
                _ => return Ok(result),
            }
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self) -> Numeric {
        let mut repr = String::new();

        if let Some(sign @ ('+' | '-')) = self.peek() {
            let _ = self.consume();
            repr.push(sign);
        }

        self.consume_digits(&mut repr);

        // "If the next 2 input code points are U+002E FULL STOP (.) followed by a digit..."
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            let _ = self.consume();
            repr.push('.');
            self.consume_digits(&mut repr);
        }

        // "If the next 2 or 3 input code points are U+0045 LATIN CAPITAL LETTER E (E)
        // or U+0065 LATIN SMALL LETTER E (e), optionally followed by U+002D HYPHEN-MINUS (-)
        // or U+002B PLUS SIGN (+), followed by a digit..."
        if let Some(e @ ('e' | 'E')) = self.peek() {
            let next = self.peek_at(1);
            let has_sign = matches!(next, Some('+' | '-'));
            let digit_pos = if has_sign { 2 } else { 1 };

            if self.peek_at(digit_pos).is_some_and(|c| c.is_ascii_digit()) {
                let _ = self.consume();
                repr.push(e);
                if let (true, Some(sign)) = (has_sign, next) {
                    let _ = self.consume();
                    repr.push(sign);
                }
                self.consume_digits(&mut repr);
            }
        }

        Numeric::from_repr(repr)
    }

    fn consume_digits(&mut self, repr: &mut String) {
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            let _ = self.consume();
            repr.push(c);
        }
    }

    /// Consume the code point after a backslash.
    ///
    /// NOTE: hex escapes are not decoded: `\41` yields `4` followed by the
    /// literal `1`, not `A`. This keeps one-code-point escapes (`\.`, `\:`)
    /// exact and is reported at most once per run through the warning channel.
    fn consume_escaped_code_point(&mut self) -> Result<char, SyntaxError> {
        let c = self.consume().ok_or(SyntaxError::UnterminatedEscape)?;
        if c.is_ascii_hexdigit() && !self.hex_escape_reported {
            self.hex_escape_reported = true;
            if warnings_enabled() {
                let source: String = self.input.iter().collect();
                let _ = warn_once(
                    "Tokenizer",
                    &format!("hex escape before '{c}' is not decoded in \"{source}\""),
                );
            }
        }
        Ok(c)
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn would_start_ident_sequence(&self) -> bool {
        match self.peek() {
            // "U+002D HYPHEN-MINUS"
            Some('-') => {
                let second = self.peek_at(1);
                // "If the second code point is an ident-start code point or a U+002D HYPHEN-MINUS,
                // or the second and third code points are a valid escape, return true."
                second.is_some_and(is_ident_start_code_point)
                    || second == Some('-')
                    || is_valid_escape(second, self.peek_at(2))
            }
            // "ident-start code point"
            Some(c) if is_ident_start_code_point(c) => true,
            // "U+005C REVERSE SOLIDUS (\)"
            Some('\\') => is_valid_escape(Some('\\'), self.peek_at(1)),
            _ => false,
        }
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn would_start_number(&self) -> bool {
        let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
        match self.peek() {
            Some('+' | '-') => {
                let second = self.peek_at(1);
                is_digit(second) || (second == Some('.') && is_digit(self.peek_at(2)))
            }
            Some('.') => is_digit(self.peek_at(1)),
            c => is_digit(c),
        }
    }

    /// Consume and return the next character.
    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    /// Put back the last consumed character.
    fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Peek at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    /// Peek at a character at an offset from current position.
    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// Tokenize a selector string in one call.
///
/// # Errors
///
/// See [`CSSTokenizer::run`].
pub fn tokenize(input: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut tokenizer = CSSTokenizer::new(input);
    tokenizer.run()?;
    Ok(tokenizer.into_tokens())
}

/// [§ 3.3 Preprocessing the input stream](https://www.w3.org/TR/css-syntax-3/#input-preprocessing)
///
/// Leading and trailing whitespace is dropped as well, since it can never be
/// meaningful in a selector.
fn preprocess(input: &str) -> String {
    input
        .trim()
        .replace("\r\n", "\n")
        .replace(['\r', '\x0C'], "\n")
        .replace('\0', "\u{FFFD}")
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
///
/// "A newline, U+0009 CHARACTER TABULATION, or U+0020 SPACE."
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ')
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && second.is_some_and(|c| c != '\n')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
///
/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
pub(crate) const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
///
/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
pub(crate) const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_escape_reported_once_per_run() {
        let mut tokenizer = CSSTokenizer::new(r"\31 st, \32 nd");
        assert!(!tokenizer.hex_escape_reported);
        tokenizer.run().unwrap();
        assert!(tokenizer.hex_escape_reported);
        assert_eq!(tokenizer.tokens()[0], Token::ident("31"));

        let mut plain = CSSTokenizer::new(r"a\.b");
        plain.run().unwrap();
        assert!(!plain.hex_escape_reported);
    }

    #[test]
    fn test_preprocess_normalizes_newlines_and_nul() {
        assert_eq!(preprocess("  a\r\nb\rc\x0Cd\0  "), "a\nb\nc\nd\u{FFFD}");
    }

    #[test]
    fn test_lookahead_does_not_consume() {
        let tokenizer = CSSTokenizer::new("-\\x");
        assert!(tokenizer.would_start_ident_sequence());
        assert!(!tokenizer.would_start_number());
        assert_eq!(tokenizer.position, 0);
    }
}
