//! Selector parser per [Selectors Level 4 § 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar).
//!
//! Recursive descent over an immutable token slice with an index cursor.
//! Nested arguments (`:not(a, b)`) are parsed by running a fresh parser over
//! the sub-slice between the parentheses.
//!
//! ```text
//! <selector-list>     = <complex-selector>#
//! <complex-selector>  = <combinator>? <compound-selector> [ <combinator>? <compound-selector> ]*
//! <compound-selector> = [ <type-selector> | <id> | <class> | <attribute> | <pseudo> ]+
//! <combinator>        = '>' | '+' | '~' | <whitespace>
//! ```
//!
//! The compound production is permissive: simple selectors are accepted in
//! any order and any number, so `[x]p` and `a:hover b|c` parse.

use cssq_common::warning::warn_once;

use super::microsyntax::{ParseOptions, Syntax};
use super::{
    AttributeMatcher, AttributeModifier, AttributeSelector, ClassSelector, Combinator,
    ComplexSelector, CompoundSelector, IdSelector, PseudoArgument, PseudoSelector, Selector,
    SelectorList, TypeSelector,
};
use crate::error::{Result, SyntaxError};
use crate::tokenizer::{Token, tokenize};

/// Parse a selector string with the built-in microsyntax table.
///
/// Empty or whitespace-only input yields an empty list.
///
/// # Errors
///
/// Returns [`Error::Syntax`](crate::Error::Syntax) for malformed input.
pub fn parse(input: &str) -> Result<SelectorList> {
    parse_with_options(input, &ParseOptions::default())
}

/// Parse a selector string with caller-supplied options.
///
/// # Errors
///
/// Returns [`Error::Syntax`](crate::Error::Syntax) for malformed input, or
/// whatever a custom microsyntax reports.
pub fn parse_with_options(input: &str, options: &ParseOptions) -> Result<SelectorList> {
    let tokens = tokenize(input)?;
    parse_tokens(&tokens, options)
}

/// Parse an already-tokenized selector.
///
/// # Errors
///
/// See [`parse_with_options`].
pub fn parse_tokens(tokens: &[Token], options: &ParseOptions) -> Result<SelectorList> {
    SelectorParser::new(tokens, options).parse_selector_list()
}

/// Selector parser over a token slice.
pub struct SelectorParser<'a> {
    tokens: &'a [Token],
    position: usize,
    options: &'a ParseOptions,
}

impl<'a> SelectorParser<'a> {
    /// Create a new parser over `tokens`.
    #[must_use]
    pub const fn new(tokens: &'a [Token], options: &'a ParseOptions) -> Self {
        Self {
            tokens,
            position: 0,
            options,
        }
    }

    /// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
    ///
    /// Consume the whole token slice as a comma-separated list.
    ///
    /// # Errors
    ///
    /// An empty member, a dangling comma, or any token that cannot continue
    /// a selector is [`SyntaxError::UnexpectedToken`].
    pub fn parse_selector_list(&mut self) -> Result<SelectorList> {
        let mut list = SelectorList::default();

        let _ = self.skip_whitespace();
        if self.at_end() {
            return Ok(list);
        }

        loop {
            let _ = self.skip_whitespace();
            let Some(selector) = self.parse_complex_selector()? else {
                return Err(self.unexpected().into());
            };
            list.selectors.push(selector);

            let _ = self.skip_whitespace();
            match self.current() {
                None => return Ok(list),
                Some(Token::Comma) => self.advance(),
                Some(_) => return Err(self.unexpected().into()),
            }
        }
    }

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    ///
    /// Returns `None` when no compound selector starts here. A lone compound
    /// selector is returned unwrapped.
    fn parse_complex_selector(&mut self) -> Result<Option<Selector>> {
        // A leading explicit combinator makes a relative selector (`> img`).
        let leading = self.parse_explicit_combinator();

        let mut selector = match (leading, self.parse_compound_selector()?) {
            (None, None) => return Ok(None),
            (None, Some(first)) => first,
            (Some(combinator), Some(right)) => Selector::Complex(ComplexSelector {
                left: None,
                combinator,
                right: Box::new(right),
            }),
            (Some(combinator), None) => {
                return Err(SyntaxError::ExpectedSelectorAfterCombinator(combinator.as_char()).into());
            }
        };

        loop {
            let checkpoint = self.position;
            let Some(combinator) = self.parse_combinator() else {
                break;
            };

            match self.parse_compound_selector()? {
                Some(right) => {
                    selector = Selector::Complex(ComplexSelector {
                        left: Some(Box::new(selector)),
                        combinator,
                        right: Box::new(right),
                    });
                }
                // Trailing whitespace before `,` `)` or the end: not a combinator.
                None if combinator == Combinator::Descendant => {
                    self.position = checkpoint;
                    break;
                }
                None => {
                    return Err(
                        SyntaxError::ExpectedSelectorAfterCombinator(combinator.as_char()).into(),
                    );
                }
            }
        }

        Ok(Some(selector))
    }

    /// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
    ///
    /// Whitespace alone is the descendant combinator; whitespace around `>`,
    /// `+` or `~` is insignificant.
    fn parse_combinator(&mut self) -> Option<Combinator> {
        let had_whitespace = self.skip_whitespace();
        self.parse_explicit_combinator()
            .or_else(|| had_whitespace.then_some(Combinator::Descendant))
    }

    /// `>`, `+` or `~`, with the whitespace after it.
    fn parse_explicit_combinator(&mut self) -> Option<Combinator> {
        let Some(Token::Delim(c)) = self.current() else {
            return None;
        };
        let combinator = Combinator::from_delim(*c)?;
        self.advance();
        let _ = self.skip_whitespace();
        Some(combinator)
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    fn parse_compound_selector(&mut self) -> Result<Option<Selector>> {
        let mut selectors = Vec::new();
        while let Some(simple) = self.parse_simple_selector()? {
            selectors.push(simple);
        }

        Ok(match selectors.len() {
            0 => None,
            1 => selectors.pop(),
            _ => Some(Selector::Compound(CompoundSelector { selectors })),
        })
    }

    /// One simple selector, or `None` if the current token cannot start one.
    fn parse_simple_selector(&mut self) -> Result<Option<Selector>> {
        if let Some(type_selector) = self.parse_type_selector()? {
            return Ok(Some(Selector::Type(type_selector)));
        }

        let selector = match self.current() {
            // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
            // "An ID selector is a hash (#, U+0023) immediately followed by the ID value"
            Some(Token::Hash { value, .. }) => {
                let identifier = value.clone();
                self.advance();
                Selector::Id(IdSelector { identifier })
            }

            // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
            // "The class selector is given as a full stop (. U+002E) immediately
            // followed by an identifier."
            Some(Token::Delim('.')) => {
                let Some(Token::Ident(identifier)) = self.peek_at(1) else {
                    return Ok(None);
                };
                let identifier = identifier.clone();
                self.position += 2;
                Selector::Class(ClassSelector { identifier })
            }

            Some(Token::LeftBracket) => Selector::Attribute(self.parse_attribute_selector()?),

            Some(Token::Colon) => match self.parse_pseudo()? {
                Some(pseudo) => pseudo,
                None => return Ok(None),
            },

            _ => return Ok(None),
        };

        Ok(Some(selector))
    }

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    fn parse_type_selector(&mut self) -> Result<Option<TypeSelector>> {
        let namespace = self.parse_namespace_prefix()?;

        let identifier = match self.current() {
            Some(Token::Ident(name)) => name.clone(),
            Some(Token::Delim('*')) => "*".to_string(),
            _ => return Ok(None),
        };
        self.advance();

        Ok(Some(TypeSelector {
            identifier,
            namespace,
        }))
    }

    /// [§ 5.3 Namespaces in selectors](https://www.w3.org/TR/selectors-4/#type-nmsp)
    ///
    /// `ns|`, `*|` or a bare `|`. Only consumed when a name or `*` follows the
    /// bar, so the `|=` of `[lang|=en]` stays an attribute matcher.
    fn parse_namespace_prefix(&mut self) -> Result<Option<String>> {
        let (namespace, bar) = match (self.current(), self.peek_at(1)) {
            (Some(Token::Ident(ns)), Some(Token::Delim('|'))) => (ns.clone(), 1),
            (Some(Token::Delim('*')), Some(Token::Delim('|'))) => ("*".to_string(), 1),
            (Some(Token::Delim('|')), _) => (String::new(), 0),
            _ => return Ok(None),
        };

        match self.peek_at(bar + 1) {
            Some(Token::Ident(_) | Token::Delim('*')) => {
                self.position += bar + 1;
                Ok(Some(namespace))
            }
            Some(Token::Delim('=')) => Ok(None),
            _ => Err(SyntaxError::ExpectedNameAfterNamespace(namespace).into()),
        }
    }

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// ```text
    /// '[' <wq-name> ']' |
    /// '[' <wq-name> <attr-matcher> [ <string-token> | <ident-token> ] <attr-modifier>? ']'
    /// ```
    fn parse_attribute_selector(&mut self) -> Result<AttributeSelector> {
        self.advance(); // [
        let _ = self.skip_whitespace();

        let namespace = self.parse_namespace_prefix()?;
        let Some(Token::Ident(name)) = self.current() else {
            return Err(SyntaxError::InvalidAttributeName.into());
        };
        let mut attribute = AttributeSelector {
            identifier: name.clone(),
            namespace,
            matcher: None,
            value: None,
            modifier: None,
        };
        self.advance();
        let _ = self.skip_whitespace();

        if let Some(matcher) = self.parse_attribute_matcher() {
            let _ = self.skip_whitespace();
            let value = match self.current() {
                Some(Token::String(value) | Token::Ident(value)) => value.clone(),
                _ => return Err(SyntaxError::ExpectedAttributeValue.into()),
            };
            self.advance();
            let _ = self.skip_whitespace();

            attribute.matcher = Some(matcher);
            attribute.value = Some(value);
            attribute.modifier = self.parse_attribute_modifier();
            let _ = self.skip_whitespace();
        }

        match self.current() {
            Some(Token::RightBracket) => {
                self.advance();
                Ok(attribute)
            }
            // Tolerated: the input ended before the closing bracket.
            None => {
                let _ = warn_once(
                    "Parser",
                    &format!("unclosed attribute selector [{}", attribute.identifier),
                );
                Ok(attribute)
            }
            Some(_) => Err(SyntaxError::UnclosedAttributeSelector.into()),
        }
    }

    /// `=` or any `<delim>` immediately followed by `=`.
    fn parse_attribute_matcher(&mut self) -> Option<AttributeMatcher> {
        match (self.current(), self.peek_at(1)) {
            (Some(Token::Delim('=')), _) => {
                self.advance();
                Some(AttributeMatcher::Equals)
            }
            (Some(Token::Delim(c)), Some(Token::Delim('='))) => {
                let matcher = AttributeMatcher::from_prefix(Some(*c));
                self.position += 2;
                Some(matcher)
            }
            _ => None,
        }
    }

    /// [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
    fn parse_attribute_modifier(&mut self) -> Option<AttributeModifier> {
        let Some(Token::Ident(flag)) = self.current() else {
            return None;
        };
        let modifier = if flag.eq_ignore_ascii_case("i") {
            AttributeModifier::CaseInsensitive
        } else if flag.eq_ignore_ascii_case("s") {
            AttributeModifier::CaseSensitive
        } else {
            return None;
        };
        self.advance();
        Some(modifier)
    }

    /// [§ 3.6 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// [§ 3.6.1 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    ///
    /// `:name`, `:name(...)`, `::name`, `::name(...)`. Returns `None` if the
    /// colon is not followed by a name.
    fn parse_pseudo(&mut self) -> Result<Option<Selector>> {
        let is_element = matches!(self.peek_at(1), Some(Token::Colon));
        let name_at = if is_element { 2 } else { 1 };

        let (identifier, is_function) = match self.peek_at(name_at) {
            Some(Token::Ident(name)) => (name.clone(), false),
            Some(Token::Function(name)) => (name.clone(), true),
            _ => return Ok(None),
        };
        self.position += name_at + 1;

        let argument = if is_function {
            let tokens = self.consume_function_arguments()?;
            let prefix = if is_element { "::" } else { ":" };
            let key = format!("{prefix}{}", identifier.to_ascii_lowercase());
            Some(self.resolve_argument(&key, tokens)?)
        } else {
            None
        };

        let pseudo = PseudoSelector {
            identifier,
            argument,
        };
        Ok(Some(if is_element {
            Selector::PseudoElement(pseudo)
        } else {
            Selector::PseudoClass(pseudo)
        }))
    }

    /// Collect the tokens up to the `)` matching an already-consumed function
    /// token, and step past it.
    fn consume_function_arguments(&mut self) -> Result<&'a [Token]> {
        let start = self.position;
        let mut depth = 1_usize;

        loop {
            match self.current() {
                None => return Err(SyntaxError::ParenthesesMismatch.into()),
                Some(Token::RightParen) => {
                    depth -= 1;
                    if depth == 0 {
                        let arguments = &self.tokens[start..self.position];
                        self.advance();
                        return Ok(arguments);
                    }
                }
                Some(Token::Function(_) | Token::LeftParen) => depth += 1,
                Some(_) => {}
            }
            self.advance();
        }
    }

    fn resolve_argument(&self, key: &str, tokens: &[Token]) -> Result<PseudoArgument> {
        match self.options.syntaxes.get(key) {
            Some(syntax) => syntax.apply(tokens, self.options),
            None => Syntax::None.apply(tokens, self.options),
        }
    }

    /// Skip whitespace tokens, returning whether any were skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.position;
        while self.current().is_some_and(Token::is_whitespace) {
            self.advance();
        }
        self.position != start
    }

    fn unexpected(&self) -> SyntaxError {
        SyntaxError::UnexpectedToken(
            self.current()
                .map_or_else(|| "end of input".to_string(), ToString::to_string),
        )
    }

    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn peek_at(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.position + offset)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_whitespace_is_not_a_combinator() {
        let list = parse("a , b ").expect("parses");
        assert_eq!(list.len(), 2);
        assert!(matches!(list.selectors[0], Selector::Type(_)));
    }

    #[test]
    fn test_function_arguments_track_depth() {
        let tokens = tokenize("x(a(b) (c)) d").expect("tokenizes");
        let options = ParseOptions::default();
        let mut parser = SelectorParser::new(&tokens, &options);
        parser.advance();
        let args = parser.consume_function_arguments().expect("balanced");
        assert_eq!(args.len(), 7);
        assert_eq!(parser.current(), Some(&Token::Whitespace));
    }
}
