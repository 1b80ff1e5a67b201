//! [CSSOM § 6.7.2 Serializing Selectors](https://drafts.csswg.org/cssom/#serializing-selectors)
//!
//! Renders an AST back into selector text. The output re-parses into an equal
//! AST; it is not byte-identical to the input (strings are always
//! double-quoted, combinators are surrounded by single spaces).

use super::{
    AttributeSelector, ComplexSelector, ExtensionNode, PseudoArgument, PseudoSelector, Selector,
    SelectorList, TypeSelector,
};
use crate::error::{Error, Result};
use crate::tokenizer::Token;
use crate::tokenizer::tokenizer::{is_ident_code_point, is_ident_start_code_point};

/// Renders custom argument nodes the serializer does not know.
pub trait SerializeExtension {
    /// Return the text for `node`, or `None` to report it as unknown.
    fn serialize_node(&self, node: &dyn ExtensionNode) -> Option<String>;
}

impl<F> SerializeExtension for F
where
    F: Fn(&dyn ExtensionNode) -> Option<String>,
{
    fn serialize_node(&self, node: &dyn ExtensionNode) -> Option<String> {
        self(node)
    }
}

/// Extension that knows no custom nodes.
struct NoExtension;

impl SerializeExtension for NoExtension {
    fn serialize_node(&self, _node: &dyn ExtensionNode) -> Option<String> {
        None
    }
}

/// Serialize any AST node.
///
/// # Errors
///
/// [`Error::UnknownNodeType`] if the AST holds a custom argument node.
pub fn serialize(selector: &Selector) -> Result<String> {
    serialize_with(selector, &NoExtension)
}

/// Serialize a selector list, members joined by `", "`.
///
/// # Errors
///
/// See [`serialize`].
pub fn serialize_list(list: &SelectorList) -> Result<String> {
    let mut out = String::new();
    write_list(&mut out, list, &NoExtension)?;
    Ok(out)
}

/// Serialize with an extension for custom argument nodes.
///
/// # Errors
///
/// [`Error::UnknownNodeType`] if the extension declines a custom node.
pub fn serialize_with(selector: &Selector, extension: &dyn SerializeExtension) -> Result<String> {
    let mut out = String::new();
    write_selector(&mut out, selector, extension)?;
    Ok(out)
}

/// Render tokens back to their minimal text form.
///
/// A function token renders as `name(`; the closing parenthesis is its own token.
#[must_use]
pub fn serialize_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        write_token(&mut out, token);
    }
    out
}

fn write_selector(out: &mut String, selector: &Selector, ext: &dyn SerializeExtension) -> Result<()> {
    match selector {
        Selector::List(list) => write_list(out, list, ext)?,
        Selector::Complex(complex) => write_complex(out, complex, ext)?,
        Selector::Compound(compound) => {
            for simple in &compound.selectors {
                write_selector(out, simple, ext)?;
            }
        }
        Selector::Type(type_selector) => write_type(out, type_selector),
        Selector::Id(id) => {
            out.push('#');
            out.push_str(&escape_name(&id.identifier));
        }
        Selector::Class(class) => {
            out.push('.');
            out.push_str(&escape_ident(&class.identifier));
        }
        Selector::Attribute(attribute) => write_attribute(out, attribute),
        Selector::PseudoClass(pseudo) => write_pseudo(out, ":", pseudo, ext)?,
        Selector::PseudoElement(pseudo) => write_pseudo(out, "::", pseudo, ext)?,
    }
    Ok(())
}

fn write_list(out: &mut String, list: &SelectorList, ext: &dyn SerializeExtension) -> Result<()> {
    for (i, selector) in list.selectors.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_selector(out, selector, ext)?;
    }
    Ok(())
}

fn write_complex(out: &mut String, complex: &ComplexSelector, ext: &dyn SerializeExtension) -> Result<()> {
    if let Some(left) = &complex.left {
        write_selector(out, left, ext)?;
        out.push(' ');
    }
    let c = complex.combinator.as_char();
    if c != ' ' {
        out.push(c);
        out.push(' ');
    }
    write_selector(out, &complex.right, ext)
}

fn write_namespace(out: &mut String, namespace: Option<&str>) {
    match namespace {
        None => {}
        Some("*") => out.push_str("*|"),
        Some(ns) => {
            out.push_str(&escape_ident(ns));
            out.push('|');
        }
    }
}

fn write_type(out: &mut String, selector: &TypeSelector) {
    write_namespace(out, selector.namespace.as_deref());
    if selector.is_universal() {
        out.push('*');
    } else {
        out.push_str(&escape_ident(&selector.identifier));
    }
}

fn write_attribute(out: &mut String, attribute: &AttributeSelector) {
    out.push('[');
    write_namespace(out, attribute.namespace.as_deref());
    out.push_str(&escape_ident(&attribute.identifier));
    if let Some(matcher) = attribute.matcher {
        out.push_str(&matcher.to_string());
        out.push_str(&quote_string(attribute.value.as_deref().unwrap_or_default()));
        if let Some(modifier) = attribute.modifier {
            out.push(' ');
            out.push(modifier.as_char());
        }
    }
    out.push(']');
}

fn write_pseudo(
    out: &mut String,
    colons: &str,
    pseudo: &PseudoSelector,
    ext: &dyn SerializeExtension,
) -> Result<()> {
    out.push_str(colons);
    out.push_str(&escape_ident(&pseudo.identifier));

    let Some(argument) = &pseudo.argument else {
        return Ok(());
    };
    out.push('(');
    match argument {
        PseudoArgument::Tokens(tokens) | PseudoArgument::AnPlusB(tokens) => {
            out.push_str(&serialize_tokens(tokens));
        }
        PseudoArgument::SelectorList(list) => write_list(out, list, ext)?,
        PseudoArgument::Custom(node) => {
            let text = ext
                .serialize_node(node.as_ref())
                .ok_or_else(|| Error::UnknownNodeType(node.node_type().to_string()))?;
            out.push_str(&text);
        }
    }
    out.push(')');
    Ok(())
}

fn write_token(out: &mut String, token: &Token) {
    match token {
        Token::Ident(value) => out.push_str(&escape_ident(value)),
        Token::Function(name) => {
            out.push_str(&escape_ident(name));
            out.push('(');
        }
        Token::AtKeyword(name) => {
            out.push('@');
            out.push_str(&escape_ident(name));
        }
        Token::Hash { value, .. } => {
            out.push('#');
            out.push_str(&escape_name(value));
        }
        Token::String(value) => out.push_str(&quote_string(value)),
        Token::Number(number) => out.push_str(&number.repr),
        Token::Dimension { number, unit } => {
            out.push_str(&number.repr);
            // A unit starting with `e` would otherwise read back as an exponent.
            if unit.starts_with(['e', 'E']) {
                out.push('\\');
            }
            out.push_str(&escape_ident(unit));
        }
        Token::Delim(c) => out.push(*c),
        Token::Whitespace => out.push(' '),
        Token::Colon => out.push(':'),
        Token::Semicolon => out.push(';'),
        Token::Comma => out.push(','),
        Token::LeftBracket => out.push('['),
        Token::RightBracket => out.push(']'),
        Token::LeftParen => out.push('('),
        Token::RightParen => out.push(')'),
        Token::LeftBrace => out.push('{'),
        Token::RightBrace => out.push('}'),
    }
}

/// [CSSOM § 2.1 serialize an identifier](https://drafts.csswg.org/cssom/#serialize-an-identifier)
///
/// Escapes are single code points (`\.`), matching what the tokenizer reads back.
#[must_use]
pub fn escape_ident(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let mut chars = ident.chars().peekable();

    if let Some(first) = chars.next() {
        let hyphen_ok = first == '-' && chars.peek().is_some_and(|c| !c.is_ascii_digit());
        if !is_ident_start_code_point(first) && !hyphen_ok {
            out.push('\\');
        }
        out.push(first);
    }
    for c in chars {
        if !is_ident_code_point(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape a name that need not start like an identifier (the part after `#`).
#[must_use]
pub fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if !is_ident_code_point(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// [CSSOM § 2.1 serialize a string](https://drafts.csswg.org/cssom/#serialize-a-string)
#[must_use]
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_ident() {
        assert_eq!(escape_ident("foo-bar"), "foo-bar");
        assert_eq!(escape_ident("a.b"), "a\\.b");
        assert_eq!(escape_ident("-x"), "-x");
        assert_eq!(escape_ident("-1"), "\\-1");
        assert_eq!(escape_ident("-"), "\\-");
        assert_eq!(escape_ident("1a"), "\\1a");
    }

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string(r#"a"b\c"#), r#""a\"b\\c""#);
    }
}
