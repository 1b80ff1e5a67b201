//! Integration tests for selector serialization.

use std::any::Any;
use std::sync::Arc;

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

use cssq_selector::{
    AttributeMatcher, AttributeModifier, AttributeSelector, ClassSelector, Combinator,
    ComplexSelector, CompoundSelector, Error, ExtensionNode, IdSelector, Numeric, NumericType,
    PseudoArgument, PseudoSelector, Selector, SelectorList, Token, TypeSelector, parse,
    serialize, serialize_list, serialize_tokens, serialize_with, tokenize,
};

fn reserialize(input: &str) -> String {
    serialize_list(&parse(input).unwrap()).unwrap()
}

#[test]
fn test_combinators_are_spaced() {
    assert_eq!(reserialize("a>b"), "a > b");
    assert_eq!(reserialize("a   b"), "a b");
    assert_eq!(reserialize("a+b~c"), "a + b ~ c");
}

#[test]
fn test_list_members_are_comma_separated() {
    assert_eq!(reserialize("a,b ,  c"), "a, b, c");
}

#[test]
fn test_compound_has_no_spaces() {
    assert_eq!(reserialize("div.note#main:first-child"), "div.note#main:first-child");
}

#[test]
fn test_namespaces() {
    assert_eq!(reserialize("svg|rect, *|*, |p"), "svg|rect, *|*, |p");
}

#[test]
fn test_attribute_values_are_double_quoted() {
    assert_eq!(reserialize("[lang|=en]"), r#"[lang|="en"]"#);
    assert_eq!(reserialize("[type='x' i]"), r#"[type="x" i]"#);
    assert_eq!(reserialize(r#"[title='say "hi"']"#), r#"[title="say \"hi\""]"#);
    assert_eq!(reserialize("[ href ]"), "[href]");
}

#[test]
fn test_pseudo_arguments() {
    assert_eq!(reserialize(":not(.a,.b)"), ":not(.a, .b)");
    assert_eq!(reserialize(":nth-child(2n+1)"), ":nth-child(2n+1)");
    assert_eq!(reserialize(":has(> img)"), ":has(> img)");
    assert_eq!(reserialize("p::first-line"), "p::first-line");
}

#[test]
fn test_escapes_survive() {
    assert_eq!(reserialize(r"#a\.b"), r"#a\.b");
    assert_eq!(reserialize(r".a\:b"), r".a\:b");
}

#[test]
fn test_serialize_single_node() {
    let class = Selector::Class(ClassSelector {
        identifier: "1st".to_string(),
    });
    assert_eq!(serialize(&class).unwrap(), r".\1st");
}

#[test]
fn test_serialize_tokens() {
    let tokens = vec![
        Token::ident("a"),
        Token::Whitespace,
        Token::delim('+'),
        Token::string("x"),
        Token::Comma,
        Token::hash_id("id"),
    ];
    assert_eq!(serialize_tokens(&tokens), r#"a +"x",#id"#);
}

#[test]
fn test_dimension_with_exponent_like_unit() {
    let token = Token::Dimension {
        number: Numeric::from_repr("1"),
        unit: "em".to_string(),
    };
    assert_eq!(serialize_tokens(&[token]), r"1\em");

    let round_trip = tokenize(r"1\em").unwrap();
    match &round_trip[0] {
        Token::Dimension { number, unit } => {
            assert_eq!(number.numeric_type, NumericType::Integer);
            assert_eq!(unit, "em");
        }
        other => panic!("expected dimension, got {other:?}"),
    }
}

#[derive(Debug)]
struct Marker;

impl ExtensionNode for Marker {
    fn node_type(&self) -> &str {
        "Marker"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn with_marker() -> Selector {
    Selector::PseudoClass(PseudoSelector {
        identifier: "mark".to_string(),
        argument: Some(PseudoArgument::Custom(Arc::new(Marker))),
    })
}

#[test]
fn test_custom_node_without_extension() {
    assert_eq!(
        serialize(&with_marker()),
        Err(Error::UnknownNodeType("Marker".to_string()))
    );
}

#[test]
fn test_custom_node_with_extension() {
    let extension = |node: &dyn ExtensionNode| {
        node.as_any()
            .downcast_ref::<Marker>()
            .map(|_| "here".to_string())
    };
    assert_eq!(
        serialize_with(&with_marker(), &extension).unwrap(),
        ":mark(here)"
    );
}

// Round-trip property: any AST the parser can produce serializes to text
// that parses back into the same AST.

const IDENTS: &[&str] = &["a", "div", "x-1", "-foo", "_u", "a.b", "1a", "-1", "c:d"];
const VALUES: &[&str] = &["", "en", "a b", r#"say "hi""#, r"back\slash", "UPPER"];
const MATCHERS: &[AttributeMatcher] = &[
    AttributeMatcher::Equals,
    AttributeMatcher::Includes,
    AttributeMatcher::DashMatch,
    AttributeMatcher::Prefix,
    AttributeMatcher::Suffix,
    AttributeMatcher::Substring,
];
const COMBINATORS: &[Combinator] = &[
    Combinator::Descendant,
    Combinator::Child,
    Combinator::NextSibling,
    Combinator::SubsequentSibling,
];

fn pick<T: Clone>(g: &mut Gen, items: &[T]) -> T {
    g.choose(items).unwrap().clone()
}

fn ident(g: &mut Gen) -> String {
    pick(g, IDENTS).to_string()
}

fn below(g: &mut Gen, n: usize) -> usize {
    usize::arbitrary(g) % n
}

fn gen_type(g: &mut Gen) -> Selector {
    let namespace = match below(g, 5) {
        0 => Some("svg".to_string()),
        1 => Some("*".to_string()),
        2 => Some(String::new()),
        _ => None,
    };
    let identifier = if bool::arbitrary(g) {
        "*".to_string()
    } else {
        ident(g)
    };
    Selector::Type(TypeSelector {
        identifier,
        namespace,
    })
}

fn gen_attribute(g: &mut Gen) -> Selector {
    let namespace = bool::arbitrary(g).then(|| "xlink".to_string());
    let mut attribute = AttributeSelector {
        identifier: ident(g),
        namespace,
        matcher: None,
        value: None,
        modifier: None,
    };
    if bool::arbitrary(g) {
        attribute.matcher = Some(pick(g, MATCHERS));
        attribute.value = Some(pick(g, VALUES).to_string());
        attribute.modifier = match below(g, 3) {
            0 => Some(AttributeModifier::CaseInsensitive),
            1 => Some(AttributeModifier::CaseSensitive),
            _ => None,
        };
    }
    Selector::Attribute(attribute)
}

fn gen_pseudo(g: &mut Gen, depth: usize) -> Selector {
    let (identifier, argument) = match below(g, 4) {
        0 if depth > 0 => (
            pick(g, &["not", "is", "where", "has"]).to_string(),
            Some(PseudoArgument::SelectorList(gen_list(g, depth - 1))),
        ),
        1 => (
            "nth-child".to_string(),
            Some(PseudoArgument::AnPlusB(vec![Token::number(
                below(g, 10).to_string(),
            )])),
        ),
        2 => {
            return Selector::PseudoElement(PseudoSelector {
                identifier: pick(g, &["before", "first-line"]).to_string(),
                argument: None,
            });
        }
        _ => (pick(g, &["hover", "first-child", "root"]).to_string(), None),
    };
    Selector::PseudoClass(PseudoSelector {
        identifier,
        argument,
    })
}

/// Any simple selector except a type selector, which may only lead a compound.
fn gen_subclass(g: &mut Gen, depth: usize) -> Selector {
    match below(g, 4) {
        0 => Selector::Id(IdSelector {
            identifier: ident(g),
        }),
        1 => Selector::Class(ClassSelector {
            identifier: ident(g),
        }),
        2 => gen_attribute(g),
        _ => gen_pseudo(g, depth),
    }
}

fn gen_compound(g: &mut Gen, depth: usize) -> Selector {
    let mut selectors = Vec::new();
    if bool::arbitrary(g) {
        selectors.push(gen_type(g));
    }
    for _ in 0..below(g, 3) {
        selectors.push(gen_subclass(g, depth));
    }
    if selectors.is_empty() {
        selectors.push(gen_subclass(g, depth));
    }
    if selectors.len() == 1 {
        selectors.remove(0)
    } else {
        Selector::Compound(CompoundSelector { selectors })
    }
}

fn gen_complex(g: &mut Gen, depth: usize) -> Selector {
    let mut selector = gen_compound(g, depth);
    for _ in 0..below(g, 3) {
        selector = Selector::Complex(ComplexSelector {
            left: Some(Box::new(selector)),
            combinator: pick(g, COMBINATORS),
            right: Box::new(gen_compound(g, depth)),
        });
    }
    selector
}

fn gen_list(g: &mut Gen, depth: usize) -> SelectorList {
    SelectorList {
        selectors: (0..=below(g, 3)).map(|_| gen_complex(g, depth)).collect(),
    }
}

#[derive(Debug, Clone)]
struct ArbitraryList(SelectorList);

impl Arbitrary for ArbitraryList {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(gen_list(g, 2))
    }
}

#[quickcheck]
fn prop_serialize_then_parse_is_identity(list: ArbitraryList) -> bool {
    let text = serialize_list(&list.0).unwrap();
    parse(&text).unwrap() == list.0
}

#[test]
fn test_serialize_is_stable() {
    let text = reserialize(":is(a > b.c, [x^='y' s])  ~  *|p::before");
    assert_eq!(reserialize(&text), text);
}
