//! cssq command-line interface
//!
//! Inspect how a selector tokenizes, parses and serializes, or run it against
//! a JSON document.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cssq_common::warning::set_warnings_enabled;
use cssq_selector::{
    Adapter, ObjectNode, ObjectTree, parse, query_selector, query_selector_all, serialize_list,
    tokenize,
};
use owo_colors::OwoColorize;
use serde_json::Value;

/// cssq - CSS selectors over arbitrary trees
#[derive(Parser, Debug)]
#[command(name = "cssq")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Show the token stream
    cssq tokens 'ul > li:first-child'

    # Show the parsed AST as JSON
    cssq parse --json ':is(a, b) + [lang|=en]'

    # Normalize a selector
    cssq serialize 'a>b ,  c'

    # Query a JSON document (objects are nodes, "type" is the name)
    cssq query 'List > ListItem[checked=true]' ast.json

    # Query inline JSON
    cssq query --first 'B' --json '[{"type": "A"}, {"type": "B"}]'
"#)]
struct Cli {
    /// Suppress warnings about leniently accepted input
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tokens of a selector
    Tokens {
        /// Selector text
        selector: String,

        /// Print JSON instead of one token per line
        #[arg(long)]
        json: bool,
    },

    /// Print the parsed selector AST
    Parse {
        /// Selector text
        selector: String,

        /// Print JSON instead of the debug tree
        #[arg(long)]
        json: bool,
    },

    /// Print a selector in canonical form
    Serialize {
        /// Selector text
        selector: String,
    },

    /// Run a selector against a JSON document
    Query {
        /// Selector text
        selector: String,

        /// Path to a JSON document
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Parse a JSON string directly instead of a file
        #[arg(long, value_name = "JSON")]
        json: Option<String>,

        /// Stop at the first match
        #[arg(long)]
        first: bool,

        /// Print only node names instead of the matched objects
        #[arg(long)]
        names: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    set_warnings_enabled(!cli.quiet);

    match cli.command {
        Command::Tokens { selector, json } => print_tokens(&selector, json),
        Command::Parse { selector, json } => print_ast(&selector, json),
        Command::Serialize { selector } => {
            println!("{}", serialize_list(&parse(&selector)?)?);
            Ok(())
        }
        Command::Query {
            selector,
            path,
            json,
            first,
            names,
        } => {
            let document = load_json(path, json)?;
            run_query(&selector, &document, first, names)
        }
    }
}

fn print_tokens(selector: &str, json: bool) -> anyhow::Result<()> {
    let tokens = tokenize(selector)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }

    println!("{}", format!("=== Tokens ({}) ===", tokens.len()).bold());
    for token in &tokens {
        println!("  {token}");
    }
    Ok(())
}

fn print_ast(selector: &str, json: bool) -> anyhow::Result<()> {
    let list = parse(selector)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        println!("{}", format!("=== Selector List ({}) ===", list.len()).bold());
        println!("{list:#?}");
    }
    Ok(())
}

/// Load the document from CLI arguments
fn load_json(path: Option<PathBuf>, inline: Option<String>) -> anyhow::Result<Value> {
    let text = match (inline, path) {
        (Some(text), _) => text,
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?,
        (None, None) => anyhow::bail!("query requires a file path or --json"),
    };
    serde_json::from_str(&text).context("document is not valid JSON")
}

fn run_query(selector: &str, document: &Value, first: bool, names: bool) -> anyhow::Result<()> {
    let list = parse(selector)?;
    let tree = ObjectTree::new(document);

    let found: Vec<ObjectNode> = if first {
        query_selector(&tree, tree.document(), &list)?
            .into_iter()
            .collect()
    } else {
        query_selector_all(&tree, tree.document(), &list)?
    };

    if names {
        for &node in &found {
            println!("{}", tree.name(node).cyan());
        }
    } else {
        let objects: Vec<_> = found.iter().filter_map(|&node| tree.object(node)).collect();
        println!("{}", serde_json::to_string_pretty(&objects)?);
    }

    eprintln!(
        "{}",
        format!("{} match{}", found.len(), if found.len() == 1 { "" } else { "es" }).dimmed()
    );
    Ok(())
}
