//! Declared parameter introspection
//!
//! Native bodies are opaque closures, so a function may carry the source
//! text of its signature instead. The declared parameter names are read
//! from that text once, when the function is created, and never depend on
//! how many arguments a call passes.

use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;

/// Line and block comments
static COMMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)//.*$|/\*[\s\S]*?\*/").expect("static pattern"));

/// Any whitespace
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern"));

/// `function name(` with whitespace still present
static FUNCTION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*function\s+([\w$]+)\s*\(").expect("static pattern"));

/// Parameter list of a whitespace-free signature:
/// `function name(a,b)`, `(a,b)`, `|a,b|`, `move|a,b|` or a bare `a,b`
static PARAM_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:function[^(]*\(([^)]*)\)|\(([^)]*)\)|(?:move)?\|([^|]*)\||([\w$,]*)$)")
        .expect("static pattern")
});

/// A parsed signature
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    /// Function name, for `function name(...)` forms
    pub name: Option<String>,
    /// Declared parameter names in order
    pub params: Vec<Rc<str>>,
}

/// Parse a signature text into its name and parameter names
///
/// Text that matches none of the accepted forms declares no parameters.
pub fn parse_signature(source: &str) -> Signature {
    let source = COMMENTS.replace_all(source, "");

    let name = FUNCTION_NAME
        .captures(&source)
        .map(|caps| caps[1].to_string());

    let compact = WHITESPACE.replace_all(&source, "");
    let params: Vec<Rc<str>> = PARAM_LIST
        .captures(&compact)
        .and_then(|caps| caps.iter().skip(1).flatten().next().map(|m| m.as_str()))
        .map(|list| {
            list.split(',')
                .filter(|param| !param.is_empty())
                .map(Rc::from)
                .collect()
        })
        .unwrap_or_default();

    Signature { name, params }
}

/// Parse only the declared parameter names
pub fn parse_params(source: &str) -> Vec<Rc<str>> {
    parse_signature(source).params
}
