//! Template model for tagged document bodies.
//!
//! A template body is parsed once into a tree of [`Node`]s:
//! - `{%name%}` becomes a [`Node::Field`]
//! - `{%#name%}...{%/name%}` becomes a [`Node::Section`] (flag or list driven)
//! - `{%^name%}...{%/name%}` becomes an inverted [`Node::Section`]
//! - configured gendered words in plain text become [`Node::Gendered`], so the
//!   feminine form can be chosen per render instead of patching the markup.
//!
//! Rendering never produces partial output: the whole body is rendered into a
//! fresh string and any unresolved tag or type mismatch aborts it.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::BTreeSet;

use super::common::escape_xml;
use super::placeholders::{PlaceholderMap, PlaceholderValue};
use super::DocumentError;

pub const TAG_OPEN: &str = "{%";
pub const TAG_CLOSE: &str = "%}";

lazy_static! {
    /// A complete `{% ... %}` span, possibly broken up by markup.
    static ref TAG_SPAN: Regex = Regex::new(r"(?s)\{%.*?%\}").unwrap();
    static ref MARKUP: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref TAG_NAME: Regex = Regex::new(r"\{%\s*([^%]*?)\s*%\}").unwrap();
}

/// A word with a masculine and a feminine form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenderedTerm {
    pub masculine: String,
    pub feminine: String,
}

/// Which words switch gender, and which flag selects the feminine form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenderRule {
    pub flag: String,
    pub terms: Vec<GenderedTerm>,
    /// Occurrences already followed by this marker are written for both
    /// genders and are left alone.
    pub marker: String,
}

impl Default for GenderRule {
    fn default() -> Self {
        Self {
            flag: "isGirlsSchool".to_string(),
            terms: vec![GenderedTerm {
                masculine: "الطالب".to_string(),
                feminine: "الطالبة".to_string(),
            }],
            marker: "ـ/ـة".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Literal(String),
    Gendered {
        flag: String,
        masculine: String,
        feminine: String,
    },
    Field(String),
    Section {
        name: String,
        inverted: bool,
        body: Vec<Node>,
    },
}

/// A parsed template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

enum Token<'a> {
    Text(&'a str),
    Field(&'a str),
    Open { name: &'a str, inverted: bool },
    Close(&'a str),
}

impl Template {
    pub fn parse(source: &str, rule: &GenderRule) -> Result<Self, DocumentError> {
        let source = merge_split_tags(source);
        let tokens = tokenize(&source)?;

        // Open sections, innermost last: (name, inverted, collected body).
        let mut stack: Vec<OpenSection> = Vec::new();
        let mut root: Vec<Node> = Vec::new();

        for token in tokens {
            match token {
                Token::Text(text) => {
                    split_gendered(text, rule, current_body(&mut stack, &mut root));
                }
                Token::Field(name) => {
                    current_body(&mut stack, &mut root).push(Node::Field(name.to_string()));
                }
                Token::Open { name, inverted } => {
                    stack.push((name.to_string(), inverted, Vec::new()));
                }
                Token::Close(name) => {
                    let (open_name, inverted, body) = stack.pop().ok_or_else(|| {
                        DocumentError::TemplateRender(format!(
                            "closing tag '{name}' has no matching section"
                        ))
                    })?;
                    if open_name != name {
                        return Err(DocumentError::TemplateRender(format!(
                            "section '{open_name}' is closed by '{name}'"
                        )));
                    }
                    let node = Node::Section {
                        name: open_name,
                        inverted,
                        body,
                    };
                    current_body(&mut stack, &mut root).push(node);
                }
            }
        }

        if let Some((name, _, _)) = stack.pop() {
            return Err(DocumentError::TemplateRender(format!(
                "section '{name}' is never closed"
            )));
        }

        Ok(Self { nodes: root })
    }

    /// Every tag name referenced by the template, sections included.
    pub fn tag_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        collect_names(&self.nodes, &mut names);
        names
    }

    pub fn has_gendered_text(&self) -> bool {
        fn walk(nodes: &[Node]) -> bool {
            nodes.iter().any(|node| match node {
                Node::Gendered { .. } => true,
                Node::Section { body, .. } => walk(body),
                _ => false,
            })
        }
        walk(&self.nodes)
    }

    pub fn render(&self, placeholders: &PlaceholderMap) -> Result<String, DocumentError> {
        let mut out = String::new();
        let mut scopes = vec![placeholders];
        render_nodes(&self.nodes, &mut scopes, &mut out)?;
        Ok(out)
    }
}

type OpenSection = (String, bool, Vec<Node>);

fn current_body<'a>(stack: &'a mut [OpenSection], root: &'a mut Vec<Node>) -> &'a mut Vec<Node> {
    match stack.last_mut() {
        Some((_, _, body)) => body,
        None => root,
    }
}

/// Tag names still present in rendered output.
pub fn find_unresolved_tags(text: &str) -> Vec<String> {
    TAG_NAME
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Word splits typed text into runs, so a tag can arrive as
/// `{%stu</w:t></w:r><w:r><w:t>dent_name%}`. Strip markup inside tag spans.
fn merge_split_tags(source: &str) -> Cow<'_, str> {
    TAG_SPAN.replace_all(source, |caps: &Captures| {
        MARKUP.replace_all(&caps[0], "").into_owned()
    })
}

fn tokenize(source: &str) -> Result<Vec<Token<'_>>, DocumentError> {
    let mut tokens = Vec::new();
    let mut rest = source;

    while let Some(start) = rest.find(TAG_OPEN) {
        if start > 0 {
            tokens.push(Token::Text(&rest[..start]));
        }
        let after_open = &rest[start + TAG_OPEN.len()..];
        let end = after_open.find(TAG_CLOSE).ok_or_else(|| {
            DocumentError::TemplateRender("unterminated tag, missing '%}'".to_string())
        })?;
        let inner = after_open[..end].trim();

        let token = match inner.chars().next() {
            Some('#') => Token::Open {
                name: tag_name(&inner[1..])?,
                inverted: false,
            },
            Some('^') => Token::Open {
                name: tag_name(&inner[1..])?,
                inverted: true,
            },
            Some('/') => Token::Close(tag_name(&inner[1..])?),
            _ => Token::Field(tag_name(inner)?),
        };
        tokens.push(token);
        rest = &after_open[end + TAG_CLOSE.len()..];
    }

    if !rest.is_empty() {
        tokens.push(Token::Text(rest));
    }
    Ok(tokens)
}

fn tag_name(raw: &str) -> Result<&str, DocumentError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DocumentError::TemplateRender("empty tag name".to_string()));
    }
    Ok(name)
}

/// Push `text` as literals, turning standalone gendered words into `Gendered` nodes.
fn split_gendered(text: &str, rule: &GenderRule, out: &mut Vec<Node>) {
    let mut literal_start = 0;
    let mut cursor = 0;

    while cursor < text.len() {
        let next = rule
            .terms
            .iter()
            .filter(|term| !term.masculine.is_empty())
            .filter_map(|term| text[cursor..].find(&term.masculine).map(|at| (cursor + at, term)))
            .min_by_key(|(at, _)| *at);

        let Some((at, term)) = next else {
            break;
        };
        let end = at + term.masculine.len();

        if is_inside_markup(&text[..at]) || !stands_alone(&text[end..], &rule.marker) {
            cursor = end;
            continue;
        }

        push_literal(out, &text[literal_start..at]);
        out.push(Node::Gendered {
            flag: rule.flag.clone(),
            masculine: term.masculine.clone(),
            feminine: term.feminine.clone(),
        });
        literal_start = end;
        cursor = end;
    }

    push_literal(out, &text[literal_start..]);
}

fn is_inside_markup(before: &str) -> bool {
    match (before.rfind('<'), before.rfind('>')) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}

/// The word is complete: not followed by the marker nor by more letters
/// (which would make it the feminine or a plural form). Short vowels
/// (harakat) do not extend the word.
fn stands_alone(after: &str, marker: &str) -> bool {
    if !marker.is_empty() && after.starts_with(marker) {
        return false;
    }
    !after
        .chars()
        .find(|ch| !is_haraka(*ch))
        .is_some_and(char::is_alphabetic)
}

fn is_haraka(ch: char) -> bool {
    ('\u{064B}'..='\u{0652}').contains(&ch)
}

fn push_literal(out: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Literal(previous)) = out.last_mut() {
        previous.push_str(text);
    } else {
        out.push(Node::Literal(text.to_string()));
    }
}

fn collect_names(nodes: &[Node], names: &mut BTreeSet<String>) {
    for node in nodes {
        match node {
            Node::Literal(_) => {}
            Node::Gendered { flag, .. } => {
                names.insert(flag.clone());
            }
            Node::Field(name) => {
                names.insert(name.clone());
            }
            Node::Section { name, body, .. } => {
                names.insert(name.clone());
                collect_names(body, names);
            }
        }
    }
}

fn lookup<'a>(scopes: &[&'a PlaceholderMap], name: &str) -> Option<&'a PlaceholderValue> {
    scopes.iter().rev().find_map(|&scope| scope.get(name))
}

fn unresolved(name: &str) -> DocumentError {
    DocumentError::TemplateRender(format!("tag '{name}' has no value"))
}

fn mismatch(name: &str, expected: &str, found: &PlaceholderValue) -> DocumentError {
    DocumentError::TemplateRender(format!(
        "tag '{name}' expects {expected}, found {}",
        found.type_name()
    ))
}

fn render_nodes<'a>(
    nodes: &[Node],
    scopes: &mut Vec<&'a PlaceholderMap>,
    out: &mut String,
) -> Result<(), DocumentError> {
    for node in nodes {
        match node {
            Node::Literal(text) => out.push_str(text),
            Node::Gendered {
                flag,
                masculine,
                feminine,
            } => match lookup(scopes, flag) {
                Some(PlaceholderValue::Flag(true)) => out.push_str(feminine),
                Some(PlaceholderValue::Flag(false)) => out.push_str(masculine),
                Some(other) => return Err(mismatch(flag, "a flag", other)),
                None => return Err(unresolved(flag)),
            },
            Node::Field(name) => match lookup(scopes, name) {
                Some(PlaceholderValue::Text(value)) => out.push_str(&escape_xml(value)),
                Some(other) => return Err(mismatch(name, "text", other)),
                None => return Err(unresolved(name)),
            },
            Node::Section {
                name,
                inverted,
                body,
            } => match lookup(scopes, name) {
                Some(PlaceholderValue::Flag(enabled)) => {
                    if *enabled != *inverted {
                        render_nodes(body, scopes, out)?;
                    }
                }
                Some(PlaceholderValue::List(items)) => {
                    if *inverted {
                        if items.is_empty() {
                            render_nodes(body, scopes, out)?;
                        }
                    } else {
                        for item in items {
                            scopes.push(item);
                            let result = render_nodes(body, scopes, out);
                            scopes.pop();
                            result?;
                        }
                    }
                }
                Some(other) => return Err(mismatch(name, "a flag or a list", other)),
                None => return Err(unresolved(name)),
            },
        }
    }
    Ok(())
}
