//! Style rules: the textual rule-set model behind a `<style>` container.
//!
//! A [`RuleList`] is what a style container's text parses into and what it is
//! re-serialized from. Declarations keep their raw value text, so custom
//! property values round-trip untouched.

use std::fmt;

/// A single property declaration, e.g. `--button-radius: 10px`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name. Custom properties (`--*`) keep their case, others are lowercased.
    pub name: String,
    /// Raw value text, trimmed.
    pub value: String,
    /// Whether `!important` was specified.
    pub important: bool,
}

impl Declaration {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            important: false,
        }
    }

    /// Whether this declares a custom property (`--name`).
    pub fn is_custom(&self) -> bool {
        self.name.starts_with("--")
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

/// One rule: a selector prelude and its declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// The selector text, whitespace-trimmed.
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

impl StyleRule {
    /// Create an empty rule for `selector`.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            declarations: Vec::new(),
        }
    }

    /// The value of property `name`, if declared.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }

    /// Set property `name`, replacing an existing declaration in place or
    /// appending a new one.
    pub fn set_property(&mut self, name: &str, value: &str) {
        let value = value.trim();
        match self.declarations.iter_mut().find(|d| d.name == name) {
            Some(decl) => {
                decl.value = value.to_owned();
                decl.important = false;
            }
            None => self.declarations.push(Declaration::new(name, value)),
        }
    }

    /// Remove property `name`. Returns whether a declaration was removed.
    pub fn remove_property(&mut self, name: &str) -> bool {
        let before = self.declarations.len();
        self.declarations.retain(|d| d.name != name);
        self.declarations.len() != before
    }

    /// Iterate over custom property declarations in declaration order.
    pub fn custom_properties(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(|d| d.is_custom())
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.selector)?;
        for decl in &self.declarations {
            write!(f, " {decl};")?;
        }
        f.write_str(" }")
    }
}

/// An ordered list of rules, as held by one style container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleList {
    pub rules: Vec<StyleRule>,
}

impl RuleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse style text into rules. See [`parse_rules`].
    pub fn parse(text: &str) -> Self {
        parse_rules(text)
    }

    /// First rule whose selector text is exactly `selector`.
    pub fn find(&self, selector: &str) -> Option<&StyleRule> {
        self.rules.iter().find(|r| r.selector == selector)
    }

    pub fn find_mut(&mut self, selector: &str) -> Option<&mut StyleRule> {
        self.rules.iter_mut().find(|r| r.selector == selector)
    }

    /// The rule for `selector`, appending an empty one at the end if absent.
    pub fn find_or_insert(&mut self, selector: &str) -> &mut StyleRule {
        let index = match self.rules.iter().position(|r| r.selector == selector) {
            Some(index) => index,
            None => {
                self.rules.push(StyleRule::new(selector));
                self.rules.len() - 1
            }
        };
        &mut self.rules[index]
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Serialize every rule, one per line.
    pub fn to_css_text(&self) -> String {
        self.rules
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Strip CSS block comments (`/* ... */`), replacing each with a single space.
fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("/*") {
        result.push_str(&rest[..start]);
        result.push(' ');
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            // Unterminated comment: consume the rest of the input.
            None => rest = "",
        }
    }
    result.push_str(rest);
    result
}

/// Parse style text into a [`RuleList`].
///
/// The parser is tolerant: at-rules are skipped, declarations without a colon
/// are dropped, and an unterminated block keeps whatever was parsed. Problems
/// are logged, never returned.
pub fn parse_rules(input: &str) -> RuleList {
    let text = strip_comments(input);
    let mut rules = RuleList::new();
    let mut rest = text.as_str();

    while let Some(open) = rest.find('{') {
        let prelude = rest[..open].trim();
        let body_start = open + 1;
        let (body, next) = match block_end(&rest[body_start..]) {
            Some(end) => (&rest[body_start..body_start + end], &rest[body_start + end + 1..]),
            None => {
                tracing::warn!(selector = prelude, "unterminated style block");
                (&rest[body_start..], "")
            }
        };
        rest = next;

        if prelude.starts_with('@') {
            tracing::debug!(prelude, "skipping at-rule");
            continue;
        }
        if prelude.is_empty() {
            tracing::warn!("style block without selector");
            continue;
        }

        let mut rule = StyleRule::new(prelude);
        rule.declarations = parse_declarations(body);
        rules.rules.push(rule);
    }

    if !rest.trim().is_empty() {
        tracing::warn!(trailing = rest.trim(), "ignoring style text outside any block");
    }

    rules
}

/// Byte offset of the `}` closing a block whose body starts at `body[0]`.
fn block_end(body: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote = None;
    for (i, ch) in body.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '{') => depth += 1,
            (None, '}') if depth == 0 => return Some(i),
            (None, '}') => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Split a declaration block on top-level `;`, honoring quotes and parentheses.
fn parse_declarations(body: &str) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    let mut quote = None;
    let mut parens = 0usize;
    let mut start = 0;

    for (i, ch) in body.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(') => parens += 1,
            (None, ')') => parens = parens.saturating_sub(1),
            (None, ';') if parens == 0 => {
                push_declaration(&mut declarations, &body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    push_declaration(&mut declarations, &body[start..]);
    declarations
}

fn push_declaration(declarations: &mut Vec<Declaration>, raw: &str) {
    let raw = raw.trim();
    if raw.is_empty() {
        return;
    }
    let Some((name, value)) = raw.split_once(':') else {
        tracing::warn!(declaration = raw, "dropping declaration without ':'");
        return;
    };
    let name = name.trim();
    let name = if name.starts_with("--") {
        name.to_owned()
    } else {
        name.to_ascii_lowercase()
    };
    let mut value = value.trim();
    let mut important = false;
    if let Some(stripped) = value.strip_suffix("!important") {
        value = stripped.trim_end();
        important = true;
    }
    declarations.push(Declaration {
        name,
        value: value.to_owned(),
        important,
    });
}
