//! Markup parsing and serialization.
//!
//! The parser is as forgiving as assigning `innerHTML`: it never fails.
//! Comments are dropped, void elements close themselves, `<style>` and
//! `<script>` bodies are raw text, stray close tags are ignored, and anything
//! left open is closed at the end of input.

use super::node::{NodeData, NodeId, NodeKind};
use super::tree::Document;

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];
const RAW_TEXT_ELEMENTS: &[&str] = &["style", "script"];

impl Document {
    /// Parse `markup` and append the resulting nodes under `parent`.
    ///
    /// Returns the new top-level nodes.
    pub fn append_markup(&mut self, parent: NodeId, markup: &str) -> Vec<NodeId> {
        let mut top_level = Vec::new();
        let mut stack: Vec<NodeId> = vec![parent];
        let mut rest = markup;

        while !rest.is_empty() {
            let current = *stack.last().unwrap_or(&parent);

            if let Some(after) = rest.strip_prefix("<!--") {
                rest = after.find("-->").map(|end| &after[end + 3..]).unwrap_or("");
                continue;
            }

            if let Some(after) = rest.strip_prefix("</") {
                let end = after.find('>').unwrap_or(after.len());
                let name = after[..end].trim().to_ascii_lowercase();
                rest = after.get(end + 1..).unwrap_or("");
                // Pop up to the matching open element; ignore the tag if none is open.
                if let Some(depth) = stack
                    .iter()
                    .skip(1)
                    .rposition(|&open| self.get(open).and_then(NodeData::tag) == Some(name.as_str()))
                {
                    stack.truncate(depth + 1);
                }
                continue;
            }

            if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
                let (data, self_closing, after) = parse_open_tag(&rest[1..]);
                rest = after;
                let tag = data.tag().unwrap_or_default().to_owned();
                let node = self.insert_child(current, data);
                if current == parent {
                    top_level.push(node);
                }

                if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
                    let close = format!("</{tag}");
                    let end = find_ascii_case_insensitive(rest, &close).unwrap_or(rest.len());
                    if end > 0 {
                        self.insert_child(node, NodeData::text(&rest[..end]));
                    }
                    rest = &rest[end..];
                    if let Some(gt) = rest.find('>') {
                        rest = &rest[gt + 1..];
                    }
                } else if !self_closing && !VOID_ELEMENTS.contains(&tag.as_str()) {
                    stack.push(node);
                }
                continue;
            }

            // Text up to the next tag start (a lone '<' is text).
            let end = rest
                .char_indices()
                .skip(1)
                .find(|&(_, c)| c == '<')
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            let text = decode_entities(&rest[..end]);
            rest = &rest[end..];
            if !text.is_empty() {
                let node = self.insert_child(current, NodeData::text(text));
                if current == parent {
                    top_level.push(node);
                }
            }
        }

        top_level
    }

    /// Serialize the children of `node`.
    pub fn inner_markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(node) {
            self.write_markup(child, &mut out);
        }
        out
    }

    /// Serialize `node` and its subtree (not including attached shadow trees).
    pub fn outer_markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(node, &mut out);
        out
    }

    fn write_markup(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.get(node) else {
            return;
        };
        match &data.kind {
            NodeKind::Text(text) => {
                let raw = self
                    .parent(node)
                    .and_then(|p| self.get(p))
                    .and_then(NodeData::tag)
                    .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
                if raw {
                    out.push_str(text);
                } else {
                    out.push_str(&escape(text, false));
                }
            }
            NodeKind::Element { tag } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in data.attributes() {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&escape(value, true));
                        out.push('"');
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for &child in self.children(node) {
                    self.write_markup(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            NodeKind::Document | NodeKind::ShadowRoot { .. } => {
                for &child in self.children(node) {
                    self.write_markup(child, out);
                }
            }
        }
    }
}

/// Parse `tag attr="v" flag ... >` (input starts right after `<`).
///
/// Returns the element data, whether it was written `/>`, and the remaining input.
fn parse_open_tag(input: &str) -> (NodeData, bool, &str) {
    let name_end = input
        .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
        .unwrap_or(input.len());
    let mut data = NodeData::element(&input[..name_end]);
    let mut rest = &input[name_end..];

    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("/>") {
            return (data, true, after);
        }
        if let Some(after) = rest.strip_prefix('>') {
            return (data, false, after);
        }
        if rest.is_empty() {
            return (data, false, rest);
        }
        if let Some(after) = rest.strip_prefix('/') {
            rest = after;
            continue;
        }

        let attr_end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '=' || c == '>' || c == '/')
            .unwrap_or(rest.len());
        let name = &rest[..attr_end];
        rest = rest[attr_end..].trim_start();

        let value = if let Some(after) = rest.strip_prefix('=') {
            let after = after.trim_start();
            match after.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after[1..];
                    let end = body.find(quote).unwrap_or(body.len());
                    rest = body.get(end + 1..).unwrap_or("");
                    decode_entities(&body[..end])
                }
                _ => {
                    let end = after
                        .find(|c: char| c.is_ascii_whitespace() || c == '>')
                        .unwrap_or(after.len());
                    rest = &after[end..];
                    decode_entities(&after[..end])
                }
            }
        } else {
            String::new()
        };

        if !name.is_empty() && data.attribute(name).is_none() {
            data.set_attribute(name, &value);
        }
    }
}

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_owned();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}
