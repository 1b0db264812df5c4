//! Identifier case conversion between camel-style and hyphen-style names.
//!
//! Attribute names map to handler names (`data-size` -> `onDataSizeChanged`) and
//! style variable names map to custom property names (`buttonRadius` ->
//! `button-radius`). All functions are pure.

/// Convert `camelCase` (or `PascalCase`) to `kebab-case`.
///
/// Every uppercase letter becomes a hyphen followed by its lowercase form. A
/// leading uppercase letter is lowercased without a hyphen. Names that are
/// already hyphen-case pass through unchanged.
pub fn camel_to_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Convert `kebab-case` to `camelCase`.
///
/// A hyphen followed by another hyphen, or ending the name, is kept, so
/// `data--size` becomes `data-Size` and stays distinct from `data-size`.
pub fn kebab_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '-' {
            if upper_next {
                out.push('-');
            }
            upper_next = true;
        } else if upper_next {
            out.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    if upper_next {
        out.push('-');
    }
    out
}

/// Convert `kebab-case` to `PascalCase`.
pub fn kebab_to_pascal(name: &str) -> String {
    let camel = kebab_to_camel(name);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Normalize an external variable name to its internal hyphen-case form.
///
/// A leading `--` marker is stripped first, so `--buttonRadius`,
/// `buttonRadius` and `button-radius` all normalize to `button-radius`.
pub fn normalize_var_name(name: &str) -> String {
    let bare = name.trim().strip_prefix("--").unwrap_or(name.trim());
    camel_to_kebab(bare)
}

/// Map an internal custom property name back to the external naming convention.
///
/// `--button-radius` and `button-radius` both become `buttonRadius`.
pub fn denormalize_var_name(name: &str) -> String {
    kebab_to_camel(name.strip_prefix("--").unwrap_or(name))
}

/// The conventional handler name for an attribute: `on<PascalCase>Changed`.
///
/// Attribute names are case-insensitive, so the name is lowercased first.
pub fn handler_name(attribute: &str) -> String {
    format!("on{}Changed", kebab_to_pascal(&attribute.to_ascii_lowercase()))
}
