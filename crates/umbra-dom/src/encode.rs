//! Text and attribute encoding
//!
//! Two families of escaping live here:
//! - the declarative shadow DOM wire format: text passes through and
//!   attribute values get numeric character references
//! - the named-entity rules browsers use for `innerHTML`, and the XML rules
//!   used for foreign (SVG, MathML) subtrees

use std::borrow::Cow;

/// Text between tags needs no encoding in the shadow DOM wire format
#[inline]
pub fn encode_text(raw: &str) -> Cow<'_, str> {
    Cow::Borrowed(raw)
}

/// Escape `"`, `&`, `'`, `<` and `>` as numeric character references.
///
/// Nothing else is touched, so the result can be embedded in a double-quoted
/// attribute token and decoded back to `raw` by any HTML parser.
pub fn encode_attribute_value(raw: &str) -> Cow<'_, str> {
    replace_chars(raw, |c| match c {
        '"' => Some("&#34;"),
        '&' => Some("&#38;"),
        '\'' => Some("&#39;"),
        '<' => Some("&#60;"),
        '>' => Some("&#62;"),
        _ => None,
    })
}

/// Escape text content the way `innerHTML` does
pub fn escape_text_html(raw: &str) -> Cow<'_, str> {
    replace_chars(raw, |c| match c {
        '&' => Some("&amp;"),
        '\u{a0}' => Some("&nbsp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    })
}

/// Escape an attribute value the way `innerHTML` does
pub fn escape_attribute_html(raw: &str) -> Cow<'_, str> {
    replace_chars(raw, |c| match c {
        '&' => Some("&amp;"),
        '\u{a0}' => Some("&nbsp;"),
        '"' => Some("&quot;"),
        _ => None,
    })
}

/// Escape XML character data
pub fn escape_xml_text(raw: &str) -> Cow<'_, str> {
    replace_chars(raw, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    })
}

/// Escape an XML attribute value for a double-quoted token
pub fn escape_xml_attribute(raw: &str) -> Cow<'_, str> {
    replace_chars(raw, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\t' => Some("&#9;"),
        '\n' => Some("&#10;"),
        '\r' => Some("&#13;"),
        _ => None,
    })
}

fn replace_chars(raw: &str, replacement: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    let Some(first) = raw.char_indices().find(|&(_, c)| replacement(c).is_some()).map(|(i, _)| i) else {
        return Cow::Borrowed(raw);
    };

    let mut out = String::with_capacity(raw.len() + 16);
    out.push_str(&raw[..first]);
    for c in raw[first..].chars() {
        match replacement(c) {
            Some(entity) => out.push_str(entity),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}
