// SPDX-License-Identifier: MIT
//! Panel body rendering and the sanitization boundary.
//!
//! Markup in, safe markup out. With `allow_html` off the content is
//! escaped to a literal (newlines become `<br>`); with it on the content
//! runs through the sanitizer: executable subtrees are removed outright,
//! unknown tags are unwrapped keeping their text, attributes go through a
//! per-tag allowlist, and URLs are checked against a protocol allowlist.
//!
//! A sanitizer failure is recovered by falling back to the escaped
//! literal, so the panel always renders something inert.

#![forbid(unsafe_code)]

use std::collections::HashSet;
use std::sync::OnceLock;

use fieldtip_core::{Error, Result};
use lol_html::{RewriteStrSettings, element, rewrite_str};
use url::Url;

/// Subtrees removed outright, content included.
const REMOVE_TAGS: [&str; 9] = [
    "script", "style", "link", "iframe", "object", "embed", "form", "input", "button",
];

/// The fixed inline-formatting allowlist.
const ALLOWED_TAGS: [&str; 25] = [
    "b", "strong", "i", "em", "u", "br", "p", "span", "div", "ul", "ol", "li", "h1", "h2", "h3",
    "h4", "h5", "h6", "img", "a", "small", "code", "pre", "blockquote", "hr",
];

/// Schemes a redirect or an embedded absolute URL may use.
const ALLOWED_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

fn removed_tags() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| REMOVE_TAGS.iter().copied().collect())
}

fn allowed_tags() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| ALLOWED_TAGS.iter().copied().collect())
}

/// Per-tag attribute allowlist.
fn allowed_attrs(tag: &str) -> &'static [&'static str] {
    match tag {
        "img" => &["src", "alt", "title", "width", "height", "style"],
        "a" => &["href", "title", "target"],
        _ => &["class", "style"],
    }
}

/// Render the panel body for the given content and HTML flag.
pub fn render_body(content: &str, allow_html: bool) -> String {
    if allow_html {
        match sanitize_html(content) {
            Ok(safe) => safe,
            Err(err) => {
                tracing::warn!(%err, "sanitizer failed, rendering escaped literal");
                escape_text(content)
            }
        }
    } else {
        escape_text(content)
    }
}

/// Escape content to a literal, preserving line breaks.
pub fn escape_text(content: &str) -> String {
    htmlize::escape_text(content).replace('\n', "<br>")
}

/// Rewrite raw markup into the allowlisted safe subset.
pub fn sanitize_html(html: &str) -> Result<String> {
    if html.is_empty() {
        return Ok(String::new());
    }

    let mut handlers = vec![];
    for tag in REMOVE_TAGS {
        handlers.push(element!(tag, |el| {
            el.remove();
            Ok(())
        }));
    }

    handlers.push(element!("*", |el| {
        let tag = el.tag_name().to_ascii_lowercase();
        if removed_tags().contains(tag.as_str()) {
            el.remove();
            return Ok(());
        }
        if !allowed_tags().contains(tag.as_str()) {
            el.remove_and_keep_content();
            return Ok(());
        }

        let allowed = allowed_attrs(&tag);
        let attrs: Vec<(String, String)> = el
            .attributes()
            .iter()
            .map(|a| (a.name(), a.value()))
            .collect();

        for (name, value) in attrs {
            let lc_name = name.to_ascii_lowercase();
            if lc_name.starts_with("on")
                || lc_name == "action"
                || lc_name == "formaction"
                || !allowed.contains(&lc_name.as_str())
            {
                el.remove_attribute(&name);
                continue;
            }
            if lc_name == "src" && tag == "img" && !image_source_allowed(&value) {
                el.remove_attribute(&name);
            } else if lc_name == "href" && tag == "a" && !link_target_allowed(&value) {
                el.remove_attribute(&name);
            }
        }
        Ok(())
    }));

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::new()
        },
    )
    .map_err(|err| Error::Sanitize(err.to_string()))
}

/// Validate a redirect URL against the protocol allowlist.
///
/// Returns the normalized URL, or `None` when navigation must be refused
/// (unparseable, relative, or disallowed scheme).
pub fn sanitize_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    ALLOWED_SCHEMES
        .contains(&url.scheme())
        .then(|| url.to_string())
}

/// Decode the entity escapes attackers use to smuggle a scheme past a
/// prefix check, then drop whitespace/control characters.
fn normalized_scheme_prefix(value: &str) -> String {
    htmlize::unescape(value)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase()
}

fn has_forbidden_scheme(value: &str) -> bool {
    let cleaned = normalized_scheme_prefix(value);
    ["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|scheme| cleaned.starts_with(scheme))
}

/// `img src`: inline data images, allowlisted absolute URLs, or
/// site-relative paths.
fn image_source_allowed(value: &str) -> bool {
    let cleaned = normalized_scheme_prefix(value);
    if cleaned.starts_with("data:image/") {
        return true;
    }
    if value.starts_with('/') && !value.starts_with("//") {
        return true;
    }
    matches!(Url::parse(value.trim()), Ok(url) if matches!(url.scheme(), "http" | "https"))
}

/// `a href`: allowlisted absolute URLs or relative references; executable
/// and data schemes are refused.
fn link_target_allowed(value: &str) -> bool {
    if has_forbidden_scheme(value) {
        return false;
    }
    match Url::parse(value.trim()) {
        Ok(url) => ALLOWED_SCHEMES.contains(&url.scheme()),
        // Relative reference: stays on the host page's origin.
        Err(_) => true,
    }
}
