//! Shared lookup helpers over BoardGameGeek's attribute-heavy XML documents.
//!
//! The documents are walked with [`scraper`] CSS selectors. BGG's tag and
//! attribute names are all lowercase ASCII, so selector matching is exact.
//! One parsing quirk matters everywhere: BGG self-closes most leaf elements
//! (`<name value="..."/>`), and html5ever treats a self-closed non-void
//! element as an open tag, nesting the following siblings inside it. Every
//! lookup here therefore uses descendant matching scoped to a container that
//! carries an explicit closing tag (`item`, `play`, `results`, ...), which is
//! unaffected by that nesting.

pub use scraper::{ElementRef, Html, Selector};

/// Parse a selector that is valid by construction: either a literal or a
/// format of literal fragments around a fixed lowercase tag name.
pub fn selector(selectors: &str) -> Selector {
    Selector::parse(selectors).unwrap()
}

/// Parse one upstream XML document.
pub fn parse(xml: &str) -> Html {
    Html::parse_document(xml)
}

/// The document's root element, by tag name.
///
/// html5ever wraps the XML payload in an implicit `<html><body>` shell, so
/// the upstream root sits directly under `body`.
pub fn root<'a>(doc: &'a Html, tag: &str) -> Option<ElementRef<'a>> {
    doc.select(&selector(&format!("body > {tag}"))).next()
}

/// An attribute of the element itself, or `None` when absent.
pub fn attr(el: ElementRef, name: &str) -> Option<String> {
    el.value().attr(name).map(str::to_string)
}

/// The `value` attribute of the first matching descendant, or `None` when
/// either the element or the attribute is absent.
pub fn value_attr(scope: ElementRef, selectors: &str) -> Option<String> {
    scope
        .select(&selector(selectors))
        .next()
        .and_then(|el| attr(el, "value"))
}

/// Trimmed text content of the first matching descendant. Empty text counts
/// as absent.
pub fn text(scope: ElementRef, selectors: &str) -> Option<String> {
    scope
        .select(&selector(selectors))
        .next()
        .map(own_text)
        .filter(|s| !s.is_empty())
}

/// Like [`text`], with a default for the absent case.
pub fn text_or(scope: ElementRef, selectors: &str, default: &str) -> String {
    text(scope, selectors).unwrap_or_else(|| default.to_string())
}

/// Trimmed text belonging to the element itself (not to nested elements).
///
/// Needed because of the self-closing quirk: a collection item's
/// `<name>Scythe</name>` may have unrelated self-closed siblings reparented
/// under it, and `ElementRef::text` would concatenate their text too.
pub fn own_text(el: ElementRef) -> String {
    el.children()
        .filter_map(|node| node.value().as_text().map(|t| t.to_string()))
        .collect::<String>()
        .trim()
        .to_string()
}
