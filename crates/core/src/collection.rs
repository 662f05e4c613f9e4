//! Converter for the xmlapi2 `collection` document.
//!
//! BGG computes collection exports asynchronously: until the export is ready
//! the endpoint answers with a lone `message` root instead of the collection.
//! That shape is surfaced as [`CollectionOutput::Pending`] so the caller can
//! retry; the bounded retry policy itself lives in the imperative shell.

use serde::Serialize;

use crate::xml;

/// Fixed number of collection items per response page.
pub const COLLECTION_PAGE_SIZE: usize = 100;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CollectionItem {
    pub id: Option<String>,
    pub name: Option<String>,
    pub yearpublished: String,
    /// Global 1-based position within the full collection, not within the page.
    pub pos: usize,
    pub numplays: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct CollectionPage {
    pub total_items: Option<String>,
    pub pubdate: Option<String>,
    pub item: Vec<CollectionItem>,
}

/// Either one page of the collection or the export-still-queued placeholder.
#[derive(Debug, Serialize, Clone)]
#[serde(untagged)]
pub enum CollectionOutput {
    Pending { message: String },
    Page { items: CollectionPage },
}

impl CollectionOutput {
    /// True for the `message` placeholder shape.
    pub fn is_pending(&self) -> bool {
        matches!(self, CollectionOutput::Pending { .. })
    }
}

/// Convert one page of a collection document. `page` is 1-based; items at
/// global indices `[100(page-1), 100*page)` are kept.
pub fn convert_collection(xml_data: &str, page: usize) -> CollectionOutput {
    let doc = xml::parse(xml_data);

    if let Some(message) = xml::root(&doc, "message") {
        return CollectionOutput::Pending {
            message: xml::own_text(message),
        };
    }

    let root = xml::root(&doc, "items");
    // `page` comes straight from the query string, so keep the window
    // arithmetic saturating rather than trusting it to stay small.
    let start = page.saturating_sub(1).saturating_mul(COLLECTION_PAGE_SIZE);
    let end = start.saturating_add(COLLECTION_PAGE_SIZE);

    let mut kept = Vec::new();
    if let Some(root) = root {
        for (idx, item) in root.select(&xml::selector("item")).enumerate() {
            if idx < start {
                continue;
            }
            if idx >= end {
                break;
            }
            kept.push(CollectionItem {
                id: xml::attr(item, "objectid"),
                name: xml::text(item, "name"),
                yearpublished: xml::text_or(item, "yearpublished", "unknown"),
                pos: idx + 1,
                numplays: xml::text_or(item, "numplays", "unknown"),
            });
        }
    }

    CollectionOutput::Page {
        items: CollectionPage {
            total_items: root.and_then(|el| xml::attr(el, "totalitems")),
            pubdate: root.and_then(|el| xml::attr(el, "pubdate")),
            item: kept,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection_xml(count: usize) -> String {
        let mut xml = format!(
            r#"<items totalitems="{count}" termsofuse="x" pubdate="Fri, 05 May 2023 10:00:00 +0000">"#
        );
        for n in 1..=count {
            xml.push_str(&format!(
                r#"<item objecttype="thing" objectid="{n}" subtype="boardgame">
                    <name sortindex="1">Game {n}</name>
                    <yearpublished>2001</yearpublished>
                    <status own="1" wishlist="0"/>
                    <numplays>{n}</numplays>
                </item>"#
            ));
        }
        xml.push_str("</items>");
        xml
    }

    #[test]
    fn test_convert_collection_first_page() {
        let output = convert_collection(&collection_xml(150), 1);

        let CollectionOutput::Page { items } = output else {
            panic!("expected a collection page");
        };
        assert_eq!(items.total_items, Some("150".to_string()));
        assert_eq!(
            items.pubdate,
            Some("Fri, 05 May 2023 10:00:00 +0000".to_string())
        );
        assert_eq!(items.item.len(), 100);
        assert_eq!(items.item[0].pos, 1);
        assert_eq!(items.item[99].pos, 100);
        assert_eq!(items.item[0].name, Some("Game 1".to_string()));
    }

    #[test]
    fn test_convert_collection_second_page_keeps_global_positions() {
        let output = convert_collection(&collection_xml(150), 2);

        let CollectionOutput::Page { items } = output else {
            panic!("expected a collection page");
        };
        assert_eq!(items.item.len(), 50);
        assert_eq!(items.item[0].pos, 101);
        assert_eq!(items.item[49].pos, 150);
        assert_eq!(items.item[0].id, Some("101".to_string()));
    }

    #[test]
    fn test_convert_collection_page_past_the_end_is_empty() {
        let output = convert_collection(&collection_xml(150), 3);

        let CollectionOutput::Page { items } = output else {
            panic!("expected a collection page");
        };
        assert!(items.item.is_empty());
        assert_eq!(items.total_items, Some("150".to_string()));
    }

    #[test]
    fn test_convert_collection_huge_page_is_empty_not_wrapped() {
        let output = convert_collection(&collection_xml(3), usize::MAX / COLLECTION_PAGE_SIZE + 2);

        let CollectionOutput::Page { items } = output else {
            panic!("expected a collection page");
        };
        assert!(items.item.is_empty());
        assert_eq!(items.total_items, Some("3".to_string()));
    }

    #[test]
    fn test_convert_collection_defaults_for_missing_text() {
        let xml = r#"<items totalitems="1" pubdate="now">
            <item objecttype="thing" objectid="7">
                <name sortindex="1">Bare Game</name>
            </item>
        </items>"#;
        let output = convert_collection(xml, 1);

        let CollectionOutput::Page { items } = output else {
            panic!("expected a collection page");
        };
        assert_eq!(items.item[0].yearpublished, "unknown");
        assert_eq!(items.item[0].numplays, "unknown");
        assert_eq!(items.item[0].name, Some("Bare Game".to_string()));
    }

    #[test]
    fn test_convert_collection_message_short_circuits() {
        let xml = r#"<message>
            Your request for this collection has been accepted and will be processed.
        </message>"#;
        let output = convert_collection(xml, 1);

        assert!(output.is_pending());
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(
            value["message"],
            "Your request for this collection has been accepted and will be processed."
        );
        assert!(value.get("items").is_none());
    }
}
