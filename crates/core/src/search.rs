//! Converter for the xmlapi2 `search` document.

use serde::Serialize;

use crate::xml;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SearchItem {
    pub id: Option<String>,
    pub name: Option<String>,
    pub yearpublished: Option<String>,
}

/// Results bucketed by item type. The output always carries exactly these two
/// keys; items of any other type are dropped.
#[derive(Debug, Serialize, Clone, Default)]
pub struct SearchOutput {
    pub boardgame: Vec<SearchItem>,
    pub boardgameexpansion: Vec<SearchItem>,
}

impl SearchOutput {
    /// Both buckets empty. The caller uses this for the exact→inexact
    /// fallback and the final not-found signal.
    pub fn is_empty(&self) -> bool {
        self.boardgame.is_empty() && self.boardgameexpansion.is_empty()
    }
}

pub fn convert_search(xml_data: &str) -> SearchOutput {
    let doc = xml::parse(xml_data);
    let mut output = SearchOutput::default();

    if let Some(root) = xml::root(&doc, "items") {
        for item in root.select(&xml::selector("item")) {
            let entry = SearchItem {
                id: xml::attr(item, "id"),
                name: xml::value_attr(item, "name"),
                yearpublished: xml::value_attr(item, "yearpublished"),
            };
            match item.value().attr("type") {
                Some("boardgame") => output.boardgame.push(entry),
                Some("boardgameexpansion") => output.boardgameexpansion.push(entry),
                _ => {}
            }
        }
    }

    output
}
