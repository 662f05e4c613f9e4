//! Converter for the xmlapi2 `hot` document (the "hot games" list).

use serde::Serialize;

use crate::xml;

/// One entry of the hot list. Absent sub-elements become `None`, never errors.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct HotGameEntry {
    pub id: Option<String>,
    pub rank: Option<String>,
    pub thumbnail: Option<String>,
    pub name: Option<String>,
    pub yearpublished: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct HotOutput {
    pub items: Vec<HotGameEntry>,
}

/// Convert a hot-list document, preserving document order.
///
/// `limit` of `None` or `Some(0)` means no cap; otherwise conversion stops
/// after `limit` entries.
pub fn convert_hot(xml_data: &str, limit: Option<usize>) -> HotOutput {
    let doc = xml::parse(xml_data);
    let cap = limit.filter(|l| *l > 0);

    let mut items = Vec::new();
    if let Some(root) = xml::root(&doc, "items") {
        for (idx, item) in root.select(&xml::selector("item")).enumerate() {
            if Some(idx) == cap {
                break;
            }
            items.push(HotGameEntry {
                id: xml::attr(item, "id"),
                rank: xml::attr(item, "rank"),
                thumbnail: xml::value_attr(item, "thumbnail"),
                name: xml::value_attr(item, "name"),
                yearpublished: xml::value_attr(item, "yearpublished"),
            });
        }
    }

    HotOutput { items }
}
