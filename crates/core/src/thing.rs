//! Converter for the xmlapi2 `thing` document (full game details).

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::xml;
use crate::xml::ElementRef;

/// Link-type categories kept on the output; everything else is dropped.
pub const LINK_TYPES: [&str; 6] = [
    "boardgamecategory",
    "boardgamemechanic",
    "boardgamefamily",
    "boardgamedesigner",
    "boardgameartist",
    "boardgamepublisher",
];

/// Noisy statistical fields dropped from the ratings mapping.
pub const IGNORED_RATINGS: [&str; 7] = [
    "stddev",
    "median",
    "trading",
    "wanting",
    "wishing",
    "numcomments",
    "numweights",
];

#[derive(Debug, Serialize, Clone)]
pub struct GameDetail {
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub id: Option<String>,
    pub thumbnail: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub yearpublished: Option<String>,
    pub minplayers: Option<String>,
    pub maxplayers: Option<String>,
    pub playingtime: Option<String>,
    pub minplaytime: Option<String>,
    pub maxplaytime: Option<String>,
    pub minage: Option<String>,
    pub boardgamecategory: Vec<String>,
    pub boardgamemechanic: Vec<String>,
    pub boardgamefamily: Vec<String>,
    pub boardgamedesigner: Vec<String>,
    pub boardgameartist: Vec<String>,
    /// Capped at the first publisher link; later ones are ignored.
    pub boardgamepublisher: Vec<String>,
    pub suggested_numplayers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_playerage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_dependence: Option<String>,
    pub ratings: Map<String, Value>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ThingOutput {
    pub items: Vec<GameDetail>,
}

pub fn convert_things(xml_data: &str) -> ThingOutput {
    let doc = xml::parse(xml_data);

    let mut items = Vec::new();
    if let Some(root) = xml::root(&doc, "items") {
        for item in root.select(&xml::selector("item")) {
            // Nested link/name elements belong to the outer game item only;
            // thing documents never nest one item inside another.
            items.push(convert_item(item));
        }
    }

    ThingOutput { items }
}

fn convert_item(item: ElementRef) -> GameDetail {
    let mut links: BTreeMap<&str, Vec<String>> =
        LINK_TYPES.iter().map(|t| (*t, Vec::new())).collect();
    for link in item.select(&xml::selector("link")) {
        let Some(kind) = link.value().attr("type") else {
            continue;
        };
        let Some(bucket) = links.get_mut(kind) else {
            continue;
        };
        if kind == "boardgamepublisher" && !bucket.is_empty() {
            continue;
        }
        if let Some(value) = xml::attr(link, "value") {
            bucket.push(value);
        }
    }
    let mut take = |kind: &str| links.remove(kind).unwrap_or_default();

    GameDetail {
        item_type: xml::attr(item, "type"),
        id: xml::attr(item, "id"),
        thumbnail: xml::text(item, "thumbnail"),
        name: xml::value_attr(item, r#"name[type="primary"]"#),
        description: xml::text(item, "description"),
        yearpublished: xml::value_attr(item, "yearpublished"),
        minplayers: xml::value_attr(item, "minplayers"),
        maxplayers: xml::value_attr(item, "maxplayers"),
        playingtime: xml::value_attr(item, "playingtime"),
        minplaytime: xml::value_attr(item, "minplaytime"),
        maxplaytime: xml::value_attr(item, "maxplaytime"),
        minage: xml::value_attr(item, "minage"),
        boardgamecategory: take("boardgamecategory"),
        boardgamemechanic: take("boardgamemechanic"),
        boardgamefamily: take("boardgamefamily"),
        boardgamedesigner: take("boardgamedesigner"),
        boardgameartist: take("boardgameartist"),
        boardgamepublisher: take("boardgamepublisher"),
        suggested_numplayers: numplayers_poll(item),
        suggested_playerage: single_result_poll(item, "suggested_playerage"),
        language_dependence: single_result_poll(item, "language_dependence"),
        ratings: ratings_map(item),
    }
}

/// Winning label by highest vote count. Ties keep the first maximum in
/// document order; zero votes overall means no winner.
fn winning_value(entries: impl IntoIterator<Item = (String, u64)>) -> Option<String> {
    let mut best: Option<(String, u64)> = None;
    for (label, votes) in entries {
        if best.as_ref().is_none_or(|(_, b)| votes > *b) {
            best = Some((label, votes));
        }
    }
    best.filter(|(_, votes)| *votes > 0).map(|(label, _)| label)
}

fn result_votes(results: ElementRef) -> Vec<(String, u64)> {
    results
        .select(&xml::selector("result"))
        .filter_map(|el| {
            let label = xml::attr(el, "value")?;
            let votes = el
                .value()
                .attr("numvotes")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(0);
            Some((label, votes))
        })
        .collect()
}

/// Per-player-count winners of the `suggested_numplayers` poll. Buckets where
/// nobody voted are omitted.
fn numplayers_poll(item: ElementRef) -> BTreeMap<String, String> {
    let mut winners = BTreeMap::new();
    let Some(poll) = item
        .select(&xml::selector(r#"poll[name="suggested_numplayers"]"#))
        .next()
    else {
        return winners;
    };
    for results in poll.select(&xml::selector("results")) {
        let Some(numplayers) = xml::attr(results, "numplayers") else {
            continue;
        };
        if let Some(winner) = winning_value(result_votes(results)) {
            winners.insert(numplayers, winner);
        }
    }
    winners
}

/// Collapse a single-`results` poll (`suggested_playerage`,
/// `language_dependence`) to its winning label.
fn single_result_poll(item: ElementRef, poll_name: &str) -> Option<String> {
    let poll = item
        .select(&xml::selector(&format!(r#"poll[name="{poll_name}"]"#)))
        .next()?;
    let results = poll.select(&xml::selector("results")).next()?;
    winning_value(result_votes(results))
}

/// Flatten `statistics/ratings` into `rating name -> value`, expanding the
/// `ranks` subtree into a `friendly name -> value` object and dropping the
/// [`IGNORED_RATINGS`] fields.
fn ratings_map(item: ElementRef) -> Map<String, Value> {
    let mut ratings = Map::new();
    let Some(block) = item.select(&xml::selector("statistics ratings")).next() else {
        return ratings;
    };

    let mut ranks = Map::new();
    for el in block.select(&xml::selector("*")) {
        let tag = el.value().name();
        match tag {
            "ranks" => {}
            "rank" => {
                if let (Some(name), Some(value)) =
                    (xml::attr(el, "friendlyname"), xml::attr(el, "value"))
                {
                    ranks.insert(name, Value::String(value));
                }
            }
            _ if IGNORED_RATINGS.contains(&tag) => {}
            _ => {
                if let Some(value) = xml::attr(el, "value") {
                    ratings.insert(tag.to_string(), Value::String(value));
                }
            }
        }
    }
    ratings.insert("ranks".to_string(), Value::Object(ranks));

    ratings
}

#[cfg(test)]
mod tests {
    use super::*;

    const THING_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<items termsofuse="x">
    <item type="boardgame" id="224517">
        <thumbnail>https://cf.geekdo-images.com/brass.jpg</thumbnail>
        <image>https://cf.geekdo-images.com/brass_full.jpg</image>
        <name type="primary" sortindex="1" value="Brass: Birmingham"/>
        <name type="alternate" sortindex="1" value="Brass: Бирмингем"/>
        <description>Build networks, grow industries.</description>
        <yearpublished value="2018"/>
        <minplayers value="2"/>
        <maxplayers value="4"/>
        <playingtime value="120"/>
        <minplaytime value="60"/>
        <maxplaytime value="120"/>
        <minage value="14"/>
        <poll name="suggested_numplayers" title="User Suggested Number of Players" totalvotes="44">
            <results numplayers="2">
                <result value="Best" numvotes="5"/>
                <result value="Recommended" numvotes="30"/>
                <result value="Not Recommended" numvotes="4"/>
            </results>
            <results numplayers="3">
                <result value="Best" numvotes="20"/>
                <result value="Recommended" numvotes="20"/>
                <result value="Not Recommended" numvotes="1"/>
            </results>
            <results numplayers="4+">
                <result value="Best" numvotes="0"/>
                <result value="Recommended" numvotes="0"/>
                <result value="Not Recommended" numvotes="0"/>
            </results>
        </poll>
        <poll name="suggested_playerage" title="User Suggested Player Age" totalvotes="12">
            <results>
                <result value="12" numvotes="4"/>
                <result value="14" numvotes="8"/>
            </results>
        </poll>
        <poll name="language_dependence" title="Language Dependence" totalvotes="0">
            <results>
                <result level="1" value="No necessary in-game text" numvotes="0"/>
                <result level="2" value="Some necessary text" numvotes="0"/>
            </results>
        </poll>
        <link type="boardgamecategory" id="1021" value="Economic"/>
        <link type="boardgamecategory" id="1088" value="Industry / Manufacturing"/>
        <link type="boardgamemechanic" id="2040" value="Hand Management"/>
        <link type="boardgamefamily" id="6258" value="Brass"/>
        <link type="boardgamedesigner" id="6" value="Martin Wallace"/>
        <link type="boardgameartist" id="35076" value="Lina Cossette"/>
        <link type="boardgamepublisher" id="29313" value="Roxley"/>
        <link type="boardgamepublisher" id="2366" value="Second Publisher"/>
        <link type="boardgameintegration" id="28720" value="Brass: Lancashire"/>
        <statistics page="1">
            <ratings>
                <usersrated value="40000"/>
                <average value="8.6"/>
                <bayesaverage value="8.4"/>
                <ranks>
                    <rank type="subtype" id="1" name="boardgame" friendlyname="Board Game Rank" value="1" bayesaverage="8.4"/>
                    <rank type="family" id="5497" name="strategygames" friendlyname="Strategy Game Rank" value="1" bayesaverage="8.5"/>
                </ranks>
                <stddev value="1.2"/>
                <median value="0"/>
                <owned value="60000"/>
                <trading value="300"/>
                <wanting value="1500"/>
                <wishing value="9000"/>
                <numcomments value="5000"/>
                <numweights value="2000"/>
                <averageweight value="3.9"/>
            </ratings>
        </statistics>
    </item>
</items>"#;

    fn first_item() -> GameDetail {
        let output = convert_things(THING_XML);
        assert_eq!(output.items.len(), 1);
        output.items.into_iter().next().unwrap()
    }

    #[test]
    fn test_scalar_fields() {
        let item = first_item();

        assert_eq!(item.item_type, Some("boardgame".to_string()));
        assert_eq!(item.id, Some("224517".to_string()));
        assert_eq!(
            item.thumbnail,
            Some("https://cf.geekdo-images.com/brass.jpg".to_string())
        );
        assert_eq!(
            item.description,
            Some("Build networks, grow industries.".to_string())
        );
        assert_eq!(item.yearpublished, Some("2018".to_string()));
        assert_eq!(item.minplayers, Some("2".to_string()));
        assert_eq!(item.maxplayers, Some("4".to_string()));
        assert_eq!(item.playingtime, Some("120".to_string()));
        assert_eq!(item.minplaytime, Some("60".to_string()));
        assert_eq!(item.maxplaytime, Some("120".to_string()));
        assert_eq!(item.minage, Some("14".to_string()));
    }

    #[test]
    fn test_primary_name_disambiguated_from_alternates() {
        let item = first_item();
        assert_eq!(item.name, Some("Brass: Birmingham".to_string()));
    }

    #[test]
    fn test_links_bucketed_and_unknown_types_dropped() {
        let item = first_item();

        assert_eq!(
            item.boardgamecategory,
            vec!["Economic", "Industry / Manufacturing"]
        );
        assert_eq!(item.boardgamemechanic, vec!["Hand Management"]);
        assert_eq!(item.boardgamefamily, vec!["Brass"]);
        assert_eq!(item.boardgamedesigner, vec!["Martin Wallace"]);
        assert_eq!(item.boardgameartist, vec!["Lina Cossette"]);
    }

    #[test]
    fn test_publisher_capped_at_first_value() {
        let item = first_item();
        assert_eq!(item.boardgamepublisher, vec!["Roxley"]);
    }

    #[test]
    fn test_numplayers_poll_winners() {
        let item = first_item();

        assert_eq!(
            item.suggested_numplayers.get("2"),
            Some(&"Recommended".to_string())
        );
        // Tie between Best and Recommended at 20 votes: first maximum wins.
        assert_eq!(
            item.suggested_numplayers.get("3"),
            Some(&"Best".to_string())
        );
        // Bucket with zero votes is omitted.
        assert!(!item.suggested_numplayers.contains_key("4+"));
    }

    #[test]
    fn test_single_result_polls() {
        let item = first_item();

        assert_eq!(item.suggested_playerage, Some("14".to_string()));
        // No votes cast at all: field omitted.
        assert_eq!(item.language_dependence, None);
        let value = serde_json::to_value(&item).unwrap();
        assert!(value.get("language_dependence").is_none());
    }

    #[test]
    fn test_ratings_flattened_with_friendly_ranks() {
        let item = first_item();

        assert_eq!(item.ratings["usersrated"], "40000");
        assert_eq!(item.ratings["average"], "8.6");
        assert_eq!(item.ratings["owned"], "60000");
        assert_eq!(item.ratings["averageweight"], "3.9");
        assert_eq!(item.ratings["ranks"]["Board Game Rank"], "1");
        assert_eq!(item.ratings["ranks"]["Strategy Game Rank"], "1");
    }

    #[test]
    fn test_ignored_rating_fields_dropped() {
        let item = first_item();
        for tag in IGNORED_RATINGS {
            assert!(!item.ratings.contains_key(tag), "{tag} should be dropped");
        }
    }

    #[test]
    fn test_missing_optional_fields_never_error() {
        let xml = r#"<items><item type="boardgame" id="1"></item></items>"#;
        let output = convert_things(xml);
        let item = &output.items[0];

        assert_eq!(item.name, None);
        assert_eq!(item.thumbnail, None);
        assert!(item.boardgamecategory.is_empty());
        assert!(item.suggested_numplayers.is_empty());
        assert_eq!(item.suggested_playerage, None);
        assert!(item.ratings.is_empty());
    }
}
