//! Converter for the xmlapi2 `plays` document (a user's logged plays).

use serde::Serialize;

use crate::xml;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PlayItem {
    pub name: Option<String>,
    pub objecttype: Option<String>,
    pub objectid: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub username: Option<String>,
    pub userid: Option<String>,
    pub name: Option<String>,
    pub score: Option<String>,
    pub win: Option<String>,
}

/// `players` is `None` when player details were not requested, and an empty
/// list when they were requested but the play has none recorded.
#[derive(Debug, Serialize, Clone)]
pub struct Play {
    pub id: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub item: PlayItem,
    pub players: Option<Vec<PlayerRecord>>,
}

#[derive(Debug, Serialize, Clone)]
pub struct PlaysOutput {
    pub username: Option<String>,
    pub userid: Option<String>,
    pub total: Option<String>,
    pub page: Option<String>,
    pub plays: Vec<Play>,
}

/// Convert a play log. `limit` follows the usual rule (`None`/`Some(0)` = no
/// cap); `with_players` switches the per-play player records on.
pub fn convert_plays(xml_data: &str, limit: Option<usize>, with_players: bool) -> PlaysOutput {
    let doc = xml::parse(xml_data);
    let root = xml::root(&doc, "plays");
    let cap = limit.filter(|l| *l > 0);

    let mut plays = Vec::new();
    if let Some(root) = root {
        for (idx, play) in root.select(&xml::selector("play")).enumerate() {
            if Some(idx) == cap {
                break;
            }

            let item = play.select(&xml::selector("item")).next();
            let players = with_players.then(|| {
                play.select(&xml::selector("player"))
                    .map(|player| PlayerRecord {
                        username: xml::attr(player, "username"),
                        userid: xml::attr(player, "userid"),
                        name: xml::attr(player, "name"),
                        score: xml::attr(player, "score"),
                        win: xml::attr(player, "win"),
                    })
                    .collect::<Vec<_>>()
            });

            plays.push(Play {
                id: xml::attr(play, "id"),
                date: xml::attr(play, "date"),
                location: xml::attr(play, "location"),
                item: PlayItem {
                    name: item.and_then(|el| xml::attr(el, "name")),
                    objecttype: item.and_then(|el| xml::attr(el, "objecttype")),
                    objectid: item.and_then(|el| xml::attr(el, "objectid")),
                },
                players,
            });
        }
    }

    PlaysOutput {
        username: root.and_then(|el| xml::attr(el, "username")),
        userid: root.and_then(|el| xml::attr(el, "userid")),
        total: root.and_then(|el| xml::attr(el, "total")),
        page: root.and_then(|el| xml::attr(el, "page")),
        plays,
    }
}
