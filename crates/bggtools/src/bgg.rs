//! Upstream client for BoardGameGeek's xmlapi2 endpoints.
//!
//! One outbound GET per call; non-2xx statuses become [`Error::Upstream`]
//! with the upstream's status code, transport failures become
//! [`Error::Network`]. Retry policy, where one exists, belongs to the caller.

use crate::prelude::Error;

pub const BGG_API_BASE: &str = "https://boardgamegeek.com/xmlapi2";

/// Fetch one xmlapi2 document as text.
pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<String, Error> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::Network(format!("failed to reach {url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            format!("BoardGameGeek returned HTTP {status}")
        } else {
            body.trim().to_string()
        };
        return Err(Error::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    response
        .text()
        .await
        .map_err(|e| Error::Network(format!("failed to read body from {url}: {e}")))
}

/// Collection filters BGG accepts as `&{status}=1` query flags. Anything else
/// on the status path segment is a client error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    Own,
    Prevowned,
    Wishlist,
    Wanttoplay,
    Want,
    Wanttobuy,
    Preordered,
    Fortrade,
}

impl CollectionStatus {
    pub const ALLOWED: [&'static str; 8] = [
        "own",
        "prevowned",
        "wishlist",
        "wanttoplay",
        "want",
        "wanttobuy",
        "preordered",
        "fortrade",
    ];

    pub fn parse(value: &str) -> Result<Self, Error> {
        match value {
            "own" => Ok(Self::Own),
            "prevowned" => Ok(Self::Prevowned),
            "wishlist" => Ok(Self::Wishlist),
            "wanttoplay" => Ok(Self::Wanttoplay),
            "want" => Ok(Self::Want),
            "wanttobuy" => Ok(Self::Wanttobuy),
            "preordered" => Ok(Self::Preordered),
            "fortrade" => Ok(Self::Fortrade),
            _ => Err(Error::Validation(format!(
                "Invalid status '{value}'. Allowed values: {}",
                Self::ALLOWED.join(", ")
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Own => "own",
            Self::Prevowned => "prevowned",
            Self::Wishlist => "wishlist",
            Self::Wanttoplay => "wanttoplay",
            Self::Want => "want",
            Self::Wanttobuy => "wanttobuy",
            Self::Preordered => "preordered",
            Self::Fortrade => "fortrade",
        }
    }
}

/// Query filters forwarded verbatim to the upstream `plays` endpoint.
#[derive(Debug, Clone, Default)]
pub struct PlayFilters {
    pub id: Option<String>,
    pub mindate: Option<String>,
    pub maxdate: Option<String>,
    pub object_type: Option<String>,
    pub subtype: Option<String>,
    pub page: Option<u32>,
}

pub fn user_url(username: &str) -> String {
    format!(
        "{BGG_API_BASE}/user?name={}&buddies=1",
        urlencoding::encode(username)
    )
}

pub fn hot_url() -> String {
    format!("{BGG_API_BASE}/hot?type=boardgame")
}

pub fn collection_url(username: &str, status: CollectionStatus) -> String {
    format!(
        "{BGG_API_BASE}/collection?username={}&subtype=boardgame&excludesubtype=boardgameexpansion&{}=1",
        urlencoding::encode(username),
        status.as_str()
    )
}

pub fn plays_url(username: &str, filters: &PlayFilters) -> String {
    let mut url = format!(
        "{BGG_API_BASE}/plays?username={}",
        urlencoding::encode(username)
    );
    let pairs = [
        ("id", filters.id.as_deref()),
        ("mindate", filters.mindate.as_deref()),
        ("maxdate", filters.maxdate.as_deref()),
        ("type", filters.object_type.as_deref()),
        ("subtype", filters.subtype.as_deref()),
    ];
    for (key, value) in pairs {
        if let Some(value) = value {
            url.push_str(&format!("&{key}={}", urlencoding::encode(value)));
        }
    }
    if let Some(page) = filters.page {
        url.push_str(&format!("&page={page}"));
    }
    url
}

pub fn thing_url(game_id: &str) -> String {
    format!(
        "{BGG_API_BASE}/thing?id={}&stats=1",
        urlencoding::encode(game_id)
    )
}

pub fn search_url(query: &str, exact: bool) -> String {
    let mut url = format!(
        "{BGG_API_BASE}/search?query={}&type=boardgame,boardgameexpansion",
        urlencoding::encode(query)
    );
    if exact {
        url.push_str("&exact=1");
    }
    url
}
