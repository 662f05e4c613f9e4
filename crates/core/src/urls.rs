//! Pure URL builders for BoardGameGeek's advanced-search and ranking pages.
//!
//! These do no parsing or transformation, just string templating over BGG's
//! public browse/search query formats. Validation failures return the list of
//! allowed values so callers can surface it verbatim.

use serde::Deserialize;

/// Ranking page categories: the global ranking plus the eight named
/// subdomain rankings.
pub const RANK_CATEGORIES: [&str; 9] = [
    "global",
    "abstracts",
    "cgs",
    "childrensgames",
    "familygames",
    "partygames",
    "strategygames",
    "thematic",
    "wargames",
];

/// Sort orders accepted by the advanced-search page.
pub const SORT_TYPES: [&str; 4] = ["rank", "bggrating", "avgrating", "numvoters"];

#[derive(Debug, Default, Clone, Deserialize)]
pub struct AdvancedSearchParams {
    pub q: Option<String>,
    pub min_players: Option<u32>,
    pub max_players: Option<u32>,
    pub min_playtime: Option<u32>,
    pub max_playtime: Option<u32>,
    pub min_rating: Option<f64>,
    pub min_num_ratings: Option<u32>,
    pub sort_type: Option<String>,
    pub page: Option<u32>,
}

/// Browse URL for a ranking page. `page` is 1-based.
pub fn rank_url(category: &str, page: usize) -> Result<String, String> {
    if !RANK_CATEGORIES.contains(&category) {
        return Err(format!(
            "Invalid category '{category}'. Allowed values: {}",
            RANK_CATEGORIES.join(", ")
        ));
    }
    let page = page.max(1);
    Ok(if category == "global" {
        format!("https://boardgamegeek.com/browse/boardgame/page/{page}")
    } else {
        format!("https://boardgamegeek.com/{category}/browse/boardgame/page/{page}")
    })
}

/// Advanced-search URL over BGG's `range[...]` query format.
pub fn advanced_search_url(params: &AdvancedSearchParams) -> Result<String, String> {
    if let Some(sort) = &params.sort_type {
        if !SORT_TYPES.contains(&sort.as_str()) {
            return Err(format!(
                "Invalid sort_type '{sort}'. Allowed values: {}",
                SORT_TYPES.join(", ")
            ));
        }
    }

    let mut url = String::from("https://boardgamegeek.com/search/boardgame?advsearch=1");
    if let Some(q) = &params.q {
        url.push_str(&format!("&q={}", urlencoding::encode(q)));
    }
    let ranges = [
        ("range[numplayers][min]", params.min_players),
        ("range[numplayers][max]", params.max_players),
        ("range[leastplaytime][min]", params.min_playtime),
        ("range[playtime][max]", params.max_playtime),
        ("range[numvoters][min]", params.min_num_ratings),
    ];
    for (key, value) in ranges {
        if let Some(value) = value {
            url.push_str(&format!("&{}={value}", urlencoding::encode(key)));
        }
    }
    if let Some(rating) = params.min_rating {
        url.push_str(&format!(
            "&{}={rating}",
            urlencoding::encode("range[average][min]")
        ));
    }
    if let Some(sort) = &params.sort_type {
        url.push_str(&format!("&sort={sort}"));
    }
    if let Some(page) = params.page {
        url.push_str(&format!("&page={page}"));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_url_global() {
        assert_eq!(
            rank_url("global", 1).unwrap(),
            "https://boardgamegeek.com/browse/boardgame/page/1"
        );
    }

    #[test]
    fn test_rank_url_subdomain() {
        assert_eq!(
            rank_url("strategygames", 3).unwrap(),
            "https://boardgamegeek.com/strategygames/browse/boardgame/page/3"
        );
    }

    #[test]
    fn test_rank_url_page_floor() {
        assert_eq!(
            rank_url("wargames", 0).unwrap(),
            "https://boardgamegeek.com/wargames/browse/boardgame/page/1"
        );
    }

    #[test]
    fn test_rank_url_rejects_unknown_category() {
        let err = rank_url("rpgs", 1).unwrap_err();
        assert!(err.contains("rpgs"));
        for category in RANK_CATEGORIES {
            assert!(err.contains(category));
        }
    }

    #[test]
    fn test_advanced_search_url_defaults() {
        let url = advanced_search_url(&AdvancedSearchParams::default()).unwrap();
        assert_eq!(url, "https://boardgamegeek.com/search/boardgame?advsearch=1");
    }

    #[test]
    fn test_advanced_search_url_full() {
        let params = AdvancedSearchParams {
            q: Some("brass birmingham".to_string()),
            min_players: Some(2),
            max_players: Some(4),
            min_playtime: Some(60),
            max_playtime: Some(120),
            min_rating: Some(7.5),
            min_num_ratings: Some(1000),
            sort_type: Some("rank".to_string()),
            page: Some(2),
        };
        let url = advanced_search_url(&params).unwrap();

        assert!(url.contains("&q=brass%20birmingham"));
        assert!(url.contains("&range%5Bnumplayers%5D%5Bmin%5D=2"));
        assert!(url.contains("&range%5Bnumplayers%5D%5Bmax%5D=4"));
        assert!(url.contains("&range%5Bleastplaytime%5D%5Bmin%5D=60"));
        assert!(url.contains("&range%5Bplaytime%5D%5Bmax%5D=120"));
        assert!(url.contains("&range%5Bnumvoters%5D%5Bmin%5D=1000"));
        assert!(url.contains("&range%5Baverage%5D%5Bmin%5D=7.5"));
        assert!(url.contains("&sort=rank"));
        assert!(url.ends_with("&page=2"));
    }

    #[test]
    fn test_advanced_search_url_rejects_unknown_sort() {
        let params = AdvancedSearchParams {
            sort_type: Some("alphabetical".to_string()),
            ..Default::default()
        };
        let err = advanced_search_url(&params).unwrap_err();
        assert!(err.contains("alphabetical"));
        for sort in SORT_TYPES {
            assert!(err.contains(sort));
        }
    }
}
