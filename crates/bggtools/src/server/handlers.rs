//! Route handlers and the caller-owned orchestration policies.
//!
//! Handlers validate and normalize parameters, build the upstream URL, fetch,
//! and hand the raw XML to the matching pure converter. The two policies that
//! sit above plain fetch-and-convert — the bounded retry for BGG's async
//! collection export and the exact→inexact search fallback — take their fetch
//! (and sleep) effects as parameters so tests run them without a network or a
//! clock.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use bggtools_core::collection::{convert_collection, CollectionOutput};
use bggtools_core::hot::{convert_hot, HotOutput};
use bggtools_core::plays::{convert_plays, PlaysOutput};
use bggtools_core::search::{convert_search, SearchOutput};
use bggtools_core::thing::{convert_things, ThingOutput};
use bggtools_core::urls;
use bggtools_core::user::{convert_user, UserOutput};

use crate::bgg;
use crate::prelude::Error;
use crate::server::AppState;

/// BGG's export queue usually resolves within a couple of polls.
pub const COLLECTION_RETRY_ATTEMPTS: u32 = 3;
pub const COLLECTION_RETRY_DELAY: Duration = Duration::from_secs(2);

pub async fn manifest(State(state): State<Arc<AppState>>) -> Result<Json<Value>, Error> {
    let path = state.assets.join("manifest.json");
    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|_| Error::NotFound("Item not found".to_string()))?;
    let manifest: Value = serde_json::from_str(&raw)
        .map_err(|e| Error::NotFound(format!("manifest.json is unreadable: {e}")))?;
    Ok(Json(manifest))
}

pub async fn logo(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, Error> {
    let path = state.assets.join("logo.png");
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| Error::NotFound("Logo not found".to_string()))?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

pub async fn user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<UserOutput>, Error> {
    let xml = bgg::fetch(&state.http, &bgg::user_url(&username)).await?;
    Ok(Json(convert_user(&xml)))
}

#[derive(Debug, Deserialize)]
pub struct HotQuery {
    pub limit: Option<usize>,
}

pub async fn hot(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HotQuery>,
) -> Result<Json<HotOutput>, Error> {
    let xml = bgg::fetch(&state.http, &bgg::hot_url()).await?;
    Ok(Json(convert_hot(&xml, query.limit)))
}

#[derive(Debug, Deserialize)]
pub struct CollectionQuery {
    pub page: Option<usize>,
}

pub async fn collection(
    State(state): State<Arc<AppState>>,
    Path((username, status)): Path<(String, String)>,
    Query(query): Query<CollectionQuery>,
) -> Result<Json<CollectionOutput>, Error> {
    let status = bgg::CollectionStatus::parse(&status)?;
    let url = bgg::collection_url(&username, status);
    let output = collection_with_retry(
        || bgg::fetch(&state.http, &url),
        tokio::time::sleep,
        query.page.unwrap_or(1),
    )
    .await?;
    Ok(Json(output))
}

/// Fetch-and-convert the collection, retrying while BGG still reports the
/// export as queued. The last attempt's output is returned as-is — callers
/// distinguish real data from the placeholder by the `message` key.
pub async fn collection_with_retry<F, Fut, S, SFut>(
    fetch: F,
    sleep: S,
    page: usize,
) -> Result<CollectionOutput, Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<String, Error>>,
    S: Fn(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let mut attempt = 1;
    loop {
        let xml = fetch().await?;
        let output = convert_collection(&xml, page);
        if !output.is_pending() || attempt == COLLECTION_RETRY_ATTEMPTS {
            return Ok(output);
        }
        sleep(COLLECTION_RETRY_DELAY).await;
        attempt += 1;
    }
}

#[derive(Debug, Deserialize)]
pub struct PlaysQuery {
    pub limit: Option<usize>,
    pub with_players: Option<bool>,
    pub id: Option<String>,
    pub mindate: Option<String>,
    pub maxdate: Option<String>,
    #[serde(rename = "type")]
    pub object_type: Option<String>,
    pub subtype: Option<String>,
    pub page: Option<u32>,
}

pub async fn plays(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(query): Query<PlaysQuery>,
) -> Result<Json<PlaysOutput>, Error> {
    let filters = bgg::PlayFilters {
        id: query.id,
        mindate: query.mindate,
        maxdate: query.maxdate,
        object_type: query.object_type,
        subtype: query.subtype,
        page: query.page,
    };
    let xml = bgg::fetch(&state.http, &bgg::plays_url(&username, &filters)).await?;
    Ok(Json(convert_plays(
        &xml,
        query.limit,
        query.with_players.unwrap_or(false),
    )))
}

pub async fn thing(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<ThingOutput>, Error> {
    let xml = bgg::fetch(&state.http, &bgg::thing_url(&game_id)).await?;
    Ok(Json(convert_things(&xml)))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub exact: Option<bool>,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchOutput>, Error> {
    let output = search_with_fallback(
        |url| {
            let http = state.http.clone();
            async move { bgg::fetch(&http, &url).await }
        },
        &query,
        params.exact.unwrap_or(false),
    )
    .await?;
    Ok(Json(output))
}

/// An exact search with both buckets empty is retried once without the exact
/// flag; still empty means not found.
pub async fn search_with_fallback<F, Fut>(
    fetch: F,
    query: &str,
    exact: bool,
) -> Result<SearchOutput, Error>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<String, Error>>,
{
    let xml = fetch(bgg::search_url(query, exact)).await?;
    let mut output = convert_search(&xml);

    if output.is_empty() && exact {
        let xml = fetch(bgg::search_url(query, false)).await?;
        output = convert_search(&xml);
    }

    if output.is_empty() {
        return Err(Error::NotFound(format!("No results found for '{query}'")));
    }
    Ok(output)
}

pub async fn advanced_search(
    Query(params): Query<urls::AdvancedSearchParams>,
) -> Result<Json<Value>, Error> {
    let url = urls::advanced_search_url(&params).map_err(Error::Validation)?;
    Ok(Json(json!({ "url": url })))
}

#[derive(Debug, Deserialize)]
pub struct RankQuery {
    pub page: Option<usize>,
}

pub async fn rank(
    Path(category): Path<String>,
    Query(query): Query<RankQuery>,
) -> Result<Json<Value>, Error> {
    let url = urls::rank_url(&category, query.page.unwrap_or(1)).map_err(Error::Validation)?;
    Ok(Json(json!({ "url": url })))
}
