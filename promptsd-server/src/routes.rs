//! HTTP routes: link resolution and the read-only gallery API.

use crate::error::{AppError, AppResult};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use promptsd_core::{
    Asset, ContentItem, ContentQuery, ContentSource, ContentSummary, GalleryConfig, GalleryTab,
    SearchQuery, TrackId, TrackResolver,
};
use promptsd_suno::SunoPatterns;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<dyn TrackResolver>,
    pub source: Arc<dyn ContentSource>,
    /// Offline canonical-URL parsing for stored music links
    pub patterns: Arc<SunoPatterns>,
    pub gallery: GalleryConfig,
}

impl AppState {
    fn summarize(&self, item: &ContentItem) -> ContentSummary {
        ContentSummary::from_item(item, |url| self.patterns.canonical_id(url))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/suno/resolve", post(resolve))
        .route("/api/characters", get(list_characters))
        .route("/api/characters/{id}", get(character_detail))
        .route("/api/search", get(search))
        .route("/api/moderation/queue", get(moderation_queue))
        .route("/api/embed/{track_id}", get(embed))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Debug, Deserialize)]
struct ResolveRequest {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveResponse {
    song_id: TrackId,
    original_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolved_url: Option<String>,
}

async fn resolve(
    State(state): State<AppState>,
    body: Result<Json<ResolveRequest>, JsonRejection>,
) -> AppResult<Json<ResolveResponse>> {
    let url = body
        .ok()
        .and_then(|Json(req)| req.url)
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("URL is required"))?;

    let reference = state.resolver.resolve(&url).await?;
    info!(
        "Resolved {} to track {} via {}",
        reference.raw_url,
        reference.track_id,
        state.resolver.name()
    );

    Ok(Json(ResolveResponse {
        song_id: reference.track_id,
        original_url: reference.raw_url,
        resolved_url: reference.resolved_url,
    }))
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    tab: Option<GalleryTab>,
    include_all: Option<bool>,
    limit: Option<usize>,
    offset: Option<usize>,
}

async fn list_characters(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<ContentSummary>>> {
    let max = state.gallery.default_limit;
    let limit = params.limit.map_or(max, |l| l.clamp(1, max));
    let query = ContentQuery::for_tab(params.tab.unwrap_or_default())
        .with_include_all(params.include_all.unwrap_or(false))
        .with_page(params.offset.unwrap_or(0), limit);

    let items = state.source.list(&query).await?;
    debug!("Listed {} characters from {}", items.len(), state.source.name());

    Ok(Json(items.iter().map(|item| state.summarize(item)).collect()))
}

#[derive(Debug, Default, Deserialize)]
struct QueueParams {
    limit: Option<usize>,
    offset: Option<usize>,
}

/// Pending submissions for the review surface, oldest first
async fn moderation_queue(
    State(state): State<AppState>,
    Query(params): Query<QueueParams>,
) -> AppResult<Json<Vec<ContentSummary>>> {
    let max = state.gallery.default_limit;
    let limit = params.limit.map_or(max, |l| l.clamp(1, max));
    let query = ContentQuery::pending_queue().with_page(params.offset.unwrap_or(0), limit);

    let items = state.source.list(&query).await?;
    debug!("{} characters awaiting review in {}", items.len(), state.source.name());

    Ok(Json(items.iter().map(|item| state.summarize(item)).collect()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailResponse {
    #[serde(flatten)]
    summary: ContentSummary,
    ai_tool_used: Option<String>,
    assets: Vec<Asset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    embed_url: Option<String>,
}

async fn character_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DetailResponse>> {
    let item = state
        .source
        .get(&id)
        .await?
        .filter(|item| item.status.is_visible())
        .ok_or_else(|| AppError::not_found("Character not found"))?;

    let summary = state.summarize(&item);
    let embed_url = summary.music_track_id.as_ref().map(|id| id.embed_url(false));

    Ok(Json(DetailResponse {
        summary,
        ai_tool_used: item.ai_tool_used,
        assets: item.assets,
        embed_url,
    }))
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<ContentSummary>>> {
    let Some(query) = SearchQuery::new(&params.q) else {
        return Ok(Json(Vec::new()));
    };
    let query = query.with_limit(state.gallery.search_limit);

    let items = state.source.search(&query).await?;
    debug!("Search {:?} matched {} characters", query.term(), items.len());

    Ok(Json(items.iter().map(|item| state.summarize(item)).collect()))
}

#[derive(Debug, Default, Deserialize)]
struct EmbedParams {
    #[serde(default)]
    autoplay: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedResponse {
    embed_url: String,
}

async fn embed(
    Path(track_id): Path<String>,
    Query(params): Query<EmbedParams>,
) -> AppResult<Json<EmbedResponse>> {
    let track_id = TrackId::new(track_id).ok_or_else(|| AppError::bad_request("Invalid track id"))?;
    Ok(Json(EmbedResponse {
        embed_url: track_id.embed_url(params.autoplay),
    }))
}
