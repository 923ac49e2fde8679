//! # HTTP API
//!
//! Local JSON API over the catalog, the visitor's collection and the profile
//! lookup panel.
//!
//! ```text
//! GET  /health
//! GET  /badges?search&status&category&sort
//! GET  /badges/{id}
//! POST /badges/{id}/toggle        (bearer key, if configured)
//! GET  /owned
//! GET  /sections
//! GET  /guides
//! GET  /faq
//! GET  /lookup
//! POST /lookup {"username": ..}   (bearer key, if configured; rate limited)
//! ```
//!
//! Shared state sits behind `std::sync::Mutex`. No guard is ever held across
//! an `.await`: handlers copy what they need out, drop the lock, then call
//! upstream.

mod error;

pub use error::ApiError;

use crate::collection::Collection;
use crate::config::AppConfig;
use crate::views::{BadgeList, BadgeView, LookupView, Sections, ToggleResult};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use badgedex_core::{
    BADGES, BadgeRecord, CatalogView, CategoryFilter, FAQS, FaqItem, FilterState, LookupState,
    OwnedSet, OwnedStore, SortKey, StatusFilter,
};
use badgedex_github::GithubClient;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, MutexGuard};
use subtle::ConstantTimeEq;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

/// Store type held by the server.
pub type SharedStore = Box<dyn OwnedStore + Send>;

// =============================================================================
// STATE
// =============================================================================

/// Everything the handlers share.
pub struct AppState {
    collection: Mutex<Collection<SharedStore>>,
    views: Mutex<CatalogView<'static>>,
    lookup: Mutex<LookupState>,
    github: GithubClient,
    limiter: DefaultDirectRateLimiter,
    api_key: Option<String>,
}

impl AppState {
    /// Build state from `config`, loading the collection from `store`.
    pub fn new(
        config: &AppConfig,
        store: SharedStore,
    ) -> Result<Arc<Self>, badgedex_github::Error> {
        let per_minute = NonZeroU32::new(config.lookups_per_minute).unwrap_or(NonZeroU32::MIN);
        Ok(Arc::new(Self {
            collection: Mutex::new(Collection::load(store)),
            views: Mutex::new(CatalogView::new(BADGES)),
            lookup: Mutex::new(LookupState::new()),
            github: config.github_client()?,
            limiter: RateLimiter::direct(Quota::per_minute(per_minute)),
            api_key: config.effective_api_key().map(str::to_string),
        }))
    }

    fn owned_snapshot(&self) -> Result<OwnedSet, ApiError> {
        Ok(lock(&self.collection)?.owned().clone())
    }

    /// Reject the request unless it carries the configured bearer key.
    fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let Some(expected) = &self.api_key else {
            return Ok(());
        };
        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .unwrap_or_default();
        if bool::from(presented.as_bytes().ct_eq(expected.as_bytes())) {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, ApiError> {
    mutex
        .lock()
        .map_err(|_| ApiError::Internal("state lock poisoned".to_string()))
}

// =============================================================================
// ROUTER
// =============================================================================

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/badges", get(list_badges))
        .route("/badges/{id}", get(get_badge))
        .route("/badges/{id}/toggle", post(toggle_badge))
        .route("/owned", get(list_owned))
        .route("/sections", get(sections))
        .route("/guides", get(guides))
        .route("/faq", get(faq))
        .route("/lookup", get(current_lookup).post(start_lookup))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Raw query string values; parsed with the core's typed parsers so errors
/// name the accepted values.
#[derive(Debug, Default, Deserialize)]
pub struct BadgeQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
}

impl BadgeQuery {
    pub fn to_filter(&self) -> Result<FilterState, ApiError> {
        let mut filter = FilterState::new();
        if let Some(search) = &self.search {
            filter = filter.with_search(search.clone());
        }
        if let Some(status) = &self.status {
            filter = filter.with_status(status.parse::<StatusFilter>()?);
        }
        if let Some(category) = &self.category {
            filter = filter.with_category(category.parse::<CategoryFilter>()?);
        }
        if let Some(sort) = &self.sort {
            filter = filter.with_sort(sort.parse::<SortKey>()?);
        }
        Ok(filter)
    }
}

async fn list_badges(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BadgeQuery>,
) -> Result<Json<BadgeList>, ApiError> {
    let filter = query.to_filter()?;
    let (catalog, owned) = {
        let collection = lock(&state.collection)?;
        (collection.catalog(), collection.owned().clone())
    };
    let shown = lock(&state.views)?.view(&filter, &owned);
    Ok(Json(BadgeList::new(catalog, shown, &owned)))
}

async fn get_badge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BadgeView>, ApiError> {
    let collection = lock(&state.collection)?;
    let badge = collection
        .catalog()
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("unknown badge: {id}")))?;
    Ok(Json(BadgeView::new(badge, collection.owned())))
}

async fn toggle_badge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ToggleResult>, ApiError> {
    state.authorize(&headers)?;
    let mut collection = lock(&state.collection)?;
    let owned = collection.toggle(&id)?;
    let owned_count = collection.owned().visible(collection.catalog()).count();
    Ok(Json(ToggleResult {
        id,
        owned,
        owned_count,
    }))
}

async fn list_owned(State(state): State<Arc<AppState>>) -> Result<Json<BadgeList>, ApiError> {
    let collection = lock(&state.collection)?;
    let catalog = collection.catalog();
    let owned = collection.owned();
    let visible: Vec<&'static BadgeRecord> = owned.visible(catalog).collect();
    Ok(Json(BadgeList::new(catalog, visible, owned)))
}

async fn sections(State(state): State<Arc<AppState>>) -> Result<Json<Sections>, ApiError> {
    let collection = lock(&state.collection)?;
    Ok(Json(Sections::new(collection.catalog(), collection.owned())))
}

async fn guides(State(state): State<Arc<AppState>>) -> Result<Json<Vec<BadgeView>>, ApiError> {
    let owned = state.owned_snapshot()?;
    let catalog = badgedex_core::Catalog::builtin();
    Ok(Json(BadgeView::all(catalog.guides(), &owned)))
}

async fn faq() -> Json<&'static [FaqItem]> {
    Json(FAQS)
}

async fn current_lookup(State(state): State<Arc<AppState>>) -> Result<Json<LookupView>, ApiError> {
    let lookup = lock(&state.lookup)?;
    Ok(Json(LookupView::from(&*lookup)))
}

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub username: String,
}

async fn start_lookup(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<LookupRequest>,
) -> Result<Json<LookupView>, ApiError> {
    state.authorize(&headers)?;

    let ticket = {
        let mut lookup = lock(&state.lookup)?;
        lookup.begin(&request.username)
    };
    let Some(ticket) = ticket else {
        return Err(ApiError::BadRequest(
            "username must not be empty".to_string(),
        ));
    };

    if state.limiter.check().is_err() {
        let mut lookup = lock(&state.lookup)?;
        lookup.finish(ticket, Err(badgedex_core::LookupFailure::RateLimited));
        return Err(ApiError::TooManyLookups);
    }

    let username = request.username.trim();
    let outcome = state.github.lookup(username).await.map_err(|err| {
        warn!(username, error = %err, "profile lookup failed");
        err.failure()
    });

    let mut lookup = lock(&state.lookup)?;
    if !lookup.finish(ticket, outcome) {
        debug!(username, "lookup superseded by a newer request");
    } else if let Some(failure) = lookup.error {
        return Err(ApiError::Lookup(failure));
    }
    Ok(Json(LookupView::from(&*lookup)))
}
