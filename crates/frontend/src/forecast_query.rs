//! Cached forecast loading for the panel.
//!
//! One resource per panel: when the coordinates change the resource restarts
//! and the superseded request is dropped, so only the latest pair is shown.
//! Successful responses are kept in a session cache provided by the page.

use std::cell::RefCell;
use std::future::Future;
use std::num::NonZeroUsize;
use std::rc::Rc;

use dioxus::logger::tracing::{debug, warn};
use dioxus::prelude::*;
use lru::LruCache;
use wxmap_shared::models::{Coordinates, ForecastResponse};

use crate::api;

/// How long a cached forecast is served without refetching.
pub const FRESH_FOR_MS: f64 = 5.0 * 60.0 * 1000.0;

pub const CACHE_CAPACITY: usize = 32;

const KEY_SCALE: f64 = 1e6;

/// Coordinate pair quantised to 1e-6 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForecastKey {
    lat_e6: i64,
    lon_e6: i64,
}

impl ForecastKey {
    pub fn new(coords: Coordinates) -> Self {
        ForecastKey {
            lat_e6: (coords.latitude * KEY_SCALE).round() as i64,
            lon_e6: (coords.longitude * KEY_SCALE).round() as i64,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedForecast {
    response: ForecastResponse,
    fetched_at: f64,
}

/// Session cache shared through context; never borrowed across an await.
pub type SharedForecastCache = Rc<RefCell<ForecastCache>>;

pub struct ForecastCache {
    entries: LruCache<ForecastKey, CachedForecast>,
}

impl Default for ForecastCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastCache {
    pub fn new() -> Self {
        let capacity = NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        ForecastCache {
            entries: LruCache::new(capacity),
        }
    }

    pub fn shared() -> SharedForecastCache {
        Rc::new(RefCell::new(Self::new()))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fresh entry for `key`; a stale one is dropped.
    pub fn get(&mut self, key: ForecastKey, now: f64) -> Option<ForecastResponse> {
        let fetched_at = self.entries.get(&key)?.fetched_at;
        if now - fetched_at < FRESH_FOR_MS {
            self.entries.peek(&key).map(|entry| entry.response.clone())
        } else {
            self.entries.pop(&key);
            None
        }
    }

    /// Stores `response`, evicting the least recently used entry when full.
    pub fn insert(&mut self, key: ForecastKey, response: ForecastResponse, now: f64) {
        self.entries.put(
            key,
            CachedForecast {
                response,
                fetched_at: now,
            },
        );
    }
}

/// Resource output, tagged with the coordinates it was loaded for.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastLoad {
    pub key: ForecastKey,
    pub result: Result<ForecastResponse, String>,
}

/// What the panel shows for a resource value.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastState {
    Pending,
    Failed,
    Ready(ForecastResponse),
}

impl ForecastState {
    /// A restarted resource keeps its previous value until the new request
    /// resolves, so anything not loaded for `current` counts as pending.
    pub fn from_resource(
        current: Coordinates,
        status: UseResourceState,
        value: Option<&ForecastLoad>,
    ) -> Self {
        if status == UseResourceState::Pending {
            return ForecastState::Pending;
        }
        match value {
            Some(load) if load.key == ForecastKey::new(current) => match &load.result {
                Ok(response) => ForecastState::Ready(response.clone()),
                Err(_) => ForecastState::Failed,
            },
            _ => ForecastState::Pending,
        }
    }
}

/// Milliseconds since page load; monotonic.
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

async fn load_forecast<F, Fut>(
    coords: Coordinates,
    cache: SharedForecastCache,
    clock: fn() -> f64,
    fetch: F,
) -> Result<ForecastResponse, String>
where
    F: FnOnce(Coordinates) -> Fut,
    Fut: Future<Output = Result<ForecastResponse, String>>,
{
    let key = ForecastKey::new(coords);
    let hit = cache.borrow_mut().get(key, clock());
    if let Some(hit) = hit {
        debug!(?key, "forecast cache hit");
        return Ok(hit);
    }

    let response = fetch(coords).await.inspect_err(|e| {
        warn!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            error = %e,
            "forecast request failed"
        )
    })?;
    cache.borrow_mut().insert(key, response.clone(), clock());
    Ok(response)
}

/// Forecast for the current `coordinates`, restarting whenever they change.
pub fn use_forecast(coordinates: ReadSignal<Coordinates>) -> Resource<ForecastLoad> {
    use_forecast_with(move || *coordinates.read(), now_ms, api::fetch_forecast)
}

fn use_forecast_with<C, F, Fut>(coordinates: C, clock: fn() -> f64, fetch: F) -> Resource<ForecastLoad>
where
    C: Fn() -> Coordinates + 'static,
    F: Fn(Coordinates) -> Fut + Clone + 'static,
    Fut: Future<Output = Result<ForecastResponse, String>> + 'static,
{
    let cache = use_context::<SharedForecastCache>();
    use_resource(move || {
        let coords = coordinates();
        let cache = cache.clone();
        let fetch = fetch.clone();
        async move {
            ForecastLoad {
                key: ForecastKey::new(coords),
                result: load_forecast(coords, cache, clock, fetch).await,
            }
        }
    })
}
