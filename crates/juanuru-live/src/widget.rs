use std::sync::Arc;

use juanuru_core::LiveConfig;

use crate::client::LiveDataClient;
use crate::render::{LivePanel, LiveView, RenderTarget};
use crate::storage::{CacheSlot, KeyValueStore};
use crate::types::{LiveError, MissingFieldPolicy};

/// Fetches live data, renders it, and falls back to the cache slot.
///
/// Overlapping calls are not coordinated: whichever finishes last owns the
/// cache slot and the output region.
pub struct LiveDataWidget {
    client: LiveDataClient,
    cache: CacheSlot,
    target: Arc<dyn RenderTarget>,
    policy: MissingFieldPolicy,
    cache_fallback: bool,
}

impl LiveDataWidget {
    pub fn new(
        client: LiveDataClient,
        cache: CacheSlot,
        target: Arc<dyn RenderTarget>,
        policy: MissingFieldPolicy,
        cache_fallback: bool,
    ) -> Self {
        Self {
            client,
            cache,
            target,
            policy,
            cache_fallback,
        }
    }

    /// Wire a widget from the `[live]` settings.
    ///
    /// # Errors
    /// Fails when the HTTP client cannot be built.
    pub fn from_config(
        config: &LiveConfig,
        store: Arc<dyn KeyValueStore>,
        target: Arc<dyn RenderTarget>,
    ) -> Result<Self, LiveError> {
        let client = LiveDataClient::new(config)?;
        let cache = CacheSlot::new(store, config.cache_key.clone());
        Ok(Self::new(
            client,
            cache,
            target,
            config.missing_field_policy,
            config.cache_fallback,
        ))
    }

    /// Fetch the reading at `lat`/`lon` and render it.
    ///
    /// Never fails: every error ends in a cached or unavailable render. A
    /// successful reading is saved to the cache slot before it is rendered;
    /// a failed fetch leaves the slot untouched.
    pub async fn fetch_and_render(&self, lat: f64, lon: f64) -> LiveView {
        let view = match self.client.fetch(lat, lon).await {
            Ok(reading) => {
                if reading.is_partial() {
                    tracing::warn!(?reading, "Live reading is missing fields");
                }
                if let Err(e) = self.cache.save(&reading) {
                    tracing::warn!("Failed to cache live reading under {}: {}", self.cache.key(), e);
                }
                LiveView::Live(reading)
            }
            Err(e) => {
                tracing::error!(lat, lon, error = %e, "Fetch live data failed");
                self.fallback()
            }
        };

        self.render(view);
        view
    }

    fn fallback(&self) -> LiveView {
        if !self.cache_fallback {
            return LiveView::Unavailable;
        }

        match self.cache.load() {
            Ok(Some(reading)) => {
                tracing::info!("Showing cached live reading");
                LiveView::Cached(reading)
            }
            Ok(None) => {
                tracing::debug!("{} under {}", LiveError::CacheMiss, self.cache.key());
                LiveView::Unavailable
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable cached reading: {}", e);
                LiveView::Unavailable
            }
        }
    }

    fn render(&self, view: LiveView) {
        let panel = LivePanel::new(view, self.policy);
        if let Err(e) = self.target.replace_contents(&panel) {
            tracing::error!("Failed to render live data: {}", e);
        }
    }
}
