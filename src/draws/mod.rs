//! Stryktipset draw data
//!
//! Read-only feed of the currently open pool round and its live results,
//! fetched from the Svenska Spel API. Distribution percentages are display
//! context only: they change all week and never feed ticket validation or
//! the allocation engine.

mod svenska_spel;

pub use svenska_spel::SvenskaSpelClient;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Outcome distribution triple as reported by the pool operator
/// (percent strings, e.g. "45").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDistribution {
    pub one: String,
    pub x: String,
    pub two: String,
}

/// One fixture of a draw as served by the odds feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawMatch {
    pub event_number: i64,
    pub event_description: String,
    pub home: String,
    pub away: String,
    pub match_start: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<OutcomeDistribution>,
}

/// The currently open pool round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draw {
    pub draw_number: i64,
    pub week_number: u32,
    pub reg_close_time: String,
    pub draw_state: String,
    pub matches: Vec<DrawMatch>,
}

/// Read-only source of draw data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DrawSource: Send + Sync {
    /// The currently open draw, or `None` when registration is closed
    /// everywhere.
    async fn current_draw(&self) -> Result<Option<Draw>>;

    /// Live result forecast for a draw, passed through as-is.
    async fn forecast(&self, draw_number: i64) -> Result<serde_json::Value>;
}

/// Periodically refreshed cache of the current draw.
///
/// The refresh loop keeps the cache warm for display endpoints; submission
/// gating always asks the source directly so a just-closed draw is seen
/// immediately.
pub struct DrawFeed {
    source: Arc<dyn DrawSource>,
    current: RwLock<Option<Draw>>,
    refresh_interval: Duration,
}

impl DrawFeed {
    pub fn new(source: Arc<dyn DrawSource>, refresh_interval: Duration) -> Self {
        Self {
            source,
            current: RwLock::new(None),
            refresh_interval,
        }
    }

    /// Latest known draw; fetches live when the cache is cold.
    pub async fn current(&self) -> Result<Option<Draw>> {
        if let Some(draw) = self.current.read().await.clone() {
            return Ok(Some(draw));
        }
        self.refresh().await
    }

    /// Fresh open-state check, bypassing the cache. Used to gate ticket
    /// submission.
    pub async fn is_open(&self) -> Result<bool> {
        Ok(self.source.current_draw().await?.is_some())
    }

    /// Live result forecast for a draw.
    pub async fn forecast(&self, draw_number: i64) -> Result<serde_json::Value> {
        self.source.forecast(draw_number).await
    }

    /// Re-fetch the current draw and replace the cache.
    pub async fn refresh(&self) -> Result<Option<Draw>> {
        let draw = self.source.current_draw().await?;
        *self.current.write().await = draw.clone();
        Ok(draw)
    }

    /// Background refresh loop; spawn on the runtime at startup.
    pub async fn run(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.refresh_interval);
        loop {
            interval.tick().await;
            match self.refresh().await {
                Ok(Some(draw)) => debug!(
                    draw_number = draw.draw_number,
                    matches = draw.matches.len(),
                    "Draw feed refreshed"
                ),
                Ok(None) => debug!("No open draw"),
                Err(e) => warn!(error = %e, "Failed to refresh draw feed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_draw() -> Draw {
        Draw {
            draw_number: 4711,
            week_number: 40,
            reg_close_time: "2025-10-04T15:59:00+02:00".to_string(),
            draw_state: "Open".to_string(),
            matches: vec![DrawMatch {
                event_number: 1,
                event_description: "AIK - Hammarby".to_string(),
                home: "AIK".to_string(),
                away: "Hammarby".to_string(),
                match_start: "2025-10-04T16:00:00+02:00".to_string(),
                distribution: None,
            }],
        }
    }

    #[tokio::test]
    async fn current_is_served_from_cache_after_first_fetch() {
        let mut source = MockDrawSource::new();
        source
            .expect_current_draw()
            .times(1)
            .returning(|| Ok(Some(sample_draw())));

        let feed = DrawFeed::new(Arc::new(source), Duration::from_secs(60));
        let first = feed.current().await.unwrap().unwrap();
        let second = feed.current().await.unwrap().unwrap();
        assert_eq!(first.draw_number, 4711);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn is_open_always_asks_the_source() {
        let mut source = MockDrawSource::new();
        source
            .expect_current_draw()
            .times(2)
            .returning(|| Ok(None));

        let feed = DrawFeed::new(Arc::new(source), Duration::from_secs(60));
        assert!(!feed.is_open().await.unwrap());
        assert!(!feed.is_open().await.unwrap());
    }

    #[tokio::test]
    async fn refresh_replaces_the_cache() {
        let mut source = MockDrawSource::new();
        let mut calls = 0;
        source.expect_current_draw().returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(Some(sample_draw()))
            } else {
                Ok(None)
            }
        });

        let feed = DrawFeed::new(Arc::new(source), Duration::from_secs(60));
        assert!(feed.refresh().await.unwrap().is_some());
        assert!(feed.refresh().await.unwrap().is_none());
    }
}
