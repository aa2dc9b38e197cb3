//! Svenska Spel Stryktipset API client.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Datelike};

use serde::Deserialize;

use super::{Draw, DrawMatch, DrawSource, OutcomeDistribution};

// Raw upstream payloads. Only the fields we read are modeled.

#[derive(Debug, Deserialize)]
struct DrawsPayload {
    #[serde(default)]
    draws: Vec<RawDraw>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDraw {
    draw_number: i64,
    reg_close_time: String,
    draw_state: String,
    #[serde(default)]
    draw_events: Vec<RawDrawEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDrawEvent {
    event_number: i64,
    event_description: Option<String>,
    #[serde(default)]
    cancelled: bool,
    #[serde(rename = "match")]
    match_info: Option<RawMatch>,
    svenska_folket: Option<RawDistribution>,
    bet_metrics: Option<RawBetMetrics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatch {
    match_start: Option<String>,
    #[serde(default)]
    participants: Vec<RawParticipant>,
}

#[derive(Debug, Deserialize)]
struct RawParticipant {
    #[serde(rename = "type")]
    kind: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDistribution {
    one: String,
    x: String,
    two: String,
}

#[derive(Debug, Deserialize)]
struct RawBetMetrics {
    #[serde(default)]
    values: Vec<RawBetMetricValue>,
}

#[derive(Debug, Deserialize)]
struct RawBetMetricValue {
    outcome: Option<String>,
    distribution: Option<RawBetMetricDistribution>,
}

#[derive(Debug, Deserialize)]
struct RawBetMetricDistribution {
    distribution: Option<String>,
}

/// HTTP client for the Svenska Spel Stryktipset endpoints.
pub struct SvenskaSpelClient {
    http: reqwest::Client,
    base_url: String,
}

impl SvenskaSpelClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl DrawSource for SvenskaSpelClient {
    async fn current_draw(&self) -> Result<Option<Draw>> {
        let url = format!("{}/draw/1/stryktipset/draws", self.base_url);
        let payload: DrawsPayload = self
            .http
            .get(&url)
            .send()
            .await
            .context("Stryktipset draws request failed")?
            .error_for_status()
            .context("Stryktipset draws request rejected")?
            .json()
            .await
            .context("Failed to decode Stryktipset draws payload")?;

        Ok(payload
            .draws
            .into_iter()
            .find(|draw| draw.draw_state == "Open")
            .map(map_draw))
    }

    async fn forecast(&self, draw_number: i64) -> Result<serde_json::Value> {
        let url = format!(
            "{}/draw/1/stryktipset/draws/forecast/{}",
            self.base_url, draw_number
        );
        self.http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Forecast request for draw {} failed", draw_number))?
            .error_for_status()
            .with_context(|| format!("Forecast request for draw {} rejected", draw_number))?
            .json()
            .await
            .with_context(|| format!("Failed to decode forecast payload for draw {}", draw_number))
    }
}

fn map_draw(raw: RawDraw) -> Draw {
    let mut matches: Vec<DrawMatch> = raw
        .draw_events
        .iter()
        .filter(|event| !event.cancelled)
        .map(map_event)
        .collect();
    matches.sort_by_key(|m| m.event_number);

    Draw {
        draw_number: raw.draw_number,
        week_number: week_number(&raw.reg_close_time),
        reg_close_time: raw.reg_close_time,
        draw_state: raw.draw_state,
        matches,
    }
}

fn map_event(event: &RawDrawEvent) -> DrawMatch {
    let participant = |kind: &str| {
        event
            .match_info
            .as_ref()
            .and_then(|m| {
                m.participants
                    .iter()
                    .find(|p| p.kind.as_deref() == Some(kind))
            })
            .and_then(|p| p.name.clone())
            .unwrap_or_default()
    };

    DrawMatch {
        event_number: event.event_number,
        event_description: event.event_description.clone().unwrap_or_default(),
        home: participant("home"),
        away: participant("away"),
        match_start: event
            .match_info
            .as_ref()
            .and_then(|m| m.match_start.clone())
            .unwrap_or_default(),
        distribution: map_distribution(event),
    }
}

/// Prefer the svenskaFolket triple; fall back to betMetrics when absent.
fn map_distribution(event: &RawDrawEvent) -> Option<OutcomeDistribution> {
    if let Some(folket) = &event.svenska_folket {
        return Some(OutcomeDistribution {
            one: folket.one.clone(),
            x: folket.x.clone(),
            two: folket.two.clone(),
        });
    }

    let metrics = event.bet_metrics.as_ref()?;
    let pick = |sign: &str| {
        metrics
            .values
            .iter()
            .find(|value| value.outcome.as_deref() == Some(sign))
            .and_then(|value| value.distribution.as_ref())
            .and_then(|d| d.distribution.clone())
    };

    match (pick("1"), pick("X"), pick("2")) {
        (Some(one), Some(x), Some(two)) => Some(OutcomeDistribution { one, x, two }),
        _ => None,
    }
}

/// ISO-8601 week number of the registration close time; 0 when unparsable.
fn week_number(reg_close_time: &str) -> u32 {
    DateTime::parse_from_rfc3339(reg_close_time)
        .map(|close| close.iso_week().week())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAWS_FIXTURE: &str = r#"{
        "draws": [
            {
                "drawNumber": 4710,
                "regCloseTime": "2025-09-27T15:59:00+02:00",
                "drawState": "Finalized",
                "drawEvents": []
            },
            {
                "drawNumber": 4711,
                "regCloseTime": "2025-10-04T15:59:00+02:00",
                "drawState": "Open",
                "drawEvents": [
                    {
                        "eventNumber": 2,
                        "eventDescription": "Djurgården - Malmö FF",
                        "cancelled": false,
                        "match": {
                            "matchStart": "2025-10-04T16:00:00+02:00",
                            "participants": [
                                { "type": "home", "name": "Djurgården" },
                                { "type": "away", "name": "Malmö FF" }
                            ]
                        },
                        "betMetrics": {
                            "values": [
                                { "outcome": "1", "distribution": { "distribution": "38" } },
                                { "outcome": "X", "distribution": { "distribution": "29" } },
                                { "outcome": "2", "distribution": { "distribution": "33" } }
                            ]
                        }
                    },
                    {
                        "eventNumber": 1,
                        "eventDescription": "AIK - Hammarby",
                        "cancelled": false,
                        "match": {
                            "matchStart": "2025-10-04T16:00:00+02:00",
                            "participants": [
                                { "type": "home", "name": "AIK" },
                                { "type": "away", "name": "Hammarby" }
                            ]
                        },
                        "svenskaFolket": { "one": "45", "x": "28", "two": "27" }
                    },
                    {
                        "eventNumber": 3,
                        "eventDescription": "Cancelled game",
                        "cancelled": true
                    }
                ]
            }
        ]
    }"#;

    fn open_draw() -> Draw {
        let payload: DrawsPayload = serde_json::from_str(DRAWS_FIXTURE).unwrap();
        let raw = payload
            .draws
            .into_iter()
            .find(|draw| draw.draw_state == "Open")
            .unwrap();
        map_draw(raw)
    }

    #[test]
    fn picks_the_open_draw_and_orders_matches_by_event_number() {
        let draw = open_draw();
        assert_eq!(draw.draw_number, 4711);
        assert_eq!(draw.draw_state, "Open");
        assert_eq!(draw.matches.len(), 2, "cancelled events must be dropped");
        assert_eq!(draw.matches[0].event_number, 1);
        assert_eq!(draw.matches[0].home, "AIK");
        assert_eq!(draw.matches[1].event_number, 2);
        assert_eq!(draw.matches[1].away, "Malmö FF");
    }

    #[test]
    fn prefers_svenska_folket_distribution() {
        let draw = open_draw();
        let distribution = draw.matches[0].distribution.as_ref().unwrap();
        assert_eq!(distribution.one, "45");
        assert_eq!(distribution.x, "28");
        assert_eq!(distribution.two, "27");
    }

    #[test]
    fn falls_back_to_bet_metrics() {
        let draw = open_draw();
        let distribution = draw.matches[1].distribution.as_ref().unwrap();
        assert_eq!(distribution.one, "38");
        assert_eq!(distribution.x, "29");
        assert_eq!(distribution.two, "33");
    }

    #[test]
    fn extracts_iso_week_from_close_time() {
        let draw = open_draw();
        assert_eq!(draw.week_number, 40);
    }

    #[test]
    fn unparsable_close_time_defaults_to_week_zero() {
        assert_eq!(week_number("not a timestamp"), 0);
    }

    #[test]
    fn incomplete_bet_metrics_yields_no_distribution() {
        let event: RawDrawEvent = serde_json::from_str(
            r#"{
                "eventNumber": 4,
                "betMetrics": {
                    "values": [
                        { "outcome": "1", "distribution": { "distribution": "50" } }
                    ]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(map_distribution(&event), None);
    }
}
