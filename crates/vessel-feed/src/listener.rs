//! The time-boxed collection loop.

use std::collections::HashMap;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::time::{timeout, Instant};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, warn};

use fishspot_common::BoundingBox;

use crate::{demo_fleet, FeedCredentials, FeedError, FeedMode, FeedReport, VesselPosition};

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Websocket endpoint of the AIS stream.
    pub endpoint: String,
    /// Overall wall-clock collection window.
    pub listen_window: Duration,
    /// Per-message receive timeout inside the window.
    pub recv_timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: "wss://stream.aisstream.io/v0/stream".to_string(),
            listen_window: Duration::from_secs(5),
            recv_timeout: Duration::from_secs(1),
        }
    }
}

/// Collect vessel positions inside `bbox`.
///
/// With demo credentials this returns the simulated fleet immediately.
/// With a key it opens the stream, subscribes, and receives until the
/// wall-clock window elapses, deduplicating reports by vessel name (latest
/// wins). An empty collection is a normal outcome.
pub async fn collect_positions(
    credentials: &FeedCredentials,
    bbox: &BoundingBox,
    config: &FeedConfig,
) -> Result<FeedReport, FeedError> {
    let key = match credentials {
        FeedCredentials::Demo => {
            return Ok(FeedReport {
                mode: FeedMode::Demo,
                vessels: demo_fleet(bbox),
            });
        }
        FeedCredentials::Key(key) => key,
    };

    let vessels = listen_live(key, bbox, config).await?;
    Ok(FeedReport {
        mode: FeedMode::Live,
        vessels,
    })
}

async fn listen_live(
    key: &str,
    bbox: &BoundingBox,
    config: &FeedConfig,
) -> Result<Vec<VesselPosition>, FeedError> {
    let (mut ws, _) = connect_async(&config.endpoint)
        .await
        .map_err(|e| FeedError::Unavailable(format!("connect failed: {e}")))?;

    let subscription = subscription_message(key, bbox);
    ws.send(Message::Text(subscription))
        .await
        .map_err(|e| FeedError::Unavailable(format!("subscribe failed: {e}")))?;

    let deadline = Instant::now() + config.listen_window;
    let mut seen: HashMap<String, VesselPosition> = HashMap::new();

    while Instant::now() < deadline {
        match timeout(config.recv_timeout, ws.next()).await {
            // Quiet interval; keep waiting until the overall deadline.
            Err(_) => continue,
            // Server closed the stream; return what we have.
            Ok(None) => break,
            Ok(Some(Err(e))) => {
                warn!(error = %e, "websocket read failed, keeping partial collection");
                break;
            }
            Ok(Some(Ok(Message::Text(text)))) => match parse_report(&text) {
                Ok(Some(vessel)) => {
                    // The subscription box is a request, not a guarantee.
                    if bbox.contains(vessel.lon, vessel.lat) {
                        seen.insert(vessel.name.clone(), vessel);
                    }
                }
                Ok(None) => {}
                // The stream answers a bad key with an error payload.
                Err(e) => {
                    let _ = ws.close(None).await;
                    return Err(e);
                }
            },
            // Pings and binary frames carry no reports.
            Ok(Some(Ok(_))) => {}
        }
    }

    if let Err(e) = ws.close(None).await {
        debug!(error = %e, "websocket close failed after collection");
    }

    let mut vessels: Vec<VesselPosition> = seen.into_values().collect();
    vessels.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(vessels)
}

/// Build the stream subscription payload.
fn subscription_message(key: &str, bbox: &BoundingBox) -> String {
    json!({
        "APIKey": key,
        "BoundingBoxes": [[[bbox.min_lat, bbox.min_lon], [bbox.max_lat, bbox.max_lon]]],
        "FilterMessageTypes": ["PositionReport"],
    })
    .to_string()
}

#[derive(Debug, Deserialize)]
struct StreamMessage {
    #[serde(rename = "MessageType")]
    message_type: Option<String>,
    #[serde(rename = "MetaData")]
    metadata: Option<StreamMetadata>,
    #[serde(rename = "error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamMetadata {
    #[serde(rename = "ShipName")]
    ship_name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Parse one stream frame into a position, if it is one.
///
/// An error payload (bad or expired key) is `FeedError::Unavailable`;
/// frames of other message types, unnamed vessels and malformed frames are
/// skipped rather than failing the pass.
fn parse_report(text: &str) -> Result<Option<VesselPosition>, FeedError> {
    let message: StreamMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(_) => return Ok(None),
    };

    if let Some(error) = message.error {
        return Err(FeedError::Unavailable(error));
    }
    if message.message_type.as_deref() != Some("PositionReport") {
        return Ok(None);
    }

    let Some(meta) = message.metadata else {
        return Ok(None);
    };
    let (Some(lat), Some(lon)) = (meta.latitude, meta.longitude) else {
        return Ok(None);
    };
    let name = meta.ship_name.unwrap_or_default().trim().to_string();
    if name.is_empty() {
        return Ok(None);
    }

    Ok(Some(VesselPosition { name, lat, lon }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hawaii() -> BoundingBox {
        BoundingBox::new(-161.0, 18.5, -155.0, 22.5)
    }

    #[tokio::test]
    async fn test_demo_credentials_never_touch_the_network() {
        let config = FeedConfig {
            endpoint: "wss://localhost:1/nowhere".to_string(),
            ..FeedConfig::default()
        };
        let report = collect_positions(&FeedCredentials::Demo, &hawaii(), &config)
            .await
            .unwrap();
        assert_eq!(report.mode, FeedMode::Demo);
        assert!(!report.vessels.is_empty());
    }

    #[test]
    fn test_subscription_message_shape() {
        let msg = subscription_message("secret", &hawaii());
        let value: serde_json::Value = serde_json::from_str(&msg).unwrap();
        assert_eq!(value["APIKey"], "secret");
        assert_eq!(value["FilterMessageTypes"][0], "PositionReport");
        assert_eq!(value["BoundingBoxes"][0][0][0], 18.5);
        assert_eq!(value["BoundingBoxes"][0][1][1], -155.0);
    }

    #[test]
    fn test_parse_position_report() {
        let text = r#"{
            "MessageType": "PositionReport",
            "MetaData": {"ShipName": "  KAI LANI ", "latitude": 20.1, "longitude": -157.2},
            "Message": {}
        }"#;
        let vessel = parse_report(text).unwrap().unwrap();
        assert_eq!(vessel.name, "KAI LANI");
        assert_eq!(vessel.lat, 20.1);
        assert_eq!(vessel.lon, -157.2);
    }

    #[test]
    fn test_parse_skips_other_message_types() {
        let text = r#"{"MessageType": "ShipStaticData", "MetaData": {"ShipName": "X", "latitude": 1.0, "longitude": 2.0}}"#;
        assert!(parse_report(text).unwrap().is_none());
    }

    #[test]
    fn test_parse_skips_unnamed_and_malformed() {
        let unnamed = r#"{"MessageType": "PositionReport", "MetaData": {"latitude": 1.0, "longitude": 2.0}}"#;
        assert!(parse_report(unnamed).unwrap().is_none());
        assert!(parse_report("not json").unwrap().is_none());
    }

    #[test]
    fn test_error_payload_is_unavailable() {
        let err = parse_report(r#"{"error": "Api Key Is Not Valid"}"#).unwrap_err();
        assert!(matches!(err, FeedError::Unavailable(_)));
    }
}
