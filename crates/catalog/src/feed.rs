use serde::Deserialize;

use crate::hotspot::{BiasInfo, BiasLabel, CoverageItem, Hotspot, HotspotDisplay, ProcessingStatus};
use crate::CatalogError;
use foundation::HotspotId;
use foundation::math::GeoPoint;

/// Wire shape of a hotspot in the JSON feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HotspotRecord {
    id: String,
    #[serde(default)]
    tag: String,
    #[serde(default)]
    headline: String,
    #[serde(default)]
    summary: String,
    lat: f64,
    lng: f64,
    #[serde(default)]
    display_location: Option<String>,
    intensity: f64,
    #[serde(default)]
    is_breaking: bool,
    #[serde(default)]
    source_count: u32,
    #[serde(default)]
    last_seen_at: String,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    status: StatusRecord,
    #[serde(default)]
    bias: Option<BiasRecord>,
    #[serde(default)]
    coverage: Vec<CoverageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoverageRecord {
    id: String,
    #[serde(default)]
    source_name: String,
    #[serde(default)]
    source_country: Option<String>,
    #[serde(default)]
    published_at: String,
    #[serde(default)]
    headline: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    status: StatusRecord,
    #[serde(default)]
    bias: Option<BiasRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct BiasRecord {
    label: BiasLabelRecord,
    score: f64,
    confidence: f64,
    #[serde(default)]
    rationale: Option<String>,
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
enum BiasLabelRecord {
    Left,
    Center,
    Right,
    NonPolitical,
}

impl From<BiasLabelRecord> for BiasLabel {
    fn from(value: BiasLabelRecord) -> Self {
        match value {
            BiasLabelRecord::Left => BiasLabel::Left,
            BiasLabelRecord::Center => BiasLabel::Center,
            BiasLabelRecord::Right => BiasLabel::Right,
            BiasLabelRecord::NonPolitical => BiasLabel::NonPolitical,
        }
    }
}

impl From<BiasRecord> for BiasInfo {
    fn from(value: BiasRecord) -> Self {
        BiasInfo {
            label: value.label.into(),
            score: value.score,
            confidence: value.confidence,
            rationale: value.rationale,
        }
    }
}

impl From<CoverageRecord> for CoverageItem {
    fn from(value: CoverageRecord) -> Self {
        CoverageItem {
            id: value.id,
            source_name: value.source_name,
            source_country: value.source_country,
            published_at: value.published_at,
            headline: value.headline,
            summary: value.summary,
            image_url: value.image_url,
            url: value.url,
            status: value.status.into(),
            bias: value.bias.map(BiasInfo::from),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum StatusRecord {
    Processing,
    #[default]
    Ready,
    Failed,
}

impl From<StatusRecord> for ProcessingStatus {
    fn from(value: StatusRecord) -> Self {
        match value {
            StatusRecord::Processing => ProcessingStatus::Processing,
            StatusRecord::Ready => ProcessingStatus::Ready,
            StatusRecord::Failed => ProcessingStatus::Failed,
        }
    }
}

/// The feed is either a bare array or `{ "hotspots": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedDocument {
    List(Vec<HotspotRecord>),
    Wrapped { hotspots: Vec<HotspotRecord> },
}

/// Decodes and validates a JSON feed document, preserving feed order.
pub fn decode_feed(json: &str) -> Result<Vec<Hotspot>, CatalogError> {
    let doc: FeedDocument =
        serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
    let records = match doc {
        FeedDocument::List(records) => records,
        FeedDocument::Wrapped { hotspots } => hotspots,
    };
    records.into_iter().map(into_hotspot).collect()
}

fn into_hotspot(record: HotspotRecord) -> Result<Hotspot, CatalogError> {
    let hotspot = Hotspot {
        id: HotspotId::new(record.id),
        location: GeoPoint::new(record.lat, record.lng),
        intensity: record.intensity,
        is_breaking: record.is_breaking,
        tag: record.tag,
        display: HotspotDisplay {
            headline: record.headline,
            summary: record.summary,
            display_location: record.display_location,
            source_count: record.source_count,
            last_seen_at: record.last_seen_at,
            image_url: record.image_url,
            status: record.status.into(),
            bias: record.bias.map(BiasInfo::from),
            coverage: record.coverage.into_iter().map(CoverageItem::from).collect(),
        },
    };
    validate_hotspot(&hotspot)?;
    Ok(hotspot)
}

pub fn validate_hotspot(hotspot: &Hotspot) -> Result<(), CatalogError> {
    let invalid = |reason: &str| CatalogError::InvalidHotspot {
        id: hotspot.id.to_string(),
        reason: reason.to_string(),
    };

    if hotspot.id.as_str().trim().is_empty() {
        return Err(invalid("empty id"));
    }
    if !hotspot.location.is_valid() {
        return Err(invalid("coordinate out of range"));
    }
    if !is_unit(hotspot.intensity) {
        return Err(invalid("intensity outside 0..=1"));
    }
    if let Some(bias) = &hotspot.display.bias {
        check_bias(bias).map_err(|reason| invalid(reason))?;
    }
    for item in &hotspot.display.coverage {
        if let Some(bias) = &item.bias {
            check_bias(bias).map_err(|reason| invalid(&format!("coverage {:?}: {reason}", item.id)))?;
        }
    }
    Ok(())
}

fn is_unit(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

fn check_bias(bias: &BiasInfo) -> Result<(), &'static str> {
    if !is_unit(bias.score) {
        return Err("bias score outside 0..=1");
    }
    if !is_unit(bias.confidence) {
        return Err("bias confidence outside 0..=1");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::decode_feed;
    use crate::CatalogError;
    use crate::hotspot::{BiasLabel, ProcessingStatus};
    use pretty_assertions::assert_eq;

    const FEED: &str = r#"[
        {
            "id": "1",
            "tag": "CRISIS",
            "headline": "Volcanic Eruption in Iceland",
            "summary": "A new fissure eruption has started.",
            "lat": 63.88,
            "lng": -22.43,
            "displayLocation": "Reykjanes, Iceland",
            "intensity": 0.95,
            "isBreaking": true,
            "sourceCount": 124,
            "lastSeenAt": "2026-01-01T12:00:00Z",
            "status": "ready"
        },
        {
            "id": "2",
            "tag": "TECH",
            "lat": 37.7749,
            "lng": -122.4194,
            "intensity": 0.85,
            "status": "processing"
        }
    ]"#;

    #[test]
    fn decodes_camel_case_feed_in_order() {
        let hotspots = decode_feed(FEED).unwrap();
        let ids: Vec<&str> = hotspots.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);

        let first = &hotspots[0];
        assert!(first.is_breaking);
        assert_eq!(first.tag, "CRISIS");
        assert_eq!(first.display.display_location.as_deref(), Some("Reykjanes, Iceland"));
        assert_eq!(first.display.source_count, 124);
        assert_eq!(hotspots[1].display.status, ProcessingStatus::Processing);
        assert!(!hotspots[1].is_breaking);
    }

    #[test]
    fn accepts_wrapped_document() {
        let json = r#"{ "hotspots": [ { "id": "a", "lat": 0.0, "lng": 0.0, "intensity": 0.1 } ] }"#;
        let hotspots = decode_feed(json).unwrap();
        assert_eq!(hotspots.len(), 1);
    }

    #[test]
    fn rejects_out_of_range_intensity() {
        let json = r#"[ { "id": "a", "lat": 0.0, "lng": 0.0, "intensity": 1.5 } ]"#;
        match decode_feed(json) {
            Err(CatalogError::InvalidHotspot { id, .. }) => assert_eq!(id, "a"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_coordinates_and_empty_ids() {
        let json = r#"[ { "id": "a", "lat": 91.0, "lng": 0.0, "intensity": 0.5 } ]"#;
        assert!(matches!(decode_feed(json), Err(CatalogError::InvalidHotspot { .. })));
        let json = r#"[ { "id": " ", "lat": 0.0, "lng": 0.0, "intensity": 0.5 } ]"#;
        assert!(matches!(decode_feed(json), Err(CatalogError::InvalidHotspot { .. })));
    }

    #[test]
    fn decodes_bias_and_coverage() {
        let json = r#"[ {
            "id": "7",
            "lat": 50.45,
            "lng": 30.52,
            "intensity": 0.88,
            "bias": { "label": "center", "score": 0.5, "confidence": 0.6 },
            "coverage": [
                {
                    "id": "7-0",
                    "sourceName": "Global News Network",
                    "sourceCountry": "UK",
                    "publishedAt": "2026-10-17T09:00:00Z",
                    "headline": "Border update",
                    "summary": "Movement reported.",
                    "url": "https://news.example.org/7-0",
                    "status": "ready",
                    "bias": { "label": "non_political", "score": 0.5, "confidence": 0.9, "rationale": "wire copy" }
                },
                { "id": "7-1", "sourceName": "Daily Observer", "status": "processing" }
            ]
        } ]"#;
        let hotspots = decode_feed(json).unwrap();
        let display = &hotspots[0].display;

        let bias = display.bias.as_ref().unwrap();
        assert_eq!((bias.label, bias.score, bias.confidence), (BiasLabel::Center, 0.5, 0.6));
        assert_eq!(display.coverage.len(), 2);

        let first = &display.coverage[0];
        assert_eq!(first.source_name, "Global News Network");
        assert_eq!(first.source_country.as_deref(), Some("UK"));
        assert_eq!(first.url.as_deref(), Some("https://news.example.org/7-0"));
        let first_bias = first.bias.as_ref().unwrap();
        assert_eq!(first_bias.label, BiasLabel::NonPolitical);
        assert_eq!(first_bias.rationale.as_deref(), Some("wire copy"));
        assert_eq!(display.coverage[1].status, ProcessingStatus::Processing);
        assert_eq!(display.coverage[1].bias, None);
    }

    #[test]
    fn missing_bias_and_coverage_default_to_empty() {
        let json = r#"[ { "id": "a", "lat": 0.0, "lng": 0.0, "intensity": 0.1 } ]"#;
        let hotspots = decode_feed(json).unwrap();
        assert_eq!(hotspots[0].display.bias, None);
        assert!(hotspots[0].display.coverage.is_empty());
    }

    #[test]
    fn rejects_out_of_range_bias() {
        let json = r#"[ { "id": "a", "lat": 0.0, "lng": 0.0, "intensity": 0.5,
            "bias": { "label": "left", "score": 1.2, "confidence": 0.5 } } ]"#;
        match decode_feed(json) {
            Err(CatalogError::InvalidHotspot { id, reason }) => {
                assert_eq!(id, "a");
                assert_eq!(reason, "bias score outside 0..=1");
            }
            other => panic!("unexpected: {other:?}"),
        }

        let json = r#"[ { "id": "b", "lat": 0.0, "lng": 0.0, "intensity": 0.5,
            "coverage": [ { "id": "b-0", "bias": { "label": "right", "score": 0.9, "confidence": -0.1 } } ] } ]"#;
        match decode_feed(json) {
            Err(CatalogError::InvalidHotspot { id, reason }) => {
                assert_eq!(id, "b");
                assert_eq!(reason, "coverage \"b-0\": bias confidence outside 0..=1");
            }
            other => panic!("unexpected: {other:?}"),
        }

        let json = r#"[ { "id": "c", "lat": 0.0, "lng": 0.0, "intensity": 0.5,
            "bias": { "label": "sideways", "score": 0.5, "confidence": 0.5 } } ]"#;
        assert!(matches!(decode_feed(json), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(decode_feed("{ nope"), Err(CatalogError::Parse(_))));
    }
}
