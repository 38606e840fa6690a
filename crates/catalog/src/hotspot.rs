use foundation::HotspotId;
use foundation::math::GeoPoint;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ProcessingStatus {
    Processing,
    #[default]
    Ready,
    Failed,
}

/// Political lean assigned by the summarizer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BiasLabel {
    Left,
    Center,
    Right,
    NonPolitical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BiasInfo {
    pub label: BiasLabel,
    /// `0` is left, `0.5` center, `1` right.
    pub score: f64,
    pub confidence: f64,
    pub rationale: Option<String>,
}

/// One source article inside a hotspot.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageItem {
    pub id: String,
    pub source_name: String,
    pub source_country: Option<String>,
    /// ISO-8601 timestamp as delivered by the feed.
    pub published_at: String,
    pub headline: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub url: Option<String>,
    pub status: ProcessingStatus,
    pub bias: Option<BiasInfo>,
}

/// Presentation fields carried through from the feed.
///
/// Nothing in ranking, navigation or placement reads these.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HotspotDisplay {
    pub headline: String,
    pub summary: String,
    pub display_location: Option<String>,
    pub source_count: u32,
    /// ISO-8601 timestamp as delivered by the feed.
    pub last_seen_at: String,
    pub image_url: Option<String>,
    pub status: ProcessingStatus,
    pub bias: Option<BiasInfo>,
    pub coverage: Vec<CoverageItem>,
}

/// One geographically clustered news story.
///
/// Catalog entries are immutable once ingested; a feed refresh replaces the
/// whole catalog rather than editing entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub id: HotspotId,
    pub location: GeoPoint,
    /// Continuous `0..=1` weight used for ranking and label priority.
    pub intensity: f64,
    pub is_breaking: bool,
    /// Category label such as `"CLIMATE"`.
    pub tag: String,
    pub display: HotspotDisplay,
}

impl Hotspot {
    pub fn new(id: impl Into<HotspotId>, lat_deg: f64, lng_deg: f64, intensity: f64) -> Self {
        Self {
            id: id.into(),
            location: GeoPoint::new(lat_deg, lng_deg),
            intensity,
            is_breaking: false,
            tag: String::new(),
            display: HotspotDisplay::default(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}
