pub mod feed;
pub mod hotspot;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use foundation::HotspotId;

pub use feed::{decode_feed, validate_hotspot};
pub use hotspot::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Parse(String),
    InvalidHotspot { id: String, reason: String },
    DuplicateId(String),
    Io(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Parse(msg) => write!(f, "hotspot feed is malformed: {msg}"),
            CatalogError::InvalidHotspot { id, reason } => {
                write!(f, "hotspot {id:?} rejected: {reason}")
            }
            CatalogError::DuplicateId(id) => write!(f, "duplicate hotspot id {id:?}"),
            CatalogError::Io(msg) => write!(f, "hotspot feed unavailable: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Read-only hotspot catalog.
///
/// Iteration order is feed order; ranking uses it as the tie-break, so it is
/// never re-sorted. A feed refresh builds a new `Catalog` with the next
/// generation number instead of mutating this one.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Catalog {
    generation: u64,
    hotspots: Vec<Hotspot>,
    by_id: HashMap<HotspotId, usize>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(hotspots: Vec<Hotspot>) -> Result<Self, CatalogError> {
        Self::with_generation(0, hotspots)
    }

    pub fn with_generation(generation: u64, hotspots: Vec<Hotspot>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(hotspots.len());
        for (idx, hotspot) in hotspots.iter().enumerate() {
            validate_hotspot(hotspot)?;
            if by_id.insert(hotspot.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateId(hotspot.id.to_string()));
            }
        }
        Ok(Self {
            generation,
            hotspots,
            by_id,
        })
    }

    /// Builds the successor catalog for a feed refresh.
    pub fn refreshed(&self, hotspots: Vec<Hotspot>) -> Result<Self, CatalogError> {
        Self::with_generation(self.generation + 1, hotspots)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.hotspots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotspots.is_empty()
    }

    pub fn get(&self, id: &HotspotId) -> Option<&Hotspot> {
        self.by_id.get(id).map(|&idx| &self.hotspots[idx])
    }

    pub fn contains(&self, id: &HotspotId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hotspot> + '_ {
        self.hotspots.iter()
    }
}

/// Upstream feed the catalog is refreshed from.
pub trait CatalogSource {
    fn fetch(&self) -> Result<Vec<Hotspot>, CatalogError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    hotspots: Vec<Hotspot>,
}

impl InMemorySource {
    pub fn new(hotspots: Vec<Hotspot>) -> Self {
        Self { hotspots }
    }
}

impl CatalogSource for InMemorySource {
    fn fetch(&self) -> Result<Vec<Hotspot>, CatalogError> {
        Ok(self.hotspots.clone())
    }
}

/// JSON feed document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for JsonFileSource {
    fn fetch(&self) -> Result<Vec<Hotspot>, CatalogError> {
        let json = std::fs::read_to_string(&self.path)
            .map_err(|e| CatalogError::Io(format!("{}: {e}", self.path.display())))?;
        decode_feed(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogError, CatalogSource, Hotspot, InMemorySource, JsonFileSource};
    use foundation::HotspotId;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Hotspot> {
        vec![
            Hotspot::new("b", 10.0, 10.0, 0.4),
            Hotspot::new("a", 20.0, 20.0, 0.9),
        ]
    }

    #[test]
    fn preserves_feed_order_and_indexes_ids() {
        let catalog = Catalog::new(sample()).unwrap();
        let ids: Vec<&str> = catalog.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(catalog.get(&HotspotId::from("a")).map(|h| h.intensity), Some(0.9));
        assert!(!catalog.contains(&HotspotId::from("zzz")));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut hotspots = sample();
        hotspots.push(Hotspot::new("a", 0.0, 0.0, 0.1));
        assert_eq!(
            Catalog::new(hotspots),
            Err(CatalogError::DuplicateId("a".to_string()))
        );
    }

    #[test]
    fn refresh_bumps_generation() {
        let catalog = Catalog::new(sample()).unwrap();
        let next = catalog.refreshed(vec![Hotspot::new("c", 0.0, 0.0, 0.2)]).unwrap();
        assert_eq!(catalog.generation(), 0);
        assert_eq!(next.generation(), 1);
        assert_eq!(next.len(), 1);
        // The previous snapshot is untouched.
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn in_memory_source_hands_out_a_fresh_copy_each_fetch() {
        let source = InMemorySource::new(sample());
        let first = source.fetch().unwrap();
        assert_eq!(first, sample());
        assert_eq!(source.fetch().unwrap(), first);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let source = JsonFileSource::new("/definitely/not/here.json");
        assert!(matches!(source.fetch(), Err(CatalogError::Io(_))));
    }
}
