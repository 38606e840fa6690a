use std::fmt;

/// Stable identifier of a hotspot in the catalog feed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HotspotId(String);

impl HotspotId {
    pub fn new(id: impl Into<String>) -> Self {
        HotspotId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HotspotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HotspotId {
    fn from(value: &str) -> Self {
        HotspotId::new(value)
    }
}

impl From<String> for HotspotId {
    fn from(value: String) -> Self {
        HotspotId(value)
    }
}
