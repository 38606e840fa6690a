use catalog::{Catalog, Hotspot};
use foundation::HotspotId;
use foundation::math::{GeoPoint, clamp01, great_circle_km};
use tracing::debug;

/// Tuning for the hotspot score.
///
/// `score = intensity + breaking_boost - distance_penalty`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RankingConfig {
    /// Intensity strictly above this earns `breaking_boost`.
    pub breaking_threshold: f64,
    pub breaking_boost: f64,
    /// Fraction of a hotspot's own intensity lost at saturation distance.
    ///
    /// Must stay within `0..=1` for the score to be non-decreasing in
    /// intensity.
    pub distance_penalty_strength: f64,
    /// Distance at which the penalty stops growing.
    pub max_distance_km: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            breaking_threshold: 0.9,
            breaking_boost: 0.25,
            distance_penalty_strength: 0.5,
            max_distance_km: 10_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredHotspot {
    pub id: HotspotId,
    pub score: f64,
}

pub fn breaking_boost(intensity: f64, config: &RankingConfig) -> f64 {
    if intensity > config.breaking_threshold {
        config.breaking_boost
    } else {
        0.0
    }
}

/// Proximity penalty; zero without a user location.
///
/// Scales with the hotspot's own intensity and saturates at
/// `max_distance_km`.
pub fn distance_penalty(hotspot: &Hotspot, user: Option<GeoPoint>, config: &RankingConfig) -> f64 {
    let Some(user) = user else {
        return 0.0;
    };
    if config.max_distance_km <= 0.0 {
        return hotspot.intensity * config.distance_penalty_strength;
    }
    let km = great_circle_km(user, hotspot.location);
    hotspot.intensity * config.distance_penalty_strength * clamp01(km / config.max_distance_km)
}

pub fn score(hotspot: &Hotspot, user: Option<GeoPoint>, config: &RankingConfig) -> f64 {
    hotspot.intensity + breaking_boost(hotspot.intensity, config)
        - distance_penalty(hotspot, user, config)
}

/// Scores every hotspot and orders them by descending score.
///
/// The sort is stable, so equal scores keep catalog order. There is no
/// secondary key.
pub fn rank_scored(
    catalog: &Catalog,
    user: Option<GeoPoint>,
    config: &RankingConfig,
) -> Vec<ScoredHotspot> {
    let mut scored: Vec<ScoredHotspot> = catalog
        .iter()
        .map(|h| ScoredHotspot {
            id: h.id.clone(),
            score: score(h, user, config),
        })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

pub fn rank(catalog: &Catalog, user: Option<GeoPoint>, config: &RankingConfig) -> Vec<HotspotId> {
    let ranked: Vec<HotspotId> = rank_scored(catalog, user, config)
        .into_iter()
        .map(|s| s.id)
        .collect();
    debug!(
        generation = catalog.generation(),
        count = ranked.len(),
        with_location = user.is_some(),
        "ranked hotspots"
    );
    ranked
}

#[cfg(test)]
mod tests {
    use super::{RankingConfig, distance_penalty, rank, rank_scored, score};
    use catalog::{Catalog, Hotspot};
    use foundation::HotspotId;
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;

    fn ids(ranked: &[HotspotId]) -> Vec<&str> {
        ranked.iter().map(|id| id.as_str()).collect()
    }

    fn catalog(hotspots: Vec<Hotspot>) -> Catalog {
        Catalog::new(hotspots).unwrap()
    }

    #[test]
    fn orders_by_intensity_without_location() {
        let c = catalog(vec![
            Hotspot::new("mid", 37.77, -122.42, 0.85),
            Hotspot::new("low", 51.5, -0.12, 0.5),
            Hotspot::new("top", 63.88, -22.43, 0.95),
        ]);
        let ranked = rank(&c, None, &RankingConfig::default());
        assert_eq!(ids(&ranked), vec!["top", "mid", "low"]);
    }

    #[test]
    fn breaking_boost_applies_above_threshold_only() {
        let cfg = RankingConfig::default();
        let hot = Hotspot::new("a", 0.0, 0.0, 0.95);
        let edge = Hotspot::new("b", 0.0, 0.0, 0.9);
        assert!((score(&hot, None, &cfg) - 1.20).abs() < 1e-12);
        assert!((score(&edge, None, &cfg) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn ranking_is_deterministic() {
        let c = catalog(vec![
            Hotspot::new("a", 10.0, 10.0, 0.3),
            Hotspot::new("b", -10.0, 40.0, 0.7),
            Hotspot::new("c", 45.0, -70.0, 0.7),
            Hotspot::new("d", -30.0, 150.0, 0.1),
        ]);
        let user = Some(GeoPoint::new(40.0, -74.0));
        let cfg = RankingConfig::default();
        assert_eq!(rank(&c, user, &cfg), rank(&c, user, &cfg));
        assert_eq!(rank(&c, None, &cfg), rank(&c, None, &cfg));
    }

    #[test]
    fn ties_keep_catalog_order() {
        let c = catalog(vec![
            Hotspot::new("first", 0.0, 0.0, 0.5),
            Hotspot::new("second", 0.0, 0.0, 0.5),
            Hotspot::new("third", 0.0, 0.0, 0.5),
        ]);
        let ranked = rank(&c, None, &RankingConfig::default());
        assert_eq!(ids(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn distance_penalty_saturates_beyond_max_distance() {
        let cfg = RankingConfig {
            max_distance_km: 1_000.0,
            ..RankingConfig::default()
        };
        let user = Some(GeoPoint::new(0.0, 0.0));
        let saturated = 0.8 * cfg.distance_penalty_strength;
        for lng in [20.0, 60.0, 120.0, 179.0] {
            let h = Hotspot::new("far", 0.0, lng, 0.8);
            let p = distance_penalty(&h, user, &cfg);
            assert!((p - saturated).abs() < 1e-12, "lng {lng}: {p}");
        }
    }

    #[test]
    fn distance_penalty_grows_with_distance_inside_bound() {
        let cfg = RankingConfig::default();
        let user = Some(GeoPoint::new(0.0, 0.0));
        let near = distance_penalty(&Hotspot::new("n", 0.0, 5.0, 0.6), user, &cfg);
        let far = distance_penalty(&Hotspot::new("f", 0.0, 50.0, 0.6), user, &cfg);
        assert!(near > 0.0);
        assert!(far > near);
        assert_eq!(distance_penalty(&Hotspot::new("x", 0.0, 5.0, 0.6), None, &cfg), 0.0);
    }

    #[test]
    fn nearby_story_can_outrank_a_stronger_distant_one() {
        let c = catalog(vec![
            Hotspot::new("distant", -33.86, 151.21, 0.8),
            Hotspot::new("local", 40.73, -73.99, 0.6),
        ]);
        let user = Some(GeoPoint::new(40.71, -74.0));
        let ranked = rank(&c, user, &RankingConfig::default());
        assert_eq!(ids(&ranked), vec!["local", "distant"]);
    }

    #[test]
    fn raising_intensity_never_lowers_rank_position() {
        let user = Some(GeoPoint::new(48.85, 2.35));
        let cfg = RankingConfig::default();
        let others = vec![
            Hotspot::new("a", 40.0, -74.0, 0.7),
            Hotspot::new("b", 35.7, 139.7, 0.92),
            Hotspot::new("c", 51.5, -0.1, 0.4),
            Hotspot::new("d", -23.5, -46.6, 0.55),
        ];

        let mut last_pos = usize::MAX;
        for step in 0..=20 {
            let intensity = step as f64 / 20.0;
            let mut hotspots = others.clone();
            hotspots.insert(2, Hotspot::new("candidate", -1.3, 36.8, intensity));
            let scored = rank_scored(&catalog(hotspots), user, &cfg);
            let pos = scored
                .iter()
                .position(|s| s.id.as_str() == "candidate")
                .unwrap();
            assert!(pos <= last_pos, "intensity {intensity}: {pos} > {last_pos}");
            last_pos = pos;
        }
    }

    #[test]
    fn empty_catalog_ranks_to_empty() {
        assert!(rank(&Catalog::empty(), None, &RankingConfig::default()).is_empty());
    }
}
