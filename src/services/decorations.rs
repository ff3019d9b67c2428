//! Randomized background blobs

use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Viewports narrower than this get the compact profile
pub const NARROW_VIEWPORT_PX: u32 = 700;

/// Keyframes name the page defines for the blobs
const ANIMATION_NAME: &str = "liquidMove";

/// Count and value ranges for one viewport class
#[derive(Debug, Clone, PartialEq)]
pub struct BlobProfile {
    pub count: usize,
    pub size_px: Range<f64>,
    pub opacity: f64,
    pub duration_s: Range<f64>,
    pub delay_s: Range<f64>,
}

impl BlobProfile {
    pub fn narrow() -> Self {
        Self {
            count: 10,
            size_px: 30.0..120.0,
            opacity: 0.4,
            duration_s: 7.0..17.0,
            delay_s: 0.0..4.0,
        }
    }

    pub fn wide() -> Self {
        Self {
            count: 12,
            size_px: 80.0..300.0,
            opacity: 0.5,
            duration_s: 7.0..17.0,
            delay_s: 0.0..4.0,
        }
    }

    pub fn for_viewport(width: u32) -> Self {
        if width < NARROW_VIEWPORT_PX {
            Self::narrow()
        } else {
            Self::wide()
        }
    }
}

/// One decorative element; positions are percentages of the viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blob {
    pub size_px: f64,
    pub left_pct: f64,
    pub top_pct: f64,
    pub opacity: f64,
    pub duration_s: f64,
    pub delay_s: f64,
}

impl Blob {
    /// CSS `animation` shorthand for this blob
    pub fn animation(&self) -> String {
        format!(
            "{} {}s infinite alternate ease-in-out {}s",
            ANIMATION_NAME, self.duration_s, self.delay_s
        )
    }
}

/// Generate the background blobs for a viewport width
pub fn seed_decorations<R: Rng>(viewport_width: u32, rng: &mut R) -> Vec<Blob> {
    let profile = BlobProfile::for_viewport(viewport_width);
    (0..profile.count)
        .map(|_| Blob {
            size_px: rng.random_range(profile.size_px.clone()),
            left_pct: rng.random_range(0.0..100.0),
            top_pct: rng.random_range(0.0..100.0),
            opacity: profile.opacity,
            duration_s: rng.random_range(profile.duration_s.clone()),
            delay_s: rng.random_range(profile.delay_s.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn assert_within(blobs: &[Blob], profile: &BlobProfile) {
        assert_eq!(blobs.len(), profile.count);
        for blob in blobs {
            assert!(profile.size_px.contains(&blob.size_px));
            assert!((0.0..100.0).contains(&blob.left_pct));
            assert!((0.0..100.0).contains(&blob.top_pct));
            assert!(profile.duration_s.contains(&blob.duration_s));
            assert!(profile.delay_s.contains(&blob.delay_s));
            assert_eq!(blob.opacity, profile.opacity);
        }
    }

    #[test]
    fn narrow_viewport_gets_ten_small_blobs() {
        let mut rng = StdRng::seed_from_u64(7);
        let blobs = seed_decorations(699, &mut rng);
        assert_within(&blobs, &BlobProfile::narrow());
    }

    #[test]
    fn wide_viewport_gets_twelve_blobs() {
        let mut rng = StdRng::seed_from_u64(7);
        let blobs = seed_decorations(700, &mut rng);
        assert_within(&blobs, &BlobProfile::wide());
    }

    #[test]
    fn animation_shorthand_names_keyframes() {
        let blob = Blob {
            size_px: 100.0,
            left_pct: 10.0,
            top_pct: 20.0,
            opacity: 0.5,
            duration_s: 8.5,
            delay_s: 1.25,
        };
        assert_eq!(
            blob.animation(),
            "liquidMove 8.5s infinite alternate ease-in-out 1.25s"
        );
    }
}
