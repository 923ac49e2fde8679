//! # Tier Progress
//!
//! Maps a raw metric (merged PRs, stars) onto the Bronze/Silver/Gold ladder of
//! a numeric badge.
//!
//! Progress is always reported against the *next* threshold, not the span of
//! the current tier, so a Silver holder far from Gold shows a small value.

use crate::badge::Tier;
use crate::lookup::ProfileStats;
use crate::BadgeError;
use serde::Serialize;

// =============================================================================
// THRESHOLDS
// =============================================================================

/// Ascending tier thresholds. Always `0 < bronze < silver < gold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    bronze: u64,
    silver: u64,
    gold: u64,
}

impl Thresholds {
    /// Validate and build a threshold table.
    pub fn new(bronze: u64, silver: u64, gold: u64) -> crate::Result<Self> {
        if bronze == 0 || bronze >= silver || silver >= gold {
            return Err(BadgeError::InvalidThresholds {
                bronze,
                silver,
                gold,
            });
        }
        Ok(Self {
            bronze,
            silver,
            gold,
        })
    }
}

// =============================================================================
// TIER PROGRESS
// =============================================================================

/// Where a metric sits on a threshold ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierProgress {
    /// One of `None`, `Bronze`, `Silver`, `Gold`.
    pub tier: Tier,
    /// Threshold of the next tier; `None` once Gold is reached.
    pub next_threshold: Option<u64>,
    /// `100 * value / next_threshold`, or 100 at Gold.
    pub progress_percent: f64,
}

impl TierProgress {
    /// Progress clamped to `[0, 100]` for rendering.
    #[must_use]
    pub fn display_percent(&self) -> f64 {
        self.progress_percent.clamp(0.0, 100.0)
    }
}

/// Compute the tier reached by `value`.
///
/// Checked from the top down; the first satisfied threshold wins.
#[must_use]
pub fn tier_of(value: u64, thresholds: &Thresholds) -> TierProgress {
    let (tier, next_threshold) = if value >= thresholds.gold {
        (Tier::Gold, None)
    } else if value >= thresholds.silver {
        (Tier::Silver, Some(thresholds.gold))
    } else if value >= thresholds.bronze {
        (Tier::Bronze, Some(thresholds.silver))
    } else {
        (Tier::None, Some(thresholds.bronze))
    };

    let progress_percent = next_threshold.map_or(100.0, |next| percent_of(value, next));

    TierProgress {
        tier,
        next_threshold,
        progress_percent,
    }
}

#[allow(clippy::float_arithmetic)]
fn percent_of(value: u64, threshold: u64) -> f64 {
    100.0 * value as f64 / threshold as f64
}

// =============================================================================
// TRACKS
// =============================================================================

/// A numeric badge whose tier can be estimated from public profile data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Track {
    pub badge_id: &'static str,
    pub badge_name: &'static str,
    pub metric: &'static str,
    pub thresholds: Thresholds,
}

impl Track {
    #[must_use]
    pub fn progress(&self, value: u64) -> TierProgress {
        tier_of(value, &self.thresholds)
    }
}

/// Pull Shark: merged pull requests.
pub const PULL_SHARK: Track = Track {
    badge_id: "pull-shark",
    badge_name: "Pull Shark",
    metric: "Merged PRs",
    thresholds: Thresholds {
        bronze: 2,
        silver: 16,
        gold: 1024,
    },
};

/// Starstruck: stars on the user's most-starred repository.
pub const STARSTRUCK: Track = Track {
    badge_id: "starstruck",
    badge_name: "Starstruck",
    metric: "Max Stars",
    thresholds: Thresholds {
        bronze: 16,
        silver: 128,
        gold: 512,
    },
};

/// A track evaluated against one metric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BadgeProgress {
    pub track: Track,
    pub value: u64,
    pub progress: TierProgress,
}

impl BadgeProgress {
    #[must_use]
    pub fn evaluate(track: Track, value: u64) -> Self {
        Self {
            track,
            value,
            progress: track.progress(value),
        }
    }
}

/// Both built-in tracks evaluated against a profile's stats.
#[must_use]
pub fn progress_for(stats: &ProfileStats) -> [BadgeProgress; 2] {
    [
        BadgeProgress::evaluate(PULL_SHARK, stats.merged_prs),
        BadgeProgress::evaluate(STARSTRUCK, stats.max_stars),
    ]
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn shark() -> Thresholds {
        PULL_SHARK.thresholds
    }

    #[test]
    fn zero_is_none_toward_bronze() {
        let p = tier_of(0, &shark());
        assert_eq!(p.tier, Tier::None);
        assert_eq!(p.next_threshold, Some(2));
        assert_eq!(p.progress_percent, 0.0);
    }

    #[test]
    fn gold_is_terminal() {
        let p = tier_of(1024, &shark());
        assert_eq!(p.tier, Tier::Gold);
        assert_eq!(p.next_threshold, None);
        assert_eq!(p.progress_percent, 100.0);

        let beyond = tier_of(50_000, &shark());
        assert_eq!(beyond.tier, Tier::Gold);
        assert_eq!(beyond.progress_percent, 100.0);
    }

    #[test]
    fn silver_progress_is_measured_against_gold() {
        let p = tier_of(16, &shark());
        assert_eq!(p.tier, Tier::Silver);
        assert_eq!(p.next_threshold, Some(1024));
        assert_eq!(p.progress_percent, 1.5625);
    }

    #[test]
    fn bronze_progress_is_measured_against_silver() {
        let p = tier_of(4, &shark());
        assert_eq!(p.tier, Tier::Bronze);
        assert_eq!(p.next_threshold, Some(16));
        assert_eq!(p.progress_percent, 25.0);
    }

    #[test]
    fn starstruck_track_uses_its_own_ladder() {
        let p = STARSTRUCK.progress(128);
        assert_eq!(p.tier, Tier::Silver);
        assert_eq!(p.next_threshold, Some(512));
        assert_eq!(p.progress_percent, 25.0);
    }

    #[test]
    fn thresholds_must_be_strictly_ascending_and_positive() {
        assert!(Thresholds::new(0, 1, 2).is_err());
        assert!(Thresholds::new(2, 2, 3).is_err());
        assert!(Thresholds::new(1, 3, 3).is_err());
        assert!(Thresholds::new(5, 3, 9).is_err());
        assert_eq!(Thresholds::new(2, 16, 1024).ok(), Some(shark()));
    }

    #[test]
    fn display_percent_is_clamped() {
        let odd = TierProgress {
            tier: Tier::Silver,
            next_threshold: Some(10),
            progress_percent: 140.0,
        };
        assert_eq!(odd.display_percent(), 100.0);
    }

    #[test]
    fn badge_progress_carries_track_and_value() {
        let bp = BadgeProgress::evaluate(STARSTRUCK, 3);
        assert_eq!(bp.track.badge_id, "starstruck");
        assert_eq!(bp.value, 3);
        assert_eq!(bp.progress.tier, Tier::None);
    }

    #[test]
    fn progress_for_reports_pull_shark_then_starstruck() {
        let stats = ProfileStats {
            merged_prs: 2,
            max_stars: 600,
        };
        let [shark, star] = progress_for(&stats);
        assert_eq!(shark.track.badge_id, "pull-shark");
        assert_eq!(shark.progress.tier, Tier::Bronze);
        assert_eq!(star.track.badge_id, "starstruck");
        assert_eq!(star.progress.tier, Tier::Gold);
    }

    fn ladder() -> impl Strategy<Value = Thresholds> {
        (1u64..1_000, 1u64..1_000, 1u64..1_000).prop_map(|(a, b, c)| Thresholds {
            bronze: a,
            silver: a + b,
            gold: a + b + c,
        })
    }

    proptest! {
        #[test]
        fn prop_tier_is_monotonic(t in ladder(), v in 0u64..5_000, step in 0u64..5_000) {
            let low = tier_of(v, &t);
            let high = tier_of(v + step, &t);
            prop_assert!(low.tier.rank() <= high.tier.rank());
            prop_assert!(matches!(low.tier, Tier::None | Tier::Bronze | Tier::Silver | Tier::Gold));
        }

        #[test]
        fn prop_progress_stays_within_bounds(t in ladder(), v in 0u64..5_000) {
            let p = tier_of(v, &t);
            prop_assert!((0.0..=100.0).contains(&p.progress_percent));
        }
    }
}
