//! Gamification rules: pure functions over already-computed inputs.

use serde::{Deserialize, Serialize};

use crate::types::{Badge, DoraMetric};

/// Normalized 0–100 radar-profile axes derived from raw DORA values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarProfile {
    pub speed: f64,
    pub quality: f64,
}

/// Badges whose threshold is at or below `score`.
///
/// The threshold table is monotonically increasing, so a higher score's
/// badge set is always a superset of a lower score's.
pub fn badges_for(score: i64) -> Vec<Badge> {
    Badge::all()
        .iter()
        .copied()
        .filter(|b| b.threshold() <= score)
        .collect()
}

/// Map raw DORA values onto 0–100 axes. Both clamps are mandatory: no axis
/// value may leave `[0, 100]` regardless of input.
pub fn normalize_profile(dora: &DoraMetric) -> RadarProfile {
    RadarProfile {
        speed: (dora.deployment_freq * 10.0).clamp(0.0, 100.0),
        quality: (100.0 - dora.change_failure_rate * 5.0).clamp(0.0, 100.0),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
