//! # Evolution Stages
//!
//! Maps a goal's progress percentage (and completion flag) to one of four
//! discrete visual stages.
//!
//! ## Stage Definitions
//!
//! | Stage | Name    | Progress Threshold | Notes |
//! |-------|---------|--------------------|-------|
//! | 1     | Seed    | 0%                 | |
//! | 2     | Sprout  | 25%                | |
//! | 3     | Sapling | 50%                | |
//! | 4     | Mature  | 75%                | Also the max band (>= 100% or completed) |
//!
//! Stage 4 is reachable both as "max" (progress >= 100 or completion) and
//! as the 75–99% band. The image asset is identical in both bands; callers
//! distinguish label/effects via [`StageView::is_max`].

use serde::{Deserialize, Serialize};

// =============================================================================
// STAGE THRESHOLDS
// =============================================================================

/// Minimum progress percent for stage 2 (Sprout).
pub const SPROUT_THRESHOLD: f64 = 25.0;

/// Minimum progress percent for stage 3 (Sapling).
pub const SAPLING_THRESHOLD: f64 = 50.0;

/// Minimum progress percent for stage 4 (Mature).
pub const MATURE_THRESHOLD: f64 = 75.0;

/// Progress percent at which a goal counts as maxed out.
pub const MAX_THRESHOLD: f64 = 100.0;

// =============================================================================
// STAGE ENUM
// =============================================================================

/// One of four discrete visual/progress tiers, earliest to most mature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Seed,
    Sprout,
    Sapling,
    Mature,
}

impl Stage {
    /// Get the stage name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Seed => "Seed",
            Stage::Sprout => "Sprout",
            Stage::Sapling => "Sapling",
            Stage::Mature => "Mature",
        }
    }

    /// Get the 1-based stage number.
    #[must_use]
    pub fn number(&self) -> u8 {
        match self {
            Stage::Seed => 1,
            Stage::Sprout => 2,
            Stage::Sapling => 3,
            Stage::Mature => 4,
        }
    }

    /// Index into a skin's 4-entry stage asset array.
    #[must_use]
    pub fn asset_index(&self) -> usize {
        (self.number() - 1) as usize
    }

    /// Minimum progress percent for this stage.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        match self {
            Stage::Seed => 0.0,
            Stage::Sprout => SPROUT_THRESHOLD,
            Stage::Sapling => SAPLING_THRESHOLD,
            Stage::Mature => MATURE_THRESHOLD,
        }
    }

    /// Get the next stage, if any.
    #[must_use]
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Seed => Some(Stage::Sprout),
            Stage::Sprout => Some(Stage::Sapling),
            Stage::Sapling => Some(Stage::Mature),
            Stage::Mature => None,
        }
    }

    /// Get the previous stage, if any.
    #[must_use]
    pub fn previous(&self) -> Option<Stage> {
        match self {
            Stage::Seed => None,
            Stage::Sprout => Some(Stage::Seed),
            Stage::Sapling => Some(Stage::Sprout),
            Stage::Mature => Some(Stage::Sapling),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stage {}: {}", self.number(), self.name())
    }
}

// =============================================================================
// STAGE VIEW
// =============================================================================

/// Classification result: the stage plus the max-band flag.
///
/// Stage 4 occurs in two bands (75–99% and >= 100%/completed); the two
/// share an asset but differ in label and effects, so the flag is kept
/// separate rather than folded into the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageView {
    pub stage: Stage,
    pub is_max: bool,
}

impl StageView {
    /// Label shown next to the visualization, e.g. `Mature (Max)`.
    #[must_use]
    pub fn display_label(&self) -> String {
        if self.is_max {
            format!("{} (Max)", self.stage.name())
        } else {
            self.stage.name().to_string()
        }
    }
}

// =============================================================================
// CLASSIFIER
// =============================================================================

/// Classify a progress percentage into a stage.
///
/// `progress_percent` is expected pre-clamped to `[0, 100]` by the caller;
/// values above 100 simply classify as max. Total — no error conditions.
#[must_use]
pub fn classify_stage(progress_percent: f64, is_completed: bool) -> StageView {
    let is_max = progress_percent >= MAX_THRESHOLD || is_completed;
    let stage = if is_max || progress_percent >= MATURE_THRESHOLD {
        Stage::Mature
    } else if progress_percent >= SAPLING_THRESHOLD {
        Stage::Sapling
    } else if progress_percent >= SPROUT_THRESHOLD {
        Stage::Sprout
    } else {
        Stage::Seed
    };
    StageView { stage, is_max }
}

// =============================================================================
// TESTS
// =============================================================================
