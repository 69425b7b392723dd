//! # Growth Scoring
//!
//! Progress percentage derivation for savings goals, feeding the stage
//! classifier.
//!
//! Fixed goals use plain target ratio, clamped for display. Infinite goals
//! have no target, so progress is scored from transaction cadence instead:
//! steady depositing grows the visualization, withdrawals set it back hard.

use crate::stage::{StageView, classify_stage};
use crate::types::{GoalTarget, HistoryEntry, SavingsGoal};

// =============================================================================
// SCORING CONSTANTS
// =============================================================================

/// Each withdrawal cancels this many deposit-equivalents.
pub const WITHDRAWAL_PENALTY: i64 = 10;

/// Deposit-equivalents needed for an infinite goal to reach 100%.
pub const SCORE_CEILING: i64 = 40;

// =============================================================================
// SCORING
// =============================================================================

/// Score an infinite goal's history into a progress percent in `[0, 100]`.
///
/// Deposits and withdrawals are counted by occurrence, not magnitude:
/// `raw = deposits - withdrawals * WITHDRAWAL_PENALTY`, clamped to
/// `[0, SCORE_CEILING]`, then scaled to percent. Zero-amount entries count
/// as neither. Empty history scores 0.
#[must_use]
pub fn score_infinite(history: &[HistoryEntry]) -> f64 {
    let deposits = history.iter().filter(|e| e.amount > 0.0).count() as i64;
    let withdrawals = history.iter().filter(|e| e.amount < 0.0).count() as i64;

    let raw = deposits - withdrawals.saturating_mul(WITHDRAWAL_PENALTY);
    let score = raw.clamp(0, SCORE_CEILING);

    (score as f64) / (SCORE_CEILING as f64) * 100.0
}

/// Progress percent of a fixed goal, clamped to `[0, 100]` for display.
///
/// A non-positive target yields 0 — the function is total.
#[must_use]
pub fn fixed_progress(saved: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (saved / target * 100.0).clamp(0.0, 100.0)
}

/// Progress percent of any goal, dispatching on its target shape.
#[must_use]
pub fn progress_percent(goal: &SavingsGoal) -> f64 {
    match goal.target {
        GoalTarget::Fixed { amount } => fixed_progress(goal.saved_amount, amount),
        GoalTarget::Infinite => score_infinite(&goal.history),
    }
}

/// Classify a goal's current evolution stage from its progress.
#[must_use]
pub fn goal_stage(goal: &SavingsGoal) -> StageView {
    classify_stage(progress_percent(goal), goal.is_completed)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Stage;
    use crate::types::VisualKind;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).expect("valid date")
    }

    fn entry(amount: f64) -> HistoryEntry {
        HistoryEntry {
            at: day(1),
            amount,
        }
    }

    #[test]
    fn empty_history_scores_zero() {
        assert_eq!(score_infinite(&[]), 0.0);
    }

    #[test]
    fn four_deposits_score_ten_percent() {
        let history = vec![entry(1.0); 4];
        assert_eq!(score_infinite(&history), 10.0);
    }

    #[test]
    fn withdrawal_penalty_dominates() {
        // 5 deposits then 1 withdrawal: raw = 5 - 10 = -5, clamped to 0.
        let mut history = vec![entry(1.0); 5];
        history.push(entry(-3.0));
        assert_eq!(score_infinite(&history), 0.0);
    }

    #[test]
    fn score_counts_occurrences_not_magnitude() {
        let small = vec![entry(0.01); 4];
        let large = vec![entry(1_000_000.0); 4];
        assert_eq!(score_infinite(&small), score_infinite(&large));
    }

    #[test]
    fn score_caps_at_hundred() {
        let history = vec![entry(1.0); 55];
        assert_eq!(score_infinite(&history), 100.0);
    }

    #[test]
    fn zero_amounts_count_as_neither() {
        let history = vec![entry(0.0), entry(1.0)];
        assert_eq!(score_infinite(&history), 2.5);
    }

    #[test]
    fn fixed_progress_clamps() {
        assert_eq!(fixed_progress(50.0, 200.0), 25.0);
        assert_eq!(fixed_progress(300.0, 200.0), 100.0);
        assert_eq!(fixed_progress(-10.0, 200.0), 0.0);
        assert_eq!(fixed_progress(10.0, 0.0), 0.0);
    }

    #[test]
    fn infinite_goal_stage_progression() {
        let mut goal = SavingsGoal::infinite("g", "G", VisualKind::Plant, None);
        assert_eq!(goal_stage(&goal).stage, Stage::Seed);

        for d in 1..=10 {
            goal.deposit(day(d), 5.0).expect("deposit");
        }
        // 10 deposits / 40 needed -> 25% -> Sprout.
        assert_eq!(goal_stage(&goal).stage, Stage::Sprout);
        assert!(!goal_stage(&goal).is_max);
    }

    #[test]
    fn completed_goal_is_max_regardless_of_ratio() {
        let mut goal = SavingsGoal::fixed("g", "G", 100.0, VisualKind::Plant, None);
        goal.deposit(day(1), 100.0).expect("deposit");
        goal.withdraw(day(2), 90.0).expect("withdraw");

        let view = goal_stage(&goal);
        assert_eq!(view.stage, Stage::Mature);
        assert!(view.is_max);
    }
}
