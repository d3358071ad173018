// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Composite scoring and the summary line.

use crate::config::ScoreWeighting;
use studydash_core::performance::{Bottleneck, ImpactLevel, NavigationMetrics, PerformanceScore};

/// `(good, poor)` bounds of each scored metric.
const FCP_BOUNDS: (f64, f64) = (1800.0, 3000.0);
const LCP_BOUNDS: (f64, f64) = (2500.0, 4000.0);
const FID_BOUNDS: (f64, f64) = (100.0, 300.0);
const TTI_BOUNDS: (f64, f64) = (3800.0, 7300.0);
const CLS_BOUNDS: (f64, f64) = (0.1, 0.25);

const LOADING_WEIGHT: f64 = 0.25;
const INTERACTIVITY_WEIGHT: f64 = 0.25;
const VISUAL_WEIGHT: f64 = 0.15;
/// Scale applied to the weighted blend under [`ScoreWeighting::Legacy`].
const LEGACY_SCALE: f64 = 4.0;

/// 100 at or below `good`, 0 at or above `poor`, linear in between.
/// Non-finite readings score 0.
pub fn decay(value: f64, (good, poor): (f64, f64)) -> f64 {
    if !value.is_finite() {
        0.0
    } else if value <= good {
        100.0
    } else if value >= poor {
        0.0
    } else {
        100.0 * (poor - value) / (poor - good)
    }
}

/// Scores a navigation snapshot.
pub fn compute(navigation: &NavigationMetrics, weighting: ScoreWeighting) -> PerformanceScore {
    let loading = (decay(navigation.first_contentful_paint, FCP_BOUNDS)
        + decay(navigation.largest_contentful_paint, LCP_BOUNDS))
        / 2.0;
    let interactivity = (decay(navigation.first_input_delay, FID_BOUNDS)
        + decay(navigation.time_to_interactive, TTI_BOUNDS))
        / 2.0;
    let visual_stability = decay(navigation.cumulative_layout_shift, CLS_BOUNDS);

    let blend = LOADING_WEIGHT * loading
        + INTERACTIVITY_WEIGHT * interactivity
        + VISUAL_WEIGHT * visual_stability;
    let overall = match weighting {
        ScoreWeighting::Legacy => blend * LEGACY_SCALE,
        ScoreWeighting::Normalized => blend / (LOADING_WEIGHT + INTERACTIVITY_WEIGHT + VISUAL_WEIGHT),
    };

    PerformanceScore {
        overall: overall.clamp(0.0, 100.0),
        loading,
        interactivity,
        visual_stability,
    }
}

/// One line describing the run, chosen by score band.
pub fn summarize(score: &PerformanceScore, bottlenecks: &[Bottleneck]) -> String {
    let count = |level: ImpactLevel| bottlenecks.iter().filter(|b| b.severity == level).count();
    let critical = count(ImpactLevel::Critical);
    let high = count(ImpactLevel::High);
    let overall = score.overall.round();

    if score.overall >= 90.0 {
        format!("Excellent performance (score {overall}/100). Keep monitoring for regressions.")
    } else if score.overall >= 70.0 {
        format!(
            "Good performance (score {overall}/100) with room to improve: {high} high-severity bottleneck(s)."
        )
    } else if score.overall >= 50.0 {
        format!(
            "Performance needs work (score {overall}/100): {critical} critical and {high} high-severity bottleneck(s)."
        )
    } else {
        format!(
            "Poor performance (score {overall}/100): {critical} critical and {high} high-severity bottleneck(s) need immediate attention."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_decay_is_linear_between_bounds() {
        assert_close(decay(1000.0, LCP_BOUNDS), 100.0);
        assert_close(decay(3250.0, LCP_BOUNDS), 50.0);
        assert_close(decay(9000.0, LCP_BOUNDS), 0.0);
    }

    #[test]
    fn test_non_finite_readings_score_zero() {
        assert_eq!(decay(f64::NAN, LCP_BOUNDS), 0.0);
        assert_eq!(decay(f64::NEG_INFINITY, LCP_BOUNDS), 0.0);

        let navigation = NavigationMetrics {
            largest_contentful_paint: f64::NAN,
            ..Default::default()
        };
        let score = compute(&navigation, ScoreWeighting::Legacy);
        assert!(score.overall.is_finite());
        assert!((0.0..=100.0).contains(&score.overall));
        assert_close(score.loading, 50.0);
        assert!(!summarize(&score, &[]).contains("NaN"));
    }

    #[test]
    fn test_perfect_snapshot() {
        let legacy = compute(&NavigationMetrics::default(), ScoreWeighting::Legacy);
        assert_close(legacy.loading, 100.0);
        assert_close(legacy.interactivity, 100.0);
        assert_close(legacy.visual_stability, 100.0);
        // (25 + 25 + 15) * 4 = 260, clamped.
        assert_close(legacy.overall, 100.0);

        let normalized = compute(&NavigationMetrics::default(), ScoreWeighting::Normalized);
        assert_close(normalized.overall, 100.0);
    }

    #[test]
    fn test_weightings_diverge_on_poor_snapshot() {
        let navigation = NavigationMetrics {
            first_contentful_paint: 3000.0,
            largest_contentful_paint: 4000.0,
            first_input_delay: 300.0,
            time_to_interactive: 7300.0,
            cumulative_layout_shift: 0.175,
            ..Default::default()
        };
        let legacy = compute(&navigation, ScoreWeighting::Legacy);
        let normalized = compute(&navigation, ScoreWeighting::Normalized);
        assert_close(legacy.visual_stability, 50.0);
        assert_close(legacy.overall, 0.15 * 50.0 * 4.0);
        assert_close(normalized.overall, 0.15 * 50.0 / 0.65);
    }

    #[test]
    fn test_summary_bands() {
        let at = |overall: f64| PerformanceScore {
            overall,
            ..Default::default()
        };
        assert!(summarize(&at(95.0), &[]).starts_with("Excellent"));
        assert!(summarize(&at(75.0), &[]).starts_with("Good"));
        assert!(summarize(&at(55.0), &[]).starts_with("Performance needs work"));
        assert!(summarize(&at(10.0), &[]).starts_with("Poor"));
    }
}
