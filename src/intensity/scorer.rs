use serde::{Deserialize, Serialize};

use super::reference::ReferenceScale;
use crate::audio::features::DescriptorSet;

/// Weights applied to the normalized descriptors. They sum to exactly 1.0.
pub const WEIGHTS: DescriptorSet = DescriptorSet {
    energy: 0.30,
    spectral_centroid: 0.25,
    zero_crossing_rate: 0.20,
    dynamic_range: 0.15,
    tempo: 0.10,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizationMode {
    /// value / reference
    Linear,
    /// ln(1 + value) / ln(1 + reference)
    #[default]
    LogScaled,
}

/// Divide each descriptor by its reference. A zero divisor yields 0.
pub fn normalize(
    descriptors: &DescriptorSet,
    reference: &ReferenceScale,
    mode: NormalizationMode,
) -> DescriptorSet {
    descriptors.zip_with(reference.descriptors(), |value, divisor| {
        if divisor == 0.0 {
            return 0.0;
        }
        match mode {
            NormalizationMode::Linear => value / divisor,
            NormalizationMode::LogScaled => {
                let scaled = divisor.ln_1p();
                if scaled == 0.0 {
                    0.0
                } else {
                    value.ln_1p() / scaled
                }
            }
        }
    })
}

/// Weighted sum of normalized descriptors, scaled to 0-100. Not clamped.
pub fn combine(normalized: &DescriptorSet) -> f64 {
    let weighted: f64 = normalized
        .iter()
        .map(|(descriptor, value)| value * WEIGHTS.get(descriptor))
        .sum();
    weighted * 100.0
}

/// Normalize then combine; returns the normalized set alongside the score.
pub fn score(
    descriptors: &DescriptorSet,
    reference: &ReferenceScale,
    mode: NormalizationMode,
) -> (DescriptorSet, f64) {
    let normalized = normalize(descriptors, reference, mode);
    (normalized, combine(&normalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DescriptorSet {
        DescriptorSet {
            energy: 0.2,
            spectral_centroid: 1800.0,
            zero_crossing_rate: 0.07,
            dynamic_range: 1.4,
            tempo: 126.0,
        }
    }

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = WEIGHTS.iter().map(|(_, w)| w).sum();
        assert_eq!(total, 1.0);
    }

    #[test]
    fn all_ones_scores_one_hundred() {
        assert_eq!(combine(&DescriptorSet::ONES), 100.0);
    }

    #[test]
    fn zero_reference_normalizes_to_zero() {
        let reference = ReferenceScale(DescriptorSet::ZERO);
        for mode in [NormalizationMode::Linear, NormalizationMode::LogScaled] {
            let normalized = normalize(&sample(), &reference, mode);
            assert_eq!(normalized, DescriptorSet::ZERO);
            assert_eq!(combine(&normalized), 0.0);
        }
    }

    #[test]
    fn partial_zero_reference() {
        let reference = ReferenceScale(DescriptorSet {
            tempo: 0.0,
            ..sample()
        });
        let (normalized, score) = score(&sample(), &reference, NormalizationMode::Linear);
        assert_eq!(normalized.tempo, 0.0);
        assert_eq!(normalized.energy, 1.0);
        assert!((score - 90.0).abs() < 1e-9, "score={}", score);
    }

    #[test]
    fn section_equal_to_reference_scores_one_hundred() {
        let reference = ReferenceScale(sample());
        for mode in [NormalizationMode::Linear, NormalizationMode::LogScaled] {
            let (normalized, score) = score(&sample(), &reference, mode);
            assert_eq!(normalized, DescriptorSet::ONES);
            assert_eq!(score, 100.0);
        }
    }

    #[test]
    fn linear_is_plain_ratio() {
        let reference = ReferenceScale(sample().map(|v| v * 2.0));
        let normalized = normalize(&sample(), &reference, NormalizationMode::Linear);
        for (_, v) in normalized.iter() {
            assert!((v - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn log_scaled_compresses_large_values() {
        let reference = ReferenceScale(DescriptorSet {
            tempo: 200.0,
            ..sample()
        });
        let linear = normalize(&sample(), &reference, NormalizationMode::Linear);
        let log = normalize(&sample(), &reference, NormalizationMode::LogScaled);
        assert!((log.tempo - 127f64.ln() / 201f64.ln()).abs() < 1e-12);
        assert!(log.tempo > linear.tempo);
    }

    #[test]
    fn scores_above_reference_are_not_clamped() {
        let reference = ReferenceScale(sample().map(|v| v / 2.0));
        let (_, score) = score(&sample(), &reference, NormalizationMode::Linear);
        assert!(score > 100.0);
    }
}
