use serde::{Deserialize, Serialize};

use crate::audio::descriptors::DescriptorProvider;
use crate::audio::features::DescriptorSet;

/// How the per-section divisors are chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceStrategy {
    /// Descriptors of the whole track, computed once.
    #[default]
    Track,
    /// Element-wise maximum over all section descriptors.
    SectionPeak,
    /// Each section is its own reference (every non-zero descriptor normalizes to 1).
    Legacy,
}

/// Divisors used to normalize section descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReferenceScale(pub DescriptorSet);

impl ReferenceScale {
    pub fn descriptors(&self) -> &DescriptorSet {
        &self.0
    }
}

/// Describe the entire track in one pass.
pub fn build_reference<P: DescriptorProvider + ?Sized>(
    samples: &[f32],
    sample_rate: u32,
    provider: &P,
) -> ReferenceScale {
    let reference = provider.describe(samples, sample_rate);
    log::info!(
        "Track reference: energy={:.4}, centroid={:.1}Hz, zcr={:.4}, range={:.4}, tempo={:.1} BPM",
        reference.energy,
        reference.spectral_centroid,
        reference.zero_crossing_rate,
        reference.dynamic_range,
        reference.tempo
    );
    ReferenceScale(reference)
}

/// Element-wise maximum of the section descriptors; zero when there are none.
pub fn peak_reference(sections: &[DescriptorSet]) -> ReferenceScale {
    let peak = sections
        .iter()
        .fold(DescriptorSet::ZERO, |acc, d| acc.zip_with(d, f64::max));
    ReferenceScale(peak)
}

/// Each descriptor divided by the max over a one-element collection of itself.
pub fn legacy_reference(section: &DescriptorSet) -> ReferenceScale {
    ReferenceScale(section.map(|v| [v].into_iter().fold(f64::NEG_INFINITY, f64::max)))
}
