use rayon::prelude::*;
use serde::Serialize;

use super::reference::{self, ReferenceScale, ReferenceStrategy};
use super::scorer::{self, NormalizationMode};
use super::sections::{self, Section};
use crate::audio::descriptors::DescriptorProvider;
use crate::audio::features::DescriptorSet;
use crate::track::Track;

pub const DEFAULT_SECTIONS: usize = 10;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IntensityOptions {
    pub section_count: usize,
    pub mode: NormalizationMode,
    pub reference: ReferenceStrategy,
    /// Describe sections on the rayon pool instead of one by one.
    pub parallel: bool,
}

impl Default for IntensityOptions {
    fn default() -> Self {
        Self {
            section_count: DEFAULT_SECTIONS,
            mode: NormalizationMode::default(),
            reference: ReferenceStrategy::default(),
            parallel: true,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SectionReport {
    pub section: Section,
    pub descriptors: DescriptorSet,
    pub normalized: DescriptorSet,
    pub score: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct IntensityReport {
    pub score: f64,
    pub mode: NormalizationMode,
    pub strategy: ReferenceStrategy,
    /// Shared divisors; absent for the legacy strategy, where every section
    /// is its own reference.
    pub reference: Option<ReferenceScale>,
    pub sections: Vec<SectionReport>,
}

/// Score a decoded track.
pub fn compute_intensity<P: DescriptorProvider + ?Sized>(
    track: &Track,
    options: &IntensityOptions,
    provider: &P,
) -> IntensityReport {
    compute_intensity_from_samples(&track.audio.samples, track.audio.sample_rate, options, provider)
}

/// Section, describe, normalize and average.
///
/// Every step is deterministic; the final mean is summed in section order
/// whether or not sections were described in parallel.
pub fn compute_intensity_from_samples<P: DescriptorProvider + ?Sized>(
    samples: &[f32],
    sample_rate: u32,
    options: &IntensityOptions,
    provider: &P,
) -> IntensityReport {
    let track_reference = match options.reference {
        ReferenceStrategy::Track => Some(reference::build_reference(samples, sample_rate, provider)),
        _ => None,
    };

    let sections = sections::partition(samples.len(), options.section_count);
    log::info!(
        "Scoring {} sections of {} samples ({:?}, {:?} reference)",
        sections.len(),
        sections.first().map_or(0, Section::len),
        options.mode,
        options.reference
    );

    if sections.iter().all(Section::is_empty) && !samples.is_empty() {
        log::warn!(
            "Track has {} samples, fewer than {} sections; every section is empty",
            samples.len(),
            sections.len()
        );
    }

    let describe = |section: &Section| provider.describe(&samples[section.range()], sample_rate);
    let descriptors: Vec<DescriptorSet> = if options.parallel {
        sections.par_iter().map(describe).collect()
    } else {
        sections.iter().map(describe).collect()
    };

    let shared_reference = match options.reference {
        ReferenceStrategy::Track => track_reference,
        ReferenceStrategy::SectionPeak => Some(reference::peak_reference(&descriptors)),
        ReferenceStrategy::Legacy => None,
    };

    let reports: Vec<SectionReport> = sections
        .iter()
        .zip(descriptors)
        .map(|(section, descriptors)| {
            let reference = shared_reference.unwrap_or_else(|| reference::legacy_reference(&descriptors));
            let (normalized, score) = scorer::score(&descriptors, &reference, options.mode);
            log::debug!(
                "Section [{}, {}): score={:.2}",
                section.start,
                section.end,
                score
            );
            SectionReport {
                section: *section,
                descriptors,
                normalized,
                score,
            }
        })
        .collect();

    // partition() never returns an empty list
    let score = reports.iter().map(|r| r.score).sum::<f64>() / reports.len() as f64;
    log::info!("Intensity score: {:.2}", score);

    IntensityReport {
        score,
        mode: options.mode,
        strategy: options.reference,
        reference: shared_reference,
        sections: reports,
    }
}
