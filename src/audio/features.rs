use serde::Serialize;

/// One of the five scalar measurements taken over a slice of audio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Descriptor {
    Energy,
    SpectralCentroid,
    ZeroCrossingRate,
    DynamicRange,
    Tempo,
}

impl Descriptor {
    pub const ALL: [Descriptor; 5] = [
        Descriptor::Energy,
        Descriptor::SpectralCentroid,
        Descriptor::ZeroCrossingRate,
        Descriptor::DynamicRange,
        Descriptor::Tempo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Descriptor::Energy => "energy",
            Descriptor::SpectralCentroid => "spectral centroid",
            Descriptor::ZeroCrossingRate => "zero-crossing rate",
            Descriptor::DynamicRange => "dynamic range",
            Descriptor::Tempo => "tempo",
        }
    }
}

/// Raw descriptors for a slice of samples
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct DescriptorSet {
    /// Mean per-frame RMS (linear)
    pub energy: f64,
    /// Mean spectral centroid (Hz)
    pub spectral_centroid: f64,
    /// Mean fraction of sign changes per frame (0.0-1.0)
    pub zero_crossing_rate: f64,
    /// max(samples) - min(samples)
    pub dynamic_range: f64,
    /// Estimated tempo (BPM), 0.0 when no pulse was found
    pub tempo: f64,
}

impl DescriptorSet {
    pub const ZERO: DescriptorSet = DescriptorSet {
        energy: 0.0,
        spectral_centroid: 0.0,
        zero_crossing_rate: 0.0,
        dynamic_range: 0.0,
        tempo: 0.0,
    };

    #[cfg(test)]
    pub const ONES: DescriptorSet = DescriptorSet {
        energy: 1.0,
        spectral_centroid: 1.0,
        zero_crossing_rate: 1.0,
        dynamic_range: 1.0,
        tempo: 1.0,
    };

    pub fn get(&self, descriptor: Descriptor) -> f64 {
        match descriptor {
            Descriptor::Energy => self.energy,
            Descriptor::SpectralCentroid => self.spectral_centroid,
            Descriptor::ZeroCrossingRate => self.zero_crossing_rate,
            Descriptor::DynamicRange => self.dynamic_range,
            Descriptor::Tempo => self.tempo,
        }
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> DescriptorSet {
        self.zip_with(&DescriptorSet::ZERO, |v, _| f(v))
    }

    /// Combine two sets field by field.
    pub fn zip_with(&self, other: &DescriptorSet, f: impl Fn(f64, f64) -> f64) -> DescriptorSet {
        DescriptorSet {
            energy: f(self.energy, other.energy),
            spectral_centroid: f(self.spectral_centroid, other.spectral_centroid),
            zero_crossing_rate: f(self.zero_crossing_rate, other.zero_crossing_rate),
            dynamic_range: f(self.dynamic_range, other.dynamic_range),
            tempo: f(self.tempo, other.tempo),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Descriptor, f64)> + '_ {
        Descriptor::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}
