use rustfft::{num_complex::Complex, FftPlanner};

use super::features::DescriptorSet;

const FRAME_SIZE: usize = 2048;
const HOP_SIZE: usize = 512;

/// Anything that can reduce a slice of mono samples to a `DescriptorSet`.
///
/// Implementations must be deterministic: the same slice and rate always
/// give the same descriptors.
pub trait DescriptorProvider: Sync {
    fn describe(&self, samples: &[f32], sample_rate: u32) -> DescriptorSet;
}

/// Frame-based descriptors: RMS, spectral centroid, zero-crossing rate,
/// peak-to-peak range and a spectral-flux tempo estimate.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpectralDescriptors;

impl DescriptorProvider for SpectralDescriptors {
    fn describe(&self, samples: &[f32], sample_rate: u32) -> DescriptorSet {
        if samples.is_empty() || sample_rate == 0 {
            return DescriptorSet::ZERO;
        }

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(FRAME_SIZE);
        let hann = hann_window(FRAME_SIZE);
        let freq_resolution = sample_rate as f32 / FRAME_SIZE as f32;
        let half = FRAME_SIZE / 2;

        let mut rms_sum = 0.0f64;
        let mut centroid_sum = 0.0f64;
        let mut zcr_sum = 0.0f64;
        let mut prev_magnitudes = vec![0.0f32; half];
        let mut flux_values: Vec<(f32, f32)> = Vec::new(); // (time, flux)

        let starts = frame_starts(samples.len());
        for &pos in &starts {
            let end = (pos + FRAME_SIZE).min(samples.len());
            let frame = &samples[pos..end];

            rms_sum += rms(frame) as f64;
            zcr_sum += zero_crossing_rate(frame) as f64;

            // Zero-padded when the slice is shorter than one frame
            let mut buffer: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); FRAME_SIZE];
            for (i, &s) in frame.iter().enumerate() {
                buffer[i] = Complex::new(s * hann[i], 0.0);
            }
            fft.process(&mut buffer);

            let magnitudes: Vec<f32> = buffer[..half].iter().map(|c| c.norm()).collect();
            centroid_sum += spectral_centroid(&magnitudes, freq_resolution) as f64;

            let flux: f32 = magnitudes
                .iter()
                .zip(prev_magnitudes.iter())
                .map(|(cur, prev)| (cur - prev).max(0.0))
                .sum();
            flux_values.push((pos as f32 / sample_rate as f32, flux));
            prev_magnitudes = magnitudes;
        }

        let frames = starts.len() as f64;
        let beat_times = detect_beats(&flux_values);
        let tempo = estimate_tempo(&beat_times);

        log::trace!(
            "Described {} samples: {} frames, {} beats, tempo={:.1} BPM",
            samples.len(),
            starts.len(),
            beat_times.len(),
            tempo
        );

        DescriptorSet {
            energy: rms_sum / frames,
            spectral_centroid: centroid_sum / frames,
            zero_crossing_rate: zcr_sum / frames,
            dynamic_range: dynamic_range(samples) as f64,
            tempo: tempo as f64,
        }
    }
}

/// Frame start offsets; a slice shorter than one frame yields a single frame at 0.
fn frame_starts(len: usize) -> Vec<usize> {
    if len <= FRAME_SIZE {
        return vec![0];
    }
    (0..=(len - FRAME_SIZE)).step_by(HOP_SIZE).collect()
}

fn rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    (frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32).sqrt()
}

/// Fraction of adjacent sample pairs whose sign differs.
fn zero_crossing_rate(frame: &[f32]) -> f32 {
    if frame.len() < 2 {
        return 0.0;
    }
    let crossings = frame
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count();
    crossings as f32 / (frame.len() - 1) as f32
}

fn spectral_centroid(magnitudes: &[f32], freq_resolution: f32) -> f32 {
    let total_energy: f32 = magnitudes.iter().sum();
    if total_energy > 1e-10 {
        magnitudes
            .iter()
            .enumerate()
            .map(|(i, &mag)| i as f32 * freq_resolution * mag)
            .sum::<f32>()
            / total_energy
    } else {
        0.0
    }
}

fn dynamic_range(samples: &[f32]) -> f32 {
    let max = samples.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let min = samples.iter().copied().fold(f32::INFINITY, f32::min);
    if max.is_finite() && min.is_finite() {
        max - min
    } else {
        0.0
    }
}

fn detect_beats(flux_values: &[(f32, f32)]) -> Vec<f32> {
    if flux_values.is_empty() {
        return Vec::new();
    }

    let window = 20; // ~230ms at 44.1kHz / 512 hop
    let mut beat_times = Vec::new();

    for i in 0..flux_values.len() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(flux_values.len());
        let local_mean: f32 = flux_values[start..end].iter().map(|(_, f)| f).sum::<f32>()
            / (end - start) as f32;

        let threshold = local_mean * 1.5 + 0.01;

        if flux_values[i].1 > threshold {
            let is_peak = (i == 0 || flux_values[i].1 >= flux_values[i - 1].1)
                && (i == flux_values.len() - 1 || flux_values[i].1 >= flux_values[i + 1].1);

            // Minimum gap between beats (100ms)
            let far_enough = beat_times
                .last()
                .map_or(true, |&last: &f32| flux_values[i].0 - last > 0.1);

            if is_peak && far_enough {
                beat_times.push(flux_values[i].0);
            }
        }
    }

    beat_times
}

/// Median plausible inter-beat interval as BPM; 0.0 when there is no pulse.
fn estimate_tempo(beat_times: &[f32]) -> f32 {
    if beat_times.len() < 2 {
        return 0.0;
    }

    // Filter reasonable intervals (60-200 BPM → 0.3-1.0s)
    let mut reasonable: Vec<f32> = beat_times
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|&i| (0.3..=1.0).contains(&i))
        .collect();

    if reasonable.is_empty() {
        return 0.0;
    }

    reasonable.sort_by(f32::total_cmp);
    60.0 / reasonable[reasonable.len() / 2]
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 22050;

    fn sine(freq: f32, amplitude: f32, secs: f32) -> Vec<f32> {
        let n = (SR as f32 * secs) as usize;
        (0..n)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / SR as f32).sin())
            .collect()
    }

    fn click_track(bpm: f32, secs: f32) -> Vec<f32> {
        let n = (SR as f32 * secs) as usize;
        let period = (60.0 / bpm * SR as f32) as usize;
        let mut samples = vec![0.0f32; n];
        for start in (0..n).step_by(period) {
            for (k, s) in samples[start..(start + 64).min(n)].iter_mut().enumerate() {
                *s = if k % 2 == 0 { 0.9 } else { -0.9 };
            }
        }
        samples
    }

    #[test]
    fn empty_slice_is_zero() {
        assert_eq!(SpectralDescriptors.describe(&[], SR), DescriptorSet::ZERO);
    }

    #[test]
    fn silence_has_no_energy_or_pulse() {
        let d = SpectralDescriptors.describe(&vec![0.0; SR as usize], SR);
        assert_eq!(d.energy, 0.0);
        assert_eq!(d.spectral_centroid, 0.0);
        assert_eq!(d.zero_crossing_rate, 0.0);
        assert_eq!(d.dynamic_range, 0.0);
        assert_eq!(d.tempo, 0.0);
    }

    #[test]
    fn sine_descriptors() {
        let d = SpectralDescriptors.describe(&sine(440.0, 0.5, 2.0), SR);
        let expected_rms = 0.5 / 2f64.sqrt();
        assert!((d.energy - expected_rms).abs() < 0.01, "energy={}", d.energy);
        assert!((d.dynamic_range - 1.0).abs() < 0.01, "range={}", d.dynamic_range);
        let expected_zcr = 2.0 * 440.0 / SR as f64;
        assert!(
            (d.zero_crossing_rate - expected_zcr).abs() < 0.005,
            "zcr={}",
            d.zero_crossing_rate
        );
        assert!(
            d.spectral_centroid > 350.0 && d.spectral_centroid < 700.0,
            "centroid={}",
            d.spectral_centroid
        );
    }

    #[test]
    fn brighter_tone_has_higher_centroid() {
        let low = SpectralDescriptors.describe(&sine(220.0, 0.5, 1.0), SR);
        let high = SpectralDescriptors.describe(&sine(3000.0, 0.5, 1.0), SR);
        assert!(high.spectral_centroid > low.spectral_centroid);
        assert!(high.zero_crossing_rate > low.zero_crossing_rate);
    }

    #[test]
    fn click_track_tempo() {
        let d = SpectralDescriptors.describe(&click_track(120.0, 10.0), SR);
        assert!((d.tempo - 120.0).abs() < 8.0, "tempo={}", d.tempo);
    }

    #[test]
    fn short_slice_is_single_padded_frame() {
        assert_eq!(frame_starts(10), vec![0]);
        assert_eq!(frame_starts(FRAME_SIZE), vec![0]);
        assert_eq!(frame_starts(FRAME_SIZE + HOP_SIZE), vec![0, HOP_SIZE]);

        let d = SpectralDescriptors.describe(&[0.5, -0.5, 0.5], SR);
        assert_eq!(d.zero_crossing_rate, 1.0);
        assert_eq!(d.dynamic_range, 1.0);
        assert_eq!(d.tempo, 0.0);
    }

    #[test]
    fn tempo_needs_two_beats() {
        assert_eq!(estimate_tempo(&[]), 0.0);
        assert_eq!(estimate_tempo(&[1.0]), 0.0);
        assert_eq!(estimate_tempo(&[0.0, 0.5, 1.0, 1.5]), 120.0);
        // Only implausibly short intervals
        assert_eq!(estimate_tempo(&[0.0, 0.1, 0.2]), 0.0);
    }

    #[test]
    fn describe_is_deterministic() {
        let samples = click_track(100.0, 4.0);
        let a = SpectralDescriptors.describe(&samples, SR);
        let b = SpectralDescriptors.describe(&samples, SR);
        assert_eq!(a, b);
    }
}
