//! FFT convolution of a bedrock record with a transfer function.

use rustfft::{num_complex::Complex64, FftPlanner};

use crate::transfer::TransferFunction;

use super::{ConvolveError, TimeHistory};

/// Frequency-domain intermediates of one convolution, for diagnostics.
///
/// All vectors share the FFT bin layout of the input record, DC first,
/// positive frequencies, then negative frequencies.
#[derive(Clone, Debug)]
pub struct ConvolutionSpectra {
    /// Signed FFT bin frequencies (Hz).
    pub bin_frequencies: Vec<f64>,
    /// Spectrum of the input record.
    pub input_spectrum: Vec<Complex64>,
    /// Transfer function interpolated onto the bin layout.
    pub transfer_applied: Vec<Complex64>,
    /// Spectrum of the surface motion, before the inverse transform.
    pub output_spectrum: Vec<Complex64>,
}

/// Signed FFT bin frequencies for `n` samples at spacing `dt`.
///
/// Bin `k` maps to `k/(n·dt)` for `k < (n+1)/2` and to `(k-n)/(n·dt)`
/// otherwise, so the second half of the layout carries the negative
/// frequencies.
pub fn fft_bin_frequencies(n: usize, dt: f64) -> Vec<f64> {
    let resolution = 1.0 / (n as f64 * dt);
    (0..n)
        .map(|k| {
            if k < (n + 1) / 2 {
                k as f64 * resolution
            } else {
                (k as f64 - n as f64) * resolution
            }
        })
        .collect()
}

/// Propagate a bedrock record to the surface through a transfer function.
///
/// The record is transformed, each bin is scaled by the transfer function
/// interpolated at the bin's absolute frequency, and the product is
/// transformed back; the surface motion is the real part. Bins outside the
/// solved frequency range (the DC bin included) are zeroed: content the
/// transfer function does not cover is not reproduced.
///
/// # Errors
/// [`ConvolveError::NonFinite`] if the inverse transform produces a
/// `NaN`/`Inf` sample.
pub fn convolve_surface_motion(
    transfer: &TransferFunction,
    motion: &TimeHistory,
) -> Result<TimeHistory, ConvolveError> {
    convolve_surface_motion_with_spectra(transfer, motion).map(|(surface, _)| surface)
}

/// Like [`convolve_surface_motion`], also returning the frequency-domain
/// intermediates.
pub fn convolve_surface_motion_with_spectra(
    transfer: &TransferFunction,
    motion: &TimeHistory,
) -> Result<(TimeHistory, ConvolutionSpectra), ConvolveError> {
    let n = motion.len();
    let mut planner = FftPlanner::new();
    let fft_forward = planner.plan_fft_forward(n);
    let fft_inverse = planner.plan_fft_inverse(n);

    let mut buffer: Vec<Complex64> = motion
        .acceleration()
        .iter()
        .map(|&a| Complex64::new(a, 0.0))
        .collect();
    fft_forward.process(&mut buffer);
    let input_spectrum = buffer.clone();

    let bin_frequencies = fft_bin_frequencies(n, motion.dt());
    let transfer_applied: Vec<Complex64> = bin_frequencies
        .iter()
        .map(|&f| transfer.sample_uu_at(f.abs()))
        .collect();

    for (value, &tf) in buffer.iter_mut().zip(&transfer_applied) {
        *value *= tf;
    }
    let output_spectrum = buffer.clone();

    fft_inverse.process(&mut buffer);
    let scale = 1.0 / n as f64;
    let mut surface = Vec::with_capacity(n);
    for (bin, value) in buffer.iter().enumerate() {
        let sample = value.re * scale;
        if !sample.is_finite() {
            return Err(ConvolveError::NonFinite { bin });
        }
        surface.push(sample);
    }

    let history = TimeHistory::from_validated(motion.time().to_vec(), surface, motion.dt());
    let spectra = ConvolutionSpectra {
        bin_frequencies,
        input_spectrum,
        transfer_applied,
        output_spectrum,
    };
    Ok((history, spectra))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{DampingSpec, RockHalfspace, SoilLayer, SoilProfile};
    use crate::transfer::{solve_transfer, FrequencyGrid};
    use std::f64::consts::PI;

    /// Flat transfer function (value `gain` from 0.5 Hz to 45 Hz).
    fn flat_transfer(gain: f64) -> TransferFunction {
        let frequencies: Vec<f64> = (0..90).map(|i| 0.5 + 0.5 * i as f64).collect();
        let n = frequencies.len();
        TransferFunction::from_parts(
            frequencies,
            vec![Complex64::new(gain, 0.0); n],
            vec![Complex64::new(gain, 0.0); n],
        )
    }

    /// Cosine at an exact FFT bin frequency.
    fn tone(n: usize, dt: f64, bin: usize) -> Vec<f64> {
        let f = bin as f64 / (n as f64 * dt);
        (0..n)
            .map(|i| (2.0 * PI * f * i as f64 * dt).cos())
            .collect()
    }

    #[test]
    fn test_bin_frequencies_even() {
        let f = fft_bin_frequencies(8, 0.5); // resolution 0.25 Hz
        let expected = [0.0, 0.25, 0.5, 0.75, -1.0, -0.75, -0.5, -0.25];
        for (got, want) in f.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-15, "{} vs {}", got, want);
        }
    }

    #[test]
    fn test_bin_frequencies_odd() {
        let f = fft_bin_frequencies(7, 1.0);
        let expected: Vec<f64> = [0.0, 1.0, 2.0, 3.0, -3.0, -2.0, -1.0]
            .iter()
            .map(|v| v / 7.0)
            .collect();
        for (got, want) in f.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-15);
        }
    }

    #[test]
    fn test_unit_transfer_passes_tone_through() {
        // A tone inside the solved band with TF = 1 comes back unchanged.
        let n = 64;
        let dt = 0.01;
        let input = TimeHistory::from_acceleration(tone(n, dt, 10), dt).unwrap();
        let transfer = flat_transfer(1.0);

        let surface = convolve_surface_motion(&transfer, &input).unwrap();
        for i in 0..n {
            assert!(
                (surface.acceleration()[i] - input.acceleration()[i]).abs() < 1e-10,
                "sample {} changed: {} vs {}",
                i,
                surface.acceleration()[i],
                input.acceleration()[i]
            );
        }
        assert!((surface.dt() - dt).abs() < 1e-15);
    }

    #[test]
    fn test_gain_scales_tone() {
        let n = 64;
        let dt = 0.01;
        let input = TimeHistory::from_acceleration(tone(n, dt, 6), dt).unwrap();
        let surface = convolve_surface_motion(&flat_transfer(2.5), &input).unwrap();
        for i in 0..n {
            assert!((surface.acceleration()[i] - 2.5 * input.acceleration()[i]).abs() < 1e-10);
        }
    }

    #[test]
    fn test_zero_motion_stays_zero() {
        let input = TimeHistory::from_acceleration(vec![0.0; 128], 0.005).unwrap();
        let surface = convolve_surface_motion(&flat_transfer(1.0), &input).unwrap();
        assert!(surface.acceleration().iter().all(|&a| a == 0.0));
    }

    #[test]
    fn test_dc_component_is_truncated() {
        // A constant record lives entirely in the DC bin, which sits below
        // the solved range and is zeroed.
        let input = TimeHistory::from_acceleration(vec![3.0; 64], 0.01).unwrap();
        let surface = convolve_surface_motion(&flat_transfer(1.0), &input).unwrap();
        for &a in surface.acceleration() {
            assert!(a.abs() < 1e-12, "DC leakage: {}", a);
        }
    }

    #[test]
    fn test_out_of_band_tone_is_truncated() {
        // 30 of 64 bins at dt = 0.01 -> 46.9 Hz, above the 45 Hz grid top.
        let n = 64;
        let dt = 0.01;
        let input = TimeHistory::from_acceleration(tone(n, dt, 30), dt).unwrap();
        let surface = convolve_surface_motion(&flat_transfer(1.0), &input).unwrap();
        for &a in surface.acceleration() {
            assert!(a.abs() < 1e-10, "out-of-band leakage: {}", a);
        }
    }

    #[test]
    fn test_spectra_shapes_and_dc_zero() {
        let n = 32;
        let dt = 0.02;
        let input = TimeHistory::from_acceleration(tone(n, dt, 3), dt).unwrap();
        let (_, spectra) =
            convolve_surface_motion_with_spectra(&flat_transfer(1.0), &input).unwrap();

        assert_eq!(spectra.bin_frequencies.len(), n);
        assert_eq!(spectra.input_spectrum.len(), n);
        assert_eq!(spectra.transfer_applied.len(), n);
        assert_eq!(spectra.output_spectrum.len(), n);
        assert_eq!(spectra.transfer_applied[0], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_solved_profile_amplifies_resonant_tone() {
        // A tone near the fundamental frequency of a soft layer comes out
        // larger than it went in.
        let layer = SoilLayer::new(
            18.0,
            200.0,
            1969.4,
            DampingSpec::rayleigh(0.03, 2.76, 13.84).unwrap(),
        )
        .unwrap();
        let profile = SoilProfile::single(layer);
        let rock = RockHalfspace::new(8000.0, 2000.0, 0.0).unwrap();
        let grid = FrequencyGrid::new(22.0, 2000).unwrap();
        let transfer = solve_transfer(&profile, &rock, &grid).unwrap();

        let n = 512;
        let dt = 0.02; // resolution ~0.0977 Hz
        // Bin 28 -> 2.734 Hz, close to the ~2.78 Hz quarter-wavelength peak.
        let input = TimeHistory::from_acceleration(tone(n, dt, 28), dt).unwrap();
        let surface = convolve_surface_motion(&transfer, &input).unwrap();

        assert!(
            surface.peak() > 5.0 * input.peak(),
            "expected strong amplification, got peak ratio {}",
            surface.peak() / input.peak()
        );
    }
}
