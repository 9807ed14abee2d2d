//! Uniformly sampled acceleration records.

use super::TimeHistoryError;

/// Relative spacing deviation above which a time column counts as
/// non-uniform and is resampled.
const UNIFORM_SPACING_RTOL: f64 = 1e-4;

/// A uniformly sampled acceleration time history.
///
/// Always holds at least two finite samples and a positive time step; both
/// constructors validate eagerly so downstream transforms never re-check.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeHistory {
    time: Vec<f64>,
    acceleration: Vec<f64>,
    dt: f64,
}

impl TimeHistory {
    /// Build from acceleration samples at a fixed time step, with the time
    /// axis generated as `0, dt, 2·dt, …`.
    ///
    /// # Errors
    /// Rejects fewer than two samples, a non-positive or non-finite `dt`,
    /// and any non-finite sample.
    pub fn from_acceleration(acceleration: Vec<f64>, dt: f64) -> Result<Self, TimeHistoryError> {
        if acceleration.len() < 2 {
            return Err(TimeHistoryError::TooFewSamples {
                found: acceleration.len(),
            });
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(TimeHistoryError::NonPositiveTimeStep { value: dt });
        }
        if let Some(index) = acceleration.iter().position(|a| !a.is_finite()) {
            return Err(TimeHistoryError::NonFiniteSample { index });
        }
        let time = (0..acceleration.len()).map(|i| i as f64 * dt).collect();
        Ok(Self {
            time,
            acceleration,
            dt,
        })
    }

    /// Build from explicit `(time, acceleration)` columns, as read from a
    /// two-column file.
    ///
    /// The stored time step is the mean spacing
    /// `(t_last - t_first) / (n - 1)`. A non-uniform time column is
    /// resampled onto that uniform axis by linear interpolation, keeping
    /// the span and sample count.
    ///
    /// # Errors
    /// Rejects mismatched column lengths, fewer than two samples, any
    /// non-finite entry, and time values that are not strictly increasing.
    pub fn from_records(time: Vec<f64>, acceleration: Vec<f64>) -> Result<Self, TimeHistoryError> {
        if time.len() != acceleration.len() {
            return Err(TimeHistoryError::LengthMismatch {
                times: time.len(),
                values: acceleration.len(),
            });
        }
        if time.len() < 2 {
            return Err(TimeHistoryError::TooFewSamples { found: time.len() });
        }
        if let Some(index) = time
            .iter()
            .chain(acceleration.iter())
            .position(|v| !v.is_finite())
        {
            return Err(TimeHistoryError::NonFiniteSample {
                index: index % time.len(),
            });
        }
        if let Some(index) = (1..time.len()).find(|&i| time[i] <= time[i - 1]) {
            return Err(TimeHistoryError::TimeNotIncreasing { index });
        }
        let dt = (time[time.len() - 1] - time[0]) / (time.len() - 1) as f64;
        if is_uniform(&time, dt) {
            Ok(Self {
                time,
                acceleration,
                dt,
            })
        } else {
            let (time, acceleration) = resample_uniform(&time, &acceleration, dt);
            Ok(Self {
                time,
                acceleration,
                dt,
            })
        }
    }

    /// Assemble without validation; the caller guarantees the invariants.
    pub(crate) fn from_validated(time: Vec<f64>, acceleration: Vec<f64>, dt: f64) -> Self {
        Self {
            time,
            acceleration,
            dt,
        }
    }

    /// Time axis (s).
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Acceleration samples.
    pub fn acceleration(&self) -> &[f64] {
        &self.acceleration
    }

    /// Sampling interval (s).
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.acceleration.len()
    }

    /// A history is never empty; provided for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Record duration `t_last - t_first` (s).
    pub fn duration(&self) -> f64 {
        self.time[self.time.len() - 1] - self.time[0]
    }

    /// Peak absolute acceleration.
    pub fn peak(&self) -> f64 {
        self.acceleration.iter().fold(0.0, |m, a| m.max(a.abs()))
    }

    /// Velocity by cumulative trapezoidal integration, zero initial value.
    pub fn velocity(&self) -> Vec<f64> {
        cumulative_trapezoid(&self.acceleration, self.dt)
    }

    /// Displacement by integrating twice, zero initial values.
    pub fn displacement(&self) -> Vec<f64> {
        cumulative_trapezoid(&self.velocity(), self.dt)
    }
}

fn is_uniform(times: &[f64], mean_dt: f64) -> bool {
    times
        .windows(2)
        .all(|pair| ((pair[1] - pair[0]) - mean_dt).abs() <= UNIFORM_SPACING_RTOL * mean_dt)
}

/// Linear interpolation of `(times, values)` onto a uniform axis with the
/// same span and sample count. The time column is strictly increasing; the
/// constructor checked it.
fn resample_uniform(times: &[f64], values: &[f64], dt: f64) -> (Vec<f64>, Vec<f64>) {
    let n = times.len();
    let mut out_times = Vec::with_capacity(n);
    let mut out_values = Vec::with_capacity(n);
    let mut seg = 0;
    for i in 0..n {
        let t = times[0] + dt * i as f64;
        while seg + 2 < n && times[seg + 1] < t {
            seg += 1;
        }
        let frac = (t - times[seg]) / (times[seg + 1] - times[seg]);
        let frac = frac.clamp(0.0, 1.0);
        out_times.push(t);
        out_values.push(values[seg] + frac * (values[seg + 1] - values[seg]));
    }
    (out_times, out_values)
}

/// Running trapezoid integral of uniformly sampled values; output starts
/// at zero and has the same length as the input.
fn cumulative_trapezoid(values: &[f64], dt: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut acc = 0.0;
    out.push(acc);
    for pair in values.windows(2) {
        acc += 0.5 * (pair[0] + pair[1]) * dt;
        out.push(acc);
    }
    out
}
