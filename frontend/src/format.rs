//! Display math shared by the locally predicted and the server confirmed
//! values. Everything here is pure and total.

use crate::error::OutOfRange;

pub const RPM_GAUGE_MAX: u32 = 6000;
pub const SPEED_GAUGE_MAX: u32 = 200;

/// `seconds` as `M:SS`. Minutes are unbounded.
pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Inverse of [`format_clock`].
pub fn parse_clock(label: &str) -> Option<u64> {
    let (minutes, seconds) = label.trim().split_once(':')?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(minutes) || seconds.len() != 2 || !all_digits(seconds) {
        return None;
    }

    let minutes: u64 = minutes.parse().ok()?;
    let seconds: u64 = seconds.parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    minutes.checked_mul(60)?.checked_add(seconds)
}

/// Fraction of the dial covered by `value`. Anything off the scale is
/// rejected rather than pinned to an end stop.
pub fn gauge_fraction(value: f64, max_value: f64) -> Result<f64, OutOfRange> {
    let out_of_range = OutOfRange {
        value,
        max: max_value,
    };
    if !(max_value > 0.0) {
        return Err(out_of_range);
    }

    let fraction = value / max_value;
    if !(0.0..=1.0).contains(&fraction) {
        return Err(out_of_range);
    }
    Ok(fraction.clamp(0.0, 1.0))
}

/// Seek slider percentage to a target second. Truncates toward zero, the
/// same rule the slider label uses, so seeking and reading back agree to
/// within a second.
pub fn percentage_to_seek_target(percentage: f64, length_seconds: u32) -> u32 {
    let percentage = if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    };
    (length_seconds as f64 * percentage / 100.0).trunc() as u32
}

/// Where the seek slider sits for a given position.
pub fn seek_target_to_percentage(position_seconds: u32, length_seconds: u32) -> f64 {
    if length_seconds == 0 {
        return 0.0;
    }
    position_seconds.min(length_seconds) as f64 * 100.0 / length_seconds as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GaugeKind {
    Rpm,
    Speed,
}

impl GaugeKind {
    pub fn max_value(&self) -> u32 {
        match self {
            GaugeKind::Rpm => RPM_GAUGE_MAX,
            GaugeKind::Speed => SPEED_GAUGE_MAX,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            GaugeKind::Rpm => "rpm",
            GaugeKind::Speed => "kmh",
        }
    }
}

/// Derived per sample, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeReading {
    pub fraction_of_scale: f64,
    pub raw_value: u32,
    pub unit: &'static str,
}

impl GaugeReading {
    pub fn read(kind: GaugeKind, raw_value: u32) -> Result<Self, OutOfRange> {
        let fraction_of_scale = gauge_fraction(raw_value as f64, kind.max_value() as f64)?;
        Ok(Self {
            fraction_of_scale,
            raw_value,
            unit: kind.unit(),
        })
    }

    /// The dial is a half circle: a full scale reading is half a turn.
    pub fn rotation_turns(&self) -> f64 {
        self.fraction_of_scale / 2.0
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.raw_value, self.unit)
    }
}
