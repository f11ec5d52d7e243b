use crate::error::{AudioError, AudioResult};
use std::ops::Range;

/// Seconds cut from the start of every file unless configured otherwise
pub const DEFAULT_START_OFFSET_SECS: f64 = 2.0;
/// Seconds cut from the end of every file unless configured otherwise
pub const DEFAULT_END_OFFSET_SECS: f64 = 2.0;

/// Fixed offsets removed from both ends of every asset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimPlan {
    start_offset_secs: f64,
    end_offset_secs: f64,
}

impl Default for TrimPlan {
    fn default() -> Self {
        TrimPlan {
            start_offset_secs: DEFAULT_START_OFFSET_SECS,
            end_offset_secs: DEFAULT_END_OFFSET_SECS,
        }
    }
}

impl TrimPlan {
    /// Create a plan; offsets must be finite and non-negative
    pub fn new(start_offset_secs: f64, end_offset_secs: f64) -> AudioResult<Self> {
        for (name, value) in [("start", start_offset_secs), ("end", end_offset_secs)] {
            if !value.is_finite() || value < 0.0 {
                return Err(AudioError::Config(format!(
                    "{} offset must be a non-negative number of seconds, got {}",
                    name, value
                )));
            }
        }

        Ok(TrimPlan {
            start_offset_secs,
            end_offset_secs,
        })
    }

    /// Seconds removed from the start
    pub fn start_offset_secs(&self) -> f64 {
        self.start_offset_secs
    }

    /// Seconds removed from the end
    pub fn end_offset_secs(&self) -> f64 {
        self.end_offset_secs
    }

    /// Total seconds removed; assets at or below this length are skipped
    pub fn min_duration_secs(&self) -> f64 {
        self.start_offset_secs + self.end_offset_secs
    }

    /// Whether an asset of `duration_secs` leaves anything after trimming
    pub fn is_eligible(&self, duration_secs: f64) -> bool {
        duration_secs > self.min_duration_secs()
    }

    /// The retained window, or `None` for ineligible assets
    pub fn window(&self, duration_secs: f64) -> Option<TrimWindow> {
        self.is_eligible(duration_secs).then(|| TrimWindow {
            start_secs: self.start_offset_secs,
            end_secs: duration_secs - self.end_offset_secs,
        })
    }
}

/// Half-open span `[start_secs, end_secs)` kept from an asset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimWindow {
    /// Window start in seconds
    pub start_secs: f64,
    /// Window end in seconds
    pub end_secs: f64,
}

impl TrimWindow {
    /// Window length in seconds
    pub fn len_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }

    /// Per-channel frame range for a stream of `total_frames` at `sample_rate`
    pub fn frame_range(&self, sample_rate: u32, total_frames: usize) -> Range<usize> {
        let to_frame = |secs: f64| ((secs * sample_rate as f64).round() as usize).min(total_frames);
        let start = to_frame(self.start_secs);
        let end = to_frame(self.end_secs).max(start);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan() {
        let plan = TrimPlan::default();
        assert_eq!(plan.start_offset_secs(), 2.0);
        assert_eq!(plan.end_offset_secs(), 2.0);
        assert_eq!(plan.min_duration_secs(), 4.0);
    }

    #[test]
    fn test_boundary_is_skipped() {
        let plan = TrimPlan::default();
        assert!(!plan.is_eligible(3.0));
        assert!(!plan.is_eligible(4.0));
        assert!(plan.is_eligible(4.001));
        assert!(plan.window(4.0).is_none());
    }

    #[test]
    fn test_window() {
        let window = TrimPlan::default().window(10.0).unwrap();
        assert_eq!(window.start_secs, 2.0);
        assert_eq!(window.end_secs, 8.0);
        assert_eq!(window.len_secs(), 6.0);
    }

    #[test]
    fn test_asymmetric_offsets() {
        let plan = TrimPlan::new(0.5, 0.0).unwrap();
        let window = plan.window(3.0).unwrap();
        assert_eq!(window.start_secs, 0.5);
        assert_eq!(window.end_secs, 3.0);
    }

    #[test]
    fn test_invalid_offsets() {
        assert!(TrimPlan::new(-1.0, 2.0).is_err());
        assert!(TrimPlan::new(2.0, f64::NAN).is_err());
        assert!(TrimPlan::new(f64::INFINITY, 2.0).is_err());
    }

    #[test]
    fn test_frame_range() {
        let window = TrimPlan::default().window(10.0).unwrap();
        assert_eq!(window.frame_range(44100, 441000), 88200..352800);

        // Container-reported duration may overshoot the decoded length
        let window = TrimPlan::default().window(10.5).unwrap();
        assert_eq!(window.frame_range(100, 900), 200..850);
        let window = TrimPlan::default().window(20.0).unwrap();
        assert_eq!(window.frame_range(100, 900), 200..900);
    }
}
