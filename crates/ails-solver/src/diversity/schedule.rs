//! Ideal-distance trajectory.

use ails_config::ScheduleKind;

/// Target pairwise distance as a function of search progress.
///
/// Non-increasing in progress: wide exploration early, narrow exploitation
/// late.
///
/// # Example
///
/// ```
/// use ails_config::ScheduleKind;
/// use ails_solver::diversity::IdealDistanceSchedule;
///
/// let schedule = IdealDistanceSchedule::new(ScheduleKind::Geometric, 30.0, 15.0);
/// assert_eq!(schedule.ideal_distance(0.0), 30.0);
/// assert_eq!(schedule.ideal_distance(1.0), 15.0);
/// assert!((schedule.ideal_distance(0.5) - 21.2132).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealDistanceSchedule {
    kind: ScheduleKind,
    d_max: f64,
    d_min: f64,
}

impl IdealDistanceSchedule {
    pub fn new(kind: ScheduleKind, d_max: f64, d_min: f64) -> Self {
        Self { kind, d_max, d_min }
    }

    /// Ideal distance at `progress`, clamped to `[0, 1]`.
    pub fn ideal_distance(&self, progress: f64) -> f64 {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        match self.kind {
            ScheduleKind::Geometric => {
                if p >= 1.0 {
                    self.d_min
                } else {
                    self.d_max * (self.d_min / self.d_max).powf(p)
                }
            }
            ScheduleKind::Linear => self.d_max + (self.d_min - self.d_max) * p,
        }
    }

    pub fn d_max(&self) -> f64 {
        self.d_max
    }

    pub fn d_min(&self) -> f64 {
        self.d_min
    }
}
