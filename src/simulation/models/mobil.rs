use tracing::debug;

use crate::simulation::models::PriorityNotApplicable;

/// Minimum obstruction of the target-lane vehicle that counts as taking its
/// priority [m/s^2]. Note that this is an acceleration *change*, much smaller
/// than the deceleration bounds of the safety criterion.
const PRIO_ACC_CHANGE: f64 = 0.1;

/// MOBIL lane-change decision model. Consumes the accelerations an arbitrary
/// longitudinal model produced for the current lane and for the hypothetical
/// target-lane situation; it has no lane or vehicle knowledge of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Mobil {
    /// safe deceleration of the new follower [m/s^2] at full desired speed
    pub b_safe: f64,
    /// safe deceleration of the new follower [m/s^2] at standstill
    pub b_safe_max: f64,
    /// weight of the harm imposed on the new follower (0 = egoistic)
    pub politeness: f64,
    /// minimum advantage before a change is worthwhile [m/s^2]
    pub b_thr: f64,
    /// bias towards the right lane [m/s^2]
    pub b_bias_right: f64,
    /// vehicles on the target lane have priority
    pub target_lane_prio: bool,
}

impl Mobil {
    pub fn new(b_safe: f64, b_safe_max: f64, politeness: f64, b_thr: f64, b_bias_right: f64) -> Mobil {
        Mobil {
            b_safe,
            b_safe_max,
            politeness,
            b_thr,
            b_bias_right,
            target_lane_prio: false,
        }
    }

    /// Decides whether an immediate lane change is safe and worthwhile.
    ///
    /// * `v_rel` - own speed relative to the desired speed, in [0, 1]
    /// * `acc` - own acceleration in the current lane
    /// * `acc_new` - prospective own acceleration in the target lane
    /// * `acc_lag_new` - prospective acceleration of the new follower
    /// * `to_right` - direction of the change
    pub fn realize_lane_change(
        &self,
        v_rel: f64,
        acc: f64,
        acc_new: f64,
        acc_lag_new: f64,
        to_right: bool,
    ) -> bool {
        // safety criterion: slow maneuvers may impose harder braking on the
        // new follower, so the bound is interpolated towards b_safe_max
        let b_safe_actual = v_rel * self.b_safe + (1. - v_rel) * self.b_safe_max;
        if acc_lag_new < -b_safe_actual {
            return false;
        }

        // incentive criterion
        let bias = if to_right {
            self.b_bias_right
        } else {
            -self.b_bias_right
        };
        let d_acc = acc_new - acc + self.politeness * acc_lag_new + bias - self.b_thr;

        if d_acc > 0. {
            debug!(
                v_rel,
                b_safe_actual, acc, acc_new, acc_lag_new, to_right, "accepting lane change"
            );
        }
        d_acc > 0.
    }

    /// Whether a merge onto the priority target lane would obstruct the
    /// vehicle that becomes the new follower there. `acc_lag` is that
    /// vehicle's current acceleration, `acc_lag_new` its acceleration after a
    /// prospective merge.
    ///
    /// Only defined when [`target_lane_prio`](Self::target_lane_prio) is set.
    pub fn respect_priority(
        &self,
        acc_lag: f64,
        acc_lag_new: f64,
    ) -> Result<bool, PriorityNotApplicable> {
        if !self.target_lane_prio {
            return Err(PriorityNotApplicable);
        }
        Ok(acc_lag - acc_lag_new > PRIO_ACC_CHANGE)
    }
}
