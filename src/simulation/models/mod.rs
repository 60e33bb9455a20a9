use rand::rngs::SmallRng;
use rand::Rng;
use thiserror::Error;

pub mod acc;
pub mod idm;
pub mod mobil;

/// Sentinel for "no restriction". Speed limits and vehicle speed caps only
/// take effect once they are set below the desired speed.
pub const UNRESTRICTED: f64 = 1000.;

/// Below this effective desired speed a vehicle is treated as having no
/// driving intention at all and the models return zero acceleration.
pub(crate) const V0_EPS: f64 = 1e-5;

// Amplitude of the uniform acceleration noise. Breaks up the artificial
// platooning patterns a fully deterministic model produces.
pub(crate) const NOISE_ACC: f64 = 0.3;

/// Common contract of the car-following models. The external stepper calls
/// [`calc_acc`](LongitudinalModel::calc_acc) once per vehicle per time step and
/// integrates the result itself; this crate never touches positions.
///
/// The random generator is passed in by the caller so that runs are
/// reproducible, see [`crate::simulation::random`].
pub trait LongitudinalModel {
    /// Acceleration [m/s^2] in response to the current leader.
    ///
    /// * `s` - gap to the leader [m]
    /// * `v` - own speed [m/s]
    /// * `v_leader` - leader speed [m/s]
    /// * `a_leader` - leader acceleration [m/s^2]; not every model uses it
    fn calc_acc(&self, s: f64, v: f64, v_leader: f64, a_leader: f64, rng: &mut SmallRng) -> f64;

    /// Courtesy response to a priority vehicle that is about to merge ahead,
    /// as though the merge had already happened at gap `s_new`. `acc_old` is
    /// the acceleration computed for the current, unmerged situation.
    fn calc_acc_give_way(
        &self,
        s_new: f64,
        v: f64,
        v_prio: f64,
        acc_old: f64,
        rng: &mut SmallRng,
    ) -> f64;

    /// Temporary multiplicative reduction of the desired speed.
    fn set_alpha_v0(&mut self, alpha_v0: f64);

    /// Legal speed limit [m/s]. Set to [`UNRESTRICTED`] to lift it.
    fn set_speed_limit(&mut self, speed_limit: f64);

    /// Technical speed cap of the vehicle [m/s]. Set to [`UNRESTRICTED`] to lift it.
    fn set_speed_max(&mut self, speed_max: f64);
}

/// Calibration constants and runtime speed restrictions shared by the
/// longitudinal models. One instance is typically created per vehicle class at
/// setup; the owning simulation may reassign `alpha_v0`, `speed_limit` and
/// `speed_max` between time steps and the very next call picks them up.
#[derive(Debug, Clone, PartialEq)]
pub struct LongitudinalParams {
    /// desired speed [m/s]
    pub v0: f64,
    /// desired time gap [s]
    pub t: f64,
    /// minimum gap [m]
    pub s0: f64,
    /// maximum acceleration [m/s^2]
    pub a: f64,
    /// comfortable deceleration [m/s^2]
    pub b: f64,
    pub alpha_v0: f64,
    pub speed_limit: f64,
    pub speed_max: f64,
}

impl LongitudinalParams {
    pub fn new(v0: f64, t: f64, s0: f64, a: f64, b: f64) -> LongitudinalParams {
        assert!(a > 0., "max acceleration must be positive");
        assert!(b > 0., "comfortable deceleration must be positive");
        assert!(s0 >= 0., "minimum gap must not be negative");
        assert!(t >= 0., "time gap must not be negative");
        LongitudinalParams {
            v0,
            t,
            s0,
            a,
            b,
            alpha_v0: 1.,
            speed_limit: UNRESTRICTED,
            speed_max: UNRESTRICTED,
        }
    }

    /// Effective desired speed under the current restrictions. Recomputed on
    /// every call, the restrictions may have changed since the last one.
    pub(crate) fn v0_eff(&self) -> f64 {
        self.v0.min(self.speed_limit).min(self.speed_max) * self.alpha_v0
    }

    /// Free-road acceleration. Quartic approach towards the desired speed,
    /// but only linear decay above it to avoid overshoot oscillation.
    pub(crate) fn acc_free(&self, v: f64, v0_eff: f64) -> f64 {
        if v < v0_eff {
            self.a * (1. - (v / v0_eff).powi(4))
        } else {
            self.a * (1. - v / v0_eff)
        }
    }

    /// Desired dynamic gap s*. A faster leader must not shrink it below `s0`.
    pub(crate) fn s_star(&self, v: f64, v_leader: f64) -> f64 {
        self.s0 + f64::max(0., v * self.t + 0.5 * v * (v - v_leader) / (self.a * self.b).sqrt())
    }

    /// Interaction (braking) term. The gap is floored at `s0` so the quadratic
    /// does not blow up when vehicles get very close.
    pub(crate) fn acc_interaction(&self, s: f64, v: f64, v_leader: f64) -> f64 {
        -self.a * (self.s_star(v, v_leader) / f64::max(s, self.s0)).powi(2)
    }
}

/// One noise draw per acceleration call. Also consumed in degenerate branches
/// so that the position in the random stream only depends on the number of
/// calls, not on parameter values.
pub(crate) fn acc_noise(rng: &mut SmallRng) -> f64 {
    NOISE_ACC * (rng.random::<f64>() - 0.5)
}

/// Returned by [`mobil::Mobil::respect_priority`] when the lane-change model
/// was not configured with a priority target lane. The check has no defined
/// answer in that case and callers must gate on the flag instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("priority check is only defined when target_lane_prio is enabled")]
pub struct PriorityNotApplicable;
