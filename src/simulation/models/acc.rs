use rand::rngs::SmallRng;
use tracing::debug;

use crate::simulation::models::{acc_noise, LongitudinalModel, LongitudinalParams, V0_EPS};

/// Hard floor on the ACC acceleration output [m/s^2].
const B_MAX: f64 = 18.;

/// Gaps below this are treated as collision-imminent.
const COLLISION_GAP: f64 = 1e-4;

const DEFAULT_COOL: f64 = 0.99;

/// Placeholder response of [`Acc::calc_acc_give_way`], see there.
const GIVE_WAY_PLACEHOLDER: f64 = -4.;

/// ACC car-following model. Same calibration as [`Idm`](super::idm::Idm), but
/// the IDM response is blended with a collision-avoidance-horizon (CAH) term,
/// which keeps reactions at small gaps smooth where plain IDM would already
/// brake hard.
#[derive(Debug, Clone, PartialEq)]
pub struct Acc {
    pub params: LongitudinalParams,
    /// Mixing coefficient in [0, 1]: 1 = full CAH-aware blend, 0 = plain IDM.
    pub cool: f64,
    pub b_max: f64,
}

impl Acc {
    pub fn new(v0: f64, t: f64, s0: f64, a: f64, b: f64) -> Acc {
        Acc {
            params: LongitudinalParams::new(v0, t, s0, a, b),
            cool: DEFAULT_COOL,
            b_max: B_MAX,
        }
    }

    /// Constant-acceleration heuristic: the deceleration that just avoids a
    /// collision given the leader keeps its current acceleration.
    fn acc_cah(&self, s: f64, v: f64, v_leader: f64, a_leader: f64) -> f64 {
        let acc_cah = if v_leader * (v - v_leader) < -2. * s * a_leader {
            // the gap closes before the speed difference vanishes
            v * v * a_leader / (v_leader * v_leader - 2. * s * a_leader)
        } else {
            // only a closing speed difference is penalized
            let closing = if v > v_leader { 1. } else { 0. };
            a_leader - (v - v_leader).powi(2) / (2. * f64::max(s, 0.01)) * closing
        };
        f64::min(acc_cah, self.params.a)
    }
}

impl LongitudinalModel for Acc {
    fn calc_acc(&self, s: f64, v: f64, v_leader: f64, a_leader: f64, rng: &mut SmallRng) -> f64 {
        if s < COLLISION_GAP {
            return -self.b_max;
        }

        let acc_rnd = acc_noise(rng);

        let v0_eff = self.params.v0_eff();
        if v0_eff < V0_EPS {
            return 0.;
        }

        let acc_idm = self.params.acc_free(v, v0_eff) + self.params.acc_interaction(s, v, v_leader);
        let acc_cah = self.acc_cah(s, v, v_leader, a_leader);

        // soften the transition between the two regimes within a band of
        // width b around acc_idm == acc_cah
        let b = self.params.b;
        let acc_mix = if acc_idm > acc_cah {
            acc_idm
        } else {
            acc_cah + b * tanh((acc_idm - acc_cah) / b)
        };

        let acc_acc = self.cool * acc_mix + (1. - self.cool) * acc_idm;

        f64::max(-self.b_max, acc_acc + acc_rnd)
    }

    /// Give-way response for passive merges. The intended courtesy-braking
    /// rule for this model has never been specified; the relevance condition
    /// is evaluated and traced, but the returned value is the fixed
    /// placeholder [`GIVE_WAY_PLACEHOLDER`].
    ///
    /// TODO resolve the intended give-way response with the model owners,
    /// then replace the placeholder.
    fn calc_acc_give_way(
        &self,
        s_new: f64,
        v: f64,
        v_prio: f64,
        acc_old: f64,
        rng: &mut SmallRng,
    ) -> f64 {
        let acc_new = self.calc_acc(s_new, v, v_prio, 0., rng);
        // 0.1 * b matches the relevance threshold of Mobil::respect_priority
        let priority_relevant = acc_old - acc_new > 0.1 * self.params.b;
        debug!(
            acc_new,
            priority_relevant, "give-way response not specified, returning placeholder"
        );
        GIVE_WAY_PLACEHOLDER
    }

    fn set_alpha_v0(&mut self, alpha_v0: f64) {
        self.params.alpha_v0 = alpha_v0;
    }

    fn set_speed_limit(&mut self, speed_limit: f64) {
        self.params.speed_limit = speed_limit;
    }

    fn set_speed_max(&mut self, speed_max: f64) {
        self.params.speed_max = speed_max;
    }
}

/// Crate-local hyperbolic tangent. Not every target runtime provides one, and
/// standard double precision is accurate enough here. Arguments beyond +-50
/// are clamped so the exponential cannot overflow.
fn tanh(x: f64) -> f64 {
    if x > 50. {
        1.
    } else if x < -50. {
        -1.
    } else {
        let e = (2. * x).exp();
        (e - 1.) / (e + 1.)
    }
}
