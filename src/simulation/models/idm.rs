use rand::rngs::SmallRng;

use crate::simulation::models::{acc_noise, LongitudinalModel, LongitudinalParams, V0_EPS};

/// Hard floor on the IDM acceleration output [m/s^2].
const B_MAX: f64 = 16.;

/// Intelligent Driver Model. The baseline car-following law: a free-road term
/// that approaches the desired speed plus a braking term that grows
/// quadratically as the gap falls below the desired dynamic gap s*.
#[derive(Debug, Clone, PartialEq)]
pub struct Idm {
    pub params: LongitudinalParams,
    pub b_max: f64,
}

impl Idm {
    pub fn new(v0: f64, t: f64, s0: f64, a: f64, b: f64) -> Idm {
        Idm {
            params: LongitudinalParams::new(v0, t, s0, a, b),
            b_max: B_MAX,
        }
    }
}

impl LongitudinalModel for Idm {
    fn calc_acc(&self, s: f64, v: f64, v_leader: f64, _a_leader: f64, rng: &mut SmallRng) -> f64 {
        let acc_rnd = acc_noise(rng);

        let v0_eff = self.params.v0_eff();
        if v0_eff < V0_EPS {
            return 0.;
        }

        let acc_free = self.params.acc_free(v, v0_eff);
        let acc_int = self.params.acc_interaction(s, v, v_leader);

        f64::max(-self.b_max, acc_free + acc_int + acc_rnd)
    }

    /// Returns the deceleration as though the priority vehicle had already
    /// merged at gap `s_new`, unless that would mean emergency braking
    /// (beyond `2 * b`); in that case the merge is not accommodated and the
    /// unmerged acceleration `acc_old` is kept.
    fn calc_acc_give_way(
        &self,
        s_new: f64,
        v: f64,
        v_prio: f64,
        acc_old: f64,
        rng: &mut SmallRng,
    ) -> f64 {
        let acc_new = self.calc_acc(s_new, v, v_prio, 0., rng);
        if acc_new > -2. * self.params.b {
            acc_new
        } else {
            acc_old
        }
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
