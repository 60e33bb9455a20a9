use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use crate::simulation::models::acc::Acc;
use crate::simulation::models::idm::Idm;
use crate::simulation::models::mobil::Mobil;
use crate::simulation::models::LongitudinalModel;

/// Calibration of the driver-behavior models, one entry per vehicle class.
/// Loaded once at simulation setup; the stepper builds model instances from it
/// via the factory methods on [`VehicleClass`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DriverConfig {
    pub vehicle_classes: Vec<VehicleClass>,
    /// base seed for the per-vehicle noise streams
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    42
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VehicleClass {
    pub name: String,
    pub longitudinal: Longitudinal,
    #[serde(default)]
    pub lane_change: Option<LaneChange>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Longitudinal {
    #[serde(default)]
    pub model: ModelType,
    pub v0: f64,
    pub t: f64,
    pub s0: f64,
    pub a: f64,
    pub b: f64,
    /// ACC mixing coefficient; ignored by IDM
    #[serde(default = "default_cool")]
    pub cool: f64,
}

fn default_cool() -> f64 {
    0.99
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Idm,
    #[default]
    Acc,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LaneChange {
    pub b_safe: f64,
    pub b_safe_max: f64,
    pub politeness: f64,
    pub b_thr: f64,
    pub b_bias_right: f64,
    #[serde(default)]
    pub target_lane_prio: bool,
}

impl From<PathBuf> for DriverConfig {
    fn from(config_path: PathBuf) -> Self {
        let file = File::open(&config_path)
            .unwrap_or_else(|e| panic!("Failed to open config at {config_path:?}: {e}"));
        DriverConfig::from_reader(BufReader::new(file)).unwrap_or_else(|e| {
            panic!("Failed to parse config at {config_path:?}. Original error was: {e}")
        })
    }
}

impl DriverConfig {
    pub fn from_reader<R: Read>(reader: R) -> Result<DriverConfig, serde_yaml::Error> {
        serde_yaml::from_reader(reader)
    }

    pub fn vehicle_class(&self, name: &str) -> &VehicleClass {
        self.vehicle_classes
            .iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("Vehicle class {name} was not configured."))
    }
}

impl VehicleClass {
    /// Builds the longitudinal model this class is calibrated for.
    pub fn create_longitudinal(&self) -> Box<dyn LongitudinalModel> {
        let l = &self.longitudinal;
        match l.model {
            ModelType::Idm => Box::new(Idm::new(l.v0, l.t, l.s0, l.a, l.b)),
            ModelType::Acc => {
                let mut acc = Acc::new(l.v0, l.t, l.s0, l.a, l.b);
                acc.cool = l.cool;
                Box::new(acc)
            }
        }
    }

    /// Builds the lane-change model of this class. Classes without a
    /// `lane_change` section (e.g. single-lane-only vehicles) have none.
    pub fn create_lane_change(&self) -> Option<Mobil> {
        self.lane_change.as_ref().map(|lc| {
            let mut mobil = Mobil::new(
                lc.b_safe,
                lc.b_safe_max,
                lc.politeness,
                lc.b_thr,
                lc.b_bias_right,
            );
            mobil.target_lane_prio = lc.target_lane_prio;
            mobil
        })
    }
}
