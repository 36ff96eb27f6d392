//! Theoretical neutral buoyancy point of a diver as a function of velocity.
//!
//! This is an approximation, not a physical simulation. Degenerate inputs
//! (zero height, density, gravity or surface pressure) and the singularity
//! where drag equals the buoyant term propagate `inf`/`nan` unchanged.

use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_MODEL_DRAG_COEFFICIENT, DEFAULT_SAMPLE_COUNT, MAX_VELOCITY,
};
use crate::units::{Environment, FRESH_WATER};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuoyancyParameters {
    pub weight: f64, // Diver body weight, in kg.
    pub equip_weight: f64, // Equipment weight, in kg.
    pub height: f64, // Diver height, in metres. Used as a length scale.
    pub depth: f64, // Reference depth, in metres.
    pub p0: f64,
    pub density: f64,
    pub gravity: f64,
    pub drag_coefficient: f64,
}

impl BuoyancyParameters {
    /// Fresh water at standard pressure with the model's own drag default.
    pub fn new(weight: f64, equip_weight: f64, height: f64, depth: f64) -> Self {
        Self::with_environment(weight, equip_weight, height, depth, FRESH_WATER)
    }

    pub fn with_environment(
        weight: f64,
        equip_weight: f64,
        height: f64,
        depth: f64,
        environment: Environment,
    ) -> Self {
        Self {
            weight,
            equip_weight,
            height,
            depth,
            p0: environment.p0,
            density: environment.density,
            gravity: environment.gravity,
            drag_coefficient: DEFAULT_MODEL_DRAG_COEFFICIENT,
        }
    }

    pub fn drag_coefficient(self, drag_coefficient: f64) -> Self {
        Self {
            drag_coefficient,
            ..self
        }
    }

    pub fn environment(&self) -> Environment {
        Environment {
            p0: self.p0,
            density: self.density,
            gravity: self.gravity,
        }
    }
}

/// Quantities derived once per evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Intermediates {
    pub body_volume: f64, // V0, incompressible body volume in m³.
    pub frontal_area: f64, // A, in m².
    pub equipment_volume: f64, // V1, compressible equipment term.
    pub pressure: f64, // p, absolute pressure at the reference depth.
    pub buoyant_force: f64, // fb, in newtons.
}

impl Intermediates {
    pub fn from_parameters(params: &BuoyancyParameters) -> Self {
        let env = params.environment();
        let body_volume = params.weight / params.density;
        let frontal_area = body_volume / params.height;
        let equipment_volume = (params.depth + env.pressure_head(params.p0))
            * params.equip_weight
            * params.gravity
            / params.p0;
        let pressure = env.absolute_pressure(params.depth);
        let buoyant_force = env.specific_weight() * equipment_volume;

        Self {
            body_volume,
            frontal_area,
            equipment_volume,
            pressure,
            buoyant_force,
        }
    }
}

/// Quadratic drag, `0.5 * Cd * rho * A * v^2`, in newtons.
pub fn drag_force(drag_coefficient: f64, density: f64, frontal_area: f64, velocity: f64) -> f64 {
    0.5 * drag_coefficient * density * frontal_area * velocity.powi(2)
}

/// `count` evenly spaced samples over `[start, end]`; the last one is `end` exactly.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut samples: Vec<f64> = (0..count - 1)
                .map(|i| start + i as f64 * step)
                .collect();
            samples.push(end);
            samples
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuoyancyCurve {
    pub velocities: Vec<f64>,
    pub descent_depths: Vec<f64>,
    pub ascent_depths: Vec<f64>,
}

impl BuoyancyCurve {
    pub fn len(&self) -> usize {
        self.velocities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.velocities.is_empty()
    }

    // (velocity, descent, ascent) in ascending velocity order.
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.velocities
            .iter()
            .zip(&self.descent_depths)
            .zip(&self.ascent_depths)
            .map(|((&v, &d), &a)| (v, d, a))
    }
}

pub fn compute(params: &BuoyancyParameters) -> BuoyancyCurve {
    compute_with_samples(params, DEFAULT_SAMPLE_COUNT)
}

pub fn compute_with_samples(params: &BuoyancyParameters, sample_count: usize) -> BuoyancyCurve {
    let derived = Intermediates::from_parameters(params);
    log::debug!("Buoyancy intermediates: {:?}", derived);

    let depth = params.depth;
    let p = derived.pressure;
    let head = p / params.density / params.gravity;
    // fb * p0 / p, the buoyant term brought back to surface pressure.
    let surface_buoyancy = derived.buoyant_force * params.p0 / p;

    let velocities = linspace(0.0, MAX_VELOCITY, sample_count);
    let mut descent_depths = Vec::with_capacity(velocities.len());
    let mut ascent_depths = Vec::with_capacity(velocities.len());
    for &v in &velocities {
        let drag = drag_force(
            params.drag_coefficient,
            params.density,
            derived.frontal_area,
            v,
        );
        descent_depths.push(depth + head * drag / (surface_buoyancy - drag));
        ascent_depths.push(depth + head * (-drag) / (surface_buoyancy + drag));
    }

    BuoyancyCurve {
        velocities,
        descent_depths,
        ascent_depths,
    }
}
