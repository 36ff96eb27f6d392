use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub p0: f64, // Surface (atmospheric) pressure, in pascal.
    pub density: f64, // Fluid density, in kg/m³.
    pub gravity: f64, // Gravitational acceleration, in m/s².
}

impl Environment {
    // Weight of one metre of fluid column over one square metre, in Pa/m.
    pub fn specific_weight(&self) -> f64 {
        self.density * self.gravity
    }

    pub fn absolute_pressure(&self, depth: f64) -> f64 {
        self.p0 + self.density * self.gravity * depth
    }

    // Height of fluid column that exerts `pressure`, in metres.
    pub fn pressure_head(&self, pressure: f64) -> f64 {
        pressure / (self.density * self.gravity)
    }

    /// Named presets accepted on the command line.
    pub fn preset(name: &str) -> Option<Environment> {
        match name {
            "fresh" => Some(FRESH_WATER),
            "sea" => Some(SEA_WATER),
            _ => None,
        }
    }
}

pub const FRESH_WATER: Environment = Environment {
    p0: 101_325.0,
    density: 1000.0,
    gravity: 9.8,
};

pub const SEA_WATER: Environment = Environment {
    p0: 101_325.0,
    density: 1025.0,
    gravity: 9.8,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_pressure_is_atmospheric() {
        assert_eq!(FRESH_WATER.absolute_pressure(0.0), 101_325.0);
    }

    #[test]
    fn ten_metres_of_fresh_water_adds_98_kilopascal() {
        assert_eq!(FRESH_WATER.absolute_pressure(10.0), 199_325.0);
    }

    #[test]
    fn atmosphere_is_about_ten_metres_of_water() {
        let head = FRESH_WATER.pressure_head(FRESH_WATER.p0);
        assert!((head - 10.339_285_714_285_714).abs() < 1e-12, "head={head}");
    }

    #[test]
    fn sea_water_is_heavier() {
        assert!(SEA_WATER.absolute_pressure(10.0) > FRESH_WATER.absolute_pressure(10.0));
        assert!(SEA_WATER.pressure_head(SEA_WATER.p0) < FRESH_WATER.pressure_head(FRESH_WATER.p0));
    }

    #[test]
    fn zero_gravity_yields_infinite_head() {
        let env = Environment {
            gravity: 0.0,
            ..FRESH_WATER
        };
        assert!(env.pressure_head(env.p0).is_infinite());
    }

    #[test]
    fn presets_by_name() {
        assert_eq!(Environment::preset("fresh"), Some(FRESH_WATER));
        assert_eq!(Environment::preset("sea"), Some(SEA_WATER));
        assert_eq!(Environment::preset("brackish"), None);
    }
}
