//! Text-field input for the calibrator and the validation gate in front of
//! the model.

use crate::config::FormDefaults;
use crate::error::InputError;
use crate::model::{self, BuoyancyCurve, BuoyancyParameters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Weight,
    Height,
    Depth,
    EquipWeight,
    Density,
    Gravity,
    DragCoefficient,
    P0,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Weight,
        Field::Height,
        Field::Depth,
        Field::EquipWeight,
        Field::Density,
        Field::Gravity,
        Field::DragCoefficient,
        Field::P0,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Weight => "weight",
            Field::Height => "height",
            Field::Depth => "depth",
            Field::EquipWeight => "equip_weight",
            Field::Density => "density",
            Field::Gravity => "gravity",
            Field::DragCoefficient => "drag_coefficient",
            Field::P0 => "p0",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Weight => "Weight (kg)",
            Field::Height => "Height (m)",
            Field::Depth => "Neutral Buoyancy Depth (m)",
            Field::EquipWeight => "Equipment Weight (kg)",
            Field::Density => "Density (kg/m³)",
            Field::Gravity => "Gravity (m/s²)",
            Field::DragCoefficient => "Drag Coefficient",
            Field::P0 => "Atmospheric Pressure (Pa)",
        }
    }

    // Command line spelling, e.g. `--equip-weight`.
    pub fn flag(self) -> &'static str {
        match self {
            Field::Weight => "--weight",
            Field::Height => "--height",
            Field::Depth => "--depth",
            Field::EquipWeight => "--equip-weight",
            Field::Density => "--density",
            Field::Gravity => "--gravity",
            Field::DragCoefficient => "--drag",
            Field::P0 => "--p0",
        }
    }

    pub fn from_flag(flag: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.flag() == flag)
    }

    pub fn is_required(self) -> bool {
        matches!(self, Field::Weight | Field::Height)
    }

    // Tab order, wrapping at both ends.
    pub fn next(self) -> Field {
        Field::ALL[(self.index() + 1) % Field::ALL.len()]
    }

    pub fn previous(self) -> Field {
        Field::ALL[(self.index() + Field::ALL.len() - 1) % Field::ALL.len()]
    }

    /// `None` for required fields.
    pub fn default_value(self, defaults: &FormDefaults) -> Option<f64> {
        match self {
            Field::Weight | Field::Height => None,
            Field::Depth => Some(defaults.depth),
            Field::EquipWeight => Some(defaults.equip_weight),
            Field::Density => Some(defaults.density),
            Field::Gravity => Some(defaults.gravity),
            Field::DragCoefficient => Some(defaults.drag_coefficient),
            Field::P0 => Some(defaults.p0),
        }
    }
}

/// Accepts what a decimal float literal allows, including `_` between digits.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let bytes = text.as_bytes();
    for (i, &byte) in bytes.iter().enumerate() {
        if byte != b'_' {
            continue;
        }
        let before = i > 0 && bytes[i - 1].is_ascii_digit();
        let after = bytes.get(i + 1).map_or(false, u8::is_ascii_digit);
        if !before || !after {
            return None;
        }
    }
    text.replace('_', "").parse().ok()
}

/// Parameters and curve of a successful plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    pub parameters: BuoyancyParameters,
    pub curve: BuoyancyCurve,
}

#[derive(Debug, Clone)]
pub struct CalibratorForm {
    defaults: FormDefaults,
    values: [String; 8],
    plot: Option<Plot>,
}

impl Default for CalibratorForm {
    fn default() -> Self {
        Self::new(FormDefaults::default())
    }
}

impl CalibratorForm {
    pub fn new(defaults: FormDefaults) -> Self {
        let mut form = Self {
            defaults,
            values: Default::default(),
            plot: None,
        };
        form.fill_defaults();
        form
    }

    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: Field, text: impl Into<String>) {
        self.values[field.index()] = text.into();
    }

    pub fn push_char(&mut self, field: Field, c: char) {
        self.values[field.index()].push(c);
    }

    pub fn pop_char(&mut self, field: Field) {
        self.values[field.index()].pop();
    }

    /// The curve from the last successful plot, if it has not been cleared.
    pub fn chart(&self) -> Option<&BuoyancyCurve> {
        self.plot.as_ref().map(|plot| &plot.curve)
    }

    pub fn parse(&self) -> Result<BuoyancyParameters, InputError> {
        Ok(BuoyancyParameters {
            weight: self.parse_field(Field::Weight)?,
            height: self.parse_field(Field::Height)?,
            depth: self.parse_field(Field::Depth)?,
            density: self.parse_field(Field::Density)?,
            gravity: self.parse_field(Field::Gravity)?,
            drag_coefficient: self.parse_field(Field::DragCoefficient)?,
            p0: self.parse_field(Field::P0)?,
            equip_weight: self.parse_field(Field::EquipWeight)?,
        })
    }

    /// Validate the fields and, only if every one is numeric, run the model.
    /// A rejected form keeps the previous chart.
    pub fn plot(&mut self) -> Result<&Plot, InputError> {
        let parameters = match self.parse() {
            Ok(parameters) => parameters,
            Err(err) => {
                log::warn!("Rejected calibrator input: {err}");
                return Err(err);
            }
        };
        log::debug!("Plotting with {:?}", parameters);
        let curve = model::compute(&parameters);
        Ok(self.plot.insert(Plot { parameters, curve }))
    }

    /// Empty every field, restore the documented defaults, discard the chart.
    pub fn clear(&mut self) {
        for value in self.values.iter_mut() {
            value.clear();
        }
        self.fill_defaults();
        self.plot = None;
    }

    fn fill_defaults(&mut self) {
        for field in Field::ALL {
            if let Some(value) = field.default_value(&self.defaults) {
                self.values[field.index()] = value.to_string();
            }
        }
    }

    fn parse_field(&self, field: Field) -> Result<f64, InputError> {
        let text = self.get(field);
        if text.is_empty() {
            if field.is_required() {
                return Err(InputError::Missing(field.name()));
            }
            return field
                .default_value(&self.defaults)
                .ok_or(InputError::Missing(field.name()));
        }
        parse_number(text).ok_or_else(|| InputError::NotANumber {
            field: field.name(),
            value: text.to_string(),
        })
    }
}
