pub mod chart;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod logging;
pub mod model;
pub mod units;

pub use config::FormDefaults;
pub use error::{InputError, USER_ERROR_MESSAGE};
pub use form::{CalibratorForm, Field, Plot};
pub use model::{compute, drag_force, BuoyancyCurve, BuoyancyParameters, Intermediates};
pub use units::Environment;
