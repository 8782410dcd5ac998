//! Thornthwaite (1948) potential evapotranspiration.
//!
//! From a monthly mean-temperature series the estimator picks the hottest
//! month, derives the annual heat index `I` and exponent `α`, evaluates the
//! three-regime PET formula for the hottest month and scales it by the
//! month's mean day length over 12 hours.
//!
//! ```text
//! MonthlyTemperatureSeries
//!      │
//!      ├─► hottest_month()  (spatial mean, first argmax)
//!      ├─► heat_index() ──► alpha_grid()
//!      │
//!      ▼
//! raw_pet(T_hot, I, α) × daylight(month) / 12 ──► PetGrid
//! ```

pub mod daylight;
pub mod estimator;
pub mod heat_index;
pub mod hottest;
pub mod regimes;

pub use daylight::monthly_mean_daylight_hours;
pub use estimator::{PetEstimator, PetGrid};
pub use heat_index::{alpha, heat_index};
pub use hottest::hottest_month;
pub use regimes::{high_temperature_pet, raw_pet, standard_pet, Regime};
