//! The three temperature regimes of the Thornthwaite estimate.
//!
//! Each regime is a mask over the hottest-month grid; the masks are disjoint
//! and together cover every non-NaN temperature. They are applied in sequence
//! onto a NaN-initialized grid, so NaN temperatures stay NaN. `-inf` is
//! freezing (PET 0) and `+inf` falls in the high-temperature regime, whose
//! polynomial evaluates to NaN there.

use ndarray::{Array2, ArrayView2, Zip};

/// Temperature (°C) from which the high-temperature formula applies.
pub const HIGH_TEMPERATURE_THRESHOLD: f64 = 26.5;

/// Regime of a single hottest-month temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// `T ≥ 26.5`
    HighTemperature,
    /// `0 < T < 26.5`
    Standard,
    /// `T ≤ 0`
    Freezing,
}

impl Regime {
    /// Regime of `t`, or `None` when `t` is NaN.
    pub fn of(t: f64) -> Option<Self> {
        if t.is_nan() {
            None
        } else if t >= HIGH_TEMPERATURE_THRESHOLD {
            Some(Regime::HighTemperature)
        } else if t > 0.0 {
            Some(Regime::Standard)
        } else {
            Some(Regime::Freezing)
        }
    }
}

/// `PET = −415.85 + 32.24·T − 0.43·T²` (mm/month).
pub fn high_temperature_pet(t: f64) -> f64 {
    -415.85 + 32.24 * t - 0.43 * t * t
}

/// `PET = 16·(10·T / I)^α` (mm/month).
pub fn standard_pet(t: f64, heat_index: f64, alpha: f64) -> f64 {
    16.0 * (10.0 * t / heat_index).powf(alpha)
}

/// Unadjusted PET for the hottest-month temperatures `t_hot`.
pub fn raw_pet(
    t_hot: ArrayView2<f32>,
    heat_index: ArrayView2<f64>,
    alpha: ArrayView2<f64>,
) -> Array2<f64> {
    let mut pet = Array2::<f64>::from_elem(t_hot.dim(), f64::NAN);

    let high = regime_mask(t_hot, Regime::HighTemperature);
    let standard = regime_mask(t_hot, Regime::Standard);
    let freezing = regime_mask(t_hot, Regime::Freezing);

    Zip::from(&mut pet)
        .and(&high)
        .and(&t_hot)
        .for_each(|p, &m, &t| {
            if m {
                *p = high_temperature_pet(t as f64);
            }
        });

    Zip::from(&mut pet)
        .and(&standard)
        .and(&t_hot)
        .and(&heat_index)
        .and(&alpha)
        .for_each(|p, &m, &t, &i, &a| {
            if m {
                *p = standard_pet(t as f64, i, a);
            }
        });

    Zip::from(&mut pet).and(&freezing).for_each(|p, &m| {
        if m {
            *p = 0.0;
        }
    });

    pet
}

fn regime_mask(t_hot: ArrayView2<f32>, regime: Regime) -> Array2<bool> {
    t_hot.mapv(|t| Regime::of(t as f64) == Some(regime))
}
