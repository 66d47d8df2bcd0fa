pub mod chunk_files;
pub mod cotrend;
pub mod data_cleaner;
pub mod fits_access;
pub mod mask;
pub mod text_table;

use crate::error::{LcError, Result};

/// Kepler mission time is BJD minus this offset.
pub const KEPLER_BJD_OFFSET: f64 = 2454833.0;

/// Brightness measurements as three index-aligned columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightCurve {
    time: Vec<f64>,
    value: Vec<f64>,
    error: Vec<f64>,
}

impl LightCurve {
    pub fn new(time: Vec<f64>, value: Vec<f64>, error: Vec<f64>) -> Result<LightCurve> {
        if time.len() != value.len() || time.len() != error.len() {
            return Err(LcError::LengthMismatch {
                time: time.len(),
                value: value.len(),
                error: error.len(),
            });
        }
        Ok(LightCurve { time, value, error })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn value(&self) -> &[f64] {
        &self.value
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.time
            .iter()
            .zip(&self.value)
            .zip(&self.error)
            .map(|((&t, &v), &e)| (t, v, e))
    }

    /// New light curve holding the given rows, in the given order.
    pub fn select(&self, indices: &[usize]) -> LightCurve {
        LightCurve {
            time: indices.iter().map(|&i| self.time[i]).collect(),
            value: indices.iter().map(|&i| self.value[i]).collect(),
            error: indices.iter().map(|&i| self.error[i]).collect(),
        }
    }
}
