use crate::error::{LcError, Result};
use crate::statistical_methods::statistics::{median, polyfit};

/// Converts a relative flux error into a magnitude error, 2.5 / ln(10).
pub const MAG_ERR_FACTOR: f64 = 1.0857;

/// Instrumental magnitudes pinned so their median equals `kepmag`, with
/// the matching magnitude errors.
pub fn to_magnitudes(flux: &[f64], flux_err: &[f64], kepmag: f64) -> (Vec<f64>, Vec<f64>) {
    let raw: Vec<f64> = flux.iter().map(|f| -2.5 * f.log10()).collect();
    let zero_point = median(&raw).map_or(0.0, |m| kepmag - m);
    let mag = raw.iter().map(|m| m + zero_point).collect();
    let mag_err = flux_err
        .iter()
        .zip(flux)
        .map(|(e, f)| MAG_ERR_FACTOR * e / f)
        .collect();
    (mag, mag_err)
}

/// Divide out a long-term polynomial trend, keeping the overall flux level.
pub fn long_detrend(time: &[f64], flux: &[f64], order: usize) -> Result<Vec<f64>> {
    let fit = polyfit(time, flux, order).ok_or(LcError::SingularFit { order })?;
    let level = median(flux).unwrap_or(1.0);
    Ok(time
        .iter()
        .zip(flux)
        .map(|(&t, &f)| f / fit.eval(t) * level)
        .collect())
}
