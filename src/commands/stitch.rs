use log::{info, warn};

use crate::config::Config;
use crate::data_access::cotrend::Cotrender;
use crate::data_access::data_cleaner::{clean_quarter, lineup_gaps, normalize_levels, LineupReport};
use crate::data_access::fits_access::{find_quarter_files, load_kepler_quarter, read_quarter_number, Quarter};
use crate::data_access::mask::read_mask_file;
use crate::data_access::text_table::{write_table, STITCHED_HEADER};
use crate::error::Result;
use crate::plotting::stitched::{plot_stitched, StitchedSeries};
use crate::statistical_methods::photometry::{long_detrend, to_magnitudes};
use crate::statistical_methods::statistics::mean;

#[derive(Debug, Clone, PartialEq)]
pub struct StitchReport {
    pub quarters: usize,
    pub points: usize,
    pub kepmag: f64,
    pub sap_lineup: LineupReport,
    pub cbv_lineup: LineupReport,
}

fn column(quarters: &[Quarter], pick: impl Fn(&Quarter) -> &Vec<f64>) -> Vec<Vec<f64>> {
    quarters.iter().map(|q| pick(q).clone()).collect()
}

/// Build one light curve out of every quarter in the light curve directory.
///
/// Both the raw (SAP) and the cotrended (CBV) flux are cleaned, put on a
/// common level and lined up across the quarter gaps, then converted to
/// magnitudes and written next to each other.
pub fn run(config: &Config) -> Result<StitchReport> {
    let cfg = &config.stitch;

    let mask_path = cfg.mask_path();
    let masks = read_mask_file(&mask_path)?;
    let cotrender = Cotrender::new(
        &cfg.cotrend,
        &cfg.cbv_dir,
        masks.as_ref().map(|_| mask_path.as_path()),
    );

    let files = find_quarter_files(&cfg.lightcurve_dir)?;
    let mut quarters = Vec::with_capacity(files.len());
    for (index, file) in files.iter().enumerate() {
        let cotrended = file.cotrended_path();
        let path = if cotrended.exists() {
            cotrended
        } else {
            let number = read_quarter_number(&file.path)?.unwrap_or(index as i64);
            cotrender.ensure_cotrended(file, number)?
        };
        quarters.push(load_kepler_quarter(&path)?);
    }

    let quarter_starts: Vec<f64> = quarters
        .iter()
        .filter_map(|q| q.time.iter().copied().find(|t| t.is_finite()))
        .collect();

    let quarters: Vec<Quarter> = quarters
        .into_iter()
        .map(|q| clean_quarter(q, cfg.require_zero_quality))
        .filter(|q| {
            if q.is_empty() {
                warn!("Quarter {:?} has no usable points, leaving it out", q.number);
            }
            !q.is_empty()
        })
        .collect();

    let times = column(&quarters, |q| &q.time);
    let mut sap = column(&quarters, |q| &q.sap_flux);
    let mut cbv = column(&quarters, |q| &q.cbv_flux);
    normalize_levels(&mut sap, cfg.level);
    normalize_levels(&mut cbv, cfg.level);

    let masks = masks.unwrap_or_default();
    let options = cfg.lineup_options();
    let sap_lineup = lineup_gaps(&times, &mut sap, &masks, &options);
    let cbv_lineup = lineup_gaps(&times, &mut cbv, &masks, &options);

    let time_all = times.concat();
    let mut sap_all = sap.concat();
    let mut cbv_all = cbv.concat();
    let err_all = column(&quarters, |q| &q.sap_flux_err).concat();
    let model_all = column(&quarters, |q| &q.cbv_model).concat();

    if let Some(order) = cfg.detrend_order {
        info!("Removing an order {order} polynomial trend");
        sap_all = long_detrend(&time_all, &sap_all, order)?;
        cbv_all = long_detrend(&time_all, &cbv_all, order)?;
    }

    let kepmags: Vec<f64> = quarters.iter().map(|q| q.kepmag).collect();
    let kepmag = mean(&kepmags).unwrap_or(0.0);
    let (sap_mag, sap_mag_err) = to_magnitudes(&sap_all, &err_all, kepmag);
    let (cbv_mag, _) = to_magnitudes(&cbv_all, &err_all, kepmag);

    write_table(
        &cfg.outfile,
        STITCHED_HEADER,
        &[
            &time_all,
            &sap_all,
            &err_all,
            &sap_mag,
            &sap_mag_err,
            &cbv_all,
            &cbv_mag,
            &model_all,
        ],
    )?;
    info!(
        "Wrote {} points from {} quarters to {}",
        time_all.len(),
        quarters.len(),
        cfg.outfile.display()
    );

    plot_stitched(
        &cfg.plot_file,
        &StitchedSeries {
            time: &time_all,
            sap_mag: &sap_mag,
            cbv_mag: &cbv_mag,
            quarter_starts: &quarter_starts,
        },
        &cfg.plot_axes,
        cfg.cbv_plot_offset,
    )?;

    Ok(StitchReport {
        quarters: quarters.len(),
        points: time_all.len(),
        kepmag,
        sap_lineup,
        cbv_lineup,
    })
}
