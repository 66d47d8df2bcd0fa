use log::{info, warn};

use crate::config::Config;
use crate::data_access::text_table::{detect_columns, read_light_curve};
use crate::error::Result;
use crate::plotting::figure::plot_figure;

/// Draw the light curve overview figure for the stitched light curve.
pub fn run(config: &Config) -> Result<usize> {
    let cfg = &config.figure;
    let columns = match cfg.columns {
        Some(columns) => columns,
        None => detect_columns(&cfg.infile)?,
    };
    let lc = read_light_curve(&cfg.infile, columns)?;
    if lc.is_empty() {
        warn!("{} holds no points, the figure will be blank", cfg.infile.display());
    }
    plot_figure(&cfg.plot_file, &lc, &config.target.ephemeris(), cfg)?;
    info!("Plotted {} points to {}", lc.len(), cfg.plot_file.display());
    Ok(lc.len())
}
