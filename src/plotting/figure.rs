use std::path::Path;

use plotters::prelude::*;

use crate::config::{Axes, FigureConfig};
use crate::data_access::LightCurve;
use crate::error::Result;
use crate::folding::phase::{phase_doubles, Ephemeris};
use crate::plotting::{chart_on, scatter, vertical_line, Area, Frame, DARK_RED};

fn panel(area: &Area<'_>, axes: Axes, x: &[f64], mag: &[f64], x_desc: &str, guides: &[f64]) -> Result<()> {
    let frame = Frame::new(&axes);
    let mut chart = chart_on(area, &frame, x_desc, "Kepler Magnitude")?;
    for &g in guides {
        vertical_line(&mut chart, &frame, g)?;
    }
    scatter(&mut chart, &frame.points(x, mag, 0.0), DARK_RED)
}

/// Publication figure: the whole light curve on top, the folded light
/// curve over two cycles in the middle, and zooms on the secondary and
/// primary eclipses side by side at the bottom.
pub fn plot_figure(path: &Path, lc: &LightCurve, ephemeris: &Ephemeris, cfg: &FigureConfig) -> Result<()> {
    let root = SVGBackend::new(path, (1200, 1200)).into_drawing_area();
    root.fill(&WHITE)?;

    let rows = root.split_evenly((3, 1));
    let zooms = rows[2].split_evenly((1, 2));

    let mags = |x_min: f64, x_max: f64| Axes {
        x_min,
        x_max,
        y_bottom: cfg.mag_dim,
        y_top: cfg.mag_bright,
    };

    panel(
        &rows[0],
        mags(cfg.time_range[0], cfg.time_range[1]),
        lc.time(),
        lc.value(),
        "Time (BJD - 2454833)",
        &[],
    )?;

    let phases = ephemeris.phases(lc.time());
    let doubled_phases = phase_doubles(&phases);
    let doubled_mags: Vec<f64> = lc.value().iter().chain(lc.value()).copied().collect();

    panel(
        &rows[1],
        mags(0.0, 2.0),
        &doubled_phases,
        &doubled_mags,
        "Orbital Phase",
        &[0.5, 1.5],
    )?;

    let [sec_min, sec_max] = cfg.secondary_phase;
    panel(
        &zooms[0],
        mags(sec_min, sec_max),
        &doubled_phases,
        &doubled_mags,
        "Secondary Eclipse",
        &[],
    )?;

    let [pri_min, pri_max] = cfg.primary_phase;
    panel(
        &zooms[1],
        mags(pri_min, pri_max),
        &doubled_phases,
        &doubled_mags,
        "Primary Eclipse",
        &[],
    )?;

    root.present()?;
    Ok(())
}
