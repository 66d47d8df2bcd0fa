use std::path::Path;

use plotters::prelude::*;

use crate::config::Axes;
use crate::error::Result;
use crate::plotting::{chart_on, vertical_line, Frame};

/// Stitched magnitudes, both photometry flavours, on a shared time axis.
pub struct StitchedSeries<'a> {
    pub time: &'a [f64],
    pub sap_mag: &'a [f64],
    pub cbv_mag: &'a [f64],
    pub quarter_starts: &'a [f64],
}

/// Cotrended magnitudes (shifted up by `cbv_offset`) over the raw ones,
/// with a guide line at the start of every quarter.
pub fn plot_stitched(path: &Path, series: &StitchedSeries<'_>, axes: &Axes, cbv_offset: f64) -> Result<()> {
    let root = SVGBackend::new(path, (1400, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let frame = Frame::new(axes);
    let mut chart = chart_on(&root, &frame, "Time (BJD - 2454833)", "Kepler Magnitude")?;

    for &start in series.quarter_starts {
        if frame.x.contains(&start) {
            vertical_line(&mut chart, &frame, start)?;
        }
    }

    let cbv = frame.points(series.time, series.cbv_mag, cbv_offset);
    chart
        .draw_series(cbv.iter().map(|&p| Circle::new(p, 1, BLACK.filled())))?
        .label("CBV mag (offset)")
        .legend(|(x, y)| Circle::new((x, y), 3, BLACK.filled()));

    let sap = frame.points(series.time, series.sap_mag, 0.0);
    chart
        .draw_series(sap.iter().map(|&p| Circle::new(p, 1, RED.filled())))?
        .label("SAP mag")
        .legend(|(x, y)| Circle::new((x, y), 3, RED.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
