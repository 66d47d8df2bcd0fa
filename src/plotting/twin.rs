use std::path::Path;

use plotters::prelude::*;

use crate::error::Result;
use crate::plotting::{DARK_RED, GRAY};

/// Frequency and power of a smoothed oscillation spectrum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spectrum {
    pub freq: Vec<f64>,
    pub power: Vec<f64>,
}

/// Target spectrum filled up from the bottom axis, its seismic twin filled
/// down from the top one, sharing the frequency axis.
pub fn plot_twin(
    path: &Path,
    target: (&str, &Spectrum),
    twin: (&str, &Spectrum),
    freq_range: [f64; 2],
    power_max: f64,
) -> Result<()> {
    let root = SVGBackend::new(path, (1500, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_range = freq_range[0]..freq_range[1];
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(40)
        .top_x_label_area_size(40)
        .y_label_area_size(70)
        .right_y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), 0.0..power_max)?
        .set_secondary_coord(x_range.clone(), 0.0..power_max);

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Frequency (uHz)")
        .y_desc("Smoothed Power Density (ppm^2 / uHz)")
        .draw()?;
    chart
        .configure_secondary_axes()
        .y_label_formatter(&|v| format!("{:.0}", power_max - v))
        .draw()?;

    let in_band = |s: &Spectrum| -> Vec<(f64, f64)> {
        s.freq
            .iter()
            .zip(&s.power)
            .filter(|(f, p)| x_range.contains(*f) && p.is_finite())
            .map(|(&f, &p)| (f, p.clamp(0.0, power_max)))
            .collect()
    };

    let (twin_label, twin_spectrum) = twin;
    chart
        .draw_series(
            AreaSeries::new(
                in_band(twin_spectrum)
                    .into_iter()
                    .map(|(f, p)| (f, power_max - p)),
                power_max,
                GRAY.mix(0.9),
            )
            .border_style(GRAY),
        )?
        .label(twin_label)
        .legend(|(x, y)| Rectangle::new([(x, y - 4), (x + 12, y + 4)], GRAY.filled()));

    let (target_label, target_spectrum) = target;
    chart
        .draw_series(
            AreaSeries::new(in_band(target_spectrum), 0.0, DARK_RED.mix(0.9)).border_style(DARK_RED),
        )?
        .label(target_label)
        .legend(|(x, y)| Rectangle::new([(x, y - 4), (x + 12, y + 4)], DARK_RED.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
