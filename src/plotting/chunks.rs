use std::path::Path;

use plotters::prelude::*;

use crate::config::Axes;
use crate::data_access::LightCurve;
use crate::error::Result;
use crate::folding::phase::{phase_doubles, Ephemeris};
use crate::plotting::{chart_on, scatter, Frame};

/// Every chunk folded over two cycles, each one `offset` magnitudes above
/// the previous so they stack up the page.
pub fn plot_chunks(
    path: &Path,
    chunks: &[LightCurve],
    ephemeris: &Ephemeris,
    axes: &Axes,
    offset: f64,
) -> Result<()> {
    let root = SVGBackend::new(path, (1000, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let frame = Frame::new(axes);
    let mut chart = chart_on(&root, &frame, "Orbital Phase", "Kepler Magnitude")?;

    for (i, chunk) in chunks.iter().enumerate() {
        let phases = phase_doubles(&ephemeris.phases(chunk.time()));
        let mags: Vec<f64> = chunk.value().iter().chain(chunk.value()).copied().collect();
        let points = frame.points(&phases, &mags, i as f64 * offset);
        scatter(&mut chart, &points, RED)?;
    }

    root.present()?;
    Ok(())
}
