pub mod chunks;
pub mod figure;
pub mod stitched;
pub mod twin;

use std::ops::Range;

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::Axes;
use crate::error::Result;

pub const DARK_RED: RGBColor = RGBColor(0xe3, 0x4a, 0x33);
pub const GRAY: RGBColor = RGBColor(0x80, 0x80, 0x80);
pub const LIGHT_GRAY: RGBColor = RGBColor(0xbf, 0xbf, 0xbf);

pub type Area<'b> = DrawingArea<SVGBackend<'b>, Shift>;
pub type Chart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Vertical axis that may run either way. Plotters wants increasing ranges,
/// so an inverted axis is drawn on negated values and labelled back.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VerticalAxis {
    sign: f64,
    lo: f64,
    hi: f64,
}

impl VerticalAxis {
    pub fn new(bottom: f64, top: f64) -> VerticalAxis {
        let sign = if bottom > top { -1.0 } else { 1.0 };
        VerticalAxis {
            sign,
            lo: sign * bottom,
            hi: sign * top,
        }
    }

    pub fn range(&self) -> Range<f64> {
        self.lo..self.hi
    }

    pub fn to_chart(&self, v: f64) -> f64 {
        self.sign * v
    }

    pub fn label(&self, v: &f64) -> String {
        format!("{:.2}", self.sign * v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub x: Range<f64>,
    pub y: VerticalAxis,
}

impl Frame {
    pub fn new(axes: &Axes) -> Frame {
        Frame {
            x: axes.x_min..axes.x_max,
            y: VerticalAxis::new(axes.y_bottom, axes.y_top),
        }
    }

    /// Chart coordinates of the points inside the frame; `y_shift` is
    /// subtracted from every value first.
    pub fn points(&self, x: &[f64], y: &[f64], y_shift: f64) -> Vec<(f64, f64)> {
        let y_range = self.y.range();
        x.iter()
            .zip(y)
            .map(|(&px, &py)| (px, self.y.to_chart(py - y_shift)))
            .filter(|(px, py)| self.x.contains(px) && y_range.contains(py))
            .collect()
    }
}

pub fn chart_on<'a, 'b>(
    area: &'a Area<'b>,
    frame: &Frame,
    x_desc: &str,
    y_desc: &str,
) -> Result<Chart<'a, 'b>> {
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(frame.x.clone(), frame.y.range())?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .y_label_formatter(&|v| frame.y.label(v))
        .draw()?;
    Ok(chart)
}

pub fn scatter(chart: &mut Chart<'_, '_>, points: &[(f64, f64)], color: RGBColor) -> Result<()> {
    chart.draw_series(points.iter().map(|&p| Circle::new(p, 1, color.filled())))?;
    Ok(())
}

/// Dotted-style guide line at a fixed x.
pub fn vertical_line(chart: &mut Chart<'_, '_>, frame: &Frame, x: f64) -> Result<()> {
    let y = frame.y.range();
    chart.draw_series(LineSeries::new(
        vec![(x, y.start), (x, y.end)],
        LIGHT_GRAY.stroke_width(1),
    ))?;
    Ok(())
}
