use std::ops::Range;

use log::debug;

use crate::data_access::LightCurve;
use crate::error::{LcError, Result};
use crate::folding::phase::Ephemeris;

/// Phase range covered by one chunk, `phasemin < 1 < phasemax`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EclipseWindow {
    pub phasemin: f64,
    pub phasemax: f64,
}

impl EclipseWindow {
    fn width(&self) -> f64 {
        self.phasemax - self.phasemin
    }
}

/// Index ranges of consecutive observations, one per orbital cycle.
///
/// A new range starts when the cycle number changes or the phase drops
/// below its predecessor. The cycle check catches gaps longer than a whole
/// period, where the phase can keep rising. The ranges cover every index
/// exactly once.
pub fn split_on_cycles(phases: &[f64], cycles: &[i64]) -> Vec<Range<usize>> {
    let mut groups: Vec<Range<usize>> = Vec::new();
    if phases.is_empty() {
        return groups;
    }

    let mut start = 0;
    for i in 1..phases.len() {
        if phases[i] < phases[i - 1] || cycles[i] != cycles[i - 1] {
            groups.push(start..i);
            start = i;
        }
    }
    groups.push(start..phases.len());
    groups
}

/// Cut a time-ordered light curve into chunks that each hold one primary
/// and one secondary eclipse.
///
/// Points are folded on an ephemeris moved forward by `window.phasemin`, so
/// every window cycle starts at shifted phase 0. Anything past
/// `window.phasemax` is left out, unless the window is a whole cycle wide.
pub fn window_chunks(
    lc: &LightCurve,
    ephemeris: &Ephemeris,
    window: &EclipseWindow,
    max_chunks: usize,
) -> Result<Vec<LightCurve>> {
    let period = ephemeris.period();
    let from_phasemin = Ephemeris::new(period, ephemeris.epoch() + window.phasemin * period);
    let shifted = from_phasemin.phases(lc.time());
    let cycles: Vec<i64> = lc.time().iter().map(|&t| from_phasemin.cycle(t)).collect();

    let width = window.width();
    let full_cycle = width >= 1.0 - 1e-9;
    let mut chunks = Vec::new();
    for group in split_on_cycles(&shifted, &cycles) {
        let keep: Vec<usize> = group
            .filter(|&i| full_cycle || shifted[i] < width)
            .collect();
        if keep.is_empty() {
            continue;
        }
        chunks.push(lc.select(&keep));
    }

    if chunks.len() > max_chunks {
        return Err(LcError::TooManyChunks {
            found: chunks.len(),
            limit: max_chunks,
        });
    }
    debug!(
        "{} points split into {} chunks ({} outside the window)",
        lc.len(),
        chunks.len(),
        lc.len() - chunks.iter().map(LightCurve::len).sum::<usize>()
    );
    Ok(chunks)
}
