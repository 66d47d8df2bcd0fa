use log::{debug, warn};
use serde::Deserialize;

use crate::data_access::fits_access::Quarter;
use crate::data_access::mask::{is_masked, MaskInterval};
use crate::statistical_methods::statistics::{mean, median};

/// Drop every row that has a NaN in any column, and rows with a non-zero
/// quality flag when `require_zero_quality` is set. Rows come back in time
/// order.
pub fn clean_quarter(quarter: Quarter, require_zero_quality: bool) -> Quarter {
    let q = &quarter;
    let mut good: Vec<usize> = (0..q.len())
        .filter(|&i| {
            !q.time[i].is_nan()
                && !q.sap_flux[i].is_nan()
                && !q.sap_flux_err[i].is_nan()
                && !q.cbv_flux[i].is_nan()
                && !q.cbv_model[i].is_nan()
                && (!require_zero_quality || q.quality[i] == 0)
        })
        .collect();
    good.sort_by(|&a, &b| q.time[a].total_cmp(&q.time[b]));

    debug!(
        "quarter {:?}: kept {} of {} rows",
        q.number,
        good.len(),
        q.len()
    );
    let pick = |col: &[f64]| -> Vec<f64> { good.iter().map(|&i| col[i]).collect() };
    Quarter {
        number: q.number,
        kepmag: q.kepmag,
        time: pick(&q.time),
        sap_flux: pick(&q.sap_flux),
        sap_flux_err: pick(&q.sap_flux_err),
        cbv_flux: pick(&q.cbv_flux),
        cbv_model: pick(&q.cbv_model),
        quality: good.iter().map(|&i| q.quality[i]).collect(),
    }
}

/// Common level that every segment is shifted to.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Median,
    Mean,
}

/// Shift each segment so that its median sits on the common level.
///
/// Returns the level, or `None` when there is no finite data at all (the
/// segments are then left untouched).
pub fn normalize_levels(segments: &mut [Vec<f64>], level: Level) -> Option<f64> {
    let pooled: Vec<f64> = segments.iter().flatten().copied().collect();
    let target = match level {
        Level::Median => median(&pooled)?,
        Level::Mean => mean(&pooled)?,
    };

    for seg in segments.iter_mut() {
        let Some(med) = median(seg) else { continue };
        let shift = target - med;
        for f in seg.iter_mut() {
            *f += shift;
        }
    }
    Some(target)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineupOptions {
    /// Boundary jumps at or below this are left alone.
    pub threshold: f64,
    pub max_iterations: usize,
}

impl Default for LineupOptions {
    fn default() -> Self {
        LineupOptions {
            threshold: 100.0,
            max_iterations: 10_000,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineupReport {
    pub iterations: usize,
    pub converged: bool,
    pub largest_jump: f64,
}

fn last_unmasked(times: &[f64], masks: &[MaskInterval]) -> Option<usize> {
    times.iter().rposition(|&t| !is_masked(masks, t))
}

fn first_unmasked(times: &[f64], masks: &[MaskInterval]) -> Option<usize> {
    times.iter().position(|&t| !is_masked(masks, t))
}

/// Flux step across each boundary between consecutive segments, measured
/// between the last and first points that are not inside a mask. A boundary
/// with no usable point on one side counts as no step.
fn boundary_jumps(times: &[Vec<f64>], fluxes: &[Vec<f64>], masks: &[MaskInterval]) -> Vec<f64> {
    (0..times.len().saturating_sub(1))
        .map(|i| {
            match (
                last_unmasked(&times[i], masks),
                first_unmasked(&times[i + 1], masks),
            ) {
                (Some(end), Some(start)) => fluxes[i][end] - fluxes[i + 1][start],
                _ => 0.0,
            }
        })
        .collect()
}

fn largest(jumps: &[f64]) -> Option<(usize, f64)> {
    jumps
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
}

/// Line up consecutive segments so they meet at their boundaries.
///
/// The largest boundary jump is halved from both sides, shifting the whole
/// segment before it down and the one after it up, until no jump is above
/// the threshold or the iteration bound is reached.
pub fn lineup_gaps(
    times: &[Vec<f64>],
    fluxes: &mut [Vec<f64>],
    masks: &[MaskInterval],
    options: &LineupOptions,
) -> LineupReport {
    let mut jumps = boundary_jumps(times, fluxes, masks);
    let mut iterations = 0;

    while let Some((ind, jump)) = largest(&jumps) {
        if jump.abs() <= options.threshold || !jump.is_finite() {
            break;
        }
        if iterations == options.max_iterations {
            warn!(
                "gap alignment stopped after {} iterations with a {:.1} jump left",
                iterations,
                jump.abs()
            );
            return LineupReport {
                iterations,
                converged: false,
                largest_jump: jump.abs(),
            };
        }

        let half = jump / 2.0;
        fluxes[ind].iter_mut().for_each(|f| *f -= half);
        fluxes[ind + 1].iter_mut().for_each(|f| *f += half);
        jumps = boundary_jumps(times, fluxes, masks);
        iterations += 1;
    }

    let largest_jump = largest(&jumps).map_or(0.0, |(_, j)| j.abs());
    debug!("gaps lined up after {iterations} iterations, largest jump {largest_jump:.3}");
    LineupReport {
        iterations,
        converged: true,
        largest_jump,
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    fn segment(start: f64, n: usize, level: f64) -> (Vec<f64>, Vec<f64>) {
        let t: Vec<f64> = (0..n).map(|i| start + i as f64 * 0.02).collect();
        let f: Vec<f64> = (0..n).map(|i| level + (i % 5) as f64).collect();
        (t, f)
    }

    #[test]
    fn cleaning_drops_nan_rows_and_sorts() {
        let q = Quarter {
            number: Some(1),
            kepmag: 9.3,
            time: vec![3.0, 1.0, f64::NAN, 2.0, 4.0],
            sap_flux: vec![30.0, 10.0, 99.0, 20.0, f64::NAN],
            sap_flux_err: vec![1.0; 5],
            cbv_flux: vec![31.0, 11.0, 99.0, 21.0, 41.0],
            cbv_model: vec![0.0; 5],
            quality: vec![0, 0, 0, 16, 0],
        };

        let all = clean_quarter(q.clone(), false);
        assert_eq!(all.time, vec![1.0, 2.0, 3.0]);
        assert_eq!(all.sap_flux, vec![10.0, 20.0, 30.0]);
        assert_eq!(all.cbv_flux, vec![11.0, 21.0, 31.0]);
        assert_eq!(all.quality, vec![0, 16, 0]);

        let flagged_out = clean_quarter(q, true);
        assert_eq!(flagged_out.time, vec![1.0, 3.0]);
    }

    #[test]
    fn normalization_moves_medians_and_keeps_counts() {
        let mut segments = vec![
            vec![100.0, 101.0, 102.0],
            vec![200.0, 205.0, 210.0, 215.0],
            vec![150.0],
        ];
        let counts: Vec<usize> = segments.iter().map(Vec::len).collect();
        let target = normalize_levels(&mut segments, Level::Median).unwrap();

        // pooled: 100 101 102 150 200 205 210 215 -> median (150 + 200) / 2
        assert_eq!(target, 175.0);
        assert_eq!(segments.iter().map(Vec::len).collect::<Vec<_>>(), counts);
        for seg in &segments {
            assert!((median(seg).unwrap() - target).abs() < 1e-9);
        }
        assert_eq!(segments[0], vec![174.0, 175.0, 176.0]);
    }

    #[test]
    fn normalization_to_mean() {
        let mut segments = vec![vec![0.0, 2.0], vec![10.0, 12.0]];
        let target = normalize_levels(&mut segments, Level::Mean).unwrap();
        assert_eq!(target, 6.0);
        assert_eq!(segments, vec![vec![5.0, 7.0], vec![5.0, 7.0]]);
    }

    #[test]
    fn normalization_of_nothing() {
        let mut segments: Vec<Vec<f64>> = vec![vec![], vec![f64::NAN]];
        assert_eq!(normalize_levels(&mut segments, Level::Median), None);
    }

    #[test]
    fn lineup_closes_large_jumps() {
        let (t0, f0) = segment(0.0, 50, 1000.0);
        let (t1, f1) = segment(10.0, 50, 1800.0);
        let (t2, f2) = segment(20.0, 50, 900.0);
        let times = vec![t0, t1, t2];
        let mut fluxes = vec![f0, f1, f2];
        let opts = LineupOptions::default();

        let report = lineup_gaps(&times, &mut fluxes, &[], &opts);
        assert!(report.converged);
        assert!(report.iterations > 0);
        for jump in boundary_jumps(&times, &fluxes, &[]) {
            assert!(jump.abs() <= opts.threshold);
        }
        assert!(fluxes.iter().all(|f| f.len() == 50));
    }

    #[test]
    fn small_jumps_are_left_alone() {
        let (t0, f0) = segment(0.0, 10, 1000.0);
        let (t1, f1) = segment(10.0, 10, 1050.0);
        let times = vec![t0, t1];
        let mut fluxes = vec![f0.clone(), f1.clone()];

        let report = lineup_gaps(&times, &mut fluxes, &[], &LineupOptions::default());
        assert_eq!(report.iterations, 0);
        assert_eq!(fluxes, vec![f0, f1]);
    }

    #[test]
    fn masked_points_are_skipped_at_boundaries() {
        // segment 0 ends inside an eclipse that dips to 0
        let times = vec![vec![0.0, 1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let mut fluxes = vec![vec![1000.0, 1000.0, 0.0, 0.0], vec![1000.0, 1000.0, 1000.0]];
        let masks = [MaskInterval { start: 1.5, end: 3.5 }];

        let report = lineup_gaps(&times, &mut fluxes, &masks, &LineupOptions::default());
        assert_eq!(report.iterations, 0);
        assert_eq!(fluxes[1], vec![1000.0, 1000.0, 1000.0]);

        let unmasked = lineup_gaps(&times, &mut fluxes, &[], &LineupOptions::default());
        assert!(unmasked.iterations > 0);
    }

    #[test]
    fn iteration_bound_stops_the_loop() {
        let times = vec![vec![0.0], vec![1.0], vec![2.0]];
        let mut fluxes = vec![vec![0.0], vec![5000.0], vec![0.0]];
        let opts = LineupOptions {
            threshold: 1.0,
            max_iterations: 2,
        };
        let report = lineup_gaps(&times, &mut fluxes, &[], &opts);
        assert!(!report.converged);
        assert_eq!(report.iterations, 2);
        assert!((report.largest_jump - 1250.0).abs() < 1e-9);
    }
}
