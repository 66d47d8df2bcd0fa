use nalgebra::{DMatrix, DVector};

pub fn median(data: &[f64]) -> Option<f64> {
    // NaNs would break the ordering, so only finite values count
    let mut v: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    if v.is_empty() {
        return None;
    }
    v.sort_by(|a, b| a.total_cmp(b));
    let mid = v.len() / 2;

    if v.len() % 2 == 0 {
        Some((v[mid - 1] + v[mid]) * 0.5)
    } else {
        Some(v[mid])
    }
}

pub fn mean(data: &[f64]) -> Option<f64> {
    let (sum, count) = data
        .iter()
        .filter(|x| x.is_finite())
        .fold((0.0, 0usize), |(s, n), &x| (s + x, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Least-squares polynomial of the given order through `(x, y)`.
///
/// The abscissa is rescaled to `[-1, 1]` before the normal equations are
/// built, so the returned [`Polynomial`] carries that scaling with it.
/// Returns `None` when the system is singular (too few distinct points).
pub fn polyfit(x: &[f64], y: &[f64], order: usize) -> Option<Polynomial> {
    let points: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();
    let m = order + 1;
    if points.len() < m {
        return None;
    }

    let lo = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let hi = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let centre = 0.5 * (lo + hi);
    let half_span = if hi > lo { 0.5 * (hi - lo) } else { 1.0 };

    let mut ata = DMatrix::<f64>::zeros(m, m);
    let mut atb = DVector::<f64>::zeros(m);
    let mut powers = vec![1.0f64; m];
    for &(px, py) in &points {
        let u = (px - centre) / half_span;
        for d in 1..m {
            powers[d] = powers[d - 1] * u;
        }
        for a in 0..m {
            atb[a] += powers[a] * py;
            for b in 0..m {
                ata[(a, b)] += powers[a] * powers[b];
            }
        }
    }

    let coeffs = ata.lu().solve(&atb)?;
    if coeffs.iter().any(|c| !c.is_finite()) {
        return None;
    }
    Some(Polynomial {
        coeffs: coeffs.iter().copied().collect(),
        centre,
        half_span,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    /// Lowest order first, in the rescaled abscissa.
    coeffs: Vec<f64>,
    centre: f64,
    half_span: f64,
}

impl Polynomial {
    pub fn eval(&self, x: f64) -> f64 {
        let u = (x - self.centre) / self.half_span;
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * u + c)
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn median_of_odd_and_even_lengths() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn median_ignores_nan() {
        assert_eq!(median(&[f64::NAN, 5.0, 1.0, f64::NAN, 3.0]), Some(3.0));
        assert_eq!(median(&[f64::NAN]), None);
    }

    #[test]
    fn mean_ignores_nan() {
        assert_eq!(mean(&[1.0, f64::NAN, 3.0]), Some(2.0));
        assert_eq!(mean(&[f64::NAN]), None);
    }

    #[test]
    fn polyfit_recovers_cubic() {
        let x: Vec<f64> = (0..200).map(|i| 100.0 + i as f64 * 7.5).collect();
        let truth = |t: f64| 1.0e4 + 2.0 * t - 3.0e-3 * t * t + 1.0e-6 * t * t * t;
        let y: Vec<f64> = x.iter().map(|&t| truth(t)).collect();

        let fit = polyfit(&x, &y, 3).expect("fit should succeed");
        for &t in &x {
            assert!((fit.eval(t) - truth(t)).abs() < 1e-6 * truth(t).abs());
        }
    }

    #[test]
    fn polyfit_needs_enough_points() {
        assert!(polyfit(&[1.0, 2.0], &[1.0, 2.0], 3).is_none());
        // all abscissae identical: singular for order >= 1
        assert!(polyfit(&[5.0; 10], &[1.0; 10], 1).is_none());
    }
}
