/// Values this close below 1 fold to phase 0 so `epoch + k * period` is
/// not reported as 0.9999999.
const PHASE_EPSILON: f64 = 1e-9;

/// Orbital period and the time of a primary eclipse, both in the time
/// system of the light curve being folded.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ephemeris {
    period: f64,
    epoch: f64,
}

impl Ephemeris {
    pub fn new(period: f64, epoch: f64) -> Ephemeris {
        Ephemeris { period, epoch }
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    fn cycles_since_epoch(&self, t: f64) -> f64 {
        (t - self.epoch) / self.period
    }

    /// Orbital phase of `t` in `[0, 1)`.
    pub fn phase(&self, t: f64) -> f64 {
        wrap_phase(self.cycles_since_epoch(t))
    }

    /// Orbital cycle `t` falls in; cycle 0 starts at the epoch.
    pub fn cycle(&self, t: f64) -> i64 {
        let x = self.cycles_since_epoch(t);
        let cycle = x.floor();
        if x - cycle >= 1.0 - PHASE_EPSILON {
            cycle as i64 + 1
        } else {
            cycle as i64
        }
    }

    pub fn phases(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.phase(t)).collect()
    }
}

pub fn wrap_phase(x: f64) -> f64 {
    let frac = x.rem_euclid(1.0);
    if frac >= 1.0 - PHASE_EPSILON {
        0.0
    } else {
        frac
    }
}

/// Phases followed by the same phases shifted into `[1, 2)`, for plots that
/// show two consecutive cycles side by side.
pub fn phase_doubles(phases: &[f64]) -> Vec<f64> {
    phases
        .iter()
        .copied()
        .chain(phases.iter().map(|p| p + 1.0))
        .collect()
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn phase_stays_in_unit_interval() {
        let eph = Ephemeris::new(171.277967, 337.514777);
        for i in -500..2000 {
            let t = i as f64 * 0.731;
            let p = eph.phase(t);
            assert!((0.0..1.0).contains(&p), "phase {p} out of range at t = {t}");
        }
    }

    #[test]
    fn epoch_multiples_have_zero_phase() {
        let eph = Ephemeris::new(171.277967, 337.514777);
        for k in -5..=10 {
            let t = eph.epoch() + k as f64 * eph.period();
            let p = eph.phase(t);
            assert!(p < 1e-8, "phase {p} for cycle {k}");
            assert_eq!(eph.cycle(t), k);
        }
    }

    #[test]
    fn phase_before_epoch_is_positive() {
        let eph = Ephemeris::new(10.0, 100.0);
        assert!((eph.phase(97.5) - 0.75).abs() < 1e-12);
        assert_eq!(eph.cycle(97.5), -1);
        assert!((eph.phase(112.5) - 0.25).abs() < 1e-12);
        assert_eq!(eph.cycle(112.5), 1);
    }

    #[test]
    fn doubles_repeat_phases_one_cycle_later() {
        let doubles = phase_doubles(&[0.1, 0.5]);
        assert_eq!(doubles, vec![0.1, 0.5, 1.1, 1.5]);
    }
}
