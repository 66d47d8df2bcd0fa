use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::data_access::cotrend::CotrendSettings;
use crate::data_access::data_cleaner::{Level, LineupOptions};
use crate::data_access::KEPLER_BJD_OFFSET;
use crate::error::{LcError, Result};
use crate::folding::chunks::EclipseWindow;
use crate::folding::phase::Ephemeris;

/// Plot limits in `[x_min, x_max, y_bottom, y_top]` order. A bottom value
/// larger than the top one flips the vertical axis, as magnitudes want.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(from = "[f64; 4]")]
pub struct Axes {
    pub x_min: f64,
    pub x_max: f64,
    pub y_bottom: f64,
    pub y_top: f64,
}

impl From<[f64; 4]> for Axes {
    fn from(a: [f64; 4]) -> Self {
        Axes {
            x_min: a[0],
            x_max: a[1],
            y_bottom: a[2],
            y_top: a[3],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub target: TargetConfig,
    pub stitch: StitchConfig,
    pub elc: ElcConfig,
    pub figure: FigureConfig,
    pub twin: TwinConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    pub kic: String,
    /// Orbital period in days.
    pub period: f64,
    /// Mid-time of primary eclipse, full BJD.
    pub bjd0: f64,
    /// Subtracted from BJD to get the time system of the light curve files.
    pub time_offset: f64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        TargetConfig {
            kic: "9246715".to_string(),
            period: 171.277967,
            bjd0: 2455170.514777,
            time_offset: KEPLER_BJD_OFFSET,
        }
    }
}

impl TargetConfig {
    pub fn ephemeris(&self) -> Ephemeris {
        Ephemeris::new(self.period, self.bjd0 - self.time_offset)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StitchConfig {
    /// Directory holding the `kplr*_llc.fits` quarters.
    pub lightcurve_dir: PathBuf,
    pub cbv_dir: PathBuf,
    /// Looked up inside `lightcurve_dir` unless absolute.
    pub mask_file: PathBuf,
    pub outfile: PathBuf,
    pub plot_file: PathBuf,
    pub plot_axes: Axes,
    pub level: Level,
    pub gap_threshold: f64,
    pub max_lineup_iterations: usize,
    /// Order of the long-term polynomial trend removed after stitching;
    /// left in place when unset.
    pub detrend_order: Option<usize>,
    pub require_zero_quality: bool,
    pub cbv_plot_offset: f64,
    pub cotrend: CotrendSettings,
}

impl Default for StitchConfig {
    fn default() -> Self {
        StitchConfig {
            lightcurve_dir: PathBuf::from("lightcurves"),
            cbv_dir: PathBuf::from("basisvectors"),
            mask_file: PathBuf::from("mask_kepcotrend.txt"),
            outfile: PathBuf::from("makelc_out.txt"),
            plot_file: PathBuf::from("makelc.svg"),
            plot_axes: Axes::from([100.0, 1600.0, 9.6, 9.0]),
            level: Level::Median,
            gap_threshold: 100.0,
            max_lineup_iterations: 10_000,
            detrend_order: None,
            require_zero_quality: false,
            cbv_plot_offset: 0.2,
            cotrend: CotrendSettings::default(),
        }
    }
}

impl StitchConfig {
    pub fn lineup_options(&self) -> LineupOptions {
        LineupOptions {
            threshold: self.gap_threshold,
            max_iterations: self.max_lineup_iterations,
        }
    }

    pub fn mask_path(&self) -> PathBuf {
        self.lightcurve_dir.join(&self.mask_file)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElcConfig {
    pub infile: PathBuf,
    /// Time, magnitude and error column indices; detected from the file
    /// header when unset.
    pub columns: Option<[usize; 3]>,
    pub phasemin: f64,
    pub phasemax: f64,
    pub bigoutfile: PathBuf,
    pub outstub: String,
    pub max_chunks: usize,
    pub plot_file: PathBuf,
    pub plot_axes: Axes,
    /// Vertical spacing between stacked chunks in the plot.
    pub chunk_offset: f64,
}

impl Default for ElcConfig {
    fn default() -> Self {
        ElcConfig {
            infile: PathBuf::from("makelc_out.txt"),
            columns: None,
            phasemin: 0.6,
            phasemax: 1.6,
            bigoutfile: PathBuf::from("ELC_lcall.txt"),
            outstub: "ELC_lc".to_string(),
            max_chunks: 100,
            plot_file: PathBuf::from("ELC_chunks.svg"),
            plot_axes: Axes::from([0.6, 1.6, 9.4, 8.4]),
            chunk_offset: 0.1,
        }
    }
}

impl ElcConfig {
    pub fn window(&self) -> EclipseWindow {
        EclipseWindow {
            phasemin: self.phasemin,
            phasemax: self.phasemax,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FigureConfig {
    pub infile: PathBuf,
    pub columns: Option<[usize; 3]>,
    pub plot_file: PathBuf,
    pub time_range: [f64; 2],
    pub mag_dim: f64,
    pub mag_bright: f64,
    pub primary_phase: [f64; 2],
    pub secondary_phase: [f64; 2],
}

impl Default for FigureConfig {
    fn default() -> Self {
        FigureConfig {
            infile: PathBuf::from("makelc_out.txt"),
            columns: None,
            plot_file: PathBuf::from("lightcurve_figure.svg"),
            time_range: [100.0, 1600.0],
            mag_dim: 9.54,
            mag_bright: 9.20,
            primary_phase: [0.98, 1.02],
            secondary_phase: [0.694, 0.734],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TwinConfig {
    /// Two-column frequency / power files.
    pub target_file: PathBuf,
    pub twin_file: PathBuf,
    pub target_label: String,
    pub twin_label: String,
    pub plot_file: PathBuf,
    pub freq_range: [f64; 2],
    pub power_max: f64,
}

impl Default for TwinConfig {
    fn default() -> Self {
        TwinConfig {
            target_file: PathBuf::from("KIC9246715_smoothed_50.txt"),
            twin_file: PathBuf::from("KIC11725564_SiB_comparison_50.txt"),
            target_label: "KIC 9246715".to_string(),
            twin_label: "KIC 11725564".to_string(),
            plot_file: PathBuf::from("twinplot.svg"),
            freq_range: [61.0, 149.0],
            power_max: 850.0,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&text)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.target;
        if !(t.period.is_finite() && t.period > 0.0) {
            return Err(LcError::Config(format!(
                "period must be positive, got {}",
                t.period
            )));
        }
        if !t.bjd0.is_finite() {
            return Err(LcError::Config("bjd0 must be finite".to_string()));
        }

        let e = &self.elc;
        if !(e.phasemin < 1.0 && e.phasemax > 1.0) {
            return Err(LcError::Config(format!(
                "phasemin must be below 1 and phasemax above 1, got {} and {}",
                e.phasemin, e.phasemax
            )));
        }
        if e.phasemax - e.phasemin > 1.0 + 1e-9 {
            return Err(LcError::Config(format!(
                "a chunk can span at most one cycle, got {} to {}",
                e.phasemin, e.phasemax
            )));
        }
        if e.max_chunks == 0 {
            return Err(LcError::Config("max_chunks must be at least 1".to_string()));
        }
        if self.stitch.gap_threshold < 0.0 {
            return Err(LcError::Config("gap_threshold cannot be negative".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        let eph = config.target.ephemeris();
        assert!((eph.epoch() - 337.514777).abs() < 1e-6);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eblc.toml");
        fs::write(
            &path,
            r#"
[target]
kic = "5640750"
period = 987.4
bjd0 = 2455266.7

[stitch]
level = "mean"
detrend_order = 3

[stitch.cotrend]
program = "/opt/pyke/bin/kepcotrend"

[elc]
phasemin = 0.5
phasemax = 1.5
columns = [0, 1, 2]
plot_axes = [0.5, 1.5, 10.2, 9.8]
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        config.validate().unwrap();
        assert_eq!(config.target.kic, "5640750");
        assert_eq!(config.stitch.level, Level::Mean);
        assert_eq!(config.stitch.detrend_order, Some(3));
        assert_eq!(config.stitch.cotrend.program, "/opt/pyke/bin/kepcotrend");
        assert_eq!(config.stitch.cotrend.method, "simplex");
        assert_eq!(config.stitch.gap_threshold, 100.0);
        assert_eq!(config.elc.columns, Some([0, 1, 2]));
        assert_eq!(config.elc.plot_axes.y_bottom, 10.2);
        assert_eq!(config.elc.outstub, "ELC_lc");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = toml::from_str::<Config>("[target]\nperiodd = 3.0\n").unwrap_err();
        assert!(err.to_string().contains("periodd"));
    }

    #[test]
    fn bad_values_fail_validation() {
        let mut config = Config::default();
        config.target.period = 0.0;
        assert!(matches!(config.validate(), Err(LcError::Config(_))));

        let mut config = Config::default();
        config.elc.phasemax = 0.9;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.elc.phasemin = 0.2;
        config.elc.phasemax = 1.7;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.elc.max_chunks = 0;
        assert!(config.validate().is_err());
    }
}
