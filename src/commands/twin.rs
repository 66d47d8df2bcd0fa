use std::path::Path;

use log::info;

use crate::config::Config;
use crate::data_access::text_table::read_columns;
use crate::error::Result;
use crate::plotting::twin::{plot_twin, Spectrum};

fn read_spectrum(path: &Path) -> Result<Spectrum> {
    let mut cols = read_columns(path, &[0, 1])?.into_iter();
    let freq = cols.next().unwrap_or_default();
    let power = cols.next().unwrap_or_default();
    Ok(Spectrum { freq, power })
}

/// Compare the oscillation spectrum of the red giant with that of its
/// seismic twin, one mirrored above the other.
pub fn run(config: &Config) -> Result<()> {
    let cfg = &config.twin;
    let target = read_spectrum(&cfg.target_file)?;
    let twin = read_spectrum(&cfg.twin_file)?;
    info!(
        "Read {} and {} spectrum points",
        target.freq.len(),
        twin.freq.len()
    );

    plot_twin(
        &cfg.plot_file,
        (cfg.target_label.as_str(), &target),
        (cfg.twin_label.as_str(), &twin),
        cfg.freq_range,
        cfg.power_max,
    )
}

#[cfg(test)]
pub mod test {
    use super::*;
    use std::fs;

    fn write_spectrum(path: &Path, peak: f64) {
        let text: String = (0..500)
            .map(|i| {
                let f = 50.0 + i as f64 * 0.2;
                let p = 600.0 * (-((f - peak) / 8.0).powi(2)).exp() + 20.0;
                format!("{f} {p}\n")
            })
            .collect();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn reads_two_column_spectra() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.txt");
        write_spectrum(&path, 105.0);
        let s = read_spectrum(&path).unwrap();
        assert_eq!(s.freq.len(), 500);
        assert_eq!(s.power.len(), 500);
        assert_eq!(s.freq[0], 50.0);
    }

    #[test]
    fn plots_both_spectra() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.twin.target_file = dir.path().join("target.txt");
        config.twin.twin_file = dir.path().join("twin.txt");
        config.twin.plot_file = dir.path().join("twinplot.svg");
        write_spectrum(&config.twin.target_file, 105.0);
        write_spectrum(&config.twin.twin_file, 108.0);

        run(&config).unwrap();
        let svg = fs::read_to_string(&config.twin.plot_file).unwrap();
        assert!(svg.contains("KIC 11725564"));
    }
}
