use log::{info, warn};

use crate::config::Config;
use crate::data_access::chunk_files::ChunkFiles;
use crate::data_access::text_table::{detect_columns, read_light_curve, write_light_curve};
use crate::error::Result;
use crate::folding::chunks::window_chunks;
use crate::plotting::chunks::plot_chunks;

#[derive(Debug, Clone, PartialEq)]
pub struct ElcReport {
    pub points: usize,
    pub chunks: usize,
}

/// Prepare input files for ELC: the full light curve, plus one chunk file
/// per primary/secondary eclipse pair, and a stacked plot of the chunks.
pub fn run(config: &Config) -> Result<ElcReport> {
    let cfg = &config.elc;

    let columns = match cfg.columns {
        Some(columns) => columns,
        None => detect_columns(&cfg.infile)?,
    };
    let lc = read_light_curve(&cfg.infile, columns)?;
    if lc.is_empty() {
        warn!("{} holds no points", cfg.infile.display());
    } else if !lc.time().windows(2).all(|w| w[0] <= w[1]) {
        warn!(
            "{} is not in time order; chunks will break at every step back in time",
            cfg.infile.display()
        );
    }

    write_light_curve(&cfg.bigoutfile, &lc)?;
    info!("Wrote {} points to {}", lc.len(), cfg.bigoutfile.display());

    let ephemeris = config.target.ephemeris();
    let files = ChunkFiles::new(cfg.outstub.clone(), cfg.max_chunks);
    let chunks =
        files.load_or_create(|| window_chunks(&lc, &ephemeris, &cfg.window(), cfg.max_chunks))?;

    plot_chunks(
        &cfg.plot_file,
        &chunks,
        &ephemeris,
        &cfg.plot_axes,
        cfg.chunk_offset,
    )?;

    Ok(ElcReport {
        points: lc.len(),
        chunks: chunks.len(),
    })
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::data_access::text_table::{write_table, PLAIN_COLUMNS, STITCHED_HEADER};
    use crate::data_access::LightCurve;
    use std::fs;
    use std::path::Path;

    /// 65 days of a 20 day binary sampled every 0.1 days, written in the
    /// stitched layout. Chunks start at t = 115, 135 and 155.
    fn write_input(path: &Path) -> usize {
        let n = 650;
        let time: Vec<f64> = (0..n).map(|i| 100.0 + i as f64 * 0.1).collect();
        let mag: Vec<f64> = time.iter().map(|t| 9.3 + 0.05 * (t / 3.0).sin()).collect();
        let flux: Vec<f64> = mag.iter().map(|m| 10f64.powf(-0.4 * m)).collect();
        let err = vec![0.0002; n];
        let zeros = vec![0.0; n];
        write_table(
            path,
            STITCHED_HEADER,
            &[&time, &flux, &zeros, &mag, &err, &flux, &mag, &zeros],
        )
        .unwrap();
        n
    }

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.target.period = 20.0;
        config.target.bjd0 = 2454833.0 + 103.0;
        config.elc.infile = dir.join("makelc_out.txt");
        config.elc.bigoutfile = dir.join("ELC_lcall.txt");
        config.elc.outstub = dir.join("ELC_lc").to_string_lossy().into_owned();
        config.elc.plot_file = dir.join("ELC_chunks.svg");
        config
    }

    #[test]
    fn writes_full_curve_and_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let n = write_input(&dir.path().join("makelc_out.txt"));
        let config = config_in(dir.path());

        let report = run(&config).unwrap();
        assert_eq!(report.points, n);
        assert_eq!(report.chunks, 4);

        let full = read_light_curve(&config.elc.bigoutfile, PLAIN_COLUMNS).unwrap();
        assert_eq!(full.len(), n);
        assert!((full.value()[0] - 9.3 - 0.05 * (100.0f64 / 3.0).sin()).abs() < 1e-9);

        let files = ChunkFiles::new(config.elc.outstub.clone(), 100);
        assert_eq!(files.existing(), 4);
        let chunks = files.read_all(4).unwrap();
        let total: usize = chunks.iter().map(LightCurve::len).sum();
        assert_eq!(total, n);

        assert!(config.elc.plot_file.exists());
    }

    #[test]
    fn existing_chunks_are_reused() {
        let dir = tempfile::tempdir().unwrap();
        write_input(&dir.path().join("makelc_out.txt"));
        let config = config_in(dir.path());

        let files = ChunkFiles::new(config.elc.outstub.clone(), 100);
        fs::write(files.path(0), "110.0 9.3 0.001\n").unwrap();
        fs::write(files.path(1), "130.0 9.3 0.001\n").unwrap();

        let report = run(&config).unwrap();
        assert_eq!(report.chunks, 2);
        assert_eq!(fs::read_to_string(files.path(0)).unwrap(), "110.0 9.3 0.001\n");
        assert!(!files.path(2).exists());
    }
}
