use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, info};
use serde::Deserialize;

use crate::data_access::fits_access::QuarterFile;
use crate::error::{LcError, Result};

/// How the external `kepcotrend` tool is run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CotrendSettings {
    pub program: String,
    pub vectors: String,
    pub method: String,
    pub fit_power: f64,
    pub iterate: bool,
    pub sigma_clip: f64,
}

impl Default for CotrendSettings {
    fn default() -> Self {
        CotrendSettings {
            program: "kepcotrend".to_string(),
            vectors: "1 2".to_string(),
            method: "simplex".to_string(),
            fit_power: 1.0,
            iterate: true,
            sigma_clip: 2.0,
        }
    }
}

/// Data release of the basis vectors published for a quarter.
pub fn cbv_release(quarter: i64) -> &'static str {
    match quarter {
        15 => "d20",
        16 => "d22",
        17 => "d23",
        _ => "d21",
    }
}

/// Basis vector file matching a quarter, e.g. `kplr2009350155506-q03-d21_lcbv.fits`.
pub fn cbv_path(cbv_dir: &Path, stamp: &str, quarter: i64) -> PathBuf {
    cbv_dir.join(format!(
        "kplr{stamp}-q{quarter:02}-{}_lcbv.fits",
        cbv_release(quarter)
    ))
}

pub struct Cotrender<'a> {
    settings: &'a CotrendSettings,
    cbv_dir: &'a Path,
    mask_file: Option<&'a Path>,
}

impl<'a> Cotrender<'a> {
    pub fn new(settings: &'a CotrendSettings, cbv_dir: &'a Path, mask_file: Option<&'a Path>) -> Self {
        Cotrender {
            settings,
            cbv_dir,
            mask_file,
        }
    }

    fn arguments(&self, input: &Path, output: &Path, cbv: &Path) -> Vec<OsString> {
        let s = self.settings;
        let mut args: Vec<OsString> = vec![
            input.into(),
            cbv.into(),
            s.vectors.as_str().into(),
            "--outfile".into(),
            output.into(),
            "--method".into(),
            s.method.as_str().into(),
            "--fitpower".into(),
            s.fit_power.to_string().into(),
            "--sigma".into(),
            s.sigma_clip.to_string().into(),
            "--overwrite".into(),
        ];
        if s.iterate {
            args.push("--iterate".into());
        }
        if let Some(mask) = self.mask_file {
            args.push("--maskfile".into());
            args.push(mask.into());
        }
        args
    }

    /// Path of the cotrended copy of `file`, running the tool first unless
    /// that copy is already on disk.
    pub fn ensure_cotrended(&self, file: &QuarterFile, quarter: i64) -> Result<PathBuf> {
        let output = file.cotrended_path();
        if output.exists() {
            debug!("{} already cotrended", file.path.display());
            return Ok(output);
        }

        let cbv = cbv_path(self.cbv_dir, &file.stamp, quarter);
        info!(
            "Running {} on quarter {} ({})",
            self.settings.program,
            quarter,
            file.path.display()
        );
        let status = Command::new(&self.settings.program)
            .args(self.arguments(&file.path, &output, &cbv))
            .stdin(Stdio::null())
            .status()?;
        if !status.success() {
            return Err(LcError::Cotrend {
                program: self.settings.program.clone(),
                input: file.path.clone(),
                status,
            });
        }
        Ok(output)
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use std::fs;

    fn quarter_file(dir: &Path) -> QuarterFile {
        QuarterFile::parse(&dir.join("kplr009246715-2009350155506_llc.fits")).unwrap()
    }

    #[test]
    fn release_per_quarter() {
        assert_eq!(cbv_release(3), "d21");
        assert_eq!(cbv_release(15), "d20");
        assert_eq!(cbv_release(16), "d22");
        assert_eq!(cbv_release(17), "d23");
        assert_eq!(
            cbv_path(Path::new("basisvectors"), "2009350155506", 3),
            PathBuf::from("basisvectors/kplr2009350155506-q03-d21_lcbv.fits")
        );
    }

    #[test]
    fn arguments_follow_settings() {
        let settings = CotrendSettings::default();
        let cotrender = Cotrender::new(&settings, Path::new("cbv"), Some(Path::new("mask.txt")));
        let args = cotrender.arguments(Path::new("in.fits"), Path::new("out.fits"), Path::new("cbv.fits"));
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();

        assert_eq!(&args[..3], ["in.fits", "cbv.fits", "1 2"]);
        let has_pair = |flag: &str, value: &str| args.windows(2).any(|w| w[0] == flag && w[1] == value);
        assert!(has_pair("--method", "simplex"));
        assert!(has_pair("--sigma", "2"));
        assert!(has_pair("--maskfile", "mask.txt"));
        assert!(args.contains(&"--iterate".to_string()));
    }

    #[test]
    fn existing_output_skips_the_tool() {
        let dir = tempfile::tempdir().unwrap();
        let file = quarter_file(dir.path());
        fs::write(file.cotrended_path(), b"").unwrap();

        let settings = CotrendSettings {
            program: "/nonexistent/kepcotrend".to_string(),
            ..CotrendSettings::default()
        };
        let cotrender = Cotrender::new(&settings, dir.path(), None);
        assert_eq!(cotrender.ensure_cotrended(&file, 3).unwrap(), file.cotrended_path());
    }

    #[cfg(unix)]
    #[test]
    fn failing_tool_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = quarter_file(dir.path());
        let settings = CotrendSettings {
            program: "false".to_string(),
            ..CotrendSettings::default()
        };
        let cotrender = Cotrender::new(&settings, dir.path(), None);
        assert!(matches!(
            cotrender.ensure_cotrended(&file, 3),
            Err(LcError::Cotrend { .. })
        ));
    }
}
