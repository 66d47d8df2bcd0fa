use std::fs;
use std::path::{Path, PathBuf};

use fitsio::FitsFile;
use log::debug;

use crate::error::{LcError, Result};

/// One quarter of Kepler long-cadence photometry after cotrending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quarter {
    pub number: Option<i64>,
    pub kepmag: f64,
    pub time: Vec<f64>,
    pub sap_flux: Vec<f64>,
    pub sap_flux_err: Vec<f64>,
    pub cbv_flux: Vec<f64>,
    pub cbv_model: Vec<f64>,
    pub quality: Vec<i32>,
}

impl Quarter {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// A raw light curve file as written by the archive, `kplr<KIC>-<stamp>_llc.fits`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarterFile {
    pub path: PathBuf,
    pub kic: String,
    pub stamp: String,
}

impl QuarterFile {
    pub fn parse(path: &Path) -> Option<QuarterFile> {
        let name = path.file_name()?.to_str()?;
        let stem = name.strip_prefix("kplr")?.strip_suffix("_llc.fits")?;
        let (kic, stamp) = stem.split_once('-')?;
        if kic.is_empty() || stamp.is_empty() {
            return None;
        }
        Some(QuarterFile {
            path: path.to_path_buf(),
            kic: kic.to_string(),
            stamp: stamp.to_string(),
        })
    }

    pub fn cotrended_path(&self) -> PathBuf {
        let name = format!("cbv_kplr{}-{}_llc.fits", self.kic, self.stamp);
        self.path.with_file_name(name)
    }
}

fn open_fits(path: &Path) -> Result<FitsFile> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("fits") {
        return Err(LcError::NotFitsFile(path.to_path_buf()));
    }
    Ok(FitsFile::open(path)?)
}

/// Raw quarter files in `dir`, in file name (and so observation) order.
pub fn find_quarter_files(dir: &Path) -> Result<Vec<QuarterFile>> {
    let mut files: Vec<QuarterFile> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if let Some(file) = QuarterFile::parse(&path) {
            files.push(file);
        }
    }
    if files.is_empty() {
        return Err(LcError::NoQuarters(dir.to_path_buf()));
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

pub fn read_quarter_number(path: &Path) -> Result<Option<i64>> {
    let mut fptr = open_fits(path)?;
    let primary = fptr.primary_hdu()?;
    Ok(primary.read_key::<i64>(&mut fptr, "QUARTER").ok())
}

/// Read a cotrended quarter: the light curve table lives in HDU 1, the
/// target's Kepler magnitude in the primary header.
pub fn load_kepler_quarter(path: &Path) -> Result<Quarter> {
    let mut fptr = open_fits(path)?;

    let primary = fptr.primary_hdu()?;
    let kepmag: f64 = primary.read_key(&mut fptr, "KEPMAG")?;
    let number: Option<i64> = primary.read_key(&mut fptr, "QUARTER").ok();

    let hdu = fptr.hdu(1)?;
    let quarter = Quarter {
        number,
        kepmag,
        time: hdu.read_col(&mut fptr, "TIME")?,
        sap_flux: hdu.read_col(&mut fptr, "SAP_FLUX")?,
        sap_flux_err: hdu.read_col(&mut fptr, "SAP_FLUX_ERR")?,
        cbv_flux: hdu.read_col(&mut fptr, "CBVSAP_FLUX")?,
        cbv_model: hdu.read_col(&mut fptr, "CBVSAP_MODL")?,
        quality: hdu.read_col(&mut fptr, "SAP_QUALITY")?,
    };
    debug!(
        "{}: quarter {:?}, {} rows, Kp = {}",
        path.display(),
        quarter.number,
        quarter.len(),
        quarter.kepmag
    );
    Ok(quarter)
}
