use std::path::Path;

use log::info;

use crate::data_access::KEPLER_BJD_OFFSET;
use crate::error::{LcError, Result};

/// Open time interval, in Kepler time, that gap alignment looks past.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MaskInterval {
    pub start: f64,
    pub end: f64,
}

impl MaskInterval {
    pub fn contains(&self, t: f64) -> bool {
        t > self.start && t < self.end
    }
}

pub fn is_masked(masks: &[MaskInterval], t: f64) -> bool {
    masks.iter().any(|m| m.contains(t))
}

/// Read `start,end` rows given in full BJD.
///
/// A file that does not exist means no mask; the caller hands `None` on to
/// the cotrending tool in that case.
pub fn read_mask_file(path: &Path) -> Result<Option<Vec<MaskInterval>>> {
    if !path.exists() {
        info!("No mask file found at {}", path.display());
        return Ok(None);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let mut masks = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let line = record.position().map_or(row + 1, |p| p.line() as usize);
        let parse = |idx: usize| -> Result<f64> {
            let field = record.get(idx).unwrap_or("");
            field.parse::<f64>().map_err(|_| LcError::Parse {
                path: path.to_path_buf(),
                line,
                message: format!("'{field}' is not a BJD"),
            })
        };
        masks.push(MaskInterval {
            start: parse(0)? - KEPLER_BJD_OFFSET,
            end: parse(1)? - KEPLER_BJD_OFFSET,
        });
    }
    info!("Read {} mask intervals from {}", masks.len(), path.display());
    Ok(Some(masks))
}
