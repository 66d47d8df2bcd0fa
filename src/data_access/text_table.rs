use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::data_access::LightCurve;
use crate::error::{LcError, Result};

/// Header line written on top of a stitched light curve.
pub const STITCHED_HEADER: &str =
    "# Kepler time, SAP flux, flux err, SAP mag, mag err, CBV flux, CBV mag, CBV model";

/// Time, magnitude and magnitude error columns of a stitched light curve.
pub const STITCHED_COLUMNS: [usize; 3] = [0, 3, 4];

pub const PLAIN_COLUMNS: [usize; 3] = [0, 1, 2];

/// Read the requested columns of a whitespace-delimited table.
///
/// `#` starts a comment, blank lines are skipped, extra columns are ignored.
pub fn read_columns(path: &Path, columns: &[usize]) -> Result<Vec<Vec<f64>>> {
    let reader = BufReader::new(File::open(path)?);
    let mut out: Vec<Vec<f64>> = vec![Vec::new(); columns.len()];

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let data = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line.as_str(),
        };
        let fields: Vec<&str> = data.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }

        for (slot, &col) in out.iter_mut().zip(columns) {
            let field = fields.get(col).ok_or_else(|| LcError::Parse {
                path: path.to_path_buf(),
                line: line_no + 1,
                message: format!("expected at least {} columns, found {}", col + 1, fields.len()),
            })?;
            let value = field.parse::<f64>().map_err(|_| LcError::Parse {
                path: path.to_path_buf(),
                line: line_no + 1,
                message: format!("'{field}' is not a number"),
            })?;
            slot.push(value);
        }
    }
    Ok(out)
}

/// Column layout of a light curve file: the stitched layout when the file
/// starts with [`STITCHED_HEADER`], the plain one otherwise.
pub fn detect_columns(path: &Path) -> Result<[usize; 3]> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut first = String::new();
    reader.read_line(&mut first)?;
    if first.trim_end() == STITCHED_HEADER {
        debug!("{} has the stitched layout", path.display());
        Ok(STITCHED_COLUMNS)
    } else {
        Ok(PLAIN_COLUMNS)
    }
}

pub fn read_light_curve(path: &Path, columns: [usize; 3]) -> Result<LightCurve> {
    let mut cols = read_columns(path, &columns)?;
    let error = cols.pop().unwrap_or_default();
    let value = cols.pop().unwrap_or_default();
    let time = cols.pop().unwrap_or_default();
    LightCurve::new(time, value, error)
}

pub fn write_light_curve(path: &Path, lc: &LightCurve) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    for (t, v, e) in lc.points() {
        writeln!(w, "{t} {v} {e}")?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_table(path: &Path, header: &str, columns: &[&[f64]]) -> Result<()> {
    let rows = columns.first().map_or(0, |c| c.len());
    if let Some(short) = columns.iter().find(|c| c.len() != rows) {
        return Err(LcError::RaggedTable {
            expected: rows,
            found: short.len(),
        });
    }

    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "{header}")?;
    for row in 0..rows {
        let line: Vec<String> = columns.iter().map(|c| c[row].to_string()).collect();
        writeln!(w, "{}", line.join(" "))?;
    }
    w.flush()?;
    Ok(())
}
