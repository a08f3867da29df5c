//! CSV persistence for result sets.
//!
//! One file per (symbol, interval): `<dir>/<SYMBOL>_<interval>.csv`
//! with a header row, `\n` line endings, and no index column. Writes
//! are atomic: write to .tmp, rename into place.

use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::*;

use crate::interval::Interval;
use crate::provider::DataError;

/// Persist one result set, creating the directory chain as needed.
/// Returns the final path. An existing file for the pair is replaced
/// wholesale — directory layout is the only state this tool keeps.
pub fn write_csv(
    df: &mut DataFrame,
    dir: &Path,
    symbol: &str,
    interval: Interval,
) -> Result<PathBuf, DataError> {
    fs::create_dir_all(dir).map_err(|e| output_error(dir, format!("create dir: {e}")))?;

    let path = dir.join(format!("{symbol}_{interval}.csv"));
    let tmp_path = path.with_extension("csv.tmp");

    let file = fs::File::create(&tmp_path)
        .map_err(|e| output_error(&tmp_path, format!("create file: {e}")))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(df)
        .map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            output_error(&tmp_path, format!("write csv: {e}"))
        })?;

    // Atomic rename
    fs::rename(&tmp_path, &path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        output_error(&path, format!("atomic rename failed: {e}"))
    })?;

    Ok(path)
}

fn output_error(path: &Path, message: String) -> DataError {
    DataError::Output {
        path: path.display().to_string(),
        message,
    }
}
