//! Fragment normalization and aggregation.
//!
//! Range responses label value columns with a `Field:SYMBOL` pair and
//! the time column `Datetime`; period responses use plain labels. The
//! normalizer flattens both shapes to one canonical schema (`Date`,
//! `Open`, `High`, ...) so fragments from either call can be stitched
//! together. Aggregation concatenates normalized fragments in fetch
//! order and drops duplicate timestamps, keeping the first occurrence —
//! adjacent chunk windows can both report the bar at their shared
//! boundary.

use polars::prelude::*;

use crate::provider::DataError;

/// Canonical name of the time column after normalization.
pub const DATE_COLUMN: &str = "Date";

/// Time column label on intraday fragments before normalization.
pub const DATETIME_COLUMN: &str = "Datetime";

const QUALIFIER_SEPARATOR: char = ':';

/// Compound column label for a (field, symbol) pair, as range responses
/// carry them.
pub fn qualify(field: &str, symbol: &str) -> String {
    format!("{field}{QUALIFIER_SEPARATOR}{symbol}")
}

/// Normalize one raw fragment to the canonical schema.
///
/// Qualified labels are flattened to their field part, and the time
/// column is renamed `Datetime` -> `Date`. Value columns keep their
/// order; rows are untouched.
pub fn normalize(mut df: DataFrame) -> Result<DataFrame, DataError> {
    let names: Vec<String> = df
        .get_columns()
        .iter()
        .map(|column| {
            let name = column.name().as_str();
            let field = match name.split_once(QUALIFIER_SEPARATOR) {
                Some((field, _symbol)) => field,
                None => name,
            };
            if field == DATETIME_COLUMN {
                DATE_COLUMN.to_string()
            } else {
                field.to_string()
            }
        })
        .collect();

    df.set_column_names(names)
        .map_err(|e| DataError::Frame(format!("rename columns: {e}")))?;
    Ok(df)
}

/// Stitch normalized fragments into one result set.
///
/// Empty fragments are skipped; `None` means nothing survived. The
/// surviving fragments are concatenated in order (schemas unioned
/// column-wise) and deduplicated on the key column, first occurrence
/// wins. Aggregating an already-aggregated frame changes nothing.
pub fn aggregate(fragments: Vec<DataFrame>) -> Result<Option<DataFrame>, DataError> {
    let fragments: Vec<DataFrame> = fragments
        .into_iter()
        .filter(|f| f.height() > 0 && f.width() > 0)
        .collect();

    let Some(first) = fragments.first() else {
        return Ok(None);
    };
    let key = dedup_key(first);

    let inputs: Vec<LazyFrame> = fragments.into_iter().map(|f| f.lazy()).collect();
    let combined = concat(
        inputs,
        UnionArgs {
            diagonal: true,
            ..Default::default()
        },
    )
    .map_err(|e| DataError::Frame(format!("concat fragments: {e}")))?
    .unique_stable(Some(vec![key.into()]), UniqueKeepStrategy::First)
    .collect()
    .map_err(|e| DataError::Frame(format!("dedupe fragments: {e}")))?;

    Ok(Some(combined))
}

/// The dedup key: the canonical `Date` column when present, otherwise
/// the first column by position.
fn dedup_key(df: &DataFrame) -> String {
    if df.column(DATE_COLUMN).is_ok() {
        DATE_COLUMN.to_string()
    } else {
        df.get_columns()[0].name().to_string()
    }
}
