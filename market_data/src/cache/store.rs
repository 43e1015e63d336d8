//! Columnar persistence for cached bar sequences.
//!
//! Each entry is one Arrow IPC (Feather) file with columns `timestamp`
//! (i64, epoch nanoseconds), `open`/`high`/`low`/`close` (f64), and `volume`
//! (i64, validated non-negative on read). Nanosecond timestamps round-trip
//! every `DateTime<Utc>` a provider can realistically emit.
//!
//! Writes land in a temp file in the cache directory and are renamed over
//! the final path, so a concurrent reader sees either the old entry or the
//! new one, never a torn file.

use std::fs::File;
use std::path::Path;

use chrono::DateTime;
use polars::prelude::{Column, DataFrame};
use polars_io::ipc::{IpcReader, IpcWriter};
use polars_io::{SerReader, SerWriter};

use crate::cache::errors::CacheError;
use crate::models::bar::Bar;

fn corrupt(path: &Path, reason: impl Into<String>) -> CacheError {
    CacheError::Corrupt {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn bars_to_frame(bars: &[Bar], path: &Path) -> Result<DataFrame, CacheError> {
    let mut ts = Vec::with_capacity(bars.len());
    for bar in bars {
        let nanos = bar
            .timestamp
            .timestamp_nanos_opt()
            .ok_or_else(|| corrupt(path, format!("timestamp out of range: {}", bar.timestamp)))?;
        ts.push(nanos);
    }
    let open: Vec<f64> = bars.iter().map(|b| b.open).collect();
    let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let low: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volume: Vec<i64> = bars.iter().map(|b| b.volume as i64).collect();

    let df = DataFrame::new(vec![
        Column::new("timestamp".into(), ts),
        Column::new("open".into(), open),
        Column::new("high".into(), high),
        Column::new("low".into(), low),
        Column::new("close".into(), close),
        Column::new("volume".into(), volume),
    ])?;
    Ok(df)
}

fn frame_to_bars(df: &DataFrame, path: &Path) -> Result<Vec<Bar>, CacheError> {
    let column = |name: &str| {
        df.column(name)
            .map(|c| c.as_materialized_series())
            .map_err(|_| corrupt(path, format!("missing column: {name}")))
    };
    let ts = column("timestamp")?
        .i64()
        .map_err(|_| corrupt(path, "timestamp column is not i64"))?;
    let open = column("open")?
        .f64()
        .map_err(|_| corrupt(path, "open column is not f64"))?;
    let high = column("high")?
        .f64()
        .map_err(|_| corrupt(path, "high column is not f64"))?;
    let low = column("low")?
        .f64()
        .map_err(|_| corrupt(path, "low column is not f64"))?;
    let close = column("close")?
        .f64()
        .map_err(|_| corrupt(path, "close column is not f64"))?;
    let volume = column("volume")?
        .i64()
        .map_err(|_| corrupt(path, "volume column is not i64"))?;

    let mut bars = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let cell = |v: Option<f64>| v.ok_or_else(|| corrupt(path, format!("null price at row {i}")));
        let nanos = ts
            .get(i)
            .ok_or_else(|| corrupt(path, format!("null timestamp at row {i}")))?;
        let vol = volume
            .get(i)
            .ok_or_else(|| corrupt(path, format!("null volume at row {i}")))?;
        if vol < 0 {
            return Err(corrupt(path, format!("negative volume at row {i}: {vol}")));
        }
        bars.push(Bar {
            timestamp: DateTime::from_timestamp_nanos(nanos),
            open: cell(open.get(i))?,
            high: cell(high.get(i))?,
            low: cell(low.get(i))?,
            close: cell(close.get(i))?,
            volume: vol as u64,
        });
    }
    Ok(bars)
}

/// Writes `bars` to `final_path` through a temp file in `dir` plus rename.
pub(crate) fn write_atomic(dir: &Path, final_path: &Path, bars: &[Bar]) -> Result<(), CacheError> {
    let mut df = bars_to_frame(bars, final_path)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|source| CacheError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    IpcWriter::new(tmp.as_file_mut()).finish(&mut df)?;
    tmp.persist(final_path).map_err(|e| CacheError::Persist {
        path: final_path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// Reads a full entry back into bars.
pub(crate) fn read(path: &Path) -> Result<Vec<Bar>, CacheError> {
    let file = File::open(path).map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let df = IpcReader::new(file).finish()?;
    frame_to_bars(&df, path)
}
