use crate::error::{Error, Result};
use crate::inverted::TermRecord;
use crate::stats::TfIdf;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Entries that could not be removed while clearing a directory.
#[derive(Debug, Default)]
pub struct ClearReport {
    pub removed: usize,
    pub failures: Vec<Error>,
}

/// Remove everything inside `dir`, keeping `dir` itself. Individual failures
/// are logged and collected; a missing `dir` is not an error.
pub fn clear_directory(dir: &Path) -> ClearReport {
    let mut report = ClearReport::default();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return report,
        Err(e) => {
            let err = Error::fs(dir, e);
            tracing::warn!(error = %err, "failed to list output directory");
            report.failures.push(err);
            return report;
        }
    };
    let paths: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                let err = Error::fs(dir, e);
                tracing::warn!(error = %err, "failed to read directory entry");
                report.failures.push(err);
                None
            }
        })
        .collect();
    remove_entries(paths, &mut report);
    report
}

/// Delete each path, recursing into directories. A failure is logged and
/// recorded, then the next path is tried.
fn remove_entries<I>(paths: I, report: &mut ClearReport)
where
    I: IntoIterator<Item = PathBuf>,
{
    for path in paths {
        let removed = match fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&path),
            Ok(_) => fs::remove_file(&path),
            Err(e) => Err(e),
        };
        match removed {
            Ok(()) => report.removed += 1,
            Err(e) => {
                let err = Error::fs(&path, e);
                tracing::warn!(error = %err, "failed to delete");
                report.failures.push(err);
            }
        }
    }
}

/// Shortest round-trip form with a decimal point kept for integral values
/// (`0.0`) and a signed, two-digit exponent (`3e-05`, `1e+16`).
pub fn format_score(value: f64) -> String {
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

/// Append `<term> <idf> <tf_idf>` lines for one document to `dir/file_name`
/// in a single write session. Nothing is created when `scores` is empty.
pub fn write_document_stats(dir: &Path, file_name: &str, scores: &[TfIdf]) -> Result<Option<PathBuf>> {
    if scores.is_empty() {
        return Ok(None);
    }
    fs::create_dir_all(dir).map_err(|e| Error::fs(dir, e))?;
    let path = dir.join(file_name);
    let mut buf = String::new();
    for s in scores {
        buf.push_str(&s.term);
        buf.push(' ');
        buf.push_str(&format_score(s.idf));
        buf.push(' ');
        buf.push_str(&format_score(s.tf_idf));
        buf.push('\n');
    }
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| Error::fs(&path, e))?;
    f.write_all(buf.as_bytes()).map_err(|e| Error::fs(&path, e))?;
    Ok(Some(path))
}

/// Compact JSON with `", "` and `": "` separators.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// One JSON object per line, UTF-8, non-ASCII left unescaped.
pub fn write_inverted_index(path: &Path, records: &[TermRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::fs(parent, e))?;
    }
    let f = File::create(path).map_err(|e| Error::fs(path, e))?;
    let mut out = BufWriter::new(f);
    for rec in records {
        let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
        rec.serialize(&mut ser)?;
        out.write_all(b"\n").map_err(|e| Error::fs(path, e))?;
    }
    out.flush().map_err(|e| Error::fs(path, e))?;
    Ok(())
}
