// crates/atlasprep-core/src/io.rs

//! # Document I/O
//!
//! Handles the physical layer (files, optional gzip) so the pipelines only
//! ever see readers, writers and `serde_json::Value` documents.

use crate::error::{PrepError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

/// Returns `true` when the path carries a `.gz` extension.
pub fn is_gzip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// A missing file becomes [`PrepError::NotFound`]; any other failure stays
/// an I/O error.
fn open_error(path: &Path, err: io::Error) -> PrepError {
    match err.kind() {
        ErrorKind::NotFound => PrepError::NotFound(format!("{}: {}", path.display(), err)),
        _ => PrepError::Io(err),
    }
}

/// Opens a file, buffers it, and wraps it in a Gzip decoder when the path
/// ends in `.gz`. The caller gets a plain reader either way.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;

    let reader = BufReader::new(file);

    if is_gzip_path(path) {
        #[cfg(feature = "compact")]
        {
            return Ok(Box::new(GzDecoder::new(reader)));
        }
        #[cfg(not(feature = "compact"))]
        {
            return Err(PrepError::InvalidData(format!(
                "{} is gzipped but 'compact' is disabled",
                path.display()
            )));
        }
    }

    Ok(Box::new(reader))
}

/// Reads a whole JSON document into memory.
pub fn read_document(path: &Path) -> Result<Value> {
    let reader = open_stream(path)?;
    let doc = serde_json::from_reader(reader)?;
    Ok(doc)
}

/// Serializes `doc` with `indent` spaces per nesting level.
///
/// The file is written in full, followed by a newline. Writes are not atomic.
/// A `.gz` path without the `compact` feature fails before the file is
/// created.
pub fn write_document<T: Serialize>(path: &Path, doc: &T, indent: usize) -> Result<()> {
    if is_gzip_path(path) {
        #[cfg(feature = "compact")]
        {
            let writer = BufWriter::new(File::create(path)?);
            let encoder = write_pretty(GzEncoder::new(writer, Compression::default()), doc, indent)?;
            encoder.finish()?.flush()?;
            return Ok(());
        }
        #[cfg(not(feature = "compact"))]
        {
            return Err(PrepError::InvalidData(format!(
                "{} requests gzip but 'compact' is disabled",
                path.display()
            )));
        }
    }

    let writer = BufWriter::new(File::create(path)?);
    let mut writer = write_pretty(writer, doc, indent)?;
    writer.flush()?;
    Ok(())
}

/// Renders `doc` into a string using the same layout as [`write_document`].
pub fn to_pretty_string<T: Serialize>(doc: &T, indent: usize) -> Result<String> {
    let buf = write_pretty(Vec::new(), doc, indent)?;
    String::from_utf8(buf).map_err(|e| PrepError::InvalidData(e.to_string()))
}

fn write_pretty<W: Write, T: Serialize>(writer: W, doc: &T, indent: usize) -> Result<W> {
    let spaces = vec![b' '; indent];
    let formatter = PrettyFormatter::with_indent(&spaces);
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    doc.serialize(&mut ser)?;
    let mut writer = ser.into_inner();
    writer.write_all(b"\n")?;
    Ok(writer)
}
