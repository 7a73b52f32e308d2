//! Generating a favicon set from one source image.

use crate::bitmap::Bitmap;
use crate::error::{Error, Result};
use crate::icondir;
use crate::payload;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

//===========================================================================//

// The standard favicon set: file name and square edge length in pixels.
const DEFAULT_TABLE: &[(&str, u32)] = &[
    ("apple-touch-icon-57x57.png", 57),
    ("apple-touch-icon-60x60.png", 60),
    ("apple-touch-icon-72x72.png", 72),
    ("apple-touch-icon-76x76.png", 76),
    ("apple-touch-icon-114x114.png", 114),
    ("apple-touch-icon-120x120.png", 120),
    ("apple-touch-icon-144x144.png", 144),
    ("apple-touch-icon-152x152.png", 152),
    ("favicon-16x16.png", 16),
    ("favicon-32x32.png", 32),
    ("favicon-96x96.png", 96),
    ("favicon-128.png", 128),
    ("favicon-196x196.png", 196),
    ("mstile-70x70.png", 70),
    ("ms-title-144x144.png", 144),
    ("mstile-150x150.png", 150),
    ("mstile-310x310.png", 310),
    ("favicon.ico", 64),
];

//===========================================================================//

/// How an output file is encoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputKind {
    /// A plain PNG file.
    Png,
    /// A single-image ICO file with a PNG payload.
    Icon,
}

/// One file to generate: a name inside the target directory and the size
/// the source is resized to.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct OutputSpec {
    /// File name, relative to the target directory.
    pub filename: String,
    /// Target width, in pixels.
    pub width: u32,
    /// Target height, in pixels.
    pub height: u32,
}

impl OutputSpec {
    /// Creates a square output.
    pub fn square(filename: &str, size: u32) -> OutputSpec {
        OutputSpec { filename: filename.to_string(), width: size, height: size }
    }

    /// Returns the encoding implied by the file extension: `.ico` (in any
    /// case) means an icon file, anything else a PNG.
    pub fn kind(&self) -> OutputKind {
        match Path::new(&self.filename).extension() {
            Some(ext) if ext.eq_ignore_ascii_case("ico") => OutputKind::Icon,
            _ => OutputKind::Png,
        }
    }
}

/// Returns the standard favicon set, in a fixed order.
pub fn default_outputs() -> Vec<OutputSpec> {
    DEFAULT_TABLE
        .iter()
        .map(|&(filename, size)| OutputSpec::square(filename, size))
        .collect()
}

//===========================================================================//

/// The outcome of a [`generate`] run.  Outputs are independent, so some may
/// have been written while others failed.
#[derive(Debug, Default)]
pub struct Report {
    written: Vec<PathBuf>,
    failed: Vec<(PathBuf, Error)>,
}

impl Report {
    /// Returns the files that were written completely.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Returns the files that could not be generated, with the reason.  None
    /// of these paths is left on disk.
    pub fn failed(&self) -> &[(PathBuf, Error)] {
        &self.failed
    }

    /// Returns true if every output was written.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

//===========================================================================//

/// Decodes `source` and generates every output in `outputs` inside
/// `target_dir`, creating the directory if needed.
///
/// Failing to decode the source or to create the directory aborts the run.
/// A failure on one output is recorded in the report and the remaining
/// outputs are still generated.
pub fn generate(
    source: &Path,
    target_dir: &Path,
    outputs: &[OutputSpec],
) -> Result<Report> {
    let bitmap = Bitmap::open(source)?;
    generate_from_bitmap(&bitmap, target_dir, outputs)
}

/// Like [`generate`], but starting from an already-decoded bitmap.
pub fn generate_from_bitmap(
    bitmap: &Bitmap,
    target_dir: &Path,
    outputs: &[OutputSpec],
) -> Result<Report> {
    fs::create_dir_all(target_dir).map_err(Error::Write)?;
    let mut report = Report::default();
    for output in outputs.iter() {
        let path = target_dir.join(&output.filename);
        match generate_one(bitmap, output, &path) {
            Ok(()) => {
                tracing::info!(
                    path = %path.display(),
                    width = output.width,
                    height = output.height,
                    "wrote output"
                );
                report.written.push(path);
            }
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    %error,
                    "failed to generate output"
                );
                report.failed.push((path, error));
            }
        }
    }
    Ok(report)
}

fn generate_one(bitmap: &Bitmap, output: &OutputSpec, path: &Path) -> Result<()> {
    let name = Path::new(&output.filename);
    if name.file_name() != Some(name.as_os_str()) {
        invalid_input!(
            "Output name must be a plain file name (was {:?})",
            output.filename
        );
    }
    let resized = bitmap.resize(output.width, output.height)?;
    let payload = payload::encode(&resized)?;
    let mut file = fs::File::create(path).map_err(Error::Write)?;
    let result = match output.kind() {
        OutputKind::Icon => icondir::write(&mut file, &resized, &payload),
        OutputKind::Png => {
            file.write_all(payload.as_bytes()).map_err(Error::Write)
        }
    }
    .and_then(|()| file.sync_all().map_err(Error::Write));
    if result.is_err() {
        drop(file);
        if let Err(error) = fs::remove_file(path) {
            tracing::warn!(
                path = %path.display(),
                %error,
                "could not remove incomplete output"
            );
        }
    }
    result
}

//===========================================================================//


//===========================================================================//
