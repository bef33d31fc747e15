//! Batch processing of a directory of source images.
//!
//! Walks the top level of an input directory and runs the pipeline once per
//! file, deriving output names from the source stem: `photo.png` becomes
//! `photo.jpg` (and `photo_thumb.jpg` when thumbnails are requested). File
//! pairs are independent — each `process` call owns its own buffers and
//! touches only its own paths — so they run in parallel via rayon.

use crate::imaging::ImageBackend;
use crate::process::{Outcome, Preparer, ProcessError};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of one file pair in a batch run.
#[derive(Debug)]
pub struct BatchEntry {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub thumb: Option<PathBuf>,
    pub result: Result<Outcome, ProcessError>,
}

impl BatchEntry {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Derive the destination paths for one source file.
pub fn output_names(source: &Path, out_dir: &Path, thumbs: bool) -> (PathBuf, Option<PathBuf>) {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    let dest = out_dir.join(format!("{stem}.jpg"));
    let thumb = thumbs.then(|| out_dir.join(format!("{stem}_thumb.jpg")));
    (dest, thumb)
}

/// Process every regular file at the top level of `in_dir` into `out_dir`.
///
/// Subdirectories are not descended into. Per-file failures land in the
/// returned entries; only the inability to create `out_dir` itself is a
/// hard error.
pub fn run<B: ImageBackend>(
    preparer: &Preparer<B>,
    in_dir: &Path,
    out_dir: &Path,
    thumbs: bool,
) -> std::io::Result<Vec<BatchEntry>> {
    std::fs::create_dir_all(out_dir)?;

    let sources: Vec<PathBuf> = WalkDir::new(in_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();

    Ok(sources
        .par_iter()
        .map(|source| {
            let (dest, thumb) = output_names(source, out_dir, thumbs);
            let result = preparer.process(source, &dest, thumb.as_deref());
            BatchEntry {
                source: source.clone(),
                dest,
                thumb,
                result,
            }
        })
        .collect())
}
