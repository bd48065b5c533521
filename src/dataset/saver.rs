//! Sequential multi-format frame saving.
//!
//! `FrameSaver` owns the next image identifier and writes one JPEG per active
//! format for each saved frame. The identifier is bootstrapped once from the
//! canonical `raw` subdirectory at construction and advanced in memory only
//! after a fully successful save; it is never re-scanned during a run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbImage};

use super::format::ImageFormat;
use crate::config::CaptureConfig;
use crate::edge;

/// Converts captured frames into the active output formats and persists them
/// under `<root>/<format>/<id>.jpg`.
pub struct FrameSaver {
    root: PathBuf,
    active_formats: Vec<ImageFormat>,
    next_id: u64,
    canny_thresholds: (f32, f32),
}

impl FrameSaver {
    /// Opens the dataset rooted at the configured images folder.
    ///
    /// The folder skeleton must already exist: the root itself and the
    /// canonical `raw` subdirectory are required, and the active format list
    /// is whatever known subdirectories are present. The identifier sequence
    /// continues from the highest id found in `raw`.
    pub fn new(config: &CaptureConfig) -> Result<Self, DatasetError> {
        let root = crate::paths::resolve_images_root(&config.images_root);
        let active_formats = discover_active_formats(&root)?;
        let next_id = bootstrap_next_id(&root)?;

        Ok(Self {
            root,
            active_formats,
            next_id,
            canny_thresholds: (config.canny_threshold1, config.canny_threshold2),
        })
    }

    /// The identifier the next saved frame will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Formats that are both known and present as subdirectories.
    pub fn active_formats(&self) -> &[ImageFormat] {
        &self.active_formats
    }

    /// Converts a captured frame into the named output format.
    ///
    /// The name-keyed guard mirrors the active-format scan: a name outside the
    /// known set is rejected rather than silently skipped. Unreachable from
    /// `save_next_frame`, which only iterates formats the scan admitted.
    pub fn convert_to_format(
        &self,
        frame: &RgbImage,
        format: &str,
    ) -> Result<DynamicImage, DatasetError> {
        match ImageFormat::from_dir_name(format)? {
            ImageFormat::Raw => Ok(DynamicImage::ImageRgb8(frame.clone())),
            ImageFormat::Edge => {
                let (t1, t2) = self.canny_thresholds;
                Ok(DynamicImage::ImageLuma8(edge::canny(frame, t1, t2)))
            }
        }
    }

    /// Saves the frame once per active format under the current identifier,
    /// then advances the identifier.
    ///
    /// If any write fails the identifier stays put, so a retried save
    /// overwrites whatever formats were already written for that identifier.
    pub fn save_next_frame(&mut self, frame: &RgbImage) -> Result<(), DatasetError> {
        for format in &self.active_formats {
            let converted = self.convert_to_format(frame, format.dir_name())?;
            let path = self
                .root
                .join(format.dir_name())
                .join(format!("{}.jpg", self.next_id));

            converted.save(&path).map_err(|source| DatasetError::Write {
                path: path.clone(),
                source,
            })?;
        }

        self.next_id += 1;
        Ok(())
    }
}

/// Lists the format subdirectories present under the root.
///
/// The active set is the intersection of what exists on disk and what
/// `ImageFormat` knows; unknown subdirectories and loose files are ignored.
fn discover_active_formats(root: &Path) -> Result<Vec<ImageFormat>, DatasetError> {
    let entries = fs::read_dir(root).map_err(|source| DatasetError::MissingDirectory {
        path: root.to_path_buf(),
        source,
    })?;

    let mut formats = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DatasetError::MissingDirectory {
            path: root.to_path_buf(),
            source,
        })?;

        if !entry.path().is_dir() {
            continue;
        }
        if let Ok(format) = ImageFormat::from_dir_name(&entry.file_name().to_string_lossy()) {
            formats.push(format);
        }
    }

    // read_dir order is platform-dependent
    formats.sort_by_key(|f| f.dir_name());
    Ok(formats)
}

/// Continues the identifier sequence from the canonical subdirectory.
///
/// An empty directory starts the sequence at 0; otherwise the next identifier
/// is one past the numeric maximum of the existing `<integer>.jpg` stems. An
/// entry that does not match that pattern means the sequence cannot be safely
/// continued.
fn bootstrap_next_id(root: &Path) -> Result<u64, DatasetError> {
    let canonical = root.join(ImageFormat::CANONICAL.dir_name());
    let entries = fs::read_dir(&canonical).map_err(|source| DatasetError::MissingDirectory {
        path: canonical.clone(),
        source,
    })?;

    let mut max_id: Option<u64> = None;
    for entry in entries {
        let entry = entry.map_err(|source| DatasetError::MissingDirectory {
            path: canonical.clone(),
            source,
        })?;

        let name = entry.file_name().to_string_lossy().into_owned();
        let id = parse_image_id(&name).ok_or(DatasetError::MalformedDataset { entry: name })?;
        max_id = Some(max_id.map_or(id, |m| m.max(id)));
    }

    Ok(max_id.map_or(0, |m| m + 1))
}

/// Parses an `"<integer>.jpg"` filename into its identifier.
fn parse_image_id(name: &str) -> Option<u64> {
    name.strip_suffix(".jpg")?.parse().ok()
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("image format {format:?} is not supported")]
    FormatNotSupported { format: String },
    #[error("malformed dataset state: {entry:?} does not parse as <id>.jpg")]
    MalformedDataset { entry: String },
    #[error("missing dataset directory {}: {source}", .path.display())]
    MissingDirectory { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: image::ImageError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::tempdir;

    fn test_config(root: &Path) -> CaptureConfig {
        CaptureConfig {
            images_root: root.to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    fn make_skeleton(root: &Path, formats: &[&str]) {
        for format in formats {
            fs::create_dir_all(root.join(format)).unwrap();
        }
    }

    fn seed_files(root: &Path, format: &str, names: &[&str]) {
        for name in names {
            fs::write(root.join(format).join(name), b"jpg").unwrap();
        }
    }

    fn test_frame() -> RgbImage {
        RgbImage::from_fn(32, 24, |x, y| Rgb([x as u8 * 8, y as u8 * 10, 128]))
    }

    #[test]
    fn test_bootstrap_empty_dir_starts_at_zero() {
        let dir = tempdir().unwrap();
        make_skeleton(dir.path(), &["raw", "edge"]);

        let saver = FrameSaver::new(&test_config(dir.path())).unwrap();

        assert_eq!(saver.next_id(), 0);
    }

    #[test]
    fn test_bootstrap_continues_past_max() {
        let dir = tempdir().unwrap();
        make_skeleton(dir.path(), &["raw", "edge"]);
        seed_files(dir.path(), "raw", &["0.jpg", "1.jpg", "2.jpg", "5.jpg"]);

        let saver = FrameSaver::new(&test_config(dir.path())).unwrap();

        assert_eq!(saver.next_id(), 6);
    }

    #[test]
    fn test_bootstrap_max_is_numeric_not_lexicographic() {
        let dir = tempdir().unwrap();
        make_skeleton(dir.path(), &["raw"]);
        seed_files(dir.path(), "raw", &["9.jpg", "10.jpg"]);

        let saver = FrameSaver::new(&test_config(dir.path())).unwrap();

        assert_eq!(saver.next_id(), 11);
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = tempdir().unwrap();
        let config = test_config(&dir.path().join("does-not-exist"));

        let err = FrameSaver::new(&config).unwrap_err();

        assert!(matches!(err, DatasetError::MissingDirectory { .. }));
    }

    #[test]
    fn test_missing_canonical_dir_fails() {
        let dir = tempdir().unwrap();
        make_skeleton(dir.path(), &["edge"]);

        let err = FrameSaver::new(&test_config(dir.path())).unwrap_err();

        match err {
            DatasetError::MissingDirectory { path, .. } => {
                assert!(path.ends_with("raw"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_entry_fails() {
        let dir = tempdir().unwrap();
        make_skeleton(dir.path(), &["raw"]);
        seed_files(dir.path(), "raw", &["0.jpg", "latest.jpg"]);

        let err = FrameSaver::new(&test_config(dir.path())).unwrap_err();

        match err {
            DatasetError::MalformedDataset { entry } => assert_eq!(entry, "latest.jpg"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_subdirectories_are_ignored() {
        let dir = tempdir().unwrap();
        make_skeleton(dir.path(), &["raw", "edge", "notes"]);
        fs::write(dir.path().join("README.txt"), b"scratch").unwrap();

        let saver = FrameSaver::new(&test_config(dir.path())).unwrap();

        assert_eq!(
            saver.active_formats(),
            &[ImageFormat::Edge, ImageFormat::Raw]
        );
    }

    #[test]
    fn test_save_writes_one_file_per_format_and_increments() {
        let dir = tempdir().unwrap();
        make_skeleton(dir.path(), &["raw", "edge"]);
        let mut saver = FrameSaver::new(&test_config(dir.path())).unwrap();

        saver.save_next_frame(&test_frame()).unwrap();

        assert!(dir.path().join("raw/0.jpg").is_file());
        assert!(dir.path().join("edge/0.jpg").is_file());
        assert_eq!(saver.next_id(), 1);
    }

    #[test]
    fn test_save_continues_existing_sequence() {
        let dir = tempdir().unwrap();
        make_skeleton(dir.path(), &["raw", "edge"]);
        seed_files(dir.path(), "raw", &["0.jpg"]);
        seed_files(dir.path(), "edge", &["0.jpg"]);

        let mut saver = FrameSaver::new(&test_config(dir.path())).unwrap();
        saver.save_next_frame(&test_frame()).unwrap();

        assert!(dir.path().join("raw/1.jpg").is_file());
        assert!(dir.path().join("edge/1.jpg").is_file());
        assert_eq!(saver.next_id(), 2);
    }

    #[test]
    fn test_raw_only_dataset_saves_raw_only() {
        let dir = tempdir().unwrap();
        make_skeleton(dir.path(), &["raw"]);
        let mut saver = FrameSaver::new(&test_config(dir.path())).unwrap();

        saver.save_next_frame(&test_frame()).unwrap();

        assert!(dir.path().join("raw/0.jpg").is_file());
        assert!(!dir.path().join("edge").exists());
        assert_eq!(saver.active_formats(), &[ImageFormat::Raw]);
    }

    #[test]
    fn test_convert_raw_is_identity() {
        let dir = tempdir().unwrap();
        make_skeleton(dir.path(), &["raw", "edge"]);
        let saver = FrameSaver::new(&test_config(dir.path())).unwrap();
        let frame = test_frame();

        let converted = saver.convert_to_format(&frame, "raw").unwrap();

        assert_eq!(converted.as_rgb8().expect("raw output should be RGB"), &frame);
    }

    #[test]
    fn test_convert_edge_is_single_channel_same_size() {
        let dir = tempdir().unwrap();
        make_skeleton(dir.path(), &["raw", "edge"]);
        let saver = FrameSaver::new(&test_config(dir.path())).unwrap();
        let frame = test_frame();

        let converted = saver.convert_to_format(&frame, "edge").unwrap();

        let edges = converted.as_luma8().expect("edge output should be single-channel");
        assert_eq!(edges.dimensions(), frame.dimensions());
    }

    #[test]
    fn test_convert_unknown_format_fails_and_counter_unchanged() {
        let dir = tempdir().unwrap();
        make_skeleton(dir.path(), &["raw", "edge"]);
        let saver = FrameSaver::new(&test_config(dir.path())).unwrap();

        let err = saver.convert_to_format(&test_frame(), "thumbnail").unwrap_err();

        match err {
            DatasetError::FormatNotSupported { format } => assert_eq!(format, "thumbnail"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(saver.next_id(), 0);
    }

    #[test]
    fn test_parse_image_id() {
        assert_eq!(parse_image_id("42.jpg"), Some(42));
        assert_eq!(parse_image_id("0.jpg"), Some(0));
        assert_eq!(parse_image_id("42.png"), None);
        assert_eq!(parse_image_id("-1.jpg"), None);
        assert_eq!(parse_image_id("a42.jpg"), None);
        assert_eq!(parse_image_id("42"), None);
    }
}
