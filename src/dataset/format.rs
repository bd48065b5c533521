//! The closed set of output image formats.
//!
//! Each format maps 1:1 to a subdirectory under the images root. Formats are
//! never created dynamically: a subdirectory whose name is not listed here is
//! ignored at startup.

use super::saver::DatasetError;

/// An output format for saved frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    /// The unprocessed RGB capture. Also the canonical format: its
    /// subdirectory seeds the image identifier at startup.
    Raw,
    /// Canny edge map of the capture.
    Edge,
}

impl ImageFormat {
    /// The canonical format used to bootstrap the next image identifier.
    pub const CANONICAL: ImageFormat = ImageFormat::Raw;

    /// Subdirectory name under the images root.
    pub fn dir_name(self) -> &'static str {
        match self {
            ImageFormat::Raw => "raw",
            ImageFormat::Edge => "edge",
        }
    }

    /// Parses a subdirectory name, rejecting anything outside the known set.
    pub fn from_dir_name(name: &str) -> Result<Self, DatasetError> {
        match name {
            "raw" => Ok(ImageFormat::Raw),
            "edge" => Ok(ImageFormat::Edge),
            other => Err(DatasetError::FormatNotSupported {
                format: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_name_round_trip() {
        for format in [ImageFormat::Raw, ImageFormat::Edge] {
            assert_eq!(ImageFormat::from_dir_name(format.dir_name()).unwrap(), format);
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let err = ImageFormat::from_dir_name("thumbnail").unwrap_err();

        match err {
            DatasetError::FormatNotSupported { format } => assert_eq!(format, "thumbnail"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
