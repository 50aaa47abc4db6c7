//! Asset error types
//!
//! Errors reported by mesh and texture loaders.

use std::io;

use thiserror::Error;

/// Error type for asset operations
#[derive(Debug, Error)]
pub enum AssetError {
    /// IO error (file not found, permission denied, etc.)
    #[error("Asset IO error: {0}")]
    Io(#[from] io::Error),
    /// Parse error (invalid file contents)
    #[error("Asset parse error: {0}")]
    Parse(String),
    /// No loader handles this file type
    #[error("Unsupported asset format: {0}")]
    Unsupported(String),
}

impl From<tobj::LoadError> for AssetError {
    fn from(err: tobj::LoadError) -> Self {
        AssetError::Parse(err.to_string())
    }
}

impl From<image::ImageError> for AssetError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io_err) => AssetError::Io(io_err),
            image::ImageError::Unsupported(e) => AssetError::Unsupported(e.to_string()),
            other => AssetError::Parse(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file missing");
        let asset_err = AssetError::Io(io_err);
        let msg = format!("{}", asset_err);
        assert!(msg.contains("IO error"));
        assert!(msg.contains("file missing"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = AssetError::Parse("invalid format".to_string());
        assert_eq!(format!("{}", err), "Asset parse error: invalid format");
    }

    #[test]
    fn test_unsupported_display() {
        let err = AssetError::Unsupported("dome.ply".to_string());
        assert!(format!("{}", err).contains("dome.ply"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let asset_err: AssetError = io_err.into();
        match asset_err {
            AssetError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_error_source() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        assert!(AssetError::Io(io_err).source().is_some());
        assert!(AssetError::Parse("bad".to_string()).source().is_none());
    }
}
