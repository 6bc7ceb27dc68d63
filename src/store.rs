//! Avatar storage: one temporary working file plus user-named copies.
//!
//! The temporary artifact is a one-slot mailbox. Capture and load overwrite
//! it; preview and save only read it.

use std::ffi::OsStr;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};

use crate::transform::AvatarStyle;

/// Errors from reading or writing avatar files.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("File name is empty")]
    EmptyName,

    #[error("'{0}' is not a plain file name")]
    InvalidName(String),

    #[error("No avatar at {}", .0.display())]
    MissingSource(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image error on {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl StoreError {
    /// True for the "nothing to save yet" / "no name given" class of errors.
    pub fn is_missing_precondition(&self) -> bool {
        matches!(
            self,
            Self::EmptyName | Self::InvalidName(_) | Self::MissingSource(_)
        )
    }
}

/// Avatar files for one style inside one output directory.
#[derive(Debug, Clone)]
pub struct AvatarStore {
    dir: PathBuf,
    temp_name: &'static str,
}

impl AvatarStore {
    pub fn new(dir: impl Into<PathBuf>, style: AvatarStyle) -> Self {
        Self {
            dir: dir.into(),
            temp_name: style.temp_file_name(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the temporary artifact.
    pub fn temp_path(&self) -> PathBuf {
        self.dir.join(self.temp_name)
    }

    /// Whether a temporary artifact exists.
    pub fn has_current(&self) -> bool {
        self.temp_path().is_file()
    }

    /// Overwrite the temporary artifact with `image` (PNG).
    ///
    /// The image is fully encoded before the file is touched, so an encode
    /// failure leaves the previous artifact in place.
    pub fn persist_temp(&self, image: &RgbImage) -> Result<PathBuf, StoreError> {
        let path = self.temp_path();

        let mut encoded = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .map_err(|source| StoreError::Image {
                path: path.clone(),
                source,
            })?;

        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, encoded).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        log::debug!("Wrote temporary avatar {:?}", path);
        Ok(path)
    }

    /// Copy the temporary artifact to `{name}.png`.
    ///
    /// `name` is trimmed and must be a non-empty plain file name, so the
    /// copy always lands in the output directory. Fails with
    /// [`StoreError::MissingSource`] when nothing has been captured yet.
    /// No file is created on failure.
    pub fn persist_named(&self, name: &str) -> Result<PathBuf, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if Path::new(name).file_name() != Some(OsStr::new(name)) || name.contains(['/', '\\']) {
            return Err(StoreError::InvalidName(name.to_string()));
        }

        let source = self.temp_path();
        if !source.is_file() {
            return Err(StoreError::MissingSource(source));
        }

        // Read fully before writing: the target may be the temp file itself
        let bytes = fs::read(&source).map_err(|e| StoreError::Io {
            path: source.clone(),
            source: e,
        })?;
        let target = self.dir.join(format!("{}.png", name));
        fs::write(&target, bytes).map_err(|source| StoreError::Io {
            path: target.clone(),
            source,
        })?;

        log::info!("Saved avatar to {:?}", target);
        Ok(target)
    }

    /// Decode the temporary artifact.
    pub fn load_current(&self) -> Result<RgbImage, StoreError> {
        let path = self.temp_path();
        if !path.is_file() {
            return Err(StoreError::MissingSource(path));
        }
        let image = image::open(&path).map_err(|source| StoreError::Image {
            path: path.clone(),
            source,
        })?;
        Ok(image.to_rgb8())
    }
}
