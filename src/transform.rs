//! Pluggable frame → avatar strategies.
//!
//! Both avatar styles sit behind [`AvatarTransform`] so the capture, load
//! and save actions do not care which one is active.

use image::RgbImage;
use serde::Deserialize;

use crate::camera::Frame;
use crate::emotion::{render_avatar, ClassifierError, Emotion, EmotionClassifier};
use crate::stylize::cartoonify;

/// Which avatar the booth produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarStyle {
    /// Edge + color cartoon filter
    #[default]
    Stylize,
    /// Emoji face drawn from the detected emotion
    Emotion,
}

impl AvatarStyle {
    /// Well-known name of the temporary artifact for this style.
    pub fn temp_file_name(self) -> &'static str {
        match self {
            Self::Stylize => "avatar_temp.png",
            Self::Emotion => "emotion_avatar_temp.png",
        }
    }
}

impl std::fmt::Display for AvatarStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stylize => write!(f, "stylize"),
            Self::Emotion => write!(f, "emotion"),
        }
    }
}

/// Errors from turning a frame into an avatar.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Frame buffer does not match its {width}x{height} size")]
    InvalidFrame { width: u32, height: u32 },

    #[error("Could not detect emotion: {0}")]
    Classification(#[from] ClassifierError),
}

/// Output of a transform.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub image: RgbImage,
    /// Set by the emotion style
    pub emotion: Option<Emotion>,
}

/// A frame → avatar strategy.
pub trait AvatarTransform {
    fn style(&self) -> AvatarStyle;

    /// Whether pictures loaded from disk may be fed to this transform.
    fn accepts_files(&self) -> bool {
        false
    }

    fn apply(&mut self, frame: &Frame) -> Result<Rendered, TransformError>;
}

impl<T: AvatarTransform + ?Sized> AvatarTransform for Box<T> {
    fn style(&self) -> AvatarStyle {
        (**self).style()
    }

    fn accepts_files(&self) -> bool {
        (**self).accepts_files()
    }

    fn apply(&mut self, frame: &Frame) -> Result<Rendered, TransformError> {
        (**self).apply(frame)
    }
}

/// Cartoon filter at the frame's own resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stylize;

impl AvatarTransform for Stylize {
    fn style(&self) -> AvatarStyle {
        AvatarStyle::Stylize
    }

    fn accepts_files(&self) -> bool {
        true
    }

    fn apply(&mut self, frame: &Frame) -> Result<Rendered, TransformError> {
        let image = frame.to_image().ok_or(TransformError::InvalidFrame {
            width: frame.width,
            height: frame.height,
        })?;
        Ok(Rendered {
            image: cartoonify(&image),
            emotion: None,
        })
    }
}

/// Classify the frame, then draw the matching emoji.
pub struct EmotionAvatar<C> {
    classifier: C,
}

impl<C: EmotionClassifier> EmotionAvatar<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }
}

impl<C: EmotionClassifier> AvatarTransform for EmotionAvatar<C> {
    fn style(&self) -> AvatarStyle {
        AvatarStyle::Emotion
    }

    fn apply(&mut self, frame: &Frame) -> Result<Rendered, TransformError> {
        let emotion = self.classifier.classify(frame)?;
        log::info!("Detected emotion: {}", emotion);
        Ok(Rendered {
            image: render_avatar(emotion),
            emotion: Some(emotion),
        })
    }
}
