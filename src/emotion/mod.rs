//! Emotion-conditioned avatars.
//!
//! A classifier turns a frame into one of six [`Emotion`] labels, then
//! [`render_avatar`] draws a fixed-layout emoji face whose colors and mouth
//! depend on that label.

mod avatar;
pub mod classifier;
mod draw;
mod label;
mod palette;

pub use avatar::{create_emotion_avatar, render_avatar, AVATAR_SIZE};
#[cfg(feature = "onnx")]
pub use classifier::OnnxEmotionClassifier;
pub use classifier::{load_classifier, ClassifierError, EmotionClassifier, UnavailableClassifier};
pub use label::Emotion;
pub use palette::{FaceColors, MouthShape};
