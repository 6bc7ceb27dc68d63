//! Emotion inference on a single frame.
//!
//! The bundled implementation runs a FER+ style ONNX model: one grayscale
//! 64x64 input, eight class scores out. There is no face detector in front
//! of it; the model sees a center square crop of the frame, so a frame with
//! no clearly visible face still gets a best-effort label.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};

use super::label::Emotion;
use crate::camera::Frame;
use crate::stylize::to_grayscale;

/// Side of the square model input.
pub const INPUT_SIZE: u32 = 64;

/// Class order of the FER+ output vector. Labels outside the booth's fixed
/// set map to neutral through [`Emotion::from_label`].
pub const FERPLUS_LABELS: [&str; 8] = [
    "neutral", "happy", "surprise", "sad", "angry", "disgust", "fear", "contempt",
];

/// Errors from emotion inference.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Emotion model not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("Failed to load emotion model: {0}")]
    Load(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Model produced no usable scores")]
    NoScores,

    #[error("Frame has no pixels")]
    EmptyFrame,

    #[error("Emotion detection unavailable: {0}")]
    Unavailable(String),
}

/// Frame → most likely emotion.
pub trait EmotionClassifier {
    fn classify(&mut self, frame: &Frame) -> Result<Emotion, ClassifierError>;
}

impl<C: EmotionClassifier + ?Sized> EmotionClassifier for Box<C> {
    fn classify(&mut self, frame: &Frame) -> Result<Emotion, ClassifierError> {
        (**self).classify(frame)
    }
}

/// Stand-in used when no model could be loaded; every call fails.
#[derive(Debug, Clone)]
pub struct UnavailableClassifier {
    reason: String,
}

impl UnavailableClassifier {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl EmotionClassifier for UnavailableClassifier {
    fn classify(&mut self, _frame: &Frame) -> Result<Emotion, ClassifierError> {
        Err(ClassifierError::Unavailable(self.reason.clone()))
    }
}

/// Center-crop, grayscale and resize a frame into the model input
/// (row-major, values 0-255 as `f32`).
pub fn preprocess(frame: &Frame) -> Result<Vec<f32>, ClassifierError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(ClassifierError::EmptyFrame);
    }
    let image = frame.to_image().ok_or(ClassifierError::EmptyFrame)?;

    let side = frame.width.min(frame.height);
    let x = (frame.width - side) / 2;
    let y = (frame.height - side) / 2;
    let square = imageops::crop_imm(&image, x, y, side, side).to_image();

    let gray = to_grayscale(&square);
    let small = imageops::resize(&gray, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

    Ok(small.as_raw().iter().map(|&v| v as f32).collect())
}

/// Pick the arg-max class and map it onto the fixed label set.
pub fn pick_label(scores: &[f32]) -> Result<Emotion, ClassifierError> {
    if scores.is_empty() || scores.iter().any(|s| !s.is_finite()) {
        return Err(ClassifierError::NoScores);
    }

    let (best, _) = scores
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .ok_or(ClassifierError::NoScores)?;

    let label = FERPLUS_LABELS.get(best).copied().unwrap_or("neutral");
    log::debug!("Emotion scores {:?} -> {}", scores, label);
    Ok(Emotion::from_label(label))
}

/// ONNX Runtime backed classifier.
#[cfg(feature = "onnx")]
pub struct OnnxEmotionClassifier {
    session: ort::session::Session,
}

#[cfg(feature = "onnx")]
impl OnnxEmotionClassifier {
    /// Load the model at `path`.
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        if !path.exists() {
            return Err(ClassifierError::ModelNotFound(path.to_path_buf()));
        }

        let session = ort::session::Session::builder()
            .map_err(|e| ClassifierError::Load(e.to_string()))?
            .with_intra_threads(2)
            .map_err(|e| ClassifierError::Load(e.to_string()))?
            .commit_from_file(path)
            .map_err(|e| ClassifierError::Load(e.to_string()))?;

        log::info!("Loaded emotion model from {:?}", path);
        Ok(Self { session })
    }
}

#[cfg(feature = "onnx")]
impl EmotionClassifier for OnnxEmotionClassifier {
    fn classify(&mut self, frame: &Frame) -> Result<Emotion, ClassifierError> {
        use ndarray::Array4;

        let input = preprocess(frame)?;
        let side = INPUT_SIZE as usize;
        let input_array = Array4::from_shape_vec((1, 1, side, side), input)
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;
        let input_tensor = ort::value::Tensor::from_array(input_array)
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let outputs = self
            .session
            .run(ort::inputs![input_tensor])
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let output = outputs.iter().next().ok_or(ClassifierError::NoScores)?;
        let (_shape, scores) = output
            .1
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        pick_label(scores)
    }
}

/// Load the configured classifier, or a stand-in that reports why it could
/// not be loaded.
pub fn load_classifier(model: &Path) -> Box<dyn EmotionClassifier> {
    #[cfg(feature = "onnx")]
    {
        match OnnxEmotionClassifier::load(model) {
            Ok(classifier) => Box::new(classifier),
            Err(e) => {
                log::warn!("{}. Emotion detection disabled.", e);
                Box::new(UnavailableClassifier::new(e.to_string()))
            }
        }
    }
    #[cfg(not(feature = "onnx"))]
    {
        log::warn!("Built without ONNX support; ignoring model {:?}", model);
        Box::new(UnavailableClassifier::new("built without ONNX support"))
    }
}
