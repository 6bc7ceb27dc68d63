//! Application state and the user actions that drive it.
//!
//! Every user action takes the current [`AppState`] and yields the next one
//! plus at most one [`Effect`] for the shell to show. Errors never escape a
//! handler: each one becomes an error dialog and the booth returns to idle.

use std::path::{Path, PathBuf};

use crate::camera::{
    capture_frame, CameraError, CameraSettings, CaptureOptions, CaptureOutcome, Frame,
    FrameSource, SignalSource,
};
use crate::store::{AvatarStore, StoreError};
use crate::transform::{AvatarStyle, AvatarTransform, Rendered, TransformError};

/// File extensions accepted by the load action.
pub const LOADABLE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// What the shell needs to know to draw itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Avatar currently on display (the temporary artifact)
    pub current_avatar: Option<PathBuf>,
    /// Label behind the current emoji, if any
    pub last_emotion: Option<crate::emotion::Emotion>,
}

/// Named user actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Capture,
    Load(PathBuf),
    Save(String),
    Exit,
}

/// Side effect for the shell to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Info { title: String, message: String },
    Error { title: String, message: String },
    Exit,
}

impl Effect {
    fn info(title: &str, message: impl Into<String>) -> Self {
        Self::Info {
            title: title.to_string(),
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self::Error {
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

/// Result of handling one action.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: AppState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn stay(state: AppState, effect: Effect) -> Self {
        Self {
            state,
            effect: Some(effect),
        }
    }
}

/// Where the frame behind a new avatar came from.
#[derive(Debug, Clone, Copy)]
enum Origin {
    Camera,
    File,
}

/// Hardware the capture action needs: a way to open the camera and the
/// confirm/cancel signals.
pub trait Devices {
    type Source: FrameSource;
    type Signals: SignalSource + ?Sized;

    fn open_camera(&mut self) -> Result<Self::Source, CameraError>;

    fn signals(&mut self) -> &mut Self::Signals;
}

/// Runs user actions against a transform, a store and the devices.
pub struct Pipeline<T, D> {
    transform: T,
    store: AvatarStore,
    devices: D,
    options: CaptureOptions,
}

impl<T: AvatarTransform, D: Devices> Pipeline<T, D> {
    pub fn new(transform: T, store: AvatarStore, devices: D) -> Self {
        Self {
            transform,
            store,
            devices,
            options: CaptureOptions::default(),
        }
    }

    pub fn with_capture_options(mut self, options: CaptureOptions) -> Self {
        self.options = options;
        self
    }

    pub fn style(&self) -> AvatarStyle {
        self.transform.style()
    }

    pub fn store(&self) -> &AvatarStore {
        &self.store
    }

    pub fn devices_mut(&mut self) -> &mut D {
        &mut self.devices
    }

    /// Handle one action.
    pub fn handle(&mut self, state: AppState, action: Action) -> Transition {
        log::debug!("Handling {:?}", action);
        match action {
            Action::Capture => self.capture(state),
            Action::Load(path) => self.load(state, &path),
            Action::Save(name) => self.save(state, &name),
            Action::Exit => Transition {
                state,
                effect: Some(Effect::Exit),
            },
        }
    }

    fn capture(&mut self, state: AppState) -> Transition {
        let source = match self.devices.open_camera() {
            Ok(source) => source,
            Err(e) => {
                log::error!("{}", e);
                return Transition::stay(state, Effect::error("Failed to access the camera."));
            }
        };

        let frame = match capture_frame(source, self.devices.signals(), self.options) {
            Ok(CaptureOutcome::Confirmed(frame)) => frame,
            Ok(CaptureOutcome::Cancelled) => {
                return Transition {
                    state,
                    effect: None,
                }
            }
            Err(e) => {
                log::error!("{}", e);
                return Transition::stay(state, Effect::error("Failed to access the camera."));
            }
        };

        self.render_and_store(state, &frame, Origin::Camera)
    }

    fn load(&mut self, state: AppState, path: &Path) -> Transition {
        if !self.transform.accepts_files() {
            return Transition::stay(
                state,
                Effect::error("Loading images is not supported by this avatar style."),
            );
        }

        if !has_loadable_extension(path) {
            return Transition::stay(
                state,
                Effect::error("Please choose a .png, .jpg or .jpeg image."),
            );
        }

        let image = match image::open(path) {
            Ok(image) => image.to_rgb8(),
            Err(e) => {
                log::error!("Failed to read {:?}: {}", path, e);
                return Transition::stay(
                    state,
                    Effect::error(format!("Could not read image {}.", path.display())),
                );
            }
        };

        self.render_and_store(state, &Frame::from_image(image), Origin::File)
    }

    fn render_and_store(&mut self, state: AppState, frame: &Frame, origin: Origin) -> Transition {
        let Rendered { image, emotion } = match self.transform.apply(frame) {
            Ok(rendered) => rendered,
            Err(TransformError::Classification(e)) => {
                log::error!("Error detecting emotion: {}", e);
                return Transition::stay(state, Effect::error("Could not detect emotion. Try again."));
            }
            Err(e) => {
                log::error!("{}", e);
                return Transition::stay(state, Effect::error(e.to_string()));
            }
        };

        let path = match self.store.persist_temp(&image) {
            Ok(path) => path,
            Err(e) => {
                log::error!("{}", e);
                return Transition::stay(state, Effect::error(format!("Could not store avatar: {}", e)));
            }
        };

        let (title, message) = match (origin, emotion) {
            (Origin::Camera, Some(emotion)) => (
                "Capture Complete",
                format!("Emotion detected: {}. Avatar created!", emotion),
            ),
            (Origin::Camera, None) => ("Capture Complete", "Avatar captured successfully!".to_string()),
            (Origin::File, _) => (
                "Processing Complete",
                "Avatar created from the selected image!".to_string(),
            ),
        };

        Transition {
            state: AppState {
                current_avatar: Some(path),
                last_emotion: emotion,
            },
            effect: Some(Effect::info(title, message)),
        }
    }

    fn save(&mut self, state: AppState, name: &str) -> Transition {
        match self.store.persist_named(name) {
            Ok(path) => Transition::stay(
                state,
                Effect::info("Save Complete", format!("Avatar saved as {}", path.display())),
            ),
            Err(StoreError::EmptyName | StoreError::InvalidName(_)) => {
                Transition::stay(state, Effect::error("Please enter a valid file name."))
            }
            Err(StoreError::MissingSource(_)) => Transition::stay(
                state,
                Effect::error("No avatar found. Please capture one first."),
            ),
            Err(e) => {
                log::error!("{}", e);
                Transition::stay(state, Effect::error(format!("Could not save avatar: {}", e)))
            }
        }
    }
}

pub fn has_loadable_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            LOADABLE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// Devices backed by the real camera and a caller-provided signal source.
pub struct LiveDevices<P> {
    settings: CameraSettings,
    signals: P,
}

impl<P: SignalSource> LiveDevices<P> {
    pub fn new(settings: CameraSettings, signals: P) -> Self {
        Self { settings, signals }
    }
}

impl<P: SignalSource> Devices for LiveDevices<P> {
    type Source = Box<dyn FrameSource>;
    type Signals = P;

    fn open_camera(&mut self) -> Result<Self::Source, CameraError> {
        crate::camera::open_camera(self.settings.clone())
    }

    fn signals(&mut self) -> &mut P {
        &mut self.signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CaptureSignal;
    use crate::transform::Stylize;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    struct Never;

    struct NoCamera(Never);

    impl SignalSource for Never {
        fn poll(&mut self) -> Option<CaptureSignal> {
            None
        }
    }

    impl Devices for NoCamera {
        type Source = Box<dyn FrameSource>;
        type Signals = Never;

        fn open_camera(&mut self) -> Result<Self::Source, CameraError> {
            Err(CameraError::DeviceNotFound(0))
        }

        fn signals(&mut self) -> &mut Never {
            &mut self.0
        }
    }

    fn pipeline(dir: &TempDir) -> Pipeline<Stylize, NoCamera> {
        Pipeline::new(
            Stylize,
            AvatarStore::new(dir.path(), AvatarStyle::Stylize),
            NoCamera(Never),
        )
    }

    fn error_message(transition: &Transition) -> &str {
        match &transition.effect {
            Some(Effect::Error { message, .. }) => message,
            other => panic!("Expected error dialog, got {:?}", other),
        }
    }

    #[test]
    fn test_capture_without_camera_reports_device_error() {
        let dir = TempDir::new().unwrap();
        let transition = pipeline(&dir).handle(AppState::default(), Action::Capture);

        assert_eq!(error_message(&transition), "Failed to access the camera.");
        assert_eq!(transition.state, AppState::default());
        assert!(!dir.path().join("avatar_temp.png").exists());
    }

    #[test]
    fn test_save_before_capture() {
        let dir = TempDir::new().unwrap();
        let transition = pipeline(&dir).handle(AppState::default(), Action::Save("x".into()));

        assert_eq!(
            error_message(&transition),
            "No avatar found. Please capture one first."
        );
        assert!(!dir.path().join("x.png").exists());
    }

    #[test]
    fn test_save_with_blank_name() {
        let dir = TempDir::new().unwrap();
        let transition = pipeline(&dir).handle(AppState::default(), Action::Save("   ".into()));
        assert_eq!(error_message(&transition), "Please enter a valid file name.");
    }

    #[test]
    fn test_save_with_path_name() {
        let dir = TempDir::new().unwrap();
        let transition =
            pipeline(&dir).handle(AppState::default(), Action::Save("sub/me".into()));
        assert_eq!(error_message(&transition), "Please enter a valid file name.");
        assert!(!dir.path().join("sub").exists());
    }

    #[test]
    fn test_load_then_save() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("photo.PNG");
        RgbImage::from_pixel(12, 8, Rgb([200, 100, 50]))
            .save(&input)
            .unwrap();

        let mut pipeline = pipeline(&dir);
        let loaded = pipeline.handle(AppState::default(), Action::Load(input));

        assert_eq!(
            loaded.effect,
            Some(Effect::Info {
                title: "Processing Complete".to_string(),
                message: "Avatar created from the selected image!".to_string(),
            })
        );
        assert_eq!(
            loaded.state.current_avatar,
            Some(dir.path().join("avatar_temp.png"))
        );

        let saved = pipeline.handle(loaded.state, Action::Save("mine".into()));
        assert!(matches!(saved.effect, Some(Effect::Info { .. })));
        assert!(dir.path().join("mine.png").is_file());
    }

    #[test]
    fn test_load_rejects_other_extensions() {
        let dir = TempDir::new().unwrap();
        let transition = pipeline(&dir).handle(
            AppState::default(),
            Action::Load(dir.path().join("notes.txt")),
        );
        assert!(error_message(&transition).contains(".png"));
    }

    #[test]
    fn test_load_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let bogus = dir.path().join("broken.jpg");
        std::fs::write(&bogus, b"not a jpeg").unwrap();

        let transition = pipeline(&dir).handle(AppState::default(), Action::Load(bogus));

        assert!(error_message(&transition).starts_with("Could not read image"));
        assert!(!dir.path().join("avatar_temp.png").exists());
    }

    #[test]
    fn test_exit() {
        let dir = TempDir::new().unwrap();
        let transition = pipeline(&dir).handle(AppState::default(), Action::Exit);
        assert_eq!(transition.effect, Some(Effect::Exit));
    }

    #[test]
    fn test_loadable_extensions() {
        assert!(has_loadable_extension(Path::new("a.png")));
        assert!(has_loadable_extension(Path::new("a.JPEG")));
        assert!(has_loadable_extension(Path::new("dir/a.jpg")));
        assert!(!has_loadable_extension(Path::new("a.gif")));
        assert!(!has_loadable_extension(Path::new("png")));
    }
}
