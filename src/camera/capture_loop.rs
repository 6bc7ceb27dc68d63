//! Blocking capture loop: pull frames until the user confirms or cancels.

use std::sync::mpsc::Receiver;
use std::thread;
use std::time::Duration;

use super::source::FrameSource;
use super::types::{CameraError, Frame};

/// The two exclusive signals the user can give while the camera is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSignal {
    /// Keep the current frame
    Confirm,
    /// Leave without a frame
    Cancel,
}

/// Non-blocking source of capture signals, polled once per loop iteration.
pub trait SignalSource {
    /// Return the next pending signal, if any.
    fn poll(&mut self) -> Option<CaptureSignal>;

    /// Drop signals that arrived before the capture started.
    fn clear(&mut self) {}
}

impl SignalSource for Receiver<CaptureSignal> {
    fn poll(&mut self) -> Option<CaptureSignal> {
        self.try_recv().ok()
    }

    fn clear(&mut self) {
        while self.try_recv().is_ok() {}
    }
}

/// How a capture ended.
#[derive(Debug)]
pub enum CaptureOutcome {
    /// The user confirmed; carries the frame read in that iteration
    Confirmed(Frame),
    /// The user cancelled before confirming
    Cancelled,
}

/// Capture loop tuning.
#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions {
    /// Pause between iterations
    pub poll_interval: Duration,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1),
        }
    }
}

/// Run the capture loop until a confirm or cancel signal arrives.
///
/// Each iteration reads one frame, then polls for a signal. The source is
/// consumed and dropped before this returns on every path, which releases
/// the device. A read failure aborts the loop; there is no retry and no
/// timeout.
pub fn capture_frame<S, P>(
    mut source: S,
    signals: &mut P,
    options: CaptureOptions,
) -> Result<CaptureOutcome, CameraError>
where
    S: FrameSource,
    P: SignalSource + ?Sized,
{
    signals.clear();

    let outcome = loop {
        let frame = match source.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("Camera read failed: {}", e);
                break Err(e);
            }
        };

        match signals.poll() {
            Some(CaptureSignal::Confirm) => {
                log::info!("Frame confirmed ({}x{})", frame.width, frame.height);
                break Ok(CaptureOutcome::Confirmed(frame));
            }
            Some(CaptureSignal::Cancel) => {
                log::info!("Capture cancelled");
                break Ok(CaptureOutcome::Cancelled);
            }
            None => {}
        }

        if !options.poll_interval.is_zero() {
            thread::sleep(options.poll_interval);
        }
    };

    drop(source);
    outcome
}
