//! The host-system bridge.
//!
//! A [`HostBridge`] delivers raw input to the root window and receives the
//! composited frame. [`HeadlessBridge`] is an in-memory implementation used
//! for tests and offscreen rendering: input is scripted, frames are captured.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use horizon_strata_core::{KeyCode, MouseButton};
use horizon_strata_render::{Area, Point, RgbaImage, Size};
use parking_lot::Mutex;

use crate::error::HostError;

/// Raw input delivered by the host, in root coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum HostInput {
    /// The pointer moved to a new position.
    PointerMoved(Point),
    /// A mouse button changed state.
    Button { button: MouseButton, pressed: bool },
    /// A key changed state.
    Key { key: KeyCode, pressed: bool },
    /// A scroll delta in logical pixels.
    Scroll(Point),
    /// The window was resized.
    Configure(Size),
    /// The user asked to close the window.
    CloseRequested,
}

/// Connection between the root window and the windowing system.
pub trait HostBridge {
    /// Take all input received since the last poll.
    fn poll_input(&mut self) -> Result<Vec<HostInput>, HostError>;

    /// Show `frame`. Only `dirty` changed since the last present.
    fn present(&mut self, frame: &RgbaImage, dirty: Area) -> Result<(), HostError>;

    /// Block until input arrives or `timeout` passes.
    fn wait(&mut self, timeout: Duration);
}

#[derive(Debug, Default)]
struct HeadlessState {
    input: VecDeque<HostInput>,
    poll_error: Option<HostError>,
    present_error: Option<HostError>,
    last_frame: Option<RgbaImage>,
    last_dirty: Option<Area>,
    presents: usize,
}

/// A bridge without a window.
///
/// Clones share state, so a test can keep one handle while the root window
/// owns another.
///
/// # Example
///
/// ```
/// use horizon_strata::window::{HeadlessBridge, HostBridge, HostInput};
/// use horizon_strata::render::Point;
///
/// let host = HeadlessBridge::new();
/// let mut bridge = host.clone();
/// host.push_input(HostInput::PointerMoved(Point::new(3.0, 4.0)));
///
/// assert_eq!(bridge.poll_input().unwrap().len(), 1);
/// assert!(bridge.poll_input().unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct HeadlessBridge {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue input for the next poll.
    pub fn push_input(&self, input: HostInput) {
        self.state.lock().input.push_back(input);
    }

    /// Queue several inputs for the next poll.
    pub fn push_inputs(&self, inputs: impl IntoIterator<Item = HostInput>) {
        self.state.lock().input.extend(inputs);
    }

    /// Make the next poll fail with `error`.
    pub fn fail_next_poll(&self, error: HostError) {
        self.state.lock().poll_error = Some(error);
    }

    /// Make the next present fail with `error`.
    pub fn fail_next_present(&self, error: HostError) {
        self.state.lock().present_error = Some(error);
    }

    /// A copy of the most recently presented frame.
    pub fn last_frame(&self) -> Option<RgbaImage> {
        self.state.lock().last_frame.clone()
    }

    /// The dirty hint of the most recent present.
    pub fn last_dirty(&self) -> Option<Area> {
        self.state.lock().last_dirty
    }

    /// Number of successful presents.
    pub fn present_count(&self) -> usize {
        self.state.lock().presents
    }
}

impl HostBridge for HeadlessBridge {
    fn poll_input(&mut self) -> Result<Vec<HostInput>, HostError> {
        let mut state = self.state.lock();
        if let Some(error) = state.poll_error.take() {
            return Err(error);
        }
        Ok(state.input.drain(..).collect())
    }

    fn present(&mut self, frame: &RgbaImage, dirty: Area) -> Result<(), HostError> {
        let mut state = self.state.lock();
        if let Some(error) = state.present_error.take() {
            return Err(error);
        }
        state.last_frame = Some(frame.clone());
        state.last_dirty = Some(dirty);
        state.presents += 1;
        Ok(())
    }

    fn wait(&mut self, _timeout: Duration) {}
}
