// THEORY:
// The engine never touches the operating system directly. Everything it needs
// from the outside world comes through the three trait seams in this module:
// a screen-capture source, a viewport controller for zoom/scroll corrections,
// and an input injector that consumes the placements the engine produces.
// Tests drive the whole pipeline with in-memory fakes of these traits; a real
// deployment wires them to platform backends.

use crate::error::Result;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// A rectangular region of the screen in absolute screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self { left, top, width, height }
    }

    /// The region of the given dimensions whose midpoint is (x, y).
    pub fn centered_on(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            left: x.saturating_sub(width / 2),
            top: y.saturating_sub(height / 2),
            width,
            height,
        }
    }
}

/// Source of screen snapshots. Capturing blocks until the backend has a frame
/// reflecting the current on-screen rendering.
pub trait ScreenCapture {
    fn capture(&mut self, region: Region) -> Result<RgbImage>;
}

/// Mutates what subsequent captures will see. Each call blocks until the
/// backend has issued the input events; the caller is responsible for waiting
/// out any zoom/scroll animation before capturing again.
pub trait ViewportControl {
    fn focus(&mut self) -> Result<()>;
    fn zoom_out(&mut self, steps: u32) -> Result<()>;
    fn scroll_left(&mut self, amount: u32) -> Result<()>;
    fn page_up(&mut self) -> Result<()>;
}

/// Consumer of the engine's placements. The engine itself never issues input;
/// it only produces coordinates and text for an implementation of this trait.
pub trait InputInjection {
    fn move_and_activate(&mut self, x: u32, y: u32) -> Result<()>;
    fn type_text(&mut self, text: &str) -> Result<()>;
    fn cancel(&mut self) -> Result<()>;
}
