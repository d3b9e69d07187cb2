// THEORY:
// All failure modes of the engine live in a single `EngineError` enum. The
// calibration loop relies on being able to tell the recoverable kinds
// (`NoCellsFound`, `NoBoundariesFound`, `ShiftCountMismatch` — "we are not
// looking at a rota yet") apart from the fatal ones (`CalibrationFailed`,
// collaborator I/O failures), so every kind is its own variant rather than a
// stringly-typed message.

use crate::core_modules::mapper::{Period, Weekday};
use thiserror::Error;

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A line orientation other than `vertical` or `horizontal` was requested.
    #[error("'{0}' is not a valid orientation, use 'vertical' or 'horizontal'")]
    InvalidOrientation(String),

    /// A sample coordinate fell outside the captured image.
    #[error("sample coordinate ({x}, {y}) is outside the {width}x{height} capture")]
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    /// The sampled line contained no rota cells. Signals "not looking at a
    /// grid" to the calibrator, which treats it as recoverable.
    #[error("no rota cells found in the sampled line")]
    NoCellsFound,

    /// No color discontinuity was found between adjacent cell centers, so the
    /// centers cannot be partitioned into shifts.
    #[error("no color boundaries found between cell centers")]
    NoBoundariesFound,

    /// The vertical scan produced the wrong number of shifts, meaning part of
    /// the rota is off screen. Recoverable via a viewport adjustment.
    #[error("expected {expected} shifts on screen, found {found}")]
    ShiftCountMismatch { expected: usize, found: usize },

    /// The reference shift held a single cell, leaving no center pair to
    /// derive the cell height from. Recoverable via a viewport adjustment.
    #[error("reference shift too small to derive a cell height")]
    ReferenceShiftTooSmall,

    /// The retry loop exhausted its attempt budget without producing a grid.
    #[error("calibration failed after {attempts} attempts")]
    CalibrationFailed { attempts: u32 },

    /// Every cell of the requested shift already holds a name. Recorded into
    /// the failures list by the mapper, never fatal.
    #[error("every cell in the {weekday} {period} shift is already occupied")]
    AllSlotsOccupied { weekday: Weekday, period: Period },

    /// The requested shift index is not present in the calibrated grid.
    /// Unreachable with a full 21-shift grid, since weekday*3 + period never
    /// exceeds 20.
    #[error("shift {index} is not in the calibrated grid of {available} shifts")]
    MissingShift { index: usize, available: usize },

    /// A request string did not name a weekday and period.
    #[error("'{0}' is not a rota request, expected e.g 'wednesday evening'")]
    InvalidRequest(String),

    /// The screen-capture collaborator failed.
    #[error("screen capture failed: {0}")]
    Capture(String),

    /// The viewport-control collaborator failed.
    #[error("viewport control failed: {0}")]
    Viewport(String),
}

impl EngineError {
    /// True for the "not looking at a full rota yet" kinds the calibration
    /// loop retries with a viewport correction. Everything else is fatal.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::NoCellsFound
                | EngineError::NoBoundariesFound
                | EngineError::ShiftCountMismatch { .. }
                | EngineError::ReferenceShiftTooSmall
        )
    }
}
