// THEORY:
// The `Grid` is the calibrated state the whole engine works to produce: the
// origin of the writable column, the pixel dimensions of one cell, and the
// ordered list of shifts recovered from the vertical scan. It is created
// only by a successful calibration pass and is read-only afterwards; a known
// viewport change invalidates it by discarding it and calibrating again.

use crate::core_modules::partitioner::Shift;

/// The calibrated grid. Coordinates are local to the configured capture
/// region; the pipeline converts to absolute screen coordinates when emitting
/// placements.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// x of the writable column's center (the rightmost detected cell).
    pub origin_x: u32,
    /// y of the first sampled cell interior.
    pub origin_y: u32,
    /// Width of one cell in pixels.
    pub cell_width: u32,
    /// Height of one cell in pixels.
    pub cell_height: u32,
    /// Invariant: exactly the configured shift count (21), enforced by the
    /// calibrator before construction.
    shifts: Vec<Shift>,
}

impl Grid {
    pub(crate) fn new(
        origin_x: u32,
        origin_y: u32,
        cell_width: u32,
        cell_height: u32,
        shifts: Vec<Shift>,
    ) -> Self {
        Self {
            origin_x,
            origin_y,
            cell_width,
            cell_height,
            shifts,
        }
    }

    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    pub fn shift(&self, index: usize) -> Option<&Shift> {
        self.shifts.get(index)
    }

    pub fn shift_count(&self) -> usize {
        self.shifts.len()
    }
}
