// THEORY:
// The calibrator is the retry state machine at the heart of the engine. A
// fresh capture gives no guarantee the rota is visible, zoomed right, or
// scrolled to the top-left, so calibration is a loop of phases:
//
//   Searching -> Measuring -> Validating -> { Done | Adjusting }
//                    ^                             |
//                    +------- Searching <----------+
//
// Searching probes horizontal strips down the top third of the capture until
// one crosses rota cells. Measuring derives the cell width and the grid
// origin from that strip. Validating scans a vertical line down the writable
// column and checks that exactly the expected 21 shifts are visible.
// Anything short of that sends the machine to Adjusting, which asks the
// viewport collaborator for a correction (re-focus, zoom out, return to the
// top-left), waits a fixed settle time, re-captures and loops. The loop is
// bounded: exceeding the attempt budget fails with `CalibrationFailed`
// instead of spinning forever on an unsupported layout.
//
// The phase and attempt count travel in an explicit `CalibrationState` value
// that is consumed and returned by each step, never stashed in shared mutable
// fields; the state is destroyed the moment a valid `Grid` comes out.

use crate::capture::{ScreenCapture, ViewportControl};
use crate::core_modules::grid::Grid;
use crate::core_modules::partitioner;
use crate::core_modules::sampler::{self, Orientation, Sample};
use crate::core_modules::segmenter::{self, Cell};
use crate::error::{EngineError, Result};
use crate::pipeline::EngineConfig;
use image::RgbImage;
use log::{debug, info, warn};

/// The phases of a calibration pass.
#[derive(Debug, Clone, PartialEq)]
enum Phase {
    /// Probing horizontal strips for the first line that crosses rota cells.
    Searching,
    /// Deriving cell width and the grid origin from the found strip.
    Measuring { found_y: u32, cells: Vec<Cell> },
    /// Confirming the full shift structure below the origin.
    Validating {
        origin_x: u32,
        origin_y: u32,
        cell_width: u32,
    },
    /// Asking the viewport collaborator for a correction before retrying.
    Adjusting,
    /// Calibration produced a grid.
    Done(Grid),
}

/// Transient record of a calibration pass in flight.
#[derive(Debug)]
struct CalibrationState {
    phase: Phase,
    attempts: u32,
}

/// Drives the sampling/segmentation/partitioning stages against live captures
/// until a valid grid is produced or the attempt budget runs out.
pub struct Calibrator<'a, S: ScreenCapture, V: ViewportControl> {
    capture: &'a mut S,
    viewport: &'a mut V,
    config: &'a EngineConfig,
}

impl<'a, S: ScreenCapture, V: ViewportControl> Calibrator<'a, S, V> {
    pub fn new(capture: &'a mut S, viewport: &'a mut V, config: &'a EngineConfig) -> Self {
        Self {
            capture,
            viewport,
            config,
        }
    }

    /// Runs the state machine to completion. Returns the calibrated grid, or
    /// `CalibrationFailed` once `max_attempts` viewport corrections have been
    /// spent without one.
    pub fn calibrate(&mut self) -> Result<Grid> {
        let mut snapshot = self.capture.capture(self.config.region)?;
        let mut state = CalibrationState {
            phase: Phase::Searching,
            attempts: 0,
        };
        loop {
            state = self.step(state, &mut snapshot)?;
            if let Phase::Done(grid) = state.phase {
                info!(
                    "calibrated: origin=({}, {}), cell {}x{}, {} shifts",
                    grid.origin_x,
                    grid.origin_y,
                    grid.cell_width,
                    grid.cell_height,
                    grid.shift_count()
                );
                return Ok(grid);
            }
        }
    }

    fn step(
        &mut self,
        state: CalibrationState,
        snapshot: &mut RgbImage,
    ) -> Result<CalibrationState> {
        let CalibrationState { phase, attempts } = state;
        let phase = match phase {
            Phase::Searching => self.search(snapshot)?,
            Phase::Measuring { found_y, cells } => self.measure(found_y, cells),
            Phase::Validating {
                origin_x,
                origin_y,
                cell_width,
            } => match self.validate(snapshot, origin_x, origin_y, cell_width) {
                Ok(grid) => Phase::Done(grid),
                Err(err) if err.is_recoverable() => {
                    warn!("validation failed: {err}");
                    Phase::Adjusting
                }
                Err(other) => return Err(other),
            },
            Phase::Adjusting => {
                let attempts = attempts + 1;
                if attempts >= self.config.max_attempts {
                    return Err(EngineError::CalibrationFailed { attempts });
                }
                self.adjust()?;
                *snapshot = self.capture.capture(self.config.region)?;
                return Ok(CalibrationState {
                    phase: Phase::Searching,
                    attempts,
                });
            }
            done @ Phase::Done(_) => done,
        };
        Ok(CalibrationState { phase, attempts })
    }

    /// Scans horizontal strips at a fixed stride, starting just below the
    /// title-bar offset and bounded to the top third of the region, until one
    /// yields at least one cell.
    fn search(&mut self, snapshot: &RgbImage) -> Result<Phase> {
        let region = self.config.region;
        let mut y = self.config.title_bar_offset;
        while y < region.height / 3 {
            let line = sampler::sample_line(
                snapshot,
                (1, y),
                (region.width - 1, y),
                Orientation::Horizontal,
            )?;
            match segmenter::segment(
                &line,
                &self.config.palette,
                self.config.match_threshold,
                self.config.min_channel_sum,
            ) {
                Ok(cells) if !cells.is_empty() => {
                    info!("found {} cells on the line y={y}", cells.len());
                    return Ok(Phase::Measuring { found_y: y, cells });
                }
                Ok(_) | Err(EngineError::NoCellsFound) => {
                    debug!("no cells on the line y={y}");
                }
                Err(other) => return Err(other),
            }
            y += self.config.search_stride;
        }
        warn!("no rota cells in the top third of the capture");
        Ok(Phase::Adjusting)
    }

    /// Derives cell width and the grid origin from the found strip: the cell
    /// width is the sample count of the last (rightmost) cell, x0 its center,
    /// and y0 steps a couple of pixels past the border into the cell interior.
    fn measure(&mut self, found_y: u32, cells: Vec<Cell>) -> Phase {
        let Some(rightmost) = cells.last() else {
            return Phase::Adjusting;
        };
        let cell_width = rightmost.len() as u32;
        let origin_x = rightmost.center().coord;
        let origin_y = found_y + self.config.border_offset;
        debug!("measured cell_width={cell_width}, origin=({origin_x}, {origin_y})");
        Phase::Validating {
            origin_x,
            origin_y,
            cell_width,
        }
    }

    /// Samples a vertical line from the origin to the bottom of the region,
    /// partitions it into shifts and checks the count. On success the cell
    /// height is the coordinate difference between the first two cell centers
    /// of the reference (last) shift. Every "wrong grid shape" outcome comes
    /// back as a recoverable error for `step` to turn into an adjustment.
    fn validate(
        &mut self,
        snapshot: &RgbImage,
        origin_x: u32,
        origin_y: u32,
        cell_width: u32,
    ) -> Result<Grid> {
        let bottom = self.config.region.height - 1;
        let line = sampler::sample_line(
            snapshot,
            (origin_x, origin_y),
            (origin_x, bottom),
            Orientation::Vertical,
        )?;
        let cells = segmenter::segment(
            &line,
            &self.config.palette,
            self.config.match_threshold,
            self.config.min_channel_sum,
        )?;
        let centers: Vec<Sample> = cells.iter().map(|cell| cell.center()).collect();
        let shifts = partitioner::partition(&centers, self.config.group_threshold)?;

        let expected = self.config.expected_shifts;
        if shifts.len() != expected {
            return Err(EngineError::ShiftCountMismatch {
                expected,
                found: shifts.len(),
            });
        }

        let Some(reference) = shifts.last().filter(|shift| shift.len() >= 2) else {
            return Err(EngineError::ReferenceShiftTooSmall);
        };
        let cell_height = reference.centers[1].coord - reference.centers[0].coord;
        Ok(Grid::new(
            origin_x,
            origin_y,
            cell_width,
            cell_height,
            shifts,
        ))
    }

    /// Issues a viewport correction and waits out the zoom/scroll animation.
    /// The settle time is a fixed delay, not a polled condition.
    fn adjust(&mut self) -> Result<()> {
        info!("adjusting viewport: zooming out and returning to the top-left");
        self.viewport.focus()?;
        self.viewport.zoom_out(self.config.zoom_steps)?;
        self.viewport.page_up()?;
        self.viewport.scroll_left(self.config.scroll_amount)?;
        std::thread::sleep(self.config.settle);
        Ok(())
    }
}
