// THEORY:
// The `pipeline` module is the final, top-level API for the entire engine.
// It encapsulates the full architectural stack — sampling, segmentation,
// partitioning, calibration, occupancy and mapping — behind a single,
// easy-to-use interface. A caller wires in its screen-capture and
// viewport-control backends, hands over the schedule entries, and receives a
// report of placements (for the input-injection backend to execute) and
// failed requests.

use crate::capture::{Region, ScreenCapture, ViewportControl};
use crate::core_modules::calibrator::Calibrator;
use crate::core_modules::mapper;
use crate::error::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Re-export key data structures for the public API.
pub use crate::core_modules::color::color::{Color, Palette};
pub use crate::core_modules::grid::Grid;
pub use crate::core_modules::mapper::{
    FailedRequest, Period, Placement, ScheduleEntry, SlotRequest, Weekday,
};

/// Configuration for the engine, allowing for tunable behavior. Every
/// constant of the rota layout lives here rather than in the code: the
/// palette, the capture region, the search geometry, both color thresholds
/// and the retry budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Screen region the rota is expected in (absolute screen coordinates).
    pub region: Region,
    /// The semantic colors the rota is rendered with.
    pub palette: Palette,
    /// Tight threshold for matching a sampled pixel against the palette.
    pub match_threshold: f64,
    /// Looser threshold for grouping adjacent cell centers into one shift.
    pub group_threshold: f64,
    /// Channel-sum floor rejecting near-black anti-aliasing artifacts.
    pub min_channel_sum: u32,
    /// Vertical stride between horizontal probe lines while searching.
    pub search_stride: u32,
    /// First probe offset, stepping past window chrome and the sheet header.
    pub title_bar_offset: u32,
    /// Offset stepping past the border into the cell interior after a find.
    pub border_offset: u32,
    /// Number of slot-groups the full rota renders: 7 days x 3 periods.
    pub expected_shifts: usize,
    /// Calibration attempt budget before giving up.
    pub max_attempts: u32,
    /// Zoom steps issued per viewport correction.
    pub zoom_steps: u32,
    /// Horizontal scroll amount issued per viewport correction.
    pub scroll_amount: u32,
    /// Fixed delay after a viewport correction, letting animations finish.
    pub settle: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            region: Region::new(0, 0, 1920, 1080),
            palette: Palette::default(),
            match_threshold: 35.0,
            group_threshold: 30.0,
            min_channel_sum: 100,
            search_stride: 10,
            title_bar_offset: 200,
            border_offset: 2,
            expected_shifts: 21,
            max_attempts: 8,
            zoom_steps: 2,
            scroll_amount: 50,
            settle: Duration::from_millis(500),
        }
    }
}

/// The primary output of an autofill pass: the coordinates to hand to the
/// input-injection collaborator, plus the requests no free cell was left for.
#[derive(Debug, Clone, PartialEq)]
pub struct FillReport {
    pub placements: Vec<Placement>,
    pub failed: Vec<FailedRequest>,
}

/// The main, top-level struct for the engine.
pub struct AutofillPipeline<S: ScreenCapture, V: ViewportControl> {
    capture: S,
    viewport: V,
    config: EngineConfig,
    grid: Option<Grid>,
}

impl<S: ScreenCapture, V: ViewportControl> AutofillPipeline<S, V> {
    pub fn new(capture: S, viewport: V, config: EngineConfig) -> Self {
        Self {
            capture,
            viewport,
            config,
            grid: None,
        }
    }

    /// Runs the calibration state machine and stores the resulting grid.
    pub fn calibrate(&mut self) -> Result<&Grid> {
        let grid =
            Calibrator::new(&mut self.capture, &mut self.viewport, &self.config).calibrate()?;
        Ok(self.grid.insert(grid))
    }

    /// Discards the current grid and calibrates again. Call this whenever the
    /// viewport is known to have changed since the last calibration.
    pub fn recalibrate(&mut self) -> Result<&Grid> {
        self.grid = None;
        self.calibrate()
    }

    /// The calibrated grid, if any.
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Maps the entries onto the calibrated grid, calibrating first when no
    /// grid is held yet. Returns the placements for the input-injection
    /// collaborator and the requests that found every cell occupied.
    pub fn fill(&mut self, entries: &[ScheduleEntry]) -> Result<FillReport> {
        let grid = match &self.grid {
            Some(grid) => grid.clone(),
            None => self.calibrate()?.clone(),
        };
        let (placements, failed) =
            mapper::assign(&mut self.capture, &grid, self.config.region, entries)?;
        info!(
            "autofill finished: {} placements, {} failed requests",
            placements.len(),
            failed.len()
        );
        Ok(FillReport { placements, failed })
    }
}
