// End-to-end exercise of the engine against a fabricated spreadsheet render:
// a 21-shift rota drawn pixel by pixel, captured through an in-memory screen,
// calibrated, and filled with a batch of named requests.

use image::{Rgb, RgbImage, imageops};
use rota_vision::capture::{Region, ScreenCapture, ViewportControl};
use rota_vision::core_modules::calibrator::Calibrator;
use rota_vision::error::Result;
use rota_vision::pipeline::{AutofillPipeline, EngineConfig, ScheduleEntry};
use std::time::Duration;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const MORNING: Rgb<u8> = Rgb([146, 208, 80]);
const AFTERNOON: Rgb<u8> = Rgb([248, 203, 173]);
const EVENING: Rgb<u8> = Rgb([68, 114, 196]);

const SCREEN_WIDTH: u32 = 300;
const SCREEN_HEIGHT: u32 = 800;

/// Vertical grid lines of the sheet: four writable columns, the rightmost
/// spanning x 224..=263.
const COLUMN_BORDERS: [u32; 5] = [100, 141, 182, 223, 264];
/// First horizontal grid line; rows repeat every 11 pixels (10 interior + 1
/// border) down to the 63rd row.
const GRID_TOP: u32 = 50;
const ROW_PITCH: u32 = 11;
const ROW_COUNT: u32 = 63;

fn rota_pixel(x: u32, y: u32) -> Rgb<u8> {
    let grid_bottom = GRID_TOP + ROW_PITCH * ROW_COUNT;
    if !(100..=264).contains(&x) || !(GRID_TOP..=grid_bottom).contains(&y) {
        return WHITE;
    }
    if COLUMN_BORDERS.contains(&x) || (y - GRID_TOP) % ROW_PITCH == 0 {
        return BLACK;
    }
    let row = (y - GRID_TOP - 1) / ROW_PITCH;
    let shift = row / 3;
    match shift % 3 {
        0 => MORNING,
        1 => AFTERNOON,
        _ => EVENING,
    }
}

fn rota_screen() -> RgbImage {
    RgbImage::from_fn(SCREEN_WIDTH, SCREEN_HEIGHT, rota_pixel)
}

fn blank_screen() -> RgbImage {
    RgbImage::from_pixel(SCREEN_WIDTH, SCREEN_HEIGHT, WHITE)
}

fn test_config() -> EngineConfig {
    EngineConfig {
        region: Region::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT),
        title_bar_offset: 40,
        search_stride: 10,
        settle: Duration::ZERO,
        max_attempts: 3,
        ..EngineConfig::default()
    }
}

/// Serves the queued frames one full capture at a time (sub-region captures
/// reuse the frame cursor), cropping each request out of the current frame.
struct SequencedScreen {
    frames: Vec<RgbImage>,
    captures: usize,
}

impl SequencedScreen {
    fn new(frames: Vec<RgbImage>) -> Self {
        Self { frames, captures: 0 }
    }
}

impl ScreenCapture for SequencedScreen {
    fn capture(&mut self, region: Region) -> Result<RgbImage> {
        let index = self.captures.min(self.frames.len() - 1);
        if region.width == SCREEN_WIDTH {
            self.captures += 1;
        }
        let frame = &self.frames[index];
        Ok(
            imageops::crop_imm(frame, region.left, region.top, region.width, region.height)
                .to_image(),
        )
    }
}

/// A viewport that must never be touched: the rota is already on screen.
struct SteadyViewport;

impl ViewportControl for SteadyViewport {
    fn focus(&mut self) -> Result<()> {
        panic!("viewport should not be adjusted");
    }

    fn zoom_out(&mut self, _steps: u32) -> Result<()> {
        panic!("viewport should not be adjusted");
    }

    fn scroll_left(&mut self, _amount: u32) -> Result<()> {
        panic!("viewport should not be adjusted");
    }

    fn page_up(&mut self) -> Result<()> {
        panic!("viewport should not be adjusted");
    }
}

#[derive(Default)]
struct CountingViewport {
    corrections: u32,
}

impl ViewportControl for CountingViewport {
    fn focus(&mut self) -> Result<()> {
        Ok(())
    }

    fn zoom_out(&mut self, _steps: u32) -> Result<()> {
        self.corrections += 1;
        Ok(())
    }

    fn scroll_left(&mut self, _amount: u32) -> Result<()> {
        Ok(())
    }

    fn page_up(&mut self) -> Result<()> {
        Ok(())
    }
}

#[test]
fn fills_four_entries_across_the_week() {
    let screen = SequencedScreen::new(vec![rota_screen()]);
    let mut pipeline = AutofillPipeline::new(screen, SteadyViewport, test_config());

    let entries = vec![
        ScheduleEntry::parse("Isaac Lee", &["wednesday evening"]).unwrap(),
        ScheduleEntry::parse("Osaruese Egharevba", &["thursday afternoon"]).unwrap(),
        ScheduleEntry::parse("Nithil Kennedy", &["saturday evening"]).unwrap(),
        ScheduleEntry::parse("Rebekah Lindo", &["sunday morning"]).unwrap(),
    ];
    let report = pipeline.fill(&entries).unwrap();

    let grid = pipeline.grid().expect("fill calibrates on demand");
    assert_eq!(grid.shift_count(), 21);
    assert_eq!(grid.origin_x, 244);
    assert_eq!(grid.cell_width, 40);
    assert_eq!(grid.cell_height, 11);

    assert!(report.failed.is_empty());
    assert_eq!(report.placements.len(), 4);
    // Every placement targets the writable column; y is the center of the
    // first cell of the requested shift (shift s starts at row 3s, whose
    // center sits at 56 + 33s).
    let expected = [
        ("Isaac Lee", 8),
        ("Osaruese Egharevba", 10),
        ("Nithil Kennedy", 17),
        ("Rebekah Lindo", 18),
    ];
    for (placement, (name, shift)) in report.placements.iter().zip(expected) {
        assert_eq!(placement.name, name);
        assert_eq!(placement.x, 244);
        assert_eq!(placement.y, 56 + 33 * shift);
    }
}

#[test]
fn two_entries_in_one_shift_take_consecutive_cells() {
    let screen = SequencedScreen::new(vec![rota_screen()]);
    let mut pipeline = AutofillPipeline::new(screen, SteadyViewport, test_config());

    let entries = vec![
        ScheduleEntry::parse("Isaac Lee", &["friday morning"]).unwrap(),
        ScheduleEntry::parse("Nithil Kennedy", &["friday morning"]).unwrap(),
    ];
    let report = pipeline.fill(&entries).unwrap();

    assert!(report.failed.is_empty());
    // Friday morning is shift 12; its cells are rows 36..=38. The first
    // placement claims row 36's cell, pushing the second down one cell.
    assert_eq!(report.placements[0].y, 56 + 33 * 12);
    assert_eq!(report.placements[1].y, 56 + 33 * 12 + 11);
}

#[test]
fn calibration_recovers_after_a_viewport_correction() {
    // The first capture shows a blank screen; the corrected viewport brings
    // the rota into view on the next one.
    let mut screen = SequencedScreen::new(vec![blank_screen(), rota_screen()]);
    let mut viewport = CountingViewport::default();
    let config = test_config();

    let grid = Calibrator::new(&mut screen, &mut viewport, &config)
        .calibrate()
        .unwrap();
    assert_eq!(grid.shift_count(), 21);
    assert_eq!(viewport.corrections, 1);
}
