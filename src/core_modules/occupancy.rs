// THEORY:
// Occupancy is decided from pixels alone: an empty cell is a uniformly filled
// band, so every row of its interior is a single flat color; a written name
// breaks that uniformity with glyph pixels. The detector captures just the
// cell-sized patch around a slot center (far cheaper than re-capturing the
// whole screen) and compares horizontally adjacent pixels for exact equality.
// Any difference — including anti-aliasing at glyph edges — counts as
// occupied. That conservative bias is deliberate: overwriting someone's shift
// is worse than skipping a cell.

use crate::capture::{Region, ScreenCapture};
use crate::core_modules::grid::Grid;
use crate::core_modules::sampler::{self, Orientation};
use crate::error::Result;

/// Captures a `cell_width x cell_height` patch centered on the slot (absolute
/// screen coordinates) and reports whether any interior row deviates from a
/// single flat color. The outermost pixel on each side is excluded so the
/// cell border never counts as content.
pub fn is_occupied<S: ScreenCapture>(
    capture: &mut S,
    grid: &Grid,
    center_x: u32,
    center_y: u32,
) -> Result<bool> {
    let patch_region = Region::centered_on(center_x, center_y, grid.cell_width, grid.cell_height);
    let patch = capture.capture(patch_region)?;
    for y in 1..grid.cell_height.saturating_sub(1) {
        let row = sampler::sample_line(
            &patch,
            (1, y),
            (grid.cell_width.saturating_sub(2), y),
            Orientation::Horizontal,
        )?;
        if row.windows(2).any(|pair| pair[0].color != pair[1].color) {
            return Ok(true);
        }
    }
    Ok(false)
}
