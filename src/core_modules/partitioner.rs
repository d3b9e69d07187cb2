// THEORY:
// The partitioner groups an ordered sequence of cell-center samples into
// contiguous shifts. Along the vertical scan every cell of one shift is
// filled with the same period color, and consecutive shifts always use
// different period colors (morning/afternoon/evening cycle day after day),
// so a color discontinuity between adjacent centers is exactly a shift
// boundary. The partitioner records those boundaries and slices the sequence
// between them; validating that 21 shifts came out is the calibrator's job,
// not this module's.

use crate::core_modules::sampler::Sample;
use crate::error::{EngineError, Result};

/// One weekday+period slot-group: the ordered cell-center samples whose
/// colors are mutually equivalent under the grouping threshold. Identified by
/// its position in the calibrated grid (index = weekday*3 + period).
#[derive(Debug, Clone, PartialEq)]
pub struct Shift {
    pub centers: Vec<Sample>,
}

impl Shift {
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}

/// Splits `centers` into shifts at every adjacent pair whose colors are not
/// the same shade under `group_threshold`. The first shift runs up to and
/// including the first boundary, each middle shift is the slice strictly
/// between two consecutive boundaries inclusive of the right one, and the
/// final shift is everything after the last boundary. Degenerate input (empty
/// or single-colored) fails with `NoBoundariesFound`.
pub fn partition(centers: &[Sample], group_threshold: f64) -> Result<Vec<Shift>> {
    let mut boundaries = Vec::new();
    for i in 0..centers.len().saturating_sub(1) {
        if !centers[i]
            .color
            .same_shade(&centers[i + 1].color, group_threshold)
        {
            boundaries.push(i);
        }
    }
    if boundaries.is_empty() {
        return Err(EngineError::NoBoundariesFound);
    }

    let mut shifts = Vec::with_capacity(boundaries.len() + 1);
    shifts.push(Shift {
        centers: centers[..=boundaries[0]].to_vec(),
    });
    for pair in boundaries.windows(2) {
        shifts.push(Shift {
            centers: centers[pair[0] + 1..=pair[1]].to_vec(),
        });
    }
    let last_boundary = boundaries[boundaries.len() - 1];
    shifts.push(Shift {
        centers: centers[last_boundary + 1..].to_vec(),
    });
    Ok(shifts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::color::color::{Color, Palette};

    fn centers_for_week(palette: &Palette, cells_per_shift: usize) -> Vec<Sample> {
        // 7 days x 3 periods, each shift rendered as a block of identically
        // colored cell centers, periods cycling through the palette.
        let period_colors = palette.period_colors();
        let mut centers = Vec::new();
        let mut coord = 0;
        for _day in 0..7 {
            for color in period_colors {
                for _ in 0..cells_per_shift {
                    centers.push(Sample { color, coord });
                    coord += 10;
                }
            }
        }
        centers
    }

    #[test]
    fn partitions_full_week_into_21_shifts() {
        let palette = Palette::default();
        let centers = centers_for_week(&palette, 3);
        let shifts = partition(&centers, 30.0).unwrap();
        assert_eq!(shifts.len(), 21);
        for shift in &shifts {
            assert_eq!(shift.len(), 3);
            let first = shift.centers[0].color;
            assert!(shift.centers.iter().all(|c| c.color == first));
        }
        // Period colors repeat in order across the week.
        assert_eq!(shifts[0].centers[0].color, palette.morning);
        assert_eq!(shifts[1].centers[0].color, palette.afternoon);
        assert_eq!(shifts[2].centers[0].color, palette.evening);
        assert_eq!(shifts[3].centers[0].color, palette.morning);
    }

    #[test]
    fn groups_noisy_shades_into_one_shift() {
        let palette = Palette::default();
        let g = palette.morning;
        let noisy_g = Color::new(g.red + 4, g.green - 3, g.blue + 5);
        let centers = vec![
            Sample { color: g, coord: 0 },
            Sample { color: noisy_g, coord: 10 },
            Sample { color: palette.evening, coord: 20 },
        ];
        let shifts = partition(&centers, 30.0).unwrap();
        assert_eq!(shifts.len(), 2);
        assert_eq!(shifts[0].len(), 2);
        assert_eq!(shifts[1].len(), 1);
    }

    #[test]
    fn fails_without_any_boundary() {
        let palette = Palette::default();
        let g = palette.morning;
        let centers = vec![
            Sample { color: g, coord: 0 },
            Sample { color: g, coord: 10 },
        ];
        let err = partition(&centers, 30.0).unwrap_err();
        assert!(matches!(err, EngineError::NoBoundariesFound));
    }

    #[test]
    fn fails_on_empty_input() {
        let err = partition(&[], 30.0).unwrap_err();
        assert!(matches!(err, EngineError::NoBoundariesFound));
    }
}
