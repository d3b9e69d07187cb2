// THEORY:
// The sampler is the bridge between a captured image and the 1D world the
// rest of the pipeline lives in. Every downstream stage — segmentation,
// partitioning, occupancy — reasons about an ordered sequence of
// (color, coordinate) samples taken along a single horizontal or vertical
// line; this module is the only place that knows how to walk pixels.

use crate::core_modules::color::color::Color;
use crate::error::{EngineError, Result};
use image::RgbImage;
use std::str::FromStr;

/// A single reading along a sampled line. `coord` is the position on the
/// varying axis: y for vertical lines, x for horizontal ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub color: Color,
    pub coord: u32,
}

/// The axis a line is sampled along. `Vertical` holds x fixed and varies y,
/// `Horizontal` holds y fixed and varies x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl FromStr for Orientation {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vertical" => Ok(Orientation::Vertical),
            "horizontal" => Ok(Orientation::Horizontal),
            other => Err(EngineError::InvalidOrientation(other.to_string())),
        }
    }
}

/// Walks integer coordinates from `start` to `end` inclusive along the axis
/// implied by `orientation`, reading one pixel color per step. The fixed axis
/// is taken from `start`; the fixed component of `end` is ignored. Coordinates
/// outside the image fail with `OutOfBounds`. Pure: the image is never
/// mutated.
pub fn sample_line(
    image: &RgbImage,
    start: (u32, u32),
    end: (u32, u32),
    orientation: Orientation,
) -> Result<Vec<Sample>> {
    let (width, height) = image.dimensions();
    let out_of_bounds = |x: u32, y: u32| EngineError::OutOfBounds { x, y, width, height };

    let mut line = Vec::new();
    match orientation {
        Orientation::Vertical => {
            let x = start.0;
            if x >= width {
                return Err(out_of_bounds(x, start.1));
            }
            for y in start.1..=end.1 {
                if y >= height {
                    return Err(out_of_bounds(x, y));
                }
                line.push(Sample {
                    color: Color::from(*image.get_pixel(x, y)),
                    coord: y,
                });
            }
        }
        Orientation::Horizontal => {
            let y = start.1;
            if y >= height {
                return Err(out_of_bounds(start.0, y));
            }
            for x in start.0..=end.0 {
                if x >= width {
                    return Err(out_of_bounds(x, y));
                }
                line.push(Sample {
                    color: Color::from(*image.get_pixel(x, y)),
                    coord: x,
                });
            }
        }
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient_image() -> RgbImage {
        // 4x4 image where each pixel encodes its own coordinates.
        RgbImage::from_fn(4, 4, |x, y| Rgb([x as u8, y as u8, 0]))
    }

    #[test]
    fn samples_vertical_line_inclusive() {
        let image = gradient_image();
        let line = sample_line(&image, (2, 0), (2, 3), Orientation::Vertical).unwrap();
        assert_eq!(line.len(), 4);
        for (i, sample) in line.iter().enumerate() {
            assert_eq!(sample.coord, i as u32);
            assert_eq!(sample.color, Color::new(2, i as u8, 0));
        }
    }

    #[test]
    fn samples_horizontal_line_inclusive() {
        let image = gradient_image();
        let line = sample_line(&image, (1, 3), (3, 3), Orientation::Horizontal).unwrap();
        assert_eq!(line.len(), 3);
        assert_eq!(line[0].coord, 1);
        assert_eq!(line[2].coord, 3);
        assert_eq!(line[1].color, Color::new(2, 3, 0));
    }

    #[test]
    fn rejects_out_of_bounds_coordinates() {
        let image = gradient_image();
        let err = sample_line(&image, (5, 0), (5, 3), Orientation::Vertical).unwrap_err();
        assert!(matches!(err, EngineError::OutOfBounds { x: 5, .. }));

        let err = sample_line(&image, (0, 0), (0, 9), Orientation::Vertical).unwrap_err();
        assert!(matches!(err, EngineError::OutOfBounds { y: 4, .. }));
    }

    #[test]
    fn parses_known_orientations() {
        assert_eq!("vertical".parse::<Orientation>().unwrap(), Orientation::Vertical);
        assert_eq!(
            "horizontal".parse::<Orientation>().unwrap(),
            Orientation::Horizontal
        );
    }

    #[test]
    fn rejects_unknown_orientation() {
        let err = "diagonal".parse::<Orientation>().unwrap_err();
        assert!(matches!(err, EngineError::InvalidOrientation(s) if s == "diagonal"));
    }
}
