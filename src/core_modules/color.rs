// THEORY:
// The `Color` module is the most fundamental unit of the engine. It is a
// "dumb" value type for a single RGB reading plus the one heuristic the whole
// pipeline is built on: noise-tolerant color equivalence. A spreadsheet cell
// is never rendered as one flat RGB value — anti-aliasing, sub-pixel hinting
// and zoom resampling all smear the palette colors — so equality is defined
// as Euclidean distance in RGB space falling strictly below a threshold.
//
// Two callers use two different thresholds:
// - a tight one (~35) when deciding whether a sampled pixel is one of the
//   palette colors at all, and
// - a looser one (~30) when deciding whether two adjacent cell centers belong
//   to the same shift.
// The relation is reflexive and symmetric but deliberately not transitive:
// noisy neighbors may chain-match without all being mutually near.

pub mod color {
    use serde::{Deserialize, Serialize};

    pub type Channel = u8;

    /// The reserved exact border color. Cell borders are always rendered as
    /// pure black and are matched exactly, never by threshold.
    pub const BORDER: Color = Color { red: 0, green: 0, blue: 0 };

    /// A "dumb" value type representing a single RGB pixel reading.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Color {
        pub red: Channel,
        pub green: Channel,
        pub blue: Channel,
    }

    impl Color {
        pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Self { red, green, blue }
        }

        /// Euclidean distance between the two colors treated as 3-vectors.
        pub fn distance(&self, other: &Color) -> f64 {
            let dr = self.red as f64 - other.red as f64;
            let dg = self.green as f64 - other.green as f64;
            let db = self.blue as f64 - other.blue as f64;
            (dr * dr + dg * dg + db * db).sqrt()
        }

        /// True iff the two colors are the same shade under `threshold`:
        /// distance strictly less than the threshold. A distance exactly equal
        /// to the threshold is NOT the same shade.
        pub fn same_shade(&self, other: &Color, threshold: f64) -> bool {
            self.distance(other) < threshold
        }

        /// Raw channel sum, used as a cheap brightness proxy.
        pub fn channel_sum(&self) -> u32 {
            self.red as u32 + self.green as u32 + self.blue as u32
        }

        pub fn is_border(&self) -> bool {
            *self == BORDER
        }
    }

    impl From<image::Rgb<u8>> for Color {
        fn from(pixel: image::Rgb<u8>) -> Self {
            Color::new(pixel.0[0], pixel.0[1], pixel.0[2])
        }
    }

    /// The closed set of semantic colors the rota is rendered with: one color
    /// per period kind plus the exact border color. Configured once at
    /// construction and never mutated.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Palette {
        /// Green: morning.
        pub morning: Color,
        /// Orange: afternoon.
        pub afternoon: Color,
        /// Blue: evening.
        pub evening: Color,
        /// Black: cell borders.
        pub border: Color,
    }

    impl Palette {
        /// The period colors in period order (morning, afternoon, evening).
        pub fn period_colors(&self) -> [Color; 3] {
            [self.morning, self.afternoon, self.evening]
        }

        /// Palette-matching acceptance rule: a candidate pixel is one of the
        /// period colors iff some period color matches it under the tight
        /// threshold AND its channel sum exceeds the floor. The floor rejects
        /// near-black/gray anti-aliasing artifacts around the borders that
        /// would otherwise be misclassified as a dim palette color.
        pub fn matches(&self, candidate: &Color, threshold: f64, min_channel_sum: u32) -> bool {
            candidate.channel_sum() > min_channel_sum
                && self
                    .period_colors()
                    .iter()
                    .any(|period_color| period_color.same_shade(candidate, threshold))
        }
    }

    impl Default for Palette {
        fn default() -> Self {
            Self {
                morning: Color::new(146, 208, 80),
                afternoon: Color::new(248, 203, 173),
                evening: Color::new(68, 114, 196),
                border: BORDER,
            }
        }
    }
}
