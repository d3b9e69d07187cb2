// THEORY:
// The segmenter turns a raw sampled line into discrete colored cells. A rota
// row (or column) renders as bands of palette color separated by single-pixel
// black borders, with everything else on screen — gridline grays, text,
// whitespace — showing up as noise in between. Segmentation is therefore a
// two-step filter: classify every sample against the palette (exact border,
// thresholded period color, or discard), then split the surviving sequence at
// the border samples. Each surviving run is one writable cell.

use crate::core_modules::color::color::Palette;
use crate::core_modules::sampler::Sample;
use crate::error::{EngineError, Result};

/// A maximal contiguous run of non-border samples, bounded by border samples
/// or by the scan's edges. One cell corresponds to one writable person-slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Invariant: never empty. `segment` drops empty runs before constructing
    /// cells, and the field stays private so nothing else can build one.
    samples: Vec<Sample>,
}

impl Cell {
    pub(crate) fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Representative center: the sample at index len/2 of the run. Cells are
    /// rendered as uniform bands, so the index midpoint stands in for the
    /// geometric one; downstream coordinate math assumes this convention.
    pub fn center(&self) -> Sample {
        self.samples[self.samples.len() / 2]
    }
}

/// Segments a sampled line into cells:
/// 1. keep exact border samples verbatim and samples matching any palette
///    period color under the tight threshold and channel-sum rule, discard
///    the rest;
/// 2. fail with `NoCellsFound` when nothing survives or no border survives —
///    the caller reads this as "not looking at a grid";
/// 3. split the filtered sequence at the border indices: a leading run exists
///    iff the first border is not at index 0, one run between each consecutive
///    border pair, and a trailing run after the last border;
/// 4. strip the borders out of each run and drop runs that become empty.
pub fn segment(
    samples: &[Sample],
    palette: &Palette,
    match_threshold: f64,
    min_channel_sum: u32,
) -> Result<Vec<Cell>> {
    let filtered: Vec<Sample> = samples
        .iter()
        .copied()
        .filter(|sample| {
            sample.color == palette.border
                || palette.matches(&sample.color, match_threshold, min_channel_sum)
        })
        .collect();
    if filtered.is_empty() {
        return Err(EngineError::NoCellsFound);
    }

    let border_indices: Vec<usize> = filtered
        .iter()
        .enumerate()
        .filter(|(_, sample)| sample.color == palette.border)
        .map(|(index, _)| index)
        .collect();
    if border_indices.is_empty() {
        return Err(EngineError::NoCellsFound);
    }

    let mut runs: Vec<&[Sample]> = Vec::new();
    if border_indices[0] != 0 {
        runs.push(&filtered[..border_indices[0]]);
    }
    for pair in border_indices.windows(2) {
        runs.push(&filtered[pair[0]..pair[1]]);
    }
    let last_border = border_indices[border_indices.len() - 1];
    if last_border + 1 < filtered.len() {
        runs.push(&filtered[last_border + 1..]);
    }

    let cells = runs
        .into_iter()
        .map(|run| {
            run.iter()
                .copied()
                .filter(|sample| sample.color != palette.border)
                .collect::<Vec<Sample>>()
        })
        .filter(|samples| !samples.is_empty())
        .map(Cell::new)
        .collect();
    Ok(cells)
}
