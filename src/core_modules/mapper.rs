// THEORY:
// The mapper is the pure end of the pipeline: it knows nothing about pixels
// beyond what the occupancy detector tells it. A request names a weekday and
// a period; the grid stores shifts in a fixed order (Monday morning first,
// Sunday evening last), so the lookup is plain arithmetic. Assignment is
// first-fit with no backtracking: scan the shift's cells in stored order,
// take the first free one, and when none is free record the request as failed
// and move on — the rest of the batch must still proceed.
//
// Placements made earlier in the same run claim their cell, because the
// engine only emits coordinates; the actual write happens later in the
// external input-injection collaborator, so the screen cannot be trusted to
// reflect placements that have not been typed yet.

use crate::capture::{Region, ScreenCapture};
use crate::core_modules::grid::Grid;
use crate::core_modules::occupancy;
use crate::core_modules::sampler::Sample;
use crate::error::{EngineError, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Days of the rota week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        };
        f.write_str(name)
    }
}

impl FromStr for Weekday {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "monday" => Ok(Weekday::Monday),
            "tuesday" => Ok(Weekday::Tuesday),
            "wednesday" => Ok(Weekday::Wednesday),
            "thursday" => Ok(Weekday::Thursday),
            "friday" => Ok(Weekday::Friday),
            "saturday" => Ok(Weekday::Saturday),
            "sunday" => Ok(Weekday::Sunday),
            other => Err(EngineError::InvalidRequest(other.to_string())),
        }
    }
}

/// The three period kinds a day is divided into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Morning,
    Afternoon,
    Evening,
}

impl Period {
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Period::Morning => "morning",
            Period::Afternoon => "afternoon",
            Period::Evening => "evening",
        };
        f.write_str(name)
    }
}

impl FromStr for Period {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "morning" => Ok(Period::Morning),
            "afternoon" => Ok(Period::Afternoon),
            "evening" => Ok(Period::Evening),
            other => Err(EngineError::InvalidRequest(other.to_string())),
        }
    }
}

/// Index of a (weekday, period) slot-group in the calibrated grid:
/// Monday morning is 0, Sunday evening is 20.
pub fn shift_index(weekday: Weekday, period: Period) -> usize {
    weekday.index() * 3 + period.index()
}

/// One requested slot, e.g "wednesday evening".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRequest {
    pub weekday: Weekday,
    pub period: Period,
}

impl fmt::Display for SlotRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.weekday, self.period)
    }
}

impl FromStr for SlotRequest {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let mut words = s.split_whitespace();
        let (Some(weekday), Some(period), None) = (words.next(), words.next(), words.next())
        else {
            return Err(EngineError::InvalidRequest(s.to_string()));
        };
        Ok(SlotRequest {
            weekday: weekday.parse()?,
            period: period.parse()?,
        })
    }
}

/// A named person plus the slots they asked for, in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub name: String,
    pub requests: Vec<SlotRequest>,
}

impl ScheduleEntry {
    pub fn new(name: impl Into<String>, requests: Vec<SlotRequest>) -> Self {
        Self {
            name: name.into(),
            requests,
        }
    }

    /// Builds an entry from request strings like "wednesday evening".
    pub fn parse(name: impl Into<String>, requests: &[&str]) -> Result<Self> {
        let requests = requests
            .iter()
            .map(|request| request.parse())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(name, requests))
    }
}

/// A slot the engine decided to fill: the absolute screen coordinate to hand
/// to the input-injection collaborator, plus the name to type there.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub name: String,
    pub x: u32,
    pub y: u32,
}

/// A request with no free cell left in its shift.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedRequest {
    pub name: String,
    pub request: SlotRequest,
}

/// First-fit assignment of entries to free cells. For each request the shift
/// is looked up by index and its cells scanned in stored order; the first
/// unclaimed, unoccupied cell yields a placement. An exhausted shift records
/// a failure and the batch continues — no backtracking, no cross-shift
/// spillover, no retry. Occupancy-probe I/O errors propagate.
pub fn assign<S: ScreenCapture>(
    capture: &mut S,
    grid: &Grid,
    region: Region,
    entries: &[ScheduleEntry],
) -> Result<(Vec<Placement>, Vec<FailedRequest>)> {
    let mut placements = Vec::new();
    let mut failures = Vec::new();
    let mut claimed: HashSet<(usize, u32)> = HashSet::new();

    for entry in entries {
        for request in &entry.requests {
            let index = shift_index(request.weekday, request.period);
            match first_free(capture, grid, region, index, &claimed, *request) {
                Ok(center) => {
                    claimed.insert((index, center.coord));
                    let x = region.left + grid.origin_x;
                    let y = region.top + center.coord;
                    info!("placing {} in {request} at ({x}, {y})", entry.name);
                    placements.push(Placement {
                        name: entry.name.clone(),
                        x,
                        y,
                    });
                }
                Err(
                    err @ (EngineError::AllSlotsOccupied { .. }
                    | EngineError::MissingShift { .. }),
                ) => {
                    warn!("{err}; skipping {} for {request}", entry.name);
                    failures.push(FailedRequest {
                        name: entry.name.clone(),
                        request: *request,
                    });
                }
                Err(other) => return Err(other),
            }
        }
    }
    Ok((placements, failures))
}

fn first_free<S: ScreenCapture>(
    capture: &mut S,
    grid: &Grid,
    region: Region,
    index: usize,
    claimed: &HashSet<(usize, u32)>,
    request: SlotRequest,
) -> Result<Sample> {
    let exhausted = || EngineError::AllSlotsOccupied {
        weekday: request.weekday,
        period: request.period,
    };
    let shift = grid.shift(index).ok_or(EngineError::MissingShift {
        index,
        available: grid.shift_count(),
    })?;
    for center in &shift.centers {
        if claimed.contains(&(index, center.coord)) {
            continue;
        }
        let x = region.left + grid.origin_x;
        let y = region.top + center.coord;
        if !occupancy::is_occupied(capture, grid, x, y)? {
            return Ok(*center);
        }
    }
    Err(exhausted())
}
