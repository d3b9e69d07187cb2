// THEORY:
// This file is the main entry point for the `rota_vision` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the public
// API that will be exposed to external consumers (like the bot orchestrator).
//
// The primary goal is to export the `AutofillPipeline` and its associated data
// structures (`EngineConfig`, `FillReport`, etc.) as the clean, high-level
// interface for the entire grid engine. The internal modules (`core_modules`)
// that do the actual sampling, segmentation and calibration work are reachable
// for advanced callers but are not the intended day-to-day surface.

pub mod capture;
pub mod core_modules;
pub mod error;
pub mod pipeline;
