pub mod calibrator;
pub mod color;
pub mod grid;
pub mod mapper;
pub mod occupancy;
pub mod partitioner;
pub mod sampler;
pub mod segmenter;
