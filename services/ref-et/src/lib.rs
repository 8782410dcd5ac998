//! Reference evapotranspiration for the Jonction neighborhood (Geneva).
//!
//! Library half of the `make-ref-et` binary, so the pipeline can be driven
//! from tests with an in-memory climate source.

pub mod pipeline;

pub use pipeline::{
    buffer_distance, existing_file, PipelineOptions, PipelineReport, RefEtPipeline, JONCTION_LAT,
};
