//! Score tabular uploads with a trained classifier.
//!
//! The pipeline is linear: [`data::ingest`] decodes an uploaded `.csv` or
//! `.ftr` file into a [`data::frame::Frame`] (fixing accidental row/column
//! transposition), [`pipeline::score`] draws a bounded random sample and runs
//! a [`model::Model`] over it, and [`export::to_xlsx`] encodes the scored
//! table for download. The model comes from a [`model::source::ModelSource`]
//! strategy: a local file or a one-shot HTTP fetch.
//!
//! Exposed as a library so the integration tests (and any other shell) can
//! drive the same modules the binary does.

pub mod data;
pub mod error;
pub mod export;
pub mod model;
pub mod pipeline;

pub use error::ScoreError;
