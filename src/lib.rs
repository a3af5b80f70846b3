#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod cli;
pub mod error;

mod catalog;
mod client;
mod http;
mod prediction;
mod render;
mod upload;

pub use catalog::{ALL_DISEASES, DiseaseEntry, DiseaseKind, Severity};
pub use client::PredictionClient;
pub use prediction::{Prediction, PredictionSource, ReportState};
pub use upload::{UploadedImage, load_image};
