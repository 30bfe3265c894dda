//! Order Labels Library
//!
//! Combines a bol.com order overview PDF with the matching shipping-label PDF.
//! This library provides functionality to:
//! - Recover the order table from the overview's positioned text
//! - Repair continuation rows by forward-filling order numbers and item codes
//! - Summarize every order as reference and quantity lines
//! - Stamp each summary onto its label page
//!
//! # Example
//!
//! ```no_run
//! use order_labels::{run, RunOptions, RunPaths};
//! use std::path::PathBuf;
//!
//! let paths = RunPaths {
//!     orders: PathBuf::from("bol.com - Bestellingen.pdf"),
//!     labels: PathBuf::from("verzendzegels-2024-05-01.pdf"),
//!     output: PathBuf::from("output.pdf"),
//! };
//!
//! let report = run(&paths, &RunOptions::default()).expect("Failed to merge labels");
//! println!("{} pages written", report.pages_written);
//! ```

pub mod discover;
pub mod error;
pub mod layout;
pub mod orders;
pub mod pdf;
pub mod pipeline;
pub mod report;
pub mod table;

// Re-export commonly used items
pub use error::{Error, Result};
pub use pipeline::{inspect, run, Inspection, RunOptions, RunPaths};
pub use report::{RunReport, Warning};
