#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District seed list loading and the embedded city registry.
//!
//! Seed lists are small, manually curated tables of districts with a
//! postal code and a representative coordinate. They come either from a
//! user-supplied CSV file ([`seed`]) or from the TOML city definitions
//! compiled into the binary ([`registry`]).

pub mod registry;
pub mod seed;

use thiserror::Error;

/// Errors that can occur while loading seed data.
#[derive(Debug, Error)]
pub enum SeedError {
    /// File read failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row parsed but holds unusable values.
    #[error("Invalid seed row {row}: {message}")]
    InvalidRow {
        /// 1-based data row number (header excluded).
        row: usize,
        /// Description of what went wrong.
        message: String,
    },

    /// The same district name appears twice in one city.
    #[error("Duplicate district '{name}' in seed list")]
    DuplicateDistrict {
        /// The repeated district name.
        name: String,
    },

    /// No city with the requested identifier is registered.
    #[error("Unknown city '{id}'")]
    UnknownCity {
        /// The requested identifier.
        id: String,
    },
}
