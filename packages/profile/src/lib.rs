#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-district category frequency profiles.
//!
//! Turns the raw venue list of each district into a [`DistrictProfile`]
//! (category counts and frequencies), aligns profiles across a city via
//! the derived [`CategoryVocabulary`], and reduces each profile to the
//! fixed, ordered [`PriorityCategories`] that feed clustering.
//!
//! Everything here is a pure transformation: no I/O, no logging, no
//! shared state.

pub mod filter;
pub mod profile;
pub mod vocabulary;

pub use filter::{PriorityCategories, ReducedProfile, reduce};
pub use profile::{CityProfiles, DistrictProfile, build_city_profiles, build_profile};
pub use vocabulary::CategoryVocabulary;

use thiserror::Error;

/// Errors raised while configuring profile reduction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// The priority category list is empty.
    #[error("Priority category list is empty")]
    EmptyPriorityCategories,

    /// A priority category is listed more than once.
    #[error("Priority category '{category}' is listed more than once")]
    DuplicatePriorityCategory {
        /// The repeated label.
        category: String,
    },
}
