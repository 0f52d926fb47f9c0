//! Sidecar - page data loader for static site pipelines.
//!
//! Pages get their data from JSON sidecars; sidecars pull shared fragments
//! from an imports directory that is read at most once per run. See
//! [`loader`] for the layout and [`loader::load_page`] for the entry point.

pub mod build;
pub mod cli;
pub mod config;
pub mod loader;
pub mod logger;
