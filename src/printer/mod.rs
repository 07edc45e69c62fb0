//! # Printer Module
//!
//! This module provides printer geometry, print options and page sizing.
//!
//! ## Modules
//!
//! - [`config`]: Printable area and print job options
//! - [`page`]: Pixel to physical page size conversion

pub mod config;
pub mod page;

pub use config::{MarginType, PrintOptions, PrinterGeometry};
pub use page::{Measurement, PageSize};
