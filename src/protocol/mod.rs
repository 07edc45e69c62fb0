//! # StarPRNT Protocol
//!
//! Command builders for Star thermal printers driven directly over a device
//! file, used when receipts bypass the system spooler.
//!
//! ## Module Structure
//!
//! - [`commands`]: Init, feed and cut
//! - [`graphics`]: Raster graphics (`ESC GS S`)
//! - [`job`]: Complete byte stream for one receipt
//!
//! ## Usage Example
//!
//! ```
//! use cupom::protocol::{commands, graphics};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(graphics::raster(576, 24, &vec![0xAA; 72 * 24]));
//! data.extend(commands::cut_full_feed());
//! ```
//!
//! ## Protocol Reference
//!
//! Based on "StarPRNT Command Specifications Rev. 4.10"
//! by Star Micronics Co., Ltd.

pub mod commands;
pub mod graphics;
pub mod job;
