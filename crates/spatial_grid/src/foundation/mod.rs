//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types shared by regions, elements and debug drawing
//! - Logging utilities

pub mod math;
pub mod logging;
