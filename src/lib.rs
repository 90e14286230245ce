//! Imaging Core - native imaging library for Advanced Camera
//!
//! This library provides:
//! - Exposure bracket planning for HDR bursts
//! - Multi-exposure merge and sigmoid tone mapping
//! - File pipeline (decode, merge, tone map, JPEG encode)
//! - JNI bridge for `com.advancedcamera.imaging.NativeImaging`

mod error;
mod exposure_engine;
mod frame;
mod hdr_engine;
mod jni_bridge;
mod merge_engine;
mod tone_engine;

pub use error::{ImagingError, Result};
pub use exposure_engine::*;
pub use frame::*;
pub use hdr_engine::*;
pub use merge_engine::*;
pub use tone_engine::*;

use android_logger::Config;
use log::LevelFilter;

/// Library build identifier reported to the JVM
pub const VERSION: &str = "imaging-core 0.1 (stubs)";

const LOG_TAG: &str = "ImagingCore";

/// Initialize the Rust core library
pub fn init_library() {
    init_library_with_level(LevelFilter::Debug);
}

/// Initialize with an explicit log level.
///
/// The Android logger is installed once, with the level of the first call.
/// Later calls only move the global `log` filter, so they can lower verbosity
/// but cannot raise it past the first level.
pub fn init_library_with_level(level: LevelFilter) {
    android_logger::init_once(
        Config::default()
            .with_max_level(level)
            .with_tag(LOG_TAG)
    );
    log::set_max_level(level);
    log::info!("Imaging Core ready ({}), log level {}", VERSION, level);
}

/// Parse a level name from the JVM side, falling back to `Debug`
pub fn parse_log_level(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or(LevelFilter::Debug)
}

/// Build identifier; safe to call before `init_library`
pub fn version() -> &'static str {
    VERSION
}

/// Placeholder HDR entry point. Does nothing.
pub fn process_hdr() {}
