//! JNI Bridge - Kotlin bindings for `com.advancedcamera.imaging.NativeImaging`
//!
//! `NativeImaging` is a Kotlin `object`, so every entry point receives the
//! singleton instance as its second argument; it is never used.
//! All functions follow the JNI naming convention: Java_<package>_<class>_<method>

use std::path::Path;

use jni::objects::{JIntArray, JObject, JObjectArray, JString};
use jni::sys::{jint, jintArray, jstring};
use jni::JNIEnv;

use crate::error::{ImagingError, Result};
use crate::exposure_engine::{BracketPlan, ExposureRange};
use crate::frame::Frame;
use crate::hdr_engine::{HdrConfig, HdrEngine};

const ILLEGAL_ARGUMENT: &str = "java/lang/IllegalArgumentException";

fn new_jstring(env: &mut JNIEnv, value: &str) -> jstring {
    match env.new_string(value) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            log::error!("Failed to create Java string: {}", e);
            std::ptr::null_mut()
        }
    }
}

fn error_json(e: &ImagingError) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

/// A Java exception already pending (OOM, bad reference) must propagate as-is;
/// no further JNI call may be made while it is pending.
fn should_report(e: &ImagingError, exception_pending: bool) -> bool {
    !exception_pending && !matches!(e, ImagingError::Jni(jni::errors::Error::JavaException))
}

fn exception_pending(env: &mut JNIEnv) -> bool {
    env.exception_check().unwrap_or(true)
}

fn throw_illegal_argument(env: &mut JNIEnv, e: &ImagingError) {
    log::warn!("Native call failed: {}", e);
    let pending = exception_pending(env);
    if !should_report(e, pending) {
        return;
    }
    if let Err(throw_err) = env.throw_new(ILLEGAL_ARGUMENT, e.to_string()) {
        log::error!("Failed to throw {}: {}", ILLEGAL_ARGUMENT, throw_err);
    }
}

fn read_string(env: &mut JNIEnv, value: &JString) -> Result<String> {
    Ok(env.get_string(value)?.into())
}

fn read_string_array(env: &mut JNIEnv, array: &JObjectArray) -> Result<Vec<String>> {
    let len = env.get_array_length(array)?;
    let mut out = Vec::with_capacity(len.max(0) as usize);
    for i in 0..len {
        let element = JString::from(env.get_object_array_element(array, i)?);
        out.push(read_string(env, &element)?);
        env.delete_local_ref(element)?;
    }
    Ok(out)
}

fn read_int_array(env: &mut JNIEnv, array: &JIntArray) -> Result<Vec<jint>> {
    let len = env.get_array_length(array)?;
    let mut buf = vec![0 as jint; len.max(0) as usize];
    env.get_int_array_region(array, 0, &mut buf)?;
    Ok(buf)
}

fn new_int_array(env: &mut JNIEnv, values: &[jint]) -> Result<jintArray> {
    let array = env.new_int_array(values.len() as jint)?;
    env.set_int_array_region(&array, 0, values)?;
    Ok(array.into_raw())
}

/// Null elements are kept as `None` so validation can reject them
fn read_argb_frames(
    env: &mut JNIEnv,
    frames: &JObjectArray,
    width: jint,
    height: jint,
) -> Result<Vec<Frame>> {
    let count = env.get_array_length(frames)?;
    let mut raw = Vec::with_capacity(count.max(0) as usize);
    for i in 0..count {
        let element = env.get_object_array_element(frames, i)?;
        if element.is_null() {
            raw.push(None);
            continue;
        }
        let array = JIntArray::from(element);
        raw.push(Some(read_int_array(env, &array)?));
        env.delete_local_ref(array)?;
    }
    Frame::from_argb_frames(&raw, width as i64, height as i64)
}

/// Get library version
/// JNI: NativeImaging.version(): String
#[no_mangle]
pub extern "system" fn Java_com_advancedcamera_imaging_NativeImaging_version<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    new_jstring(&mut env, crate::version())
}

/// Placeholder HDR entry point
/// JNI: NativeImaging.processHdr()
#[no_mangle]
pub extern "system" fn Java_com_advancedcamera_imaging_NativeImaging_processHdr<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) {
    crate::process_hdr();
}

/// Initialize the Rust core library
/// JNI: NativeImaging.init()
#[no_mangle]
pub extern "system" fn Java_com_advancedcamera_imaging_NativeImaging_init<'local>(
    _env: JNIEnv<'local>,
    _this: JObject<'local>,
) {
    crate::init_library();
}

/// Set the log level; after the first init this can only lower verbosity
/// JNI: NativeImaging.initWithLevel(level: String)
#[no_mangle]
pub extern "system" fn Java_com_advancedcamera_imaging_NativeImaging_initWithLevel<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    level: JString<'local>,
) {
    let level = read_string(&mut env, &level)
        .map(|name| crate::parse_log_level(&name))
        .unwrap_or(log::LevelFilter::Debug);
    crate::init_library_with_level(level);
}

// ============================================================================
// HDR Pipeline JNI Functions
// ============================================================================

/// EV indices for a three-frame burst
/// JNI: NativeImaging.bracketSteps(lower: Int, upper: Int): IntArray [under, base, over]
#[no_mangle]
pub extern "system" fn Java_com_advancedcamera_imaging_NativeImaging_bracketSteps<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    lower: jint,
    upper: jint,
) -> jintArray {
    let result = (|| -> Result<jintArray> {
        let range = ExposureRange::new(lower, upper)?;
        let plan = BracketPlan::for_range(Some(&range));
        new_int_array(&mut env, &plan.steps())
    })();

    match result {
        Ok(array) => array,
        Err(e) => {
            throw_illegal_argument(&mut env, &e);
            std::ptr::null_mut()
        }
    }
}

/// Merge and tone map ARGB frames in memory
/// JNI: NativeImaging.processHdrArgb(frames: Array<IntArray>, width: Int, height: Int,
///                                   configJson: String): IntArray
#[no_mangle]
pub extern "system" fn Java_com_advancedcamera_imaging_NativeImaging_processHdrArgb<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    frames: JObjectArray<'local>,
    width: jint,
    height: jint,
    config_json: JString<'local>,
) -> jintArray {
    let result = (|| -> Result<jintArray> {
        let config = HdrConfig::from_json(&read_string(&mut env, &config_json)?)?;
        let frames = read_argb_frames(&mut env, &frames, width, height)?;

        let (merged, report) = HdrEngine::process_frames(&frames, &config)?;
        log::debug!(
            "processHdrArgb: {}x{}, merged {}",
            report.width, report.height, report.frames_merged
        );
        new_int_array(&mut env, &merged.to_argb_ints())
    })();

    match result {
        Ok(array) => array,
        Err(e) => {
            throw_illegal_argument(&mut env, &e);
            std::ptr::null_mut()
        }
    }
}

/// Merge and tone map encoded image files, writing a JPEG
/// JNI: NativeImaging.processHdrFiles(inputs: Array<String>, output: String,
///                                    configJson: String): String (JSON HdrReport)
#[no_mangle]
pub extern "system" fn Java_com_advancedcamera_imaging_NativeImaging_processHdrFiles<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    inputs: JObjectArray<'local>,
    output: JString<'local>,
    config_json: JString<'local>,
) -> jstring {
    let result = (|| -> Result<String> {
        let config = HdrConfig::from_json(&read_string(&mut env, &config_json)?)?;
        let inputs = read_string_array(&mut env, &inputs)?;
        let output = read_string(&mut env, &output)?;

        let report = HdrEngine::process_files(&inputs, Path::new(&output), &config)?;
        Ok(serde_json::to_string(&report)?)
    })();

    match result {
        Ok(json) => new_jstring(&mut env, &json),
        Err(e) => {
            log::warn!("processHdrFiles failed: {}", e);
            let pending = exception_pending(&mut env);
            if should_report(&e, pending) {
                new_jstring(&mut env, &error_json(&e))
            } else {
                std::ptr::null_mut()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_report_plain_errors() {
        assert!(should_report(&ImagingError::NoFrames, false));
        assert!(should_report(&ImagingError::InvalidRange { lower: 1, upper: 0 }, false));
    }

    #[test]
    fn test_pending_exception_is_not_replaced() {
        assert!(!should_report(&ImagingError::NoFrames, true));
        assert!(!should_report(&ImagingError::Jni(jni::errors::Error::JavaException), false));
    }

    #[test]
    fn test_error_json_is_escaped() {
        let json = error_json(&ImagingError::InvalidConfig("bad \"quote\"".to_string()));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["error"], "invalid config: bad \"quote\"");
    }
}
