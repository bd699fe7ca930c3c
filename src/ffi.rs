//! FFI bindings for ClearAir
//!
//! This module provides C-compatible functions for calling ClearAir from other languages.
//! All structured results are JSON in null-terminated C strings, allocated by
//! ClearAir and freed by the caller using `clearair_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use serde::Serialize;

use crate::advice::recommendations_for;
use crate::category::{classify, evaluate_water, AqiCategory};
use crate::config::MonitorConfig;
use crate::forecast::hourly_forecast;
use crate::monitor::Monitor;
use crate::personalize::{parse_hourly_forecast, recommend};
use crate::profile::{JsonFileProfileStore, ProfileUpdate, UserProfile};
use crate::types::IndexReading;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Serialize to a C string, recording the error on failure
fn json_to_cstr<T: Serialize>(value: &T) -> *mut c_char {
    match serde_json::to_string(value) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

#[derive(Serialize)]
struct AqiClassification {
    category: AqiCategory,
    label: &'static str,
    description: &'static str,
    visually_safe: bool,
    recommendations: &'static [&'static str],
}

// ============================================================================
// Stateless API
// ============================================================================

/// Classify an AQI value and return its category metadata and advice as JSON.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `clearair_free_string`.
#[no_mangle]
pub unsafe extern "C" fn clearair_classify_aqi(value: f64) -> *mut c_char {
    clear_last_error();

    let category = classify(value);
    json_to_cstr(&AqiClassification {
        category,
        label: category.label(),
        description: category.description(),
        visually_safe: category.is_visually_safe(),
        recommendations: recommendations_for(category),
    })
}

/// Evaluate a water quality index and return the evaluation as JSON.
///
/// # Safety
/// - Returns a newly allocated string that must be freed with `clearair_free_string`.
#[no_mangle]
pub unsafe extern "C" fn clearair_evaluate_water(index: f64) -> *mut c_char {
    clear_last_error();
    json_to_cstr(&evaluate_water(index))
}

/// Compute a personalized recommendation.
///
/// `forecast_json` may be NULL, in which case a synthetic hourly forecast is
/// generated from `value`.
///
/// # Safety
/// - `profile_json` must be a valid null-terminated C string.
/// - `forecast_json` must be NULL or a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `clearair_free_string`.
/// - Returns NULL on error; call `clearair_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn clearair_recommend(
    value: f64,
    profile_json: *const c_char,
    forecast_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let profile_str = match cstr_to_string(profile_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid profile string pointer");
            return ptr::null_mut();
        }
    };

    let profile = match UserProfile::from_json(&profile_str) {
        Ok(p) => p,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };

    let forecast = if forecast_json.is_null() {
        hourly_forecast(value)
    } else {
        let parsed = cstr_to_string(forecast_json)
            .ok_or_else(|| "Invalid forecast string pointer".to_string())
            .and_then(|s| parse_hourly_forecast(&s).map_err(|e| e.to_string()));
        match parsed {
            Ok(f) => f,
            Err(e) => {
                set_last_error(&e);
                return ptr::null_mut();
            }
        }
    };

    json_to_cstr(&recommend(value, &forecast, &profile))
}

// ============================================================================
// Stateful API
// ============================================================================

/// Opaque handle to a Monitor backed by a JSON profile file
pub struct ClearAirMonitorHandle {
    monitor: Monitor<JsonFileProfileStore>,
}

/// Create a monitor that stores the profile under `profile_dir`.
///
/// # Safety
/// - `profile_dir` must be a valid null-terminated C string.
/// - Must be freed with `clearair_monitor_free`.
/// - Returns NULL on error.
#[no_mangle]
pub unsafe extern "C" fn clearair_monitor_new(profile_dir: *const c_char) -> *mut ClearAirMonitorHandle {
    clear_last_error();

    let dir = match cstr_to_string(profile_dir) {
        Some(s) => s,
        None => {
            set_last_error("Invalid profile_dir string pointer");
            return ptr::null_mut();
        }
    };

    match Monitor::new(MonitorConfig::default(), JsonFileProfileStore::in_dir(dir)) {
        Ok(monitor) => Box::into_raw(Box::new(ClearAirMonitorHandle { monitor })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a monitor.
///
/// # Safety
/// - `monitor` must be a valid pointer returned by `clearair_monitor_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn clearair_monitor_free(monitor: *mut ClearAirMonitorHandle) {
    if !monitor.is_null() {
        drop(Box::from_raw(monitor));
    }
}

/// Feed an air quality reading and return the snapshot as JSON.
///
/// # Safety
/// - `monitor` must be a valid pointer returned by `clearair_monitor_new`.
/// - Returns a newly allocated string that must be freed with `clearair_free_string`.
/// - Returns NULL on error.
#[no_mangle]
pub unsafe extern "C" fn clearair_monitor_ingest_air(
    monitor: *mut ClearAirMonitorHandle,
    value: f64,
) -> *mut c_char {
    clear_last_error();

    if monitor.is_null() {
        set_last_error("Null monitor pointer");
        return ptr::null_mut();
    }
    let handle = &mut *monitor;

    let result = IndexReading::air(value).and_then(|r| handle.monitor.ingest_air(r));
    match result {
        Ok(snapshot) => json_to_cstr(&snapshot),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Apply a partial profile update (JSON) and return the recomputed
/// recommendation as JSON (`null` if no reading has been ingested).
///
/// # Safety
/// - `monitor` must be a valid pointer returned by `clearair_monitor_new`.
/// - `update_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `clearair_free_string`.
/// - Returns NULL on error.
#[no_mangle]
pub unsafe extern "C" fn clearair_monitor_update_profile(
    monitor: *mut ClearAirMonitorHandle,
    update_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if monitor.is_null() {
        set_last_error("Null monitor pointer");
        return ptr::null_mut();
    }
    let handle = &mut *monitor;

    let update_str = match cstr_to_string(update_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid update string pointer");
            return ptr::null_mut();
        }
    };

    let result = serde_json::from_str::<ProfileUpdate>(&update_str)
        .map_err(crate::error::ClearAirError::from)
        .and_then(|update| handle.monitor.update_profile(&update));
    match result {
        Ok(recommendation) => json_to_cstr(&recommendation),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by ClearAir functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a ClearAir function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn clearair_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next ClearAir function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn clearair_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the ClearAir library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn clearair_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
