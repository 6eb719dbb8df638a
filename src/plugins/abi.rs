//! frei0r plugin ABI boundary
//!
//! Only the part of `frei0r.h` needed to read a plugin's info record lives
//! here. This is the one place in the crate that touches foreign code: the
//! library is opened, `f0r_get_plugin_info` is called on a zeroed record, the
//! strings are copied out, and the handle is dropped before returning.

#![allow(unsafe_code)]

use std::ffi::{CStr, c_char, c_int};
use std::path::Path;

use libloading::{Library, Symbol};

use super::probe::ProbeError;

/// Exported entry point every frei0r plugin provides
pub const GET_PLUGIN_INFO_SYMBOL: &str = "f0r_get_plugin_info";

/// `F0R_PLUGIN_TYPE_FILTER`: one input frame, one output frame
pub const F0R_PLUGIN_TYPE_FILTER: c_int = 0;
/// `F0R_PLUGIN_TYPE_SOURCE`: no input, one output frame
pub const F0R_PLUGIN_TYPE_SOURCE: c_int = 1;
/// `F0R_PLUGIN_TYPE_MIXER2`: two inputs
pub const F0R_PLUGIN_TYPE_MIXER2: c_int = 2;
/// `F0R_PLUGIN_TYPE_MIXER3`: three inputs
pub const F0R_PLUGIN_TYPE_MIXER3: c_int = 3;

/// `F0R_COLOR_MODEL_BGRA8888`
pub const F0R_COLOR_MODEL_BGRA8888: c_int = 0;
/// `F0R_COLOR_MODEL_RGBA8888`
pub const F0R_COLOR_MODEL_RGBA8888: c_int = 1;
/// `F0R_COLOR_MODEL_PACKED32`
pub const F0R_COLOR_MODEL_PACKED32: c_int = 2;

/// Mirror of `f0r_plugin_info_t`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct F0rPluginInfo {
    pub name: *const c_char,
    pub author: *const c_char,
    pub plugin_type: c_int,
    pub color_model: c_int,
    pub frei0r_version: c_int,
    pub major_version: c_int,
    pub minor_version: c_int,
    pub num_params: c_int,
    pub explanation: *const c_char,
}

impl Default for F0rPluginInfo {
    fn default() -> Self {
        Self {
            name: std::ptr::null(),
            author: std::ptr::null(),
            plugin_type: 0,
            color_model: 0,
            frei0r_version: 0,
            major_version: 0,
            minor_version: 0,
            num_params: 0,
            explanation: std::ptr::null(),
        }
    }
}

/// Signature of `f0r_get_plugin_info`
pub type GetPluginInfoFn = unsafe extern "C" fn(info: *mut F0rPluginInfo);

/// Owned copy of a plugin's info record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPluginInfo {
    pub name: String,
    pub author: String,
    pub plugin_type: i32,
    pub color_model: i32,
    pub frei0r_version: i32,
    pub major_version: i32,
    pub minor_version: i32,
    pub num_params: i32,
    pub explanation: String,
}

/// Open `path`, call its info entry point and copy the record out
///
/// The library handle is dropped on every return path.
///
/// # Errors
///
/// Returns [`ProbeError::Load`] if the file cannot be opened as a dynamic
/// library, or [`ProbeError::SymbolMissing`] if it lacks the entry point.
pub fn read_plugin_info(path: &Path) -> Result<RawPluginInfo, ProbeError> {
    let library = open_library(path).map_err(|e| ProbeError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let info = {
        // SAFETY: the symbol type matches the frei0r declaration of
        // `void f0r_get_plugin_info(f0r_plugin_info_t*)`.
        let get_plugin_info: Symbol<'_, GetPluginInfoFn> =
            unsafe { library.get(GET_PLUGIN_INFO_SYMBOL.as_bytes()) }.map_err(|_| {
                ProbeError::SymbolMissing {
                    path: path.to_path_buf(),
                    symbol: GET_PLUGIN_INFO_SYMBOL,
                }
            })?;

        let mut record = F0rPluginInfo::default();
        // SAFETY: `record` is a valid, writable record for the duration of the
        // call and its string pointers are copied before the library drops.
        unsafe {
            get_plugin_info(&mut record);
            copy_info(&record)
        }
    };

    drop(library);
    Ok(info)
}

/// Open `path` with every symbol resolved up front
///
/// A library with unresolved symbols fails here instead of aborting the
/// process on first use.
#[cfg(unix)]
fn open_library(path: &Path) -> Result<Library, libloading::Error> {
    use libloading::os::unix::{Library as UnixLibrary, RTLD_LOCAL, RTLD_NOW};

    // SAFETY: loading runs the library's initialisers. Candidate files come
    // from operator-configured plugin directories.
    unsafe { UnixLibrary::open(Some(path), RTLD_NOW | RTLD_LOCAL) }.map(Library::from)
}

#[cfg(not(unix))]
fn open_library(path: &Path) -> Result<Library, libloading::Error> {
    // SAFETY: as above; the platform loader resolves imports at load time.
    unsafe { Library::new(path) }
}

/// Copy every field out of a filled record
///
/// # Safety
///
/// Each string pointer must be null or point to a nul-terminated string that
/// stays valid for the duration of the call.
unsafe fn copy_info(raw: &F0rPluginInfo) -> RawPluginInfo {
    unsafe {
        RawPluginInfo {
            name: copy_c_str(raw.name),
            author: copy_c_str(raw.author),
            plugin_type: raw.plugin_type,
            color_model: raw.color_model,
            frei0r_version: raw.frei0r_version,
            major_version: raw.major_version,
            minor_version: raw.minor_version,
            num_params: raw.num_params,
            explanation: copy_c_str(raw.explanation),
        }
    }
}

/// Copy a possibly-null C string, replacing invalid UTF-8
///
/// # Safety
///
/// `ptr` must be null or point to a nul-terminated string.
unsafe fn copy_c_str(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}
