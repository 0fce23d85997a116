//! C ABI entry points for using comdesc as a shared library, e.g. from LabVIEW
//!
//! All strings are UTF-8 and NUL terminated. Each call writes its report, one `\n` terminated line per result, into the caller's buffer and returns the number of bytes written excluding the terminator. If the buffer is too small nothing is written and the negative of the required size including the terminator is returned so the caller can retry. A null pointer, negative size or a key that is not UTF-8 returns -1.
use std::ffi::{c_char, CStr};

use crate::display::{self, PrintSettings};
use crate::error::{Error, ErrorKind, Result};
use crate::query::Query;

/// Version string returned by [`get_ver`]
pub const VERSION_STRING: &str = concat!(
    "COM port BusReportedDeviceDesc string extractor, V",
    env!("CARGO_PKG_VERSION")
);

/// Returned for invalid arguments
const INVALID_ARG: i32 = -1;

fn run_query(query: &Query, to_ascii: i32) -> String {
    let ports = crate::get_ports();
    let settings = PrintSettings {
        ascii: to_ascii != 0,
        ..Default::default()
    };
    display::render_report(query, &ports, &settings)
}

/// Borrow a caller supplied C string as UTF-8
///
/// # Safety
///
/// `key` must be null or point to a NUL terminated string valid for `'a`
unsafe fn key_from_ptr<'a>(key: *const c_char) -> Result<&'a str> {
    if key.is_null() {
        return Err(Error::new(ErrorKind::InvalidArg, "key is null"));
    }

    Ok(CStr::from_ptr(key).to_str()?)
}

/// Copy `report` and a NUL terminator to `buf`
///
/// # Safety
///
/// `buf` must be null or valid for writes of `size` bytes
unsafe fn write_report(report: &str, buf: *mut c_char, size: i32) -> i32 {
    if buf.is_null() || size < 0 {
        return INVALID_ARG;
    }

    let bytes = report.as_bytes();
    let required = bytes.len() + 1;
    if required > size as usize {
        log::debug!("Buffer of {} bytes too small, need {}", size, required);
        return -(i32::try_from(required).unwrap_or(i32::MAX));
    }

    std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf as *mut u8, bytes.len());
    *buf.add(bytes.len()) = 0;

    bytes.len() as i32
}

/// List all COM ports as "COMx\tdescriptor" lines
///
/// # Safety
///
/// `buf` must be valid for writes of `size` bytes
#[no_mangle]
pub unsafe extern "C" fn get_com_list(buf: *mut c_char, size: i32, to_ascii: i32) -> i32 {
    write_report(&run_query(&Query::List, to_ascii), buf, size)
}

/// COM port names whose descriptor equals `desc`, one per line
///
/// # Safety
///
/// `buf` must be valid for writes of `size` bytes and `desc` a NUL terminated string
#[no_mangle]
pub unsafe extern "C" fn get_com_by_desc(
    buf: *mut c_char,
    size: i32,
    desc: *const c_char,
    to_ascii: i32,
) -> i32 {
    match key_from_ptr(desc) {
        Ok(desc) => write_report(
            &run_query(&Query::ByDescriptor(desc.to_string()), to_ascii),
            buf,
            size,
        ),
        Err(e) => {
            log::error!("get_com_by_desc: {}", e);
            INVALID_ARG
        }
    }
}

/// Descriptor of the COM port named `name`
///
/// # Safety
///
/// `buf` must be valid for writes of `size` bytes and `name` a NUL terminated string
#[no_mangle]
pub unsafe extern "C" fn get_com_desc(
    buf: *mut c_char,
    size: i32,
    name: *const c_char,
    to_ascii: i32,
) -> i32 {
    match key_from_ptr(name) {
        Ok(name) => write_report(
            &run_query(&Query::ByName(name.to_string()), to_ascii),
            buf,
            size,
        ),
        Err(e) => {
            log::error!("get_com_desc: {}", e);
            INVALID_ARG
        }
    }
}

/// Library version string
///
/// # Safety
///
/// `buf` must be valid for writes of `size` bytes
#[no_mangle]
pub unsafe extern "C" fn get_ver(buf: *mut c_char, size: i32) -> i32 {
    write_report(VERSION_STRING, buf, size)
}
