//! Resolve the user programmed descriptor string of USB-serial chips (FTDI, CP210x and similar) for each COM port, so instruments can be found by name rather than by a port number that changes between machines.
//!
//! Includes a SetupAPI collector for Windows, a JSON dump collector for any system and C ABI entry points in [`ffi`] for loading as a shared library.
#![warn(missing_docs)]
use simple_logger::SimpleLogger;

#[macro_use]
extern crate lazy_static;
pub mod collector;
pub mod config;
pub mod device;
pub mod display;
pub mod error;
pub mod ffi;
pub mod query;
pub mod reconcile;
pub mod translit;

use collector::{Collector, DeviceDump, SystemCollector};
use device::ResolvedPort;

/// Set comdesc module and binary log level
pub fn set_log_level(debug: u8) -> crate::error::Result<()> {
    match debug {
        // just use env if not passed
        0 => SimpleLogger::new()
            .with_utc_timestamps()
            .with_level(log::Level::Error.to_level_filter())
            .env(),
        1 => SimpleLogger::new()
            .with_utc_timestamps()
            .with_level(log::Level::Info.to_level_filter()),
        2 => SimpleLogger::new()
            .with_utc_timestamps()
            .with_level(log::Level::Debug.to_level_filter()),
        _ => SimpleLogger::new()
            .with_utc_timestamps()
            .with_level(log::Level::Trace.to_level_filter()),
    }
    .init()
    .map_err(|e| {
        crate::error::Error::new(
            crate::error::ErrorKind::Other("simple_logger"),
            &format!("Failed to set log level: {}", e),
        )
    })?;

    Ok(())
}

/// Resolved ports from the records of `collector`, sorted by port number
///
/// ```
/// use comdesc::collector::read_json_dump;
///
/// let dump = read_json_dump("./tests/data/windows_dump.json").unwrap();
/// let ports = comdesc::get_ports_from(&dump);
/// assert!(ports.windows(2).all(|w| w[0].port_number <= w[1].port_number));
/// ```
pub fn get_ports_from(collector: &dyn Collector) -> Vec<ResolvedPort> {
    let dump = DeviceDump::from_collector(collector);
    reconcile::reconcile(&dump.usb, &dump.com)
}

/// Resolved ports of the present system; empty if the system cannot be enumerated
pub fn get_ports() -> Vec<ResolvedPort> {
    get_ports_from(&SystemCollector)
}

// run any Rust code as doctest
#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
