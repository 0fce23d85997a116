//! Collectors of raw device records for a [`DeviceClass`]
//!
//! The reconciliation never talks to the OS, it only needs the two record collections. [`SystemCollector`] enumerates present devices with SetupAPI on Windows, [`DeviceDump`] replays a JSON snapshot of both collections on any system.
//!
//! ```no_run
//! use comdesc::collector::{DeviceDump, SystemCollector};
//!
//! let dump = DeviceDump::from_collector(&SystemCollector);
//! println!("{}", serde_json::to_string_pretty(&dump).unwrap());
//! ```
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};

use crate::device::{DeviceClass, RawRecord};
use crate::error::Result;

#[cfg(windows)]
pub mod setupapi;

/// Source of raw device records
pub trait Collector: std::fmt::Debug {
    /// Records of all present devices of `class`, in enumeration order
    fn collect(&self, class: DeviceClass) -> Result<Vec<RawRecord>>;
}

/// Platform default collector; SetupAPI on Windows, [`crate::error::ErrorKind::Unsupported`] elsewhere
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCollector;

impl Collector for SystemCollector {
    fn collect(&self, class: DeviceClass) -> Result<Vec<RawRecord>> {
        #[cfg(windows)]
        {
            setupapi::SetupApiCollector.collect(class)
        }

        #[cfg(not(windows))]
        {
            Err(crate::error::Error::new(
                crate::error::ErrorKind::Unsupported,
                &format!(
                    "enumerating {} records requires Windows SetupAPI, use --from-json to replay a dump",
                    class
                ),
            ))
        }
    }
}

/// Snapshot of both record collections, serialized as `{"usb": [...], "com": [...]}`
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceDump {
    /// [`DeviceClass::Usb`] records
    pub usb: Vec<RawRecord>,
    /// [`DeviceClass::ComPort`] records
    pub com: Vec<RawRecord>,
}

impl DeviceDump {
    /// Collect both classes from `collector`. A class that fails to enumerate is logged and left empty so the other can still be used.
    pub fn from_collector(collector: &dyn Collector) -> Self {
        DeviceDump {
            usb: collect_or_empty(collector, DeviceClass::Usb),
            com: collect_or_empty(collector, DeviceClass::ComPort),
        }
    }

    /// Records of `class`
    pub fn records(&self, class: DeviceClass) -> &[RawRecord] {
        match class {
            DeviceClass::Usb => &self.usb,
            DeviceClass::ComPort => &self.com,
        }
    }
}

impl Collector for DeviceDump {
    fn collect(&self, class: DeviceClass) -> Result<Vec<RawRecord>> {
        Ok(self.records(class).to_vec())
    }
}

fn collect_or_empty(collector: &dyn Collector, class: DeviceClass) -> Vec<RawRecord> {
    match collector.collect(class) {
        Ok(records) => {
            log::info!("Collected {} {} record(s)", records.len(), class);
            records
        }
        Err(e) => {
            log::warn!("Failed to enumerate {} devices: {}", class, e);
            Vec::new()
        }
    }
}

/// Read a [`DeviceDump`] from .json `file_path`
///
/// ```
/// use comdesc::collector::read_json_dump;
///
/// let dump = read_json_dump("./tests/data/windows_dump.json").unwrap();
/// assert!(!dump.com.is_empty());
/// ```
pub fn read_json_dump(file_path: &str) -> Result<DeviceDump> {
    let f = File::open(file_path)?;
    let mut br = BufReader::new(f);
    let mut data = String::new();
    br.read_to_string(&mut data)?;

    let dump = serde_json::from_str::<DeviceDump>(&data)?;
    log::debug!(
        "Read dump {} with {} USB and {} COM record(s)",
        file_path,
        dump.usb.len(),
        dump.com.len()
    );

    Ok(dump)
}
