//! Reconciles COM port records with their parent USB devices to resolve the user programmed descriptor of each port.
//!
//! Chips store the descriptor in different places. Microchip MCP2200 and Silicon Labs CP210x report it as the BusReportedDeviceDesc of the COM port node, FTDI chips report junk there but the correct string on the parent USB device. Some others report a generic "Multifunction Device" and leave the useful name in the DeviceDesc.
//!
//! ```
//! use comdesc::device::RawRecord;
//! use comdesc::reconcile::reconcile;
//!
//! let usb = vec![RawRecord {
//!     children: "USB\\VID_10C4&PID_EA60\\0001".into(),
//!     bus_reported_desc: "CP2102N(Toslink Bridge)".into(),
//!     ..Default::default()
//! }];
//! let com = vec![RawRecord {
//!     friendly_name: "Silicon Labs CP2102N (COM6)".into(),
//!     instance_id: "USB\\VID_10C4&PID_EA60\\0001".into(),
//!     ..Default::default()
//! }];
//!
//! let ports = reconcile(&usb, &com);
//! assert_eq!(ports[0].port_name, "COM6");
//! assert_eq!(ports[0].descriptor, "CP2102N(Toslink Bridge)");
//! ```
use regex::Regex;

use crate::device::{DescriptorSource, RawRecord, ResolvedPort};

/// Generic bus reported description that is replaced by DeviceDesc when available
pub const GENERIC_DESCRIPTOR: &str = "Multifunction Device";

lazy_static! {
    static ref COM_TOKEN: Regex = Regex::new(r"\((COM([0-9]+))\)").expect("COM token pattern is valid");
}

/// Extract the "COMx" token and its number from a friendly name such as "USB Serial Port (COM6)"
///
/// Returns `None` if there is no token, the number does not fit or is zero.
///
/// ```
/// use comdesc::reconcile::parse_port_token;
///
/// assert_eq!(parse_port_token("Silicon Labs CP2102N (COM6)"), Some(("COM6".to_string(), 6)));
/// assert_eq!(parse_port_token("AX99100 (COM12) (COM13)"), Some(("COM12".to_string(), 12)));
/// assert_eq!(parse_port_token("USB Serial Device"), None);
/// ```
pub fn parse_port_token(friendly_name: &str) -> Option<(String, u32)> {
    let caps = COM_TOKEN.captures(friendly_name)?;
    let number = caps.get(2)?.as_str().parse::<u32>().ok()?;
    if number == 0 {
        return None;
    }

    Some((caps.get(1)?.as_str().to_string(), number))
}

/// First USB device in `usb_devices` order that is the parent of `instance_id` and reports a descriptor
fn find_usb_parent<'a>(usb_devices: &'a [RawRecord], instance_id: &str) -> Option<&'a RawRecord> {
    if instance_id.is_empty() {
        return None;
    }

    usb_devices
        .iter()
        .filter(|usb| usb.children == instance_id)
        .find(|usb| !usb.bus_reported_desc.is_empty())
}

/// Resolve a single COM port record against `usb_devices`
pub fn resolve_port(com: &RawRecord, usb_devices: &[RawRecord]) -> ResolvedPort {
    let (port_name, port_number) = parse_port_token(&com.friendly_name).unwrap_or_default();

    let mut descriptor = com.bus_reported_desc.as_str();
    let mut source = DescriptorSource::BusReported;

    if descriptor == GENERIC_DESCRIPTOR && !com.device_desc.is_empty() {
        descriptor = com.device_desc.as_str();
        source = DescriptorSource::DeviceDesc;
    }

    if let Some(parent) = find_usb_parent(usb_devices, &com.instance_id) {
        log::trace!("{} parent USB device {}", com.instance_id, parent.path);
        descriptor = parent.bus_reported_desc.as_str();
        source = DescriptorSource::UsbParent;
    }

    log::debug!(
        "Resolved '{}' to {:?} from {}: {:?}",
        com.friendly_name,
        port_name,
        source,
        descriptor
    );

    ResolvedPort {
        port_name,
        port_number,
        descriptor: descriptor.to_string(),
        source,
    }
}

/// Resolve every record in `com_devices` against `usb_devices` and sort by port number
///
/// One [`ResolvedPort`] is returned per COM record, including records without a port token which sort first. The sort is stable so equal port numbers keep `com_devices` order.
pub fn reconcile(usb_devices: &[RawRecord], com_devices: &[RawRecord]) -> Vec<ResolvedPort> {
    log::info!(
        "Reconciling {} COM port(s) with {} USB device(s)",
        com_devices.len(),
        usb_devices.len()
    );

    let mut ports: Vec<ResolvedPort> = com_devices
        .iter()
        .map(|com| resolve_port(com, usb_devices))
        .collect();
    ports.sort_by_key(|p| p.port_number);

    ports
}
