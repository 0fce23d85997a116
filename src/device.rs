//! Raw device records as returned by a [`crate::collector::Collector`] and the resolved COM port records built from them
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use strum_macros::{Display, EnumIter};

/// Device class selector used when enumerating devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceClass {
    /// USB devices; parent nodes of USB-serial functions
    #[strum(to_string = "USB device")]
    Usb,
    /// Serial/COM port interfaces
    #[strum(to_string = "COM port")]
    ComPort,
}

/// Closed set of device properties read from the OS device tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum DeviceProperty {
    /// Vendor/OS composed display name, ends with "(COMx)" for serial ports
    FriendlyName,
    /// Driver catalog description
    DeviceDesc,
    /// Descriptor reported by the device firmware over the bus
    BusReportedDesc,
    /// Identifier of the node within the device tree
    InstanceId,
    /// Identifier of the child node; the serial function for a USB parent
    Children,
}

/// Property sweep result for a single device node
pub type PropertyMap = HashMap<DeviceProperty, String>;

/// Raw device record, one per device interface node. Fields not reported by the OS are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    /// Opaque device interface path
    pub path: String,
    /// Display name
    pub friendly_name: String,
    /// Driver catalog description
    pub device_desc: String,
    /// Firmware descriptor string; the value of interest
    pub bus_reported_desc: String,
    /// Device tree instance identifier
    pub instance_id: String,
    /// Child instance identifier
    pub children: String,
}

impl RawRecord {
    /// Build from `path` and the swept properties; anything missing from `properties` is left empty
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use comdesc::device::{DeviceProperty, RawRecord};
    ///
    /// let props = HashMap::from([(DeviceProperty::FriendlyName, "USB Serial Port (COM3)".to_string())]);
    /// let record = RawRecord::from_properties("\\\\?\\usb#vid_0403", &props);
    /// assert_eq!(record.friendly_name, "USB Serial Port (COM3)");
    /// assert!(record.bus_reported_desc.is_empty());
    /// ```
    pub fn from_properties(path: &str, properties: &PropertyMap) -> Self {
        let get = |p: DeviceProperty| properties.get(&p).cloned().unwrap_or_default();

        RawRecord {
            path: path.to_string(),
            friendly_name: get(DeviceProperty::FriendlyName),
            device_desc: get(DeviceProperty::DeviceDesc),
            bus_reported_desc: get(DeviceProperty::BusReportedDesc),
            instance_id: get(DeviceProperty::InstanceId),
            children: get(DeviceProperty::Children),
        }
    }

    /// Value of `property` on this record
    pub fn property(&self, property: DeviceProperty) -> &str {
        match property {
            DeviceProperty::FriendlyName => &self.friendly_name,
            DeviceProperty::DeviceDesc => &self.device_desc,
            DeviceProperty::BusReportedDesc => &self.bus_reported_desc,
            DeviceProperty::InstanceId => &self.instance_id,
            DeviceProperty::Children => &self.children,
        }
    }
}

/// Which rule in [`crate::reconcile`] produced the descriptor of a [`ResolvedPort`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DescriptorSource {
    /// BusReportedDeviceDesc of the COM port node itself
    #[default]
    BusReported,
    /// DeviceDesc replacing a generic "Multifunction Device"
    DeviceDesc,
    /// BusReportedDeviceDesc of the parent USB device
    UsbParent,
}

/// COM port with its resolved descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPort {
    /// Port token such as "COM6"; empty if the friendly name carries none
    pub port_name: String,
    /// Number parsed from `port_name`, 0 if there is no port token
    pub port_number: u32,
    /// Final descriptor string
    pub descriptor: String,
    /// Rule that produced `descriptor`
    #[serde(default)]
    pub source: DescriptorSource,
}

impl fmt::Display for ResolvedPort {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}", self.port_name, self.descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_deserialize_record_defaults_missing() {
        let record: RawRecord = serde_json::from_str(
            r#"{"friendly_name": "Silicon Labs CP2102N (COM6)", "instance_id": "USB\\VID_10C4&PID_EA60\\0001"}"#,
        )
        .unwrap();

        assert_eq!(record.friendly_name, "Silicon Labs CP2102N (COM6)");
        assert_eq!(record.instance_id, "USB\\VID_10C4&PID_EA60\\0001");
        assert_eq!(record.bus_reported_desc, "");
        assert_eq!(record.children, "");
        assert_eq!(record.path, "");
    }

    #[test]
    fn test_from_properties_round_trips_property() {
        let props: PropertyMap = DeviceProperty::iter()
            .map(|p| (p, format!("value of {}", p)))
            .collect();
        let record = RawRecord::from_properties("path", &props);

        for p in DeviceProperty::iter() {
            assert_eq!(record.property(p), props[&p]);
        }
    }

    #[test]
    fn test_class_display() {
        assert_eq!(DeviceClass::Usb.to_string(), "USB device");
        assert_eq!(DeviceClass::ComPort.to_string(), "COM port");
    }

    #[test]
    fn test_resolved_display_is_tab_separated() {
        let port = ResolvedPort {
            port_name: "COM3".into(),
            port_number: 3,
            descriptor: "MK3-USB Interface".into(),
            ..Default::default()
        };
        assert_eq!(port.to_string(), "COM3\tMK3-USB Interface");
    }
}
