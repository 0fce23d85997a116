//! Windows SetupAPI collector; enumerates present device interfaces of a class and sweeps their device properties
use std::collections::HashMap;
use std::mem::size_of;
use strum::IntoEnumIterator;
use windows::core::{GUID, PCWSTR};
use windows::Win32::Devices::DeviceAndDriverInstallation::{
    SetupDiDestroyDeviceInfoList, SetupDiEnumDeviceInterfaces, SetupDiGetClassDevsW,
    SetupDiGetDeviceInterfaceDetailW, SetupDiGetDevicePropertyW, DIGCF_DEVICEINTERFACE,
    DIGCF_PRESENT, HDEVINFO, SP_DEVICE_INTERFACE_DATA, SP_DEVICE_INTERFACE_DETAIL_DATA_W,
    SP_DEVINFO_DATA,
};
use windows::Win32::Devices::Properties::{
    DEVPKEY_Device_BusReportedDeviceDesc, DEVPKEY_Device_Children, DEVPKEY_Device_DeviceDesc,
    DEVPKEY_Device_FriendlyName, DEVPKEY_Device_InstanceId, DEVPROPTYPE,
};
use windows::Win32::Foundation::HWND;

use super::Collector;
use crate::device::{DeviceClass, DeviceProperty, PropertyMap, RawRecord};
use crate::error::{Error, ErrorKind, Result};

/// GUID_DEVINTERFACE_USB_DEVICE
const GUID_DEVINTERFACE_USB_DEVICE: GUID = GUID::from_u128(0xa5dcbf10_6530_11d2_901f_00c04fb951ed);
/// GUID_DEVINTERFACE_COMPORT
const GUID_DEVINTERFACE_COMPORT: GUID = GUID::from_u128(0x86e0d1e0_8089_11d0_9ce4_08003e301f73);

/// Max UTF-16 units read for a single property
const PROPERTY_BUFFER_LEN: usize = 1024;

/// Interface class GUID for `class`
fn interface_guid(class: DeviceClass) -> GUID {
    match class {
        DeviceClass::Usb => GUID_DEVINTERFACE_USB_DEVICE,
        DeviceClass::ComPort => GUID_DEVINTERFACE_COMPORT,
    }
}

/// UTF-16 up to the first NUL; multi-sz lists such as Children therefore yield their first entry
fn utf16_until_nul(units: &[u16]) -> String {
    let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    String::from_utf16_lossy(&units[..end])
}

/// Device information set destroyed on drop
struct DeviceInfoSet(HDEVINFO);

impl Drop for DeviceInfoSet {
    fn drop(&mut self) {
        // SAFETY: handle came from SetupDiGetClassDevsW and is only destroyed here
        if let Err(e) = unsafe { SetupDiDestroyDeviceInfoList(self.0) } {
            log::warn!("Failed to destroy device info list: {}", e);
        }
    }
}

impl DeviceInfoSet {
    /// Present devices exposing an interface of `guid`
    fn present(guid: &GUID) -> Result<Self> {
        // SAFETY: guid outlives the call, no enumerator or parent window
        let handle = unsafe {
            SetupDiGetClassDevsW(
                Some(guid as *const GUID),
                PCWSTR::null(),
                HWND::default(),
                DIGCF_DEVICEINTERFACE | DIGCF_PRESENT,
            )
        }
        .map_err(|e| {
            Error::new(
                ErrorKind::Enumeration,
                &format!("SetupDiGetClassDevsW failed: {}", e),
            )
        })?;

        Ok(DeviceInfoSet(handle))
    }

    /// Interface `index` of `guid` or `None` once enumeration is exhausted
    fn interface(&self, guid: &GUID, index: u32) -> Option<SP_DEVICE_INTERFACE_DATA> {
        let mut data = SP_DEVICE_INTERFACE_DATA {
            cbSize: size_of::<SP_DEVICE_INTERFACE_DATA>() as u32,
            ..Default::default()
        };

        // SAFETY: data is a correctly sized out parameter; any error ends enumeration
        unsafe { SetupDiEnumDeviceInterfaces(self.0, None, guid, index, &mut data) }
            .ok()
            .map(|_| data)
    }

    /// Device interface path and device info data of `interface`
    fn interface_detail(
        &self,
        interface: &SP_DEVICE_INTERFACE_DATA,
    ) -> Result<(String, SP_DEVINFO_DATA)> {
        let mut required: u32 = 0;
        // SAFETY: size query only; expected to fail with insufficient buffer
        let _ = unsafe {
            SetupDiGetDeviceInterfaceDetailW(
                self.0,
                interface,
                None,
                0,
                Some(&mut required as *mut u32),
                None,
            )
        };
        if (required as usize) < size_of::<SP_DEVICE_INTERFACE_DETAIL_DATA_W>() {
            return Err(Error::new(
                ErrorKind::Enumeration,
                "SetupDiGetDeviceInterfaceDetailW returned no size",
            ));
        }

        // u32 backing keeps the detail struct aligned
        let mut buffer = vec![0u32; (required as usize).div_ceil(size_of::<u32>())];
        let detail = buffer.as_mut_ptr() as *mut SP_DEVICE_INTERFACE_DETAIL_DATA_W;
        let mut info = SP_DEVINFO_DATA {
            cbSize: size_of::<SP_DEVINFO_DATA>() as u32,
            ..Default::default()
        };

        // SAFETY: buffer holds `required` bytes and is aligned for the header; DevicePath is NUL terminated within it
        let path = unsafe {
            (*detail).cbSize = size_of::<SP_DEVICE_INTERFACE_DETAIL_DATA_W>() as u32;
            SetupDiGetDeviceInterfaceDetailW(
                self.0,
                interface,
                Some(detail),
                required,
                None,
                Some(&mut info as *mut SP_DEVINFO_DATA),
            )
            .map_err(|e| {
                Error::new(
                    ErrorKind::Enumeration,
                    &format!("SetupDiGetDeviceInterfaceDetailW failed: {}", e),
                )
            })?;

            let path_ptr = std::ptr::addr_of!((*detail).DevicePath) as *const u16;
            let offset = path_ptr as usize - buffer.as_ptr() as usize;
            let units = (required as usize).saturating_sub(offset) / size_of::<u16>();
            utf16_until_nul(std::slice::from_raw_parts(path_ptr, units))
        };

        Ok((path, info))
    }

    /// String value of `property` on device `info`, empty if not reported
    fn property(&self, info: &SP_DEVINFO_DATA, property: DeviceProperty) -> String {
        let key = match property {
            DeviceProperty::FriendlyName => &DEVPKEY_Device_FriendlyName,
            DeviceProperty::DeviceDesc => &DEVPKEY_Device_DeviceDesc,
            DeviceProperty::BusReportedDesc => &DEVPKEY_Device_BusReportedDeviceDesc,
            DeviceProperty::InstanceId => &DEVPKEY_Device_InstanceId,
            DeviceProperty::Children => &DEVPKEY_Device_Children,
        };
        let mut prop_type = DEVPROPTYPE::default();
        let mut buffer = [0u8; PROPERTY_BUFFER_LEN * 2];

        // SAFETY: all pointers reference locals that outlive the call
        match unsafe {
            SetupDiGetDevicePropertyW(
                self.0,
                info,
                key,
                &mut prop_type,
                Some(&mut buffer[..]),
                None,
                0,
            )
        } {
            Ok(_) => {
                let units: Vec<u16> = buffer
                    .chunks_exact(2)
                    .map(|b| u16::from_le_bytes([b[0], b[1]]))
                    .collect();
                utf16_until_nul(&units)
            }
            Err(e) => {
                log::trace!("{} not reported: {}", property, e);
                String::new()
            }
        }
    }

    /// Sweep of every [`DeviceProperty`] on device `info`
    fn properties(&self, info: &SP_DEVINFO_DATA) -> PropertyMap {
        DeviceProperty::iter()
            .map(|p| (p, self.property(info, p)))
            .filter(|(_, v)| !v.is_empty())
            .collect::<HashMap<_, _>>()
    }
}

/// Enumerates present devices with SetupAPI
#[derive(Debug, Default, Clone, Copy)]
pub struct SetupApiCollector;

impl Collector for SetupApiCollector {
    fn collect(&self, class: DeviceClass) -> Result<Vec<RawRecord>> {
        let guid = interface_guid(class);
        let set = DeviceInfoSet::present(&guid)?;
        let mut records = Vec::new();

        let mut index = 0;
        while let Some(interface) = set.interface(&guid, index) {
            index += 1;
            match set.interface_detail(&interface) {
                Ok((path, info)) => {
                    let record = RawRecord::from_properties(&path, &set.properties(&info));
                    log::debug!("{} {}: {:?}", class, path, record);
                    records.push(record);
                }
                Err(e) => log::warn!("Skipping {} interface {}: {}", class, index - 1, e),
            }
        }

        Ok(records)
    }
}
