//! Queries over the reconciled port list: list all, descriptor by port name and port names by descriptor
//!
//! ```
//! use comdesc::device::ResolvedPort;
//! use comdesc::query::Query;
//!
//! let ports = vec![ResolvedPort {
//!     port_name: "COM6".into(),
//!     port_number: 6,
//!     descriptor: "CP2102N(Toslink Bridge)".into(),
//!     ..Default::default()
//! }];
//!
//! assert_eq!(Query::List.lines(&ports), vec!["COM6\tCP2102N(Toslink Bridge)"]);
//! assert_eq!(Query::ByName("COM6".into()).lines(&ports), vec!["CP2102N(Toslink Bridge)"]);
//! assert_eq!(Query::ByDescriptor("CP2102N(Toslink Bridge)".into()).lines(&ports), vec!["COM6"]);
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::device::ResolvedPort;

/// Mode of query with key where required. Keys are compared exactly; case-sensitive and untrimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Query {
    /// Every port as "name\tdescriptor"
    List,
    /// Descriptor of ports named exactly this
    ByName(String),
    /// Names of ports with exactly this descriptor
    ByDescriptor(String),
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Query::List => write!(f, "list"),
            Query::ByName(name) => write!(f, "name '{}'", name),
            Query::ByDescriptor(desc) => write!(f, "descriptor '{}'", desc),
        }
    }
}

impl Query {
    /// Whether `port` is part of the result
    pub fn is_match(&self, port: &ResolvedPort) -> bool {
        match self {
            Query::List => true,
            // ports without a COM token are unnamed, not named ""
            Query::ByName(name) => !port.port_name.is_empty() && port.port_name == *name,
            Query::ByDescriptor(desc) => port.descriptor == *desc,
        }
    }

    /// Matching ports in `ports` order
    pub fn select<'a>(&self, ports: &'a [ResolvedPort]) -> Vec<&'a ResolvedPort> {
        let selected: Vec<&ResolvedPort> = ports.iter().filter(|p| self.is_match(p)).collect();
        log::debug!("Query {} matched {} of {} port(s)", self, selected.len(), ports.len());
        selected
    }

    /// Output line for a matched `port`
    pub fn format_line(&self, port: &ResolvedPort) -> String {
        match self {
            Query::List => port.to_string(),
            Query::ByName(_) => port.descriptor.to_owned(),
            Query::ByDescriptor(_) => port.port_name.to_owned(),
        }
    }

    /// Output lines for `ports`; no match is an empty Vec
    pub fn lines(&self, ports: &[ResolvedPort]) -> Vec<String> {
        self.select(ports)
            .into_iter()
            .map(|p| self.format_line(p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(name: &str, number: u32, descriptor: &str) -> ResolvedPort {
        ResolvedPort {
            port_name: name.into(),
            port_number: number,
            descriptor: descriptor.into(),
            ..Default::default()
        }
    }

    fn example_ports() -> Vec<ResolvedPort> {
        vec![
            port("COM2", 2, "AX99100 PCIe to High Speed Serial Port"),
            port("COM3", 3, "MK3-USB Interface"),
            port("COM4", 4, "AX99100 PCIe to High Speed Serial Port"),
            port("COM6", 6, "CP2102N(Toslink Bridge)"),
            port("COM9", 9, ""),
        ]
    }

    #[test]
    fn test_list_keeps_order_and_empty_descriptor() {
        let lines = Query::List.lines(&example_ports());
        assert_eq!(
            lines,
            vec![
                "COM2\tAX99100 PCIe to High Speed Serial Port",
                "COM3\tMK3-USB Interface",
                "COM4\tAX99100 PCIe to High Speed Serial Port",
                "COM6\tCP2102N(Toslink Bridge)",
                "COM9\t",
            ]
        );
    }

    #[test]
    fn test_by_descriptor_multiple() {
        let lines = Query::ByDescriptor("AX99100 PCIe to High Speed Serial Port".into())
            .lines(&example_ports());
        assert_eq!(lines, vec!["COM2", "COM4"]);
    }

    #[test]
    fn test_by_name() {
        let lines = Query::ByName("COM6".into()).lines(&example_ports());
        assert_eq!(lines, vec!["CP2102N(Toslink Bridge)"]);
    }

    #[test]
    fn test_exact_comparison() {
        let ports = example_ports();
        assert!(Query::ByName("com6".into()).lines(&ports).is_empty());
        assert!(Query::ByName(" COM6".into()).lines(&ports).is_empty());
        assert!(Query::ByDescriptor("mk3-usb interface".into())
            .lines(&ports)
            .is_empty());
        assert!(Query::ByDescriptor("MK3-USB Interface ".into())
            .lines(&ports)
            .is_empty());
    }

    #[test]
    fn test_unnamed_port_never_matches_by_name() {
        let ports = vec![port("", 0, "Bluetooth link")];
        assert!(Query::ByName("".into()).lines(&ports).is_empty());
        assert!(Query::ByName("COM0".into()).lines(&ports).is_empty());
    }

    #[test]
    fn test_duplicate_names_all_returned() {
        let ports = vec![port("COM4", 4, "first"), port("COM4", 4, "second")];
        assert_eq!(
            Query::ByName("COM4".into()).lines(&ports),
            vec!["first", "second"]
        );
    }

    #[test]
    fn test_list_then_lookup_round_trip() {
        let ports = example_ports();
        for line in Query::List.lines(&ports) {
            let (name, desc) = line.split_once('\t').unwrap();
            assert_eq!(Query::ByName(name.into()).lines(&ports), vec![desc]);

            let names = Query::ByDescriptor(desc.into()).lines(&ports);
            assert!(names.contains(&name.to_string()));
            for n in names {
                assert_eq!(Query::ByName(n).lines(&ports), vec![desc]);
            }
        }
    }
}
