//! Printing of query results as tab separated lines or JSON
use colored::*;
use itertools::Itertools;
use serde::Serialize;

use crate::device::ResolvedPort;
use crate::error::Result;
use crate::query::Query;
use crate::translit;

/// Settings for printing query results
#[derive(Debug, Default, Clone)]
pub struct PrintSettings {
    /// Transliterate strings with [`translit::to_ascii`] before output
    pub ascii: bool,
    /// Colour port names and descriptors; `colored` still disables this when not a terminal or NO_COLOR is set
    pub colour: bool,
    /// Output the matched ports as JSON rather than lines
    pub json: bool,
}

impl PrintSettings {
    fn text(&self, s: &str) -> String {
        if self.ascii {
            translit::to_ascii(s)
        } else {
            s.to_string()
        }
    }

    fn port_name(&self, port: &ResolvedPort) -> String {
        let s = self.text(&port.port_name);
        if self.colour {
            s.magenta().to_string()
        } else {
            s
        }
    }

    fn descriptor(&self, port: &ResolvedPort) -> String {
        let s = self.text(&port.descriptor);
        if self.colour {
            s.bold().blue().to_string()
        } else {
            s
        }
    }
}

/// Line for matched `port` in the shape of `query`; same as [`Query::format_line`] when `settings` is default
pub fn render_line(query: &Query, port: &ResolvedPort, settings: &PrintSettings) -> String {
    match query {
        Query::List => format!(
            "{}\t{}",
            settings.port_name(port),
            settings.descriptor(port)
        ),
        Query::ByName(_) => settings.descriptor(port),
        Query::ByDescriptor(_) => settings.port_name(port),
    }
}

/// All lines for `query` over `ports`
pub fn render_lines(query: &Query, ports: &[ResolvedPort], settings: &PrintSettings) -> Vec<String> {
    query
        .select(ports)
        .into_iter()
        .map(|p| render_line(query, p, settings))
        .collect()
}

/// Report for `query` with every line terminated by a newline, empty if nothing matched
pub fn render_report(query: &Query, ports: &[ResolvedPort], settings: &PrintSettings) -> String {
    render_lines(query, ports, settings)
        .iter()
        .map(|l| format!("{}\n", l))
        .join("")
}

/// Matched ports as pretty JSON, strings transliterated if `settings.ascii`
pub fn render_json(query: &Query, ports: &[ResolvedPort], settings: &PrintSettings) -> Result<String> {
    let selected: Vec<ResolvedPort> = query
        .select(ports)
        .into_iter()
        .map(|p| ResolvedPort {
            port_name: settings.text(&p.port_name),
            descriptor: settings.text(&p.descriptor),
            ..p.clone()
        })
        .collect();

    to_json(&selected)
}

/// Pretty JSON of any serializable value
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Print the result of `query` over `ports` to stdout
pub fn print(query: &Query, ports: &[ResolvedPort], settings: &PrintSettings) -> Result<()> {
    if settings.json {
        println!("{}", render_json(query, ports, settings)?);
    } else {
        print!("{}", render_report(query, ports, settings));
    }

    Ok(())
}
