//! INI configuration files.
//!
//! Options live in one section, `[output.syslog]` by default, using the
//! option names of [`SyslogOptions`]. `host` is accepted as an alias for
//! `address`. Unknown keys are ignored with a warning.

use std::path::Path;

use ini::{Ini, Properties};
use log::warn;

use super::SyslogOptions;
use crate::error::SyslogError;

/// Section read when the caller does not name one.
pub const DEFAULT_SECTION: &str = "output.syslog";

/// Read `section` of the INI file at `path`.
pub fn load_options(path: impl AsRef<Path>, section: &str) -> Result<SyslogOptions, SyslogError> {
    let path = path.as_ref();
    let ini = Ini::load_from_file(path)?;
    options_from_ini(&ini, section, &path.display().to_string())
}

/// Read `section` of INI `text`.
pub fn parse_options(text: &str, section: &str) -> Result<SyslogOptions, SyslogError> {
    let ini = Ini::load_from_str(text).map_err(ini::Error::Parse)?;
    options_from_ini(&ini, section, "configuration")
}

fn options_from_ini(ini: &Ini, section: &str, origin: &str) -> Result<SyslogOptions, SyslogError> {
    let props = ini
        .section(Some(section))
        .ok_or_else(|| SyslogError::invalid(format!("section [{section}] not found in {origin}")))?;
    options_from_properties(props)
}

fn parse_millis(key: &str, value: &str) -> Result<u64, SyslogError> {
    value
        .trim()
        .parse()
        .map_err(|_| SyslogError::invalid(format!("{key} must be a whole number of milliseconds")))
}

fn options_from_properties(props: &Properties) -> Result<SyslogOptions, SyslogError> {
    let mut options = SyslogOptions::default();
    for (key, value) in props.iter() {
        let owned = || Some(value.trim().to_owned());
        match key.trim().to_ascii_lowercase().as_str() {
            "network" => options.network = owned(),
            "address" | "host" => options.address = owned(),
            "facility" => options.facility = owned(),
            "severity" => options.severity = owned(),
            "tag" => options.tag = owned(),
            "format" => options.format = owned(),
            "on_failure" => options.on_failure = owned(),
            "hostname" => options.hostname = owned(),
            "connect_timeout_ms" => options.connect_timeout_ms = Some(parse_millis(key, value)?),
            "write_timeout_ms" => options.write_timeout_ms = Some(parse_millis(key, value)?),
            _ => warn!("FemtoSyslogClient ignoring unknown option {key:?}"),
        }
    }
    Ok(options)
}
