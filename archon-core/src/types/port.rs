//! Port mapping notation
//!
//! Users type ports as `"3000"` (container and host share the port) or
//! `"3000:3001"` (container port 3000 published on host port 3001).

use std::fmt;
use std::num::IntErrorKind;

use serde::Serialize;
use thiserror::Error;

/// Which part of a port string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortSide {
    /// The left side of `container:host`.
    Container,
    /// The right side of `container:host`.
    Host,
    /// The single-port form, which sets both sides.
    Single,
}

impl fmt::Display for PortSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container => write!(f, "container"),
            Self::Host => write!(f, "host"),
            Self::Single => write!(f, "single"),
        }
    }
}

/// Port string parse failure.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code")]
pub enum PortMappingError {
    /// Empty input or more than one `:`.
    #[error("invalid port format: '{input}' (use '3000' or '3000:3001')")]
    InvalidFormat { input: String },

    /// A side is not an integer.
    #[error("invalid {side} port: '{value}'")]
    InvalidPort { side: PortSide, value: String },

    /// A side is an integer outside 1-65535.
    #[error("{side} port out of range (1-65535): {value}")]
    PortOutOfRange { side: PortSide, value: String },
}

fn parse_side(raw: &str, side: PortSide) -> Result<u16, PortMappingError> {
    let value = raw.trim();
    match value.parse::<i64>() {
        Ok(port) => u16::try_from(port)
            .ok()
            .filter(|port| *port >= 1)
            .ok_or_else(|| PortMappingError::PortOutOfRange {
                side,
                value: value.to_string(),
            }),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Err(PortMappingError::PortOutOfRange {
                side,
                value: value.to_string(),
            })
        }
        Err(_) => Err(PortMappingError::InvalidPort {
            side,
            value: value.to_string(),
        }),
    }
}

/// Parse `"3000"` or `"3000:3001"` into `(container_port, host_port)`.
///
/// # Errors
/// [`PortMappingError`] naming the offending side.
pub fn parse_port_mapping(input: &str) -> Result<(u16, u16), PortMappingError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PortMappingError::InvalidFormat {
            input: String::new(),
        });
    }

    let parts: Vec<&str> = input.split(':').collect();
    match parts.as_slice() {
        [single] => {
            let port = parse_side(single, PortSide::Single)?;
            Ok((port, port))
        }
        [container, host] => {
            let container = parse_side(container, PortSide::Container)?;
            let host = parse_side(host, PortSide::Host)?;
            Ok((container, host))
        }
        _ => Err(PortMappingError::InvalidFormat {
            input: input.to_string(),
        }),
    }
}

/// Canonical display form: `"c"` when `host` is unset (0) or equal to
/// `container`, `"c:h"` otherwise.
pub fn format_port_mapping(container_port: u16, host_port: u16) -> String {
    if host_port == 0 || host_port == container_port {
        container_port.to_string()
    } else {
        format!("{container_port}:{host_port}")
    }
}
