use super::community::Community;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnmpError {
    #[error("SNMP request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid OID: {0}")]
    InvalidOid(String),
    #[error("cannot open session to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Timeout")]
    Timeout,
    #[error("Authentication failure")]
    AuthFailure,
    #[error("Network unreachable")]
    NetworkUnreachable,
}

pub type SnmpResult<T> = Result<T, SnmpError>;

/// Result of a subtree walk, keyed by the full OID in leading-dot form.
pub type WalkResult = HashMap<String, SnmpValue>;

/// Where and how to reach the SNMP agent.
#[derive(Debug, Clone)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub community: Community,
    pub timeout: Duration,
    pub retries: u32,
}

impl Target {
    pub fn address(&self) -> String {
        // Bare IPv6 literals need brackets to carry a port.
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// SNMP value returned by the agent, normalized away from the wire types
#[derive(Debug, Clone, PartialEq)]
pub enum SnmpValue {
    Integer(i64),
    /// UTF-8 octet string
    String(String),
    Counter32(u32),
    Counter64(u64),
    Gauge32(u32),
    TimeTicks(u32),
    EndOfMibView,
    /// Anything neither numeric nor text: binary octets, addresses, nulls
    /// and the noSuch exceptions
    Other,
}

impl SnmpValue {
    /// Integer view of every numeric encoding. Counter64 values above
    /// `i64::MAX` wrap, matching a plain 64-bit reinterpretation.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SnmpValue::Integer(v) => Some(*v),
            SnmpValue::Counter32(v) => Some(*v as i64),
            SnmpValue::Counter64(v) => Some(*v as i64),
            SnmpValue::Gauge32(v) => Some(*v as i64),
            SnmpValue::TimeTicks(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SnmpValue::String(s) => Some(s),
            _ => None,
        }
    }
}
