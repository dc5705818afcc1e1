mod client;
mod community;
mod types;

pub use client::SnmpClient;
pub use community::Community;
pub use types::{SnmpError, SnmpResult, SnmpValue, Target, WalkResult};

/// Opens sessions to an SNMP agent.
pub trait Connector {
    type Session: Session;

    fn connect(&self, target: &Target) -> SnmpResult<Self::Session>;
}

/// An open session. Dropping it releases the underlying socket.
pub trait Session {
    /// Every (OID, value) pair under `base_oid`, OIDs in leading-dot form.
    fn bulk_walk(&mut self, base_oid: &str) -> SnmpResult<Vec<(String, SnmpValue)>>;
}
