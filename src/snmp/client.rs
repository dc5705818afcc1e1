use super::types::{SnmpError, SnmpResult, SnmpValue, Target};
use super::{Connector, Session};
use snmp2::{Oid, SyncSession};
use std::str::FromStr;

/// Varbinds requested per GETBULK round trip
const MAX_REPETITIONS: u32 = 10;

/// SNMPv2c client backed by a blocking `snmp2` session
#[derive(Debug, Clone, Copy, Default)]
pub struct SnmpClient;

impl SnmpClient {
    pub fn new() -> Self {
        Self
    }
}

impl Connector for SnmpClient {
    type Session = SnmpSession;

    fn connect(&self, target: &Target) -> SnmpResult<SnmpSession> {
        let addr = target.address();
        let req_id = 1;
        let session = open_session(&addr, target, req_id)?;

        Ok(SnmpSession {
            session,
            target: target.clone(),
            addr,
            req_id,
        })
    }
}

fn open_session(addr: &str, target: &Target, req_id: i32) -> SnmpResult<SyncSession> {
    SyncSession::new_v2c(
        addr,
        target.community.as_bytes(),
        Some(target.timeout),
        req_id,
    )
    .map_err(|source| SnmpError::Connect {
        target: addr.to_string(),
        source,
    })
}

pub struct SnmpSession {
    session: SyncSession,
    target: Target,
    addr: String,
    /// Request id of the next GETBULK
    req_id: i32,
}

impl SnmpSession {
    /// One GETBULK round trip, retrying requests that time out or are
    /// answered by a stale reply.
    fn getbulk(&mut self, oid: &Oid<'_>) -> SnmpResult<(u32, Vec<(String, SnmpValue)>)> {
        let mut attempt = 0;

        loop {
            let result = self.session.getbulk(&[oid], 0, MAX_REPETITIONS);
            self.req_id = self.req_id.wrapping_add(1);

            match result {
                Ok(response) => {
                    let status = response.error_status;

                    // Collect owned data so the response stops borrowing the session
                    let data: Vec<(String, SnmpValue)> = response
                        .varbinds
                        .map(|(name, value)| (normalize_oid(&name.to_string()), convert_value(value)))
                        .collect();

                    return Ok((status, data));
                }
                Err(e @ (snmp2::Error::Receive | snmp2::Error::RequestIdMismatch))
                    if attempt < self.target.retries =>
                {
                    attempt += 1;
                    tracing::debug!(
                        "{:?} from {}, retry {}/{}",
                        e,
                        self.addr,
                        attempt,
                        self.target.retries
                    );
                    self.reopen()?;
                }
                Err(e) => return Err(map_snmp_error(e)),
            }
        }
    }

    /// Replace the socket. A late reply to an abandoned request then lands on
    /// the closed port instead of answering the next one.
    fn reopen(&mut self) -> SnmpResult<()> {
        self.session = open_session(&self.addr, &self.target, self.req_id)?;
        Ok(())
    }
}

impl Session for SnmpSession {
    fn bulk_walk(&mut self, base_oid: &str) -> SnmpResult<Vec<(String, SnmpValue)>> {
        let base = normalize_oid(base_oid);
        let base_components = oid_components(&base)
            .ok_or_else(|| SnmpError::InvalidOid(base_oid.to_string()))?;

        let mut results = Vec::new();
        let mut current = parse_oid(&base)?;
        let mut current_components = base_components.clone();

        loop {
            let (error_status, varbinds) = self.getbulk(&current)?;

            if error_status != 0 {
                return Err(SnmpError::RequestFailed(format!(
                    "SNMP error status: {}",
                    error_status
                )));
            }

            if varbinds.is_empty() {
                break;
            }

            for (name, value) in varbinds {
                if value == SnmpValue::EndOfMibView {
                    return Ok(results);
                }

                let components = oid_components(&name)
                    .ok_or_else(|| SnmpError::InvalidOid(format!("from response: {}", name)))?;

                if !components.starts_with(&base_components) {
                    return Ok(results);
                }

                // An agent answering out of order would make us loop forever
                if components <= current_components {
                    return Err(SnmpError::RequestFailed(format!(
                        "OID not increasing: {} after {}",
                        name,
                        current
                    )));
                }

                tracing::trace!("{} = {:?}", name, value);
                current = parse_oid(&name)?;
                current_components = components;
                results.push((name, value));
            }
        }

        Ok(results)
    }
}

impl Drop for SnmpSession {
    fn drop(&mut self) {
        tracing::debug!("Closing SNMP session to {}", self.addr);
    }
}

/// Leading-dot form used for every OID this crate stores or compares.
pub(crate) fn normalize_oid(oid: &str) -> String {
    format!(".{}", oid.trim().trim_start_matches('.'))
}

fn oid_components(oid: &str) -> Option<Vec<u64>> {
    oid.trim_start_matches('.')
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect()
}

fn parse_oid(oid: &str) -> SnmpResult<Oid<'static>> {
    Oid::from_str(oid.trim_start_matches('.'))
        .map_err(|_| SnmpError::InvalidOid(oid.to_string()))
}

/// Convert snmp2 crate's Value to our SnmpValue
fn convert_value(value: snmp2::Value) -> SnmpValue {
    use snmp2::Value as V;

    match value {
        V::Integer(i) => SnmpValue::Integer(i),
        V::OctetString(s) => match std::str::from_utf8(s) {
            Ok(text) => SnmpValue::String(text.to_string()),
            Err(_) => SnmpValue::Other,
        },
        V::Counter32(c) => SnmpValue::Counter32(c),
        V::Counter64(c) => SnmpValue::Counter64(c),
        V::Unsigned32(u) => SnmpValue::Gauge32(u),
        V::Timeticks(t) => SnmpValue::TimeTicks(t),
        V::EndOfMibView => SnmpValue::EndOfMibView,
        _ => SnmpValue::Other,
    }
}

/// Map snmp2 crate errors to our SnmpError
fn map_snmp_error(err: snmp2::Error) -> SnmpError {
    use snmp2::Error;

    match err {
        Error::Send => SnmpError::NetworkUnreachable,
        Error::Receive => SnmpError::Timeout,
        Error::CommunityMismatch => SnmpError::AuthFailure,
        Error::RequestIdMismatch => {
            SnmpError::RequestFailed("reply to an earlier request".to_string())
        }
        _ => SnmpError::RequestFailed(format!("{:?}", err)),
    }
}
