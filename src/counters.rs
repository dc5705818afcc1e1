/// Enterprise subtree holding the jail table
pub const BASE_OID: &str = ".1.3.6.1.4.1.12325.1.1111";

/// Per-jail counters, suffixed `.<counter id>.<jail index>`
pub const JAILS_OID: &str = ".2.1";

/// Counter id of the jail-name column
pub const JAIL_NAMES_ID: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Plain,
    /// Raw value is in hundredths of a second
    CpuTime,
    /// Raw value is in bytes and checked against the disk thresholds
    DiskSpace,
}

#[derive(Debug, PartialEq, Eq)]
pub struct CounterDescriptor {
    pub id: u32,
    pub name: &'static str,
    /// Perfdata unit of measurement
    pub unit: &'static str,
    pub kind: CounterKind,
}

impl CounterDescriptor {
    const fn new(id: u32, name: &'static str, unit: &'static str, kind: CounterKind) -> Self {
        Self {
            id,
            name,
            unit,
            kind,
        }
    }

    /// Full OID of this counter for one jail
    pub fn oid(&self, jail_index: u32) -> String {
        format!("{}{}.{}.{}", BASE_OID, JAILS_OID, self.id, jail_index)
    }
}

/// Known counters, in ascending id order
pub static COUNTERS: &[CounterDescriptor] = &[
    CounterDescriptor::new(10, "InOctets", "c", CounterKind::Plain),
    CounterDescriptor::new(11, "InPackets", "c", CounterKind::Plain),
    CounterDescriptor::new(12, "OutOctets", "c", CounterKind::Plain),
    CounterDescriptor::new(13, "OutPackets", "c", CounterKind::Plain),
    CounterDescriptor::new(20, "Processes", "", CounterKind::Plain),
    CounterDescriptor::new(21, "Threads", "", CounterKind::Plain),
    CounterDescriptor::new(25, "CpuTime", "s", CounterKind::CpuTime),
    CounterDescriptor::new(30, "DiskSpace", "b", CounterKind::DiskSpace),
    CounterDescriptor::new(31, "DiskFiles", "", CounterKind::Plain),
];

/// Prefix of the jail-name column, without the trailing dot
pub fn jail_names_oid() -> String {
    format!("{}{}.{}", BASE_OID, JAILS_OID, JAIL_NAMES_ID)
}
