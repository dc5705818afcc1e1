//! Plugin output through `nagiosplugin`: one resource per run, findings as
//! its states and description, every counter as perfdata.

use nagiosplugin::{CheckResult, PerfData, Resource, ServiceState, Unit, UnitString};

/// Name the status line starts with
pub const RESOURCE_NAME: &str = "check_snmp_jails";

/// Sink for check results.
pub trait Reporter {
    fn add_finding(&mut self, state: ServiceState, message: String);
    fn add_perf_data(&mut self, perf_data: PerfData<f64>);
}

/// Collects one run's findings and perfdata into a [`Resource`].
#[derive(Debug)]
pub struct JailReport {
    resource: Resource,
    findings: Vec<(ServiceState, String)>,
}

impl JailReport {
    pub fn new() -> Self {
        Self {
            resource: Resource::new(RESOURCE_NAME),
            findings: Vec::new(),
        }
    }

    /// Finish the report. Only the messages at the worst state make the
    /// description.
    pub fn into_resource(self) -> Resource {
        let mut resource = self.resource;

        if let Some(worst) = self.findings.iter().map(|(state, _)| *state).max() {
            let description = self
                .findings
                .iter()
                .filter(|(state, _)| *state == worst)
                .map(|(_, message)| message.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            resource.set_description(description);
        }

        resource
    }
}

impl Default for JailReport {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for JailReport {
    fn add_finding(&mut self, state: ServiceState, message: String) {
        self.resource.push_result(CheckResult::new().with_state(state));
        self.findings.push((state, message));
    }

    fn add_perf_data(&mut self, perf_data: PerfData<f64>) {
        self.resource.push_result(CheckResult::new().with_perf_data(perf_data));
    }
}

/// Perfdata unit for a counter's unit suffix
pub fn perf_unit(suffix: &str) -> Unit {
    match suffix {
        "" => Unit::None,
        "c" => Unit::Counter,
        "s" => Unit::Seconds,
        other => Unit::Other(UnitString::new_unchecked(other)),
    }
}
