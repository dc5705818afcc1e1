use crate::config::Thresholds;
use crate::counters::{CounterDescriptor, CounterKind, COUNTERS};
use crate::jail::JailIndex;
use crate::plugin::perf_unit;
use crate::snmp::WalkResult;
use nagiosplugin::{PerfData, ServiceState};

const GIB: u64 = 1024 * 1024 * 1024;

/// Raw reading of one counter for one jail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    Present(i64),
    /// No sample at the counter's OID, or one without an integer value
    Absent,
}

impl Reading {
    /// Absent readings count as zero
    pub fn raw(self) -> i64 {
        match self {
            Reading::Present(v) => v,
            Reading::Absent => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedMetric {
    pub counter: &'static CounterDescriptor,
    pub reading: Reading,
    /// Scaled value as reported
    pub value: f64,
    /// Warning bound in bytes, disk space only
    pub warning: Option<f64>,
    /// Critical bound in bytes, disk space only
    pub critical: Option<f64>,
}

impl EvaluatedMetric {
    pub fn perf_data(&self) -> PerfData<f64> {
        PerfData::new(self.counter.name, self.value)
            .with_unit(perf_unit(self.counter.unit))
            .with_thresholds(self.warning, self.critical)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskFinding {
    pub status: ServiceState,
    pub used_gb: u64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// One entry per known counter, ascending counter id
    pub metrics: Vec<EvaluatedMetric>,
    pub disk: Option<DiskFinding>,
}

/// Evaluate every known counter of the jail at `index`.
pub fn evaluate(
    walk: &WalkResult,
    index: JailIndex,
    jail: &str,
    thresholds: &Thresholds,
) -> Evaluation {
    let mut metrics = Vec::with_capacity(COUNTERS.len());
    let mut disk = None;

    for counter in COUNTERS {
        let oid = counter.oid(index.0);
        let reading = match walk.get(&oid).and_then(|value| value.as_i64()) {
            Some(v) => Reading::Present(v),
            None => {
                tracing::debug!("No value for {} at {}, reporting 0", counter.name, oid);
                Reading::Absent
            }
        };

        let raw = reading.raw();
        let mut metric = EvaluatedMetric {
            counter,
            reading,
            value: raw as f64,
            warning: None,
            critical: None,
        };

        match counter.kind {
            CounterKind::Plain => {}
            CounterKind::CpuTime => metric.value = raw as f64 / 100.0,
            CounterKind::DiskSpace => {
                if thresholds.warning_gb > 0 {
                    metric.warning = Some(thresholds.warning_gb.saturating_mul(GIB) as f64);
                }
                if thresholds.critical_gb > 0 {
                    metric.critical = Some(thresholds.critical_gb.saturating_mul(GIB) as f64);
                }
                disk = Some(check_disk(raw, jail, thresholds));
            }
        }

        metrics.push(metric);
    }

    Evaluation { metrics, disk }
}

/// Compare disk usage in whole gigabytes against the thresholds. Critical
/// overrides warning.
pub fn check_disk(bytes: i64, jail: &str, thresholds: &Thresholds) -> DiskFinding {
    let used_gb = bytes.max(0) as u64 / GIB;
    let mut status = ServiceState::Ok;

    if thresholds.warning_gb > 0 && used_gb > thresholds.warning_gb {
        status = ServiceState::Warning;
    }
    if thresholds.critical_gb > 0 && used_gb > thresholds.critical_gb {
        status = ServiceState::Critical;
    }

    let message = if thresholds.warning_gb > 0 {
        format!(
            "Jail {} is using {} / {} GB disk space ({}%)",
            jail,
            used_gb,
            thresholds.warning_gb,
            used_gb.saturating_mul(100) / thresholds.warning_gb
        )
    } else {
        format!("Jail {} is using {} GB disk space", jail, used_gb)
    };

    DiskFinding {
        status,
        used_gb,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snmp::SnmpValue;

    const JAILS: &str = ".1.3.6.1.4.1.12325.1.1111.2.1";

    fn thresholds(warning_gb: u64, critical_gb: u64) -> Thresholds {
        Thresholds {
            warning_gb,
            critical_gb,
        }
    }

    fn sample_walk() -> WalkResult {
        [
            (format!("{}.1.3", JAILS), SnmpValue::String("web".to_string())),
            (format!("{}.10.3", JAILS), SnmpValue::Counter64(1_000_000)),
            (format!("{}.11.3", JAILS), SnmpValue::Counter32(2_000)),
            (format!("{}.12.3", JAILS), SnmpValue::Counter64(3_000_000)),
            (format!("{}.13.3", JAILS), SnmpValue::Counter32(4_000)),
            (format!("{}.20.3", JAILS), SnmpValue::Gauge32(12)),
            (format!("{}.21.3", JAILS), SnmpValue::Integer(34)),
            (format!("{}.25.3", JAILS), SnmpValue::Counter64(12_345)),
            (format!("{}.30.3", JAILS), SnmpValue::Counter64(5_368_709_120)),
            (format!("{}.31.3", JAILS), SnmpValue::Gauge32(56_789)),
            // Another jail, must not leak into jail 3
            (format!("{}.30.4", JAILS), SnmpValue::Counter64(99 * GIB)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_metrics_in_ascending_counter_order() {
        let evaluation = evaluate(&sample_walk(), JailIndex(3), "web", &thresholds(0, 0));
        let names: Vec<_> = evaluation.metrics.iter().map(|m| m.counter.name).collect();
        assert_eq!(
            names,
            vec![
                "InOctets",
                "InPackets",
                "OutOctets",
                "OutPackets",
                "Processes",
                "Threads",
                "CpuTime",
                "DiskSpace",
                "DiskFiles"
            ]
        );
    }

    #[test]
    fn test_values_are_normalized_and_scaled() {
        let evaluation = evaluate(&sample_walk(), JailIndex(3), "web", &thresholds(0, 0));
        let value = |name: &str| {
            evaluation
                .metrics
                .iter()
                .find(|m| m.counter.name == name)
                .map(|m| m.value)
                .unwrap()
        };

        assert_eq!(value("InOctets"), 1_000_000.0);
        assert_eq!(value("InPackets"), 2_000.0);
        assert_eq!(value("Processes"), 12.0);
        assert_eq!(value("Threads"), 34.0);
        assert_eq!(value("CpuTime"), 123.45);
        assert_eq!(value("DiskSpace"), 5_368_709_120.0);
        assert_eq!(value("DiskFiles"), 56_789.0);
    }

    #[test]
    fn test_disk_warning_scenario() {
        let evaluation = evaluate(&sample_walk(), JailIndex(3), "web", &thresholds(3, 10));
        let disk = evaluation.disk.unwrap();
        assert_eq!(disk.status, ServiceState::Warning);
        assert_eq!(disk.used_gb, 5);
        assert_eq!(disk.message, "Jail web is using 5 / 3 GB disk space (166%)");

        let metric = evaluation
            .metrics
            .iter()
            .find(|m| m.counter.kind == CounterKind::DiskSpace)
            .unwrap();
        assert_eq!(metric.warning, Some(3_221_225_472.0));
        assert_eq!(metric.critical, Some(10_737_418_240.0));
        let (_, output) = nagiosplugin::Resource::new("jail")
            .with_result(nagiosplugin::CheckResult::new().with_perf_data(metric.perf_data()))
            .nagios_result();
        assert!(output.ends_with("|'DiskSpace'=5368709120b;3221225472;10737418240;;"));
    }

    #[test]
    fn test_disk_without_thresholds_is_ok() {
        let evaluation = evaluate(&sample_walk(), JailIndex(3), "web", &thresholds(0, 0));
        let disk = evaluation.disk.unwrap();
        assert_eq!(disk.status, ServiceState::Ok);
        assert_eq!(disk.message, "Jail web is using 5 GB disk space");

        assert!(evaluation
            .metrics
            .iter()
            .all(|m| m.warning.is_none() && m.critical.is_none()));
    }

    #[test]
    fn test_only_disk_metric_carries_bounds() {
        let evaluation = evaluate(&sample_walk(), JailIndex(3), "web", &thresholds(3, 10));
        for metric in &evaluation.metrics {
            if metric.counter.kind != CounterKind::DiskSpace {
                assert_eq!(metric.warning, None, "{}", metric.counter.name);
                assert_eq!(metric.critical, None, "{}", metric.counter.name);
            }
        }
    }

    #[test]
    fn test_check_disk_threshold_grid() {
        let cases = [
            // (used GiB, warning, critical, expected)
            (5, 3, 10, ServiceState::Warning),
            (11, 3, 10, ServiceState::Critical),
            (10, 3, 10, ServiceState::Warning),
            (3, 3, 10, ServiceState::Ok),
            (2, 3, 10, ServiceState::Ok),
            (11, 0, 10, ServiceState::Critical),
            (9, 0, 10, ServiceState::Ok),
            (4, 3, 0, ServiceState::Warning),
            (1000, 0, 0, ServiceState::Ok),
        ];

        for (used, warning, critical, expected) in cases {
            let finding = check_disk((used * GIB) as i64, "web", &thresholds(warning, critical));
            assert_eq!(
                finding.status, expected,
                "used={} warning={} critical={}",
                used, warning, critical
            );
        }
    }

    #[test]
    fn test_check_disk_truncates_to_whole_gigabytes() {
        // 3.99 GiB is 3 GB, not over a 3 GB warning
        let bytes = (4 * GIB - 1) as i64;
        let finding = check_disk(bytes, "web", &thresholds(3, 0));
        assert_eq!(finding.used_gb, 3);
        assert_eq!(finding.status, ServiceState::Ok);
    }

    #[test]
    fn test_check_disk_critical_only_omits_percentage() {
        let finding = check_disk((12 * GIB) as i64, "web", &thresholds(0, 10));
        assert_eq!(finding.status, ServiceState::Critical);
        assert_eq!(finding.message, "Jail web is using 12 GB disk space");
    }

    #[test]
    fn test_check_disk_negative_bytes_clamp_to_zero() {
        let finding = check_disk(-5, "web", &thresholds(1, 2));
        assert_eq!(finding.used_gb, 0);
        assert_eq!(finding.status, ServiceState::Ok);
    }

    #[test]
    fn test_absent_samples_read_as_zero() {
        let mut walk = sample_walk();
        walk.remove(&format!("{}.21.3", JAILS));
        walk.insert(
            format!("{}.20.3", JAILS),
            SnmpValue::String("not a number".to_string()),
        );

        let evaluation = evaluate(&walk, JailIndex(3), "web", &thresholds(0, 0));
        for name in ["Processes", "Threads"] {
            let metric = evaluation
                .metrics
                .iter()
                .find(|m| m.counter.name == name)
                .unwrap();
            assert_eq!(metric.reading, Reading::Absent);
            assert_eq!(metric.value, 0.0);
        }

        let in_octets = &evaluation.metrics[0];
        assert_eq!(in_octets.reading, Reading::Present(1_000_000));
    }

    #[test]
    fn test_unknown_jail_index_reads_all_zero() {
        let evaluation = evaluate(&sample_walk(), JailIndex(42), "ghost", &thresholds(3, 10));
        assert!(evaluation
            .metrics
            .iter()
            .all(|m| m.reading == Reading::Absent && m.value == 0.0));
        assert_eq!(evaluation.disk.unwrap().status, ServiceState::Ok);
    }
}
