use crate::config::{CheckConfig, ConfigError};
use crate::counters::BASE_OID;
use crate::evaluator::{self, Reading};
use crate::jail::{self, ResolveError};
use crate::plugin::{JailReport, Reporter};
use crate::snmp::{Connector, Session, SnmpError, WalkResult};
use nagiosplugin::{safe_run, Resource, RunResult, ServiceState};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Connect error: {0}")]
    Connect(#[source] SnmpError),
    #[error("Walk error: {0}")]
    Walk(#[source] SnmpError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("Check panicked: {0}")]
    Panicked(String),
}

impl ProbeError {
    /// A missing jail is a legitimate finding, everything else means we
    /// could not check at all.
    pub fn state(&self) -> ServiceState {
        match self {
            ProbeError::Resolve(ResolveError::NotFound(_)) => ServiceState::Critical,
            _ => ServiceState::Unknown,
        }
    }
}

/// Run the check, always producing a result even if something panics.
pub fn execute<C: Connector>(config: &CheckConfig, connector: &C) -> RunResult<ProbeError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        safe_run(|| check(config, connector), ServiceState::Unknown)
    }))
    .unwrap_or_else(|payload| {
        RunResult::Err(
            ServiceState::Unknown,
            ProbeError::Panicked(panic_message(&*payload).to_string()),
        )
    });

    match result {
        RunResult::Err(_, e) => {
            tracing::debug!("Check failed: {:?}", e);
            RunResult::Err(e.state(), e)
        }
        ok => ok,
    }
}

fn check<C: Connector>(config: &CheckConfig, connector: &C) -> Result<Resource, ProbeError> {
    let mut report = JailReport::new();
    check_jail(config, connector, &mut report)?;
    Ok(report.into_resource())
}

/// Validate, walk, resolve and evaluate, reporting into `reporter`.
pub fn check_jail<C: Connector, R: Reporter>(
    config: &CheckConfig,
    connector: &C,
    reporter: &mut R,
) -> Result<(), ProbeError> {
    config.thresholds.validate()?;

    let target = &config.target;
    let mut session = connector.connect(target).map_err(ProbeError::Connect)?;
    tracing::debug!("Connected to {}:{}", target.host, target.port);

    let walk: WalkResult = session
        .bulk_walk(BASE_OID)
        .map_err(ProbeError::Walk)?
        .into_iter()
        .collect();
    tracing::debug!("Walk returned {} items", walk.len());

    // Nothing below needs the network
    drop(session);

    let index = jail::resolve_index(&walk, &config.jail)?;
    tracing::debug!("Jail {} has index {}", config.jail, index);

    let evaluation = evaluator::evaluate(&walk, index, &config.jail, &config.thresholds);
    let absent = evaluation
        .metrics
        .iter()
        .filter(|m| m.reading == Reading::Absent)
        .count();
    if absent > 0 {
        tracing::debug!("{} of {} counters had no value", absent, evaluation.metrics.len());
    }

    if let Some(disk) = evaluation.disk {
        tracing::debug!("Jail {} uses {} GB", config.jail, disk.used_gb);
        reporter.add_finding(disk.status, disk.message);
    }
    for metric in &evaluation.metrics {
        reporter.add_perf_data(metric.perf_data());
    }

    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
