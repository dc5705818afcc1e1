use crate::snmp::{Community, Target};
use crate::version;
use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Parser};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 1161;

/// Retries per request, on top of the first attempt
pub const SNMP_RETRIES: u32 = 3;

#[derive(Parser, Debug)]
#[command(name = "check-snmp-jails", version = version::current_version())]
#[command(about = "Check per-jail resource counters and disk usage over SNMP", long_about = None)]
pub struct Args {
    /// Host name of the SNMP agent
    #[arg(short = 'H', long = "hostname")]
    pub host: String,

    /// Port number
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Jail name
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    pub jail: String,

    /// SNMP community string
    #[arg(
        short = 'C',
        long,
        env = "SNMP_COMMUNITY",
        hide_env_values = true,
        default_value = "public"
    )]
    pub community: Community,

    /// Connection time out (e.g. 500ms, 10s, 1m30s)
    #[arg(short, long, value_parser = parse_timeout, default_value = "10s")]
    pub timeout: Duration,

    /// Warning disk usage in GB (0 disables)
    #[arg(short, long, value_name = "GB", default_value_t = 0)]
    pub warning: u64,

    /// Critical disk usage in GB (0 disables)
    #[arg(short, long, value_name = "GB", default_value_t = 0)]
    pub critical: u64,

    /// Verbose output for debugging, repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Warning {warning} can't be bigger than critical {critical}")]
    WarningAboveCritical { warning: u64, critical: u64 },
}

/// Disk usage thresholds in whole gigabytes, 0 meaning disabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thresholds {
    pub warning_gb: u64,
    pub critical_gb: u64,
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.warning_gb > 0 && self.critical_gb > 0 && self.warning_gb > self.critical_gb {
            return Err(ConfigError::WarningAboveCritical {
                warning: self.warning_gb,
                critical: self.critical_gb,
            });
        }
        Ok(())
    }
}

/// Everything one check run needs
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub target: Target,
    pub jail: String,
    pub thresholds: Thresholds,
}

impl From<Args> for CheckConfig {
    fn from(args: Args) -> Self {
        Self {
            target: Target {
                host: args.host,
                port: args.port,
                community: args.community,
                timeout: args.timeout,
                retries: SNMP_RETRIES,
            },
            jail: args.jail,
            thresholds: Thresholds {
                warning_gb: args.warning,
                critical_gb: args.critical,
            },
        }
    }
}

/// Parse a timeout like `10s`, `500ms`, `1m30s` or `2h`. A bare number is
/// taken as seconds.
pub fn parse_timeout(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }

    let secs = match s.parse::<f64>() {
        Ok(secs) => secs,
        Err(_) => {
            let mut total = 0.0;
            let mut rest = s;
            while !rest.is_empty() {
                let num_end = rest
                    .find(|c: char| !(c.is_ascii_digit() || c == '.'))
                    .ok_or_else(|| format!("missing unit in duration {:?}", input))?;
                let value: f64 = rest[..num_end]
                    .parse()
                    .map_err(|_| format!("invalid duration {:?}", input))?;
                rest = &rest[num_end..];

                let unit_end = rest
                    .find(|c: char| c.is_ascii_digit() || c == '.')
                    .unwrap_or(rest.len());
                let factor = match &rest[..unit_end] {
                    "ms" => 0.001,
                    "s" => 1.0,
                    "m" => 60.0,
                    "h" => 3600.0,
                    unit => {
                        return Err(format!("unknown unit {:?} in duration {:?}", unit, input))
                    }
                };
                total += value * factor;
                rest = &rest[unit_end..];
            }
            total
        }
    };

    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("timeout must be greater than zero, got {:?}", input));
    }
    Ok(Duration::from_secs_f64(secs))
}
