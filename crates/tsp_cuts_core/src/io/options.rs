use std::{env, fmt, path::Path};

use log::LevelFilter;
use mip::settings::MipSettings;

use crate::{Error, Result};

/// Runtime options for loading, solving and logging.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverOptions {
    /// Optional input file path for cities. Empty means stdin.
    pub input: String,
    /// How to read the input.
    pub input_format: InputFormat,
    /// Optional output file path for the ordered tour. Empty means stdout.
    pub output: String,
    /// Wall-clock limit for the MIP search in seconds. `0` disables it.
    pub time_limit: f64,
    /// Maximum number of branch-and-bound nodes.
    pub max_nodes: u64,
    /// Integrality tolerance for binary variables.
    pub int_feas_tol: f64,
    /// Multiple of the average leg length above which a leg counts as an outlier in metrics logs.
    pub outlier_threshold: f64,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    pub log_timestamp: bool,
    /// Optional output file path for logs and metrics. Empty means stderr.
    pub log_output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            "off" => Ok(Self::Off),
            _ => Err(invalid_value("log-level", value)),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Off => "off",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogFormat {
    Compact,
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(invalid_value("log-format", value)),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputFormat {
    /// `.json` extension or a leading `{`/`[` means JSON, anything else points.
    Auto,
    Json,
    Points,
}

impl InputFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "json" => Ok(Self::Json),
            "points" | "txt" => Ok(Self::Points),
            _ => Err(invalid_value("input-format", value)),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Json => "json",
            Self::Points => "points",
        }
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            input: String::new(),
            input_format: InputFormat::Auto,
            output: String::new(),
            time_limit: 0.0,
            max_nodes: 1_000_000,
            int_feas_tol: 1e-6,
            outlier_threshold: 3.0,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
        }
    }
}

impl SolverOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    pub fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = split_arg(raw_name, &mut args);
            options.apply(&name, value)?;
        }

        Ok(options)
    }

    fn apply(&mut self, name: &str, value: Option<String>) -> Result<()> {
        match name {
            "log-timestamp" => {
                self.log_timestamp = match value {
                    Some(v) => parse_bool(name, &v)?,
                    None => true,
                };
                return Ok(());
            }
            "no-log-timestamp" => {
                if value.is_some() {
                    return Err(Error::invalid_input(format!(
                        "Flag --{name} does not take a value"
                    )));
                }
                self.log_timestamp = false;
                return Ok(());
            }
            _ => {}
        }

        let known = matches!(
            name,
            "input"
                | "input-format"
                | "output"
                | "time-limit"
                | "max-nodes"
                | "int-feas-tol"
                | "outlier-threshold"
                | "log-level"
                | "log-format"
                | "log-output"
        );
        if !known {
            return Err(Error::invalid_input(format!(
                "Unknown option: --{name}\n\n{}",
                Self::usage()
            )));
        }

        let raw =
            value.ok_or_else(|| Error::invalid_input(format!("Missing value for --{name}")))?;
        match name {
            "input" => self.input = raw,
            "input-format" => self.input_format = InputFormat::parse(&raw)?,
            "output" => self.output = raw,
            "time-limit" => self.time_limit = parse_number(name, &raw)?,
            "max-nodes" => self.max_nodes = parse_number(name, &raw)?,
            "int-feas-tol" => {
                let tol: f64 = parse_number(name, &raw)?;
                if !(tol > 0.0 && tol < 0.5) {
                    return Err(Error::invalid_input(format!(
                        "Invalid value for --{name}: {raw} (expected 0 < value < 0.5)"
                    )));
                }
                self.int_feas_tol = tol;
            }
            "outlier-threshold" => self.outlier_threshold = parse_number(name, &raw)?,
            "log-level" => self.log_level = LogLevel::parse(&raw)?,
            "log-format" => self.log_format = LogFormat::parse(&raw)?,
            _ => self.log_output = raw,
        }
        Ok(())
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  tsp-cuts [options] [--input cities.json]\n",
            "  tsp-cuts [options] < points.txt\n\n",
            "Options:\n",
            "  --input <path>\n",
            "  --input-format <auto|json|points>\n",
            "  --output <path>\n",
            "  --time-limit <secs>\n",
            "  --max-nodes <u64>\n",
            "  --int-feas-tol <f64>\n",
            "  --outlier-threshold <f64>\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty|json>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --help\n",
            "\n",
            "Examples:\n",
            "  tsp-cuts --input capitals.json --output tour.txt\n",
            "  tsp-cuts --input-format=points --log-level=info < points.txt\n",
            "  tsp-cuts --time-limit 60 --log-level=debug --log-format=json --log-output run.log < cities.json\n",
        )
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.log_output)
    }

    pub fn output_path(&self) -> Option<&Path> {
        non_stdio_path(&self.output)
    }

    pub fn input_path(&self) -> Option<&Path> {
        non_stdio_path(&self.input)
    }

    pub fn mip_settings(&self) -> MipSettings {
        MipSettings::default()
            .with_time_limit(self.time_limit)
            .with_max_nodes(self.max_nodes)
            .with_int_feas_tol(self.int_feas_tol)
    }
}

impl fmt::Display for SolverOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "input={} input_format={} output={} time_limit={} max_nodes={} int_feas_tol={} \
             outlier_threshold={} log_level={} log_format={} log_timestamp={} log_output={}",
            display_path(&self.input, "stdin"),
            self.input_format.as_str(),
            display_path(&self.output, "stdout"),
            self.time_limit,
            self.max_nodes,
            self.int_feas_tol,
            self.outlier_threshold,
            self.log_level.as_str(),
            self.log_format.as_str(),
            self.log_timestamp,
            display_path(&self.log_output, "stderr"),
        )
    }
}

fn split_arg(
    raw_name: &str,
    args: &mut std::iter::Peekable<impl Iterator<Item = String>>,
) -> (String, Option<String>) {
    if let Some((k, v)) = raw_name.split_once('=') {
        return (k.to_string(), Some(v.to_string()));
    }

    let value = match args.peek() {
        Some(next) if !next.starts_with("--") => args.next(),
        _ => None,
    };

    (raw_name.to_string(), value)
}

fn non_stdio_path(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}

fn display_path<'a>(raw: &'a str, fallback: &'a str) -> &'a str {
    non_stdio_path(raw).map_or(fallback, |_| raw.trim())
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::invalid_input(format!("Invalid value for --{name}: {value}")))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::invalid_input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}

fn invalid_value(option: &str, value: &str) -> Error {
    Error::invalid_input(format!("Invalid value for --{option}: {value}"))
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    use super::{InputFormat, LogFormat, LogLevel, SolverOptions, parse_bool};
    use crate::Error;

    #[test]
    fn parse_bool_accepts_common_values() {
        assert!(parse_bool("x", "true").expect("parse"));
        assert!(parse_bool("x", "YES").expect("parse"));
        assert!(!parse_bool("x", "0").expect("parse"));
        assert!(!parse_bool("x", "off").expect("parse"));
    }

    #[test]
    fn parse_bool_rejects_unknown_values() {
        let err = parse_bool("log-timestamp", "maybe").expect_err("invalid bool should fail");
        assert!(
            err.to_string()
                .contains("Invalid boolean for --log-timestamp: maybe")
        );
    }

    #[test]
    fn log_level_maps_to_expected_filter() {
        assert_eq!(LogLevel::Error.to_filter(), LevelFilter::Error);
        assert_eq!(LogLevel::Warn.to_filter(), LevelFilter::Warn);
        assert_eq!(LogLevel::Info.to_filter(), LevelFilter::Info);
        assert_eq!(LogLevel::Debug.to_filter(), LevelFilter::Debug);
        assert_eq!(LogLevel::Trace.to_filter(), LevelFilter::Trace);
        assert_eq!(LogLevel::Off.to_filter(), LevelFilter::Off);
        assert_eq!(LogLevel::parse("WARNING").expect("alias"), LogLevel::Warn);
    }

    #[test]
    fn parse_from_iter_applies_known_options() {
        let options = SolverOptions::parse_from_iter([
            "--input=capitals.json",
            "--input-format=json",
            "--output",
            "tour.txt",
            "--time-limit=12.5",
            "--max-nodes=500",
            "--int-feas-tol=1e-5",
            "--outlier-threshold=4",
            "--log-level=debug",
            "--log-format=json",
            "--log-timestamp=false",
            "--log-output=run.log",
        ])
        .expect("parse options");

        assert_eq!(options.input, "capitals.json");
        assert_eq!(options.input_format, InputFormat::Json);
        assert_eq!(options.output, "tour.txt");
        assert_eq!(options.time_limit, 12.5);
        assert_eq!(options.max_nodes, 500);
        assert_eq!(options.int_feas_tol, 1e-5);
        assert_eq!(options.outlier_threshold, 4.0);
        assert_eq!(options.log_level, LogLevel::Debug);
        assert_eq!(options.log_format, LogFormat::Json);
        assert!(!options.log_timestamp);
        assert_eq!(options.log_output, "run.log");
    }

    #[test]
    fn mip_settings_follow_options() {
        let options =
            SolverOptions::parse_from_iter(["--time-limit=2", "--max-nodes=9"]).expect("parse");
        let settings = options.mip_settings();
        assert_eq!(settings.time_limit_ms, Some(2_000));
        assert_eq!(settings.max_nodes, 9);

        let settings = SolverOptions::default().mip_settings();
        assert_eq!(settings.time_limit_ms, None);
    }

    #[test]
    fn parse_from_iter_accepts_bare_log_timestamp_flags() {
        let options = SolverOptions::parse_from_iter(["--no-log-timestamp"]).expect("parse");
        assert!(!options.log_timestamp);

        let options =
            SolverOptions::parse_from_iter(["--no-log-timestamp", "--log-timestamp"])
                .expect("parse");
        assert!(options.log_timestamp);
    }

    #[test]
    fn parse_from_iter_rejects_no_log_timestamp_with_value() {
        let err = SolverOptions::parse_from_iter(["--no-log-timestamp=true"])
            .expect_err("expected flag value rejection");
        assert!(err.to_string().contains("does not take a value"));
    }

    #[test]
    fn parse_from_iter_rejects_unknown_option() {
        let err = SolverOptions::parse_from_iter(["--unknown-opt=1"])
            .expect_err("expected unknown option error");
        assert!(err.to_string().contains("Unknown option: --unknown-opt"));
    }

    #[test]
    fn parse_from_iter_rejects_unexpected_positional_argument() {
        let err = SolverOptions::parse_from_iter(["cities.json"])
            .expect_err("expected positional error");
        assert!(err.to_string().contains("Unexpected argument: cities.json"));
    }

    #[test]
    fn parse_from_iter_requires_values() {
        let err = SolverOptions::parse_from_iter(["--max-nodes"])
            .expect_err("missing value should fail");
        assert!(err.to_string().contains("Missing value for --max-nodes"));

        let err = SolverOptions::parse_from_iter(["--max-nodes=lots"])
            .expect_err("bad number should fail");
        assert!(err.to_string().contains("Invalid value for --max-nodes"));
    }

    #[test]
    fn int_feas_tol_must_be_below_one_half() {
        for raw in ["--int-feas-tol=0.5", "--int-feas-tol=0", "--int-feas-tol=-0.1", "--int-feas-tol=NaN"] {
            let err = SolverOptions::parse_from_iter([raw]).expect_err("tolerance should fail");
            assert!(matches!(err, Error::InvalidInput(_)));
            assert!(err.to_string().contains("expected 0 < value < 0.5"));
        }

        let options = SolverOptions::parse_from_iter(["--int-feas-tol=0.25"]).expect("parse");
        assert_eq!(options.int_feas_tol, 0.25);
    }

    #[test]
    fn parse_from_iter_help_returns_usage_error() {
        let err =
            SolverOptions::parse_from_iter(["--help"]).expect_err("help should short-circuit");
        assert!(err.to_string().contains("Usage:"));
    }

    #[test]
    fn stdio_paths_are_none() {
        let options = SolverOptions {
            output: "-".to_string(),
            log_output: "  ".to_string(),
            ..SolverOptions::default()
        };
        assert!(options.output_path().is_none());
        assert!(options.log_output_path().is_none());
        assert!(options.input_path().is_none());
    }

    #[test]
    fn display_is_key_value() {
        let shown = SolverOptions::default().to_string();
        assert!(shown.starts_with("input=stdin input_format=auto output=stdout"));
        assert!(shown.contains("log_format=compact"));
    }
}
