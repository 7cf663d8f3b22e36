//! circdep CLI - Command line interface
//!
//! Loads each entry file under a fresh detection session and prints the
//! circular dependencies found while it loaded.

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

mod config;
mod logging;
mod platform;

use crate::config::{load_detector_config, ConfigError, LogConfig};
use crate::logging::LogFormat;
use circdep_api::{check_entry, Component, DetectorConfig, Filter, LogLevel, NativeFs, RunConfig, SourceFs};
use tracing::{debug, error};

const TARGET: &str = "circdep::cli";

#[derive(Parser, Debug)]
#[command(
    name = "circdep",
    about = "Detect circular dependencies by watching modules while they load",
    version
)]
struct Cli {
    /// Entry files, processed in order
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Report all circular dependencies
    #[arg(short = 'c', long)]
    circular: bool,

    /// Report circular dependencies that cause problems (default)
    #[arg(short = 'p', long)]
    problems: bool,

    /// Report cycles whose exports are never the final exports (causes problems)
    #[arg(short = 'e', long)]
    always_empty_exports: bool,

    /// Report cycles whose exports are incomplete when accessed synchronously (may cause problems in future)
    #[arg(short = 's', long)]
    empty_sync_access: bool,

    /// Report properties read during a cycle that did not match the final exports (causes problems)
    #[arg(short = 'm', long)]
    missing_properties: bool,

    /// Print one JSON document per entry
    #[arg(long)]
    json: bool,

    /// Detector configuration file (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Project root (default: current directory)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Raise the global log level (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value = "compact")]
    log_format: LogFormat,

    #[arg(long, value_name = "LEVEL", value_parser = parse_level)]
    log_interceptor: Option<LogLevel>,

    #[arg(long, value_name = "LEVEL", value_parser = parse_level)]
    log_ledger: Option<LogLevel>,

    #[arg(long, value_name = "LEVEL", value_parser = parse_level)]
    log_validator: Option<LogLevel>,

    #[arg(long, value_name = "LEVEL", value_parser = parse_level)]
    log_reporter: Option<LogLevel>,

    #[arg(long, value_name = "LEVEL", value_parser = parse_level)]
    log_host: Option<LogLevel>,
}

fn parse_level(s: &str) -> Result<LogLevel, String> {
    LogLevel::parse(s).ok_or_else(|| format!("unknown log level '{s}' (expected silent, error, warn, info, debug or trace)"))
}

impl Cli {
    /// 模式选择：按 -c, -p, -e, -s, -m 的顺序第一个生效
    fn filter(&self) -> Option<Filter> {
        if self.circular {
            None
        } else if self.problems {
            Some(Filter::Problems)
        } else if self.always_empty_exports {
            Some(Filter::AlwaysEmpty)
        } else if self.empty_sync_access {
            Some(Filter::SyncEmpty)
        } else if self.missing_properties {
            Some(Filter::MissingProperties)
        } else {
            Some(Filter::Problems)
        }
    }

    /// 配置文件 + 命令行覆盖
    fn detector_config(&self) -> Result<DetectorConfig, ConfigError> {
        let mut detector = match &self.config {
            Some(path) => load_detector_config(path)?,
            None => DetectorConfig::default(),
        };
        if let Some(root) = &self.root {
            detector.root = Some(absolute(root));
        }

        let logging = &mut detector.logging;
        for _ in 0..self.verbose {
            logging.global = logging.global.raised();
        }
        let overrides = [
            (Component::Interceptor, self.log_interceptor),
            (Component::Ledger, self.log_ledger),
            (Component::Validator, self.log_validator),
            (Component::Reporter, self.log_reporter),
            (Component::Host, self.log_host),
        ];
        for (component, level) in overrides {
            if let Some(level) = level {
                logging.set_level(component, level);
            }
        }
        Ok(detector)
    }
}

/// 相对路径按工作目录补全
fn absolute(path: &std::path::Path) -> PathBuf {
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn main() {
    let cli = Cli::parse();

    let detector = match cli.detector_config() {
        Ok(detector) => detector,
        Err(e) => {
            eprintln!("⚠️  {e}");
            process::exit(1);
        }
    };
    logging::init(&LogConfig::from_logging(&detector.logging), cli.log_format);
    debug!(target: TARGET, ?detector, "configuration loaded");

    let run_config = RunConfig::new(detector).with_filter(cli.filter());
    let fs: Rc<dyn SourceFs> = Rc::new(NativeFs::new());
    let mut failed = false;

    for file in &cli.files {
        if !cli.json {
            platform::print_start(file);
        }
        match check_entry(Rc::clone(&fs), &absolute(file), &run_config) {
            Ok(report) if cli.json => platform::print_json(&report),
            Ok(report) => println!("{}", platform::format_report(&report)),
            Err(e) => {
                failed = true;
                error!(target: TARGET, entry = %file.display(), error = %e, "entry failed");
                if cli.json {
                    platform::print_json_error(file, &e);
                } else {
                    println!("{}", platform::format_error(&e));
                }
            }
        }
    }

    process::exit(if failed { 1 } else { 0 });
}
