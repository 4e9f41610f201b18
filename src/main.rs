// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point for the rubidium reference monitor
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use rubidium_monitor::alerts::Alert;
use rubidium_monitor::analysis::{analyze_logs, assess, report::format_report, LogAnalysis};
use rubidium_monitor::config::{self, Config};
use rubidium_monitor::device::{RubidiumDevice, SimulatedDevice};
use rubidium_monitor::holdover::{HoldoverPlan, HoldoverTest, Monitor};
use rubidium_monitor::measurement::{FrequencyUnit, Measurement};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::signal;

/// Rubidium frequency reference monitor and holdover analyzer
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Disable all logging output
    #[arg(short = 'q', long = "quiet", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze one or more holdover log files
    Analyze {
        /// Log files to analyze
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write the text report to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the analysis as JSON instead of a text report
        #[arg(long)]
        json: bool,

        /// Allan deviation intervals in seconds, e.g. 1,10,100
        #[arg(long, value_delimiter = ',')]
        taus: Option<Vec<u32>>,

        /// Unit of the frequency error column (fractional or phase_ns)
        #[arg(long)]
        frequency_unit: Option<FrequencyUnit>,

        /// List every line that could not be parsed
        #[arg(long)]
        show_unparsed: bool,
    },

    /// Run a holdover test on the simulated reference module
    Holdover {
        /// Test duration in seconds
        #[arg(long)]
        duration: Option<u64>,

        /// Sampling interval in seconds
        #[arg(long)]
        interval: Option<u64>,

        /// JSON result file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Seed of the simulated module noise
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Poll the reference module and report alerts
    Monitor {
        /// Polling interval in seconds
        #[arg(long)]
        interval: Option<u64>,

        /// Stop after this many samples
        #[arg(long)]
        count: Option<usize>,
    },

    /// Print the current parameters of the reference module
    Status,

    /// Validate a configuration file and exit
    ValidateConfig { path: PathBuf },

    /// Output the configuration schema as JSON and exit
    ShowConfigSchema,

    /// Read or change configuration entries by dotted path
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the value at a dotted path, e.g. analysis.tau_values
    Get { path: String },
    /// Set the value at a dotted path; VALUE is parsed as JSON when possible
    Set { path: String, value: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.quiet {
        log::LevelFilter::Off
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("config.yaml"));

    match args.command {
        Command::ShowConfigSchema => config::output_config_schema(),
        Command::ValidateConfig { path } => {
            if !path.exists() {
                bail!("Configuration file does not exist: {}", path.display());
            }
            Config::from_file(&path)
                .map_err(|err| anyhow::anyhow!("Configuration validation failed: {}", err))?;
            println!("Configuration file is valid: {}", path.display());
            Ok(())
        }
        Command::Config { action } => {
            let mut config = Config::from_file(&config_path)?;
            run_config(&mut config, action, &config_path)
        }
        Command::Analyze {
            files,
            output,
            json,
            taus,
            frequency_unit,
            show_unparsed,
        } => {
            let mut config = Config::from_file(&config_path)?;
            config.apply_args(taus, frequency_unit, None);
            config::validate_specific_rules(&config)?;
            run_analyze(&config, &files, output, json, show_unparsed)
        }
        Command::Holdover {
            duration,
            interval,
            output,
            seed,
        } => {
            let mut config = Config::from_file(&config_path)?;
            config.apply_args(None, None, seed);
            run_holdover(&config, duration, interval, output).await
        }
        Command::Monitor { interval, count } => {
            let config = Config::from_file(&config_path)?;
            run_monitor(&config, interval, count).await
        }
        Command::Status => {
            let config = Config::from_file(&config_path)?;
            run_status(&config).await
        }
    }
}

fn run_config(config: &mut Config, action: ConfigAction, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { path } => {
            let value = config
                .get_path(&path)
                .with_context(|| format!("Unknown configuration key: {}", path))?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        ConfigAction::Set { path, value } => {
            let value = serde_json::from_str(&value).unwrap_or(serde_json::Value::String(value));
            config.set_path(&path, value)?;
            config.save_to_file(config_path)?;
            info!("Configuration saved to {}", config_path.display());
        }
    }
    Ok(())
}

fn run_analyze(
    config: &Config,
    files: &[PathBuf],
    output: Option<PathBuf>,
    json: bool,
    show_unparsed: bool,
) -> Result<()> {
    let outcomes = analyze_logs(files, &config.analysis);
    let mut analyses: Vec<LogAnalysis> = Vec::new();
    let mut failures = 0;

    for (path, outcome) in outcomes {
        match outcome {
            Ok(analysis) => {
                if !analysis.unparsed.is_empty() {
                    eprintln!(
                        "{}: {} of {} lines could not be parsed",
                        path.display(),
                        analysis.unparsed.len(),
                        analysis.total_lines
                    );
                    if show_unparsed {
                        for line in &analysis.unparsed {
                            eprintln!("  line {}: {}", line.line_number, line.text);
                        }
                    }
                }
                analyses.push(analysis);
            }
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    let rendered = if json {
        serde_json::to_string_pretty(&analyses)?
    } else {
        analyses
            .iter()
            .map(|analysis| {
                let assessment = assess(&analysis.result, &config.analysis);
                format!(
                    "Source: {}\n{}\nFrequency stable: {}\nTemperature stable: {}\n",
                    analysis.source.display(),
                    format_report(&analysis.result),
                    assessment.frequency_stable,
                    assessment.temperature_stable
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &rendered)
                .with_context(|| format!("Failed to write report to {:?}", path))?;
            println!("Report saved to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    if failures > 0 {
        bail!("{} of {} logs could not be analyzed", failures, files.len());
    }
    Ok(())
}

async fn run_holdover(
    config: &Config,
    duration: Option<u64>,
    interval: Option<u64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let output = match output {
        Some(path) => path,
        None => config.output.result_path(chrono::Local::now())?,
    };
    let plan = HoldoverPlan {
        duration: Duration::from_secs(duration.unwrap_or(config.holdover.default_duration_s)),
        interval: Duration::from_secs(interval.unwrap_or(config.holdover.default_interval_s)),
        output,
    };
    plan.validate(&config.holdover)?;

    info!("Using simulated rubidium module");
    let mut test = HoldoverTest::new(SimulatedDevice::new(config.simulation.clone()), config);

    let outcome = tokio::select! {
        outcome = test.run(&plan) => Some(outcome),
        _ = signal::ctrl_c() => None,
    };

    match outcome {
        Some(outcome) => {
            let outcome = outcome?;
            println!("{}", format_report(&outcome.result));
            println!(
                "Frequency stable: {}, temperature stable: {}",
                outcome.assessment.frequency_stable, outcome.assessment.temperature_stable
            );
            if outcome.alerted_samples > 0 {
                println!("{} samples raised alerts", outcome.alerted_samples);
            }
            println!("Results saved to {}", outcome.json_path.display());
            Ok(())
        }
        None => {
            warn!("Holdover test interrupted");
            test.into_device()
                .stop_holdover()
                .await
                .context("Failed to stop holdover mode")?;
            bail!("Holdover test interrupted by user");
        }
    }
}

async fn run_monitor(config: &Config, interval: Option<u64>, count: Option<usize>) -> Result<()> {
    let limits = &config.monitoring;
    let interval_s = interval.unwrap_or(limits.default_interval_s);
    if interval_s < limits.min_interval_s || interval_s > limits.max_interval_s {
        bail!(
            "Monitoring interval must be between {} and {} seconds",
            limits.min_interval_s,
            limits.max_interval_s
        );
    }

    let mut monitor = Monitor::new(
        SimulatedDevice::new(config.simulation.clone()),
        config.alerts.clone(),
        Duration::from_secs(interval_s),
    );

    let on_sample = |m: &Measurement, alerts: &[Alert]| {
        println!(
            "[{:>8.1}s] freq={:+.3e} temp={:.2}°C volt={:.2}V curr={:.3}A status={}",
            m.timestamp, m.frequency_error, m.temperature, m.voltage, m.current, m.status
        );
        for alert in alerts {
            println!("  ALERT: {}", alert);
        }
    };

    tokio::select! {
        taken = monitor.run(count, on_sample) => {
            taken?;
        }
        _ = signal::ctrl_c() => {
            info!("Monitoring interrupted");
        }
    }
    Ok(())
}

async fn run_status(config: &Config) -> Result<()> {
    let mut device = SimulatedDevice::new(config.simulation.clone());
    let status = device.status().await?;
    let m = device.read_measurement(0.0).await?;
    println!("Status:          {}", status);
    println!("Frequency error: {:+.3e}", m.frequency_error);
    println!("Temperature:     {:.2}°C", m.temperature);
    println!("Voltage:         {:.3}V", m.voltage);
    println!("Current:         {:.3}A", m.current);
    Ok(())
}
