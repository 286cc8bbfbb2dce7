use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod error;
mod model;
mod program;
mod render;
mod schedule;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "ladder-interlock")]
#[command(about = "Alarm register and cause & effect matrix from PLC ladder rungs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the alarm summary and cause & effect workbooks.
    Report {
        #[arg(long)]
        program: PathBuf,

        #[arg(short = 'o', long, default_value = ".")]
        out_dir: PathBuf,

        /// Overrides plc_name from the program file.
        #[arg(long)]
        plc_name: Option<String>,

        #[arg(long, default_value = render::DEFAULT_ALARM_FILE)]
        alarm_file: String,

        #[arg(long, default_value = render::DEFAULT_MATRIX_FILE)]
        matrix_file: String,

        /// Also write a self-contained HTML report with this file name.
        #[arg(long)]
        html: Option<String>,

        /// Refuse to write anything when a rung fails to classify.
        #[arg(long)]
        strict: bool,
    },
    /// Classify every rung and report failures without writing anything.
    Check {
        #[arg(long)]
        program: PathBuf,
    },
    /// Write the documentation burndown tracking workbook.
    Burndown {
        #[arg(long)]
        plcs: PathBuf,

        /// First planned work day (YYYY-MM-DD).
        #[arg(long)]
        start: NaiveDate,

        #[arg(long, default_value_t = 2)]
        days_per_plc: u32,

        #[arg(short = 'o', long, default_value = render::burndown::DEFAULT_BURNDOWN_FILE)]
        out: PathBuf,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn warn_if_empty(loaded: &program::Program) {
    if loaded.catalog.is_empty() {
        warn!("program has no tag catalog; descriptions fall back to rung text");
    }
}

fn log_failures(failures: &error::InferenceFailures) {
    for failure in failures.iter() {
        tracing::error!(
            rung = %failure.rung,
            role = %failure.role,
            address = %failure.address,
            "{}",
            failure.source
        );
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Report {
            program,
            out_dir,
            plc_name,
            alarm_file,
            matrix_file,
            html,
            strict,
        } => {
            let loaded = program::load_program(&program)?;
            warn_if_empty(&loaded);
            let data = model::build_report_data(&loaded);
            if let Some(failures) = data.failures() {
                log_failures(&failures);
                if strict {
                    return Err(failures)
                        .with_context(|| format!("infer interlocks from {}", program.display()));
                }
            }
            if data.matrix.is_empty() {
                warn!("no rung qualified as an interlock; the matrix will be empty");
            }

            let config = render::RenderConfig {
                plc_name: plc_name
                    .or_else(|| loaded.plc_name.clone())
                    .unwrap_or_else(|| render::RenderConfig::default().plc_name),
                out_dir,
                alarm_file,
                matrix_file,
                html_file: html,
            };

            let alarm_path = render::write_alarm_summary(&data.alarms, &config)?;
            info!(alarms = data.totals.alarms, path = %alarm_path.display(), "wrote alarm summary");

            let matrix_path = render::write_cause_effect(&data.matrix, &config)?;
            info!(
                interlocks = data.totals.interlocks,
                effects = data.totals.effects,
                path = %matrix_path.display(),
                "wrote cause & effect matrix"
            );

            if let Some(path) = config.html_path() {
                let page = render::render_html_report(&data, &config)?;
                std::fs::create_dir_all(&config.out_dir)?;
                std::fs::write(&path, page)
                    .with_context(|| format!("write {}", path.display()))?;
                info!(path = %path.display(), "wrote html report");
            }
        }
        Commands::Check { program } => {
            let loaded = program::load_program(&program)?;
            info!(
                tags = loaded.catalog.len(),
                rungs = loaded.rungs.len(),
                alarm_candidates = loaded.alarm_candidates.len(),
                "loaded {}",
                program.display()
            );
            for (namespace, tags) in loaded.catalog.namespace_counts() {
                tracing::debug!(%namespace, tags, "catalogued tags");
            }
            warn_if_empty(&loaded);

            let data = model::build_report_data(&loaded);
            info!(
                alarms = data.totals.alarms,
                interlocks = data.totals.interlocks,
                effects = data.totals.effects,
                uncatalogued = data.totals.uncatalogued,
                "inference finished"
            );
            if let Some(failures) = data.failures() {
                log_failures(&failures);
                bail!("{} rung address(es) could not be classified", failures.len());
            }
        }
        Commands::Burndown {
            plcs,
            start,
            days_per_plc,
            out,
        } => {
            let config = schedule::BurndownConfig {
                start,
                days_per_plc,
                out,
            };
            let list = schedule::load_plc_list(&plcs)?;
            let plan = schedule::plan_burndown(&list, config.start, config.days_per_plc)?;
            let path = render::burndown::write_burndown(&plan, &config.out)?;
            info!(
                plcs = plan.total_plcs(),
                work_days = plan.total_work_days(),
                start = %plan.start,
                end = %plan.end,
                path = %path.display(),
                "wrote burndown workbook"
            );
        }
    }

    Ok(())
}
