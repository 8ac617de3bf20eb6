//! fieldroll - Coalesce equipment operating time and roll field tickets up by month

use clap::Parser;
use fieldroll::{
    cli::{Cli, Command},
    error::Result,
    filters::RollupFilter,
    output::{OutputFormatter, get_formatter},
    pipeline::{Pipeline, RunReport},
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Print the rollup summary and the optional revenue spot check
fn report_run(
    formatter: &dyn OutputFormatter,
    report: &RunReport,
    spot_check: Option<RollupFilter>,
) {
    println!("{}", formatter.format_run(report));

    if let Some(filter) = spot_check {
        let revenue = filter.revenue(&report.rollups);
        info!("Revenue for {}: {:.2}", filter.describe(), revenue);
        println!("{}", formatter.format_spot_check(&filter.describe(), revenue));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The --quiet flag overrides RUST_LOG
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fieldroll=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let show_progress = !cli.json && !cli.quiet && is_terminal::is_terminal(std::io::stdout());
    let pipeline = Pipeline::new(cli.config()).with_progress(show_progress);
    let formatter = get_formatter(cli.json);

    match cli.command.clone() {
        Some(Command::Journal) => {
            info!("Coalescing journal {}", pipeline.config().journal_input.display());
            let report = pipeline.run_journal()?;
            println!("{}", formatter.format_journal(&report));
        }
        Some(Command::Tickets(args)) => {
            let spot_check = args.filter()?;
            info!("Building rollup from {}", pipeline.config().journal_output.display());
            let report = pipeline.run_tickets()?;
            report_run(formatter.as_ref(), &report, spot_check);
        }
        Some(Command::Rpe(_)) => {
            info!("Filtering revenue extract {}", pipeline.config().rpe_input.display());
            let report = pipeline.run_rpe()?;
            println!("{}", formatter.format_rpe(&report));
        }
        Some(Command::Run(args)) => {
            let spot_check = args.filter()?;
            let report = pipeline.run()?;
            report_run(formatter.as_ref(), &report, spot_check);
        }
        None => {
            let report = pipeline.run()?;
            report_run(formatter.as_ref(), &report, None);
        }
    }

    Ok(())
}
