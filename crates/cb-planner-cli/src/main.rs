use std::io::{self, Write};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cb_planner_cli::commands::plan::{handle_plan_command, PlanArgs, PlanSummary};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Constraint-based coverage path planner",
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
struct Cli {
    /// Select the output format for CLI responses.
    #[arg(long, value_enum, default_value_t = OutputFormat::default())]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a coverage path over an area polygon.
    Plan(PlanArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    fn render_plan(self, summary: &PlanSummary) -> Result<()> {
        match self {
            OutputFormat::Text => {
                println!("mode:   {}", summary.mode);
                println!("points: {}", summary.point_count);
                println!("length: {:.3}", summary.length);
                if let Some(path) = &summary.saved_to {
                    println!("saved:  {path}");
                }
            }
            OutputFormat::Json => {
                let mut stdout = io::stdout();
                serde_json::to_writer_pretty(&mut stdout, summary)?;
                stdout.write_all(b"\n")?;
            }
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Command::Plan(args) => {
            let summary = handle_plan_command(args)?;
            cli.format.render_plan(&summary)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(env_filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
