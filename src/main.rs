use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

use nps_tracker_insights::config::{self, DashboardConfig};
use nps_tracker_insights::dashboard::{self, View, ViewPayload};
use nps_tracker_insights::filter::{self, FilterSelection};
use nps_tracker_insights::models::TicketRecord;
use nps_tracker_insights::session::Session;
use nps_tracker_insights::{report, schema, sla, terms};

#[derive(Parser)]
#[command(name = "nps-insights")]
#[command(about = "Ticket insights for the NPS tracker export", long_about = None)]
struct Cli {
    /// Tracker CSV export to analyse
    #[arg(long, env = "NPS_TRACKER_CSV", default_value = schema::DEFAULT_SOURCE_FILE, global = true)]
    data: PathBuf,
    /// Keep only these issue types (repeatable, default: all)
    #[arg(long = "issue", global = true)]
    issues: Vec<String>,
    /// Keep only these programs (repeatable, default: all)
    #[arg(long = "program", global = true)]
    programs: Vec<String>,
    /// Resolution time in days above which a ticket breaches the SLA
    #[arg(
        long,
        env = "NPS_SLA_THRESHOLD_DAYS",
        default_value_t = sla::DEFAULT_SLA_THRESHOLD_DAYS,
        global = true
    )]
    sla_threshold_days: i64,
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown, global = true)]
    format: OutputFormat,
    #[arg(long, env = "NPS_LOG", default_value = "warn", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue prioritisation table
    Overview,
    /// Resolution time per team member
    Team,
    /// Most frequent words in ticket remarks
    RootCause {
        #[arg(long, default_value_t = terms::DEFAULT_MAX_WORDS)]
        max_words: usize,
    },
    /// Issue -> program -> agent -> status flow
    Sankey(SankeyArgs),
    /// SLA breaches per team member and week
    Sla,
    /// Data quality audit
    Quality,
    /// Browse the filtered records
    Records {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Keyword auto-tagging preview
    Tags {
        #[arg(long, default_value_t = config::DEFAULT_TAG_PREVIEW)]
        limit: usize,
    },
    /// List the values available for --issue and --program
    Options,
    /// Write every view into one markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
        #[command(flatten)]
        sankey: SankeyArgs,
    },
}

#[derive(Args)]
struct SankeyArgs {
    /// Keep equal values from different stages as separate nodes
    #[arg(long)]
    namespace_sankey_labels: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let mut config = DashboardConfig {
        source: cli.data.clone(),
        sla_threshold_days: cli.sla_threshold_days,
        ..DashboardConfig::default()
    };

    let mut session = Session::new(config.source.clone());
    log::info!("reading tickets from {}", session.source().display());
    let records = session.dataset().records.clone();
    let notice = session.notice().map(|err| err.to_string());

    let selection = FilterSelection::from_requested(&records, &cli.issues, &cli.programs);
    let filtered = filter::filter(&records, &selection);
    log::info!("{} of {} tickets match the filters", filtered.len(), records.len());

    let view = match cli.command {
        Commands::Overview => View::Overview,
        Commands::Team => View::TeamPerformance,
        Commands::RootCause { max_words } => {
            config.max_words = max_words;
            View::RootCauseAnalysis
        }
        Commands::Sankey(args) => {
            config.sankey.namespaced = args.namespace_sankey_labels;
            View::TicketFlowSankey
        }
        Commands::Sla => View::SlaBreachHeatmap,
        Commands::Quality => View::DataQualityChecks,
        Commands::Records { limit } => {
            config.record_limit = limit;
            View::AllRecords
        }
        Commands::Tags { limit } => {
            config.tag_preview = limit;
            View::AutomationSuggestions
        }
        Commands::Options => {
            print_options(&records, cli.format)?;
            return Ok(());
        }
        Commands::Report { out, sankey } => {
            config.sankey.namespaced = sankey.namespace_sankey_labels;
            let payloads: Vec<ViewPayload> = View::ALL
                .iter()
                .map(|view| dashboard::build_view(*view, &filtered, &config))
                .collect();
            match cli.format {
                OutputFormat::Markdown => {
                    let summary = filter_summary(&cli.issues, &cli.programs);
                    let report = report::build_report(notice.as_deref(), &summary, &payloads);
                    std::fs::write(&out, report)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                }
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&payloads)?;
                    std::fs::write(&out, json)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                }
            }
            println!("Report written to {}.", out.display());
            return Ok(());
        }
    };

    let payload = dashboard::build_view(view, &filtered, &config);
    match cli.format {
        OutputFormat::Markdown => {
            if let Some(message) = &notice {
                println!("> **Warning:** {message}");
                println!();
            }
            print!("{}", report::render_view(&payload));
        }
        OutputFormat::Json => {
            if let Some(message) = &notice {
                eprintln!("Warning: {message}");
            }
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }

    Ok(())
}

fn print_options(records: &[TicketRecord], format: OutputFormat) -> anyhow::Result<()> {
    let issues = filter::distinct_values(records, |r| r.issue_type.as_deref());
    let programs = filter::distinct_values(records, |r| r.program_name.as_deref());

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({ "issues": issues, "programs": programs });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Markdown => {
            for (title, values) in [("Issues", issues), ("Programs", programs)] {
                println!("## {title}");
                if values.is_empty() {
                    println!("No values found.");
                }
                for value in values {
                    println!("- {}", value.as_deref().unwrap_or("(blank)"));
                }
                println!();
            }
        }
    }
    Ok(())
}

fn filter_summary(issues: &[String], programs: &[String]) -> String {
    let describe = |values: &[String], all: &str| {
        if values.is_empty() {
            all.to_string()
        } else {
            values.join(", ")
        }
    };
    format!(
        "issues: {}; programs: {}",
        describe(issues, "all"),
        describe(programs, "all")
    )
}
