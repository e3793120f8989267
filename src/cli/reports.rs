//! Reports command handler
//!
//! Admin operations on the configured store.

use crate::cli::{formatter, load_config};
use crate::error::Result;
use crate::report::{IssueType, ReportFilter, Severity, Status};
use crate::service::ReportService;
use clap::{Args, Subcommand};

/// Reports command arguments
#[derive(Args)]
pub struct ReportsArgs {
    #[command(subcommand)]
    pub command: ReportsCommand,

    /// Report store backend override
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Report store path override
    #[arg(long, global = true)]
    pub store_path: Option<String>,
}

#[derive(Subcommand)]
pub enum ReportsCommand {
    /// List reports, newest first
    List {
        #[arg(long, short = 's')]
        status: Option<Status>,

        #[arg(long, short = 't')]
        issue_type: Option<IssueType>,

        #[arg(long)]
        severity: Option<Severity>,

        /// Maximum number of reports
        #[arg(long, short = 'n', default_value = "50")]
        limit: usize,

        /// Output format (json, text, geojson)
        #[arg(long, short = 'f', default_value = "text")]
        format: String,
    },

    /// Show one report as JSON
    Show { id: String },

    /// Mark a report verified
    Verify { id: String },

    /// Mark a report resolved
    Resolve {
        id: String,

        /// Resolution notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a report
    Delete { id: String },
}

/// Run the reports command
pub fn run(args: ReportsArgs) -> Result<()> {
    let config = load_config(args.store, args.store_path)?;
    let service = ReportService::from_config(&config)?;

    match args.command {
        ReportsCommand::List {
            status,
            issue_type,
            severity,
            limit,
            format,
        } => {
            let formatter = formatter(&format)?;
            let filter = ReportFilter {
                status,
                issue_type,
                severity,
                limit: Some(limit),
            };
            let reports = service.list(&filter)?;
            print!("{}", formatter.format_reports(&reports, &config)?);
        }
        ReportsCommand::Show { id } => {
            let report = service.get(&id)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ReportsCommand::Verify { id } => {
            let report = service.verify(&id)?;
            println!("{} -> {}", report.id, report.status);
        }
        ReportsCommand::Resolve { id, notes } => {
            let report = service.resolve(&id, notes)?;
            println!("{} -> {}", report.id, report.status);
        }
        ReportsCommand::Delete { id } => {
            service.delete(&id)?;
            println!("Deleted {}", id);
        }
    }

    Ok(())
}
