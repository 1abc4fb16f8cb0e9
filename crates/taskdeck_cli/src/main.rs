//! Command-line front end for taskdeck.
//!
//! # Responsibility
//! - Map subcommands onto `TaskService` calls; never touch the file directly.
//! - Print results as aligned text or JSON.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use taskdeck_core::{
    core_version, display_date, init_logging_with, LogConfig, Priority, StoreConfig, TaskDraft,
    TaskFilter, TaskRecord, TaskService, TaskStatus, DEFAULT_DATA_FILE,
};

#[derive(Parser)]
#[command(name = "taskdeck", version = core_version(), about = "Priority-ordered task list")]
struct Cli {
    /// Task file
    #[arg(long, env = "TASKDECK_FILE", default_value = DEFAULT_DATA_FILE)]
    file: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "TASKDECK_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a task
    Add(TaskFields),
    /// Replace every field of an existing task
    Update {
        id: u32,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Delete a task
    Delete { id: u32 },
    /// List tasks, most important first
    List {
        /// Show raw heap order instead of sorted order
        #[arg(long)]
        native: bool,
        /// Case-insensitive subject filter
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        hide_completed: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show counts of all, completed, and urgent tasks
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Show the most important task
    Top,
    /// Print the core library version
    Version,
}

#[derive(Args)]
struct TaskFields {
    subject: String,
    /// URGENT, HIGH, NORMAL or LOW
    #[arg(long, value_parser = parse_priority)]
    priority: Option<Priority>,
    /// NOT_STARTED, IN_PROGRESS or COMPLETED
    #[arg(long, value_parser = parse_status)]
    status: Option<TaskStatus>,
    /// YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    start: Option<NaiveDate>,
    /// YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    due: Option<NaiveDate>,
}

impl From<TaskFields> for TaskDraft {
    fn from(fields: TaskFields) -> Self {
        TaskDraft {
            subject: fields.subject,
            priority: fields.priority,
            status: fields.status,
            start_date: fields.start,
            due_date: fields.due,
        }
    }
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    Priority::from_name(&value.to_ascii_uppercase())
        .ok_or_else(|| format!("unknown priority `{value}`"))
}

fn parse_status(value: &str) -> Result<TaskStatus, String> {
    TaskStatus::from_name(&value.to_ascii_uppercase().replace([' ', '-'], "_"))
        .ok_or_else(|| format!("unknown status `{value}`"))
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("invalid date `{value}`: {err}"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let mut config = LogConfig::new(log_dir);
        if let Some(level) = &cli.log_level {
            config = config.with_level(level);
        }
        if let Err(err) = init_logging_with(&config) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn open_service(file: &Path) -> TaskService {
    let service = TaskService::open(StoreConfig::default().with_data_file(file));
    for rejected in service.rejected_lines() {
        eprintln!(
            "warning: skipped line {}: {}",
            rejected.line_number, rejected.reason
        );
    }
    if !service.is_writable() {
        eprintln!("warning: {} could not be read; changes are refused", file.display());
    }
    service
}

fn run(cli: Cli) -> Result<(), String> {
    let file = cli.file;
    let open = || open_service(&file);

    match cli.command {
        Command::Version => println!("taskdeck_core version={}", core_version()),
        Command::Add(fields) => {
            let id = open().create(fields.into()).map_err(|err| err.to_string())?;
            println!("created task #{id}");
        }
        Command::Update { id, fields } => {
            open()
                .update(id, fields.into())
                .map_err(|err| err.to_string())?;
            println!("updated task #{id}");
        }
        Command::Delete { id } => {
            let removed = open().delete(id).map_err(|err| err.to_string())?;
            println!("deleted {removed}");
        }
        Command::List {
            native,
            search,
            hide_completed,
            json,
        } => {
            let filter = TaskFilter {
                text: search.unwrap_or_default(),
                hide_completed,
            };
            let service = open();
            let records: Vec<TaskRecord> = if native {
                service
                    .list_native()
                    .into_iter()
                    .filter(|record| filter.matches(record))
                    .collect()
            } else {
                service.search(&filter)
            };
            if json {
                let out = serde_json::to_string_pretty(&records).map_err(|err| err.to_string())?;
                println!("{out}");
            } else {
                print_table(&records);
            }
        }
        Command::Stats { json } => {
            let stats = open().stats();
            if json {
                let out = serde_json::to_string(&stats).map_err(|err| err.to_string())?;
                println!("{out}");
            } else {
                println!(
                    "{}/{} done ({}%)  urgent: {}",
                    stats.completed,
                    stats.count,
                    stats.completion_percent(),
                    stats.urgent
                );
            }
        }
        Command::Top => {
            let service = open();
            match service.top() {
                Some(record) => print_table(std::slice::from_ref(record)),
                None => println!("no tasks"),
            }
        }
    }

    Ok(())
}

fn print_table(records: &[TaskRecord]) {
    println!(
        "{:>4}  {:<30}  {:<8}  {:<12}  {:<10}  {:<10}",
        "ID", "SUBJECT", "PRIORITY", "STATUS", "START", "DUE"
    );
    for record in records {
        println!(
            "{:>4}  {:<30}  {:<8}  {:<12}  {:<10}  {:<10}",
            record.id(),
            record.subject(),
            record.priority().as_str(),
            record.status().label(),
            display_date(record.start_date()),
            display_date(record.due_date()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_date, parse_priority, parse_status, Cli, Command};
    use clap::{CommandFactory, Parser};
    use taskdeck_core::{Priority, TaskStatus};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn enum_arguments_accept_any_case() {
        assert_eq!(parse_priority("urgent").unwrap(), Priority::Urgent);
        assert_eq!(parse_status("in-progress").unwrap(), TaskStatus::InProgress);
        assert!(parse_priority("soon").is_err());
        assert!(parse_date("2025-02-30").is_err());
    }

    #[test]
    fn version_subcommand_parses_without_other_arguments() {
        let cli = Cli::try_parse_from(["taskdeck", "version"]).unwrap();
        assert!(matches!(cli.command, Command::Version));
    }
}
