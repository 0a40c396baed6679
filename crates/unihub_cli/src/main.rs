//! Command-line front end over `unihub_core`.
//!
//! # Responsibility
//! - Open the configured store once and drive the notification feed and the
//!   assistant from shell commands.
//! - Keep output plain text for scripting.

use chrono::Utc;
use clap::{Parser, Subcommand};
use log::warn;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use unihub_core::{
    init_from_config, CurrentUser, NotificationKind, Portal, PortalConfig, SubmitOutcome,
};

#[derive(Debug, Parser)]
#[command(name = "unihub", version, about = "UniHub notification feed and academic assistant")]
struct Cli {
    /// Configuration file (json/toml/yaml by extension).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// SQLite file; overrides `storage.db_path`.
    #[arg(long, global = true)]
    db: Option<String>,
    /// Name of the current user.
    #[arg(long, global = true, default_value = "Guest")]
    name: String,
    /// Role of the current user (admin|teacher|student).
    #[arg(long, global = true, default_value = "student")]
    role: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ask the assistant one question.
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// Publish a notification.
    Notify {
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: String,
        /// system|exam|event|notice
        #[arg(long, default_value = "system")]
        kind: String,
        #[arg(long)]
        action_url: Option<String>,
    },
    /// Inspect or update the notification feed (lists by default).
    Notifications {
        #[command(subcommand)]
        action: Option<NotificationsAction>,
    },
    /// Dashboard counts.
    Summary,
}

#[derive(Debug, Subcommand)]
enum NotificationsAction {
    List,
    Read { id: String },
    ReadAll,
    Remove { id: String },
    Clear,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = PortalConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.storage.db_path = db;
    }
    if let Err(err) = init_from_config(&config.logging) {
        eprintln!("warning: logging disabled: {err}");
    }

    let user = CurrentUser::new(cli.name, cli.role);
    let mut portal = Portal::open(&config, user)?;

    match cli.command {
        Command::Ask { question } => ask(&portal, &question.join(" ")),
        Command::Notify {
            title,
            message,
            kind,
            action_url,
        } => {
            let kind = NotificationKind::parse(&kind)
                .ok_or_else(|| format!("unknown notification kind `{kind}`"))?;
            let created = portal
                .notifications_mut()
                .add(&title, &message, kind, action_url)?;
            println!("{}", created.id);
            Ok(())
        }
        Command::Notifications { action } => {
            let bus = portal.notifications_mut();
            match action.unwrap_or(NotificationsAction::List) {
                NotificationsAction::List => {}
                NotificationsAction::Read { id } => bus.mark_as_read(&id)?,
                NotificationsAction::ReadAll => bus.mark_all_as_read()?,
                NotificationsAction::Remove { id } => bus.remove(&id)?,
                NotificationsAction::Clear => bus.clear_all()?,
            }
            print_notifications(&portal);
            Ok(())
        }
        Command::Summary => {
            let today = portal.context().current_date();
            let summary = portal.summary(today);
            println!("unread_notifications={}", summary.unread_notifications);
            println!("total_notices={}", summary.total_notices);
            println!("upcoming_events={}", summary.upcoming_events);
            println!("upcoming_exams={}", summary.upcoming_exams);
            Ok(())
        }
    }
}

fn ask(portal: &Portal, question: &str) -> Result<(), Box<dyn Error>> {
    let mut session = portal.start_assistant();
    let outcome = session.submit(question);
    if outcome == SubmitOutcome::Failed {
        warn!("event=cli_ask module=cli status=error");
    }
    match session.transcript().last() {
        Some(turn) if outcome != SubmitOutcome::Blank => {
            println!("{}", turn.text);
            Ok(())
        }
        _ => Err("question is empty".into()),
    }
}

fn print_notifications(portal: &Portal) {
    let bus = portal.notifications();
    let now = Utc::now();
    println!("unread={} total={}", bus.unread_count(), bus.len());
    for item in bus.notifications() {
        let marker = if item.read { ' ' } else { '*' };
        println!(
            "{marker} {} [{}] {} - {} ({})",
            item.id,
            item.kind.as_str(),
            item.title,
            item.message,
            item.age_label(now)
        );
        if let Some(url) = &item.action_url {
            println!("    -> {url}");
        }
    }
}
