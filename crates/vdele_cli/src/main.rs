//! Command-line front end for the board core.
//!
//! # Responsibility
//! - Drive every core use-case locally: board rendering, task and list
//!   mutations, search, sync.
//! - Keep output plain and deterministic for quick local sanity checks.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use rusqlite::Connection;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;
use vdele_core::db::open_db;
use vdele_core::model::task::assignee_badges;
use vdele_core::sync::queue::last_sync_at_ms;
use vdele_core::{
    category_color, count_board, default_log_level, init_logging, load_board, project_board,
    search_tasks, AppConfig, BoardFilter, CardState, DateFilter, HttpBackend, ListRepository,
    ListService, OutboxQueue, SearchQuery, SqliteListRepository, SqliteOutbox,
    SqliteTaskRepository, StatusFilter, SyncEngine, Task, TaskList, TaskListQuery, TaskRepository,
    TaskService, TaskStatus,
};

const MONTHS_RU: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

#[derive(Parser)]
#[command(name = "vdele", about = "Offline-first to-do board", version)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = "vdele.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the filtered board with status counters.
    Board {
        #[arg(long, value_enum, default_value = "all")]
        date: DateArg,
        #[arg(long, value_enum, default_value = "all")]
        status: StatusArg,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Create a list at the front of the board.
    AddList { title: String },
    /// Add a task to a list, addressed by id prefix or exact title.
    Add { list: String, title: String },
    /// Toggle a task between open and closed.
    Done { task: String },
    /// Toggle the at-risk flag on a task.
    Risk { task: String },
    /// Delete a task.
    Rm { task: String },
    /// Full-text search across cached tasks.
    Search {
        query: String,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Replay queued mutations, then refresh the cache from remote.
    Sync,
    /// Show queue depth and last successful sync time.
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum DateArg {
    All,
    Today,
    Week,
}

impl From<DateArg> for DateFilter {
    fn from(value: DateArg) -> Self {
        match value {
            DateArg::All => Self::All,
            DateArg::Today => Self::Today,
            DateArg::Week => Self::Week,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    All,
    Open,
    Closed,
    Risk,
}

impl From<StatusArg> for StatusFilter {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::All => Self::All,
            StatusArg::Open => Self::Open,
            StatusArg::Closed => Self::Closed,
            StatusArg::Risk => Self::Risk,
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config)?;

    if let Some(dir) = &config.logging.dir {
        let level = config
            .logging
            .level
            .as_deref()
            .unwrap_or_else(|| default_log_level());
        init_logging(level, &dir.to_string_lossy()).map_err(|err| anyhow!(err))?;
    }

    let conn = open_db(&config.storage.db_path).with_context(|| {
        format!(
            "cannot open board cache `{}`",
            config.storage.db_path.display()
        )
    })?;
    let today = Local::now().date_naive();

    match cli.command {
        Command::Board {
            date,
            status,
            search,
        } => {
            let filter = BoardFilter {
                date: date.into(),
                status: status.into(),
                search,
            };
            render_board(&conn, &filter, today)?;
        }
        Command::AddList { title } => {
            let service = ListService::new(
                SqliteListRepository::try_new(&conn)?,
                SqliteOutbox::try_new(&conn)?,
            );
            let list = service.create_list(&title)?;
            println!("created list {} `{}`", short_id(list.uuid), list.title);
        }
        Command::Add { list, title } => {
            let target = resolve_list(&conn, &list)?;
            let service = TaskService::new(
                SqliteTaskRepository::try_new(&conn)?,
                SqliteOutbox::try_new(&conn)?,
            );
            let task = service.create_task(target.uuid, &title, today)?;
            println!(
                "created task {} `{}` in `{}`",
                short_id(task.uuid),
                task.title,
                target.title
            );
        }
        Command::Done { task } => {
            let target = resolve_task(&conn, &task)?;
            let service = TaskService::new(
                SqliteTaskRepository::try_new(&conn)?,
                SqliteOutbox::try_new(&conn)?,
            );
            let updated = service.toggle_closed(target.uuid)?;
            println!("{} `{}`", status_label(updated.status), updated.title);
        }
        Command::Risk { task } => {
            let target = resolve_task(&conn, &task)?;
            let service = TaskService::new(
                SqliteTaskRepository::try_new(&conn)?,
                SqliteOutbox::try_new(&conn)?,
            );
            let updated = service.toggle_risk(target.uuid)?;
            println!("{} `{}`", status_label(updated.status), updated.title);
        }
        Command::Rm { task } => {
            let target = resolve_task(&conn, &task)?;
            let service = TaskService::new(
                SqliteTaskRepository::try_new(&conn)?,
                SqliteOutbox::try_new(&conn)?,
            );
            service.delete_task(target.uuid)?;
            println!("deleted `{}`", target.title);
        }
        Command::Search { query, limit } => {
            let hits = search_tasks(
                &conn,
                &SearchQuery {
                    limit,
                    ..SearchQuery::new(query)
                },
            )?;
            if hits.is_empty() {
                println!("no matches");
            }
            for hit in hits {
                println!(
                    "{} {} {}",
                    short_id(hit.task_id),
                    status_label(hit.status),
                    hit.snippet
                );
            }
        }
        Command::Sync => {
            let remote = config.require_remote()?;
            let backend = HttpBackend::new(
                remote.endpoint.clone(),
                Duration::from_secs(remote.timeout_secs),
            )?;
            let report = SyncEngine::new(&conn, backend).sync()?;
            if report.offline {
                println!(
                    "offline: pushed {}, {} ops still queued",
                    report.pushed, report.pending
                );
            } else {
                println!(
                    "synced: pushed {}, dropped {}, pulled {} lists / {} tasks",
                    report.pushed, report.dropped, report.pulled_lists, report.pulled_tasks
                );
            }
        }
        Command::Status => {
            let outbox = SqliteOutbox::try_new(&conn)?;
            println!("queued ops: {}", outbox.pending_count()?);
            match last_sync_at_ms(&conn)? {
                Some(at) => println!("last sync: {at} (epoch ms)"),
                None => println!("last sync: never"),
            }
        }
    }

    Ok(())
}

fn render_board(conn: &Connection, filter: &BoardFilter, today: NaiveDate) -> Result<()> {
    let snapshot = load_board(conn)?;
    let counts = count_board(&snapshot, filter, today);
    println!(
        "все {} · открыто {} · закрыто {} · в риске {}",
        counts.all, counts.open, counts.closed, counts.risk
    );

    let view = project_board(&snapshot, filter, today, &HashSet::new());
    for card in &view.cards {
        let marker = match card.state {
            CardState::Expanded => "▾",
            CardState::Peeked => "▸",
            CardState::Collapsed => "·",
        };
        println!("{} {} ({})", marker, card.list.title, card.tasks.len());

        match card.state {
            CardState::Expanded => {
                for task in &card.tasks {
                    println!("    {}", task_line(task));
                }
            }
            CardState::Peeked => {
                if let Some((first, more)) = card.preview() {
                    println!("    {}", task_line(first));
                    if more > 0 {
                        println!("    + ещё {more}");
                    }
                }
            }
            CardState::Collapsed => {}
        }
    }

    Ok(())
}

fn task_line(task: &Task) -> String {
    let mut line = format!("{} {}", status_label(task.status), task.title);
    if let Some(category) = &task.category {
        line.push_str(&format!(" #{category}({})", category_color(category)));
    }
    if let Some(due) = task.due_date {
        line.push_str(&format!(" · {}", format_due(due)));
    }
    if let Some(assignee) = &task.assignee {
        if let Some(badges) = assignee_badges(assignee) {
            let initials: String = badges
                .visible
                .iter()
                .filter_map(|person| person.initial())
                .collect();
            line.push_str(&format!(" · {initials}"));
            if badges.overflow > 0 {
                line.push_str(&format!("+{}", badges.overflow));
            }
        }
    }
    if task.link.is_some() {
        line.push_str(" · ссылка");
    }
    line
}

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Open => "[ ]",
        TaskStatus::Closed => "[x]",
        TaskStatus::Risk => "[!]",
    }
}

/// Renders a due date the way the board header does: `7 августа`.
fn format_due(date: NaiveDate) -> String {
    let month = MONTHS_RU[date.month0() as usize];
    format!("{} {}", date.day(), month)
}

fn resolve_list(conn: &Connection, needle: &str) -> Result<TaskList> {
    let repo = SqliteListRepository::try_new(conn)?;
    let lists = repo.list_lists(false)?;
    let lowered = needle.to_lowercase();

    let mut matches: Vec<TaskList> = lists
        .into_iter()
        .filter(|list| {
            list.uuid.to_string().starts_with(needle) || list.title.to_lowercase() == lowered
        })
        .collect();

    match matches.len() {
        0 => bail!("no list matches `{needle}`"),
        1 => Ok(matches.remove(0)),
        n => bail!("`{needle}` is ambiguous: {n} lists match"),
    }
}

fn resolve_task(conn: &Connection, needle: &str) -> Result<Task> {
    let repo = SqliteTaskRepository::try_new(conn)?;
    let tasks = repo.list_tasks(&TaskListQuery::default())?;
    let lowered = needle.to_lowercase();

    let mut matches: Vec<Task> = tasks
        .into_iter()
        .filter(|task| {
            task.uuid.to_string().starts_with(needle) || task.title.to_lowercase() == lowered
        })
        .collect();

    match matches.len() {
        0 => bail!("no task matches `{needle}`"),
        1 => Ok(matches.remove(0)),
        n => bail!("`{needle}` is ambiguous: {n} tasks match"),
    }
}

fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::{format_due, status_label};
    use chrono::NaiveDate;
    use vdele_core::TaskStatus;

    #[test]
    fn due_dates_render_with_russian_month_names() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).expect("valid date");
        assert_eq!(format_due(date), "7 августа");
    }

    #[test]
    fn status_labels_are_stable() {
        assert_eq!(status_label(TaskStatus::Open), "[ ]");
        assert_eq!(status_label(TaskStatus::Closed), "[x]");
        assert_eq!(status_label(TaskStatus::Risk), "[!]");
    }
}
