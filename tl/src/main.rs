use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use tasklist::cli::{Cli, Command};
use tasklist::config::Config;
use tasklist::id::IdResolver;
use tasklist::project::sort_newest_first;
use tasklist::session::Session;
use tasklist::storage::{FileStore, StorageAdapter};
use tasklist::store::Action;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    info!("tl starting");

    let storage = StorageAdapter::new(Box::new(FileStore::new(&config.data_dir)));
    let mut session = Session::open(storage);

    match cli.command {
        Command::Add { text } => {
            let text = text.join(" ");
            let before = session.state().tasks.len();
            session.dispatch(Action::Add { text });

            if session.state().tasks.len() > before {
                if let Some(task) = session.state().tasks.last() {
                    println!("{} Added {}: {}", "✓".green(), task.id.cyan(), task.text);
                }
            } else {
                println!("Nothing to add (blank text)");
            }
        }

        Command::Toggle { id } => {
            if let Some(full) = resolve_reference(&session, &id) {
                session.dispatch(Action::Toggle { id: full.clone() });
                if let Some(task) = session.state().get(&full) {
                    let status = if task.completed { "done" } else { "active" };
                    println!("{} Marked {} {}", "✓".green(), task.id.cyan(), status);
                }
            }
        }

        Command::Rm { id } => {
            if let Some(full) = resolve_reference(&session, &id) {
                session.dispatch(Action::Delete { id: full.clone() });
                println!("{} Deleted {}", "✓".green(), full.cyan());
            }
        }

        Command::List { filter, newest_first } => {
            session.dispatch(Action::SetFilter(filter));
            let view = session.view();

            let mut tasks = view.visible_tasks;
            if newest_first {
                sort_newest_first(&mut tasks);
            }

            if tasks.is_empty() {
                println!("No tasks");
            } else {
                for task in &tasks {
                    let mark = if task.completed { "[x]".green() } else { "[ ]".normal() };
                    let text = if task.completed {
                        task.text.dimmed()
                    } else {
                        task.text.normal()
                    };
                    println!("{} {} {}", mark, task.id.cyan(), text);
                }
            }

            let counts = view.counts;
            println!(
                "{} completed / {} total ({} active)",
                counts.completed, counts.total, counts.active
            );
        }

        Command::Clear => {
            let completed: Vec<String> = session
                .state()
                .tasks
                .iter()
                .filter(|t| t.completed)
                .map(|t| t.id.clone())
                .collect();

            for id in &completed {
                session.dispatch(Action::Delete { id: id.clone() });
            }
            println!("{} Cleared {} completed task(s)", "✓".green(), completed.len());
        }
    }

    Ok(())
}

/// Resolve a user-supplied id reference, printing a diagnostic when it
/// matches nothing or more than one task
fn resolve_reference(session: &Session, reference: &str) -> Option<String> {
    let resolver = IdResolver::new(session.state().tasks.iter().map(|t| t.id.as_str()));
    match resolver.resolve(reference) {
        Ok(Some(full)) => Some(full.to_string()),
        Ok(None) => {
            println!("No task matches '{}'", reference);
            None
        }
        Err(candidates) => {
            println!("Ambiguous id '{}', candidates:", reference);
            for candidate in candidates {
                println!("  {}", candidate.cyan());
            }
            None
        }
    }
}
