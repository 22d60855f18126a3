#![cfg(feature = "cli")]

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{ArgAction, Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use whatwhen::Calendar;
use whatwhen_tools::config::{default_config_path, load_config, Config};
use whatwhen_tools::{
    count_report, parse_cmdline_date, report_lines, summary_line, tags_report, today_line, Span,
    Window,
};

fn main() -> Result<(), anyhow::Error> {
    // Parse the CLI options
    let opts = Options::parse();
    init_logging(opts.window.verbose);

    let config = match opts.config.clone().or_else(|| default_config_path().ok()) {
        Some(path) => load_config(&path)?,
        None => Config::default(),
    };
    let command = opts.command.unwrap_or(Command::Report {
        tags: opts.tags.clone(),
    });

    let real_today = Local::now().date_naive();
    let today = match &opts.window.for_date {
        Some(text) => parse_cmdline_date(text, real_today)
            .with_context(|| format!("invalid date after --for: {text:?}"))?,
        None => real_today,
    };
    if let Command::Today = command {
        println!("{}", today_line(today));
        return Ok(());
    }

    let mut start = opts
        .window
        .start
        .as_deref()
        .map(|text| {
            parse_cmdline_date(text, today)
                .with_context(|| format!("invalid date after --start: {text:?}"))
        })
        .transpose()?;
    let end = match &opts.window.end {
        Some(text) => Some(
            parse_cmdline_date(text, today)
                .with_context(|| format!("invalid date after --end: {text:?}"))?,
        ),
        None => opts.window.span().map(|span| span.end_from(today)),
    };
    // Resolving rules from a long way back keeps the rendered file in a sensible order
    if matches!(command, Command::Tidy | Command::Repr) && start.is_none() {
        start = NaiveDate::from_ymd_opt(1900, 1, 1);
    }
    let window = Window::determine(start, today, end, config.days_before(), config.days_after())?;

    let path = config.events_file(opts.file.as_deref());
    tracing::info!("reading events from {}", path.display());
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read events file {}", path.display()))?;
    let calendar = Calendar::from_str(&contents, window.start)
        .with_context(|| format!("failed to parse events file {}", path.display()))?;

    match command {
        Command::Report { tags } => {
            let tags = parse_tags(&tags)?.into_iter().collect::<BTreeSet<_>>();
            let occurrences = calendar.occurrences(window.start, window.end, Some(&tags));
            for line in report_lines(&occurrences, window.today) {
                println!("{line}");
            }
            println!("\n{}", summary_line(&window));
        }
        Command::Tidy => {
            for event in calendar.events() {
                println!("{event}");
            }
        }
        Command::Repr => {
            for event in calendar.events() {
                println!("{}", event.annotated());
            }
        }
        Command::Tags => {
            for line in tags_report(&calendar.tag_counts(), &path.display().to_string()) {
                println!("{line}");
            }
        }
        Command::Count { tags } => {
            let tags = parse_tags(&tags)?;
            if tags.is_empty() {
                bail!("count expects at least one @<word> to count days for");
            }
            let counts = calendar.tag_day_counts(&tags, window.start, window.end);
            for line in count_report(&counts, &window) {
                println!("{line}");
            }
            println!("\n{}", summary_line(&window));
        }
        Command::Today => {}
    }

    Ok(())
}

/// Installs a stderr logger filtered by `RUST_LOG`, with a default level raised by `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

/// Validates and lower-cases `@<word>` arguments, keeping them in order.
fn parse_tags(tags: &[String]) -> Result<Vec<String>, anyhow::Error> {
    tags.iter()
        .map(|tag| {
            if tag.len() > 1 && tag.starts_with('@') {
                Ok(tag.to_lowercase())
            } else {
                bail!("expected an @<word>, not {tag:?}")
            }
        })
        .collect()
}

/// Reports on the events in a plain-text file of (possibly recurring) dates
#[derive(Parser, Debug)]
#[command(name = "what")]
struct Options {
    #[command(subcommand)]
    command: Option<Command>,
    /// Only report events whose text includes one of these @<words>
    tags: Vec<String>,
    /// The events file to read (defaults to the configured one, then `what.txt`)
    #[arg(short, long, env = "WHATWHEN_FILE", global = true)]
    file: Option<PathBuf>,
    /// An alternative configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(flatten)]
    window: WindowArgs,
}
#[derive(clap::Args, Debug)]
struct WindowArgs {
    /// The date to use as "today" (`<day>[-<month>[-<year>]]`)
    #[arg(long = "for", global = true)]
    for_date: Option<String>,
    /// The first date to report on (defaults to yesterday)
    #[arg(long, visible_alias = "from", global = true)]
    start: Option<String>,
    /// The last date to report on (defaults to four weeks after today)
    #[arg(long, visible_alias = "to", global = true)]
    end: Option<String>,
    /// Report until a week after today
    #[arg(long, global = true)]
    week: bool,
    /// Report until a month after today
    #[arg(long, global = true)]
    month: bool,
    /// Report until a year after today
    #[arg(long, global = true)]
    year: bool,
    /// Log more detail to stderr (repeat for even more)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}
impl WindowArgs {
    /// The shortest window end shorthand given, if any.
    fn span(&self) -> Option<Span> {
        if self.week {
            Some(Span::Week)
        } else if self.month {
            Some(Span::Month)
        } else if self.year {
            Some(Span::Year)
        } else {
            None
        }
    }
}
#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Lists every occurrence in the report window (the default)
    Report {
        /// Only report events whose text includes one of these @<words>
        tags: Vec<String>,
    },
    /// Prints every event in its canonical form, losing comments
    Tidy,
    /// Prints every event with its resolved date and everything found in its text
    Repr,
    /// Counts how many events use each @<word>
    Tags,
    /// Counts how many days in the report window have events with each of the given @<words>
    Count { tags: Vec<String> },
    /// Prints today's date
    Today,
}
