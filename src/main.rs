//! The `m` pager binary.
//!
//! Ingests a file (or stdin) into a memory-bounded line store, applies the
//! requested navigation and search, and writes the resulting viewport to
//! stdout.

use clap::Parser;
use mpager::config::{DEFAULT_CONFIG, format_size};
use mpager::ingest::Progress;
use mpager::text::{compose_file_name, program_name};
use mpager::{
    Action, Config, Controller, Ingestor, LineStore, PagerError, PlainDisplay, Status, logging,
    signal,
};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "m")]
#[command(about = "View and browse flat text files of any size")]
struct Args {
    /// File to view; several words are joined with spaces. Reads stdin when absent.
    file: Vec<String>,

    /// Title to show instead of the file name
    #[arg(short, long)]
    title: Option<String>,

    /// Remove backspace overstrikes
    #[arg(short = 'b', long)]
    remove_backspaces: bool,

    /// Single data block size limit (MB); non-positive uses the config value
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    block: i64,

    /// Total data size limit (MB); non-positive uses the config value
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    total: i64,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print default configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Show line numbers
    #[arg(short = 'n', long)]
    numbers: bool,

    /// Line to go to (1-based)
    #[arg(long)]
    top: Option<usize>,

    /// Viewport height in lines
    #[arg(long, default_value_t = 24)]
    height: usize,

    /// Viewport width in columns
    #[arg(long, default_value_t = 80)]
    width: usize,

    /// First visible column
    #[arg(long, default_value_t = 0)]
    left: usize,

    /// Text to search for
    #[arg(long)]
    find: Option<String>,

    /// Treat the search text as a regular expression
    #[arg(long)]
    regex: bool,

    /// Case-insensitive search
    #[arg(long)]
    ignore_case: bool,

    /// Search backward from the end
    #[arg(long)]
    backward: bool,

    /// Print every line instead of one viewport
    #[arg(long)]
    all: bool,
}

fn main() {
    let args = Args::parse();

    if args.print_config {
        print!("{}", DEFAULT_CONFIG);
        return;
    }

    let prog = std::env::args()
        .next()
        .map(|argv0| program_name(&argv0))
        .unwrap_or_else(|| "m".to_string());

    let config = match Config::locate(&prog, args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: failed to load config: {}", prog, e);
            std::process::exit(1);
        }
    };

    // Initialize logging first
    logging::init(&config.logging);

    // Install signal handler so the swap file is always removed
    let shutdown = signal::install_signal_handler();

    if let Err(e) = run(args, config, shutdown) {
        match e.downcast_ref::<PagerError>() {
            Some(err) if !err.is_fatal() => tracing::warn!(error = %err, "pager error"),
            _ => tracing::error!(error = %e, "fatal pager error"),
        }
        eprintln!("{}: {}", prog, e);
        std::process::exit(1);
    }
}

fn run(args: Args, config: Config, shutdown: Arc<AtomicBool>) -> Result<(), Box<dyn std::error::Error>> {
    let file_name = match compose_file_name(&args.file) {
        Some(name) => {
            let path = std::path::absolute(&name)?;
            if !path.is_file() {
                return Err(PagerError::NoSuchFile(path).into());
            }
            Some(path)
        }
        None => None,
    };

    let (source, status): (Box<dyn Read + Send>, Status) = match &file_name {
        Some(path) => (Box::new(File::open(path)?), Status::Reading),
        None => (Box::new(io::stdin()), Status::Receiving),
    };

    let store_config = config.store_config(args.block, args.total);
    tracing::debug!(
        block = %format_size(store_config.block_size_limit),
        total = %format_size(store_config.max_total_size as usize),
        resident_frames = store_config.resident_frames(),
        "line store limits"
    );
    let store = Arc::new(LineStore::new(store_config));

    let result = view(&args, &config, &store, source, status, shutdown, file_name);

    tracing::debug!(stats = %store.stats(), "closing line store");
    let closed = store.shutdown();
    result?;
    closed?;
    Ok(())
}

fn view(
    args: &Args,
    config: &Config,
    store: &Arc<LineStore>,
    source: Box<dyn Read + Send>,
    status: Status,
    shutdown: Arc<AtomicBool>,
    file_name: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = Ingestor::new(store.clone())
        .spaces_per_tab(config.view.spaces_per_tab)
        .remove_backspaces(args.remove_backspaces)
        .refresh_interval(Duration::from_secs(config.view.refresh_secs))
        .eager_refresh_lines(args.height)
        .shutdown_flag(shutdown)
        .spawn(source, status, report_progress)?;

    let summary = handle.wait()?;
    if summary.interrupted {
        tracing::warn!(lines = summary.lines, "ingestion interrupted");
    }

    let mut controller = Controller::new(store.clone(), args.width, args.height)
        .with_title(args.title.clone())
        .with_file_name(file_name)
        .spaces_per_tab(config.view.spaces_per_tab);
    controller.set_max_width(summary.max_width);
    controller.display_at(args.left as isize, 0);

    let stdout = io::stdout().lock();
    let mut display = PlainDisplay::new(stdout, store.len());
    tracing::info!(title = %controller.title(), lines = summary.lines, "viewing");

    if args.numbers {
        controller.do_action(Action::FlipNumbers, &mut display)?;
    }

    if let Some(line) = args.top {
        controller.set_pointed_line(line);
        controller.do_action(Action::GotoLine, &mut display)?;
    }

    if let Some(text) = &args.find {
        controller.set_search(
            text,
            args.regex || config.search.regex,
            args.ignore_case || config.search.ignore_case,
        )?;
        let action = if args.backward {
            Action::FindPrevious
        } else {
            Action::FindNext
        };
        controller.do_action(action, &mut display)?;
    }

    if args.all {
        controller.render_all(&mut display)?;
    } else {
        controller.render(&mut display)?;
    }

    for message in display.messages() {
        eprintln!("{}", message);
    }
    Ok(())
}

fn report_progress(progress: &Progress) {
    tracing::debug!(
        status = %progress.status(),
        lines = progress.lines(),
        max_width = progress.max_width(),
        "ingest progress"
    );
}
