//! CLI entry point for `pff2eml`.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use pff2eml::config::Config;
use pff2eml::export::{Converter, Summary};

/// Convert a pffexport output tree into .eml files.
///
/// SOURCE is usually the `<name>.export` directory written by pffexport; a
/// folder of the same name is created inside DESTINATION. Re-running skips
/// messages that were already converted.
#[derive(Parser)]
#[command(name = "pff2eml", version, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Export directory, folder or single message folder to convert
    #[arg(value_name = "SOURCE", requires = "destination")]
    source: Option<PathBuf>,

    /// Directory the converted tree is written into
    #[arg(value_name = "DESTINATION")]
    destination: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = pff2eml::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Some(Commands::Completions { shell }) => cmd_completions(shell),
        Some(Commands::Manpage) => cmd_manpage(),
        None => match (cli.source, cli.destination) {
            (Some(source), Some(destination)) => {
                cmd_convert(&config, &source, &destination, cli.json)
            }
            _ => {
                Cli::command().print_help()?;
                anyhow::bail!("SOURCE and DESTINATION are required");
            }
        },
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = pff2eml::config::log_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "pff2eml.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "pff2eml", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

/// Convert `source` into `destination` and print a summary.
fn cmd_convert(config: &Config, source: &Path, destination: &Path, json: bool) -> anyhow::Result<()> {
    if !source.exists() {
        anyhow::bail!("Source not found: {}", source.display());
    }
    // `.` and `..` have no file name to mirror.
    let source = source.canonicalize()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} Converting {pos} {wide_msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    let start = Instant::now();
    let progress = |message: &Path| {
        pb.inc(1);
        pb.set_message(message.display().to_string());
    };
    let result = Converter::new(config)
        .with_progress(&progress)
        .convert(&source, destination);
    pb.finish_and_clear();
    let summary = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, destination, start.elapsed());
    }

    Ok(())
}

fn print_summary(summary: &Summary, destination: &Path, elapsed: Duration) {
    use humansize::{format_size, BINARY};

    println!();
    println!("  Conversion complete:");
    println!("  {:<25} {}", "Messages converted", summary.converted);
    println!(
        "  {:<25} {}",
        "Bytes written",
        format_size(summary.bytes_written, BINARY)
    );
    println!("  {:<25} {}", "Already converted", summary.already_converted);
    println!("  {:<25} {}", "Missing headers", summary.missing_headers);
    println!("  {:<25} {}", "Meetings skipped", summary.meetings);
    println!("  {:<25} {:.2}s", "Elapsed", elapsed.as_secs_f64());
    println!("  {:<25} {}", "Output directory", destination.display());
    println!();
}
