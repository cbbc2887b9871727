use clap::{Parser, Subcommand};
use codebundle::config::{
    BundleConfig, ServerConfig, SessionConfig, SourceConfig, DEFAULT_PORT, DEFAULT_PROJECT_DIR,
};
use codebundle::copy_bundle;
use codebundle::history::DirectoryHistory;
use codebundle::logger::initialize_logger;
use codebundle::server::run_server;
use codebundle::shell::run_shell;
use codebundle::tokens::DEFAULT_MODEL;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    #[command(subcommand)]
    cmd: SubCommands,
}

#[derive(Subcommand, Debug, Clone)]
enum SubCommands {
    /// Serve directory trees and file contents over HTTP
    Serve(ServeArgs),
    /// Browse a project interactively and build bundles
    Shell(ShellArgs),
    /// Bundle a whole directory in one go
    Bundle(BundleArgs),
    /// List or clear previously loaded directories
    History(HistoryArgs),
}

#[derive(Parser, Debug, Clone)]
struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1", env = "CODEBUNDLE_HOST")]
    host: String,
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT, env = "CODEBUNDLE_PORT")]
    port: u16,
    #[arg(long, default_value = DEFAULT_PROJECT_DIR, env = "CODEBUNDLE_DEFAULT_DIR")]
    default_dir: String,
    #[arg(long = "ignore", help = "Extra glob patterns to leave out of listings (e.g. 'docs/**')")]
    ignore_patterns: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
struct SourceArgs {
    #[arg(short = 'd', long, default_value = DEFAULT_PROJECT_DIR, env = "CODEBUNDLE_DEFAULT_DIR")]
    dir: String,
    #[arg(long, help = "Base URL of a running `codebundle serve`; reads locally when absent")]
    server: Option<String>,
    #[arg(short = 'M', long, default_value = DEFAULT_MODEL)]
    model: String,
    #[arg(long = "ignore", help = "Extra glob patterns to leave out of listings (e.g. 'docs/**')")]
    ignore_patterns: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
struct ShellArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[arg(long, default_value_t = 500)]
    debounce_ms: u64,
    #[arg(long, env = "CODEBUNDLE_HISTORY_FILE")]
    history_file: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
struct BundleArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[arg(short = 'x', long, help = "Relative file paths to leave out of the bundle")]
    exclude: Vec<String>,
    #[arg(short = 't', long, default_value = "")]
    text: String,
    #[arg(long, default_value = "false")]
    no_copy: bool,
    #[arg(long, default_value = "false")]
    print: bool,
    #[arg(short = 's', long, default_value = "false")]
    no_stats: bool,
}

#[derive(Parser, Debug, Clone)]
struct HistoryArgs {
    #[arg(long)]
    clear: bool,
    #[arg(long, env = "CODEBUNDLE_HISTORY_FILE")]
    history_file: Option<PathBuf>,
}

fn session_config(args: SourceArgs, debounce: Duration, history_file: Option<PathBuf>) -> SessionConfig {
    let source = match args.server {
        Some(url) => SourceConfig::Remote { url },
        None => SourceConfig::Local {
            base: PathBuf::from("."),
        },
    };
    SessionConfig {
        source,
        initial_dir: args.dir,
        debounce,
        model: args.model,
        history_file,
        ignore_patterns: args.ignore_patterns,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli_args = CliArgs::parse();
    initialize_logger();

    let result = match cli_args.cmd {
        SubCommands::Serve(args) => {
            let config = ServerConfig {
                host: args.host,
                port: args.port,
                base: PathBuf::from("."),
                default_dir: args.default_dir,
                ignore_patterns: args.ignore_patterns,
            };
            run_server(config).await
        }
        SubCommands::Shell(args) => {
            let history_file = args
                .history_file
                .or_else(DirectoryHistory::default_store_path);
            let config = session_config(
                args.source,
                Duration::from_millis(args.debounce_ms),
                history_file,
            );
            run_shell(config).await
        }
        SubCommands::Bundle(args) => {
            let config = BundleConfig {
                session: session_config(args.source, Duration::ZERO, None),
                exclude: args.exclude,
                trailing_text: args.text,
                no_copy: args.no_copy,
                print: args.print,
                no_stats: args.no_stats,
            };
            copy_bundle(config).await.map(|result| {
                info!(
                    "Bundled {} files, {} tokens",
                    result.files.len(),
                    result.token_count
                );
            })
        }
        SubCommands::History(args) => {
            let Some(path) = args.history_file.or_else(DirectoryHistory::default_store_path)
            else {
                error!("No history location available on this platform");
                return ExitCode::FAILURE;
            };
            let mut history = DirectoryHistory::load(path);
            if args.clear {
                history.clear().map(|()| info!("History cleared"))
            } else {
                for dir in history.entries() {
                    println!("{}", dir);
                }
                Ok(())
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
