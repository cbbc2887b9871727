use crate::config::SessionConfig;
use crate::controller::LoadOutcome;
use crate::errors::BundleError;
use crate::export::SystemClipboard;
use crate::model::{EntryKind, ToggleOutcome, TreeModel};
use crate::reporting::render_stats;
use crate::session::Session;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

const HELP: &str = "\
Commands:
  cd <dir>          change the project directory (loads after a short pause)
  load              reload the current directory now
  ls                show the tree with selection marks
  toggle <path>     select or deselect one file
  all | none        select every file / no file
  filter [ext...]   show only these extensions (no args clears)
  text <text>       set the text appended after the files
  build             build the bundle and count its tokens
  show              print the last bundle
  copy              copy the last bundle to the clipboard
  status            show load state
  history [clear]   list or clear previously loaded directories
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Cd(String),
    Load,
    Ls,
    Toggle(String),
    SelectAll(bool),
    Filter(Vec<String>),
    Text(String),
    Build,
    Show,
    Copy,
    Status,
    History,
    ClearHistory,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parses one input line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<ShellCommand>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "cd" if rest.is_empty() => return Err("cd needs a directory".to_owned()),
            "cd" => ShellCommand::Cd(rest.to_owned()),
            "load" => ShellCommand::Load,
            "ls" => ShellCommand::Ls,
            "toggle" if rest.is_empty() => return Err("toggle needs a path".to_owned()),
            "toggle" => ShellCommand::Toggle(rest.to_owned()),
            "all" => ShellCommand::SelectAll(true),
            "none" => ShellCommand::SelectAll(false),
            "filter" => ShellCommand::Filter(rest.split_whitespace().map(str::to_owned).collect()),
            "text" => ShellCommand::Text(rest.to_owned()),
            "build" => ShellCommand::Build,
            "show" => ShellCommand::Show,
            "copy" => ShellCommand::Copy,
            "status" => ShellCommand::Status,
            "history" if rest == "clear" => ShellCommand::ClearHistory,
            "history" => ShellCommand::History,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => return Err(format!("unknown command '{}', try 'help'", other)),
        };
        Ok(Some(command))
    }
}

/// The tree as shown by `ls`: indented names, `[x]`/`[ ]` on files,
/// honouring the extension filter.
pub fn render_tree_view(model: &TreeModel) -> Vec<String> {
    model
        .visible_entries()
        .into_iter()
        .map(|(path, depth, kind)| {
            let name = path.rsplit('/').next().unwrap_or(&path);
            let indent = "  ".repeat(depth);
            match kind {
                EntryKind::Directory => format!("{}    {}/", indent, name),
                EntryKind::File if model.is_selected(&path) => format!("{}[x] {}", indent, name),
                EntryKind::File => format!("{}[ ] {}", indent, name),
            }
        })
        .collect()
}

/// Reads commands from stdin until `quit` or end of input, interleaving
/// them with the session's load events on one task.
pub async fn run_shell(config: SessionConfig) -> Result<(), BundleError> {
    let mut session = Session::from_config(&config)?;
    session.reload();

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match ShellCommand::parse(&line) {
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(command)) => execute(&mut session, command).await,
                    Ok(None) => {}
                    Err(message) => println!("{}", message),
                }
            }
            event = session.next_event() => {
                match session.handle_event(event) {
                    Some(LoadOutcome::Loaded { path, .. }) => println!(
                        "Loaded '{}': {} files, all selected",
                        path,
                        session.model().file_count()
                    ),
                    Some(LoadOutcome::Failed { path, error }) => {
                        println!("Could not load '{}': {}", path, error)
                    }
                    None => {}
                }
            }
        }
    }
    Ok(())
}

async fn execute(session: &mut Session, command: ShellCommand) {
    match command {
        ShellCommand::Cd(dir) => session.edit_path(dir),
        ShellCommand::Load => session.reload(),
        ShellCommand::Ls => {
            if session.model().is_empty() {
                println!("(empty tree)");
            }
            for line in render_tree_view(session.model()) {
                println!("{}", line);
            }
            let all = if session.model().is_all_selected() { "yes" } else { "no" };
            println!(
                "{} of {} files selected (all: {})",
                session.model().selection_len(),
                session.model().file_count(),
                all
            );
        }
        ShellCommand::Toggle(path) => match session.toggle(&path) {
            ToggleOutcome::Selected => println!("+ {}", path),
            ToggleOutcome::Deselected => println!("- {}", path),
            ToggleOutcome::NotAFile => println!("'{}' is a directory; toggle its files", path),
            ToggleOutcome::Unknown => println!("'{}' is not in the tree", path),
        },
        ShellCommand::SelectAll(selected) => session.select_all(selected),
        ShellCommand::Filter(extensions) => session.set_extension_filter(extensions),
        ShellCommand::Text(text) => session.set_trailing_text(text),
        ShellCommand::Build => {
            let result = session.build().await;
            for line in render_stats(result) {
                println!("{}", line);
            }
            println!("Token Count: {}", result.token_count);
        }
        ShellCommand::Show => match session.last_result() {
            Some(result) => println!("{}", result.text),
            None => println!("Nothing built yet"),
        },
        ShellCommand::Copy => match SystemClipboard::new() {
            Ok(mut clipboard) => match session.export(&mut clipboard) {
                Some(notice) => println!("{}", notice),
                None => println!("Nothing built yet"),
            },
            Err(e) => {
                warn!("{}", e);
                println!("Failed to copy");
            }
        },
        ShellCommand::Status => {
            let controller = session.controller();
            println!("state: {:?}", controller.state());
            println!("path: {}", controller.path());
            if let Some(loaded) = controller.loaded_path() {
                println!("loaded: {}", loaded);
            }
            if let Some(error) = controller.last_error() {
                println!("error: {}", error);
            }
        }
        ShellCommand::History => {
            for dir in session.history().entries() {
                println!("{}", dir);
            }
        }
        ShellCommand::ClearHistory => match session.clear_history() {
            Ok(()) => println!("History cleared"),
            Err(e) => println!("{}", e),
        },
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Quit => {}
    }
}
