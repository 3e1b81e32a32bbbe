/*
 * Terminal host for the scratch manager. It owns the outer loop: startup
 * wiring, the line-oriented command prompt, and the execution of the
 * `HostCommand`s the app logic answers with. Everything stateful lives
 * behind `ScratchAppLogic`; this file only translates between the terminal
 * and the event/command vocabulary in `app_logic::ports`.
 */
mod app_logic;
mod core;

use crate::app_logic::handler::APP_NAME_FOR_CONFIG;
use crate::app_logic::{
    HostCommand, MessageSeverity, PopupRow, ScratchAppLogic, ScratchEvent, ScratchEventHandler,
};
use crate::core::{
    AppendPolicy, ConfigManagerOperations, CoreConfigManager, CoreRelocator, CoreScratchStore,
    DefaultSelectionPolicy, RelocationOperations, ScratchConfig, ScratchStoreOperations,
    path_utils,
};

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};

const LOG_LEVEL_ENV_VAR: &str = "SCRATCH_DECK_LOG";

static INIT_LOGGING: Once = Once::new();

/*
 * Sets up the terminal logger exactly once. Tests call this from their
 * setup helpers too, so repeat calls must be harmless. The level comes
 * from the SCRATCH_DECK_LOG environment variable (error, warn, info,
 * debug, trace), defaulting to info.
 */
pub fn initialize_logging() {
    INIT_LOGGING.call_once(|| {
        let level = std::env::var(LOG_LEVEL_ENV_VAR)
            .ok()
            .and_then(|value| value.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);
        if let Err(e) = TermLogger::init(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ) {
            eprintln!("Logger initialization failed: {e}");
        }
    });
}

fn main() {
    initialize_logging();

    let config_manager = Arc::new(CoreConfigManager::new());
    let initial_config = match config_manager.load_config(APP_NAME_FOR_CONFIG) {
        Ok(Some(config)) => config,
        Ok(None) => {
            log::info!("Main: No saved scratch config found, starting fresh.");
            ScratchConfig::default()
        }
        Err(e) => {
            log::error!("Main: Failed to load scratch config, starting fresh: {e}");
            ScratchConfig::default()
        }
    };

    let scratches_root = match std::env::args().nth(1).map(PathBuf::from) {
        Some(root) => root,
        None => match path_utils::get_default_scratches_dir(APP_NAME_FOR_CONFIG) {
            Some(dir) => dir,
            None => {
                eprintln!(
                    "Could not resolve a scratches directory; pass one as the first argument."
                );
                std::process::exit(1);
            }
        },
    };
    log::info!("Main: Using scratches directory {scratches_root:?}");

    let store = Arc::new(CoreScratchStore::new(scratches_root));
    let relocator = Arc::new(CoreRelocator::new());
    let mut logic = ScratchAppLogic::new(
        Arc::clone(&store) as Arc<dyn ScratchStoreOperations>,
        relocator as Arc<dyn RelocationOperations>,
        config_manager as Arc<dyn ConfigManagerOperations>,
        initial_config,
    );

    // One-shot import of files already in the folder; the handler no-ops
    // once the flag has been consumed.
    let commands = logic.handle_event(ScratchEvent::MigrationRequested);
    execute_commands(&mut logic, store.as_ref(), commands, &mut Vec::new());
    log::info!(
        "Main: Tracking {} scratches.",
        logic.current_config().entries().len()
    );

    print_help();
    run_prompt(&mut logic, store.as_ref());
}

fn run_prompt(logic: &mut ScratchAppLogic, store: &dyn ScratchStoreOperations) {
    let stdin = io::stdin();
    // The rows from the most recent popup, so `open <digit>` can resolve
    // the digit mnemonics the same way the popup itself would.
    let mut last_rows: Vec<PopupRow> = Vec::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                log::error!("Main: Could not read from stdin: {e}");
                break;
            }
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        let event = match verb {
            "quit" | "exit" => break,
            "help" => {
                print_help();
                continue;
            }
            "list" => ScratchEvent::ScratchListRequested,
            "new" => {
                if rest.is_empty() {
                    println!("usage: new <name>");
                    continue;
                }
                ScratchEvent::NewScratchRequested {
                    name: rest.to_string(),
                    content: String::new(),
                }
            }
            "open" => {
                if rest.is_empty() {
                    ScratchEvent::OpenDefaultScratchRequested
                } else {
                    // Opening by name is what picking a popup row does: the
                    // host opens the file and reports the focus change.
                    let name = resolve_row_name(rest, &last_rows);
                    println!("Opening {}", store.scratch_path(&name).display());
                    ScratchEvent::ScratchOpened { name }
                }
            }
            "rename" => {
                let Some((name, new_name)) = rest.split_once(' ') else {
                    println!("usage: rename <name> <new-name>");
                    continue;
                };
                ScratchEvent::RenameScratchRequested {
                    name: name.to_string(),
                    new_name: new_name.trim().to_string(),
                }
            }
            "rm" => {
                if rest.is_empty() {
                    println!("usage: rm <name>");
                    continue;
                }
                ScratchEvent::DeleteScratchRequested {
                    name: rest.to_string(),
                }
            }
            "up" | "down" => {
                if rest.is_empty() {
                    println!("usage: {verb} <name>");
                    continue;
                }
                ScratchEvent::MoveScratchRequested {
                    name: rest.to_string(),
                    shift: if verb == "up" { -1 } else { 1 },
                }
            }
            "clip" => match rest {
                "on" => ScratchEvent::ClipboardListeningToggled { enabled: true },
                "off" => ScratchEvent::ClipboardListeningToggled { enabled: false },
                _ => {
                    println!("usage: clip on|off");
                    continue;
                }
            },
            "paste" => {
                if rest.is_empty() {
                    println!("usage: paste <text>");
                    continue;
                }
                ScratchEvent::ClipboardChanged {
                    content: rest.to_string(),
                }
            }
            "set" => match parse_settings_patch(rest) {
                Some(event) => event,
                None => {
                    println!("usage: set clip-placement|new-placement append|prepend");
                    println!("       set default topmost|last-opened");
                    continue;
                }
            },
            "root" => {
                if rest.is_empty() {
                    println!("Scratches root: {}", store.root_path().display());
                    continue;
                }
                ScratchEvent::ScratchesPathChanged {
                    new_root: PathBuf::from(rest),
                }
            }
            _ => {
                println!("Unknown command '{verb}', try 'help'.");
                continue;
            }
        };

        let commands = logic.handle_event(event);
        execute_commands(logic, store, commands, &mut last_rows);
    }
}

/*
 * Resolves an `open` argument: a single digit picks the row carrying that
 * mnemonic in the most recent popup ("1" through "9", then "0" for the
 * tenth row); anything else is taken as a scratch name directly.
 */
fn resolve_row_name(arg: &str, rows: &[PopupRow]) -> String {
    let index = match arg {
        "0" => Some(9),
        "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9" => {
            arg.parse::<usize>().ok().map(|digit| digit - 1)
        }
        _ => None,
    };
    match index.and_then(|i| rows.get(i)) {
        Some(row) => row.name.clone(),
        None => arg.to_string(),
    }
}

/// Builds a partial settings patch; fields not named stay untouched.
fn parse_settings_patch(args: &str) -> Option<ScratchEvent> {
    let (field, value) = args.split_once(' ')?;
    let mut clipboard_append_policy = None;
    let mut new_scratch_append_policy = None;
    let mut default_selection_policy = None;
    match (field, value.trim()) {
        ("clip-placement", "append") => clipboard_append_policy = Some(AppendPolicy::Append),
        ("clip-placement", "prepend") => clipboard_append_policy = Some(AppendPolicy::Prepend),
        ("new-placement", "append") => new_scratch_append_policy = Some(AppendPolicy::Append),
        ("new-placement", "prepend") => new_scratch_append_policy = Some(AppendPolicy::Prepend),
        ("default", "topmost") => {
            default_selection_policy = Some(DefaultSelectionPolicy::Topmost)
        }
        ("default", "last-opened") => {
            default_selection_policy = Some(DefaultSelectionPolicy::LastOpened)
        }
        _ => return None,
    }
    Some(ScratchEvent::SettingsChanged {
        clipboard_append_policy,
        new_scratch_append_policy,
        default_selection_policy,
    })
}

/*
 * Renders the commands the logic answered with. Opening a scratch feeds a
 * `ScratchOpened` event back in, the same way an editor reports a focus
 * change, so this can recurse one level.
 */
fn execute_commands(
    logic: &mut ScratchAppLogic,
    store: &dyn ScratchStoreOperations,
    commands: Vec<HostCommand>,
    last_rows: &mut Vec<PopupRow>,
) {
    for command in commands {
        match command {
            HostCommand::OpenScratchEditor { path } => {
                println!("Opening {}", path.display());
                if store.is_member(&path) {
                    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                        let follow_up = logic.handle_event(ScratchEvent::ScratchOpened {
                            name: name.to_string(),
                        });
                        execute_commands(logic, store, follow_up, last_rows);
                    }
                }
            }
            HostCommand::ShowScratchPopup { rows } => {
                if rows.is_empty() {
                    println!("(no scratches)");
                }
                for row in &rows {
                    let marker = if row.is_default { "*" } else { " " };
                    println!("{marker} {}", row.label);
                }
                *last_rows = rows;
            }
            HostCommand::AppendToScratch {
                path,
                text,
                placement,
            } => {
                if let Err(e) = splice_into_file(&path, &text, placement) {
                    log::error!("Main: Could not append clipboard text to {path:?}: {e}");
                }
            }
            HostCommand::SetClipboardListening { enabled } => {
                let state = if enabled { "on" } else { "off" };
                println!("Clipboard capture is {state}");
            }
            HostCommand::ShowMessage { severity, text } => {
                let tag = match severity {
                    MessageSeverity::Information => "info",
                    MessageSeverity::Warning => "warning",
                    MessageSeverity::Error => "error",
                };
                println!("[{tag}] {text}");
            }
        }
    }
}

fn splice_into_file(path: &Path, text: &str, placement: AppendPolicy) -> io::Result<()> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };
    let updated = match placement {
        AppendPolicy::Append => format!("{existing}{text}\n"),
        AppendPolicy::Prepend => format!("{text}\n{existing}"),
    };
    fs::write(path, updated)
}

fn print_help() {
    println!("Commands:");
    println!("  list                     show the scratch popup");
    println!("  new <name>               create a scratch and open it");
    println!("  open [name|digit]        open a scratch (the default one when no argument)");
    println!("  rename <name> <new>      rename a scratch");
    println!("  rm <name>                delete a scratch");
    println!("  up <name> / down <name>  move a scratch within the popup");
    println!("  clip on|off              toggle clipboard capture");
    println!("  paste <text>             feed captured clipboard text in");
    println!("  set <field> <value>      adjust placement and default-selection policies");
    println!("  root [path]              show or move the scratches folder");
    println!("  quit                     exit");
}
