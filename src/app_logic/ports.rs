/*
 * This module defines the data types used for communication between the
 * scratch logic and the host environment. Host-side collaborators (popup
 * rendering, clipboard polling, editor focus tracking) translate their
 * native notifications into `ScratchEvent`s; the logic layer answers with
 * `HostCommand`s the host executes. The `ScratchEventHandler` trait is the
 * seam between the two.
 */
use crate::core::{AppendPolicy, DefaultSelectionPolicy};
use std::path::PathBuf;

// One row of the scratch list popup, in display order. `label` already
// carries the digit mnemonic for the first ten rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupRow {
    pub label: String,
    pub name: String,
    // Marks the scratch the default-open action would pick right now.
    pub is_default: bool,
}

// Defines the severity of a message shown to the user.
// Ordered from least to most severe for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageSeverity {
    Information,
    Warning,
    Error,
}

// --- Events from Host to Scratch Logic ---

/*
 * Host-agnostic notifications the scratch logic reacts to. The host decides
 * what triggers them (menu actions, keyboard shortcuts, clipboard polling,
 * editor focus changes); the logic layer only sees the semantic event.
 */
#[derive(Debug, Clone)]
pub enum ScratchEvent {
    // The user asked to see the scratch list.
    ScratchListRequested,
    NewScratchRequested {
        name: String,
        content: String,
    },
    // An editor opened a file; when it is one of ours it becomes the
    // remembered selection.
    ScratchOpened {
        name: String,
    },
    RenameScratchRequested {
        name: String,
        new_name: String,
    },
    DeleteScratchRequested {
        name: String,
    },
    // Reorder within the popup: -1 moves up, +1 moves down, wrapping at
    // the ends.
    MoveScratchRequested {
        name: String,
        shift: isize,
    },
    OpenDefaultScratchRequested,
    // The clipboard collaborator saw new text while listening is enabled.
    ClipboardChanged {
        content: String,
    },
    ClipboardListeningToggled {
        enabled: bool,
    },
    // Partial settings patch from the host; `None` fields stay untouched.
    SettingsChanged {
        clipboard_append_policy: Option<AppendPolicy>,
        new_scratch_append_policy: Option<AppendPolicy>,
        default_selection_policy: Option<DefaultSelectionPolicy>,
    },
    // The configured scratches folder moved; files follow it.
    ScratchesPathChanged {
        new_root: PathBuf,
    },
    // One-shot startup import of files already present in the folder.
    MigrationRequested,
}

// --- Commands from Scratch Logic to Host ---

// Instructions the host executes on behalf of the scratch logic.
#[derive(Debug, Clone)]
pub enum HostCommand {
    OpenScratchEditor {
        path: PathBuf,
    },
    ShowScratchPopup {
        rows: Vec<PopupRow>,
    },
    // Best-effort append of clipboard text into the given scratch file;
    // placement decides which end of the file receives it.
    AppendToScratch {
        path: PathBuf,
        text: String,
        placement: AppendPolicy,
    },
    // Tells the clipboard collaborator explicitly to start or stop polling.
    SetClipboardListening {
        enabled: bool,
    },
    ShowMessage {
        severity: MessageSeverity,
        text: String,
    },
}

// --- Trait for the Scratch Logic to Handle Events ---

// Implemented by the logic layer; the host calls it for every event and
// executes the returned commands in order.
pub trait ScratchEventHandler: Send + Sync + 'static {
    fn handle_event(&mut self, event: ScratchEvent) -> Vec<HostCommand>;
}
