use crate::app_logic::ports::{
    HostCommand, MessageSeverity, PopupRow, ScratchEvent, ScratchEventHandler,
};
use crate::core::{
    AppendPolicy, ConfigCell, ConfigManagerOperations, DefaultSelectionPolicy, RelocationError,
    RelocationOperations, Scratch, ScratchConfig, ScratchStoreOperations, validate_new_name,
};
use std::path::Path;
use std::sync::Arc;

// Made pub(crate) for access from handler_tests.rs
pub(crate) const APP_NAME_FOR_CONFIG: &str = "ScratchDeck";
const STARTER_SCRATCH_NAME: &str = "scratch.txt";

/*
 * Orchestrates the scratch state in a host-agnostic manner. It processes
 * `ScratchEvent`s received from the host and answers with `HostCommand`s,
 * driving the validator, the directory store, and the collection in that
 * order for every mutation, then pushing the new collection to the
 * persistence manager. All collaborators are injected as trait objects so
 * the flows can be tested against mocks.
 */
pub struct ScratchAppLogic {
    pub(crate) store: Arc<dyn ScratchStoreOperations>,
    pub(crate) relocator: Arc<dyn RelocationOperations>,
    pub(crate) config_manager: Arc<dyn ConfigManagerOperations>,
    pub(crate) config_cell: ConfigCell,
}

impl ScratchAppLogic {
    pub fn new(
        store: Arc<dyn ScratchStoreOperations>,
        relocator: Arc<dyn RelocationOperations>,
        config_manager: Arc<dyn ConfigManagerOperations>,
        initial_config: ScratchConfig,
    ) -> Self {
        log::debug!(
            "ScratchAppLogic::new called with {} persisted entries.",
            initial_config.entries().len()
        );
        ScratchAppLogic {
            store,
            relocator,
            config_manager,
            config_cell: ConfigCell::new(initial_config),
        }
    }

    /// The current collection snapshot, for host-side display.
    pub fn current_config(&self) -> Arc<ScratchConfig> {
        self.config_cell.snapshot()
    }

    fn error_message(text: impl Into<String>) -> HostCommand {
        HostCommand::ShowMessage {
            severity: MessageSeverity::Error,
            text: text.into(),
        }
    }

    fn find_entry(config: &ScratchConfig, name: &str) -> Option<Scratch> {
        config.entries().iter().find(|s| s.name == name).cloned()
    }

    /*
     * Resolves the scratch the default-open action targets. Under
     * LastOpened the remembered selection wins as long as it still names a
     * present entry (a dangling selection falls back); otherwise the
     * topmost entry. `None` only for an empty collection.
     */
    fn default_scratch(config: &ScratchConfig) -> Option<Scratch> {
        match config.default_selection_policy() {
            DefaultSelectionPolicy::LastOpened => config
                .last_selected()
                .filter(|s| config.entries().contains(*s))
                .or_else(|| config.entries().first())
                .cloned(),
            DefaultSelectionPolicy::Topmost => config.entries().first().cloned(),
        }
    }

    /*
     * Pushes the current collection to the persistence manager. A failure
     * is logged and reported as a warning message; the in-memory state
     * stays authoritative either way.
     */
    fn persist_current(&self) -> Vec<HostCommand> {
        let config = self.config_cell.snapshot();
        match self.config_manager.save_config(APP_NAME_FOR_CONFIG, &config) {
            Ok(()) => Vec::new(),
            Err(e) => {
                log::error!("AppLogic: Failed to persist scratch config: {e}");
                vec![HostCommand::ShowMessage {
                    severity: MessageSeverity::Warning,
                    text: format!("Could not save scratch settings: {e}"),
                }]
            }
        }
    }

    fn show_scratch_list(&self) -> Vec<HostCommand> {
        let config = self.config_cell.snapshot();
        let default = Self::default_scratch(&config);
        let rows = config
            .entries()
            .iter()
            .enumerate()
            .map(|(position, scratch)| PopupRow {
                label: scratch.popup_label(position),
                name: scratch.name.clone(),
                is_default: default.as_ref() == Some(scratch),
            })
            .collect();
        vec![HostCommand::ShowScratchPopup { rows }]
    }

    /*
     * Creates a new scratch: validator first, then the backing file, then
     * the collection update and persistence, and finally the editor opens
     * the new file. Rejections and I/O failures surface as error messages
     * and leave the collection untouched.
     */
    fn create_scratch(&mut self, name: &str, content: &str) -> Vec<HostCommand> {
        let config = self.config_cell.snapshot();
        if let Err(rejection) = validate_new_name(self.store.as_ref(), &config, name) {
            log::debug!("AppLogic: Rejected new scratch name '{name}': {rejection}");
            return vec![Self::error_message(rejection.to_string())];
        }
        if !self.store.create(name, content) {
            return vec![Self::error_message(format!(
                "Could not create scratch file '{name}'"
            ))];
        }

        let scratch = Scratch::new(name);
        self.config_cell.update(|config| config.add(scratch.clone()));

        let mut commands = vec![HostCommand::OpenScratchEditor {
            path: self.store.scratch_path(name),
        }];
        commands.extend(self.persist_current());
        commands
    }

    fn rename_scratch(&mut self, name: &str, new_name: &str) -> Vec<HostCommand> {
        if name == new_name {
            log::trace!("AppLogic: Rename of '{name}' to itself, nothing to do.");
            return Vec::new();
        }
        let config = self.config_cell.snapshot();
        let Some(old) = Self::find_entry(&config, name) else {
            log::warn!("AppLogic: Cannot rename unknown scratch '{name}'.");
            return vec![Self::error_message(format!("No scratch named '{name}'"))];
        };
        if let Err(rejection) = validate_new_name(self.store.as_ref(), &config, new_name) {
            log::debug!("AppLogic: Rejected rename to '{new_name}': {rejection}");
            return vec![Self::error_message(rejection.to_string())];
        }
        if !self.store.rename(name, new_name) {
            return vec![Self::error_message(format!(
                "Could not rename scratch file '{name}'"
            ))];
        }

        let new = Scratch::new(new_name);
        self.config_cell
            .update(|config| config.replace(&old, new.clone()));
        self.persist_current()
    }

    fn delete_scratch(&mut self, name: &str) -> Vec<HostCommand> {
        if !self.store.remove(name) {
            return vec![Self::error_message(format!(
                "Could not delete scratch file '{name}'"
            ))];
        }

        let scratch = Scratch::new(name);
        self.config_cell.update(|config| config.without(&scratch));
        self.persist_current()
    }

    /*
     * Reorders an entry within the popup. Presence is checked here so the
     * pure `move_entry` (which treats an absent entry as a caller bug) is
     * only invoked on entries that exist.
     */
    fn reorder_scratch(&mut self, name: &str, shift: isize) -> Vec<HostCommand> {
        let config = self.config_cell.snapshot();
        let Some(scratch) = Self::find_entry(&config, name) else {
            log::warn!("AppLogic: Cannot move unknown scratch '{name}'.");
            return vec![Self::error_message(format!("No scratch named '{name}'"))];
        };
        self.config_cell
            .update(|config| config.move_entry(&scratch, shift));
        self.persist_current()
    }

    /*
     * Remembers the opened file as the last selection when it is one of
     * ours. The editor-focus collaborator reports every file it sees, so
     * unknown names are ignored without any user-visible reaction.
     */
    fn remember_opened(&mut self, name: &str) -> Vec<HostCommand> {
        let config = self.config_cell.snapshot();
        let Some(scratch) = Self::find_entry(&config, name) else {
            log::trace!("AppLogic: Opened file '{name}' is not a scratch, ignoring.");
            return Vec::new();
        };
        if config.last_selected() == Some(&scratch) {
            return Vec::new();
        }
        self.config_cell
            .update(|config| config.with_last_selected(Some(scratch.clone())));
        self.persist_current()
    }

    fn open_default_scratch(&mut self) -> Vec<HostCommand> {
        let config = self.config_cell.snapshot();
        let Some(scratch) = Self::default_scratch(&config) else {
            log::debug!("AppLogic: No scratches yet, creating starter '{STARTER_SCRATCH_NAME}'.");
            return self.create_scratch(STARTER_SCRATCH_NAME, "");
        };
        vec![HostCommand::OpenScratchEditor {
            path: self.store.scratch_path(scratch.file_name()),
        }]
    }

    /*
     * Routes new clipboard text into the default scratch. Best effort by
     * design: when listening is off or there is nothing to append to, the
     * event is skipped silently instead of interrupting the user.
     */
    fn append_clipboard(&self, content: &str) -> Vec<HostCommand> {
        let config = self.config_cell.snapshot();
        if !config.listens_to_clipboard() {
            return Vec::new();
        }
        let Some(scratch) = Self::default_scratch(&config) else {
            log::trace!("AppLogic: Clipboard changed but there is no scratch to append to.");
            return Vec::new();
        };
        vec![HostCommand::AppendToScratch {
            path: self.store.scratch_path(scratch.file_name()),
            text: content.to_string(),
            placement: config.clipboard_append_policy(),
        }]
    }

    fn toggle_clipboard_listening(&mut self, enabled: bool) -> Vec<HostCommand> {
        self.config_cell
            .update(|config| config.with_clipboard_listening(enabled));
        log::debug!("AppLogic: Clipboard listening set to {enabled}.");

        let mut commands = vec![HostCommand::SetClipboardListening { enabled }];
        commands.extend(self.persist_current());
        commands
    }

    fn apply_settings_patch(
        &mut self,
        clipboard_append_policy: Option<AppendPolicy>,
        new_scratch_append_policy: Option<AppendPolicy>,
        default_selection_policy: Option<DefaultSelectionPolicy>,
    ) -> Vec<HostCommand> {
        self.config_cell.update(|config| {
            config
                .with_clipboard_append_policy(clipboard_append_policy)
                .with_new_scratch_append_policy(new_scratch_append_policy)
                .with_default_selection_policy(default_selection_policy)
        });
        self.persist_current()
    }

    /*
     * Moves the scratch files to the new root and rebinds the store to it.
     * A missing destination aborts the whole change; a partial failure
     * keeps the new root and reports the names that stayed behind. Either
     * way the collection is revalidated against the directory afterwards:
     * entries without a backing file are dropped and a dangling selection
     * is cleared.
     */
    fn change_scratches_root(&mut self, new_root: &Path) -> Vec<HostCommand> {
        let old_root = self.store.root_path();
        if old_root == new_root {
            log::trace!("AppLogic: Scratches root unchanged at {new_root:?}.");
            return Vec::new();
        }

        let config = self.config_cell.snapshot();
        let names: Vec<String> = config.entries().iter().map(|s| s.name.clone()).collect();

        let mut commands = Vec::new();
        match self.relocator.move_scratches(&names, &old_root, new_root) {
            Ok(()) => {
                log::debug!("AppLogic: Moved {} scratches to {new_root:?}.", names.len());
            }
            Err(e @ RelocationError::MissingDestination(_)) => {
                log::warn!("AppLogic: Scratches root change aborted: {e}");
                return vec![Self::error_message(e.to_string())];
            }
            Err(e @ RelocationError::Partial { .. }) => {
                log::warn!("AppLogic: Scratches root changed with failures: {e}");
                commands.push(Self::error_message(e.to_string()));
            }
        }

        self.store.set_root_path(new_root);
        self.revalidate_entries();
        commands.extend(self.persist_current());
        commands
    }

    fn revalidate_entries(&mut self) {
        let store = Arc::clone(&self.store);
        self.config_cell.update(|config| {
            let mut next = config.clone();
            for scratch in config.entries() {
                if !store.exists(&scratch.name) {
                    log::warn!(
                        "AppLogic: Dropping scratch '{}', no backing file under the new root.",
                        scratch.name
                    );
                    next = next.without(scratch);
                }
            }
            let selection_dangles = next
                .last_selected()
                .is_some_and(|s| !next.entries().contains(s));
            if selection_dangles {
                next = next.with_last_selected(None);
            }
            next
        });
    }

    /*
     * One-shot import of files already present in the scratches folder,
     * consuming the `needs_migration` flag. Files the collection already
     * tracks are left alone; everything else becomes an entry.
     */
    fn run_migration(&mut self) -> Vec<HostCommand> {
        let config = self.config_cell.snapshot();
        if !config.needs_migration() {
            log::trace!("AppLogic: Migration already done, skipping.");
            return Vec::new();
        }

        let untracked: Vec<Scratch> = self
            .store
            .list()
            .into_iter()
            .filter(|name| !config.entries().iter().any(|s| &s.name == name))
            .map(Scratch::new)
            .collect();
        let imported = untracked.len();

        self.config_cell.update(|config| {
            let mut next = config.clone();
            for scratch in &untracked {
                next = next.add(scratch.clone());
            }
            next.with_needs_migration(false)
        });
        log::debug!("AppLogic: Migration imported {imported} scratch files.");

        let mut commands = Vec::new();
        if imported > 0 {
            commands.push(HostCommand::ShowMessage {
                severity: MessageSeverity::Information,
                text: format!("Imported {imported} existing scratch files"),
            });
        }
        commands.extend(self.persist_current());
        commands
    }
}

impl ScratchEventHandler for ScratchAppLogic {
    fn handle_event(&mut self, event: ScratchEvent) -> Vec<HostCommand> {
        log::trace!("AppLogic: Handling event {event:?}");
        match event {
            ScratchEvent::ScratchListRequested => self.show_scratch_list(),
            ScratchEvent::NewScratchRequested { name, content } => {
                self.create_scratch(&name, &content)
            }
            ScratchEvent::ScratchOpened { name } => self.remember_opened(&name),
            ScratchEvent::RenameScratchRequested { name, new_name } => {
                self.rename_scratch(&name, &new_name)
            }
            ScratchEvent::DeleteScratchRequested { name } => self.delete_scratch(&name),
            ScratchEvent::MoveScratchRequested { name, shift } => {
                self.reorder_scratch(&name, shift)
            }
            ScratchEvent::OpenDefaultScratchRequested => self.open_default_scratch(),
            ScratchEvent::ClipboardChanged { content } => self.append_clipboard(&content),
            ScratchEvent::ClipboardListeningToggled { enabled } => {
                self.toggle_clipboard_listening(enabled)
            }
            ScratchEvent::SettingsChanged {
                clipboard_append_policy,
                new_scratch_append_policy,
                default_selection_policy,
            } => self.apply_settings_patch(
                clipboard_append_policy,
                new_scratch_append_policy,
                default_selection_policy,
            ),
            ScratchEvent::ScratchesPathChanged { new_root } => {
                self.change_scratches_root(&new_root)
            }
            ScratchEvent::MigrationRequested => self.run_migration(),
        }
    }
}
