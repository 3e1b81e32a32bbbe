/*
 * Defines the ordered scratch collection: an immutable value holding the
 * display-ordered entries, the last selected entry, and the behavior flags
 * that drive clipboard listening, placement of new content, and default
 * scratch selection. Every operation is a pure transformation returning a
 * new value; the process-wide current value lives in a `ConfigCell` and is
 * replaced wholesale after each transformation.
 *
 * Order is meaningful (popup display order and "topmost" semantics) and each
 * name appears at most once; callers enforce uniqueness through the validator
 * before calling `add`.
 */
use super::scratch::Scratch;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppendPolicy {
    Append,
    Prepend,
}

impl Default for AppendPolicy {
    fn default() -> Self {
        AppendPolicy::Append
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultSelectionPolicy {
    Topmost,
    LastOpened,
}

impl Default for DefaultSelectionPolicy {
    fn default() -> Self {
        DefaultSelectionPolicy::Topmost
    }
}

fn default_needs_migration() -> bool {
    true
}

/*
 * The collection value itself. Fields are private; reads go through the
 * accessors below and writes through the pure `with_*`/`add`/`without`/
 * `replace`/`move_entry` transformations. `last_selected` is a reference by
 * value and may name an entry that is no longer present; readers treat a
 * dangling value as "no selection".
 *
 * Every field carries `#[serde(default)]` so config files written by older
 * versions still load; `needs_migration` defaults to on, which is how a
 * fresh install (no config file at all) is detected by the migration step.
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScratchConfig {
    #[serde(default)]
    entries: Vec<Scratch>,
    #[serde(default)]
    last_selected: Option<Scratch>,
    #[serde(default)]
    listen_to_clipboard: bool,
    #[serde(default = "default_needs_migration")]
    needs_migration: bool,
    #[serde(default)]
    clipboard_append_policy: AppendPolicy,
    // Read only by `add` for placement; no public accessor.
    #[serde(default)]
    new_scratch_append_policy: AppendPolicy,
    #[serde(default)]
    default_selection_policy: DefaultSelectionPolicy,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        ScratchConfig {
            entries: Vec::new(),
            last_selected: None,
            listen_to_clipboard: false,
            needs_migration: true,
            clipboard_append_policy: AppendPolicy::Append,
            new_scratch_append_policy: AppendPolicy::Append,
            default_selection_policy: DefaultSelectionPolicy::Topmost,
        }
    }
}

impl ScratchConfig {
    pub fn entries(&self) -> &[Scratch] {
        &self.entries
    }

    pub fn last_selected(&self) -> Option<&Scratch> {
        self.last_selected.as_ref()
    }

    pub fn listens_to_clipboard(&self) -> bool {
        self.listen_to_clipboard
    }

    pub fn needs_migration(&self) -> bool {
        self.needs_migration
    }

    pub fn clipboard_append_policy(&self) -> AppendPolicy {
        self.clipboard_append_policy
    }

    pub fn default_selection_policy(&self) -> DefaultSelectionPolicy {
        self.default_selection_policy
    }

    /*
     * Inserts a new entry, at position 0 when the new-scratch placement
     * policy is Prepend and at the end otherwise. The caller has already
     * checked name uniqueness through the validator.
     */
    pub fn add(&self, scratch: Scratch) -> ScratchConfig {
        let mut entries = self.entries.clone();
        match self.new_scratch_append_policy {
            AppendPolicy::Prepend => entries.insert(0, scratch),
            AppendPolicy::Append => entries.push(scratch),
        }
        ScratchConfig {
            entries,
            ..self.clone()
        }
    }

    /// Removes the first element equal to `scratch`; no-op when absent.
    pub fn without(&self, scratch: &Scratch) -> ScratchConfig {
        let mut entries = self.entries.clone();
        if let Some(index) = entries.iter().position(|s| s == scratch) {
            entries.remove(index);
        }
        ScratchConfig {
            entries,
            ..self.clone()
        }
    }

    /*
     * Maps every occurrence of `old` to `new`; when `last_selected` equaled
     * `old` it is retargeted to `new` as well so renames never leave the
     * selection pointing at a name that no longer exists.
     */
    pub fn replace(&self, old: &Scratch, new: Scratch) -> ScratchConfig {
        let entries = self
            .entries
            .iter()
            .map(|s| if s == old { new.clone() } else { s.clone() })
            .collect();
        let last_selected = match &self.last_selected {
            Some(s) if s == old => Some(new.clone()),
            other => other.clone(),
        };
        ScratchConfig {
            entries,
            last_selected,
            ..self.clone()
        }
    }

    /*
     * Moves `scratch` by `shift` positions with circular wraparound: the new
     * index is wrapped into `[0, len)` by a single correction, so callers
     * must keep `|shift| <= len` ("move up" is -1, "move down" is +1).
     * Panics when the entry is not in the collection; callers check
     * presence first, so reaching the panic indicates a bug.
     */
    pub fn move_entry(&self, scratch: &Scratch, shift: isize) -> ScratchConfig {
        let old_index = self
            .entries
            .iter()
            .position(|s| s == scratch)
            .unwrap_or_else(|| {
                panic!(
                    "ScratchConfig::move_entry: '{}' is not in the collection",
                    scratch.name
                )
            });

        let len = self.entries.len() as isize;
        let mut new_index = old_index as isize + shift;
        if new_index < 0 {
            new_index += len;
        } else if new_index >= len {
            new_index -= len;
        }

        let mut entries = self.entries.clone();
        let moved = entries.remove(old_index);
        entries.insert(new_index as usize, moved);
        ScratchConfig {
            entries,
            ..self.clone()
        }
    }

    pub fn with_clipboard_listening(&self, enabled: bool) -> ScratchConfig {
        ScratchConfig {
            listen_to_clipboard: enabled,
            ..self.clone()
        }
    }

    pub fn with_needs_migration(&self, value: bool) -> ScratchConfig {
        ScratchConfig {
            needs_migration: value,
            ..self.clone()
        }
    }

    /*
     * The three policy setters take an optional value and return the
     * collection unchanged on `None`, so partially-specified settings from
     * an external source can be merged without disturbing the rest.
     */
    pub fn with_clipboard_append_policy(&self, policy: Option<AppendPolicy>) -> ScratchConfig {
        match policy {
            Some(p) => ScratchConfig {
                clipboard_append_policy: p,
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    pub fn with_new_scratch_append_policy(&self, policy: Option<AppendPolicy>) -> ScratchConfig {
        match policy {
            Some(p) => ScratchConfig {
                new_scratch_append_policy: p,
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    pub fn with_default_selection_policy(
        &self,
        policy: Option<DefaultSelectionPolicy>,
    ) -> ScratchConfig {
        match policy {
            Some(p) => ScratchConfig {
                default_selection_policy: p,
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    /// Replaces the selection; `None` clears it.
    pub fn with_last_selected(&self, scratch: Option<Scratch>) -> ScratchConfig {
        ScratchConfig {
            last_selected: scratch,
            ..self.clone()
        }
    }
}
