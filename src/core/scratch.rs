/*
 * Defines the `Scratch` entry value: a single named text artifact tracked by
 * the application. The name doubles as the filesystem leaf name under the
 * scratches root folder, so equality of entries is value equality of names.
 *
 * Display concerns stay out of the collection logic; the one transform that
 * belongs to the entry itself is the mnemonic popup label, which depends only
 * on the entry's position in the displayed list.
 */
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scratch {
    pub name: String,
}

impl Scratch {
    pub fn new(name: impl Into<String>) -> Self {
        Scratch { name: name.into() }
    }

    /// The filesystem leaf name backing this entry.
    pub fn file_name(&self) -> &str {
        &self.name
    }

    /*
     * Renders the label shown for this entry at a given list position.
     * The first ten positions get a digit mnemonic ("&1." through "&9.",
     * then "&0." for the tenth); later positions show the bare name.
     */
    pub fn popup_label(&self, position: usize) -> String {
        if position < 10 {
            let digit = (position + 1) % 10;
            format!("&{digit}. {}", self.name)
        } else {
            self.name.clone()
        }
    }
}
