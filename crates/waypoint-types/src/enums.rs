//! Enumeration types shared across the Waypoint workspace.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::ItemId;

// ---------------------------------------------------------------------------
// Inventory items
// ---------------------------------------------------------------------------

/// Inventory items whose effects the engine knows how to apply.
///
/// The item catalogue is owned upstream and grows independently of this
/// crate, so anything not listed here maps to [`ItemKind::Unknown`] and is
/// ignored by the effect modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ItemKind {
    /// Scrambles clue and question text for every entity except the caster.
    CipherOfTheLaughingMonkey,
    /// Any item id without engine-side behavior.
    Unknown,
}

impl ItemKind {
    /// Catalogue id of the Cipher of the Laughing Monkey.
    pub const CIPHER_ITEM_ID: ItemId = ItemId(1);

    /// Classify a catalogue item id.
    pub const fn from_item_id(id: ItemId) -> Self {
        match id.0 {
            1 => Self::CipherOfTheLaughingMonkey,
            _ => Self::Unknown,
        }
    }

    /// Whether an active effect of this kind obscures displayed text.
    pub const fn obscures_text(self) -> bool {
        matches!(self, Self::CipherOfTheLaughingMonkey)
    }
}
