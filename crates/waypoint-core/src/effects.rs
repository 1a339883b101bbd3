//! Time-boxed item effects and the text transforms they apply.
//!
//! An effect is cast by one entity and obscures what every *other* entity
//! sees until it expires. The only text-altering item today is the Cipher
//! of the Laughing Monkey, which scrambles the letters of each word in clue
//! and question text.
//!
//! Scrambling is seeded from the viewing entity, so one viewer sees the
//! same scrambled text on every render while two viewers see different
//! permutations.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use sha2::{Digest, Sha256};
use waypoint_types::{EntityId, InventoryItemEffect};

/// Effects active against `entity` at `now`.
///
/// An effect is active while `expires_at` is strictly after `now`, and
/// never against the entity it is attributed to.
pub fn active_effects_against(
    entity: EntityId,
    effects: &[InventoryItemEffect],
    now: DateTime<Utc>,
) -> Vec<&InventoryItemEffect> {
    effects
        .iter()
        .filter(|e| e.applies_against_entity_id != entity && e.expires_at > now)
        .collect()
}

/// Derive a PRNG seed from a seed string: the first eight bytes of its
/// SHA-256 digest, big-endian.
pub fn seed_from(seed: &str) -> u64 {
    let digest = Sha256::digest(seed.as_bytes());
    digest
        .get(..8)
        .and_then(|head| <[u8; 8]>::try_from(head).ok())
        .map_or(0, u64::from_be_bytes)
}

/// Scramble the letters of every word in `input`, deterministically for
/// `seed`.
///
/// Words are runs of non-whitespace. Within a word, alphabetic characters
/// are permuted among themselves while every other character keeps its
/// position. Whitespace is copied through unchanged.
pub fn scramble_text(input: &str, seed: &str) -> String {
    let mut rng = StdRng::seed_from_u64(seed_from(seed));
    let mut out = String::with_capacity(input.len());
    let mut word: Vec<char> = Vec::new();

    for ch in input.chars() {
        if ch.is_whitespace() {
            scramble_word(&word, &mut rng, &mut out);
            word.clear();
            out.push(ch);
        } else {
            word.push(ch);
        }
    }
    scramble_word(&word, &mut rng, &mut out);
    out
}

fn scramble_word(word: &[char], rng: &mut StdRng, out: &mut String) {
    let mut letters: Vec<char> = word.iter().copied().filter(|c| c.is_alphabetic()).collect();
    letters.shuffle(rng);
    let mut shuffled = letters.into_iter();
    for &ch in word {
        if ch.is_alphabetic() {
            out.push(shuffled.next().unwrap_or(ch));
        } else {
            out.push(ch);
        }
    }
}

/// The text-altering effects active against one viewer, captured once per
/// render.
#[derive(Debug, Clone)]
pub struct EffectModifier {
    viewer: EntityId,
    seed: String,
    obscuring: Vec<InventoryItemEffect>,
}

impl EffectModifier {
    /// Capture the effects active against `viewer` at `now`.
    ///
    /// Effects that do not modify text are ignored.
    pub fn for_viewer(
        viewer: EntityId,
        effects: &[InventoryItemEffect],
        now: DateTime<Utc>,
    ) -> Self {
        let mut obscuring = Vec::new();
        for effect in active_effects_against(viewer, effects, now) {
            if effect.kind().obscures_text() {
                obscuring.push(effect.clone());
            } else {
                tracing::debug!(
                    item_id = %effect.item_id,
                    %viewer,
                    "ignoring active effect without a text modifier"
                );
            }
        }
        if !obscuring.is_empty() {
            tracing::debug!(%viewer, effects = obscuring.len(), "text obscured for viewer");
        }
        Self {
            viewer,
            seed: viewer.to_string(),
            obscuring,
        }
    }

    /// The viewer this modifier was built for.
    pub const fn viewer(&self) -> EntityId {
        self.viewer
    }

    /// Whether displayed text is scrambled for this viewer.
    pub const fn is_obscured(&self) -> bool {
        !self.obscuring.is_empty()
    }

    /// Effects currently obscuring text for this viewer.
    pub fn obscuring_effects(&self) -> &[InventoryItemEffect] {
        &self.obscuring
    }

    /// When the last obscuring effect lapses.
    pub fn obscured_until(&self) -> Option<DateTime<Utc>> {
        self.obscuring.iter().map(|e| e.expires_at).max()
    }

    /// Text as this viewer should see it.
    pub fn display_text<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.is_obscured() {
            Cow::Owned(scramble_text(text, &self.seed))
        } else {
            Cow::Borrowed(text)
        }
    }
}
