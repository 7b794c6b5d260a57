//! Profile/economy collaborator
//!
//! The simulation reads jump capacity and cosmetics at (re)start and writes
//! currency and score records. Implementations must not block: the session
//! calls them inline and never waits on durable storage.
//!
//! Features:
//! - `Profile` trait (the collaborator contract)
//! - `ProfileData` JSON document with lenient parsing
//! - `MemoryProfile` for tests and the demo binary
//! - `LocalProfile` backed by a JSON file or browser localStorage

pub mod local;
pub mod shop;

use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::{DEFAULT_SKIN, MASK_COSMETIC, MIN_JUMP_CAPACITY};
use crate::sanitize_capacity;

pub use local::{LocalProfile, StoreError, StoreLocation};
pub use shop::{PurchaseError, Upgrade};

/// Persistence/economy collaborator consumed by the session
pub trait Profile {
    /// Jump charges per airborne period (at least 1)
    fn jump_capacity(&self) -> u8;
    fn has_cosmetic(&self, id: &str) -> bool;
    fn selected_skin(&self) -> String;
    /// Add (or with a negative delta, spend) currency
    fn add_currency(&mut self, delta: i64);
    /// Store `score` if it beats the stored record; true when it did
    fn report_score_if_record(&mut self, score: u64) -> bool;
    /// Current balance, for HUD display
    fn currency(&self) -> u64;
    /// Stored record, for HUD display
    fn high_score(&self) -> u64;
}

/// Persisted player progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileData {
    pub coins: u64,
    #[serde(deserialize_with = "lenient_capacity")]
    pub max_jumps: u8,
    pub has_mask: bool,
    pub purchased_skins: Vec<String>,
    pub selected_skin: String,
    pub high_score: u64,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            coins: 0,
            max_jumps: MIN_JUMP_CAPACITY,
            has_mask: false,
            purchased_skins: vec![DEFAULT_SKIN.to_string()],
            selected_skin: DEFAULT_SKIN.to_string(),
            high_score: 0,
        }
    }
}

/// Accept numbers or numeric strings; anything else is a single jump
fn lenient_capacity<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let raw = match &value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(match raw {
        Some(v) => sanitize_capacity(v.min(u64::from(u8::MAX)) as u8),
        None => {
            log::warn!("Corrupt max_jumps {:?}, defaulting to single jump", value);
            MIN_JUMP_CAPACITY
        }
    })
}

impl ProfileData {
    /// Parse a stored document, then normalize it
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let data: ProfileData = serde_json::from_str(json)?;
        Ok(data.normalized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Enforce invariants: capacity in range, default skin owned, selected
    /// skin owned, no duplicate skins
    pub fn normalized(mut self) -> Self {
        self.max_jumps = sanitize_capacity(self.max_jumps);

        let mut skins: Vec<String> = Vec::with_capacity(self.purchased_skins.len() + 1);
        skins.push(DEFAULT_SKIN.to_string());
        for skin in self.purchased_skins.drain(..) {
            if !skin.is_empty() && !skins.contains(&skin) {
                skins.push(skin);
            }
        }
        self.purchased_skins = skins;

        if !self.purchased_skins.contains(&self.selected_skin) {
            self.selected_skin = DEFAULT_SKIN.to_string();
        }
        self
    }

    pub fn owns_skin(&self, skin: &str) -> bool {
        self.purchased_skins.iter().any(|s| s == skin)
    }

    /// Select an owned skin; returns false for unowned ones
    pub fn select_skin(&mut self, skin: &str) -> bool {
        if !self.owns_skin(skin) {
            return false;
        }
        self.selected_skin = skin.to_string();
        true
    }

    fn add_coins(&mut self, delta: i64) {
        self.coins = self.coins.saturating_add_signed(delta);
    }

    fn record(&mut self, score: u64) -> bool {
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }

    fn cosmetic(&self, id: &str) -> bool {
        match id {
            MASK_COSMETIC => self.has_mask,
            skin => self.owns_skin(skin),
        }
    }
}

/// In-memory profile
#[derive(Debug, Clone, Default)]
pub struct MemoryProfile {
    pub data: ProfileData,
}

impl MemoryProfile {
    pub fn new(data: ProfileData) -> Self {
        Self {
            data: data.normalized(),
        }
    }

    /// Default profile with the given jump upgrade level
    pub fn with_capacity(capacity: u8) -> Self {
        Self::new(ProfileData {
            max_jumps: capacity,
            ..ProfileData::default()
        })
    }
}

impl Profile for MemoryProfile {
    fn jump_capacity(&self) -> u8 {
        self.data.max_jumps
    }

    fn has_cosmetic(&self, id: &str) -> bool {
        self.data.cosmetic(id)
    }

    fn selected_skin(&self) -> String {
        self.data.selected_skin.clone()
    }

    fn add_currency(&mut self, delta: i64) {
        self.data.add_coins(delta);
    }

    fn report_score_if_record(&mut self, score: u64) -> bool {
        self.data.record(score)
    }

    fn currency(&self) -> u64 {
        self.data.coins
    }

    fn high_score(&self) -> u64 {
        self.data.high_score
    }
}
