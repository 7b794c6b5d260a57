//! Profile stored as JSON on the local machine
//!
//! Native builds use a file; wasm builds use browser localStorage. Every
//! mutation writes through. Write failures are logged and otherwise ignored
//! so the simulation never stalls on storage.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use thiserror::Error;

use super::{Profile, ProfileData};

/// Storage failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("profile io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("profile parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Backend not reachable (no window, storage disabled)
    #[error("profile storage unavailable")]
    Unavailable,
}

/// Where the profile document lives
#[derive(Debug, Clone)]
pub enum StoreLocation {
    #[cfg(not(target_arch = "wasm32"))]
    File(PathBuf),
    #[cfg(target_arch = "wasm32")]
    LocalStorage(&'static str),
}

impl StoreLocation {
    /// LocalStorage key for the browser profile
    pub const STORAGE_KEY: &'static str = "dino_dash_profile";

    /// Read the raw document; `Ok(None)` when nothing is stored yet
    #[cfg(not(target_arch = "wasm32"))]
    fn read(&self) -> Result<Option<String>, StoreError> {
        let Self::File(path) = self;
        match std::fs::read_to_string(path) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn write(&self, json: &str) -> Result<(), StoreError> {
        let Self::File(path) = self;
        // Write to a sibling temp file first so a crash never truncates the save
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }

    #[cfg(target_arch = "wasm32")]
    fn read(&self) -> Result<Option<String>, StoreError> {
        let Self::LocalStorage(key) = self;
        Self::storage()?
            .get_item(key)
            .map_err(|_| StoreError::Unavailable)
    }

    #[cfg(target_arch = "wasm32")]
    fn write(&self, json: &str) -> Result<(), StoreError> {
        let Self::LocalStorage(key) = self;
        Self::storage()?
            .set_item(key, json)
            .map_err(|_| StoreError::Unavailable)
    }
}

/// Profile persisted on every change
#[derive(Debug, Clone)]
pub struct LocalProfile {
    data: ProfileData,
    location: StoreLocation,
}

impl LocalProfile {
    /// Open a JSON profile file, starting fresh if missing or corrupt
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::load(StoreLocation::File(path.into()))
    }

    /// Open the browser profile
    #[cfg(target_arch = "wasm32")]
    pub fn open_browser() -> Self {
        Self::load(StoreLocation::LocalStorage(StoreLocation::STORAGE_KEY))
    }

    /// Load from a location; missing or unreadable data yields defaults
    pub fn load(location: StoreLocation) -> Self {
        let data = match Self::try_load(&location) {
            Ok(Some(data)) => {
                log::info!("Loaded profile: {} coins, {} jumps", data.coins, data.max_jumps);
                data
            }
            Ok(None) => {
                log::info!("No profile found, starting fresh");
                ProfileData::default()
            }
            Err(e) => {
                log::warn!("Profile unreadable ({}), starting fresh", e);
                ProfileData::default()
            }
        };
        Self { data, location }
    }

    fn try_load(location: &StoreLocation) -> Result<Option<ProfileData>, StoreError> {
        match location.read()? {
            Some(json) => Ok(Some(ProfileData::from_json(&json)?)),
            None => Ok(None),
        }
    }

    /// Write the current document
    pub fn save(&self) -> Result<(), StoreError> {
        let json = self.data.to_json()?;
        self.location.write(&json)
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            log::warn!("Profile save failed: {}", e);
        }
    }

    pub fn data(&self) -> &ProfileData {
        &self.data
    }

    /// Mutate the document (shop, skin selection) and write it back
    pub fn update<R>(&mut self, f: impl FnOnce(&mut ProfileData) -> R) -> R {
        let result = f(&mut self.data);
        self.data = std::mem::take(&mut self.data).normalized();
        self.persist();
        result
    }
}

impl Profile for LocalProfile {
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
        self.persist();
    }

    fn report_score_if_record(&mut self, score: u64) -> bool {
        let record = self.data.record(score);
        if record {
            self.persist();
        }
        record
    }

    fn currency(&self) -> u64 {
        self.data.coins
    }

    fn high_score(&self) -> u64 {
        self.data.high_score
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::persistence::Upgrade;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("dino_dash_{}_{}.json", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_starts_fresh() {
        let profile = LocalProfile::open(temp_path("missing"));
        assert_eq!(profile.data(), &ProfileData::default());
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = temp_path("roundtrip");
        let mut profile = LocalProfile::open(&path);
        profile.add_currency(75);
        assert!(profile.report_score_if_record(321));
        let bought = profile.update(|d| d.purchase(Upgrade::DoubleJump));
        assert!(bought.is_ok());

        let reopened = LocalProfile::open(&path);
        assert_eq!(reopened.currency(), 25);
        assert_eq!(reopened.high_score(), 321);
        assert_eq!(reopened.jump_capacity(), 2);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_store_error_keeps_source() {
        use std::error::Error as _;

        let parse = serde_json::from_str::<ProfileData>("{").expect_err("truncated json");
        let err = StoreError::from(parse);
        assert!(matches!(err, StoreError::Parse(_)));
        assert!(err.to_string().starts_with("profile parse error: "));
        assert!(err.source().is_some());

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StoreError = io.into();
        assert_eq!(err.to_string(), "profile io error: denied");
        assert!(StoreError::Unavailable.source().is_none());
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{ not json").expect("write temp file");
        let profile = LocalProfile::open(&path);
        assert_eq!(profile.jump_capacity(), 1);
        let _ = std::fs::remove_file(&path);
    }
}
