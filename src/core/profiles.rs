//! Scale profile storage
//!
//! Profiles are standalone JSON files containing a [`Profile`]. They live in
//! the application's data directory under `profiles/`, each with a
//! `.json.sha256` sidecar used to spot hand edits.
//!
//! The engine never touches this module; it is the settings repository that
//! callers load scales from and save them back to. Saved `min`/`max` values
//! are informational only.

use crate::core::scale::{MAX_STEPS, Profile};
use crate::utils::get_data_dir;
use crate::validators::validate_scale;
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// The canonical name for the initial/fallback profile.
/// Protected from deletion and renaming.
pub const DEFAULT_PROFILE_NAME: &str = "default";

/// Error type for profile operations
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Invalid profile name: {0}")]
    InvalidName(String),

    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Profile already exists: {0}")]
    AlreadyExists(String),

    #[error("Profile '{name}' is invalid: {message}")]
    Invalid { name: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Data directory not available")]
    DataDirUnavailable,
}

/// Validates a profile name for filesystem safety.
///
/// Constraints:
/// - Alphanumeric, underscores, and hyphens only
/// - 1 to 64 chars
/// - Rejects "." and ".."
pub fn validate_profile_name(name: &str) -> Result<(), ProfileError> {
    if name.is_empty() {
        return Err(ProfileError::InvalidName("Name cannot be empty".into()));
    }

    if name.len() > 64 {
        return Err(ProfileError::InvalidName(
            "Name too long (max 64 chars)".into(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ProfileError::InvalidName(
            "Name contains invalid characters (use only a-z, 0-9, _, -)".into(),
        ));
    }

    if name == "." || name == ".." {
        return Err(ProfileError::InvalidName("Invalid name".into()));
    }

    Ok(())
}

fn checksum(json: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Directory-backed profile repository
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// A store rooted at `dir` (created on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The store under the XDG data directory
    pub fn open_default() -> Result<Self, ProfileError> {
        let mut dir = get_data_dir().ok_or(ProfileError::DataDirUnavailable)?;
        dir.push("profiles");
        Ok(Self::new(dir))
    }

    /// Returns the path to a specific profile file.
    /// Validates the name first to prevent directory traversal.
    pub fn profile_path(&self, name: &str) -> Result<PathBuf, ProfileError> {
        validate_profile_name(name)?;
        Ok(self.dir.join(format!("{name}.json")))
    }

    async fn ensure_dir(&self) -> Result<(), ProfileError> {
        if !tokio::fs::try_exists(&self.dir).await? {
            tokio::fs::create_dir_all(&self.dir).await?;
        }
        Ok(())
    }

    pub async fn exists(&self, name: &str) -> Result<bool, ProfileError> {
        let path = self.profile_path(name)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    /// Lists all available profile names, sorted.
    pub async fn list(&self) -> Result<Vec<String>, ProfileError> {
        if !tokio::fs::try_exists(&self.dir).await? {
            return Ok(Vec::new());
        }

        let mut profiles = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            if path.is_file()
                && path.extension().and_then(|s| s.to_str()) == Some("json")
                && let Some(name) = path.file_stem().and_then(|s| s.to_str())
            {
                profiles.push(name.to_string());
            }
        }

        profiles.sort();
        Ok(profiles)
    }

    /// Loads a profile by name.
    ///
    /// A checksum mismatch only warns (the file may have been edited by hand),
    /// but a scale over [`MAX_STEPS`] steps, or one that fails
    /// [`validate_scale`] (duplicate names or ids, out-of-range settings),
    /// is rejected.
    pub async fn load(&self, name: &str) -> Result<Profile, ProfileError> {
        let path = self.profile_path(name)?;

        if !tokio::fs::try_exists(&path).await? {
            return Err(ProfileError::NotFound(name.to_string()));
        }

        let json = tokio::fs::read_to_string(&path).await?;

        let mut checksum_path = path.clone();
        checksum_path.set_extension("json.sha256");

        if let Ok(expected) = tokio::fs::read_to_string(&checksum_path).await {
            let actual = checksum(&json);
            if expected.trim() != actual {
                tracing::warn!(
                    "Profile '{}' checksum mismatch (expected: {}, got: {})",
                    name,
                    expected.trim(),
                    actual
                );
            }
        }

        let profile: Profile = serde_json::from_str(&json)?;

        if let Some(scale) = profile.scales.iter().find(|s| s.steps.len() > MAX_STEPS) {
            return Err(ProfileError::Invalid {
                name: name.to_string(),
                message: format!(
                    "{} scale contains {} steps (max: {MAX_STEPS})",
                    scale.flavor,
                    scale.steps.len()
                ),
            });
        }

        for scale in &profile.scales {
            validate_scale(scale).map_err(|e| ProfileError::Invalid {
                name: name.to_string(),
                message: format!("{} scale: {e}", scale.flavor),
            })?;
        }

        tracing::debug!(
            "Loaded profile '{}' ({} scales, {} steps)",
            name,
            profile.scales.len(),
            profile.step_count()
        );
        Ok(profile)
    }

    /// Saves a profile atomically (temp file + rename) and writes its checksum.
    ///
    /// Stamps `saved_at` on the stored copy.
    pub async fn save(&self, name: &str, profile: &Profile) -> Result<(), ProfileError> {
        let path = self.profile_path(name)?;
        self.ensure_dir().await?;

        let mut stamped = profile.clone();
        stamped.saved_at = Some(chrono::Utc::now());
        let json = serde_json::to_string_pretty(&stamped)?;

        let mut temp_path = path.clone();
        temp_path.set_extension("json.tmp");

        #[cfg(unix)]
        {
            use tokio::fs::OpenOptions;
            use tokio::io::AsyncWriteExt;

            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .mode(0o600)
                .open(&temp_path)
                .await?;

            file.write_all(json.as_bytes()).await?;
            file.sync_all().await?;
        }

        #[cfg(not(unix))]
        {
            tokio::fs::write(&temp_path, &json).await?;
        }

        tokio::fs::rename(temp_path, &path).await?;

        let mut checksum_path = path.clone();
        checksum_path.set_extension("json.sha256");
        tokio::fs::write(checksum_path, checksum(&json)).await?;

        tracing::info!("Saved profile '{}'", name);
        Ok(())
    }

    /// Deletes a profile and its checksum. The default profile is protected.
    pub async fn delete(&self, name: &str) -> Result<(), ProfileError> {
        if name == DEFAULT_PROFILE_NAME {
            return Err(ProfileError::InvalidName(
                "Cannot delete default profile".into(),
            ));
        }

        let path = self.profile_path(name)?;
        if !tokio::fs::try_exists(&path).await? {
            return Err(ProfileError::NotFound(name.to_string()));
        }
        tokio::fs::remove_file(&path).await?;

        let mut checksum_path = path;
        checksum_path.set_extension("json.sha256");
        if tokio::fs::try_exists(&checksum_path).await? {
            tokio::fs::remove_file(checksum_path).await?;
        }
        Ok(())
    }

    /// Renames a profile. The default profile is protected and the new name
    /// must be free.
    pub async fn rename(&self, old_name: &str, new_name: &str) -> Result<(), ProfileError> {
        validate_profile_name(new_name)?;

        if old_name == DEFAULT_PROFILE_NAME {
            return Err(ProfileError::InvalidName(
                "Cannot rename default profile".into(),
            ));
        }

        let old_path = self.profile_path(old_name)?;
        let new_path = self.profile_path(new_name)?;

        if !tokio::fs::try_exists(&old_path).await? {
            return Err(ProfileError::NotFound(old_name.to_string()));
        }
        if tokio::fs::try_exists(&new_path).await? {
            return Err(ProfileError::AlreadyExists(new_name.to_string()));
        }

        tokio::fs::rename(&old_path, &new_path).await?;

        let mut old_checksum = old_path;
        old_checksum.set_extension("json.sha256");
        if tokio::fs::try_exists(&old_checksum).await? {
            let mut new_checksum = new_path;
            new_checksum.set_extension("json.sha256");
            tokio::fs::rename(old_checksum, new_checksum).await?;
        }
        Ok(())
    }
}
