use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::filter::PerPage;
use crate::theme::Theme;

pub const KEY_PER_PAGE: &str = "perPage";
pub const KEY_TRANSLATIONS: &str = "translations";
pub const KEY_TRANSLATION_STATES: &str = "translationStates";
pub const KEY_THEME: &str = "theme";

/// Persistent key/value preferences, one SQLite file per user.
pub struct PrefStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl PrefStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open preferences at {}", path.display()))?;
        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.init()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        store.init()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    // --- Raw access ---

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read preference '{}'", key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO preferences (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
                params![key, value],
            )
            .with_context(|| format!("Failed to write preference '{}'", key))?;
        Ok(())
    }

    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM preferences ORDER BY key")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to list preferences")
    }

    // --- Typed preferences ---

    /// Stored page size, or the default when unset or not an allowed size.
    pub fn per_page(&self) -> Result<PerPage> {
        let Some(raw) = self.get(KEY_PER_PAGE)? else {
            return Ok(PerPage::default());
        };
        match raw.trim().parse::<u32>().ok().and_then(PerPage::new) {
            Some(per_page) => Ok(per_page),
            None => {
                warn!(value = %raw, "ignoring stored perPage");
                Ok(PerPage::default())
            }
        }
    }

    pub fn set_per_page(&self, per_page: PerPage) -> Result<()> {
        self.set(KEY_PER_PAGE, &per_page.to_string())
    }

    pub fn theme(&self) -> Result<Theme> {
        Ok(self
            .get(KEY_THEME)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default())
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.set(KEY_THEME, theme.as_str())
    }

    pub fn translations(&self) -> Result<HashMap<i64, String>> {
        self.get_json_map(KEY_TRANSLATIONS)
    }

    pub fn set_translations(&self, translations: &HashMap<i64, String>) -> Result<()> {
        self.set(KEY_TRANSLATIONS, &serde_json::to_string(translations)?)
    }

    pub fn translation_states(&self) -> Result<HashMap<i64, bool>> {
        self.get_json_map(KEY_TRANSLATION_STATES)
    }

    pub fn set_translation_states(&self, states: &HashMap<i64, bool>) -> Result<()> {
        self.set(KEY_TRANSLATION_STATES, &serde_json::to_string(states)?)
    }

    fn get_json_map<V: serde::de::DeserializeOwned>(&self, key: &str) -> Result<HashMap<i64, V>> {
        let Some(raw) = self.get(key)? else {
            return Ok(HashMap::new());
        };
        // serde_json reads integer-looking object keys straight into i64
        match serde_json::from_str(&raw) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable preference");
                Ok(HashMap::new())
            }
        }
    }
}
