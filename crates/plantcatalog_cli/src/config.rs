//! Database location resolution for the CLI.

use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "PLANT_CATALOG_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "plantcatalog.sqlite3";

/// Picks the catalog database path.
///
/// Order: explicit `--db`, then a non-blank `PLANT_CATALOG_DB_PATH`, then
/// `<temp_dir>/plantcatalog.sqlite3`.
pub fn resolve_db_path(explicit: Option<PathBuf>) -> PathBuf {
    resolve_with_env(explicit, std::env::var(DB_PATH_ENV).ok())
}

fn resolve_with_env(explicit: Option<PathBuf>, env_value: Option<String>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    env_value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::resolve_with_env;
    use std::path::PathBuf;

    #[test]
    fn explicit_path_wins() {
        let path = resolve_with_env(
            Some(PathBuf::from("/data/a.sqlite3")),
            Some("/data/b.sqlite3".to_string()),
        );
        assert_eq!(path, PathBuf::from("/data/a.sqlite3"));
    }

    #[test]
    fn env_value_is_trimmed() {
        let path = resolve_with_env(None, Some("  /data/b.sqlite3 ".to_string()));
        assert_eq!(path, PathBuf::from("/data/b.sqlite3"));
    }

    #[test]
    fn blank_env_falls_back_to_temp_dir() {
        let path = resolve_with_env(None, Some("   ".to_string()));
        assert_eq!(path, std::env::temp_dir().join("plantcatalog.sqlite3"));
    }
}
