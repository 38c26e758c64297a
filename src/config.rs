use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Port the HTTP server listens on
    pub port: u16,
    /// Path to the SQLite database
    pub database_path: PathBuf,
    /// Directory uploaded images are stored in and served from
    pub upload_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("inkpad");
        Self {
            port: 8080,
            database_path: data_dir.join("inkpad.db"),
            upload_dir: data_dir.join("uploads"),
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut config = Self::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            config = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;
        }

        // Apply environment variable overrides
        if let Ok(port) = std::env::var("INKPAD_PORT") {
            config.port = port.parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Ok(db_path) = std::env::var("INKPAD_DATABASE_PATH") {
            config.database_path = PathBuf::from(db_path);
        }
        if let Ok(upload_dir) = std::env::var("INKPAD_UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(upload_dir);
        }

        Ok(config)
    }

    /// Default config file path: ~/.config/inkpad/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("inkpad")
            .join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidPort(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    e
                )
            }
            ConfigError::InvalidPort(port) => {
                write!(f, "Invalid port number: {}", port)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // Config::load reads process-wide env vars, so tests that set or depend
    // on them must not interleave
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert!(config.database_path.to_string_lossy().contains("inkpad.db"));
        assert!(config.upload_dir.to_string_lossy().contains("uploads"));
    }

    #[test]
    fn test_load_no_file_uses_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_load_from_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "port: 9000").unwrap();
        writeln!(file, "database_path: /custom/path/canvas.db").unwrap();
        writeln!(file, "upload_dir: /custom/uploads").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(
            config.database_path,
            PathBuf::from("/custom/path/canvas.db")
        );
        assert_eq!(config.upload_dir, PathBuf::from("/custom/uploads"));
    }

    #[test]
    fn test_env_var_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "database_path: /from/file.db").unwrap();

        // Set env var
        std::env::set_var("INKPAD_DATABASE_PATH", "/from/env.db");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/from/env.db"));

        // Clean up
        std::env::remove_var("INKPAD_DATABASE_PATH");
    }

    #[test]
    fn test_invalid_port_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("INKPAD_PORT", "not-a-port");

        let temp_dir = tempdir().unwrap();
        let result = Config::load(Some(temp_dir.path().join("none.yaml")));
        assert!(matches!(result, Err(ConfigError::InvalidPort(_))));

        std::env::remove_var("INKPAD_PORT");
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
