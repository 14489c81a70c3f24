use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_tax_rate")]
    pub default_tax_rate: f64,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub setup_completed: bool,
    #[serde(default = "default_ocr_command")]
    pub ocr_command: String,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub google: GoogleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Mirror every local write immediately (otherwise only `sync push`).
    #[serde(default = "default_true")]
    pub auto_sync: bool,
    #[serde(default = "default_spreadsheet_name")]
    pub spreadsheet_name: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
}

fn default_currency() -> String {
    "EUR".to_string()
}
fn default_tax_rate() -> f64 {
    21.0
}
fn default_theme() -> String {
    "dark".to_string()
}
fn default_ocr_command() -> String {
    "tesseract {image} stdout".to_string()
}
fn default_true() -> bool {
    true
}
fn default_spreadsheet_name() -> String {
    "Taxibook".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_redirect_uri() -> String {
    "http://127.0.0.1:8085".to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            auto_sync: default_true(),
            spreadsheet_name: default_spreadsheet_name(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            currency: default_currency(),
            default_tax_rate: default_tax_rate(),
            theme: default_theme(),
            setup_completed: false,
            ocr_command: default_ocr_command(),
            sync: SyncConfig::default(),
            google: GoogleConfig {
                redirect_uri: default_redirect_uri(),
                ..GoogleConfig::default()
            },
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if let Ok(dir) = env::var("TAXIBOOK_HOME") {
            return PathBuf::from(dir);
        }
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("taxibook")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".taxibook")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("taxibook.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("taxibook.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Persist the configuration to the standard config file.
    pub fn save(&self) -> AppResult<()> {
        fs::create_dir_all(Self::config_dir())?;
        let yaml = serde_yaml::to_string(self)?;
        let mut file = fs::File::create(Self::config_file())?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Initialize configuration and database files.
    /// Returns the configuration that was written (or would have been, in test mode).
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        // keep the user's settings when re-initialising
        let mut config = if is_test {
            Self::with_database(db_path.clone())
        } else {
            let mut existing = Self::load()?;
            existing.database = db_path.to_string_lossy().to_string();
            existing
        };
        config.setup_completed = true;

        if !is_test {
            config.save()?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }

    pub fn validate_theme(theme: &str) -> AppResult<String> {
        match theme.to_lowercase().as_str() {
            t @ ("dark" | "light") => Ok(t.to_string()),
            other => Err(AppError::Config(format!(
                "Unknown theme '{}'. Use 'dark' or 'light'.",
                other
            ))),
        }
    }
}
