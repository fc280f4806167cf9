use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::api_connection::{ApiConnectionError, Provider, ProviderKind};
use crate::cli::Cli;
use crate::error::{DiaryError, Result};

pub const OPENAI_API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
pub const OPENROUTER_API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

/// Contents of the optional `keys.json` file.
#[derive(Debug, Default, Deserialize)]
pub struct KeysFile {
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub openrouter_api_key: Option<String>,
}

impl KeysFile {
    fn key_for(&self, kind: ProviderKind) -> Option<&str> {
        match kind {
            ProviderKind::OpenAi => self.openai_api_key.as_deref(),
            ProviderKind::OpenRouter => self.openrouter_api_key.as_deref(),
        }
    }
}

/// Settings for one run. Built once at start-up and never changed afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_file: PathBuf,
    pub products_csv: PathBuf,
    pub output_csv: Option<PathBuf>,
    pub provider: ProviderKind,
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub model: String,
    pub request_timeout: Duration,
}

fn api_key_env_var(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::OpenAi => OPENAI_API_KEY_ENV_VAR,
        ProviderKind::OpenRouter => OPENROUTER_API_KEY_ENV_VAR,
    }
}

/// Reads the keys file; a missing file is not an error.
pub fn load_keys_file(path: &Path) -> Result<Option<KeysFile>> {
    if !path.exists() {
        debug!(path = %path.display(), "No keys file");
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

/// Environment value first, then the keys file.
pub fn resolve_api_key(
    kind: ProviderKind,
    env_value: Option<String>,
    keys: Option<&KeysFile>,
) -> Option<String> {
    env_value
        .filter(|key| !key.trim().is_empty())
        .or_else(|| keys.and_then(|k| k.key_for(kind)).map(str::to_string))
        .filter(|key| !key.trim().is_empty())
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if cli.timeout_secs == 0 {
            return Err(DiaryError::Config(
                "timeout must be at least one second".to_string(),
            ));
        }
        if cli.model.trim().is_empty() {
            return Err(DiaryError::Config("model name is empty".to_string()));
        }

        let keys = load_keys_file(&cli.keys_file)?;
        let api_key = resolve_api_key(
            cli.provider,
            env::var(api_key_env_var(cli.provider)).ok(),
            keys.as_ref(),
        );

        Ok(Self {
            log_file: cli.log_file.clone(),
            products_csv: cli.products_csv.clone(),
            output_csv: cli.output_csv.clone(),
            provider: cli.provider,
            api_key,
            api_base_url: cli.api_base_url.clone(),
            model: cli.model.trim().to_string(),
            request_timeout: Duration::from_secs(cli.timeout_secs),
        })
    }

    pub fn build_provider(&self) -> std::result::Result<Provider, ApiConnectionError> {
        Provider::new(
            self.provider,
            self.api_key.clone(),
            self.api_base_url.clone(),
            self.request_timeout,
        )
    }
}
