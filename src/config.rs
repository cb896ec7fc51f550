//! Configuration management for the resume coach

use crate::error::{Result, ResumeCoachError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub generation: GenerationConfig,
    pub compression: CompressionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Fast-tier hosted model used for every turn.
    pub model: String,
    pub api_url: String,
    /// Environment variable holding the required API key.
    pub api_key_env: String,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub endpoint: String,
    /// Environment variable holding the optional API key. Absence
    /// disables compression, it never blocks a turn.
    pub api_key_env: String,
    /// Nominal fraction of tokens to keep removing (0.5 = halve).
    pub target_ratio: f32,
    /// Instruction sent alongside the job description text.
    pub preserve_prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation: GenerationConfig {
                model: "gemini-2.5-flash".to_string(),
                api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                api_key_env: "GEMINI_API_KEY".to_string(),
                max_output_tokens: 2048,
            },
            compression: CompressionConfig {
                endpoint: "https://api.scaledown.xyz/compress/raw".to_string(),
                api_key_env: "SCALEDOWN_API_KEY".to_string(),
                target_ratio: 0.5,
                preserve_prompt: "Extract key requirements, skills, and responsibilities."
                    .to_string(),
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeCoachError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeCoachError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-coach")
            .join("config.toml")
    }

    /// Resolve the generation credential from the environment.
    /// Credentials are never stored in the config file.
    pub fn generation_api_key(&self) -> Option<String> {
        read_env_key(&self.generation.api_key_env)
    }

    /// Resolve the optional compression credential from the environment.
    pub fn compression_api_key(&self) -> Option<String> {
        read_env_key(&self.compression.api_key_env)
    }
}

fn read_env_key(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(val) if !val.trim().is_empty() => Some(val),
        // Missing, empty, or non-unicode all count as absent: a credential
        // must be a usable string or it is no credential at all.
        _ => None,
    }
}
