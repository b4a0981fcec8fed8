use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level TOML configuration. Every provider section is optional; with
/// no file at all the tool runs fully offline against the local store.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub supabase: Option<SupabaseConfig>,
    #[serde(default)]
    pub youtube: Option<YoutubeConfig>,
    #[serde(default)]
    pub openrouter: Option<OpenRouterConfig>,
}

/// Remote backend (Supabase project) used for account sync.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SupabaseConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Project base URL, e.g. https://abcdefg.supabase.co
    pub url: String,
    pub anon_key: String,
}

/// Video metadata lookup for `add --video-id`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct YoutubeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub api_key: String,
}

/// Title analysis service used to refine mood recommendations.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OpenRouterConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub api_key: String,
    #[serde(default = "default_openrouter_model")]
    pub model: String,
}

fn default_true() -> bool {
    true
}

pub fn default_openrouter_model() -> String {
    "openai/gpt-4o-mini".to_string()
}

const URL_PLACEHOLDER: &str = "https://YOUR_PROJECT.supabase.co";
const KEY_PLACEHOLDER_PREFIX: &str = "YOUR_";

fn is_placeholder(value: &str) -> bool {
    value.is_empty() || value.starts_with(KEY_PLACEHOLDER_PREFIX) || value == URL_PLACEHOLDER
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config, treating a missing file as an empty config.
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Scaffold written by `nextup config init`; every value is a
    /// placeholder the user replaces.
    pub fn template() -> Self {
        Self {
            supabase: Some(SupabaseConfig {
                enabled: true,
                url: URL_PLACEHOLDER.to_string(),
                anon_key: "YOUR_ANON_KEY".to_string(),
            }),
            youtube: Some(YoutubeConfig {
                enabled: true,
                api_key: "YOUR_YOUTUBE_API_KEY".to_string(),
            }),
            openrouter: Some(OpenRouterConfig {
                enabled: true,
                api_key: "YOUR_OPENROUTER_API_KEY".to_string(),
                model: default_openrouter_model(),
            }),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(ref supabase) = self.supabase {
            if supabase.enabled {
                if is_placeholder(&supabase.url) {
                    return Err(anyhow::anyhow!("Supabase is enabled but url is not configured"));
                }
                if !supabase.url.starts_with("http://") && !supabase.url.starts_with("https://") {
                    return Err(anyhow::anyhow!("Supabase url must start with http:// or https://"));
                }
                if is_placeholder(&supabase.anon_key) {
                    return Err(anyhow::anyhow!("Supabase is enabled but anon_key is not configured"));
                }
            }
        }
        if let Some(ref youtube) = self.youtube {
            if youtube.enabled && is_placeholder(&youtube.api_key) {
                return Err(anyhow::anyhow!("YouTube is enabled but api_key is not configured"));
            }
        }
        if let Some(ref openrouter) = self.openrouter {
            if openrouter.enabled && is_placeholder(&openrouter.api_key) {
                return Err(anyhow::anyhow!("OpenRouter is enabled but api_key is not configured"));
            }
        }
        Ok(())
    }

    pub fn is_supabase_configured(&self) -> bool {
        match self.supabase {
            Some(ref s) => s.enabled && !is_placeholder(&s.url) && !is_placeholder(&s.anon_key),
            None => false,
        }
    }

    pub fn is_youtube_configured(&self) -> bool {
        match self.youtube {
            Some(ref y) => y.enabled && !is_placeholder(&y.api_key),
            None => false,
        }
    }

    pub fn is_openrouter_configured(&self) -> bool {
        match self.openrouter {
            Some(ref o) => o.enabled && !is_placeholder(&o.api_key),
            None => false,
        }
    }

    /// List of configured and enabled providers, for `config show`.
    pub fn configured_providers(&self) -> Vec<String> {
        let mut providers = Vec::new();
        if self.is_supabase_configured() {
            providers.push("supabase".to_string());
        }
        if self.is_youtube_configured() {
            providers.push("youtube".to_string());
        }
        if self.is_openrouter_configured() {
            providers.push("openrouter".to_string());
        }
        providers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let config = Config {
            supabase: Some(SupabaseConfig {
                enabled: true,
                url: "https://example.supabase.co".to_string(),
                anon_key: "anon-key".to_string(),
            }),
            youtube: None,
            openrouter: Some(OpenRouterConfig {
                enabled: true,
                api_key: "or-key".to_string(),
                model: default_openrouter_model(),
            }),
        };

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.supabase.as_ref().unwrap().url, "https://example.supabase.co");
        assert_eq!(loaded.openrouter.as_ref().unwrap().model, "openai/gpt-4o-mini");
        assert!(loaded.youtube.is_none());
    }

    #[test]
    fn test_missing_sections_default_to_none() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.supabase.is_none());
        assert!(!config.is_supabase_configured());
        assert!(config.configured_providers().is_empty());
    }

    #[test]
    fn test_model_defaults_when_omitted() {
        let config: Config = toml::from_str(
            "[openrouter]\napi_key = \"k\"\n",
        )
        .unwrap();
        assert_eq!(config.openrouter.unwrap().model, "openai/gpt-4o-mini");
    }

    #[test]
    fn test_validate_rejects_placeholders() {
        let config = Config::template();
        assert!(config.validate().is_err());
        assert!(!config.is_supabase_configured());
    }

    #[test]
    fn test_load_or_default_with_missing_file() {
        let path = PathBuf::from("/nonexistent/nextup/config.toml");
        let config = Config::load_or_default(&path).unwrap();
        assert!(config.supabase.is_none());
    }
}
