//! Layered configuration and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` +
//! `config.<env>.toml` + `WIKIQA_*` env vars (`__` separates nested keys,
//! e.g. `WIKIQA_EVAL__TOP_K=5`).
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

use crate::error::Error;
use crate::types::{NormalizationMode, RankingFunction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub data: DataSettings,
    pub index: IndexSettings,
    pub eval: EvalSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    pub corpus_dir: String,
    pub quiz_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSettings {
    pub writer_heap_bytes: usize,
    pub indices: Vec<IndexSpec>,
}

/// One index on disk and the normalization it was built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub lemmatize: bool,
    #[serde(default)]
    pub stem: bool,
}

impl IndexSpec {
    pub fn for_mode(mode: NormalizationMode, root: &str) -> Self {
        Self {
            name: mode.name().to_string(),
            path: format!("{}/{}", root.trim_end_matches('/'), mode.name()),
            lemmatize: mode == NormalizationMode::Lemmatize,
            stem: mode == NormalizationMode::Stem,
        }
    }

    pub fn mode(&self) -> NormalizationMode {
        NormalizationMode::from_flags(self.lemmatize, self.stem)
    }

    pub fn resolved_path(&self) -> PathBuf {
        expand_path(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalSettings {
    pub top_k: usize,
    pub ranking_functions: Vec<RankingFunction>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data: DataSettings {
                corpus_dir: "data/wiki-subset".to_string(),
                quiz_file: "data/questions.txt".to_string(),
            },
            index: IndexSettings {
                writer_heap_bytes: 50_000_000,
                indices: [
                    NormalizationMode::None,
                    NormalizationMode::Stem,
                    NormalizationMode::Lemmatize,
                ]
                .into_iter()
                .map(|mode| IndexSpec::for_mode(mode, "data/index"))
                .collect(),
            },
            eval: EvalSettings {
                top_k: 10,
                ranking_functions: RankingFunction::ALL.to_vec(),
            },
        }
    }
}

impl Settings {
    pub fn validate(&self) -> crate::Result<()> {
        if self.eval.top_k == 0 {
            return Err(Error::InvalidConfiguration(
                "eval.top_k must be at least 1".to_string(),
            ));
        }
        if self.eval.ranking_functions.is_empty() {
            return Err(Error::InvalidConfiguration(
                "eval.ranking_functions must not be empty".to_string(),
            ));
        }
        if self.index.indices.is_empty() {
            return Err(Error::InvalidConfiguration(
                "index.indices must list at least one index".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for spec in &self.index.indices {
            if !seen.insert(spec.name.as_str()) {
                return Err(Error::InvalidConfiguration(format!(
                    "duplicate index name '{}'",
                    spec.name
                )));
            }
        }
        Ok(())
    }

    pub fn index_named(&self, name: &str) -> Option<&IndexSpec> {
        self.index.indices.iter().find(|spec| spec.name == name)
    }

    pub fn corpus_dir(&self) -> PathBuf {
        expand_path(&self.data.corpus_dir)
    }

    pub fn quiz_file(&self) -> PathBuf {
        expand_path(&self.data.quiz_file)
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("WIKIQA_").split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// The full typed settings, validated.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
