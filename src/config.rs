use std::path::PathBuf;

use crossterm::style::Stylize;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::default_colors::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    bold:   bool,
    italic: bool,
    color:  crossterm::style::Color,
}

impl StyleConfig {
    fn style(&self, s: impl ToString) -> String {
        let mut s = s.to_string().with(self.color);
        if self.bold {
            s = s.bold();
        }
        if self.italic {
            s = s.italic();
        }
        s.to_string()
    }
}

pub trait Styleable {
    fn style(&self, c: &StyleConfig) -> String;
}

impl<T> Styleable for T
where
    T: ToString + std::fmt::Display,
{
    fn style(&self, c: &StyleConfig) -> String {
        c.style(self)
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color:  COLOR_WHITE,
            bold:   false,
            italic: false,
        }
    }
}

/// How one kind of value is printed by the command line interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub prefix:            String,
    pub suffix:            String,
    pub description:       String,
    pub style_prefix:      StyleConfig,
    pub style_suffix:      StyleConfig,
    pub style_description: StyleConfig,
    pub style_content:     StyleConfig,
}

impl OutputConfig {
    pub fn format(&self, content: impl ToString) -> String {
        let prefix = self.prefix.style(&self.style_prefix);
        let suffix = self.suffix.style(&self.style_suffix);
        let content = content.to_string().style(&self.style_content);
        if self.description.is_empty() {
            format!("{prefix}{content}{suffix}")
        } else {
            let description = self.description.style(&self.style_description);
            format!("{prefix}{description} {content}{suffix}")
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix:            "".into(),
            suffix:            "".into(),
            description:       "".into(),
            style_prefix:      StyleConfig::default(),
            style_suffix:      StyleConfig::default(),
            style_description: StyleConfig {
                italic: true,
                ..StyleConfig::default()
            },
            style_content:     StyleConfig::default(),
        }
    }
}

/// Where and how catalog searches are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub endpoint:     String,
    pub max_results:  u32,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint:     "https://www.googleapis.com/books/v1/volumes".into(),
            max_results:  40,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_location: PathBuf,
    pub log_level:         String,
    pub catalog:           CatalogConfig,
    pub output_series:     OutputConfig,
    pub output_book:       OutputConfig,
    pub output_author:     OutputConfig,
    pub output_status:     OutputConfig,
    pub output_timestamp:  OutputConfig,
    pub output_rating:     OutputConfig,
    pub output_error:      OutputConfig,
}

impl Config {
    pub fn default_as_string() -> Result<String, toml::ser::Error> {
        toml::to_string(&Self::default())
    }

    /// Defaults, overridden by `config.toml`, overridden by `SERIATIM_*` environment variables.
    /// Nested keys use a double underscore, e.g. `SERIATIM_CATALOG__MAX_RESULTS`.
    pub fn read_config() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("SERIATIM_").split("__"))
    }

    /// Database location with `~` and environment variables expanded.
    pub fn database_path(&self) -> PathBuf {
        let location = self.database_location.to_string_lossy();
        match shellexpand::full(&location) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(_) => self.database_location.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_location: PathBuf::from("~/.local/share/seriatim/database"),
            log_level:         "warn".into(),
            catalog:           CatalogConfig::default(),
            output_series:     OutputConfig {
                style_content: StyleConfig {
                    color: COLOR_SERIES,
                    bold: true,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_book:       OutputConfig {
                style_content: StyleConfig {
                    color: COLOR_BOOK,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_author:     OutputConfig {
                description: "by".into(),
                style_content: StyleConfig {
                    color: COLOR_AUTHOR,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_status:     OutputConfig {
                prefix: "[".into(),
                suffix: "]".into(),
                style_content: StyleConfig {
                    color: COLOR_STATUS,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_timestamp:  OutputConfig {
                description: "Last read:".into(),
                style_description: StyleConfig {
                    color: COLOR_DIMMED,
                    italic: true,
                    ..StyleConfig::default()
                },
                style_content: StyleConfig {
                    color: COLOR_TIMESTAMP,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_rating:     OutputConfig {
                description: "Rating:".into(),
                style_content: StyleConfig {
                    color: COLOR_RATING,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_error:      OutputConfig {
                description: "Error:".into(),
                style_content: StyleConfig {
                    color: COLOR_ERROR,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
        }
    }
}
