use std::path::PathBuf;

use anyhow::{bail, Context};

use crate::catalog::CatalogSource;

pub const DEFAULT_CATALOG_PATH: &str = "/app/data/products.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub catalog_source: CatalogSource,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup so tests don't have to touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let catalog_source = match lookup("CATALOG_SOURCE")
            .unwrap_or_else(|| "file".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "static" => CatalogSource::Static,
            "file" => CatalogSource::File(PathBuf::from(
                lookup("CATALOG_PATH").unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string()),
            )),
            other => bail!("CATALOG_SOURCE must be `file` or `static`, got `{}`", other),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            catalog_source,
        })
    }
}
