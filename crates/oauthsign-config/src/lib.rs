#![forbid(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, forbidden_lint_groups)]

pub mod client;
pub mod key_store;

use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    pub key_store: key_store::Configuration,
    #[serde(default)]
    pub client: client::Configuration,
}

impl Configuration {
    pub async fn load<P>(path: P) -> eyre::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("Couldn't read configuration file {}", path.display()))?;

        content.parse()
    }
}

impl std::str::FromStr for Configuration {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s)?;
        config.key_store.validate()?;

        Ok(config)
    }
}
