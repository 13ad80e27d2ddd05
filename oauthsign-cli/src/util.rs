use miette::IntoDiagnostic;
use oauth1_signatures::Signer;
use oauthsign_config::Configuration;
use owo_colors::{OwoColorize, Stream};
use std::{fmt::Display, path::Path};

#[inline]
pub fn error_kaomoji() -> impl Display {
    "(┬┬﹏┬┬)".if_supports_color(Stream::Stdout, |text| text.red())
}

#[inline]
pub fn success_kaomoji() -> impl Display {
    "(^///^)".if_supports_color(Stream::Stdout, |text| text.green())
}

pub async fn load_config(path: &Path) -> miette::Result<Configuration> {
    Configuration::load(path)
        .await
        .map_err(|err| miette::miette!("{err:?}"))
}

/// Load the signer described by the configuration
///
/// Relative key store paths are resolved against the directory of the configuration file
pub fn load_signer(config_path: &Path, config: &Configuration) -> miette::Result<Signer> {
    let password = config
        .key_store
        .password()
        .map_err(|err| miette::miette!("{err:?}"))?;

    let key_store_path = config_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(&config.key_store.path);

    Signer::from_key_store(
        config.key_store.consumer_key.as_str(),
        &key_store_path,
        &password,
    )
    .map_err(|err| {
        miette::Report::new(err).wrap_err(format!(
            "Failed to load key store {}",
            key_store_path.display()
        ))
    })
}

pub fn parse_method(method: &str) -> miette::Result<http::Method> {
    method.to_uppercase().parse().into_diagnostic()
}
