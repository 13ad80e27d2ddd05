use eyre::{WrapErr, bail};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{env, fmt, path::PathBuf};

#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    pub consumer_key: SmolStr,
    pub path: PathBuf,
    pub password: Option<SmolStr>,
    pub password_env: Option<SmolStr>,
}

impl Configuration {
    /// Check that exactly one password source is set
    pub fn validate(&self) -> eyre::Result<()> {
        match (&self.password, &self.password_env) {
            (Some(..), Some(..)) => {
                bail!("`password` and `password-env` are mutually exclusive")
            }
            (None, None) => bail!("either `password` or `password-env` has to be set"),
            _ => Ok(()),
        }
    }

    /// Resolve the key store password, reading the environment if configured to
    pub fn password(&self) -> eyre::Result<String> {
        self.validate()?;

        if let Some(ref password) = self.password {
            return Ok(password.to_string());
        }

        let Some(ref var) = self.password_env else {
            bail!("either `password` or `password-env` has to be set");
        };

        env::var(var.as_str())
            .wrap_err_with(|| format!("Couldn't read key store password from `{var}`"))
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("consumer_key", &self.consumer_key)
            .field("path", &self.path)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("password_env", &self.password_env)
            .finish()
    }
}
