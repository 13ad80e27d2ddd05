use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<SmolStr>,
    pub body_limit: Option<usize>,
}
