use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    /// Path to the configuration file
    #[arg(default_value = "config.toml", long, short)]
    pub config: PathBuf,
}

#[derive(Args)]
pub struct RequestArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// HTTP method of the request
    #[arg(default_value = "GET", long, short = 'X')]
    pub method: String,

    /// Request body
    #[arg(long, short)]
    pub data: Option<String>,

    /// Absolute URL the request is sent to
    pub url: String,
}

#[derive(Args)]
pub struct SignArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Use this nonce instead of a random one
    #[arg(long, requires = "timestamp")]
    pub nonce: Option<String>,

    /// Use this Unix timestamp instead of the current time
    #[arg(long, requires = "nonce")]
    pub timestamp: Option<u64>,
}

#[derive(Args)]
pub struct ParseHeaderArgs {
    /// The header to parse
    pub header: String,
}

#[derive(Subcommand)]
pub enum ToolSubcommand {
    /// Load the key store and report whether it is usable
    CheckKeyStore(ConfigArgs),

    /// Parse an OAuth `Authorization` header and report any format errors
    ParseHeader(ParseHeaderArgs),

    /// Sign the request and send it
    Request(RequestArgs),

    /// Sign the request and print the `Authorization` header
    Sign(SignArgs),
}

/// Sign HTTP requests with OAuth 1.0a `RSA-SHA256` signatures
#[derive(Parser)]
#[command(about, version)]
pub struct ToolArgs {
    #[clap(subcommand)]
    pub subcommand: ToolSubcommand,
}

#[cfg(test)]
mod test {
    use super::{ToolArgs, ToolSubcommand};
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_args() {
        ToolArgs::command().debug_assert();
    }

    #[test]
    fn sign_defaults() {
        let args = ToolArgs::parse_from(["oauthsign", "sign", "https://api.example.com"]);
        let ToolSubcommand::Sign(args) = args.subcommand else {
            panic!("parsed into the wrong subcommand");
        };

        assert_eq!(args.request.method, "GET");
        assert_eq!(args.request.config.config.to_str(), Some("config.toml"));
        assert!(args.request.data.is_none());
        assert!(args.nonce.is_none());
    }

    #[test]
    fn nonce_requires_timestamp() {
        let result = ToolArgs::try_parse_from([
            "oauthsign",
            "sign",
            "--nonce",
            "kllo9940pd9333jh",
            "https://api.example.com",
        ]);

        assert!(result.is_err());
    }
}
