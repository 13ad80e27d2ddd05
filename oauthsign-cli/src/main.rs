use self::args::{ToolArgs, ToolSubcommand};
use clap::Parser;

mod args;
mod check_key_store;
mod parse_header;
mod request;
mod sign;
mod util;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    miette::set_panic_hook();
    oauthsign_observability::initialise().map_err(|err| miette::miette!("{err:?}"))?;

    let args = ToolArgs::parse();
    match args.subcommand {
        ToolSubcommand::CheckKeyStore(args) => check_key_store::do_it(args).await,
        ToolSubcommand::ParseHeader(args) => parse_header::do_it(args.header.leak()),
        ToolSubcommand::Request(args) => request::do_it(args).await,
        ToolSubcommand::Sign(args) => sign::do_it(args).await,
    }
}
