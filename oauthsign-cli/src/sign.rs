use crate::{
    args::SignArgs,
    util::{load_config, load_signer, parse_method},
};
use http::{Request, header::AUTHORIZATION};
use miette::IntoDiagnostic;
use oauth1_signatures::Sign;

pub fn build_request(method: &str, url: &str, data: Option<&str>) -> miette::Result<Request<Vec<u8>>> {
    Request::builder()
        .method(parse_method(method)?)
        .uri(url)
        .body(data.map(|data| data.as_bytes().to_vec()).unwrap_or_default())
        .into_diagnostic()
}

pub async fn do_it(args: SignArgs) -> miette::Result<()> {
    let config = load_config(&args.request.config.config).await?;
    let signer = load_signer(&args.request.config.config, &config)?;

    let mut req = build_request(
        &args.request.method,
        &args.request.url,
        args.request.data.as_deref(),
    )?;

    match (args.nonce, args.timestamp) {
        (Some(nonce), Some(timestamp)) => signer.sign_with(&mut req, &nonce, timestamp)?,
        _ => signer.sign(&mut req)?,
    }

    let header = req.headers()[AUTHORIZATION].to_str().into_diagnostic()?;
    println!("{header}");

    Ok(())
}
