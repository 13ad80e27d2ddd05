use crate::{
    args::RequestArgs,
    util::{load_config, load_signer},
};
use miette::IntoDiagnostic;
use oauthsign_http_client::{Body, Client};
use std::time::Duration;

pub async fn do_it(args: RequestArgs) -> miette::Result<()> {
    let config = load_config(&args.config.config).await?;
    let signer = load_signer(&args.config.config, &config)?;

    let mut builder = Client::builder().signer(signer);
    if let Some(timeout_secs) = config.client.timeout_secs {
        builder = builder.timeout(Some(Duration::from_secs(timeout_secs)));
    }
    if let Some(ref user_agent) = config.client.user_agent {
        builder = builder.user_agent(user_agent.as_str()).into_diagnostic()?;
    }
    if let Some(body_limit) = config.client.body_limit {
        builder = builder
            .content_length_limit(Some(body_limit))
            .request_body_limit(Some(body_limit));
    }
    let client = builder.build().into_diagnostic()?;

    let req = crate::sign::build_request(&args.method, &args.url, args.data.as_deref())?
        .map(Body::from);
    let response = client.execute(req).await.into_diagnostic()?;

    println!("{:?} {}", response.version(), response.status());
    for (name, value) in response.headers() {
        println!("{name}: {}", String::from_utf8_lossy(value.as_bytes()));
    }
    println!();
    println!("{}", response.text().await.into_diagnostic()?);

    Ok(())
}
