use crate::{
    args::ConfigArgs,
    util::{error_kaomoji, load_config, load_signer, success_kaomoji},
};

pub async fn do_it(args: ConfigArgs) -> miette::Result<()> {
    let config = load_config(&args.config).await?;
    let signer = match load_signer(&args.config, &config) {
        Ok(signer) => signer,
        Err(err) => return Err(err.wrap_err(format!("Key store is unusable {}", error_kaomoji()))),
    };

    println!("✅ Key store is valid! {}", success_kaomoji());
    println!("consumer key: {}", signer.consumer_key());
    println!("key size:     {} bits", signer.signing_key().modulus_len() * 8);

    Ok(())
}
