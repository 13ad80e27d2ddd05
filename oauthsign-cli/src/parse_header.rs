use crate::util::success_kaomoji;

pub fn do_it(header: &'static str) -> miette::Result<()> {
    let parameters = match oauth1_signatures::oauth1::parse(header) {
        Ok(parameters) => parameters,
        Err(err) => return Err(miette::Error::new(err).with_source_code(header)),
    };

    println!("✅ Header is valid! {}", success_kaomoji());
    println!("consumer key:     {}", parameters.consumer_key);
    println!("signature method: {}", parameters.signature_method);
    println!("timestamp:        {}", parameters.timestamp);
    println!("nonce:            {}", parameters.nonce);
    println!("body hash:        {}", parameters.body_hash);

    Ok(())
}
