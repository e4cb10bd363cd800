use crate::{args::RequestArgs, config, util};
use http::Request;
use http_message_signatures::{HttpSigner, HttpVerifier, SigningConfig};
use miette::IntoDiagnostic;
use tracing::info;

async fn prepare(args: RequestArgs) -> miette::Result<(SigningConfig, Request<Vec<u8>>)> {
    let config = config::load(&args.config).await?;
    let body = util::read_body(args.body).await?;

    let mut request = Request::builder()
        .method(args.method)
        .uri(args.url)
        .body(body)
        .into_diagnostic()?;
    request.headers_mut().extend(args.headers);

    Ok((config, request))
}

pub async fn sign(args: RequestArgs) -> miette::Result<()> {
    let (config, request) = prepare(args).await?;

    let signer = HttpSigner::builder().config(config).build();
    let signed = signer.sign(&request, request.body()).await?;

    for (name, value) in signed.iter() {
        println!("{name}: {}", value.to_str().into_diagnostic()?);
    }

    Ok(())
}

pub async fn verify(args: RequestArgs) -> miette::Result<()> {
    let (config, request) = prepare(args).await?;

    let verifier = HttpVerifier::builder().config(config).build();
    if verifier.verify_request(&request).await? {
        info!("signature verified");
        println!("✅ Signature is valid! {}", util::success_kaomoji());
        Ok(())
    } else {
        miette::bail!("Signature is invalid {}", util::error_kaomoji());
    }
}
