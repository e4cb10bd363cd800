use crate::{args::DigestArgs, util};
use http_message_signatures::digest;

pub async fn do_it(args: DigestArgs) -> miette::Result<()> {
    let body = util::read_body(args.body).await?;

    match digest::compute(&body, args.algorithm.into()) {
        Some(digest) => println!("content-digest: {digest}"),
        None => println!("Empty body, no digest {}", util::error_kaomoji()),
    }

    Ok(())
}
