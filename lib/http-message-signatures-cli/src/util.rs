use crate::args::BodyArgs;
use miette::IntoDiagnostic;
use owo_colors::{OwoColorize, Stream};
use std::fmt::Display;
use tokio::fs;

#[inline]
pub fn error_kaomoji() -> impl Display {
    "(┬┬﹏┬┬)".if_supports_color(Stream::Stdout, |text| text.red())
}

#[inline]
pub fn success_kaomoji() -> impl Display {
    "(^///^)".if_supports_color(Stream::Stdout, |text| text.green())
}

/// Read the body from the command line or from a file, an absent body is empty
pub async fn read_body(args: BodyArgs) -> miette::Result<Vec<u8>> {
    if let Some(path) = args.body_file {
        return fs::read(path).await.into_diagnostic();
    }

    Ok(args.body.map(String::into_bytes).unwrap_or_default())
}
