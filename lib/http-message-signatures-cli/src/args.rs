use clap::{Args, Parser, Subcommand, ValueEnum};
use http::{HeaderName, HeaderValue, Method};
use http_message_signatures::digest;
use std::path::PathBuf;

#[derive(Clone, Copy, PartialEq, ValueEnum)]
pub enum DigestAlgorithm {
    Sha256,
    Sha512,
    Md5,
}

impl From<DigestAlgorithm> for digest::Algorithm {
    fn from(value: DigestAlgorithm) -> Self {
        match value {
            DigestAlgorithm::Sha256 => Self::Sha256,
            DigestAlgorithm::Sha512 => Self::Sha512,
            DigestAlgorithm::Md5 => Self::Md5,
        }
    }
}

fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `name: value`, got `{raw}`"))?;

    let name = HeaderName::try_from(name.trim()).map_err(|error| error.to_string())?;
    let value = HeaderValue::try_from(value.trim()).map_err(|error| error.to_string())?;

    Ok((name, value))
}

#[derive(Args)]
pub struct BodyArgs {
    /// Request body
    #[arg(long, short, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// File to read the request body from
    #[arg(long)]
    pub body_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct RequestArgs {
    /// Path to the TOML configuration
    #[arg(long, short)]
    pub config: PathBuf,

    /// Request method
    #[arg(default_value_t = Method::POST, long, short)]
    pub method: Method,

    /// Request URL
    pub url: String,

    /// Request header (`name: value`), may be repeated
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(HeaderName, HeaderValue)>,

    #[command(flatten)]
    pub body: BodyArgs,
}

#[derive(Args)]
pub struct DigestArgs {
    /// Algorithm of the digest
    #[arg(
        default_value_t = DigestAlgorithm::Sha256,
        long,
        short,
        value_enum,
    )]
    pub algorithm: DigestAlgorithm,

    #[command(flatten)]
    pub body: BodyArgs,
}

#[derive(Args)]
pub struct ParseInputArgs {
    /// The `Signature-Input` header value to parse
    pub header: String,
}

#[derive(Subcommand)]
pub enum ToolSubcommand {
    /// Compute the `Content-Digest` header value of a body
    Digest(DigestArgs),

    /// Sign a request and print the produced headers
    Sign(RequestArgs),

    /// Verify a signed request
    Verify(RequestArgs),

    /// Parse a `Signature-Input` header and report any format errors
    ParseInput(ParseInputArgs),
}

#[derive(Parser)]
#[command(about, version)]
pub struct ToolArgs {
    #[clap(subcommand)]
    pub subcommand: ToolSubcommand,
}
