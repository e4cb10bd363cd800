use http_message_signatures::SigningConfig;
use miette::{IntoDiagnostic, WrapErr};
use std::path::Path;
use tokio::fs;

pub async fn load<P>(path: P) -> miette::Result<SigningConfig>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .await
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

    toml::from_str(&content)
        .into_diagnostic()
        .wrap_err("Failed to parse the configuration")
}
