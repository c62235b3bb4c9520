//! Google Drive OAuth token generator
//!
//! One-shot CLI, no arguments:
//! 1. Reads `oauth-credentials.json` from the working directory
//! 2. Prints the consent URL and waits for the pasted authorization code
//! 3. Exchanges the code and writes `token.json` (0600)
//! 4. Confirms the token with one Drive API call

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use drive_auth::{CodeSource, Error, LineCodeSource, Settings, setup_instructions};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    // Logs go to stderr; stdout is reserved for the operator prompts
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn generate<S, W>(settings: &Settings, codes: &mut S, out: &mut W) -> Result<()>
where
    S: CodeSource,
    W: Write,
{
    match drive_auth::run(settings, codes, out).await {
        Ok(_) => Ok(()),
        Err(Error::ConfigNotFound(path)) => {
            let _ = write!(out, "{}", setup_instructions(&path));
            anyhow::bail!("credentials file {} not found", path.display())
        }
        Err(e) => {
            let stage = e.stage();
            Err(e).with_context(|| format!("failed to generate OAuth token (stage: {stage})"))
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    println!("Google Drive OAuth Token Generator");
    println!("==================================");

    let settings = Settings::default();
    let mut codes = LineCodeSource::stdin();
    if let Err(e) = generate(&settings, &mut codes, &mut std::io::stdout()).await {
        debug!(error = ?e, "token generation failed");
        eprintln!("\nError: {e:#}");
        return ExitCode::FAILURE;
    }

    println!(
        "\nSuccess! OAuth token generated and saved to '{}'",
        settings.token_path.display()
    );
    println!(
        "Copy {} to your project's credentials directory",
        settings.token_path.display()
    );
    println!("The refresh token keeps it valid until it is revoked");
    let _ = std::io::stdout().flush();
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn settings_in(dir: &std::path::Path) -> Settings {
        Settings {
            credentials_path: dir.join("oauth-credentials.json"),
            token_path: dir.join("token.json"),
            // Nothing listens here; the run must fail before any request
            api_base: "http://127.0.0.1:9".into(),
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn missing_credentials_prints_setup_instructions() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());

        let mut codes = LineCodeSource::new(Cursor::new("4/ABC123\n"));
        let mut out = Vec::new();
        let err = generate(&settings, &mut codes, &mut out).await.unwrap_err();

        assert!(err.to_string().contains("not found"), "got: {err:#}");
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Setup Instructions:"), "got: {output}");
        assert!(output.contains("https://console.cloud.google.com/"));
        assert!(output.contains("oauth-credentials.json"));
        assert!(!settings.token_path.exists());
    }

    #[tokio::test]
    async fn other_failures_name_the_stage() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        std::fs::write(&settings.credentials_path, "not json").unwrap();

        let mut codes = LineCodeSource::new(Cursor::new(""));
        let mut out = Vec::new();
        let err = generate(&settings, &mut codes, &mut out).await.unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("stage: start"), "got: {message}");
        assert!(message.contains("invalid credentials file"), "got: {message}");
        let output = String::from_utf8(out).unwrap();
        assert!(!output.contains("Setup Instructions:"), "got: {output}");
    }
}
