//! Translation completeness lint.
//!
//! Validates every non-default language against the default language, prints
//! the markdown report and exits non-zero when any language is incomplete.
//!
//! Usage:
//!   cargo run                         # Validate the embedded translations
//!   TRANSLATIONS_DIR=data/translations cargo run
//!
//! Optional environment variables:
//! - TRANSLATIONS_DIR (defaults to the translations compiled into the binary)

use anyhow::{bail, Result};
use portfolio_i18n::config::Config;
use portfolio_i18n::i18n::CompletenessValidator;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in CI)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_i18n=info".parse()?),
        )
        .init();

    info!("Starting translation completeness check");

    let config = Config::from_env()?;
    let catalog = config.load_catalog()?;
    info!(
        "Loaded {} languages (default '{}')",
        catalog.languages().len(),
        catalog.default_language()
    );

    let results = CompletenessValidator::validate_catalog(&catalog);
    println!("{}", CompletenessValidator::generate_report(&catalog));

    let invalid: Vec<String> = results
        .iter()
        .filter(|result| !result.is_valid)
        .map(|result| result.compared.to_string())
        .collect();
    for result in results.iter().filter(|result| result.has_warnings()) {
        warn!(
            "'{}' has {} translation warnings",
            result.compared,
            result.warning_messages().len()
        );
    }

    if !invalid.is_empty() {
        bail!("Incomplete translations: {}", invalid.join(", "));
    }

    info!("All translations complete");
    Ok(())
}
