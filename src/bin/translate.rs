//! Translate binary - resolves keys and manages the persisted language from a shell
//!
//! Usage:
//!   cargo run --bin translate -- navigation.home projects.title
//!   cargo run --bin translate -- --lang tr navigation.home   # One-off, not persisted
//!   cargo run --bin translate -- --set tr                    # Persist a new language
//!   cargo run --bin translate -- --toggle                    # Switch to the other language
//!   cargo run --bin translate -- --list                      # Show available languages
//!
//! Optional environment variables:
//! - DEFAULT_LANGUAGE (defaults to en)
//! - PERSIST_LANGUAGE (defaults to true)
//! - PREFERENCE_FILE (defaults to .portfolio-i18n/preferences.json)
//! - TRANSLATIONS_DIR (defaults to the embedded translations)

use anyhow::{bail, Context, Result};
use portfolio_i18n::config::Config;
use portfolio_i18n::i18n::{Language, LanguageController, TranslationNode, Translator};
use tracing::{info, warn};

/// Parsed command line
#[derive(Debug, Default)]
struct Args {
    lang: Option<String>,
    set: Option<String>,
    toggle: bool,
    list: bool,
    keys: Vec<String>,
}

impl Args {
    fn parse(raw: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut args = Args::default();
        let mut iter = raw.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--lang" => args.lang = Some(iter.next().context("--lang requires a language code")?),
                "--set" => args.set = Some(iter.next().context("--set requires a language code")?),
                "--toggle" => args.toggle = true,
                "--list" => args.list = true,
                flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
                _ => args.keys.push(arg),
            }
        }
        if args.set.is_some() && args.toggle {
            bail!("--set and --toggle cannot be combined");
        }
        Ok(args)
    }
}

fn render(translator: &Translator, key: &str) -> String {
    match translator.value(key) {
        Some(TranslationNode::List(items)) => items.join(", "),
        Some(TranslationNode::Map(children)) => {
            let keys: Vec<&str> = children.keys().map(String::as_str).collect();
            format!("{{{}}}", keys.join(", "))
        }
        _ => translator.t(key, None),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portfolio_i18n=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse(std::env::args().skip(1))?;
    let config = Config::from_env()?;
    let catalog = config.load_catalog()?;

    let mut controller = LanguageController::start(
        catalog.clone(),
        config.preference_storage(),
        config.controller_options(),
    )
    .await;

    if let Some(code) = &args.set {
        let language = Language::from_code(code)?;
        if controller.set(language) {
            info!("Preferred language is now '{}'", language);
        } else {
            info!("Preferred language already '{}'", language);
        }
    } else if args.toggle {
        controller.toggle_language();
    }

    if !controller.persists_language() && (args.set.is_some() || args.toggle) {
        warn!("PERSIST_LANGUAGE is disabled, the change was not saved");
    }

    if args.list {
        let current = controller.language();
        for info in controller.available_languages() {
            let marker = if info.code == current.code() { "*" } else { " " };
            println!("{} {} ({}, {})", marker, info.code, info.name, info.native_name);
        }
    }

    let translator = match &args.lang {
        Some(code) => Translator::new(catalog, Language::from_code(code)?),
        None => controller.translator(),
    };

    if args.keys.is_empty() && !args.list {
        println!(
            "{}",
            serde_json::to_string_pretty(&controller.current_language_display())?
        );
    }

    for key in &args.keys {
        println!("{} = {}", key, render(&translator, key));
    }

    for error in translator.errors() {
        warn!(
            "Missing '{}' in '{}', showing \"{}\"",
            error.key, error.language, error.fallback
        );
    }

    Ok(())
}
