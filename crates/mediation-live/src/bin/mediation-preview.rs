//! Mediation page preview.
//!
//! Usage:
//!   mediation-preview [OPTIONS] <PAGE>
//!
//! Prints an outline of the page filled with content, and with `--watch`
//! prints it again after every successful edit of the page file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::builder::PossibleValuesParser;
use mediation_core::{Decoder, Density};
use mediation_fill::{DEFAULT_LANGUAGE, DEFAULT_RESTORE_DIR, FillableState, KNOWN_LANGUAGES};
use mediation_live::{OutlineRenderer, Session, SessionConfig};

#[derive(Parser)]
#[command(name = "mediation-preview")]
#[command(about = "Decode a mediation page and preview it with localized content")]
struct Cli {
    /// Page document (YAML)
    page: PathBuf,

    /// Content JSON to import before the first render
    #[arg(short, long)]
    content: Option<PathBuf>,

    /// Active content language
    #[arg(
        short,
        long,
        default_value = DEFAULT_LANGUAGE,
        value_parser = PossibleValuesParser::new(KNOWN_LANGUAGES)
    )]
    lang: String,

    /// Pixel density used to convert `.px` lengths
    #[arg(short, long, default_value_t = 1.0)]
    density: f32,

    /// Keep running and re-render when the page file changes
    #[arg(short, long)]
    watch: bool,

    /// Print the decoded page as JSON and exit
    #[arg(long)]
    dump: bool,

    /// Write embedded image payloads from the content into DIR
    #[arg(long, value_name = "DIR", num_args = 0..=1, default_missing_value = DEFAULT_RESTORE_DIR)]
    restore_images: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("mediation-preview error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = SessionConfig {
        density: Density(cli.density),
        initial_lang: cli.lang.clone(),
        ..SessionConfig::default()
    };

    if cli.dump {
        let text = std::fs::read_to_string(&cli.page)?;
        let page = Decoder::new(config.decode).decode_str(&text)?;
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    let mut content = FillableState::new(config.initial_lang.clone());
    if let Some(path) = &cli.content {
        content.load_json(&std::fs::read_to_string(path)?)?;
    }

    let renderer = OutlineRenderer::new(std::io::stdout());
    let mut session = Session::open_with_content(&cli.page, config, content, renderer)?;

    if let Some(dir) = &cli.restore_images {
        let restored = session.restore_images(dir);
        log::info!("restored {} image(s) into {}", restored.len(), dir.display());
    }

    for diagnostic in session.lint() {
        log::warn!("[{}] {}: {}", diagnostic.rule, diagnostic.tag, diagnostic.message);
    }

    if !cli.watch {
        return Ok(());
    }

    let (mut watcher, mut changes) = session.watch()?;
    log::info!("watching {} (ctrl-c to stop)", watcher.path().display());

    tokio::select! {
        _ = session.run(&mut changes) => {}
        _ = tokio::signal::ctrl_c() => log::info!("stopping"),
    }
    watcher.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lang_must_be_a_known_language() {
        let cli = Cli::try_parse_from(["mediation-preview", "page.yaml"]).expect("defaults");
        assert_eq!(cli.lang, DEFAULT_LANGUAGE);
        assert!(Cli::try_parse_from(["mediation-preview", "page.yaml", "--lang", "en"]).is_ok());
        assert!(Cli::try_parse_from(["mediation-preview", "page.yaml", "--lang", "de"]).is_err());
    }

    #[test]
    fn restore_images_defaults_its_directory() {
        let cli = Cli::try_parse_from(["mediation-preview", "page.yaml"]).expect("parse");
        assert_eq!(cli.restore_images, None);

        let cli = Cli::try_parse_from(["mediation-preview", "page.yaml", "--restore-images"])
            .expect("parse");
        assert_eq!(cli.restore_images, Some(PathBuf::from(DEFAULT_RESTORE_DIR)));

        let cli = Cli::try_parse_from(["mediation-preview", "page.yaml", "--restore-images", "out"])
            .expect("parse");
        assert_eq!(cli.restore_images, Some(PathBuf::from("out")));
    }
}
