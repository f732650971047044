//! Example: Classifying a saved `.eml` file with tracing enabled.
//!
//! All parsing and classification steps emit tracing spans and events.
//!
//! # Usage
//!
//! ```bash
//! # Set log level (trace, debug, info, warn, error)
//! export RUST_LOG=omnivore_inbound=debug
//!
//! cargo run --example classify_eml -- path/to/message.eml
//! ```

use omnivore_inbound::{Classification, Classifier, RawEmail};
use std::env;
use std::fs;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("omnivore_inbound=info")),
        )
        .with_target(true)
        .init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: classify_eml <message.eml>");
        return ExitCode::FAILURE;
    };

    let raw = match fs::read(&path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("failed to read {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let email = match RawEmail::parse(&raw) {
        Ok(email) => email,
        Err(e) => {
            tracing::warn!(error = %e, category = %e.category(), "Unparseable email");
            eprintln!("failed to parse {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    match Classifier::default().classify(&email) {
        Classification::Confirmation { code } => {
            println!("Forwarding confirmation, code: {}", code.as_deref().unwrap_or("<none>"));
        }
        Classification::Newsletter(newsletter) => {
            println!("Newsletter ({})", newsletter.handler);
            println!("  url:    {}", newsletter.result.canonical_url.as_deref().unwrap_or("<none>"));
            println!("  author: {}", newsletter.result.author.as_deref().unwrap_or("<none>"));
            if let Some(http) = &newsletter.unsubscribe.http_url {
                println!("  unsubscribe: {http}");
            }
        }
        Classification::Unrecognized(result) => {
            println!(
                "Not a newsletter (from {})",
                result.author.as_deref().unwrap_or("<unknown>")
            );
        }
    }

    ExitCode::SUCCESS
}
