//! Lists the Gemini models visible to the configured key and checks which ids answer.
//!
//! Usage: `probe_models [MODEL_ID...]`. Without arguments a built-in candidate list is probed.

use anyhow::Result;
use caption_api::config::Config;
use caption_api::{CompletionService, ResponseFormat};
use dotenv::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CANDIDATES: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-2.0-flash-lite",
    "gemini-1.5-flash",
    "gemini-1.5-flash-latest",
    "gemini-1.5-pro",
    "gemini-pro",
];

const PROBE_PROMPT: &str = "Reply with the single word OK.";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    dotenv().ok();
    let config = Config::from_env()?;
    let client = config.gemini_client();

    match client.list_models().await {
        Ok(models) => {
            let usable: Vec<_> = models.iter().filter(|m| m.supports_generate_content()).collect();
            println!("{} models support generateContent:", usable.len());
            for m in usable {
                println!("  {:<40} {}", m.id(), m.display_name.as_deref().unwrap_or(""));
            }
        }
        Err(e) => println!("could not list models: {e}"),
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let ids: Vec<&str> = if args.is_empty() {
        CANDIDATES.to_vec()
    } else {
        args.iter().map(String::as_str).collect()
    };

    println!("\nprobing {} model ids:", ids.len());
    let mut working = 0;
    for id in ids {
        let probe = client.with_model(id);
        match probe.complete_text(PROBE_PROMPT, ResponseFormat::Text).await {
            Ok(text) => {
                working += 1;
                println!("  ok    {:<32} {}", id, text.trim());
            }
            Err(e) => println!("  fail  {:<32} {}", id, e),
        }
    }
    println!("\n{working} model id(s) responded");
    Ok(())
}
