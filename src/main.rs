//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `notigram` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Exit status reporting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use notigram::initialization::init_logger_with;
use notigram::{DispatchState, Notifier, Opt, PageContext};

#[tokio::main]
async fn main() -> Result<()> {
    // Load NOTIGRAM_* variables from .env, falling back to the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let page = match &opt.url {
        Some(url) => PageContext::from_url(url.clone(), opt.referrer.clone(), opt.user_agent.clone()),
        None => PageContext {
            path: opt.page.clone(),
            full_url: opt.page.clone(),
            referrer: opt.referrer.clone(),
            user_agent: opt.user_agent.clone(),
        },
    };

    let notifier = Notifier::builder(opt.to_config(), page)
        .on_error(|e| eprintln!("notigram error: {}", e))
        .build()
        .context("Failed to initialize notifier")?;

    notifier.mount();
    notifier.wait().await;

    match notifier.state() {
        DispatchState::Dispatched => {
            println!("✅ Visitor alert delivered");
            Ok(())
        }
        state => {
            log::debug!("Notifier finished in state {:?}", state);
            process::exit(1);
        }
    }
}
