//! Refresh token command implementation.

use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

use authgate_core::RenewalStrategy;

use crate::output;
use crate::session::App;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(_args: RefreshTokenArgs, app: &App) -> Result<ExitCode> {
    if !app.store.is_authenticated() {
        bail!("No active session. Run 'authgate login' first.");
    }
    if app.store.config().renewal == RenewalStrategy::SessionId {
        bail!("Sessions identified by a session id cannot be refreshed");
    }

    eprintln!("{}", "Refreshing session...".dimmed());

    if !app.store.refresh_access_token().await {
        bail!("Failed to refresh session");
    }

    output::success("Session refreshed successfully");
    Ok(ExitCode::SUCCESS)
}
