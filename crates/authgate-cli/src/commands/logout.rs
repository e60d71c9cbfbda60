//! Logout command implementation.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::output;
use crate::session::App;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs, app: &App) -> Result<ExitCode> {
    if !app.store.is_authenticated() {
        output::success("No active session");
        return Ok(ExitCode::SUCCESS);
    }

    app.store.logout().await;

    output::success("Logged out");
    Ok(ExitCode::SUCCESS)
}
