//! Check command implementation.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::output;
use crate::session::App;

#[derive(Args, Debug)]
pub struct CheckArgs {}

pub async fn run(_args: CheckArgs, app: &App) -> Result<ExitCode> {
    if app.store.check_auth().await {
        output::success("Session is valid");
        Ok(ExitCode::SUCCESS)
    } else {
        output::error("Not authenticated");
        Ok(ExitCode::FAILURE)
    }
}
