//! Whoami command implementation.

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::output;
use crate::session::App;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the profile as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: WhoamiArgs, app: &App) -> Result<ExitCode> {
    if !app.store.is_authenticated() {
        bail!("No active session. Run 'authgate login' first.");
    }

    let user = app
        .store
        .fetch_user_profile()
        .await
        .context("Could not load profile; the session may have expired")?;

    if args.json {
        output::json_pretty(&user)?;
        return Ok(ExitCode::SUCCESS);
    }

    output::user(&user);
    if let Some(updated_at) = app.storage.updated_at().context("Failed to read session file")? {
        output::field("Saved", &updated_at.to_rfc3339());
    }

    Ok(ExitCode::SUCCESS)
}
