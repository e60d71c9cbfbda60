//! Login command implementation.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use authgate_core::Credentials;

use crate::output;
use crate::session::App;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Email or username, depending on --login-field
    #[arg(long)]
    pub identifier: String,

    /// Account password
    #[arg(long, env = "AUTHGATE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: LoginArgs, app: &App) -> Result<ExitCode> {
    let credentials = Credentials::new(&args.identifier, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    app.store
        .login(&credentials)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    if let Some(user) = app.store.user() {
        output::user(&user);
    }
    output::field("Session file", &app.storage.path().display().to_string());

    Ok(ExitCode::SUCCESS)
}
