//! Register command implementation.
//!
//! Registration does not sign in; run `login` afterwards.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use authgate_core::Registration;

use crate::output;
use crate::session::App;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Username for the new account
    pub username: String,

    /// Email address for the new account
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "AUTHGATE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: RegisterArgs, app: &App) -> Result<ExitCode> {
    let registration = Registration::new(&args.username, &args.email, &args.password);

    eprintln!("{}", "Registering...".dimmed());

    app.store
        .register(&registration)
        .await
        .context("Failed to register")?;

    output::field("Username", &args.username);
    output::field("Email", &args.email);
    output::success("Account created successfully");

    Ok(ExitCode::SUCCESS)
}
