//! Subcommand implementations.

pub mod check;
pub mod login;
pub mod logout;
pub mod refresh_token;
pub mod register;
pub mod visit;
pub mod whoami;

use std::process::ExitCode;

use anyhow::Result;

use crate::cli::Commands;
use crate::session::App;

pub async fn handle(command: Commands, app: &App) -> Result<ExitCode> {
    match command {
        Commands::Login(args) => login::run(args, app).await,
        Commands::Register(args) => register::run(args, app).await,
        Commands::Logout(args) => logout::run(args, app).await,
        Commands::Whoami(args) => whoami::run(args, app).await,
        Commands::RefreshToken(args) => refresh_token::run(args, app).await,
        Commands::Check(args) => check::run(args, app).await,
        Commands::Visit(args) => visit::run(args, app).await,
    }
}
