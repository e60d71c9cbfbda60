//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use authgate_core::{AuthScheme, LoginField, RenewalStrategy};

use crate::commands::{check, login, logout, refresh_token, register, visit, whoami};

/// Auth session CLI for exercising a backend's login flow.
#[derive(Parser, Debug)]
#[command(name = "authgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// TOML configuration file
    #[arg(long, env = "AUTHGATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides the config file)
    #[arg(long, env = "AUTHGATE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Authorization header scheme: bearer or token
    #[arg(long, global = true)]
    pub auth_scheme: Option<AuthScheme>,

    /// Credential renewal: refresh-token or session-id
    #[arg(long, global = true)]
    pub renewal: Option<RenewalStrategy>,

    /// JSON key carrying the login identifier: email or username
    #[arg(long, global = true)]
    pub login_field: Option<LoginField>,

    /// Network timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Session file (defaults to the platform data directory)
    #[arg(long, env = "AUTHGATE_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new session (login)
    Login(login::LoginArgs),

    /// Create a new account
    Register(register::RegisterArgs),

    /// End the active session
    Logout(logout::LogoutArgs),

    /// Display the profile of the active session
    Whoami(whoami::WhoamiArgs),

    /// Mint a new access token from the refresh token
    RefreshToken(refresh_token::RefreshTokenArgs),

    /// Validate the session; exits with status 1 if it is not valid
    Check(check::CheckArgs),

    /// Navigate the demo route table
    Visit(visit::VisitArgs),
}
