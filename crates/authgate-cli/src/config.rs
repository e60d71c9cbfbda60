//! Configuration resolution: file, then environment and flags.

use std::fs;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use authgate_core::{ApiUrl, AuthConfig};

use crate::cli::Cli;

/// Build the store configuration from the config file and flag overrides.
pub fn resolve(cli: &Cli) -> Result<AuthConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let mut config = AuthConfig::from_toml_str(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            if let Some(url) = &cli.api_url {
                config.base_url = ApiUrl::new(url).context("Invalid API URL")?;
            }
            config
        }
        None => {
            let Some(url) = &cli.api_url else {
                bail!("No API URL configured. Pass --api-url, set AUTHGATE_API_URL or use --config.");
            };
            AuthConfig::new(ApiUrl::new(url).context("Invalid API URL")?)
        }
    };

    if let Some(scheme) = cli.auth_scheme {
        config = config.with_auth_scheme(scheme);
    }
    if let Some(renewal) = cli.renewal {
        config = config.with_renewal(renewal);
    }
    if let Some(field) = cli.login_field {
        config = config.with_login_field(field);
    }
    if let Some(secs) = cli.timeout_secs {
        if secs == 0 {
            bail!("--timeout-secs must be greater than zero");
        }
        config = config.with_timeout(Duration::from_secs(secs));
    }

    Ok(config)
}
