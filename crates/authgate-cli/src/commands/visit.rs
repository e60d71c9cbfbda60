//! Visit command: navigate the demo route table through the guard.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use authgate_core::{NavigationGuard, RouteDef, Router};

use crate::output;
use crate::session::App;

#[derive(Args, Debug)]
pub struct VisitArgs {
    /// Path to navigate to, e.g. /dashboard
    pub path: String,

    /// Print the resolution as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct VisitOutput<'a> {
    route: Option<&'a str>,
    path: &'a str,
    redirected_from: Option<&'a str>,
}

fn demo_routes() -> Vec<RouteDef> {
    vec![
        RouteDef::public("login", "/login"),
        RouteDef::public("register", "/register"),
        RouteDef::protected("profile", "/profile"),
        RouteDef::protected("dashboard", "/dashboard"),
    ]
}

pub async fn run(args: VisitArgs, app: &App) -> Result<ExitCode> {
    let router = Router::new(demo_routes(), NavigationGuard::new(app.store.clone()))
        .context("Invalid route table")?;

    let resolution = router
        .navigate(&args.path, None)
        .await
        .with_context(|| format!("Cannot navigate to {}", args.path))?;

    let route = resolution.route.name.as_deref();
    let redirected_from = resolution.redirected_from.as_ref().map(|r| r.path.as_str());

    if args.json {
        output::json(&VisitOutput {
            route,
            path: &resolution.route.path,
            redirected_from,
        })?;
        return Ok(ExitCode::SUCCESS);
    }

    match redirected_from {
        Some(from) => output::error(&format!(
            "Redirected from {} to {}",
            from, resolution.route.path
        )),
        None => output::success(&format!("Entered {}", resolution.route.path)),
    }
    output::field("Route", route.unwrap_or("-"));

    Ok(ExitCode::SUCCESS)
}
