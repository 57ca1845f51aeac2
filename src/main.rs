//! Distribution Portal
//!
//! In the browser this launches the Dioxus app. Natively it runs the same
//! navigation engine against a live API with an in-memory history and prints
//! each mounted screen, which is handy for checking role routing from a shell.

#[cfg(target_arch = "wasm32")]
fn main() {
    dioxus::launch(distribution_portal::app::App);
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    probe::run().await
}

#[cfg(not(target_arch = "wasm32"))]
mod probe {
    use anyhow::{Context, Result};
    use clap::Parser;
    use std::path::PathBuf;
    use std::rc::Rc;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    use distribution_portal::api::HttpApi;
    use distribution_portal::config::load_config;
    use distribution_portal::nav::{MemoryHistory, Portal};
    use distribution_portal::view::{elements, Surface, UiEvent};

    #[derive(Debug, Parser)]
    #[command(name = "distribution-portal", about = "Walk portal routes against a running API")]
    struct Args {
        /// Config file (defaults to ./portal.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Log in before routing
        #[arg(long, requires = "password")]
        email: Option<String>,

        #[arg(long, requires = "email")]
        password: Option<String>,

        /// Also open every section of each dashboard reached
        #[arg(long)]
        all_sections: bool,

        /// Paths to visit in order, e.g. /owner /driver?id=3
        paths: Vec<String>,
    }

    pub async fn run() -> Result<()> {
        let args = Args::parse();
        let config = load_config(args.config.as_deref()).context("loading configuration")?;

        let default_filter = config
            .log_filter
            .clone()
            .unwrap_or_else(|| "distribution_portal=debug".to_string());
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();

        tracing::info!(api = %config.api_base_url, "Starting portal probe");

        let api = Rc::new(HttpApi::new(&config.api_base_url, config.request_timeout())?);
        let portal = Portal::new(
            Rc::new(MemoryHistory::default()),
            api.clone(),
            api,
            Surface::new(),
        );

        let outcome = portal.start().await;
        tracing::debug!(?outcome, "Initial route");

        if let (Some(email), Some(password)) = (args.email.as_deref(), args.password.as_deref()) {
            let outcome = portal.login(email, password).await;
            tracing::info!(?outcome, "Login finished");
            print!("{}", portal.surface().screen());
        }

        for path in &args.paths {
            let outcome = portal.navigate_to(path).await;
            tracing::info!(path, ?outcome, "Routed");
            let screen = portal.surface().screen();
            println!("==> {}", portal.location().to_url());
            print!("{screen}");

            if !args.all_sections {
                continue;
            }
            let Some(view) = screen.dashboard() else {
                continue;
            };
            for item in &view.nav {
                portal.handle(UiEvent::click(elements::nav(&item.id))).await;
                println!("--> {}", item.label);
                print!("{}", portal.surface().screen());
            }
        }

        Ok(())
    }
}
