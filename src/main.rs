use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cascos=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (addr, config) = match cli::run() {
        cli::RunOutcome::Serve { addr, config } => (addr, config),
        cli::RunOutcome::Exit(code) => std::process::exit(code),
    };

    let router = match cascos::app(config) {
        Ok(router) => router,
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = cascos::serve(addr, router).await {
        tracing::error!("server error: {err}");
        std::process::exit(1);
    }
}
