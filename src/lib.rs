pub mod auth;
pub mod catalog;
pub mod config;
pub mod directory;
pub mod error;
pub mod loans;
pub mod reporting;
pub mod store;
pub mod types;

mod app;
mod assets;
mod state;
mod templates;

pub use app::app;

use axum::Router;
use std::net::SocketAddr;

pub async fn serve(addr: SocketAddr, router: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{addr}");
    axum::serve(listener, router).await
}
