use log::*;
pub use service::AppState;
use tokio::net::TcpListener;

mod controller;
pub mod error;
mod router;
mod sse;
#[cfg(test)]
mod testing;

pub use error::{Error, Result};

/// Binds the configured address and serves until the server fails.
pub async fn init_server(app_state: AppState) -> Result<()> {
    let listener = bind(&app_state).await?;
    serve(listener, app_state).await
}

/// Binds the listener. Failing here is the one fatal error of the server.
pub async fn bind(app_state: &AppState) -> Result<TcpListener> {
    let address = app_state.config.bind_addr();
    TcpListener::bind(&address)
        .await
        .map_err(|e| Error::bind(&address, e))
}

pub async fn serve(listener: TcpListener, app_state: AppState) -> Result<()> {
    match listener.local_addr() {
        Ok(local_addr) => {
            info!("Server starting... listening for connections on http://{local_addr}")
        }
        Err(e) => warn!("Server starting on an unknown local address: {e}"),
    }

    axum::serve(listener, router::define_routes(app_state))
        .await
        .map_err(Error::serve)
}
