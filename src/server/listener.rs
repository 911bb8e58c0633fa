use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, Instrument};

use crate::config::{Config, ServerConfig};
use crate::http::connection::{Connection, ConnectionOptions};
use crate::static_files::StaticFiles;

/// Pause after a failed accept. Errors such as EMFILE repeat until
/// another connection closes.
pub const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("cannot listen on {}", cfg.server.listen_addr))?;
    info!("Listening on {}", listener.local_addr()?);

    let files = Arc::new(StaticFiles::new(&cfg.root));
    serve(listener, files, &cfg.server).await
}

/// Accept loop over an already bound listener.
///
/// Connections run on their own tasks unless `sequential` is set, in which
/// case each one is finished before the next accept.
pub async fn serve(
    listener: TcpListener,
    files: Arc<StaticFiles>,
    settings: &ServerConfig,
) -> anyhow::Result<()> {
    let options = settings.connection_options();

    loop {
        let (socket, peer) = accept_with_backoff(|| listener.accept(), ACCEPT_BACKOFF).await;
        info!("Accepted connection from {}", peer);

        let span = tracing::info_span!("connection", %peer);
        let task = handle(socket, files.clone(), options).instrument(span);

        if settings.sequential {
            task.await;
        } else {
            tokio::spawn(task);
        }
    }
}

/// Retries `accept` until it yields a connection, sleeping `backoff`
/// after every failure.
async fn accept_with_backoff<F, Fut, T>(mut accept: F, backoff: Duration) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<T>>,
{
    loop {
        match accept().await {
            Ok(accepted) => return accepted,
            Err(e) => {
                tracing::warn!(error = %e, "Accept failed");
                tokio::time::sleep(backoff).await;
            }
        }
    }
}

async fn handle(socket: TcpStream, files: Arc<StaticFiles>, options: ConnectionOptions) {
    let conn = Connection::with_options(socket, files, options);
    if let Err(e) = conn.run().await {
        tracing::error!(error = %e, "Connection error");
    }
}
