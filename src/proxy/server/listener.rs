use crate::configuration::ServerConfig;
use crate::proxy::server::{serve_request, ServerContext};
use crate::proxy::Error;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::pin;
use tokio::sync::watch;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

pub struct Listener {
    listener: TcpListener,
    context: Arc<ServerContext>,
    timeouts: Arc<[Duration; 2]>,
    drain_timeout: Duration,
}

impl Listener {
    pub async fn bind(
        binding_address: SocketAddr,
        server_config: &ServerConfig,
        context: ServerContext,
    ) -> Result<Self, Error> {
        let listener = TcpListener::bind(binding_address).await?;

        let timeouts = [
            Duration::from_secs(server_config.query_timeout),
            Duration::from_secs(server_config.query_timeout_grace_period),
        ];

        Ok(Self {
            listener,
            context: Arc::new(context),
            timeouts: Arc::new(timeouts),
            drain_timeout: Duration::from_secs(server_config.drain_timeout),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until `shutdown` resolves, spawning one task per
    /// connection.
    ///
    /// With a zero drain timeout this returns right away. In-flight connections
    /// are neither asked to close nor awaited, and end with the runtime or on
    /// their own. Otherwise they are asked to close and awaited for at most the
    /// drain timeout.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()>,
    {
        info!("Listening on {}", self.local_addr()?);

        let (shutdown_sender, shutdown_receiver) = watch::channel(false);
        let tracker = TaskTracker::new();
        pin!(shutdown);

        loop {
            debug!("Waiting for incoming connection");
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (tcp, remote_address) = match accepted {
                        Ok(accepted) => accepted,
                        Err(error) => {
                            warn!("Failed to accept connection: {error}");
                            continue;
                        }
                    };

                    debug!("Accepted connection from {remote_address}");
                    tracker.spawn(serve_request(
                        TokioIo::new(tcp),
                        Arc::clone(&self.context),
                        Arc::clone(&self.timeouts),
                        remote_address,
                        shutdown_receiver.clone(),
                    ));
                }
                () = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting connections");
                    break;
                }
            }
        }

        tracker.close();
        if self.drain_timeout.is_zero() {
            debug!("Abandoning {} in-flight connection(s)", tracker.len());
            return Ok(());
        }

        let _ = shutdown_sender.send(true);
        info!(
            "Draining {} in-flight connection(s) for up to {:?}",
            tracker.len(),
            self.drain_timeout
        );
        if tokio::time::timeout(self.drain_timeout, tracker.wait())
            .await
            .is_err()
        {
            warn!("Drain timeout elapsed, abandoning remaining connections");
        }

        Ok(())
    }
}
