use crate::err::Result;
use crate::global_var::{ENV_VAR, LOGGER};
use crate::interface::handlers::run_handler;
use api_model::protocol::message::api_request_message::ApiRequestMessage;
use api_model::protocol::message::api_response_message::{ApiResponseKind, ApiResponseMessage};
use api_model::protocol::models::api_error::{ApiError, ErrorCode};
use api_model::protocol::protocol::Protocol;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener as TokioTcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Accept loop for the registry API. One connection carries one request:
/// the client writes the request and shuts down its write half, the server
/// answers and closes.
pub struct ApiListener {
    listener: TokioTcpListener,
}

/// Handle to a running listener task, allowing graceful shutdown.
#[derive(Debug)]
pub struct ListenerHandle {
    handle: JoinHandle<()>,
    shutdown_tx: oneshot::Sender<()>,
}

impl ListenerHandle {
    /// Signal shutdown and await the listener task to exit.
    pub async fn shutdown(self) -> Result<()> {
        // Ignore if already closed
        let _ = self.shutdown_tx.send(());
        let _ = self.handle.await;
        Ok(())
    }
}

impl ApiListener {
    /// Bind on the configured API port.
    pub async fn bind() -> Result<Self> {
        let port = ENV_VAR
            .get()
            .ok_or_else(|| crate::err::Error::from("ENV_VAR not initialized"))?
            .get_api_port();
        Self::bind_on(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)).await
    }

    /// Bind to a specific socket address (useful for tests to use ephemeral ports).
    pub async fn bind_on(addr: SocketAddr) -> Result<Self> {
        LOGGER.info(format!("Binding registry API listener to {}", addr));
        let listener = TokioTcpListener::bind(addr).await?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Start the accept loop in a background task. Connections from
    /// non-loopback peers are dropped without an answer; the registry is a
    /// local service.
    pub fn into_task(self) -> ListenerHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => {
                        LOGGER.info("Registry API listener received shutdown signal, exiting...");
                        break;
                    }
                    res = self.listener.accept() => {
                        match res {
                            Ok((stream, peer)) => {
                                if !peer.ip().is_loopback() {
                                    LOGGER.warn(format!(
                                        "Dropping registry API connection from non-loopback peer {}",
                                        peer
                                    ));
                                    continue;
                                }
                                LOGGER.debug(format!("Accepted registry API connection from {}", peer));
                                tokio::spawn(handle_connection(stream, peer));
                            }
                            Err(e) => {
                                LOGGER.debug(format!("Failed to accept API connection {:?}", e));
                                continue;
                            }
                        }
                    }
                }
            }
        });
        ListenerHandle {
            handle,
            shutdown_tx,
        }
    }
}

async fn handle_connection(mut stream: TcpStream, peer: SocketAddr) {
    let mut buf = Vec::new();
    if let Err(e) = stream.read_to_end(&mut buf).await {
        LOGGER.warn(format!("Failed to read request from {}: {}", peer, e));
        return;
    }

    let response = match ApiRequestMessage::deserialize(&buf) {
        Ok(msg) => run_handler(&msg.request).await,
        Err(e) => {
            LOGGER.warn(format!("Undecodable request from {}: {}", peer, e));
            ApiResponseKind::Error(ApiError::new(
                ErrorCode::InvalidInput,
                format!("undecodable request: {}", e),
            ))
        }
    };

    let out = ApiResponseMessage { response }.serialize();
    if let Err(e) = stream.write_all(&out).await {
        LOGGER.warn(format!("Failed to write response to {}: {}", peer, e));
        return;
    }
    let _ = stream.shutdown().await;
}
