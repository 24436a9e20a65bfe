//! WebSocket transport implementation using `tokio-tungstenite`.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::{self, Message};

use crate::{Connection, ConnectionId, Handshake, Transport, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = tokio_tungstenite::WebSocketStream<TcpStream>;

/// A WebSocket-based [`Transport`] that listens for incoming connections.
pub struct WebSocketTransport {
    listener: TcpListener,
}

impl WebSocketTransport {
    /// Binds a new WebSocket transport to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "WebSocket transport listening");
        Ok(Self { listener })
    }

    /// Returns the address the listener is bound to.
    ///
    /// Useful after binding to port 0.
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.listener
            .local_addr()
            .map_err(TransportError::AcceptFailed)
    }
}

impl Transport for WebSocketTransport {
    type Connection = WebSocketConnection;
    type Pending = PendingWebSocket;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Pending, Self::Error> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::trace!(%addr, "accepted TCP socket");
        Ok(PendingWebSocket { stream, addr })
    }
}

/// A TCP socket waiting for its WebSocket upgrade request.
pub struct PendingWebSocket {
    stream: TcpStream,
    addr: SocketAddr,
}

impl PendingWebSocket {
    /// The peer's address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Handshake for PendingWebSocket {
    type Connection = WebSocketConnection;
    type Error = TransportError;

    async fn upgrade(self) -> Result<Self::Connection, Self::Error> {
        let addr = self.addr;

        // The request path picks the table, so grab it during the upgrade.
        let mut path = String::from("/");
        let ws = tokio_tungstenite::accept_hdr_async(
            self.stream,
            |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
                path = req.uri().path().to_owned();
                Ok(resp)
            },
        )
        .await
        .map_err(|e| TransportError::HandshakeFailed(e.to_string()))?;

        let id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, %addr, %path, "accepted WebSocket connection");

        let (sink, stream) = ws.split();
        Ok(WebSocketConnection {
            id,
            path,
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
        })
    }
}

/// A single WebSocket connection.
///
/// The socket is split so a task waiting in [`recv`](Connection::recv)
/// never holds up a [`send`](Connection::send).
pub struct WebSocketConnection {
    id: ConnectionId,
    path: String,
    sink: Mutex<SplitSink<WsStream, Message>>,
    stream: Mutex<SplitStream<WsStream>>,
}

fn send_error(e: tungstenite::Error) -> TransportError {
    match e {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            TransportError::ConnectionClosed(e.to_string())
        }
        other => TransportError::SendFailed(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            other,
        )),
    }
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    async fn send(&self, text: &str) -> Result<(), Self::Error> {
        self.sink
            .lock()
            .await
            .send(Message::text(text.to_owned()))
            .await
            .map_err(send_error)
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        let mut stream = self.stream.lock().await;
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(data.into()));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // skip ping/pong/frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(std::io::Error::new(
                        std::io::ErrorKind::ConnectionReset,
                        e,
                    )));
                }
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.sink.lock().await.close().await.map_err(send_error)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }

    fn path(&self) -> &str {
        &self.path
    }
}
