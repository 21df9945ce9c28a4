//! HTTP listener
//!
//! One connection at a time, one request per connection. Accepting is raced
//! against the scheduler's next deadline so a quiet network never delays a
//! scroll step. Once accepted, a connection gets a fixed total budget for
//! reading the request and writing the response.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_net::tcp::TcpSocket;
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration, Instant, Timer};
use embedded_io_async::Write;

use marquee_core::api::{parse_request, Parse, Response, BAD_REQUEST, MAX_REQUEST_SIZE};

use crate::App;

/// Listening port
pub const HTTP_PORT: u16 = 80;

/// Socket buffer size (each direction)
pub const SOCKET_BUFFER_SIZE: usize = 1024;

/// Idle time allowed while a client is sending or receiving
const SOCKET_TIMEOUT: Duration = Duration::from_millis(500);

/// Total time one connection may hold up the scheduler
const REQUEST_BUDGET: Duration = Duration::from_millis(300);

/// Buffers reused across connections
pub struct ServerBuffers {
    pub rx: [u8; SOCKET_BUFFER_SIZE],
    pub tx: [u8; SOCKET_BUFFER_SIZE],
    pub request: [u8; MAX_REQUEST_SIZE],
}

impl ServerBuffers {
    pub const fn new() -> Self {
        Self {
            rx: [0; SOCKET_BUFFER_SIZE],
            tx: [0; SOCKET_BUFFER_SIZE],
            request: [0; MAX_REQUEST_SIZE],
        }
    }
}

/// Wait for a client until `deadline`, serving at most one request
pub async fn serve_until(
    stack: Stack<'static>,
    app: &mut App,
    deadline: Instant,
    bufs: &mut ServerBuffers,
) {
    let mut socket = TcpSocket::new(stack, &mut bufs.rx, &mut bufs.tx);
    socket.set_timeout(Some(SOCKET_TIMEOUT));

    match select(socket.accept(HTTP_PORT), Timer::at(deadline)).await {
        Either::First(Ok(())) => {}
        Either::First(Err(e)) => {
            warn!("Accept failed: {}", e);
            return;
        }
        Either::Second(()) => return,
    }

    if let Some(remote) = socket.remote_endpoint() {
        debug!("Connection from {}", remote);
    }

    let exchange = async {
        let response = match read_request(&mut socket, &mut bufs.request).await {
            Some(len) => app.handle_request(&bufs.request[..len]),
            None => BAD_REQUEST,
        };

        if let Err(e) = send_response(&mut socket, &response).await {
            warn!("Response not delivered: {}", e);
        }
    };

    if with_timeout(REQUEST_BUDGET, exchange).await.is_err() {
        warn!("Client too slow, dropping connection");
        socket.abort();
        let _ = with_timeout(SOCKET_TIMEOUT, socket.flush()).await;
        return;
    }

    socket.close();
    // Let the FIN go out before the socket is dropped
    let _ = with_timeout(SOCKET_TIMEOUT, socket.flush()).await;
}

/// Read until the request is complete, the client stops sending or the
/// buffer is full; returns the number of bytes read
async fn read_request(socket: &mut TcpSocket<'_>, buf: &mut [u8]) -> Option<usize> {
    let mut len = 0;

    while len < buf.len() {
        let n = match socket.read(&mut buf[len..]).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn!("Read failed: {}", e);
                return None;
            }
        };
        len += n;

        match parse_request(&buf[..len]) {
            Ok(Parse::Incomplete) => continue,
            Ok(Parse::Complete(_)) | Err(_) => break,
        }
    }

    (len > 0).then_some(len)
}

async fn send_response(
    socket: &mut TcpSocket<'_>,
    response: &Response,
) -> Result<(), embassy_net::tcp::Error> {
    let encoded = match response.encode() {
        Ok(encoded) => encoded,
        Err(_) => {
            error!("Response for status {} does not fit", response.status);
            return Ok(());
        }
    };

    socket.write_all(encoded.as_bytes()).await?;
    socket.flush().await
}
