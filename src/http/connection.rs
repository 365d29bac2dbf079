//! Socket setup for one hop.
//!
//! Each hop gets a fresh TCP socket, optionally pinned to a network interface
//! and wrapped in TLS for `https`. Sockets are never reused.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, StreamOwned};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use url::Url;

use crate::config::{CheckConfig, READ_CHUNK_SIZE, SOCKET_WRITE_TIMEOUT_SECS};
use crate::error_handling::HttpError;
use crate::http::target::{endpoint, Endpoint, Scheme};

/// A connected stream, plain or TLS.
pub enum HttpStream {
    Plain(TcpStream),
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

impl HttpStream {
    /// Address of the connected peer.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        match self {
            HttpStream::Plain(s) => s.peer_addr(),
            HttpStream::Tls(s) => s.sock.peer_addr(),
        }
    }
}

impl Read for HttpStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            HttpStream::Plain(s) => s.read(buf),
            HttpStream::Tls(s) => s.read(buf),
        }
    }
}

impl Write for HttpStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            HttpStream::Plain(s) => s.write(buf),
            HttpStream::Tls(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            HttpStream::Plain(s) => s.flush(),
            HttpStream::Tls(s) => s.flush(),
        }
    }
}

/// Opens hop sockets with fixed timeouts and an optional interface binding.
#[derive(Clone)]
pub struct Connector {
    tls: Arc<ClientConfig>,
    connect_timeout: Duration,
    read_timeout: Duration,
    write_timeout: Duration,
    interface: Option<String>,
}

impl Connector {
    /// Creates a connector using the timeouts from `config`.
    ///
    /// # Arguments
    ///
    /// * `tls` - Client configuration for `https` hops
    /// * `config` - Source of the connect and read timeouts
    /// * `interface` - Network interface every socket is bound to, if any
    pub fn new(tls: Arc<ClientConfig>, config: &CheckConfig, interface: Option<String>) -> Self {
        Self {
            tls,
            connect_timeout: config.connect_timeout,
            read_timeout: config.read_timeout,
            write_timeout: Duration::from_secs(SOCKET_WRITE_TIMEOUT_SECS),
            interface,
        }
    }

    pub fn interface(&self) -> Option<&str> {
        self.interface.as_deref()
    }

    /// Connects to the host and port of `url`.
    ///
    /// Every resolved address is tried in order until one connects.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Connect` when resolution or every connect attempt
    /// fails, `HttpError::InvalidUrl` when the host is not a valid TLS server
    /// name, and `HttpError::Tls` when the TLS session cannot be created.
    pub fn connect(&self, url: &Url) -> Result<HttpStream, HttpError> {
        let ep = endpoint(url)?;
        let tcp = self.connect_tcp(&ep)?;

        match ep.scheme {
            Scheme::Http => Ok(HttpStream::Plain(tcp)),
            Scheme::Https => {
                let server_name = ServerName::try_from(ep.host.clone())
                    .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", ep.host, e)))?;
                let conn = ClientConnection::new(self.tls.clone(), server_name)?;
                Ok(HttpStream::Tls(Box::new(StreamOwned::new(conn, tcp))))
            }
        }
    }

    fn connect_tcp(&self, ep: &Endpoint) -> Result<TcpStream, HttpError> {
        let connect_error = |message: String| HttpError::Connect {
            host: ep.host.clone(),
            port: ep.port,
            message,
        };

        let addrs: Vec<SocketAddr> = (ep.host.as_str(), ep.port)
            .to_socket_addrs()
            .map_err(|e| connect_error(e.to_string()))?
            .collect();
        if addrs.is_empty() {
            return Err(connect_error("no addresses resolved".to_string()));
        }

        let mut last_error = None;
        for addr in addrs {
            match self.open_socket(addr) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    log::debug!("Connect to {} failed: {}", addr, e);
                    last_error = Some(e);
                }
            }
        }
        Err(connect_error(
            last_error.map(|e| e.to_string()).unwrap_or_default(),
        ))
    }

    fn open_socket(&self, addr: SocketAddr) -> io::Result<TcpStream> {
        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
        if let Some(interface) = &self.interface {
            bind_to_interface(&socket, interface)?;
        }
        socket.connect_timeout(&SockAddr::from(addr), self.connect_timeout)?;
        socket.set_read_timeout(Some(self.read_timeout))?;
        socket.set_write_timeout(Some(self.write_timeout))?;
        socket.set_nodelay(true)?;
        Ok(socket.into())
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn bind_to_interface(socket: &Socket, interface: &str) -> io::Result<()> {
    socket.bind_device(Some(interface.as_bytes()))
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn bind_to_interface(_socket: &Socket, interface: &str) -> io::Result<()> {
    log::warn!(
        "Binding sockets to interface {} is not supported on this platform",
        interface
    );
    Ok(())
}

/// Reads until the peer closes the stream or `max_bytes` have been read.
///
/// A TLS peer that closes without `close_notify`, or a read timeout after
/// some data has arrived, ends the response instead of failing it.
///
/// # Errors
///
/// Returns the I/O error when nothing could be read at all.
pub fn read_to_end<R: Read>(stream: &mut R, max_bytes: usize) -> Result<Vec<u8>, HttpError> {
    let mut data = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                data.extend_from_slice(&chunk[..n]);
                if data.len() >= max_bytes {
                    log::warn!("Response exceeds {} bytes, truncating", max_bytes);
                    data.truncate(max_bytes);
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e)
                if !data.is_empty()
                    && matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock
                            | io::ErrorKind::TimedOut
                            | io::ErrorKind::ConnectionReset
                    ) =>
            {
                log::debug!("Read ended after {} bytes: {}", data.len(), e);
                break;
            }
            Err(e) => return Err(HttpError::Io(e)),
        }
    }

    Ok(data)
}
