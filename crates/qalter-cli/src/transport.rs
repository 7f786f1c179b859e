//! Socket transport to batch servers.
//!
//! Establishes TCP connections with a bounded connect timeout and applies
//! the same bound to each read and write so a stalled server cannot hang
//! the command.

use std::io::{self, BufReader};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use qalter_config::ServerName;
use qalter_protocol::{FramingError, Reply, Request, read_message, write_message};

use crate::client::ClientError;

pub(crate) struct Connection {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl Connection {
    /// Sends `request` and waits for its single reply.
    pub(crate) fn exchange(&mut self, request: &Request) -> Result<Reply, FramingError> {
        write_message(&mut self.writer, request)?;
        read_message(&mut self.reader)
    }

    pub(crate) fn shutdown(&self) {
        if let Err(error) = self.writer.shutdown(std::net::Shutdown::Both) {
            tracing::trace!(%error, "socket already closed");
        }
    }
}

pub(crate) fn connect(server: &ServerName, timeout: Duration) -> Result<Connection, ClientError> {
    let address = resolve_tcp_address(server.host(), server.port()).map_err(|source| {
        ClientError::Resolve {
            server: server.clone(),
            source,
        }
    })?;

    let stream = TcpStream::connect_timeout(&address, timeout).map_err(|source| {
        ClientError::Connect {
            server: server.clone(),
            source,
        }
    })?;
    configure(&stream, timeout).map_err(|source| ClientError::Connect {
        server: server.clone(),
        source,
    })?;

    let reader = stream.try_clone().map_err(|source| ClientError::Connect {
        server: server.clone(),
        source,
    })?;
    Ok(Connection {
        reader: BufReader::new(reader),
        writer: stream,
    })
}

fn configure(stream: &TcpStream, timeout: Duration) -> io::Result<()> {
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;
    stream.set_nodelay(true)
}

fn resolve_tcp_address(host: &str, port: u16) -> io::Result<SocketAddr> {
    let mut addrs = (host, port).to_socket_addrs()?;
    addrs
        .find(|addr| matches!(addr, SocketAddr::V4(_) | SocketAddr::V6(_)))
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses"))
}
