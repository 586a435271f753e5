use std::net::{Ipv4Addr, UdpSocket};

use log::{debug, warn};

use crate::dns::DnsPacket;
use crate::error::ResolveError;

/// Standard DNS port.
pub const DNS_PORT: u16 = 53;

/// Largest reply datagram read from a nameserver.
pub const MAX_PACKET_SIZE: usize = 4096;

/// One request/reply exchange with a nameserver.
pub trait Transport {
    fn exchange(
        &mut self,
        server: Ipv4Addr,
        query: &DnsPacket,
    ) -> Result<DnsPacket, ResolveError>;
}

/// Blocking UDP transport.
///
/// Owns a single socket bound to an ephemeral local port for its whole
/// lifetime; the socket is closed when the transport is dropped. There is
/// no timeout, so a silent server blocks `exchange` forever.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    port: u16,
    recv_size: usize,
}

impl UdpTransport {
    pub fn new() -> std::io::Result<Self> {
        UdpTransport::with_options(DNS_PORT, MAX_PACKET_SIZE)
    }

    pub fn with_options(port: u16, recv_size: usize) -> std::io::Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        Ok(UdpTransport {
            socket,
            port,
            recv_size,
        })
    }
}

impl Transport for UdpTransport {
    fn exchange(
        &mut self,
        server: Ipv4Addr,
        query: &DnsPacket,
    ) -> Result<DnsPacket, ResolveError> {
        // write our packet to a buffer
        let req = query.to_bytes()?;

        // send our query packet
        self.socket.send_to(&req, (server, self.port))?;

        // receive the response
        let mut res = vec![0u8; self.recv_size];
        let (len, src) = self.socket.recv_from(&mut res)?;
        debug!("received {} bytes from {}", len, src);

        // parse the response
        let reply = DnsPacket::from_bytes(&res[..len])?;
        if reply.header().id != query.header().id {
            warn!(
                "reply id {} from {} does not match query id {}",
                reply.header().id,
                src,
                query.header().id
            );
        }

        Ok(reply)
    }
}
