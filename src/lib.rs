//! A small iterative DNS resolver.
//!
//! Starting from a root server, [`resolve`] follows referrals one server at a
//! time until some server answers with an address for the name.

use std::net::Ipv4Addr;

pub mod buffer;
pub mod dns;
pub mod error;
pub mod resolver;
pub mod transport;

pub use error::{CodecError, ResolveError};
pub use resolver::{Resolver, ResolverConfig, State};
pub use transport::{Transport, UdpTransport};

/// Resolves the A record of `qname` with a fresh UDP resolver and the
/// default configuration. `Ok(None)` means no server had an address.
pub fn resolve<S: AsRef<str>>(qname: S, root: Ipv4Addr) -> Result<Option<String>, ResolveError> {
    let mut resolver = Resolver::new(ResolverConfig::default())?;
    resolver.lookup(qname.as_ref(), root)
}

// root servers
pub mod rootserver {
    use std::net::Ipv4Addr;

    pub const A: Ipv4Addr = Ipv4Addr::new(198, 41, 0, 4);
    pub const B: Ipv4Addr = Ipv4Addr::new(199, 9, 14, 201);
    pub const C: Ipv4Addr = Ipv4Addr::new(192, 33, 4, 12);
    pub const D: Ipv4Addr = Ipv4Addr::new(199, 7, 91, 13);
    pub const E: Ipv4Addr = Ipv4Addr::new(192, 203, 230, 10);
    pub const F: Ipv4Addr = Ipv4Addr::new(192, 5, 5, 241);
    pub const G: Ipv4Addr = Ipv4Addr::new(192, 112, 36, 4);
    pub const H: Ipv4Addr = Ipv4Addr::new(198, 97, 190, 53);
    pub const I: Ipv4Addr = Ipv4Addr::new(192, 36, 148, 17);
    pub const J: Ipv4Addr = Ipv4Addr::new(192, 58, 128, 30);
    pub const K: Ipv4Addr = Ipv4Addr::new(193, 0, 14, 129);
    pub const L: Ipv4Addr = Ipv4Addr::new(199, 7, 83, 42);
    pub const M: Ipv4Addr = Ipv4Addr::new(202, 12, 27, 33);
}
