//! Iterative resolution.
//!
//! Starting from a root (or any start) server, the resolver asks each server
//! for the A record of the name with recursion turned off. A server either
//! answers, or refers us to the nameservers of a closer zone. In that case the
//! next server's address is taken from the glue records in the additional
//! section. Every step goes through an explicit [`State`] and the number of
//! exchanges is capped by [`ResolverConfig::max_hops`], so a referral loop
//! cannot keep the resolver spinning.

use std::net::Ipv4Addr;

use log::{debug, info, warn};

use crate::dns::{DnsPacket, DnsQuestion, QueryType, RecordData};
use crate::error::ResolveError;
use crate::transport::{Transport, UdpTransport, DNS_PORT, MAX_PACKET_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Destination port for every query.
    pub port: u16,
    /// Maximum number of servers queried for one name.
    pub max_hops: usize,
    /// Receive buffer size for replies.
    pub recv_size: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            port: DNS_PORT,
            max_hops: 16,
            recv_size: MAX_PACKET_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// The next exchange goes to this server.
    Querying(Ipv4Addr),
    /// The first answer's data.
    Answered(String),
    /// The server had neither answers nor authorities.
    DeadEnd(Ipv4Addr),
    /// The server referred to a nameserver with no A glue.
    NoGlue { server: Ipv4Addr, nameserver: String },
    MaxHopsExceeded(usize),
}

pub struct Resolver<T = UdpTransport> {
    transport: T,
    config: ResolverConfig,
}

impl Resolver<UdpTransport> {
    pub fn new(config: ResolverConfig) -> Result<Self, ResolveError> {
        let transport = UdpTransport::with_options(config.port, config.recv_size)?;
        Ok(Resolver::with_transport(transport, config))
    }
}

impl<T: Transport> Resolver<T> {
    pub fn with_transport(transport: T, config: ResolverConfig) -> Self {
        Resolver { transport, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Sends `query` to `server` and decides where resolution goes next.
    pub fn step(&mut self, query: &DnsPacket, server: Ipv4Addr) -> Result<State, ResolveError> {
        let reply = self.transport.exchange(server, query)?;
        debug!(
            "{} replied {:?}: {} answers, {} authorities, {} additionals",
            server,
            reply.header().result_code(),
            reply.answers().len(),
            reply.authorities().len(),
            reply.additionals().len()
        );

        if let Some(answer) = reply.first_answer() {
            return Ok(State::Answered(answer.data.to_string()));
        }

        let authority = match reply.first_authority() {
            Some(authority) => authority,
            None => return Ok(State::DeadEnd(server)),
        };

        // an NS referral names the nameserver in its data, anything else
        // (an SOA for a negative answer, say) only has its owner name
        let nameserver = match &authority.data {
            RecordData::NS(ns) => ns.as_str(),
            _ => authority.domain.as_str(),
        };

        match reply.glue_for(nameserver) {
            Some(next) => {
                debug!("{} refers {} to {} ({})", server, authority.domain, nameserver, next);
                Ok(State::Querying(next))
            }
            None => Ok(State::NoGlue {
                server,
                nameserver: nameserver.to_string(),
            }),
        }
    }

    /// Resolves the A record of `name`, starting at `root`.
    pub fn resolve(&mut self, name: &str, root: Ipv4Addr) -> Result<String, ResolveError> {
        let query = DnsPacket::query(rand::random(), DnsQuestion::new(name, QueryType::A));

        let mut hops = 0;
        let mut state = State::Querying(root);
        loop {
            state = match state {
                State::Querying(_) if hops >= self.config.max_hops => State::MaxHopsExceeded(hops),
                State::Querying(server) => {
                    hops += 1;
                    info!("querying {} for {}", server, name);
                    self.step(&query, server)?
                }
                State::Answered(addr) => return Ok(addr),
                State::DeadEnd(server) => return Err(ResolveError::DeadEnd { server }),
                State::NoGlue { server, nameserver } => {
                    return Err(ResolveError::NoGlue { server, nameserver })
                }
                State::MaxHopsExceeded(hops) => {
                    return Err(ResolveError::MaxHopsExceeded { hops })
                }
            };
        }
    }

    /// Like [`resolve`](Self::resolve), but a referral chain that runs out
    /// without an address is `Ok(None)` rather than an error.
    pub fn lookup(&mut self, name: &str, root: Ipv4Addr) -> Result<Option<String>, ResolveError> {
        match self.resolve(name, root) {
            Ok(addr) => Ok(Some(addr)),
            Err(e) if e.is_unresolved() => {
                warn!("{}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use super::*;
    use crate::dns::{DnsHeader, DnsRecord};

    const ROOT: Ipv4Addr = Ipv4Addr::new(198, 41, 0, 4);
    const EDU: Ipv4Addr = Ipv4Addr::new(192, 5, 6, 30);
    const FIU: Ipv4Addr = Ipv4Addr::new(131, 94, 191, 11);

    // replays canned replies in order and remembers who was asked
    #[derive(Default)]
    struct Scripted {
        replies: VecDeque<DnsPacket>,
        asked: Vec<Ipv4Addr>,
        queries: Vec<DnsPacket>,
    }

    impl Scripted {
        fn new(replies: Vec<DnsPacket>) -> Self {
            Scripted {
                replies: replies.into(),
                ..Default::default()
            }
        }
    }

    impl Transport for Scripted {
        fn exchange(
            &mut self,
            server: Ipv4Addr,
            query: &DnsPacket,
        ) -> Result<DnsPacket, ResolveError> {
            self.asked.push(server);
            self.queries.push(query.clone());

            let reply = self
                .replies
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))?;

            // go through the wire format so replies look like decoded ones
            Ok(DnsPacket::from_bytes(&reply.to_bytes()?)?)
        }
    }

    fn reply(
        answers: Vec<DnsRecord>,
        authorities: Vec<DnsRecord>,
        additionals: Vec<DnsRecord>,
    ) -> DnsPacket {
        let mut header = DnsHeader::new();
        header.qr = true;
        DnsPacket::new(
            header,
            vec![DnsQuestion::new("cs.fiu.edu", QueryType::A)],
            answers,
            authorities,
            additionals,
        )
    }

    fn resolver(replies: Vec<DnsPacket>) -> Resolver<Scripted> {
        Resolver::with_transport(Scripted::new(replies), ResolverConfig::default())
    }

    #[test]
    fn test_follows_referrals() {
        let mut resolver = resolver(vec![
            reply(
                vec![],
                vec![DnsRecord::ns("edu", "a.edu-servers.net", 172800)],
                vec![DnsRecord::a("a.edu-servers.net", EDU, 172800)],
            ),
            reply(
                vec![],
                vec![DnsRecord::ns("fiu.edu", "ns1.fiu.edu", 86400)],
                vec![DnsRecord::a("ns1.fiu.edu", FIU, 86400)],
            ),
            reply(
                vec![DnsRecord::a("cs.fiu.edu", Ipv4Addr::new(131, 94, 128, 1), 300)],
                vec![],
                vec![],
            ),
        ]);

        let addr = resolver.resolve("cs.fiu.edu", ROOT).unwrap();
        assert_eq!(addr, "131.94.128.1");

        let transport = resolver.into_transport();
        assert_eq!(transport.asked, vec![ROOT, EDU, FIU]);
        for query in &transport.queries {
            assert!(!query.header().rd);
            assert_eq!(query.questions(), &[DnsQuestion::new("cs.fiu.edu", QueryType::A)]);
        }
        // the same query, and so the same id, goes to every server
        assert_eq!(transport.queries[0], transport.queries[2]);
    }

    #[test]
    fn test_first_answer_wins() {
        let mut resolver = resolver(vec![reply(
            vec![
                DnsRecord::a("cs.fiu.edu", Ipv4Addr::new(10, 0, 0, 1), 300),
                DnsRecord::a("cs.fiu.edu", Ipv4Addr::new(10, 0, 0, 2), 300),
            ],
            vec![],
            vec![],
        )]);

        assert_eq!(resolver.resolve("cs.fiu.edu", ROOT).unwrap(), "10.0.0.1");
    }

    #[test]
    fn test_dead_end() {
        let mut resolver = resolver(vec![reply(vec![], vec![], vec![])]);

        let err = resolver.resolve("cs.fiu.edu", ROOT).unwrap_err();
        assert!(matches!(err, ResolveError::DeadEnd { server } if server == ROOT));
    }

    #[test]
    fn test_dead_end_is_not_swallowed_by_lookup() {
        let mut resolver = resolver(vec![reply(vec![], vec![], vec![])]);
        assert!(matches!(
            resolver.lookup("cs.fiu.edu", ROOT),
            Err(ResolveError::DeadEnd { .. })
        ));
    }

    #[test]
    fn test_missing_glue() {
        let mut resolver = resolver(vec![reply(
            vec![],
            vec![DnsRecord::ns("example", "ns1.example.", 3600)],
            vec![
                DnsRecord::ns("example", "ns2.example", 3600),
                DnsRecord::a("ns2.example", EDU, 3600),
            ],
        )]);

        let err = resolver.resolve("www.example", ROOT).unwrap_err();
        match err {
            ResolveError::NoGlue { server, nameserver } => {
                assert_eq!(server, ROOT);
                assert_eq!(nameserver, "ns1.example");
            }
            other => panic!("expected NoGlue, got {:?}", other),
        }
        assert_eq!(resolver.into_transport().asked, vec![ROOT]);
    }

    #[test]
    fn test_missing_glue_is_no_address() {
        let mut resolver = resolver(vec![reply(
            vec![],
            vec![DnsRecord::ns("example", "ns1.example", 3600)],
            vec![],
        )]);

        assert_eq!(resolver.lookup("www.example", ROOT).unwrap(), None);
    }

    #[test]
    fn test_referral_loop_is_bounded() {
        let looping = || {
            reply(
                vec![],
                vec![DnsRecord::ns("edu", "a.edu-servers.net", 172800)],
                vec![DnsRecord::a("a.edu-servers.net", ROOT, 172800)],
            )
        };
        let config = ResolverConfig {
            max_hops: 3,
            ..Default::default()
        };
        let mut resolver =
            Resolver::with_transport(Scripted::new((0..10).map(|_| looping()).collect()), config);

        let err = resolver.resolve("cs.fiu.edu", ROOT).unwrap_err();
        assert!(matches!(err, ResolveError::MaxHopsExceeded { hops: 3 }));
        assert_eq!(resolver.into_transport().asked.len(), 3);
    }

    #[test]
    fn test_transport_error_propagates() {
        let mut resolver = resolver(vec![]);
        assert!(matches!(
            resolver.lookup("cs.fiu.edu", ROOT),
            Err(ResolveError::Io(_))
        ));
    }

    #[test]
    fn test_step_states() {
        let mut resolver = resolver(vec![
            reply(
                vec![],
                vec![DnsRecord::ns("edu", "a.edu-servers.net", 172800)],
                vec![DnsRecord::a("a.edu-servers.net", EDU, 172800)],
            ),
            reply(vec![], vec![], vec![]),
        ]);
        let query = DnsPacket::query(1, DnsQuestion::new("cs.fiu.edu", QueryType::A));

        assert_eq!(resolver.step(&query, ROOT).unwrap(), State::Querying(EDU));
        assert_eq!(resolver.step(&query, EDU).unwrap(), State::DeadEnd(EDU));
    }

    #[test]
    fn test_negative_authority_has_no_glue() {
        // an SOA authority, carried as opaque data, with an A record at its owner name
        let soa = DnsRecord {
            domain: "fiu.edu".to_string(),
            qtype: QueryType::UNKNOWN(6),
            class: crate::dns::CLASS_IN,
            ttl: 3600,
            data: RecordData::Opaque(vec![0; 22]),
        };
        let mut resolver = resolver(vec![
            reply(vec![], vec![soa.clone()], vec![]),
            reply(
                vec![],
                vec![soa],
                vec![DnsRecord::a("fiu.edu", FIU, 3600)],
            ),
        ]);
        let query = DnsPacket::query(1, DnsQuestion::new("nope.fiu.edu", QueryType::A));

        assert_eq!(
            resolver.step(&query, FIU).unwrap(),
            State::NoGlue {
                server: FIU,
                nameserver: "fiu.edu".to_string(),
            }
        );
        // the owner name is what gets matched against the additionals
        assert_eq!(resolver.step(&query, FIU).unwrap(), State::Querying(FIU));
    }
}
