use std::net::Ipv4Addr;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use dnswalk::{rootserver, Resolver, ResolverConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Iteratively resolve a domain name from a root server")]
struct Args {
    /// Name to resolve
    #[arg(default_value = "cs.fiu.edu")]
    domain_name: String,

    /// Server the walk starts at
    #[arg(default_value_t = rootserver::A)]
    root_dns_ip: Ipv4Addr,

    /// Destination port for queries
    #[arg(long, default_value_t = 53)]
    port: u16,

    /// Give up after querying this many servers
    #[arg(long, default_value_t = 16)]
    max_hops: usize,

    /// Log every reply and referral
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = ResolverConfig {
        port: args.port,
        max_hops: args.max_hops,
        ..Default::default()
    };

    let result = Resolver::new(config)
        .and_then(|mut resolver| resolver.lookup(&args.domain_name, args.root_dns_ip));

    match result {
        Ok(Some(addr)) => {
            println!("{}", addr);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            error!("no address found for {}", args.domain_name);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
