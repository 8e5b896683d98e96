//! Process configuration.

use clap::Parser;

/// Command-line configuration for the Parlor client.
///
/// The bus endpoint is required — the process refuses to start without
/// it (clap exits with a usage message).
#[derive(Debug, Parser)]
#[command(name = "parlor", about = "Interactive chatroom client for a pub/sub bus")]
pub struct Config {
    /// Bus endpoint address, host:port.
    #[arg(long = "broker-addr")]
    pub broker_addr: String,

    /// Discovery service address (repeatable). Accepted but unused in
    /// this version.
    #[arg(long = "lookup-addr")]
    pub lookup_addrs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broker_addr_is_required() {
        let result = Config::try_parse_from(["parlor"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parses_broker_addr() {
        let config =
            Config::try_parse_from(["parlor", "--broker-addr", "127.0.0.1:4150"]).unwrap();
        assert_eq!(config.broker_addr, "127.0.0.1:4150");
        assert!(config.lookup_addrs.is_empty());
    }

    #[test]
    fn test_lookup_addrs_repeatable() {
        let config = Config::try_parse_from([
            "parlor",
            "--broker-addr",
            "127.0.0.1:4150",
            "--lookup-addr",
            "10.0.0.1:4160",
            "--lookup-addr",
            "10.0.0.2:4160",
        ])
        .unwrap();
        assert_eq!(config.lookup_addrs.len(), 2);
    }
}
