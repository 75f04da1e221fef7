use clap::Parser;
use tracing::debug;

use crate::error::ResolveError;
use crate::ether::{MacAddr, DEFAULT_DST_MAC};
use crate::net::NetLookup;

/// Send a raw Ethernet frame carrying a text payload.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Payload to put in the frame
    pub payload: String,

    /// Destination MAC address
    #[arg(short, long, value_name = "MAC", default_value_t = DEFAULT_DST_MAC)]
    pub dst: MacAddr,

    /// Source MAC address [default: MAC of the chosen interface]
    #[arg(short, long, value_name = "MAC")]
    pub src: Option<MacAddr>,

    /// Network interface to send on [default: interface of the default route]
    #[arg(short, long, value_name = "IFNAME")]
    pub interface: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Config {
    pub interface: String,
    pub dst: MacAddr,
    pub src: MacAddr,
    pub payload: Vec<u8>,
}

impl Config {
    /// Fills in whatever the command line left out. Lookups only happen for
    /// values that were not given.
    pub fn resolve(args: Args, net: &impl NetLookup) -> Result<Self, ResolveError> {
        let interface = match args.interface {
            Some(interface) => interface,
            None => {
                let interface = net.default_interface()?;
                debug!(?interface, "using default route interface");
                interface
            }
        };
        let src = match args.src {
            Some(src) => src,
            None => {
                let src = net.link_addr(&interface)?;
                debug!(%src, ?interface, "using interface address");
                src
            }
        };
        Ok(Config {
            interface,
            dst: args.dst,
            src,
            payload: args.payload.into_bytes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeNet {
        default_route: Option<&'static str>,
        calls: RefCell<Vec<String>>,
    }

    impl NetLookup for FakeNet {
        fn default_interface(&self) -> Result<String, ResolveError> {
            self.calls.borrow_mut().push("default_interface".to_string());
            self.default_route
                .map(str::to_string)
                .ok_or(ResolveError::NoDefaultRoute)
        }

        fn link_addr(&self, ifname: &str) -> Result<MacAddr, ResolveError> {
            self.calls.borrow_mut().push(format!("link_addr {}", ifname));
            match ifname {
                "eth0" => Ok(MacAddr([0x02, 0, 0, 0, 0, 0x01])),
                "wlan0" => Ok(MacAddr([0x02, 0, 0, 0, 0, 0x02])),
                _ => Err(ResolveError::NoLinkAddr(ifname.to_string())),
            }
        }
    }

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("ethsend").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_all_defaults() {
        let net = FakeNet {
            default_route: Some("eth0"),
            ..Default::default()
        };
        let config = Config::resolve(parse(&["hello world"]), &net).unwrap();
        assert_eq!(
            config,
            Config {
                interface: "eth0".to_string(),
                dst: DEFAULT_DST_MAC,
                src: MacAddr([0x02, 0, 0, 0, 0, 0x01]),
                payload: b"hello world".to_vec(),
            }
        );
        assert_eq!(*net.calls.borrow(), ["default_interface", "link_addr eth0"]);
    }

    #[test]
    fn test_explicit_options_skip_lookups() {
        let net = FakeNet::default();
        let config = Config::resolve(
            parse(&[
                "-d",
                "11:22:33:44:55:66",
                "--src",
                "AA:BB:CC:DD:EE:FF",
                "-i",
                "veth9",
                "payload",
            ]),
            &net,
        )
        .unwrap();
        assert_eq!(config.interface, "veth9");
        assert_eq!(config.dst, MacAddr([0x11, 0x22, 0x33, 0x44, 0x55, 0x66]));
        assert_eq!(config.src, MacAddr([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]));
        assert!(net.calls.borrow().is_empty());
    }

    #[test]
    fn test_source_follows_chosen_interface() {
        let net = FakeNet {
            default_route: Some("eth0"),
            ..Default::default()
        };
        let config = Config::resolve(parse(&["-i", "wlan0", "x"]), &net).unwrap();
        assert_eq!(config.src, MacAddr([0x02, 0, 0, 0, 0, 0x02]));
        assert_eq!(*net.calls.borrow(), ["link_addr wlan0"]);
    }

    #[test]
    fn test_resolution_errors() {
        let net = FakeNet::default();
        assert!(matches!(
            Config::resolve(parse(&["x"]), &net),
            Err(ResolveError::NoDefaultRoute)
        ));
        assert!(matches!(
            Config::resolve(parse(&["-i", "lo9", "x"]), &net),
            Err(ResolveError::NoLinkAddr(name)) if name == "lo9"
        ));
    }

    #[test]
    fn test_rejects_malformed_mac() {
        for argv in [
            ["-d", "ab:cd:ef:ab:cd", "x"],
            ["-s", "ab:cd:ef:ab:cd:ef:00", "x"],
            ["-d", "not-a-mac", "x"],
        ] {
            let argv = std::iter::once("ethsend").chain(argv);
            assert!(Args::try_parse_from(argv).is_err());
        }
    }

    #[test]
    fn test_payload_required() {
        assert!(Args::try_parse_from(["ethsend"]).is_err());
    }
}
