use nix::ifaddrs::getifaddrs;
use tracing::debug;

use crate::error::ResolveError;
use crate::ether::MacAddr;

const ROUTE_TABLE: &str = "/proc/net/route";
const RTF_UP: u32 = 0x0001;

/// System lookups needed to fill in defaults.
pub trait NetLookup {
    fn default_interface(&self) -> Result<String, ResolveError>;
    fn link_addr(&self, ifname: &str) -> Result<MacAddr, ResolveError>;
}

/// Answers lookups from the running host.
pub struct HostNet;

impl NetLookup for HostNet {
    fn default_interface(&self) -> Result<String, ResolveError> {
        let table = std::fs::read_to_string(ROUTE_TABLE).map_err(ResolveError::RouteTable)?;
        default_route_interface(&table)
    }

    fn link_addr(&self, ifname: &str) -> Result<MacAddr, ResolveError> {
        get_link_addr(ifname)
    }
}

/// Picks the interface of the default IPv4 route out of a `/proc/net/route`
/// table. With several default routes the lowest metric wins.
pub fn default_route_interface(table: &str) -> Result<String, ResolveError> {
    let mut best: Option<(u32, &str)> = None;
    for line in table.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [iface, destination, _gateway, flags, _refcnt, _use, metric, mask, ..] = fields[..]
        else {
            continue;
        };
        let (Ok(destination), Ok(flags), Ok(metric), Ok(mask)) = (
            u32::from_str_radix(destination, 16),
            u32::from_str_radix(flags, 16),
            metric.parse::<u32>(),
            u32::from_str_radix(mask, 16),
        ) else {
            continue;
        };
        debug!(?iface, destination, flags, metric, mask);
        if destination != 0 || mask != 0 || flags & RTF_UP == 0 {
            continue;
        }
        if best.map_or(true, |(m, _)| metric < m) {
            best = Some((metric, iface));
        }
    }
    best.map(|(_, iface)| iface.to_string())
        .ok_or(ResolveError::NoDefaultRoute)
}

pub fn get_link_addr(name: &str) -> Result<MacAddr, ResolveError> {
    let ifiter = getifaddrs().map_err(ResolveError::Interfaces)?;
    for interface in ifiter {
        if interface.interface_name != name {
            continue;
        }
        if let Some(storage) = interface.address {
            if let Some(link_addr) = storage.as_link_addr() {
                debug!(?link_addr);
                if let Some(bytes) = link_addr.addr() {
                    return Ok(MacAddr(bytes));
                }
            }
        }
    }
    Err(ResolveError::NoLinkAddr(name.to_string()))
}
