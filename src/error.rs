use std::fmt;

use nix::errno::Errno;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// An address field was not exactly 6 bytes.
    AddrLen { field: &'static str, len: usize },
    /// The type/length field was not exactly 2 bytes.
    TypeLen(usize),
    /// The payload does not fit a 16-bit length field.
    PayloadTooLong(usize),
    /// Fewer bytes than an Ethernet header.
    TooShort(usize),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::AddrLen { field, len } => {
                write!(f, "{} address must be 6 bytes, got {}", field, len)
            }
            FrameError::TypeLen(len) => {
                write!(f, "type/length field must be 2 bytes, got {}", len)
            }
            FrameError::PayloadTooLong(len) => write!(
                f,
                "payload of {} bytes does not fit the 16-bit length field",
                len
            ),
            FrameError::TooShort(len) => {
                write!(f, "{} bytes is shorter than an ethernet header", len)
            }
        }
    }
}

impl std::error::Error for FrameError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacParseError {
    pub input: String,
}

impl fmt::Display for MacParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid MAC address {:?}: expected 6 colon-separated hex octets",
            self.input
        )
    }
}

impl std::error::Error for MacParseError {}

#[derive(Debug)]
pub enum ResolveError {
    NoDefaultRoute,
    RouteTable(std::io::Error),
    Interfaces(Errno),
    NoLinkAddr(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NoDefaultRoute => write!(f, "no default route found"),
            ResolveError::RouteTable(err) => write!(f, "cannot read routing table: {}", err),
            ResolveError::Interfaces(errno) => {
                write!(f, "cannot list network interfaces: {}", errno)
            }
            ResolveError::NoLinkAddr(ifname) => {
                write!(f, "interface {} has no link-layer address", ifname)
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::RouteTable(err) => Some(err),
            ResolveError::Interfaces(errno) => Some(errno),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStep {
    Interface,
    Open,
    Bind,
    Send,
}

impl fmt::Display for SendStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            SendStep::Interface => "resolve interface",
            SendStep::Open => "open raw socket",
            SendStep::Bind => "bind raw socket",
            SendStep::Send => "send frame",
        };
        f.write_str(step)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendError {
    pub step: SendStep,
    pub errno: Errno,
}

impl SendError {
    pub fn at(step: SendStep) -> impl FnOnce(Errno) -> Self {
        move |errno| SendError { step, errno }
    }
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to {}: {}", self.step, self.errno)
    }
}

impl std::error::Error for SendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.errno)
    }
}
