use std::fmt;
use std::str::FromStr;

use crate::error::{FrameError, MacParseError};

pub const ETH_ALEN: usize = 6;
pub const ETH_TYPE_LEN: usize = 2;
pub const ETH_HLEN: usize = 2 * ETH_ALEN + ETH_TYPE_LEN;
/// Largest untagged frame the link accepts, FCS excluded.
pub const ETH_FRAME_LEN: usize = 1514;

/// Placeholder destination used when none is given.
pub const DEFAULT_DST_MAC: MacAddr = MacAddr([0xab, 0xcd, 0xef, 0xab, 0xcd, 0xef]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddr(pub [u8; ETH_ALEN]);

impl MacAddr {
    pub fn octets(&self) -> [u8; ETH_ALEN] {
        self.0
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            a, b, c, d, e, g
        )
    }
}

impl FromStr for MacAddr {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MacParseError {
            input: s.to_string(),
        };
        let octets = s
            .split(':')
            .map(|v| {
                if v.is_empty() || v.len() > 2 || !v.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(err());
                }
                u8::from_str_radix(v, 16).map_err(|_| err())
            })
            .collect::<Result<Vec<_>, _>>()?;
        match octets[..] {
            [a, b, c, d, e, f] => Ok(MacAddr([a, b, c, d, e, f])),
            _ => Err(err()),
        }
    }
}

/// Encodes a payload length as the big-endian type/length field.
pub fn length_field(payload_len: usize) -> Result<[u8; ETH_TYPE_LEN], FrameError> {
    u16::try_from(payload_len)
        .map(u16::to_be_bytes)
        .map_err(|_| FrameError::PayloadTooLong(payload_len))
}

/// Concatenates `dst || src || type_len || payload`.
///
/// The three header fields are checked for their exact widths; nothing is
/// truncated or padded.
pub fn build_frame(
    dst: &[u8],
    src: &[u8],
    type_len: &[u8],
    payload: &[u8],
) -> Result<Vec<u8>, FrameError> {
    if dst.len() != ETH_ALEN {
        return Err(FrameError::AddrLen {
            field: "destination",
            len: dst.len(),
        });
    }
    if src.len() != ETH_ALEN {
        return Err(FrameError::AddrLen {
            field: "source",
            len: src.len(),
        });
    }
    if type_len.len() != ETH_TYPE_LEN {
        return Err(FrameError::TypeLen(type_len.len()));
    }

    let mut byte = Vec::with_capacity(ETH_HLEN + payload.len());
    byte.extend_from_slice(dst);
    byte.extend_from_slice(src);
    byte.extend_from_slice(type_len);
    byte.extend_from_slice(payload);
    Ok(byte)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetFrame {
    pub dst_mac_addr: MacAddr,
    pub source_mac_addr: MacAddr,
    pub type_len: [u8; ETH_TYPE_LEN],
    pub payload: Vec<u8>,
}

impl EthernetFrame {
    /// A frame whose type/length field carries the payload length.
    pub fn new(
        dst_mac_addr: MacAddr,
        source_mac_addr: MacAddr,
        payload: Vec<u8>,
    ) -> Result<Self, FrameError> {
        let type_len = length_field(payload.len())?;
        Ok(EthernetFrame {
            dst_mac_addr,
            source_mac_addr,
            type_len,
            payload,
        })
    }

    pub fn to_byte_array(&self) -> Result<Vec<u8>, FrameError> {
        build_frame(
            &self.dst_mac_addr.octets(),
            &self.source_mac_addr.octets(),
            &self.type_len,
            &self.payload,
        )
    }

    /// Splits wire bytes back into the header fields and payload.
    pub fn parse(buf: &[u8]) -> Result<Self, FrameError> {
        if buf.len() < ETH_HLEN {
            return Err(FrameError::TooShort(buf.len()));
        }
        Ok(Self {
            dst_mac_addr: MacAddr([buf[0], buf[1], buf[2], buf[3], buf[4], buf[5]]),
            source_mac_addr: MacAddr([buf[6], buf[7], buf[8], buf[9], buf[10], buf[11]]),
            type_len: [buf[12], buf[13]],
            payload: buf[ETH_HLEN..].to_vec(),
        })
    }
}
