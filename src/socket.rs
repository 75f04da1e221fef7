use nix::net::if_::if_nametoindex;
use nix::sys::socket::{
    bind, send, socket, AddressFamily, LinkAddr, MsgFlags, SockFlag, SockType, SockaddrLike,
};
use nix::unistd::close;
use std::os::fd::RawFd;
use tracing::{debug, warn};

use crate::error::{SendError, SendStep};

struct FileDesc {
    fd: RawFd,
}

impl FileDesc {
    fn new(fd: RawFd) -> Self {
        Self { fd }
    }
}

impl Drop for FileDesc {
    fn drop(&mut self) {
        if let Err(err) = close(self.fd) {
            warn!(fd = self.fd, %err, "close failed");
        }
    }
}

/// An `AF_PACKET` raw socket bound to one interface.
pub struct RawSocket {
    socket: FileDesc,
    ifindex: u32,
}

impl RawSocket {
    pub fn bind(ifname: &str) -> Result<Self, SendError> {
        let ifindex = if_nametoindex(ifname).map_err(SendError::at(SendStep::Interface))?;
        // Protocol 0: send-only, the kernel queues nothing for this socket.
        let fd = socket(
            AddressFamily::Packet,
            SockType::Raw,
            SockFlag::empty(),
            None,
        )
        .map_err(SendError::at(SendStep::Open))?;
        let socket = FileDesc::new(fd);
        debug!(?fd, ?ifname, ifindex);

        let addr = bind_addr(ifindex).ok_or(SendError {
            step: SendStep::Bind,
            errno: nix::errno::Errno::EINVAL,
        })?;
        debug!(?addr);
        bind(socket.fd, &addr).map_err(SendError::at(SendStep::Bind))?;

        Ok(Self { socket, ifindex })
    }

    pub fn ifindex(&self) -> u32 {
        self.ifindex
    }

    /// Writes `frame` in a single call and returns the bytes the kernel took.
    pub fn send(&self, frame: &[u8]) -> Result<usize, SendError> {
        send(self.socket.fd, frame, MsgFlags::empty()).map_err(SendError::at(SendStep::Send))
    }
}

fn bind_addr(ifindex: u32) -> Option<LinkAddr> {
    let sockaddr = &nix::libc::sockaddr_ll {
        sll_family: nix::libc::AF_PACKET as nix::libc::sa_family_t,
        sll_protocol: 0,
        sll_ifindex: ifindex as i32,
        sll_hatype: 0,
        sll_pkttype: 0,
        sll_halen: 0,
        sll_addr: [0; 8],
    };
    // SAFETY: `sockaddr` is a fully initialised sockaddr_ll that outlives the call.
    unsafe {
        LinkAddr::from_raw(
            sockaddr as *const nix::libc::sockaddr_ll as *const nix::libc::sockaddr,
            None,
        )
    }
}

/// Transmits one already-built frame on `ifname`.
pub fn send_frame(frame: &[u8], ifname: &str) -> Result<usize, SendError> {
    let sock = RawSocket::bind(ifname)?;
    let ret = sock.send(frame)?;
    debug!(?ret, ifindex = sock.ifindex(), "frame sent");
    Ok(ret)
}
