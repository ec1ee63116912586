//! Unix stream socket to the compositor, with file descriptor passing.

use std::{
    collections::VecDeque,
    io::{IoSlice, IoSliceMut},
    os::{
        fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd},
        unix::net::UnixStream,
    },
};

use rustix::{
    io::Errno,
    net::{
        RecvAncillaryBuffer, RecvAncillaryMessage, RecvFlags, SendAncillaryBuffer,
        SendAncillaryMessage, SendFlags, recvmsg, sendmsg,
    },
};
use tracing::{debug, trace};

use crate::{
    config::ClientConfig,
    error::{Error, Result},
    protocol::message::{WlMessage, WlMessageIter},
};

/// libwayland never attaches more than this many descriptors to one chunk.
const MAX_FDS_PER_RECV: usize = 28;

const RECV_CHUNK: usize = 4096;

/// Writes as much of `bytes` as the socket takes in one call.
fn send_chunk(
    stream: &UnixStream,
    bytes: &[u8],
    ancillary: &mut SendAncillaryBuffer<'_, '_, '_>,
) -> Result<usize> {
    loop {
        match sendmsg(stream.as_fd(), &[IoSlice::new(bytes)], ancillary, SendFlags::NOSIGNAL) {
            Ok(0) => return Err(Error::Disconnected),
            Ok(n) => return Ok(n),
            Err(Errno::INTR) => continue,
            Err(Errno::PIPE) | Err(Errno::CONNRESET) => return Err(Error::Disconnected),
            Err(err) => return Err(Error::Transport(err.into())),
        }
    }
}

/// Framed, bidirectional byte channel to one compositor.
#[derive(Debug)]
pub struct Transport {
    stream: Option<UnixStream>,
    inbound: WlMessageIter,
    fds: VecDeque<OwnedFd>,
}

impl Transport {
    /// Connects to the socket `config` resolves to.
    ///
    /// # Errors
    /// Environment errors from [`ClientConfig::socket_path`] are returned
    /// before any socket is created. A failed connect is reported as
    /// [`Error::ConnectFailed`].
    pub fn open(config: &ClientConfig) -> Result<Transport> {
        let path = config.socket_path()?;
        debug!("connecting to {}", path.display());

        let stream =
            UnixStream::connect(&path).map_err(|source| Error::ConnectFailed { path, source })?;

        Ok(Self::from_stream(stream))
    }

    /// Wraps an already connected stream, e.g. one end of a socket pair.
    pub fn from_stream(stream: UnixStream) -> Transport {
        Transport {
            stream: Some(stream),
            inbound: WlMessageIter::new(),
            fds: VecDeque::new(),
        }
    }

    fn stream(&self) -> Result<&UnixStream> {
        self.stream.as_ref().ok_or(Error::NotConnected)
    }

    /// Writes `bytes` in full, attaching `fds` to the first chunk.
    pub fn send(&mut self, bytes: &[u8], fds: &[BorrowedFd<'_>]) -> Result<()> {
        let stream = self.stream()?;

        let mut space = vec![0u8; rustix::cmsg_space!(ScmRights(fds.len()))];
        let mut ancillary = SendAncillaryBuffer::new(&mut space);
        if !fds.is_empty() {
            ancillary.push(SendAncillaryMessage::ScmRights(fds));
        }

        let mut written = send_chunk(stream, bytes, &mut ancillary)?;
        while written < bytes.len() {
            written += send_chunk(stream, &bytes[written..], &mut SendAncillaryBuffer::default())?;
        }

        trace!("sent {} bytes, {} fds", bytes.len(), fds.len());
        Ok(())
    }

    /// Reads one chunk from the socket into the framer.
    ///
    /// Returns `false` when a non-blocking read found nothing to read.
    fn fill(&mut self, blocking: bool) -> Result<bool> {
        let stream = self.stream.as_ref().ok_or(Error::NotConnected)?;

        let mut buf = [0u8; RECV_CHUNK];
        let mut space = [0u8; rustix::cmsg_space!(ScmRights(MAX_FDS_PER_RECV))];
        let mut flags = RecvFlags::CMSG_CLOEXEC;
        if !blocking {
            flags |= RecvFlags::DONTWAIT;
        }

        let received = loop {
            let mut ancillary = RecvAncillaryBuffer::new(&mut space);
            match recvmsg(
                stream.as_fd(),
                &mut [IoSliceMut::new(&mut buf)],
                &mut ancillary,
                flags,
            ) {
                Ok(msg) => {
                    for cmsg in ancillary.drain() {
                        if let RecvAncillaryMessage::ScmRights(fds) = cmsg {
                            self.fds.extend(fds);
                        }
                    }
                    break msg.bytes;
                }
                Err(Errno::INTR) => continue,
                Err(Errno::AGAIN) => return Ok(false),
                Err(Errno::CONNRESET) => return Err(Error::Disconnected),
                Err(err) => return Err(Error::Transport(err.into())),
            }
        };

        if received == 0 {
            return Err(Error::Disconnected);
        }

        trace!("received {received} bytes, {} fds pending", self.fds.len());
        self.inbound.push(&buf[..received]);
        Ok(true)
    }

    /// Blocks until a whole message is available.
    pub fn receive(&mut self) -> Result<WlMessage> {
        loop {
            if let Some(message) = self.inbound.next()? {
                return Ok(message);
            }
            self.fill(true)?;
        }
    }

    /// Returns a buffered or immediately readable message without blocking.
    pub fn try_receive(&mut self) -> Result<Option<WlMessage>> {
        loop {
            if let Some(message) = self.inbound.next()? {
                return Ok(Some(message));
            }
            if !self.fill(false)? {
                return Ok(None);
            }
        }
    }

    /// Descriptors received but not yet claimed by a decoded message.
    pub fn fds_mut(&mut self) -> &mut VecDeque<OwnedFd> {
        &mut self.fds
    }

    /// Shuts the socket. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            debug!("closing compositor socket");
            let _ = stream.shutdown(std::net::Shutdown::Both);
        }
        self.fds.clear();
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Raw descriptor of the socket, for integration with external pollers.
    pub fn as_raw_fd(&self) -> Option<RawFd> {
        self.stream.as_ref().map(|stream| stream.as_raw_fd())
    }
}
