//! Capture files: a sequence of `[u32 little-endian length][packet bytes]` records.
//!
//! This is the on-disk form of the transport's already-framed messages, so a recorded session can
//! be replayed through the decoder without a live target.

use std::io::{self, Read, Write};

use crate::foundation::error::{LayerScopeError, LayerScopeResult};

/// Largest packet accepted from a capture (a generous bound on one uncompressed texture).
pub const MAX_CAPTURE_PACKET: u32 = 512 * 1024 * 1024;

/// Iterator over the packet buffers of a capture stream.
pub struct CaptureReader<R> {
    inner: R,
    max_packet: u32,
    done: bool,
}

impl<R: Read> CaptureReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_max_packet(inner, MAX_CAPTURE_PACKET)
    }

    pub fn with_max_packet(inner: R, max_packet: u32) -> Self {
        Self {
            inner,
            max_packet,
            done: false,
        }
    }

    fn read_record(&mut self) -> LayerScopeResult<Option<Vec<u8>>> {
        let mut header = [0u8; 4];
        let got = read_full(&mut self.inner, &mut header)?;
        if got == 0 {
            return Ok(None);
        }
        if got < header.len() {
            return Err(LayerScopeError::protocol(format!(
                "capture truncated inside a length header ({got} of 4 bytes)"
            )));
        }

        let len = u32::from_le_bytes(header);
        if len > self.max_packet {
            return Err(LayerScopeError::protocol(format!(
                "capture packet of {len} bytes exceeds limit of {}",
                self.max_packet
            )));
        }

        let mut packet = vec![0u8; len as usize];
        let got = read_full(&mut self.inner, &mut packet)?;
        if got < packet.len() {
            return Err(LayerScopeError::protocol(format!(
                "capture truncated: packet declares {len} bytes, {got} present"
            )));
        }
        Ok(Some(packet))
    }
}

impl<R: Read> Iterator for CaptureReader<R> {
    type Item = LayerScopeResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(p)) => Some(Ok(p)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Read until `buf` is full or EOF; returns the number of bytes read.
fn read_full(r: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Writes packets with capture framing.
pub struct CaptureWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> CaptureWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    pub fn write_packet(&mut self, packet: &[u8]) -> LayerScopeResult<()> {
        let len = u32::try_from(packet.len())
            .ok()
            .filter(|&n| n <= MAX_CAPTURE_PACKET)
            .ok_or_else(|| {
                LayerScopeError::protocol(format!(
                    "packet of {} bytes is too large for a capture",
                    packet.len()
                ))
            })?;
        self.inner.write_all(&len.to_le_bytes())?;
        self.inner.write_all(packet)?;
        self.written += 1;
        Ok(())
    }

    /// Number of packets written so far.
    pub fn packets_written(&self) -> u64 {
        self.written
    }

    pub fn finish(mut self) -> LayerScopeResult<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/protocol/capture.rs"]
mod tests;
