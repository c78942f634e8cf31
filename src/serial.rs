//! Module: serial
//!
//! Purpose: the byte-level transmit seam.
//!
//! The hardware implementation busy-waits on the transmitter-ready flag
//! between bytes. That polling loop is a hardware contract, and it lives
//! behind this trait so the core logic under test can substitute a mock
//! that never blocks.

/// Blocking byte-transmit primitive (external collaborator).
pub trait ByteTx {
    /// Send one byte, blocking until the transmitter is ready to accept
    /// it.
    fn send_byte(&mut self, byte: u8);

    /// Send a run of bytes back-to-back.
    fn send_all(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.send_byte(b);
        }
    }
}

impl<T: ByteTx + ?Sized> ByteTx for &mut T {
    fn send_byte(&mut self, byte: u8) {
        (**self).send_byte(byte);
    }
}
