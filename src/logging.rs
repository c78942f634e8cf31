//! Module: logging
//!
//! Purpose: the relay's log output over the secondary serial port.
//!
//! Two distinct writes go out on this port: verbatim relays of received
//! messages, and formatted status/diagnostic lines. Both are synchronous
//! task-context writes; blocking on the UART is allowed there, unlike in
//! the interrupt path, which never logs.

use core::fmt;

use crate::message::Message;
use crate::serial::ByteTx;

/// Log severity for formatted status lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Maximum formatted line length.
pub const MAX_LINE_LEN: usize = 120;

/// Format a message into a fixed buffer, no allocation.
///
/// Returns the number of bytes written; output beyond the buffer is
/// truncated.
pub fn format_to_buffer(buf: &mut [u8], args: fmt::Arguments<'_>) -> usize {
    struct BufWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl<'a> fmt::Write for BufWriter<'a> {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            let bytes = s.as_bytes();
            let remaining = self.buf.len() - self.pos;
            let to_write = bytes.len().min(remaining);
            self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
            self.pos += to_write;
            Ok(())
        }
    }

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = fmt::write(&mut writer, args);
    writer.pos
}

/// The relay's log port.
///
/// Wraps the byte-transmit primitive of the log serial line.
pub struct SerialLog<T: ByteTx> {
    tx: T,
}

impl<T: ByteTx> SerialLog<T> {
    /// Build the log port over its transmit primitive.
    pub fn new(tx: T) -> Self {
        Self { tx }
    }

    /// Relay a received message verbatim: its bytes up to, not including,
    /// the terminator. Overflow-flushed messages have no terminator and
    /// are relayed in full.
    pub fn relay(&mut self, msg: &Message) {
        self.tx.send_all(msg.text_bytes());
    }

    /// Emit a fixed diagnostic string, byte for byte.
    pub fn diagnostic(&mut self, text: &str) {
        self.tx.send_all(text.as_bytes());
    }

    /// Emit a formatted status line: `[LEVEL] message\r\n`.
    pub fn line(&mut self, level: LogLevel, args: fmt::Arguments<'_>) {
        let mut buf = [0u8; MAX_LINE_LEN];
        let len = format_to_buffer(&mut buf, format_args!("[{}] {}\r\n", level.as_str(), args));
        self.tx.send_all(&buf[..len]);
    }

    /// The underlying transmit primitive.
    pub fn tx(&self) -> &T {
        &self.tx
    }

    /// Unwrap the transmit primitive.
    pub fn into_inner(self) -> T {
        self.tx
    }
}

/// Formatted info line on the relay log.
#[macro_export]
macro_rules! relay_info {
    ($log:expr, $($arg:tt)*) => {
        $log.line($crate::logging::LogLevel::Info, format_args!($($arg)*))
    };
}

/// Formatted warning line on the relay log.
#[macro_export]
macro_rules! relay_warn {
    ($log:expr, $($arg:tt)*) => {
        $log.line($crate::logging::LogLevel::Warn, format_args!($($arg)*))
    };
}

/// Formatted error line on the relay log.
#[macro_export]
macro_rules! relay_error {
    ($log:expr, $($arg:tt)*) => {
        $log.line($crate::logging::LogLevel::Error, format_args!($($arg)*))
    };
}
