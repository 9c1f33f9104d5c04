use std::io::{self, Write};
use std::time::Duration;

use log::trace;
use serial_core::prelude::*;

use crate::serial_port::{self, SerialError};

/// A serial port configured for talking to an LED scrolling sign.
///
/// Implements [`Write`] so it can be handed straight to [`scrollsign_core::transmit`]
/// or the high-level `Sign`. Writes are logged at trace level using the [`log`] crate;
/// consuming binaries typically use the [`env_logger`] crate and can be run with the
/// `RUST_LOG=trace` environment variable to watch the raw bytes go by.
///
/// # Examples
///
/// ```no_run
/// use scrollsign_serial::SerialLink;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let port = serial::open("/dev/ttyUSB0")?;
/// let link = SerialLink::try_new(port)?;
/// // Can now send messages over the link.
/// #
/// # Ok(()) }
/// ```
///
/// [`log`]: https://crates.io/crates/log
/// [`env_logger`]: https://crates.io/crates/env_logger
/// [`scrollsign_core::transmit`]: https://docs.rs/scrollsign-core/0.1.0/scrollsign_core/fn.transmit.html
#[derive(Debug, Eq, PartialEq, Hash)]
pub struct SerialLink<P: SerialPort> {
    port: P,
}

impl<P: SerialPort> SerialLink<P> {
    /// Creates a new `SerialLink` that communicates over the specified serial port.
    ///
    /// # Errors
    ///
    /// Returns a [`SerialError`] if the serial port cannot be configured.
    pub fn try_new(mut port: P) -> Result<Self, SerialError> {
        serial_port::configure_port(&mut port, Duration::from_secs(5))?;
        Ok(SerialLink { port })
    }

    /// Returns a reference to the underlying serial port.
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Consumes the link and returns the underlying serial port.
    pub fn into_inner(self) -> P {
        self.port
    }
}

impl<P: SerialPort> Write for SerialLink<P> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.port.write(buf)?;
        trace!("Wrote {} of {} bytes: {:02X?}", written, buf.len(), &buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}
