use std::time::Duration;

use serial_core::prelude::*;
use thiserror::Error;

/// Errors related to configuring the serial port.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SerialError {
    /// The serial port rejected the line settings.
    #[error("Couldn't configure serial port")]
    Configuration {
        /// The underlying serial port error.
        #[source]
        source: serial_core::Error,
    },

    /// The serial port rejected the write timeout.
    #[error("Couldn't set serial timeout")]
    Timeout {
        /// The underlying serial port error.
        #[source]
        source: serial_core::Error,
    },
}

/// Configures the given serial port appropriately for use with LED scrolling signs.
///
/// Specifically, the signs require 8E1 format at 38400 baud. Also sets the provided timeout value.
///
/// # Errors
///
/// Returns [`SerialError::Configuration`] or [`SerialError::Timeout`] if the underlying
/// serial port reports an error.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let mut port = serial::open("/dev/ttyUSB0")?;
/// scrollsign_serial::configure_port(&mut port, Duration::from_secs(5))?;
/// // Now ready for communication with a sign (8E1 38400 baud).
/// #
/// # Ok(()) }
/// ```
pub fn configure_port<P: SerialPort + ?Sized>(port: &mut P, timeout: Duration) -> Result<(), SerialError> {
    port.reconfigure(&|settings| {
        settings.set_baud_rate(serial_core::Baud38400)?;
        settings.set_char_size(serial_core::Bits8);
        settings.set_parity(serial_core::ParityEven);
        settings.set_stop_bits(serial_core::Stop1);
        settings.set_flow_control(serial_core::FlowNone);
        Ok(())
    })
    .map_err(|source| SerialError::Configuration { source })?;

    port.set_timeout(timeout)
        .map_err(|source| SerialError::Timeout { source })?;

    Ok(())
}
