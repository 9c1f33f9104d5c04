use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use log::{debug, info};
use thiserror::Error;

use crate::{MessageBuffer, Terminator, TypeMarker, ValidationError, INIT_BYTE};

/// Pause between packets that the sign needs for reliable reception.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(200);

/// Errors related to sending a transmission.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransmitError {
    /// The transmission was rejected before anything was written.
    #[error("Invalid transmission")]
    Validation {
        /// The underlying validation error.
        #[from]
        source: ValidationError,
    },

    /// Writing to the sink failed partway through.
    ///
    /// The sign may have received part of the transmission.
    #[error("Failed writing transmission to the sign")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: io::Error,
    },
}

/// Sends a complete transmission of encoded messages to the sign.
///
/// The sequence is the [`INIT_BYTE`], then four [`Packet`](crate::Packet)s per message
/// in slot order, then a [`Terminator`] activating every slot that was sent. `delay` is
/// observed after the init byte, after every packet, and again after each message;
/// a zero delay skips sleeping entirely.
///
/// The sink is neither flushed nor closed.
///
/// # Errors
///
/// Returns [`TransmitError::Validation`] without writing anything if `buffers` is empty
/// or holds more than [`MAX_MESSAGES`](crate::MAX_MESSAGES) messages.
///
/// Returns [`TransmitError::Io`] as soon as any write fails; the rest of the sequence
/// is abandoned and nothing is retried.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use scrollsign_core::{transmit, Effect, Message, MessageList, Speed};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let mut messages = MessageList::new();
/// let _ = messages.push(Message::try_new("Hello".as_bytes(), Speed::try_new(3)?, Effect::Scroll)?)?;
///
/// let mut output = Vec::new();
/// transmit(&messages.buffers()?, &mut output, Duration::from_millis(0))?;
/// assert_eq!(1 + 4 * 69 + 3, output.len());
/// assert_eq!(&[0x02, 0x33, 0x01], &output[output.len() - 3..]);
/// #
/// # Ok(()) }
/// ```
pub fn transmit<W: Write + ?Sized>(
    buffers: &[MessageBuffer],
    sink: &mut W,
    delay: Duration,
) -> Result<(), TransmitError> {
    let terminator = Terminator::for_count(buffers.len())?;

    info!("Sending {} message(s) to sign", buffers.len());
    sink.write_all(&[INIT_BYTE])?;
    pause(delay);

    for (position, buffer) in buffers.iter().enumerate() {
        debug!("Message {}: {:?}", position + 1, buffer);
        for packet in buffer.packets(TypeMarker::for_position(position)) {
            debug!("Packet: {}", packet);
            packet.write(sink)?;
            pause(delay);
        }
        pause(delay);
    }

    debug!("Terminator: {}", terminator);
    terminator.write(sink)?;
    info!("Transmission complete");
    Ok(())
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}
