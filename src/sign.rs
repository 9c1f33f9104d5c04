use std::io::{self, Write};
use std::time::Duration;

use log::info;
use thiserror::Error;

use crate::core::{transmit, MessageList, TransmitError, ValidationError, DEFAULT_DELAY};

/// Errors related to [`Sign`]s.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SignError {
    /// The messages were rejected before anything was sent.
    #[error("Messages were rejected before sending")]
    Validation {
        /// The underlying validation error.
        #[from]
        source: ValidationError,
    },

    /// Sending the transmission failed partway through.
    #[error("Failed to send messages to the sign")]
    Transmit {
        /// The underlying transmit error.
        #[from]
        source: TransmitError,
    },

    /// The transmission was written but couldn't be flushed to the sign.
    #[error("Failed to flush messages to the sign")]
    Flush {
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// An LED scrolling sign attached to a byte sink, typically a [`SerialLink`](crate::SerialLink).
///
/// Each call to [`send_messages`](#method.send_messages) replaces everything the sign is showing.
/// The sign never replies, so success means only that every byte was written.
///
/// # Examples
///
/// ```no_run
/// use scrollsign::{Effect, Message, MessageList, SerialLink, Sign, Speed};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let port = serial::open("/dev/ttyUSB0")?;
/// let mut sign = Sign::new(SerialLink::try_new(port)?);
///
/// let mut messages = MessageList::new();
/// let _ = messages.push(Message::try_new("Now boarding".as_bytes(), Speed::try_new(2)?, Effect::Scroll)?)?;
/// let _ = messages.push(Message::try_new("Gate 4".as_bytes(), Speed::default(), Effect::Flash)?)?;
/// sign.send_messages(&messages)?;
/// #
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct Sign<W: Write> {
    sink: W,
    delay: Duration,
}

impl<W: Write> Sign<W> {
    /// Creates a new `Sign` that writes to the given sink, pausing [`DEFAULT_DELAY`] between packets.
    pub fn new(sink: W) -> Self {
        Sign {
            sink,
            delay: DEFAULT_DELAY,
        }
    }

    /// Sets the pause between packets.
    ///
    /// Shorter delays risk the sign dropping data; zero is mainly useful for testing.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the pause between packets.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns a reference to the underlying sink.
    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Consumes the sign and returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Encodes and sends the messages, then flushes the sink.
    ///
    /// Blocks for the duration of the configured delays, which with the default is
    /// roughly a second per message.
    ///
    /// # Errors
    ///
    /// Returns:
    /// * [`SignError::Validation`] if the list is empty. Nothing is written in this case.
    /// * [`SignError::Transmit`] if writing fails. The sign may be left with a partial transmission;
    ///   calling this again starts over from the beginning.
    /// * [`SignError::Flush`] if the sink can't be flushed.
    pub fn send_messages(&mut self, messages: &MessageList<'_>) -> Result<(), SignError> {
        for (slot, message) in messages.slots() {
            info!("Slot {}: {}", slot, message);
        }

        let buffers = messages.buffers()?;
        transmit(&buffers, &mut self.sink, self.delay)?;
        self.sink.flush().map_err(|source| SignError::Flush { source })?;
        Ok(())
    }
}
