use std::io::{self, Write};

use log::{debug, info, warn};
use thiserror::Error;

use scrollsign_core::{
    Effect, MessageBuffer, Packet, PacketError, Terminator, TypeMarker, BUFFER_LEN, END_COMMAND, INIT_BYTE,
    MAX_MESSAGES, PACKET_LEN, TERMINATOR_LEN,
};

/// Errors raised by a [`VirtualSign`] when the incoming byte stream breaks the protocol.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VirtualSignError {
    /// A transmission didn't begin with the init byte.
    #[error("Expected init byte 0x00 to start a transmission, got 0x{:02X}", actual)]
    MissingInit {
        /// The byte received instead.
        actual: u8,
    },

    /// A frame could not be parsed.
    #[error("Received a malformed frame")]
    Frame {
        /// The underlying parse error.
        #[from]
        source: PacketError,
    },

    /// A packet arrived out of chunk order.
    #[error("Expected chunk at offset {}, got {}", expected, actual)]
    OutOfOrder {
        /// The offset of the next expected chunk.
        expected: usize,

        /// The offset that was received.
        actual: usize,
    },

    /// A packet carried the wrong type marker for the message being received.
    #[error("Expected type marker {}, got {}", expected, actual)]
    WrongTypeMarker {
        /// The marker for the message being received.
        expected: u8,

        /// The marker that was received.
        actual: u8,
    },

    /// More messages were sent than the sign has slots for.
    #[error("Received more than {} messages", max)]
    TooManyMessages {
        /// The number of slots on the sign.
        max: usize,
    },

    /// The terminator didn't activate the same number of slots as messages received.
    #[error("Terminator activated {} slots but {} messages were received", declared, received)]
    SlotMismatch {
        /// The slot count from the terminator.
        declared: usize,

        /// The number of complete messages received.
        received: usize,
    },

    /// The terminator arrived in the middle of a message.
    #[error("Terminator arrived after only {} of {} bytes of a message", received, expected)]
    IncompleteMessage {
        /// Bytes of the partial message received so far.
        received: usize,

        /// Bytes in a complete message.
        expected: usize,
    },
}

/// A message as reassembled by a [`VirtualSign`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ReceivedMessage {
    type_marker: TypeMarker,
    buffer: MessageBuffer,
}

impl ReceivedMessage {
    /// Returns the type marker shared by the message's packets.
    pub fn type_marker(&self) -> TypeMarker {
        self.type_marker
    }

    /// Returns the reassembled buffer.
    pub fn buffer(&self) -> &MessageBuffer {
        &self.buffer
    }

    /// Returns the slot number decoded from the ASCII slot digit.
    pub fn slot(&self) -> u8 {
        self.buffer.slot_digit().wrapping_sub(b'0')
    }

    /// Returns the speed decoded from the ASCII speed digit.
    pub fn speed(&self) -> u8 {
        self.buffer.speed_digit().wrapping_sub(b'0')
    }

    /// Returns the effect, or `None` if the code is unknown.
    pub fn effect(&self) -> Option<Effect> {
        Effect::from_code(self.buffer.effect_code())
    }

    /// Returns the message text.
    pub fn text(&self) -> &[u8] {
        self.buffer.text()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
enum Phase {
    #[default]
    Idle,
    Receiving,
}

/// Mock implementation of an LED scrolling sign.
///
/// Implements [`Write`] so it can stand in for a serial port. The incoming byte stream is
/// decoded as it arrives: framing and checksums are verified, packets are reassembled into
/// messages, and the terminator determines which messages end up on display. A protocol
/// violation causes the write to fail with [`io::ErrorKind::InvalidData`] wrapping a
/// [`VirtualSignError`], and the sign goes back to waiting for an init byte.
///
/// Received messages are logged using the [`log`] crate for debugging purposes.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use scrollsign_core::{transmit, Effect, Message, MessageList, Speed};
/// use scrollsign_testing::VirtualSign;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let mut messages = MessageList::new();
/// let _ = messages.push(Message::try_new("Hello".as_bytes(), Speed::try_new(3)?, Effect::Snow)?)?;
///
/// let mut sign = VirtualSign::new();
/// transmit(&messages.buffers()?, &mut sign, Duration::from_millis(0))?;
///
/// let shown = sign.displayed();
/// assert_eq!(1, shown.len());
/// assert_eq!(b"Hello", shown[0].text());
/// assert_eq!(Some(Effect::Snow), shown[0].effect());
/// #
/// # Ok(()) }
/// ```
///
/// [`log`]: https://crates.io/crates/log
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VirtualSign {
    phase: Phase,
    pending: Vec<u8>,
    partial: Vec<u8>,
    messages: Vec<ReceivedMessage>,
    terminator: Option<Terminator>,
    transmissions: usize,
}

impl VirtualSign {
    /// Creates a new `VirtualSign` waiting for a transmission.
    pub fn new() -> Self {
        Default::default()
    }

    /// Processes incoming bytes.
    ///
    /// Bytes may arrive in arbitrary pieces; incomplete frames are held until the rest arrives.
    ///
    /// # Errors
    ///
    /// Returns a [`VirtualSignError`] describing the first protocol violation found. Any partially
    /// received transmission is discarded.
    pub fn feed(&mut self, data: &[u8]) -> Result<(), VirtualSignError> {
        self.pending.extend_from_slice(data);
        loop {
            match self.step() {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(e) => {
                    warn!("Vsign rejected transmission: {}", e);
                    self.phase = Phase::Idle;
                    self.pending.clear();
                    self.partial.clear();
                    return Err(e);
                }
            }
        }
    }

    /// Returns every complete message received in the current or most recent transmission.
    pub fn messages(&self) -> &[ReceivedMessage] {
        &self.messages
    }

    /// Returns the messages on display, i.e. those activated by the last terminator.
    ///
    /// Empty until a transmission has completed.
    pub fn displayed(&self) -> &[ReceivedMessage] {
        match (self.phase, self.terminator) {
            (Phase::Idle, Some(terminator)) => &self.messages[..terminator.count()],
            _ => &[],
        }
    }

    /// Returns the active slot bitmask from the last terminator, if a transmission has completed.
    pub fn active_slots(&self) -> Option<u8> {
        self.terminator.map(|t| t.bitmask())
    }

    /// Returns the number of transmissions completed.
    pub fn transmissions(&self) -> usize {
        self.transmissions
    }

    /// Tries to consume one unit (init byte or frame) from the pending bytes.
    ///
    /// Returns `Ok(false)` when more data is needed.
    fn step(&mut self) -> Result<bool, VirtualSignError> {
        match self.phase {
            Phase::Idle => {
                let byte = match self.pending.first() {
                    Some(&byte) => byte,
                    None => return Ok(false),
                };
                if byte != INIT_BYTE {
                    return Err(VirtualSignError::MissingInit { actual: byte });
                }
                let _ = self.pending.remove(0);
                self.begin();
                Ok(true)
            }

            Phase::Receiving => {
                if self.pending.len() < 2 {
                    return Ok(false);
                }
                let frame_len = if self.pending[1] == END_COMMAND {
                    TERMINATOR_LEN
                } else {
                    PACKET_LEN
                };
                if self.pending.len() < frame_len {
                    return Ok(false);
                }

                let frame = self.pending.drain(..frame_len).collect::<Vec<_>>();
                if frame_len == TERMINATOR_LEN {
                    self.receive_terminator(Terminator::from_bytes(&frame)?)?;
                } else {
                    self.receive_packet(Packet::from_bytes(&frame)?)?;
                }
                Ok(true)
            }
        }
    }

    /// Handles the init byte.
    fn begin(&mut self) {
        debug!("Vsign transmission started");
        self.phase = Phase::Receiving;
        self.partial.clear();
        self.messages.clear();
        self.terminator = None;
    }

    /// Handles a data packet.
    fn receive_packet(&mut self, packet: Packet) -> Result<(), VirtualSignError> {
        debug!("Vsign packet: {}", packet);

        if self.messages.len() == MAX_MESSAGES {
            return Err(VirtualSignError::TooManyMessages { max: MAX_MESSAGES });
        }

        let expected = TypeMarker::for_position(self.messages.len());
        if packet.type_marker() != expected {
            return Err(VirtualSignError::WrongTypeMarker {
                expected: expected.0,
                actual: packet.type_marker().0,
            });
        }

        let offset = usize::from(packet.offset().0);
        if offset != self.partial.len() {
            return Err(VirtualSignError::OutOfOrder {
                expected: self.partial.len(),
                actual: offset,
            });
        }

        self.partial.extend_from_slice(packet.payload());
        if self.partial.len() == BUFFER_LEN {
            let mut bytes = [0; BUFFER_LEN];
            bytes.copy_from_slice(&self.partial);
            self.partial.clear();

            let message = ReceivedMessage {
                type_marker: expected,
                buffer: MessageBuffer::from_bytes(bytes),
            };
            info!("Vsign message {}: {:?}", self.messages.len() + 1, message.buffer());
            self.messages.push(message);
        }
        Ok(())
    }

    /// Handles the terminator.
    fn receive_terminator(&mut self, terminator: Terminator) -> Result<(), VirtualSignError> {
        debug!("Vsign terminator: {}", terminator);

        if !self.partial.is_empty() {
            return Err(VirtualSignError::IncompleteMessage {
                received: self.partial.len(),
                expected: BUFFER_LEN,
            });
        }

        if terminator.count() != self.messages.len() {
            return Err(VirtualSignError::SlotMismatch {
                declared: terminator.count(),
                received: self.messages.len(),
            });
        }

        info!("Vsign displaying {} message(s)", terminator.count());
        self.phase = Phase::Idle;
        self.terminator = Some(terminator);
        self.transmissions += 1;
        Ok(())
    }
}

impl Write for VirtualSign {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.feed(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
