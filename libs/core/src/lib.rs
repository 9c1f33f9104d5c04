//! Core types for encoding messages for serial-attached LED scrolling signs.
//!
//! For the basic task of sign communication, you likely want to use the high-level API
//! in the [`scrollsign`] crate instead.
//!
//! However, `scrollsign_core` is useful for crates that want to interact with the sign protocol
//! at a lower level, or that write to something other than a serial port.
//!
//! The protocol is send-only. A transmission consists of a single init byte, four 69-byte
//! [`Packet`]s for each message (each carrying a 64-byte chunk of its 256-byte [`MessageBuffer`]),
//! and a three-byte [`Terminator`] telling the sign how many message slots are in use.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use scrollsign_core::{transmit, Effect, Message, MessageList, Speed};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! #
//! // Build up to six messages, each with its own speed and effect.
//! let mut messages = MessageList::new();
//! let _ = messages.push(Message::try_new("Hello".as_bytes(), Speed::try_new(3)?, Effect::Scroll)?)?;
//! let _ = messages.push(Message::try_new("World".as_bytes(), Speed::default(), Effect::Flash)?)?;
//!
//! // Encode and send them. Any io::Write works as a sink.
//! let mut output = Vec::new();
//! transmit(&messages.buffers()?, &mut output, Duration::from_millis(0))?;
//! assert_eq!(&[0x02, 0x33, 0x03], &output[output.len() - 3..]);
//! #
//! # Ok(()) }
//! ```
//!
//! [`scrollsign`]: https://docs.rs/scrollsign
#![doc(html_root_url = "https://docs.rs/scrollsign-core/0.1.0")]
#![deny(
    missing_copy_implementations,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![warn(
    missing_docs,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]

mod buffer;
mod message;
mod packet;
mod sequencer;

pub use self::buffer::{MessageBuffer, BUFFER_LEN, HEADER_LEN};
pub use self::message::{Effect, Message, MessageList, SlotIndex, Speed, ValidationError, MAX_MESSAGES, MAX_TEXT_LEN};
pub use self::packet::{
    Offset, Packet, PacketError, Terminator, TypeMarker, CHUNKS_PER_MESSAGE, CHUNK_LEN, DATA_COMMAND, END_COMMAND,
    INIT_BYTE, PACKET_LEN, START, TERMINATOR_LEN,
};
pub use self::sequencer::{transmit, TransmitError, DEFAULT_DELAY};
