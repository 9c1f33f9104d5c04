//! A library for sending text messages to serial-attached LED scrolling signs.
//!
//! Provides a way to connect to a sign and send it up to six messages, each with its own
//! scrolling speed and display effect. The sign cycles through whatever it was last sent.
//! The protocol is send-only, so no status is ever read back.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//! use scrollsign::{Effect, Message, MessageList, SerialLink, Sign, Speed};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! #
//! // Open and configure the serial port (38400 baud, 8E1).
//! let port = serial::open("/dev/ttyUSB0")?;
//! let link = SerialLink::try_new(port)?;
//!
//! // The sign needs a pause between packets; 200ms is the default.
//! let mut sign = Sign::new(link).with_delay(Duration::from_millis(250));
//!
//! // Build the messages. Each takes a slot, starting from 1.
//! let mut messages = MessageList::new();
//! let _ = messages.push(Message::try_new("Hello".as_bytes(), Speed::try_new(3)?, Effect::Scroll)?)?;
//! let _ = messages.push(Message::try_new("World".as_bytes(), Speed::default(), Effect::Snow)?)?;
//!
//! // Send them. This replaces anything the sign was previously showing.
//! sign.send_messages(&messages)?;
//! #
//! # Ok(()) }
//! ```
//!
//! # Sub-crates
//!
//! In addition to the high-level API of [`Sign`], several lower-level components are provided
//! that can be combined for more specialized use-cases.
//!
//! - [`scrollsign-core`] \(re-exported as `core`\) contains the message encoding, packet framing,
//!   and the transmission sequencer, and works with any [`io::Write`](std::io::Write) sink.
//! - [`scrollsign-serial`] \(re-exported as `serial`\) contains functions for configuring the serial port,
//!   as well as [`SerialLink`].
//! - [`scrollsign-testing`] contains a virtual sign that decodes the protocol, useful for testing.
//!
//! [`scrollsign-core`]: https://docs.rs/scrollsign-core
//! [`scrollsign-serial`]: https://docs.rs/scrollsign-serial
//! [`scrollsign-testing`]: https://docs.rs/scrollsign-testing
#![doc(html_root_url = "https://docs.rs/scrollsign/0.1.0")]
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

pub use scrollsign_core as core;
pub use scrollsign_serial as serial;

mod sign;

pub use self::sign::{Sign, SignError};

pub use crate::core::{Effect, Message, MessageList, Speed, ValidationError, DEFAULT_DELAY, MAX_MESSAGES};
pub use crate::serial::SerialLink;
