//! Tools for testing and debugging LED scrolling sign communications.
//!
//! For the basic task of sign communication, you likely want to use the high-level API
//! in the [`scrollsign`] crate instead.
//!
//! This crate isn't directly related to controlling a real sign, but provides a [`VirtualSign`]
//! that decodes the wire protocol the way a real sign would. Since it implements
//! [`io::Write`](std::io::Write), it can be used anywhere a serial port is expected.
//!
//! # Examples
//!
//! ```
//! use scrollsign::{Effect, Message, MessageList, Sign, Speed};
//! use scrollsign_testing::VirtualSign;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! #
//! let mut sign = Sign::new(VirtualSign::new()).with_delay(Duration::from_millis(0));
//!
//! let mut messages = MessageList::new();
//! let _ = messages.push(Message::try_new("Hello".as_bytes(), Speed::default(), Effect::Scroll)?)?;
//! sign.send_messages(&messages)?;
//!
//! assert_eq!(b"Hello", sign.sink().displayed()[0].text());
//! #
//! # Ok(()) }
//! ```
//!
//! [`scrollsign`]: https://docs.rs/scrollsign
#![doc(html_root_url = "https://docs.rs/scrollsign-testing/0.1.0")]
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

mod virtual_sign;

pub use self::virtual_sign::{ReceivedMessage, VirtualSign, VirtualSignError};
