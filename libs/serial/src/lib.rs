//! Tools for communicating with LED scrolling signs over serial.
//!
//! For the basic task of sign communication, you likely want to use the high-level API
//! in the [`scrollsign`] crate instead.
//!
//! However, you can use the [`configure_port`] function to configure a serial port appropriately
//! if you're doing custom lower-level communication, or wrap a port in a [`SerialLink`] to get
//! an [`io::Write`](std::io::Write) sink for [`scrollsign_core::transmit`].
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! #
//! let mut port = serial::open("/dev/ttyUSB0")?;
//! scrollsign_serial::configure_port(&mut port, Duration::from_secs(5))?;
//! // Now ready for communication with a sign (8E1 38400 baud).
//! #
//! # Ok(()) }
//! ```
//!
//! [`scrollsign`]: https://docs.rs/scrollsign
//! [`scrollsign_core::transmit`]: https://docs.rs/scrollsign-core/0.1.0/scrollsign_core/fn.transmit.html
#![doc(html_root_url = "https://docs.rs/scrollsign-serial/0.1.0")]
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

mod serial_link;
mod serial_port;

pub use self::serial_link::SerialLink;
pub use self::serial_port::{configure_port, SerialError};
