use std::fmt::{self, Display, Formatter};
use std::io::Write;

use derive_more::Display;
use thiserror::Error;

use crate::{ValidationError, MAX_MESSAGES};

/// Size in bytes of a framed [`Packet`].
pub const PACKET_LEN: usize = 69;

/// Size in bytes of the message data carried by each [`Packet`].
pub const CHUNK_LEN: usize = 64;

/// Number of [`Packet`]s needed to carry one message.
pub const CHUNKS_PER_MESSAGE: usize = 4;

/// Size in bytes of a [`Terminator`].
pub const TERMINATOR_LEN: usize = 3;

/// Single byte sent before anything else to get the sign's attention.
pub const INIT_BYTE: u8 = 0x00;

/// First byte of every [`Packet`] and [`Terminator`].
pub const START: u8 = 0x02;

/// Second byte of a [`Packet`].
pub const DATA_COMMAND: u8 = 0x31;

/// Second byte of a [`Terminator`].
pub const END_COMMAND: u8 = 0x33;

const FIRST_TYPE_MARKER: u8 = 6;

/// Errors related to parsing [`Packet`]s and [`Terminator`]s.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PacketError {
    /// Wrong number of bytes for the kind of frame.
    #[error("Frame must be {} bytes, got {}", expected, actual)]
    WrongLength {
        /// The expected frame length.
        expected: usize,

        /// The actual length of the data that was provided.
        actual: usize,
    },

    /// Frame didn't start with the expected marker and command bytes.
    #[error("Frame header didn't match: Expected {:02X?}, got {:02X?}", expected, actual)]
    BadHeader {
        /// The expected header.
        expected: [u8; 2],

        /// The header that was received.
        actual: [u8; 2],
    },

    /// [`Packet`] offset wasn't one of the chunk boundaries.
    #[error("Packet offset 0x{:02X} isn't a multiple of {}", offset, CHUNK_LEN)]
    BadOffset {
        /// The received offset.
        offset: u8,
    },

    /// [`Packet`] checksum didn't match declared checksum.
    #[error("Packet checksum didn't match declared checksum: Expected 0x{:02X}, got 0x{:02X}", expected, actual)]
    BadChecksum {
        /// The declared checksum.
        expected: u8,

        /// The checksum computed over the received bytes.
        actual: u8,
    },

    /// [`Terminator`] bitmask didn't describe a valid run of slots.
    #[error("Terminator bitmask 0b{:08b} doesn't describe 1 to {} contiguous slots", bitmask, MAX_MESSAGES)]
    BadBitmask {
        /// The received bitmask.
        bitmask: u8,
    },
}

/// Tags every [`Packet`] belonging to one message.
///
/// The first message in a transmission uses 6, the second 7, and so on.
///
/// # Examples
///
/// ```
/// use scrollsign_core::TypeMarker;
///
/// assert_eq!(TypeMarker(6), TypeMarker::for_position(0));
/// assert_eq!(TypeMarker(7), TypeMarker::for_position(1));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub struct TypeMarker(pub u8);

impl TypeMarker {
    /// Returns the marker for the message at the given 0-based position in a transmission.
    pub fn for_position(position: usize) -> Self {
        TypeMarker(FIRST_TYPE_MARKER.wrapping_add(position as u8))
    }
}

/// Position within a [`MessageBuffer`](crate::MessageBuffer) of the chunk carried by a [`Packet`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub struct Offset(pub u8);

/// A framed chunk of message data as it goes over the wire.
///
/// # Format Details
///
/// ```text
/// ┌────┬────┬──────┬────────┬───────────┬ ┄ ┬────────────┬────────┐
/// │ 02 │ 31 │ Type │ Offset │ Payload 0 │...│ Payload 63 │ Chksum │
/// └────┴────┴──────┴────────┴───────────┴ ┄ ┴────────────┴────────┘
///       └╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌ summed into ╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌╌┘
/// ```
///
/// The checksum is the sum modulo 256 of every byte after the leading `02`.
///
/// # Examples
///
/// ```
/// use scrollsign_core::{Offset, Packet, TypeMarker};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let packet = Packet::new(TypeMarker(6), Offset(64), &[1; 64]);
/// assert_eq!(0x31 + 6 + 64 + 64, u32::from(packet.checksum()));
///
/// let parsed = Packet::from_bytes(packet.as_bytes())?;
/// assert_eq!(packet, parsed);
/// #
/// # Ok(()) }
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Packet {
    bytes: [u8; PACKET_LEN],
}

impl Packet {
    /// Frames a chunk of message data.
    ///
    /// # Panics
    ///
    /// Panics if `payload` is not exactly [`CHUNK_LEN`] bytes.
    pub fn new(type_marker: TypeMarker, offset: Offset, payload: &[u8]) -> Self {
        assert_eq!(CHUNK_LEN, payload.len(), "Packet payload must be {} bytes", CHUNK_LEN);

        let mut bytes = [0; PACKET_LEN];
        bytes[0] = START;
        bytes[1] = DATA_COMMAND;
        bytes[2] = type_marker.0;
        bytes[3] = offset.0;
        bytes[4..PACKET_LEN - 1].copy_from_slice(payload);
        bytes[PACKET_LEN - 1] = checksum(&bytes[1..PACKET_LEN - 1]);
        Packet { bytes }
    }

    /// Parses a packet from its wire format.
    ///
    /// # Errors
    ///
    /// Returns:
    /// * [`PacketError::WrongLength`] if there are not exactly [`PACKET_LEN`] bytes.
    /// * [`PacketError::BadHeader`] if the frame doesn't start with `02 31`.
    /// * [`PacketError::BadOffset`] if the offset isn't a chunk boundary.
    /// * [`PacketError::BadChecksum`] if the computed checksum does not match the declared one.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PacketError> {
        if data.len() != PACKET_LEN {
            return Err(PacketError::WrongLength {
                expected: PACKET_LEN,
                actual: data.len(),
            });
        }

        check_header(data, DATA_COMMAND)?;

        if usize::from(data[3]) % CHUNK_LEN != 0 {
            return Err(PacketError::BadOffset { offset: data[3] });
        }

        let declared = data[PACKET_LEN - 1];
        let computed = checksum(&data[1..PACKET_LEN - 1]);
        if declared != computed {
            return Err(PacketError::BadChecksum {
                expected: declared,
                actual: computed,
            });
        }

        let mut bytes = [0; PACKET_LEN];
        bytes.copy_from_slice(data);
        Ok(Packet { bytes })
    }

    /// Returns the packet's type marker.
    pub fn type_marker(&self) -> TypeMarker {
        TypeMarker(self.bytes[2])
    }

    /// Returns the offset of the carried chunk.
    pub fn offset(&self) -> Offset {
        Offset(self.bytes[3])
    }

    /// Returns the carried chunk of message data.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[4..PACKET_LEN - 1]
    }

    /// Returns the checksum byte.
    pub fn checksum(&self) -> u8 {
        self.bytes[PACKET_LEN - 1]
    }

    /// Returns the full wire format.
    pub fn as_bytes(&self) -> &[u8; PACKET_LEN] {
        &self.bytes
    }

    /// Writes the packet to a writer.
    ///
    /// # Errors
    ///
    /// Returns the underlying error if the write fails.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.bytes)
    }
}

impl Display for Packet {
    /// Formats the packet in a human-readable way, omitting trailing zero padding.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Type {:02X} | Offset {:02X} | Data ", self.type_marker().0, self.offset().0)?;
        let payload = self.payload();
        let used = payload.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        for byte in &payload[..used] {
            write!(f, "{:02X} ", byte)?;
        }
        if used < payload.len() {
            write!(f, "(+{} zero) ", payload.len() - used)?;
        }
        write!(f, "| Checksum {:02X}", self.checksum())
    }
}

/// Final frame of a transmission, telling the sign which slots to display.
///
/// # Format Details
///
/// ```text
/// ┌────┬────┬─────────┐
/// │ 02 │ 33 │ Bitmask │
/// └────┴────┴─────────┘
/// ```
///
/// The lowest `n` bits of the bitmask are set when `n` messages were sent.
///
/// # Examples
///
/// ```
/// use scrollsign_core::Terminator;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let terminator = Terminator::for_count(3)?;
/// assert_eq!(&[0x02, 0x33, 0x07], terminator.as_bytes());
/// assert!(Terminator::for_count(0).is_err());
/// #
/// # Ok(()) }
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Terminator {
    bytes: [u8; TERMINATOR_LEN],
}

impl Terminator {
    /// Creates the terminator for a transmission of `count` messages.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoMessages`] if `count` is 0, or
    /// [`ValidationError::TooManyMessages`] if it exceeds [`MAX_MESSAGES`].
    pub fn for_count(count: usize) -> Result<Self, ValidationError> {
        match count {
            0 => Err(ValidationError::NoMessages),
            1..=MAX_MESSAGES => Ok(Terminator {
                bytes: [START, END_COMMAND, ((1u16 << count) - 1) as u8],
            }),
            _ => Err(ValidationError::TooManyMessages { max: MAX_MESSAGES }),
        }
    }

    /// Parses a terminator from its wire format.
    ///
    /// # Errors
    ///
    /// Returns:
    /// * [`PacketError::WrongLength`] if there are not exactly [`TERMINATOR_LEN`] bytes.
    /// * [`PacketError::BadHeader`] if the frame doesn't start with `02 33`.
    /// * [`PacketError::BadBitmask`] if the bitmask isn't a contiguous run of 1 to [`MAX_MESSAGES`] low bits.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PacketError> {
        if data.len() != TERMINATOR_LEN {
            return Err(PacketError::WrongLength {
                expected: TERMINATOR_LEN,
                actual: data.len(),
            });
        }

        check_header(data, END_COMMAND)?;

        let bitmask = data[2];
        let count = bitmask.count_ones() as usize;
        match Terminator::for_count(count) {
            Ok(terminator) if terminator.bitmask() == bitmask => Ok(terminator),
            _ => Err(PacketError::BadBitmask { bitmask }),
        }
    }

    /// Returns the active slot bitmask.
    pub fn bitmask(&self) -> u8 {
        self.bytes[2]
    }

    /// Returns the number of active slots.
    pub fn count(&self) -> usize {
        self.bitmask().count_ones() as usize
    }

    /// Returns the full wire format.
    pub fn as_bytes(&self) -> &[u8; TERMINATOR_LEN] {
        &self.bytes
    }

    /// Writes the terminator to a writer.
    ///
    /// # Errors
    ///
    /// Returns the underlying error if the write fails.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.bytes)
    }
}

impl Display for Terminator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "End | Slots {:06b}", self.bitmask())
    }
}

fn check_header(data: &[u8], command: u8) -> Result<(), PacketError> {
    let actual = [data[0], data[1]];
    if actual != [START, command] {
        return Err(PacketError::BadHeader {
            expected: [START, command],
            actual,
        });
    }
    Ok(())
}

/// Computes the simple additive checksum of the given byte slice.
fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, &b| acc.wrapping_add(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn sample_payload() -> Vec<u8> {
        let mut payload = vec![0; CHUNK_LEN];
        payload[..9].copy_from_slice(b"31B\x05Hello");
        payload
    }

    #[test]
    fn frame_layout() {
        let packet = Packet::new(TypeMarker(6), Offset(0), &sample_payload());
        let bytes = packet.as_bytes();
        assert_eq!(PACKET_LEN, bytes.len());
        assert_eq!(&[0x02, 0x31, 6, 0], &bytes[..4]);
        assert_eq!(sample_payload().as_slice(), &bytes[4..68]);
    }

    #[test]
    fn checksum_covers_bytes_one_through_sixty_seven() {
        let packet = Packet::new(TypeMarker(7), Offset(192), &[0xFF; CHUNK_LEN]);
        let bytes = packet.as_bytes();
        let expected = bytes[1..68].iter().map(|&b| u32::from(b)).sum::<u32>() % 256;
        assert_eq!(expected, u32::from(packet.checksum()));
        assert_eq!(expected, u32::from(bytes[68]));
    }

    #[test]
    fn checksum_of_hello_chunk() {
        // 0x31 + 6 + 0 + '3' + '1' + 'B' + 5 + "Hello" = 0x2D6
        let packet = Packet::new(TypeMarker(6), Offset(0), &sample_payload());
        assert_eq!(0xD6, packet.checksum());
    }

    #[test]
    #[should_panic]
    fn short_payload_panics() {
        let _ = Packet::new(TypeMarker(6), Offset(0), &[0; 10]);
    }

    #[test]
    fn parse_valid() {
        let packet = Packet::new(TypeMarker(8), Offset(128), &sample_payload());
        let parsed = Packet::from_bytes(packet.as_bytes()).unwrap();
        assert_eq!(TypeMarker(8), parsed.type_marker());
        assert_eq!(Offset(128), parsed.offset());
        assert_eq!(sample_payload().as_slice(), parsed.payload());
    }

    #[test]
    fn parse_bad_checksum() {
        let mut bytes = *Packet::new(TypeMarker(6), Offset(0), &sample_payload()).as_bytes();
        bytes[68] = 0xD5;
        let error = Packet::from_bytes(&bytes).unwrap_err();
        assert_eq!(PacketError::BadChecksum { expected: 0xD5, actual: 0xD6 }, error);
    }

    #[test]
    fn parse_wrong_length() {
        let error = Packet::from_bytes(&[0x02, 0x31, 6]).unwrap_err();
        assert_eq!(PacketError::WrongLength { expected: 69, actual: 3 }, error);
    }

    #[test]
    fn parse_bad_header() {
        let mut bytes = *Packet::new(TypeMarker(6), Offset(0), &sample_payload()).as_bytes();
        bytes[1] = 0x32;
        let error = Packet::from_bytes(&bytes).unwrap_err();
        assert_eq!(
            PacketError::BadHeader {
                expected: [0x02, 0x31],
                actual: [0x02, 0x32]
            },
            error
        );
    }

    #[test]
    fn parse_bad_offset() {
        let packet = Packet::new(TypeMarker(6), Offset(10), &sample_payload());
        let error = Packet::from_bytes(packet.as_bytes()).unwrap_err();
        assert_eq!(PacketError::BadOffset { offset: 10 }, error);
    }

    #[test_case(1, 0x01)]
    #[test_case(2, 0x03)]
    #[test_case(3, 0x07)]
    #[test_case(4, 0x0F)]
    #[test_case(5, 0x1F)]
    #[test_case(6, 0x3F)]
    fn terminator_bitmask(count: usize, bitmask: u8) {
        let terminator = Terminator::for_count(count).unwrap();
        assert_eq!(&[0x02, 0x33, bitmask], terminator.as_bytes());
        assert_eq!(count, terminator.count());
        assert_eq!(terminator, Terminator::from_bytes(terminator.as_bytes()).unwrap());
    }

    #[test]
    fn terminator_count_out_of_range() {
        assert_eq!(ValidationError::NoMessages, Terminator::for_count(0).unwrap_err());
        assert_eq!(
            ValidationError::TooManyMessages { max: 6 },
            Terminator::for_count(7).unwrap_err()
        );
    }

    #[test_case(0x00 ; "empty")]
    #[test_case(0x05 ; "gap")]
    #[test_case(0x7F ; "seven slots")]
    fn terminator_bad_bitmask(bitmask: u8) {
        let error = Terminator::from_bytes(&[0x02, 0x33, bitmask]).unwrap_err();
        assert_eq!(PacketError::BadBitmask { bitmask }, error);
    }

    #[test]
    fn type_marker_positions() {
        assert_eq!(TypeMarker(6), TypeMarker::for_position(0));
        assert_eq!(TypeMarker(11), TypeMarker::for_position(5));
    }

    #[test]
    fn write() {
        let terminator = Terminator::for_count(2).unwrap();
        let mut output = Vec::new();
        terminator.write(&mut output).unwrap();
        assert_eq!(vec![0x02, 0x33, 0x03], output);
    }

    #[test]
    fn display() {
        let packet = Packet::new(TypeMarker(6), Offset(0x40), &sample_payload());
        assert_eq!(
            "Type 06 | Offset 40 | Data 33 31 42 05 48 65 6C 6C 6F (+55 zero) | Checksum 16",
            format!("{}", packet)
        );
        assert_eq!("End | Slots 000111", format!("{}", Terminator::for_count(3).unwrap()));
    }
}
