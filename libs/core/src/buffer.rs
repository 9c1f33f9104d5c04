use std::fmt::{self, Debug, Formatter};

use crate::{Message, Offset, Packet, SlotIndex, TypeMarker, CHUNK_LEN};

/// Size in bytes of an encoded message.
pub const BUFFER_LEN: usize = 256;

/// Number of header bytes preceding the text in a [`MessageBuffer`].
pub const HEADER_LEN: usize = 4;

/// The fixed-size encoded form of a single [`Message`], ready to be split into [`Packet`]s.
///
/// # Format Details
///
/// ```text
/// ┌───────┬──────┬────────┬─────┬────────┬ ┄ ┬────────┬──────┬ ┄ ┬──────┐
/// │ Speed │ Slot │ Effect │ Len │ Text 0 │...│ Text N │  00  │...│  00  │
/// └───────┴──────┴────────┴─────┴────────┴ ┄ ┴────────┴──────┴ ┄ ┴──────┘
///  ASCII   ASCII   code     raw  └╌╌╌╌╌╌ Len bytes ╌╌╌╌╌╌┘ └╌╌ to 256 ╌╌┘
/// ```
///
/// Speed and slot are ASCII digits (`'1'` for 1, and so on). The effect is the
/// single-byte [`Effect`](crate::Effect) code and the length is a raw byte count.
///
/// # Examples
///
/// ```
/// use scrollsign_core::{Effect, Message, MessageBuffer, Speed, SlotIndex};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let message = Message::try_new("Hello".as_bytes(), Speed::try_new(3)?, Effect::Scroll)?;
/// let buffer = MessageBuffer::build(&message, SlotIndex::try_new(1)?);
/// assert_eq!(b"31B\x05Hello\0", &buffer.as_bytes()[..10]);
/// #
/// # Ok(()) }
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct MessageBuffer([u8; BUFFER_LEN]);

impl MessageBuffer {
    /// Encodes a message for the given slot.
    ///
    /// [`Message`] already guarantees the text fits, so this cannot fail.
    pub fn build(message: &Message<'_>, slot: SlotIndex) -> Self {
        let text = message.text();
        let mut bytes = [0; BUFFER_LEN];
        bytes[0] = message.speed().digit();
        bytes[1] = slot.digit();
        bytes[2] = message.effect().code();
        bytes[3] = text.len() as u8;
        bytes[HEADER_LEN..HEADER_LEN + text.len()].copy_from_slice(text);
        MessageBuffer(bytes)
    }

    /// Wraps raw bytes, e.g. those reassembled from received packets.
    pub fn from_bytes(bytes: [u8; BUFFER_LEN]) -> Self {
        MessageBuffer(bytes)
    }

    /// Returns the raw encoded bytes.
    pub fn as_bytes(&self) -> &[u8; BUFFER_LEN] {
        &self.0
    }

    /// Returns the ASCII speed digit.
    pub fn speed_digit(&self) -> u8 {
        self.0[0]
    }

    /// Returns the ASCII slot digit.
    pub fn slot_digit(&self) -> u8 {
        self.0[1]
    }

    /// Returns the effect code.
    pub fn effect_code(&self) -> u8 {
        self.0[2]
    }

    /// Returns the text, as delimited by the length byte.
    ///
    /// A length byte pointing past the end of the buffer is clamped.
    pub fn text(&self) -> &[u8] {
        let end = (HEADER_LEN + usize::from(self.0[3])).min(BUFFER_LEN);
        &self.0[HEADER_LEN..end]
    }

    /// Splits the buffer into its four framed packets, in offset order.
    ///
    /// # Examples
    ///
    /// ```
    /// use scrollsign_core::{Effect, Message, MessageBuffer, Offset, Speed, SlotIndex, TypeMarker};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// #
    /// let message = Message::try_new("Hi".as_bytes(), Speed::default(), Effect::Hold)?;
    /// let buffer = MessageBuffer::build(&message, SlotIndex::try_new(1)?);
    /// let offsets = buffer.packets(TypeMarker(6)).map(|p| p.offset()).collect::<Vec<_>>();
    /// assert_eq!(vec![Offset(0), Offset(64), Offset(128), Offset(192)], offsets);
    /// #
    /// # Ok(()) }
    /// ```
    pub fn packets(&self, type_marker: TypeMarker) -> impl Iterator<Item = Packet> + '_ {
        self.0
            .chunks_exact(CHUNK_LEN)
            .zip((0..=u8::MAX).step_by(CHUNK_LEN))
            .map(move |(chunk, offset)| Packet::new(type_marker, Offset(offset), chunk))
    }
}

impl Debug for MessageBuffer {
    /// Shows the decoded header and text rather than all 256 bytes.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBuffer")
            .field("speed", &char::from(self.speed_digit()))
            .field("slot", &char::from(self.slot_digit()))
            .field("effect", &char::from(self.effect_code()))
            .field("text", &String::from_utf8_lossy(self.text()))
            .finish()
    }
}
