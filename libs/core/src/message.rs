use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use derive_more::Display;
use thiserror::Error;

use crate::MessageBuffer;

/// The maximum number of messages the sign can hold at once.
pub const MAX_MESSAGES: usize = 6;

/// The maximum length in bytes of a single message's text.
///
/// A [`MessageBuffer`] is 256 bytes, of which four are taken up by the header,
/// and the sign expects some slack after the text.
pub const MAX_TEXT_LEN: usize = 249;

/// Errors detected while validating messages, before anything is sent to the sign.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    /// Message text exceeded [`MAX_TEXT_LEN`].
    #[error("Maximum message length is {} bytes, got {}", max, actual)]
    MessageTooLong {
        /// The maximum text length.
        max: usize,

        /// The actual length of the text that was provided.
        actual: usize,
    },

    /// More than [`MAX_MESSAGES`] messages were provided.
    #[error("The sign holds at most {} messages", max)]
    TooManyMessages {
        /// The maximum number of messages.
        max: usize,
    },

    /// A transmission was attempted with no messages.
    #[error("At least one message is required")]
    NoMessages,

    /// [`Speed`] was outside the range the sign supports.
    #[error("Speed must be between {} and {}, got {}", min, max, actual)]
    SpeedOutOfRange {
        /// The slowest supported speed.
        min: u8,

        /// The fastest supported speed.
        max: u8,

        /// The speed that was provided.
        actual: u8,
    },

    /// The name didn't match any known [`Effect`].
    #[error("Unknown effect \"{}\", expected one of hold, scroll, snow, flash or frame", name)]
    UnknownEffect {
        /// The unrecognized name.
        name: String,
    },

    /// [`SlotIndex`] was outside `1..=MAX_MESSAGES`.
    #[error("Slot index must be between 1 and {}, got {}", max, actual)]
    SlotOutOfRange {
        /// The highest valid slot.
        max: usize,

        /// The slot that was requested.
        actual: usize,
    },
}

/// How quickly a message moves across the display, from 1 (slowest) to 5 (fastest).
///
/// # Examples
///
/// ```
/// use scrollsign_core::Speed;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let speed = Speed::try_new(3)?;
/// assert_eq!(3, speed.get());
/// assert!(Speed::try_new(6).is_err());
/// #
/// # Ok(()) }
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct Speed(u8);

impl Speed {
    /// The slowest speed.
    pub const MIN: Speed = Speed(1);

    /// The fastest speed, used when none is given.
    pub const MAX: Speed = Speed(5);

    /// Creates a new `Speed`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::SpeedOutOfRange`] if `speed` is not between 1 and 5.
    pub fn try_new(speed: u8) -> Result<Self, ValidationError> {
        if speed < Self::MIN.0 || speed > Self::MAX.0 {
            return Err(ValidationError::SpeedOutOfRange {
                min: Self::MIN.0,
                max: Self::MAX.0,
                actual: speed,
            });
        }
        Ok(Speed(speed))
    }

    /// Returns the numeric speed.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Returns the ASCII digit the sign expects for this speed.
    pub fn digit(self) -> u8 {
        b'0' + self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Speed::MAX
    }
}

/// Visual effect the sign applies when displaying a message.
///
/// Names parse case-insensitively:
///
/// ```
/// use scrollsign_core::Effect;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let effect: Effect = "Snow".parse()?;
/// assert_eq!(Effect::Snow, effect);
/// assert_eq!(b'C', effect.code());
/// #
/// # Ok(()) }
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Effect {
    /// Text is shown in place without moving.
    Hold,
    /// Text scrolls across the display.
    #[default]
    Scroll,
    /// Text assembles from falling dots.
    Snow,
    /// Text blinks on and off.
    Flash,
    /// Text is shown inside a border.
    Frame,
}

// Wire code and name for each effect.
const EFFECTS: [(Effect, u8, &str); 5] = [
    (Effect::Hold, b'A', "hold"),
    (Effect::Scroll, b'B', "scroll"),
    (Effect::Snow, b'C', "snow"),
    (Effect::Flash, b'D', "flash"),
    (Effect::Frame, b'E', "frame"),
];

impl Effect {
    /// Returns the single-byte code identifying this effect on the wire.
    pub fn code(self) -> u8 {
        EFFECTS[self as usize].1
    }

    /// Returns the lowercase name of this effect.
    pub fn name(self) -> &'static str {
        EFFECTS[self as usize].2
    }

    /// Looks up the effect with the given wire code, if any.
    ///
    /// ```
    /// # use scrollsign_core::Effect;
    /// assert_eq!(Some(Effect::Flash), Effect::from_code(b'D'));
    /// assert_eq!(None, Effect::from_code(b'Z'));
    /// ```
    pub fn from_code(code: u8) -> Option<Self> {
        EFFECTS.iter().find(|&&(_, c, _)| c == code).map(|&(effect, _, _)| effect)
    }
}

impl FromStr for Effect {
    type Err = ValidationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        EFFECTS
            .iter()
            .find(|&&(_, _, n)| n.eq_ignore_ascii_case(name))
            .map(|&(effect, _, _)| effect)
            .ok_or_else(|| ValidationError::UnknownEffect { name: name.to_owned() })
    }
}

impl Display for Effect {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 1-based position of a message among those sent in one transmission.
///
/// Always in `1..=MAX_MESSAGES`, so it fits in a single ASCII digit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct SlotIndex(u8);

impl SlotIndex {
    /// Creates a new `SlotIndex`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::SlotOutOfRange`] if `slot` is not in `1..=MAX_MESSAGES`.
    ///
    /// # Examples
    ///
    /// ```
    /// use scrollsign_core::SlotIndex;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// #
    /// let slot = SlotIndex::try_new(2)?;
    /// assert_eq!(b'2', slot.digit());
    /// assert!(SlotIndex::try_new(0).is_err());
    /// assert!(SlotIndex::try_new(7).is_err());
    /// #
    /// # Ok(()) }
    /// ```
    pub fn try_new(slot: usize) -> Result<Self, ValidationError> {
        if slot == 0 || slot > MAX_MESSAGES {
            return Err(ValidationError::SlotOutOfRange {
                max: MAX_MESSAGES,
                actual: slot,
            });
        }
        Ok(SlotIndex(slot as u8))
    }

    /// Returns the 1-based slot number.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Returns the ASCII digit the sign expects for this slot.
    pub fn digit(self) -> u8 {
        b'0' + self.0
    }
}

/// A single line of text along with how the sign should display it.
///
/// Text is raw bytes; the sign renders its own character set and no encoding is applied.
/// Both owned and borrowed text are supported.
///
/// # Examples
///
/// ```
/// use scrollsign_core::{Effect, Message, Speed};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let message = Message::try_new("Hello".as_bytes(), Speed::try_new(3)?, Effect::Scroll)?;
/// assert_eq!(b"Hello", message.text());
///
/// let result = Message::try_new(vec![b'x'; 250], Speed::default(), Effect::default());
/// assert!(result.is_err());
/// #
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message<'a> {
    text: Cow<'a, [u8]>,
    speed: Speed,
    effect: Effect,
}

impl<'a> Message<'a> {
    /// Creates a new `Message`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MessageTooLong`] if the text is longer than [`MAX_TEXT_LEN`].
    pub fn try_new<T: Into<Cow<'a, [u8]>>>(text: T, speed: Speed, effect: Effect) -> Result<Self, ValidationError> {
        let text: Cow<'a, [u8]> = text.into();
        if text.len() > MAX_TEXT_LEN {
            return Err(ValidationError::MessageTooLong {
                max: MAX_TEXT_LEN,
                actual: text.len(),
            });
        }
        Ok(Message { text, speed, effect })
    }

    /// Returns the message text.
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Returns the message speed.
    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Returns the message effect.
    pub fn effect(&self) -> Effect {
        self.effect
    }
}

impl Display for Message<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" [Speed {} | {}]",
            String::from_utf8_lossy(&self.text),
            self.speed,
            self.effect
        )
    }
}

/// An ordered set of up to [`MAX_MESSAGES`] messages to send in one transmission.
///
/// Slots are assigned in insertion order starting from 1. Once full, further
/// messages are rejected rather than silently dropped.
///
/// # Examples
///
/// ```
/// use scrollsign_core::{Effect, Message, MessageList, Speed, SlotIndex};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let mut messages = MessageList::new();
/// let slot = messages.push(Message::try_new("First".as_bytes(), Speed::default(), Effect::Hold)?)?;
/// assert_eq!(SlotIndex::try_new(1)?, slot);
///
/// for _ in 1..6 {
///     messages.push(Message::try_new("More".as_bytes(), Speed::default(), Effect::Scroll)?)?;
/// }
/// assert!(messages.push(Message::try_new("Too many".as_bytes(), Speed::default(), Effect::Scroll)?).is_err());
/// #
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MessageList<'a> {
    messages: heapless::Vec<Message<'a>, MAX_MESSAGES>,
}

impl<'a> MessageList<'a> {
    /// Creates an empty `MessageList`.
    pub fn new() -> Self {
        MessageList {
            messages: heapless::Vec::new(),
        }
    }

    /// Appends a message and returns the slot it was assigned.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TooManyMessages`] if the list already holds [`MAX_MESSAGES`] messages.
    pub fn push(&mut self, message: Message<'a>) -> Result<SlotIndex, ValidationError> {
        self.messages
            .push(message)
            .map_err(|_| ValidationError::TooManyMessages { max: MAX_MESSAGES })?;
        SlotIndex::try_new(self.messages.len())
    }

    /// Collects messages into a new list.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::TooManyMessages`] if more than [`MAX_MESSAGES`] messages are provided.
    pub fn try_from_iter<I>(messages: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = Message<'a>>,
    {
        let mut list = MessageList::new();
        for message in messages {
            let _ = list.push(message)?;
        }
        Ok(list)
    }

    /// Returns the number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterates over the messages along with their assigned slots.
    pub fn slots(&self) -> impl Iterator<Item = (SlotIndex, &Message<'a>)> {
        self.messages.iter().zip(1u8..).map(|(message, slot)| (SlotIndex(slot), message))
    }

    /// Encodes every message into its [`MessageBuffer`], in slot order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoMessages`] if the list is empty, since the sign
    /// has no way to represent a transmission without any active slots.
    pub fn buffers(&self) -> Result<Vec<MessageBuffer>, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::NoMessages);
        }
        Ok(self.slots().map(|(slot, message)| MessageBuffer::build(message, slot)).collect())
    }
}

impl<'a, 'b> IntoIterator for &'b MessageList<'a> {
    type Item = &'b Message<'a>;
    type IntoIter = std::slice::Iter<'b, Message<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn message(text: &str) -> Message<'_> {
        Message::try_new(text.as_bytes(), Speed::default(), Effect::default()).unwrap()
    }

    #[test_case(Effect::Hold, b'A', "hold")]
    #[test_case(Effect::Scroll, b'B', "scroll")]
    #[test_case(Effect::Snow, b'C', "snow")]
    #[test_case(Effect::Flash, b'D', "flash")]
    #[test_case(Effect::Frame, b'E', "frame")]
    fn effect_table(effect: Effect, code: u8, name: &str) {
        assert_eq!(code, effect.code());
        assert_eq!(name, effect.name());
        assert_eq!(Some(effect), Effect::from_code(code));
        assert_eq!(effect, name.parse().unwrap());
        assert_eq!(effect, name.to_uppercase().parse().unwrap());
    }

    #[test]
    fn effect_defaults_to_scroll() {
        assert_eq!(Effect::Scroll, Effect::default());
    }

    #[test]
    fn unknown_effect_rejected() {
        let error = "sparkle".parse::<Effect>().unwrap_err();
        assert_eq!(ValidationError::UnknownEffect { name: "sparkle".into() }, error);
    }

    #[test_case(0 ; "zero")]
    #[test_case(6 ; "just above max")]
    #[test_case(255 ; "far above max")]
    fn speed_out_of_range_rejected(speed: u8) {
        let error = Speed::try_new(speed).unwrap_err();
        assert!(matches!(error, ValidationError::SpeedOutOfRange { min: 1, max: 5, actual } if actual == speed));
    }

    #[test]
    fn speed_digits() {
        assert_eq!(b'1', Speed::try_new(1).unwrap().digit());
        assert_eq!(b'5', Speed::default().digit());
    }

    #[test]
    fn text_length_boundary() {
        let ok = Message::try_new(vec![b'a'; 249], Speed::default(), Effect::Hold);
        assert!(ok.is_ok());

        let error = Message::try_new(vec![b'a'; 250], Speed::default(), Effect::Hold).unwrap_err();
        assert_eq!(ValidationError::MessageTooLong { max: 249, actual: 250 }, error);
    }

    #[test]
    fn slot_range() {
        assert!(SlotIndex::try_new(1).is_ok());
        assert!(SlotIndex::try_new(MAX_MESSAGES).is_ok());
        assert_eq!(
            ValidationError::SlotOutOfRange { max: 6, actual: 7 },
            SlotIndex::try_new(7).unwrap_err()
        );
    }

    #[test]
    fn list_assigns_slots_in_order() {
        let mut list = MessageList::new();
        assert_eq!(1, list.push(message("a")).unwrap().get());
        assert_eq!(2, list.push(message("b")).unwrap().get());

        let slots = list.slots().map(|(slot, m)| (slot.get(), m.text().to_vec())).collect::<Vec<_>>();
        assert_eq!(vec![(1, b"a".to_vec()), (2, b"b".to_vec())], slots);
    }

    #[test]
    fn list_rejects_once_full() {
        let mut list = MessageList::new();
        for _ in 0..MAX_MESSAGES {
            let _ = list.push(message("x")).unwrap();
        }
        let error = list.push(message("overflow")).unwrap_err();
        assert_eq!(ValidationError::TooManyMessages { max: 6 }, error);
        assert_eq!(MAX_MESSAGES, list.len());
    }

    #[test]
    fn list_from_too_many() {
        let error = MessageList::try_from_iter((0..7).map(|_| message("x"))).unwrap_err();
        assert_eq!(ValidationError::TooManyMessages { max: 6 }, error);
    }

    #[test]
    fn empty_list_has_no_buffers() {
        assert_eq!(ValidationError::NoMessages, MessageList::new().buffers().unwrap_err());
    }

    #[test]
    fn display() {
        let message = Message::try_new("Hi".as_bytes(), Speed::try_new(2).unwrap(), Effect::Flash).unwrap();
        assert_eq!("\"Hi\" [Speed 2 | flash]", format!("{}", message));
    }
}
