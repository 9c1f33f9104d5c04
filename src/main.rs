use std::env;
use std::error::Error;
use std::num::ParseIntError;
use std::process;
use std::str::FromStr;
use std::time::Duration;

use log::info;
use thiserror::Error;

use scrollsign::{Effect, Message, MessageList, SerialLink, Sign, Speed, ValidationError, DEFAULT_DELAY};

const DEFAULT_DEVICE: &str = "/dev/ttyUSB0";

const USAGE: &str = "\
Usage: scrollsign -m \"message 1\" -m \"Another\"

    -m msg       Message to pass. Up to 6, in order.
    -s speed     Scrolling speed of the next message, 1-5. Default 5.
    -e effect    Effect of the next message: hold, scroll, snow, flash or frame. Default scroll.
    -d device    Use device instead of /dev/ttyUSB0.
    -t millis    Pause between packets in milliseconds. Default 200.
    -h           Show this help.

Run with RUST_LOG=debug to watch the packets go by.";

#[derive(Debug, Error)]
enum ArgsError {
    #[error("Option {} requires a value", flag)]
    MissingValue { flag: String },

    #[error("Unrecognized argument \"{}\"", arg)]
    Unrecognized { arg: String },

    #[error("Invalid number \"{}\" for option {}", value, flag)]
    InvalidNumber {
        flag: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Speed and effect options must be followed by the message they apply to")]
    DanglingAttributes,

    #[error("Invalid arguments")]
    Validation {
        #[from]
        source: ValidationError,
    },
}

#[derive(Debug)]
enum Command {
    Help,
    Usage,
    Send(Options),
}

#[derive(Debug)]
struct Options {
    device: String,
    delay: Duration,
    messages: MessageList<'static>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("Caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let options = match parse_args(env::args().skip(1))? {
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Usage => {
            eprintln!("{}", USAGE);
            process::exit(1);
        }
        Command::Send(options) => options,
    };

    info!("Opening {}", options.device);
    let port = serial::open(&options.device)?;
    let mut sign = Sign::new(SerialLink::try_new(port)?).with_delay(options.delay);
    sign.send_messages(&options.messages)?;
    Ok(())
}

/// Parses command-line arguments, not including the program name.
///
/// Speed and effect apply to the next message and reset to their defaults after it.
fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command, ArgsError> {
    let mut args = args.into_iter().peekable();
    if args.peek().is_none() {
        return Ok(Command::Usage);
    }

    let mut device = DEFAULT_DEVICE.to_owned();
    let mut delay = DEFAULT_DELAY;
    let mut messages = MessageList::new();
    let mut speed = None;
    let mut effect = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-m" => {
                let text = value(&mut args, &arg)?;
                let message = Message::try_new(
                    text.into_bytes(),
                    speed.take().unwrap_or_default(),
                    effect.take().unwrap_or_default(),
                )?;
                let _ = messages.push(message)?;
            }
            "-s" => {
                let number = number(&arg, value(&mut args, &arg)?)?;
                speed = Some(Speed::try_new(number)?);
            }
            "-e" => effect = Some(value(&mut args, &arg)?.parse::<Effect>()?),
            "-d" => device = value(&mut args, &arg)?,
            "-t" => delay = Duration::from_millis(number(&arg, value(&mut args, &arg)?)?),
            _ => return Err(ArgsError::Unrecognized { arg }),
        }
    }

    if speed.is_some() || effect.is_some() {
        return Err(ArgsError::DanglingAttributes);
    }
    if messages.is_empty() {
        return Err(ValidationError::NoMessages.into());
    }

    Ok(Command::Send(Options {
        device,
        delay,
        messages,
    }))
}

fn value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String, ArgsError> {
    args.next().ok_or_else(|| ArgsError::MissingValue { flag: flag.to_owned() })
}

fn number<T: FromStr<Err = ParseIntError>>(flag: &str, value: String) -> Result<T, ArgsError> {
    value.parse().map_err(|source| ArgsError::InvalidNumber {
        flag: flag.to_owned(),
        value,
        source,
    })
}
