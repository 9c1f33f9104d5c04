use std::io::{self, Read, Write};
use std::time::Duration;

use serial_core::{PortSettings, SerialDevice};

#[allow(dead_code)] // Tests use different subsets of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerialFailure {
    None,
    WriteSettings,
    SetTimeout,
    WriteAfter(usize),
}

/// Mock serial port implementation that records everything written to it.
/// Used to verify `SerialLink`.
#[derive(Debug, Clone)]
pub struct MockSerialPort {
    failure: SerialFailure,
    written: Vec<u8>,
    flushes: usize,
    timeout: Option<Duration>,
    settings: PortSettings,
}

#[allow(dead_code)] // Not used by all tests.
impl MockSerialPort {
    pub fn new(failure: SerialFailure) -> Self {
        MockSerialPort {
            failure,
            written: Vec::new(),
            flushes: 0,
            timeout: None,
            // Initialize settings to some weird defaults to verify we set them correctly later.
            settings: PortSettings {
                baud_rate: serial_core::BaudRate::Baud110,
                char_size: serial_core::CharSize::Bits7,
                parity: serial_core::Parity::ParityOdd,
                stop_bits: serial_core::StopBits::Stop2,
                flow_control: serial_core::FlowControl::FlowSoftware,
            },
        }
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn configured_timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Read for MockSerialPort {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        panic!("Signs never reply, nothing should read from the port");
    }
}

impl Write for MockSerialPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let count = match self.failure {
            SerialFailure::WriteAfter(limit) => {
                let room = limit.saturating_sub(self.written.len());
                if room == 0 {
                    return Err(io::Error::new(io::ErrorKind::TimedOut, "Dummy write error"));
                }
                room.min(buf.len())
            }
            _ => buf.len(),
        };
        self.written.extend_from_slice(&buf[..count]);
        Ok(count)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

impl SerialDevice for MockSerialPort {
    type Settings = PortSettings;

    fn read_settings(&self) -> serial_core::Result<Self::Settings> {
        Ok(self.settings)
    }

    fn write_settings(&mut self, settings: &Self::Settings) -> serial_core::Result<()> {
        match self.failure {
            SerialFailure::WriteSettings => Err(serial_core::Error::new(
                serial_core::ErrorKind::NoDevice,
                "Dummy serial error",
            )),
            _ => {
                self.settings = *settings;
                Ok(())
            }
        }
    }

    fn timeout(&self) -> Duration {
        self.timeout.unwrap_or_default()
    }

    fn set_timeout(&mut self, timeout: Duration) -> serial_core::Result<()> {
        match self.failure {
            SerialFailure::SetTimeout => Err(serial_core::Error::new(
                serial_core::ErrorKind::InvalidInput,
                "Dummy timeout error",
            )),
            _ => {
                self.timeout = Some(timeout);
                Ok(())
            }
        }
    }

    fn set_rts(&mut self, _: bool) -> serial_core::Result<()> {
        unimplemented!();
    }

    fn set_dtr(&mut self, _: bool) -> serial_core::Result<()> {
        unimplemented!();
    }

    fn read_cts(&mut self) -> serial_core::Result<bool> {
        unimplemented!();
    }

    fn read_dsr(&mut self) -> serial_core::Result<bool> {
        unimplemented!();
    }

    fn read_ri(&mut self) -> serial_core::Result<bool> {
        unimplemented!();
    }

    fn read_cd(&mut self) -> serial_core::Result<bool> {
        unimplemented!();
    }
}
