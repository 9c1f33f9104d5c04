use std::io::Write;
use std::time::Duration;

use serial_core::{PortSettings, SerialDevice};

use scrollsign::serial::SerialError;
use scrollsign::SerialLink;

mod mock_serial_port;
use crate::mock_serial_port::{MockSerialPort, SerialFailure};

#[test]
fn port_configured_for_sign() {
    let link = SerialLink::try_new(MockSerialPort::new(SerialFailure::None)).unwrap();

    let expected = PortSettings {
        baud_rate: serial_core::BaudRate::Baud38400,
        char_size: serial_core::CharSize::Bits8,
        parity: serial_core::Parity::ParityEven,
        stop_bits: serial_core::StopBits::Stop1,
        flow_control: serial_core::FlowControl::FlowNone,
    };
    assert_eq!(expected, link.port().read_settings().unwrap());
    assert_eq!(Some(Duration::from_secs(5)), link.port().configured_timeout());
}

#[test]
fn bytes_pass_through() {
    let mut link = SerialLink::try_new(MockSerialPort::new(SerialFailure::None)).unwrap();
    link.write_all(&[0x00, 0x02, 0x33, 0x01]).unwrap();
    link.flush().unwrap();

    let port = link.into_inner();
    assert_eq!(&[0x00, 0x02, 0x33, 0x01], port.written());
    assert_eq!(1, port.flushes());
}

#[test]
fn configuration_failure() {
    let error = SerialLink::try_new(MockSerialPort::new(SerialFailure::WriteSettings)).unwrap_err();
    assert!(matches!(error, SerialError::Configuration { .. }));

    let error = SerialLink::try_new(MockSerialPort::new(SerialFailure::SetTimeout)).unwrap_err();
    assert!(matches!(error, SerialError::Timeout { .. }));
}

#[test]
fn write_failure_surfaces() {
    let mut link = SerialLink::try_new(MockSerialPort::new(SerialFailure::WriteAfter(2))).unwrap();
    let error = link.write_all(&[1, 2, 3, 4]).unwrap_err();
    assert_eq!(std::io::ErrorKind::TimedOut, error.kind());
    assert_eq!(&[1, 2], link.port().written());
}
