//! Telemetry links
//!
//! The generator only ever writes; the monitor only ever reads. Both go
//! through [`TelemetryChannel`] so either end can sit on a UART or a TCP
//! socket (for example a virtual serial bridge).

use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::{configure_port, open_port, TransportError};

/// Abstraction for communication channels (Serial or TCP)
pub trait TelemetryChannel: Read + Write + Send {
    /// Set timeout for read/write operations
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Serial port wrapper implementing TelemetryChannel
pub struct SerialChannel {
    port: Box<dyn SerialPort>,
}

impl SerialChannel {
    /// Wrap a port that is already open
    pub fn new(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }

    /// Open and configure a serial port
    pub fn open(name: &str, baud_rate: u32) -> Result<Self, TransportError> {
        let mut port = open_port(name, Some(baud_rate))?;
        configure_port(port.as_mut())?;
        Ok(Self::new(port))
    }
}

impl Read for SerialChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for SerialChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

impl TelemetryChannel for SerialChannel {
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.port.set_timeout(timeout).map_err(io::Error::other)
    }

    fn describe(&self) -> String {
        format!(
            "serial {} @ {} baud",
            self.port.name().unwrap_or_default(),
            self.port.baud_rate().unwrap_or_default()
        )
    }
}

/// TCP stream wrapper implementing TelemetryChannel
pub struct TcpChannel {
    stream: TcpStream,
}

impl TcpChannel {
    /// Wrap a connected stream
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }

    /// Connect to a TCP endpoint
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, TransportError> {
        let stream =
            TcpStream::connect(addr).map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        // Records are tiny; don't let Nagle hold a tick back.
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }
}

impl Read for TcpChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for TcpChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl TelemetryChannel for TcpChannel {
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.stream.set_read_timeout(Some(timeout))?;
        self.stream.set_write_timeout(Some(timeout))?;
        Ok(())
    }

    fn describe(&self) -> String {
        match self.stream.peer_addr() {
            Ok(addr) => format!("tcp {}", addr),
            Err(_) => "tcp (disconnected)".to_string(),
        }
    }
}
