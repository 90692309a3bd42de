use crate::config::SerialSettings;
use crate::error::Error;
use serial2::SerialPort;
use std::io;
use std::time::{Duration, Instant};

/// The line the device sends when it is ready for the next command.
const READY_TOKEN: &str = "ready";

/// How often a blocking serial read wakes up so the readiness wait can
/// check its deadline.
const READ_POLL: Duration = Duration::from_millis(100);

/// Opens the configured serial port with the short read timeout the
/// readiness wait relies on.
pub fn open_serial(settings: &SerialSettings) -> crate::Result<SerialPort> {
    let mut port = SerialPort::open(&settings.port, settings.baud)?;
    port.set_read_timeout(READ_POLL)?;
    Ok(port)
}

/// One command on the wire. Textual, newline-terminated ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Trigger,
    Home,
    Steer { dx: i32, dy: i32 },
}

impl Command {
    /// Picks the single command for this cycle: fire beats home beats
    /// steer. A home request losing to fire is dropped, not queued. A
    /// zero step still encodes as a steer so every readiness token is
    /// answered.
    pub fn select(fire: bool, home: bool, step: (i32, i32)) -> Self {
        if fire {
            Command::Trigger
        } else if home {
            Command::Home
        } else {
            Command::Steer {
                dx: step.0,
                dy: step.1,
            }
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Command::Trigger => "trigger\n".to_string(),
            Command::Home => "home\n".to_string(),
            Command::Steer { dx, dy } => format!("r{dx},{dy}\n"),
        }
    }
}

/// Byte transport to the microcontroller. A seam so the session and
/// control loop run against a scripted link in tests; the real link is
/// a `serial2::SerialPort`.
pub trait DeviceLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;
}

impl DeviceLink for SerialPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(self, buf)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        io::Write::write_all(self, data)
    }
}

/// Request/acknowledge session with the device. The device paces the
/// loop: exactly one command goes out per observed readiness line, and
/// nothing is ever pipelined ahead of the next readiness line.
pub struct DeviceSession<L> {
    link: L,
    buf: Vec<u8>,
    ready_timeout: Option<Duration>,
}

impl<L: DeviceLink> DeviceSession<L> {
    pub fn new(link: L, ready_timeout: Option<Duration>) -> Self {
        Self {
            link,
            buf: Vec::new(),
            ready_timeout,
        }
    }

    /// Blocks until the device sends a `ready` line. Other lines are
    /// ignored. With a configured timeout, a silent link surfaces as
    /// `DeviceUnresponsive` instead of hanging forever.
    pub fn wait_ready(&mut self) -> crate::Result<()> {
        let start = Instant::now();
        loop {
            while let Some(line) = self.take_line() {
                if line == READY_TOKEN {
                    return Ok(());
                }
                log::trace!("ignoring device line {line:?}");
            }

            let mut chunk = [0u8; 64];
            match self.link.read(&mut chunk) {
                Ok(0) => return Err(Error::LinkClosed),
                Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
                Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                    if let Some(timeout) = self.ready_timeout {
                        if start.elapsed() >= timeout {
                            return Err(Error::DeviceUnresponsive(timeout));
                        }
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn send(&mut self, command: &Command) -> crate::Result<()> {
        log::debug!("sending {command:?}");
        self.link.write_all(command.encode().as_bytes())?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn link(&self) -> &L {
        &self.link
    }

    fn take_line(&mut self) -> Option<String> {
        let pos = self.buf.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.buf.drain(..=pos).collect();
        // Arduino `println` terminates lines with \r\n; trim both.
        Some(String::from_utf8_lossy(&line).trim().to_string())
    }
}
