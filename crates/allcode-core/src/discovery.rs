//! Port discovery
//!
//! Enumerates serial ports, ranks them by how likely they are to host the robot
//! and probes candidates with a read-only handshake. Bluetooth SPP pairs often
//! expose two ports with near-identical names, so the final decision is made by
//! what answers the probe rather than by name.

use serde::{Deserialize, Serialize};
use serialport::{SerialPortInfo, SerialPortType};
use std::collections::HashMap;
#[cfg(target_os = "linux")]
use std::fs;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::protocol::PROBE_COMMAND;
use crate::transport::{SerialSettings, SerialTransport, Transport};

/// Keywords that raise a port's rank, strongest first
pub const DEFAULT_RANK_KEYWORDS: &[&str] = &[
    "bluetooth",
    // Windows friendly name: "Standard Serial over Bluetooth link"
    "standard serial over bluetooth",
    "allcode",
    // Robot names like FA103608
    "fa",
    "cp210",
    "ch340",
    "ftdi",
    "usb serial",
];

/// Keywords used by [`Discovery::find_likely`]
pub const DEFAULT_FILTER_KEYWORDS: &[&str] =
    &["arduino", "usb serial", "ch340", "cp210x", "ftdi", "bluetooth"];

/// Serial Port Profile GUID reported in Windows Bluetooth hardware IDs
const SPP_GUID: &str = "00001101-0000-1000-8000-00805f9b34fb";

/// Description fragments of common USB UART bridges
const USB_BRIDGE_HINTS: &[&str] = &["usb serial", "cp210", "ch340", "ftdi"];

/// Shortest window the probe waits for a reply
const MIN_PROBE_WINDOW: Duration = Duration::from_millis(100);

/// Per-candidate read timeout used by autodetect
pub const DEFAULT_PROBE_READ_TIMEOUT_MS: u64 = 750;

/// Per-candidate write timeout used by autodetect
pub const DEFAULT_PROBE_WRITE_TIMEOUT_MS: u64 = 250;

/// One enumerated serial port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortCandidate {
    /// Device name or path (e.g., "COM7" or "/dev/rfcomm0")
    pub device: String,
    /// Human-readable description, "n/a" when unknown
    pub description: String,
    /// Hardware identifier, "n/a" when unknown
    pub hwid: String,
}

impl PortCandidate {
    /// Candidate from its three descriptive strings
    pub fn new(
        device: impl Into<String>,
        description: impl Into<String>,
        hwid: impl Into<String>,
    ) -> Self {
        Self {
            device: device.into(),
            description: description.into(),
            hwid: hwid.into(),
        }
    }
}

impl From<SerialPortInfo> for PortCandidate {
    fn from(info: SerialPortInfo) -> Self {
        let (description, hwid) = match info.port_type {
            SerialPortType::UsbPort(usb) => {
                let description = usb
                    .product
                    .or(usb.manufacturer)
                    .unwrap_or_else(|| "USB serial port".to_string());
                let mut hwid = format!("USB VID:PID={:04x}:{:04x}", usb.vid, usb.pid);
                if let Some(serial) = usb.serial_number {
                    hwid.push_str(" SER=");
                    hwid.push_str(&serial);
                }
                (description, hwid)
            }
            SerialPortType::BluetoothPort => {
                ("Bluetooth serial port".to_string(), "BTHENUM".to_string())
            }
            SerialPortType::PciPort => ("PCI serial port".to_string(), "PCI".to_string()),
            SerialPortType::Unknown => ("n/a".to_string(), "n/a".to_string()),
        };

        Self {
            device: info.port_name,
            description,
            hwid,
        }
    }
}

/// Source of port candidates
pub trait PortEnumerator: Send + Sync {
    /// Every port currently visible
    fn ports(&self) -> Vec<PortCandidate>;
}

/// Builds hardware transports for probing and for real sessions
pub trait TransportFactory: Send + Sync {
    /// A closed hardware transport using `settings`
    fn hardware(&self, settings: &SerialSettings) -> Box<dyn Transport>;
}

/// Enumerates ports through the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPorts;

/// Sort key so that rfcomm, ttyACM and ttyUSB nodes come first in numeric order
fn port_sort_key(name: &str) -> (u8, usize, String) {
    let basename = name.rsplit('/').next().unwrap_or(name);
    for (group, prefix) in ["rfcomm", "ttyACM", "ttyUSB"].iter().enumerate() {
        if let Some(rest) = basename.strip_prefix(prefix) {
            let num = rest.parse::<usize>().unwrap_or(usize::MAX);
            return (group as u8, num, basename.to_string());
        }
    }
    (3, 0, name.to_string())
}

impl PortEnumerator for SystemPorts {
    fn ports(&self) -> Vec<PortCandidate> {
        let mut map: HashMap<String, PortCandidate> = HashMap::new();
        match serialport::available_ports() {
            Ok(ports) => {
                for info in ports {
                    let candidate = PortCandidate::from(info);
                    map.entry(candidate.device.clone()).or_insert(candidate);
                }
            }
            Err(e) => tracing::debug!("discovery: port enumeration failed: {}", e),
        }

        // Bound Bluetooth serial nodes are not always reported by the API
        #[cfg(target_os = "linux")]
        if let Ok(entries) = fs::read_dir("/dev") {
            for entry in entries.flatten() {
                if let Some(fname) = entry.file_name().to_str() {
                    if fname.starts_with("rfcomm") {
                        let full = format!("/dev/{}", fname);
                        map.entry(full.clone())
                            .or_insert_with(|| PortCandidate::new(full, "n/a", "n/a"));
                    }
                }
            }
        }

        let mut ports: Vec<PortCandidate> = map.into_values().collect();
        ports.sort_by_key(|p| port_sort_key(&p.device));
        ports
    }
}

/// Opens real serial ports
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialFactory;

impl TransportFactory for SerialFactory {
    fn hardware(&self, settings: &SerialSettings) -> Box<dyn Transport> {
        Box::new(SerialTransport::new(settings.clone()))
    }
}

/// Ranking score for one port; higher means more likely to be the robot.
///
/// Each matching keyword adds `10 * (len - index)`, so earlier keywords weigh
/// more. A Bluetooth SPP hardware id adds 25 and a USB UART bridge adds 8.
pub fn score_port<S: AsRef<str>>(description: &str, hwid: &str, keywords: &[S]) -> i64 {
    let desc = description.to_lowercase();
    let hwid = hwid.to_lowercase();
    let len = keywords.len() as i64;

    let mut score = 0;
    for (idx, keyword) in keywords.iter().enumerate() {
        let keyword = keyword.as_ref().to_lowercase();
        if desc.contains(&keyword) {
            score += 10 * (len - idx as i64);
        }
    }
    if hwid.contains("bthenum") && hwid.contains(SPP_GUID) {
        score += 25;
    }
    if USB_BRIDGE_HINTS.iter().any(|hint| desc.contains(hint)) {
        score += 8;
    }
    score
}

/// Order candidates best-first: score descending, then device name ascending
pub fn rank_candidates<S: AsRef<str>>(candidates: &[PortCandidate], keywords: &[S]) -> Vec<String> {
    let mut scored: Vec<(i64, &str)> = candidates
        .iter()
        .map(|c| (score_port(&c.description, &c.hwid, keywords), c.device.as_str()))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored.into_iter().map(|(_, device)| device.to_string()).collect()
}

/// Keep candidates whose description contains any keyword (case-insensitive)
pub fn filter_candidates<S: AsRef<str>>(
    candidates: Vec<PortCandidate>,
    keywords: &[S],
) -> Vec<PortCandidate> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.as_ref().to_lowercase()).collect();
    candidates
        .into_iter()
        .filter(|c| {
            let desc = c.description.to_lowercase();
            keywords.iter().any(|k| desc.contains(k.as_str()))
        })
        .collect()
}

/// Autodetect tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutodetectOptions {
    /// Ranking keywords, strongest first; `None` uses [`DEFAULT_RANK_KEYWORDS`]
    pub keywords: Option<Vec<String>>,
    /// Probe at most this many candidates, best-first
    pub max_candidates: Option<usize>,
    /// Per-candidate read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Per-candidate write timeout in milliseconds
    pub write_timeout_ms: u64,
}

impl Default for AutodetectOptions {
    fn default() -> Self {
        Self {
            keywords: None,
            max_candidates: None,
            read_timeout_ms: DEFAULT_PROBE_READ_TIMEOUT_MS,
            write_timeout_ms: DEFAULT_PROBE_WRITE_TIMEOUT_MS,
        }
    }
}

impl AutodetectOptions {
    /// Per-candidate read timeout
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Per-candidate write timeout
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

/// Port discovery over an injectable enumerator and transport factory
pub struct Discovery {
    enumerator: Box<dyn PortEnumerator>,
    factory: Box<dyn TransportFactory>,
}

impl Default for Discovery {
    fn default() -> Self {
        Self::system()
    }
}

impl Discovery {
    /// Discovery over a custom enumerator and factory
    pub fn new(enumerator: Box<dyn PortEnumerator>, factory: Box<dyn TransportFactory>) -> Self {
        Self { enumerator, factory }
    }

    /// Discovery over the operating system's ports and real serial transports
    pub fn system() -> Self {
        Self::new(Box::new(SystemPorts), Box::new(SerialFactory))
    }

    /// Factory used for hardware sessions
    pub fn factory(&self) -> &dyn TransportFactory {
        self.factory.as_ref()
    }

    /// Every visible port
    pub fn list_ports(&self) -> Vec<PortCandidate> {
        self.enumerator.ports()
    }

    /// Ports whose description matches a common robot or adapter keyword
    pub fn find_likely(&self) -> Vec<PortCandidate> {
        self.find_likely_with(DEFAULT_FILTER_KEYWORDS)
    }

    /// Ports whose description contains any of `keywords`
    pub fn find_likely_with<S: AsRef<str>>(&self, keywords: &[S]) -> Vec<PortCandidate> {
        filter_candidates(self.list_ports(), keywords)
    }

    /// Device names ordered best-first with the default keywords
    pub fn rank(&self) -> Vec<String> {
        self.rank_with(DEFAULT_RANK_KEYWORDS)
    }

    /// Device names ordered best-first by `keywords`
    pub fn rank_with<S: AsRef<str>>(&self, keywords: &[S]) -> Vec<String> {
        let candidates = self.list_ports();
        tracing::debug!("discovery: detected ports {:?}", candidates);
        rank_candidates(&candidates, keywords)
    }

    /// Check whether `device` answers the handshake like a robot.
    ///
    /// Any failure counts as a miss. The port is always closed before returning.
    pub fn probe(&self, device: &str, write_timeout: Duration, read_timeout: Duration) -> bool {
        let settings = SerialSettings::with_timeouts(read_timeout, write_timeout);
        let mut transport = self.factory.hardware(&settings);
        let outcome = probe_transport(transport.as_mut(), device, read_timeout);
        transport.close();

        match outcome {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!("discovery: probe of {} failed: {}", device, e);
                false
            }
        }
    }

    /// First candidate, best-first, that passes the probe
    pub fn autodetect(&self, options: &AutodetectOptions) -> Option<String> {
        let mut candidates = match &options.keywords {
            Some(keywords) => self.rank_with(keywords),
            None => self.rank(),
        };
        if let Some(max) = options.max_candidates {
            candidates.truncate(max);
        }

        for device in candidates {
            tracing::debug!("discovery: probing {}", device);
            if self.probe(&device, options.write_timeout(), options.read_timeout()) {
                tracing::debug!("discovery: robot found on {}", device);
                return Some(device);
            }
        }
        None
    }
}

fn probe_transport(
    transport: &mut dyn Transport,
    device: &str,
    read_timeout: Duration,
) -> Result<bool> {
    transport.open(device)?;

    while transport.in_waiting() > 0 {
        if transport.readline()?.is_empty() {
            break;
        }
    }
    transport.write(PROBE_COMMAND.as_bytes())?;

    let deadline = Instant::now() + read_timeout.max(MIN_PROBE_WINDOW);
    let mut line = Vec::new();
    while Instant::now() < deadline {
        line = transport.readline()?;
        if !line.is_empty() {
            break;
        }
    }
    if line.is_empty() {
        return Ok(false);
    }

    // A small non-negative API version
    let text = String::from_utf8_lossy(&line);
    Ok(matches!(text.trim().parse::<i64>(), Ok(v) if (0..10_000).contains(&v)))
}
