//! Simulated Robot - hardware-free transport for teaching and testing
//!
//! Synthesizes a plausible integer reply for every command so student programs
//! run unchanged without a robot attached. Replies are keyed by the verb of the
//! last written command; see [`SimulatedReply::for_verb`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Transport, TransportKind};
use crate::error::{Result, RobotError};
use crate::protocol::verb_of;

/// Verbs echoed on write so students can see the robot "move"
const ECHOED_VERBS: &[&str] = &[
    "Forwards",
    "Backwards",
    "Left",
    "Right",
    "CardInit",
    "CardCreate",
    "CardOpen",
    "CardDelete",
];

/// Shape of the reply the simulator gives for a verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatedReply {
    /// Always the same value
    Fixed(i32),
    /// Uniformly drawn from the inclusive range
    Uniform(i32, i32),
}

impl SimulatedReply {
    /// Reply table for a command verb
    pub fn for_verb(verb: &str) -> Self {
        match verb {
            "GetAPIVersion" => SimulatedReply::Fixed(7),
            "GetBatteryVoltage" => SimulatedReply::Uniform(0, 5000),
            "ReadAxis" => SimulatedReply::Uniform(-32768, 32768),
            "ReadSwitch" | "ReadLine" => SimulatedReply::Uniform(0, 1),
            "ReadIR" | "ReadLight" => SimulatedReply::Uniform(0, 4095),
            "ReadMic" => SimulatedReply::Uniform(1, 4095),
            "CardReadByte" => SimulatedReply::Uniform(0, 255),
            // Movement, card and servo commands acknowledge with 1, as does anything unknown
            _ => SimulatedReply::Fixed(1),
        }
    }

    /// Draw one value
    pub fn sample<R: Rng>(&self, rng: &mut R) -> i32 {
        match *self {
            SimulatedReply::Fixed(v) => v,
            SimulatedReply::Uniform(lo, hi) => rng.gen_range(lo..=hi),
        }
    }

    /// Whether `value` is a reply this shape can produce
    pub fn contains(&self, value: i32) -> bool {
        match *self {
            SimulatedReply::Fixed(v) => v == value,
            SimulatedReply::Uniform(lo, hi) => (lo..=hi).contains(&value),
        }
    }
}

/// In-memory stand-in for the robot
pub struct SimulatedTransport {
    is_open: bool,
    last_command: Option<String>,
    label: Option<String>,
    /// Print friendly status lines to stdout
    echo: bool,
    rng: StdRng,
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedTransport {
    /// Create a simulator seeded from system entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a simulator with a fixed seed for reproducible replies
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Create a simulator drawing from `rng`
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            is_open: false,
            last_command: None,
            label: None,
            echo: true,
            rng,
        }
    }

    /// Disable the stdout echo
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    /// Label passed to the last `open`
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Last command written, trimmed
    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    fn say(&self, message: &str) {
        if self.echo {
            println!("{}", message);
        }
    }
}

impl Transport for SimulatedTransport {
    fn open(&mut self, address: &str) -> Result<()> {
        self.is_open = true;
        self.label = Some(address.to_string());
        self.say(&format!("[SimulatedRobot] Connected (simulated) on {}", address));
        Ok(())
    }

    fn close(&mut self) {
        if self.is_open {
            self.say("[SimulatedRobot] Disconnected");
        }
        self.is_open = false;
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        if !self.is_open {
            return Err(RobotError::NotOpen);
        }
        let command = String::from_utf8_lossy(data).trim().to_string();
        if ECHOED_VERBS.contains(&verb_of(&command)) {
            self.say(&format!("-> [SimulatedRobot] {}", command));
        }
        tracing::trace!("simulator: recorded {:?}", command);
        self.last_command = Some(command);
        Ok(())
    }

    fn readline(&mut self) -> Result<Vec<u8>> {
        if !self.is_open {
            return Err(RobotError::NotOpen);
        }
        let verb = verb_of(self.last_command.as_deref().unwrap_or(""));
        let value = SimulatedReply::for_verb(verb).sample(&mut self.rng);
        Ok(format!("{}\n", value).into_bytes())
    }

    fn in_waiting(&self) -> usize {
        0
    }

    fn is_open(&self) -> bool {
        self.is_open
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Simulated
    }

    fn echo(&self) -> bool {
        self.echo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_after(sim: &mut SimulatedTransport, command: &str) -> i32 {
        sim.write(command.as_bytes()).unwrap();
        let line = sim.readline().unwrap();
        String::from_utf8(line).unwrap().trim().parse().unwrap()
    }

    #[test]
    fn test_reply_table() {
        assert_eq!(SimulatedReply::for_verb("GetAPIVersion"), SimulatedReply::Fixed(7));
        assert_eq!(
            SimulatedReply::for_verb("ReadAxis"),
            SimulatedReply::Uniform(-32768, 32768)
        );
        assert_eq!(SimulatedReply::for_verb("ReadMic"), SimulatedReply::Uniform(1, 4095));
        assert_eq!(SimulatedReply::for_verb("ServoSetPos"), SimulatedReply::Fixed(1));
        assert_eq!(SimulatedReply::for_verb("NoSuchVerb"), SimulatedReply::Fixed(1));
        assert_eq!(SimulatedReply::for_verb(""), SimulatedReply::Fixed(1));
    }

    #[test]
    fn test_read_axis_is_bounded() {
        let mut sim = SimulatedTransport::with_seed(42).quiet();
        sim.open("SIMULATED").unwrap();
        for _ in 0..200 {
            let v = reply_after(&mut sim, "ReadAxis 0\n");
            assert!((-32768..=32768).contains(&v), "out of range: {}", v);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SimulatedTransport::with_seed(7).quiet();
        let mut b = SimulatedTransport::with_seed(7).quiet();
        a.open("A").unwrap();
        b.open("B").unwrap();
        let xs: Vec<i32> = (0..10).map(|_| reply_after(&mut a, "ReadIR 3")).collect();
        let ys: Vec<i32> = (0..10).map(|_| reply_after(&mut b, "ReadIR 3")).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_closed_simulator_rejects_io() {
        let mut sim = SimulatedTransport::with_seed(1).quiet();
        assert!(matches!(sim.write(b"GetAPIVersion\n"), Err(RobotError::NotOpen)));
        assert!(matches!(sim.readline(), Err(RobotError::NotOpen)));
        sim.open("SIMULATED").unwrap();
        sim.close();
        assert!(!sim.is_open());
        assert!(matches!(sim.readline(), Err(RobotError::NotOpen)));
    }

    #[test]
    fn test_open_records_label() {
        let mut sim = SimulatedTransport::with_seed(1).quiet();
        sim.open("SIMULATED-3").unwrap();
        assert_eq!(sim.label(), Some("SIMULATED-3"));
        assert_eq!(sim.in_waiting(), 0);
        assert_eq!(sim.kind(), TransportKind::Simulated);
    }

    #[test]
    fn test_quiet_turns_echo_off() {
        assert!(SimulatedTransport::with_seed(1).echo());
        assert!(!SimulatedTransport::with_seed(1).quiet().echo());
    }
}
