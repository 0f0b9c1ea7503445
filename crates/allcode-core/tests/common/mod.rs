//! Scripted serial bus shared by the integration tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};

use allcode_core::discovery::{Discovery, PortCandidate, PortEnumerator, TransportFactory};
use allcode_core::transport::{SerialSettings, Transport, TransportKind};
use allcode_core::{Result, RobotError};

/// How one fake port behaves once opened
#[derive(Debug, Clone, Default)]
pub struct PortScript {
    /// Lines already waiting before anything is sent
    pub stale: Vec<&'static str>,
    /// Lines handed out one per `readline`, after the stale ones
    pub replies: Vec<&'static str>,
    pub fail_open: bool,
    pub fail_write: bool,
}

impl PortScript {
    pub fn replies(replies: &[&'static str]) -> Self {
        Self {
            replies: replies.to_vec(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
struct Bus {
    scripts: HashMap<String, PortScript>,
    opened: Vec<String>,
    closed: usize,
    writes: Vec<String>,
    reads: usize,
}

/// A set of fake ports; every transport it builds records into it
#[derive(Clone, Default)]
pub struct MockBus {
    inner: Arc<Mutex<Bus>>,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, port: &str, script: PortScript) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .scripts
            .insert(port.to_string(), script);
        self
    }

    pub fn transport(&self) -> MockTransport {
        MockTransport {
            bus: self.clone(),
            session: None,
        }
    }

    /// Every write so far, decoded
    pub fn writes(&self) -> Vec<String> {
        self.inner.lock().unwrap().writes.clone()
    }

    /// Addresses successfully opened, in order
    pub fn opened(&self) -> Vec<String> {
        self.inner.lock().unwrap().opened.clone()
    }

    pub fn reads(&self) -> usize {
        self.inner.lock().unwrap().reads
    }

    pub fn closed(&self) -> usize {
        self.inner.lock().unwrap().closed
    }
}

impl TransportFactory for MockBus {
    fn hardware(&self, _settings: &SerialSettings) -> Box<dyn Transport> {
        Box::new(self.transport())
    }
}

struct Session {
    stale: VecDeque<Vec<u8>>,
    replies: VecDeque<Vec<u8>>,
    fail_write: bool,
}

/// Hardware-kind transport over a [`MockBus`] port
pub struct MockTransport {
    bus: MockBus,
    session: Option<Session>,
}

impl Transport for MockTransport {
    fn open(&mut self, address: &str) -> Result<()> {
        let mut bus = self.bus.inner.lock().unwrap();
        let script = match bus.scripts.get(address) {
            Some(script) if !script.fail_open => script.clone(),
            _ => {
                return Err(RobotError::OpenFailed {
                    port: address.to_string(),
                    reason: "no such device".to_string(),
                })
            }
        };
        bus.opened.push(address.to_string());
        self.session = Some(Session {
            stale: script.stale.iter().map(|l| l.as_bytes().to_vec()).collect(),
            replies: script.replies.iter().map(|l| l.as_bytes().to_vec()).collect(),
            fail_write: script.fail_write,
        });
        Ok(())
    }

    fn close(&mut self) {
        if self.session.take().is_some() {
            self.bus.inner.lock().unwrap().closed += 1;
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        let session = self.session.as_mut().ok_or(RobotError::NotOpen)?;
        if session.fail_write {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "write failed").into());
        }
        self.bus
            .inner
            .lock()
            .unwrap()
            .writes
            .push(String::from_utf8_lossy(data).into_owned());
        Ok(())
    }

    fn readline(&mut self) -> Result<Vec<u8>> {
        let session = self.session.as_mut().ok_or(RobotError::NotOpen)?;
        self.bus.inner.lock().unwrap().reads += 1;
        Ok(session
            .stale
            .pop_front()
            .or_else(|| session.replies.pop_front())
            .unwrap_or_default())
    }

    fn in_waiting(&self) -> usize {
        self.session
            .as_ref()
            .map(|s| s.stale.iter().map(Vec::len).sum())
            .unwrap_or(0)
    }

    fn is_open(&self) -> bool {
        self.session.is_some()
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Hardware
    }
}

/// Fixed port list
pub struct MockPorts(pub Vec<PortCandidate>);

impl PortEnumerator for MockPorts {
    fn ports(&self) -> Vec<PortCandidate> {
        self.0.clone()
    }
}

pub fn discovery(bus: &MockBus, ports: Vec<PortCandidate>) -> Arc<Discovery> {
    Arc::new(Discovery::new(Box::new(MockPorts(ports)), Box::new(bus.clone())))
}

/// Route `tracing` output through the test harness
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
