//! Terminal stand-in for the embedded UI component.
//!
//! Outbound port messages are written to stdout as JSON lines. Stdin accepts
//! JSON lines carrying either an inbound port message (`{"port":"fetchFile"}`)
//! or a window signal (`{"window":"close"}`, `{"window":"navigate","url":...}`).

use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use hotrod_core::{InboundPort, OutboundPort};
use hotrod_engine::PortSink;
use hotrod_logging::{hotrod_error, hotrod_info, hotrod_warn};
use serde::Deserialize;

use super::app::HostEvent;

pub struct TerminalSurface;

impl TerminalSurface {
    fn write_line(&self, line: &str) {
        let mut out = io::stdout().lock();
        if let Err(err) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            hotrod_warn!("Could not write to the UI surface: {}", err);
        }
    }
}

impl PortSink for TerminalSurface {
    fn send(&self, port: OutboundPort) {
        match serde_json::to_string(&port) {
            Ok(line) => self.write_line(&line),
            Err(err) => hotrod_error!("Could not encode {} message: {}", port.port_name(), err),
        }
    }

    fn reload(&self) {
        self.write_line(r#"{"surface":"reload"}"#);
    }
}

#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "window", rename_all = "kebab-case")]
pub enum WindowSignal {
    Close,
    Activate,
    Navigate { url: String },
    Quit,
}

#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SurfaceInput {
    Port(InboundPort),
    Window(WindowSignal),
}

impl From<SurfaceInput> for HostEvent {
    fn from(input: SurfaceInput) -> Self {
        match input {
            SurfaceInput::Port(port) => HostEvent::Port(port),
            SurfaceInput::Window(WindowSignal::Close) => HostEvent::WindowClosed,
            SurfaceInput::Window(WindowSignal::Activate) => HostEvent::Activate,
            SurfaceInput::Window(WindowSignal::Navigate { url }) => HostEvent::WillNavigate(url),
            SurfaceInput::Window(WindowSignal::Quit) => HostEvent::Quit,
        }
    }
}

pub fn parse_input(line: &str) -> Result<SurfaceInput, serde_json::Error> {
    serde_json::from_str(line)
}

/// Forwards stdin lines to the host loop. End of input closes the window.
pub fn spawn_input_reader(events: mpsc::Sender<HostEvent>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("hotrod-surface".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        hotrod_warn!("UI surface input failed: {}", err);
                        break;
                    }
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match parse_input(line) {
                    Ok(input) => {
                        if events.send(input.into()).is_err() {
                            return;
                        }
                    }
                    Err(err) => hotrod_warn!("Ignoring surface input {:?}: {}", line, err),
                }
            }
            hotrod_info!("UI surface input closed");
            let _ = events.send(HostEvent::WindowClosed);
        })
}
