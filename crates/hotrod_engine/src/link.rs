//! The process boundary between the UI loop and the host.
//!
//! The UI side only ever holds a [`HostPort`]; the host only ever holds the
//! [`ReplyTo`] that came with a request. Nothing else is shared.

use std::sync::mpsc;

use hotrod_core::{HostToUi, UiToHost};
use tokio::sync::{mpsc as async_mpsc, oneshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("host link closed")]
pub struct LinkClosed;

/// Where the host sends the answer to one request.
#[derive(Debug)]
pub enum ReplyTo {
    /// Reply slot owned by the request (request/immediate-return).
    Invoke(oneshot::Sender<HostToUi>),
    /// The requester's inbound event stream.
    Event(async_mpsc::UnboundedSender<HostToUi>),
}

impl ReplyTo {
    pub fn send(self, reply: HostToUi) -> Result<(), LinkClosed> {
        match self {
            ReplyTo::Invoke(tx) => tx.send(reply).map_err(|_| LinkClosed),
            ReplyTo::Event(tx) => tx.send(reply).map_err(|_| LinkClosed),
        }
    }
}

#[derive(Debug)]
pub struct HostEnvelope {
    pub request: UiToHost,
    pub reply_to: ReplyTo,
}

/// UI-side handle for sending requests to the host.
pub trait HostPort: Send + Sync {
    fn send(&self, envelope: HostEnvelope) -> Result<(), LinkClosed>;
}

impl HostPort for mpsc::Sender<HostEnvelope> {
    fn send(&self, envelope: HostEnvelope) -> Result<(), LinkClosed> {
        mpsc::Sender::send(self, envelope).map_err(|_| LinkClosed)
    }
}
