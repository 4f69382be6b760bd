//! Last-write-wins rendering off the session's control flow.
//!
//! A host takes a [`Snapshot`] of the session after every state change and
//! renders it on a blocking task. Each request gets a [`Ticket`] from the
//! host's [`RenderSlot`]; when results come back, the slot keeps only the one
//! belonging to the newest ticket. Superseded renders are not cancelled, their
//! output is just dropped on arrival.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::document::ProcessedDocument;
use crate::redact::{RedactLimits, Redactor, RevealedSet};
use crate::render::{RenderOptions, Renderer, TextLine};

/// Errors from the render pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Everything a render depends on, detached from the session.
#[derive(Debug, Clone)]
pub struct Snapshot {
    document: Arc<ProcessedDocument>,
    revealed: RevealedSet,
    solved: bool,
    limits: RedactLimits,
    options: RenderOptions,
}

impl Snapshot {
    pub fn new(
        document: Arc<ProcessedDocument>,
        revealed: RevealedSet,
        solved: bool,
        limits: RedactLimits,
        options: RenderOptions,
    ) -> Self {
        Self {
            document,
            revealed,
            solved,
            limits,
            options,
        }
    }

    pub fn document(&self) -> &ProcessedDocument {
        &self.document
    }

    pub fn revealed(&self) -> &RevealedSet {
        &self.revealed
    }

    /// The solved flag handed to the redactor.
    pub fn solved(&self) -> bool {
        self.solved
    }

    pub fn renderer(&self) -> Renderer<'_> {
        Renderer::new(
            Redactor::new(&self.revealed, self.solved, &self.limits),
            &self.options,
        )
    }

    pub fn html(&self) -> String {
        self.renderer().html(&self.document)
    }

    pub fn text(&self) -> Vec<TextLine> {
        self.renderer().text(&self.document)
    }

    /// Run `f` against this snapshot on tokio's blocking pool.
    pub async fn render<T, F>(self, f: F) -> Result<T, PipelineError>
    where
        F: FnOnce(&Snapshot) -> T + Send + 'static,
        T: Send + 'static,
    {
        let out = tokio::task::spawn_blocking(move || f(&self)).await?;
        Ok(out)
    }
}

/// Identifies one render request. Later requests get larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// A finished render tagged with the ticket it was issued under.
#[derive(Debug, Clone)]
pub struct Rendered<T> {
    pub ticket: Ticket,
    pub value: T,
}

/// Holds the displayed render and arbitrates between in-flight ones.
#[derive(Debug)]
pub struct RenderSlot<T> {
    issued: u64,
    shown: Option<Ticket>,
    current: Option<T>,
}

impl<T> Default for RenderSlot<T> {
    fn default() -> Self {
        Self {
            issued: 0,
            shown: None,
            current: None,
        }
    }
}

impl<T> RenderSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new request, superseding every earlier one.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// The newest ticket issued so far.
    pub fn latest(&self) -> Option<Ticket> {
        (self.issued > 0).then_some(Ticket(self.issued))
    }

    /// Store `value` if `ticket` is the newest issued. Returns whether it was
    /// kept.
    pub fn accept(&mut self, ticket: Ticket, value: T) -> bool {
        if Some(ticket) != self.latest() {
            debug!(ticket = ticket.0, latest = self.issued, "discarding stale render");
            return false;
        }
        self.shown = Some(ticket);
        self.current = Some(value);
        true
    }

    /// The displayed render, if any has been accepted.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Whether a request newer than the displayed render is outstanding.
    pub fn is_pending(&self) -> bool {
        self.shown != self.latest()
    }

    /// Forget the displayed render, e.g. when the session loads another
    /// document. Tickets keep increasing.
    pub fn clear(&mut self) {
        self.shown = None;
        self.current = None;
    }
}

/// Render `snapshot` in the background and send the result to `tx`.
///
/// The returned handle may be ignored; the send fails quietly once the
/// receiver is gone.
pub fn dispatch<T, F>(
    snapshot: Snapshot,
    ticket: Ticket,
    f: F,
    tx: mpsc::UnboundedSender<Rendered<T>>,
) -> tokio::task::JoinHandle<()>
where
    F: FnOnce(&Snapshot) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(async move {
        match snapshot.render(f).await {
            Ok(value) => {
                let _ = tx.send(Rendered { ticket, value });
            }
            Err(e) => warn!(ticket = ticket.0, error = %e, "render failed"),
        }
    })
}
