use crate::typing::runtime::{
    Generation, TypingEvent, TypingEventKind, TypingHandle, spawn_typing,
};
use crate::typing::task::{Phase, TypingParams};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Consumer side of the typing animation.
///
/// Holds at most one live generation. Starting a new one cancels the old one
/// first, and events still queued from older generations are discarded.
pub struct TypingSequencer {
    tx_events: UnboundedSender<TypingEvent>,
    rx_events: UnboundedReceiver<TypingEvent>,
    live: Option<(TypingParams, TypingHandle)>,
    next_generation: Generation,
    displayed: String,
    revealed: usize,
    phase: Phase,
}

impl TypingSequencer {
    pub fn new() -> Self {
        let (tx_events, rx_events) = unbounded_channel();
        Self {
            tx_events,
            rx_events,
            live: None,
            next_generation: Generation::FIRST,
            displayed: String::new(),
            revealed: 0,
            phase: Phase::Pending,
        }
    }

    /// Starts a new generation, cancelling the live one if any.
    pub fn start(&mut self, params: TypingParams) -> Generation {
        self.cancel();
        let generation = self.next_generation;
        self.next_generation = generation.next();
        self.displayed.clear();
        self.revealed = 0;
        self.phase = Phase::Pending;
        let handle = spawn_typing(params.clone(), generation, self.tx_events.clone());
        self.live = Some((params, handle));
        generation
    }

    /// Starts a new generation only if `params` differ from the live ones.
    pub fn ensure(&mut self, params: &TypingParams) -> Option<Generation> {
        if self.params() == Some(params) {
            return None;
        }
        Some(self.start(params.clone()))
    }

    /// Cancels the live generation. Idempotent.
    pub fn cancel(&mut self) {
        if let Some((_, handle)) = self.live.take() {
            handle.cancel();
        }
    }

    /// Applies every queued event. Returns true if the view changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.rx_events.try_recv() {
            changed |= self.apply(event);
        }
        changed
    }

    /// Waits for the next event of the live generation and applies it.
    ///
    /// Returns `None` when no generation is live or the live one completed.
    pub async fn next_event(&mut self) -> Option<TypingEventKind> {
        loop {
            if self.live.is_none() || self.phase == Phase::Complete {
                return None;
            }
            let event = self.rx_events.recv().await?;
            if self.is_current(event.generation) {
                let kind = event.kind.clone();
                self.apply(event);
                return Some(kind);
            }
        }
    }

    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> Option<Generation> {
        self.live.as_ref().map(|(_, handle)| handle.generation())
    }

    pub fn params(&self) -> Option<&TypingParams> {
        self.live.as_ref().map(|(params, _)| params)
    }

    fn is_current(&self, generation: Generation) -> bool {
        self.generation() == Some(generation)
    }

    fn apply(&mut self, event: TypingEvent) -> bool {
        if !self.is_current(event.generation) {
            log::trace!(
                "dropping stale event from generation {}",
                event.generation.get()
            );
            return false;
        }
        match event.kind {
            TypingEventKind::Running => self.phase = Phase::Running,
            TypingEventKind::Revealed { text, revealed } => {
                self.displayed = text;
                self.revealed = revealed;
            }
            TypingEventKind::Completed => {
                log::debug!("typing generation {} complete", event.generation.get());
                self.phase = Phase::Complete;
            }
        }
        true
    }
}

impl Default for TypingSequencer {
    fn default() -> Self {
        Self::new()
    }
}
