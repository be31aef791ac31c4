use crate::typing::task::{Effect, Tick, TypingParams, TypingTask};
use futures_util::Stream;
use futures_util::stream;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, sleep};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub const FIRST: Generation = Generation(1);

    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypingEventKind {
    Running,
    Revealed { text: String, revealed: usize },
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingEvent {
    pub generation: Generation,
    pub kind: TypingEventKind,
}

/// Liveness flag shared by a handle and its timer task.
///
/// The flag is checked under the same lock as the send, so once `close`
/// returns the task cannot emit anything else.
#[derive(Debug)]
struct EmitGate {
    alive: Mutex<bool>,
}

impl EmitGate {
    fn new() -> Self {
        Self {
            alive: Mutex::new(true),
        }
    }

    fn emit(&self, tx: &UnboundedSender<TypingEvent>, event: TypingEvent) -> bool {
        let alive = self.alive.lock().unwrap_or_else(PoisonError::into_inner);
        if !*alive {
            return false;
        }
        tx.send(event).is_ok()
    }

    /// Returns whether the gate was still open.
    fn close(&self) -> bool {
        let mut alive = self.alive.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *alive, false)
    }

    fn is_open(&self) -> bool {
        *self.alive.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owner of one running typing task. Dropping it cancels the task.
#[derive(Debug)]
pub struct TypingHandle {
    generation: Generation,
    gate: Arc<EmitGate>,
    task: JoinHandle<()>,
}

impl TypingHandle {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Stops both timers. Safe to call repeatedly and after completion.
    pub fn cancel(&self) {
        if self.gate.close() && !self.task.is_finished() {
            log::debug!("typing generation {} cancelled", self.generation.get());
        }
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        !self.gate.is_open()
    }

    /// True once the task stopped, either completed or cancelled.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TypingHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Starts a task on the current tokio runtime.
///
/// Must be called from within a runtime context.
pub fn spawn_typing(
    params: TypingParams,
    generation: Generation,
    tx: UnboundedSender<TypingEvent>,
) -> TypingHandle {
    log::debug!(
        "typing generation {} started: {} chars, interval {:?}, delay {:?}",
        generation.get(),
        params.char_len(),
        params.interval(),
        params.start_delay()
    );
    let gate = Arc::new(EmitGate::new());
    let task = tokio::spawn(drive(
        TypingTask::new(params),
        generation,
        gate.clone(),
        tx,
    ));
    TypingHandle {
        generation,
        gate,
        task,
    }
}

async fn drive(
    mut task: TypingTask,
    generation: Generation,
    gate: Arc<EmitGate>,
    tx: UnboundedSender<TypingEvent>,
) {
    let emit = |kind: TypingEventKind| gate.emit(&tx, TypingEvent { generation, kind });

    sleep(task.params().start_delay()).await;
    let (started, effect) = task.step(Tick::StartDelayElapsed);
    task = started;
    match effect {
        Effect::ArmReveal => {
            if !emit(TypingEventKind::Running) {
                return;
            }
        }
        Effect::Complete => {
            emit(TypingEventKind::Completed);
            return;
        }
        _ => return,
    }

    // The first tick of a tokio interval completes immediately, so the
    // first character shows up as soon as the task is running.
    let mut reveal_timer = interval(task.params().interval());
    reveal_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        reveal_timer.tick().await;
        let (next, effect) = task.step(Tick::Reveal);
        task = next;
        let Effect::Reveal { complete } = effect else {
            return;
        };
        log::trace!(
            "typing generation {} revealed {}",
            generation.get(),
            task.revealed()
        );
        let revealed = TypingEventKind::Revealed {
            text: task.displayed().to_string(),
            revealed: task.revealed(),
        };
        if !emit(revealed) {
            return;
        }
        if complete {
            emit(TypingEventKind::Completed);
            return;
        }
    }
}

/// Lazy sequence of display-buffer snapshots, one per revealed character.
///
/// Dropping the stream cancels the underlying task.
pub fn typing_stream(params: TypingParams) -> impl Stream<Item = String> {
    let (tx, rx) = unbounded_channel();
    let handle = spawn_typing(params, Generation::FIRST, tx);
    stream::unfold((handle, rx), |(handle, mut rx)| async move {
        loop {
            let Some(event) = rx.recv().await else {
                return None;
            };
            match event.kind {
                TypingEventKind::Revealed { text, .. } => return Some((text, (handle, rx))),
                TypingEventKind::Running => continue,
                TypingEventKind::Completed => return None,
            }
        }
    })
}
