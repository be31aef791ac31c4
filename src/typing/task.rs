use crate::errors::HeroTextErrors;
use std::time::Duration;

pub const DEFAULT_INTERVAL_MS: u64 = 100;
pub const DEFAULT_START_DELAY_MS: u64 = 0;

/// Immutable parameters of one typing task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingParams {
    full_text: String,
    interval: Duration,
    start_delay: Duration,
}

impl TypingParams {
    /// Fails with `InvalidParameter` when `interval_ms` is zero.
    pub fn new(
        full_text: impl Into<String>,
        interval_ms: u64,
        start_delay_ms: u64,
    ) -> Result<Self, HeroTextErrors> {
        if interval_ms == 0 {
            return Err(HeroTextErrors::InvalidParameter(
                "typing interval must be at least 1ms".to_string(),
            ));
        }
        Ok(Self {
            full_text: full_text.into(),
            interval: Duration::from_millis(interval_ms),
            start_delay: Duration::from_millis(start_delay_ms),
        })
    }

    pub fn with_defaults(full_text: impl Into<String>) -> Self {
        Self {
            full_text: full_text.into(),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            start_delay: Duration::from_millis(DEFAULT_START_DELAY_MS),
        }
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn start_delay(&self) -> Duration {
        self.start_delay
    }

    /// Length in characters, the unit the task reveals in.
    pub fn char_len(&self) -> usize {
        self.full_text.chars().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Running,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The one-shot start-delay timer fired.
    StartDelayElapsed,
    /// The repeating reveal timer fired.
    Reveal,
}

/// What the timer adapter has to do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing changed. A repeating timer delivering this should be stopped.
    Idle,
    /// Entered `Running`: arm the repeating reveal timer.
    ArmReveal,
    /// One more character is visible. `complete` means it was the last one.
    Reveal { complete: bool },
    /// Reached `Complete` without revealing anything (empty text).
    Complete,
}

/// One generation of the typing animation.
///
/// The display buffer is never stored separately: it is always the prefix of
/// the full text ending at `cursor`, so stale characters cannot end up in it.
#[derive(Debug, Clone)]
pub struct TypingTask {
    params: TypingParams,
    revealed: usize,
    cursor: usize,
    phase: Phase,
}

impl TypingTask {
    pub fn new(params: TypingParams) -> Self {
        Self {
            params,
            revealed: 0,
            cursor: 0,
            phase: Phase::Pending,
        }
    }

    pub fn params(&self) -> &TypingParams {
        &self.params
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn displayed(&self) -> &str {
        &self.params.full_text[..self.cursor]
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn step(mut self, tick: Tick) -> (Self, Effect) {
        let effect = match (self.phase, tick) {
            (Phase::Pending, Tick::StartDelayElapsed) => {
                if self.params.full_text.is_empty() {
                    self.phase = Phase::Complete;
                    Effect::Complete
                } else {
                    self.phase = Phase::Running;
                    Effect::ArmReveal
                }
            }
            (Phase::Running, Tick::Reveal) => self.reveal_next(),
            _ => Effect::Idle,
        };
        (self, effect)
    }

    fn reveal_next(&mut self) -> Effect {
        let rest = &self.params.full_text[self.cursor..];
        let Some(next) = rest.chars().next() else {
            self.phase = Phase::Complete;
            return Effect::Idle;
        };
        self.cursor += next.len_utf8();
        self.revealed += 1;
        let complete = self.cursor == self.params.full_text.len();
        if complete {
            self.phase = Phase::Complete;
        }
        Effect::Reveal { complete }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(mut task: TypingTask) -> (TypingTask, Vec<String>) {
        let mut snapshots = Vec::new();
        let (next, effect) = task.step(Tick::StartDelayElapsed);
        task = next;
        if effect != Effect::ArmReveal {
            return (task, snapshots);
        }
        loop {
            let (next, effect) = task.step(Tick::Reveal);
            task = next;
            match effect {
                Effect::Reveal { complete } => {
                    snapshots.push(task.displayed().to_string());
                    if complete {
                        break;
                    }
                }
                other => panic!("unexpected effect {other:?}"),
            }
        }
        (task, snapshots)
    }

    #[test]
    fn rejects_zero_interval() {
        let result = TypingParams::new("Hi", 0, 0);
        assert!(matches!(result, Err(HeroTextErrors::InvalidParameter(_))));
    }

    #[test]
    fn accepts_zero_start_delay() {
        let params = TypingParams::new("Hi", 1, 0).unwrap();
        assert_eq!(params.start_delay(), Duration::ZERO);
        assert_eq!(params.interval(), Duration::from_millis(1));
    }

    #[test]
    fn defaults_match_hero_component() {
        let params = TypingParams::with_defaults("abc");
        assert_eq!(params.interval(), Duration::from_millis(100));
        assert_eq!(params.start_delay(), Duration::ZERO);
    }

    #[test]
    fn starts_pending_with_empty_buffer() {
        let task = TypingTask::new(TypingParams::with_defaults("Hello"));
        assert_eq!(task.phase(), Phase::Pending);
        assert_eq!(task.displayed(), "");
        assert_eq!(task.revealed(), 0);
    }

    #[test]
    fn reveal_before_start_is_ignored() {
        let task = TypingTask::new(TypingParams::with_defaults("Hello"));
        let (task, effect) = task.step(Tick::Reveal);
        assert_eq!(effect, Effect::Idle);
        assert_eq!(task.phase(), Phase::Pending);
        assert_eq!(task.displayed(), "");
    }

    #[test]
    fn reveals_one_character_per_tick() {
        let task = TypingTask::new(TypingParams::with_defaults("Hello"));
        let (task, snapshots) = run_to_end(task);
        assert_eq!(snapshots, vec!["H", "He", "Hel", "Hell", "Hello"]);
        assert_eq!(task.phase(), Phase::Complete);
        assert_eq!(task.revealed(), 5);
    }

    #[test]
    fn ticks_after_completion_are_idle() {
        let task = TypingTask::new(TypingParams::with_defaults("ok"));
        let (task, _) = run_to_end(task);
        let (task, effect) = task.step(Tick::Reveal);
        assert_eq!(effect, Effect::Idle);
        let (task, effect) = task.step(Tick::StartDelayElapsed);
        assert_eq!(effect, Effect::Idle);
        assert_eq!(task.displayed(), "ok");
        assert_eq!(task.revealed(), 2);
    }

    #[test]
    fn empty_text_completes_on_start() {
        let task = TypingTask::new(TypingParams::with_defaults(""));
        let (task, effect) = task.step(Tick::StartDelayElapsed);
        assert_eq!(effect, Effect::Complete);
        assert!(task.is_complete());
        assert_eq!(task.displayed(), "");
        assert_eq!(task.revealed(), 0);
    }

    #[test]
    fn multibyte_characters_are_revealed_whole() {
        let task = TypingTask::new(TypingParams::with_defaults("héllo ✓"));
        let (task, snapshots) = run_to_end(task);
        assert_eq!(snapshots.len(), 7);
        assert_eq!(snapshots[1], "hé");
        assert_eq!(snapshots[6], "héllo ✓");
        assert_eq!(task.revealed(), task.params().char_len());
    }

    #[test]
    fn revealed_count_is_strictly_increasing() {
        let task = TypingTask::new(TypingParams::with_defaults("monotonic"));
        let (_, snapshots) = run_to_end(task);
        for (index, snapshot) in snapshots.iter().enumerate() {
            assert_eq!(snapshot.chars().count(), index + 1);
        }
    }
}
