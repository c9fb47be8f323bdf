use kat_types::formatting::{format_clock, format_float_text};
use kat_types::{TimerCommand, TimerConfig, TimerKind, TimerState};

/// Initial duration of a fresh countdown, in seconds
pub const DEFAULT_COUNTDOWN_SECS: f64 = 10.0;

/// Named stopwatch or countdown driven by simulation time.
///
/// Time is passed in explicitly; a timer never reads a clock by itself.
#[derive(Debug, Clone)]
pub struct Timer {
    name: String,
    kind: TimerKind,
    state: TimerState,
    start: Option<f64>,
    stop: Option<f64>,
    initial_duration: f64,
    displayed: bool,
}

impl Timer {
    pub fn new(name: impl Into<String>, kind: TimerKind) -> Self {
        Self {
            name: name.into(),
            kind,
            state: TimerState::Pending,
            start: None,
            stop: None,
            initial_duration: DEFAULT_COUNTDOWN_SECS,
            displayed: false,
        }
    }

    pub fn timer(name: impl Into<String>) -> Self {
        Self::new(name, TimerKind::Timer)
    }

    pub fn countdown(name: impl Into<String>) -> Self {
        Self::new(name, TimerKind::Countdown)
    }

    // --- Accessors ---

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_countdown(&self) -> bool {
        self.kind == TimerKind::Countdown
    }

    pub fn initial_duration(&self) -> f64 {
        self.initial_duration
    }

    pub fn displayed(&self) -> bool {
        self.displayed
    }

    pub fn set_displayed(&mut self, displayed: bool) {
        self.displayed = displayed;
    }

    // --- State machine ---

    /// Pending → Running → Stopped → Pending
    pub fn change_state(&mut self, now: f64) -> TimerState {
        match self.state {
            TimerState::Pending => self.begin(now),
            TimerState::Running => self.halt(now),
            TimerState::Stopped => self.clear(),
        }
        self.state
    }

    /// Start from Pending or restart from Stopped
    pub fn start(&mut self, now: f64) {
        if matches!(self.state, TimerState::Pending | TimerState::Stopped) {
            self.begin(now);
        }
    }

    pub fn stop(&mut self, now: f64) {
        if self.state == TimerState::Running {
            self.halt(now);
        }
    }

    pub fn reset(&mut self) {
        if matches!(self.state, TimerState::Running | TimerState::Stopped) {
            self.clear();
        }
    }

    pub fn apply(&mut self, command: TimerCommand, now: f64) {
        match command {
            TimerCommand::Start => self.start(now),
            TimerCommand::Stop => self.stop(now),
            TimerCommand::Reset => self.reset(),
        }
    }

    fn begin(&mut self, now: f64) {
        self.start = Some(now);
        self.stop = None;
        self.state = TimerState::Running;
    }

    fn halt(&mut self, now: f64) {
        self.stop = Some(now);
        self.state = TimerState::Stopped;
    }

    fn clear(&mut self) {
        self.start = None;
        self.stop = None;
        self.state = TimerState::Pending;
    }

    /// Seconds counted so far. Zero while pending.
    pub fn elapsed(&self, now: f64) -> f64 {
        match (self.state, self.start, self.stop) {
            (TimerState::Running, Some(start), _) => now - start,
            (TimerState::Stopped, Some(start), Some(stop)) => stop - start,
            _ => 0.0,
        }
    }

    /// Countdown time left; negative once expired
    pub fn remaining(&self, now: f64) -> f64 {
        self.initial_duration - self.elapsed(now)
    }

    // ─── Evaluation ─────────────────────────────────────────────────────────

    /// Timer: running and more than `target` seconds elapsed.
    /// Countdown: started and less than `target` seconds remaining. An
    /// expired running countdown stops itself here.
    pub fn evaluate(&mut self, target: f64, now: f64) -> bool {
        match self.kind {
            TimerKind::Timer => self.state == TimerState::Running && self.elapsed(now) > target,
            TimerKind::Countdown => {
                let remaining = self.remaining(now);
                if remaining < 0.0 && self.state == TimerState::Running {
                    self.change_state(now);
                    tracing::debug!(timer = %self.name, "Countdown expired");
                }
                self.state != TimerState::Pending && remaining < target
            }
        }
    }

    /// Per-tick housekeeping; lets countdowns expire without a condition
    pub fn poll(&mut self, now: f64) {
        if self.is_countdown() {
            self.evaluate(0.0, now);
        }
    }

    /// `hh:mm:ss.ff` of elapsed (timer) or remaining (countdown) time
    pub fn displayed_value(&mut self, now: f64) -> String {
        match self.kind {
            TimerKind::Timer => format_clock(self.elapsed(now)),
            TimerKind::Countdown => {
                self.evaluate(0.0, now);
                format_clock(self.remaining(now).max(0.0))
            }
        }
    }

    // ─── Countdown duration ─────────────────────────────────────────────────

    /// Only while pending, and only to a positive finite duration
    pub fn set_initial_duration(&mut self, secs: f64) -> bool {
        if self.state != TimerState::Pending || !secs.is_finite() || secs <= 0.0 {
            return false;
        }
        self.initial_duration = secs;
        true
    }

    /// Text-box flow: parse, apply if allowed, and return the canonical text
    /// of whatever duration is now in effect
    pub fn set_initial_duration_text(&mut self, text: &str) -> String {
        if let Ok(secs) = text.trim().parse::<f64>() {
            self.set_initial_duration(secs);
        }
        format_float_text(self.initial_duration)
    }

    // ─── Persistence ────────────────────────────────────────────────────────

    pub fn to_config(&self) -> TimerConfig {
        TimerConfig {
            name: self.name.clone(),
            kind: self.kind,
            state: self.state,
            start_time: self.start,
            stop_time: self.stop,
            initial_duration: self.is_countdown().then_some(self.initial_duration),
            displayed: self.displayed,
        }
    }

    /// Restore a persisted timer. Inconsistent start/stop data falls back to
    /// a pending timer.
    pub fn from_config(config: &TimerConfig) -> Self {
        let mut timer = Self::new(config.name.clone(), config.kind);
        timer.displayed = config.displayed;
        if let Some(secs) = config.initial_duration {
            if !timer.set_initial_duration(secs) {
                tracing::warn!(timer = %config.name, secs, "Ignoring invalid countdown duration");
            }
        }
        match (config.state, config.start_time, config.stop_time) {
            (TimerState::Running, Some(start), _) => {
                timer.start = Some(start);
                timer.state = TimerState::Running;
            }
            (TimerState::Stopped, Some(start), Some(stop)) => {
                timer.start = Some(start);
                timer.stop = Some(stop);
                timer.state = TimerState::Stopped;
            }
            (TimerState::Pending, _, _) => {}
            (state, _, _) => {
                tracing::warn!(timer = %config.name, ?state, "Timer state without times, resetting");
            }
        }
        timer
    }
}
