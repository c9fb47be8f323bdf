use serde::{Deserialize, Serialize};

/// Lifecycle of a timer or countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    #[default]
    Pending,
    Running,
    Stopped,
}

/// Counts up (timer) or down from an initial duration (countdown)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    #[default]
    Timer,
    Countdown,
}

impl TimerKind {
    /// One-letter tag used in compact listings
    pub fn tag(self) -> &'static str {
        match self {
            TimerKind::Timer => "T",
            TimerKind::Countdown => "C",
        }
    }
}

/// Command issued by a timer action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerCommand {
    #[default]
    Start,
    Stop,
    Reset,
}

/// Persisted timer. Start/stop times are simulation seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub name: String,

    #[serde(default)]
    pub kind: TimerKind,

    #[serde(default)]
    pub state: TimerState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_time: Option<f64>,

    /// Countdowns only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_duration: Option<f64>,

    /// Shown in the on-screen timer panel
    #[serde(default)]
    pub displayed: bool,
}

impl TimerConfig {
    pub fn new(name: impl Into<String>, kind: TimerKind) -> Self {
        Self {
            name: name.into(),
            kind,
            state: TimerState::Pending,
            start_time: None,
            stop_time: None,
            initial_duration: None,
            displayed: false,
        }
    }
}
