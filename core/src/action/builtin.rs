use std::cell::RefCell;
use std::rc::{Rc, Weak};

use kat_types::TimerCommand;

use crate::timers::{Timer, TimerHandle, TimerRegistry};

/// On-screen message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageAction {
    pub text: String,
    /// Falls back to the engine default when unset
    pub duration_secs: Option<f32>,
}

impl MessageAction {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            duration_secs: None,
        }
    }

    pub fn describe(&self) -> String {
        format!("Message \"{}\"", self.text)
    }
}

/// Start, stop or reset a named timer
#[derive(Debug, Clone)]
pub struct TimerAction {
    timer_name: String,
    timer: Weak<RefCell<Timer>>,
    command: TimerCommand,
}

impl Default for TimerAction {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerAction {
    pub fn new() -> Self {
        Self {
            timer_name: String::new(),
            timer: Weak::new(),
            command: TimerCommand::Start,
        }
    }

    pub fn timer_name(&self) -> &str {
        &self.timer_name
    }

    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer.upgrade()
    }

    pub fn command(&self) -> TimerCommand {
        self.command
    }

    pub fn set_timer(&mut self, name: &str, timers: &TimerRegistry) {
        self.timer_name = name.to_string();
        self.timer = timers
            .get(name)
            .map(|t| Rc::downgrade(&t))
            .unwrap_or_default();
    }

    pub fn set_command(&mut self, command: TimerCommand) {
        self.command = command;
    }

    pub fn is_valid(&self) -> bool {
        self.timer().is_some()
    }

    /// Returns whether the timer still exists
    pub fn execute(&self, now: f64) -> bool {
        match self.timer() {
            Some(timer) => {
                timer.borrow_mut().apply(self.command, now);
                true
            }
            None => false,
        }
    }

    pub fn describe(&self) -> String {
        if !self.is_valid() {
            return "invalid".to_string();
        }
        let verb = match self.command {
            TimerCommand::Start => "Start",
            TimerCommand::Stop => "Stop",
            TimerCommand::Reset => "Reset",
        };
        format!("{} {}", verb, self.timer_name)
    }
}
