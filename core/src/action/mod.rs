//! What a rule does once it fires

mod binding;
mod builtin;
mod list;

pub use binding::BindingAction;
pub use builtin::{MessageAction, TimerAction};
pub use list::ActionList;

use kat_types::ActionConfig;

use crate::capability::MessageSink;
use crate::scope::BindScope;

/// Per-tick inputs an action may need
pub struct ActionContext<'a> {
    pub now: f64,
    pub messages: &'a mut dyn MessageSink,
    /// Used by messages without their own duration
    pub message_duration_secs: f32,
}

#[derive(Debug)]
pub enum Action {
    Flight(BindingAction),
    Part(BindingAction),
    Message(MessageAction),
    Timer(TimerAction),
}

impl Action {
    /// Fresh flight action bound to the current vessel
    pub fn flight(scope: BindScope<'_>) -> Self {
        let mut action = BindingAction::new();
        action.set_target_object(scope.resolver.vessel().as_ref());
        Action::Flight(action)
    }

    pub fn part() -> Self {
        Action::Part(BindingAction::new())
    }

    pub fn message(text: impl Into<String>) -> Self {
        Action::Message(MessageAction::new(text))
    }

    pub fn timer() -> Self {
        Action::Timer(TimerAction::new())
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Action::Flight(_) => "Flight",
            Action::Part(_) => "Part",
            Action::Message(_) => "Message",
            Action::Timer(_) => "Timer",
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Action::Flight(a) | Action::Part(a) => a.is_valid(),
            Action::Message(_) => true,
            Action::Timer(a) => a.is_valid(),
        }
    }

    /// Run the action. Invalid actions do nothing; host faults are logged.
    /// Returns whether anything happened.
    pub fn execute(&self, ctx: &mut ActionContext<'_>) -> bool {
        match self {
            Action::Flight(a) | Action::Part(a) => match a.execute() {
                Ok(done) => done,
                Err(fault) => {
                    tracing::warn!(action = %a.action_name(), error = %fault, "Action failed");
                    false
                }
            },
            Action::Message(m) => {
                let secs = m.duration_secs.unwrap_or(ctx.message_duration_secs);
                ctx.messages.post(&m.text, secs);
                true
            }
            Action::Timer(t) => t.execute(ctx.now),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Action::Flight(a) | Action::Part(a) => a.describe(),
            Action::Message(m) => m.describe(),
            Action::Timer(t) => t.describe(),
        }
    }

    pub fn is_edited(&self) -> bool {
        match self {
            Action::Flight(a) | Action::Part(a) => a.is_edited(),
            Action::Message(_) | Action::Timer(_) => false,
        }
    }

    pub fn acknowledge(&mut self) {
        if let Action::Flight(a) | Action::Part(a) = self {
            a.acknowledge();
        }
    }

    pub fn duplicate(&self) -> Self {
        match self {
            Action::Flight(a) => Action::Flight(a.duplicate()),
            Action::Part(a) => Action::Part(a.duplicate()),
            Action::Message(m) => Action::Message(m.clone()),
            Action::Timer(t) => Action::Timer(t.clone()),
        }
    }

    // ─── Persistence ────────────────────────────────────────────────────────

    pub fn to_config(&self) -> ActionConfig {
        match self {
            Action::Flight(a) => ActionConfig::Flight {
                action: a.action_name().to_string(),
                parameters: a.binding().parameter_texts(),
            },
            Action::Part(a) => ActionConfig::Part {
                part_id: a.part_id(),
                action: a.action_name().to_string(),
                parameters: a.binding().parameter_texts(),
            },
            Action::Message(m) => ActionConfig::Message {
                text: m.text.clone(),
                duration_secs: m.duration_secs,
            },
            Action::Timer(t) => ActionConfig::Timer {
                timer: t.timer_name().to_string(),
                command: t.command(),
            },
        }
    }

    pub fn from_config(config: &ActionConfig, scope: BindScope<'_>) -> Self {
        match config {
            ActionConfig::Flight { action, parameters } => {
                let mut a = BindingAction::new();
                a.load(scope.resolver.vessel(), None, action, parameters);
                Action::Flight(a)
            }
            ActionConfig::Part {
                part_id,
                action,
                parameters,
            } => {
                let part = part_id.and_then(|id| scope.resolver.part(id));
                if part.is_none() && part_id.is_some() {
                    tracing::warn!(part_id = ?part_id, action = %action, "Action part not found");
                }
                let mut a = BindingAction::new();
                a.load(part, *part_id, action, parameters);
                Action::Part(a)
            }
            ActionConfig::Message {
                text,
                duration_secs,
            } => Action::Message(MessageAction {
                text: text.clone(),
                duration_secs: *duration_secs,
            }),
            ActionConfig::Timer { timer, command } => {
                let mut t = TimerAction::new();
                t.set_timer(timer, scope.timers);
                t.set_command(*command);
                if !t.is_valid() {
                    tracing::warn!(timer = %timer, "Timer action refers to a missing timer");
                }
                Action::Timer(t)
            }
        }
    }
}
