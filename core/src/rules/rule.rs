use kat_types::RuleConfig;

use crate::action::{ActionContext, ActionList};
use crate::condition::ConditionGroup;
use crate::event::Event;
use crate::scope::BindScope;

/// Event → gating conditions → actions
#[derive(Debug, Default)]
pub struct Rule {
    name: String,
    event: Option<Event>,
    conditions: ConditionGroup,
    actions: ActionList,
}

impl Rule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    // --- Accessors ---

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn event(&self) -> Option<&Event> {
        self.event.as_ref()
    }

    pub fn event_mut(&mut self) -> Option<&mut Event> {
        self.event.as_mut()
    }

    pub fn set_event(&mut self, event: Option<Event>) {
        self.event = event;
    }

    pub fn conditions(&self) -> &ConditionGroup {
        &self.conditions
    }

    pub fn conditions_mut(&mut self) -> &mut ConditionGroup {
        &mut self.conditions
    }

    pub fn actions(&self) -> &ActionList {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut ActionList {
        &mut self.actions
    }

    // --- Evaluation ---

    /// No event or no action slot: nothing is evaluated
    pub fn is_inert(&self) -> bool {
        self.event.is_none() || self.actions.is_empty()
    }

    /// One tick. Returns whether the actions ran.
    pub fn evaluate(&mut self, ctx: &mut ActionContext<'_>) -> bool {
        if self.actions.is_empty() {
            return false;
        }
        let Some(event) = &mut self.event else {
            return false;
        };
        if !event.evaluate(ctx.now) {
            return false;
        }
        if !self.conditions.evaluate(ctx.now) {
            tracing::debug!(rule = %self.name, "Event fired, conditions not met");
            return false;
        }
        let executed = self.actions.execute(ctx);
        tracing::debug!(rule = %self.name, executed, "Rule fired");
        true
    }

    pub fn reset_event(&mut self) {
        if let Some(event) = &mut self.event {
            event.reset();
        }
    }

    /// Event, every configured condition and every action slot valid
    pub fn is_valid(&self) -> bool {
        self.event.as_ref().is_some_and(Event::is_valid)
            && self.conditions.is_valid()
            && self.actions.is_valid()
    }

    /// Listing line: `name: event | conditions | actions`
    pub fn describe(&self) -> String {
        let event = match &self.event {
            Some(event) => event.describe(),
            None => "To be configured".to_string(),
        };
        format!(
            "{}: {} | {} | {}",
            self.name,
            event,
            self.conditions.summary(),
            self.actions.summary()
        )
    }

    pub fn is_edited(&self) -> bool {
        self.event
            .as_ref()
            .is_some_and(|e| e.condition().is_edited())
            || self.conditions.is_edited()
            || self.actions.is_edited()
    }

    pub fn acknowledge(&mut self) {
        if let Some(event) = &mut self.event {
            event.condition_mut().acknowledge();
        }
        self.conditions.acknowledge();
        self.actions.acknowledge();
    }

    pub fn duplicate(&self) -> Self {
        Self {
            name: self.name.clone(),
            event: self.event.as_ref().map(Event::duplicate),
            conditions: self.conditions.duplicate(),
            actions: self.actions.duplicate(),
        }
    }

    // ─── Persistence ────────────────────────────────────────────────────────

    pub fn to_config(&self) -> RuleConfig {
        RuleConfig {
            name: self.name.clone(),
            event: self.event.as_ref().map(Event::to_config),
            conditions: self.conditions.to_config(),
            actions: self.actions.to_config(),
        }
    }

    pub fn from_config(config: &RuleConfig, scope: BindScope<'_>) -> Self {
        Self {
            name: config.name.clone(),
            event: config.event.as_ref().map(|e| Event::from_config(e, scope)),
            conditions: ConditionGroup::from_config(&config.conditions, scope),
            actions: ActionList::from_config(&config.actions, scope),
        }
    }
}
