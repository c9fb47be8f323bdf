use kat_types::ActionConfig;

use super::{Action, ActionContext};
use crate::scope::BindScope;

/// Ordered action slots; unconfigured slots are `None`
#[derive(Debug, Default)]
pub struct ActionList {
    actions: Vec<Option<Action>>,
}

impl ActionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn configured(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter().flatten()
    }

    pub fn get(&self, index: usize) -> Option<&Action> {
        self.actions.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Action> {
        self.actions.get_mut(index).and_then(Option::as_mut)
    }

    pub fn add_slot(&mut self) -> usize {
        self.actions.push(None);
        self.actions.len() - 1
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(Some(action));
    }

    pub fn set(&mut self, index: usize, action: Action) -> bool {
        match self.actions.get_mut(index) {
            Some(slot) => {
                *slot = Some(action);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Action> {
        if index < self.actions.len() {
            self.actions.remove(index)
        } else {
            None
        }
    }

    /// Run every configured action in order. A failing action does not stop
    /// the ones after it. Returns how many actions did something.
    pub fn execute(&self, ctx: &mut ActionContext<'_>) -> usize {
        self.configured().filter(|a| a.execute(ctx)).count()
    }

    /// Non-empty, every slot configured and valid
    pub fn is_valid(&self) -> bool {
        !self.actions.is_empty()
            && self
                .actions
                .iter()
                .all(|a| a.as_ref().is_some_and(Action::is_valid))
    }

    fn invalid_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| !a.as_ref().is_some_and(Action::is_valid))
            .count()
    }

    /// `To be configured` / `N action(s)` / `K invalid action(s) out of N`
    pub fn summary(&self) -> String {
        let total = self.actions.len();
        match (total, self.invalid_count()) {
            (0, _) => "To be configured".to_string(),
            (n, 0) => format!("{n} action(s)"),
            (n, k) => format!("{k} invalid action(s) out of {n}"),
        }
    }

    pub fn is_edited(&self) -> bool {
        self.configured().any(Action::is_edited)
    }

    pub fn acknowledge(&mut self) {
        for action in self.actions.iter_mut().flatten() {
            action.acknowledge();
        }
    }

    pub fn duplicate(&self) -> Self {
        Self {
            actions: self
                .actions
                .iter()
                .map(|slot| slot.as_ref().map(Action::duplicate))
                .collect(),
        }
    }

    pub fn to_config(&self) -> Vec<ActionConfig> {
        self.configured().map(Action::to_config).collect()
    }

    pub fn from_config(configs: &[ActionConfig], scope: BindScope<'_>) -> Self {
        Self {
            actions: configs
                .iter()
                .map(|c| Some(Action::from_config(c, scope)))
                .collect(),
        }
    }
}
