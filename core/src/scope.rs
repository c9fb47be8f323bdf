use crate::capability::TargetResolver;
use crate::timers::TimerRegistry;

/// What persisted references are resolved against when a rule set is loaded
/// or a rule is edited: the live host objects and the rule set's timers
#[derive(Clone, Copy)]
pub struct BindScope<'a> {
    pub resolver: &'a dyn TargetResolver,
    pub timers: &'a TimerRegistry,
}

impl<'a> BindScope<'a> {
    pub fn new(resolver: &'a dyn TargetResolver, timers: &'a TimerRegistry) -> Self {
        Self { resolver, timers }
    }
}
