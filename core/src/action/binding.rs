use crate::capability::{CapabilityBinding, HostFault, Role, TargetHandle};
use crate::value::TypedValueList;

/// Property write or method invocation on a vessel or part
#[derive(Debug)]
pub struct BindingAction {
    binding: CapabilityBinding,
    edited: bool,
}

impl Default for BindingAction {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingAction {
    pub fn new() -> Self {
        Self {
            binding: CapabilityBinding::new(Role::Action),
            edited: true,
        }
    }

    pub fn binding(&self) -> &CapabilityBinding {
        &self.binding
    }

    pub fn parameters_mut(&mut self) -> &mut TypedValueList {
        self.binding.parameters_mut()
    }

    pub fn target_object(&self) -> Option<TargetHandle> {
        self.binding.target()
    }

    pub fn part_id(&self) -> Option<u32> {
        self.binding.target_id()
    }

    pub fn action_name(&self) -> &str {
        self.binding.capability_name()
    }

    pub fn set_target_object(&mut self, target: Option<&TargetHandle>) {
        self.binding.set_target(target);
        self.edited = true;
    }

    pub fn applicable_actions(&self) -> Vec<&'static str> {
        self.binding.applicable_names()
    }

    pub fn set_action(&mut self, name: &str) -> bool {
        self.edited = true;
        self.binding.bind(name)
    }

    pub fn is_valid(&self) -> bool {
        self.binding.is_valid()
    }

    pub fn execute(&self) -> Result<bool, HostFault> {
        self.binding.execute()
    }

    pub fn is_edited(&self) -> bool {
        self.edited || self.binding.is_edited()
    }

    pub fn acknowledge(&mut self) {
        self.edited = false;
        self.binding.acknowledge();
    }

    pub fn describe(&self) -> String {
        if self.is_valid() {
            self.binding.describe()
        } else {
            "invalid".to_string()
        }
    }

    pub fn load(
        &mut self,
        object: Option<TargetHandle>,
        part_id: Option<u32>,
        action: &str,
        parameters: &[String],
    ) {
        self.binding.load(object, part_id, action, parameters);
        self.acknowledge();
    }

    pub fn duplicate(&self) -> Self {
        Self {
            binding: self.binding.duplicate(),
            edited: false,
        }
    }
}
