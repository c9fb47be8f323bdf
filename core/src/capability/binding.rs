//! Name + parameters → live accessor on one target

use std::rc::{Rc, Weak};

use super::catalog::{self, Accessor, CapabilityDescriptor, CatalogEntry, ParameterSpec, Role};
use super::host::{HostFault, Target, TargetHandle};
use crate::value::{SemanticType, TypedValueList, Value};

/// Per-target resolution of a capability name.
///
/// The target is held weakly: once the host drops it, the binding reads as
/// unresolved. An unresolved binding still remembers the name, part id and
/// parameter texts it was configured with so they survive a save.
#[derive(Debug)]
pub struct CapabilityBinding {
    role: Role,
    target: Option<Weak<dyn Target>>,
    target_id: Option<u32>,
    name: String,
    entry: Option<&'static CatalogEntry>,
    parameters: TypedValueList,
    unresolved_texts: Vec<String>,
}

impl CapabilityBinding {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            target: None,
            target_id: None,
            name: String::new(),
            entry: None,
            parameters: TypedValueList::default(),
            unresolved_texts: Vec::new(),
        }
    }

    // --- Accessors ---

    pub fn role(&self) -> Role {
        self.role
    }

    /// Live target, if it still exists
    pub fn target(&self) -> Option<TargetHandle> {
        self.target.as_ref().and_then(Weak::upgrade)
    }

    /// Persistent id of the configured target, even if it no longer resolves
    pub fn target_id(&self) -> Option<u32> {
        self.target_id
    }

    /// Configured capability name (possibly unknown to the catalog)
    pub fn capability_name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> Option<&'static CapabilityDescriptor> {
        self.entry.map(CatalogEntry::descriptor)
    }

    pub fn result_type(&self) -> Option<SemanticType> {
        self.descriptor().and_then(|d| d.result_type)
    }

    pub fn parameters(&self) -> &TypedValueList {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut TypedValueList {
        &mut self.parameters
    }

    /// Parameter texts to persist
    pub fn parameter_texts(&self) -> Vec<String> {
        if self.entry.is_some() {
            self.parameters.raw_texts()
        } else {
            self.unresolved_texts.clone()
        }
    }

    // --- Resolution ---

    /// Point the binding at another target. Any change of target discards
    /// the capability and its parameters.
    pub fn set_target(&mut self, target: Option<&TargetHandle>) {
        let unchanged = match (self.target(), target) {
            (Some(current), Some(new)) => Rc::ptr_eq(&current, new),
            (None, None) => self.target.is_none(),
            _ => false,
        };
        if unchanged {
            return;
        }
        self.target = target.map(Rc::downgrade);
        self.target_id = target.and_then(|t| t.persistent_id());
        self.clear_capability();
    }

    fn clear_capability(&mut self) {
        self.name.clear();
        self.entry = None;
        self.parameters = TypedValueList::default();
        self.unresolved_texts.clear();
    }

    /// Resolve `name` against the current target.
    ///
    /// Prior parameter state is discarded. On failure the name is kept and
    /// the binding stays unresolved.
    pub fn bind(&mut self, name: &str) -> bool {
        self.clear_capability();
        self.name = name.to_string();

        let Some(target) = self.target() else {
            return false;
        };
        let Some(catalog) = catalog::global() else {
            tracing::warn!(capability = name, "No capability catalog installed");
            return false;
        };
        match catalog.lookup(target.category(), name) {
            Some(entry)
                if entry.descriptor().kind.role() == self.role && entry.applies_to(&*target) =>
            {
                self.parameters = entry
                    .descriptor()
                    .parameters
                    .iter()
                    .map(ParameterSpec::instantiate)
                    .collect();
                self.entry = Some(entry);
                true
            }
            _ => {
                tracing::debug!(
                    capability = name,
                    target = %target.label(),
                    "Capability not available on target"
                );
                false
            }
        }
    }

    /// Names the current target offers for this binding's role
    pub fn applicable_names(&self) -> Vec<&'static str> {
        match (self.target(), catalog::global()) {
            (Some(target), Some(catalog)) => catalog.applicable_names(&*target, self.role),
            _ => Vec::new(),
        }
    }

    /// Resolved against a live target that still offers the capability
    pub fn is_resolved(&self) -> bool {
        match (self.entry, self.target()) {
            (Some(entry), Some(target)) => entry.applies_to(&*target),
            _ => false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_resolved() && self.parameters.is_valid()
    }

    pub fn is_edited(&self) -> bool {
        self.parameters.is_edited()
    }

    pub fn acknowledge(&mut self) {
        self.parameters.acknowledge();
    }

    // --- Host access ---

    /// Read the live value. `Ok(None)` when invalid or the host has no value.
    pub fn read(&self) -> Result<Option<Value>, HostFault> {
        let Some((entry, target, args)) = self.prepared() else {
            return Ok(None);
        };
        match entry.accessor() {
            Accessor::Read(read) => read(&*target, &args),
            Accessor::Write(_) | Accessor::Invoke(_) => Ok(None),
        }
    }

    /// Write or invoke. Returns whether the host was called.
    pub fn execute(&self) -> Result<bool, HostFault> {
        let Some((entry, target, args)) = self.prepared() else {
            return Ok(false);
        };
        match entry.accessor() {
            Accessor::Write(write) => match args.first() {
                Some(value) => write(&*target, value).map(|_| true),
                None => Ok(false),
            },
            Accessor::Invoke(invoke) => invoke(&*target, &args).map(|_| true),
            Accessor::Read(_) => Ok(false),
        }
    }

    fn prepared(&self) -> Option<(&'static CatalogEntry, TargetHandle, Vec<Value>)> {
        if !self.is_valid() {
            return None;
        }
        Some((self.entry?, self.target()?, self.parameters.values()?))
    }

    // --- Persistence & copies ---

    /// Restore from persisted parts. Parameter texts are copied positionally.
    pub fn load(
        &mut self,
        target: Option<TargetHandle>,
        target_id: Option<u32>,
        name: &str,
        texts: &[String],
    ) {
        self.set_target(target.as_ref());
        if target.is_none() {
            self.target_id = target_id;
        }
        self.restore(name, texts);
    }

    fn restore(&mut self, name: &str, texts: &[String]) {
        if name.is_empty() {
            return;
        }
        if self.bind(name) {
            self.parameters.load_texts(texts);
            self.parameters.acknowledge();
        } else {
            self.unresolved_texts = texts.to_vec();
        }
    }

    /// Independent copy bound to the same target with the same texts
    pub fn duplicate(&self) -> Self {
        let mut copy = Self::new(self.role);
        let target = self.target();
        copy.set_target(target.as_ref());
        copy.target_id = self.target_id;
        copy.restore(&self.name, &self.parameter_texts());
        copy
    }

    /// `Name(p1, p2)` for listings
    pub fn describe(&self) -> String {
        let texts = self.parameter_texts();
        if texts.is_empty() {
            self.name.clone()
        } else {
            format!("{}({})", self.name, texts.join(", "))
        }
    }
}
