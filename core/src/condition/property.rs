use kat_types::Comparator;

use crate::capability::{CapabilityBinding, Role, TargetHandle};
use crate::value::{TypedValue, TypedValueList, Value};

/// `live_property <comparator> target` on one vessel or part
#[derive(Debug)]
pub struct PropertyCondition {
    binding: CapabilityBinding,
    comparator: Comparator,
    /// Typed from the property's result type once it resolves
    target: Option<TypedValue>,
    /// Target text kept while the property is unresolved
    unresolved_target: String,
    last_value: Option<Value>,
    edited: bool,
}

impl Default for PropertyCondition {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyCondition {
    pub fn new() -> Self {
        Self {
            binding: CapabilityBinding::new(Role::Condition),
            comparator: Comparator::Eq,
            target: None,
            unresolved_target: String::new(),
            last_value: None,
            edited: true,
        }
    }

    // --- Accessors ---

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

    pub fn property(&self) -> &str {
        self.binding.capability_name()
    }

    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    pub fn target_value(&self) -> Option<&TypedValue> {
        self.target.as_ref()
    }

    pub fn target_text(&self) -> &str {
        match &self.target {
            Some(target) => target.raw_text(),
            None => &self.unresolved_target,
        }
    }

    /// Value read during the last evaluation
    pub fn last_value(&self) -> Option<&Value> {
        self.last_value.as_ref()
    }

    // --- Editing ---

    /// Changing the object clears the property and target
    pub fn set_target_object(&mut self, target: Option<&TargetHandle>) {
        self.binding.set_target(target);
        if self.binding.capability_name().is_empty() {
            self.target = None;
            self.unresolved_target.clear();
            self.last_value = None;
        }
        self.edited = true;
    }

    /// Properties the current object offers
    pub fn applicable_properties(&self) -> Vec<&'static str> {
        self.binding.applicable_names()
    }

    /// Select a property. The target value is rebuilt for the property's
    /// result type and starts empty.
    pub fn set_property(&mut self, name: &str) -> bool {
        let bound = self.binding.bind(name);
        self.target = self
            .binding
            .result_type()
            .map(|ty| TypedValue::new("target", ty));
        self.unresolved_target.clear();
        self.last_value = None;
        self.set_comparator(self.comparator);
        self.edited = true;
        bound
    }

    pub fn comparator_choices(&self) -> &'static [Comparator] {
        match &self.target {
            Some(target) => target.comparator_choices(),
            None => &Comparator::EQUALITY,
        }
    }

    /// Unsupported comparators fall back to `Eq`
    pub fn set_comparator(&mut self, comparator: Comparator) {
        self.comparator = match &self.target {
            Some(target) if !target.supports(comparator) => Comparator::Eq,
            _ => comparator,
        };
        self.edited = true;
    }

    pub fn set_target_text(&mut self, text: &str) -> bool {
        match &mut self.target {
            Some(target) => target.set_raw_text(text),
            None => {
                self.unresolved_target = text.to_string();
                self.edited = true;
                true
            }
        }
    }

    // --- Evaluation ---

    pub fn is_valid(&self) -> bool {
        self.binding.is_valid()
            && self
                .target
                .as_ref()
                .is_some_and(|t| t.is_valid() && t.supports(self.comparator))
    }

    /// Read the property and compare. Invalid configurations, missing values
    /// and host faults are all false.
    pub fn evaluate(&mut self) -> bool {
        if !self.is_valid() {
            return false;
        }
        let live = match self.binding.read() {
            Ok(value) => value,
            Err(fault) => {
                tracing::warn!(property = %self.property(), error = %fault, "Property read failed");
                None
            }
        };
        let result = match (&live, &self.target) {
            (Some(live), Some(target)) => target.compare(live, self.comparator),
            _ => false,
        };
        self.last_value = live;
        result
    }

    pub fn is_edited(&self) -> bool {
        self.edited
            || self.binding.is_edited()
            || self.target.as_ref().is_some_and(TypedValue::is_edited)
    }

    pub fn acknowledge(&mut self) {
        self.edited = false;
        self.binding.acknowledge();
        if let Some(target) = &mut self.target {
            target.acknowledge();
        }
    }

    /// `Altitude > 10000`, or `invalid`
    pub fn describe(&self) -> String {
        if !self.is_valid() {
            return "invalid".to_string();
        }
        format!(
            "{} {} {}",
            self.binding.describe(),
            self.comparator.symbol(),
            self.target_text()
        )
    }

    // --- Persistence & copies ---

    /// Restore persisted parts. An unresolvable property keeps its texts.
    pub fn load(
        &mut self,
        object: Option<TargetHandle>,
        part_id: Option<u32>,
        property: &str,
        comparator: Comparator,
        target_text: &str,
        parameters: &[String],
    ) {
        self.binding.load(object, part_id, property, parameters);
        self.target = self
            .binding
            .result_type()
            .map(|ty| TypedValue::new("target", ty));
        self.comparator = comparator;
        match &mut self.target {
            Some(target) => {
                target.set_raw_text(target_text);
                if !target.supports(comparator) {
                    tracing::warn!(property, ?comparator, "Comparator not supported, using Eq");
                    self.comparator = Comparator::Eq;
                }
            }
            None => self.unresolved_target = target_text.to_string(),
        }
        self.acknowledge();
    }

    pub fn duplicate(&self) -> Self {
        let mut copy = Self {
            binding: self.binding.duplicate(),
            comparator: self.comparator,
            target: self.target.clone(),
            unresolved_target: self.unresolved_target.clone(),
            last_value: None,
            edited: false,
        };
        copy.acknowledge();
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimFlight, install_catalog};

    fn flight() -> SimFlight {
        install_catalog().unwrap();
        SimFlight::sample()
    }

    fn altitude_above(flight: &SimFlight, target: &str) -> PropertyCondition {
        let mut c = PropertyCondition::new();
        c.set_target_object(Some(&flight.vessel_handle()));
        assert!(c.set_property("Altitude"));
        c.set_comparator(Comparator::Gt);
        c.set_target_text(target);
        c
    }

    #[test]
    fn test_altitude_comparison() {
        let flight = flight();
        let mut c = altitude_above(&flight, "10000");
        assert!(c.is_valid());

        flight.vessel().set_telemetry("Altitude", 9500.0);
        assert!(!c.evaluate());
        flight.vessel().set_telemetry("Altitude", 10500.0);
        assert!(c.evaluate());
        assert_eq!(c.last_value(), Some(&Value::Float(10500.0)));
        assert_eq!(c.describe(), "Altitude > 10000");
    }

    #[test]
    fn test_unparseable_target_is_invalid_and_false() {
        let flight = flight();
        let mut c = altitude_above(&flight, "abc");
        flight.vessel().set_telemetry("Altitude", 1e9);
        assert!(!c.is_valid());
        assert!(!c.evaluate());
        assert_eq!(c.describe(), "invalid");
    }

    #[test]
    fn test_ordering_falls_back_for_unordered_types() {
        let flight = flight();
        let mut c = PropertyCondition::new();
        c.set_target_object(Some(&flight.vessel_handle()));
        c.set_property("Situation");
        assert_eq!(c.comparator_choices(), &Comparator::EQUALITY);

        c.set_comparator(Comparator::Gt);
        assert_eq!(c.comparator(), Comparator::Eq);
    }

    #[test]
    fn test_new_property_resets_target() {
        let flight = flight();
        let mut c = altitude_above(&flight, "10000");
        c.set_property("VerticalSpeed");
        assert_eq!(c.target_text(), "");
        assert_eq!(c.comparator(), Comparator::Gt);
        assert!(!c.is_valid());
    }

    #[test]
    fn test_changing_object_clears_property() {
        let flight = flight();
        let mut c = PropertyCondition::new();
        c.set_target_object(flight.part_handle(2).as_ref());
        c.set_property("Ignited");
        c.set_target_object(flight.part_handle(4).as_ref());
        assert_eq!(c.property(), "");
        assert!(c.target_value().is_none());
    }

    #[test]
    fn test_load_unresolved_keeps_texts() {
        let flight = flight();
        let mut c = PropertyCondition::new();
        c.load(flight.part_handle(99), Some(99), "Temperature", Comparator::Ge, "900", &[]);
        assert!(!c.is_valid());
        assert_eq!(c.part_id(), Some(99));
        assert_eq!(c.property(), "Temperature");
        assert_eq!(c.comparator(), Comparator::Ge);
        assert_eq!(c.target_text(), "900");
        assert!(!c.is_edited());
    }

    #[test]
    fn test_duplicate_is_independent() {
        let flight = flight();
        let c = altitude_above(&flight, "10000");
        let mut copy = c.duplicate();
        assert!(copy.is_valid());
        assert!(!copy.is_edited());
        copy.set_target_text("20000");
        assert_eq!(c.target_text(), "10000");
    }

    #[test]
    fn test_host_fault_reads_false() {
        let flight = flight();
        let mut c = PropertyCondition::new();
        c.set_target_object(Some(&flight.vessel_handle()));
        c.set_property("ResourceAmount");
        c.parameters_mut().load_texts(&["LiquidFuel"]);
        c.set_comparator(Comparator::Lt);
        c.set_target_text("100");
        assert!(c.is_valid());

        flight.vessel().fail_reads(true);
        assert!(!c.evaluate());
        assert_eq!(c.last_value(), None);
    }
}
