use std::cmp::Ordering;
use std::fmt;

use kat_types::Comparator;
use kat_types::formatting::format_float_text;

/// Fixed name → id dictionary backing a value (e.g. resource names)
pub type OptionTable = &'static phf::OrderedMap<&'static str, i64>;

/// Declared type of a value, independent of its current text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    Bool,
    Integer,
    Float,
    Text,
    /// Closed set of symbolic names, indexed by declaration order
    Enum(&'static [&'static str]),
}

impl SemanticType {
    /// Whether values of this type support ordering comparators
    pub fn is_ordered(self) -> bool {
        matches!(self, SemanticType::Integer | SemanticType::Float)
    }

    pub fn label(self) -> &'static str {
        match self {
            SemanticType::Bool => "bool",
            SemanticType::Integer => "integer",
            SemanticType::Float => "float",
            SemanticType::Text => "text",
            SemanticType::Enum(_) => "enum",
        }
    }
}

/// A parsed value, as read from or handed to the host
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Enum { index: usize, name: &'static str },
}

impl Value {
    /// Build an enum value from its symbolic name
    pub fn variant(variants: &'static [&'static str], name: &str) -> Option<Value> {
        variants
            .iter()
            .position(|v| *v == name)
            .map(|index| Value::Enum { index, name: variants[index] })
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<usize> {
        match self {
            Value::Enum { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Equality with integer/float promotion
    pub fn loosely_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Enum { index: a, .. }, Value::Enum { index: b, .. }) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    fn numeric_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            _ => self.as_f64()?.partial_cmp(&other.as_f64()?),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => f.write_str(&format_float_text(*v)),
            Value::Text(s) => f.write_str(s),
            Value::Enum { name, .. } => f.write_str(name),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TypedValue
// ═══════════════════════════════════════════════════════════════════════════

/// A named, typed operand whose authoritative state is its raw text
#[derive(Debug, Clone)]
pub struct TypedValue {
    name: String,
    ty: SemanticType,
    raw: String,
    parsed: Option<Value>,
    options: Option<OptionTable>,
    editable: bool,
    edited: bool,
}

impl TypedValue {
    /// Empty (and therefore invalid) editable value
    pub fn new(name: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            name: name.into(),
            ty,
            raw: String::new(),
            parsed: None,
            options: None,
            editable: true,
            edited: false,
        }
    }

    /// Editable value restricted to the keys of `options`
    pub fn with_options(name: impl Into<String>, ty: SemanticType, options: OptionTable) -> Self {
        Self {
            options: Some(options),
            ..Self::new(name, ty)
        }
    }

    /// Locked value. Always valid, never edited.
    pub fn fixed(name: impl Into<String>, ty: SemanticType, value: Value) -> Self {
        Self {
            raw: value.to_string(),
            parsed: Some(value),
            editable: false,
            ..Self::new(name, ty)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> SemanticType {
        self.ty
    }

    pub fn raw_text(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> Option<&Value> {
        self.parsed.as_ref()
    }

    pub fn options(&self) -> Option<OptionTable> {
        self.options
    }

    pub fn is_valid(&self) -> bool {
        self.parsed.is_some()
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_edited(&self) -> bool {
        self.edited
    }

    /// Clear the edited flag once the change has been taken into account
    pub fn acknowledge(&mut self) {
        self.edited = false;
    }

    /// Replace the raw text and re-parse it.
    ///
    /// Returns false (and changes nothing) when the value is locked or the
    /// text is unchanged.
    pub fn set_raw_text(&mut self, text: &str) -> bool {
        if !self.editable || text == self.raw {
            return false;
        }
        self.raw = text.to_string();
        self.parsed = parse(self.ty, self.options, &self.raw);
        self.edited = true;
        true
    }

    /// Ordering is only offered for plain numbers; dictionary-backed values
    /// are ids, not quantities.
    pub fn is_ordered(&self) -> bool {
        self.ty.is_ordered() && self.options.is_none()
    }

    pub fn comparator_choices(&self) -> &'static [Comparator] {
        if self.is_ordered() {
            &Comparator::ALL
        } else {
            &Comparator::EQUALITY
        }
    }

    pub fn supports(&self, comparator: Comparator) -> bool {
        self.is_ordered() || !comparator.is_ordering()
    }

    /// Evaluate `live <comparator> self`. False whenever this value is invalid.
    pub fn compare(&self, live: &Value, comparator: Comparator) -> bool {
        let Some(target) = &self.parsed else {
            return false;
        };
        match comparator {
            Comparator::Eq => live.loosely_eq(target),
            Comparator::Ne => !live.loosely_eq(target),
            _ if !self.is_ordered() => false,
            ordering => match live.numeric_cmp(target) {
                Some(o) => match ordering {
                    Comparator::Lt => o.is_lt(),
                    Comparator::Le => o.is_le(),
                    Comparator::Gt => o.is_gt(),
                    Comparator::Ge => o.is_ge(),
                    Comparator::Eq | Comparator::Ne => false,
                },
                None => false,
            },
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ─── Parsing ────────────────────────────────────────────────────────────────

fn parse(ty: SemanticType, options: Option<OptionTable>, raw: &str) -> Option<Value> {
    if raw.is_empty() {
        return None;
    }
    if let Some(table) = options {
        let id = table.get(raw)?;
        return Some(match ty {
            SemanticType::Float => Value::Float(*id as f64),
            _ => Value::Int(*id),
        });
    }

    let trimmed = raw.trim();
    match ty {
        SemanticType::Bool => {
            if trimmed.eq_ignore_ascii_case("true") {
                Some(Value::Bool(true))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Some(Value::Bool(false))
            } else {
                None
            }
        }
        SemanticType::Integer => trimmed.parse::<i64>().ok().map(Value::Int),
        SemanticType::Float => trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .map(Value::Float),
        SemanticType::Text => Some(Value::Text(raw.to_string())),
        SemanticType::Enum(variants) => Value::variant(variants, raw).or_else(|| {
            let index = trimmed.parse::<usize>().ok()?;
            variants
                .get(index)
                .map(|name| Value::Enum { index, name: *name })
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SITUATIONS: &[&str] = &["Landed", "Splashed", "Prelaunch", "Flying"];

    static RESOURCES: phf::OrderedMap<&'static str, i64> = phf::phf_ordered_map! {
        "LiquidFuel" => 374,
        "Oxidizer" => 695,
    };

    fn float(raw: &str) -> TypedValue {
        let mut v = TypedValue::new("target", SemanticType::Float);
        v.set_raw_text(raw);
        v
    }

    #[test]
    fn test_float_parses_invariant_text() {
        let v = float("3.5");
        assert!(v.is_valid());
        assert_eq!(v.value(), Some(&Value::Float(3.5)));

        assert!(float(" 1e3 ").is_valid());
        assert!(!float("abc").is_valid());
        assert!(!float("3,5").is_valid());
        assert!(!float("NaN").is_valid());
    }

    #[test]
    fn test_new_value_is_invalid_until_edited() {
        let mut v = TypedValue::new("msg", SemanticType::Text);
        assert!(!v.is_valid());
        assert!(!v.is_edited());

        assert!(v.set_raw_text("hello"));
        assert!(v.is_valid());
        assert!(v.is_edited());

        v.acknowledge();
        assert!(!v.is_edited());
        assert!(!v.set_raw_text("hello"), "unchanged text is a no-op");
        assert!(!v.is_edited());

        v.set_raw_text("");
        assert!(!v.is_valid(), "empty text is never valid");
    }

    #[test]
    fn test_fixed_value_is_locked() {
        let mut v = TypedValue::fixed("state", SemanticType::Bool, Value::Bool(true));
        assert!(v.is_valid());
        assert_eq!(v.raw_text(), "true");
        assert!(!v.set_raw_text("false"));
        assert_eq!(v.value(), Some(&Value::Bool(true)));
        assert!(!v.is_edited());
    }

    #[test]
    fn test_enum_accepts_name_or_ordinal() {
        let mut v = TypedValue::new("situation", SemanticType::Enum(SITUATIONS));
        v.set_raw_text("Flying");
        assert_eq!(v.value().and_then(Value::as_enum), Some(3));

        v.set_raw_text("1");
        assert_eq!(
            v.value(),
            Some(&Value::Enum { index: 1, name: "Splashed" })
        );

        v.set_raw_text("flying");
        assert!(!v.is_valid(), "names are case-sensitive");
        v.set_raw_text("9");
        assert!(!v.is_valid());
    }

    #[test]
    fn test_bool_is_case_insensitive() {
        let mut v = TypedValue::new("on", SemanticType::Bool);
        v.set_raw_text("True");
        assert_eq!(v.value(), Some(&Value::Bool(true)));
        v.set_raw_text("yes");
        assert!(!v.is_valid());
    }

    #[test]
    fn test_options_resolve_by_key() {
        let mut v = TypedValue::with_options("resource", SemanticType::Integer, &RESOURCES);
        v.set_raw_text("Oxidizer");
        assert_eq!(v.value(), Some(&Value::Int(695)));

        v.set_raw_text("695");
        assert!(!v.is_valid(), "only dictionary keys are accepted");
        assert_eq!(v.comparator_choices(), &Comparator::EQUALITY);
    }

    #[test]
    fn test_comparator_choices_by_type() {
        assert_eq!(float("1").comparator_choices().len(), 6);
        let text = TypedValue::new("t", SemanticType::Text);
        assert_eq!(text.comparator_choices(), &Comparator::EQUALITY);
        let en = TypedValue::new("e", SemanticType::Enum(SITUATIONS));
        assert!(!en.supports(Comparator::Gt));
        assert!(en.supports(Comparator::Ne));
    }

    #[test]
    fn test_compare_is_live_op_target() {
        let target = float("10000");
        assert!(target.compare(&Value::Float(10500.0), Comparator::Gt));
        assert!(!target.compare(&Value::Float(9500.0), Comparator::Gt));
        assert!(target.compare(&Value::Float(9500.0), Comparator::Lt));
        assert!(target.compare(&Value::Float(10000.0), Comparator::Ge));
        assert!(target.compare(&Value::Int(10000), Comparator::Eq));
        assert!(target.compare(&Value::Int(3), Comparator::Ne));
    }

    #[test]
    fn test_compare_unordered_rejects_ordering() {
        let mut v = TypedValue::new("on", SemanticType::Bool);
        v.set_raw_text("true");
        assert!(v.compare(&Value::Bool(true), Comparator::Eq));
        assert!(!v.compare(&Value::Bool(true), Comparator::Ge));
        assert!(v.compare(&Value::Bool(false), Comparator::Ne));
    }

    #[test]
    fn test_compare_invalid_target_is_false() {
        let target = float("oops");
        assert!(!target.compare(&Value::Float(1.0), Comparator::Eq));
        assert!(!target.compare(&Value::Float(1.0), Comparator::Ne));
    }
}
