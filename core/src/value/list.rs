use super::{TypedValue, Value};

/// Fixed-length ordered parameter list
#[derive(Debug, Clone, Default)]
pub struct TypedValueList {
    items: Vec<TypedValue>,
}

impl TypedValueList {
    pub fn new(items: Vec<TypedValue>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TypedValue> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TypedValue> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypedValue> {
        self.items.iter()
    }

    /// Valid when every entry is valid; an empty list is valid
    pub fn is_valid(&self) -> bool {
        self.items.iter().all(TypedValue::is_valid)
    }

    pub fn is_edited(&self) -> bool {
        self.items.iter().any(TypedValue::is_edited)
    }

    /// At least one entry is not locked
    pub fn is_configurable(&self) -> bool {
        self.items.iter().any(TypedValue::is_editable)
    }

    pub fn acknowledge(&mut self) {
        for item in &mut self.items {
            item.acknowledge();
        }
    }

    /// Parsed values in order, or None if any entry is invalid
    pub fn values(&self) -> Option<Vec<Value>> {
        self.items.iter().map(|v| v.value().cloned()).collect()
    }

    pub fn raw_texts(&self) -> Vec<String> {
        self.items.iter().map(|v| v.raw_text().to_string()).collect()
    }

    /// Copy texts positionally up to the shorter of the two lengths.
    /// Locked entries ignore the copy.
    pub fn load_texts<S: AsRef<str>>(&mut self, texts: &[S]) {
        for (item, text) in self.items.iter_mut().zip(texts) {
            item.set_raw_text(text.as_ref());
        }
    }
}

impl FromIterator<TypedValue> for TypedValueList {
    fn from_iter<I: IntoIterator<Item = TypedValue>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
