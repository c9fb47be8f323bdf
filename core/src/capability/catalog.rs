//! Process-wide capability registry
//!
//! The host describes every property and action it exposes once, at startup,
//! as a descriptor plus a plain function pointer. After installation the
//! catalog is immutable and shared by every binding in the process.

use std::sync::OnceLock;

use hashbrown::HashMap;

use super::host::{HostFault, Namespace, Target, TargetCategory};
use crate::value::{OptionTable, SemanticType, TypedValue, Value};

/// Whether `target` currently offers the facet behind a capability
pub type PresentFn = fn(&dyn Target) -> bool;
pub type ReadFn = fn(&dyn Target, &[Value]) -> Result<Option<Value>, HostFault>;
pub type WriteFn = fn(&dyn Target, &Value) -> Result<(), HostFault>;
pub type InvokeFn = fn(&dyn Target, &[Value]) -> Result<(), HostFault>;

static CATALOG: OnceLock<CapabilityCatalog> = OnceLock::new();

// ═══════════════════════════════════════════════════════════════════════════
// Descriptors
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    ReadableProperty,
    WritableProperty,
    InvokableAction,
}

/// Which side of a rule a capability can appear on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Condition,
    Action,
}

impl CapabilityKind {
    pub fn role(self) -> Role {
        match self {
            CapabilityKind::ReadableProperty => Role::Condition,
            CapabilityKind::WritableProperty | CapabilityKind::InvokableAction => Role::Action,
        }
    }
}

/// One declared parameter of a capability
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub ty: SemanticType,
    pub options: Option<OptionTable>,
    /// Pre-filled and locked
    pub fixed: Option<Value>,
}

impl ParameterSpec {
    pub fn new(name: &'static str, ty: SemanticType) -> Self {
        Self {
            name,
            ty,
            options: None,
            fixed: None,
        }
    }

    pub fn with_options(mut self, options: OptionTable) -> Self {
        self.options = Some(options);
        self
    }

    pub fn fixed(mut self, value: Value) -> Self {
        self.fixed = Some(value);
        self
    }

    /// Fresh value for a new binding
    pub fn instantiate(&self) -> TypedValue {
        match (&self.fixed, self.options) {
            (Some(value), _) => TypedValue::fixed(self.name, self.ty, value.clone()),
            (None, Some(table)) => TypedValue::with_options(self.name, self.ty, table),
            (None, None) => TypedValue::new(self.name, self.ty),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CapabilityDescriptor {
    pub name: &'static str,
    pub kind: CapabilityKind,
    pub category: TargetCategory,
    pub parameters: Vec<ParameterSpec>,
    /// Readable properties only
    pub result_type: Option<SemanticType>,
}

#[derive(Debug, Clone, Copy)]
pub enum Accessor {
    Read(ReadFn),
    Write(WriteFn),
    Invoke(InvokeFn),
}

/// Descriptor plus the host functions behind it
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    descriptor: CapabilityDescriptor,
    present: PresentFn,
    accessor: Accessor,
}

impl CatalogEntry {
    pub fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn accessor(&self) -> Accessor {
        self.accessor
    }

    /// Category-compatible and the facet exists on this instance
    pub fn applies_to(&self, target: &dyn Target) -> bool {
        self.descriptor.category.namespace() == target.category().namespace()
            && (self.present)(target)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Catalog
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("capability catalog is already installed")]
    AlreadyInstalled,

    #[error("duplicate {category:?} capability {name:?}")]
    DuplicateName {
        category: TargetCategory,
        name: &'static str,
    },
}

#[derive(Debug, Default)]
pub struct CapabilityCatalog {
    entries: Vec<CatalogEntry>,
    flight_index: HashMap<&'static str, usize>,
    part_index: HashMap<&'static str, usize>,
}

impl CapabilityCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in declaration order
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Vessel and static capabilities share one name space
    pub fn lookup(&self, category: TargetCategory, name: &str) -> Option<&CatalogEntry> {
        let index = match category.namespace() {
            Namespace::Flight => &self.flight_index,
            Namespace::Part => &self.part_index,
        };
        index.get(name).map(|&i| &self.entries[i])
    }

    /// Names usable on `target` for `role`, in declaration order
    pub fn applicable_names(&self, target: &dyn Target, role: Role) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.kind.role() == role && e.applies_to(target))
            .map(CatalogEntry::name)
            .collect()
    }
}

/// Accumulates host declarations, then validates them into a catalog
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    entries: Vec<CatalogEntry>,
}

impl CatalogBuilder {
    pub fn readable(
        mut self,
        category: TargetCategory,
        name: &'static str,
        result_type: SemanticType,
        parameters: Vec<ParameterSpec>,
        present: PresentFn,
        read: ReadFn,
    ) -> Self {
        self.entries.push(CatalogEntry {
            descriptor: CapabilityDescriptor {
                name,
                kind: CapabilityKind::ReadableProperty,
                category,
                parameters,
                result_type: Some(result_type),
            },
            present,
            accessor: Accessor::Read(read),
        });
        self
    }

    pub fn writable(
        mut self,
        category: TargetCategory,
        name: &'static str,
        parameter: ParameterSpec,
        present: PresentFn,
        write: WriteFn,
    ) -> Self {
        self.entries.push(CatalogEntry {
            descriptor: CapabilityDescriptor {
                name,
                kind: CapabilityKind::WritableProperty,
                category,
                parameters: vec![parameter],
                result_type: None,
            },
            present,
            accessor: Accessor::Write(write),
        });
        self
    }

    pub fn invokable(
        mut self,
        category: TargetCategory,
        name: &'static str,
        parameters: Vec<ParameterSpec>,
        present: PresentFn,
        invoke: InvokeFn,
    ) -> Self {
        self.entries.push(CatalogEntry {
            descriptor: CapabilityDescriptor {
                name,
                kind: CapabilityKind::InvokableAction,
                category,
                parameters,
                result_type: None,
            },
            present,
            accessor: Accessor::Invoke(invoke),
        });
        self
    }

    pub fn build(self) -> Result<CapabilityCatalog, CatalogError> {
        let mut catalog = CapabilityCatalog::default();
        for (i, entry) in self.entries.iter().enumerate() {
            let category = entry.descriptor.category;
            let index = match category.namespace() {
                Namespace::Flight => &mut catalog.flight_index,
                Namespace::Part => &mut catalog.part_index,
            };
            if index.insert(entry.name(), i).is_some() {
                return Err(CatalogError::DuplicateName {
                    category,
                    name: entry.name(),
                });
            }
        }
        catalog.entries = self.entries;
        Ok(catalog)
    }
}

// ─── Process-wide installation ──────────────────────────────────────────────

/// Install the catalog. Fails if one is already installed.
pub fn install(catalog: CapabilityCatalog) -> Result<&'static CapabilityCatalog, CatalogError> {
    CATALOG
        .set(catalog)
        .map_err(|_| CatalogError::AlreadyInstalled)?;
    tracing::debug!("Installed capability catalog");
    Ok(CATALOG.get_or_init(CapabilityCatalog::default))
}

/// Install the catalog produced by `build` unless one is already present
pub fn install_with<F>(build: F) -> Result<&'static CapabilityCatalog, CatalogError>
where
    F: FnOnce() -> Result<CapabilityCatalog, CatalogError>,
{
    if let Some(existing) = CATALOG.get() {
        return Ok(existing);
    }
    let catalog = build()?;
    // A concurrent installer may have won; the first catalog stays
    if CATALOG.set(catalog).is_ok() {
        tracing::debug!("Installed capability catalog");
    }
    Ok(CATALOG.get_or_init(CapabilityCatalog::default))
}

/// The installed catalog, if any
pub fn global() -> Option<&'static CapabilityCatalog> {
    CATALOG.get()
}
