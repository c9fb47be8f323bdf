//! Capability discovery and binding
//!
//! The host registers what it can read and do once, in a [`CapabilityCatalog`].
//! Conditions and actions then hold a [`CapabilityBinding`]: a name resolved
//! against one concrete target, plus the typed parameters the user filled in.
//!
//! ```text
//!   CatalogBuilder ──build──► CapabilityCatalog ──install──► global()
//!                                                              │
//!   CapabilityBinding { target: Weak<dyn Target>, name } ──lookup──┘
//!          │
//!          ├── read()    → ReadFn(target, params)   (conditions)
//!          └── execute() → WriteFn / InvokeFn       (actions)
//! ```

mod binding;
pub mod catalog;
mod host;

pub use binding::CapabilityBinding;
pub use catalog::{
    Accessor, CapabilityCatalog, CapabilityDescriptor, CapabilityKind, CatalogBuilder,
    CatalogEntry, CatalogError, ParameterSpec, Role,
};
pub use host::{
    Clock, HostFault, MessageSink, Target, TargetCategory, TargetHandle, TargetResolver, downcast,
};
