//! Boundary traits implemented by the host simulation

use std::any::Any;
use std::rc::Rc;

/// What kind of object a capability operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetCategory {
    /// The controlled vehicle as a whole
    Vessel,
    /// One subcomponent of the vehicle
    Part,
    /// Host-global facilities (staging, input). Listed and bound with the
    /// vessel, which is passed as context only.
    Static,
}

impl TargetCategory {
    /// Flight conditions/actions see vessel and static capabilities as one list
    pub(crate) fn namespace(self) -> Namespace {
        match self {
            TargetCategory::Vessel | TargetCategory::Static => Namespace::Flight,
            TargetCategory::Part => Namespace::Part,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Namespace {
    Flight,
    Part,
}

/// A host object capabilities can be bound to
pub trait Target: Any {
    fn category(&self) -> TargetCategory;

    /// Persistent id, for targets that have one (parts)
    fn persistent_id(&self) -> Option<u32> {
        None
    }

    /// Human-readable label for listings
    fn label(&self) -> String;

    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to a host object. Engine types only keep `Weak` copies.
pub type TargetHandle = Rc<dyn Target>;

/// Monotonic simulation clock, in seconds
pub trait Clock {
    fn now(&self) -> f64;
}

/// On-screen message channel
pub trait MessageSink {
    fn post(&mut self, text: &str, duration_secs: f32);
}

/// Resolves persisted target references into live host objects
pub trait TargetResolver {
    fn vessel(&self) -> Option<TargetHandle>;

    fn part(&self, id: u32) -> Option<TargetHandle>;
}

/// Failure reported by a host accessor
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostFault {
    #[error("target does not provide {0}")]
    Missing(&'static str),

    #[error("{capability} rejected: {reason}")]
    Rejected {
        capability: &'static str,
        reason: String,
    },

    #[error("{capability}: argument {index} is not a {expected}")]
    BadArgument {
        capability: &'static str,
        index: usize,
        expected: &'static str,
    },
}

/// Downcast helper for host accessor functions
pub fn downcast<T: 'static>(target: &dyn Target) -> Option<&T> {
    target.as_any().downcast_ref::<T>()
}
