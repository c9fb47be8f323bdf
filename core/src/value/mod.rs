//! Typed values edited as text
//!
//! Every user-facing operand in a rule (a condition's target, an action's
//! parameters) is a [`TypedValue`]: the raw text the user typed is the
//! authoritative state, and the parsed [`Value`] exists only while that text
//! is valid for the declared [`SemanticType`].
//!
//! ```text
//!   raw text "10000" ──parse(Float)──► Some(Value::Float(10000.0))   valid
//!   raw text "abc"   ──parse(Float)──► None                          invalid
//! ```

mod list;
mod typed;

pub use list::TypedValueList;
pub use typed::{OptionTable, SemanticType, TypedValue, Value};
