//! Sondear: Structural Assertions over Dynamic Values
//!
//! Sondear (Spanish: "to probe/sound out") is a test-support library for
//! asserting over arbitrary dynamic value graphs: structural deep equality
//! with cycle-safe memoization, bounded human-readable inspection, and
//! line-diff failure messages.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    SONDEAR Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Value      │    │ Comparator │    │ Inspector  │            │
//! │   │ graph      │───►│ (deep eq,  │    │ (bounded   │            │
//! │   │ (cyclic)   │    │  memoized) │    │  render)   │            │
//! │   └────────────┘    └─────┬──────┘    └─────┬──────┘            │
//! │                           │                 │                    │
//! │                     ┌─────▼─────────────────▼─────┐             │
//! │                     │ Assertions + line diffs     │             │
//! │                     └─────────────────────────────┘             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

/// Assertion predicates and [`AssertionError`].
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod assert;
mod comparison;
/// Line-based diff rendering for assertion failures.
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod diff;
/// Bounded value inspection.
pub mod inspect;
/// The dynamic value model.
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn
)]
pub mod value;

pub use assert::{AssertResult, AssertionError, ErrorMatcher, Operator};
pub use comparison::{is_deep_equal, is_deep_strict_equal};
pub use diff::{create_err_diff, create_err_diff_with_colors, inspect_operand};
pub use inspect::{
    inspect, inspect_with, Compact, GetterPolicy, InspectOptions, KeyComparator, KeySort,
};
pub use value::{
    decode_elements, BoxedPrimitive, ElementKind, Getter, InspectHook, IteratorTag, ObjectData,
    ObjectKind, ObjectRef, PromiseState, Property, PropertyKey, PropertyValue, SymbolRef,
    TypedElement, Value,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::assert::{
        contains, deep_equal, deep_strict_equal, does_not_match, does_not_reject, does_not_throw,
        equal, fail, greater_or_equal, greater_than, if_error, includes, instance_of,
        less_or_equal, less_than, matches, not_contains, not_deep_equal, not_deep_strict_equal,
        not_equal, not_includes, not_instance_of, not_strict_equal, ok, rejects, strict_equal,
        throws, type_of, AssertResult, AssertionError, ErrorMatcher, Operator,
    };
    pub use super::comparison::{is_deep_equal, is_deep_strict_equal};
    pub use super::diff::{create_err_diff, inspect_operand};
    pub use super::inspect::{inspect, inspect_with, Compact, GetterPolicy, InspectOptions};
    pub use super::value::{ElementKind, IteratorTag, ObjectKind, PromiseState, SymbolRef, Value};
}
