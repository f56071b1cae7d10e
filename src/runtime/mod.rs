//! Runtime support
//!
//! This module contains the object model classes are built from:
//! - Object representation (JSObject, ObjectRef, properties)
//! - Function types (native closures, bound functions)
//! - Declared-parameter introspection
//! - Call-time errors
//! - The per-thread root `Object`

pub mod exception;
pub mod function;
pub mod object;
pub mod property;
pub mod realm;
pub mod signature;

pub use exception::{CallResult, Exception};
pub use function::{Function, NativeFn};
pub use object::{ClassId, JSObject, ObjectRef};
pub use property::{Property, PropertyTable};
pub use signature::{Signature, parse_params, parse_signature};
