//! clutility - a minimalistic class and inheritance facility
//!
//! Classes are defined at runtime over a small dynamic object model:
//! objects with a prototype link, and native functions that declare their
//! parameter names.
//!
//! # Features
//! - Single entry point: `Context::classify(superclass, members)`
//! - Prototype linking without invoking the superclass constructor
//! - `$super` injection: a member whose first declared parameter is
//!   `$super` gets the superclass version of itself, bound to the instance
//! - Definition-time checks for missing super members
//! - Factory member sources for closure-private state
//!
//! # Example
//! ```ignore
//! use clutility::{Context, Function, Members, Value};
//!
//! let ctx = Context::new();
//! let counter = ctx.classify(None, Members::new()
//!     .initializer(Function::from_signature("function()", |this, _| {
//!         this.set("count", 0)?;
//!         Ok(Value::Undefined)
//!     })))?;
//! let c = counter.construct(&[])?;
//! assert_eq!(c.get("count"), Value::from(0));
//! ```

// Core modules
pub mod classify;
pub mod context;
pub mod value;

// Runtime support
pub mod runtime;

// Re-export main types
pub use classify::{ClassError, ClassResult, Member, MemberSource, Members};
pub use context::{Context, Options};
pub use runtime::{CallResult, Exception, Function, ObjectRef};
pub use value::Value;
