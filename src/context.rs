//! Class definition context
//!
//! The Context is the main entry point. It holds the reserved names the
//! class builder recognizes and exposes the builder itself.

use crate::classify::{self, ClassResult, MemberSource};
use crate::runtime::realm;
use crate::value::Value;

/// Default name of the initializer member
pub const DEFAULT_INITIALIZER_KEY: &str = "initialize";

/// Default first-parameter name that requests a super handle
pub const DEFAULT_SUPER_PARAM: &str = "$super";

/// Reserved names used while defining classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Member name holding the per-instance initializer
    pub initializer_key: String,
    /// First declared parameter name that asks for the super handle
    pub super_param: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            initializer_key: DEFAULT_INITIALIZER_KEY.to_string(),
            super_param: DEFAULT_SUPER_PARAM.to_string(),
        }
    }
}

/// Class definition context
///
/// Holds no per-class state; every `classify` call is independent.
#[derive(Debug, Clone, Default)]
pub struct Context {
    options: Options,
}

impl Context {
    /// Create a context with the default reserved names
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with custom reserved names
    pub fn with_options(options: Options) -> Self {
        Context { options }
    }

    /// The reserved names in use
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The root `Object` constructor, the implicit superclass
    pub fn object(&self) -> Value {
        Value::Function(realm::object())
    }

    /// Define a new class
    ///
    /// # Arguments
    /// * `superclass` - `None` to inherit from `Object`; an explicit value
    ///   must be a constructor
    /// * `members` - a `Members` mapping, or `MemberSource::factory` to build
    ///   one from the superclass prototype
    ///
    /// # Returns
    /// The new constructor, or the reason the definition was rejected
    pub fn classify<'a>(
        &self,
        superclass: Option<&Value>,
        members: impl Into<MemberSource<'a>>,
    ) -> ClassResult<Value> {
        classify::classify(&self.options, superclass, members)
    }
}
