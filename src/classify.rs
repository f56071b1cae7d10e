//! Class construction
//!
//! `classify` turns an optional superclass and a set of member definitions
//! into a new constructor:
//! - the constructor's prototype is linked to the superclass prototype
//!   without running the superclass body, so nothing per-instance ends up
//!   shared by accident
//! - a member whose first declared parameter is the super token (`$super`)
//!   receives, on every call, the superclass version of itself bound to the
//!   current instance
//! - data members land on the prototype and are shared by every instance
//!   until an instance assigns its own copy
//!
//! ```ignore
//! use clutility::{Context, Function, Members, Value};
//!
//! let ctx = Context::new();
//! let num = ctx.classify(None, Members::new()
//!     .initializer(Function::from_signature("function(initial)", |this, args| {
//!         this.set("value", args[0].clone())?;
//!         Ok(Value::Undefined)
//!     }))
//!     .method("get", Function::from_signature("function()", |this, _| Ok(this.get("value")))))?;
//!
//! let doubler = ctx.classify(Some(&num), Members::new()
//!     .method("get", Function::from_signature("function($super)", |_, args| {
//!         Ok(Value::from(args[0].call(&Value::Undefined, &[])?.to_number() * 2.0))
//!     })))?;
//! ```

use std::rc::Rc;

use thiserror::Error;

use crate::context::Options;
use crate::runtime::{CallResult, Function, NativeFn, ObjectRef, realm};
use crate::value::Value;

/// Error raised while defining a class
///
/// Both variants are raised synchronously by `classify`, before any
/// instance exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassError {
    /// The superclass or initializer argument is unusable
    #[error("{0}")]
    InvalidArgument(String),
    /// A member asked for a super handle the superclass cannot provide
    #[error("No super method found for '{0}'")]
    MissingSuperMember(String),
}

/// Result type for class definition
pub type ClassResult<T> = Result<T, ClassError>;

/// One member definition
#[derive(Debug, Clone)]
pub enum Member {
    /// Plain data, stored on the prototype
    Data(Value),
    /// A method; gets a super handle if its first parameter asks for one
    Method(Function),
    /// A method that always gets a super handle as its first argument
    SuperMethod(Function),
}

impl From<Value> for Member {
    fn from(value: Value) -> Self {
        match value {
            Value::Function(func) => Member::Method(func),
            other => Member::Data(other),
        }
    }
}

impl From<Function> for Member {
    fn from(func: Function) -> Self {
        Member::Method(func)
    }
}

/// Member-definition mapping
///
/// An ordered name -> member map. Inserting a name twice replaces the
/// earlier definition in place.
#[derive(Debug, Clone, Default)]
pub struct Members {
    entries: Vec<(Rc<str>, Member)>,
    initializer: Option<Member>,
}

impl Members {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a member
    pub fn insert(&mut self, name: &str, member: impl Into<Member>) {
        let member = member.into();
        match self.entries.iter_mut().find(|(key, _)| &**key == name) {
            Some(entry) => entry.1 = member,
            None => self.entries.push((Rc::from(name), member)),
        }
    }

    /// Add a data field
    ///
    /// The value lives on the prototype. A list or object placed here is
    /// one instance shared by every instance of the class; `shared` is the
    /// spelling that says so.
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        if matches!(value, Value::List(_) | Value::Object(_)) {
            tracing::debug!(
                field = name,
                kind = value.type_name(),
                "field default is shared by reference across instances"
            );
        }
        self.insert(name, value);
        self
    }

    /// Add a field whose (mutable) value is deliberately shared by every
    /// instance that has not assigned its own
    pub fn shared(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }

    /// Add a method
    pub fn method(mut self, name: &str, func: Function) -> Self {
        self.insert(name, Member::Method(func));
        self
    }

    /// Add a method that receives the bound superclass method as its first
    /// argument, regardless of its declared parameters
    pub fn with_super(mut self, name: &str, func: Function) -> Self {
        self.insert(name, Member::SuperMethod(func));
        self
    }

    /// Set the initializer
    ///
    /// Takes precedence over a member stored under the reserved
    /// initializer name.
    pub fn initializer(mut self, func: Function) -> Self {
        self.initializer = Some(Member::Method(func));
        self
    }

    /// Look up a member by name
    pub fn get(&self, name: &str) -> Option<&Member> {
        self.entries
            .iter()
            .find(|(key, _)| &**key == name)
            .map(|(_, member)| member)
    }

    /// Member names in definition order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| &**key)
    }

    /// Number of named members (the initializer slot is not counted)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pull the initializer out of the mapping
    ///
    /// The reserved name is removed either way; it never reaches the
    /// prototype.
    fn take_initializer(&mut self, key: &str) -> Option<Member> {
        let stored = self
            .entries
            .iter()
            .position(|(name, _)| &**name == key)
            .map(|idx| self.entries.remove(idx).1);
        self.initializer.take().or(stored)
    }
}

/// Where member definitions come from
pub enum MemberSource<'a> {
    /// A ready mapping
    Members(Members),
    /// Called once with the superclass prototype; whatever it captures is
    /// private to the closures it hands back
    Factory(Box<dyn FnOnce(&ObjectRef) -> Members + 'a>),
}

impl<'a> MemberSource<'a> {
    /// Wrap a factory
    pub fn factory(f: impl FnOnce(&ObjectRef) -> Members + 'a) -> Self {
        MemberSource::Factory(Box::new(f))
    }

    fn resolve(self, super_proto: &ObjectRef) -> Members {
        match self {
            MemberSource::Members(members) => members,
            MemberSource::Factory(factory) => factory(super_proto),
        }
    }
}

impl From<Members> for MemberSource<'_> {
    fn from(members: Members) -> Self {
        MemberSource::Members(members)
    }
}

/// How the constructor body came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InitKind {
    /// No initializer: forwards to the superclass constructor
    Default,
    /// User initializer called as is
    Plain,
    /// User initializer with a super handle
    WithSuper,
}

/// Define a new class
///
/// See the module docs. `superclass` of `None` means the root `Object`;
/// an explicitly passed falsy value is rejected.
pub fn classify<'a>(
    options: &Options,
    superclass: Option<&Value>,
    source: impl Into<MemberSource<'a>>,
) -> ClassResult<Value> {
    let superclass = resolve_superclass(superclass)?;
    let Some(super_proto) = superclass.prototype().cloned() else {
        return Err(ClassError::InvalidArgument(
            "Super class is not a constructor".to_string(),
        ));
    };

    let mut members = source.into().resolve(&super_proto);

    let (body, params, kind) = match members.take_initializer(&options.initializer_key) {
        None => default_initializer(&superclass),
        Some(Member::Data(value)) if !value.is_truthy() => default_initializer(&superclass),
        Some(Member::Data(Value::Function(init))) | Some(Member::Method(init)) => {
            if requests_super(&init, options) {
                super_initializer(&superclass, init, true)
            } else {
                plain_initializer(init)
            }
        }
        Some(Member::SuperMethod(init)) => super_initializer(&superclass, init, false),
        Some(Member::Data(other)) => {
            return Err(ClassError::InvalidArgument(format!(
                "Initializer must be a function, got {}",
                other.type_name()
            )));
        }
    };

    // Linked, not instantiated: the superclass body does not run here
    let (ctor, proto) = Function::alloc_native(Rc::from(""), params, body, Some(super_proto.clone()));

    let member_count = members.len();
    for (name, member) in members.entries {
        match member {
            Member::Method(func) if requests_super(&func, options) => {
                let wrapped = super_method(&super_proto, &name, func, true)?;
                proto.set(&name, wrapped);
            }
            Member::SuperMethod(func) => {
                let wrapped = super_method(&super_proto, &name, func, false)?;
                proto.set(&name, wrapped);
            }
            Member::Method(func) => proto.set(&name, func),
            Member::Data(value) => proto.set(&name, value),
        }
    }

    tracing::debug!(
        superclass = %superclass.name(),
        members = member_count,
        initializer = ?kind,
        "class defined"
    );

    Ok(Value::Function(ctor))
}

fn resolve_superclass(superclass: Option<&Value>) -> ClassResult<Function> {
    match superclass {
        None => Ok(realm::object()),
        Some(value) if !value.is_truthy() => Err(ClassError::InvalidArgument(
            "Super class not defined".to_string(),
        )),
        Some(Value::Function(func)) if func.is_constructor() => Ok(func.clone()),
        Some(other) => Err(ClassError::InvalidArgument(format!(
            "Super class is not a constructor: {}",
            other
        ))),
    }
}

/// Check the declared first parameter against the super token
fn requests_super(func: &Function, options: &Options) -> bool {
    func.first_param() == Some(options.super_param.as_str())
}

/// Prepend a handle to the call arguments
fn with_handle(handle: Function, args: &[Value]) -> Vec<Value> {
    let mut full = Vec::with_capacity(args.len() + 1);
    full.push(Value::Function(handle));
    full.extend_from_slice(args);
    full
}

/// Declared params as callers see them, without a declared handle slot
fn handle_free_params(func: &Function, declared: bool) -> Vec<Rc<str>> {
    let skip = usize::from(declared);
    func.params().iter().skip(skip).cloned().collect()
}

type Initializer = (Rc<NativeFn>, Vec<Rc<str>>, InitKind);

/// Forward every argument to the superclass constructor, run against `this`
fn default_initializer(superclass: &Function) -> Initializer {
    let params = superclass.params().to_vec();
    let superclass = superclass.clone();
    let body: Rc<NativeFn> = Rc::new(move |this: &Value, args: &[Value]| -> CallResult<Value> {
        superclass.call(this, args)?;
        Ok(Value::Undefined)
    });
    (body, params, InitKind::Default)
}

/// The user initializer as is; its return value is the constructor's
fn plain_initializer(init: Function) -> Initializer {
    let params = init.params().to_vec();
    let body: Rc<NativeFn> =
        Rc::new(move |this: &Value, args: &[Value]| -> CallResult<Value> { init.call(this, args) });
    (body, params, InitKind::Plain)
}

/// The user initializer with the superclass constructor, bound to the new
/// instance, as its first argument
fn super_initializer(superclass: &Function, init: Function, declared: bool) -> Initializer {
    let params = handle_free_params(&init, declared);
    let superclass = superclass.clone();
    let body: Rc<NativeFn> = Rc::new(move |this: &Value, args: &[Value]| -> CallResult<Value> {
        let handle = superclass.bind(this.clone());
        init.call(this, &with_handle(handle, args))?;
        Ok(Value::Undefined)
    });
    (body, params, InitKind::WithSuper)
}

/// Wrap a method so it receives the same-named superclass method bound to
/// `this`
///
/// The superclass method is resolved now, at definition time.
fn super_method(
    super_proto: &ObjectRef,
    name: &str,
    method: Function,
    declared: bool,
) -> ClassResult<Function> {
    let Value::Function(super_fn) = super_proto.get(name) else {
        return Err(ClassError::MissingSuperMember(name.to_string()));
    };

    tracing::trace!(member = name, "injecting super handle");

    let params = handle_free_params(&method, declared);
    let body = move |this: &Value, args: &[Value]| -> CallResult<Value> {
        let handle = super_fn.bind(this.clone());
        method.call(this, &with_handle(handle, args))
    };
    Ok(Function::native(
        Rc::from(name),
        params,
        Rc::new(body),
        Some(realm::object_prototype()),
    ))
}
