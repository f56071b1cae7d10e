//! Function types
//!
//! This module implements the callable types:
//! - Native functions (Rust closures with declared parameter names)
//! - Bound functions (a target with a fixed `this`)
//!
//! Every native function owns a prototype object, so any of them can be
//! used with `new` and as a superclass.

use std::fmt;
use std::rc::Rc;

use crate::runtime::exception::{CallResult, Exception};
use crate::runtime::object::ObjectRef;
use crate::runtime::realm;
use crate::runtime::signature::parse_signature;
use crate::value::Value;

/// Native function signature
///
/// Native functions take the `this` value and the call arguments.
pub type NativeFn = dyn Fn(&Value, &[Value]) -> CallResult<Value>;

/// Function kind
enum FunctionKind {
    /// Rust closure
    Native(Rc<NativeFn>),
    /// `target.bind(this)`
    Bound {
        /// Function being called
        target: Function,
        /// Fixed `this` value
        this: Value,
    },
}

/// Function storage shared by all handles to one function
struct FunctionData {
    /// Function name (for debugging and display)
    name: Rc<str>,
    /// Declared parameter names
    params: Vec<Rc<str>>,
    /// What calling this function does
    kind: FunctionKind,
    /// Prototype object handed to constructed instances (None = not a
    /// constructor)
    prototype: Option<ObjectRef>,
}

/// Shared handle to a function
#[derive(Clone)]
pub struct Function(Rc<FunctionData>);

impl Function {
    /// Create a native function with explicitly declared parameter names
    ///
    /// Its prototype object inherits from the root `Object.prototype`.
    pub fn new<F>(name: &str, params: &[&str], body: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> CallResult<Value> + 'static,
    {
        let params: Vec<Rc<str>> = params.iter().map(|p| Rc::from(*p)).collect();
        Self::native(
            Rc::from(name),
            params,
            Rc::new(body),
            Some(realm::object_prototype()),
        )
    }

    /// Create a native function whose name and parameters are read from a
    /// signature text such as `"function get($super)"`, `"|$super, x|"` or
    /// `"move |$super, x|"`
    ///
    /// Text that matches none of these forms declares no parameters.
    pub fn from_signature<F>(signature: &str, body: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> CallResult<Value> + 'static,
    {
        let sig = parse_signature(signature);
        let name: Rc<str> = Rc::from(sig.name.as_deref().unwrap_or(""));
        Self::native(name, sig.params, Rc::new(body), Some(realm::object_prototype()))
    }

    /// Create a native function whose prototype object links to `parent`
    pub(crate) fn native(
        name: Rc<str>,
        params: Vec<Rc<str>>,
        body: Rc<NativeFn>,
        parent: Option<ObjectRef>,
    ) -> Self {
        Self::alloc_native(name, params, body, parent).0
    }

    /// Allocate a native function together with its prototype object
    pub(crate) fn alloc_native(
        name: Rc<str>,
        params: Vec<Rc<str>>,
        body: Rc<NativeFn>,
        parent: Option<ObjectRef>,
    ) -> (Self, ObjectRef) {
        let proto = ObjectRef::new_prototype(parent);
        let func = Function(Rc::new(FunctionData {
            name,
            params,
            kind: FunctionKind::Native(body),
            prototype: Some(proto.clone()),
        }));
        proto.set_constructor(func.clone());
        (func, proto)
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Declared parameter names
    pub fn params(&self) -> &[Rc<str>] {
        &self.0.params
    }

    /// First declared parameter name
    ///
    /// This is static: it reflects the declaration, not any call.
    pub fn first_param(&self) -> Option<&str> {
        self.0.params.first().map(|p| &**p)
    }

    /// The prototype object given to instances (None for bound functions)
    pub fn prototype(&self) -> Option<&ObjectRef> {
        self.0.prototype.as_ref()
    }

    /// Check whether this function can be used with `new`
    pub fn is_constructor(&self) -> bool {
        self.0.prototype.is_some()
    }

    /// Call with an explicit `this`
    ///
    /// A bound function ignores `this` and uses the value it was bound to.
    pub fn call(&self, this: &Value, args: &[Value]) -> CallResult<Value> {
        match &self.0.kind {
            FunctionKind::Native(body) => body(this, args),
            FunctionKind::Bound {
                target,
                this: bound_this,
            } => target.call(bound_this, args),
        }
    }

    /// Call with `this` set to `undefined`
    pub fn invoke(&self, args: &[Value]) -> CallResult<Value> {
        self.call(&Value::Undefined, args)
    }

    /// `fn.bind(this)`
    pub fn bind(&self, this: Value) -> Function {
        Function(Rc::new(FunctionData {
            name: Rc::from(format!("bound {}", self.name())),
            params: self.0.params.clone(),
            kind: FunctionKind::Bound {
                target: self.clone(),
                this,
            },
            prototype: None,
        }))
    }

    /// `new fn(...args)`
    ///
    /// Allocates an object linked to the prototype and runs the body with it
    /// as `this`. A body that returns an object replaces the allocation.
    pub fn construct(&self, args: &[Value]) -> CallResult<Value> {
        let Some(proto) = self.prototype() else {
            return Err(Exception::TypeError(format!(
                "{} is not a constructor",
                self.name()
            )));
        };

        tracing::trace!(constructor = %self.name(), argc = args.len(), "construct");

        let this = Value::Object(ObjectRef::create(Some(proto)));
        match self.call(&this, args)? {
            result @ Value::Object(_) => Ok(result),
            _ => Ok(this),
        }
    }

    /// Identity comparison
    #[inline]
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({}(", self.name())?;
        for (i, param) in self.params().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, "))")
    }
}
