//! Dynamic value representation
//!
//! Value is the tagged union every property, argument and return value is
//! expressed in. Primitives are stored inline; lists, objects and functions
//! are reference types, so cloning a Value shares the referent the same way
//! assigning a JavaScript reference does.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::runtime::{CallResult, Exception, Function, ObjectRef};

/// Shared, mutable list storage
pub type ListRef = Rc<RefCell<Vec<Value>>>;

/// High-level dynamic value type
#[derive(Clone, Default)]
pub enum Value {
    /// The `undefined` value (also what a missing property reads as)
    #[default]
    Undefined,
    /// The `null` value
    Null,
    /// Boolean
    Bool(bool),
    /// IEEE-754 double, like every JavaScript number
    Number(f64),
    /// Immutable string
    String(Rc<str>),
    /// Mutable list shared by reference
    List(ListRef),
    /// Plain object
    Object(ObjectRef),
    /// Callable (and possibly constructible) function
    Function(Function),
}

impl Value {
    /// Create a new, empty list value
    pub fn list() -> Self {
        Value::List(Rc::new(RefCell::new(Vec::new())))
    }

    /// Create a list value holding the given items
    pub fn list_from(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    // Type checking

    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// The `typeof` name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    // Conversions

    /// JavaScript truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::List(_) | Value::Object(_) | Value::Function(_) => true,
        }
    }

    /// Numeric coercion (`Number(value)`)
    ///
    /// `undefined` coerces to NaN, which is how arithmetic on a field that
    /// was never assigned surfaces.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    0.0
                } else {
                    s.parse().unwrap_or(f64::NAN)
                }
            }
            Value::List(_) | Value::Object(_) | Value::Function(_) => f64::NAN,
        }
    }

    /// Get the number if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the string if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Strict equality (`===`)
    ///
    /// Primitives compare by value with NaN unequal to itself; reference
    /// types compare by identity.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    // Property access

    /// Read a property, walking the prototype chain
    ///
    /// Primitives have no properties and read as `undefined`. Functions
    /// expose `prototype` and `name`.
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Object(obj) => obj.get(key),
            Value::Function(func) => match key {
                "prototype" => func
                    .prototype()
                    .map(|proto| Value::Object(proto.clone()))
                    .unwrap_or_default(),
                "name" => Value::from(func.name()),
                _ => Value::Undefined,
            },
            Value::List(list) if key == "length" => Value::Number(list.borrow().len() as f64),
            _ => Value::Undefined,
        }
    }

    /// Write an own property
    pub fn set(&self, key: &str, value: impl Into<Value>) -> CallResult<()> {
        match self {
            Value::Object(obj) => {
                obj.set(key, value);
                Ok(())
            }
            other => Err(Exception::TypeError(format!(
                "cannot set property '{}' on {}",
                key,
                other.type_name()
            ))),
        }
    }

    /// Call this value as a function
    pub fn call(&self, this: &Value, args: &[Value]) -> CallResult<Value> {
        match self {
            Value::Function(func) => func.call(this, args),
            other => Err(Exception::TypeError(format!("{} is not a function", other.type_name()))),
        }
    }

    /// Look up a method by name and call it with this value as `this`
    pub fn invoke(&self, key: &str, args: &[Value]) -> CallResult<Value> {
        match self.get(key) {
            Value::Function(func) => func.call(self, args),
            _ => Err(Exception::TypeError(format!("'{}' is not a function", key))),
        }
    }

    /// Construct an instance (`new value(...args)`)
    pub fn construct(&self, args: &[Value]) -> CallResult<Value> {
        match self {
            Value::Function(func) => func.construct(args),
            other => Err(Exception::TypeError(format!(
                "{} is not a constructor",
                other.type_name()
            ))),
        }
    }

    /// `value instanceof ctor`
    ///
    /// True when `ctor.prototype` appears anywhere on this value's
    /// prototype chain. Non-objects and non-constructors yield false.
    pub fn instance_of(&self, ctor: &Value) -> bool {
        let (Value::Object(obj), Value::Function(func)) = (self, ctor) else {
            return false;
        };
        func.prototype()
            .is_some_and(|proto| proto.is_prototype_of(obj))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(func)
    }
}

/// Format a number the way `String(number)` does for the common cases
fn fmt_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        write!(f, "{}Infinity", if n < 0.0 { "-" } else { "" })
    } else if n == n.trunc() && n.abs() < 1e21 {
        // Also folds -0 into "0"
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

thread_local! {
    /// Lists currently being formatted on this thread
    static FORMATTING: RefCell<Vec<*const RefCell<Vec<Value>>>> =
        const { RefCell::new(Vec::new()) };
}

/// Marks a list as being formatted until dropped
struct JoinGuard(*const RefCell<Vec<Value>>);

impl JoinGuard {
    /// Returns None if `list` is already being formatted further up
    fn enter(list: &ListRef) -> Option<Self> {
        let ptr = Rc::as_ptr(list);
        FORMATTING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.contains(&ptr) {
                return None;
            }
            stack.push(ptr);
            Some(JoinGuard(ptr))
        })
    }
}

impl Drop for JoinGuard {
    fn drop(&mut self) {
        FORMATTING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack.iter().rposition(|p| *p == self.0) {
                stack.remove(pos);
            }
        });
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => fmt_number(f, *n),
            Value::String(s) => write!(f, "{}", s),
            Value::List(list) => {
                // A list reached again while it is being joined prints empty
                let Some(_guard) = JoinGuard::enter(list) else {
                    return Ok(());
                };
                for (i, item) in list.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    // Array.prototype.join prints holes as empty
                    if !item.is_undefined() && !item.is_null() {
                        write!(f, "{}", item)?;
                    }
                }
                Ok(())
            }
            Value::Object(_) => write!(f, "[object Object]"),
            Value::Function(func) => write!(f, "function {}() {{ [native code] }}", func.name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::List(list) => match JoinGuard::enter(list) {
                Some(_guard) => f.debug_list().entries(list.borrow().iter()).finish(),
                None => write!(f, "[...]"),
            },
            Value::Object(obj) => write!(f, "{:?}", obj),
            Value::Function(func) => write!(f, "{:?}", func),
        }
    }
}
