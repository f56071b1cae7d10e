//! The root of every prototype chain
//!
//! One realm per thread: the root `Object` constructor and its prototype.
//! Values are `Rc`-based and never cross threads, so a thread-local is the
//! natural home for them.

use std::rc::Rc;

use crate::runtime::exception::CallResult;
use crate::runtime::function::Function;
use crate::runtime::object::ObjectRef;
use crate::value::Value;

struct Realm {
    object: Function,
    object_prototype: ObjectRef,
}

impl Realm {
    fn new() -> Self {
        // `Object(o)` hands back an object argument and leaves `this` alone
        let (object, object_prototype) = Function::alloc_native(
            Rc::from("Object"),
            Vec::new(),
            Rc::new(|_this: &Value, args: &[Value]| -> CallResult<Value> {
                match args.first() {
                    Some(arg @ Value::Object(_)) => Ok(arg.clone()),
                    _ => Ok(Value::Undefined),
                }
            }),
            None,
        );
        Realm {
            object,
            object_prototype,
        }
    }
}

thread_local! {
    static REALM: Realm = Realm::new();
}

/// The root `Object` constructor
pub fn object() -> Function {
    REALM.with(|realm| realm.object.clone())
}

/// `Object.prototype`, the end of every chain built by this crate
pub fn object_prototype() -> ObjectRef {
    REALM.with(|realm| realm.object_prototype.clone())
}
