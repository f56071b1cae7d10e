//! Object representation
//!
//! This module implements JSObject and its shared handle ObjectRef. Every
//! object carries its own property table plus an optional prototype link;
//! reads fall through the chain, writes always land on the object itself.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::runtime::function::Function;
use crate::runtime::property::PropertyTable;
use crate::runtime::realm;
use crate::value::Value;

/// Object class IDs
///
/// Identify what an object is used for. Behavior is identical; the tag is
/// informational for debugging and assertions.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassId {
    /// Plain object or instance
    Object = 0,
    /// The prototype object owned by a constructor
    Prototype = 1,
}

/// Object
///
/// The core object representation shared by plain objects, instances and
/// constructor prototypes.
pub struct JSObject {
    /// Class tag
    class_id: ClassId,

    /// Prototype of this object (None = end of chain)
    pub proto: Option<ObjectRef>,

    /// Own properties
    pub props: PropertyTable,

    /// Owning constructor, for prototype objects
    ///
    /// Strong, like `F.prototype.constructor`: an instance keeps its class
    /// alive. Constructor and prototype form an `Rc` cycle that lives as
    /// long as the thread's realm.
    constructor: Option<Function>,
}

impl JSObject {
    /// Get class ID
    #[inline]
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// The constructor back-reference of a prototype object
    pub fn constructor(&self) -> Option<&Function> {
        self.constructor.as_ref()
    }
}

/// Shared handle to an object
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<JSObject>>);

impl ObjectRef {
    /// Create an empty object inheriting from the root `Object.prototype`
    pub fn new() -> Self {
        Self::create(Some(&realm::object_prototype()))
    }

    /// Create an empty object whose prototype link is exactly `proto`
    ///
    /// This only links; nothing is invoked, so no state is copied from
    /// whatever constructed `proto`.
    pub fn create(proto: Option<&ObjectRef>) -> Self {
        Self::alloc(ClassId::Object, proto.cloned())
    }

    /// Create the prototype object of a constructor
    ///
    /// The constructor is attached afterwards with `set_constructor`, once
    /// the function owning this object exists.
    pub(crate) fn new_prototype(proto: Option<ObjectRef>) -> Self {
        Self::alloc(ClassId::Prototype, proto)
    }

    fn alloc(class_id: ClassId, proto: Option<ObjectRef>) -> Self {
        ObjectRef(Rc::new(RefCell::new(JSObject {
            class_id,
            proto,
            props: PropertyTable::new(),
            constructor: None,
        })))
    }

    /// Attach the constructor back-reference
    pub(crate) fn set_constructor(&self, ctor: Function) {
        self.0.borrow_mut().constructor = Some(ctor);
    }

    /// Get class ID
    pub fn class_id(&self) -> ClassId {
        self.0.borrow().class_id
    }

    /// Get the prototype link
    pub fn proto(&self) -> Option<ObjectRef> {
        self.0.borrow().proto.clone()
    }

    /// Replace the prototype link
    pub fn set_proto(&self, proto: Option<ObjectRef>) {
        self.0.borrow_mut().proto = proto;
    }

    /// Read a property
    ///
    /// Own properties win, then the `constructor` back-reference of a
    /// prototype object, then the prototype chain. Missing keys read as
    /// `undefined`.
    pub fn get(&self, key: &str) -> Value {
        let mut current = self.clone();
        loop {
            let next = {
                let obj = current.0.borrow();
                if let Some(prop) = obj.props.get(key) {
                    return prop.value.clone();
                }
                if key == "constructor" {
                    if let Some(ctor) = obj.constructor() {
                        return Value::Function(ctor.clone());
                    }
                }
                match &obj.proto {
                    Some(proto) => proto.clone(),
                    None => return Value::Undefined,
                }
            };
            current = next;
        }
    }

    /// Write an own property
    ///
    /// Never writes through to the prototype: assigning a name that is only
    /// inherited creates an own property that shadows it.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        self.0.borrow_mut().props.set(key, value.into());
    }

    /// Delete an own property
    pub fn delete(&self, key: &str) -> bool {
        self.0.borrow_mut().props.delete(key)
    }

    /// `hasOwnProperty`
    pub fn has_own(&self, key: &str) -> bool {
        self.0.borrow().props.has(key)
    }

    /// `key in obj`
    pub fn has(&self, key: &str) -> bool {
        let mut current = Some(self.clone());
        while let Some(obj) = current {
            if obj.has_own(key) {
                return true;
            }
            current = obj.proto();
        }
        false
    }

    /// Own property names in insertion order
    pub fn own_keys(&self) -> Vec<Rc<str>> {
        self.0.borrow().props.keys().cloned().collect()
    }

    /// Check whether this object appears on `obj`'s prototype chain
    pub fn is_prototype_of(&self, obj: &ObjectRef) -> bool {
        let mut current = obj.proto();
        while let Some(proto) = current {
            if proto.ptr_eq(self) {
                return true;
            }
            current = proto.proto();
        }
        false
    }

    /// Identity comparison
    #[inline]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Borrow the underlying object
    pub fn borrow(&self) -> std::cell::Ref<'_, JSObject> {
        self.0.borrow()
    }
}

impl Default for ObjectRef {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only own keys: values may refer back to this object
        let obj = self.0.borrow();
        write!(f, "{:?} {{", obj.class_id)?;
        for (i, key) in obj.props.keys().enumerate() {
            write!(f, "{}{}", if i == 0 { " " } else { ", " }, key)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_property_shadows_inherited() {
        let parent = ObjectRef::create(None);
        parent.set("state", "shared");

        let a = ObjectRef::create(Some(&parent));
        let b = ObjectRef::create(Some(&parent));
        assert_eq!(a.get("state"), Value::from("shared"));
        assert!(!a.has_own("state"));
        assert!(a.has("state"));

        a.set("state", "private");
        assert_eq!(a.get("state"), Value::from("private"));
        assert_eq!(b.get("state"), Value::from("shared"));
        assert_eq!(parent.get("state"), Value::from("shared"));

        // Deleting the own copy uncovers the shared one again
        assert!(a.delete("state"));
        assert_eq!(a.get("state"), Value::from("shared"));
    }

    #[test]
    fn test_missing_property_is_undefined() {
        let obj = ObjectRef::create(None);
        assert!(obj.get("nope").is_undefined());
        assert!(!obj.has("nope"));
    }

    #[test]
    fn test_prototype_chain() {
        let a = ObjectRef::create(None);
        let b = ObjectRef::create(Some(&a));
        let c = ObjectRef::create(Some(&b));

        assert!(a.is_prototype_of(&c));
        assert!(b.is_prototype_of(&c));
        assert!(!c.is_prototype_of(&a));
        assert!(!c.is_prototype_of(&c));

        a.set("deep", 1);
        assert_eq!(c.get("deep"), Value::from(1));

        c.set_proto(None);
        assert!(c.get("deep").is_undefined());
    }

    #[test]
    fn test_new_inherits_from_root() {
        let obj = ObjectRef::new();
        assert!(realm::object_prototype().is_prototype_of(&obj));
        assert_eq!(obj.class_id(), ClassId::Object);
    }

    #[test]
    fn test_own_keys_order() {
        let obj = ObjectRef::create(None);
        obj.set("b", 1);
        obj.set("a", 2);
        let keys: Vec<_> = obj.own_keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, ["b", "a"]);
    }
}
