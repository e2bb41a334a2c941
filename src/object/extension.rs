use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::coercion::Cast;
use crate::error::Error;

use super::*;

/// A user-defined vector kind
///
/// The class tag selects a registered [`ExtensionType`], and the payload is
/// the underlying data that the handler proxies. Unregistered classes behave
/// like their payload while keeping the tag.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    pub class: String,
    pub data: Box<Value>,
}

impl Extension {
    pub fn new(class: &str, data: Value) -> Self {
        Extension {
            class: class.to_string(),
            data: Box::new(data),
        }
    }

    /// Same class wrapping a different payload
    pub fn rewrap(&self, data: Value) -> Value {
        Value::Extension(Extension {
            class: self.class.clone(),
            data: Box::new(data),
        })
    }
}

/// A scalar record, a named collection of fields that is not a vector
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub class: String,
    pub fields: Vec<(String, Value)>,
}

/// Behaviour of an extension class
///
/// Every hook has a default that treats the extension as its payload, so a
/// handler only implements what differs. `ptype2` and `cast` return `None`
/// when the handler has no opinion about the given pair.
///
pub trait ExtensionType {
    fn proxy(&self, x: &Extension) -> Result<Value, Error> {
        Ok((*x.data).clone())
    }

    fn restore(&self, proxy: Value, to: &Extension) -> Result<Value, Error> {
        Ok(to.rewrap(proxy))
    }

    fn proxy_equal(&self, x: &Extension) -> Result<Value, Error> {
        self.proxy(x)
    }

    fn proxy_compare(&self, x: &Extension) -> Result<Value, Error> {
        self.proxy_equal(x)
    }

    fn ptype2(&self, _x: &Value, _y: &Value) -> Option<Result<Value, Error>> {
        None
    }

    fn cast(&self, _x: &Value, _to: &Value) -> Option<Result<Cast, Error>> {
        None
    }
}

thread_local! {
    static REGISTRY: RefCell<HashMap<String, Rc<dyn ExtensionType>>> = RefCell::new(HashMap::new());
}

/// Install a handler for a class on the current thread
pub fn register(class: &str, handler: Rc<dyn ExtensionType>) {
    REGISTRY.with(|r| r.borrow_mut().insert(class.to_string(), handler));
}

pub fn unregister(class: &str) {
    REGISTRY.with(|r| r.borrow_mut().remove(class));
}

/// The handler for a class, if one was registered on this thread
pub fn lookup(class: &str) -> Option<Rc<dyn ExtensionType>> {
    REGISTRY.with(|r| r.borrow().get(class).cloned())
}
