//! Call-time errors
//!
//! Everything a function body, a bound handle or a construction can fail
//! with. Errors raised by user bodies travel through wrappers untouched.

use thiserror::Error;

use crate::value::Value;

/// Error raised while calling or constructing
#[derive(Debug, Clone, Error)]
pub enum Exception {
    /// Calling a non-function, constructing a non-constructor, writing a
    /// property on a primitive
    #[error("TypeError: {0}")]
    TypeError(String),
    /// A value thrown by a function body
    #[error("Uncaught {0}")]
    Thrown(Value),
}

impl Exception {
    /// Throw an arbitrary value
    pub fn throw(value: impl Into<Value>) -> Self {
        Exception::Thrown(value.into())
    }

    /// The thrown value, if this came from a function body
    pub fn thrown_value(&self) -> Option<&Value> {
        match self {
            Exception::Thrown(value) => Some(value),
            Exception::TypeError(_) => None,
        }
    }
}

/// Result type for call and construction operations
pub type CallResult<T> = Result<T, Exception>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Exception::TypeError("x is not a function".into()).to_string(),
            "TypeError: x is not a function"
        );
        assert_eq!(Exception::throw("boom").to_string(), "Uncaught boom");
    }

    #[test]
    fn test_thrown_value() {
        let err = Exception::throw(7);
        assert_eq!(err.thrown_value(), Some(&Value::from(7)));
        assert!(Exception::TypeError(String::new()).thrown_value().is_none());
    }
}
