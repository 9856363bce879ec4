use std::{fmt, ptr, sync::Arc};

use indexmap::IndexMap;

use crate::error::Result;

/// Insertion-ordered string-keyed mapping.
pub type Map = IndexMap<String, Value>;

/// Zero-argument callable stored as data, invoked on every access.
pub type ThunkFn = dyn Fn() -> Result<Value> + Send + Sync;

/// Callable receiving the resolved call arguments.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// Capability set of an object-like value.
///
/// Every hook is optional. Returning `None` means the capability does not
/// cover `name`, which lets resolution fall through to the next hook:
///
/// 1. [`method`](Entity::method) - a method the object defines directly
/// 2. [`call`](Entity::call) - catch-all invocation handler
/// 3. [`property`](Entity::property) - readable field
/// 4. [`get`](Entity::get) - catch-all property getter
///
/// Property hooks are only consulted for hops written without parentheses.
///
/// # Examples
///
/// ```
/// use dotquery::{Entity, Query, Value};
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct Greeter;
///
/// impl Entity for Greeter {
///     fn method(&self, name: &str, args: &[Value]) -> Option<dotquery::Result<Value>> {
///         match name {
///             "greet" => {
///                 let who = args.first().map(Value::as_string).unwrap_or_default();
///                 Some(Ok(Value::from(format!("hello {}", who))))
///             }
///             _ => None,
///         }
///     }
/// }
///
/// let data = Value::Entity(Arc::new(Greeter));
/// let result = Query::new("greet('bob')").resolve(data).unwrap();
/// assert_eq!(result, Value::from("hello bob"));
/// ```
pub trait Entity: fmt::Debug + Send + Sync {
    fn method(&self, _name: &str, _args: &[Value]) -> Option<Result<Value>> {
        None
    }

    fn call(&self, _name: &str, _args: &[Value]) -> Option<Result<Value>> {
        None
    }

    fn property(&self, _name: &str) -> Option<Value> {
        None
    }

    fn get(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// A value flowing through query resolution.
///
/// Besides the JSON-like data variants, a value can hold host behaviour:
/// lazily computed entries ([`Value::Thunk`]), callables ([`Value::Function`])
/// and capability objects ([`Value::Entity`]).
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,

    Boolean(bool),

    Float(f64),

    Integer(i64),

    String(String),

    /// Ordered list, also addressable with numeric segments (`items.0`)
    Array(Vec<Value>),

    /// Associative container
    Map(Map),

    /// Lazy entry, invoked each time it is read and never memoized
    Thunk(Arc<ThunkFn>),

    Function(Arc<NativeFn>),

    Entity(Arc<dyn Entity>),
}

impl Value {
    pub fn thunk<F>(f: F) -> Self
    where
        F: Fn() -> Result<Value> + Send + Sync + 'static,
    {
        Value::Thunk(Arc::new(f))
    }

    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Value::Function(Arc::new(f))
    }

    pub fn entity<E: Entity + 'static>(entity: E) -> Self {
        Value::Entity(Arc::new(entity))
    }

    /// Label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) | Value::Map(_) => "array",
            Value::Thunk(_) | Value::Function(_) | Value::Entity(_) => "object",
        }
    }

    /// Check if the value is truthy (for ternary conditions)
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::String(s) => !s.is_empty() && s != "0",
            Value::Array(arr) => !arr.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Thunk(_) | Value::Function(_) | Value::Entity(_) => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Float(n) => Some(n.round() as i64),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get as string (concatenation)
    pub fn as_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Float(n) => n.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => String::new(),
            _ => format!("{:?}", self),
        }
    }

    /// Runs a thunk; any other value is returned as is.
    pub fn force(self) -> Result<Value> {
        match self {
            Value::Thunk(f) => f(),
            other => Ok(other),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => write!(f, "Boolean({:?})", b),
            Value::Float(n) => write!(f, "Float({:?})", n),
            Value::Integer(n) => write!(f, "Integer({:?})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Array(arr) => f.debug_tuple("Array").field(arr).finish(),
            Value::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Value::Thunk(_) => write!(f, "Thunk(..)"),
            Value::Function(_) => write!(f, "Function(..)"),
            Value::Entity(e) => f.debug_tuple("Entity").field(e).finish(),
        }
    }
}

/// Callables and entities compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Thunk(a), Value::Thunk(b)) => ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            (Value::Function(a), Value::Function(b)) => {
                ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Value::Entity(a), Value::Entity(b)) => ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
