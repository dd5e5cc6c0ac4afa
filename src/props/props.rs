use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A single property value.
///
/// Values are compared the way the lifecycle gate needs them compared:
/// primitives by value, `Ref` payloads by pointer identity, never by deep
/// inspection. `Float` uses IEEE equality, so a NaN-valued property is
/// never equal to itself and always re-triggers the gate.
#[derive(Clone)]
pub enum PropValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// An opaque shared payload, compared by identity.
    Ref(Arc<dyn Any + Send + Sync>),
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Null, PropValue::Null) => true,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Float(a), PropValue::Float(b)) => a == b,
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::Ref(a), PropValue::Ref(b)) => {
                // Compare data pointers only; two Arcs to the same allocation
                // are the same reference regardless of vtable.
                std::ptr::eq(
                    Arc::as_ptr(a) as *const u8,
                    Arc::as_ptr(b) as *const u8,
                )
            }
            _ => false,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Null => write!(f, "Null"),
            PropValue::Bool(v) => write!(f, "Bool({v})"),
            PropValue::Int(v) => write!(f, "Int({v})"),
            PropValue::Float(v) => write!(f, "Float({v})"),
            PropValue::Str(v) => write!(f, "Str({v:?})"),
            PropValue::Ref(v) => write!(f, "Ref({:p})", Arc::as_ptr(v)),
        }
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Bool(v)
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        PropValue::Int(v)
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Float(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Str(v.to_string())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::Str(v)
    }
}

/// An ordered bag of named properties.
///
/// This is the non-structural portion of what the host delivers on each
/// update pass; structural fields (scope, global flag) live on
/// [`ContainerProps`](crate::ContainerProps) instead.
///
/// # Examples
///
/// ```
/// use canister::{shallow_equal, Props};
///
/// let a = Props::new().with("user", "alice").with("limit", 10i64);
/// let b = Props::new().with("user", "alice").with("limit", 10i64);
/// assert!(shallow_equal(&a, &b));
///
/// let c = b.with("limit", 20i64);
/// assert!(!shallow_equal(&a, &c));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    entries: BTreeMap<String, PropValue>,
}

impl Props {
    /// Create an empty property bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, replacing any previous value under the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a property by key.
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.get(key)
    }

    /// Number of properties in the bag.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Shallow equality over two property bags.
///
/// True when both bags have the same key set and every value compares equal
/// under [`PropValue`] equality. Never recurses into `Ref` payloads.
pub fn shallow_equal(a: &Props, b: &Props) -> bool {
    a.entries.len() == b.entries.len()
        && a.entries
            .iter()
            .zip(b.entries.iter())
            .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
}
