//! Display values exchanged between the list model and its views.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A cell value as views see it.
///
/// Role getters yield runtime values which the storage runtime converts
/// into `ItemData` for display; editors hand `ItemData` back and the
/// runtime converts it before the setter runs. `Record` mirrors a named
/// field literal in the UI description and is what [`append`] reads fields
/// from by role name.
///
/// ```
/// use rolelist::model::ItemData;
///
/// let row = ItemData::record([("name", ItemData::from("Ada")), ("age", ItemData::from(36))]);
/// assert_eq!(row.field("age").and_then(ItemData::as_int), Some(36));
///
/// let opaque = ItemData::new(7u8);
/// assert_eq!(opaque.downcast::<u8>(), Some(&7));
/// ```
///
/// [`append`]: crate::model::RoleListModel::append
#[derive(Debug, Clone, Default)]
pub enum ItemData {
    #[default]
    None,
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<ItemData>),
    Record(BTreeMap<String, ItemData>),
    /// Opaque host value. Equality is identity.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl ItemData {
    /// Wrap an arbitrary host value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::Custom(Arc::new(value))
    }

    /// Build a record from `(field, value)` pairs.
    pub fn record<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<ItemData>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Record(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn as_string(&self) -> Option<&str> {
        if let Self::String(s) = self { Some(s.as_str()) } else { None }
    }

    pub fn into_string(self) -> Option<String> {
        if let Self::String(s) = self { Some(s) } else { None }
    }

    pub fn as_int(&self) -> Option<i64> {
        if let Self::Int(n) = *self { Some(n) } else { None }
    }

    /// Integers widen to `f64`.
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Self::Float(x) => Some(x),
            Self::Int(n) => Some(n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(b) = *self { Some(b) } else { None }
    }

    pub fn as_list(&self) -> Option<&[ItemData]> {
        if let Self::List(items) = self { Some(items.as_slice()) } else { None }
    }

    pub fn as_record(&self) -> Option<&BTreeMap<String, ItemData>> {
        if let Self::Record(fields) = self { Some(fields) } else { None }
    }

    /// Look up one field of a record.
    pub fn field(&self, name: &str) -> Option<&ItemData> {
        self.as_record()?.get(name)
    }

    pub fn downcast<T: Any>(&self) -> Option<&T> {
        if let Self::Custom(value) = self { value.downcast_ref() } else { None }
    }
}

impl PartialEq for ItemData {
    fn eq(&self, other: &Self) -> bool {
        use ItemData::*;
        match (self, other) {
            (None, None) => true,
            (String(a), String(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Bool(a), Bool(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Record(a), Record(b)) => a == b,
            (Custom(a), Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Generic stringification, used by the implicit `"string"` role.
impl fmt::Display for ItemData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn joined<T>(
            f: &mut fmt::Formatter<'_>,
            open: &str,
            close: &str,
            parts: impl Iterator<Item = T>,
            mut each: impl FnMut(&mut fmt::Formatter<'_>, T) -> fmt::Result,
        ) -> fmt::Result {
            f.write_str(open)?;
            for (i, part) in parts.enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                each(f, part)?;
            }
            f.write_str(close)
        }

        match self {
            Self::None => f.write_str("nothing"),
            Self::String(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => joined(f, "[", "]", items.iter(), |f, item| write!(f, "{item}")),
            Self::Record(fields) => joined(f, "(", ")", fields.iter(), |f, (name, value)| {
                write!(f, "{name} = {value}")
            }),
            Self::Custom(_) => f.write_str("<custom>"),
        }
    }
}

macro_rules! item_data_from {
    ($($ty:ty => $variant:ident $(as $cast:ty)?),* $(,)?) => {
        $(
            impl From<$ty> for ItemData {
                fn from(value: $ty) -> Self {
                    Self::$variant((value $(as $cast)?).into())
                }
            }
        )*
    };
}

item_data_from! {
    String => String,
    &str => String,
    i64 => Int,
    i32 => Int as i64,
    f64 => Float,
    bool => Bool,
}

impl<T: Into<ItemData>> From<Vec<T>> for ItemData {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ItemData>> From<Option<T>> for ItemData {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_are_variant_strict() {
        let name = ItemData::from("Ada");
        assert_eq!(name.as_string(), Some("Ada"));
        assert_eq!(name.as_int(), None);
        assert_eq!(ItemData::Int(3).as_float(), Some(3.0));
        assert_eq!(ItemData::Bool(true).as_float(), None);
        assert!(ItemData::from(Option::<i64>::None).is_none());
    }

    #[test]
    fn test_custom_values_compare_by_identity() {
        #[derive(Debug, PartialEq)]
        struct Handle(u32);

        let handle = ItemData::new(Handle(9));
        assert_eq!(handle.downcast::<Handle>(), Some(&Handle(9)));
        assert!(handle.downcast::<u32>().is_none());
        assert_eq!(handle.clone(), handle);
        assert_ne!(ItemData::new(Handle(9)), handle);
    }

    #[test]
    fn test_record_fields() {
        let row = ItemData::record([("title", "Dune"), ("author", "Herbert")]);
        assert_eq!(row.field("title").and_then(ItemData::as_string), Some("Dune"));
        assert!(row.field("year").is_none());
        assert!(ItemData::Int(1).field("title").is_none());
    }

    #[test]
    fn test_stringification() {
        assert_eq!(ItemData::from(5).to_string(), "5");
        assert_eq!(ItemData::None.to_string(), "nothing");
        assert_eq!(ItemData::from(vec![1, 2]).to_string(), "[1, 2]");
        assert_eq!(
            ItemData::record([("a", 1), ("b", 2)]).to_string(),
            "(a = 1, b = 2)"
        );
    }
}
