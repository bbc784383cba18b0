//!Request parameters and the values they can hold.
//!
//!Parameters from a query string or a form body are either plain strings or
//!nested maps, as produced by keys like `user[name]=alice`. A `Value` keeps
//!track of which one it is, so merging two sets of parameters can be done
//!without guessing.

use std::fmt;
use std::iter::FromIterator;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use indexmap::map::{self, Entry, IndexMap};

use crate::utils;

///A single parameter value.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    ///A plain string value.
    Scalar(String),
    ///A nested set of parameters.
    Map(Parameters),
}

impl Value {
    ///Borrow the value as a string, if it's a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Value::Scalar(ref value) => Some(value),
            Value::Map(_) => None,
        }
    }

    ///Borrow the value as nested parameters, if it's a map.
    pub fn as_map(&self) -> Option<&Parameters> {
        match *self {
            Value::Scalar(_) => None,
            Value::Map(ref map) => Some(map),
        }
    }

    ///Check if the value is a nested map.
    pub fn is_map(&self) -> bool {
        self.as_map().is_some()
    }

    ///Check if the value counts as "set". Empty strings, `"0"` and empty maps
    ///are considered false, everything else is true.
    ///
    ///```
    ///use shiftway::Value;
    ///
    ///assert!(Value::from("1").is_truthy());
    ///assert!(Value::from("yes").is_truthy());
    ///assert!(!Value::from("0").is_truthy());
    ///assert!(!Value::from("").is_truthy());
    ///```
    pub fn is_truthy(&self) -> bool {
        match *self {
            Value::Scalar(ref value) => !value.is_empty() && value != "0",
            Value::Map(ref map) => !map.is_empty(),
        }
    }
}

impl<'a> From<&'a str> for Value {
    fn from(value: &'a str) -> Value {
        Value::Scalar(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::Scalar(value)
    }
}

impl From<Parameters> for Value {
    fn from(map: Parameters) -> Value {
        Value::Map(map)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Value {
                    Value::Scalar(value.to_string())
                }
            }
        )+
    }
}

impl_from_number!(i32, i64, u32, u64, usize);

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Scalar(ref value) => f.write_str(value),
            Value::Map(ref map) => write!(f, "{:?}", map),
        }
    }
}

///An ordered map of parameter names and values.
///
///The insertion order is kept, which makes the result of a merge predictable:
///keys that were already present stay where they were and new keys are
///appended.
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Parameters(IndexMap<String, Value>);

impl Parameters {
    ///Create an empty `Parameters`.
    pub fn new() -> Parameters {
        Parameters(IndexMap::new())
    }

    ///Decode a query string, like `a=1&b[c]=2`, into parameters. Bracketed
    ///keys become nested maps and `[]` appends to a list-like map.
    ///
    ///```
    ///use shiftway::Parameters;
    ///
    ///let parameters = Parameters::from_query("page=2&filter[tag]=rust");
    ///assert_eq!(parameters.get_str("page"), Some("2"));
    ///
    ///let filter = parameters.get("filter").and_then(|f| f.as_map()).unwrap();
    ///assert_eq!(filter.get_str("tag"), Some("rust"));
    ///```
    pub fn from_query(query: &str) -> Parameters {
        utils::parse_parameters(query)
    }

    ///Get a parameter value.
    pub fn get<K: AsRef<str> + ?Sized>(&self, key: &K) -> Option<&Value> {
        self.0.get(key.as_ref())
    }

    ///Get a parameter as a string, if it exists and isn't a nested map.
    pub fn get_str<K: AsRef<str> + ?Sized>(&self, key: &K) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    ///Get a mutable parameter value.
    pub fn get_mut<K: AsRef<str> + ?Sized>(&mut self, key: &K) -> Option<&mut Value> {
        self.0.get_mut(key.as_ref())
    }

    ///Returns true if a parameter with the given key exists.
    pub fn contains_key<K: AsRef<str> + ?Sized>(&self, key: &K) -> bool {
        self.0.contains_key(key.as_ref())
    }

    ///Insert a parameter. An existing parameter keeps its position.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<Value> where
        K: Into<String>, V: Into<Value>
    {
        self.0.insert(key.into(), value.into())
    }

    ///Remove a parameter and return it. The order of the remaining parameters
    ///is preserved.
    pub fn remove<K: AsRef<str> + ?Sized>(&mut self, key: &K) -> Option<Value> {
        self.0.shift_remove(key.as_ref())
    }

    ///Gets the given key's corresponding parameter in the map for in-place
    ///manipulation.
    pub fn entry<K: Into<String>>(&mut self, key: K) -> Entry<String, Value> {
        self.0.entry(key.into())
    }

    ///Try to parse an entry as `T`, if it exists. The error will be `None` if
    ///the entry does not exist or is a nested map, and `Some` if it does
    ///exist, but the parsing failed.
    ///
    ///```
    ///use shiftway::Parameters;
    ///
    ///let parameters = Parameters::from_query("age=42&name=alice");
    ///assert_eq!(parameters.parse::<_, u8>("age"), Ok(42));
    ///assert!(parameters.parse::<_, u8>("name").unwrap_err().is_some());
    ///assert!(parameters.parse::<_, u8>("height").unwrap_err().is_none());
    ///```
    pub fn parse<K: AsRef<str> + ?Sized, T: FromStr>(&self, key: &K) -> Result<T, Option<T::Err>> {
        if let Some(value) = self.get_str(key) {
            value.parse().map_err(Some)
        } else {
            Err(None)
        }
    }

    ///Try to parse an entry as `T`, if it exists, or return the default in
    ///`or`.
    pub fn parse_or<K: AsRef<str> + ?Sized, T: FromStr>(&self, key: &K, or: T) -> T {
        self.parse(key).unwrap_or(or)
    }

    ///Try to parse an entry as `T`, if it exists, or create a new one using
    ///`or_else`. The `or_else` function will receive the parsing error if the
    ///value existed, but was impossible to parse.
    pub fn parse_or_else<K, T, F>(&self, key: &K, or_else: F) -> T where
        K: AsRef<str> + ?Sized,
        T: FromStr,
        F: FnOnce(Option<T::Err>) -> T
    {
        self.parse(key).unwrap_or_else(or_else)
    }

    ///Merge `other` into these parameters, letting `other` win.
    ///
    ///Nested maps that exist on both sides are merged recursively, so keys
    ///that only exist in `self` survive. Any other conflict is settled by
    ///replacing the value in `self` with the one from `other`.
    pub fn merge(&mut self, other: Parameters) {
        for (key, value) in other.0 {
            match self.0.entry(key) {
                Entry::Vacant(entry) => {
                    entry.insert(value);
                },
                Entry::Occupied(mut entry) => match (entry.get_mut(), value) {
                    (&mut Value::Map(ref mut existing), Value::Map(incoming)) => existing.merge(incoming),
                    (existing, incoming) => *existing = incoming,
                },
            }
        }
    }

    ///Create a deep merge of GET and POST parameters, where POST parameters
    ///override GET parameters.
    ///
    ///```
    ///# #[macro_use] extern crate shiftway;
    ///# fn main() {
    ///use shiftway::Parameters;
    ///
    ///let get = parameters!{ "first" => { "first" => "a" }, "second" => "b" };
    ///let post = parameters!{ "first" => { "second" => "c" } };
    ///
    ///let merged = Parameters::merged(&get, &post);
    ///assert_eq!(merged, parameters!{
    ///    "first" => { "first" => "a", "second" => "c" },
    ///    "second" => "b"
    ///});
    ///# }
    ///```
    pub fn merged(get: &Parameters, post: &Parameters) -> Parameters {
        let mut merged = get.clone();
        merged.merge(post.clone());
        merged
    }

    ///Fold image button coordinates into one parameter per button.
    ///
    ///A form submitted with `<input type="image" name="save">` sends the
    ///click position as `save_x` and `save_y`. Each such pair becomes
    ///`save => { x, y }` in the result. Keys without a partner are left out.
    pub fn image_buttons(&self) -> Parameters {
        let mut buttons = Parameters::new();

        for (key, x) in &self.0 {
            let name = match key.strip_suffix("_x") {
                Some(name) if !name.is_empty() => name,
                _ => continue,
            };

            if let Some(y) = self.0.get(&format!("{}_y", name)) {
                let mut position = Parameters::new();
                position.insert("x", x.clone());
                position.insert("y", y.clone());
                buttons.insert(name, position);
            }
        }

        buttons
    }
}

impl Deref for Parameters {
    type Target = IndexMap<String, Value>;

    fn deref(&self) -> &IndexMap<String, Value> {
        &self.0
    }
}

impl DerefMut for Parameters {
    fn deref_mut(&mut self) -> &mut IndexMap<String, Value> {
        &mut self.0
    }
}

impl AsRef<IndexMap<String, Value>> for Parameters {
    fn as_ref(&self) -> &IndexMap<String, Value> {
        &self.0
    }
}

impl From<IndexMap<String, Value>> for Parameters {
    fn from(map: IndexMap<String, Value>) -> Parameters {
        Parameters(map)
    }
}

impl From<Parameters> for IndexMap<String, Value> {
    fn from(parameters: Parameters) -> IndexMap<String, Value> {
        parameters.0
    }
}

impl fmt::Debug for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl IntoIterator for Parameters {
    type IntoIter = map::IntoIter<String, Value>;
    type Item = (String, Value);

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type IntoIter = map::Iter<'a, String, Value>;
    type Item = (&'a String, &'a Value);

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Parameters {
    fn from_iter<T: IntoIterator<Item=(K, V)>>(iterable: T) -> Parameters {
        Parameters(iterable.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Parameters {
    fn extend<T: IntoIterator<Item=(K, V)>>(&mut self, iter: T) {
        self.0.extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())))
    }
}
