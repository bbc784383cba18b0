//!Some helpful macros.

///The `parameters!` macro builds a `Parameters` map from a literal tree of
///keys and values.
///
///Values may be anything that converts into a `Value`, and a braced block
///creates a nested map. This is mostly useful for passing GET and POST
///variables to a `Request` in tests and tools.
///
///```rust
///#[macro_use]
///extern crate shiftway;
///use shiftway::Value;
///
///# fn main() {
///let post = parameters! {
///    "title" => "Hello",
///    "page" => 2,
///    "author" => {
///        "name" => "alice",
///        "email" => "alice@example.com"
///    }
///};
///
///assert_eq!(post.get_str("title"), Some("Hello"));
///assert_eq!(post.get_str("page"), Some("2"));
///assert!(post.get("author").map(Value::is_map).unwrap_or(false));
///
///let empty = parameters!{};
///assert!(empty.is_empty());
///# }
///```
#[macro_export]
macro_rules! parameters {
    () => {
        $crate::Parameters::new()
    };
    ($($key:expr => $value:tt),+ $(,)*) => {
        {
            let mut parameters = $crate::Parameters::new();
            $(
                parameters.insert($key, $crate::__parameter_value!($value));
            )+
            parameters
        }
    };
}

//Internal stuff. Only meant to be used through `parameters!`.
#[doc(hidden)]
#[macro_export]
macro_rules! __parameter_value {
    ({$($inner:tt)*}) => {
        $crate::parameters!($($inner)*)
    };
    ($value:expr) => {
        $value
    };
}
