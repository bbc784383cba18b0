//!HTTP method resolution.
//!
//!HTML forms can only be sent as GET or POST, so a POST request may ask to be
//!treated as another method by including a `_method` field in its body:
//!
//!```text
//!POST /articles/42
//!_method=DELETE
//!```
//!
//!The override is only read from the POST body, never from the query string,
//!so a link can't be crafted to make a GET request act as a DELETE request.

use log::{debug, warn};
use phf::phf_set;

pub use http::Method;

use crate::parameters::Parameters;

///The name of the parameter that carries a method override.
pub const OVERRIDE_KEY: &str = "_method";

static OVERRIDABLE: phf::Set<&'static str> = phf_set! {
    "GET",
    "POST",
    "PUT",
    "DELETE",
    "HEAD",
    "OPTIONS",
};

///Check if a method, in upper case, is accepted as an override value.
pub fn is_overridable(method: &str) -> bool {
    OVERRIDABLE.contains(method)
}

///Parse a method from the transport layer. The name is upper cased first and
///anything that isn't a valid method token is treated as GET.
///
///```
///use shiftway::method::{parse_method, Method};
///
///assert_eq!(parse_method("post"), Method::POST);
///assert_eq!(parse_method("PROPFIND").as_str(), "PROPFIND");
///assert_eq!(parse_method(""), Method::GET);
///```
pub fn parse_method(raw_method: &str) -> Method {
    let upper = raw_method.trim().to_ascii_uppercase();
    match Method::from_bytes(upper.as_bytes()) {
        Ok(method) => method,
        Err(_) => {
            warn!("invalid HTTP method {:?}, treating it as GET", raw_method);
            Method::GET
        }
    }
}

///Find the effective method of a request.
///
///The raw method is used, unless it's POST and the POST variables contain an
///overridable `_method` value. The value is case-insensitive. Unknown values
///and overrides in GET variables are ignored.
///
///```
///# #[macro_use] extern crate shiftway;
///# fn main() {
///use shiftway::method::{resolve, Method};
///
///let method = resolve("POST", &parameters!{}, &parameters!{ "_method" => "put" });
///assert_eq!(method, Method::PUT);
///
///let method = resolve("POST", &parameters!{ "_method" => "DELETE" }, &parameters!{});
///assert_eq!(method, Method::POST);
///# }
///```
pub fn resolve(raw_method: &str, get_vars: &Parameters, post_vars: &Parameters) -> Method {
    let method = parse_method(raw_method);

    if method != Method::POST {
        if get_vars.contains_key(OVERRIDE_KEY) || post_vars.contains_key(OVERRIDE_KEY) {
            debug!("ignoring method override in a {} request", method);
        }
        return method;
    }

    let requested = match post_vars.get_str(OVERRIDE_KEY) {
        Some(requested) => requested.trim().to_ascii_uppercase(),
        None => {
            if get_vars.contains_key(OVERRIDE_KEY) {
                debug!("ignoring method override from the query string");
            }
            return method;
        }
    };

    if !is_overridable(&requested) {
        debug!("ignoring unknown method override {:?}", requested);
        return method;
    }

    Method::from_bytes(requested.as_bytes()).unwrap_or(method)
}
