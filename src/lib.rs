//!An HTTP request value object for the routing layer of a web framework. It
//!takes the method, URL and parameters from the transport layer and adds the
//!things a router and its controllers need on top of them: method overrides,
//!merged request parameters, case-insensitive headers, client addresses from
//!trusted proxies, and shift-based route matching.
//!
//!A request is created once per inbound call and then handed down through
//!the route rules, each of them consuming a part of the path:
//!
//!```
//!#[macro_use]
//!extern crate shiftway;
//!use shiftway::{Method, Request};
//!
//!# fn main() {
//!let mut request = Request::new(
//!    "POST",
//!    "/admin/pages/edit/12",
//!    parameters!{},
//!    parameters!{ "_method" => "PUT", "title" => "About us" },
//!).with_headers(vec![("X-Requested-With", "XMLHttpRequest")]);
//!
//!//The form asked to be treated as a PUT request.
//!assert_eq!(request.http_method(), &Method::PUT);
//!assert!(request.is_ajax());
//!
//!//The admin module owns everything below `admin/pages`...
//!assert!(request.match_route("admin/pages", true).is_match());
//!
//!//...and the page controller picks the action from what's left.
//!let result = request.match_route("PUT $Action/$ID!", true);
//!assert_eq!(result.get("Action"), Some("edit"));
//!assert_eq!(result.get("ID"), Some("12"));
//!assert_eq!(request.remaining(), "");
//!
//!assert_eq!(request.request_var("title").and_then(|v| v.as_str()), Some("About us"));
//!# }
//!```
//!
//!The client address is taken from `X-Forwarded-For` when the peer is a
//!trusted proxy. Which peers are trusted is decided by the shared
//![`Config`][config], that can also be read from the environment.
//!
//![config]: config/struct.Config.html

#![cfg_attr(feature = "strict", deny(missing_docs))]
#![cfg_attr(feature = "strict", deny(warnings))]

pub use self::config::Config;
pub use self::error::{Error, Result};
pub use self::header::Headers;
pub use self::method::Method;
pub use self::net::TrustedProxies;
pub use self::parameters::{Parameters, Value};
pub use self::request::Request;
pub use self::router::{MatchResult, RouteParams, RouteState};

#[macro_use]
#[doc(hidden)]
pub mod macros;

mod utils;

pub mod config;
pub mod error;
pub mod header;
pub mod method;
pub mod net;
pub mod parameters;
pub mod request;
pub mod router;
