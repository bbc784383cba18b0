//!Route rules and path matching.
//!
//!A route rule is a pattern that is matched against the part of the request
//!path that hasn't been consumed yet. Nested controllers can then match their
//!own rules against what's left, after the outer rules have shifted their
//!segments off:
//!
//!```
//!use shiftway::{Parameters, Request};
//!
//!let mut request = Request::new("GET", "admin/crm/add", Parameters::new(), Parameters::new());
//!
//!//The outer controller owns everything below `admin/crm`.
//!assert!(request.match_route("admin/crm", true).is_match());
//!assert_eq!(request.remaining(), "add");
//!
//!//The inner controller picks the action.
//!let result = request.match_route("$Action", true);
//!assert_eq!(result.get("Action"), Some("add"));
//!assert!(request.all_parsed());
//!```
//!
//!Patterns are made of tokens, separated by `/`:
//!
//! * `name` is a literal segment that has to match exactly.
//! * `$Name` captures one segment as `Name`. It's allowed to be missing.
//! * `$Name!` captures one segment, and the pattern fails if it's missing.
//! * `$*` captures the rest of the path as one value, named `*`.
//! * `$@` captures each remaining segment as `$1`, `$2`, and so on.
//!
//!A pattern may also begin with an HTTP method name in upper case, like
//!`POST save/$ID`, followed by whitespace. Only the standard method names
//!(`GET`, `POST`, `PUT`, `DELETE`, `HEAD`, `OPTIONS`, `PATCH`, `TRACE` and
//!`CONNECT`) are recognized there, so `CRM add` is two literal tokens. A
//!`//` marks how many of the tokens should be shifted off:
//!`admin//$Action` captures `$Action`, but only consumes `admin`. Wildcards
//!capture their segments without consuming them.

pub use self::pattern::{Pattern, Token};
pub use self::route_state::{MatchResult, RouteParams, RouteState};

mod pattern;
mod route_state;

///Check if a pattern would match when nothing remains of the path.
///
///```
///use shiftway::router::is_empty_pattern;
///
///assert!(is_empty_pattern(""));
///assert!(is_empty_pattern("$Action/$ID"));
///assert!(!is_empty_pattern("$Action!"));
///assert!(!is_empty_pattern("admin"));
///```
pub fn is_empty_pattern(pattern: &str) -> bool {
    Pattern::parse(pattern).matches_empty()
}
