use indexmap::IndexMap;
use log::{trace, warn};

use crate::method::Method;
use crate::router::pattern::{Pattern, Token};

///Named values captured from the path.
pub type RouteParams = IndexMap<String, String>;

///The result of matching a route pattern.
///
///A match without any captured values is kept apart from a failed match, so
///there is no need to inspect the values to know if the pattern matched.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MatchResult {
    ///The pattern didn't match.
    NoMatch,
    ///The pattern matched, but didn't capture any values.
    Matched,
    ///The pattern matched and captured these values.
    MatchedWith(RouteParams),
}

impl MatchResult {
    ///Check if the pattern matched, with or without captured values.
    pub fn is_match(&self) -> bool {
        match *self {
            MatchResult::NoMatch => false,
            MatchResult::Matched | MatchResult::MatchedWith(_) => true,
        }
    }

    ///The captured values, if there were any.
    pub fn params(&self) -> Option<&RouteParams> {
        match *self {
            MatchResult::MatchedWith(ref params) => Some(params),
            MatchResult::NoMatch | MatchResult::Matched => None,
        }
    }

    ///Get a captured value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params().and_then(|params| params.get(name)).map(|value| &value[..])
    }
}

///A cursor over the segments of a path.
///
///Route rules are matched against the segments that haven't been consumed
///yet. A successful match may shift its segments off, so that nested rules
///only see the rest of the path:
///
///```
///use shiftway::Method;
///use shiftway::router::{MatchResult, RouteState};
///
///let mut state = RouteState::new("admin/crm/edit/5");
///
///assert_eq!(state.match_pattern(&Method::GET, "admin/crm", true), MatchResult::Matched);
///assert_eq!(state.remaining(), "edit/5");
///
///let result = state.match_pattern(&Method::GET, "$Action/$ID", true);
///assert_eq!(result.get("Action"), Some("edit"));
///assert_eq!(result.get("ID"), Some("5"));
///assert_eq!(state.remaining(), "");
///```
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct RouteState {
    segments: Vec<String>,
    cursor: usize,
    unshifted_parsed: usize,
    params: RouteParams,
    latest_params: RouteParams,
}

impl RouteState {
    ///Create a route state for a path. Empty segments are ignored.
    pub fn new(path: &str) -> RouteState {
        RouteState {
            segments: path.split('/').filter(|s| !s.is_empty()).map(ToOwned::to_owned).collect(),
            ..RouteState::default()
        }
    }

    ///All segments of the path, including those that have been shifted off.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    ///The segments that haven't been shifted off yet.
    pub fn remaining_segments(&self) -> &[String] {
        &self.segments[self.cursor..]
    }

    ///The unconsumed part of the path, without leading or trailing slashes.
    pub fn remaining(&self) -> String {
        self.remaining_segments().join("/")
    }

    ///The number of segments that have been shifted off.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    ///Check if every segment has been shifted off.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.segments.len()
    }

    ///All values captured so far. Later matches overwrite earlier values with
    ///the same name.
    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    ///The values captured by the most recent successful match.
    pub fn latest_params(&self) -> &RouteParams {
        &self.latest_params
    }

    ///Get a value captured by any of the matches so far.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|value| &value[..])
    }

    ///Get a value captured by the most recent successful match.
    pub fn latest_param(&self, name: &str) -> Option<&str> {
        self.latest_params.get(name).map(|value| &value[..])
    }

    ///Shift off up to `count` segments and return them.
    pub fn shift(&mut self, count: usize) -> &[String] {
        let start = self.cursor;
        self.cursor = (self.cursor + count).min(self.segments.len());
        &self.segments[start..self.cursor]
    }

    ///Check if the remaining segments were all looked at by the last shifting
    ///match, even if some of them were left in place by a wildcard or a `//`
    ///marker.
    pub fn all_parsed(&self) -> bool {
        self.remaining_segments().len() <= self.unshifted_parsed
    }

    ///Try to match a route pattern against the remaining segments.
    ///
    ///The pattern may match the beginning of the remaining path. Captured
    ///values are recorded on success and the matched segments are shifted off
    ///if `shift` is `true`. A failed match leaves the state untouched.
    pub fn match_pattern(&mut self, method: &Method, pattern: &str, shift: bool) -> MatchResult {
        let compiled = Pattern::parse(pattern);

        if let Some(required) = compiled.method {
            if required != method.as_str() {
                trace!("pattern {:?} requires {}, not {}", pattern, required, method);
                return MatchResult::NoMatch;
            }
        }

        let remaining = &self.segments[self.cursor..];

        if compiled.is_empty() && !remaining.is_empty() {
            return MatchResult::NoMatch;
        }

        let mut captured = RouteParams::new();
        let mut parsed = compiled.tokens.len();

        for (index, token) in compiled.tokens.iter().enumerate() {
            let segment = remaining.get(index);

            match *token {
                Token::Static(expected) => if segment.map(|s| &s[..]) != Some(expected) {
                    trace!("pattern {:?} doesn't match {:?}", pattern, remaining.join("/"));
                    return MatchResult::NoMatch;
                },
                Token::Variable { name, required } => match segment {
                    Some(value) => if !name.is_empty() {
                        captured.insert(name.to_owned(), value.clone());
                    },
                    None if required => {
                        trace!("pattern {:?} is missing the required ${}", pattern, name);
                        return MatchResult::NoMatch;
                    },
                    None => {},
                },
                Token::Sequence | Token::Numbered => {
                    if index + 1 < compiled.tokens.len() {
                        warn!("everything after the wildcard in {:?} is ignored", pattern);
                    }

                    let rest = remaining.get(index..).unwrap_or(&[]);
                    if *token == Token::Sequence {
                        if !rest.is_empty() {
                            captured.insert("*".to_owned(), rest.join("/"));
                        }
                    } else {
                        for (position, value) in rest.iter().enumerate() {
                            captured.insert(format!("${}", position + 1), value.clone());
                        }
                    }

                    parsed = index + rest.len();
                    break;
                },
            }
        }

        if shift {
            let shift_count = compiled.shift_count();
            self.shift(shift_count);
            self.unshifted_parsed = parsed.saturating_sub(shift_count);
        }

        trace!("pattern {:?} matched with {:?}, {:?} remains", pattern, captured, self.remaining());

        for (name, value) in &captured {
            self.params.insert(name.clone(), value.clone());
        }
        self.latest_params = captured.clone();

        if captured.is_empty() {
            MatchResult::Matched
        } else {
            MatchResult::MatchedWith(captured)
        }
    }
}

#[cfg(test)]
mod test {
    use super::{MatchResult, RouteState};
    use crate::method::Method;

    fn init_log() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    macro_rules! check {
        ($state:ident.match($pattern:expr) => None) => {
            assert_eq!($state.match_pattern(&Method::GET, $pattern, true), MatchResult::NoMatch, "{:?}", $pattern);
        };
        ($state:ident.match($pattern:expr) => Some, $remaining:expr) => {
            assert_eq!($state.match_pattern(&Method::GET, $pattern, true), MatchResult::Matched, "{:?}", $pattern);
            assert_eq!($state.remaining(), $remaining);
        };
        ($state:ident.match($pattern:expr) => {$($key:expr => $value:expr),+}, $remaining:expr) => {
            {
                let result = $state.match_pattern(&Method::GET, $pattern, true);
                assert!(result.is_match(), "{:?} should match", $pattern);
                let params = result.params().expect("captured values");
                $(assert_eq!(params.get($key).map(|v| &v[..]), Some($value));)+
                assert_eq!($state.remaining(), $remaining);
            }
        };
    }

    #[test]
    fn shift_matches() {
        init_log();
        let mut state = RouteState::new("admin/crm/add");

        check!(state.match("admin/crm") => Some, "add");
        check!(state.match("add") => Some, "");
        assert!(state.is_exhausted());
    }

    #[test]
    fn failed_matches_change_nothing() {
        init_log();
        let mut state = RouteState::new("admin/crm/add");
        check!(state.match("admin") => Some, "crm/add");

        check!(state.match("admin") => None);
        check!(state.match("crm/edit") => None);
        check!(state.match("crm/add/$ID!") => None);
        check!(state.match("") => None);
        assert_eq!(state.cursor(), 1);
        assert_eq!(state.remaining(), "crm/add");
    }

    #[test]
    fn match_without_shift() {
        let mut state = RouteState::new("blog/2024/hello");

        let result = state.match_pattern(&Method::GET, "blog/$Year", false);
        assert_eq!(result.get("Year"), Some("2024"));
        assert_eq!(state.remaining(), "blog/2024/hello");
        assert_eq!(state.param("Year"), Some("2024"));
    }

    #[test]
    fn variables() {
        let mut state = RouteState::new("product/42/edit");

        check!(state.match("product/$ID/$Action") => {"ID" => "42", "Action" => "edit"}, "");
        assert_eq!(state.param("ID"), Some("42"));
        assert_eq!(state.latest_param("Action"), Some("edit"));
    }

    #[test]
    fn optional_and_required_variables() {
        let mut state = RouteState::new("product");
        assert_eq!(state.match_pattern(&Method::GET, "product/$ID", false), MatchResult::Matched);
        check!(state.match("product/$ID!") => None);

        let mut state = RouteState::new("product/7");
        check!(state.match("product/$ID!") => {"ID" => "7"}, "");
    }

    #[test]
    fn unnamed_variables_are_discarded() {
        let mut state = RouteState::new("a/b/c");
        check!(state.match("a/$/c") => Some, "");
    }

    #[test]
    fn params_accumulate() {
        let mut state = RouteState::new("shop/12/item/34");

        check!(state.match("shop/$ID") => {"ID" => "12"}, "item/34");
        check!(state.match("item/$ID") => {"ID" => "34"}, "");
        check!(state.match("$Action") => Some, "");

        assert_eq!(state.param("ID"), Some("34"));
        assert_eq!(state.params().len(), 1);
        assert!(state.latest_params().is_empty());
    }

    #[test]
    fn sequence_wildcard() {
        let mut state = RouteState::new("files/docs/2024/report.pdf");

        check!(state.match("files/$*") => {"*" => "docs/2024/report.pdf"}, "docs/2024/report.pdf");
        assert!(state.all_parsed());

        let mut state = RouteState::new("files");
        check!(state.match("files/$*") => Some, "");
    }

    #[test]
    fn numbered_wildcard() {
        let mut state = RouteState::new("api/v1/users/7");

        check!(state.match("api/$@") => {"$1" => "v1", "$2" => "users", "$3" => "7"}, "v1/users/7");
        assert!(state.all_parsed());
    }

    #[test]
    fn shift_point() {
        let mut state = RouteState::new("admin/edit/5");

        check!(state.match("admin//$Action/$ID") => {"Action" => "edit", "ID" => "5"}, "edit/5");
        assert!(state.all_parsed());

        check!(state.match("edit") => Some, "5");
        assert!(!state.all_parsed());
    }

    #[test]
    fn required_method() {
        let mut state = RouteState::new("save/3");

        assert_eq!(state.match_pattern(&Method::POST, "GET save/$ID", true), MatchResult::NoMatch);
        assert_eq!(state.remaining(), "save/3");

        let result = state.match_pattern(&Method::GET, "GET save/$ID", true);
        assert_eq!(result.get("ID"), Some("3"));
        assert_eq!(state.remaining(), "");
    }

    #[test]
    fn upper_case_literals() {
        let mut state = RouteState::new("CRM/add");
        assert_eq!(state.match_pattern(&Method::POST, "CRM add", true), MatchResult::Matched);
        assert_eq!(state.remaining(), "");
    }

    #[test]
    fn empty_pattern() {
        let mut state = RouteState::new("");
        check!(state.match("") => Some, "");
        check!(state.match("$Action") => Some, "");

        let mut state = RouteState::new("home");
        check!(state.match("") => None);
    }

    #[test]
    fn empty_pattern_resets_latest_params() {
        let mut state = RouteState::new("shop/12");

        check!(state.match("shop/$ID") => {"ID" => "12"}, "");
        check!(state.match("") => Some, "");

        assert!(state.latest_params().is_empty());
        assert_eq!(state.latest_param("ID"), None);
        assert_eq!(state.param("ID"), Some("12"));
        assert!(state.all_parsed());
    }

    #[test]
    fn manual_shift() {
        let mut state = RouteState::new("a/b/c");
        assert_eq!(state.shift(2), &["a".to_owned(), "b".to_owned()][..]);
        assert_eq!(state.shift(5), &["c".to_owned()][..]);
        assert!(state.shift(1).is_empty());
        assert_eq!(state.cursor(), 3);
    }
}
