//!Request headers.
//!
//!Header names are case-insensitive and are stored in a canonical form, where
//!each dash separated word is capitalized (`X-Requested-With`). Underscores
//!are treated as dashes, since CGI style environments tend to report headers
//!as `X_REQUESTED_WITH`.

use std::fmt;
use std::iter::FromIterator;

use indexmap::IndexMap;
use unicase::UniCase;

///The header used by JavaScript libraries to mark background requests.
pub const REQUESTED_WITH: &str = "X-Requested-With";

///The value of `X-Requested-With` for background requests.
pub const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

///A case-insensitive collection of header names and values.
///
///```
///use shiftway::Headers;
///
///let mut headers = Headers::new();
///headers.insert("content-type", "text/html");
///
///assert_eq!(headers.get("Content-Type"), Some("text/html"));
///assert_eq!(headers.get("CONTENT_TYPE"), Some("text/html"));
///assert_eq!(headers.iter().next(), Some(("Content-Type", "text/html")));
///```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Headers(IndexMap<UniCase<String>, String>);

impl Headers {
    ///Create an empty set of headers.
    pub fn new() -> Headers {
        Headers::default()
    }

    ///Insert a header, replacing any previous value with the same name. The
    ///previous value is returned.
    pub fn insert<N: AsRef<str>, V: Into<String>>(&mut self, name: N, value: V) -> Option<String> {
        self.0.insert(key(name.as_ref()), value.into())
    }

    ///Get the value of a header.
    pub fn get<N: AsRef<str>>(&self, name: N) -> Option<&str> {
        self.0.get(&key(name.as_ref())).map(|value| &value[..])
    }

    ///Remove a header and return its value.
    pub fn remove<N: AsRef<str>>(&mut self, name: N) -> Option<String> {
        self.0.shift_remove(&key(name.as_ref()))
    }

    ///Check if a header is present.
    pub fn contains<N: AsRef<str>>(&self, name: N) -> bool {
        self.0.contains_key(&key(name.as_ref()))
    }

    ///Check if the headers mark the request as a background request, through
    ///`X-Requested-With: XMLHttpRequest`. The value is compared exactly.
    pub fn is_xml_http_request(&self) -> bool {
        self.get(REQUESTED_WITH) == Some(XML_HTTP_REQUEST)
    }

    ///The number of headers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    ///Check if there are no headers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    ///Iterate over the canonical header names and their values, in insertion
    ///order.
    pub fn iter(&self) -> impl Iterator<Item=(&str, &str)> {
        self.0.iter().map(|(name, value)| (&name[..], &value[..]))
    }
}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<N: AsRef<str>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item=(N, V)>>(iterable: T) -> Headers {
        let mut headers = Headers::new();
        headers.extend(iterable);
        headers
    }
}

impl<N: AsRef<str>, V: Into<String>> Extend<(N, V)> for Headers {
    fn extend<T: IntoIterator<Item=(N, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

//Produces the canonical name, wrapped for case-insensitive lookups.
fn key(name: &str) -> UniCase<String> {
    UniCase::new(canonical_name(name))
}

///Convert a header name to its canonical form.
///
///```
///use shiftway::header::canonical_name;
///
///assert_eq!(canonical_name("x-forwarded-for"), "X-Forwarded-For");
///assert_eq!(canonical_name("HTTP_ACCEPT"), "Http-Accept");
///```
pub fn canonical_name(name: &str) -> String {
    let mut canonical = String::with_capacity(name.len());
    let mut word_start = true;

    for c in name.trim().chars() {
        if c == '-' || c == '_' {
            canonical.push('-');
            word_start = true;
        } else if word_start {
            canonical.extend(c.to_uppercase());
            word_start = false;
        } else {
            canonical.extend(c.to_lowercase());
        }
    }

    canonical
}

#[cfg(test)]
mod test {
    use super::Headers;

    #[test]
    fn case_insensitive_names() {
        let mut headers = Headers::new();
        headers.insert("X-Forwarded-For", "10.0.0.1");

        assert_eq!(headers.get("x-forwarded-for"), Some("10.0.0.1"));
        assert_eq!(headers.get("X-FORWARDED-FOR"), Some("10.0.0.1"));
        assert_eq!(headers.get("x_forwarded_for"), Some("10.0.0.1"));
        assert!(headers.contains("X-Forwarded-for"));
        assert_eq!(headers.get("X-Forwarded-Host"), None);
    }

    #[test]
    fn overwrite_keeps_one_entry() {
        let mut headers = Headers::new();
        assert_eq!(headers.insert("accept", "text/html"), None);
        assert_eq!(headers.insert("ACCEPT", "application/json"), Some("text/html".to_owned()));

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Accept"), Some("application/json"));
    }

    #[test]
    fn remove_and_order() {
        let mut headers: Headers = vec![("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();
        assert_eq!(headers.remove("B"), Some("2".to_owned()));
        assert!(headers.get("b").is_none());

        let names: Vec<_> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn xml_http_request() {
        let mut headers = Headers::new();
        assert!(!headers.is_xml_http_request());

        headers.insert("x-requested-with", "xmlhttprequest");
        assert!(!headers.is_xml_http_request());

        headers.insert("X-Requested-With", "XMLHttpRequest");
        assert!(headers.is_xml_http_request());
    }
}
