//!The request value object.

use std::borrow::Cow;
use std::sync::Arc;

use log::debug;
use phf::phf_set;

use crate::config::Config;
use crate::header::Headers;
use crate::method::{self, Method};
use crate::net;
use crate::parameters::{Parameters, Value};
use crate::router::{MatchResult, RouteParams, RouteState};

static MEDIA_EXTENSIONS: phf::Set<&'static str> = phf_set! {
    "css",
    "js",
    "jpg",
    "jpeg",
    "gif",
    "png",
    "bmp",
    "ico",
};

///An incoming request, as seen by the routing layer.
///
///The method, URL and parameters are fixed at construction. After that, only
///the headers and the route state can change: headers through
///`add_header` and `remove_header`, and the route state through
///`match_route` and `shift`.
///
///```
///# #[macro_use] extern crate shiftway;
///# fn main() {
///use shiftway::{Method, Request};
///
///let mut request = Request::new(
///    "POST",
///    "/articles/42?draft=1",
///    parameters!{},
///    parameters!{ "_method" => "DELETE" },
///);
///
///assert_eq!(request.http_method(), &Method::DELETE);
///assert_eq!(request.url(false), "articles/42");
///assert_eq!(request.get_var("draft").and_then(|v| v.as_str()), Some("1"));
///
///let result = request.match_route("DELETE articles/$ID!", true);
///assert_eq!(result.get("ID"), Some("42"));
///# }
///```
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    raw_method: String,
    url: String,
    query_string: Option<String>,
    extension: Option<String>,
    get_vars: Parameters,
    post_vars: Parameters,
    request_vars: Parameters,
    button_vars: Parameters,
    headers: Headers,
    body: Option<Vec<u8>>,
    peer_addr: Option<String>,
    config: Arc<Config>,
    route: RouteState,
}

impl Request {
    ///Create a request from the method, URL and parameters reported by the
    ///transport layer.
    ///
    ///The URL may contain a query string, which is kept for `url(true)` and
    ///decoded into the GET parameters for any key that `get_vars` doesn't
    ///already have. A fragment is ignored.
    pub fn new<G, P>(raw_method: &str, url: &str, get_vars: G, post_vars: P) -> Request where
        G: Into<Parameters>,
        P: Into<Parameters>
    {
        let mut get_vars = get_vars.into();
        let post_vars = post_vars.into();

        let url = match url.find('#') {
            Some(index) => &url[..index],
            None => url,
        };

        let (path, query_string) = match url.find('?') {
            Some(index) => (&url[..index], Some(&url[index + 1..]).filter(|q| !q.is_empty())),
            None => (url, None),
        };

        if let Some(query) = query_string {
            for (key, value) in Parameters::from_query(query) {
                if !get_vars.contains_key(&key) {
                    get_vars.insert(key, value);
                }
            }
        }

        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let normalized = segments.join("/");

        let mut extension = None;
        if let Some(last) = segments.pop() {
            match split_extension(last) {
                Some((stem, ext)) => {
                    extension = Some(ext.to_owned());
                    if !stem.is_empty() {
                        segments.push(stem);
                    }
                },
                None => segments.push(last),
            }
        }

        let resolved = method::resolve(raw_method, &get_vars, &post_vars);
        let request_vars = Parameters::merged(&get_vars, &post_vars);
        let button_vars = post_vars.image_buttons();

        Request {
            method: resolved,
            raw_method: raw_method.trim().to_ascii_uppercase(),
            url: normalized,
            query_string: query_string.map(ToOwned::to_owned),
            extension: extension,
            get_vars: get_vars,
            post_vars: post_vars,
            request_vars: request_vars,
            button_vars: button_vars,
            headers: Headers::new(),
            body: None,
            peer_addr: None,
            config: Arc::new(Config::default()),
            route: RouteState::new(&segments.join("/")),
        }
    }

    ///Add headers to the request, replacing any existing values.
    pub fn with_headers<I, N, V>(mut self, headers: I) -> Request where
        I: IntoIterator<Item=(N, V)>,
        N: AsRef<str>,
        V: Into<String>
    {
        self.headers.extend(headers);
        self
    }

    ///Set the raw request body.
    pub fn with_body<B: Into<Vec<u8>>>(mut self, body: B) -> Request {
        self.body = Some(body.into());
        self
    }

    ///Set the address of the peer that sent the request.
    pub fn with_peer_addr<A: Into<String>>(mut self, peer_addr: A) -> Request {
        self.peer_addr = Some(peer_addr.into());
        self
    }

    ///Use a shared configuration.
    pub fn with_config(mut self, config: Arc<Config>) -> Request {
        self.config = config;
        self
    }

    ///The effective method, after any override.
    pub fn http_method(&self) -> &Method {
        &self.method
    }

    ///The method as it was sent, in upper case.
    pub fn raw_method(&self) -> &str {
        &self.raw_method
    }

    ///Check if the effective method is GET.
    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    ///Check if the effective method is POST.
    pub fn is_post(&self) -> bool {
        self.method == Method::POST
    }

    ///Check if the effective method is PUT.
    pub fn is_put(&self) -> bool {
        self.method == Method::PUT
    }

    ///Check if the effective method is DELETE.
    pub fn is_delete(&self) -> bool {
        self.method == Method::DELETE
    }

    ///Check if the effective method is HEAD.
    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }

    ///Check if the effective method is OPTIONS.
    pub fn is_options(&self) -> bool {
        self.method == Method::OPTIONS
    }

    ///The normalized path, without leading or trailing slashes. The query
    ///string is appended if `include_query` is `true` and there is one.
    ///
    ///```
    ///use shiftway::{Parameters, Request};
    ///
    ///let request = Request::new("GET", "/home?test=1", Parameters::new(), Parameters::new());
    ///assert_eq!(request.url(true), "home?test=1");
    ///assert_eq!(request.url(false), "home");
    ///```
    pub fn url(&self, include_query: bool) -> Cow<str> {
        match self.query_string {
            Some(ref query) if include_query => format!("{}?{}", self.url, query).into(),
            _ => Cow::Borrowed(&self.url),
        }
    }

    ///The raw query string, without the `?`.
    pub fn query_string(&self) -> Option<&str> {
        self.query_string.as_ref().map(|q| &q[..])
    }

    ///The file extension of the last path segment, if any.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_ref().map(|e| &e[..])
    }

    ///Check if the path points to a static asset, like a stylesheet, a
    ///script or an image.
    pub fn is_media(&self) -> bool {
        self.extension.as_ref()
            .map_or(false, |ext| MEDIA_EXTENSIONS.contains(&ext.to_ascii_lowercase()[..]))
    }

    ///The GET parameters.
    pub fn get_vars(&self) -> &Parameters {
        &self.get_vars
    }

    ///The POST parameters.
    pub fn post_vars(&self) -> &Parameters {
        &self.post_vars
    }

    ///The GET and POST parameters, merged. POST parameters take priority.
    pub fn request_vars(&self) -> &Parameters {
        &self.request_vars
    }

    ///Get a GET parameter.
    pub fn get_var(&self, name: &str) -> Option<&Value> {
        self.get_vars.get(name)
    }

    ///Get a POST parameter.
    pub fn post_var(&self, name: &str) -> Option<&Value> {
        self.post_vars.get(name)
    }

    ///Get a parameter from the merged GET and POST parameters.
    pub fn request_var(&self, name: &str) -> Option<&Value> {
        self.request_vars.get(name)
    }

    ///Image button coordinates from the POST parameters, as `name => {x, y}`.
    pub fn button_vars(&self) -> &Parameters {
        &self.button_vars
    }

    ///The request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    ///Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    ///Add a header, replacing any previous value with the same name.
    pub fn add_header<V: Into<String>>(&mut self, name: &str, value: V) {
        self.headers.insert(name, value);
    }

    ///Remove a header and return its value.
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        self.headers.remove(name)
    }

    ///Check if this is a background request.
    ///
    ///An `ajax` parameter decides, if present. Otherwise it depends on the
    ///`X-Requested-With` header.
    pub fn is_ajax(&self) -> bool {
        match self.request_vars.get("ajax") {
            Some(ajax) => ajax.is_truthy(),
            None => self.headers.is_xml_http_request(),
        }
    }

    ///The raw request body.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_ref().map(|body| &body[..])
    }

    ///The address of the peer that sent the request.
    pub fn peer_addr(&self) -> Option<&str> {
        self.peer_addr.as_ref().map(|addr| &addr[..])
    }

    ///The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    ///The client address.
    ///
    ///The forwarded address header is used if it's present and the peer is a
    ///trusted proxy. The peer address is used otherwise.
    ///
    ///```
    ///use shiftway::{Parameters, Request};
    ///
    ///let request = Request::new("GET", "/", Parameters::new(), Parameters::new())
    ///    .with_peer_addr("10.51.0.68")
    ///    .with_headers(vec![("X-Forwarded-For", "80.79.208.21, 149.126.76.1")]);
    ///
    ///assert_eq!(request.ip(), Some("80.79.208.21"));
    ///```
    pub fn ip(&self) -> Option<&str> {
        let peer = self.peer_addr.as_ref().and_then(|addr| net::parse_peer(addr));

        if self.config.trusted_proxies.trusts(peer) {
            if let Some(value) = self.headers.get(&self.config.forwarded_header) {
                let address = if self.config.prefer_public_address {
                    net::public_ip_from_header_value(value)
                } else {
                    net::ip_from_header_value(value)
                };

                match address {
                    Some(address) => {
                        debug!("client address {} from {}: {:?}", address, self.config.forwarded_header, value);
                        return Some(address);
                    },
                    None => debug!("no address in {}: {:?}", self.config.forwarded_header, value),
                }
            }
        } else if self.headers.contains(&self.config.forwarded_header) {
            debug!("ignoring {} from untrusted peer {:?}", self.config.forwarded_header, self.peer_addr);
        }

        self.peer_addr()
    }

    ///Try to match a route pattern against the unconsumed part of the path.
    ///See the `router` module for the pattern syntax.
    pub fn match_route(&mut self, pattern: &str, shift: bool) -> MatchResult {
        self.route.match_pattern(&self.method, pattern, shift)
    }

    ///The unconsumed part of the path.
    pub fn remaining(&self) -> String {
        self.route.remaining()
    }

    ///All values captured by route matches so far.
    pub fn route_params(&self) -> &RouteParams {
        self.route.params()
    }

    ///The values captured by the most recent route match.
    pub fn latest_params(&self) -> &RouteParams {
        self.route.latest_params()
    }

    ///Get a value captured by any route match so far.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.route.param(name)
    }

    ///Get a value captured by the most recent route match.
    pub fn latest_param(&self, name: &str) -> Option<&str> {
        self.route.latest_param(name)
    }

    ///Shift off up to `count` path segments and return them.
    pub fn shift(&mut self, count: usize) -> &[String] {
        self.route.shift(count)
    }

    ///Check if the last shifting match looked at all of the remaining path.
    pub fn all_parsed(&self) -> bool {
        self.route.all_parsed()
    }

    ///The route state.
    pub fn route_state(&self) -> &RouteState {
        &self.route
    }
}

//Splits `name.ext` where the extension starts with a letter and is
//alphanumeric.
fn split_extension(segment: &str) -> Option<(&str, &str)> {
    let dot = segment.rfind('.')?;
    let extension = &segment[dot + 1..];

    let mut chars = extension.chars();
    let valid = chars.next().map_or(false, |c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric());

    if valid {
        Some((&segment[..dot], extension))
    } else {
        None
    }
}
