//!Settings for how requests are interpreted.

use std::env;

use crate::error::{Error, Result};
use crate::net::TrustedProxies;

///Environment variable with the trusted proxies, as read by `Config::from_env`.
pub const TRUSTED_PROXY_IPS: &str = "SHIFTWAY_TRUSTED_PROXY_IPS";

///Environment variable with the forwarded address header name, as read by
///`Config::from_env`.
pub const TRUSTED_PROXY_IP_HEADER: &str = "SHIFTWAY_TRUSTED_PROXY_IP_HEADER";

///The default forwarded address header.
pub const DEFAULT_FORWARDED_HEADER: &str = "X-Forwarded-For";

///Request interpretation settings.
///
///All fields are public and can be set directly, leaving the rest to the
///defaults:
///
///```
///use shiftway::{Config, TrustedProxies};
///
///let config = Config {
///    trusted_proxies: "10.0.0.0/8".parse().unwrap(),
///    ..Config::default()
///};
///
///assert_eq!(config.forwarded_header, "X-Forwarded-For");
///assert!(!config.prefer_public_address);
///```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Config {
    ///The header that carries the client address chain. Default is
    ///`X-Forwarded-For`.
    pub forwarded_header: String,

    ///The peers that are allowed to set the forwarded address header. Default
    ///is to trust every peer.
    pub trusted_proxies: TrustedProxies,

    ///Skip private addresses in the forwarded address header, instead of
    ///taking the first entry as it is. Default is `false`.
    pub prefer_public_address: bool,
}

impl Config {
    ///Create a configuration with the default settings.
    pub fn new() -> Config {
        Config::default()
    }

    ///Read settings from `SHIFTWAY_TRUSTED_PROXY_IPS` and
    ///`SHIFTWAY_TRUSTED_PROXY_IP_HEADER`. Missing variables leave the
    ///defaults in place.
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    ///Read settings through a variable lookup function. This is what
    ///`from_env` uses, with the process environment as source.
    ///
    ///```
    ///use shiftway::{Config, TrustedProxies};
    ///
    ///let config = Config::from_lookup(|name| match name {
    ///    "SHIFTWAY_TRUSTED_PROXY_IPS" => Some("none".into()),
    ///    _ => None,
    ///}).unwrap();
    ///
    ///assert_eq!(config.trusted_proxies, TrustedProxies::None);
    ///```
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Config> {
        let mut config = Config::default();

        if let Some(proxies) = lookup(TRUSTED_PROXY_IPS) {
            config.trusted_proxies = proxies.parse()?;
        }

        if let Some(header) = lookup(TRUSTED_PROXY_IP_HEADER) {
            let header = header.trim();
            if header.is_empty() {
                return Err(Error::EmptyHeaderName);
            }
            config.forwarded_header = header.to_owned();
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            forwarded_header: DEFAULT_FORWARDED_HEADER.to_owned(),
            trusted_proxies: TrustedProxies::default(),
            prefer_public_address: false,
        }
    }
}
