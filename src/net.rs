//!Client address resolution.
//!
//!A request that has passed through one or more proxies carries the address
//!chain in a header like `X-Forwarded-For`, with the client first and each
//!proxy appended after it:
//!
//!```text
//!X-Forwarded-For: 80.79.208.21, 149.126.76.1, 10.51.0.68
//!```
//!
//!Anyone can send this header, so it should only be read when the peer is a
//!proxy that is known to set it. That's what `TrustedProxies` is for.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use ipnet::IpNet;

use crate::error::{Error, Result};

///Pick the client address from a forwarded address header.
///
///The first non-empty entry is returned as it is, without any validation,
///since it's the address closest to the client. A value without any entries
///gives `None`.
///
///```
///use shiftway::net::ip_from_header_value;
///
///assert_eq!(ip_from_header_value("80.79.208.21, 149.126.76.1, 10.51.0.68"), Some("80.79.208.21"));
///assert_eq!(ip_from_header_value("10.51.0.49"), Some("10.51.0.49"));
///assert_eq!(ip_from_header_value(" , ,"), None);
///```
pub fn ip_from_header_value(value: &str) -> Option<&str> {
    value.split(',')
        .map(str::trim)
        .find(|entry| !entry.is_empty())
}

///Pick the first public client address from a forwarded address header.
///
///Entries in the private ranges (`10.0.0.0/8`, `172.16.0.0/12`,
///`192.168.0.0/16` and `fc00::/7`) and entries that aren't addresses are
///skipped. The first entry is returned if no public address is found, and
///`None` if there are no entries at all.
///
///```
///use shiftway::net::public_ip_from_header_value;
///
///assert_eq!(public_ip_from_header_value("10.51.0.49, 52.19.19.103"), Some("52.19.19.103"));
///assert_eq!(public_ip_from_header_value("127.0.0.1, 10.51.0.49"), Some("127.0.0.1"));
///```
pub fn public_ip_from_header_value(value: &str) -> Option<&str> {
    value.split(',')
        .map(str::trim)
        .find(|entry| match entry.parse() {
            Ok(address) => !is_private(&address),
            Err(_) => false,
        })
        .or_else(|| ip_from_header_value(value))
}

///Check if an address belongs to one of the private ranges.
pub fn is_private(address: &IpAddr) -> bool {
    match *address {
        IpAddr::V4(ref address) => address.is_private(),
        IpAddr::V6(ref address) => match address.to_ipv4_mapped() {
            Some(mapped) => mapped.is_private(),
            None => address.segments()[0] & 0xfe00 == 0xfc00,
        },
    }
}

///Parse a peer address, with or without a port.
///
///```
///use shiftway::net::parse_peer;
///
///assert_eq!(parse_peer("10.0.0.1:4000"), "10.0.0.1".parse().ok());
///assert_eq!(parse_peer("[::1]:4000"), "::1".parse().ok());
///assert_eq!(parse_peer("::1"), "::1".parse().ok());
///assert_eq!(parse_peer("localhost"), None);
///```
pub fn parse_peer(peer: &str) -> Option<IpAddr> {
    let peer = peer.trim();
    peer.parse::<IpAddr>().ok()
        .or_else(|| peer.parse::<SocketAddr>().ok().map(|address| address.ip()))
}

//Addresses are compared in their IPv4 form when they have one.
fn canonical(address: IpAddr) -> IpAddr {
    match address {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        },
        v4 => v4,
    }
}

///Parse a trusted proxy entry. It may be a single address, like `10.0.0.1`,
///or a range in CIDR notation, like `10.0.0.0/8`.
///
///```
///use shiftway::net::parse_proxy;
///
///let range = parse_proxy("10.0.0.0/8").unwrap();
///assert!(range.contains(&"10.1.2.3".parse::<std::net::IpAddr>().unwrap()));
///
///let single = parse_proxy("192.168.1.1").unwrap();
///assert_eq!(single.prefix_len(), 32);
///```
pub fn parse_proxy(entry: &str) -> Result<IpNet> {
    let entry = entry.trim();
    let invalid = || Error::InvalidProxy(entry.to_owned());

    match entry.find('/') {
        Some(slash) => {
            let address: IpAddr = entry[..slash].parse().map_err(|_| invalid())?;
            let prefix: u8 = entry[slash + 1..].parse().map_err(|_| invalid())?;
            IpNet::new(canonical(address), prefix).map_err(|_| Error::InvalidPrefix {
                entry: entry.to_owned(),
                prefix: prefix,
            })
        },
        None => entry.parse::<IpAddr>().map(|address| IpNet::from(canonical(address))).map_err(|_| invalid()),
    }
}

///The peers that are allowed to report a client address through a header.
///
///```
///use shiftway::TrustedProxies;
///
///let proxies: TrustedProxies = "10.0.0.0/8, 192.168.1.1".parse().unwrap();
///
///assert!(proxies.trusts("10.20.30.40".parse().ok()));
///assert!(proxies.trusts("192.168.1.1".parse().ok()));
///assert!(!proxies.trusts("192.168.1.2".parse().ok()));
///assert!(!proxies.trusts(None));
///```
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TrustedProxies {
    ///Every peer is trusted, including unknown ones.
    All,
    ///No peer is trusted and the header is never read.
    None,
    ///Only peers within these ranges are trusted.
    List(Vec<IpNet>),
}

impl TrustedProxies {
    ///Check if a peer is trusted to report the client address.
    pub fn trusts(&self, peer: Option<IpAddr>) -> bool {
        match *self {
            TrustedProxies::All => true,
            TrustedProxies::None => false,
            TrustedProxies::List(ref ranges) => match peer {
                Some(peer) => {
                    let peer = canonical(peer);
                    ranges.iter().any(|range| range.contains(&peer))
                },
                None => false,
            },
        }
    }
}

impl Default for TrustedProxies {
    fn default() -> TrustedProxies {
        TrustedProxies::All
    }
}

impl FromStr for TrustedProxies {
    type Err = Error;

    ///Parse `*`, `none` (or nothing), or a comma separated list of addresses
    ///and CIDR ranges.
    fn from_str(s: &str) -> Result<TrustedProxies> {
        match s.trim() {
            "*" => Ok(TrustedProxies::All),
            "" => Ok(TrustedProxies::None),
            s if s.eq_ignore_ascii_case("none") => Ok(TrustedProxies::None),
            s => s.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(parse_proxy)
                .collect::<Result<Vec<_>>>()
                .map(TrustedProxies::List),
        }
    }
}

#[cfg(test)]
mod test {
    use std::net::IpAddr;

    use super::{ip_from_header_value, parse_proxy, public_ip_from_header_value, TrustedProxies};
    use crate::error::Error;

    fn ip(address: &str) -> IpAddr {
        address.parse().unwrap()
    }

    #[test]
    fn leftmost_address() {
        assert_eq!(ip_from_header_value("80.79.208.21, 149.126.76.1, 10.51.0.68"), Some("80.79.208.21"));
        assert_eq!(ip_from_header_value("10.51.0.49"), Some("10.51.0.49"));
        assert_eq!(ip_from_header_value(" , 10.51.0.49"), Some("10.51.0.49"));
        assert_eq!(ip_from_header_value("unknown, 10.51.0.49"), Some("unknown"));
        assert_eq!(ip_from_header_value("  "), None);
        assert_eq!(ip_from_header_value(" , ,"), None);
    }

    #[test]
    fn public_address() {
        assert_eq!(public_ip_from_header_value("80.79.208.21, 149.126.76.1, 10.51.0.68"), Some("80.79.208.21"));
        assert_eq!(public_ip_from_header_value("52.19.19.103, 10.51.0.49"), Some("52.19.19.103"));
        assert_eq!(public_ip_from_header_value("10.51.0.49, 52.19.19.103"), Some("52.19.19.103"));
        assert_eq!(public_ip_from_header_value("10.51.0.49"), Some("10.51.0.49"));
        assert_eq!(public_ip_from_header_value("127.0.0.1, 10.51.0.49"), Some("127.0.0.1"));
        assert_eq!(public_ip_from_header_value("fd00::1, 2001:db8::1"), Some("2001:db8::1"));
        assert_eq!(public_ip_from_header_value("garbage, 192.168.0.1"), Some("garbage"));
        assert_eq!(public_ip_from_header_value(",,"), None);
    }

    #[test]
    fn proxy_ranges() {
        let range = parse_proxy("10.0.0.0/8").unwrap();
        assert!(range.contains(&ip("10.255.0.1")));
        assert!(!range.contains(&ip("11.0.0.1")));
        assert!(!range.contains(&ip("fc00::1")));

        let everything = parse_proxy("0.0.0.0/0").unwrap();
        assert!(everything.contains(&ip("203.0.113.9")));

        let v6 = parse_proxy(" 2001:db8::/32 ").unwrap();
        assert!(v6.contains(&ip("2001:db8:1::1")));
        assert!(!v6.contains(&ip("2001:db9::1")));

        let single = parse_proxy("192.168.1.1").unwrap();
        assert!(single.contains(&ip("192.168.1.1")));
        assert!(!single.contains(&ip("192.168.1.2")));
    }

    #[test]
    fn invalid_proxies() {
        assert_eq!(parse_proxy("proxy.local"), Err(Error::InvalidProxy("proxy.local".into())));
        assert_eq!(parse_proxy("10.0.0.0/x"), Err(Error::InvalidProxy("10.0.0.0/x".into())));
        assert_eq!(parse_proxy("10.0.0.0/33"), Err(Error::InvalidPrefix {
            entry: "10.0.0.0/33".into(),
            prefix: 33,
        }));
    }

    #[test]
    fn mapped_peers() {
        let list: TrustedProxies = "10.0.0.0/8".parse().unwrap();
        assert!(list.trusts(Some(ip("::ffff:10.1.2.3"))));
    }

    #[test]
    fn trusted_proxies() {
        assert_eq!("*".parse::<TrustedProxies>(), Ok(TrustedProxies::All));
        assert_eq!("none".parse::<TrustedProxies>(), Ok(TrustedProxies::None));
        assert_eq!("".parse::<TrustedProxies>(), Ok(TrustedProxies::None));

        let list: TrustedProxies = "10.0.0.1, 172.16.0.0/12,".parse().unwrap();
        assert!(list.trusts(Some(ip("10.0.0.1"))));
        assert!(list.trusts(Some(ip("172.20.1.1"))));
        assert!(!list.trusts(Some(ip("10.0.0.2"))));
        assert!(!list.trusts(None));

        assert!(TrustedProxies::All.trusts(None));
        assert!(!TrustedProxies::None.trusts(Some(ip("10.0.0.1"))));

        assert!("10.0.0.1, nope".parse::<TrustedProxies>().is_err());
    }
}
