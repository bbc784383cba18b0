//!Errors for operator supplied settings.
//!
//!Nothing that comes from a client will produce one of these. Request data is
//!always parsed leniently and falls back to a default instead.

use thiserror::Error;

///A `Result` with `shiftway::Error` as its error type.
pub type Result<T> = ::std::result::Result<T, Error>;

///An error that occurred while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    ///A trusted proxy entry was neither an address nor a CIDR range.
    #[error("invalid trusted proxy entry '{0}'")]
    InvalidProxy(String),

    ///A CIDR range had a prefix length that doesn't fit its address family.
    #[error("invalid prefix length {prefix} in '{entry}'")]
    InvalidPrefix {
        ///The whole entry, as it was written.
        entry: String,
        ///The offending prefix length.
        prefix: u8,
    },

    ///A forwarded address header name was empty.
    #[error("the forwarded address header name can't be empty")]
    EmptyHeaderName,
}
