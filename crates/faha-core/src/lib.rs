// Library root: configuration loading and the HTTP transport seam shared by
// the hockey valuation crate and the binary.

pub mod config;
pub mod transport;
