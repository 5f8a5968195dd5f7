// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Advertised addresses for wildcard binds.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tracing::warn;

/// Replace a wildcard IP with the local host's IP.
///
/// Returns `addr` unchanged if it is not a wildcard or the local IP cannot
/// be determined.
pub(crate) fn replace_wildcard(addr: SocketAddr) -> SocketAddr {
    if !addr.ip().is_unspecified() {
        return addr;
    }
    match local_ip_address::local_ip() {
        Ok(ip) => SocketAddr::new(ip, addr.port()),
        Err(e) => {
            warn!("Unable to determine proper local hostname: {}", e);
            addr
        }
    }
}

/// Host other machines should use to reach a server bound to `bind_address`.
///
/// Host names pass through. A wildcard resolves to the local IP, or to
/// loopback when that fails, so it is never advertised as-is.
pub(crate) fn advertised_host(bind_address: &str) -> String {
    let ip = match bind_address.parse::<IpAddr>() {
        Ok(ip) if ip.is_unspecified() => ip,
        _ => return bind_address.to_string(),
    };
    let resolved = replace_wildcard(SocketAddr::new(ip, 0)).ip();
    if !resolved.is_unspecified() {
        return resolved.to_string();
    }
    match ip {
        IpAddr::V4(_) => Ipv4Addr::LOCALHOST.to_string(),
        IpAddr::V6(_) => Ipv6Addr::LOCALHOST.to_string(),
    }
}
