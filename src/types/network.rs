use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::parse::LiteralError;

/// An IP network in CIDR form (`address/prefix-length`).
///
/// Host bits are cleared on construction, so `1.1.1.99/24` is stored as
/// `1.1.1.0/24`. An IPv4-mapped IPv6 prefix of length 96 or more is stored as
/// the IPv4 prefix it covers: `::ffff:1.1.1.0/120` becomes `1.1.1.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpPrefix {
    network: IpAddr,
    len: u8,
}

fn v4_mask(len: u8) -> u32 {
    u32::MAX.checked_shl(32 - u32::from(len)).unwrap_or(0)
}

fn v6_mask(len: u8) -> u128 {
    u128::MAX.checked_shl(128 - u32::from(len)).unwrap_or(0)
}

impl IpPrefix {
    /// Build a prefix from any address inside it.
    ///
    /// # Errors
    ///
    /// Fails when `len` exceeds the address family's bit width.
    pub fn new(addr: IpAddr, len: u8) -> Result<Self, LiteralError> {
        let (addr, len) = match addr {
            IpAddr::V6(a) if (96..=128).contains(&len) => match a.to_ipv4_mapped() {
                Some(v4) => (IpAddr::V4(v4), len - 96),
                None => (addr, len),
            },
            _ => (addr, len),
        };
        let network = match addr {
            IpAddr::V4(a) if len <= 32 => IpAddr::V4(Ipv4Addr::from(u32::from(a) & v4_mask(len))),
            IpAddr::V6(a) if len <= 128 => {
                IpAddr::V6(Ipv6Addr::from(u128::from(a) & v6_mask(len)))
            }
            _ => {
                return Err(LiteralError::new(format!(
                    "prefix length {len} too long for {addr}"
                )))
            }
        };
        Ok(Self { network, len })
    }

    #[must_use]
    pub fn network(&self) -> IpAddr {
        self.network
    }

    #[must_use]
    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    /// Whether `addr` lies inside this network. Families never mix; an
    /// IPv4-mapped IPv6 address is treated as IPv4.
    #[must_use]
    pub fn contains(&self, addr: IpAddr) -> bool {
        match (self.network, addr.to_canonical()) {
            (IpAddr::V4(net), IpAddr::V4(a)) => u32::from(a) & v4_mask(self.len) == u32::from(net),
            (IpAddr::V6(net), IpAddr::V6(a)) => {
                u128::from(a) & v6_mask(self.len) == u128::from(net)
            }
            _ => false,
        }
    }
}

impl FromStr for IpPrefix {
    type Err = LiteralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, len) = s
            .split_once('/')
            .ok_or_else(|| LiteralError::new(format!("missing prefix length in '{s}'")))?;
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| LiteralError::new(format!("invalid address in '{s}'")))?;
        if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LiteralError::new(format!("invalid prefix length in '{s}'")));
        }
        let len: u8 = len
            .parse()
            .map_err(|_| LiteralError::new(format!("invalid prefix length in '{s}'")))?;
        Self::new(addr, len)
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.len)
    }
}
