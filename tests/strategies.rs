#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr};

use chrono::{DateTime, TimeDelta};
use fieldrule::{Document, TIMESTAMP_FORMAT};
use proptest::prelude::*;

// --- Fixed field schema ---
// stats.count   : i64
// stats.bytes   : u64
// stats.ratio   : f64 (finite)
// link.latency  : duration, whole milliseconds
// link.seen     : timestamp, whole seconds
// link.name     : string, one of NAMES
// link.addr     : IPv4 address in 10.0.0.0/16

pub const SINGLE_OPS: &[&str] = &["==", "!=", ">", ">=", "<", "<="];
pub const NAMES: &[&str] = &["eth0", "eth1", "wlan0", "lo", "bond0"];

/// 1970 through 2100, in unix seconds.
pub const SECONDS: std::ops::RangeInclusive<i64> = 0..=4_102_444_800;

/// The relation a single-value operator denotes, with the field value on the left.
pub fn holds<T: PartialOrd>(op: &str, v: T, t: T) -> bool {
    match op {
        "==" => v == t,
        "!=" => v != t,
        ">" => v > t,
        ">=" => v >= t,
        "<" => v < t,
        "<=" => v <= t,
        _ => unreachable!("not a single-value operator: {op}"),
    }
}

pub fn arb_single_op() -> impl Strategy<Value = &'static str> {
    prop::sample::select(SINGLE_OPS)
}

/// Render an integer threshold in one of the accepted bases.
pub fn arb_int_literal(value: i64) -> impl Strategy<Value = String> {
    let magnitude = value.unsigned_abs();
    let sign = if value < 0 { "-" } else { "" };
    prop_oneof![
        Just(format!("{value}")),
        Just(format!("{sign}{magnitude:#x}")),
        Just(format!("{sign}0o{magnitude:o}")),
        Just(format!("{sign}{magnitude:#b}")),
    ]
}

pub fn arb_finite_f64() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("must be finite", |f| f.is_finite())
}

pub fn timestamp_literal(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .expect("seconds within chrono's range")
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Render a millisecond count as a duration literal, sometimes as a unit chain.
pub fn duration_literal(ms: i64, chained: bool) -> String {
    if !chained || ms == 0 {
        return format!("{ms}ms");
    }
    let sign = if ms < 0 { "-" } else { "" };
    let ms = ms.unsigned_abs();
    let (h, rest) = (ms / 3_600_000, ms % 3_600_000);
    let (m, rest) = (rest / 60_000, rest % 60_000);
    let (s, rest) = (rest / 1_000, rest % 1_000);
    format!("{sign}{h}h{m}m{s}s{rest}ms")
}

/// A record conforming to the fixed schema.
#[derive(Debug, Clone)]
pub struct Sample {
    pub count: i64,
    pub bytes: u64,
    pub ratio: f64,
    pub latency_ms: i64,
    pub seen: i64,
    pub name: &'static str,
    pub addr: Ipv4Addr,
}

impl Sample {
    #[must_use]
    pub fn document(&self) -> Document {
        Document::new()
            .set("stats.count", self.count)
            .set("stats.bytes", self.bytes)
            .set("stats.ratio", self.ratio)
            .set("link.latency", TimeDelta::milliseconds(self.latency_ms))
            .set(
                "link.seen",
                DateTime::from_timestamp(self.seen, 0).expect("seconds within chrono's range"),
            )
            .set("link.name", self.name)
            .set("link.addr", IpAddr::V4(self.addr))
    }
}

pub fn arb_sample() -> impl Strategy<Value = Sample> {
    (
        any::<i64>(),
        any::<u64>(),
        arb_finite_f64(),
        -10_000_000_i64..10_000_000,
        SECONDS,
        prop::sample::select(NAMES),
        any::<u16>(),
    )
        .prop_map(|(count, bytes, ratio, latency_ms, seen, name, host)| Sample {
            count,
            bytes,
            ratio,
            latency_ms,
            seen,
            name,
            addr: Ipv4Addr::from(0x0a00_0000 | u32::from(host)),
        })
}

/// A well-formed rule over the fixed schema, covering every operator family.
pub fn arb_rule_text() -> impl Strategy<Value = String> {
    prop_oneof![
        (arb_single_op(), any::<i64>())
            .prop_map(|(op, t)| format!("stats.count : {op} : {t}")),
        (arb_single_op(), any::<u64>())
            .prop_map(|(op, t)| format!("stats.bytes : {op} : {t}")),
        (arb_single_op(), arb_finite_f64())
            .prop_map(|(op, t)| format!("stats.ratio : {op} : {t}")),
        (any::<i64>(), any::<i64>()).prop_map(|(a, b)| {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            format!("stats.count : in : {lo} {hi}")
        }),
        (-10_000_000_i64..10_000_000, -10_000_000_i64..10_000_000).prop_map(|(a, b)| {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            format!("link.latency : notin : {lo}ms {hi}ms")
        }),
        prop::collection::vec(SECONDS, 1..5).prop_map(|secs| {
            let list: Vec<String> = secs.into_iter().map(timestamp_literal).collect();
            format!("link.seen : not : {}", list.join(" "))
        }),
        (
            prop::sample::select(&["same", "differ", "contain", "notcontain"][..]),
            prop::sample::subsequence(NAMES, 1..=3),
        )
            .prop_map(|(op, names)| {
                let quoted: Vec<String> = names.iter().map(|n| format!("\"{n}\"")).collect();
                format!("link.name : {op} : {}", quoted.join(" "))
            }),
        (prop::bool::ANY, 8_u8..=32, any::<u32>()).prop_map(|(negate, len, bits)| {
            let op = if negate { "notwithin" } else { "within" };
            format!("link.addr : {op} : {}/{len}", Ipv4Addr::from(bits))
        }),
    ]
}
