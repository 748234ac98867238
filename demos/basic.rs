use std::net::IpAddr;

use chrono::TimeDelta;
use fieldrule::{FieldValue, Record, Rule};

struct PortStats {
    name: String,
    rx_errors: u64,
    utilization: f64,
    latency: TimeDelta,
    peer: Option<IpAddr>,
}

impl Record for PortStats {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "Name" => Some((&self.name).into()),
            "RxErrors" => Some(self.rx_errors.into()),
            "Utilization" => Some(self.utilization.into()),
            "Latency" => Some(self.latency.into()),
            "Peer" => Some(self.peer.into()),
            _ => None,
        }
    }
}

fn main() {
    let stats = PortStats {
        name: "eth0".into(),
        rx_errors: 3,
        utilization: 0.72,
        latency: TimeDelta::milliseconds(18),
        peer: Some("10.20.0.7".parse().expect("valid address")),
    };

    let checks = [
        "RxErrors : <= : 10",
        "Utilization : in : 0 0.8",
        "Latency : < : 20ms",
        r#"Name : same : "eth0" "eth1""#,
        "Peer : within : 10.0.0.0/8",
        "Peer : notwithin : 10.20.0.0/24",
        "Speed : > : 1000",
        "RxErrors : ~ : 1",
    ];

    for text in checks {
        let result = Rule::from_text(text).and_then(|mut rule| rule.evaluate(&stats));
        match result {
            Ok(passed) => println!("{text:<36} -> {passed}"),
            Err(err) => println!("{text:<36} -> error: {err}"),
        }
    }
}
