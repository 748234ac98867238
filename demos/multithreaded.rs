use std::sync::Arc;
use std::thread;

use fieldrule::{Document, Rule};

fn main() {
    let mut rule = Rule::from_text("stats.rx_errors : in : 0 5").expect("valid rule");

    // Warm the threshold cache once; `check` then reads it through `&Rule`.
    let sample = Document::new().set("stats.rx_errors", 0_i64);
    rule.evaluate(&sample).expect("rule evaluates");
    let rule = Arc::new(rule);

    let handles: Vec<_> = (0..4_i64)
        .map(|i| {
            let rule = Arc::clone(&rule);
            thread::spawn(move || {
                let doc = Document::new().set("stats.rx_errors", i * 3);
                let result = rule.check(&doc);
                println!("Thread {i}: rx_errors={} -> {result:?}", i * 3);
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    println!("prepared as: {}", rule.prepared_kind());
}
