use fieldrule::{
    divide_with, parse_timestamp_with, split_path_with, Document, Parsers, Rule,
};

fn main() {
    // `path | operator | value`, with `/` between path components and
    // ISO-like timestamps.
    let parsers = Parsers::new()
        .divider(divide_with('|'))
        .path_splitter(split_path_with('/'))
        .timestamp(parse_timestamp_with("%Y-%m-%d %H:%M:%S"))
        .string_list(|text| Ok(text.split(',').map(|s| s.trim().to_owned()).collect()));

    let seen = chrono::DateTime::from_timestamp(1_585_666_800, 0).expect("valid timestamp");
    let doc = Document::new()
        .set("node.last_seen", seen)
        .set("node.role", "spine")
        .set("node.uptime", chrono::TimeDelta::hours(49));

    let rules = [
        "node/last_seen | > | 2020-03-01 00:00:00",
        "node/role | same | spine, leaf",
        "node/uptime | in | 24h 720h",
    ];

    for text in rules {
        let mut rule = Rule::with_parsers(parsers.clone());
        match rule.parse(text).and_then(|()| rule.evaluate(&doc)) {
            Ok(passed) => println!("{rule} -> {passed}"),
            Err(err) => println!("{text} -> error: {err}"),
        }
    }
}
