//! Integration tests for the deduplicator contract.

use netdedupe::{create, Deduplicator, Error, SharedDeduplicator, Strategy};

#[test]
fn test_idempotent_add_every_strategy() {
    let cases = [
        ("set", "example.com"),
        ("set", "10.0.0.0/8"),
        ("radix", "10.0.0.0/8"),
        ("radix", "2001:db8::/32"),
        ("domain", "example.com"),
        ("domain", "*.example.com"),
    ];

    for (strategy, entry) in cases {
        let mut dedupe = create(strategy).unwrap();
        assert!(dedupe.add(entry).unwrap(), "{} {}", strategy, entry);
        let before = dedupe.contains(entry).unwrap();
        assert!(!dedupe.add(entry).unwrap(), "{} {}", strategy, entry);
        assert_eq!(dedupe.contains(entry).unwrap(), before);
        assert_eq!(dedupe.len(), 1);
    }
}

#[test]
fn test_cidr_subsumption() {
    let mut forward = create("radix").unwrap();
    forward.add_many(["10.0.0.0/8", "10.1.2.3/32"]).unwrap();

    let mut reverse = create("radix").unwrap();
    reverse.add_many(["10.1.2.3/32", "10.0.0.0/8"]).unwrap();

    assert_eq!(forward.all(), vec!["10.0.0.0/8"]);
    assert_eq!(reverse.all(), forward.all());
}

#[test]
fn test_cidr_confluence() {
    let entries = [
        "192.168.0.0/16",
        "192.168.1.0/24",
        "192.168.1.7",
        "172.16.0.0/12",
        "172.16.5.0/24",
        "fd00::/8",
        "fd12:3456::/32",
        "8.8.8.8",
    ];

    // all permutations of the first four plus the rest in both orders
    let head = &entries[..4];
    let mut results = Vec::new();
    for a in 0..4 {
        for b in 0..4 {
            for c in 0..4 {
                for d in 0..4 {
                    let idx = [a, b, c, d];
                    let mut uniq = idx.to_vec();
                    uniq.sort();
                    uniq.dedup();
                    if uniq.len() != 4 {
                        continue;
                    }
                    let mut seq: Vec<&str> = idx.iter().map(|&i| head[i]).collect();
                    seq.extend_from_slice(&entries[4..]);
                    let mut dedupe = create("radix").unwrap();
                    dedupe.add_many(&seq).unwrap();
                    results.push(dedupe.all());

                    seq.reverse();
                    let mut dedupe = create("radix").unwrap();
                    dedupe.add_many(&seq).unwrap();
                    results.push(dedupe.all());
                }
            }
        }
    }

    assert_eq!(results.len(), 48);
    let expected = vec!["172.16.0.0/12", "192.168.0.0/16", "8.8.8.8/32", "fd00::/8"];
    for result in results {
        assert_eq!(result, expected);
    }
}

#[test]
fn test_wildcard_single_level_coverage() {
    let mut dedupe = create("domain").unwrap();
    dedupe.add("*.example.com").unwrap();
    assert!(dedupe.contains("a.example.com").unwrap());
    assert!(!dedupe.contains("a.b.example.com").unwrap());
}

#[test]
fn test_wildcard_subsumes_existing_children() {
    let mut dedupe = create("domain").unwrap();
    dedupe.add("foo.example.com").unwrap();
    dedupe.add("*.example.com").unwrap();
    assert!(dedupe.contains("foo.example.com").unwrap());
    assert!(!dedupe.add("baz.example.com").unwrap());
    assert!(dedupe.contains("baz.example.com").unwrap());
}

#[test]
fn test_removal_pruning() {
    let mut dedupe = create("domain").unwrap();
    dedupe.add("a.b.c.example.com").unwrap();
    dedupe.add("x.b.c.example.com").unwrap();

    assert!(dedupe.remove("a.b.c.example.com").unwrap());
    assert_eq!(dedupe.len(), 1);
    assert!(dedupe.contains("x.b.c.example.com").unwrap());

    assert!(dedupe.remove("x.b.c.example.com").unwrap());
    assert_eq!(dedupe.len(), 0);
    assert!(dedupe.all().is_empty());
    if let netdedupe::Dedupe::Domain(domains) = &dedupe {
        assert!(domains.trie().is_pruned_empty());
    } else {
        panic!("expected domain strategy");
    }
}

#[test]
fn test_case_and_format_normalization() {
    for strategy in ["set", "domain"] {
        let mut dedupe = create(strategy).unwrap();
        dedupe.add("Example.COM.").unwrap();
        assert!(dedupe.contains("example.com").unwrap(), "{}", strategy);
    }
}

#[test]
fn test_exact_ip_becomes_host_prefix() {
    let mut dedupe = create("radix").unwrap();
    dedupe.add("1.2.3.4").unwrap();
    assert!(dedupe.contains("1.2.3.4/32").unwrap());

    dedupe.add("2001:db8::5").unwrap();
    assert!(dedupe.contains("2001:db8::5/128").unwrap());
}

#[test]
fn test_remove_absent_is_silent() {
    for (strategy, entry) in [("set", "a.com"), ("radix", "10.0.0.0/8"), ("domain", "a.com")] {
        let mut dedupe = create(strategy).unwrap();
        assert!(!dedupe.remove(entry).unwrap());
        assert!(!dedupe.contains(entry).unwrap());
    }
}

#[test]
fn test_invalid_input_never_mutates() {
    for (strategy, bad) in [
        ("set", "  "),
        ("set", "10.0.0.0/33"),
        ("set", "300.1.1.1"),
        ("radix", "10.0.0.0/40"),
        ("domain", "*"),
        ("domain", "ads.example.com/path"),
    ] {
        let mut dedupe = create(strategy).unwrap();
        dedupe.add(if strategy == "radix" { "10.0.0.0/8" } else { "a.com" }).unwrap();
        let before = dedupe.all();
        assert!(matches!(dedupe.add(bad), Err(Error::InvalidFormat(_))));
        assert_eq!(dedupe.all(), before);
    }
}

#[test]
fn test_unknown_strategy() {
    assert!(matches!(create("patricia"), Err(Error::UnknownStrategy(_))));
}

#[test]
fn test_blocklist_workflow() {
    // stream entries, apply exclusions, read the result
    let mut dedupe = create("domain").unwrap();
    dedupe
        .add_many([
            "ads.example.com",
            "tracker.example.com",
            "*.ads.example.net",
            "x.ads.example.net",
            "good.example.org",
        ])
        .unwrap();

    for exclusion in ["good.example.org", "never-added.com"] {
        dedupe.remove(exclusion).unwrap();
    }

    assert_eq!(
        dedupe.all(),
        vec!["*.ads.example.net", "ads.example.com", "tracker.example.com"]
    );
}

#[test]
fn test_shared_deduplicator() {
    let shared = SharedDeduplicator::with_strategy(Strategy::Set);
    let clone = shared.clone();
    clone.add("a.com").unwrap();
    assert!(shared.contains("A.COM").unwrap());
    assert_eq!(shared.strategy(), Strategy::Set);
    shared.reset();
    assert!(clone.is_empty());
}
