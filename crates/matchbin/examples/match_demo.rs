//! Minimal demonstration of a Hamming-ranked bin and a roulette bin.

use matchbin::MatchBin;
use metric::{BitTag, HammingMetric};
use selector::{RankedSelector, RouletteConfig, RouletteSelector};

fn main() {
    let mut bin = MatchBin::new(HammingMetric::new(8), RankedSelector::new(Some(0.5)));

    for (bits, label) in [
        ("00000000", "all-clear"),
        ("00001111", "low-nibble"),
        ("11110000", "high-nibble"),
        ("11111111", "all-set"),
    ] {
        let tag: BitTag = bits.parse().expect("valid bit string");
        let uid = bin.put(tag, label);
        println!("stored {label} as {uid}");
    }

    let query: BitTag = "00000001".parse().expect("valid bit string");
    println!("\nranked matches for {query} (threshold 0.5):");
    for value in bin.query_values(&query, 4) {
        println!("  {value}");
    }

    let mut roulette_bin = MatchBin::new(
        HammingMetric::new(8),
        RouletteSelector::from_seed(RouletteConfig::default(), 0xF00D).expect("valid config"),
    );
    roulette_bin.put("00000011".parse().unwrap(), "near");
    roulette_bin.put("01111111".parse().unwrap(), "distant");

    println!("\nten weighted draws for {query}:");
    for value in roulette_bin.query_values(&query, 10) {
        println!("  {value}");
    }
}
