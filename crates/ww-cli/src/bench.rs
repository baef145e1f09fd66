use std::path::Path;
use std::time::Instant;

use ww_core::{Matcher, Rule};

use crate::rules_file;

pub struct BenchOptions {
    pub rules_path: String,
    pub iterations: usize,
    pub matcher: Matcher,
}

const BENCH_URLS: [&str; 6] = [
    "https://www.example.com/",
    "https://news.ycombinator.com/item?id=1",
    "https://m.youtube.com/watch?v=abc",
    "https://cdn.ads.example.net/pixel.gif",
    "http://localhost:1978/history",
    "not a url",
];

pub fn run_bench(opts: BenchOptions) -> Result<(), String> {
    let rules = rules_file::read_rules(Path::new(&opts.rules_path))?;
    if opts.iterations == 0 {
        return Err("Iterations must be positive".to_string());
    }

    println!("Evaluate Benchmark");
    println!("==================================================");
    println!("Rules:       {}", rules.len());
    println!("Iterations:  {} x {} URLs", opts.iterations, BENCH_URLS.len());

    for url in BENCH_URLS {
        let _ = opts.matcher.evaluate(url, &rules);
    }

    let (latencies, blocked) = measure(&opts.matcher, &rules, opts.iterations);

    println!();
    println!("Results");
    println!("--------------------------------------------------");
    println!("Blocked:     {} / {}", blocked, BENCH_URLS.len());
    println!("p50:         {:.2} μs", percentile(&latencies, 0.50));
    println!("p90:         {:.2} μs", percentile(&latencies, 0.90));
    println!("p99:         {:.2} μs", percentile(&latencies, 0.99));
    println!("max:         {:.2} μs", latencies.last().copied().unwrap_or(0.0));

    Ok(())
}

fn measure(matcher: &Matcher, rules: &[Rule], iterations: usize) -> (Vec<f64>, usize) {
    let mut latencies = Vec::with_capacity(iterations * BENCH_URLS.len());
    let blocked = BENCH_URLS
        .iter()
        .filter(|url| matcher.evaluate(url, rules).is_blocked())
        .count();

    for _ in 0..iterations {
        for url in BENCH_URLS {
            let start = Instant::now();
            let _ = matcher.evaluate(url, rules);
            latencies.push(start.elapsed().as_secs_f64() * 1_000_000.0);
        }
    }

    latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    (latencies, blocked)
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64) * p).ceil() as usize;
    let idx = idx.saturating_sub(1).min(sorted.len() - 1);
    sorted[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.5), 2.0);
        assert_eq!(percentile(&sorted, 0.99), 4.0);
        assert_eq!(percentile(&[], 0.5), 0.0);
    }

    #[test]
    fn test_measure_counts_blocked() {
        let rules = vec![Rule::new("domain:example.com"), Rule::new("*.ads.example.net/*")];
        let (latencies, blocked) = measure(&Matcher::new(), &rules, 3);
        assert_eq!(latencies.len(), 3 * BENCH_URLS.len());
        assert_eq!(blocked, 2);
    }
}
