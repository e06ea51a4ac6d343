use serde_json::Value;
use std::fs;
use std::path::Path;

/// Converts Criterion results for the ledger benches into ops/sec
fn main() {
    let benchmark_dir = "target/criterion";

    if !Path::new(benchmark_dir).exists() {
        println!("No benchmark results found. Run 'cargo bench -p ledger' first.");
        return;
    }

    println!("=== Wallet Ledger Performance Analysis ===\n");

    for benchmark in ["apply_buy", "fetch_existing_wallet", "buy_sell_cycle"] {
        report(benchmark_dir, benchmark);
    }

    let mining_dir = format!("{}/mining", benchmark_dir);
    if Path::new(&mining_dir).exists() {
        println!("\n=== Mining Benchmarks ===");
        report(&mining_dir, "proof_of_work_10k");
        report(&mining_dir, "mine_10k");
    }
}

/// Mean time and 95% confidence bounds, in nanoseconds
struct Estimate {
    mean: f64,
    bounds: Option<(f64, f64)>,
}

fn ops_per_second(nanoseconds: f64) -> f64 {
    1_000_000_000.0 / nanoseconds
}

fn parse_estimate(content: &str) -> Option<Estimate> {
    let estimates: Value = serde_json::from_str(content).ok()?;
    let mean = estimates.get("mean")?;
    let ci = mean.get("confidence_interval");
    let bound = |name: &str| ci.and_then(|ci| ci.get(name)).and_then(Value::as_f64);

    Some(Estimate {
        mean: mean.get("point_estimate")?.as_f64()?,
        bounds: bound("lower_bound").zip(bound("upper_bound")),
    })
}

fn report(base_dir: &str, benchmark_name: &str) {
    let estimates_path = format!("{}/{}/new/estimates.json", base_dir, benchmark_name);

    let content = match fs::read_to_string(&estimates_path) {
        Ok(content) => content,
        Err(_) if !Path::new(&estimates_path).exists() => {
            println!("❌ {} - No results found", benchmark_name);
            return;
        }
        Err(e) => {
            println!("❌ {} - Error reading results: {}", benchmark_name, e);
            return;
        }
    };

    let Some(estimate) = parse_estimate(&content) else {
        println!("❌ {} - Unrecognised estimates.json", benchmark_name);
        return;
    };

    println!("📊 {}:", benchmark_name);
    println!("   Time per operation: {:.2} μs", estimate.mean / 1000.0);
    println!("   Operations per second: {:.0} ops/sec", ops_per_second(estimate.mean));
    if let Some((lower, upper)) = estimate.bounds {
        // Slower bound first
        println!(
            "   95% CI: {:.0} - {:.0} ops/sec",
            ops_per_second(upper),
            ops_per_second(lower)
        );
    }
    println!();
}
