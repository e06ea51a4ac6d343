use ledger::{Decimal, LedgerError, MemoryStore, WalletLedger};
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Load testing tool for sustained ledger throughput against the in-process store
#[tokio::main]
async fn main() {
    println!("=== Wallet Ledger Load Testing ===\n");

    test_sustained_trading().await;
    test_contended_wallet().await;
    test_many_wallets().await;
    test_concurrent_mining().await;
}

fn setup_ledger(mine_iterations: u64) -> (WalletLedger, MemoryStore) {
    let store = MemoryStore::new();
    let ledger = WalletLedger::with_mine_iterations(Arc::new(store.clone()), mine_iterations);
    (ledger, store)
}

async fn test_sustained_trading() {
    println!("📈 Testing sustained buy/sell on one wallet...");

    let (ledger, store) = setup_ledger(0);
    ledger.fetch_or_provision("trader").await.unwrap();

    let duration = Duration::from_secs(5);
    let start = Instant::now();
    let mut operations = 0u64;
    let mut rejections = 0u64;
    let mut rng = rand::thread_rng();

    while start.elapsed() < duration {
        let amount = Decimal::new(rng.gen_range(1..500), 2);
        let price = Decimal::new(rng.gen_range(500..1500), 2);
        let result = if operations % 2 == 0 {
            ledger.buy("trader", amount, price).await
        } else {
            ledger.sell("trader", amount, price).await
        };
        if result.is_err() {
            rejections += 1;
        }
        operations += 1;
    }

    let elapsed = start.elapsed();
    let wallet = store.get("trader").unwrap();

    println!("   Operations: {}", operations);
    println!("   Rejections: {}", rejections);
    println!("   Duration: {:.2}s", elapsed.as_secs_f64());
    println!("   Throughput: {:.0} ops/sec", operations as f64 / elapsed.as_secs_f64());
    println!("   Final wallet: ${} / {} coins\n", wallet.balance, wallet.coins);
}

async fn test_contended_wallet() {
    println!("⚡ Testing concurrent buys on one wallet...");

    let (ledger, store) = setup_ledger(0);
    ledger.fetch_or_provision("shared").await.unwrap();

    let succeeded = Arc::new(AtomicU64::new(0));
    let rejected = Arc::new(AtomicU64::new(0));
    let num_tasks = 64;
    let start = Instant::now();

    let handles: Vec<_> = (0..num_tasks)
        .map(|_| {
            let ledger = ledger.clone();
            let succeeded = Arc::clone(&succeeded);
            let rejected = Arc::clone(&rejected);
            tokio::spawn(async move {
                for _ in 0..100 {
                    match ledger.buy("shared", Decimal::ONE, Decimal::new(2, 1)).await {
                        Ok(_) => succeeded.fetch_add(1, Ordering::Relaxed),
                        Err(LedgerError::InsufficientFunds { .. }) => {
                            rejected.fetch_add(1, Ordering::Relaxed)
                        }
                        Err(e) => panic!("unexpected error: {e}"),
                    };
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    let elapsed = start.elapsed();
    let wallet = store.get("shared").unwrap();

    println!("   Tasks: {}", num_tasks);
    println!("   Succeeded: {}", succeeded.load(Ordering::Relaxed));
    println!("   Rejected: {}", rejected.load(Ordering::Relaxed));
    println!("   Duration: {:.2}s", elapsed.as_secs_f64());
    println!("   Final wallet: ${} / {} coins", wallet.balance, wallet.coins);
    assert!(wallet.is_solvent(), "wallet overdrawn under contention");
    println!("   No overdraft ✅\n");
}

async fn test_many_wallets() {
    println!("💾 Testing provisioning many wallets...");

    let (ledger, store) = setup_ledger(0);
    let start = Instant::now();

    for i in 0..50_000 {
        ledger.fetch_or_provision(&format!("wallet-{i}")).await.unwrap();

        if i % 10_000 == 0 && i > 0 {
            let ops_per_second = i as f64 / start.elapsed().as_secs_f64();
            println!("   {} wallets: {:.0} ops/sec", i, ops_per_second);
        }
    }

    let elapsed = start.elapsed();
    println!("   Final: 50,000 wallets in {:.2}s", elapsed.as_secs_f64());
    println!("   Average throughput: {:.0} ops/sec", 50_000.0 / elapsed.as_secs_f64());
    println!("   Wallets in store: {}\n", store.len());
}

async fn test_concurrent_mining() {
    println!("⛏️  Testing concurrent mining (default work unit)...");

    let (ledger, store) = setup_ledger(ledger::mining::DEFAULT_ITERATIONS);
    ledger.fetch_or_provision("miner").await.unwrap();

    let num_tasks = 8;
    let start = Instant::now();
    let handles: Vec<_> = (0..num_tasks)
        .map(|_| {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.mine("miner").await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let elapsed = start.elapsed();
    println!("   Mines: {}", num_tasks);
    println!("   Duration: {:.2}s", elapsed.as_secs_f64());
    println!("   Per mine (wall): {:.0} ms", elapsed.as_millis() as f64 / num_tasks as f64);
    println!("   Coins mined: {}\n", store.get("miner").unwrap().coins);
}
