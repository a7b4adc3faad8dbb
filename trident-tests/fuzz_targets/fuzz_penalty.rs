//! Fuzz test for the early-withdrawal penalty split
//!
//! Generates random stakes and penalty rates and checks that the split
//! never creates or loses lamports, never overflows, and rejects rates
//! above 100 percent.

use rotary_savings::math::penalty_and_payout;

/// Fuzz data - the inputs we're randomizing
#[derive(Debug, Clone)]
pub struct PenaltyFuzzData {
    /// Member stake recorded on the proposal
    pub amount: u64,
    /// Penalty rate in percent, deliberately allowed past 100
    pub rate_percent: u8,
}

impl PenaltyFuzzData {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            amount: rand_u64(seed),
            rate_percent: (rand_u64(seed ^ 0xA5A5_A5A5) % 256) as u8,
        }
    }
}

/// Property: penalty + payout == amount, and penalty matches the u128 oracle
fn check_split_property(data: &PenaltyFuzzData) -> bool {
    let result = penalty_and_payout(data.amount, data.rate_percent);

    if data.rate_percent > 100 {
        return result.is_err();
    }

    let expected_penalty = (data.amount as u128 * data.rate_percent as u128 / 100) as u64;
    match result {
        Ok((penalty, payout)) => {
            penalty == expected_penalty
                && penalty <= data.amount
                && penalty.checked_add(payout) == Some(data.amount)
        }
        Err(_) => false,
    }
}

/// Property: raising the rate never lowers the penalty
fn check_monotonic_property(data: &PenaltyFuzzData) -> bool {
    if data.rate_percent >= 100 {
        return true;
    }
    match (
        penalty_and_payout(data.amount, data.rate_percent),
        penalty_and_payout(data.amount, data.rate_percent + 1),
    ) {
        (Ok((lower, _)), Ok((higher, _))) => lower <= higher,
        _ => false,
    }
}

/// Splitmix64, good enough to spread seeds over the input space
fn rand_u64(seed: u64) -> u64 {
    let mut x = seed.wrapping_add(0x9E3779B97F4A7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}


fn main() {
    let iterations: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(100_000);

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;

    println!("Penalty split fuzz: {} iterations from seed {}", iterations, seed);
    for i in 0..iterations {
        let data = PenaltyFuzzData::from_seed(seed.wrapping_add(i));
        if !check_split_property(&data) || !check_monotonic_property(&data) {
            eprintln!("Property violated: {:?}", data);
            std::process::exit(1);
        }
    }
    println!("All iterations passed");
}
