//! Generate a small demo CSV for trying out the explorer: numeric and text
//! columns, a few missing values, and some exact duplicate rows.
//!
//! Usage: `cargo run --bin generate_sample [output.csv]`

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**), so the sample file is
/// reproducible without pulling in a random-number crate.
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn int_between(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.uniform() * (hi - lo + 1) as f64) as i64
    }
}

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_dataset.csv".to_string());

    let categories = ["alpha", "beta", "gamma"];
    let mut rng = SimpleRng::new(42);

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {path}"))?;
    writer.write_record(["id", "category", "score", "weight"])?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for id in 0..60 {
        let category = categories[rng.int_between(0, 2) as usize];
        // ~10% missing scores, so the missing-data policies have work to do.
        let score = if rng.uniform() < 0.1 {
            String::new()
        } else {
            format!("{:.3}", rng.uniform() * 100.0)
        };
        let weight = rng.int_between(40, 120).to_string();
        rows.push(vec![
            id.to_string(),
            category.to_string(),
            score,
            weight,
        ]);
    }

    // Duplicate a handful of rows verbatim for the de-duplication step.
    for i in [3usize, 17, 29] {
        let copy = rows[i].clone();
        rows.push(copy);
    }

    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {} rows to {path}", rows.len());
    Ok(())
}
