use anyhow::{Context, Result};

const CITIES: [&str; 6] = [
    "LOS ANGELES",
    "BURBANK",
    "PASADENA",
    "GLENDALE",
    "LONG BEACH",
    "SANTA MONICA",
];

const VIOLATIONS: [(&str, &str); 8] = [
    ("F007", "Food handler cards"),
    ("F014", "Food contact surfaces clean and sanitized"),
    ("F023", "Proper cold holding temperatures"),
    ("F030", "Food properly stored; food storage containers identified"),
    ("F033", "Nonfood-contact surfaces clean and in good repair"),
    ("F035", "Equipment/utensils approved; installed; clean"),
    ("F040", "Plumbing; proper backflow devices"),
    ("F044", "Floors, walls and ceilings clean and in good repair"),
];

/// Minimal deterministic PRNG (xoshiro256**)
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

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn write_inspections(rng: &mut SimpleRng, path: &str, rows: usize) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "SERIAL NUMBER",
        "FACILITY NAME",
        "FACILITY CITY",
        "PROGRAM STATUS",
        "SCORE",
    ])?;

    for i in 0..rows {
        let city = CITIES[rng.below(CITIES.len())];
        let status = if rng.next_f64() < 0.1 { "INACTIVE" } else { "ACTIVE" };
        // A few inspections were never scored.
        let score = if rng.next_f64() < 0.03 {
            String::new()
        } else {
            let base = 92.0 - city.len() as f64 * 0.3;
            rng.gauss(base, 4.0).round().clamp(60.0, 100.0).to_string()
        };
        writer.write_record([
            format!("DA{i:07}"),
            format!("FACILITY {i}"),
            city.to_string(),
            status.to_string(),
            score,
        ])?;
    }
    writer.flush().with_context(|| format!("flushing {path}"))?;
    Ok(())
}

fn write_violations(rng: &mut SimpleRng, path: &str, rows: usize) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "SERIAL NUMBER",
        "VIOLATION STATUS",
        "VIOLATION CODE",
        "VIOLATION DESCRIPTION",
        "POINTS",
    ])?;

    for i in 0..rows {
        // Skew towards the low codes so the chart is not flat.
        let idx = rng.below(VIOLATIONS.len()).min(rng.below(VIOLATIONS.len()));
        let (code, description) = VIOLATIONS[idx];
        writer.write_record([
            format!("DA{:07}", i / 3),
            "OUT OF COMPLIANCE".to_string(),
            code.to_string(),
            description.to_string(),
            (1 + rng.below(4)).to_string(),
        ])?;
    }
    writer.flush().with_context(|| format!("flushing {path}"))?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    write_inspections(&mut rng, "Inspections.csv", 600)?;
    write_violations(&mut rng, "Violations.csv", 1800)?;

    println!("Wrote Inspections.csv (600 rows) and Violations.csv (1800 rows)");
    Ok(())
}
