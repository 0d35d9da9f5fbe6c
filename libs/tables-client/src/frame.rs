use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

// ═══════════════════════════════════════════════════════════════
//  RNG (xorshift64 + Box–Muller)
// ═══════════════════════════════════════════════════════════════

/// Seedable PRNG for frame values. Seed 0 = current time.
pub struct FrameRng {
    state: u64,
    spare: Option<f64>,
}

impl FrameRng {
    pub fn new(seed: i64) -> Self {
        let state = if seed == 0 {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos() as u64
                | 1 // xorshift state must be non-zero
        } else {
            seed as u64
        };
        Self { state, spare: None }
    }

    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Returns f64 in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / ((1u64 << 53) as f64)
    }

    /// Standard normal sample.
    pub fn next_normal(&mut self) -> f64 {
        if let Some(z) = self.spare.take() {
            return z;
        }
        // u1 in (0, 1] keeps ln() finite
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        let r = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * std::f64::consts::PI * u2;
        self.spare = Some(r * theta.sin());
        r * theta.cos()
    }
}

// ═══════════════════════════════════════════════════════════════
//  CSV frame
// ═══════════════════════════════════════════════════════════════

/// Default first index timestamp: 2013-01-01 00:00:00.
pub fn default_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2013, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// CSV document: an unnamed timestamp index column followed by value columns.
#[derive(Debug, Clone)]
pub struct CsvFrame {
    pub rows: usize,
    pub columns: Vec<String>,
    pub text: String,
}

/// Build a frame of `rows` one-minute-spaced rows of standard-normal values.
pub fn generate_frame(rows: usize, columns: &[&str], start: NaiveDateTime, rng: &mut FrameRng) -> CsvFrame {
    let mut text = String::with_capacity(32 * (rows + 1));
    for c in columns {
        text.push(',');
        text.push_str(c);
    }
    text.push('\n');

    let mut ts = start;
    for _ in 0..rows {
        let _ = write!(text, "{}", ts.format("%Y-%m-%d %H:%M:%S"));
        for _ in columns {
            let _ = write!(text, ",{}", rng.next_normal());
        }
        text.push('\n');
        ts += TimeDelta::minutes(1);
    }

    CsvFrame {
        rows,
        columns: columns.iter().map(|c| c.to_string()).collect(),
        text,
    }
}

/// Data rows in a CSV body (lines after the header, blanks skipped).
pub fn count_csv_rows(text: &str) -> usize {
    text.lines().skip(1).filter(|l| !l.trim().is_empty()).count()
}
