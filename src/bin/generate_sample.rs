//! Write a synthetic all-India allotment list as `sample_allotment.csv` and
//! `sample_allotment.parquet` in the working directory.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const INSTITUTES: &[&str] = &[
    "Maulana Azad Medical College, New Delhi",
    "Vardhaman Mahavir Medical College and Safdarjung Hospital, New Delhi",
    "Lady Hardinge Medical College, New Delhi",
    "King George's Medical University, Lucknow",
    "Kasturba Medical College, Manipal",
    "Grant Government Medical College, Mumbai",
    "Seth GS Medical College, Mumbai",
    "Bangalore Medical College and Research Institute, Bangalore",
    "Madras Medical College, Chennai",
    "Government Medical College, Chandigarh",
    "Institute of Medical Sciences, BHU, Varanasi",
    "Maulana Azad Institute of Dental Sciences, New Delhi",
];

/// (category, probability weight, how far behind the open list it closes)
const CATEGORIES: &[(&str, u64, f64)] = &[
    ("General", 40, 1.0),
    ("OBC", 27, 1.6),
    ("EWS", 10, 1.4),
    ("SC", 15, 3.5),
    ("ST", 8, 5.0),
];

const QUOTAS: &[&str] = &["All India", "Deemed/Paid Seats Quota", "Delhi University Quota"];

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

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }

    fn weighted_category(&mut self) -> (&'static str, f64) {
        let total: u64 = CATEGORIES.iter().map(|(_, w, _)| w).sum();
        let mut roll = self.below(total);
        for &(name, weight, spread) in CATEGORIES {
            if roll < weight {
                return (name, spread);
            }
            roll -= weight;
        }
        ("General", 1.0)
    }
}

struct Row {
    sno: i64,
    rank: Option<i64>,
    quota: &'static str,
    institute: &'static str,
    course: &'static str,
    category: &'static str,
    remarks: Option<&'static str>,
}

fn generate(n: usize, rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::with_capacity(n);
    let mut open_rank: i64 = 0;

    for i in 0..n {
        open_rank += 1 + rng.below(40) as i64;
        let (category, spread) = rng.weighted_category();
        let rank = (open_rank as f64 * spread) as i64;
        let institute = rng.pick(INSTITUTES);
        let course = if institute.contains("Dental") { "BDS" } else { "MBBS" };

        rows.push(Row {
            sno: i as i64 + 1,
            // A handful of rows in the published lists carry no rank.
            rank: (rng.below(200) != 0).then_some(rank),
            quota: rng.pick(QUOTAS),
            institute,
            course,
            category,
            remarks: (rng.below(25) == 0).then_some("Did not report"),
        });
    }
    rows.sort_by_key(|r| r.rank.unwrap_or(i64::MAX));
    rows
}

fn write_csv(path: &str, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record([
        "SNo",
        "Rank",
        "Allotted Quota",
        "Allotted Institute",
        "Course Alloted",
        "Candidate Category",
        "Remarks",
    ])?;
    for r in rows {
        writer.write_record([
            r.sno.to_string(),
            r.rank.map(|v| v.to_string()).unwrap_or_default(),
            r.quota.to_string(),
            r.institute.to_string(),
            r.course.to_string(),
            r.category.to_string(),
            r.remarks.unwrap_or("").to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Row]) -> Result<()> {
    let text = |get: fn(&Row) -> Option<&'static str>| {
        Arc::new(rows.iter().map(get).collect::<StringArray>())
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("SNo", DataType::Int64, false),
        Field::new("Rank", DataType::Int64, true),
        Field::new("Allotted Quota", DataType::Utf8, false),
        Field::new("Allotted Institute", DataType::Utf8, false),
        Field::new("Course Alloted", DataType::Utf8, false),
        Field::new("Candidate Category", DataType::Utf8, false),
        Field::new("Remarks", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(rows.iter().map(|r| r.sno).collect::<Int64Array>()),
            Arc::new(rows.iter().map(|r| r.rank).collect::<Int64Array>()),
            text(|r| Some(r.quota)),
            text(|r| Some(r.institute)),
            text(|r| Some(r.course)),
            text(|r| Some(r.category)),
            text(|r| r.remarks),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let rows = generate(2000, &mut rng);

    write_csv("sample_allotment.csv", &rows)?;
    write_parquet("sample_allotment.parquet", &rows)?;

    println!(
        "Wrote {} allotments to sample_allotment.csv and sample_allotment.parquet",
        rows.len()
    );
    Ok(())
}
