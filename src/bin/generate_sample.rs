use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Write a synthetic job postings dataset as CSV and Parquet.
#[derive(Debug, Parser)]
struct Args {
    /// Output directory.
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,

    /// Number of postings to generate.
    #[arg(long, default_value_t = 4000)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// (title, base salary) pairs; the base is the entry-level expectation.
/// Every dashboard job category has at least two titles.
const TITLES: &[(&str, f64)] = &[
    ("Data Scientist", 115_000.0),
    ("Senior Data Scientist", 140_000.0),
    ("Data Science Manager", 165_000.0),
    ("Machine Learning Engineer", 135_000.0),
    ("ML Engineer", 130_000.0),
    ("AI Engineer", 138_000.0),
    ("Applied Scientist", 145_000.0),
    ("Data Engineer", 115_000.0),
    ("Senior Data Engineer", 135_000.0),
    ("Data Platform Engineer", 125_000.0),
    ("Data Analyst", 75_000.0),
    ("Business Analyst", 78_000.0),
    ("Analytics Engineer", 105_000.0),
    ("Research Scientist", 140_000.0),
    ("Quantitative Researcher", 160_000.0),
    ("Product Scientist", 130_000.0),
    ("Decision Scientist", 125_000.0),
    ("Statistician", 95_000.0),
    ("Biostatistician", 105_000.0),
    ("Engineering Manager", 160_000.0),
    ("Director of Analytics", 185_000.0),
    ("Head of Data", 200_000.0),
    ("Software Engineer", 110_000.0),
    ("Backend Developer", 105_000.0),
    ("DevOps Engineer", 112_000.0),
    ("Product Designer", 95_000.0),
];

const COMPANIES: &[&str] = &[
    "Amazon", "Google", "Microsoft", "Meta", "Apple", "Netflix", "Salesforce",
    "Oracle", "IBM", "Intel", "Adobe", "Stripe", "Airbnb", "Uber", "Lyft",
    "Datadog", "Snowflake", "Databricks", "Shopify", "Atlassian", "Twilio",
    "Cloudflare", "Robinhood", "Coinbase", "Instacart", "DoorDash", "Pinterest",
    "Dropbox", "Square", "Workday", "ServiceNow", "HubSpot", "Zoom", "Slack",
    "Okta", "MongoDB", "Elastic", "GitLab", "Asana", "Figma",
];

/// (city, state code, cost-of-living multiplier)
const CITIES: &[(&str, &str, f64)] = &[
    ("San Francisco", "CA", 1.30),
    ("San Jose", "CA", 1.28),
    ("Los Angeles", "CA", 1.15),
    ("Seattle", "WA", 1.22),
    ("New York", "NY", 1.25),
    ("Boston", "MA", 1.15),
    ("Austin", "TX", 1.05),
    ("Dallas", "TX", 0.98),
    ("Denver", "CO", 1.02),
    ("Chicago", "IL", 1.00),
    ("Atlanta", "GA", 0.95),
    ("Raleigh", "NC", 0.93),
    ("Miami", "FL", 0.96),
    ("Phoenix", "AZ", 0.92),
    ("Portland", "OR", 1.00),
    ("Minneapolis", "MN", 0.95),
    ("Salt Lake City", "UT", 0.93),
    ("Washington", "DC", 1.12),
];

#[derive(Debug, Serialize)]
struct Row {
    job_id: i64,
    job_title: Option<String>,
    company_name: String,
    location: Option<String>,
    years_of_experience: i64,
    salary: f64,
}

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Index in `0..n` biased towards the front of the list.
    fn skewed_index(&mut self, n: usize) -> usize {
        let u = self.next_f64();
        ((u * u) * n as f64) as usize % n
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn location(rng: &mut SimpleRng) -> (Option<String>, f64) {
    let roll = rng.next_f64();
    if roll < 0.03 {
        return (None, 1.0);
    }
    if roll < 0.15 {
        return (Some("Remote".to_string()), 1.05);
    }
    if roll < 0.20 {
        return (Some("United States".to_string()), 1.0);
    }
    let &(city, state, factor) = rng.pick(CITIES);
    let suffix = match rng.next_f64() {
        r if r < 0.20 => " (Remote)",
        r if r < 0.45 => " (Hybrid)",
        r if r < 0.75 => " (On-site)",
        _ => "",
    };
    (Some(format!("{city}, {state}{suffix}")), factor)
}

fn generate(rows: usize, seed: u64) -> Vec<Row> {
    let mut rng = SimpleRng::new(seed);
    (0..rows)
        .map(|i| {
            let &(title, base) = rng.pick(TITLES);
            let company = COMPANIES[rng.skewed_index(COMPANIES.len())];
            let (location, factor) = location(&mut rng);

            let years = rng.gauss(4.5, 3.5).round().clamp(0.0, 25.0) as i64;
            let growth = 1.0 + 0.06 * years as f64;
            let salary = (base * factor * growth * rng.gauss(1.0, 0.12)).max(35_000.0);
            let salary = (salary / 500.0).round() * 500.0;

            let job_title = (rng.next_f64() >= 0.01).then(|| title.to_string());

            Row {
                job_id: i as i64 + 1,
                job_title,
                company_name: company.to_string(),
                location,
                years_of_experience: years,
                salary,
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[Row]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> anyhow::Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("job_id", DataType::Int64, false),
        Field::new("job_title", DataType::Utf8, true),
        Field::new("company_name", DataType::Utf8, false),
        Field::new("location", DataType::Utf8, true),
        Field::new("years_of_experience", DataType::Int64, false),
        Field::new("salary", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.job_id))),
            Arc::new(StringArray::from_iter(rows.iter().map(|r| r.job_title.as_deref()))),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.company_name.as_str()),
            )),
            Arc::new(StringArray::from_iter(rows.iter().map(|r| r.location.as_deref()))),
            Arc::new(Int64Array::from_iter_values(
                rows.iter().map(|r| r.years_of_experience),
            )),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.salary))),
        ],
    )?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let rows = generate(args.rows, args.seed);

    let csv_path = args.out_dir.join("linkedin_jobs.csv");
    write_csv(&csv_path, &rows)?;
    let parquet_path = args.out_dir.join("linkedin_jobs.parquet");
    write_parquet(&parquet_path, &rows)?;

    log::info!("Generated {} postings with seed {}", rows.len(), args.seed);
    println!(
        "Wrote {} postings to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
