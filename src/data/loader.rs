use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{JobDataset, JobRecord};

pub const COL_TITLE: &str = "job_title";
pub const COL_COMPANY: &str = "company_name";
pub const COL_LOCATION: &str = "location";
pub const COL_EXPERIENCE: &str = "years_of_experience";
pub const COL_SALARY: &str = "salary";

/// Columns every source table must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_TITLE,
    COL_COMPANY,
    COL_LOCATION,
    COL_EXPERIENCE,
    COL_SALARY,
];

// ---------------------------------------------------------------------------
// Load-once store
// ---------------------------------------------------------------------------

/// Owns the dataset for one source file and loads it at most once.
///
/// The first successful [`DatasetStore::get`] parses and derives the file;
/// every later call hands back the same `Arc` without touching disk.
#[derive(Debug)]
pub struct DatasetStore {
    path: PathBuf,
    cached: OnceCell<Arc<JobDataset>>,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DatasetStore {
            path: path.into(),
            cached: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file has already been loaded.
    pub fn is_loaded(&self) -> bool {
        self.cached.get().is_some()
    }

    pub fn get(&self) -> Result<Arc<JobDataset>, LoadError> {
        if let Some(dataset) = self.cached.get() {
            return Ok(Arc::clone(dataset));
        }
        let dataset = Arc::new(load_file(&self.path)?);
        log::info!(
            "Loaded {} job postings from {}",
            dataset.len(),
            self.path.display()
        );
        Ok(Arc::clone(self.cached.get_or_init(|| dataset)))
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a job postings table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row including the required columns (recommended)
/// * `.json`    – `[{ "job_title": "...", "salary": 120000, ... }, ...]`
/// * `.parquet` – one column per field, as written by `df.to_parquet()`
pub fn load_file(path: &Path) -> Result<JobDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let open = || {
        File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    let records = match ext.as_str() {
        "csv" => read_csv(open()?)?,
        "json" => read_json(open()?)?,
        "parquet" | "pq" => read_parquet(open()?)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    Ok(JobDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV rows into records. Columns outside [`REQUIRED_COLUMNS`] are kept
/// verbatim in [`JobRecord::extra`].
pub fn read_csv<R: Read>(source: R) -> Result<Vec<JobRecord>, LoadError> {
    let mut reader = csv::Reader::from_reader(source);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let position = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let title_idx = position(COL_TITLE)?;
    let company_idx = position(COL_COMPANY)?;
    let location_idx = position(COL_LOCATION)?;
    let experience_idx = position(COL_EXPERIENCE)?;
    let salary_idx = position(COL_SALARY)?;

    let mut records = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let mut extra = BTreeMap::new();
        for (col_idx, value) in record.iter().enumerate() {
            if REQUIRED_COLUMNS.contains(&headers[col_idx].as_str()) {
                continue;
            }
            extra.insert(headers[col_idx].clone(), value.to_string());
        }

        records.push(JobRecord {
            job_title: non_empty(cell(title_idx)),
            company_name: cell(company_idx).to_string(),
            location: non_empty(cell(location_idx)),
            years_of_experience: parse_years(cell(experience_idx), row)?,
            salary: parse_salary(cell(salary_idx), row)?,
            extra,
        });
    }

    log::debug!("Parsed {} CSV rows with headers {:?}", records.len(), headers);
    Ok(records)
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn invalid(row: usize, column: &'static str, value: impl ToString) -> LoadError {
    LoadError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    }
}

/// Integral floats such as `3.0` from dataframe exports count as whole years.
fn whole_years(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

/// `NaN` and infinities parse as `f64` but are not salaries.
fn finite_salary(f: f64) -> Option<f64> {
    f.is_finite().then_some(f)
}

fn parse_years(s: &str, row: usize) -> Result<i64, LoadError> {
    if let Ok(i) = s.parse::<i64>() {
        return Ok(i);
    }
    s.parse::<f64>()
        .ok()
        .and_then(whole_years)
        .ok_or_else(|| invalid(row, COL_EXPERIENCE, s))
}

fn parse_salary(s: &str, row: usize) -> Result<f64, LoadError> {
    s.parse::<f64>()
        .ok()
        .and_then(finite_salary)
        .ok_or_else(|| invalid(row, COL_SALARY, s))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "job_title": "Data Scientist",
///     "company_name": "Acme",
///     "location": "Austin, TX (Hybrid)",
///     "years_of_experience": 3,
///     "salary": 135000
///   },
///   ...
/// ]
/// ```
pub fn read_json<R: Read>(source: R) -> Result<Vec<JobRecord>, LoadError> {
    let root: JsonValue = serde_json::from_reader(source)?;
    let Some(rows) = root.as_array() else {
        return Err(LoadError::InvalidValue {
            row: 0,
            column: "<root>",
            value: "expected a top-level JSON array".to_string(),
        });
    };

    let mut records = Vec::with_capacity(rows.len());

    for (row, value) in rows.iter().enumerate() {
        let Some(obj) = value.as_object() else {
            return Err(LoadError::InvalidValue {
                row,
                column: "<row>",
                value: value.to_string(),
            });
        };
        let field = |name: &'static str| obj.get(name).ok_or(LoadError::MissingColumn(name));

        let years = match field(COL_EXPERIENCE)? {
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => i,
                None => parse_years(&n.to_string(), row)?,
            },
            JsonValue::String(s) => parse_years(s.trim(), row)?,
            other => parse_years(&other.to_string(), row)?,
        };
        let salary = match field(COL_SALARY)? {
            JsonValue::Number(n) => n
                .as_f64()
                .and_then(finite_salary)
                .ok_or_else(|| invalid(row, COL_SALARY, n))?,
            JsonValue::String(s) => parse_salary(s.trim(), row)?,
            other => parse_salary(&other.to_string(), row)?,
        };

        let mut extra = BTreeMap::new();
        for (key, val) in obj {
            if REQUIRED_COLUMNS.contains(&key.as_str()) {
                continue;
            }
            extra.insert(key.clone(), json_to_text(val).unwrap_or_default());
        }

        records.push(JobRecord {
            job_title: json_to_text(field(COL_TITLE)?).and_then(|s| non_empty(s.trim())),
            company_name: json_to_text(field(COL_COMPANY)?).unwrap_or_default(),
            location: json_to_text(field(COL_LOCATION)?).and_then(|s| non_empty(s.trim())),
            years_of_experience: years,
            salary,
            extra,
        });
    }

    Ok(records)
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet table with one column per field.
///
/// Numeric columns may be any integer or float type; they are cast to
/// `Float64` before reading, and experience must still hold whole years.
/// Required columns are checked against the file schema up front, so a file
/// without row groups is rejected the same way as one with data. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
pub fn read_parquet(file: File) -> Result<Vec<JobRecord>, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    for name in REQUIRED_COLUMNS {
        if builder.schema().index_of(name).is_err() {
            return Err(LoadError::MissingColumn(name));
        }
    }
    let reader = builder.build()?;

    let mut records = Vec::new();

    for batch in reader {
        let batch = batch?;
        let schema = batch.schema();

        let column = |name: &'static str, to: &DataType| -> Result<ArrayRef, LoadError> {
            let idx = schema
                .index_of(name)
                .map_err(|_| LoadError::MissingColumn(name))?;
            Ok(cast(batch.column(idx), to)?)
        };
        let titles = column(COL_TITLE, &DataType::Utf8)?;
        let companies = column(COL_COMPANY, &DataType::Utf8)?;
        let locations = column(COL_LOCATION, &DataType::Utf8)?;
        let years = column(COL_EXPERIENCE, &DataType::Float64)?;
        let salaries = column(COL_SALARY, &DataType::Float64)?;

        let titles = titles.as_string::<i32>();
        let companies = companies.as_string::<i32>();
        let locations = locations.as_string::<i32>();
        let years = years.as_primitive::<Float64Type>();
        let salaries = salaries.as_primitive::<Float64Type>();

        // Extra columns that cannot be rendered as text are skipped.
        let mut extra_cols: Vec<(String, ArrayRef)> = Vec::new();
        for (idx, field) in schema.fields().iter().enumerate() {
            if REQUIRED_COLUMNS.contains(&field.name().as_str()) {
                continue;
            }
            match cast(batch.column(idx), &DataType::Utf8) {
                Ok(arr) => extra_cols.push((field.name().clone(), arr)),
                Err(e) => log::debug!("Skipping parquet column '{}': {e}", field.name()),
            }
        }

        let offset = records.len();
        for i in 0..batch.num_rows() {
            let row = offset + i;
            let years_of_experience = (!years.is_null(i))
                .then(|| years.value(i))
                .and_then(whole_years)
                .ok_or_else(|| invalid(row, COL_EXPERIENCE, number_text(years, i)))?;
            let salary = (!salaries.is_null(i))
                .then(|| salaries.value(i))
                .and_then(finite_salary)
                .ok_or_else(|| invalid(row, COL_SALARY, number_text(salaries, i)))?;

            let text = |arr: &arrow::array::StringArray| {
                (!arr.is_null(i)).then(|| arr.value(i).trim().to_string())
            };

            let mut extra = BTreeMap::new();
            for (name, arr) in &extra_cols {
                let arr = arr.as_string::<i32>();
                let value = if arr.is_null(i) { "" } else { arr.value(i) };
                extra.insert(name.clone(), value.to_string());
            }

            records.push(JobRecord {
                job_title: text(titles).filter(|s| !s.is_empty()),
                company_name: text(companies).unwrap_or_default(),
                location: text(locations).filter(|s| !s.is_empty()),
                years_of_experience,
                salary,
                extra,
            });
        }
    }

    Ok(records)
}

fn number_text(arr: &Float64Array, i: usize) -> String {
    if arr.is_null(i) {
        "null".to_string()
    } else {
        arr.value(i).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE_CSV: &str = "\
job_title,company_name,location,years_of_experience,salary,posted
Senior Data Scientist,Acme,\"Austin, TX (Hybrid)\",6,185000,2024-01-02
Data Analyst,Globex,Remote,1,82000.5,2024-01-03
,Initech,,3.0,120000,
";

    #[test]
    fn csv_rows_become_records() {
        let records = read_csv(SAMPLE_CSV.as_bytes()).expect("parse csv");
        assert_eq!(records.len(), 3);

        let first = &records[0];
        assert_eq!(first.job_title.as_deref(), Some("Senior Data Scientist"));
        assert_eq!(first.location.as_deref(), Some("Austin, TX (Hybrid)"));
        assert_eq!(first.years_of_experience, 6);
        assert_eq!(first.salary, 185_000.0);
        assert_eq!(first.extra.get("posted").map(String::as_str), Some("2024-01-02"));

        let third = &records[2];
        assert_eq!(third.job_title, None);
        assert_eq!(third.location, None);
        assert_eq!(third.years_of_experience, 3);
    }

    #[test]
    fn csv_missing_column_is_rejected() {
        let csv = "job_title,company_name,location,salary\nX,Y,Remote,1000\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(COL_EXPERIENCE)));
    }

    #[test]
    fn csv_bad_number_is_rejected() {
        let csv = "job_title,company_name,location,years_of_experience,salary\nX,Y,Remote,two,1000\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        match err {
            LoadError::InvalidValue { row, column, value } => {
                assert_eq!(row, 0);
                assert_eq!(column, COL_EXPERIENCE);
                assert_eq!(value, "two");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn json_records_are_read() {
        let json = r#"[
            {"job_title": "ML Engineer", "company_name": "Acme", "location": "Remote",
             "years_of_experience": 4, "salary": 160000, "source": "linkedin"},
            {"job_title": null, "company_name": "Globex", "location": "Boston, MA",
             "years_of_experience": "2", "salary": "95000"}
        ]"#;
        let records = read_json(json.as_bytes()).expect("parse json");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].extra.get("source").map(String::as_str), Some("linkedin"));
        assert_eq!(records[1].job_title, None);
        assert_eq!(records[1].years_of_experience, 2);
        assert_eq!(records[1].salary, 95_000.0);
    }

    #[test]
    fn json_missing_column_is_rejected() {
        let json = r#"[{"job_title": "X", "company_name": "Y", "location": "Remote", "salary": 1}]"#;
        let err = read_json(json.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(COL_EXPERIENCE)));
    }

    #[test]
    fn load_file_dispatches_and_derives() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("jobs.csv");
        fs::write(&path, SAMPLE_CSV).expect("write csv");

        let ds = load_file(&path).expect("load csv");
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.entries[0].derived.state.as_deref(), Some("TX"));
    }

    #[test]
    fn load_file_reports_missing_and_unsupported() {
        let tmp = tempdir().expect("tempdir");
        let missing = tmp.path().join("nope.csv");
        assert!(matches!(load_file(&missing), Err(LoadError::Io { .. })));

        let xlsx = tmp.path().join("jobs.xlsx");
        fs::write(&xlsx, "whatever").expect("write");
        assert!(matches!(
            load_file(&xlsx),
            Err(LoadError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn store_loads_once_and_reuses_result() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("jobs.csv");
        fs::write(&path, SAMPLE_CSV).expect("write csv");

        let store = DatasetStore::new(&path);
        assert!(!store.is_loaded());
        let first = store.get().expect("first load");
        assert!(store.is_loaded());

        // Deleting the file proves the second call never re-reads it.
        fs::remove_file(&path).expect("remove csv");
        let second = store.get().expect("cached load");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn independent_loads_have_identical_content() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("jobs.csv");
        fs::write(&path, SAMPLE_CSV).expect("write csv");

        let a = load_file(&path).expect("load a");
        let b = load_file(&path).expect("load b");
        assert_eq!(a.entries, b.entries);
    }

    #[test]
    fn store_surfaces_load_error() {
        let store = DatasetStore::new("/definitely/not/here.csv");
        assert!(store.get().is_err());
        assert!(!store.is_loaded());
    }

    mod parquet_fixtures {
        use super::*;
        use arrow::array::{Int32Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        /// Two postings; the experience column keeps the type of `years`.
        pub fn two_rows(years: ArrayRef, salaries: Vec<f64>) -> RecordBatch {
            let schema = Arc::new(Schema::new(vec![
                Field::new(COL_TITLE, DataType::Utf8, true),
                Field::new(COL_COMPANY, DataType::Utf8, false),
                Field::new(COL_LOCATION, DataType::Utf8, true),
                Field::new(COL_EXPERIENCE, years.data_type().clone(), true),
                Field::new(COL_SALARY, DataType::Float64, true),
                Field::new("job_id", DataType::Int32, false),
            ]));
            RecordBatch::try_new(
                schema,
                vec![
                    Arc::new(StringArray::from(vec![Some("Data Analyst"), None])),
                    Arc::new(StringArray::from(vec!["Acme", "Globex"])),
                    Arc::new(StringArray::from(vec![Some("Austin, TX (Hybrid)"), Some("Remote")])),
                    years,
                    Arc::new(Float64Array::from(salaries)),
                    Arc::new(Int32Array::from(vec![7, 8])),
                ],
            )
            .expect("batch")
        }

        pub fn int_years(values: Vec<i32>) -> ArrayRef {
            Arc::new(Int32Array::from(values))
        }

        pub fn float_years(values: Vec<f64>) -> ArrayRef {
            Arc::new(Float64Array::from(values))
        }

        /// Write `batches` under `schema` and return the file path.
        pub fn write(dir: &Path, schema: Arc<Schema>, batches: &[RecordBatch]) -> PathBuf {
            let path = dir.join("jobs.parquet");
            let file = File::create(&path).expect("create parquet");
            let mut writer = ArrowWriter::try_new(file, schema, None).expect("writer");
            for batch in batches {
                writer.write(batch).expect("write batch");
            }
            writer.close().expect("close writer");
            path
        }

        pub fn write_batch(dir: &Path, batch: &RecordBatch) -> PathBuf {
            write(dir, batch.schema(), std::slice::from_ref(batch))
        }

        pub fn schema_without_salary() -> Arc<Schema> {
            Arc::new(Schema::new(vec![
                Field::new(COL_TITLE, DataType::Utf8, true),
                Field::new(COL_COMPANY, DataType::Utf8, false),
                Field::new(COL_LOCATION, DataType::Utf8, true),
                Field::new(COL_EXPERIENCE, DataType::Int64, false),
            ]))
        }
    }

    #[test]
    fn parquet_columns_are_cast_and_read() {
        use parquet_fixtures::*;

        let tmp = tempdir().expect("tempdir");
        let batch = two_rows(int_years(vec![3, 12]), vec![95_000.0, 260_000.0]);
        let path = write_batch(tmp.path(), &batch);

        let ds = load_file(&path).expect("load parquet");
        assert_eq!(ds.len(), 2);
        let first = &ds.entries[0];
        assert_eq!(first.record.years_of_experience, 3);
        assert_eq!(first.record.extra.get("job_id").map(String::as_str), Some("7"));
        assert_eq!(first.derived.state.as_deref(), Some("TX"));
        let second = &ds.entries[1];
        assert_eq!(second.record.job_title, None);
        assert_eq!(second.derived.job_category.label(), "Other");
    }

    #[test]
    fn parquet_accepts_integral_float_years_only() {
        use parquet_fixtures::*;

        let tmp = tempdir().expect("tempdir");
        let whole = two_rows(float_years(vec![3.0, 12.0]), vec![95_000.0, 260_000.0]);
        let ds = load_file(&write_batch(tmp.path(), &whole)).expect("whole years");
        assert_eq!(ds.entries[1].record.years_of_experience, 12);

        let fractional = two_rows(float_years(vec![3.0, 3.5]), vec![95_000.0, 260_000.0]);
        let err = load_file(&write_batch(tmp.path(), &fractional)).unwrap_err();
        match err {
            LoadError::InvalidValue { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, COL_EXPERIENCE);
                assert_eq!(value, "3.5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parquet_rejects_non_finite_salary() {
        use parquet_fixtures::*;

        let tmp = tempdir().expect("tempdir");
        let batch = two_rows(int_years(vec![3, 12]), vec![95_000.0, f64::NAN]);
        let err = load_file(&write_batch(tmp.path(), &batch)).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidValue { row: 1, column: COL_SALARY, .. }
        ));
    }

    #[test]
    fn parquet_without_rows_still_needs_required_columns() {
        use parquet_fixtures::*;

        let tmp = tempdir().expect("tempdir");
        let path = write(tmp.path(), schema_without_salary(), &[]);
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(COL_SALARY)));
    }

    #[test]
    fn non_finite_salaries_are_rejected() {
        for bad in ["NaN", "inf", "-inf"] {
            let csv = format!(
                "job_title,company_name,location,years_of_experience,salary\n\
                 A,Acme,Remote,1,100000\n\
                 B,Acme,Remote,2,{bad}\n"
            );
            let err = read_csv(csv.as_bytes()).unwrap_err();
            match err {
                LoadError::InvalidValue { row, column, value } => {
                    assert_eq!(row, 1);
                    assert_eq!(column, COL_SALARY);
                    assert_eq!(value, bad);
                }
                other => panic!("unexpected error for {bad}: {other}"),
            }

            let json = format!(
                r#"[{{"job_title":"A","company_name":"Acme","location":"Remote",
                     "years_of_experience":1,"salary":"{bad}"}}]"#
            );
            let err = read_json(json.as_bytes()).unwrap_err();
            assert!(matches!(
                err,
                LoadError::InvalidValue { row: 0, column: COL_SALARY, .. }
            ));
        }
    }
}
