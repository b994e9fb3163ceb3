/// CSV-backed input providers and the schedule writer.
///
/// The scheduler never reads files itself; a run pulls its snapshot of
/// samples, hot-list and cancellations through these provider traits.
use crate::error::{Result, ScheduleError};
use crate::models::{parse_date, HotList, IdentifierClass, SampleRecord, Schedule};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Supplies the sample records of a run.
pub trait SampleSource {
    fn load_samples(&self) -> Result<Vec<SampleRecord>>;
}

/// Supplies the hot-listed sample identifiers of a run.
pub trait HotListSource {
    fn load_hot_list(&self) -> Result<HotList>;
}

/// Supplies the manually cancelled meeting dates of a run.
pub trait ExclusionSource {
    fn load_cancellations(&self) -> Result<Vec<NaiveDate>>;
}

#[derive(Debug, Deserialize)]
struct SampleRow {
    sample_id: String,
    is_proband: String,
    date_received: String,
    identifier_class: String,
    is_reported: String,
    is_analyzed: String,
}

const SAMPLE_COLUMNS: [&str; 6] = [
    "sample_id",
    "is_proband",
    "date_received",
    "identifier_class",
    "is_reported",
    "is_analyzed",
];

#[derive(Debug, Deserialize)]
struct HotListRow {
    sample_id: String,
}

#[derive(Debug, Deserialize)]
struct CancellationRow {
    date: String,
}

#[derive(Debug, Serialize)]
struct ScheduleRow<'a> {
    sample_id: &'a str,
    is_proband: bool,
    date_received: NaiveDate,
    identifier_class: &'a str,
    is_reported: bool,
    is_analyzed: bool,
    priority_rank: usize,
    reason_for_priority: &'a str,
    meeting_date: NaiveDate,
}

/// Parses a boolean flag from the spreadsheet-style spellings.
fn parse_flag(value: &str) -> std::result::Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" | "" => Ok(false),
        other => Err(format!("'{}' is not a boolean", other)),
    }
}

fn row_error(line: u64, reason: impl Into<String>) -> ScheduleError {
    ScheduleError::InvalidRecord {
        line,
        reason: reason.into(),
    }
}

fn row_line(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

impl SampleRow {
    fn into_record(self, line: u64) -> Result<SampleRecord> {
        let flag = |name: &str, value: &str| {
            parse_flag(value).map_err(|e| row_error(line, format!("{}: {}", name, e)))
        };
        let is_proband = flag("is_proband", &self.is_proband)?;
        let is_reported = flag("is_reported", &self.is_reported)?;
        let is_analyzed = flag("is_analyzed", &self.is_analyzed)?;
        let date_received = parse_date(&self.date_received)
            .map_err(|e| row_error(line, format!("date_received: {}", e)))?;
        let identifier_class = IdentifierClass::from_string(&self.identifier_class)
            .map_err(|e| row_error(line, e.to_string()))?;

        SampleRecord::new(
            self.sample_id,
            is_proband,
            date_received,
            identifier_class,
            is_reported,
            is_analyzed,
        )
        .map_err(|e| row_error(line, e.to_string()))
    }
}

/// Read sample records from CSV. A missing column or any malformed row
/// fails the whole read; an empty flag cell reads as `false`.
pub fn read_samples<R: Read>(reader: R) -> Result<Vec<SampleRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let missing: Vec<&str> = SAMPLE_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(row_error(1, format!("missing column(s): {}", missing.join(", "))));
    }
    let mut samples = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let line = row_line(&record);
        let row: SampleRow = record
            .deserialize(Some(&headers))
            .map_err(|e| row_error(line, e.to_string()))?;
        samples.push(row.into_record(line)?);
    }

    Ok(samples)
}

/// Read hot-listed identifiers from CSV with a `sample_id` column.
pub fn read_hot_list<R: Read>(reader: R) -> Result<HotList> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut ids = Vec::new();
    for row in rdr.deserialize::<HotListRow>() {
        ids.push(row?.sample_id);
    }
    Ok(ids.into_iter().collect())
}

/// Read cancelled meeting dates from CSV with a `date` column.
pub fn read_cancellations<R: Read>(reader: R) -> Result<Vec<NaiveDate>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut dates = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let line = row_line(&record);
        let row: CancellationRow = record
            .deserialize(Some(&headers))
            .map_err(|e| row_error(line, e.to_string()))?;
        if row.date.is_empty() {
            continue;
        }
        dates.push(parse_date(&row.date).map_err(|e| row_error(line, e.to_string()))?);
    }

    Ok(dates)
}

/// Write one flat row per scheduled sample.
pub fn write_schedule<W: Write>(writer: W, schedule: &Schedule) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for entry in &schedule.entries {
        wtr.serialize(ScheduleRow {
            sample_id: &entry.sample.sample_id,
            is_proband: entry.sample.is_proband,
            date_received: entry.sample.date_received,
            identifier_class: entry.sample.identifier_class.name(),
            is_reported: entry.sample.is_reported,
            is_analyzed: entry.sample.is_analyzed,
            priority_rank: entry.priority_rank,
            reason_for_priority: &entry.reason_for_priority,
            meeting_date: entry.meeting_date,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the schedule to a file, replacing any previous output.
///
/// Rows go to a sibling `.csv.tmp` file that is renamed over `path` only
/// once fully written, so a failed write leaves the previous file intact.
pub fn write_schedule_file(path: &Path, schedule: &Schedule) -> Result<()> {
    let temp_path = path.with_extension("csv.tmp");
    let written = std::fs::File::create(&temp_path)
        .map_err(ScheduleError::from)
        .and_then(|file| write_schedule(file, schedule));
    if let Err(e) = written {
        log::debug!("io: discarding partial output {}", temp_path.display());
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }
    std::fs::rename(&temp_path, path)?;
    log::info!("io: wrote {} rows to {}", schedule.len(), path.display());
    Ok(())
}

/// Samples, hot-list and cancellations read from CSV files.
///
/// The hot-list and cancellation files are optional; a missing path means
/// an empty input.
#[derive(Debug, Clone)]
pub struct CsvSources {
    pub samples: PathBuf,
    pub hot_list: Option<PathBuf>,
    pub cancellations: Option<PathBuf>,
}

fn open(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).map_err(|e| {
        log::error!("io: cannot open {}: {}", path.display(), e);
        ScheduleError::Io(e)
    })
}

impl SampleSource for CsvSources {
    fn load_samples(&self) -> Result<Vec<SampleRecord>> {
        let samples = read_samples(open(&self.samples)?)?;
        log::info!("io: loaded {} samples from {}", samples.len(), self.samples.display());
        Ok(samples)
    }
}

impl HotListSource for CsvSources {
    fn load_hot_list(&self) -> Result<HotList> {
        match &self.hot_list {
            Some(path) => {
                let hot = read_hot_list(open(path)?)?;
                log::info!("io: loaded {} hot-listed samples", hot.len());
                Ok(hot)
            }
            None => Ok(HotList::new()),
        }
    }
}

impl ExclusionSource for CsvSources {
    fn load_cancellations(&self) -> Result<Vec<NaiveDate>> {
        match &self.cancellations {
            Some(path) => {
                let dates = read_cancellations(open(path)?)?;
                log::info!("io: loaded {} cancelled dates", dates.len());
                Ok(dates)
            }
            None => Ok(Vec::new()),
        }
    }
}

/// In-memory inputs, for embedding the scheduler without files.
#[derive(Debug, Clone, Default)]
pub struct MemorySources {
    pub samples: Vec<SampleRecord>,
    pub hot_list: HotList,
    pub cancellations: Vec<NaiveDate>,
}

impl SampleSource for MemorySources {
    fn load_samples(&self) -> Result<Vec<SampleRecord>> {
        Ok(self.samples.clone())
    }
}

impl HotListSource for MemorySources {
    fn load_hot_list(&self) -> Result<HotList> {
        Ok(self.hot_list.clone())
    }
}

impl ExclusionSource for MemorySources {
    fn load_cancellations(&self) -> Result<Vec<NaiveDate>> {
        Ok(self.cancellations.clone())
    }
}
