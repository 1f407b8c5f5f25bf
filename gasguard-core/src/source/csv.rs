//! Logger CSV export
//!
//! Reads the comma-separated export written by the field logger and turns
//! each row into a [`RawSample`].
//!
//! ## Format
//!
//! ```csv
//! Date,Time,LASER-V,WE-mv,AUX-mv,Temp
//! 14/06/2021,10:15:02,0.02,231.4,228.9,24.1
//! 14/06/2021,10:15:02,0.02,231.6,228.8,24.1
//! 14/06/2021,10:15:04,2.31,233.0,229.0,24.2
//! ```
//!
//! Columns are located by header name, so extra columns and any column order
//! are accepted. `Date` and `Time` are joined into a UTC second; the light
//! source counts as on when `LASER-V` exceeds the configured threshold.
//! Blank lines are skipped. Any other malformed row is a fatal
//! [`SourceError::Parse`] carrying its line number.
//!
//! ```rust,no_run
//! use gasguard_core::source::{CsvSource, SampleSource};
//!
//! let mut source = CsvSource::open("fan_nodrone_2.csv")?;
//! while let Some(sample) = source.next_sample() {
//!     let sample = sample?;
//!     println!("{} {}", sample.timestamp, sample.working_electrode);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};

use crate::{
    constants::source::{
        COLUMN_AUX_MV, COLUMN_DATE, COLUMN_LASER_V, COLUMN_TEMP, COLUMN_TIME, COLUMN_WE_MV,
        DATE_FORMAT, ILLUMINATION_THRESHOLD_V, MAX_CSV_FIELDS, TIME_FORMAT,
    },
    sample::RawSample,
    time::Timestamp,
};

use super::{SampleSource, SourceError};

type Fields<'a> = heapless::Vec<&'a str, MAX_CSV_FIELDS>;

/// Parsing options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CsvSourceConfig {
    /// Field separator
    pub delimiter: char,
    /// `LASER-V` above this counts as illuminated (V)
    pub illumination_threshold_v: f64,
    /// Stop after this many samples (trims the tail of a recording)
    pub row_limit: Option<usize>,
}

impl Default for CsvSourceConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            illumination_threshold_v: ILLUMINATION_THRESHOLD_V,
            row_limit: None,
        }
    }
}

/// Counters for a CSV read
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CsvStats {
    /// Lines read, header and blank lines included
    pub lines: usize,
    /// Samples produced
    pub rows: usize,
    /// Blank lines skipped
    pub blank_lines: usize,
    /// Samples with the light source on
    pub illuminated_rows: usize,
}

/// Positions of the required columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    date: usize,
    time: usize,
    laser: usize,
    we: usize,
    aux: usize,
    temp: usize,
}

impl Columns {
    fn from_header(fields: &Fields<'_>, line: usize) -> Result<Self, SourceError<io::Error>> {
        let find = |name: &str, reason: &'static str| {
            fields
                .iter()
                .position(|f| *f == name)
                .ok_or_else(|| parse_error(line, reason))
        };

        Ok(Self {
            date: find(COLUMN_DATE, "header lacks Date column")?,
            time: find(COLUMN_TIME, "header lacks Time column")?,
            laser: find(COLUMN_LASER_V, "header lacks LASER-V column")?,
            we: find(COLUMN_WE_MV, "header lacks WE-mv column")?,
            aux: find(COLUMN_AUX_MV, "header lacks AUX-mv column")?,
            temp: find(COLUMN_TEMP, "header lacks Temp column")?,
        })
    }

    fn width(&self) -> usize {
        [self.date, self.time, self.laser, self.we, self.aux, self.temp]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Streaming reader over a logger export
pub struct CsvSource<R> {
    reader: R,
    config: CsvSourceConfig,
    columns: Option<Columns>,
    line_buffer: String,
    line: usize,
    stats: CsvStats,
}

impl CsvSource<BufReader<File>> {
    /// Open an export file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError<io::Error>> {
        let file = File::open(path).map_err(SourceError::Transport)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> CsvSource<R> {
    /// Wrap any buffered reader positioned at the header row
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            config: CsvSourceConfig::default(),
            columns: None,
            line_buffer: String::new(),
            line: 0,
            stats: CsvStats::default(),
        }
    }

    /// Replace the parsing options
    pub fn with_config(mut self, config: CsvSourceConfig) -> Self {
        self.config = config;
        self
    }

    /// Stop after `rows` samples
    pub fn with_row_limit(mut self, rows: usize) -> Self {
        self.config.row_limit = Some(rows);
        self
    }

    /// Counters so far
    pub fn stats(&self) -> &CsvStats {
        &self.stats
    }

    fn limit_reached(&self) -> bool {
        matches!(self.config.row_limit, Some(limit) if self.stats.rows >= limit)
    }
}

impl<R: BufRead> SampleSource for CsvSource<R> {
    type Error = SourceError<io::Error>;

    fn next_sample(&mut self) -> Option<Result<RawSample, Self::Error>> {
        loop {
            if self.limit_reached() {
                return None;
            }

            self.line_buffer.clear();
            match self.reader.read_line(&mut self.line_buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(SourceError::Transport(e))),
            }
            self.line += 1;
            self.stats.lines += 1;

            let text = self.line_buffer.trim_end_matches(|c| c == '\r' || c == '\n');
            if text.trim().is_empty() {
                self.stats.blank_lines += 1;
                continue;
            }

            let fields = match split_fields(text, self.config.delimiter, self.line) {
                Ok(fields) => fields,
                Err(e) => return Some(Err(e)),
            };

            let columns = match self.columns {
                Some(columns) => columns,
                None => match Columns::from_header(&fields, self.line) {
                    Ok(columns) => {
                        self.columns = Some(columns);
                        continue;
                    }
                    Err(e) => return Some(Err(e)),
                },
            };

            let result = parse_row(&fields, &columns, &self.config, self.line);
            match &result {
                Ok(sample) => {
                    self.stats.rows += 1;
                    if sample.illuminated {
                        self.stats.illuminated_rows += 1;
                    }
                }
                Err(e) => log_warn!("Rejected CSV row: {}", e),
            }
            return Some(result);
        }
    }
}

fn parse_error(line: usize, reason: &'static str) -> SourceError<io::Error> {
    SourceError::Parse { line, reason }
}

fn split_fields(text: &str, delimiter: char, line: usize) -> Result<Fields<'_>, SourceError<io::Error>> {
    let mut fields = Fields::new();
    for field in text.split(delimiter) {
        fields
            .push(field.trim().trim_matches('"'))
            .map_err(|_| parse_error(line, "too many columns"))?;
    }
    Ok(fields)
}

fn parse_row(
    fields: &Fields<'_>,
    columns: &Columns,
    config: &CsvSourceConfig,
    line: usize,
) -> Result<RawSample, SourceError<io::Error>> {
    if fields.len() < columns.width() {
        return Err(parse_error(line, "not enough columns"));
    }

    let timestamp = parse_timestamp(fields[columns.date], fields[columns.time])
        .ok_or_else(|| parse_error(line, "invalid date or time"))?;

    let number = |index: usize, reason: &'static str| {
        fields[index]
            .parse::<f64>()
            .map_err(|_| parse_error(line, reason))
    };

    let laser_v = number(columns.laser, "invalid LASER-V value")?;

    Ok(RawSample {
        timestamp,
        working_electrode: number(columns.we, "invalid WE-mv value")?,
        aux_electrode: number(columns.aux, "invalid AUX-mv value")?,
        temperature: number(columns.temp, "invalid Temp value")?,
        illuminated: laser_v > config.illumination_threshold_v,
    })
}

/// Join `dd/mm/YYYY` and `HH:MM:SS` into seconds since the Unix epoch (UTC)
pub fn parse_timestamp(date: &str, time: &str) -> Option<Timestamp> {
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
    let time = NaiveTime::parse_from_str(time, TIME_FORMAT).ok()?;
    Some(date.and_time(time).and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "Date,Time,LASER-V,WE-mv,AUX-mv,Temp\n";

    fn source(body: &str) -> CsvSource<Cursor<String>> {
        CsvSource::new(Cursor::new(format!("{}{}", HEADER, body)))
    }

    fn drain<R: BufRead>(source: &mut CsvSource<R>) -> Vec<RawSample> {
        let mut out = Vec::new();
        while let Some(sample) = source.next_sample() {
            out.push(sample.unwrap());
        }
        out
    }

    #[test]
    fn parses_rows() {
        let mut src = source(
            "14/06/2021,10:15:02,0.02,231.4,228.9,24.1\n\
             14/06/2021,10:15:03,2.31,233.0,229.0,24.2\n",
        );
        let samples = drain(&mut src);

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].timestamp - samples[0].timestamp, 1);
        assert_eq!(samples[0].working_electrode, 231.4);
        assert_eq!(samples[0].aux_electrode, 228.9);
        assert_eq!(samples[0].temperature, 24.1);
        assert!(!samples[0].illuminated);
        assert!(samples[1].illuminated);
        assert_eq!(src.stats().rows, 2);
        assert_eq!(src.stats().illuminated_rows, 1);
    }

    #[test]
    fn timestamp_is_utc_epoch_seconds() {
        assert_eq!(parse_timestamp("01/01/1970", "00:01:05"), Some(65));
        assert_eq!(parse_timestamp("02/01/1970", "00:00:00"), Some(86_400));
        assert_eq!(parse_timestamp("31/02/2021", "00:00:00"), None);
        assert_eq!(parse_timestamp("01/01/2021", "25:00:00"), None);
    }

    #[test]
    fn columns_located_by_name() {
        let text = "Temp,Extra,WE-mv,AUX-mv,LASER-V,Time,Date\r\n\
                    21.0,x,100.5,99.0,1.995,00:00:10,01/01/1970\r\n";
        let mut src = CsvSource::new(Cursor::new(text));
        let samples = drain(&mut src);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].timestamp, 10);
        assert_eq!(samples[0].working_electrode, 100.5);
        assert_eq!(samples[0].temperature, 21.0);
        assert!(samples[0].illuminated);
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut src = source("01/01/1970,00:00:00,1.99,1,1,1\n");
        assert!(!drain(&mut src)[0].illuminated);

        let mut src = source("01/01/1970,00:00:00,1.99,1,1,1\n").with_config(CsvSourceConfig {
            illumination_threshold_v: 1.5,
            ..CsvSourceConfig::default()
        });
        assert!(drain(&mut src)[0].illuminated);
    }

    #[test]
    fn blank_lines_skipped() {
        let mut src = source("\n01/01/1970,00:00:00,0,1,1,1\n\n");
        assert_eq!(drain(&mut src).len(), 1);
        assert_eq!(src.stats().blank_lines, 2);
    }

    #[test]
    fn row_limit_trims_tail() {
        let mut src = source(
            "01/01/1970,00:00:00,0,1,1,1\n\
             01/01/1970,00:00:01,0,2,1,1\n\
             01/01/1970,00:00:02,0,3,1,1\n",
        )
        .with_row_limit(2);
        let samples = drain(&mut src);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].working_electrode, 2.0);
    }

    #[test]
    fn malformed_rows_report_line() {
        let mut src = source("01/01/1970,00:00:00,0,1,1,1\n01/01/1970,00:00:01,0,abc,1,1\n");
        assert!(src.next_sample().unwrap().is_ok());
        match src.next_sample() {
            Some(Err(SourceError::Parse { line, reason })) => {
                assert_eq!(line, 3);
                assert_eq!(reason, "invalid WE-mv value");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn short_row_rejected() {
        let mut src = source("01/01/1970,00:00:00,0\n");
        assert!(matches!(
            src.next_sample(),
            Some(Err(SourceError::Parse { reason: "not enough columns", .. }))
        ));
    }

    #[test]
    fn missing_header_column_rejected() {
        let mut src = CsvSource::new(Cursor::new("Date,Time,WE-mv\n"));
        assert!(matches!(
            src.next_sample(),
            Some(Err(SourceError::Parse { line: 1, reason: "header lacks LASER-V column" }))
        ));
    }
}
