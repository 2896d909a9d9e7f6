use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Writer};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
pub mod charts;
pub mod error;
pub mod layout;
pub mod palette;
pub mod plot;
pub mod process;
pub mod realiterator;

pub use error::{AppCountError, Result};
pub use layout::Layout;

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

pub const DEFAULT_CSV: &str = "Number-and-types-of-applications-by-all-account-customers-2023-11.csv";

/// The main struct for the application counts, one row per account customer (time point)
/// and one count per application type
#[derive(Debug, Clone)]
pub struct AppCounts {
    pub label_column: String,
    pub total_column: String,
    pub categories: Vec<String>,
    pub customers: Vec<String>,
    pub counts: Vec<Vec<u64>>,
    pub reported_totals: Vec<Option<u64>>,
}

/// Running sum of each application type over the time points
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeSeries {
    pub categories: Vec<String>,
    /// one vector per category, index i is time point i + 1
    pub values: Vec<Vec<u64>>,
}

/// Sum of each application type over all the rows
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub categories: Vec<String>,
    pub values: Vec<u64>,
}

/// A row whose Total column does not match the sum of its application types
#[derive(Debug, Clone, PartialEq)]
pub struct TotalMismatch {
    pub time_point: usize,
    pub customer: String,
    pub reported: u64,
    pub computed: u64,
}

impl AppCounts {
    /// Init the counts from csv, see `from_reader`.
    pub fn from_csv<P: AsRef<Path>>(fin: P, layout: &Layout) -> Result<AppCounts> {
        let path = fin.as_ref();
        let file = File::open(path).map_err(|e| AppCountError::io(path, e))?;
        AppCounts::from_reader(file, layout)
    }

    /// Drops the first `skip_rows` records, promotes the next one to column names,
    /// then drops `skip_footer` records and any trailing record with only blank counts.
    /// Every column other than the label and total columns is an application type.
    pub fn from_reader<R: Read>(rdr: R, layout: &Layout) -> Result<AppCounts> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(rdr);
        let mut records: Vec<StringRecord> = Vec::new();
        for r in reader.records() {
            records.push(r?);
        }
        if records.len() <= layout.skip_rows {
            return Err(AppCountError::MissingHeader {
                skip_rows: layout.skip_rows,
                records: records.len(),
            });
        }

        let mut data = records.split_off(layout.skip_rows + 1);
        let header: Vec<String> = records[layout.skip_rows]
            .iter()
            .map(|s| s.trim().to_string())
            .collect();
        let label_idx = find_column(&header, &layout.label_column)?;
        let total_idx = find_column(&header, &layout.total_column)?;
        let category_idx: Vec<usize> = (0..header.len())
            .filter(|&i| i != label_idx && i != total_idx)
            .filter(|&i| {
                if header[i].is_empty() {
                    debug!("ignoring unnamed column {}", i + 1);
                    false
                } else {
                    true
                }
            })
            .collect();
        if category_idx.is_empty() {
            return Err(AppCountError::NoCategories {
                label: layout.label_column.clone(),
                total: layout.total_column.clone(),
            });
        }

        let keep = data.len().saturating_sub(layout.skip_footer);
        data.truncate(keep);
        while let Some(last) = data.last() {
            let blank = category_idx
                .iter()
                .all(|&i| last.get(i).map_or(true, |c| c.trim().is_empty()));
            if !blank {
                break;
            }
            debug!("dropping footer row {:?}", last.get(0).unwrap_or(""));
            data.pop();
        }
        if data.is_empty() {
            return Err(AppCountError::NoData);
        }

        let mut counts = AppCounts {
            label_column: header[label_idx].clone(),
            total_column: header[total_idx].clone(),
            categories: category_idx.iter().map(|&i| header[i].clone()).collect(),
            customers: Vec::with_capacity(data.len()),
            counts: Vec::with_capacity(data.len()),
            reported_totals: Vec::with_capacity(data.len()),
        };
        // the sum of every cell bounds all the column, row and running sums
        let mut grand_total: u64 = 0;
        for record in data.iter() {
            let line = record.position().map_or(0, |p| p.line());
            let mut row = Vec::with_capacity(category_idx.len());
            for &i in category_idx.iter() {
                let cell = record.get(i).unwrap_or("").trim();
                let value = if cell.is_empty() {
                    0
                } else {
                    parse_count(cell).ok_or_else(|| AppCountError::InvalidCount {
                        line,
                        column: header[i].clone(),
                        value: cell.to_string(),
                    })?
                };
                grand_total = grand_total.checked_add(value).ok_or_else(|| {
                    AppCountError::CountOverflow {
                        line,
                        column: header[i].clone(),
                    }
                })?;
                row.push(value);
            }
            let total_cell = record.get(total_idx).unwrap_or("").trim();
            let total = parse_count(total_cell);
            if total.is_none() && !total_cell.is_empty() {
                warn!("line {}: ignoring invalid total {:?}", line, total_cell);
            }
            counts
                .customers
                .push(record.get(label_idx).unwrap_or("").trim().to_string());
            counts.counts.push(row);
            counts.reported_totals.push(total);
        }
        debug!(
            "loaded {} rows with {} application types",
            counts.len(),
            counts.categories.len()
        );
        Ok(counts)
    }

    /// number of rows (time points)
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// running sum of each application type, time point by time point
    pub fn cumulative(&self) -> CumulativeSeries {
        let mut running = vec![0u64; self.categories.len()];
        let mut values: Vec<Vec<u64>> = vec![Vec::with_capacity(self.len()); self.categories.len()];
        for row in self.counts.iter() {
            for (j, c) in row.iter().enumerate() {
                running[j] = running[j].saturating_add(*c);
                values[j].push(running[j]);
            }
        }
        CumulativeSeries {
            categories: self.categories.clone(),
            values,
        }
    }

    /// sum of each application type over all the rows
    pub fn totals(&self) -> Totals {
        let mut values = vec![0u64; self.categories.len()];
        for row in self.counts.iter() {
            for (v, c) in values.iter_mut().zip(row.iter()) {
                *v = v.saturating_add(*c);
            }
        }
        Totals {
            categories: self.categories.clone(),
            values,
        }
    }

    /// compares the reported Total of each row with the sum of its application types;
    /// rows without a valid Total are skipped
    pub fn check_totals(&self) -> Vec<TotalMismatch> {
        let mut mismatches = Vec::new();
        for (i, (row, reported)) in self.counts.iter().zip(self.reported_totals.iter()).enumerate() {
            let computed = row.iter().fold(0u64, |acc, &c| acc.saturating_add(c));
            if let Some(reported) = *reported {
                if reported != computed {
                    warn!(
                        "time point {} ({}): reported total {} but types sum to {}",
                        i + 1,
                        self.customers[i],
                        reported,
                        computed
                    );
                    mismatches.push(TotalMismatch {
                        time_point: i + 1,
                        customer: self.customers[i].clone(),
                        reported,
                        computed,
                    });
                }
            }
        }
        mismatches
    }

    /// writes the cleaned table: label, total, and the application types
    pub fn to_csv<P: AsRef<Path>>(&self, fout: P) -> Result<()> {
        let mut wtr = Writer::from_path(fout.as_ref())?;
        let mut header = vec![self.label_column.as_str(), self.total_column.as_str()];
        header.extend(self.categories.iter().map(|s| s.as_str()));
        wtr.write_record(&header)?;
        for ((customer, total), row) in self
            .customers
            .iter()
            .zip(self.reported_totals.iter())
            .zip(self.counts.iter())
        {
            let mut record = vec![
                customer.clone(),
                total.map(|t| t.to_string()).unwrap_or_default(),
            ];
            record.extend(row.iter().map(|c| c.to_string()));
            wtr.write_record(&record)?;
        }
        wtr.flush().map_err(|e| AppCountError::io(fout.as_ref(), e))?;
        Ok(())
    }
}

impl std::fmt::Display for AppCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{}, {}, {}",
            self.label_column,
            self.total_column,
            self.categories.join(", ")
        )?;
        for ((customer, total), row) in self
            .customers
            .iter()
            .zip(self.reported_totals.iter())
            .zip(self.counts.iter())
        {
            let row: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            let total = total.map(|t| t.to_string()).unwrap_or_default();
            writeln!(f, "{}, {}, {}", customer, total, row.join(", "))?;
        }
        Ok(())
    }
}

impl CumulativeSeries {
    pub fn time_points(&self) -> usize {
        self.values.first().map_or(0, |v| v.len())
    }

    /// the largest running sum, i.e. the last value of the largest category
    pub fn max_value(&self) -> u64 {
        self.values
            .iter()
            .filter_map(|v| v.last())
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// writes time_point followed by one column per application type
    pub fn to_csv<P: AsRef<Path>>(&self, fout: P) -> Result<()> {
        let mut wtr = Writer::from_path(fout.as_ref())?;
        let mut header = vec!["time_point"];
        header.extend(self.categories.iter().map(|s| s.as_str()));
        wtr.write_record(&header)?;
        for t in 0..self.time_points() {
            let mut record = vec![(t + 1).to_string()];
            record.extend(self.values.iter().map(|v| v[t].to_string()));
            wtr.write_record(&record)?;
        }
        wtr.flush().map_err(|e| AppCountError::io(fout.as_ref(), e))?;
        Ok(())
    }
}

impl Totals {
    pub fn grand_total(&self) -> u64 {
        self.values.iter().fold(0, |acc, &v| acc.saturating_add(v))
    }

    /// share of each application type in percent, all zeros when there is nothing to share
    pub fn proportions(&self) -> Vec<f64> {
        let grand_total = self.grand_total();
        if grand_total == 0 {
            return vec![0.; self.values.len()];
        }
        self.values
            .iter()
            .map(|&v| v as f64 / grand_total as f64 * 100.)
            .collect()
    }

    pub fn to_csv<P: AsRef<Path>>(&self, fout: P) -> Result<()> {
        let mut wtr = Writer::from_path(fout.as_ref())?;
        wtr.write_record(&["category", "total", "percent"])?;
        for ((c, v), p) in self
            .categories
            .iter()
            .zip(self.values.iter())
            .zip(self.proportions().iter())
        {
            wtr.write_record(&[c.clone(), v.to_string(), format!("{:.3}", p)])?;
        }
        wtr.flush().map_err(|e| AppCountError::io(fout.as_ref(), e))?;
        Ok(())
    }
}

fn find_column(header: &[String], name: &str) -> Result<usize> {
    header
        .iter()
        .position(|h| h == name)
        .or_else(|| header.iter().position(|h| h.eq_ignore_ascii_case(name)))
        .ok_or_else(|| AppCountError::MissingColumn {
            name: name.to_string(),
            found: header.to_vec(),
        })
}

/// parses a non-negative count, accepting thousands separators such as "1,250"
pub fn parse_count(cell: &str) -> Option<u64> {
    let cleaned: String = cell.trim().chars().filter(|&c| c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<u64>().ok()
}

/// The month of the export, from a trailing "-YYYY-MM" in the file name.
pub fn export_period<P: AsRef<Path>>(fin: P) -> Option<NaiveDate> {
    let stem = fin.as_ref().file_stem()?.to_str()?;
    let start = stem.len().checked_sub(7)?;
    let tail = stem.get(start..)?;
    if start > 0 && !stem[..start].ends_with('-') {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{}-01", tail), "%Y-%m-%d").ok()
}

/// Sets up the tracing subscriber; RUST_LOG wins over the verbose flag.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
