//! Ledger analytics over the PaySim transaction CSV
//!
//! Rows are read positionally:
//! `step,type,amount,nameOrig,oldbalanceOrg,newbalanceOrig,nameDest,
//! oldbalanceDest,newbalanceDest,isFraud,isFlaggedFraud`.
//! Header lines and rows that don't fit a report are skipped, never fatal.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Read, Write};

use csv::{ErrorKind, ReaderBuilder, StringRecord};

const STEP: usize = 0;
const TYPE: usize = 1;
const AMOUNT: usize = 2;
const NAME_ORIG: usize = 3;
const IS_FRAUD: usize = 9;

/// Available ledger reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Report {
    /// Fraudulent transactions per transaction type
    FraudByType,
    /// Fraudulent transactions per simulation step
    FraudByStep,
    /// Total amount sent per originating customer
    AmountByCustomer,
    /// Transactions per originating customer
    FrequencyByCustomer,
    /// Transactions per transaction type
    TypeDistribution,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tally {
    Count(u64),
    Sum(f64),
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tally::Count(n) => write!(f, "{}", n),
            Tally::Sum(x) => write!(f, "{:?}", x),
        }
    }
}

/// Keyed totals plus bookkeeping about the scan
#[derive(Debug, Default)]
pub struct ReportOutput {
    pub rows: BTreeMap<String, Tally>,
    pub scanned: u64,
    pub skipped: u64,
}

impl ReportOutput {
    fn count(&mut self, key: String) {
        let entry = self.rows.entry(key).or_insert(Tally::Count(0));
        if let Tally::Count(n) = entry {
            *n += 1;
        }
    }

    fn add(&mut self, key: String, amount: f64) {
        let entry = self.rows.entry(key).or_insert(Tally::Sum(0.0));
        if let Tally::Sum(total) = entry {
            *total += amount;
        }
    }

    /// Write `key<TAB>value` lines in key order
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        for (key, value) in &self.rows {
            writeln!(out, "{}\t{}", key, value)?;
        }
        out.flush()
    }
}

impl Report {
    /// Minimum number of fields a row needs to be considered
    fn min_fields(self) -> usize {
        match self {
            Report::FraudByType | Report::FraudByStep => IS_FRAUD + 1,
            Report::AmountByCustomer | Report::FrequencyByCustomer => NAME_ORIG + 1,
            Report::TypeDistribution => TYPE + 1,
        }
    }

    /// Fold one row into the output; `false` when the row was unusable
    fn accumulate(self, record: &StringRecord, output: &mut ReportOutput) -> bool {
        if record.len() < self.min_fields() {
            return false;
        }
        let field = |i: usize| record.get(i).unwrap_or_default();

        match self {
            Report::FraudByType | Report::FraudByStep => match field(IS_FRAUD).parse::<i64>() {
                Ok(1) => {
                    let key = if self == Report::FraudByType {
                        field(TYPE).to_string()
                    } else {
                        format!("Hour_{}", field(STEP))
                    };
                    output.count(key);
                    true
                }
                Ok(_) => true,
                Err(_) => false,
            },
            Report::AmountByCustomer => match field(AMOUNT).trim().parse::<f64>() {
                Ok(amount) => {
                    output.add(field(NAME_ORIG).to_string(), amount);
                    true
                }
                Err(_) => false,
            },
            Report::FrequencyByCustomer => {
                output.count(field(NAME_ORIG).to_string());
                true
            }
            Report::TypeDistribution => {
                output.count(field(TYPE).to_string());
                true
            }
        }
    }

    /// Scan a whole ledger. Only I/O failures abort the scan.
    pub fn run<R: Read>(self, input: R) -> Result<ReportOutput, csv::Error> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        let mut output = ReportOutput::default();
        let mut record = StringRecord::new();

        loop {
            match reader.read_record(&mut record) {
                Ok(false) => break,
                Ok(true) => {}
                Err(err) => {
                    if let ErrorKind::Io(_) = err.kind() {
                        return Err(err);
                    }
                    output.skipped += 1;
                    continue;
                }
            }

            if record.get(STEP).is_some_and(|f| f.starts_with("step")) {
                continue;
            }

            output.scanned += 1;
            if !self.accumulate(&record, &mut output) {
                output.skipped += 1;
            }
        }

        tracing::debug!(
            report = ?self,
            scanned = output.scanned,
            skipped = output.skipped,
            keys = output.rows.len(),
            "Ledger scanned"
        );

        Ok(output)
    }
}
