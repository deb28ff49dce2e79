//! Delimited-values check.
//!
//! Records may span lines inside double-quoted fields, where `""` escapes a
//! quote. Every record must have as many fields as the first one. Blank
//! lines between records are skipped rather than read as empty records, so a
//! trailing or separating blank line never trips the column count. Files
//! ending in `.tsv` are split on tabs, everything else on commas.

use std::path::Path;

use vedit_filetype::{TypeKey, extension_of};

use crate::checker::Checker;
use crate::outcome::{ValidationFailure, ValidationOutcome};
use crate::text::{read_utf8, saturate};

/// Validates comma- and tab-separated files.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvChecker;

impl Checker for CsvChecker {
    fn type_key(&self) -> TypeKey {
        TypeKey::Csv
    }

    fn check(&self, path: &Path) -> ValidationOutcome {
        let delimiter = delimiter_for(path);
        read_utf8(path)
            .and_then(|text| check_delimited(&text, delimiter))
            .into()
    }
}

fn delimiter_for(path: &Path) -> char {
    if extension_of(path).as_deref() == Some("tsv") {
        '\t'
    } else {
        ','
    }
}

/// A parsed record with the line it starts on.
struct Record {
    line: usize,
    fields: usize,
}

fn check_delimited(text: &str, delimiter: char) -> Result<(), ValidationFailure> {
    let records = split_records(text, delimiter)?;
    let Some(header) = records.first() else {
        return Ok(());
    };
    for record in records.iter().skip(1) {
        if record.fields != header.fields {
            return Err(ValidationFailure::format(format!(
                "inconsistent number of columns: expected {}, found {}",
                header.fields, record.fields
            ))
            .at_line(saturate(record.line)));
        }
    }
    Ok(())
}

fn split_records(text: &str, delimiter: char) -> Result<Vec<Record>, ValidationFailure> {
    let mut records = Vec::new();
    let mut line = 1_usize;
    let mut start_line = 1_usize;
    let mut fields = 1_usize;
    let mut blank = true;
    let mut quoted = false;
    let mut quote_line = 0_usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if quoted {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                }
                '"' => quoted = false,
                '\n' => line += 1,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => {
                quoted = true;
                quote_line = line;
                blank = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                if !blank {
                    records.push(Record {
                        line: start_line,
                        fields,
                    });
                }
                line += 1;
                start_line = line;
                fields = 1;
                blank = true;
            }
            c if c == delimiter => {
                fields += 1;
                blank = false;
            }
            _ => blank = false,
        }
    }

    if quoted {
        return Err(ValidationFailure::syntax("unterminated quoted field")
            .at_line(saturate(quote_line)));
    }
    if !blank {
        records.push(Record {
            line: start_line,
            fields,
        });
    }
    Ok(records)
}
