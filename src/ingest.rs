use crate::errors::PipelineError;
use crate::models::{RawRecord, Scalar};
use csv::ReaderBuilder;

const CSV_MIME: &str = "text/csv";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn check_file_type(name: &str, content_type: &str) -> Result<(), PipelineError> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if mime == CSV_MIME || name.to_ascii_lowercase().ends_with(".csv") {
        return Ok(());
    }

    Err(PipelineError::UnsupportedFileType {
        name: name.to_string(),
        content_type: content_type.to_string(),
    })
}

// A ragged row or bad UTF-8 fails the whole file.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<RawRecord>, PipelineError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let fields = headers
            .iter()
            .zip(row.iter())
            .map(|(name, cell)| (name.to_string(), type_cell(cell)))
            .collect();
        records.push(RawRecord { fields });
    }

    Ok(records)
}

fn type_cell(cell: &str) -> Scalar {
    if cell.is_empty() {
        return Scalar::Absent;
    }
    if looks_numeric(cell.trim()) {
        if let Ok(value) = cell.trim().parse::<f64>() {
            return Scalar::Number(value);
        }
    }
    Scalar::Text(cell.to_string())
}

// Plain decimal notation only, so "inf", "NaN" and "0x1f" stay text.
fn looks_numeric(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(idx) => (&unsigned[..idx], Some(&unsigned[idx + 1..])),
        None => (unsigned, None),
    };

    let mut parts = mantissa.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let frac = parts.next();
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let mantissa_ok = match frac {
        Some(frac) => digits(whole) && digits(frac) && !(whole.is_empty() && frac.is_empty()),
        None => !whole.is_empty() && digits(whole),
    };

    let exponent_ok = match exponent {
        Some(exp) => {
            let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !exp.is_empty() && digits(exp)
        }
        None => true,
    };

    mantissa_ok && exponent_ok
}
