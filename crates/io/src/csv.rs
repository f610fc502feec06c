// Delimited text import
// Tries a fixed grid of delimiters and encodings, then falls back to sniffing.

use std::borrow::Cow;

use leadmerge_core::{Cell, Table};

use crate::ingest::TextEncoding;

/// Delimiters tried in priority order.
pub const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Encodings tried for each delimiter, in priority order.
pub const ENCODINGS: [TextEncoding; 4] = [
    TextEncoding::Utf8,
    TextEncoding::Latin1,
    TextEncoding::Windows1252,
    TextEncoding::Utf8Bom,
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A successful delimited parse and how it was obtained.
#[derive(Debug)]
pub struct DelimitedParse {
    pub table: Table,
    pub delimiter: u8,
    pub encoding: TextEncoding,
    /// True when the grid failed and the sniffing fallback produced the table.
    pub sniffed: bool,
}

/// Parse delimited bytes with unknown delimiter and encoding.
///
/// Each (delimiter, encoding) trial must decode, parse without a row wider
/// than the header, and yield more than one column. A one-column result
/// means the delimiter was wrong, so it is rejected even though it parsed.
/// When no trial is accepted, the delimiter is sniffed from UTF-8 text and
/// any column count is accepted.
pub fn read_delimited(bytes: &[u8]) -> Result<DelimitedParse, String> {
    for &delimiter in &DELIMITERS {
        for &encoding in &ENCODINGS {
            let Some(content) = decode(bytes, encoding) else {
                continue;
            };
            match parse_delimited(&content, delimiter) {
                Ok(table) if table.column_count() > 1 => {
                    return Ok(DelimitedParse { table, delimiter, encoding, sniffed: false });
                }
                _ => continue,
            }
        }
    }

    let content = decode(bytes, TextEncoding::Utf8)
        .ok_or_else(|| "no delimiter/encoding combination produced more than one column, and the file is not valid UTF-8".to_string())?;
    let delimiter = sniff_delimiter(&content);
    let table = parse_delimited(&content, delimiter)?;
    Ok(DelimitedParse { table, delimiter, encoding: TextEncoding::Utf8, sniffed: true })
}

/// Decode bytes strictly. `None` means the bytes are not valid in `encoding`.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> Option<Cow<'_, str>> {
    match encoding {
        // A leading BOM is dropped so it never leaks into the first header.
        TextEncoding::Utf8 | TextEncoding::Utf8Bom => {
            let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            std::str::from_utf8(body).ok().map(Cow::Borrowed)
        }
        TextEncoding::Latin1 => Some(Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())),
        TextEncoding::Windows1252 => encoding_rs::WINDOWS_1252
            .decode_without_bom_handling_and_without_replacement(bytes),
    }
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate, count fields per line. The delimiter that produces the
/// most consistent field count (>1 field) wins; comma when nothing qualifies.
pub fn sniff_delimiter(content: &str) -> u8 {
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in &DELIMITERS {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Score: (number of lines with same field count as line 1) * field_count
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Parse text with a known delimiter. The first record is the header row.
///
/// Short rows are padded with missing cells. Empty fields past the header
/// width are dropped; a row with non-empty fields past it is a parse error.
/// Empty fields become missing cells.
pub fn parse_delimited(content: &str, delimiter: u8) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(result) => result.map_err(|e| e.to_string())?,
        None => return Err("no header row".to_string()),
    };

    let columns = normalize_headers(header.iter());
    let width = columns.len();
    let mut table = Table::new(columns);

    for (idx, result) in records.enumerate() {
        let record = result.map_err(|e| e.to_string())?;
        // Trailing delimiters produce empty extra fields; only real data past the header is an error.
        let mut len = record.len();
        while len > width && record.get(len - 1).is_some_and(str::is_empty) {
            len -= 1;
        }
        if len > width {
            return Err(format!(
                "line {}: expected {} fields, saw {}",
                idx + 2,
                width,
                record.len()
            ));
        }
        let row: Vec<Cell> = record
            .iter()
            .take(len)
            .map(|field| if field.is_empty() { None } else { Some(field.to_string()) })
            .collect();
        table.push_row(row);
    }

    Ok(table)
}

/// Trim header names, name blank headers `Unnamed: <index>`, and suffix
/// repeated names with `.1`, `.2`, ...
pub fn normalize_headers<'a, I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = Vec::new();
    for (idx, name) in raw.into_iter().enumerate() {
        let trimmed = name.trim();
        let base = if trimmed.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            trimmed.to_string()
        };

        let mut candidate = base.clone();
        let mut n = 1;
        while out.contains(&candidate) {
            candidate = format!("{base}.{n}");
            n += 1;
        }
        out.push(candidate);
    }
    out
}
