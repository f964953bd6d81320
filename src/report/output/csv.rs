//! CSV export of the parsed records.

use std::io::Write;

use crate::error::Result;
use crate::message::RecordSet;

const HEADER: [&str; 9] = [
    "Timestamp", "Author", "Message", "Year", "Month", "YearMonth", "Weekday", "Hour", "Period",
];

/// Writes every record with its derived fields.
///
/// # Format
/// - Delimiter: `;`
/// - Timestamp: `%Y-%m-%d %H:%M:%S`
/// - Multi-line bodies are quoted, newlines preserved
/// - Encoding: UTF-8
pub fn write_records_csv<W: Write>(records: &RecordSet, writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(writer);

    writer.write_record(HEADER)?;
    for r in records {
        writer.write_record([
            r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            r.author.clone(),
            r.message.clone(),
            r.year().to_string(),
            r.month().to_string(),
            r.year_month(),
            r.weekday_name().to_string(),
            r.hour().to_string(),
            r.period().label().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Same as [`write_records_csv`], into a string.
pub fn records_to_csv(records: &RecordSet) -> Result<String> {
    let mut buf = Vec::new();
    write_records_csv(records, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
