use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use tracing::{error, info};

use crate::error::PersistError;
use crate::model::SourceRecord;

pub const CSV_HEADER: [&str; 5] = ["Subreddit", "Type", "Title", "URL", "Scraped_at"];

/// What `persist` did. Each format is attempted on its own.
#[derive(Debug)]
pub enum Persisted {
    NoData,
    Written {
        json: Result<(), PersistError>,
        csv: Result<(), PersistError>,
    },
}

impl Persisted {
    pub fn is_complete(&self) -> bool {
        matches!(self, Persisted::Written { json: Ok(()), csv: Ok(()) })
    }
}

pub fn persist(records: &[SourceRecord], json_path: &Path, csv_path: &Path) -> Persisted {
    if records.is_empty() {
        info!("No data to save");
        return Persisted::NoData;
    }

    let json = write_json(records, json_path);
    match &json {
        Ok(()) => info!(path = %json_path.display(), "Python topics saved"),
        Err(e) => error!(path = %json_path.display(), error = %e, "Failed to write JSON"),
    }

    let csv = write_csv(records, csv_path);
    match &csv {
        Ok(()) => info!(path = %csv_path.display(), "All topics saved"),
        Err(e) => error!(path = %csv_path.display(), error = %e, "Failed to write CSV"),
    }

    Persisted::Written { json, csv }
}

pub fn write_json(records: &[SourceRecord], path: &Path) -> Result<(), PersistError> {
    let mut out = BufWriter::new(File::create(path)?);
    write_ascii_json(&mut out, records)?;
    out.flush()?;
    Ok(())
}

/// Two-space indented JSON with every non-ASCII char escaped.
pub fn write_ascii_json<W: Write, T: Serialize + ?Sized>(
    writer: W,
    value: &T,
) -> Result<(), serde_json::Error> {
    let mut ser = Serializer::with_formatter(writer, AsciiFormatter::default());
    value.serialize(&mut ser)
}

/// `PrettyFormatter` that writes non-ASCII chars as `\uXXXX` escapes,
/// using UTF-16 surrogate pairs above U+FFFF.
#[derive(Default)]
pub struct AsciiFormatter {
    pretty: PrettyFormatter<'static>,
}

impl Formatter for AsciiFormatter {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut units = [0u16; 2];
        let mut rest = fragment;
        while let Some(pos) = rest.find(|c: char| !c.is_ascii()) {
            writer.write_all(rest[..pos].as_bytes())?;
            let ch = rest[pos..].chars().next().unwrap_or_default();
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            rest = &rest[pos + ch.len_utf8()..];
        }
        writer.write_all(rest.as_bytes())
    }
}

pub fn write_csv(records: &[SourceRecord], path: &Path) -> Result<(), PersistError> {
    let mut w = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_path(path)?;
    w.write_record(CSV_HEADER)?;

    for record in records {
        let name = record.source_name.as_str();
        let scraped_at = record.scraped_at.as_str();

        for topic in &record.topics {
            w.write_record([name, topic.kind.as_str(), topic.title.as_str(), "", scraped_at])?;
        }
        for d in &record.discussions {
            w.write_record([name, d.kind.as_str(), d.title.as_str(), d.url.as_str(), scraped_at])?;
        }
    }

    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ascii_json<T: Serialize>(value: &T) -> String {
        let mut out = Vec::new();
        write_ascii_json(&mut out, value).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn escapes_bmp_and_astral_chars() {
        assert_eq!(ascii_json(&"café"), r#""caf\u00e9""#);
        assert_eq!(ascii_json(&"🐍"), r#""\ud83d\udc0d""#);
        assert_eq!(ascii_json(&"tab\there é"), r#""tab\there \u00e9""#);
        assert_eq!(ascii_json(&"plain"), r#""plain""#);
    }

    #[test]
    fn keys_are_escaped_and_layout_stays_pretty() {
        let value = serde_json::json!({ "clé": ["Ünïcode 🐍 tips"] });
        let text = ascii_json(&value);
        assert!(text.starts_with("{\n  \"cl\\u00e9\": [\n    \""));
        assert!(text.contains(r#""\u00dcn\u00efcode \ud83d\udc0d tips""#));
        let back: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn matches_serde_pretty_output_for_ascii_input() {
        let value = serde_json::json!([{ "a": 1, "b": [] }, {}]);
        assert_eq!(ascii_json(&value), serde_json::to_string_pretty(&value).unwrap());
    }
}
