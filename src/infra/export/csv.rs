use anyhow::{anyhow, Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::entities::table::Cell;

pub const BOM: &str = "\u{feff}";

/// Serializes rows without a header line. Fields containing the delimiter,
/// a quote or a line break are quoted.
pub fn rows_to_csv(rows: &[Vec<Cell>], delimiter: u8) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Necessary)
        .flexible(true)
        .from_writer(Vec::new());

    for row in rows {
        writer
            .write_record(row.iter().map(Cell::to_string))
            .context("failed to write csv record")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow!("failed to flush csv writer: {}", err.error()))?;
    String::from_utf8(bytes).context("csv output is not valid utf-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_joined_with_delimiter_and_newline() {
        let rows = vec![
            vec![Cell::from("Agua"), Cell::Number(10.0), Cell::from("A1")],
            vec![Cell::from("Jugo; grande"), Cell::Number(0.0), Cell::Empty],
        ];

        let text = rows_to_csv(&rows, b';').expect("should serialize");

        assert_eq!(text, "Agua;10;A1\n\"Jugo; grande\";0;\n");
    }

    #[test]
    fn quotes_are_doubled() {
        let text = rows_to_csv(&[vec![Cell::from("12\" pizza"), Cell::from("x")]], b';')
            .expect("should serialize");
        assert_eq!(text, "\"12\"\" pizza\";x\n");
    }

    #[test]
    fn comma_is_left_unquoted_with_semicolon_delimiter() {
        let text = rows_to_csv(&[vec![Cell::from("a,b"), Cell::from("c")]], b';')
            .expect("should serialize");
        assert_eq!(text, "a,b;c\n");
    }

    #[test]
    fn empty_input_is_empty_text() {
        assert_eq!(rows_to_csv(&[], b';').expect("should serialize"), "");
    }
}
