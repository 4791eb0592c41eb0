//! Minimal RFC 4180 record reader for the viewing activity export.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsvError {
    #[error("Unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },
}

/// One parsed record and the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Splits `text` into records. Quoted fields may contain the delimiter,
/// doubled quotes and line breaks; blank lines are skipped.
pub fn parse_records(text: &str) -> Result<Vec<CsvRecord>, CsvError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quote_line = 1;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                fields.push(std::mem::take(&mut field));
                push_record(&mut records, record_line, std::mem::take(&mut fields));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(CsvError::UnterminatedQuote { line: quote_line });
    }
    fields.push(field);
    push_record(&mut records, record_line, fields);

    Ok(records)
}

fn push_record(records: &mut Vec<CsvRecord>, line: usize, fields: Vec<String>) {
    let blank = fields.len() == 1 && fields[0].trim().is_empty();
    if !blank {
        records.push(CsvRecord { line, fields });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_records() {
        let records = parse_records("a,b,c\n1,2,3\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].fields, vec!["1", "2", "3"]);
        assert_eq!(records[1].line, 2);
    }

    #[test]
    fn test_quoted_fields() {
        let records =
            parse_records("title,n\r\n\"Superstore: Season 1, Part 2\",\"say \"\"hi\"\"\"\r\n")
                .unwrap();
        assert_eq!(
            records[1].fields,
            vec!["Superstore: Season 1, Part 2", "say \"hi\""]
        );
    }

    #[test]
    fn test_multiline_field_keeps_line_numbers() {
        let records = parse_records("h\n\"two\nlines\"\nnext\n").unwrap();
        assert_eq!(records[1].fields, vec!["two\nlines"]);
        assert_eq!(records[2].line, 4);
    }

    #[test]
    fn test_bom_and_blank_lines_ignored() {
        let records = parse_records("\u{feff}h1,h2\n\n1,2").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields, vec!["h1", "h2"]);
    }

    #[test]
    fn test_empty_fields_preserved() {
        let records = parse_records("a,,c\n").unwrap();
        assert_eq!(records[0].fields, vec!["a", "", "c"]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(
            parse_records("h\n\"open\n"),
            Err(CsvError::UnterminatedQuote { line: 2 })
        );
    }
}
