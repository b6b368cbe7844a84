use chrono::NaiveDateTime;
use tracing::debug;

use super::model::{Classification, Field, LogRecord, ParseTable, TypeDefinition};
use super::TIMESTAMP_FORMAT;

/// Classify one raw line against `table` and pull out its fields.
///
/// Pure and infallible: indexing misses become absent values, and lines
/// that cannot be recognized are reported through [`Classification`].
pub fn extract(line: &str, table: &ParseTable) -> Classification {
    let line = line.trim();

    let Some(date) = leading_timestamp(line) else {
        return Classification::HardSkip;
    };

    let tokens: Vec<&str> = line.split(' ').collect();

    let type_rule = table.type_rule();
    let type_token = type_rule.extract(&tokens);

    let Some(def) = type_token.and_then(|t| table.lookup(t)) else {
        return Classification::SoftSkip(type_token.map(str::to_string));
    };

    // The type token resolved, so its position is in range
    let start = type_rule.token_position(tokens.len()).unwrap_or(tokens.len());
    let text = tokens[start..].join(" ");

    Classification::Parsed(build_record(date, def, &tokens, text))
}

/// Text before the first comma, parsed as `YYYY-MM-DD HH:MM:SS`.
///
/// chrono lets the format's space match nothing and accepts a signed
/// year, so both halves are checked to be present and digit-led first.
fn leading_timestamp(line: &str) -> Option<NaiveDateTime> {
    let candidate = line.split(',').next().unwrap_or_default();

    let (date, time) = candidate.split_once(char::is_whitespace)?;
    let digit_led = |part: &str| part.as_bytes().first().is_some_and(u8::is_ascii_digit);
    if !digit_led(date) || !digit_led(time.trim_start()) {
        return None;
    }

    NaiveDateTime::parse_from_str(candidate, TIMESTAMP_FORMAT).ok()
}

fn build_record(
    date: NaiveDateTime,
    def: &TypeDefinition,
    tokens: &[&str],
    text: String,
) -> LogRecord {
    let mut record = LogRecord::new(date, def.alias.clone(), text);

    for field in Field::ALL {
        let value = def.rule(field).and_then(|rule| rule.extract(tokens));
        let Some(value) = value else {
            continue;
        };

        match field {
            Field::Level => record.level = Some(value.to_string()),
            Field::Origin => record.origin = Some(value.to_string()),
            Field::Ip => record.ip = Some(value.to_string()),
            Field::Http => record.http = Some(value.to_string()),
            Field::Route => record.route = Some(value.to_string()),
            Field::Code => record.code = parse_number(field, value),
            Field::Time => record.time = parse_number(field, value),
            Field::User => record.user = Some(value.to_string()),
            Field::Model => record.model = Some(value.to_string()),
            Field::Records => record.records = Some(value.to_string()),
        }
    }

    record
}

fn parse_number<T: std::str::FromStr>(field: Field, value: &str) -> Option<T> {
    match value.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            debug!(%field, value, "Dropping non-numeric value");
            None
        }
    }
}
