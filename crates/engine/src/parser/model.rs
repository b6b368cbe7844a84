use std::fmt;

use chrono::NaiveDateTime;
use indexmap::IndexMap;

/// Field name -> extraction rule, in declaration order.
pub type FieldRules = IndexMap<String, FieldRule>;

/// Where a field lives in a space-tokenized line.
///
/// `token_index` picks the token (negative counts from the end), then the
/// optional character slice `[slice_start:slice_end]` is applied to it.
/// Either bound may be absent; both absent means the whole token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub token_index: i64,
    pub slice_start: Option<i64>,
    pub slice_end: Option<i64>,
}

impl FieldRule {
    pub fn new(token_index: i64) -> Self {
        Self {
            token_index,
            slice_start: None,
            slice_end: None,
        }
    }

    pub fn sliced(token_index: i64, slice_start: Option<i64>, slice_end: Option<i64>) -> Self {
        Self {
            token_index,
            slice_start,
            slice_end,
        }
    }

    /// Absolute position of the selected token in a line of `len` tokens.
    pub fn token_position(&self, len: usize) -> Option<usize> {
        let len = i64::try_from(len).ok()?;
        let pos = if self.token_index < 0 {
            len + self.token_index
        } else {
            self.token_index
        };
        (0..len).contains(&pos).then_some(pos as usize)
    }

    /// Extract this rule's value from `tokens`.
    ///
    /// Never fails: an out-of-range token index or slice bound yields `None`.
    pub fn extract<'a>(&self, tokens: &[&'a str]) -> Option<&'a str> {
        let token = tokens[self.token_position(tokens.len())?];
        slice_chars(token, self.slice_start, self.slice_end)
    }
}

fn resolve_bound(bound: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let pos = if bound < 0 { len + bound } else { bound };
    (0..=len).contains(&pos).then_some(pos as usize)
}

/// Character-based slice of `token`. Bounds outside the token, or a start
/// past the end, give `None`.
fn slice_chars(token: &str, start: Option<i64>, end: Option<i64>) -> Option<&str> {
    if start.is_none() && end.is_none() {
        return Some(token);
    }

    let len = token.chars().count();
    let from = match start {
        Some(b) => resolve_bound(b, len)?,
        None => 0,
    };
    let to = match end {
        Some(b) => resolve_bound(b, len)?,
        None => len,
    };
    if from > to {
        return None;
    }

    let byte_at = |n: usize| {
        token
            .char_indices()
            .nth(n)
            .map_or(token.len(), |(i, _)| i)
    };
    Some(&token[byte_at(from)..byte_at(to)])
}

/// One recognizable log line type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    /// Human readable type name, stored in the record's `type` column
    pub alias: String,
    /// Always a superset of the baseline field names
    pub fields: FieldRules,
}

impl TypeDefinition {
    /// New definition starting from a copy of the baseline rules.
    pub fn seeded(alias: impl Into<String>, baseline: &FieldRules) -> Self {
        Self {
            alias: alias.into(),
            fields: baseline.clone(),
        }
    }

    /// Replace rules by field name. A rule is swapped whole, never merged.
    pub fn apply_overrides(&mut self, overrides: &FieldRules) {
        for (name, rule) in overrides {
            self.fields.insert(name.clone(), *rule);
        }
    }

    pub fn rule(&self, field: Field) -> Option<&FieldRule> {
        self.fields.get(field.as_str())
    }
}

/// Immutable lookup table from recognition pattern to type definition.
///
/// The baseline rules live beside the table under the reserved key
/// [`ParseTable::RESERVED_KEY`] and are never matched as a line type.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseTable {
    types: IndexMap<String, TypeDefinition>,
    baseline: FieldRules,
    type_rule: FieldRule,
}

impl ParseTable {
    pub const RESERVED_KEY: &'static str = "default";

    pub(crate) fn new(
        types: IndexMap<String, TypeDefinition>,
        baseline: FieldRules,
        type_rule: FieldRule,
    ) -> Self {
        Self {
            types,
            baseline,
            type_rule,
        }
    }

    /// Exact-match lookup of a raw type token.
    pub fn lookup(&self, token: &str) -> Option<&TypeDefinition> {
        self.types.get(token)
    }

    pub fn baseline(&self) -> &FieldRules {
        &self.baseline
    }

    pub fn type_rule(&self) -> &FieldRule {
        &self.type_rule
    }

    /// Current recognition pattern of the type named `alias`.
    pub fn pattern_for(&self, alias: &str) -> Option<&str> {
        self.types
            .iter()
            .find(|(_, def)| def.alias == alias)
            .map(|(pattern, _)| pattern.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDefinition)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// The closed set of extracted columns (besides date, type and text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Level,
    Origin,
    Ip,
    Http,
    Route,
    Code,
    Time,
    User,
    Model,
    Records,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Level,
        Field::Origin,
        Field::Ip,
        Field::Http,
        Field::Route,
        Field::Code,
        Field::Time,
        Field::User,
        Field::Model,
        Field::Records,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Level => "level",
            Field::Origin => "origin",
            Field::Ip => "ip",
            Field::Http => "http",
            Field::Route => "route",
            Field::Code => "code",
            Field::Time => "time",
            Field::User => "user",
            Field::Model => "model",
            Field::Records => "records",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured log line ready for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub date: NaiveDateTime,
    pub level: Option<String>,
    pub origin: Option<String>,
    /// Alias of the matched type definition, stored in the `type` column
    pub kind: String,
    pub ip: Option<String>,
    pub http: Option<String>,
    pub route: Option<String>,
    pub code: Option<i64>,
    pub time: Option<f64>,
    pub user: Option<String>,
    pub model: Option<String>,
    pub records: Option<String>,
    /// Raw remainder of the line, starting at the type token
    pub text: String,
}

impl LogRecord {
    pub fn new(date: NaiveDateTime, kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            date,
            level: None,
            origin: None,
            kind: kind.into(),
            ip: None,
            http: None,
            route: None,
            code: None,
            time: None,
            user: None,
            model: None,
            records: None,
            text: text.into(),
        }
    }
}

/// Outcome of classifying one raw line.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// No leading timestamp; dropped without being reported
    HardSkip,
    /// Valid timestamp but the type token matched nothing; carries the token
    SoftSkip(Option<String>),
    Parsed(LogRecord),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<&str> {
        line.split(' ').collect()
    }

    #[test]
    fn test_extract_plain_token() {
        let t = tokens("a b c");
        assert_eq!(FieldRule::new(1).extract(&t), Some("b"));
    }

    #[test]
    fn test_extract_index_out_of_range() {
        let t = tokens("a b");
        assert_eq!(FieldRule::new(2).extract(&t), None);
        assert_eq!(FieldRule::new(-3).extract(&t), None);
    }

    #[test]
    fn test_extract_negative_index_counts_from_end() {
        let t = tokens("a b c");
        assert_eq!(FieldRule::new(-1).extract(&t), Some("c"));
    }

    #[test]
    fn test_extract_slice_strips_brackets() {
        let t = tokens("x [ERROR] y");
        let rule = FieldRule::sliced(1, Some(1), Some(-1));
        assert_eq!(rule.extract(&t), Some("ERROR"));
    }

    #[test]
    fn test_extract_open_ended_slice() {
        let t = tokens("ip=10.0.0.1");
        assert_eq!(FieldRule::sliced(0, Some(3), None).extract(&t), Some("10.0.0.1"));
        assert_eq!(FieldRule::sliced(0, None, Some(2)).extract(&t), Some("ip"));
    }

    #[test]
    fn test_extract_slice_out_of_bounds_is_absent() {
        let t = tokens("abc");
        assert_eq!(FieldRule::sliced(0, Some(5), None).extract(&t), None);
        assert_eq!(FieldRule::sliced(0, Some(0), Some(10)).extract(&t), None);
        assert_eq!(FieldRule::sliced(0, Some(2), Some(1)).extract(&t), None);
    }

    #[test]
    fn test_extract_slice_counts_characters() {
        let t = tokens("héllo");
        assert_eq!(FieldRule::sliced(0, Some(1), Some(3)).extract(&t), Some("él"));
    }

    #[test]
    fn test_empty_tokens_are_positional() {
        let t = tokens("a  b");
        assert_eq!(FieldRule::new(1).extract(&t), Some(""));
        assert_eq!(FieldRule::new(2).extract(&t), Some("b"));
    }

    #[test]
    fn test_apply_overrides_replaces_whole_rule() {
        let mut baseline = FieldRules::new();
        baseline.insert("level".into(), FieldRule::sliced(1, Some(1), Some(-1)));
        baseline.insert("user".into(), FieldRule::new(4));

        let mut def = TypeDefinition::seeded("ERROR", &baseline);
        let mut overrides = FieldRules::new();
        overrides.insert("level".into(), FieldRule::new(2));
        def.apply_overrides(&overrides);

        assert_eq!(def.rule(Field::Level), Some(&FieldRule::new(2)));
        assert_eq!(def.rule(Field::User), Some(&FieldRule::new(4)));
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.as_str()), Some(field));
        }
        assert_eq!(Field::from_name("type"), None);
    }
}
