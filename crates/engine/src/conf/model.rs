//! Model — the layered parser document as written in TOML.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Expected, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::parser::{FieldRule, FieldRules};

/// Name of the mandatory profile, and of the baseline entry inside it.
pub const DEFAULT_PROFILE: &str = "default";

/// Type name -> entry, in document order.
pub type Profile = IndexMap<String, TypeEntry>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParserDocument {
    /// Target database name
    #[serde(default)]
    pub db_name: Option<String>,
    /// Type detection rule shared by every line, independent of profiles
    #[serde(default)]
    pub type_token: Option<RuleSpec>,
    #[serde(default)]
    pub profiles: IndexMap<String, Profile>,
}

/// One `[profiles.<profile>.<type>]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TypeEntry {
    /// Recognition key. Optional outside the default profile.
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<FieldSpec>>,
}

impl TypeEntry {
    /// Declared field rules; a later duplicate name wins.
    pub fn rules(&self) -> FieldRules {
        self.fields
            .iter()
            .flatten()
            .map(|spec| (spec.name.clone(), spec.rule))
            .collect()
    }
}

/// `[name, token_index]`, `[name, token_index, [start]]` or
/// `[name, token_index, [start, end]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub rule: FieldRule,
}

/// `[token_index]` or `[token_index, [start, end]]`, used for `type_token`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleSpec(pub FieldRule);

impl<'de> Deserialize<'de> for FieldSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldSpecVisitor;

        impl<'de> Visitor<'de> for FieldSpecVisitor {
            type Value = FieldSpec;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("[name, token_index] with an optional [slice_start, slice_end]")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let name: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let rule = rule_from_seq(&mut seq, 1, &self)?;
                Ok(FieldSpec { name, rule })
            }
        }

        deserializer.deserialize_seq(FieldSpecVisitor)
    }
}

impl<'de> Deserialize<'de> for RuleSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RuleSpecVisitor;

        impl<'de> Visitor<'de> for RuleSpecVisitor {
            type Value = RuleSpec;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("[token_index] with an optional [slice_start, slice_end]")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                rule_from_seq(&mut seq, 0, &self).map(RuleSpec)
            }
        }

        deserializer.deserialize_seq(RuleSpecVisitor)
    }
}

/// Reads `token_index` and the optional slice pair. `seen` is the number of
/// elements the caller already consumed.
fn rule_from_seq<'de, A>(seq: &mut A, seen: usize, exp: &dyn Expected) -> Result<FieldRule, A::Error>
where
    A: SeqAccess<'de>,
{
    let token_index: i64 = seq
        .next_element()?
        .ok_or_else(|| de::Error::invalid_length(seen, exp))?;
    let slice: Option<Vec<i64>> = seq.next_element()?;
    if seq.next_element::<IgnoredAny>()?.is_some() {
        return Err(de::Error::invalid_length(seen + 3, exp));
    }

    let (start, end) = match slice.as_deref() {
        None => (None, None),
        Some([start]) => (Some(*start), None),
        Some([start, end]) => (Some(*start), Some(*end)),
        Some(other) => {
            return Err(de::Error::invalid_length(
                other.len(),
                &"a slice of one or two bounds",
            ))
        }
    };
    Ok(FieldRule::sliced(token_index, start, end))
}
