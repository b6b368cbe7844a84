//! Resolve — flattening the profile layers into a [`ParseTable`].
//!
//! Layers are applied in three passes:
//! 1. the baseline rules from `profiles.default.default`
//! 2. every other type of the default profile, seeded from the baseline
//! 3. the selected profile, which may override fields, rename a type's
//!    pattern, or declare new types
//!
//! A rename relocates the entry with everything accumulated so far; it is
//! never a reset to the baseline.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::model::{ParserDocument, Profile, TypeEntry, DEFAULT_PROFILE};
use crate::error::ConfigError;
use crate::parser::{Field, FieldRule, FieldRules, ParseTable, TypeDefinition};

/// Baseline field that doubles as the type detection rule when the
/// document has no `type_token`.
const TYPE_FIELD: &str = "type";

type TypeMap = IndexMap<String, TypeDefinition>;

/// Build the parse table for `profile` from a parser document.
pub fn resolve(doc: &ParserDocument, profile: &str) -> Result<ParseTable, ConfigError> {
    let defaults = doc
        .profiles
        .get(DEFAULT_PROFILE)
        .ok_or(ConfigError::MissingDefaultProfile)?;

    let baseline = defaults
        .get(DEFAULT_PROFILE)
        .filter(|entry| entry.fields.is_some())
        .map(TypeEntry::rules)
        .ok_or(ConfigError::MissingBaseline)?;
    check_field_names(DEFAULT_PROFILE, &baseline);

    let type_rule = type_rule(doc, &baseline)?;
    let mut types = default_pass(defaults, &baseline)?;

    if profile != DEFAULT_PROFILE {
        let selected = doc
            .profiles
            .get(profile)
            .ok_or_else(|| ConfigError::UnknownProfile(profile.to_string()))?;

        for (alias, entry) in type_entries(selected) {
            apply_profile_entry(&mut types, alias, entry, &baseline)?;
        }
    }

    info!(profile, types = types.len(), "Resolved parse table");
    Ok(ParseTable::new(types, baseline, type_rule))
}

fn type_rule(doc: &ParserDocument, baseline: &FieldRules) -> Result<FieldRule, ConfigError> {
    doc.type_token
        .map(|spec| spec.0)
        .or_else(|| baseline.get(TYPE_FIELD).copied())
        .ok_or(ConfigError::MissingTypeRule)
}

/// Type entries of a profile, without its baseline entry.
fn type_entries(profile: &Profile) -> impl Iterator<Item = (&str, &TypeEntry)> {
    profile
        .iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_PROFILE)
        .map(|(name, entry)| (name.as_str(), entry))
}

fn default_pass(defaults: &Profile, baseline: &FieldRules) -> Result<TypeMap, ConfigError> {
    let mut types = TypeMap::new();

    for (alias, entry) in type_entries(defaults) {
        let pattern = entry
            .pattern
            .as_deref()
            .ok_or_else(|| ConfigError::MissingPattern { alias: alias.to_string() })?;
        ensure_not_reserved(alias, pattern)?;

        let overrides = entry.rules();
        check_field_names(alias, &overrides);

        let mut def = TypeDefinition::seeded(alias, baseline);
        def.apply_overrides(&overrides);
        if let Some(previous) = types.insert(pattern.to_string(), def) {
            warn!(
                alias,
                pattern,
                replaced = %previous.alias,
                "Pattern declared twice in the default profile; the later type wins"
            );
        }
    }

    Ok(types)
}

fn apply_profile_entry(
    types: &mut TypeMap,
    alias: &str,
    entry: &TypeEntry,
    baseline: &FieldRules,
) -> Result<(), ConfigError> {
    if let Some(pattern) = entry.pattern.as_deref() {
        ensure_not_reserved(alias, pattern)?;
    }

    let existing = types
        .iter()
        .find(|(_, def)| def.alias == alias)
        .map(|(key, _)| key.clone());

    let target = match (entry.pattern.as_deref(), existing) {
        (Some(pattern), _) if types.contains_key(pattern) => {
            if types[pattern].alias != alias {
                warn!(
                    alias,
                    pattern,
                    owner = %types[pattern].alias,
                    "Pattern already belongs to another type; applying overrides to it"
                );
            }
            pattern.to_string()
        }
        (Some(pattern), Some(old)) => {
            if let Some(def) = types.shift_remove(&old) {
                debug!(alias, from = %old, to = pattern, "Renaming type pattern");
                types.insert(pattern.to_string(), def);
            }
            pattern.to_string()
        }
        (Some(pattern), None) => {
            debug!(alias, pattern, "Adding profile-only type");
            types.insert(pattern.to_string(), TypeDefinition::seeded(alias, baseline));
            pattern.to_string()
        }
        (None, Some(old)) => old,
        (None, None) => {
            warn!(alias, "Skipping type with no pattern and no default definition");
            return Ok(());
        }
    };

    let overrides = entry.rules();
    check_field_names(alias, &overrides);
    if let Some(def) = types.get_mut(&target) {
        def.apply_overrides(&overrides);
    }
    Ok(())
}

fn ensure_not_reserved(alias: &str, pattern: &str) -> Result<(), ConfigError> {
    if pattern == ParseTable::RESERVED_KEY {
        return Err(ConfigError::ReservedPattern { alias: alias.to_string() });
    }
    Ok(())
}

fn check_field_names(alias: &str, rules: &FieldRules) {
    for name in rules.keys() {
        if name != TYPE_FIELD && Field::from_name(name).is_none() {
            debug!(alias, field = %name, "Ignoring rule for unknown field");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(toml_str: &str) -> ParserDocument {
        toml_str.parse().expect("test document should parse")
    }

    const BASE: &str = r#"
type_token = [2]

[profiles.default.default]
fields = [["level", 1], ["user", 4]]

[profiles.default.ERROR]
pattern = "ERR"
fields = [["user", 5, [1]]]

[profiles.default.INFO]
pattern = "INF"
"#;

    fn baseline() -> FieldRules {
        let mut rules = FieldRules::new();
        rules.insert("level".into(), FieldRule::new(1));
        rules.insert("user".into(), FieldRule::new(4));
        rules
    }

    #[test]
    fn test_default_profile_without_overrides_equals_baseline() {
        let d = doc(r#"
type_token = [2]
[profiles.default.default]
fields = [["level", 1], ["user", 4]]
[profiles.default.ERROR]
pattern = "ERR"
[profiles.default.INFO]
pattern = "INF"
"#);
        let table = resolve(&d, "default").unwrap();

        assert_eq!(table.len(), 2);
        for (_, def) in table.iter() {
            assert_eq!(def.fields, baseline());
        }
        assert_eq!(table.lookup("ERR").unwrap().alias, "ERROR");
        assert_eq!(table.lookup("INF").unwrap().alias, "INFO");
        assert_eq!(table.baseline(), &baseline());
    }

    #[test]
    fn test_default_profile_type_overrides() {
        let table = resolve(&doc(BASE), "default").unwrap();
        let err = table.lookup("ERR").unwrap();
        assert_eq!(err.fields["user"], FieldRule::sliced(5, Some(1), None));
        assert_eq!(err.fields["level"], FieldRule::new(1));
    }

    #[test]
    fn test_duplicate_default_pattern_keeps_later_type() {
        let d = doc(r#"
type_token = [2]
[profiles.default.default]
fields = [["level", 1], ["user", 4]]
[profiles.default.ERROR]
pattern = "ERR"
[profiles.default.FAILURE]
pattern = "ERR"
fields = [["user", 5]]
"#);
        let table = resolve(&d, "default").unwrap();

        assert_eq!(table.len(), 1);
        let def = table.lookup("ERR").unwrap();
        assert_eq!(def.alias, "FAILURE");
        assert_eq!(def.rule(Field::User), Some(&FieldRule::new(5)));
    }

    #[test]
    fn test_rename_preserves_overrides_and_drops_old_key() {
        let d = doc(&format!(
            "{}\n[profiles.staging.ERROR]\npattern = \"E\"\n",
            BASE
        ));
        let table = resolve(&d, "staging").unwrap();

        assert!(table.lookup("ERR").is_none());
        let moved = table.lookup("E").expect("renamed entry");
        assert_eq!(moved.alias, "ERROR");
        assert_eq!(moved.fields["user"], FieldRule::sliced(5, Some(1), None));
        assert_eq!(table.pattern_for("ERROR"), Some("E"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_rename_then_profile_overrides() {
        let d = doc(&format!(
            "{}\n[profiles.staging.ERROR]\npattern = \"E\"\nfields = [[\"level\", 3]]\n",
            BASE
        ));
        let table = resolve(&d, "staging").unwrap();
        let moved = table.lookup("E").unwrap();
        assert_eq!(moved.fields["level"], FieldRule::new(3));
        assert_eq!(moved.fields["user"], FieldRule::sliced(5, Some(1), None));
    }

    #[test]
    fn test_profile_only_type_seeded_from_baseline() {
        let d = doc(&format!(
            "{}\n[profiles.staging.AUDIT]\npattern = \"AUD\"\nfields = [[\"model\", 6]]\n",
            BASE
        ));
        let table = resolve(&d, "staging").unwrap();

        let audits: Vec<_> = table.iter().filter(|(_, def)| def.alias == "AUDIT").collect();
        assert_eq!(audits.len(), 1);
        let (pattern, def) = audits[0];
        assert_eq!(pattern, "AUD");
        let mut expected = baseline();
        expected.insert("model".into(), FieldRule::new(6));
        assert_eq!(def.fields, expected);
    }

    #[test]
    fn test_profile_override_without_pattern_keeps_key() {
        let d = doc(&format!(
            "{}\n[profiles.staging.INFO]\nfields = [[\"level\", 0, [0, 4]]]\n",
            BASE
        ));
        let table = resolve(&d, "staging").unwrap();
        let info = table.lookup("INF").unwrap();
        assert_eq!(info.fields["level"], FieldRule::sliced(0, Some(0), Some(4)));
        assert_eq!(info.fields["user"], FieldRule::new(4));
    }

    #[test]
    fn test_indeterminate_entry_leaves_table_unchanged() {
        let d = doc(&format!(
            "{}\n[profiles.staging.GHOST]\nfields = [[\"level\", 9]]\n",
            BASE
        ));
        let staged = resolve(&d, "staging").unwrap();
        let plain = resolve(&d, "default").unwrap();
        assert_eq!(staged, plain);
    }

    #[test]
    fn test_selected_profile_does_not_leak_into_default() {
        let d = doc(&format!(
            "{}\n[profiles.staging.ERROR]\npattern = \"E\"\n",
            BASE
        ));
        let table = resolve(&d, "default").unwrap();
        assert!(table.lookup("ERR").is_some());
        assert!(table.lookup("E").is_none());
    }

    #[test]
    fn test_pattern_owned_by_other_alias_keeps_owner() {
        let d = doc(&format!(
            "{}\n[profiles.staging.WARN]\npattern = \"ERR\"\nfields = [[\"level\", 7]]\n",
            BASE
        ));
        let table = resolve(&d, "staging").unwrap();
        let owner = table.lookup("ERR").unwrap();
        assert_eq!(owner.alias, "ERROR");
        assert_eq!(owner.fields["level"], FieldRule::new(7));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_baseline_profile_entry_in_selected_profile_is_ignored() {
        let d = doc(&format!(
            "{}\n[profiles.staging.default]\nfields = [[\"level\", 9]]\n",
            BASE
        ));
        let table = resolve(&d, "staging").unwrap();
        assert_eq!(table.baseline()["level"], FieldRule::new(1));
        assert_eq!(table.lookup("INF").unwrap().fields["level"], FieldRule::new(1));
    }

    #[test]
    fn test_missing_default_profile() {
        let d = doc("[profiles.staging.ERROR]\npattern = \"E\"\n");
        assert!(matches!(resolve(&d, "default"), Err(ConfigError::MissingDefaultProfile)));
    }

    #[test]
    fn test_missing_baseline() {
        let d = doc("type_token = [2]\n[profiles.default.ERROR]\npattern = \"ERR\"\n");
        assert!(matches!(resolve(&d, "default"), Err(ConfigError::MissingBaseline)));

        let d = doc("type_token = [2]\n[profiles.default.default]\n[profiles.default.ERROR]\npattern = \"ERR\"\n");
        assert!(matches!(resolve(&d, "default"), Err(ConfigError::MissingBaseline)));
    }

    #[test]
    fn test_unknown_profile() {
        let err = resolve(&doc(BASE), "prod").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile(ref p) if p == "prod"));
    }

    #[test]
    fn test_default_type_without_pattern() {
        let d = doc("type_token = [2]\n[profiles.default.default]\nfields = []\n[profiles.default.ERROR]\n");
        assert!(matches!(
            resolve(&d, "default"),
            Err(ConfigError::MissingPattern { ref alias }) if alias == "ERROR"
        ));
    }

    #[test]
    fn test_reserved_pattern_rejected() {
        let d = doc("type_token = [2]\n[profiles.default.default]\nfields = []\n[profiles.default.ERROR]\npattern = \"default\"\n");
        assert!(matches!(resolve(&d, "default"), Err(ConfigError::ReservedPattern { .. })));
    }

    #[test]
    fn test_type_rule_falls_back_to_baseline_type_field() {
        let d = doc("[profiles.default.default]\nfields = [[\"type\", 2, [1, -1]], [\"level\", 1]]\n");
        let table = resolve(&d, "default").unwrap();
        assert_eq!(table.type_rule(), &FieldRule::sliced(2, Some(1), Some(-1)));
    }

    #[test]
    fn test_missing_type_rule() {
        let d = doc("[profiles.default.default]\nfields = [[\"level\", 1]]\n");
        assert!(matches!(resolve(&d, "default"), Err(ConfigError::MissingTypeRule)));
    }
}
