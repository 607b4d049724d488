//! Template filling.
//!
//! Every scanned occurrence is replaced exactly once, by position, with
//! the effective value of its field. Substituted text is never scanned
//! again, so values containing `$...$` are inserted verbatim.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ops::Range;

use kubeapp_common::config::MissingValuePolicy;
use kubeapp_common::constants::MISSING_VALUE_LITERAL;
use kubeapp_common::error::{KubeAppError, Result};
use rand::Rng;

use crate::field::{Field, FieldTable};
use crate::lexer;

/// Caller-supplied field values keyed by field name.
pub type FieldValues = BTreeMap<String, String>;

#[derive(Debug, Clone)]
struct Occurrence {
    span: Range<usize>,
    field: usize,
}

/// A raw app definition with its resolved fields.
#[derive(Debug, Clone)]
pub struct Template {
    raw: String,
    occurrences: Vec<Occurrence>,
    fields: FieldTable,
}

impl Template {
    /// Scans `raw` and resolves its fields, drawing autogen tokens from `rng`.
    pub fn parse<R: Rng + ?Sized>(raw: impl Into<String>, rng: &mut R) -> Self {
        let raw = raw.into();
        let placeholders = lexer::scan(&raw);
        let fields = FieldTable::resolve(&placeholders, rng);
        let occurrences = placeholders
            .iter()
            .filter_map(|p| {
                fields.index_of(p.name).map(|field| Occurrence {
                    span: p.span(),
                    field,
                })
            })
            .collect();
        tracing::info!(fields = fields.len(), "parsed template");
        Self {
            raw,
            occurrences,
            fields,
        }
    }

    /// The unfilled template text.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The resolved field table.
    #[must_use]
    pub const fn fields(&self) -> &FieldTable {
        &self.fields
    }

    /// Rewrites the template with `values`, falling back to field defaults.
    ///
    /// A value in `values` wins over the default only when its key is
    /// present. Keys that name no field are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`KubeAppError::MissingValue`] when a field has neither a value
    /// nor a default and `policy` is [`MissingValuePolicy::Reject`].
    pub fn fill(&self, values: &FieldValues, policy: MissingValuePolicy) -> Result<String> {
        for key in values.keys().filter(|k| self.fields.get(k).is_none()) {
            tracing::debug!(field = %key, "ignoring value for unknown field");
        }

        let effective = self
            .fields
            .fields()
            .iter()
            .map(|field| effective_value(field, values, policy))
            .collect::<Result<Vec<_>>>()?;

        let mut out = String::with_capacity(self.raw.len());
        let mut cursor = 0;
        for occurrence in &self.occurrences {
            out.push_str(&self.raw[cursor..occurrence.span.start]);
            out.push_str(&effective[occurrence.field]);
            cursor = occurrence.span.end;
        }
        out.push_str(&self.raw[cursor..]);
        Ok(out)
    }
}

fn effective_value<'a>(
    field: &'a Field,
    values: &'a FieldValues,
    policy: MissingValuePolicy,
) -> Result<Cow<'a, str>> {
    if let Some(value) = values.get(&field.name) {
        return Ok(Cow::Borrowed(value));
    }
    match (&field.default_value, policy) {
        (Some(default), _) => Ok(Cow::Borrowed(default)),
        (None, MissingValuePolicy::Literal) => {
            tracing::warn!(field = %field.name, "no value for field, substituting literal");
            Ok(Cow::Borrowed(MISSING_VALUE_LITERAL))
        }
        (None, MissingValuePolicy::Reject) => Err(KubeAppError::MissingValue {
            field: field.name.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn template(raw: &str) -> Template {
        Template::parse(raw, &mut StdRng::seed_from_u64(3))
    }

    fn values(pairs: &[(&str, &str)]) -> FieldValues {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn fill_without_placeholders_is_identity() {
        let raw = "kind: Pod\nmetadata:\n  name: web # costs \\$5\n";
        let filled = template(raw)
            .fill(&FieldValues::new(), MissingValuePolicy::Reject)
            .expect("should fill");
        assert_eq!(filled, raw);
    }

    #[test]
    fn parse_keeps_raw_text() {
        let plain = template("kind: Pod\n");
        assert_eq!(plain.raw(), "kind: Pod\n");
        assert!(plain.fields().is_empty());

        let named = template("name: $NAME|default:web$\n");
        assert_eq!(named.raw(), "name: $NAME|default:web$\n");
        assert!(!named.fields().is_empty());
    }

    #[test]
    fn fill_replaces_every_occurrence_once() {
        let filled = template("$X$ and $X$")
            .fill(&values(&[("X", "Q")]), MissingValuePolicy::Reject)
            .expect("should fill");
        assert_eq!(filled, "Q and Q");
    }

    #[test]
    fn fill_uses_defaults_and_overrides() {
        let tpl = template("user: $USER|default:admin$\nport: $PORT|default:80$");
        let filled = tpl
            .fill(&values(&[("PORT", "8080")]), MissingValuePolicy::Reject)
            .expect("should fill");
        assert_eq!(filled, "user: admin\nport: 8080");
    }

    #[test]
    fn fill_reuses_autogen_token_across_occurrences() {
        let tpl = template("a: $TOKEN|default:autogen$\nb: $TOKEN$");
        let filled = tpl
            .fill(&FieldValues::new(), MissingValuePolicy::Reject)
            .expect("should fill");
        let token = tpl
            .fields()
            .get("TOKEN")
            .and_then(|f| f.default_value.clone())
            .expect("token");
        assert_eq!(filled, format!("a: {token}\nb: {token}"));
        assert!(('b'..='z').contains(&token.chars().next().expect("first")));
    }

    #[test]
    fn fill_resolves_forward_reference() {
        let filled = template("$X$ ... $X|default:foo$")
            .fill(&FieldValues::new(), MissingValuePolicy::Reject)
            .expect("should fill");
        assert_eq!(filled, "foo ... foo");
    }

    #[test]
    fn fill_does_not_rescan_substituted_values() {
        let filled = template("$A$ $B$")
            .fill(&values(&[("A", "$B$"), ("B", "b")]), MissingValuePolicy::Reject)
            .expect("should fill");
        assert_eq!(filled, "$B$ b");
    }

    #[test]
    fn fill_leaves_escaped_text_alone() {
        let filled = template(r"$Y|default:y$ \$X$")
            .fill(&values(&[("X", "x")]), MissingValuePolicy::Reject)
            .expect("should fill");
        assert_eq!(filled, r"y \$X$");
    }

    #[test]
    fn fill_keeps_deferred_field_verbatim() {
        let raw = "domain: $D|default:user_domain_list|Domain$";
        let filled = template(raw)
            .fill(&FieldValues::new(), MissingValuePolicy::Reject)
            .expect("should fill");
        assert_eq!(filled, raw);
    }

    #[test]
    fn fill_rejects_missing_value_by_default() {
        let err = template("name: $NAME$")
            .fill(&FieldValues::new(), MissingValuePolicy::Reject)
            .expect_err("no value");
        assert!(matches!(err, KubeAppError::MissingValue { ref field } if field == "NAME"));
    }

    #[test]
    fn fill_literal_policy_writes_undefined() {
        let filled = template("name: $NAME$")
            .fill(&FieldValues::new(), MissingValuePolicy::Literal)
            .expect("should fill");
        assert_eq!(filled, "name: undefined");
    }

    #[test]
    fn fill_ignores_unknown_keys() {
        let filled = template("v: $V|default:1$")
            .fill(&values(&[("OTHER", "x")]), MissingValuePolicy::Reject)
            .expect("should fill");
        assert_eq!(filled, "v: 1");
    }
}
