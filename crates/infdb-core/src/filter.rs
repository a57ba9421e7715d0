//! Compiles ad-hoc influencer filter conditions into a parameterised
//! `WHERE` clause.
//!
//! Attributes and operators are closed enums, so the only caller-controlled
//! text that reaches the store travels as bound parameters. Placeholders are
//! Postgres positional parameters, one per condition (`$1`, `$2`, ...).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Influencer columns a filter may test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterAttribute {
    #[serde(rename = "influencer_id", alias = "influencerID", alias = "influencerId")]
    InfluencerId,
    #[serde(
        rename = "influencer_name",
        alias = "influencerName",
        alias = "name"
    )]
    InfluencerName,
    #[serde(rename = "location")]
    Location,
    #[serde(rename = "age")]
    Age,
    #[serde(rename = "niche")]
    Niche,
}

impl FilterAttribute {
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            FilterAttribute::InfluencerId => "influencer_id",
            FilterAttribute::InfluencerName => "influencer_name",
            FilterAttribute::Location => "location",
            FilterAttribute::Age => "age",
            FilterAttribute::Niche => "niche",
        }
    }

    /// Numeric attributes have their values coerced to integers before binding.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, FilterAttribute::InfluencerId | FilterAttribute::Age)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<>", alias = "!=")]
    NotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    GtEq,
    /// Substring match: the bound value is wrapped in `%` wildcards.
    #[serde(rename = "LIKE", alias = "like", alias = "contains")]
    Contains,
}

impl FilterOperator {
    #[must_use]
    pub fn sql(self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::NotEq => "<>",
            FilterOperator::Lt => "<",
            FilterOperator::LtEq => "<=",
            FilterOperator::Gt => ">",
            FilterOperator::GtEq => ">=",
            FilterOperator::Contains => "LIKE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Conjunction {
    #[serde(rename = "AND", alias = "and", alias = "And")]
    And,
    #[serde(rename = "OR", alias = "or", alias = "Or")]
    Or,
}

impl Conjunction {
    #[must_use]
    pub fn sql(self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

/// Top-level joining policy for a filter request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Conditions join with `AND` unless a condition asks for `OR`.
    All,
    /// Every condition joins with `OR`; per-condition conjunctions are ignored.
    Any,
}

/// One `{attribute, operator, value, conjunction?}` triple from the caller.
///
/// The short field names (`attr`, `op`, `val`, `conj`) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    #[serde(alias = "attr")]
    pub attribute: FilterAttribute,
    #[serde(alias = "op")]
    pub operator: FilterOperator,
    #[serde(alias = "val")]
    pub value: String,
    #[serde(default, alias = "conj", skip_serializing_if = "Option::is_none")]
    pub conjunction: Option<Conjunction>,
}

/// A value ready to bind against its placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Integer(i64),
    /// A numeric value with a fractional part, e.g. `age > 25.5`.
    Number(Decimal),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundParam {
    pub placeholder: String,
    pub value: FilterValue,
}

/// Output of [`compile_filter`]: a predicate without the `WHERE` keyword plus
/// its parameters in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledFilter {
    pub clause: String,
    pub params: Vec<BoundParam>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("at least one filter condition is required")]
    Empty,
    #[error("{attribute} expects a number, got '{value}'")]
    InvalidNumber {
        attribute: &'static str,
        value: String,
    },
    #[error("{attribute} is numeric and cannot be used with a contains match")]
    ContainsOnNumeric { attribute: &'static str },
}

/// Compile `conditions` into a `WHERE` predicate under `mode`.
///
/// The first condition carries no conjunction. Later conditions are chained
/// left to right with no added grouping, so mixed `AND`/`OR` chains follow the
/// store's own operator precedence.
///
/// # Errors
///
/// Returns [`FilterError::Empty`] for an empty list, and a value error when a
/// numeric attribute receives a non-number or a contains match.
pub fn compile_filter(
    conditions: &[FilterCondition],
    mode: FilterMode,
) -> Result<CompiledFilter, FilterError> {
    if conditions.is_empty() {
        return Err(FilterError::Empty);
    }

    let mut clause = String::new();
    let mut params = Vec::with_capacity(conditions.len());

    for (index, condition) in conditions.iter().enumerate() {
        let placeholder = format!("${}", index + 1);
        let value = bind_value(condition)?;

        if index > 0 {
            let conjunction = match mode {
                FilterMode::All => condition.conjunction.unwrap_or(Conjunction::And),
                FilterMode::Any => Conjunction::Or,
            };
            clause.push(' ');
            clause.push_str(conjunction.sql());
            clause.push(' ');
        }

        clause.push_str(condition.attribute.column());
        clause.push(' ');
        clause.push_str(condition.operator.sql());
        clause.push(' ');
        clause.push_str(&placeholder);

        params.push(BoundParam { placeholder, value });
    }

    Ok(CompiledFilter { clause, params })
}

fn bind_value(condition: &FilterCondition) -> Result<FilterValue, FilterError> {
    let attribute = condition.attribute;

    if attribute.is_numeric() {
        if condition.operator == FilterOperator::Contains {
            return Err(FilterError::ContainsOnNumeric {
                attribute: attribute.column(),
            });
        }
        return parse_number(&condition.value).ok_or_else(|| FilterError::InvalidNumber {
            attribute: attribute.column(),
            value: condition.value.clone(),
        });
    }

    Ok(match condition.operator {
        FilterOperator::Contains => FilterValue::Text(format!("%{}%", condition.value)),
        _ => FilterValue::Text(condition.value.clone()),
    })
}

/// Whole numbers bind as `BIGINT`, anything else that parses as a decimal
/// binds as `NUMERIC`.
fn parse_number(raw: &str) -> Option<FilterValue> {
    let raw = raw.trim();
    if let Ok(whole) = raw.parse::<i64>() {
        return Some(FilterValue::Integer(whole));
    }
    raw.parse::<Decimal>().ok().map(FilterValue::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(
        attribute: FilterAttribute,
        operator: FilterOperator,
        value: &str,
        conjunction: Option<Conjunction>,
    ) -> FilterCondition {
        FilterCondition {
            attribute,
            operator,
            value: value.to_string(),
            conjunction,
        }
    }

    fn count_keyword(clause: &str, keyword: &str) -> usize {
        clause.split_whitespace().filter(|w| *w == keyword).count()
    }

    #[test]
    fn empty_condition_list_is_rejected() {
        assert_eq!(
            compile_filter(&[], FilterMode::All),
            Err(FilterError::Empty)
        );
        assert_eq!(
            compile_filter(&[], FilterMode::Any),
            Err(FilterError::Empty)
        );
    }

    #[test]
    fn single_condition_has_no_conjunction() {
        let compiled = compile_filter(
            &[cond(FilterAttribute::Niche, FilterOperator::Eq, "gaming", None)],
            FilterMode::All,
        )
        .expect("compile");
        assert_eq!(compiled.clause, "niche = $1");
        assert_eq!(
            compiled.params,
            vec![BoundParam {
                placeholder: "$1".to_string(),
                value: FilterValue::Text("gaming".to_string()),
            }]
        );
    }

    #[test]
    fn and_mode_honours_or_override() {
        let compiled = compile_filter(
            &[
                cond(FilterAttribute::Age, FilterOperator::Gt, "25", None),
                cond(
                    FilterAttribute::Niche,
                    FilterOperator::Contains,
                    "beauty",
                    Some(Conjunction::Or),
                ),
            ],
            FilterMode::All,
        )
        .expect("compile");

        assert_eq!(compiled.clause, "age > $1 OR niche LIKE $2");
        assert_eq!(compiled.params[0].value, FilterValue::Integer(25));
        assert_eq!(
            compiled.params[1].value,
            FilterValue::Text("%beauty%".to_string())
        );
    }

    #[test]
    fn and_mode_defaults_to_and() {
        let compiled = compile_filter(
            &[
                cond(FilterAttribute::Location, FilterOperator::Eq, "Toronto", None),
                cond(FilterAttribute::Age, FilterOperator::LtEq, "40", None),
                cond(
                    FilterAttribute::InfluencerId,
                    FilterOperator::NotEq,
                    "3",
                    Some(Conjunction::And),
                ),
            ],
            FilterMode::All,
        )
        .expect("compile");
        assert_eq!(
            compiled.clause,
            "location = $1 AND age <= $2 AND influencer_id <> $3"
        );
    }

    #[test]
    fn mixed_chain_is_not_regrouped() {
        let compiled = compile_filter(
            &[
                cond(FilterAttribute::Age, FilterOperator::Gt, "20", None),
                cond(
                    FilterAttribute::Niche,
                    FilterOperator::Eq,
                    "tech",
                    Some(Conjunction::Or),
                ),
                cond(FilterAttribute::Location, FilterOperator::Eq, "Paris", None),
            ],
            FilterMode::All,
        )
        .expect("compile");
        assert_eq!(
            compiled.clause,
            "age > $1 OR niche = $2 AND location = $3"
        );
        assert!(!compiled.clause.contains('('));
    }

    #[test]
    fn and_mode_emits_n_minus_one_conjunctions_and_unique_placeholders() {
        for n in 1..=6 {
            let conditions: Vec<_> = (0..n)
                .map(|i| {
                    let conj = (i % 2 == 0).then_some(Conjunction::Or);
                    cond(FilterAttribute::Age, FilterOperator::GtEq, "18", conj)
                })
                .collect();
            let compiled = compile_filter(&conditions, FilterMode::All).expect("compile");

            let keywords =
                count_keyword(&compiled.clause, "AND") + count_keyword(&compiled.clause, "OR");
            assert_eq!(keywords, n - 1, "clause: {}", compiled.clause);

            let mut placeholders: Vec<_> =
                compiled.params.iter().map(|p| p.placeholder.clone()).collect();
            assert_eq!(placeholders.len(), n);
            placeholders.sort();
            placeholders.dedup();
            assert_eq!(placeholders.len(), n, "placeholders must be unique");
            for p in &placeholders {
                assert_eq!(count_keyword(&compiled.clause, p), 1, "{p} reused");
            }
        }
    }

    #[test]
    fn or_mode_forces_or_regardless_of_override() {
        let compiled = compile_filter(
            &[
                cond(FilterAttribute::Niche, FilterOperator::Eq, "food", None),
                cond(
                    FilterAttribute::Location,
                    FilterOperator::Eq,
                    "Lima",
                    Some(Conjunction::And),
                ),
                cond(FilterAttribute::Age, FilterOperator::Lt, "30", None),
            ],
            FilterMode::Any,
        )
        .expect("compile");
        assert_eq!(
            compiled.clause,
            "niche = $1 OR location = $2 OR age < $3"
        );
        assert_eq!(count_keyword(&compiled.clause, "AND"), 0);
        assert_eq!(count_keyword(&compiled.clause, "OR"), 2);
    }

    #[test]
    fn contains_wraps_text_in_wildcards() {
        let compiled = compile_filter(
            &[cond(
                FilterAttribute::InfluencerName,
                FilterOperator::Contains,
                "Lee",
                None,
            )],
            FilterMode::Any,
        )
        .expect("compile");
        assert_eq!(compiled.clause, "influencer_name LIKE $1");
        assert_eq!(
            compiled.params[0].value,
            FilterValue::Text("%Lee%".to_string())
        );
    }

    #[test]
    fn comparison_operators_pass_text_unchanged() {
        let compiled = compile_filter(
            &[cond(FilterAttribute::Niche, FilterOperator::GtEq, "m", None)],
            FilterMode::All,
        )
        .expect("compile");
        assert_eq!(compiled.params[0].value, FilterValue::Text("m".to_string()));
    }

    #[test]
    fn numeric_attributes_are_coerced() {
        let compiled = compile_filter(
            &[cond(
                FilterAttribute::InfluencerId,
                FilterOperator::Eq,
                " 42 ",
                None,
            )],
            FilterMode::All,
        )
        .expect("compile");
        assert_eq!(compiled.params[0].value, FilterValue::Integer(42));
    }

    #[test]
    fn non_numeric_value_for_numeric_attribute_is_rejected() {
        let err = compile_filter(
            &[cond(FilterAttribute::Age, FilterOperator::Gt, "old", None)],
            FilterMode::All,
        )
        .unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidNumber {
                attribute: "age",
                value: "old".to_string(),
            }
        );
    }

    #[test]
    fn fractional_numbers_bind_as_decimals() {
        let compiled = compile_filter(
            &[cond(FilterAttribute::Age, FilterOperator::Gt, "25.5", None)],
            FilterMode::All,
        )
        .expect("compile");
        assert_eq!(compiled.clause, "age > $1");
        assert_eq!(
            compiled.params[0].value,
            FilterValue::Number(Decimal::new(255, 1))
        );
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        for raw in ["NaN", "inf", "-Infinity", ""] {
            let err = compile_filter(
                &[cond(FilterAttribute::Age, FilterOperator::Gt, raw, None)],
                FilterMode::All,
            )
            .unwrap_err();
            assert!(
                matches!(err, FilterError::InvalidNumber { attribute: "age", .. }),
                "{raw}: {err:?}"
            );
        }
    }

    #[test]
    fn contains_on_numeric_attribute_is_rejected() {
        let err = compile_filter(
            &[cond(FilterAttribute::Age, FilterOperator::Contains, "2", None)],
            FilterMode::All,
        )
        .unwrap_err();
        assert_eq!(err, FilterError::ContainsOnNumeric { attribute: "age" });
    }

    #[test]
    fn conditions_deserialize_from_short_field_names() {
        let raw = r#"[
            {"attr": "age", "op": ">", "val": "25"},
            {"attr": "niche", "op": "LIKE", "val": "beauty", "conj": "or"},
            {"attr": "influencerID", "op": "=", "val": "7", "conj": "AND"}
        ]"#;
        let conditions: Vec<FilterCondition> = serde_json::from_str(raw).expect("parse");
        assert_eq!(conditions[0].attribute, FilterAttribute::Age);
        assert_eq!(conditions[1].operator, FilterOperator::Contains);
        assert_eq!(conditions[1].conjunction, Some(Conjunction::Or));
        assert_eq!(conditions[2].attribute, FilterAttribute::InfluencerId);
        assert_eq!(conditions[2].conjunction, Some(Conjunction::And));
    }

    #[test]
    fn unknown_attribute_fails_to_deserialize() {
        let raw = r#"{"attr": "age; DROP TABLE influencer", "op": "=", "val": "1"}"#;
        assert!(serde_json::from_str::<FilterCondition>(raw).is_err());
    }

    #[test]
    fn filter_mode_deserializes_lowercase() {
        let mode: FilterMode = serde_json::from_str("\"any\"").expect("parse");
        assert_eq!(mode, FilterMode::Any);
    }
}
