//! OData-style filter expression builder for VergeOS API queries.
//!
//! The VergeOS v4 API accepts a `filter` query parameter containing a small
//! expression grammar: `field op value` conditions joined by `and`/`or`
//! connectors. [`Filter`] assembles such expressions with correct quoting and
//! escaping; [`build_filter`] is a shorthand for the common case of combining
//! a handful of field/value pairs with `and`.
//!
//! ```
//! use vergeos_core::filter::Filter;
//!
//! let filter = Filter::new().eq("status", "running").like("name", "web*");
//! assert_eq!(filter.to_string(), "status eq 'running' and name like 'web%'");
//! ```

use std::fmt;

/// Comparison operators supported by the filter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    /// Equals.
    Eq,
    /// Not equals.
    Ne,
    /// Less than.
    Lt,
    /// Greater than.
    Gt,
    /// Less than or equal.
    Le,
    /// Greater than or equal.
    Ge,
    /// Pattern match; `%` matches any run, `_` a single character.
    Like,
    /// Set membership over a parenthesized list.
    In,
}

impl FilterOp {
    /// The lowercase keyword used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Gt => "gt",
            Self::Le => "le",
            Self::Ge => "ge",
            Self::Like => "like",
            Self::In => "in",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value on the right-hand side of a filter condition.
///
/// Every renderable value is one of these variants; formatting is a single
/// exhaustive match in [`FilterValue::render`], so the quoting rules are easy
/// to audit in one place:
///
/// | Variant | Rendered form |
/// |---|---|
/// | `Null` | `null` |
/// | `Bool` | `true` / `false` |
/// | `Int` / `Float` | decimal literal, unquoted |
/// | `Text` | single-quoted, `'` doubled |
/// | `List` | `(v1, v2, ...)` (valid for `in` only) |
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// The literal `null`.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// Floating-point literal.
    Float(f64),
    /// String literal (quoted and escaped when rendered).
    Text(String),
    /// A sequence of values, rendered as a parenthesized `in` list.
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// Append this value's wire form to `out`.
    fn render(&self, out: &mut String) {
        match self {
            Self::Null => out.push_str("null"),
            Self::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Self::Int(i) => out.push_str(&i.to_string()),
            Self::Float(f) => out.push_str(&f.to_string()),
            Self::Text(s) => {
                out.push('\'');
                for ch in s.chars() {
                    if ch == '\'' {
                        out.push('\'');
                    }
                    out.push(ch);
                }
                out.push('\'');
            }
            Self::List(values) => {
                out.push('(');
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    value.render(out);
                }
                out.push(')');
            }
        }
    }

    /// Translate `*`/`?` wildcards to the wire's `%`/`_` forms.
    ///
    /// Only applies to [`FilterValue::Text`]; other variants pass through
    /// untouched.
    #[must_use]
    fn translate_wildcards(self) -> Self {
        match self {
            Self::Text(s) => Self::Text(s.replace('*', "%").replace('?', "_")),
            other => other,
        }
    }

    /// True for string values containing a `*` or `?` wildcard.
    #[must_use]
    fn has_wildcards(&self) -> bool {
        matches!(self, Self::Text(s) if s.contains('*') || s.contains('?'))
    }

    /// Wrap a scalar into a one-element list; lists pass through unchanged.
    #[must_use]
    fn into_list(self) -> Self {
        match self {
            list @ Self::List(_) => list,
            scalar => Self::List(vec![scalar]),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u64> for FilterValue {
    fn from(value: u64) -> Self {
        // Keys are well below i64::MAX in practice.
        Self::Int(value as i64)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue> + Clone> From<&[T]> for FilterValue {
    fn from(values: &[T]) -> Self {
        Self::List(values.iter().cloned().map(Into::into).collect())
    }
}

/// A token in the filter expression: a rendered condition or a connector.
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Condition(String),
    And,
    Or,
}

impl Token {
    fn as_str(&self) -> &str {
        match self {
            Self::Condition(s) => s,
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// Fluent builder for OData-style filter expressions.
///
/// Conditions appended back to back get an implicit `and` inserted between
/// them; `or` must always be requested explicitly via [`Filter::or`]. An
/// empty builder renders as the empty string.
///
/// ```
/// use vergeos_core::filter::Filter;
///
/// let filter = Filter::new()
///     .eq("enabled", true)
///     .or()
///     .in_list("status", vec!["running", "stopped"]);
/// assert_eq!(
///     filter.to_string(),
///     "enabled eq true or status in ('running', 'stopped')"
/// );
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Filter {
    tokens: Vec<Token>,
}

impl Filter {
    /// Create an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Returns true if no conditions or connectors have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Insert an implicit `and` when the previous token is a condition.
    fn auto_and(&mut self) {
        if matches!(self.tokens.last(), Some(Token::Condition(_))) {
            self.tokens.push(Token::And);
        }
    }

    fn push_condition(&mut self, field: &str, op: FilterOp, value: FilterValue) {
        let mut rendered = String::with_capacity(field.len() + 16);
        rendered.push_str(field);
        rendered.push(' ');
        rendered.push_str(op.as_str());
        rendered.push(' ');
        value.render(&mut rendered);
        self.tokens.push(Token::Condition(rendered));
    }

    fn condition(mut self, field: &str, op: FilterOp, value: FilterValue) -> Self {
        self.auto_and();
        self.push_condition(field, op, value);
        self
    }

    /// Append an `eq` (equals) condition.
    #[must_use]
    pub fn eq(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.condition(field, FilterOp::Eq, value.into())
    }

    /// Append a `ne` (not equals) condition.
    #[must_use]
    pub fn ne(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.condition(field, FilterOp::Ne, value.into())
    }

    /// Append a `lt` (less than) condition.
    #[must_use]
    pub fn lt(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.condition(field, FilterOp::Lt, value.into())
    }

    /// Append a `gt` (greater than) condition.
    #[must_use]
    pub fn gt(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.condition(field, FilterOp::Gt, value.into())
    }

    /// Append a `le` (less than or equal) condition.
    #[must_use]
    pub fn le(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.condition(field, FilterOp::Le, value.into())
    }

    /// Append a `ge` (greater than or equal) condition.
    #[must_use]
    pub fn ge(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.condition(field, FilterOp::Ge, value.into())
    }

    /// Append a `like` pattern condition.
    ///
    /// `*` and `?` in a string pattern are translated to the wire wildcards
    /// `%` and `_` before quoting.
    #[must_use]
    pub fn like(self, field: &str, pattern: impl Into<FilterValue>) -> Self {
        self.condition(field, FilterOp::Like, pattern.into().translate_wildcards())
    }

    /// Append an `in` (set membership) condition.
    ///
    /// A scalar value behaves like a one-element list.
    #[must_use]
    pub fn in_list(self, field: &str, values: impl Into<FilterValue>) -> Self {
        self.condition(field, FilterOp::In, values.into().into_list())
    }

    /// Append an explicit `and` connector.
    ///
    /// Rarely needed: `and` is inserted implicitly between conditions.
    #[must_use]
    pub fn and(mut self) -> Self {
        self.tokens.push(Token::And);
        self
    }

    /// Append an `or` connector. This is the only way to get OR semantics.
    #[must_use]
    pub fn or(mut self) -> Self {
        self.tokens.push(Token::Or);
        self
    }

    /// Render to the wire string, or `None` when the filter is empty.
    ///
    /// Convenience for plugging directly into an optional query parameter.
    #[must_use]
    pub fn into_query(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(token.as_str())?;
        }
        Ok(())
    }
}

/// Build a filter string from ordered field/value pairs joined with `and`.
///
/// Per-field policy:
/// - [`FilterValue::Null`] — the field is skipped entirely;
/// - [`FilterValue::List`] — an `in` condition over the elements;
/// - [`FilterValue::Text`] containing `*` or `?` — a `like` condition with
///   wildcards translated;
/// - anything else — an `eq` condition.
///
/// Note that the `like` promotion is a heuristic inherited from the API's
/// established client behavior: a string that should match `*` or `?`
/// literally cannot be expressed here. Use [`Filter::eq`] for literal
/// equality on such strings.
///
/// ```
/// use vergeos_core::filter::build_filter;
///
/// let filter = build_filter([("status", "running".into()), ("name", "web*".into())]);
/// assert_eq!(filter, "status eq 'running' and name like 'web%'");
/// ```
pub fn build_filter<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, FilterValue)>,
{
    let mut parts: Vec<String> = Vec::new();

    for (field, value) in pairs {
        let mut part = String::new();
        match value {
            FilterValue::Null => continue,
            list @ FilterValue::List(_) => {
                part.push_str(field);
                part.push_str(" in ");
                list.render(&mut part);
            }
            text if text.has_wildcards() => {
                part.push_str(field);
                part.push_str(" like ");
                text.translate_wildcards().render(&mut part);
            }
            other => {
                part.push_str(field);
                part.push_str(" eq ");
                other.render(&mut part);
            }
        }
        parts.push(part);
    }

    parts.join(" and ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_renders_empty_string() {
        let filter = Filter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.to_string(), "");
        assert_eq!(filter.into_query(), None);
    }

    #[test]
    fn single_condition_has_no_leading_connector() {
        let filter = Filter::new().eq("status", "running");
        assert!(!filter.is_empty());
        assert_eq!(filter.to_string(), "status eq 'running'");
    }

    #[test]
    fn adjacent_conditions_get_implicit_and() {
        let filter = Filter::new().eq("a", 1).eq("b", 2).eq("c", 3);
        assert_eq!(filter.to_string(), "a eq 1 and b eq 2 and c eq 3");
    }

    #[test]
    fn implicit_and_count_matches_condition_count() {
        let filter = Filter::new()
            .eq("a", 1)
            .ne("b", 2)
            .lt("c", 3)
            .gt("d", 4)
            .le("e", 5)
            .ge("f", 6);
        let rendered = filter.to_string();
        let ands = rendered.split(' ').filter(|tok| *tok == "and").count();
        assert_eq!(ands, 5);
    }

    #[test]
    fn or_suppresses_implicit_and() {
        let filter = Filter::new().eq("a", 1).or().eq("b", 2);
        assert_eq!(filter.to_string(), "a eq 1 or b eq 2");
    }

    #[test]
    fn explicit_and_connector() {
        let filter = Filter::new().eq("a", 1).and().eq("b", 2);
        assert_eq!(filter.to_string(), "a eq 1 and b eq 2");
    }

    #[test]
    fn comparison_operators_render_keywords() {
        assert_eq!(Filter::new().ne("a", 1).to_string(), "a ne 1");
        assert_eq!(Filter::new().lt("a", 1).to_string(), "a lt 1");
        assert_eq!(Filter::new().gt("a", 1).to_string(), "a gt 1");
        assert_eq!(Filter::new().le("a", 1).to_string(), "a le 1");
        assert_eq!(Filter::new().ge("a", 1).to_string(), "a ge 1");
    }

    #[test]
    fn string_values_are_quoted_and_escaped() {
        let filter = Filter::new().eq("name", "O'Brien's VM");
        assert_eq!(filter.to_string(), "name eq 'O''Brien''s VM'");
    }

    #[test]
    fn every_quote_is_doubled_and_nothing_else_changes() {
        let input = "a'b''c\"d%e_f";
        let filter = Filter::new().eq("x", input);
        assert_eq!(filter.to_string(), "x eq 'a''b''''c\"d%e_f'");
    }

    #[test]
    fn null_bool_and_numbers_render_bare() {
        let filter = Filter::new()
            .eq("a", FilterValue::Null)
            .eq("b", true)
            .eq("c", false)
            .eq("d", 42)
            .eq("e", 2.5);
        assert_eq!(
            filter.to_string(),
            "a eq null and b eq true and c eq false and d eq 42 and e eq 2.5"
        );
    }

    #[test]
    fn negative_numbers_render_bare() {
        let filter = Filter::new().gt("delta", -3).lt("ratio", -0.5);
        assert_eq!(filter.to_string(), "delta gt -3 and ratio lt -0.5");
    }

    #[test]
    fn like_translates_star_wildcard() {
        let filter = Filter::new().like("name", "web*");
        assert_eq!(filter.to_string(), "name like 'web%'");
    }

    #[test]
    fn like_translates_question_wildcard() {
        let filter = Filter::new().like("name", "ab?");
        assert_eq!(filter.to_string(), "name like 'ab_'");
    }

    #[test]
    fn like_escapes_quotes_after_translation() {
        let filter = Filter::new().like("name", "o'brien-*");
        assert_eq!(filter.to_string(), "name like 'o''brien-%'");
    }

    #[test]
    fn in_with_list_renders_parenthesized() {
        let filter = Filter::new().in_list("status", vec!["running", "stopped"]);
        assert_eq!(filter.to_string(), "status in ('running', 'stopped')");
    }

    #[test]
    fn in_with_scalar_wraps_single_element() {
        let filter = Filter::new().in_list("status", "running");
        assert_eq!(filter.to_string(), "status in ('running')");
    }

    #[test]
    fn in_with_mixed_types() {
        let filter = Filter::new().in_list(
            "value",
            FilterValue::List(vec![
                FilterValue::Int(1),
                FilterValue::Text("two".to_string()),
                FilterValue::Bool(true),
                FilterValue::Null,
            ]),
        );
        assert_eq!(filter.to_string(), "value in (1, 'two', true, null)");
    }

    #[test]
    fn condition_after_or_then_implicit_and_resumes() {
        let filter = Filter::new().eq("a", 1).or().eq("b", 2).eq("c", 3);
        assert_eq!(filter.to_string(), "a eq 1 or b eq 2 and c eq 3");
    }

    #[test]
    fn rendering_is_idempotent() {
        let filter = Filter::new().eq("a", 1).or().like("b", "x*");
        let first = filter.to_string();
        let second = filter.to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn build_filter_simple_equality() {
        let out = build_filter([("status", "running".into())]);
        assert_eq!(out, "status eq 'running'");
    }

    #[test]
    fn build_filter_skips_null_fields() {
        let out = build_filter([("status", "running".into()), ("name", FilterValue::Null)]);
        assert_eq!(out, "status eq 'running'");
    }

    #[test]
    fn build_filter_promotes_wildcards_to_like() {
        let out = build_filter([("name", "web*".into())]);
        assert_eq!(out, "name like 'web%'");
        let out = build_filter([("name", "web-??".into())]);
        assert_eq!(out, "name like 'web-__'");
    }

    #[test]
    fn build_filter_lists_become_in() {
        let out = build_filter([("status", vec!["running", "stopped"].into())]);
        assert_eq!(out, "status in ('running', 'stopped')");
    }

    #[test]
    fn build_filter_bools_and_ints() {
        let out = build_filter([("enabled", true.into()), ("cpu_cores", 4.into())]);
        assert_eq!(out, "enabled eq true and cpu_cores eq 4");
    }

    #[test]
    fn build_filter_preserves_pair_order() {
        let out = build_filter([
            ("a", 1.into()),
            ("b", FilterValue::Null),
            ("c", "x".into()),
        ]);
        assert_eq!(out, "a eq 1 and c eq 'x'");
    }

    #[test]
    fn build_filter_empty_input_is_empty_string() {
        let out = build_filter(std::iter::empty::<(&str, FilterValue)>());
        assert_eq!(out, "");
    }

    #[test]
    fn build_filter_escapes_quotes() {
        let out = build_filter([("name", "it's".into())]);
        assert_eq!(out, "name eq 'it''s'");
    }
}
