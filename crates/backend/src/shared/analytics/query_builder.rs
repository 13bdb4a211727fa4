use sea_orm::{DatabaseBackend, Statement, Value};

use super::date_range::DateRange;

/// Bound query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    Text(String),
    Integer(i64),
    Numeric(f64),
}

impl From<QueryParam> for Value {
    fn from(param: QueryParam) -> Self {
        match param {
            QueryParam::Text(s) => s.into(),
            QueryParam::Integer(i) => i.into(),
            QueryParam::Numeric(f) => f.into(),
        }
    }
}

/// Composes a parameterized `WHERE` clause.
///
/// Column names are code constants; only values travel as parameters. An
/// empty `IN` list adds no predicate at all.
#[derive(Debug, Default, Clone)]
pub struct Predicates {
    conditions: Vec<String>,
    params: Vec<QueryParam>,
}

impl Predicates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.conditions.push(format!("{} = ?", column));
        self.params.push(QueryParam::Text(value.to_string()));
        self
    }

    pub fn eq_opt(self, column: &str, value: Option<&str>) -> Self {
        match value.filter(|v| !v.trim().is_empty()) {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    /// `expr BETWEEN from AND to` on `YYYY-MM-DD` text
    pub fn date_between(mut self, expr: &str, range: &DateRange) -> Self {
        self.conditions.push(format!("{} BETWEEN ? AND ?", expr));
        self.params.push(QueryParam::Text(range.start_str()));
        self.params.push(QueryParam::Text(range.end_str()));
        self
    }

    pub fn in_list(mut self, column: &str, values: &[String]) -> Self {
        if values.is_empty() {
            return self;
        }
        let placeholders: Vec<&str> = values.iter().map(|_| "?").collect();
        self.conditions
            .push(format!("{} IN ({})", column, placeholders.join(", ")));
        self.params
            .extend(values.iter().cloned().map(QueryParam::Text));
        self
    }

    /// Fixed fragment without parameters
    pub fn raw(mut self, condition: &str) -> Self {
        self.conditions.push(condition.to_string());
        self
    }

    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn params(&self) -> &[QueryParam] {
        &self.params
    }

    /// `select_from` + WHERE + `tail` (GROUP BY / ORDER BY), ready to run
    pub fn statement(&self, select_from: &str, tail: &str) -> Statement {
        let sql = format!("{}{} {}", select_from.trim_end(), self.where_clause(), tail);
        let values: Vec<Value> = self.params.iter().cloned().map(Value::from).collect();
        Statement::from_sql_and_values(DatabaseBackend::Sqlite, sql.trim_end(), values)
    }
}

/// Splits a comma-separated filter value; blanks are dropped
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
