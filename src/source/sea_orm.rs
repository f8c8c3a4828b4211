//! Sea-ORM data source: executes the filter/sort specification against a
//! single base table, with explicit LEFT JOINs for foreign paths.
//!
//! A foreign path like `company.name` addresses a [`JoinClause`] by its
//! alias and a column on the joined table. The adapter selects each
//! exposed related column under its dotted alias, so rendered rows read
//! `row.related("company.name")` without knowing about SQL.
//!
//! The generated queries stay within the filter contract: prefix
//! `LIKE`, `IN`, `AND`/`OR` and `ORDER BY`. sea_query renders an
//! empty `IN` list as a false condition, which is exactly the "no label
//! matched" semantics the translator relies on.

use async_trait::async_trait;
use sea_orm::sea_query::{
    Alias, Asterisk, Expr, ExprTrait, Func, JoinType, Order, Query, SelectStatement, SimpleExpr,
};
use sea_orm::{Condition, ConnectionTrait, DatabaseConnection, DbErr, FromQueryResult, JsonValue};
use serde_json::{Map, Value};

use super::{DataSource, Row};
use crate::errors::SourceError;
use crate::filtering::{FilterNode, SortKey};

/// A LEFT JOIN declaration: `base.from_column = alias.to_column`, with
/// the related columns exposed to filtering and rendering.
#[derive(Debug, Clone)]
pub struct JoinClause {
    /// Alias the foreign paths address (first path segment).
    pub alias: String,
    /// Joined table name.
    pub table: String,
    /// Join column on the base table.
    pub from_column: String,
    /// Join column on the joined table.
    pub to_column: String,
    /// Columns of the joined table selected under `alias.column` keys.
    pub columns: Vec<String>,
}

/// A fetched row; joined columns appear under their dotted `alias.column`
/// key, so `value` and `related` are both plain lookups.
#[derive(Debug, Clone)]
pub struct JsonRow(Map<String, Value>);

impl Row for JsonRow {
    fn value(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    fn related(&self, path: &str) -> Option<&Value> {
        self.0.get(path)
    }
}

/// Executes counts and page fetches for one base table through a
/// [`DatabaseConnection`].
pub struct SeaOrmSource {
    db: DatabaseConnection,
    table: String,
    joins: Vec<JoinClause>,
}

impl SeaOrmSource {
    #[must_use]
    pub fn new(db: DatabaseConnection, table: impl Into<String>) -> Self {
        Self { db, table: table.into(), joins: Vec::new() }
    }

    /// Adds a LEFT JOIN for a foreign path.
    #[must_use]
    pub fn join(mut self, clause: JoinClause) -> Self {
        self.joins.push(clause);
        self
    }

    fn apply_joins(&self, select: &mut SelectStatement) {
        for join in &self.joins {
            select.join_as(
                JoinType::LeftJoin,
                Alias::new(&join.table),
                Alias::new(&join.alias),
                Expr::col((Alias::new(&self.table), Alias::new(&join.from_column)))
                    .equals((Alias::new(&join.alias), Alias::new(&join.to_column))),
            );
        }
    }

    fn base_select(&self) -> SelectStatement {
        let mut select = Query::select();
        select
            .column((Alias::new(&self.table), Asterisk))
            .from(Alias::new(&self.table));
        self.apply_joins(&mut select);
        for join in &self.joins {
            for column in &join.columns {
                select.expr_as(
                    Expr::col((Alias::new(&join.alias), Alias::new(column))),
                    Alias::new(format!("{}.{}", join.alias, column)),
                );
            }
        }
        select
    }

    fn column(&self, target: &str) -> Expr {
        match target.split_once('.') {
            Some((alias, column)) => Expr::col((Alias::new(alias), Alias::new(column))),
            None => Expr::col((Alias::new(&self.table), Alias::new(target))),
        }
    }

    fn condition(&self, node: &FilterNode) -> Condition {
        match node {
            FilterNode::Any(children) => children
                .iter()
                .fold(Condition::any(), |cond, child| cond.add(self.condition(child))),
            FilterNode::All(children) => children
                .iter()
                .fold(Condition::all(), |cond, child| cond.add(self.condition(child))),
            FilterNode::StartsWith { target, term, case_insensitive } => {
                let expr = if *case_insensitive {
                    Func::upper(self.column(target))
                        .like(format!("{}%", escape_like(&term.to_uppercase())))
                } else {
                    self.column(target).like(format!("{}%", escape_like(term)))
                };
                Condition::all().add(expr)
            }
            FilterNode::InSet { target, values } => {
                Condition::all().add(self.column(target).is_in(values.iter().cloned()))
            }
        }
    }
}

/// Escape LIKE wildcards so a search term cannot widen its own pattern.
fn escape_like(input: &str) -> String {
    input.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[derive(FromQueryResult)]
struct CountRow {
    count: i64,
}

#[async_trait]
impl DataSource for SeaOrmSource {
    type Row = JsonRow;

    async fn count(&self, filter: Option<&FilterNode>) -> Result<u64, SourceError> {
        let mut select = Query::select();
        select
            .expr_as(SimpleExpr::Custom("COUNT(*)".to_owned()), Alias::new("count"))
            .from(Alias::new(&self.table));
        self.apply_joins(&mut select);
        if let Some(node) = filter {
            select.cond_where(self.condition(node));
        }
        let statement = self.db.get_database_backend().build(&select);
        let row = CountRow::find_by_statement(statement).one(&self.db).await?;
        Ok(row.map_or(0, |r| u64::try_from(r.count).unwrap_or(0)))
    }

    async fn fetch(
        &self,
        filter: Option<&FilterNode>,
        sort: &[SortKey],
        offset: u64,
        limit: u64,
    ) -> Result<Vec<JsonRow>, SourceError> {
        let mut select = self.base_select();
        if let Some(node) = filter {
            select.cond_where(self.condition(node));
        }
        for key in sort {
            let direction = if key.ascending { Order::Asc } else { Order::Desc };
            match key.target.split_once('.') {
                Some((alias, column)) => {
                    select.order_by((Alias::new(alias), Alias::new(column)), direction)
                }
                None => {
                    select.order_by((Alias::new(&self.table), Alias::new(key.target.as_str())), direction)
                }
            };
        }
        select.offset(offset).limit(limit);

        let statement = self.db.get_database_backend().build(&select);
        let rows = JsonValue::find_by_statement(statement).all(&self.db).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(fields) => Some(JsonRow(fields)),
                _ => None,
            })
            .collect())
    }
}

impl From<DbErr> for SourceError {
    fn from(err: DbErr) -> Self {
        Self::with_internal("backing store query failed", err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_covers_wildcards() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("\\%"), "\\\\\\%");
    }
}
