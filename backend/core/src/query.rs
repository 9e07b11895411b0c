//! Structured SELECT query.
//!
//! Extensions receive the query as data rather than as a string so they can
//! add columns, joins or conditions before it is built.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinClause {
    pub table: String,
    pub alias: String,
    pub on: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectQuery {
    pub select: String,
    /// `(table, alias)` pairs.
    pub from: Vec<(String, String)>,
    #[serde(default)]
    pub left_join: Vec<JoinClause>,
    #[serde(default)]
    pub where_clause: Option<String>,
    #[serde(default)]
    pub group_by: Option<String>,
    #[serde(default)]
    pub order_by: Option<String>,
}

impl SelectQuery {
    /// Render the SQL text.
    pub fn build(&self) -> String {
        let from = self
            .from
            .iter()
            .map(|(table, alias)| format!("{table} {alias}"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("SELECT {} FROM {}", self.select, from);
        for join in &self.left_join {
            sql.push_str(&format!(" LEFT JOIN {} {} ON ({})", join.table, join.alias, join.on));
        }
        if let Some(cond) = &self.where_clause {
            sql.push_str(&format!(" WHERE {cond}"));
        }
        if let Some(group) = &self.group_by {
            sql.push_str(&format!(" GROUP BY {group}"));
        }
        if let Some(order) = &self.order_by {
            sql.push_str(&format!(" ORDER BY {order}"));
        }
        sql
    }
}
