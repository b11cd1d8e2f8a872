use postgres::types::ToSql;
use postgres::{Client, Row};

use errors::RepoError;

pub type SqlParam = Box<ToSql + Sync + Send>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum QueryOperation {
    Select,
    Insert,
    Update,
    Delete,
}

enum Value {
    Param(SqlParam),
    Raw(String),
}

enum Condition {
    Equals(SqlParam),
    Any(SqlParam),
    IsNull,
}

/// Builds single-table statements with `$n` placeholders.
/// Insert, update and delete return the affected rows.
pub struct QueryBuilder {
    op: QueryOperation,
    table: String,
    values: Vec<(String, Value)>,
    filters: Vec<(String, Condition)>,
    extra: Option<String>,
}

impl QueryBuilder {
    pub fn new<N: Into<String>>(op: QueryOperation, table: N) -> Self {
        Self {
            op,
            table: table.into(),
            values: vec![],
            filters: vec![],
            extra: None,
        }
    }

    pub fn select<N: Into<String>>(table: N) -> Self {
        Self::new(QueryOperation::Select, table)
    }

    pub fn insert<N: Into<String>>(table: N) -> Self {
        Self::new(QueryOperation::Insert, table)
    }

    pub fn update<N: Into<String>>(table: N) -> Self {
        Self::new(QueryOperation::Update, table)
    }

    pub fn delete<N: Into<String>>(table: N) -> Self {
        Self::new(QueryOperation::Delete, table)
    }

    /// Column value for inserts and updates
    pub fn with_value<K: Into<String>, V: ToSql + Sync + Send + 'static>(mut self, k: K, v: V) -> Self {
        self.values.push((k.into(), Value::Param(Box::new(v))));
        self
    }

    /// Column set to a raw SQL expression, e.g. `now()`
    pub fn with_raw_value<K: Into<String>, E: Into<String>>(mut self, k: K, expr: E) -> Self {
        self.values.push((k.into(), Value::Raw(expr.into())));
        self
    }

    pub fn with_filter<K: Into<String>, V: ToSql + Sync + Send + 'static>(mut self, k: K, v: V) -> Self {
        self.filters.push((k.into(), Condition::Equals(Box::new(v))));
        self
    }

    /// Matches any element of an array parameter
    pub fn with_any_filter<K: Into<String>, V: ToSql + Sync + Send + 'static>(mut self, k: K, values: Vec<V>) -> Self {
        self.filters.push((k.into(), Condition::Any(Box::new(values))));
        self
    }

    pub fn with_null_filter<K: Into<String>>(mut self, k: K) -> Self {
        self.filters.push((k.into(), Condition::IsNull));
        self
    }

    /// Trailing clause such as `ORDER BY created_at DESC` or `ON CONFLICT ...`
    pub fn with_extra<E: Into<String>>(mut self, extra: E) -> Self {
        self.extra = Some(extra.into());
        self
    }

    pub fn build(self) -> (String, Vec<SqlParam>) {
        let QueryBuilder {
            op,
            table,
            values,
            filters,
            extra,
        } = self;

        // An update without values leaves rows untouched, so it degrades to a select.
        let op = if op == QueryOperation::Update && values.is_empty() {
            QueryOperation::Select
        } else {
            op
        };

        let mut args: Vec<SqlParam> = vec![];
        let mut query = String::new();

        match op {
            QueryOperation::Select => query.push_str(&format!("SELECT * FROM {}", table)),
            QueryOperation::Delete => query.push_str(&format!("DELETE FROM {}", table)),
            QueryOperation::Insert => {
                let mut columns = vec![];
                let mut placeholders = vec![];
                for (col, value) in values {
                    columns.push(col);
                    placeholders.push(push_value(&mut args, value));
                }
                query.push_str(&format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    table,
                    columns.join(", "),
                    placeholders.join(", ")
                ));
            }
            QueryOperation::Update => {
                let assignments = values
                    .into_iter()
                    .map(|(col, value)| format!("{} = {}", col, push_value(&mut args, value)))
                    .collect::<Vec<_>>();
                query.push_str(&format!("UPDATE {} SET {}", table, assignments.join(", ")));
            }
        }

        if op != QueryOperation::Insert {
            for (i, (col, condition)) in filters.into_iter().enumerate() {
                query.push_str(if i == 0 { " WHERE " } else { " AND " });
                match condition {
                    Condition::Equals(arg) => {
                        args.push(arg);
                        query.push_str(&format!("{} = ${}", col, args.len()));
                    }
                    Condition::Any(arg) => {
                        args.push(arg);
                        query.push_str(&format!("{} = ANY(${})", col, args.len()));
                    }
                    Condition::IsNull => query.push_str(&format!("{} IS NULL", col)),
                }
            }
        }

        // Inserts take it before RETURNING, e.g. an `ON CONFLICT` clause.
        if let Some(extra) = extra {
            if op == QueryOperation::Select || op == QueryOperation::Insert {
                query.push(' ');
                query.push_str(&extra);
            }
        }

        if op != QueryOperation::Select {
            query.push_str(" RETURNING *");
        }
        query.push(';');

        (query, args)
    }
}

fn push_value(args: &mut Vec<SqlParam>, value: Value) -> String {
    match value {
        Value::Param(arg) => {
            args.push(arg);
            format!("${}", args.len())
        }
        Value::Raw(expr) => expr,
    }
}

/// Runs a built statement on the connection and returns every produced row.
pub fn execute(conn: &mut Client, builder: QueryBuilder) -> Result<Vec<Row>, RepoError> {
    let (statement, args) = builder.build();
    trace!("Executing query: {}", statement);

    let params = args.iter().map(|arg| &**arg as &(ToSql + Sync)).collect::<Vec<_>>();

    Ok(conn.query(statement.as_str(), &params)?)
}
