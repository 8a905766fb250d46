//! Renders a parsed [`ListQuery`] into SQL with bound parameters.
//!
//! Callers supply the select list and the `FROM ... JOIN ...` clause; this
//! module appends `WHERE`, `ORDER BY` and `LIMIT/OFFSET`. Column names come
//! only from the static [`ListSpec`](byeolpedia_core::listing::ListSpec)
//! declarations, never from the request, so they are pushed verbatim. Every
//! request-supplied value is bound.

use byeolpedia_core::listing::{Condition, FilterValue, ListQuery, Lookup};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

/// One page of a list query plus the total number of matching rows.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub count: i64,
    pub items: Vec<T>,
}

/// Count all matching rows, then fetch the requested page.
pub async fn fetch_page<T>(
    pool: &PgPool,
    select: &str,
    from: &str,
    query: &ListQuery,
) -> Result<Page<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut count_qb = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) {from}"));
    push_where(&mut count_qb, query);
    let count = count_qb.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {select} {from}"));
    push_where(&mut qb, query);
    push_order_by(&mut qb, query);
    qb.push(" LIMIT ");
    qb.push_bind(query.limit());
    qb.push(" OFFSET ");
    qb.push_bind(query.offset());

    let items = qb.build_query_as::<T>().fetch_all(pool).await?;
    Ok(Page { count, items })
}

fn push_where(qb: &mut QueryBuilder<'_, Postgres>, query: &ListQuery) {
    let mut keyword = " WHERE ";

    for condition in &query.conditions {
        qb.push(keyword);
        keyword = " AND ";
        push_condition(qb, condition);
    }

    // Each term must match at least one search column.
    for term in &query.search_terms {
        qb.push(keyword);
        keyword = " AND ";
        qb.push("(");
        for (i, column) in query.search_columns.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(format!("{column} ILIKE "));
            qb.push_bind(format!("%{}%", escape_like(term)));
        }
        qb.push(")");
    }
}

fn push_condition(qb: &mut QueryBuilder<'_, Postgres>, condition: &Condition) {
    let column = condition.column;
    match (condition.lookup, &condition.value) {
        (Lookup::Year, _) => qb.push(format!("EXTRACT(YEAR FROM {column}) = ")),
        // Timestamp columns compare on their calendar date so that
        // `_before` includes the whole day.
        (Lookup::Gte, FilterValue::Date(_)) => qb.push(format!("({column})::date >= ")),
        (Lookup::Lte, FilterValue::Date(_)) => qb.push(format!("({column})::date <= ")),
        (Lookup::Gte, _) => qb.push(format!("{column} >= ")),
        (Lookup::Lte, _) => qb.push(format!("{column} <= ")),
        (Lookup::Exact, _) => qb.push(format!("{column} = ")),
    };
    push_value(qb, &condition.value);
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::Text(v) => qb.push_bind(v.clone()),
        FilterValue::Id(v) => qb.push_bind(*v),
        FilterValue::Bool(v) => qb.push_bind(*v),
        FilterValue::Integer(v) => qb.push_bind(*v),
        FilterValue::Date(v) => qb.push_bind(*v),
        FilterValue::Decimal(v) => qb.push_bind(*v),
    };
}

fn push_order_by(qb: &mut QueryBuilder<'_, Postgres>, query: &ListQuery) {
    qb.push(" ORDER BY ");
    for ordering in &query.ordering {
        qb.push(ordering.column);
        qb.push(if ordering.descending { " DESC, " } else { " ASC, " });
    }
    qb.push(query.tiebreaker);
}

/// Escape LIKE metacharacters so search terms match literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use byeolpedia_core::listing::{FieldKind, FilterField, ListSpec, OrderField, Ordering};

    use super::*;

    const SPEC: ListSpec = ListSpec {
        filters: &[
            FilterField::exact("group", "a.group_id", FieldKind::Id),
            FilterField::year("release_year", "a.release_date"),
            FilterField::before("added_before", "w.created_at"),
            FilterField::min("min_price", "uc.purchase_price"),
        ],
        search: &["a.title", "g.name"],
        ordering: &[OrderField::new("title", "a.title")],
        default_ordering: &[Ordering::desc("a.release_date")],
        tiebreaker: "a.id",
    };

    fn render(pairs: &[(&str, &str)]) -> String {
        let params: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let query = SPEC.parse(&params).unwrap();
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM albums a");
        push_where(&mut qb, &query);
        push_order_by(&mut qb, &query);
        qb.sql().to_string()
    }

    #[test]
    fn no_filters_renders_default_ordering_only() {
        assert_eq!(
            render(&[]),
            "SELECT * FROM albums a ORDER BY a.release_date DESC, a.id"
        );
    }

    #[test]
    fn conditions_are_bound_in_order() {
        let sql = render(&[
            ("group", "6f1c0c9e-8a43-4d4e-9a59-2b1f0f7c1a11"),
            ("release_year", "2021"),
            ("added_before", "2024-05-01"),
            ("min_price", "10.50"),
        ]);
        assert_eq!(
            sql,
            "SELECT * FROM albums a WHERE a.group_id = $1 \
             AND EXTRACT(YEAR FROM a.release_date) = $2 \
             AND (w.created_at)::date <= $3 \
             AND uc.purchase_price >= $4 \
             ORDER BY a.release_date DESC, a.id"
        );
    }

    #[test]
    fn each_search_term_spans_all_columns() {
        let sql = render(&[("search", "guess who"), ("ordering", "title")]);
        assert_eq!(
            sql,
            "SELECT * FROM albums a WHERE (a.title ILIKE $1 OR g.name ILIKE $2) \
             AND (a.title ILIKE $3 OR g.name ILIKE $4) \
             ORDER BY a.title ASC, a.id"
        );
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
    }
}
