use crate::{PostgresDriver, ValueHolder};
use async_stream::try_stream;
use std::{pin::pin, sync::Arc};
use takeo_core::{
    Error, Query, QueryResult, Result, Row, RowLabeled, RowNames, RowsAffected, Value,
    stream::{Stream, StreamExt, TryStreamExt},
};
use tokio_postgres::Client;

pub(crate) fn row_to_takeo_row(row: tokio_postgres::Row) -> Result<Row> {
    (0..row.len())
        .map(|i| match row.try_get::<_, ValueHolder>(i) {
            Ok(v) => Ok(v.0),
            Err(e) => {
                let col = &row.columns()[i];
                Err(Error::new(e).context(format!(
                    "Could not decode column {} `{}` of type {}",
                    i,
                    col.name(),
                    col.type_()
                )))
            }
        })
        .collect()
}

/// Run `query` on `client`: every returned row, then the affected row count.
pub(crate) fn stream_query<'c>(
    client: &'c Client,
    query: Query<PostgresDriver>,
    params: Vec<Value>,
) -> impl Stream<Item = Result<QueryResult>> + Send + 'c {
    let context = Arc::new(format!("While running the query:\n{}", query));
    try_stream! {
        let params = params.into_iter().map(ValueHolder);
        let stream = match &query {
            Query::Raw(sql) => client.query_raw(sql.as_str(), params).await?,
            Query::Prepared(prepared) => client.query_raw(&prepared.statement, params).await?,
        };
        let mut stream = pin!(stream);
        let mut labels: Option<RowNames> = None;
        while let Some(row) = stream.next().await.transpose()? {
            let labels = labels.get_or_insert_with(|| {
                row.columns().iter().map(|c| c.name().to_string()).collect()
            });
            yield RowLabeled::new(labels.clone(), row_to_takeo_row(row)?).into();
        }
        yield RowsAffected {
            rows_affected: stream.rows_affected().unwrap_or_default(),
        }
        .into();
    }
    .map_err(move |e: Error| {
        let e = e.context(context.clone());
        log::error!("{:#}", e);
        e
    })
}

pub(crate) async fn prepare(client: &Client, sql: String) -> Result<Query<PostgresDriver>> {
    let sql = sql.trim_end().trim_end_matches(';');
    match client.prepare(sql).await {
        Ok(statement) => Ok(Query::Prepared(crate::PostgresPrepared::new(statement, sql))),
        Err(e) => {
            let e = Error::new(e).context(format!(
                "While preparing the query:\n{}",
                takeo_core::truncate_long!(sql)
            ));
            log::error!("{:#}", e);
            Err(e)
        }
    }
}
