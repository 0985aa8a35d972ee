use crate::{engine, BatchOutcome, Db, Error, Model, Result};

use indexmap::IndexMap;
use log::{debug, warn};
use relmap_core::{
    driver::{
        operation::{ExecuteSql, LastInsertId, QueryScalar, QuerySql, Transaction},
        Connection, Operation, Response,
    },
    stmt::{Filter, Paging, Query, Value, Write},
};

/// One connection taken from the driver. Statements issued through a
/// session run in order on that connection, so a transaction started with
/// [`Session::begin`] covers them.
#[derive(Debug)]
pub struct Session {
    db: Db,
    connection: Box<dyn Connection>,
    in_transaction: bool,
}

impl Session {
    pub(crate) fn new(db: Db, connection: Box<dyn Connection>) -> Session {
        Session {
            db,
            connection,
            in_transaction: false,
        }
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    pub async fn begin(&mut self) -> Result<()> {
        self.exec(Transaction::Start).await?;
        self.in_transaction = true;
        Ok(())
    }

    pub async fn commit(&mut self) -> Result<()> {
        self.exec(Transaction::Commit).await?;
        self.in_transaction = false;
        Ok(())
    }

    pub async fn rollback(&mut self) -> Result<()> {
        self.exec(Transaction::Rollback).await?;
        self.in_transaction = false;
        Ok(())
    }

    /// Runs `query` and loads every matching row.
    pub async fn all<M: Model>(&mut self, query: &Query) -> Result<Vec<M>> {
        let (models, _) = self.fetch(query).await?;
        Ok(models)
    }

    /// Runs `query`, counting the matching rows first when it is paged and
    /// the total is not known yet. Returns the resolved paging alongside the
    /// rows.
    pub(crate) async fn fetch<M: Model>(
        &mut self,
        query: &Query,
    ) -> Result<(Vec<M>, Option<Paging>)> {
        let schema = self.db.schema().await?.clone();
        let serializer = self.db.serializer();

        let mut plan = engine::select(&schema, query)?;
        let mut paging = query.paging;

        if let Some(paging) = &mut paging {
            let total = match paging.total {
                Some(total) => total,
                None => {
                    let sql = serializer.serialize(&plan.count.clone().into());
                    let value = self
                        .scalar(QueryScalar {
                            sql,
                            params: plan.params.clone(),
                        })
                        .await?;
                    row_count(value)?
                }
            };

            paging.resolve(total);
            plan.apply_paging(paging);
        }

        let sql = serializer.serialize(&plan.select.clone().into());
        let rows = self
            .exec(QuerySql {
                sql,
                params: plan.params.clone(),
            })
            .await?
            .rows
            .into_values()?
            .collect()
            .await?;

        let models = engine::materialize(&plan.graph, &rows)
            .into_iter()
            .map(|record| M::load(record, &schema))
            .collect::<Result<Vec<_>>>()?;

        Ok((models, paging))
    }

    /// Counts the rows of `entity` matching `filter`. With `includes`, counts
    /// the non-null values of those members instead.
    pub async fn count(&mut self, entity: &str, filter: &Filter, includes: &[&str]) -> Result<u64> {
        let schema = self.db.schema().await?.clone();
        let (select, params) = engine::count(&schema, entity, filter, includes)?;
        let sql = self.db.serializer().serialize(&select.into());

        row_count(self.scalar(QueryScalar { sql, params }).await?)
    }

    pub async fn exists(&mut self, entity: &str, filter: &Filter) -> Result<bool> {
        let schema = self.db.schema().await?.clone();
        let (select, params) = engine::exists(&schema, entity, filter)?;
        let sql = self.db.serializer().serialize(&select.into());

        let value = self.scalar(QueryScalar { sql, params }).await?;
        Ok(!value.is_null())
    }

    /// Inserts each row. Generated keys are written back into their rows.
    pub async fn insert_many(
        &mut self,
        entity: &str,
        rows: &mut [IndexMap<String, Value>],
        includes: &[&str],
    ) -> Result<BatchOutcome> {
        let schema = self.db.schema().await?.clone();
        let entity = schema.resolve_entity(entity)?;
        let sequence = entity.sequence();

        let mut outcome = BatchOutcome::default();

        for row in rows.iter_mut() {
            let result = async {
                let plan = engine::insert(entity, row, includes)?;
                let count = self.write(plan).await?;

                if let Some(sequence) = sequence.filter(|_| count > 0) {
                    let id = self.exec(LastInsertId).await?.rows.into_scalar()?;
                    row.insert(sequence.name.clone(), id);
                }

                Ok::<_, Error>(count)
            }
            .await;

            self.settle(&mut outcome, result)?;
        }

        Ok(outcome)
    }

    /// Applies `members` of each row. With an empty `filter`, each row is
    /// matched by its key members.
    pub async fn update_many(
        &mut self,
        entity: &str,
        rows: &[IndexMap<String, Write>],
        filter: &Filter,
        members: &[&str],
    ) -> Result<BatchOutcome> {
        let schema = self.db.schema().await?.clone();
        let entity = schema.resolve_entity(entity)?;

        if members.is_empty() {
            return Err(crate::err!("update of `{}` names no members", entity.name));
        }

        let mut outcome = BatchOutcome::default();

        for row in rows {
            let result: Result<u64> = async {
                match engine::update(&schema, entity, row, filter, members)? {
                    Some(plan) => self.write(plan).await,
                    None => {
                        debug!("update skipped; row assigns none of the members");
                        Ok(0)
                    }
                }
            }
            .await;

            self.settle(&mut outcome, result)?;
        }

        Ok(outcome)
    }

    /// Deletes the rows matching `filter` and returns how many went.
    pub async fn delete(&mut self, entity: &str, filter: &Filter) -> Result<u64> {
        let schema = self.db.schema().await?.clone();
        let entity = schema.resolve_entity(entity)?;
        let plan = engine::delete(&schema, entity, filter)?;
        self.write(plan).await
    }

    /// Records one batch statement's result. Inside a transaction the first
    /// failure aborts the batch.
    fn settle(&self, outcome: &mut BatchOutcome, result: Result<u64>) -> Result<()> {
        match result {
            Ok(count) => outcome.count += count,
            Err(err) if self.in_transaction => return Err(err),
            Err(err) => {
                warn!("batch statement failed; continuing: {err}");
                outcome.failures.push(err);
            }
        }
        Ok(())
    }

    async fn write(&mut self, plan: engine::WritePlan) -> Result<u64> {
        let sql = self.db.serializer().serialize(&plan.statement);
        self.exec(ExecuteSql {
            sql,
            params: plan.params,
        })
        .await?
        .rows
        .into_count()
    }

    async fn scalar(&mut self, op: QueryScalar) -> Result<Value> {
        self.exec(op).await?.rows.into_scalar()
    }

    async fn exec(&mut self, op: impl Into<Operation>) -> Result<Response> {
        let op = op.into();

        match op.sql() {
            Some(sql) => debug!("exec sql={sql} params={}", op.params().len()),
            None => debug!("exec op={op:?}"),
        }

        self.connection.exec(op).await
    }
}

fn row_count(value: Value) -> Result<u64> {
    value
        .to_i64()
        .and_then(|count| u64::try_from(count).ok())
        .ok_or_else(|| {
            Error::invalid_result(format!("expected a row count, got {}", value.kind_name()))
        })
}
