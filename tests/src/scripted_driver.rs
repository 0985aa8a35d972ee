use crate::ExecLog;

use relmap::{
    driver::{Connection, Driver, Operation, Response},
    stmt::{Row, Value},
    Result,
};
use relmap_core::async_trait;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

/// A driver that answers from a queue of scripted responses and logs every
/// operation it receives.
///
/// Operations arriving with the queue empty get a neutral answer: one row
/// affected, an empty result set, or a null scalar.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDriver {
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    responses: Mutex<VecDeque<Result<Response>>>,

    /// Using Arc<Mutex> so the log outlives the driver handle
    ops: Arc<Mutex<Vec<Operation>>>,

    connections: Mutex<usize>,
}

#[derive(Debug)]
struct ScriptedConnection {
    shared: Arc<Shared>,
}

impl ScriptedDriver {
    pub fn new() -> ScriptedDriver {
        ScriptedDriver::default()
    }

    /// Queues the response to the next unanswered operation.
    pub fn respond(&self, response: Result<Response>) -> &Self {
        self.shared.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn respond_count(&self, count: u64) -> &Self {
        self.respond(Ok(Response::count(count)))
    }

    pub fn respond_scalar(&self, value: impl Into<Value>) -> &Self {
        self.respond(Ok(Response::scalar(value)))
    }

    pub fn respond_rows(&self, rows: Vec<Row>) -> &Self {
        self.respond(Ok(Response::row_stream(rows)))
    }

    pub fn log(&self) -> ExecLog {
        ExecLog::new(self.shared.ops.clone())
    }

    /// Number of connections opened so far.
    pub fn connections(&self) -> usize {
        *self.shared.connections.lock().unwrap()
    }
}

#[async_trait]
impl Driver for ScriptedDriver {
    async fn connect(&self) -> Result<Box<dyn Connection>> {
        *self.shared.connections.lock().unwrap() += 1;

        Ok(Box::new(ScriptedConnection {
            shared: self.shared.clone(),
        }))
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let scripted = self.shared.responses.lock().unwrap().pop_front();

        let response = scripted.unwrap_or_else(|| {
            Ok(match &op {
                Operation::ExecuteSql(_) => Response::count(1),
                Operation::QuerySql(_) => Response::row_stream(Vec::<Row>::new()),
                Operation::LastInsertId(_) | Operation::QueryScalar(_) => {
                    Response::scalar(Value::Null)
                }
                Operation::Transaction(_) => Response::count(0),
            })
        });

        self.shared.ops.lock().unwrap().push(op);
        response
    }
}
