#![allow(dead_code)]

use barrel::{
    Connection, ConnectionProvider, Error, Result, RowLabeled, RowNames, RowsAffected, Statement,
    Value, stream,
};
use std::{
    collections::VecDeque,
    future::Future,
    sync::{Arc, Mutex},
};

/// One scripted driver completion.
#[derive(Debug, Clone)]
pub enum Reply {
    Rows(Vec<RowLabeled>),
    Affected(RowsAffected),
    Fail(&'static str),
}

/// Everything the mock driver observed, for pairing assertions.
#[derive(Debug, Default)]
pub struct Journal {
    pub acquired: usize,
    pub closed: usize,
    pub commits: usize,
    pub rollbacks: usize,
    pub auto_commit: Vec<bool>,
    pub statements: Vec<Statement>,
}

/// Scripted connection provider: hands out connections that pop replies off
/// a shared queue and record every call into the journal.
#[derive(Default, Clone)]
pub struct MockProvider {
    pub replies: Arc<Mutex<VecDeque<Reply>>>,
    pub journal: Arc<Mutex<Journal>>,
    pub fail_acquire: bool,
    pub fail_commit: bool,
    pub fail_rollback: bool,
    pub fail_close: bool,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: Reply) -> &Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn journal(&self) -> std::sync::MutexGuard<'_, Journal> {
        self.journal.lock().unwrap()
    }
}

impl ConnectionProvider for MockProvider {
    type Conn = MockConnection;

    fn acquire(&self) -> impl Future<Output = Result<MockConnection>> + Send {
        let connection = MockConnection {
            replies: self.replies.clone(),
            journal: self.journal.clone(),
            fail_commit: self.fail_commit,
            fail_rollback: self.fail_rollback,
            fail_close: self.fail_close,
        };
        let fail = self.fail_acquire;
        if !fail {
            self.journal.lock().unwrap().acquired += 1;
        }
        async move {
            if fail {
                Err(Error::Execution("no connection available".into()))
            } else {
                Ok(connection)
            }
        }
    }
}

pub struct MockConnection {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    journal: Arc<Mutex<Journal>>,
    fail_commit: bool,
    fail_rollback: bool,
    fail_close: bool,
}

impl MockConnection {
    fn next_reply(&self, statement: Statement) -> Option<Reply> {
        self.journal.lock().unwrap().statements.push(statement);
        self.replies.lock().unwrap().pop_front()
    }
}

impl Connection for MockConnection {
    fn query(
        &mut self,
        statement: Statement,
    ) -> impl stream::Stream<Item = Result<RowLabeled>> + Send {
        let items: Vec<Result<RowLabeled>> = match self.next_reply(statement) {
            Some(Reply::Rows(rows)) => rows.into_iter().map(Ok).collect(),
            Some(Reply::Fail(message)) => vec![Err(Error::Execution(message.into()))],
            Some(Reply::Affected(..)) => {
                vec![Err(Error::Execution("unexpected update reply".into()))]
            }
            None => Vec::new(),
        };
        stream::iter(items)
    }

    fn execute(
        &mut self,
        statement: Statement,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let reply = self.next_reply(statement);
        async move {
            match reply {
                Some(Reply::Affected(affected)) => Ok(affected),
                Some(Reply::Fail(message)) => Err(Error::Execution(message.into())),
                Some(Reply::Rows(..)) => Err(Error::Execution("unexpected query reply".into())),
                None => Ok(RowsAffected::default()),
            }
        }
    }

    fn set_auto_commit(&mut self, auto_commit: bool) -> impl Future<Output = Result<()>> + Send {
        self.journal.lock().unwrap().auto_commit.push(auto_commit);
        async { Ok(()) }
    }

    fn commit(&mut self) -> impl Future<Output = Result<()>> + Send {
        self.journal.lock().unwrap().commits += 1;
        let fail = self.fail_commit;
        async move {
            if fail {
                Err(Error::Execution("commit refused".into()))
            } else {
                Ok(())
            }
        }
    }

    fn rollback(&mut self) -> impl Future<Output = Result<()>> + Send {
        self.journal.lock().unwrap().rollbacks += 1;
        let fail = self.fail_rollback;
        async move {
            if fail {
                Err(Error::Execution("rollback refused".into()))
            } else {
                Ok(())
            }
        }
    }

    fn close(&mut self) -> impl Future<Output = Result<()>> + Send {
        self.journal.lock().unwrap().closed += 1;
        let fail = self.fail_close;
        async move {
            if fail {
                Err(Error::Execution("close refused".into()))
            } else {
                Ok(())
            }
        }
    }
}

/// Build a labeled row from `(label, value)` pairs.
pub fn row(pairs: &[(&str, Value)]) -> RowLabeled {
    let labels: RowNames = pairs
        .iter()
        .map(|(name, _)| name.to_string())
        .collect::<Vec<_>>()
        .into();
    let values = pairs.iter().map(|(_, value)| value.clone()).collect();
    RowLabeled::new(labels, values)
}

/// Shorthand for an update reply.
pub fn affected(rows: u64, last_insert_id: Option<i64>) -> Reply {
    Reply::Affected(RowsAffected {
        rows_affected: rows,
        last_insert_id,
    })
}
