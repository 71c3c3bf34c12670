//! Watchpoints: compiled expressions whose value is compared against the
//! previous check.

use std::fmt;

use crate::monitor::expr::{Evaluator, Postfix, Resolver};

#[derive(Debug, Clone)]
pub struct Watchpoint {
    id: usize,
    expr: String,
    compiled: Postfix,
    /// `None` while the expression fails to evaluate (e.g. unmapped address).
    last: Option<i64>,
}

impl Watchpoint {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn last_value(&self) -> Option<i64> {
        self.last
    }
}

/// A watchpoint whose value changed between two checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchpointHit {
    pub id: usize,
    pub expr: String,
    pub old: Option<i64>,
    pub new: Option<i64>,
}

#[derive(Debug)]
pub struct WatchpointPool {
    entries: Vec<Watchpoint>,
    next_id: usize,
    limit: usize,
}

impl WatchpointPool {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            limit,
        }
    }

    pub fn add(
        &mut self,
        expr: impl Into<String>,
        compiled: Postfix,
        initial: Option<i64>,
    ) -> Result<usize, WatchpointError> {
        if self.entries.len() >= self.limit {
            return Err(WatchpointError::PoolExhausted { limit: self.limit });
        }
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Watchpoint {
            id,
            expr: expr.into(),
            compiled,
            last: initial,
        });
        Ok(id)
    }

    pub fn remove(&mut self, id: usize) -> Result<Watchpoint, WatchpointError> {
        let pos = self
            .entries
            .iter()
            .position(|wp| wp.id == id)
            .ok_or(WatchpointError::NotFound { id })?;
        Ok(self.entries.remove(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Watchpoint> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-evaluates every watchpoint, records the new values and returns the
    /// ones that changed.
    pub fn check<R: Resolver + ?Sized>(
        &mut self,
        evaluator: &Evaluator,
        resolver: &R,
    ) -> Vec<WatchpointHit> {
        let mut hits = Vec::new();
        for wp in &mut self.entries {
            let new = evaluator.evaluate_compiled(&wp.compiled, resolver).ok();
            if new != wp.last {
                hits.push(WatchpointHit {
                    id: wp.id,
                    expr: wp.expr.clone(),
                    old: wp.last,
                    new,
                });
                wp.last = new;
            }
        }
        hits
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchpointError {
    PoolExhausted { limit: usize },
    NotFound { id: usize },
}

impl fmt::Display for WatchpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchpointError::PoolExhausted { limit } => {
                write!(f, "all {limit} watchpoints are in use")
            }
            WatchpointError::NotFound { id } => write!(f, "no watchpoint number {id}"),
        }
    }
}

impl std::error::Error for WatchpointError {}
