//! Task chain — an ordered queue of operations executed sequentially.
//!
//! The chain is assembled once per run according to the operation mode and
//! consumed destructively. A task reports a boolean outcome: only on `true`
//! does the driver advance to the next task; on `false` the chain halts
//! silently. Errors abort the chain immediately.

use crate::error::CtlResult;
use async_trait::async_trait;
use mp_db::Database;
use std::collections::VecDeque;

/// One unit of work in the chain.
#[async_trait]
pub trait Task: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Execute against the run's shared connection. `Ok(false)` halts the
    /// chain without error.
    async fn run(&self, db: &dyn Database) -> CtlResult<bool>;
}

/// FIFO queue of tasks, built once per run.
#[derive(Default)]
pub struct TaskChain {
    tasks: VecDeque<Box<dyn Task>>,
}

impl TaskChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: Box<dyn Task>) {
        self.tasks.push_back(task);
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task names in execution order, for logging and tests.
    pub fn task_names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|t| t.name()).collect()
    }

    /// Pop and run each task in order, gating every step on the previous
    /// task's outcome.
    pub async fn run(mut self, db: &dyn Database) -> CtlResult<()> {
        while let Some(task) = self.tasks.pop_front() {
            log::info!("task {} begin", task.name());
            let proceed = task.run(db).await?;
            log::info!("task {} end", task.name());
            if !proceed {
                log::info!("task {} halted the chain", task.name());
                break;
            }
        }
        Ok(())
    }
}
