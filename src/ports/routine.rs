use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoutineError {
    #[error("Routine '{0}' failed")]
    Failed(&'static str),
}

/// A named unit of batch work.
#[async_trait::async_trait]
pub trait Routine: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self) -> error_stack::Result<(), RoutineError>;
}
