//! HTTP handlers

pub mod health;
pub mod page;
pub mod analyses;
pub mod reports;
pub mod dashboard;

use crate::{AppError, AppResult};

/// Run file I/O or rendering on the blocking pool
pub(crate) async fn blocking<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("Task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_work_runs_off_the_async_thread() {
        let caller = std::thread::current().id();
        let worker = blocking(|| Ok(std::thread::current().id())).await.unwrap();
        assert_ne!(caller, worker);
    }

    #[tokio::test]
    async fn test_panicking_work_is_an_internal_error() {
        let result: AppResult<()> = blocking(|| panic!("render blew up")).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
