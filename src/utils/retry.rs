use crate::utils::error::{ConvertError, Result};
use std::future::Future;
use std::io;
use std::path::Path;
use std::time::Duration;

/// 固定間隔、固定次數的重試設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            delay: Duration::from_secs(1),
        }
    }
}

/// Runs `action` until `check` reports the desired state.
///
/// `check` is evaluated first, so nothing happens when the state is already
/// reached. Errors from either closure are remembered and the last one is
/// returned once `policy.max_attempts` checks have failed.
pub async fn retry_until<A, AF, C, CF>(
    operation: &str,
    policy: RetryPolicy,
    mut action: A,
    mut check: C,
) -> Result<()>
where
    A: FnMut() -> AF,
    AF: Future<Output = io::Result<()>>,
    C: FnMut() -> CF,
    CF: Future<Output = io::Result<bool>>,
{
    let mut last_error: Option<String> = None;
    let mut attempt = 1;

    loop {
        match check().await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => last_error = Some(e.to_string()),
        }

        if attempt >= policy.max_attempts {
            break;
        }

        if let Err(e) = action().await {
            tracing::debug!("{} attempt {} failed: {}", operation, attempt, e);
            last_error = Some(e.to_string());
        }

        tokio::time::sleep(policy.delay).await;
        attempt += 1;
    }

    Err(ConvertError::RetryExhausted {
        operation: operation.to_string(),
        attempts: policy.max_attempts,
        last_error: last_error.unwrap_or_else(|| "Failed".to_string()),
    })
}

async fn is_dir(dir: &Path) -> bool {
    tokio::fs::metadata(dir)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false)
}

pub async fn remove_dir_with_retry(dir: &Path, policy: RetryPolicy) -> Result<()> {
    if is_dir(dir).await {
        tracing::info!("Removing {}", dir.display());
    }

    retry_until(
        &format!("remove {}", dir.display()),
        policy,
        || tokio::fs::remove_dir_all(dir),
        || async move { Ok::<_, io::Error>(!is_dir(dir).await) },
    )
    .await
}

pub async fn create_dir_with_retry(dir: &Path, policy: RetryPolicy) -> Result<()> {
    retry_until(
        &format!("create {}", dir.display()),
        policy,
        || tokio::fs::create_dir_all(dir),
        || async move { Ok::<_, io::Error>(is_dir(dir).await) },
    )
    .await
}
