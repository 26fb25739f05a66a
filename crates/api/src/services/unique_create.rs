//! Transactional create keyed on a unique name.
//!
//! The existence check and the insert run in one transaction. Exactly one of
//! commit or rollback consumes the transaction on every exit path:
//!
//! | Body outcome        | Transaction | Result                      |
//! |---------------------|-------------|-----------------------------|
//! | inserted            | commit      | `Ok(id)`                    |
//! | name already exists | commit      | `Err(AlreadyExists)`        |
//! | store error         | rollback    | `Err(..)` with context      |
//! | panic               | rollback    | `Err(Internal)`             |
//!
//! If the caller's future is dropped mid-flight (request timeout), the
//! transaction handle is dropped un-committed and the driver rolls it back.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use idm_core::error::CoreError;
use idm_core::types::DbId;
use idm_db::error::StoreError;
use idm_db::repositories::NamedRepository;

/// Insert `input` unless a row named `name` already exists.
pub(crate) async fn create_unique<R>(
    repo: &R,
    entity: &'static str,
    name: &str,
    input: &R::Create,
) -> Result<DbId, CoreError>
where
    R: NamedRepository + ?Sized,
{
    let context = format!("error creating {entity} '{name}'");

    let mut tx = repo
        .begin_transaction()
        .await
        .map_err(|e| CoreError::from(e).context(&context))?;

    let outcome = AssertUnwindSafe(insert_if_absent(repo, &mut tx, name, input))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(Some(id))) => {
            repo.commit(tx)
                .await
                .map_err(|e| CoreError::from(e).context(&context))?;
            Ok(id)
        }
        Ok(Ok(None)) => {
            repo.commit(tx)
                .await
                .map_err(|e| CoreError::from(e).context(&context))?;
            Err(CoreError::AlreadyExists(format!(
                "{entity} with name '{name}' already exists"
            )))
        }
        Ok(Err(err)) => {
            rollback(repo, tx, entity).await;
            Err(CoreError::from(err).context(&context))
        }
        Err(panic) => {
            rollback(repo, tx, entity).await;
            let reason = panic_message(panic.as_ref());
            tracing::error!(entity, reason, "Create transaction panicked");
            Err(CoreError::Internal(format!("{context}: {reason}")))
        }
    }
}

async fn insert_if_absent<R>(
    repo: &R,
    tx: &mut R::Tx,
    name: &str,
    input: &R::Create,
) -> Result<Option<DbId>, StoreError>
where
    R: NamedRepository + ?Sized,
{
    if repo.find_by_name(tx, name).await? {
        return Ok(None);
    }
    repo.create_in_transaction(tx, input).await.map(Some)
}

async fn rollback<R>(repo: &R, tx: R::Tx, entity: &'static str)
where
    R: NamedRepository + ?Sized,
{
    if let Err(e) = repo.rollback(tx).await {
        tracing::warn!(entity, error = %e, "Rollback failed");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "panic in transaction body"
    }
}
