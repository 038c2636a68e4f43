use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::OnceCell;
use sqlx::MySqlPool;

const DEFAULT_CAPACITY: u64 = 100_000;

/// Employee IDs known to exist in `Employees`.
static KNOWN_EMPLOYEES: OnceCell<Cache<String, ()>> = OnceCell::new();

fn cache() -> &'static Cache<String, ()> {
    KNOWN_EMPLOYEES.get_or_init(|| Cache::new(DEFAULT_CAPACITY))
}

/// Sizes the cache; only effective before first use.
pub fn init(capacity: u64) {
    let _ = KNOWN_EMPLOYEES.set(Cache::new(capacity));
}

pub fn is_known(employee_id: &str) -> bool {
    cache().contains_key(employee_id)
}

/// Marks employees as known. Call only once their rows are committed.
pub async fn mark_known<I>(employee_ids: I)
where
    I: IntoIterator<Item = String>,
{
    let inserts: Vec<_> = employee_ids
        .into_iter()
        .map(|id| cache().insert(id, ()))
        .collect();

    futures::future::join_all(inserts).await;
}

/// Streams every employee ID into the cache in batches.
pub async fn warmup_employee_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream =
        sqlx::query_as::<_, (String,)>("SELECT EmployeeID FROM Employees").fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (employee_id,) = row?;
        batch.push(employee_id);
        total += 1;

        if batch.len() >= batch_size {
            mark_known(batch.drain(..)).await;
        }
    }

    if !batch.is_empty() {
        mark_known(batch).await;
    }

    tracing::info!(total, "Employee cache warmup complete");
    Ok(())
}
