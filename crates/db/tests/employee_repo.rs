//! Integration tests for the employee repository against a real database.

use assert_matches::assert_matches;
use idm_db::error::StoreError;
use idm_db::models::employee::CreateEmployee;
use idm_db::repositories::{EmployeeRepository, NamedRepository, PgEmployeeRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_employee(name: &str) -> CreateEmployee {
    CreateEmployee {
        name: name.to_string(),
    }
}

/// Insert employees through the transactional path, as the service does.
async fn seed(repo: &PgEmployeeRepo, names: &[&str]) -> Vec<i64> {
    let mut ids = Vec::new();
    for name in names {
        let mut tx = repo.begin_transaction().await.unwrap();
        let id = repo
            .create_in_transaction(&mut tx, &new_employee(name))
            .await
            .unwrap();
        repo.commit(tx).await.unwrap();
        ids.push(id);
    }
    ids
}

async fn row_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM employee")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Single-row operations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_then_find_by_id(pool: PgPool) {
    let repo = PgEmployeeRepo::new(pool);

    let id = repo.create(&new_employee("Ivan")).await.unwrap();
    assert!(id > 0);

    let employee = repo.find_by_id(id).await.unwrap();
    assert_eq!(employee.id, id);
    assert_eq!(employee.name, "Ivan");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_id_missing_is_not_found(pool: PgPool) {
    let repo = PgEmployeeRepo::new(pool);
    assert_matches!(
        repo.find_by_id(999_999).await,
        Err(StoreError::NotFound { entity: "employee", id: 999_999 })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_all_returns_every_row(pool: PgPool) {
    let repo = PgEmployeeRepo::new(pool);
    seed(&repo, &["Ivan", "Stas"]).await;

    let mut names: Vec<_> = repo
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    names.sort();
    assert_eq!(names, ["Ivan", "Stas"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_by_id_removes_row(pool: PgPool) {
    let repo = PgEmployeeRepo::new(pool.clone());
    let ids = seed(&repo, &["Ivan", "Stas"]).await;

    repo.delete_by_id(ids[0]).await.unwrap();

    assert_eq!(row_count(&pool).await, 1);
    assert_matches!(repo.find_by_id(ids[0]).await, Err(StoreError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Bulk operations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_and_delete_by_ids(pool: PgPool) {
    let repo = PgEmployeeRepo::new(pool.clone());
    let ids = seed(&repo, &["Ivan", "Stas", "Stepan"]).await;

    let found = repo.find_by_ids(&ids[..2]).await.unwrap();
    assert_eq!(found.len(), 2);

    repo.delete_by_ids(&ids[..2]).await.unwrap();
    assert_eq!(row_count(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_ids_are_rejected(pool: PgPool) {
    let repo = PgEmployeeRepo::new(pool.clone());
    seed(&repo, &["Ivan"]).await;

    assert_matches!(
        repo.find_by_ids(&[]).await,
        Err(StoreError::EmptyIds { entity: "employee" })
    );
    assert_matches!(
        repo.delete_by_ids(&[]).await,
        Err(StoreError::EmptyIds { entity: "employee" })
    );
    assert_eq!(row_count(&pool).await, 1);
}

// ---------------------------------------------------------------------------
// Transactional name check
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_name_is_exact_and_case_sensitive(pool: PgPool) {
    let repo = PgEmployeeRepo::new(pool);
    seed(&repo, &["Ivan"]).await;

    let mut tx = repo.begin_transaction().await.unwrap();
    assert!(repo.find_by_name(&mut tx, "Ivan").await.unwrap());
    assert!(!repo.find_by_name(&mut tx, "ivan").await.unwrap());
    assert!(!repo.find_by_name(&mut tx, "Iva").await.unwrap());
    repo.rollback(tx).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rolled_back_insert_is_discarded(pool: PgPool) {
    let repo = PgEmployeeRepo::new(pool.clone());

    let mut tx = repo.begin_transaction().await.unwrap();
    repo.create_in_transaction(&mut tx, &new_employee("Ghost"))
        .await
        .unwrap();
    repo.rollback(tx).await.unwrap();

    assert_eq!(row_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dropped_transaction_is_rolled_back(pool: PgPool) {
    let repo = PgEmployeeRepo::new(pool.clone());

    {
        let mut tx = repo.begin_transaction().await.unwrap();
        repo.create_in_transaction(&mut tx, &new_employee("Ghost"))
            .await
            .unwrap();
    }

    assert_eq!(row_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn exact_name_lookup_is_index_backed(pool: PgPool) {
    let repo = PgEmployeeRepo::new(pool.clone());
    seed(&repo, &["Ivan", "Olga"]).await;

    let mut tx = pool.begin().await.unwrap();
    sqlx::query("SET LOCAL enable_seqscan = off")
        .execute(&mut *tx)
        .await
        .unwrap();
    let plan: Vec<String> = sqlx::query_scalar(
        "EXPLAIN SELECT EXISTS(SELECT 1 FROM employee WHERE name = 'Ivan')",
    )
    .fetch_all(&mut *tx)
    .await
    .unwrap();

    let plan = plan.join("\n");
    assert!(plan.contains("idx_employee_name"), "{plan}");
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

const NAMES: [&str; 5] = ["Ivan", "Stas", "Stepan", "Viktor", "Stas2"];

#[sqlx::test(migrations = "../../db/migrations")]
async fn pages_are_windows_over_id_order(pool: PgPool) {
    let repo = PgEmployeeRepo::new(pool);
    seed(&repo, &NAMES).await;

    let first = repo.find_page(0, 3, "").await.unwrap();
    let names: Vec<_> = first.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Ivan", "Stas", "Stepan"]);

    let second = repo.find_page(3, 3, "").await.unwrap();
    let names: Vec<_> = second.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Viktor", "Stas2"]);

    assert!(repo.find_page(6, 3, "").await.unwrap().is_empty());
    assert_eq!(repo.count_all("").await.unwrap(), 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn filter_is_case_insensitive_substring(pool: PgPool) {
    let repo = PgEmployeeRepo::new(pool);
    seed(&repo, &NAMES).await;

    let page = repo.find_page(0, 10, "sta").await.unwrap();
    let names: Vec<_> = page.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Stas", "Stas2"]);
    assert_eq!(repo.count_all("sta").await.unwrap(), 2);
    assert_eq!(repo.count_all("  STA  ").await.unwrap(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn short_filter_is_ignored(pool: PgPool) {
    let repo = PgEmployeeRepo::new(pool);
    seed(&repo, &NAMES).await;

    assert_eq!(repo.find_page(0, 10, "st").await.unwrap().len(), 5);
    assert_eq!(repo.count_all("st").await.unwrap(), 5);
    assert_eq!(repo.find_page(0, 10, "   ").await.unwrap().len(), 5);
    assert_eq!(repo.count_all("   ").await.unwrap(), 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn filter_matches_like_metacharacters_literally(pool: PgPool) {
    let repo = PgEmployeeRepo::new(pool);
    seed(&repo, &["100% Ivan", "1000 Ivan"]).await;

    assert_eq!(repo.count_all("0% I").await.unwrap(), 1);
    assert_eq!(repo.count_all("___").await.unwrap(), 0);
}
