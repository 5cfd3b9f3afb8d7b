use assert_matches::assert_matches;
use bridal_core::rental::{InstanceState, InstanceStatus, RentalPeriod};
use bridal_core::types::DbId;
use bridal_db::models::dress_model::CreateDressModel;
use bridal_db::models::status::DressInstanceStatus;
use bridal_db::repositories::{DressInstanceRepo, DressModelRepo};
use chrono::{NaiveDate, TimeDelta, Utc};
use sqlx::PgPool;

fn period(from: u32, to: u32) -> RentalPeriod {
    RentalPeriod::new(
        NaiveDate::from_ymd_opt(2025, 5, from).unwrap(),
        NaiveDate::from_ymd_opt(2025, 5, to).unwrap(),
    )
    .unwrap()
}

async fn model_with_instances(pool: &PgPool, name: &str, labels: &[&str]) -> (DbId, Vec<DbId>) {
    let input = CreateDressModel {
        name: name.to_string(),
        description: Some("Lace, A-line".to_string()),
        price_cents: 99_000,
        image_url: None,
        color: None,
        size: None,
        age_bracket: None,
        stock_count: None,
    };
    let mut conn = pool.acquire().await.unwrap();
    let model = DressModelRepo::create(&mut conn, &input).await.unwrap();
    let labels: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
    DressInstanceRepo::insert_available(&mut conn, model.id, &labels)
        .await
        .unwrap();
    drop(conn);

    let ids = DressInstanceRepo::list_by_model(pool, model.id)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    (model.id, ids)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stock_count_tracks_instances(pool: PgPool) {
    let (model_id, _) = model_with_instances(&pool, "Aurora", &["Dress #1", "Dress #2"]).await;

    let model = DressModelRepo::find_by_id(&pool, model_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(model.stock_count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn try_reserve_only_wins_once(pool: PgPool) {
    let (_, ids) = model_with_instances(&pool, "Aurora", &["Dress #1"]).await;
    let now = Utc::now();

    let first = DressInstanceRepo::try_reserve(&pool, ids[0], &period(1, 3), now)
        .await
        .unwrap();
    assert_matches!(first.map(|i| i.state), Some(InstanceState::Reserved { .. }));

    let second = DressInstanceRepo::try_reserve(&pool, ids[0], &period(1, 3), now)
        .await
        .unwrap();
    assert!(second.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_available_skips_excluded_and_held(pool: PgPool) {
    let (model_id, ids) =
        model_with_instances(&pool, "Aurora", &["Dress #1", "Dress #2", "Dress #3"]).await;

    DressInstanceRepo::try_reserve(&pool, ids[0], &period(1, 3), Utc::now())
        .await
        .unwrap()
        .unwrap();

    let next = DressInstanceRepo::find_available(&pool, model_id, &period(1, 3), &[])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(next.id, ids[1]);

    let skipped = DressInstanceRepo::find_available(&pool, model_id, &period(1, 3), &[ids[1]])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(skipped.id, ids[2]);

    let none = DressInstanceRepo::find_available(&pool, model_id, &period(1, 3), &[ids[1], ids[2]])
        .await
        .unwrap();
    assert!(none.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn try_confirm_respects_cutoff(pool: PgPool) {
    let (_, ids) = model_with_instances(&pool, "Aurora", &["Dress #1"]).await;
    let reserved_at = Utc::now() - TimeDelta::minutes(20);

    DressInstanceRepo::try_reserve(&pool, ids[0], &period(1, 3), reserved_at)
        .await
        .unwrap()
        .unwrap();

    let cutoff = Utc::now() - TimeDelta::minutes(15);
    let confirmed = DressInstanceRepo::try_confirm(&pool, ids[0], &period(1, 3), cutoff)
        .await
        .unwrap();
    assert!(confirmed.is_none());

    let released = DressInstanceRepo::try_release_expired(&pool, ids[0], cutoff)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(released.state, InstanceState::Available);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn release_expired_is_scoped_by_model(pool: PgPool) {
    let (model_a, a) = model_with_instances(&pool, "Aurora", &["Dress #1"]).await;
    let (_, b) = model_with_instances(&pool, "Bianca", &["Dress #1"]).await;
    let stale = Utc::now() - TimeDelta::hours(1);
    let cutoff = Utc::now() - TimeDelta::minutes(15);

    for id in [a[0], b[0]] {
        DressInstanceRepo::try_reserve(&pool, id, &period(1, 3), stale)
            .await
            .unwrap()
            .unwrap();
    }

    let released = DressInstanceRepo::release_expired_for_model(&pool, model_a, cutoff)
        .await
        .unwrap();
    assert_eq!(released, 1);

    let other = DressInstanceRepo::find_by_id(&pool, b[0]).await.unwrap().unwrap();
    assert_eq!(other.status(), InstanceStatus::Reserved);

    assert_eq!(DressInstanceRepo::release_expired(&pool, cutoff).await.unwrap(), 1);
    assert_eq!(DressInstanceRepo::release_expired(&pool, cutoff).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn check_constraint_rejects_rented_without_dates(pool: PgPool) {
    let (_, ids) = model_with_instances(&pool, "Aurora", &["Dress #1"]).await;

    let result = sqlx::query("UPDATE dress_instances SET status_id = $2 WHERE id = $1")
        .bind(ids[0])
        .bind(DressInstanceStatus::Rented.id())
        .execute(&pool)
        .await;

    let err = result.unwrap_err();
    let db_err = err.as_database_error().unwrap();
    assert_eq!(db_err.constraint(), Some("ck_dress_instances_state"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_model_cascades_to_instances(pool: PgPool) {
    let (model_id, ids) = model_with_instances(&pool, "Aurora", &["Dress #1", "Dress #2"]).await;

    assert!(DressModelRepo::delete(&pool, model_id).await.unwrap());
    assert!(DressInstanceRepo::find_by_id(&pool, ids[0]).await.unwrap().is_none());
    assert!(!DressModelRepo::delete(&pool, model_id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_unless_rented_keeps_rented_rows(pool: PgPool) {
    let (_, ids) = model_with_instances(&pool, "Aurora", &["Dress #1"]).await;
    let cutoff = Utc::now() - TimeDelta::minutes(15);

    DressInstanceRepo::try_reserve(&pool, ids[0], &period(1, 3), Utc::now())
        .await
        .unwrap()
        .unwrap();
    DressInstanceRepo::try_confirm(&pool, ids[0], &period(1, 3), cutoff)
        .await
        .unwrap()
        .unwrap();

    assert!(!DressInstanceRepo::delete_unless_rented(&pool, ids[0]).await.unwrap());
    assert!(DressInstanceRepo::find_by_id(&pool, ids[0]).await.unwrap().is_some());
}
