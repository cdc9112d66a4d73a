use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use moodtrack_domain::check_in::{CheckIn, CheckInKind, CheckInRepository};
use moodtrack_domain::shared::{CheckInId, DomainError, SubjectId};
use moodtrack_infrastructure::persistence::repositories::SqliteCheckInRepository;

mod test_helpers;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

#[tokio::test]
async fn check_in_repo_save_and_find_by_id_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteCheckInRepository::new(Arc::new(pool.clone()));

    let subject = SubjectId::from_string("subject-a");
    let check_in = CheckIn::new(
        subject.clone(),
        CheckInKind::Journal,
        None,
        Some("  slept badly, long walk helped  ".to_string()),
        test_helpers::noon_days_ago(today(), 0),
    )
    .expect("create journal check-in");

    repo.save(&check_in).await.expect("save check-in");

    let found = repo
        .find_by_id(check_in.id())
        .await
        .expect("find by id")
        .expect("check-in should exist");

    assert_eq!(found, check_in);
    assert_eq!(found.note(), Some("slept badly, long walk helped"));
    assert_eq!(found.value(), None);
    assert_eq!(found.kind(), CheckInKind::Journal);
}

#[tokio::test]
async fn check_in_repo_missing_id_returns_none_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteCheckInRepository::new(Arc::new(pool));

    let found = repo
        .find_by_id(&CheckInId::from_string("does-not-exist"))
        .await
        .expect("query should succeed");

    assert!(found.is_none());
}

#[tokio::test]
async fn check_in_repo_rejects_duplicate_id_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteCheckInRepository::new(Arc::new(pool));

    let subject = SubjectId::from_string("subject-a");
    let id = CheckInId::from_string("fixed-id");
    let first = CheckIn::restore(
        id.clone(),
        subject.clone(),
        CheckInKind::Mood,
        Some(5.0),
        None,
        Utc::now(),
    );
    let second = CheckIn::restore(id, subject.clone(), CheckInKind::Mood, Some(1.0), None, Utc::now());

    repo.save(&first).await.expect("first save");
    let err = repo.save(&second).await.expect_err("duplicate id must fail");

    assert!(matches!(err, DomainError::ConstraintViolation(_)), "got {err:?}");
    assert_eq!(repo.count_by_subject(&subject).await.unwrap(), 1);

    let stored = repo.find_by_id(first.id()).await.unwrap().unwrap();
    assert_eq!(stored.value(), Some(5.0));
}

#[tokio::test]
async fn check_in_repo_find_by_subject_newest_first_with_kind_filter_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteCheckInRepository::new(Arc::new(pool));

    let subject = SubjectId::from_string("subject-a");
    let other = SubjectId::from_string("subject-b");

    let oldest = test_helpers::mood(&subject, 3.0, test_helpers::noon_days_ago(today(), 2));
    let newest = test_helpers::mood(&subject, 7.0, test_helpers::noon_days_ago(today(), 0));
    let stress = CheckIn::new(
        subject.clone(),
        CheckInKind::Stress,
        Some(8.0),
        None,
        test_helpers::noon_days_ago(today(), 1),
    )
    .unwrap();
    let unrelated = test_helpers::mood(&other, 1.0, test_helpers::noon_days_ago(today(), 0));

    for check_in in [&oldest, &newest, &stress, &unrelated] {
        repo.save(check_in).await.expect("save");
    }

    let all = repo.find_by_subject(&subject, None).await.expect("find all");
    let ids: Vec<_> = all.iter().map(|c| c.id().clone()).collect();
    assert_eq!(
        ids,
        vec![newest.id().clone(), stress.id().clone(), oldest.id().clone()]
    );

    let moods = repo
        .find_by_subject(&subject, Some(CheckInKind::Mood))
        .await
        .expect("find moods");
    assert_eq!(moods.len(), 2);
    assert!(moods.iter().all(|c| c.kind() == CheckInKind::Mood));

    let journals = repo
        .find_by_subject(&subject, Some(CheckInKind::Journal))
        .await
        .expect("find journals");
    assert!(journals.is_empty());
}

#[tokio::test]
async fn check_in_repo_lists_subjects_and_counts_integration() {
    let pool = test_helpers::setup_in_memory_db().await;
    let repo = SqliteCheckInRepository::new(Arc::new(pool));

    let zed = SubjectId::from_string("zed");
    let amy = SubjectId::from_string("amy");

    repo.save(&test_helpers::mood(&zed, 4.0, Utc::now())).await.unwrap();
    repo.save(&test_helpers::mood(&amy, 6.0, Utc::now())).await.unwrap();
    repo.save(&test_helpers::mood(&amy, 5.0, Utc::now())).await.unwrap();

    let subjects = repo.list_subject_ids().await.expect("list subjects");
    assert_eq!(subjects, vec![amy.clone(), zed.clone()]);

    assert_eq!(repo.count_by_subject(&amy).await.unwrap(), 2);
    assert_eq!(repo.count_by_subject(&zed).await.unwrap(), 1);
    assert_eq!(
        repo.count_by_subject(&SubjectId::from_string("nobody"))
            .await
            .unwrap(),
        0
    );
}
