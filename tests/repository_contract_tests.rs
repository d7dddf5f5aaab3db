mod common;

use common::{date, make_test, mark, InMemoryClassTestRepository};
use gradebook_server::{
    errors::AppError,
    models::domain::TestStatus,
    repositories::{ClassTestRepository, TestListFilter},
};

fn roster() -> Vec<gradebook_server::models::domain::MarkRecord> {
    vec![
        mark("s1", "Asha Rao", "1", 90.0),
        mark("s2", "Bilal Khan", "2", 60.0),
        mark("s3", "Chitra Iyer", "3", 30.0),
    ]
}

#[tokio::test]
async fn test_repository_insert_find_replace_delete() {
    let repo = InMemoryClassTestRepository::new();

    let test = make_test(
        "test-1",
        "owner-1",
        "class-1",
        "Mathematics",
        date(2024, 11, 4),
        100.0,
        roster(),
        false,
    );
    repo.insert(test.clone()).await.expect("insert should work");

    let found = repo
        .find_by_id("owner-1", "test-1")
        .await
        .expect("find should work");
    assert!(found.is_some());

    // A different owner must not see the document.
    let hidden = repo
        .find_by_id("owner-2", "test-1")
        .await
        .expect("find should work");
    assert!(hidden.is_none());

    let mut updated = test.clone();
    updated.test_name = "Renamed test".to_string();
    let replaced = repo.replace(updated).await.expect("replace should work");
    assert_eq!(replaced.test_name, "Renamed test");

    let mut missing = test.clone();
    missing.id = "test-missing".to_string();
    let missing_replace = repo.replace(missing).await;
    assert!(matches!(missing_replace, Err(AppError::NotFound(_))));

    repo.delete("owner-1", "test-1")
        .await
        .expect("delete should work");
    let missing_delete = repo.delete("owner-1", "test-1").await;
    assert!(matches!(missing_delete, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_duplicate_class_subject_date_is_rejected() {
    let repo = InMemoryClassTestRepository::new();

    let first = make_test(
        "test-1",
        "owner-1",
        "class-1",
        "Mathematics",
        date(2024, 11, 4),
        100.0,
        roster(),
        false,
    );
    repo.insert(first).await.expect("first insert should work");

    // Same (class, subject, date) for the same owner: conflict.
    let duplicate = make_test(
        "test-2",
        "owner-1",
        "class-1",
        "Mathematics",
        date(2024, 11, 4),
        50.0,
        vec![],
        false,
    );
    let result = repo.insert(duplicate).await;
    assert!(matches!(result, Err(AppError::AlreadyExists(_))));

    // A different subject on the same day is fine.
    let other_subject = make_test(
        "test-3",
        "owner-1",
        "class-1",
        "Science",
        date(2024, 11, 4),
        50.0,
        vec![],
        false,
    );
    repo.insert(other_subject)
        .await
        .expect("different subject should insert");

    // Another owner can hold the identical key.
    let other_owner = make_test(
        "test-4",
        "owner-2",
        "class-1",
        "Mathematics",
        date(2024, 11, 4),
        100.0,
        vec![],
        false,
    );
    repo.insert(other_owner)
        .await
        .expect("other owner should insert");
}

#[tokio::test]
async fn test_list_filters_and_pagination() {
    let repo = InMemoryClassTestRepository::new();

    for (id, subject, day, published) in [
        ("t1", "Mathematics", 4, true),
        ("t2", "Mathematics", 7, true),
        ("t3", "Science", 12, false),
    ] {
        repo.insert(make_test(
            id,
            "owner-1",
            "class-1",
            subject,
            date(2024, 11, day),
            100.0,
            roster(),
            published,
        ))
        .await
        .expect("insert should work");
    }
    repo.insert(make_test(
        "t-foreign",
        "owner-2",
        "class-1",
        "Mathematics",
        date(2024, 11, 4),
        100.0,
        vec![],
        true,
    ))
    .await
    .expect("insert should work");

    let (all, total) = repo
        .list("owner-1", TestListFilter::default(), 0, 10)
        .await
        .expect("list should work");
    assert_eq!(total, 3);
    // Most recent first.
    assert_eq!(all[0].id, "t3");
    assert_eq!(all[2].id, "t1");

    let (page, total) = repo
        .list("owner-1", TestListFilter::default(), 1, 1)
        .await
        .expect("pagination should work");
    assert_eq!(total, 3);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, "t2");

    let (drafts, _) = repo
        .list(
            "owner-1",
            TestListFilter {
                status: Some(TestStatus::Draft),
                ..Default::default()
            },
            0,
            10,
        )
        .await
        .expect("status filter should work");
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].id, "t3");
}

#[tokio::test]
async fn test_published_queries_exclude_drafts_and_other_owners() {
    let repo = InMemoryClassTestRepository::new();

    repo.insert(make_test(
        "t1",
        "owner-1",
        "class-1",
        "Mathematics",
        date(2024, 11, 4),
        100.0,
        roster(),
        true,
    ))
    .await
    .unwrap();
    repo.insert(make_test(
        "t2",
        "owner-1",
        "class-1",
        "Mathematics",
        date(2024, 11, 7),
        100.0,
        roster(),
        false,
    ))
    .await
    .unwrap();
    repo.insert(make_test(
        "t3",
        "owner-2",
        "class-1",
        "Mathematics",
        date(2024, 11, 5),
        100.0,
        roster(),
        true,
    ))
    .await
    .unwrap();

    let by_class = repo
        .find_published_by_class("owner-1", "class-1")
        .await
        .expect("query should work");
    assert_eq!(by_class.len(), 1);
    assert_eq!(by_class[0].id, "t1");

    let by_subject = repo
        .find_published_by_class_subject("owner-1", "class-1", "Mathematics")
        .await
        .expect("query should work");
    assert_eq!(by_subject.len(), 1);

    let for_student = repo
        .find_published_for_student("owner-1", "s1")
        .await
        .expect("query should work");
    assert_eq!(for_student.len(), 1);
    assert_eq!(for_student[0].id, "t1");
}

#[tokio::test]
async fn test_date_range_query_is_inclusive_and_ascending() {
    let repo = InMemoryClassTestRepository::new();

    for (id, day) in [("t1", 4), ("t2", 7), ("t3", 12)] {
        repo.insert(make_test(
            id,
            "owner-1",
            "class-1",
            "Mathematics",
            date(2024, 11, day),
            100.0,
            roster(),
            true,
        ))
        .await
        .unwrap();
    }

    // Boundaries are inclusive on both ends.
    let in_range = repo
        .find_published_in_range(
            "owner-1",
            date(2024, 11, 4),
            date(2024, 11, 7),
            None,
            None,
        )
        .await
        .expect("range query should work");
    assert_eq!(in_range.len(), 2);
    assert_eq!(in_range[0].id, "t1");
    assert_eq!(in_range[1].id, "t2");

    let with_subject = repo
        .find_published_in_range(
            "owner-1",
            date(2024, 11, 1),
            date(2024, 11, 30),
            Some("class-1".to_string()),
            Some("Mathematics".to_string()),
        )
        .await
        .expect("range query should work");
    assert_eq!(with_subject.len(), 3);
}
