use encore_core::db::open_db_in_memory;
use encore_core::{RecommendationService, SqliteRecommendationRepository, VoteOutcome};

const LINK: &str = "https://www.youtube.com/watch?v=ExjmOdBCB_4";

#[test]
fn top_orders_by_score_descending_then_id_ascending() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteRecommendationRepository::try_new(&mut conn).unwrap();
    let mut service = RecommendationService::new(repo);

    let a = service.create("a", LINK).unwrap();
    let b = service.create("b", LINK).unwrap();
    let c = service.create("c", LINK).unwrap();
    let d = service.create("d", LINK).unwrap();

    // Scores: a=1, b=3, c=1, d=0.
    service.upvote(a.id).unwrap();
    for _ in 0..3 {
        service.upvote(b.id).unwrap();
    }
    service.upvote(c.id).unwrap();

    let ranked = service.top(10).unwrap();
    let ids: Vec<_> = ranked.iter().map(|r| r.id).collect();
    // b first by score, then a before c (equal score, lower id), d last.
    assert_eq!(ids, vec![b.id, a.id, c.id, d.id]);
}

#[test]
fn top_equal_scores_preserve_creation_order() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteRecommendationRepository::try_new(&mut conn).unwrap();
    let mut service = RecommendationService::new(repo);

    let first = service.create("first", LINK).unwrap();
    let second = service.create("second", LINK).unwrap();
    service.upvote(first.id).unwrap();
    service.upvote(second.id).unwrap();

    let ranked = service.top(2).unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].id, first.id);
    assert_eq!(ranked[1].id, second.id);
}

#[test]
fn top_length_is_min_of_amount_and_live_count() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteRecommendationRepository::try_new(&mut conn).unwrap();
    let mut service = RecommendationService::new(repo);

    for n in 0..4 {
        service.create(&format!("song {n}"), LINK).unwrap();
    }

    assert_eq!(service.top(2).unwrap().len(), 2);
    assert_eq!(service.top(4).unwrap().len(), 4);
    assert_eq!(service.top(100).unwrap().len(), 4);
    assert!(service.top(0).unwrap().is_empty());
    assert!(service.top(-3).unwrap().is_empty());
}

#[test]
fn top_never_includes_threshold_deleted_records() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteRecommendationRepository::try_new(&mut conn).unwrap();
    let mut service = RecommendationService::new(repo);

    let keeper = service.create("keeper", LINK).unwrap();
    let goner = service.create("goner", LINK).unwrap();
    for _ in 0..5 {
        service.downvote(goner.id).unwrap();
    }
    assert_eq!(service.downvote(goner.id).unwrap(), VoteOutcome::Deleted);

    let ranked = service.top(10).unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].id, keeper.id);
}

#[test]
fn top_is_read_only() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteRecommendationRepository::try_new(&mut conn).unwrap();
    let mut service = RecommendationService::new(repo);

    let created = service.create("stable", LINK).unwrap();
    service.upvote(created.id).unwrap();

    service.top(5).unwrap();
    service.top(5).unwrap();
    assert_eq!(service.get_by_id(created.id).unwrap().score, 1);
}

#[test]
fn feed_returns_ten_of_fifteen_newest_first() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteRecommendationRepository::try_new(&mut conn).unwrap();
    let mut service = RecommendationService::new(repo);

    let mut ids = Vec::new();
    for n in 0..15 {
        ids.push(service.create(&format!("song {n}"), LINK).unwrap().id);
    }

    let feed = service.recent_feed(None).unwrap();
    assert_eq!(feed.len(), 10);

    let expected: Vec<_> = ids.iter().rev().take(10).copied().collect();
    let actual: Vec<_> = feed.iter().map(|r| r.id).collect();
    assert_eq!(actual, expected);
}

#[test]
fn feed_returns_all_seven_when_fewer_than_limit() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteRecommendationRepository::try_new(&mut conn).unwrap();
    let mut service = RecommendationService::new(repo);

    for n in 0..7 {
        service.create(&format!("song {n}"), LINK).unwrap();
    }

    let feed = service.recent_feed(None).unwrap();
    assert_eq!(feed.len(), 7);
}

#[test]
fn feed_honors_explicit_limit() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteRecommendationRepository::try_new(&mut conn).unwrap();
    let mut service = RecommendationService::new(repo);

    for n in 0..5 {
        service.create(&format!("song {n}"), LINK).unwrap();
    }

    assert_eq!(service.recent_feed(Some(3)).unwrap().len(), 3);
}

#[test]
fn feed_never_includes_deleted_records() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteRecommendationRepository::try_new(&mut conn).unwrap();
    let mut service = RecommendationService::new(repo);

    let keeper = service.create("keeper", LINK).unwrap();
    let goner = service.create("goner", LINK).unwrap();
    for _ in 0..6 {
        service.downvote(goner.id).unwrap();
    }

    let feed = service.recent_feed(None).unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, keeper.id);
}
