//! Integration tests for tagging and lookups

use tagpath::{Tag, TagSet};

mod common;
use common::{memory_tagger, sorted};

fn tag_set(tags: &[&[&str]]) -> TagSet {
    TagSet::from(
        tags.iter()
            .map(|levels| Tag::from(levels.to_vec()))
            .collect::<Vec<_>>(),
    )
}

#[tokio::test]
async fn test_tag_a_key() {
    let (tagger, _) = memory_tagger();

    tagger.tag_key("key", ["tag"]).await.unwrap();

    assert_eq!(
        tagger.tags_of_key("key").await.unwrap(),
        Some(tag_set(&[&["tag"]]))
    );
}

#[tokio::test]
async fn test_tag_then_untag_keeps_empty_record() {
    let (tagger, store) = memory_tagger();

    tagger.tag_key("key2", ["tag1"]).await.unwrap();
    tagger.untag_key("key2", ["tag1"]).await.unwrap();

    let tags = tagger.tags_of_key("key2").await.unwrap().unwrap();
    assert!(tags.is_empty());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_multiple_tag_and_untag() {
    let (tagger, _) = memory_tagger();

    tagger.tag_key("key3", ["tag1"]).await.unwrap();
    tagger.tag_key("key3", ["tag2"]).await.unwrap();
    assert_eq!(tagger.tags_of_key("key3").await.unwrap().unwrap().len(), 2);

    // existing tag
    tagger.tag_key("key3", ["tag2"]).await.unwrap();
    assert_eq!(tagger.tags_of_key("key3").await.unwrap().unwrap().len(), 2);

    // tag that was never there
    tagger.untag_key("key3", ["tag3"]).await.unwrap();
    assert_eq!(
        tagger.tags_of_key("key3").await.unwrap(),
        Some(tag_set(&[&["tag1"], &["tag2"]]))
    );

    tagger.untag_key("key3", ["tag2"]).await.unwrap();
    assert_eq!(
        tagger.tags_of_key("key3").await.unwrap(),
        Some(tag_set(&[&["tag1"]]))
    );

    tagger.tag_key("key3", ["tag2"]).await.unwrap();
    tagger.tag_key("key3", ["tag3"]).await.unwrap();
    assert_eq!(tagger.tags_of_key("key3").await.unwrap().unwrap().len(), 3);

    tagger.untag_key("key3", ["tag1"]).await.unwrap();
    let tags = tagger.tags_of_key("key3").await.unwrap().unwrap();
    assert_eq!(tags.len(), 2);
    assert!(tags.contains(&Tag::from(["tag2"])));
    assert!(tags.contains(&Tag::from(["tag3"])));
}

#[tokio::test]
async fn test_find_keys_with_tags() {
    let (tagger, _) = memory_tagger();

    tagger.tag_key("key4", ["tag4"]).await.unwrap();

    tagger.tag_key("key5", ["tag4"]).await.unwrap();
    tagger.tag_key("key5", ["tag5"]).await.unwrap();

    tagger.tag_key("key6", ["tag4"]).await.unwrap();
    tagger.tag_key("key6", ["tag5"]).await.unwrap();
    tagger.tag_key("key6", ["tag6"]).await.unwrap();

    assert_eq!(
        sorted(tagger.keys_by_tag(["tag4"]).await.unwrap()),
        vec!["key4", "key5", "key6"]
    );
    assert_eq!(
        sorted(tagger.keys_by_tag(["tag5"]).await.unwrap()),
        vec!["key5", "key6"]
    );
    assert_eq!(tagger.keys_by_tag(["tag6"]).await.unwrap(), vec!["key6"]);
}

#[tokio::test]
async fn test_exact_lookup_ignores_longer_and_shorter_tags() {
    let (tagger, _) = memory_tagger();

    tagger.tag_key("short", ["a"]).await.unwrap();
    tagger.tag_key("long", ["a", "b", "c"]).await.unwrap();
    tagger.tag_key("exact", ["a", "b"]).await.unwrap();

    assert_eq!(tagger.keys_by_tag("a/b").await.unwrap(), vec!["exact"]);
}

#[tokio::test]
async fn test_tag_untag_and_find_together() {
    let (tagger, _) = memory_tagger();

    tagger.tag_key("key7", ["tag7"]).await.unwrap();
    tagger.untag_key("key7", ["tag7"]).await.unwrap();
    assert!(tagger.keys_by_tag(["tag7"]).await.unwrap().is_empty());

    tagger.tag_key("key8", ["tag8"]).await.unwrap();
    tagger.tag_key("key9", ["tag8"]).await.unwrap();
    tagger.untag_key("key8", ["tag8"]).await.unwrap();
    assert_eq!(tagger.keys_by_tag(["tag8"]).await.unwrap(), vec!["key9"]);

    tagger.tag_key("key10", ["tag9"]).await.unwrap();
    tagger.tag_key("key10", ["tag10"]).await.unwrap();
    tagger.untag_key("key10", ["tag9"]).await.unwrap();
    assert!(tagger.keys_by_tag(["tag9"]).await.unwrap().is_empty());
    assert_eq!(tagger.keys_by_tag(["tag10"]).await.unwrap(), vec!["key10"]);
}

#[tokio::test]
async fn test_tag_with_levels() {
    let (tagger, _) = memory_tagger();

    tagger
        .tag_key("key11", ["tag_parent", "tag_child"])
        .await
        .unwrap();
    assert_eq!(
        tagger.keys_by_parent_tag(["tag_parent"]).await.unwrap(),
        vec!["key11"]
    );

    // another key with the same tag
    tagger
        .tag_key("key12", ["tag_parent", "tag_child"])
        .await
        .unwrap();
    assert_eq!(
        sorted(tagger.keys_by_parent_tag(["tag_parent"]).await.unwrap()),
        vec!["key11", "key12"]
    );

    // one key, two tags under the same parent
    tagger
        .tag_key("key13", ["tag_parent1", "tag_child1"])
        .await
        .unwrap();
    tagger
        .tag_key("key13", ["tag_parent1", "tag_child2"])
        .await
        .unwrap();
    assert_eq!(
        tagger.keys_by_parent_tag(["tag_parent1"]).await.unwrap(),
        vec!["key13"]
    );

    // different numbers of levels
    tagger.tag_key("key14", ["tag_parent1"]).await.unwrap();
    assert_eq!(
        sorted(tagger.keys_by_parent_tag(["tag_parent1"]).await.unwrap()),
        vec!["key13", "key14"]
    );
}

#[tokio::test]
async fn test_parents_with_and_without_children() {
    let (tagger, _) = memory_tagger();

    tagger
        .tag_key("key15", ["tag_parent2", "tag_child3"])
        .await
        .unwrap();
    tagger.tag_key("key15", ["tag_parent2"]).await.unwrap();
    assert_eq!(
        tagger.keys_by_parent_tag(["tag_parent2"]).await.unwrap(),
        vec!["key15"]
    );

    tagger
        .untag_key("key15", ["tag_parent2", "tag_child3"])
        .await
        .unwrap();
    assert_eq!(
        tagger.keys_by_parent_tag(["tag_parent2"]).await.unwrap(),
        vec!["key15"]
    );

    // a shorter stored tag never matches a longer parent
    assert!(tagger
        .keys_by_parent_tag(["tag_parent2", "tag_child3"])
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_string_tags() {
    let (tagger, _) = memory_tagger();

    tagger.tag_key("key16", "tag11").await.unwrap();
    assert_eq!(tagger.keys_by_tag(["tag11"]).await.unwrap(), vec!["key16"]);
    assert_eq!(tagger.keys_by_tag("tag11").await.unwrap(), vec!["key16"]);

    tagger
        .tag_key("key17", "tag_level1/tag_level2/tag_level3")
        .await
        .unwrap();
    assert_eq!(
        tagger
            .keys_by_parent_tag("tag_level1/tag_level2")
            .await
            .unwrap(),
        vec!["key17"]
    );
    assert_eq!(
        tagger
            .keys_by_parent_tag(["tag_level1", "tag_level2"])
            .await
            .unwrap(),
        vec!["key17"]
    );
}

#[tokio::test]
async fn test_trailing_separator_matches_plain_tag() {
    let (tagger, _) = memory_tagger();

    tagger.tag_key("key", "a/").await.unwrap();
    assert_eq!(tagger.keys_by_tag(["a"]).await.unwrap(), vec!["key"]);
}

#[tokio::test]
async fn test_malformed_strings_leave_store_untouched() {
    let (tagger, store) = memory_tagger();

    for bad in ["", "//", "/a", "a//b"] {
        assert!(tagger.tag_key("key", bad).await.unwrap_err().is_parse_error());
        assert!(tagger.untag_key("key", bad).await.unwrap_err().is_parse_error());
        assert!(tagger.keys_by_tag(bad).await.unwrap_err().is_parse_error());
    }
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_concurrent_tagging_converges() {
    let (tagger, _) = memory_tagger();
    let tagger = std::sync::Arc::new(tagger);

    let mut handles = Vec::new();
    for i in 0..16 {
        let tagger = tagger.clone();
        handles.push(tokio::spawn(async move {
            let tag = if i % 2 == 0 { "team/a" } else { "team/b" };
            tagger.tag_key("shared", tag).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let tags = tagger.tags_of_key("shared").await.unwrap().unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tagger.keys_by_parent_tag("team").await.unwrap(), vec!["shared"]);
}

#[tokio::test]
async fn test_empty_structured_parent_matches_every_tagged_key() {
    let (tagger, _) = memory_tagger();
    tagger.tag_key("key1", "a/b").await.unwrap();
    tagger.tag_key("key2", "c").await.unwrap();
    tagger.tag_key("bare", "d").await.unwrap();
    tagger.untag_key("bare", "d").await.unwrap();

    let keys = tagger.keys_by_parent_tag(Tag::new(vec![])).await.unwrap();
    assert_eq!(sorted(keys), vec!["key1", "key2"]);

    // An empty exact tag matches nothing unless stored as such
    assert!(tagger.keys_by_tag(Tag::new(vec![])).await.unwrap().is_empty());
}
