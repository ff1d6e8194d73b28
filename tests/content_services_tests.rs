//! Post, taxonomy, guestbook, account and resume rules against SQLite

mod common;

use linkfolio::errors::LinkfolioError;
use linkfolio::services::{
    AccountService, AnnouncementInput, AnnouncementService, CategoryInput, CreateAuthorInput,
    CreatePostInput, GuestbookFilter, GuestbookService, NewGuestbookEntry, PostService, PostStatus,
    ResumeInput, ResumeService, TagInput, TaxonomyService, UpdatePostInput,
};
use linkfolio::storage::PostFilter;

fn post_input(title: &str) -> CreatePostInput {
    CreatePostInput {
        title: title.to_string(),
        content: "Some words for the body of this post".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_post_slug_and_defaults() {
    let env = common::setup_storage("posts_slug").await;
    let posts = PostService::new(env.storage.clone());

    let post = posts.create_post(post_input("Rust & Actix: Notes")).await.unwrap();
    assert_eq!(post.slug, "rust-actix-notes");
    assert_eq!(post.status, PostStatus::Draft.as_str());
    assert!(post.minute_read >= 1);
    assert!(!post.summary.is_empty());

    let dup = posts.create_post(post_input("Rust & Actix: Notes")).await;
    assert!(matches!(dup, Err(LinkfolioError::Conflict(_))));

    let empty = posts
        .create_post(CreatePostInput {
            title: "  ".to_string(),
            content: "x".to_string(),
            ..Default::default()
        })
        .await;
    assert!(matches!(empty, Err(LinkfolioError::Validation(_))));
}

#[tokio::test]
async fn test_post_status_and_counters() {
    let env = common::setup_storage("posts_status").await;
    let posts = PostService::new(env.storage.clone());

    let post = posts.create_post(post_input("Lifecycle")).await.unwrap();
    let published = posts.publish_post(&post.id).await.unwrap();
    assert_eq!(published.status, "published");

    posts.increment_views(&post.id).await.unwrap();
    posts.increment_views(&post.id).await.unwrap();
    posts.increment_likes(&post.id).await.unwrap();
    let stored = posts.get_post_by_id(&post.id).await.unwrap().unwrap();
    assert_eq!(stored.views, 2);
    assert_eq!(stored.likes, 1);

    let page = posts
        .list_posts(PostFilter {
            status: Some("PUBLISHED".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 1);

    let archived = posts.archive_post(&post.id).await.unwrap();
    assert_eq!(archived.status, "archived");

    let stats = posts.post_stats().await.unwrap();
    assert_eq!(stats.archived, 1);
    assert_eq!(stats.total_views, 2);

    assert!(matches!(
        posts.increment_views("missing").await,
        Err(LinkfolioError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_post_paging_and_empty_stats() {
    let env = common::setup_storage("posts_paging").await;
    let posts = PostService::new(env.storage.clone());

    let empty = posts.post_stats().await.unwrap();
    assert_eq!((empty.total, empty.published, empty.drafts), (0, 0, 0));

    for title in ["One", "Two", "Three"] {
        posts.create_post(post_input(title)).await.unwrap();
    }

    // 存储层 limit 为 0 时按 1 分页
    let (rows, total) = env
        .storage
        .list_posts(&PostFilter::default(), 1, 0)
        .await
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(rows.len(), 1);

    let page = posts
        .list_posts(PostFilter {
            limit: Some(2),
            page: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.posts.len(), 1);
    assert_eq!(page.total_pages, 2);
    assert!(!page.has_more);

    let stats = posts.post_stats().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.drafts, 3);
}

#[tokio::test]
async fn test_post_update_keeps_unset_fields() {
    let env = common::setup_storage("posts_update").await;
    let posts = PostService::new(env.storage.clone());

    let post = posts.create_post(post_input("Original")).await.unwrap();
    let updated = posts
        .update_post(
            &post.id,
            UpdatePostInput {
                title: Some("Renamed".to_string()),
                featured: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.slug, post.slug);
    assert_eq!(updated.content, post.content);
    assert!(updated.featured);
}

#[tokio::test]
async fn test_taxonomy_counts() {
    let env = common::setup_storage("taxonomy").await;
    let taxonomy = TaxonomyService::new(env.storage.clone());
    let posts = PostService::new(env.storage.clone());

    let category = taxonomy
        .create_category(CategoryInput {
            name: "Web Dev".to_string(),
            slug: None,
        })
        .await
        .unwrap();
    assert_eq!(category.slug, "web-dev");

    let tag = taxonomy.get_or_create_tag("rust").await.unwrap();
    let again = taxonomy.get_or_create_tag("rust").await.unwrap();
    assert_eq!(tag.id, again.id);

    let mut input = post_input("Tagged");
    input.category_ids = vec![category.id.clone()];
    input.tag_ids = vec![tag.id.clone()];
    posts.create_post(input).await.unwrap();

    let categories = taxonomy.categories_with_counts().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].post_count, 1);

    let tags = taxonomy.tags_with_counts().await.unwrap();
    assert_eq!(tags[0].post_count, 1);

    let dup = taxonomy
        .create_tag(TagInput {
            name: "rust".to_string(),
        })
        .await;
    assert!(matches!(dup, Err(LinkfolioError::Conflict(_))));
}

#[tokio::test]
async fn test_guestbook_moderation() {
    let env = common::setup_storage("guestbook").await;
    let guestbook = GuestbookService::new(env.storage.clone());

    let too_short = guestbook
        .submit(NewGuestbookEntry {
            author: "A".to_string(),
            content: "hello there".to_string(),
        })
        .await;
    assert!(matches!(too_short, Err(LinkfolioError::Validation(_))));

    let entry = guestbook
        .submit(NewGuestbookEntry {
            author: "  Ada ".to_string(),
            content: "Lovely site!".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(entry.author, "Ada");
    assert!(!entry.approved);
    assert!(guestbook.list_approved().await.unwrap().is_empty());
    assert_eq!(
        guestbook
            .list_entries(GuestbookFilter::Pending)
            .await
            .unwrap()
            .len(),
        1
    );

    guestbook.approve(&entry.id).await.unwrap();
    assert_eq!(guestbook.list_approved().await.unwrap().len(), 1);

    guestbook.delete(&entry.id).await.unwrap();
    assert!(matches!(
        guestbook.delete(&entry.id).await,
        Err(LinkfolioError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_author_accounts() {
    let env = common::setup_storage("authors").await;
    let accounts = AccountService::new(env.storage.clone());

    let created = accounts
        .create_author(CreateAuthorInput {
            username: "writer".to_string(),
            author_name: "A Writer".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(created.author.must_change_password);
    assert!(!created.temporary_password.is_empty());

    let authed = accounts
        .authenticate_author("writer", &created.temporary_password)
        .await
        .unwrap();
    assert_eq!(authed.map(|a| a.id), Some(created.author.id.clone()));
    assert!(
        accounts
            .authenticate_author("writer", "wrong-password")
            .await
            .unwrap()
            .is_none()
    );

    accounts
        .change_author_password(&created.author.id, &created.temporary_password, "new-secret-1")
        .await
        .unwrap();
    let author = accounts.get_author(&created.author.id).await.unwrap().unwrap();
    assert!(!author.must_change_password);

    let dup = accounts
        .create_author(CreateAuthorInput {
            username: "writer".to_string(),
            author_name: "Other".to_string(),
            ..Default::default()
        })
        .await;
    assert!(matches!(dup, Err(LinkfolioError::Conflict(_))));
}

#[tokio::test]
async fn test_announcement_slots() {
    let env = common::setup_storage("announcements").await;
    let announcements = AnnouncementService::new(env.storage.clone());

    announcements
        .create(AnnouncementInput {
            title: "Meetup".to_string(),
            is_active: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    let card = announcements
        .create_homepage_card(AnnouncementInput {
            title: "Card".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(announcements.list_active(None).await.unwrap().len(), 2);
    assert_eq!(announcements.active_homepage_cards().await.unwrap().len(), 1);

    let toggled = announcements.toggle_active(&card.id).await.unwrap();
    assert!(!toggled.is_active);
    assert!(announcements.active_homepage_cards().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_resume_activation_and_pdf() {
    let env = common::setup_storage("resumes").await;
    let resumes = ResumeService::new(env.storage.clone());

    let first = resumes
        .create(ResumeInput {
            title: Some("CV 2025".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let second = resumes
        .create(ResumeInput {
            title: Some("CV 2026".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    resumes.set_active(&first.id).await.unwrap();
    let active = resumes.active().await.unwrap().unwrap();
    assert_eq!(active.id, first.id);
    assert!(!resumes.get(&second.id).await.unwrap().unwrap().is_active);

    assert!(matches!(
        resumes.pdf(&second.id).await,
        Err(LinkfolioError::NotFound(_))
    ));

    resumes
        .upload_pdf(
            &second.id,
            b"%PDF-1.4 test".to_vec(),
            Some("cv.pdf".to_string()),
            None,
        )
        .await
        .unwrap();
    let doc = resumes.pdf(&second.id).await.unwrap();
    assert_eq!(doc.file_name, "cv.pdf");
    assert_eq!(doc.content_type, "application/pdf");
    assert_eq!(doc.bytes, b"%PDF-1.4 test".to_vec());
}
