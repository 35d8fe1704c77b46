use async_trait::async_trait;
use chrono::Utc;
use mockall::{mock, predicate::*};
use portfolio_cms::{
    auth::{jwt::JwtService, password::hash_password},
    entities::{
        blog_post::{BlogPost, BlogPostInsert},
        contact_message::{ContactForm, ContactMessage, MessageStatus},
        user::{LoginUser, User, UserInsert},
    },
    errors::{AppError, AuthError},
    listing::ListFilter,
    repositories::{
        blog_post::BlogPostRepository, contact_message::ContactMessageRepository,
        user::UserRepository,
    },
    use_cases::{
        auth::{AdminBootstrap, AuthHandler},
        blog::BlogPostHandler,
        contact::ContactMessageHandler,
    },
};
use serde_json::json;
use uuid::Uuid;

mod test_utils;

mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserRepository for UserRepo {
        async fn check_connection(&self) -> Result<(), AppError>;
        async fn count_users(&self) -> Result<u64, AppError>;
        async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
        async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
        async fn create_user(&self, user: &UserInsert) -> Result<User, AppError>;
    }
}

mock! {
    pub BlogRepo {}

    #[async_trait]
    impl BlogPostRepository for BlogRepo {
        async fn list_blog_posts(&self, published_only: bool) -> Result<Vec<BlogPost>, AppError>;
        async fn list_featured_blog_posts(&self, limit: i64) -> Result<Vec<BlogPost>, AppError>;
        async fn get_blog_post_by_id(&self, id: &Uuid) -> Result<BlogPost, AppError>;
        async fn get_blog_post_by_slug(&self, slug: &str, published_only: bool) -> Result<BlogPost, AppError>;
        async fn create_blog_post(&self, post: &BlogPostInsert) -> Result<BlogPost, AppError>;
        async fn update_blog_post(&self, post: &BlogPost) -> Result<BlogPost, AppError>;
        async fn delete_blog_post(&self, id: &Uuid) -> Result<(), AppError>;
    }
}

mock! {
    pub MessageRepo {}

    #[async_trait]
    impl ContactMessageRepository for MessageRepo {
        async fn create_message(&self, form: &ContactForm) -> Result<ContactMessage, AppError>;
        async fn list_messages(&self) -> Result<Vec<ContactMessage>, AppError>;
        async fn get_message(&self, id: &Uuid) -> Result<ContactMessage, AppError>;
        async fn set_message_status(&self, id: &Uuid, status: MessageStatus) -> Result<ContactMessage, AppError>;
        async fn delete_message(&self, id: &Uuid) -> Result<(), AppError>;
    }
}

fn post(title: &str, published: bool) -> BlogPost {
    let now = Utc::now();
    BlogPost {
        id: Uuid::new_v4(),
        title: title.into(),
        slug: title.to_lowercase().replace(' ', "-"),
        excerpt: format!("About {}", title),
        content: "<p>words</p>".into(),
        image_url: None,
        category: "engineering".into(),
        tags: vec!["rust".into()],
        read_time: 1,
        published,
        featured: false,
        published_at: published.then_some(now),
        created_at: now,
        updated_at: now,
    }
}

fn stored(insert: &BlogPostInsert) -> BlogPost {
    let now = Utc::now();
    BlogPost {
        id: Uuid::new_v4(),
        title: insert.title.clone(),
        slug: insert.slug.clone(),
        excerpt: insert.excerpt.clone(),
        content: insert.content.clone(),
        image_url: insert.image_url.clone(),
        category: insert.category.clone(),
        tags: insert.tags.clone(),
        read_time: insert.read_time,
        published: insert.published,
        featured: insert.featured,
        published_at: insert.published_at,
        created_at: now,
        updated_at: now,
    }
}

#[actix_rt::test]
async fn creating_a_published_post_derives_slug_excerpt_and_timestamp() {
    let mut repo = MockBlogRepo::new();
    repo.expect_create_blog_post().returning(|insert| Ok(stored(insert)));

    let handler = BlogPostHandler::new(repo);
    let request = serde_json::from_value(json!({
        "title": "Shipping Rust Services",
        "content": {"format": "markdown", "body": "# Intro\n\nWe ship **Rust** services to production every week."},
        "category": "engineering",
        "published": true
    }))
    .unwrap();

    let post = handler.create_blog_post(request).await.unwrap();
    assert_eq!(post.slug, "shipping-rust-services");
    assert!(post.excerpt.contains("We ship Rust services"));
    assert!(post.content.contains("<strong>Rust</strong>"));
    assert!(post.read_time >= 1);
    assert!(post.published_at.is_some());
}

#[actix_rt::test]
async fn public_archive_filters_then_pages() {
    let mut repo = MockBlogRepo::new();
    repo.expect_list_blog_posts()
        .with(eq(true))
        .returning(|_| Ok((0..20).map(|i| post(&format!("Post {}", i), true)).collect()));

    let handler = BlogPostHandler::new(repo);
    let page = handler.list_public(&ListFilter::default(), 3, 9).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_items, 20);
    assert_eq!(page.total_pages, 3);
}

#[actix_rt::test]
async fn unpublishing_keeps_the_publication_date() {
    let original = post("Old News", true);
    let first_published = original.published_at;
    let id = original.id;

    let mut repo = MockBlogRepo::new();
    let fetched = original.clone();
    repo.expect_get_blog_post_by_id()
        .with(eq(id))
        .returning(move |_| Ok(fetched.clone()));
    repo.expect_update_blog_post()
        .withf(move |p| !p.published && p.published_at == first_published)
        .returning(|p| Ok(p.clone()));

    let handler = BlogPostHandler::new(repo);
    let unpublished = handler.toggle_published(&id.to_string()).await.unwrap();
    assert!(!unpublished.published);
}

#[actix_rt::test]
async fn republishing_stamps_a_fresh_publication_date() {
    let mut original = post("Old News", false);
    let earlier = Utc::now() - chrono::Duration::days(30);
    original.published_at = Some(earlier);
    let id = original.id;

    let mut repo = MockBlogRepo::new();
    let fetched = original.clone();
    repo.expect_get_blog_post_by_id()
        .with(eq(id))
        .returning(move |_| Ok(fetched.clone()));
    repo.expect_update_blog_post()
        .withf(move |p| p.published && p.published_at.is_some_and(|at| at > earlier))
        .returning(|p| Ok(p.clone()));

    let handler = BlogPostHandler::new(repo);
    let republished = handler.toggle_published(&id.to_string()).await.unwrap();
    assert!(republished.published);
    assert_ne!(republished.published_at, Some(earlier));
}

#[actix_rt::test]
async fn invalid_ids_never_reach_the_repository() {
    let handler = BlogPostHandler::new(MockBlogRepo::new());
    let result = handler.delete_blog_post("definitely-not-a-uuid").await;
    assert!(result.is_err());
}

#[actix_rt::test]
async fn contact_submissions_are_normalized_before_insert() {
    let mut repo = MockMessageRepo::new();
    repo.expect_create_message()
        .withf(|form| form.email == "ada@example.com" && form.phone.is_none())
        .returning(|form| {
            let now = Utc::now();
            Ok(ContactMessage {
                id: Uuid::new_v4(),
                name: form.name.clone(),
                email: form.email.clone(),
                phone: form.phone.clone(),
                subject: form.subject.clone(),
                message: form.message.clone(),
                status: MessageStatus::Unread,
                created_at: now,
                updated_at: now,
            })
        });

    let handler = ContactMessageHandler::new(repo);
    let form: ContactForm = serde_json::from_value(json!({
        "name": "  Ada Lovelace ",
        "email": " Ada@Example.com ",
        "phone": "   ",
        "message": "I would like a new website."
    }))
    .unwrap();

    let message = handler.submit(form).await.unwrap();
    assert_eq!(message.status, MessageStatus::Unread);
    assert_eq!(message.name, "Ada Lovelace");
}

#[actix_rt::test]
async fn login_with_unknown_email_is_wrong_credentials() {
    let mut repo = MockUserRepo::new();
    repo.expect_get_user_by_email().returning(|_| Ok(None));

    let handler = AuthHandler::new(repo, JwtService::new(&test_utils::test_config()));
    let result = handler
        .login(LoginUser { email: "nobody@janedoe.dev".into(), password: "whatever".into() })
        .await;
    assert!(matches!(result, Err(AuthError::WrongCredentials)));
}

#[actix_rt::test]
async fn login_issues_a_token_pair() {
    let hash = hash_password("Sturdy-Lantern-Orbit-42").unwrap();
    let mut repo = MockUserRepo::new();
    repo.expect_get_user_by_email().returning(move |email| {
        Ok(Some(User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: hash.clone(),
            is_admin: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }))
    });

    let handler = AuthHandler::new(repo, JwtService::new(&test_utils::test_config()));
    let response = handler
        .login(LoginUser { email: "admin@janedoe.dev".into(), password: "Sturdy-Lantern-Orbit-42".into() })
        .await
        .unwrap();

    assert_eq!(response.token_type, "Bearer");
    assert_eq!(response.expires_in, 300);
    assert_ne!(response.access_token, response.refresh_token);
}

#[actix_rt::test]
async fn admin_bootstrap_is_idempotent_and_rejects_weak_passwords() {
    let mut repo = MockUserRepo::new();
    repo.expect_get_user_by_email()
        .withf(|email| email == "admin@janedoe.dev")
        .times(1)
        .returning(|_| Ok(Some(test_utils::user(true))));
    repo.expect_get_user_by_email()
        .withf(|email| email == "new@janedoe.dev")
        .returning(|_| Ok(None));
    repo.expect_create_user().never();

    let handler = AuthHandler::new(repo, JwtService::new(&test_utils::test_config()));

    let existing = handler.ensure_admin(" Admin@JaneDoe.dev ", "anything").await.unwrap();
    assert_eq!(existing, AdminBootstrap::AlreadyExists);

    let weak = handler.ensure_admin("new@janedoe.dev", "password").await;
    assert!(matches!(weak, Err(AppError::ValidationError(_))));
}
