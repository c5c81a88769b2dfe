use axum::http::StatusCode;
use chrono::{Duration, Utc};
use yasite::entity::{Comment, NewNews, News, User};
use yasite::http::Page;
use yasite::storage::Store;
use yasite::urls::news::{comments_anchor, Route};
use yasite::urls::AuthRoute;
use yasite::{Client, NewsApp, Settings};

const COMMENT_TEXT: &str = "Текст комментария";
const NEW_COMMENT_TEXT: &str = "Обновлённый комментарий";

/// A fresh site with an author, a reader and one news item.
struct Scenario {
    app: NewsApp,
    author: User,
    reader: User,
    news: News,
}

impl Scenario {
    fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    fn with_settings(settings: Settings) -> Self {
        let app = NewsApp::new(Store::open_in_memory().unwrap(), settings);
        let author = app.store().create_user("Автор").unwrap();
        let reader = app.store().create_user("Читатель").unwrap();
        let news = app
            .store()
            .insert_news(&NewNews::new("Заголовок", "Текст заметки"))
            .unwrap();
        Self {
            app,
            author,
            reader,
            news,
        }
    }

    fn comment(&self) -> Comment {
        self.app
            .store()
            .insert_comment(self.news.id, self.author.id, COMMENT_TEXT)
            .unwrap()
    }

    fn anonymous(&self) -> Client<'_> {
        Client::anonymous(&self.app)
    }

    fn author_client(&self) -> Client<'_> {
        Client::logged_in(&self.app, self.author.clone())
    }

    fn reader_client(&self) -> Client<'_> {
        Client::logged_in(&self.app, self.reader.clone())
    }

    fn comment_count(&self) -> usize {
        self.app.store().count_comments().unwrap()
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

#[test]
fn test_pages_availability_for_anonymous_user() {
    let s = Scenario::new();
    let pages = [
        Route::Home.path(),
        Route::Detail(s.news.id).path(),
        AuthRoute::Login.path(),
        AuthRoute::Logout.path(),
        AuthRoute::Signup.path(),
    ];
    for page in pages {
        let response = s.anonymous().get(&page);
        assert_eq!(response.status, StatusCode::OK, "page {}", page);
    }
}

#[test]
fn test_availability_for_comment_edit_and_delete() {
    let s = Scenario::new();
    let comment = s.comment();
    let cases = [
        (s.author_client(), StatusCode::OK),
        (s.reader_client(), StatusCode::NOT_FOUND),
    ];
    for (mut client, expected) in cases {
        for route in [Route::Edit(comment.id), Route::Delete(comment.id)] {
            let response = client.get(&route.path());
            assert_eq!(response.status, expected, "route {:?}", route);
        }
    }
}

#[test]
fn test_redirect_for_anonymous_client() {
    let s = Scenario::new();
    let comment = s.comment();
    for route in [Route::Edit(comment.id), Route::Delete(comment.id)] {
        let path = route.path();
        let expected = format!("{}?next={}", AuthRoute::Login.path(), path);
        let response = s.anonymous().get(&path);
        assert!(response.redirects_to(&expected), "route {:?}", route);
    }
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

#[test]
fn test_news_count_and_order() {
    let settings = Settings::default();
    let per_page = settings.news_count_on_home_page;
    let s = Scenario::with_settings(settings);
    let today = Utc::now().date_naive();
    let all_news: Vec<NewNews> = (0..=per_page)
        .map(|index| {
            NewNews::new(format!("Новость {}", index), "Просто текст.")
                .dated(today - Duration::days(index as i64 + 1))
        })
        .collect();
    s.app.store().insert_news_batch(&all_news).unwrap();
    assert!(s.app.store().count_news().unwrap() > per_page);

    let response = s.anonymous().get(&Route::Home.path());
    let Some(Page::NewsList { object_list }) = response.page else {
        panic!("expected news list");
    };
    assert_eq!(object_list.len(), per_page);

    let dates: Vec<_> = object_list.iter().map(|n| n.date).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
    assert_eq!(object_list[0].id, s.news.id, "today's news comes first");
}

#[test]
fn test_comments_order() {
    let s = Scenario::new();
    let now = Utc::now();
    // Insert newest first; the page must still show oldest first.
    for index in (0..10).rev() {
        s.app
            .store()
            .insert_comment_at(
                s.news.id,
                s.author.id,
                &format!("Текст {}", index),
                now + Duration::days(index),
            )
            .unwrap();
    }

    let response = s.anonymous().get(&Route::Detail(s.news.id).path());
    let Some(Page::NewsDetail { news, comments, .. }) = response.page else {
        panic!("expected news detail");
    };
    assert_eq!(news.id, s.news.id);
    assert_eq!(comments.len(), 10);
    let timestamps: Vec<_> = comments.iter().map(|c| c.created).collect();
    let mut sorted = timestamps.clone();
    sorted.sort();
    assert_eq!(timestamps, sorted);
    assert_eq!(comments[0].text, "Текст 0");
}

#[test]
fn test_two_comments_staggered_by_days() {
    let s = Scenario::new();
    let now = Utc::now();
    let later = s
        .app
        .store()
        .insert_comment_at(s.news.id, s.author.id, "позже", now + Duration::days(3))
        .unwrap();
    let first = s
        .app
        .store()
        .insert_comment_at(s.news.id, s.author.id, "раньше", now)
        .unwrap();

    let response = s.anonymous().get(&Route::Detail(s.news.id).path());
    let Some(Page::NewsDetail { comments, .. }) = response.page else {
        panic!("expected news detail");
    };
    let ids: Vec<_> = comments.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![first.id, later.id]);
}

#[test]
fn test_form_only_for_authenticated_client() {
    let s = Scenario::new();
    let path = Route::Detail(s.news.id).path();

    let anonymous = s.anonymous().get(&path);
    let Some(Page::NewsDetail { form, .. }) = anonymous.page else {
        panic!("expected news detail");
    };
    assert!(form.is_none());

    let author = s.author_client().get(&path);
    let Some(Page::NewsDetail { form, .. }) = author.page else {
        panic!("expected news detail");
    };
    assert!(form.is_some());
}

// ---------------------------------------------------------------------------
// Logic
// ---------------------------------------------------------------------------

#[test]
fn test_user_can_create_comment() {
    let s = Scenario::new();
    let before = s.comment_count();

    let response = s
        .author_client()
        .post(&Route::Detail(s.news.id).path(), &[("text", COMMENT_TEXT)]);
    assert!(response.redirects_to(&comments_anchor(s.news.id)));
    assert_eq!(s.comment_count(), before + 1);

    let comments = s.app.store().list_comments(s.news.id).unwrap();
    let comment = &comments[0];
    assert_eq!(comment.text, COMMENT_TEXT);
    assert_eq!(comment.news_id, s.news.id);
    assert_eq!(comment.author_id, s.author.id);
}

#[test]
fn test_anonymous_user_cant_create_comment() {
    let s = Scenario::new();
    let path = Route::Detail(s.news.id).path();

    let response = s.anonymous().post(&path, &[("text", COMMENT_TEXT)]);
    assert!(response.redirects_to(&format!("{}?next={}", AuthRoute::Login.path(), path)));
    assert_eq!(s.comment_count(), 0);
}

#[test]
fn test_user_cant_use_bad_words() {
    let s = Scenario::new();
    let settings = s.app.settings().clone();
    for word in &settings.bad_words {
        let text = format!("Какой-то текст, {}, еще текст", word);
        let response = s
            .author_client()
            .post(&Route::Detail(s.news.id).path(), &[("text", text.as_str())]);

        assert_eq!(response.status, StatusCode::OK);
        let Some(Page::NewsDetail { form: Some(form), .. }) = response.page else {
            panic!("expected bound comment form");
        };
        assert_eq!(form.errors.field("text"), [settings.comment_warning.clone()]);
        assert_eq!(s.comment_count(), 0);
    }
}

#[test]
fn test_anonymous_user_cant_edit_or_delete_comment() {
    let s = Scenario::new();
    let comment = s.comment();
    let before = s.comment_count();
    let login = |path: &str| format!("{}?next={}", AuthRoute::Login.path(), path);

    let edit = Route::Edit(comment.id).path();
    let response = s.anonymous().post(&edit, &[("text", NEW_COMMENT_TEXT)]);
    assert!(response.redirects_to(&login(&edit)));

    let delete = Route::Delete(comment.id).path();
    let response = s.anonymous().delete(&delete);
    assert!(response.redirects_to(&login(&delete)));
    let response = s.anonymous().post(&delete, &[]);
    assert!(response.redirects_to(&login(&delete)));

    assert_eq!(s.comment_count(), before);
    let stored = s.app.store().get_comment(comment.id).unwrap().unwrap();
    assert_eq!(stored.text, COMMENT_TEXT);
}

#[test]
fn test_author_can_delete_comment() {
    let s = Scenario::new();
    let comment = s.comment();
    let before = s.comment_count();

    let response = s.author_client().delete(&Route::Delete(comment.id).path());
    assert!(response.redirects_to(&comments_anchor(s.news.id)));
    assert_eq!(s.comment_count(), before - 1);
}

#[test]
fn test_user_cant_delete_comment_of_another_user() {
    let s = Scenario::new();
    let comment = s.comment();
    let before = s.comment_count();

    let response = s.reader_client().delete(&Route::Delete(comment.id).path());
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(s.comment_count(), before);
}

#[test]
fn test_author_can_edit_comment() {
    let s = Scenario::new();
    let comment = s.comment();

    let response = s
        .author_client()
        .post(&Route::Edit(comment.id).path(), &[("text", NEW_COMMENT_TEXT)]);
    assert!(response.redirects_to(&comments_anchor(s.news.id)));
    let stored = s.app.store().get_comment(comment.id).unwrap().unwrap();
    assert_eq!(stored.text, NEW_COMMENT_TEXT);
}

#[test]
fn test_user_cant_edit_comment_of_another_user() {
    let s = Scenario::new();
    let comment = s.comment();

    let response = s
        .reader_client()
        .post(&Route::Edit(comment.id).path(), &[("text", NEW_COMMENT_TEXT)]);
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let stored = s.app.store().get_comment(comment.id).unwrap().unwrap();
    assert_eq!(stored.text, COMMENT_TEXT);
}

#[test]
fn test_login_through_form_grants_comment_rights() {
    let s = Scenario::new();
    let comment = s.comment();
    let edit = Route::Edit(comment.id).path();
    let mut client = s.anonymous();

    let login = format!("{}?next={}", AuthRoute::Login.path(), edit);
    let response = client.post(&login, &[("username", "Автор")]);
    assert!(response.redirects_to(&edit));
    assert_eq!(client.get(&edit).status, StatusCode::OK);

    client.get(&AuthRoute::Logout.path());
    assert!(!client.principal().is_authenticated());
}
