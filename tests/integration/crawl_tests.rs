//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the recipe site and run the
//! full crawl cycle end-to-end against a temporary database.

use diet_sieve::config::load_config_with_hash;
use diet_sieve::crawler::run_crawl;
use diet_sieve::progress::ProgressTracker;
use diet_sieve::storage::{SqliteStorage, Storage};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LFV_FILTER: &str = r#"{
    "add": ["Paneer", "Spinach"],
    "eliminate": ["Sugar", "Egg"],
    "recipesToAvoid": ["Dessert"]
}"#;

/// Writes a config and the LFV filter document into `dir`
fn write_config(dir: &Path, root_url: &str, timeout_ms: u64) -> std::path::PathBuf {
    std::fs::create_dir_all(dir.join("filters")).unwrap();
    std::fs::write(dir.join("filters/lfv.json"), LFV_FILTER).unwrap();

    let config = format!(
        r#"
[site]
root-url = "{root_url}"

[crawler]
page-load-timeout-ms = {timeout_ms}
failure-delay-ms = 0
user-agent = "diet-sieve-test/1.0"

[progress]
checkpoint-path = '{checkpoint}'
failure-log-path = '{failures}'

[database]
path = '{db}'

[[diet]]
name = "LFV"
table = "lfv_recipes"
filter-path = "filters/lfv.json"
"#,
        root_url = root_url,
        timeout_ms = timeout_ms,
        checkpoint = dir.join("progress.txt").display(),
        failures = dir.join("failed_urls.txt").display(),
        db = dir.join("recipes.db").display(),
    );

    let config_path = dir.join("diet-sieve.toml");
    std::fs::write(&config_path, config).unwrap();
    config_path
}

fn listing_page(links: &[&str], last_page: u32) -> String {
    let cards: String = links
        .iter()
        .map(|l| {
            format!(
                r#"<div class="card"><h5><a href="{}">recipe</a></h5></div>"#,
                l
            )
        })
        .collect();

    format!(
        r#"<html><body>
        <div class="recipe-list">{}</div>
        <ul class="pagination">
          <li class="page-item"><a href="?page=1">1</a></li>
          <li class="page-item"><a href="?page={last}">{last}</a></li>
          <li class="page-item"><a href="?page=2">Next</a></li>
        </ul>
        </body></html>"#,
        cards,
        last = last_page
    )
}

fn detail_page(name: &str, ingredients: &str, tags: &[&str]) -> String {
    let tags: String = tags
        .iter()
        .map(|t| format!(r#"<li><a href="/tag">{}</a></li>"#, t))
        .collect();

    format!(
        r#"<html><body>
        <p>You are here: <a>Home</a> <a>Lunch</a></p>
        <h4 class="rec-heading"><span>{}</span></h4>
        <div id="aboutrecipe"><p>A weekday favourite.</p></div>
        <h6>Preparation Time</h6><p><strong>10 mins</strong></p>
        <h6>Cooking Time</h6><p><strong>20 mins</strong></p>
        <h6>Makes</h6><p><strong>4 servings</strong></p>
        <div id="ingredients">{}</div>
        <div id="methods"><ol><li>Cook it.</li></ol></div>
        <ul class="tags-list">{}</ul>
        </body></html>"#,
        name, ingredients, tags
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

/// Mounts the listing root, which only needs to report the page count
async fn mount_root(server: &MockServer, last_page: u32) {
    Mock::given(method("GET"))
        .and(path("/recipes/"))
        .respond_with(html(listing_page(&[], last_page)))
        .mount(server)
        .await;
}

async fn mount_listing(server: &MockServer, page: u32, links: &[&str], last_page: u32) {
    Mock::given(method("GET"))
        .and(path("/recipes/"))
        .and(query_param("page", page.to_string()))
        .respond_with(html(listing_page(links, last_page)))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn count_rows(dir: &TempDir) -> u64 {
    let storage = SqliteStorage::new(&dir.path().join("recipes.db")).unwrap();
    storage.count_recipes("lfv_recipes").unwrap()
}

#[tokio::test]
async fn test_matching_recipe_is_stored() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(&server, 1, &["/recipes/palak-paneer-1r"], 1).await;
    mount_root(&server, 1).await;
    mount_detail(
        &server,
        "/recipes/palak-paneer-1r",
        detail_page(
            "Palak Paneer",
            "200 g paneer, 2 cups spinach, salt",
            &["Punjabi", "Lunch", "Veg"],
        ),
    )
    .await;

    let config_path = write_config(dir.path(), &format!("{}/recipes/", server.uri()), 5000);
    let (config, hash) = load_config_with_hash(&config_path).unwrap();

    let report = run_crawl(&config, &hash, false).await.unwrap();

    assert_eq!(report.total_pages, 1);
    assert_eq!(report.recipes_matched, 1);
    assert_eq!(report.rows_stored, 1);
    assert_eq!(count_rows(&dir), 1);

    let storage = SqliteStorage::new(&dir.path().join("recipes.db")).unwrap();
    let url = format!("{}/recipes/palak-paneer-1r", server.uri());
    assert!(storage.recipe_exists("lfv_recipes", &url).unwrap());

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.config_hash, hash);
    assert_eq!(run.last_page, Some(1));
}

#[tokio::test]
async fn test_eliminated_ingredient_is_not_stored() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(&server, 1, &["/recipes/paneer-kheer-2r"], 1).await;
    mount_root(&server, 1).await;
    mount_detail(
        &server,
        "/recipes/paneer-kheer-2r",
        detail_page("Paneer Kheer", "paneer, milk, sugar", &["Sweet"]),
    )
    .await;

    let config_path = write_config(dir.path(), &format!("{}/recipes/", server.uri()), 5000);
    let (config, hash) = load_config_with_hash(&config_path).unwrap();

    let report = run_crawl(&config, &hash, false).await.unwrap();

    assert_eq!(report.recipes_skipped, 1);
    assert_eq!(report.rows_stored, 0);
    assert_eq!(count_rows(&dir), 0);
}

#[tokio::test]
async fn test_slow_recipe_is_logged_and_crawl_continues() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(&server, 1, &["/recipes/slow-3r"], 2).await;
    mount_listing(&server, 2, &["/recipes/palak-paneer-1r"], 2).await;
    mount_root(&server, 2).await;

    Mock::given(method("GET"))
        .and(path("/recipes/slow-3r"))
        .respond_with(
            html(detail_page("Slow Paneer", "paneer", &[])).set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    mount_detail(
        &server,
        "/recipes/palak-paneer-1r",
        detail_page("Palak Paneer", "paneer, spinach", &["Lunch"]),
    )
    .await;

    let config_path = write_config(dir.path(), &format!("{}/recipes/", server.uri()), 1000);
    let (config, hash) = load_config_with_hash(&config_path).unwrap();

    let report = run_crawl(&config, &hash, false).await.unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.retry_failed, 1);
    assert_eq!(report.rows_stored, 1);
    assert_eq!(
        ProgressTracker::new(dir.path().join("progress.txt")).read_checkpoint(),
        2
    );

    let log = std::fs::read_to_string(dir.path().join("failed_urls.txt")).unwrap();
    let slow_url = format!("{}/recipes/slow-3r", server.uri());
    assert!(log
        .lines()
        .all(|line| line.starts_with(&format!("{} --> Timeout:", slow_url))));
    assert_eq!(log.lines().count(), 2);
}

#[tokio::test]
async fn test_resume_skips_checkpointed_pages() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/recipes/"))
        .and(query_param("page", "1"))
        .respond_with(html(listing_page(&["/recipes/old-4r"], 2)))
        .expect(0)
        .mount(&server)
        .await;
    mount_listing(&server, 2, &["/recipes/palak-paneer-1r"], 2).await;
    mount_root(&server, 2).await;
    mount_detail(
        &server,
        "/recipes/palak-paneer-1r",
        detail_page("Palak Paneer", "paneer", &[]),
    )
    .await;

    ProgressTracker::new(dir.path().join("progress.txt"))
        .save_checkpoint(1)
        .unwrap();

    let config_path = write_config(dir.path(), &format!("{}/recipes/", server.uri()), 5000);
    let (config, hash) = load_config_with_hash(&config_path).unwrap();

    let report = run_crawl(&config, &hash, false).await.unwrap();

    assert_eq!(report.start_page, 1);
    assert_eq!(report.pages_processed, 1);
    assert_eq!(count_rows(&dir), 1);
    server.verify().await;
}

#[tokio::test]
async fn test_rerun_does_not_duplicate_rows() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(&server, 1, &["/recipes/palak-paneer-1r"], 1).await;
    mount_root(&server, 1).await;
    mount_detail(
        &server,
        "/recipes/palak-paneer-1r",
        detail_page("Palak Paneer", "paneer", &["Lunch"]),
    )
    .await;

    let config_path = write_config(dir.path(), &format!("{}/recipes/", server.uri()), 5000);
    let (config, hash) = load_config_with_hash(&config_path).unwrap();

    let first = run_crawl(&config, &hash, false).await.unwrap();
    let second = run_crawl(&config, &hash, true).await.unwrap();

    assert_eq!(first.rows_stored, 1);
    assert_eq!(second.start_page, 0);
    assert_eq!(second.rows_stored, 0);
    assert_eq!(second.duplicates, 1);
    assert_eq!(count_rows(&dir), 1);
}

#[tokio::test]
async fn test_completed_checkpoint_crawls_nothing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_root(&server, 3).await;
    ProgressTracker::new(dir.path().join("progress.txt"))
        .save_checkpoint(3)
        .unwrap();

    let config_path = write_config(dir.path(), &format!("{}/recipes/", server.uri()), 5000);
    let (config, hash) = load_config_with_hash(&config_path).unwrap();

    let report = run_crawl(&config, &hash, false).await.unwrap();

    assert_eq!(report.pages_processed, 0);
    assert_eq!(report.recipes_seen, 0);
    assert_eq!(
        ProgressTracker::new(dir.path().join("progress.txt")).read_checkpoint(),
        3
    );
}

#[tokio::test]
async fn test_server_error_on_root_is_fatal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config_path = write_config(dir.path(), &format!("{}/recipes/", server.uri()), 5000);
    let (config, hash) = load_config_with_hash(&config_path).unwrap();

    let result = run_crawl(&config, &hash, false).await;

    assert!(result.is_err());
    let storage = SqliteStorage::new(&dir.path().join("recipes.db")).unwrap();
    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status.to_db_string(), "failed");
}

#[tokio::test]
async fn test_failures_from_earlier_runs_are_not_retried() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_listing(&server, 1, &["/recipes/palak-paneer-1r"], 1).await;
    mount_root(&server, 1).await;
    mount_detail(
        &server,
        "/recipes/palak-paneer-1r",
        detail_page("Palak Paneer", "paneer", &["Lunch"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/recipes/old-failure-7r"))
        .respond_with(html(detail_page("Old", "paneer", &[])))
        .expect(0)
        .mount(&server)
        .await;

    let earlier = format!(
        "{}/recipes/old-failure-7r --> Timeout: Timed out loading it\n",
        server.uri()
    );
    std::fs::write(dir.path().join("failed_urls.txt"), &earlier).unwrap();

    let config_path = write_config(dir.path(), &format!("{}/recipes/", server.uri()), 5000);
    let (config, hash) = load_config_with_hash(&config_path).unwrap();

    let report = run_crawl(&config, &hash, false).await.unwrap();

    assert_eq!(report.failed, 0);
    assert_eq!(report.retry_succeeded + report.retry_failed, 0);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("failed_urls.txt")).unwrap(),
        earlier
    );
    server.verify().await;
}
