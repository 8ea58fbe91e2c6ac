/// E2E tests for the blog flows.
/// These tests run against a real server instance:
///   INKSTAND_TEST_RESET=1 cargo run -- --port 6969
///   cargo test --test e2e_blog -- --ignored
use reqwest::Client;

const BASE_URL: &str = "http://localhost:6969";

async fn reset(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
    let response = client.get(format!("{}/test/reset", BASE_URL)).send().await?;
    assert_eq!(response.status(), 200);
    Ok(())
}

async fn signup(
    client: &Client,
    username: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = client
        .post(format!("{}/signup", BASE_URL))
        .form(&[
            ("username", username),
            ("password", password),
            ("verify-password", password),
        ])
        .send()
        .await?;
    assert_eq!(response.status(), 200, "redirect should land on the front page");
    Ok(())
}

#[tokio::test]
#[ignore] // Needs a running server, see module docs
async fn signup_post_and_front_page() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::builder().cookie_store(true).build()?;
    reset(&client).await?;
    signup(&client, "alice", "secret1").await?;

    let response = client
        .post(format!("{}/newpost", BASE_URL))
        .form(&[("subject", "Hello"), ("content", "World")])
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let body = client
        .get(format!("{}/", BASE_URL))
        .send()
        .await?
        .text()
        .await?;
    assert!(body.contains("Hello"));
    assert!(body.contains("0 likes"));

    Ok(())
}

#[tokio::test]
#[ignore]
async fn login_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::builder().cookie_store(true).build()?;
    reset(&client).await?;
    signup(&client, "carol", "secret1").await?;

    // A fresh client has no session
    let fresh = Client::builder().cookie_store(true).build()?;
    let body = fresh
        .get(format!("{}/", BASE_URL))
        .send()
        .await?
        .text()
        .await?;
    assert!(body.contains("Log in"));

    let body = fresh
        .post(format!("{}/login", BASE_URL))
        .form(&[("username", "carol"), ("password", "secret1")])
        .send()
        .await?
        .text()
        .await?;
    assert!(body.contains("Log out"));

    Ok(())
}
