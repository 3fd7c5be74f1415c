//! Examples for using the formgate server API

use reqwest::multipart::{Form, Part};
use reqwest::Client;

const SERVER_URL: &str = "http://localhost:8080";
const AUTH_TOKEN: &str = "Bearer valid-token";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = Client::new();

    // Example 1: Health check
    println!("1. Health Check:");
    let resp = client.get(format!("{SERVER_URL}/health")).send().await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 2: Token check
    println!("2. Authenticate:");
    let resp = client
        .post(format!("{SERVER_URL}/auth"))
        .header("Authorization", AUTH_TOKEN)
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 3: Rejected token
    println!("3. Authenticate with a bad token:");
    let resp = client
        .get(format!("{SERVER_URL}/auth"))
        .header("Authorization", "Bearer nope")
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 4: Upload a form with two files under one field
    println!("4. Upload:");
    let form = Form::new()
        .text("title", "hello")
        .text("title", "ignored duplicate")
        .part(
            "doc",
            Part::bytes(b"%PDF".to_vec())
                .file_name("report.pdf")
                .mime_str("application/pdf")?,
        )
        .part(
            "doc",
            Part::text("plain notes").file_name("notes.txt"),
        );
    let resp = client
        .post(format!("{SERVER_URL}/upload"))
        .multipart(form)
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 5: Wrong content type
    println!("5. Upload without multipart:");
    let resp = client
        .post(format!("{SERVER_URL}/upload"))
        .header("Content-Type", "text/plain")
        .body("not a form")
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);

    Ok(())
}
