// Author: Jacques Murray

mod common;

use chat_retry::{ChatClient, ChatError, ChatRetryConfig};
use common::{base_url_arg, retry_including_request_timeout};
use std::time::{Duration, Instant};

async fn run_example(client: &ChatClient, question: &str) {
    println!("\n--- Asking: {} ---", question);

    let start = Instant::now();
    match client.ask(question, &[]).await {
        Ok(response) => println!("Answer ({:.2}): {}", response.confidence, response.answer),
        Err(e) => {
            println!("Failed: {} (status: {:?})", e, e.status_code());
            println!("Shown to user: {}", e.user_message());
        }
    }
    println!("Total time: {:?}", start.elapsed());
}

#[tokio::main]
async fn main() -> Result<(), ChatError> {
    // Retry with a custom condition and a tighter schedule
    let retry = ChatRetryConfig::new(
        4,
        Duration::from_millis(200),
        Duration::from_secs(2),
        retry_including_request_timeout,
    );

    let mut builder = ChatClient::builder().retry(retry);
    if let Some(url) = base_url_arg() {
        builder = builder.base_url(url);
    }
    let client = builder.build()?;

    run_example(&client, "Perso.ai의 주요 기능은 무엇인가요?").await;
    run_example(&client, "").await;
    Ok(())
}
