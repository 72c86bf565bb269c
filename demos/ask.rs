// Author: Jacques Murray

mod common;

use chat_retry::{messages, ChatClientBuilder, ChatError, ChatMessage};

const SAMPLE_QUESTIONS: [&str; 3] = [
    "Perso.ai는 어떤 서비스인가요?",
    "Perso.ai는 어떤 기술을 사용하나요?",
    "Perso.ai에서 지원하는 언어는 몇 개인가요?",
];

#[tokio::main]
async fn main() -> Result<(), ChatError> {
    // CHAT_API_URL, or the first argument, points at the backend.
    let mut builder = ChatClientBuilder::from_env()?;
    if let Some(url) = common::base_url_arg() {
        builder = builder.base_url(url);
    }
    let client = builder.build()?;

    match client.check_health().await {
        Ok(health) => println!("Backend {} ({})", health.status, health.version),
        Err(e) => println!("Health check failed: {}", e),
    }

    let mut history: Vec<ChatMessage> = Vec::new();
    for question in SAMPLE_QUESTIONS {
        println!("\n> {}", question);
        println!("{}", messages::LOADING);

        match client.ask(question, &history).await {
            Ok(response) => {
                println!("{}", response.answer);
                history.push(ChatMessage::user(question));
                history.push(ChatMessage::assistant(response.answer));
            }
            Err(e) => println!("{}", e.user_message()),
        }
    }
    Ok(())
}
