//! Basic OpenAI client usage example

use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize from environment
    let client = OpenAIClient::from_env()?;

    // Plain completion with a token cap
    println!("=== Chat Completion ===");
    let response = client
        .chat_completion(
            ChatRequest::new("gpt-4.1-mini")
                .message(Message::system("You are a helpful assistant."))
                .message(Message::user("What is Rust in one sentence?"))
                .temperature(0.7)
                .token_cap(100),
        )
        .await?;

    println!("Response: {}", response.content);

    // JSON-object mode
    println!("\n=== JSON Object ===");
    let result = client
        .chat_completion(
            ChatRequest::new("gpt-4.1-mini")
                .message(Message::system("Respond with a single JSON object only."))
                .message(Message::user(
                    r#"List three taglines for a bakery under the root key "taglines"."#,
                ))
                .json_object(),
        )
        .await;

    match result {
        Ok(response) => println!("JSON: {}", response.content),
        Err(OpenAIError::Auth(msg)) => eprintln!("Key rejected: {msg}"),
        Err(OpenAIError::RateLimit(msg)) => eprintln!("Throttled: {msg}"),
        Err(e) => eprintln!("Failed: {e}"),
    }

    Ok(())
}
