//! Read and acknowledge SMS on every modem interface.
//!
//! Run with:
//! KEENETIC_URL=http://192.168.1.1 KEENETIC_USERNAME=admin KEENETIC_PASSWORD=... \
//!     cargo run --example read_sms

use keenetic_rs::{KeeneticClient, MessageId};
use serde_json::Value;

#[tokio::main]
async fn main() -> keenetic_rs::Result<()> {
    tracing_subscriber::fmt::init();

    let url = std::env::var("KEENETIC_URL").unwrap_or_else(|_| "http://192.168.1.1".to_string());
    let username = std::env::var("KEENETIC_USERNAME").expect("KEENETIC_USERNAME required");
    let password = std::env::var("KEENETIC_PASSWORD").expect("KEENETIC_PASSWORD required");

    let mut client = KeeneticClient::new(&url, username, password)?;
    println!("Connecting to {}...", url);
    if let Err(err) = client.connect().await {
        client.close().await?;
        return Err(err);
    }
    println!("Authenticated!\n");

    let modems = client.get_mobile_interfaces().await?;
    println!("Found {} mobile interface(s)", modems.len());

    for name in modems.keys() {
        let inbox = client.get_sms_by_interface(name).await?;
        let messages = inbox
            .pointer("/sms/list/messages")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        println!("\n=== {} ({} message(s)) ===", name, messages.len());
        let mut unread = Vec::new();
        for (id, message) in &messages {
            println!(
                "  [{}] {}: {}",
                id,
                message["from"].as_str().unwrap_or("?"),
                message["text"].as_str().unwrap_or("")
            );
            if message["read"] == Value::Bool(false) {
                unread.push(MessageId::new(id.as_str()));
            }
        }

        if !unread.is_empty() {
            let result = client.mark_sms_as_read(name, unread).await?;
            println!("  Marked as read: {}", result);
        }
    }

    client.close().await?;
    println!("\nDone!");
    Ok(())
}
