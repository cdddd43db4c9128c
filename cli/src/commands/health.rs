use crate::util::{client, exit_error};

pub async fn run(api_url: &str) -> i32 {
    let resp = match client().get(format!("{api_url}/health")).send().await {
        Ok(r) => r,
        Err(e) => exit_error(
            3,
            "connection_error",
            &e.to_string(),
            Some("Is the chat server running? Check CHATRELAY_API_URL."),
        ),
    };

    let status = resp.status();
    let body: serde_json::Value = match resp.json().await {
        Ok(v) => v,
        Err(e) => exit_error(1, "server_error", &format!("Health response is not JSON: {e}"), None),
    };

    match serde_json::to_string_pretty(&body) {
        Ok(formatted) if status.is_success() => println!("{formatted}"),
        Ok(formatted) => eprintln!("{formatted}"),
        Err(e) => exit_error(1, "server_error", &e.to_string(), None),
    }

    if status.is_success() { 0 } else { 1 }
}
