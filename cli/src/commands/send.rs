use std::sync::Arc;

use clap::Args;

use crate::session::{ChatSession, IgnoreReason, SubmitOutcome};
use crate::transport::HttpTransport;
use crate::util::{exit_error, format_entry};

#[derive(Args)]
pub struct SendArgs {
    /// Message to send
    pub message: String,

    /// Print only the reply text, without the transcript
    #[arg(long)]
    pub raw: bool,
}

pub async fn run(api_url: &str, args: SendArgs) -> i32 {
    let session = ChatSession::new(Arc::new(HttpTransport::new(api_url)));

    let outcome = session.submit(&args.message).await;
    if let SubmitOutcome::Ignored(IgnoreReason::Empty) = outcome {
        exit_error(4, "usage_error", "Message is empty", Some("Pass a non-blank MESSAGE"));
    }

    if args.raw {
        if let SubmitOutcome::Replied(reply) = &outcome {
            println!("{reply}");
        }
    } else {
        for entry in session.transcript() {
            println!("{}", format_entry(&entry));
        }
    }

    match outcome {
        SubmitOutcome::Replied(_) => 0,
        _ => 2,
    }
}
