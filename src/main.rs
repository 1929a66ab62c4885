use std::env;
use std::process::ExitCode;

use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use tx_ledger::Ledger;
use tx_ledger::csv::{read_records, write_accounts};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let path = env::args()
        .nth(1)
        .expect("usage: tx-ledger <transactions.csv>");

    if !path.ends_with(".csv") {
        warn!(path, "input file seems to not be a csv file");
    }

    let records = match read_records(path.clone()) {
        Ok(records) => records,
        Err(e) => {
            // Unreadable input is reported and treated as an empty ledger.
            warn!(path, "cannot read input: {e}");
            return ExitCode::SUCCESS;
        }
    };

    let mut ledger = Ledger::new();
    let (sender, receiver) = tokio::sync::mpsc::channel(16);

    // Blocking csv reads stay off the runtime; the first validation failure
    // stops the feed and is surfaced after the stream drains.
    let reader = tokio::task::spawn_blocking(move || {
        for result in records {
            match result {
                Ok(record) => {
                    if sender.blocking_send(record).is_err() {
                        break;
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    });

    ledger.run(ReceiverStream::new(receiver)).await;

    match reader.await.expect("reader task panicked") {
        Ok(()) => {
            write_accounts(std::io::stdout().lock(), ledger.accounts());
            ExitCode::SUCCESS
        }
        Err(e) => {
            // A fatal validation error aborts the run with no table.
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
