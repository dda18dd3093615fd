//! Community Center CLI
//!
//! Command-line front end for booking the community center.
//!
//! # Usage
//!
//! ```bash
//! community-center --date 05/20/2024 --hour 9 schedule
//! community-center --date 05/20/2024 --hour 9 register alice secret --kind resident
//! community-center --date 05/20/2024 --hour 9 --user alice --password secret \
//!     request-event --event-date 05/30/2024 --event-time 14 --duration 2 --layout meeting \
//!     --price 5 --card 4111111111111111 --cvv 123 --expiry 06/24
//! community-center --date 05/20/2024 --hour 9 --user BradStevens --password admin approve 1
//! ```
//!
//! Every run loads the facility from the data directory (`--data-dir`, or
//! `COMMUNITY_CENTER_DATA_DIR`, default `program_data`), executes one command
//! at the simulated time given by `--date` and `--hour`, prints the result to
//! stdout, and saves the data directory if the command changed anything.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (rejected command, bad credentials, unreadable data directory, etc.)

use community_center::{cli, session};
use std::process;

fn main() {
    let args = cli::parse_args();
    cli::init_logging(&args.log_level);

    let mut output = std::io::stdout();
    let result = args.session_config().and_then(|config| {
        session::run(
            config,
            &args.command,
            args.credentials().as_ref(),
            &mut output,
        )
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
