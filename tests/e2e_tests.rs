//! End-to-end integration tests
//!
//! These tests drive the complete pipeline the binary uses: clap parsing,
//! loading the data directory, running one command, printing, and saving.
//! Each test:
//! 1. Copies a fixture data directory (or writes one) into a temporary directory
//! 2. Runs a sequence of commands, each as a separate invocation
//! 3. Checks the printed output, the returned errors, and the saved state
//!
//! Test fixtures are located in tests/fixtures/:
//! - `community` - users only, nothing booked yet
//! - `booked` - one confirmed meeting organized by `acme` with `bob` holding a
//!   ticket, and one pending lecture requested by `alice`

#[cfg(test)]
mod tests {
    use clap::Parser;
    use community_center::cli::CliArgs;
    use community_center::session::{self, Session, SessionConfig};
    use community_center::{BookingError, Layout, TimeValue};
    use rstest::rstest;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const CARD: [&str; 6] = [
        "--card",
        "4111111111111111",
        "--cvv",
        "123",
        "--expiry",
        "06/24",
    ];

    const MANAGER: (&str, &str) = ("BradStevens", "admin");
    const ALICE: (&str, &str) = ("alice", "secret");
    const BOB: (&str, &str) = ("bob", "pw");
    const CAROL: (&str, &str) = ("carol", "pw");
    const DAVE: (&str, &str) = ("dave", "pw");
    const ACME: (&str, &str) = ("acme", "pw");

    const MAY_20: (&str, &str) = ("05/20/2024", "9");

    /// Copy tests/fixtures/{fixture_name}/ into a fresh temporary directory
    fn data_dir(fixture_name: &str) -> TempDir {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        assert!(
            Path::new(&fixture_dir).exists(),
            "Fixture not found: {}",
            fixture_dir
        );

        let dir = TempDir::new().expect("Failed to create temp dir");
        for entry in fs::read_dir(&fixture_dir).expect("Failed to read fixture dir") {
            let entry = entry.expect("Failed to read fixture entry");
            fs::copy(entry.path(), dir.path().join(entry.file_name()))
                .expect("Failed to copy fixture file");
        }
        dir
    }

    /// Run one command the way the binary would, returning what it printed
    fn run_cli(
        dir: &TempDir,
        now: (&str, &str),
        login: Option<(&str, &str)>,
        command: &[&str],
    ) -> Result<String, BookingError> {
        let data_dir = dir.path().to_str().expect("Temp dir path is not UTF-8");
        let mut argv = vec![
            "community-center",
            "--data-dir",
            data_dir,
            "--date",
            now.0,
            "--hour",
            now.1,
        ];
        if let Some((user, password)) = login {
            argv.extend(["--user", user, "--password", password]);
        }
        argv.extend_from_slice(command);

        let args = CliArgs::try_parse_from(argv.iter().copied())
            .unwrap_or_else(|e| panic!("Failed to parse {:?}: {}", argv, e));
        let mut output = Vec::new();
        session::run(
            args.session_config()?,
            &args.command,
            args.credentials().as_ref(),
            &mut output,
        )?;
        Ok(String::from_utf8(output).expect("Output is not UTF-8"))
    }

    fn request_event<'a>(
        date: &'a str,
        hour: &'a str,
        duration: &'a str,
        layout: &'a str,
    ) -> Vec<&'a str> {
        let mut args = vec![
            "request-event",
            "--event-date",
            date,
            "--event-time",
            hour,
            "--duration",
            duration,
            "--layout",
            layout,
            "--price",
            "5",
        ];
        args.extend_from_slice(&CARD);
        args
    }

    fn buy_ticket<'a>(date: &'a str, hour: &'a str) -> Vec<&'a str> {
        let mut args = vec!["buy-ticket", "--event-date", date, "--event-time", hour];
        args.extend_from_slice(&CARD);
        args
    }

    fn balance(dir: &TempDir, login: (&str, &str)) -> String {
        run_cli(dir, MAY_20, Some(login), &["balance"]).unwrap()
    }

    fn open_session(dir: &TempDir) -> Session {
        Session::open(SessionConfig {
            data_dir: dir.path().to_path_buf(),
            now: TimeValue::parse(MAY_20.0, MAY_20.1).unwrap(),
            manager: None,
        })
        .unwrap()
    }

    #[test]
    fn test_resident_two_hour_event_costs_thirty() {
        let dir = data_dir("community");

        let output = run_cli(
            &dir,
            MAY_20,
            Some(ALICE),
            &request_event("05/30/2024", "14", "2", "meeting"),
        )
        .unwrap();
        assert_eq!(
            output,
            "Reservation request #1 submitted: Public event on 05/30/2024 at 14:00 for 2 hours, \
             with layout meeting. Charged $30.\n"
        );

        assert_eq!(balance(&dir, MANAGER), "Balance: $30\nBooked hours: 0\n");
        assert_eq!(balance(&dir, ALICE), "Balance: $0\nBooked hours: 2\n");
    }

    #[test]
    fn test_organization_overbooked_at_thirty_five_plus_two() {
        let dir = data_dir("community");

        for date in ["06/01/2024", "06/02/2024"] {
            run_cli(&dir, MAY_20, Some(ACME), &request_event(date, "8", "15", "meeting")).unwrap();
        }
        run_cli(
            &dir,
            MAY_20,
            Some(ACME),
            &request_event("06/03/2024", "8", "5", "lecture"),
        )
        .unwrap();
        assert_eq!(balance(&dir, ACME), "Balance: $0\nBooked hours: 35\n");

        let result = run_cli(
            &dir,
            MAY_20,
            Some(ACME),
            &request_event("06/04/2024", "8", "2", "meeting"),
        );
        assert_eq!(
            result,
            Err(BookingError::Overbooked {
                username: "acme".to_string(),
                booked: 35,
                requested: 2,
                cap: 36,
            })
        );

        // One more hour still fits under the cap
        run_cli(
            &dir,
            MAY_20,
            Some(ACME),
            &request_event("06/04/2024", "8", "1", "meeting"),
        )
        .unwrap();
        assert_eq!(balance(&dir, ACME), "Balance: $0\nBooked hours: 36\n");
    }

    #[rstest]
    #[case::more_than_a_week(("05/20/2024", "9"), "$40", "Balance: $40\n", "Balance: $50\n")]
    #[case::more_than_a_day(("05/29/2024", "9"), "$39.60", "Balance: $39.60\n", "Balance: $50.40\n")]
    #[case::same_day(("05/30/2024", "8"), "$0", "Balance: $0\n", "Balance: $90\n")]
    fn test_cancellation_refund_schedule(
        #[case] now: (&str, &str),
        #[case] refund: &str,
        #[case] organizer_balance: &str,
        #[case] manager_balance: &str,
    ) {
        let dir = data_dir("booked");

        let output = run_cli(
            &dir,
            now,
            Some(ACME),
            &["cancel-event", "--event-date", "05/30/2024", "--event-time", "14"],
        )
        .unwrap();
        assert_eq!(
            output,
            format!(
                "Event cancelled. Refunded {} to you and 1 ticket holder(s).\n",
                refund
            )
        );

        assert!(balance(&dir, ACME).starts_with(organizer_balance));
        assert!(balance(&dir, MANAGER).starts_with(manager_balance));
        assert_eq!(balance(&dir, BOB), "Balance: $5\nBooked hours: 0\n");
        assert_eq!(
            run_cli(&dir, now, None, &["schedule"]).unwrap(),
            "No upcoming events.\n"
        );
    }

    #[test]
    fn test_only_organizer_may_cancel() {
        let dir = data_dir("booked");

        let result = run_cli(
            &dir,
            MAY_20,
            Some(ALICE),
            &["cancel-event", "--event-date", "05/30/2024", "--event-time", "14"],
        );
        assert_eq!(
            result,
            Err(BookingError::NotOrganizer {
                username: "alice".to_string(),
                event_id: 1,
            })
        );
    }

    #[test]
    fn test_cancel_after_event_started_is_rejected() {
        let dir = data_dir("booked");

        let result = run_cli(
            &dir,
            ("05/30/2024", "15"),
            Some(ACME),
            &["cancel-event", "--event-date", "05/30/2024", "--event-time", "14"],
        );
        assert!(matches!(result, Err(BookingError::EventInPast { .. })));
    }

    /// A data directory with a sold-out event and two citizens without tickets
    fn sold_out_dir() -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");

        let mut users = String::from(
            "FACILITY_MANAGER,BradStevens,admin\n\
             CLIENT,acme,pw,ORGANIZATION\n\
             CITIZEN,dave,pw,RESIDENT\n\
             CITIZEN,carol,pw,NON_RESIDENT\n",
        );
        let holders: Vec<String> = (1..=40).map(|i| format!("c{}", i)).collect();
        for holder in &holders {
            users.push_str(&format!("CITIZEN,{},pw,RESIDENT\n", holder));
        }
        fs::write(dir.path().join("users.csv"), users).unwrap();

        fs::write(
            dir.path().join("confirmed_events.csv"),
            format!(
                "DATE,TIME,LAYOUT,GUEST_TYPE,IS_PUBLIC,PRICE,DURATION,PAYMENT_AMOUNT,CC,CVV,EXPIRY,ORGANIZER,TICKETS,WAITLIST\n\
                 05/30/2024,14:00,MEETING,BOTH,public,5,2,50,4111111111111111,123,06/24,acme,{},\n",
                holders.join(";")
            ),
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_waitlist_is_first_in_first_out() {
        let dir = sold_out_dir();

        let output = run_cli(&dir, MAY_20, Some(DAVE), &buy_ticket("05/30/2024", "14")).unwrap();
        assert_eq!(output, "Event is sold out. You are #1 on the waitlist.\n");
        let output = run_cli(&dir, MAY_20, Some(CAROL), &buy_ticket("05/30/2024", "14")).unwrap();
        assert_eq!(output, "Event is sold out. You are #2 on the waitlist.\n");

        // Waitlisted citizens are not charged and hold no ticket
        assert_eq!(balance(&dir, MANAGER), "Balance: $0\nBooked hours: 0\n");
        assert_eq!(
            run_cli(&dir, MAY_20, Some(DAVE), &["my-tickets"]).unwrap(),
            "No tickets.\n"
        );

        let saved = fs::read_to_string(dir.path().join("confirmed_events.csv")).unwrap();
        assert!(saved.contains(",dave;carol"));

        let output = run_cli(
            &dir,
            MAY_20,
            Some(("c1", "pw")),
            &["refund-ticket", "--event-date", "05/30/2024", "--event-time", "14"],
        )
        .unwrap();
        assert_eq!(
            output,
            "Ticket refunded: $5.\ndave was moved off the waitlist.\n"
        );
        assert_eq!(
            run_cli(&dir, MAY_20, Some(DAVE), &["my-tickets"]).unwrap(),
            "dave's Ticket\n\
             Time: 05/30/2024 at 14:00\n\
             Event: Public event for 2 hours, with layout meeting\n\
             Cost: $5\n"
        );

        let output = run_cli(
            &dir,
            MAY_20,
            Some(("c2", "pw")),
            &["refund-ticket", "--event-date", "05/30/2024", "--event-time", "14"],
        )
        .unwrap();
        assert_eq!(
            output,
            "Ticket refunded: $5.\ncarol was moved off the waitlist.\n"
        );

        // The promoted citizens are not charged; the manager is re-credited
        assert_eq!(balance(&dir, ("c1", "pw")), "Balance: $5\nBooked hours: 0\n");
        assert_eq!(balance(&dir, MANAGER), "Balance: $0\nBooked hours: 0\n");
        assert_eq!(balance(&dir, DAVE), "Balance: $0\nBooked hours: 0\n");

        let session = open_session(&dir);
        let event = &session.facility().confirmed_events()[0];
        assert_eq!(event.tickets().len(), 40);
        assert!(event.holds_ticket("dave"));
        assert!(event.holds_ticket("carol"));
        assert_eq!(event.waitlist_len(), 0);
    }

    #[test]
    fn test_duplicate_ticket_rejected_and_nothing_saved() {
        let dir = data_dir("booked");
        let before = fs::read_to_string(dir.path().join("confirmed_events.csv")).unwrap();

        let result = run_cli(&dir, MAY_20, Some(BOB), &buy_ticket("05/30/2024", "14"));
        assert_eq!(
            result,
            Err(BookingError::DuplicateTicket {
                username: "bob".to_string(),
                event_id: 1,
            })
        );

        let after = fs::read_to_string(dir.path().join("confirmed_events.csv")).unwrap();
        assert_eq!(before, after);
        assert!(!dir.path().join("confirmed_events.csv.tmp").exists());
    }

    #[test]
    fn test_approve_then_guest_type_is_enforced() {
        let dir = data_dir("booked");

        let output = run_cli(&dir, MAY_20, Some(MANAGER), &["pending"]).unwrap();
        assert_eq!(
            output,
            "#1 Public event on 06/15/2024 at 10:00 for 3 hours, with layout lecture \
             (requested by alice, paid $40)\n"
        );

        let output = run_cli(&dir, MAY_20, Some(MANAGER), &["approve", "1"]).unwrap();
        assert_eq!(output, "Approved request #1 as event #2.\n");
        assert_eq!(
            run_cli(&dir, MAY_20, Some(MANAGER), &["pending"]).unwrap(),
            "No pending requests.\n"
        );

        let result = run_cli(&dir, MAY_20, Some(CAROL), &buy_ticket("06/15/2024", "10"));
        assert!(matches!(
            result,
            Err(BookingError::GuestTypeMismatch { .. })
        ));

        let output = run_cli(&dir, MAY_20, Some(BOB), &buy_ticket("06/15/2024", "10")).unwrap();
        assert_eq!(
            output,
            "bob's Ticket\n\
             Time: 06/15/2024 at 10:00\n\
             Event: Public event for 3 hours, with layout lecture\n\
             Cost: $0\n"
        );
    }

    #[test]
    fn test_only_manager_may_approve() {
        let dir = data_dir("booked");

        let result = run_cli(&dir, MAY_20, Some(ALICE), &["approve", "1"]);
        assert!(matches!(
            result,
            Err(BookingError::RoleNotPermitted { .. })
        ));
        assert_eq!(
            run_cli(&dir, MAY_20, Some(ALICE), &["pending"]).unwrap(),
            "#1 Public event on 06/15/2024 at 10:00 for 3 hours, with layout lecture \
             (requested by alice, paid $40)\n"
        );
    }

    #[test]
    fn test_reject_refunds_and_releases_hours() {
        let dir = data_dir("booked");
        assert_eq!(balance(&dir, ALICE), "Balance: $0\nBooked hours: 3\n");

        let output = run_cli(&dir, MAY_20, Some(MANAGER), &["reject", "1"]).unwrap();
        assert_eq!(output, "Rejected request #1. Refunded $40.\n");

        assert_eq!(balance(&dir, ALICE), "Balance: $40\nBooked hours: 0\n");
        assert_eq!(balance(&dir, MANAGER), "Balance: $55\nBooked hours: 0\n");
        assert!(matches!(
            run_cli(&dir, MAY_20, Some(MANAGER), &["reject", "1"]),
            Err(BookingError::RequestNotFound { request: 1 })
        ));
    }

    #[test]
    fn test_schedule_lists_from_today_onwards() {
        let dir = data_dir("booked");

        let output = run_cli(&dir, MAY_20, None, &["schedule"]).unwrap();
        assert_eq!(
            output,
            "Public event on 05/30/2024 at 14:00 for 2 hours, with layout meeting, price per ticket: $5\n\
             - Organizer: acme\n\
             - Attendees: bob\n"
        );

        // Events earlier on the same day are still listed
        let output = run_cli(&dir, ("05/30/2024", "20"), None, &["schedule"]).unwrap();
        assert!(output.starts_with("Public event on 05/30/2024"));

        let output = run_cli(&dir, ("05/31/2024", "8"), None, &["schedule"]).unwrap();
        assert_eq!(output, "No upcoming events.\n");
    }

    #[test]
    fn test_slot_collision_with_confirmed_event() {
        let dir = data_dir("booked");

        let result = run_cli(
            &dir,
            MAY_20,
            Some(ALICE),
            &request_event("05/30/2024", "14", "1", "lecture"),
        );
        assert!(matches!(result, Err(BookingError::SlotTaken { .. })));

        // A different hour on the same day is free
        run_cli(
            &dir,
            MAY_20,
            Some(ALICE),
            &request_event("05/30/2024", "16", "1", "lecture"),
        )
        .unwrap();
    }

    #[test]
    fn test_client_cannot_book_wedding() {
        let dir = data_dir("community");

        let result = run_cli(
            &dir,
            MAY_20,
            Some(ACME),
            &request_event("05/30/2024", "14", "2", "wedding"),
        );
        assert_eq!(
            result,
            Err(BookingError::LayoutNotPermitted {
                username: "acme".to_string(),
                layout: Layout::Wedding,
            })
        );
        assert_eq!(balance(&dir, MANAGER), "Balance: $0\nBooked hours: 0\n");
    }

    #[rstest]
    #[case::before_opening("7", "1")]
    #[case::past_closing("20", "4")]
    #[case::zero_hours("14", "0")]
    fn test_bad_booking_times_rejected(#[case] hour: &str, #[case] duration: &str) {
        let dir = data_dir("community");

        let result = run_cli(
            &dir,
            MAY_20,
            Some(ALICE),
            &request_event("05/30/2024", hour, duration, "meeting"),
        );
        assert!(matches!(
            result,
            Err(BookingError::OutsideOperatingHours { .. }) | Err(BookingError::InvalidDuration { .. })
        ));
        assert!(!dir.path().join("pending_events.csv").exists());
    }

    #[test]
    fn test_register_then_login() {
        let dir = data_dir("community");

        let output = run_cli(
            &dir,
            MAY_20,
            None,
            &["register", "erin", "hunter2", "--kind", "non-resident"],
        )
        .unwrap();
        assert_eq!(output, "Registered erin (non-resident citizen).\n");

        assert_eq!(
            balance(&dir, ("erin", "hunter2")),
            "Balance: $0\nBooked hours: 0\n"
        );
        assert!(matches!(
            run_cli(&dir, MAY_20, None, &["register", "erin", "x", "--kind", "city"]),
            Err(BookingError::DuplicateUser { .. })
        ));
    }

    #[rstest]
    #[case::list_separator("erin;bob")]
    #[case::leading_space(" erin")]
    #[case::trailing_space("erin ")]
    fn test_register_rejects_malformed_username(#[case] username: &str) {
        let dir = data_dir("community");
        let before = fs::read_to_string(dir.path().join("users.csv")).unwrap();

        let result = run_cli(
            &dir,
            MAY_20,
            None,
            &["register", username, "pw", "--kind", "resident"],
        );
        assert_eq!(
            result,
            Err(BookingError::InvalidUsername {
                username: username.to_string()
            })
        );

        let after = fs::read_to_string(dir.path().join("users.csv")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_two_events_on_same_date_are_managed_independently() {
        let dir = data_dir("community");
        let nine = TimeValue::parse("06/05/2024", "9").unwrap();

        for (login, hour, layout) in [
            (ALICE, "9", "meeting"),
            (CAROL, "9", "lecture"),
            (ACME, "14", "meeting"),
        ] {
            run_cli(
                &dir,
                MAY_20,
                Some(login),
                &request_event("06/05/2024", hour, "2", layout),
            )
            .unwrap();
        }

        assert_eq!(
            run_cli(&dir, MAY_20, Some(MANAGER), &["approve", "1"]).unwrap(),
            "Approved request #1 as event #1.\n"
        );
        // Another layout does not make the same hour a different slot
        assert_eq!(
            run_cli(&dir, MAY_20, Some(MANAGER), &["approve", "2"]),
            Err(BookingError::SlotTaken { when: nine })
        );
        assert_eq!(
            run_cli(&dir, MAY_20, Some(MANAGER), &["approve", "3"]).unwrap(),
            "Approved request #3 as event #2.\n"
        );

        assert_eq!(
            run_cli(&dir, MAY_20, Some(BOB), &buy_ticket("06/05/2024", "14")).unwrap(),
            "bob's Ticket\n\
             Time: 06/05/2024 at 14:00\n\
             Event: Public event for 2 hours, with layout meeting\n\
             Cost: $5\n"
        );
        run_cli(&dir, MAY_20, Some(DAVE), &buy_ticket("06/05/2024", "9")).unwrap();

        let output = run_cli(
            &dir,
            MAY_20,
            Some(ACME),
            &["cancel-event", "--event-date", "06/05/2024", "--event-time", "14"],
        )
        .unwrap();
        assert!(output.ends_with("to you and 1 ticket holder(s).\n"));

        // Cancelling the afternoon event leaves the morning one and its ticket
        let schedule = run_cli(&dir, MAY_20, None, &["schedule"]).unwrap();
        assert!(schedule.contains("06/05/2024 at 09:00"));
        assert!(!schedule.contains("at 14:00"));
        assert!(run_cli(&dir, MAY_20, Some(DAVE), &["my-tickets"])
            .unwrap()
            .contains("Time: 06/05/2024 at 09:00"));

        let output = run_cli(
            &dir,
            MAY_20,
            Some(ALICE),
            &["cancel-event", "--event-date", "06/05/2024", "--event-time", "9"],
        )
        .unwrap();
        assert!(output.ends_with("to you and 1 ticket holder(s).\n"));

        // The request that lost the hour is still pending and can be refunded
        assert_eq!(
            run_cli(&dir, MAY_20, Some(CAROL), &["my-events"]).unwrap(),
            "Pending #2: Public event on 06/05/2024 at 09:00 for 2 hours, with layout lecture\n"
        );
        assert!(run_cli(&dir, MAY_20, Some(MANAGER), &["reject", "2"])
            .unwrap()
            .starts_with("Rejected request #2."));
    }

    #[test]
    fn test_claim_balance_pays_out_once() {
        let dir = data_dir("booked");

        assert_eq!(
            run_cli(&dir, MAY_20, Some(MANAGER), &["claim-balance"]).unwrap(),
            "Claimed $95.\n"
        );
        assert_eq!(
            run_cli(&dir, MAY_20, Some(MANAGER), &["claim-balance"]).unwrap(),
            "Claimed $0.\n"
        );
    }

    #[test]
    fn test_my_events_lists_confirmed_and_pending() {
        let dir = data_dir("booked");

        let output = run_cli(&dir, MAY_20, Some(ALICE), &["my-events"]).unwrap();
        assert_eq!(
            output,
            "Pending #1: Public event on 06/15/2024 at 10:00 for 3 hours, with layout lecture\n"
        );

        let output = run_cli(&dir, MAY_20, Some(ACME), &["my-events"]).unwrap();
        assert!(output.starts_with("Public event on 05/30/2024 at 14:00"));

        let output = run_cli(&dir, MAY_20, Some(DAVE), &["my-events"]).unwrap();
        assert_eq!(output, "No events.\n");
    }

    #[test]
    fn test_state_survives_save_and_load() {
        let dir = data_dir("community");

        run_cli(
            &dir,
            MAY_20,
            Some(ALICE),
            &request_event("05/30/2024", "14", "2", "meeting"),
        )
        .unwrap();
        run_cli(&dir, MAY_20, Some(MANAGER), &["approve", "1"]).unwrap();
        run_cli(&dir, MAY_20, Some(BOB), &buy_ticket("05/30/2024", "14")).unwrap();
        run_cli(
            &dir,
            MAY_20,
            Some(ACME),
            &request_event("06/01/2024", "10", "4", "lecture"),
        )
        .unwrap();

        let session = open_session(&dir);
        let facility = session.facility();

        assert_eq!(facility.confirmed_events().len(), 1);
        let event = &facility.confirmed_events()[0];
        assert_eq!(event.organizer, "alice");
        assert_eq!(event.layout, Layout::Meeting);
        assert!(event.holds_ticket("bob"));

        assert_eq!(facility.pending_requests().len(), 1);
        assert_eq!(facility.pending_requests()[0].requester, "acme");

        let users = facility.users();
        assert_eq!(users.get("alice").unwrap().booked_hours(), 2);
        assert_eq!(users.get("acme").unwrap().booked_hours(), 4);
        // 30 from alice, 5 from bob's ticket, 90 from acme
        assert_eq!(
            users.get("BradStevens").unwrap().balance().to_string(),
            "125"
        );
    }

    #[test]
    fn test_missing_login_is_rejected() {
        let dir = data_dir("community");

        assert_eq!(
            run_cli(&dir, MAY_20, None, &["balance"]),
            Err(BookingError::NotLoggedIn)
        );
        assert!(matches!(
            run_cli(&dir, MAY_20, Some(("alice", "wrong")), &["balance"]),
            Err(BookingError::InvalidCredentials { .. })
        ));
    }
}
