mod common;

use std::{
    fs,
    io::{BufRead, BufReader, Read, Write},
    net::TcpListener,
    thread,
};

use bizbalance_config::Config;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

use common::{script_shell, state_file, test_home, write_config};

#[test]
fn edits_persist_across_runs() {
    let home = test_home();

    script_shell(&home)
        .write_stdin("add ar Acme 1250\nadd ap Supplier 300\nset bank 1 amount 500\nexit\n")
        .assert()
        .success()
        .stdout(contains("Added entry #1 to Accounts Receivable"));

    let stored = fs::read_to_string(state_file(&home)).expect("state written");
    assert!(stored.contains("\"accountsReceivable\""));
    assert!(stored.contains("\"bankName\""));
    assert!(stored.contains("Acme"));

    script_shell(&home)
        .write_stdin("summary\n")
        .assert()
        .success()
        .stdout(contains("$1,250.00"))
        .stdout(contains("(AR - AP) + (B - C) = $1,450.00"))
        .stdout(contains("Bank 1"));
}

#[test]
fn strict_formula_subtracts_net_bank() {
    let home = test_home();

    script_shell(&home)
        .write_stdin("add ar Client 100\nset bank 1 amount 40\nformula strict\nsummary\n")
        .assert()
        .success()
        .stdout(contains("Formula set to strict."))
        .stdout(contains("(AR - AP) - (B - C) = $60.00"));
}

#[test]
fn formula_without_argument_toggles() {
    let home = test_home();

    script_shell(&home)
        .write_stdin("formula\nformula\n")
        .assert()
        .success()
        .stdout(contains("Formula set to strict."))
        .stdout(contains("Formula set to standard."));
}

#[test]
fn malformed_amount_counts_as_zero() {
    let home = test_home();

    script_shell(&home)
        .write_stdin("add cc Visa abc\nlist cc\n")
        .assert()
        .success()
        .stdout(contains("Visa"))
        .stdout(contains("$0.00"));
}

#[test]
fn unknown_selector_warns_without_changes() {
    let home = test_home();

    script_shell(&home)
        .write_stdin("set ar 7 amount 10\nremove bank 9\n")
        .assert()
        .success()
        .stdout(contains("No entry in Accounts Receivable matches `7`."))
        .stdout(contains("No entry in Bank Accounts matches `9`."));

    assert!(!state_file(&home).exists());
}

#[test]
fn missing_api_key_shows_notice() {
    let home = test_home();

    script_shell(&home)
        .write_stdin("insight\ninsight show\n")
        .assert()
        .success()
        .stdout(contains(
            "Please set a valid API_KEY in your environment to use this feature.",
        ))
        .stdout(contains("generate a liquidity and solvency analysis"));
}

#[test]
fn insight_is_fetched_from_configured_endpoint() {
    let home = test_home();
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream);
        let mut content_length = 0usize;
        let mut head = String::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read header");
            if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap_or(0);
            }
            if line == "\r\n" {
                break;
            }
            head.push_str(&line);
        }
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).expect("read body");

        let reply = r#"{"candidates":[{"content":{"parts":[{"text":"Liquidity looks healthy."}]}}]}"#;
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
            reply.len()
        );
        reader
            .into_inner()
            .write_all(response.as_bytes())
            .expect("write response");
        (head, String::from_utf8_lossy(&body).into_owned())
    });

    let mut config = Config::default();
    config.insight_endpoint = Some(format!("http://{addr}/v1beta"));
    config.insight_timeout_secs = 5;
    write_config(&home, &config);

    script_shell(&home)
        .env("API_KEY", "test-key")
        .write_stdin("add ar Client 100\ninsight\n")
        .assert()
        .success()
        .stdout(contains("Analyzing financial data..."))
        .stdout(contains("Liquidity looks healthy."));

    let (head, body) = server.join().expect("server thread");
    assert!(head.contains("key=test-key"));
    assert!(body.contains("(AR - AP) + (B - C)"));
}

#[test]
fn failed_insight_shows_apology() {
    let home = test_home();
    // Nothing listens on the discarded port, so the request fails fast.
    let addr = TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("free port");

    let mut config = Config::default();
    config.insight_endpoint = Some(format!("http://{addr}/v1beta"));
    config.insight_timeout_secs = 2;
    write_config(&home, &config);

    script_shell(&home)
        .env("API_KEY", "test-key")
        .write_stdin("insight\n")
        .assert()
        .success()
        .stdout(contains(
            "Unable to generate insights at this time. Please try again later.",
        ));
}

#[test]
fn unknown_command_suggests_closest() {
    let home = test_home();

    script_shell(&home)
        .write_stdin("sumary\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `sumary`"))
        .stdout(contains("Suggestion: `summary`?"));
}

#[test]
fn reset_and_restore_backup() {
    let home = test_home();

    script_shell(&home)
        .write_stdin("add ar First 10\nadd ar Second 20\nreset\nlist ar\n")
        .assert()
        .success()
        .stdout(contains("Dashboard reset to the default state."))
        .stdout(contains("(empty)"));

    script_shell(&home)
        .write_stdin("backup list\nbackup restore 1\nlist ar\n")
        .assert()
        .success()
        .stdout(contains("Restored backup"))
        .stdout(contains("Second"));
}

#[test]
fn corrupt_state_falls_back_to_defaults() {
    let home = test_home();
    let path = state_file(&home);
    fs::create_dir_all(path.parent().expect("state dir")).expect("mkdir");
    fs::write(&path, "{ not json").expect("write garbage");

    script_shell(&home)
        .write_stdin("list bank\n")
        .assert()
        .success()
        .stdout(contains("Main"))
        .stdout(contains("Savings"))
        .stdout(contains("Checking"));
}

#[test]
fn config_set_changes_currency_display() {
    let home = test_home();

    script_shell(&home)
        .write_stdin("config set currency eur\nconfig show\n")
        .assert()
        .success()
        .stdout(contains("currency updated."))
        .stdout(contains("EUR"));

    script_shell(&home)
        .write_stdin("config set default_formula sideways\n")
        .assert()
        .success()
        .stdout(contains("ERROR:"));
}

#[test]
fn help_lists_commands_and_exit_stops_reading() {
    let home = test_home();

    script_shell(&home)
        .write_stdin("help\nquit\nadd ar Ignored 5\n")
        .assert()
        .success()
        .stdout(contains("Available commands"))
        .stdout(contains("insight"))
        .stdout(contains("Added entry").not());
}
