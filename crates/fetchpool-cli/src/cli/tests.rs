use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_urls_only() {
    let cli = parse(&["fetchpool", "--urls", "example.com,https://rust-lang.org"]);
    assert_eq!(cli.urls, "example.com,https://rust-lang.org");
    assert!(cli.workers.is_none());
    assert!(cli.seed.is_none());
    assert!(cli.disable_debug);
    assert!(!cli.debug_logging());
}

#[test]
fn cli_parse_all_flags() {
    let cli = parse(&[
        "fetchpool",
        "--urls",
        "a.com",
        "--workers",
        "5",
        "--timeout",
        "10",
        "--rps",
        "2",
        "--retries",
        "4",
        "--seed",
        "99",
        "--disable-debug",
        "false",
    ]);
    assert_eq!(cli.workers, Some(5));
    assert_eq!(cli.timeout, Some(10));
    assert_eq!(cli.rps, Some(2));
    assert_eq!(cli.retries, Some(4));
    assert_eq!(cli.seed, Some(99));
    assert!(cli.debug_logging());
}

#[test]
fn cli_requires_urls() {
    assert!(Cli::try_parse_from(["fetchpool"]).is_err());
}

#[test]
fn cli_rejects_negative_workers() {
    assert!(Cli::try_parse_from(["fetchpool", "--urls", "a", "--workers", "-1"]).is_err());
}
