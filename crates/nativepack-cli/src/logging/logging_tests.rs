#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test_case(0, false, LevelFilter::INFO ; "default is info")]
#[test_case(1, false, LevelFilter::DEBUG ; "one v is debug")]
#[test_case(2, false, LevelFilter::TRACE ; "two v is trace")]
#[test_case(7, false, LevelFilter::TRACE ; "more v stays trace")]
#[test_case(0, true, LevelFilter::WARN ; "quiet is warn")]
#[test_case(3, true, LevelFilter::WARN ; "quiet wins over verbose")]
fn level_for___flags___select_level(verbose: u8, quiet: bool, expected: LevelFilter) {
    assert_eq!(level_for(verbose, quiet), expected);
}

#[test]
fn init_logging___repeated_calls___do_not_panic() {
    init_logging(0, false);
    init_logging(2, false);
}
