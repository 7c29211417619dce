use chrono::NaiveDate;
use rand::Rng;

pub const DEFAULT_PREFIX: &str = "INV";
const SUFFIXES: u16 = 10_000;
const RANDOM_ATTEMPTS: usize = 32;

fn normalize_prefix(prefix: &str) -> String {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        DEFAULT_PREFIX.to_string()
    } else {
        prefix.to_uppercase()
    }
}

fn format_number(prefix: &str, date: NaiveDate, suffix: u16) -> String {
    format!("{}-{}-{:04}", prefix, date.format("%Y%m%d"), suffix)
}

/// `PREFIX-YYYYMMDD-RRRR`. Uniqueness is not checked; see [`unused_bill_number`].
pub fn bill_number(prefix: &str, date: NaiveDate) -> String {
    bill_number_with(&mut rand::thread_rng(), prefix, date)
}

pub fn bill_number_with<R: Rng + ?Sized>(rng: &mut R, prefix: &str, date: NaiveDate) -> String {
    format_number(&normalize_prefix(prefix), date, rng.gen_range(0..SUFFIXES))
}

/// A number for which `taken` is false
///
/// 1. a few random suffixes
/// 2. then the first free suffix in order
///
/// `None` once every suffix for the prefix and date is in use.
pub fn unused_bill_number<R: Rng + ?Sized>(
    rng: &mut R,
    prefix: &str,
    date: NaiveDate,
    taken: impl Fn(&str) -> bool,
) -> Option<String> {
    let prefix = normalize_prefix(prefix);
    (0..RANDOM_ATTEMPTS)
        .map(|_| format_number(&prefix, date, rng.gen_range(0..SUFFIXES)))
        .chain((0..SUFFIXES).map(|suffix| format_number(&prefix, date, suffix)))
        .find(|number| !taken(number))
}
