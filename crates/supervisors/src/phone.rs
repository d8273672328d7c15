//! Phone number shape check
//!
//! Accepted shape, left to right:
//!
//! - any number of prefix groups, each optionally followed by one space or
//!   dash: `+` and 1–4 digits from 1–9, or 2–3 digits in parentheses, or
//!   2–4 bare digits
//! - then 3–4 digits, an optional space or dash, and 3–4 digits
//!
//! So `+216 22 333 444`, `(71) 123-4567` and `22333444` pass while
//! `12345`, `+0 123 456` and `22  333 444` do not.

/// No digit group in the accepted shape is longer than this
const MAX_GROUP_DIGITS: usize = 4;

/// Whether `input` looks like a phone number.
pub fn is_valid_phone(input: &str) -> bool {
    let s = input.as_bytes();
    // accepts[pos]: the suffix starting at pos matches
    let mut accepts = vec![false; s.len() + 1];
    for pos in (0..=s.len()).rev() {
        accepts[pos] = matches_tail(&s[pos..])
            || prefix_group_ends(s, pos)
                .into_iter()
                .any(|next| accepts[next]);
    }
    accepts[0]
}

/// `[0-9]{3,4}[ -]?[0-9]{3,4}` anchored at both ends
fn matches_tail(t: &[u8]) -> bool {
    let first = leading_digits(t, |b| b.is_ascii_digit());
    (3..=first.min(4)).any(|a| {
        let rest = &t[a..];
        let rest = match rest.first() {
            Some(b' ') | Some(b'-') => &rest[1..],
            _ => rest,
        };
        (3..=4).contains(&rest.len()) && rest.iter().all(u8::is_ascii_digit)
    })
}

/// End positions of every prefix group that can start at `pos`
fn prefix_group_ends(s: &[u8], pos: usize) -> Vec<usize> {
    let t = &s[pos..];
    let mut ends = Vec::new();

    match t.first() {
        Some(b'+') => {
            let n = leading_digits(&t[1..], |b| (b'1'..=b'9').contains(&b));
            for k in 1..=n.min(4) {
                ends.push(1 + k);
            }
        }
        Some(b'(') => {
            let n = leading_digits(&t[1..], |b| b.is_ascii_digit());
            for k in 2..=n.min(3) {
                if t.get(1 + k) == Some(&b')') {
                    ends.push(2 + k);
                }
            }
        }
        _ => {
            let n = leading_digits(t, |b| b.is_ascii_digit());
            for k in 2..=n.min(4) {
                ends.push(k);
            }
        }
    }

    let mut with_sep = Vec::with_capacity(ends.len() * 2);
    for end in ends {
        with_sep.push(pos + end);
        if matches!(t.get(end), Some(b' ') | Some(b'-')) {
            with_sep.push(pos + end + 1);
        }
    }
    with_sep
}

/// Length of the leading run of accepted bytes, counted up to one past
/// the longest group so each position does constant work
fn leading_digits(t: &[u8], accept: impl Fn(u8) -> bool) -> usize {
    t.iter()
        .take(MAX_GROUP_DIGITS + 1)
        .take_while(|&&b| accept(b))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_accepts_common_formats() {
        for phone in [
            "22333444",
            "22 333 444",
            "+216 22 333 444",
            "+216-22-333-444",
            "(71) 123-4567",
            "0033 612 345 678",
            "123-4567",
            "123456",
        ] {
            assert!(is_valid_phone(phone), "{phone} should be valid");
        }
    }

    #[test]
    fn test_rejects_malformed() {
        for phone in [
            "",
            "12345",
            "phone",
            "+0 123 456",
            "22  333 444",
            "(7) 123 4567",
            "123 4567 ",
            "+216 22 333 444 x12",
        ] {
            assert!(!is_valid_phone(phone), "{phone} should be invalid");
        }
    }

    #[test]
    fn test_long_digit_run_is_linear() {
        let long = "1".repeat(200_000) + "x";
        let started = Instant::now();
        assert!(!is_valid_phone(&long));
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "took {:?}",
            started.elapsed()
        );

        assert!(is_valid_phone(&"1".repeat(200_000)));
    }

    proptest! {
        #[test]
        fn prop_plain_digit_runs_of_six_or_more_pass(digits in "[0-9]{6,20}") {
            prop_assert!(is_valid_phone(&digits));
        }

        #[test]
        fn prop_letters_never_pass(s in "[0-9 ]{0,10}[a-zA-Z][0-9 ]{0,10}") {
            prop_assert!(!is_valid_phone(&s));
        }
    }
}
