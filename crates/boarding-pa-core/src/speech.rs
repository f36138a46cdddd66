// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Text helpers that turn flight numbers, durations and clock hours into
//! phrases a TTS engine reads naturally.

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 8] = [
    "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// 0–99 in words ("forty-two"); anything larger stays as digits.
pub fn number_to_words(n: u64) -> String {
    match n {
        0..=19 => ONES[n as usize].to_string(),
        20..=99 => {
            let word = TENS[(n / 10 - 2) as usize];
            match n % 10 {
                0 => word.to_string(),
                one => format!("{}-{}", word, ONES[one as usize]),
            }
        }
        _ => n.to_string(),
    }
}

/// "1234" → "one two three four". Non-digit characters are dropped.
pub fn spaced_digits(number: &str) -> String {
    number
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| ONES[d as usize])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whole hours and minutes in words, e.g. 8100 → "two hours and fifteen minutes".
pub fn seconds_to_words(seconds: i64) -> String {
    if seconds <= 0 {
        return "zero minutes".to_string();
    }

    let hours = (seconds / 3600) as u64;
    let minutes = ((seconds % 3600) / 60) as u64;

    let mut parts = Vec::with_capacity(2);
    if hours > 0 {
        parts.push(unit(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(unit(minutes, "minute"));
    }

    if parts.is_empty() {
        "zero minutes".to_string()
    } else {
        parts.join(" and ")
    }
}

fn unit(count: u64, name: &str) -> String {
    if count == 1 {
        format!("{} {}", number_to_words(count), name)
    } else {
        format!("{} {}s", number_to_words(count), name)
    }
}

/// Greeting band for a local hour of day (0–23).
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

/// Capitalises the first letter of every word and lower-cases the rest.
/// A "word" starts after any non-alphabetic character, so "O'HARE" → "O'Hare".
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
