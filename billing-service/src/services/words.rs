//! English words rendering of amounts, Indian numbering convention.

const ONES: [&str; 10] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];
const TEENS: [&str; 10] = [
    "Ten",
    "Eleven",
    "Twelve",
    "Thirteen",
    "Fourteen",
    "Fifteen",
    "Sixteen",
    "Seventeen",
    "Eighteen",
    "Nineteen",
];
const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Spell out a non-negative whole amount using Hundred/Thousand/Lakh
/// groupings: 100.80 on an invoice prints as "One Hundred Rupees Only"
/// via `number_to_words(100)`.
///
/// Zero remainders produce no trailing words: 200 is exactly
/// "Two Hundred", never "Two Hundred and Zero".
pub fn number_to_words(num: u64) -> String {
    if num == 0 {
        return "Zero".to_string();
    }
    spell(num)
}

fn spell(num: u64) -> String {
    match num {
        0 => String::new(),
        1..=9 => ONES[num as usize].to_string(),
        10..=19 => TEENS[(num - 10) as usize].to_string(),
        20..=99 => join(TENS[(num / 10) as usize], num % 10),
        100..=999 => join(&format!("{} Hundred", ONES[(num / 100) as usize]), num % 100),
        1_000..=99_999 => join(&format!("{} Thousand", spell(num / 1_000)), num % 1_000),
        _ => join(&format!("{} Lakh", spell(num / 100_000)), num % 100_000),
    }
}

fn join(head: &str, remainder: u64) -> String {
    if remainder == 0 {
        head.to_string()
    } else {
        format!("{} {}", head, spell(remainder))
    }
}
