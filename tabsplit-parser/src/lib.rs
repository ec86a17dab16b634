#![warn(clippy::uninlined_format_args)]

//! Tokenizer for free-form receipt text of the shape
//! "Alice and Bob 12.50, Carol 8": repeated name-phrase / number-run pairs
//! with arbitrary prose in between.

use std::str::FromStr;

use nom::{bytes::complete::take_while1, combinator::map_opt, IResult, Parser};
use rust_decimal::Decimal;

/// One matched group: the people named in the phrase and the amounts that
/// follow them. The group total is shared by everyone named.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimGroup<'a> {
    pub names: Vec<&'a str>,
    pub amounts: Vec<Decimal>,
}

impl ClaimGroup<'_> {
    pub fn amount(&self) -> Decimal {
        self.amounts.iter().copied().sum()
    }
}

/// A run of alphabetic tokens with space/colon/comma separators.
fn name_phrase(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphabetic() || matches!(c, ' ' | ',' | ':'))(input)
}

/// A run of decimal numbers separated by comma or space.
fn number_run(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_digit() || matches!(c, '.' | ',' | ' '))(input)
}

/// Splits a name phrase into person tokens. "and" joins people rather than
/// naming one, so it is dropped as a standalone word.
fn split_names(phrase: &str) -> impl Iterator<Item = &str> {
    phrase
        .split([' ', ',', ':'])
        .filter(|token| !token.is_empty())
        .filter(|token| !token.eq_ignore_ascii_case("and"))
}

/// Splits a number run on any non-digit-non-dot character; tokens that fail
/// to parse as decimals are dropped.
fn split_amounts(run: &str) -> Vec<Decimal> {
    run.split(|c: char| !c.is_ascii_digit() && c != '.')
        .filter(|token| !token.is_empty())
        .filter_map(|token| Decimal::from_str(token).ok())
        .collect()
}

fn claim_group(input: &str) -> IResult<&str, ClaimGroup<'_>> {
    map_opt((name_phrase, number_run), |(phrase, run)| {
        let names: Vec<&str> = split_names(phrase).collect();
        if names.is_empty() {
            return None;
        }
        if !run.bytes().any(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(ClaimGroup {
            names,
            amounts: split_amounts(run),
        })
    })
    .parse(input)
}

/// Scans the whole input for claim groups, skipping anything that is not
/// part of one. Empty or non-matching text yields no groups; validation of
/// an empty result belongs downstream.
pub fn parse_claims(input: &str) -> Vec<ClaimGroup<'_>> {
    let mut groups = Vec::new();
    let mut rest = input;

    while let Some(start) = rest.find(|c: char| c.is_ascii_alphabetic()) {
        rest = &rest[start..];
        match claim_group(rest) {
            Ok((remaining, group)) => {
                groups.push(group);
                rest = remaining;
            }
            Err(_) => {
                // No amount follows this phrase; resume one character later,
                // the way a scanning matcher would.
                let mut chars = rest.chars();
                chars.next();
                rest = chars.as_str();
            }
        }
    }

    groups
}
