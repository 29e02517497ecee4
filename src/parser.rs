//! This module provides the parser for turmite presets, utilizing the `pest` crate.
//! It defines the grammar for `.ant` files and functions to parse the input into a `Preset` struct.

use crate::{
    analyzer::analyze,
    types::{Heading, Pose, Preset, TurmiteError, DEFAULT_GRID_SIZE},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::HashSet;
use std::str::FromStr;

/// Derives a `PestParser` for the preset grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct PresetParser;

/// Parses the given input string into a `Preset` struct.
///
/// This is the main entry point for parsing preset definitions. The input is
/// trimmed, parsed with `PresetParser`, converted into a `Preset` and then
/// validated with `analyze`.
///
/// # Returns
///
/// * `Ok(Preset)` if the input is successfully parsed and validated.
/// * `Err(TurmiteError::ParseError)` if there are any syntax errors.
/// * `Err(TurmiteError::ValidationError)` if the preset fails validation.
pub fn parse(input: &str) -> Result<Preset, TurmiteError> {
    let root = PresetParser::parse(Rule::preset, input.trim())
        .map_err(|e| TurmiteError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| TurmiteError::ValidationError("Empty preset".to_string()))?;

    let preset = parse_preset(root)?;

    analyze(&preset)?;

    Ok(preset)
}

/// Parses the top-level sections of a preset from a `Pair<Rule::preset>`.
fn parse_preset(pair: Pair<Rule>) -> Result<Preset, TurmiteError> {
    let mut name: Option<String> = None;
    let mut size: Option<usize> = None;
    let mut rule: Option<String> = None;
    let mut start: Option<Pose> = None;
    let mut seen = HashSet::new();

    for p in pair.into_inner() {
        let span = p.as_span();
        let kind = p.as_rule();

        check_unique_section(kind, span, &mut seen)?;

        match kind {
            Rule::name => name = Some(inner(p)?.as_str().trim().to_string()),
            Rule::size => size = Some(parse_number(inner(p)?)?),
            Rule::rule => rule = Some(inner(p)?.as_str().to_string()),
            Rule::start => start = Some(parse_start(p)?),
            _ => {} // EOI
        }
    }

    Ok(Preset {
        name: check_required_section(name, "name")?,
        size: size.unwrap_or(DEFAULT_GRID_SIZE),
        rule: check_required_section(rule, "rule")?,
        start,
    })
}

/// Parses `start: x, y, heading` into a `Pose`.
fn parse_start(pair: Pair<Rule>) -> Result<Pose, TurmiteError> {
    let span = pair.as_span();
    let mut parts = pair.into_inner();

    let (Some(x), Some(y), Some(heading)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(parse_error("Expected 'start: x, y, heading'", span));
    };

    let heading = Heading::from_name(heading.as_str()).ok_or_else(|| {
        parse_error(
            &format!("Unknown heading '{}'", heading.as_str()),
            heading.as_span(),
        )
    })?;

    Ok(Pose::new(parse_number(x)?, parse_number(y)?, heading))
}

/// Parses a `number` pair, reporting overflow against its span.
fn parse_number<T: FromStr>(pair: Pair<Rule>) -> Result<T, TurmiteError> {
    pair.as_str()
        .parse::<T>()
        .map_err(|_| parse_error(&format!("Number out of range: {}", pair.as_str()), pair.as_span()))
}

/// Returns the single inner pair of a section.
fn inner(pair: Pair<Rule>) -> Result<Pair<Rule>, TurmiteError> {
    let span = pair.as_span();
    pair.into_inner()
        .next()
        .ok_or_else(|| parse_error("Missing value", span))
}

/// Creates a `TurmiteError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TurmiteError {
    TurmiteError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Checks if a section has already been declared.
fn check_unique_section(
    kind: Rule,
    span: Span,
    seen: &mut HashSet<Rule>,
) -> Result<(), TurmiteError> {
    if !matches!(kind, Rule::name | Rule::size | Rule::rule | Rule::start) {
        return Ok(());
    }

    if !seen.insert(kind) {
        return Err(parse_error(
            &format!("Duplicate \"{kind:?}:\" declaration"),
            span,
        ));
    }

    Ok(())
}

/// Checks if a required section is present, returning an `Err` if it's missing.
fn check_required_section<T>(value: Option<T>, name: &str) -> Result<T, TurmiteError> {
    value.ok_or_else(|| TurmiteError::ValidationError(format!("Missing '{name}' section")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_preset() {
        let input = r#"
name: Langton's Ant
size: 101
rule: RL
"#;
        let preset = parse(input).unwrap();

        assert_eq!(preset.name, "Langton's Ant");
        assert_eq!(preset.size, 101);
        assert_eq!(preset.rule, "RL");
        assert_eq!(preset.start, None);
    }

    #[test]
    fn test_parse_with_start_and_comments() {
        let input = r#"
# A corner start
name: Corner   # trailing comment
size: 9
rule: LLRR

start: 0, 8, up
"#;
        let preset = parse(input).unwrap();

        assert_eq!(preset.name, "Corner");
        assert_eq!(preset.rule, "LLRR");
        assert_eq!(preset.start, Some(Pose::new(0, 8, Heading::Up)));
    }

    #[test]
    fn test_parse_with_default_size() {
        let input = "name: Default\nrule: RLR";
        let preset = parse(input).unwrap();

        assert_eq!(preset.size, DEFAULT_GRID_SIZE);
    }

    #[test]
    fn test_parse_sections_in_any_order() {
        let input = "rule: RL\nsize: 5\nname: Reordered";
        let preset = parse(input).unwrap();

        assert_eq!(preset.name, "Reordered");
        assert_eq!(preset.size, 5);
    }

    #[test]
    fn test_parse_duplicate_section() {
        let input = r#"
name: Twice
rule: RL
rule: LR
"#;
        let error = parse(input).unwrap_err();

        assert!(matches!(error, TurmiteError::ParseError(_)));
        assert!(error.to_string().contains("Duplicate \"rule:\" declaration"));
    }

    #[test]
    fn test_parse_missing_name() {
        let error = parse("size: 5\nrule: RL").unwrap_err();

        assert_eq!(
            error.to_string(),
            "Preset validation error: Missing 'name' section"
        );
    }

    #[test]
    fn test_parse_missing_rule() {
        let error = parse("name: No Rule\nsize: 5").unwrap_err();

        assert_eq!(
            error.to_string(),
            "Preset validation error: Missing 'rule' section"
        );
    }

    #[test]
    fn test_parse_unknown_heading() {
        let input = "name: Bad\nrule: RL\nstart: 1, 1, north";
        let error = parse(input).unwrap_err();

        assert!(matches!(error, TurmiteError::ParseError(_)));
    }

    #[test]
    fn test_parse_invalid_size() {
        let error = parse("name: Bad\nsize: ten\nrule: RL").unwrap_err();
        assert!(matches!(error, TurmiteError::ParseError(_)));

        let error = parse("name: Bad\nsize: 99999999999999999999999\nrule: RL").unwrap_err();
        assert!(matches!(error, TurmiteError::ParseError(_)));
        assert!(error.to_string().contains("Number out of range"));
    }

    #[test]
    fn test_parse_rejects_zero_size() {
        let error = parse("name: Empty\nsize: 0\nrule: RL").unwrap_err();

        assert!(matches!(error, TurmiteError::ValidationError(_)));
    }

    #[test]
    fn test_parse_rejects_start_outside_grid() {
        let error = parse("name: Outside\nsize: 5\nrule: RL\nstart: 5, 0, up").unwrap_err();

        assert!(matches!(error, TurmiteError::ValidationError(_)));
        assert!(error.to_string().contains("outside"));
    }

    #[test]
    fn test_parse_unknown_section() {
        let error = parse("name: Odd\nrule: RL\nspeed: 3").unwrap_err();

        assert!(matches!(error, TurmiteError::ParseError(_)));
    }
}
