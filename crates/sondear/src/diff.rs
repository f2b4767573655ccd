//! Line-based diff rendering for failed assertions.
//!
//! [`create_err_diff`] inspects both operands with assertion-friendly
//! options (unbounded depth and width, sorted keys, getters evaluated) and
//! renders a `+ actual` / `- expected` line diff: identical trailing lines
//! collapse, long identical stretches inside the diff collapse to `...`,
//! and lines differing only by a trailing comma count as identical.

use crate::assert::Operator;
use crate::inspect::{
    display_width, inspect_with, Compact, GetterPolicy, InspectOptions, KeySort, BLUE, GREEN, RED,
    WHITE,
};
use crate::value::Value;

/// Combined single-line width at or below which the diff collapses to
/// `actual !== expected`.
const MAX_SHORT_LENGTH: usize = 10;

/// Printed-line cap; beyond it the diff is cut off with `...` markers.
const MAX_DIFF_LINES: usize = 1000;

/// Options used to render assertion operands: exhaustive and stable rather
/// than compact.
fn diff_inspect_options() -> InspectOptions {
    InspectOptions::default()
        .with_compact(Compact::Off)
        .with_custom_inspect(false)
        .with_depth(Some(1000))
        .with_max_array_length(None)
        .with_break_length(usize::MAX)
        .with_sorted(Some(KeySort::Lexicographic))
        .with_getters(GetterPolicy::All)
}

/// Render one operand the way the diff sees it.
#[must_use]
pub fn inspect_operand(value: &Value) -> String {
    inspect_with(value, &diff_inspect_options())
}

struct Palette {
    green: &'static str,
    red: &'static str,
    blue: &'static str,
    white: &'static str,
}

impl Palette {
    fn new(colors: bool) -> Self {
        if colors {
            Self {
                green: GREEN,
                red: RED,
                blue: BLUE,
                white: WHITE,
            }
        } else {
            Self {
                green: "",
                red: "",
                blue: "",
                white: "",
            }
        }
    }
}

/// Build the failure message for an equality-family assertion.
#[must_use]
pub fn create_err_diff(actual: &Value, expected: &Value, operator: Operator) -> String {
    create_err_diff_with_colors(actual, expected, operator, false)
}

/// [`create_err_diff`] with explicit ANSI color control.
#[must_use]
pub fn create_err_diff_with_colors(
    actual: &Value,
    expected: &Value,
    operator: Operator,
    colors: bool,
) -> String {
    tracing::trace!(operator = %operator, "render assertion diff");
    let p = Palette::new(colors);
    let actual_inspected = inspect_operand(actual);
    let expected_inspected = inspect_operand(expected);
    let mut actual_lines: Vec<&str> = actual_inspected.split('\n').collect();
    let mut expected_lines: Vec<&str> = expected_inspected.split('\n').collect();

    // Reference equality is the real claim when both operands are objects.
    let operator = if operator == Operator::StrictEqual
        && actual.is_object()
        && expected.is_object()
    {
        Operator::StrictEqualObject
    } else {
        operator
    };

    let mut indicator = String::new();
    if actual_lines.len() == 1 && expected_lines.len() == 1 && actual_lines[0] != expected_lines[0]
    {
        let input_length = display_width(actual_lines[0]) + display_width(expected_lines[0]);
        if input_length <= MAX_SHORT_LENGTH {
            if !actual.is_object() && !expected.is_object() {
                return format!(
                    "{}\n\n{} !== {}\n",
                    operator.readable(),
                    actual_lines[0],
                    expected_lines[0]
                );
            }
        } else if operator != Operator::StrictEqualObject && input_length < 80 {
            // Point at the first diverging character of short one-liners.
            let common = actual_lines[0]
                .chars()
                .zip(expected_lines[0].chars())
                .take_while(|(a, b)| a == b)
                .count();
            if common > 2 {
                indicator = format!("\n  {}^", " ".repeat(common));
            }
        }
    }

    // Strip identical trailing lines, keeping at most three visible and
    // collapsing the rest to a `...` marker.
    let mut end = String::new();
    let mut other_tail = String::new();
    let mut stripped = 0usize;
    while let (Some(a), Some(b)) = (actual_lines.last(), expected_lines.last()) {
        if a != b {
            break;
        }
        if stripped < 3 {
            end = format!("\n  {a}{end}");
        } else {
            other_tail = (*a).to_owned();
        }
        stripped += 1;
        actual_lines.pop();
        expected_lines.pop();
    }

    let max_lines = actual_lines.len().max(expected_lines.len());
    if max_lines == 0 {
        // Structurally identical output: the operands differ only by
        // reference.
        let mut lines: Vec<&str> = actual_inspected.split('\n').collect();
        if lines.len() > 50 {
            lines.truncate(50);
            return format!(
                "{}\n\n{}\n{}...{}\n",
                Operator::NotIdentical.readable(),
                lines.join("\n"),
                p.blue,
                p.white
            );
        }
        return format!(
            "{}\n\n{}\n",
            Operator::NotIdentical.readable(),
            actual_inspected
        );
    }

    let mut skipped = false;
    if stripped >= 5 {
        end = format!("\n{}...{}{end}", p.blue, p.white);
        skipped = true;
    }
    if !other_tail.is_empty() {
        end = format!("\n  {other_tail}{end}");
    }

    let mut res = String::new();
    let mut other = String::new();
    let mut printed_lines = 0usize;
    let mut last_pos = 0usize;

    for i in 0..max_lines {
        let cur = i - last_pos;
        if i >= actual_lines.len() {
            // Only expected lines remain.
            if cur > 1 && i > 2 {
                if cur > 4 {
                    res.push_str(&format!("\n{}...{}", p.blue, p.white));
                    skipped = true;
                } else if cur > 3 {
                    res.push_str(&format!("\n  {}", expected_lines[i - 2]));
                    printed_lines += 1;
                }
                res.push_str(&format!("\n  {}", expected_lines[i - 1]));
                printed_lines += 1;
            }
            last_pos = i;
            other.push_str(&format!("\n{}-{} {}", p.red, p.white, expected_lines[i]));
            printed_lines += 1;
        } else if i >= expected_lines.len() {
            // Only actual lines remain.
            if cur > 1 && i > 2 {
                if cur > 4 {
                    res.push_str(&format!("\n{}...{}", p.blue, p.white));
                    skipped = true;
                } else if cur > 3 {
                    res.push_str(&format!("\n  {}", actual_lines[i - 2]));
                    printed_lines += 1;
                }
                res.push_str(&format!("\n  {}", actual_lines[i - 1]));
                printed_lines += 1;
            }
            last_pos = i;
            res.push_str(&format!("\n{}+{} {}", p.green, p.white, actual_lines[i]));
            printed_lines += 1;
        } else {
            let expected_line = expected_lines[i];
            let mut actual_line = actual_lines[i].to_owned();
            // Trailing-comma-only differences are layout artifacts, not
            // value differences.
            let mut diverging = actual_line != expected_line
                && (!actual_line.ends_with(',')
                    || actual_line[..actual_line.len() - 1] != *expected_line);
            if diverging
                && expected_line.ends_with(',')
                && expected_line[..expected_line.len() - 1] == actual_line
            {
                diverging = false;
                actual_line.push(',');
            }
            if diverging {
                if cur > 1 && i > 2 {
                    if cur > 4 {
                        res.push_str(&format!("\n{}...{}", p.blue, p.white));
                        skipped = true;
                    } else if cur > 3 {
                        res.push_str(&format!("\n  {}", actual_lines[i - 2]));
                        printed_lines += 1;
                    }
                    res.push_str(&format!("\n  {}", actual_lines[i - 1]));
                    printed_lines += 1;
                }
                last_pos = i;
                res.push_str(&format!("\n{}+{} {actual_line}", p.green, p.white));
                other.push_str(&format!("\n{}-{} {expected_line}", p.red, p.white));
                printed_lines += 2;
            } else {
                res.push_str(&other);
                other.clear();
                if cur == 1 || i == 0 {
                    res.push_str(&format!("\n  {actual_line}"));
                    printed_lines += 1;
                }
            }
        }
        if printed_lines > MAX_DIFF_LINES && i < max_lines - 2 {
            return format!(
                "{}{}\n{res}\n{}...{}{other}\n{}...{}",
                header(&p, operator),
                skipped_note(&p),
                p.blue,
                p.white,
                p.blue,
                p.white
            );
        }
    }

    format!(
        "{}{}\n{res}{other}{end}{indicator}",
        header(&p, operator),
        if skipped {
            skipped_note(&p)
        } else {
            String::new()
        }
    )
}

fn header(p: &Palette, operator: Operator) -> String {
    format!(
        "{}\n{}+ actual{} {}- expected{}",
        operator.readable(),
        p.green,
        p.white,
        p.red,
        p.white
    )
}

fn skipped_note(p: &Palette) -> String {
    format!(" {}...{} Lines skipped", p.blue, p.white)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff(actual: &Value, expected: &Value, operator: Operator) -> String {
        create_err_diff(actual, expected, operator)
    }

    #[test]
    fn test_short_primitive_diff_collapses() {
        let msg = diff(&Value::from(1), &Value::from(2), Operator::StrictEqual);
        assert_eq!(msg, "Expected values to be strictly equal:\n\n1 !== 2\n");
    }

    #[test]
    fn test_operand_rendering_preserves_element_order() {
        let value = Value::array([Value::from(3), Value::from(1), Value::from(2)]);
        assert_eq!(inspect_operand(&value), "[\n  3,\n  1,\n  2\n]");
    }

    #[test]
    fn test_element_order_divergence_is_marked() {
        let a = Value::array([Value::from(1), Value::from(2)]);
        let b = Value::array([Value::from(2), Value::from(1)]);
        let msg = diff(&a, &b, Operator::DeepStrictEqual);
        assert!(msg.contains("+ actual"), "got: {msg}");
        assert!(msg.contains("- expected"), "got: {msg}");
        assert!(!msg.contains("not reference-equal"), "got: {msg}");
    }

    #[test]
    fn test_object_diff_marks_changed_lines() {
        let actual = Value::object([("a", Value::from(1)), ("b", Value::from(2))]);
        let expected = Value::object([("a", Value::from(1)), ("b", Value::from(3))]);
        let msg = diff(&actual, &expected, Operator::DeepStrictEqual);
        assert!(msg.starts_with("Expected values to be strictly deep-equal:\n"));
        assert!(msg.contains("+ actual"), "got: {msg}");
        assert!(msg.contains("- expected"), "got: {msg}");
        assert!(msg.contains("+   b: 2"), "got: {msg}");
        assert!(msg.contains("-   b: 3"), "got: {msg}");
        assert!(msg.contains("\n    a: 1,"), "got: {msg}");
    }

    #[test]
    fn test_strict_equal_on_objects_reports_reference_equality() {
        let actual = Value::object([("a", Value::from(1))]);
        let expected = Value::object([("a", Value::from(2))]);
        let msg = diff(&actual, &expected, Operator::StrictEqual);
        assert!(
            msg.starts_with("Expected \"actual\" to be reference-equal to \"expected\":"),
            "got: {msg}"
        );
    }

    #[test]
    fn test_identical_structure_reports_not_identical() {
        let actual = Value::object([("a", Value::from(1))]);
        let expected = Value::object([("a", Value::from(1))]);
        let msg = diff(&actual, &expected, Operator::StrictEqual);
        assert!(
            msg.starts_with("Values have same structure but are not reference-equal:"),
            "got: {msg}"
        );
        assert!(msg.contains("a: 1"));
    }

    #[test]
    fn test_long_identical_tail_collapses() {
        let tail: Vec<(String, Value)> =
            (0..8).map(|i| (format!("k{i}"), Value::from(i))).collect();
        let mut actual_props = vec![("diff".to_owned(), Value::from(1))];
        actual_props.extend(tail.clone());
        let mut expected_props = vec![("diff".to_owned(), Value::from(2))];
        expected_props.extend(tail);
        let actual = Value::object(actual_props);
        let expected = Value::object(expected_props);
        let msg = diff(&actual, &expected, Operator::DeepStrictEqual);
        assert!(msg.contains("\n...\n"), "got: {msg}");
        assert!(msg.contains("+   diff: 1"), "got: {msg}");
        assert!(msg.contains("-   diff: 2"), "got: {msg}");
    }

    #[test]
    fn test_extra_actual_entries_marked_added() {
        let actual = Value::array([Value::from(1), Value::from(2), Value::from(3)]);
        let expected = Value::array([Value::from(1)]);
        let msg = diff(&actual, &expected, Operator::DeepStrictEqual);
        assert!(msg.contains("+   2"), "got: {msg}");
        assert!(msg.contains("+   3"), "got: {msg}");
        assert!(!msg.contains("-   2"), "got: {msg}");
    }

    #[test]
    fn test_trailing_comma_only_difference_is_identical() {
        let actual = Value::array([Value::from(1), Value::from(2)]);
        let expected = Value::array([Value::from(1), Value::from(2), Value::from(3)]);
        let msg = diff(&actual, &expected, Operator::DeepStrictEqual);
        // "1," matches "1," and "2" matches "2," up to the comma.
        assert!(!msg.contains("+   1"), "got: {msg}");
        assert!(!msg.contains("+   2"), "got: {msg}");
        assert!(msg.contains("-   3"), "got: {msg}");
    }

    #[test]
    fn test_divergence_indicator_for_one_liners() {
        let msg = diff(
            &Value::from("hello world"),
            &Value::from("hello there"),
            Operator::StrictEqual,
        );
        assert!(msg.contains("^"), "got: {msg}");
    }

    #[test]
    fn test_diff_keys_are_sorted() {
        let actual = Value::object([("b", Value::from(1)), ("a", Value::from(2))]);
        let expected = Value::object([("a", Value::from(2)), ("b", Value::from(9))]);
        let msg = diff(&actual, &expected, Operator::DeepStrictEqual);
        let a_pos = msg.find("a: 2").unwrap();
        let b_pos = msg.find("b: 1").unwrap();
        assert!(a_pos < b_pos, "got: {msg}");
    }
}
