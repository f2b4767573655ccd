//! Bounded, human-readable rendering of dynamic values.
//!
//! [`inspect`] serializes an arbitrary value graph into diagnostic text
//! within configurable budgets: recursion depth, collection length, string
//! length, and soft line width. Cyclic graphs render `[Circular *n]`
//! back-references, oversized output collapses to `[ConstructorName]`
//! placeholders, and throwing getters surface as inline markers instead of
//! aborting the render.

mod options;
mod style;

pub use options::{Compact, GetterPolicy, InspectOptions, KeyComparator, KeySort};
pub use style::Style;

pub(crate) use style::{display_width, BLUE, GREEN, RED, WHITE};

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::value::{
    decode_elements, BoxedPrimitive, Getter, ObjectData, ObjectKind, ObjectRef, PromiseState,
    Property, PropertyKey, PropertyValue, SymbolRef, TypedElement, Value,
};

use style::stylize;

/// Total output allowed per indentation level before the rest of the tree
/// collapses to placeholders.
const OUTPUT_BUDGET: usize = 1 << 27;

/// Render a value with default options.
#[must_use]
pub fn inspect(value: &Value) -> String {
    inspect_with(value, &InspectOptions::default())
}

/// Render a value with explicit options.
#[must_use]
pub fn inspect_with(value: &Value, options: &InspectOptions) -> String {
    tracing::trace!(depth = ?options.depth, "inspect value");
    let mut ctx = Ctx::new(options);
    format_value(&mut ctx, value, 0)
}

/// Per-call rendering state, threaded through the recursive walk and
/// discarded on return.
struct Ctx<'a> {
    opts: &'a InspectOptions,
    /// Object ids currently being rendered (circular detection).
    seen: Vec<usize>,
    /// Back-reference numbering for objects hit circularly.
    circular: HashMap<usize, usize>,
    indentation_lvl: usize,
    /// Chars emitted per indentation level; blowing the cap collapses the
    /// rest of the tree.
    budget: HashMap<usize, usize>,
    /// Effective depth limit; `-1` after a budget blowout.
    depth_limit: i64,
    /// Depth of the most recently rendered object, for the compact
    /// combining heuristic.
    current_depth: usize,
}

impl<'a> Ctx<'a> {
    fn new(opts: &'a InspectOptions) -> Self {
        Self {
            opts,
            seen: Vec::new(),
            circular: HashMap::new(),
            indentation_lvl: 0,
            budget: HashMap::new(),
            depth_limit: opts.depth.map_or(i64::MAX, |d| d as i64),
            current_depth: 0,
        }
    }

    fn colors(&self) -> bool {
        self.opts.colors
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ExtrasKind {
    Object,
    ArrayLike,
}

fn format_value(ctx: &mut Ctx<'_>, value: &Value, depth: usize) -> String {
    let colors = ctx.colors();
    match value {
        Value::Undefined => stylize("undefined", Style::Undefined, colors),
        Value::Null => stylize("null", Style::Null, colors),
        Value::Bool(b) => stylize(if *b { "true" } else { "false" }, Style::Boolean, colors),
        Value::Number(n) => stylize(&format_number(*n), Style::Number, colors),
        Value::BigInt(i) => stylize(&format!("{i}n"), Style::BigInt, colors),
        Value::Str(s) => format_string(ctx, s),
        Value::Symbol(s) => stylize(&symbol_text(s), Style::Symbol, colors),
        Value::Object(obj) => format_object(ctx, obj, depth),
    }
}

fn format_object(ctx: &mut Ctx<'_>, obj: &ObjectRef, depth: usize) -> String {
    if ctx.opts.custom_inspect {
        let hook = obj.data().custom_inspect.clone();
        if let Some(hook) = hook {
            let remaining = ctx.opts.depth.map(|d| d.saturating_sub(depth));
            let replacement = hook.call(remaining, ctx.opts);
            match replacement {
                Value::Str(text) => return re_indent(&text, ctx.indentation_lvl),
                other => {
                    // A hook returning its own receiver falls through to the
                    // raw formatter instead of recursing forever.
                    let same = other.as_object().is_some_and(|o| o.ptr_eq(obj));
                    if !same {
                        return format_value(ctx, &other, depth);
                    }
                }
            }
        }
    }

    let id = obj.id();
    if ctx.seen.contains(&id) {
        let next = ctx.circular.len() + 1;
        let index = *ctx.circular.entry(id).or_insert(next);
        return stylize(
            &format!("[Circular *{index}]"),
            Style::Special,
            ctx.colors(),
        );
    }

    format_raw(ctx, obj, depth)
}

fn format_raw(ctx: &mut Ctx<'_>, obj: &ObjectRef, depth: usize) -> String {
    let id = obj.id();
    // Work from a snapshot: getters are user closures that may mutate their
    // own object, which would collide with a live borrow.
    let data = obj.data().clone();
    let colors = ctx.colors();

    if (depth as i64) > ctx.depth_limit {
        let name = data
            .constructor_name
            .clone()
            .unwrap_or_else(|| data.kind.tag().to_owned());
        return stylize(&format!("[{name}]"), Style::Special, colors);
    }

    let props = visible_properties(&data, ctx.opts.show_hidden);
    let keyless = props.is_empty();

    // Keyless leaf categories render without braces at all.
    match &data.kind {
        ObjectKind::Date(ms) if keyless => {
            return stylize(&format_date(*ms), Style::Date, colors);
        }
        ObjectKind::RegExp { source, flags } if keyless => {
            return stylize(&format!("/{source}/{flags}"), Style::RegExp, colors);
        }
        ObjectKind::Error {
            name,
            message,
            stack,
        } if keyless => {
            return format_error(name, message, stack.as_deref());
        }
        ObjectKind::Boxed(boxed) if keyless => {
            return format_boxed(boxed, colors);
        }
        ObjectKind::Function { name } if keyless => {
            return stylize(&function_text(name), Style::Special, colors);
        }
        _ => {}
    }

    ctx.seen.push(id);
    ctx.current_depth = depth;

    let mut braces = ("{", "}");
    let mut base = String::new();
    let mut extras = ExtrasKind::Object;
    let mut numeric_align = false;
    let mut has_more = false;
    let mut entries: Vec<String> = Vec::new();

    match &data.kind {
        ObjectKind::Plain => {
            base = plain_base(&data);
        }
        ObjectKind::Array(items) => {
            braces = ("[", "]");
            extras = ExtrasKind::ArrayLike;
            numeric_align = !items.is_empty()
                && items.iter().all(|item| {
                    matches!(item, Some(Value::Number(_)) | Some(Value::BigInt(_)))
                });
            let (list, more) = format_array_items(ctx, items, depth);
            entries = list;
            has_more = more;
        }
        ObjectKind::Set(items) => {
            base = format!("Set({})", items.len());
            let max = ctx.opts.max_array_length.unwrap_or(usize::MAX);
            for member in items.iter().take(max) {
                let rendered = format_child(ctx, member, depth);
                entries.push(rendered);
            }
            if items.len() > max {
                entries.push(more_items_marker(items.len() - max));
            }
        }
        ObjectKind::Map(map_entries) => {
            base = format!("Map({})", map_entries.len());
            let max = ctx.opts.max_array_length.unwrap_or(usize::MAX);
            for (key, value) in map_entries.iter().take(max) {
                let k = format_child(ctx, key, depth);
                let v = format_child(ctx, value, depth);
                entries.push(format!("{k} => {v}"));
            }
            if map_entries.len() > max {
                entries.push(more_items_marker(map_entries.len() - max));
            }
        }
        ObjectKind::TypedArray { kind, bytes } => {
            braces = ("[", "]");
            extras = ExtrasKind::ArrayLike;
            numeric_align = true;
            let count = bytes.len() / kind.width();
            base = format!("{}({count})", kind.name());
            let (list, more) = format_typed_elements(ctx, *kind, bytes);
            entries = list;
            has_more = more;
        }
        ObjectKind::ArrayBuffer(bytes) | ObjectKind::SharedArrayBuffer(bytes) => {
            base = data.kind.tag().to_owned();
            entries.push(format!(
                "[Uint8Contents]: <{}>",
                buffer_contents(bytes, ctx.opts.max_array_length)
            ));
            entries.push(format!("byteLength: {}", bytes.len()));
        }
        ObjectKind::DataView(bytes) => {
            base = "DataView".to_owned();
            entries.push(format!("byteLength: {}", bytes.len()));
        }
        ObjectKind::Date(ms) => {
            base = stylize(&format_date(*ms), Style::Date, colors);
        }
        ObjectKind::RegExp { source, flags } => {
            base = stylize(&format!("/{source}/{flags}"), Style::RegExp, colors);
        }
        ObjectKind::Error {
            name,
            message,
            stack,
        } => {
            base = format_error(name, message, stack.as_deref());
        }
        ObjectKind::Boxed(boxed) => {
            base = format_boxed(boxed, colors);
        }
        ObjectKind::Function { name } => {
            base = stylize(&function_text(name), Style::Special, colors);
        }
        ObjectKind::Promise(state) => {
            base = "Promise".to_owned();
            entries.push(match state {
                PromiseState::Pending => stylize("<pending>", Style::Special, colors),
                PromiseState::Fulfilled(value) => format_child(ctx, value, depth),
                PromiseState::Rejected(reason) => format!(
                    "{} {}",
                    stylize("<rejected>", Style::Special, colors),
                    format_child(ctx, reason, depth)
                ),
            });
        }
        ObjectKind::WeakMap => {
            base = "WeakMap".to_owned();
            entries.push(stylize("<items unknown>", Style::Special, colors));
        }
        ObjectKind::WeakSet => {
            base = "WeakSet".to_owned();
            entries.push(stylize("<items unknown>", Style::Special, colors));
        }
        ObjectKind::Iterator { tag, items } => {
            base = format!("[{}]", tag.text());
            let max = ctx.opts.max_array_length.unwrap_or(usize::MAX);
            for item in items.iter().take(max) {
                let rendered = format_child(ctx, item, depth);
                entries.push(rendered);
            }
            if items.len() > max {
                entries.push(more_items_marker(items.len() - max));
            }
        }
    }

    for prop in &props {
        entries.push(format_property(ctx, prop, depth));
    }

    if let Some(sort) = &ctx.opts.sorted {
        // Element order is meaningful for array-likes; only the trailing
        // property entries get sorted there.
        let start = match extras {
            ExtrasKind::ArrayLike => entries.len() - props.len(),
            ExtrasKind::Object => 0,
        };
        let tail = &mut entries[start..];
        match sort {
            KeySort::Lexicographic => tail.sort(),
            KeySort::Custom(cmp) => tail.sort_by(|a, b| cmp.compare(a, b)),
        }
    }

    ctx.seen.pop();

    let anchor = ctx
        .circular
        .get(&id)
        .map(|n| format!("<ref *{n}> "))
        .unwrap_or_default();

    let reduced = reduce_to_single_string(
        ctx,
        entries,
        &base,
        braces,
        extras,
        depth,
        numeric_align,
        has_more,
    );
    let result = format!("{anchor}{reduced}");

    let spent = ctx.budget.get(&ctx.indentation_lvl).copied().unwrap_or(0) + result.len();
    ctx.budget.insert(ctx.indentation_lvl, spent);
    if spent > OUTPUT_BUDGET {
        tracing::trace!(indentation = ctx.indentation_lvl, "output budget exceeded");
        ctx.depth_limit = -1;
    }
    result
}

fn visible_properties(data: &ObjectData, show_hidden: bool) -> Vec<Property> {
    data.properties
        .iter()
        .filter(|p| p.enumerable || show_hidden)
        .cloned()
        .collect()
}

fn plain_base(data: &ObjectData) -> String {
    match (&data.constructor_name, data.null_prototype) {
        (None, false) => String::new(),
        (Some(name), false) => name.clone(),
        (None, true) => "[Object: null prototype]".to_owned(),
        (Some(name), true) => format!("[{name}: null prototype]"),
    }
}

fn format_child(ctx: &mut Ctx<'_>, value: &Value, depth: usize) -> String {
    ctx.indentation_lvl += 2;
    let rendered = format_value(ctx, value, depth + 1);
    ctx.indentation_lvl -= 2;
    rendered
}

fn more_items_marker(remaining: usize) -> String {
    format!(
        "... {remaining} more item{}",
        if remaining == 1 { "" } else { "s" }
    )
}

fn format_array_items(
    ctx: &mut Ctx<'_>,
    items: &[Option<Value>],
    depth: usize,
) -> (Vec<String>, bool) {
    let max = ctx.opts.max_array_length.unwrap_or(usize::MAX);
    let mut output = Vec::new();
    let mut index = 0;
    while index < items.len() && output.len() < max {
        if items[index].is_none() {
            let start = index;
            while index < items.len() && items[index].is_none() {
                index += 1;
            }
            let run = index - start;
            output.push(stylize(
                &format!("<{run} empty item{}>", if run == 1 { "" } else { "s" }),
                Style::Undefined,
                ctx.colors(),
            ));
        } else if let Some(item) = &items[index] {
            let item = item.clone();
            output.push(format_child(ctx, &item, depth));
            index += 1;
        }
    }
    let mut has_more = false;
    if index < items.len() {
        output.push(more_items_marker(items.len() - index));
        has_more = true;
    }
    (output, has_more)
}

fn format_typed_elements(
    ctx: &mut Ctx<'_>,
    kind: crate::value::ElementKind,
    bytes: &[u8],
) -> (Vec<String>, bool) {
    let colors = ctx.colors();
    let elements = decode_elements(kind, bytes);
    let max = ctx.opts.max_array_length.unwrap_or(usize::MAX);
    let mut output: Vec<String> = elements
        .iter()
        .take(max)
        .map(|element| match element {
            TypedElement::Float(f) => stylize(&format_number(*f), Style::Number, colors),
            TypedElement::Int(i) if kind.is_bigint() => {
                stylize(&format!("{i}n"), Style::BigInt, colors)
            }
            TypedElement::Uint(u) if kind.is_bigint() => {
                stylize(&format!("{u}n"), Style::BigInt, colors)
            }
            TypedElement::Int(i) => stylize(&i.to_string(), Style::Number, colors),
            TypedElement::Uint(u) => stylize(&u.to_string(), Style::Number, colors),
        })
        .collect();
    let mut has_more = false;
    if elements.len() > max {
        output.push(more_items_marker(elements.len() - max));
        has_more = true;
    }
    (output, has_more)
}

fn buffer_contents(bytes: &[u8], max_length: Option<usize>) -> String {
    let max = max_length.unwrap_or(usize::MAX);
    let shown = &bytes[..bytes.len().min(max)];
    let mut hex = shown
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ");
    if bytes.len() > max {
        let remaining = bytes.len() - max;
        hex.push_str(&format!(
            " ... {remaining} more byte{}",
            if remaining == 1 { "" } else { "s" }
        ));
    }
    hex
}

fn format_property(ctx: &mut Ctx<'_>, prop: &Property, depth: usize) -> String {
    let colors = ctx.colors();
    let key = match &prop.key {
        PropertyKey::Str(k) => {
            let rendered = if is_identifier(k) {
                k.clone()
            } else {
                stylize(&quote_string(k), Style::Str, colors)
            };
            if prop.enumerable {
                rendered
            } else {
                format!("[{rendered}]")
            }
        }
        PropertyKey::Symbol(sym) => {
            format!("[{}]", stylize(&symbol_text(sym), Style::Symbol, colors))
        }
    };
    let value = match &prop.value {
        PropertyValue::Data(v) => {
            let v = v.clone();
            format_child(ctx, &v, depth)
        }
        PropertyValue::Accessor { get, set } => format_accessor(ctx, get.as_ref(), *set, depth),
    };
    format!("{key}: {value}")
}

fn format_accessor(
    ctx: &mut Ctx<'_>,
    get: Option<&Getter>,
    has_setter: bool,
    depth: usize,
) -> String {
    let colors = ctx.colors();
    let label = match (get.is_some(), has_setter) {
        (true, true) => "Getter/Setter",
        (true, false) => "Getter",
        (false, _) => "Setter",
    };
    let should_invoke = match ctx.opts.getters {
        GetterPolicy::None => false,
        GetterPolicy::All => get.is_some(),
        GetterPolicy::Get => get.is_some() && !has_setter,
        GetterPolicy::Set => get.is_some() && has_setter,
    };
    if should_invoke {
        let getter = get.expect("policy requires a getter").clone();
        return match getter.call() {
            Ok(value) => {
                let inner = format_child(ctx, &value, depth);
                format!(
                    "{} {inner}{}",
                    stylize(&format!("[{label}:"), Style::Special, colors),
                    stylize("]", Style::Special, colors)
                )
            }
            Err(thrown) => stylize(
                &format!("[{label}: <Inspection threw ({})>]", thrown_message(&thrown)),
                Style::Special,
                colors,
            ),
        };
    }
    stylize(&format!("[{label}]"), Style::Special, colors)
}

/// Message text for a thrown value: an error's message when available,
/// otherwise a compact rendering of the value itself.
pub(crate) fn thrown_message(thrown: &Value) -> String {
    match thrown {
        Value::Object(obj) => match &obj.data().kind {
            ObjectKind::Error { message, .. } => message.clone(),
            other => format!("[object {}]", other.tag()),
        },
        Value::Str(s) => s.clone(),
        other => inspect_with(
            other,
            &InspectOptions::default().with_max_string_length(Some(128)),
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn reduce_to_single_string(
    ctx: &mut Ctx<'_>,
    output: Vec<String>,
    base: &str,
    braces: (&str, &str),
    extras: ExtrasKind,
    depth: usize,
    numeric_align: bool,
    has_more: bool,
) -> String {
    if output.is_empty() {
        return if base.is_empty() {
            format!("{}{}", braces.0, braces.1)
        } else {
            format!("{base} {}{}", braces.0, braces.1)
        };
    }

    let mut output = output;
    if let Compact::Level(level) = ctx.opts.compact {
        let entries_before = output.len();
        if extras == ExtrasKind::ArrayLike && output.len() > 6 {
            output = group_array_elements(ctx, output, numeric_align, has_more);
        }
        // Combine onto one line only when grouping left the list untouched
        // and the last rendered branch stayed shallow enough.
        if output.len() == entries_before && ctx.current_depth.saturating_sub(depth) < level {
            let start = output.len() + ctx.indentation_lvl + braces.0.len() + base.len() + 10;
            if is_below_break_length(ctx, &output, start, base) {
                let joined = output.join(", ");
                if !joined.contains('\n') {
                    return if base.is_empty() {
                        format!("{} {joined} {}", braces.0, braces.1)
                    } else {
                        format!("{base} {} {joined} {}", braces.0, braces.1)
                    };
                }
            }
        }
    }

    let indentation = format!("\n{}", " ".repeat(ctx.indentation_lvl));
    let joined = output.join(&format!(",{indentation}  "));
    let base_part = if base.is_empty() {
        String::new()
    } else {
        format!("{base} ")
    };
    format!(
        "{base_part}{}{indentation}  {joined}{indentation}{}",
        braces.0, braces.1
    )
}

fn is_below_break_length(ctx: &Ctx<'_>, output: &[String], start: usize, base: &str) -> bool {
    let mut total = output.len() + start;
    if total + output.len() > ctx.opts.break_length {
        return false;
    }
    for entry in output {
        total += display_width(entry);
        if total > ctx.opts.break_length {
            return false;
        }
    }
    base.is_empty() || !base.contains('\n')
}

/// Pack short array entries into aligned columns within the break length.
fn group_array_elements(
    ctx: &Ctx<'_>,
    output: Vec<String>,
    numeric_align: bool,
    has_more: bool,
) -> Vec<String> {
    let mut output_length = output.len();
    if has_more {
        // The "... n more items" marker stays on its own line.
        output_length -= 1;
    }
    if output_length == 0 {
        return output;
    }
    const SEPARATOR_SPACE: usize = 2;
    let data_len: Vec<usize> = output[..output_length].iter().map(|e| display_width(e)).collect();
    let total_length: usize = data_len.iter().map(|l| l + SEPARATOR_SPACE).sum();
    let max_length = data_len.iter().copied().max().unwrap_or(0);
    let actual_max = max_length + SEPARATOR_SPACE;

    let fits = actual_max * 3 + ctx.indentation_lvl < ctx.opts.break_length
        && (total_length / actual_max > 5 || max_length <= 6);
    if !fits {
        return output;
    }

    // Bias towards wider grids for short entries, using an approximate
    // character aspect ratio.
    let approx_char_heights = 2.5;
    let average_bias = ((actual_max as f64) - (total_length as f64) / (output_length as f64))
        .max(0.0)
        .sqrt();
    let biased_max = ((actual_max as f64) - 3.0 - average_bias).max(1.0);
    let columns = (((approx_char_heights * biased_max * output_length as f64).sqrt() / biased_max)
        .round() as usize)
        .min((ctx.opts.break_length - ctx.indentation_lvl) / actual_max)
        .min(ctx.opts.compact.level() * 3)
        .min(10);
    if columns <= 1 {
        return output;
    }

    let mut max_line_length = Vec::with_capacity(columns);
    for col in 0..columns {
        let mut line_length = 0;
        let mut j = col;
        while j < output_length {
            if data_len[j] > line_length {
                line_length = data_len[j];
            }
            j += columns;
        }
        max_line_length.push(line_length + SEPARATOR_SPACE);
    }

    let mut grouped = Vec::new();
    let mut i = 0;
    while i < output_length {
        let row_end = (i + columns).min(output_length);
        let mut line = String::new();
        let mut j = i;
        while j < row_end - 1 {
            // Padding targets count invisible ANSI bytes too.
            let padding = max_line_length[j - i] + output[j].len() - data_len[j];
            let entry = format!("{}, ", output[j]);
            if numeric_align {
                line.push_str(&pad_start(&entry, padding));
            } else {
                line.push_str(&pad_end(&entry, padding));
            }
            j += 1;
        }
        if numeric_align {
            let padding =
                (max_line_length[j - i] + output[j].len() - data_len[j]).saturating_sub(SEPARATOR_SPACE);
            line.push_str(&pad_start(&output[j], padding));
        } else {
            line.push_str(&output[j]);
        }
        grouped.push(line);
        i += columns;
    }
    if has_more {
        grouped.push(output[output_length].clone());
    }
    grouped
}

fn pad_start(s: &str, width: usize) -> String {
    if s.len() >= width {
        s.to_owned()
    } else {
        format!("{}{s}", " ".repeat(width - s.len()))
    }
}

fn pad_end(s: &str, width: usize) -> String {
    if s.len() >= width {
        s.to_owned()
    } else {
        format!("{s}{}", " ".repeat(width - s.len()))
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z_$][a-zA-Z_$0-9]*$").unwrap())
}

fn is_identifier(key: &str) -> bool {
    identifier_pattern().is_match(key)
}

/// Quote and escape a string the way diagnostic output expects: single
/// quotes by default, switching when the payload itself holds quotes.
pub(crate) fn quote_string(s: &str) -> String {
    let quote = if !s.contains('\'') {
        '\''
    } else if !s.contains('"') {
        '"'
    } else {
        '`'
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{b}' => out.push_str("\\v"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

fn format_string(ctx: &Ctx<'_>, s: &str) -> String {
    let colors = ctx.colors();
    let mut trailer = String::new();
    let mut body: &str = s;
    let owned;
    if let Some(max) = ctx.opts.max_string_length {
        let count = s.chars().count();
        if count > max {
            owned = s.chars().take(max).collect::<String>();
            body = &owned;
            let removed = count - max;
            trailer = format!(
                "... {removed} more character{}",
                if removed == 1 { "" } else { "s" }
            );
        }
    }

    let length = body.chars().count();
    let wrap_budget = ctx
        .opts
        .break_length
        .saturating_sub(ctx.indentation_lvl + 4);
    if length > 16 && length > wrap_budget {
        let width = ctx
            .opts
            .break_length
            .saturating_sub(ctx.indentation_lvl + 2)
            .max(16);
        let lines = word_wrap(body, width);
        if lines.len() > 1 {
            let indent = " ".repeat(ctx.indentation_lvl);
            let joined = lines
                .iter()
                .map(|line| stylize(&quote_string(line), Style::Str, colors))
                .collect::<Vec<_>>()
                .join(&format!(" +\n{indent}  "));
            return format!("{joined}{trailer}");
        }
    }
    format!("{}{trailer}", stylize(&quote_string(body), Style::Str, colors))
}

/// Split text into word-boundary chunks no wider than `width` (words longer
/// than the width are hard-split).
fn word_wrap(s: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in s.split_inclusive(' ') {
        if !current.is_empty() && current.chars().count() + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if word.chars().count() > width {
            let mut chunk = String::new();
            for c in word.chars() {
                chunk.push(c);
                if chunk.chars().count() == width {
                    lines.push(std::mem::take(&mut chunk));
                }
            }
            current = chunk;
        } else {
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn re_indent(text: &str, indentation: usize) -> String {
    if indentation == 0 || !text.contains('\n') {
        return text.to_owned();
    }
    let indent = " ".repeat(indentation);
    text.replace('\n', &format!("\n{indent}"))
}

/// Number rendering: negative zero is visible, non-finite values use their
/// conventional spellings.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if n == 0.0 && n.is_sign_negative() {
        return "-0".to_owned();
    }
    format!("{n}")
}

fn symbol_text(sym: &SymbolRef) -> String {
    match sym.description() {
        Some(desc) => format!("Symbol({desc})"),
        None => "Symbol()".to_owned(),
    }
}

fn function_text(name: &str) -> String {
    if name.is_empty() {
        "[Function (anonymous)]".to_owned()
    } else {
        format!("[Function: {name}]")
    }
}

fn format_date(epoch_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(epoch_ms).map_or_else(
        || "Invalid Date".to_owned(),
        |dt| dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
    )
}

fn format_error(name: &str, message: &str, stack: Option<&str>) -> String {
    match stack {
        Some(stack) => {
            let mut out = if message.is_empty() {
                name.to_owned()
            } else {
                format!("{name}: {message}")
            };
            for line in stack.lines() {
                out.push_str("\n    ");
                out.push_str(line.trim_start());
            }
            out
        }
        None => {
            if message.is_empty() {
                format!("[{name}]")
            } else {
                format!("[{name}: {message}]")
            }
        }
    }
}

fn format_boxed(boxed: &BoxedPrimitive, colors: bool) -> String {
    match boxed {
        BoxedPrimitive::Number(n) => format!(
            "[Number: {}]",
            stylize(&format_number(*n), Style::Number, colors)
        ),
        BoxedPrimitive::Str(s) => {
            format!("[String: {}]", stylize(&quote_string(s), Style::Str, colors))
        }
        BoxedPrimitive::Bool(b) => format!(
            "[Boolean: {}]",
            stylize(if *b { "true" } else { "false" }, Style::Boolean, colors)
        ),
        BoxedPrimitive::BigInt(i) => {
            format!("[BigInt: {}]", stylize(&format!("{i}n"), Style::BigInt, colors))
        }
        BoxedPrimitive::Symbol(s) => {
            format!("[Symbol: {}]", stylize(&symbol_text(s), Style::Symbol, colors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::InspectHook;

    #[test]
    fn test_primitives() {
        assert_eq!(inspect(&Value::Undefined), "undefined");
        assert_eq!(inspect(&Value::Null), "null");
        assert_eq!(inspect(&Value::from(true)), "true");
        assert_eq!(inspect(&Value::from(1)), "1");
        assert_eq!(inspect(&Value::from(1.5)), "1.5");
        assert_eq!(inspect(&Value::Number(-0.0)), "-0");
        assert_eq!(inspect(&Value::Number(f64::NAN)), "NaN");
        assert_eq!(inspect(&Value::Number(f64::INFINITY)), "Infinity");
        assert_eq!(inspect(&Value::BigInt(42)), "42n");
        assert_eq!(inspect(&Value::from("hi")), "'hi'");
        assert_eq!(inspect(&Value::symbol(Some("tag"))), "Symbol(tag)");
    }

    #[test]
    fn test_string_quote_switching() {
        assert_eq!(inspect(&Value::from("don't")), "\"don't\"");
        assert_eq!(inspect(&Value::from("a\nb")), "'a\\nb'");
    }

    #[test]
    fn test_compact_object_layout() {
        let value = Value::object([
            ("a", Value::from(1)),
            ("b", Value::array([Value::from(1), Value::from(2), Value::from(3)])),
        ]);
        assert_eq!(inspect(&value), "{ a: 1, b: [ 1, 2, 3 ] }");
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(inspect(&Value::object::<&str, _>([])), "{}");
        assert_eq!(inspect(&Value::array([])), "[]");
        assert_eq!(inspect(&Value::set([])), "Set(0) {}");
        assert_eq!(inspect(&Value::map([])), "Map(0) {}");
    }

    #[test]
    fn test_depth_cap_renders_placeholder() {
        let value = Value::object([("nested", Value::object([("x", Value::from(1))]))]);
        let opts = InspectOptions::default().with_depth(Some(0));
        assert_eq!(inspect_with(&value, &opts), "{ nested: [Object] }");

        let arr = Value::object([("list", Value::array([Value::from(1)]))]);
        assert_eq!(inspect_with(&arr, &opts), "{ list: [Array] }");
    }

    #[test]
    fn test_class_and_null_prototype_bases() {
        let value = Value::class_object("Point", [("x", Value::from(1))]);
        assert_eq!(inspect(&value), "Point { x: 1 }");

        let value = Value::null_proto_object([("x", Value::from(1))]);
        assert_eq!(inspect(&value), "[Object: null prototype] { x: 1 }");
    }

    #[test]
    fn test_array_truncation() {
        let value = Value::array((0..150).map(Value::from));
        let rendered = inspect(&value);
        assert!(rendered.contains("... 50 more items"), "got: {rendered}");

        let one_over = Value::array((0..101).map(Value::from));
        assert!(inspect(&one_over).contains("... 1 more item"));
    }

    #[test]
    fn test_sparse_array_gaps() {
        let value = Value::sparse_array(vec![
            Some(Value::from(1)),
            None,
            None,
            Some(Value::from(4)),
        ]);
        assert_eq!(inspect(&value), "[ 1, <2 empty items>, 4 ]");
    }

    #[test]
    fn test_grouped_array_columns() {
        let value = Value::array((0..26).map(Value::from));
        let rendered = inspect(&value);
        // Grouping packs several entries per line instead of one per line.
        assert!(rendered.contains('\n'), "got: {rendered}");
        let second_line = rendered.lines().nth(1).unwrap();
        assert!(
            second_line.matches(',').count() >= 2,
            "expected columns in: {rendered}"
        );
    }

    #[test]
    fn test_collections() {
        assert_eq!(
            inspect(&Value::set([Value::from(1), Value::from(2)])),
            "Set(2) { 1, 2 }"
        );
        assert_eq!(
            inspect(&Value::map([(Value::from(1), Value::from("a"))])),
            "Map(1) { 1 => 'a' }"
        );
    }

    #[test]
    fn test_typed_array_and_buffers() {
        assert_eq!(
            inspect(&Value::float64_array(&[f64::NAN, 1.5])),
            "Float64Array(2) [ NaN, 1.5 ]"
        );
        assert_eq!(
            inspect(&Value::array_buffer(vec![0x00, 0x11])),
            "ArrayBuffer { [Uint8Contents]: <00 11>, byteLength: 2 }"
        );
        let big = Value::array_buffer(vec![0xab; 104]);
        assert!(inspect(&big).contains("... 4 more bytes"));
    }

    #[test]
    fn test_special_categories() {
        assert_eq!(inspect(&Value::regexp("a+", "gi")), "/a+/gi");
        assert_eq!(inspect(&Value::date(0)), "1970-01-01T00:00:00.000Z");
        assert_eq!(inspect(&Value::error("TypeError", "bad")), "[TypeError: bad]");
        assert_eq!(inspect(&Value::function("f")), "[Function: f]");
        assert_eq!(inspect(&Value::function("")), "[Function (anonymous)]");
        assert_eq!(inspect(&Value::boxed_number(3.0)), "[Number: 3]");
        assert_eq!(
            inspect(&Value::promise(PromiseState::Pending)),
            "Promise { <pending> }"
        );
        assert_eq!(inspect(&Value::weak_map()), "WeakMap { <items unknown> }");
    }

    #[test]
    fn test_iterators() {
        let set_iter = Value::set_iterator([Value::from(1), Value::from(2), Value::from(3)]);
        assert_eq!(inspect(&set_iter), "[Set Iterator] { 1, 2, 3 }");

        let map_iter = Value::map_iterator([(Value::from(1), Value::from("a"))]);
        assert_eq!(inspect(&map_iter), "[Map Iterator] { [ 1, 'a' ] }");

        let truncated = Value::set_iterator((0..5).map(Value::from));
        let opts = InspectOptions::default().with_max_array_length(Some(3));
        assert_eq!(
            inspect_with(&truncated, &opts),
            "[Set Iterator] { 0, 1, 2, ... 2 more items }"
        );
    }

    #[test]
    fn test_error_with_stack() {
        let value = Value::error_with_stack("Error", "boom", "at main (demo.rs:3)");
        assert_eq!(inspect(&value), "Error: boom\n    at main (demo.rs:3)");
    }

    #[test]
    fn test_circular_reference() {
        let value = Value::object([("n", Value::from(1))]);
        value.as_object().unwrap().set("me", value.clone());
        assert_eq!(inspect(&value), "<ref *1> { n: 1, me: [Circular *1] }");
    }

    #[test]
    fn test_non_identifier_keys_quoted() {
        let value = Value::object([("a-b", Value::from(1))]);
        assert_eq!(inspect(&value), "{ 'a-b': 1 }");
    }

    #[test]
    fn test_hidden_and_symbol_properties() {
        let value = Value::object([("a", Value::from(1))]);
        let obj = value.as_object().unwrap();
        obj.set_hidden("secret", Value::from(2));
        obj.set_symbol(SymbolRef::new(Some("tag")), Value::from(3), true);
        assert_eq!(inspect(&value), "{ a: 1, [Symbol(tag)]: 3 }");
        let opts = InspectOptions::default().with_show_hidden(true);
        assert_eq!(
            inspect_with(&value, &opts),
            "{ a: 1, [secret]: 2, [Symbol(tag)]: 3 }"
        );
    }

    #[test]
    fn test_getter_markers_and_invocation() {
        let value = Value::object([("a", Value::from(1))]);
        let obj = value.as_object().unwrap();
        obj.set_accessor("lazy", Some(Getter::new(|| Ok(Value::from(7)))), false);
        obj.set_accessor(
            "boom",
            Some(Getter::new(|| Err(Value::error("Error", "nope")))),
            true,
        );
        assert_eq!(
            inspect(&value),
            "{ a: 1, lazy: [Getter], boom: [Getter/Setter] }"
        );
        let opts = InspectOptions::default().with_getters(GetterPolicy::All);
        assert_eq!(
            inspect_with(&value, &opts),
            "{ a: 1, lazy: [Getter: 7], boom: [Getter/Setter: <Inspection threw (nope)>] }"
        );
        let only_get = InspectOptions::default().with_getters(GetterPolicy::Get);
        assert_eq!(
            inspect_with(&value, &only_get),
            "{ a: 1, lazy: [Getter: 7], boom: [Getter/Setter] }"
        );
    }

    #[test]
    fn test_getter_mutating_its_own_object_renders() {
        let value = Value::object([("n", Value::from(1))]);
        let obj = value.as_object().unwrap().clone();
        let target = obj.clone();
        obj.set_accessor(
            "bump",
            Some(Getter::new(move || {
                target.set("n", Value::from(2));
                Ok(Value::from(7))
            })),
            false,
        );
        let opts = InspectOptions::default().with_getters(GetterPolicy::All);
        let rendered = inspect_with(&value, &opts);
        assert!(rendered.contains("bump: [Getter: 7]"), "got: {rendered}");
    }

    #[test]
    fn test_sorted_keys() {
        let value = Value::object([("b", Value::from(2)), ("a", Value::from(1))]);
        let opts = InspectOptions::default().with_sorted(Some(KeySort::Lexicographic));
        assert_eq!(inspect_with(&value, &opts), "{ a: 1, b: 2 }");
    }

    #[test]
    fn test_sorted_arrays_sort_only_trailing_properties() {
        let value = Value::array([Value::from(2), Value::from(1)]);
        let obj = value.as_object().unwrap();
        obj.set("b", Value::from(4));
        obj.set("a", Value::from(3));
        let opts = InspectOptions::default().with_sorted(Some(KeySort::Lexicographic));
        // Element order is meaningful and survives; only the appended
        // properties get sorted.
        assert_eq!(inspect_with(&value, &opts), "[ 2, 1, a: 3, b: 4 ]");
    }

    #[test]
    fn test_compact_off_is_multiline() {
        let value = Value::object([("a", Value::from(1))]);
        let opts = InspectOptions::default().with_compact(Compact::Off);
        assert_eq!(inspect_with(&value, &opts), "{\n  a: 1\n}");
    }

    #[test]
    fn test_custom_inspect_hook() {
        let value = Value::object([("a", Value::from(1))]);
        value.as_object().unwrap().data_mut().custom_inspect = Some(InspectHook::new(|_, _| {
            Value::from("<<custom>>")
        }));
        assert_eq!(inspect(&value), "<<custom>>");

        let opts = InspectOptions::default().with_custom_inspect(false);
        assert_eq!(inspect_with(&value, &opts), "{ a: 1 }");
    }

    #[test]
    fn test_custom_inspect_non_string_result() {
        let value = Value::object([("a", Value::from(1))]);
        value.as_object().unwrap().data_mut().custom_inspect = Some(InspectHook::new(|_, _| {
            Value::array([Value::from(9)])
        }));
        assert_eq!(inspect(&value), "[ 9 ]");
    }

    #[test]
    fn test_string_truncation() {
        let opts = InspectOptions::default().with_max_string_length(Some(4));
        let rendered = inspect_with(&Value::from("abcdefgh"), &opts);
        assert_eq!(rendered, "'abcd'... 4 more characters");
    }

    #[test]
    fn test_long_string_wraps() {
        let long = "word ".repeat(40);
        let opts = InspectOptions::default().with_break_length(40);
        let rendered = inspect_with(&Value::from(long.trim_end()), &opts);
        assert!(rendered.contains(" +\n"), "got: {rendered}");
    }

    #[test]
    fn test_colors_wrap_numbers() {
        let opts = InspectOptions::default().with_colors(true);
        assert_eq!(inspect_with(&Value::from(1), &opts), "\x1b[33m1\x1b[39m");
    }

    #[test]
    fn test_deterministic_output() {
        let build = || {
            Value::object([
                ("a", Value::from(1)),
                ("b", Value::array([Value::from(1), Value::from(2), Value::from(3)])),
            ])
        };
        assert_eq!(inspect(&build()), inspect(&build()));
    }
}
