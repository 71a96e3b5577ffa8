//! String helpers for labels and backend identifiers.

const DYNAMIC_LABEL_MARKER: &str = "${";

pub fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn capitalize_first_letter_only(s: &str) -> String {
    capitalize_first_letter(&s.to_lowercase())
}

/// Removes every parenthesised group that contains a dynamic label
/// (`${...}`), then collapses runs of whitespace.
///
/// Threshold annotations cannot render dynamic labels, so alarm builders
/// strip them from the metric label before the annotation is produced.
///
/// # Examples
///
/// ```
/// use oxwatch_common::strings::remove_brackets_with_dynamic_labels;
///
/// let label = "P99 (avg: ${AVG}) (ms)";
/// assert_eq!(remove_brackets_with_dynamic_labels(label), "P99 (ms)");
/// ```
pub fn remove_brackets_with_dynamic_labels(label: &str) -> String {
    let chars: Vec<char> = label.chars().collect();
    let mut kept = String::with_capacity(label.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '(' {
            if let Some(end) = find_group_end(&chars, i) {
                let group: String = chars[i..=end].iter().collect();
                if !group.contains(DYNAMIC_LABEL_MARKER) {
                    kept.push_str(&group);
                }
                i = end + 1;
                continue;
            }
        }
        kept.push(chars[i]);
        i += 1;
    }

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

// A group needs at least one character between the brackets and never spans a line break.
fn find_group_end(chars: &[char], open: usize) -> Option<usize> {
    let mut j = open + 1;
    if j >= chars.len() || chars[j] == '\n' {
        return None;
    }
    j += 1;
    while j < chars.len() {
        match chars[j] {
            ')' => return Some(j),
            '\n' => return None,
            _ => j += 1,
        }
    }
    None
}

/// Short, stable, non-cryptographic hash rendered as lowercase hex.
///
/// Used to derive expression ids that must be unique within a widget but
/// stay identical across runs. Operates on UTF-16 code units so the output
/// matches ids produced by existing dashboards.
pub fn short_hash(s: &str) -> String {
    const SEED: u32 = 31;
    let mut h1: u32 = 0xdead_beef ^ SEED;
    let mut h2: u32 = 0x41c6_ce57 ^ SEED;

    for unit in s.encode_utf16() {
        let ch = u32::from(unit);
        h1 = (h1 ^ ch).wrapping_mul(2_654_435_761);
        h2 = (h2 ^ ch).wrapping_mul(1_597_334_677);
    }

    h1 = (h1 ^ (h1 >> 16)).wrapping_mul(2_246_822_507)
        ^ (h2 ^ (h2 >> 13)).wrapping_mul(3_266_489_909);
    h2 = (h2 ^ (h2 >> 16)).wrapping_mul(2_246_822_507)
        ^ (h1 ^ (h1 >> 13)).wrapping_mul(3_266_489_909);

    let combined = (u64::from(h2 & 0x001f_ffff) << 32) | u64::from(h1);
    format!("{combined:x}")
}

pub fn hash_for_expression_id(s: &str) -> String {
    short_hash(s)
}

/// Expression ids start with a lowercase letter followed by `[a-zA-Z0-9_]`.
pub fn is_valid_expression_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Keeps only `[0-9A-Za-z_]`, for suffixes appended to expression ids.
pub fn sanitize_expression_id_suffix(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Alarm-friendly names use letters, digits, hyphens and underscores only.
pub fn is_alarm_friendly(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Replaces each run of characters outside `[A-Za-z0-9_-]` with a single
/// hyphen and trims hyphens from both ends.
pub fn sanitize_alarm_friendly_name(s: &str) -> String {
    replace_illegal_runs(s, |c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Same as [`sanitize_alarm_friendly_name`] but also keeps dots, which
/// appear in percentile suffixes such as `p99.9`.
pub fn sanitize_alarm_name(s: &str) -> String {
    replace_illegal_runs(s, |c| {
        c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'
    })
}

fn replace_illegal_runs(s: &str, allowed: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_separator = false;

    for c in s.chars() {
        if allowed(c) {
            if pending_separator && !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
    }

    out.trim_matches('-').to_string()
}
