use crate::reference::MetricReference;
use oxwatch_common::error::{MonitoringError, Result};
use oxwatch_common::strings::is_valid_expression_id;
use std::collections::BTreeMap;

/// Identifiers a math expression refers to, in order of first appearance.
///
/// Quoted text, numbers and function names (identifiers followed by `(`)
/// are skipped. Backend functions and keywords are uppercase while
/// operand ids start lowercase, so only lowercase-initial identifiers count.
pub fn referenced_ids(expression: &str) -> Vec<String> {
    let chars: Vec<char> = expression.chars().collect();
    let mut ids: Vec<String> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\'' || c == '"' {
            i += 1;
            while i < chars.len() && chars[i] != c {
                i += 1;
            }
            i += 1;
        } else if c.is_ascii_digit() || c == '.' {
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '.') {
                i += 1;
            }
        } else if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let ident: String = chars[start..i].iter().collect();
            let next = chars[i..].iter().find(|ch| !ch.is_whitespace());
            let is_call = next == Some(&'(');
            if !is_call && c.is_ascii_lowercase() && !ids.contains(&ident) {
                ids.push(ident);
            }
        } else {
            i += 1;
        }
    }

    ids
}

pub fn validate_expression_id(id: &str) -> Result<()> {
    if is_valid_expression_id(id) {
        Ok(())
    } else {
        Err(MonitoringError::InvalidExpressionId { id: id.to_string() })
    }
}

/// Checks operand ids and that every id used in `expression` is declared.
pub fn validate_math(
    expression: &str,
    using_metrics: &BTreeMap<String, MetricReference>,
) -> Result<()> {
    for id in using_metrics.keys() {
        validate_expression_id(id)?;
    }
    for id in referenced_ids(expression) {
        if !using_metrics.contains_key(&id) {
            return Err(MonitoringError::UndeclaredOperand {
                id,
                expression: expression.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_operands_and_skips_functions() {
        assert_eq!(referenced_ids("FILL(m1,0) / PERIOD(m1)"), vec!["m1"]);
        assert_eq!(referenced_ids("(60 * requests) / PERIOD(requests)"), vec!["requests"]);
        assert_eq!(referenced_ids("ANOMALY_DETECTION_BAND(m1,2.5)"), vec!["m1"]);
        assert_eq!(referenced_ids("100 * (errors / total)"), vec!["errors", "total"]);
    }

    #[test]
    fn skips_quoted_text_and_numbers() {
        assert!(referenced_ids("SEARCH('{AWS/SQS,QueueName} foo', 'Sum', 300)").is_empty());
        assert!(referenced_ids("1e5 * 2").is_empty());
    }
}
