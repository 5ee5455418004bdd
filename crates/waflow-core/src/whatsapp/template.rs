//! Template parameter validation

use regex::Regex;
use serde::Serialize;
use waflow_common::{Error, Result};

use super::types::{ComponentType, Template};

/// Placeholder counts for a template, split by component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    pub header_count: usize,
    pub body_count: usize,
    pub total: usize,
}

/// Count non-overlapping `{{n}}` placeholders in a text block
pub fn count_placeholders(text: Option<&str>) -> usize {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return 0,
    };

    let re = Regex::new(r"\{\{[1-9][0-9]*\}\}").unwrap();
    re.find_iter(text).count()
}

/// Compute the placeholder counts across HEADER then BODY components
pub fn parameter_info(template: &Template) -> ParameterInfo {
    let mut header_count = 0;
    let mut body_count = 0;

    for component in &template.components {
        match component.component_type {
            ComponentType::Header => header_count += count_placeholders(component.text.as_deref()),
            ComponentType::Body => body_count += count_placeholders(component.text.as_deref()),
            _ => {}
        }
    }

    ParameterInfo {
        header_count,
        body_count,
        total: header_count + body_count,
    }
}

/// Validate a caller-supplied parameter list against a template.
///
/// Header placeholders are consumed first, then body placeholders; the
/// list length must equal the combined count exactly.
pub fn validate_parameters(template: &Template, parameters: &[String]) -> Result<ParameterInfo> {
    let info = parameter_info(template);

    if parameters.len() != info.total {
        return Err(Error::ParameterCountMismatch {
            required: info.total,
            provided: parameters.len(),
        });
    }

    Ok(info)
}
