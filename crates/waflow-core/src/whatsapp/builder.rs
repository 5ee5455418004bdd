//! Message payload construction

use waflow_common::{Error, Result};

use super::template::count_placeholders;
use super::types::{
    ComponentType, LanguageRef, MessagePayload, PayloadComponent, PayloadParameter,
    PayloadTemplate, Template,
};

/// Build a provider-ready payload from a template and its parameters.
///
/// Components are walked in their declared order; each HEADER or BODY
/// component with placeholders consumes the next slice of the flat
/// parameter list. The whole list must be consumed exactly.
pub fn build_payload(
    phone: &str,
    template: &Template,
    parameters: &[String],
    default_language: &str,
) -> Result<MessagePayload> {
    let mut components = Vec::new();
    let mut cursor = 0usize;

    for component in &template.components {
        if !matches!(
            component.component_type,
            ComponentType::Header | ComponentType::Body
        ) {
            continue;
        }

        let count = count_placeholders(component.text.as_deref());
        if count == 0 {
            continue;
        }

        if cursor + count > parameters.len() {
            return Err(Error::ParameterCountMismatch {
                required: cursor + count,
                provided: parameters.len(),
            });
        }

        let values = parameters[cursor..cursor + count]
            .iter()
            .map(PayloadParameter::text)
            .collect();
        cursor += count;

        components.push(PayloadComponent {
            component_type: component.component_type.payload_tag().to_string(),
            parameters: values,
        });
    }

    if cursor != parameters.len() {
        return Err(Error::ParameterCountMismatch {
            required: cursor,
            provided: parameters.len(),
        });
    }

    let language = template
        .language
        .clone()
        .unwrap_or_else(|| default_language.to_string());

    Ok(MessagePayload {
        messaging_product: "whatsapp".to_string(),
        to: phone.to_string(),
        message_type: "template".to_string(),
        template: PayloadTemplate {
            name: template.name.clone(),
            language: LanguageRef { code: language },
            components,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whatsapp::types::{TemplateComponent, TemplateStatus};
    use pretty_assertions::assert_eq;

    fn template(
        language: Option<&str>,
        components: Vec<(ComponentType, Option<&str>)>,
    ) -> Template {
        Template {
            name: "welcome_msg".into(),
            status: TemplateStatus::Approved,
            category: None,
            language: language.map(String::from),
            components: components
                .into_iter()
                .map(|(component_type, text)| TemplateComponent {
                    component_type,
                    text: text.map(String::from),
                    format: None,
                })
                .collect(),
        }
    }

    fn params(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_body_only_payload() {
        let t = template(
            Some("en_US"),
            vec![(
                ComponentType::Body,
                Some("Hello {{1}}, your application {{2}} is approved"),
            )],
        );

        let payload = build_payload("919999999999", &t, &params(&["Raj", "APP123"]), "en_US")
            .unwrap();

        assert_eq!(payload.to, "919999999999");
        assert_eq!(payload.template.components.len(), 1);
        assert_eq!(payload.template.components[0].component_type, "body");
        assert_eq!(
            payload.template.components[0].parameters,
            vec![PayloadParameter::text("Raj"), PayloadParameter::text("APP123")]
        );
    }

    #[test]
    fn test_header_block_precedes_body_block() {
        let t = template(
            Some("en_US"),
            vec![
                (ComponentType::Header, Some("{{1}} sale")),
                (ComponentType::Body, Some("Hi {{1}}, code {{2}}")),
                (ComponentType::Footer, Some("Reply STOP")),
            ],
        );

        let payload =
            build_payload("911", &t, &params(&["Summer", "Raj", "SAVE10"]), "en_US").unwrap();

        assert_eq!(payload.template.components.len(), 2);
        assert_eq!(payload.template.components[0].component_type, "header");
        assert_eq!(payload.template.components[1].component_type, "body");
    }

    #[test]
    fn test_parameter_order_is_preserved_across_blocks() {
        let t = template(
            Some("en_US"),
            vec![
                (ComponentType::Header, Some("{{1}}")),
                (ComponentType::Body, Some("{{1}} {{2}} {{3}}")),
            ],
        );
        let input = params(&["a", "b", "c", "d"]);

        let payload = build_payload("911", &t, &input, "en_US").unwrap();

        // Concatenating emitted values reproduces the input exactly.
        let emitted: Vec<String> = payload
            .template
            .components
            .iter()
            .flat_map(|c| c.parameters.iter().map(|p| p.text.clone()))
            .collect();
        assert_eq!(emitted, input);
    }

    #[test]
    fn test_leftover_parameters_rejected() {
        let t = template(Some("en_US"), vec![(ComponentType::Body, Some("Hi {{1}}"))]);
        let err = build_payload("911", &t, &params(&["Raj", "extra"]), "en_US").unwrap_err();
        assert!(matches!(
            err,
            Error::ParameterCountMismatch {
                required: 1,
                provided: 2
            }
        ));
    }

    #[test]
    fn test_too_few_parameters_rejected() {
        let t = template(Some("en_US"), vec![(ComponentType::Body, Some("{{1}} {{2}}"))]);
        assert!(build_payload("911", &t, &params(&["only"]), "en_US").is_err());
    }

    #[test]
    fn test_language_defaults_when_absent() {
        let t = template(None, vec![(ComponentType::Body, Some("Hi {{1}}"))]);
        let payload = build_payload("911", &t, &params(&["Raj"]), "en_US").unwrap();
        assert_eq!(payload.template.language.code, "en_US");

        let t = template(Some("hi_IN"), vec![(ComponentType::Body, Some("Hi {{1}}"))]);
        let payload = build_payload("911", &t, &params(&["Raj"]), "en_US").unwrap();
        assert_eq!(payload.template.language.code, "hi_IN");
    }

    #[test]
    fn test_components_without_placeholders_are_omitted() {
        let t = template(
            Some("en_US"),
            vec![
                (ComponentType::Header, Some("Static header")),
                (ComponentType::Body, Some("Hi {{1}}")),
            ],
        );
        let payload = build_payload("911", &t, &params(&["Raj"]), "en_US").unwrap();
        assert_eq!(payload.template.components.len(), 1);
        assert_eq!(payload.template.components[0].component_type, "body");
    }
}
