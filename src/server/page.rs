//! Form page rendering
//!
//! A single self-contained HTML page with the passenger survey form.
//! Dropdown options come from the loaded encoders so the form can only
//! submit categories the model was trained on; without a loaded model the
//! page falls back to the standard survey values and shows a banner.

use crate::models::SERVICE_FEATURES;
use crate::service::PredictionService;

const DEFAULT_GENDERS: &[&str] = &["Female", "Male"];
const DEFAULT_CUSTOMER_TYPES: &[&str] = &["Loyal Customer", "disloyal Customer"];
const DEFAULT_TRAVEL_TYPES: &[&str] = &["Business travel", "Personal Travel"];
const DEFAULT_CLASSES: &[&str] = &["Business", "Eco", "Eco Plus"];

/// Render the survey form, using the service's encoder classes for the
/// categorical dropdowns when a model is loaded.
pub fn render_form(service: Option<&PredictionService>) -> String {
    let options = |field: &str, defaults: &[&str]| -> String {
        let classes: Vec<String> = service
            .and_then(|s| s.classes(field))
            .map(|c| c.to_vec())
            .unwrap_or_else(|| defaults.iter().map(|s| s.to_string()).collect());
        classes
            .iter()
            .map(|c| format!("<option value=\"{}\">{}</option>", escape(c), escape(c)))
            .collect()
    };

    let banner = if service.is_some() {
        String::new()
    } else {
        "<p class=\"warning\">No trained model loaded. Predictions are unavailable.</p>"
            .to_string()
    };

    let rating_fields: String = SERVICE_FEATURES
        .iter()
        .enumerate()
        .map(|(i, (_, display))| {
            format!(
                "<label>{display} <input type=\"number\" id=\"rating{i}\" \
                 min=\"0\" max=\"5\" value=\"3\"></label>"
            )
        })
        .collect();

    include_str!("index.html")
        .replace("<!--BANNER-->", &banner)
        .replace("<!--GENDER_OPTIONS-->", &options("Gender", DEFAULT_GENDERS))
        .replace(
            "<!--CUSTOMER_TYPE_OPTIONS-->",
            &options("Customer Type", DEFAULT_CUSTOMER_TYPES),
        )
        .replace(
            "<!--TRAVEL_TYPE_OPTIONS-->",
            &options("Type of Travel", DEFAULT_TRAVEL_TYPES),
        )
        .replace("<!--CLASS_OPTIONS-->", &options("Class", DEFAULT_CLASSES))
        .replace("<!--RATING_FIELDS-->", &rating_fields)
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_without_model_shows_banner_and_defaults() {
        let html = render_form(None);
        assert!(html.contains("Predictions are unavailable"));
        assert!(html.contains("<option value=\"Eco Plus\">Eco Plus</option>"));
        assert!(html.contains("Seat Comfort"));
    }

    #[test]
    fn test_escape_html_special_chars() {
        assert_eq!(escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
