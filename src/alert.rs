//! Alert system for displaying error messages to users.
//!
//! Alerts are rendered into the `#alert-container` element of the base page,
//! usually as the error target of an htmx request.

use maud::{Markup, html};

/// An alert message with a short headline and longer details.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Something the user asked for did not work.
    Error { message: String, details: String },
}

impl Alert {
    /// Render the alert with styling that matches its kind.
    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Error { message, details } => (
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 border border-red-300",
                message,
                details,
            ),
        };

        html!(
            div
                role="alert"
                class=(container_style)
                onclick="this.remove()"
            {
                span class="font-medium" { (message) }

                @if !details.is_empty() {
                    p { (details) }
                }
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_contains_message_and_details() {
        let markup = Alert::Error {
            message: "Invalid range".to_owned(),
            details: "The start must come first.".to_owned(),
        }
        .into_html()
        .into_string();

        let html = Html::parse_fragment(&markup);
        let alert = html
            .select(&Selector::parse("div[role='alert']").unwrap())
            .next()
            .expect("no alert element");
        let text = alert.text().collect::<String>();

        assert!(text.contains("Invalid range"));
        assert!(text.contains("The start must come first."));
    }

    #[test]
    fn empty_details_are_omitted() {
        let markup = Alert::Error {
            message: "Something went wrong".to_owned(),
            details: String::new(),
        }
        .into_html()
        .into_string();

        let html = Html::parse_fragment(&markup);

        assert_eq!(html.select(&Selector::parse("p").unwrap()).count(), 0);
    }
}
