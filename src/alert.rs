//! Alert partials for displaying success and error messages to users.
//!
//! Alerts are rendered into the fixed `#alert-container` via htmx out-of-band
//! swaps, with a dismiss button.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A success or error message with optional details.
#[derive(Debug, Clone)]
pub enum Alert {
    /// Something worked; tell the user what.
    Success {
        /// Short headline.
        message: String,
        /// Supporting detail.
        details: String,
    },
    /// Something failed; tell the user what and what to do about it.
    Error {
        /// Short headline.
        message: String,
        /// Supporting detail.
        details: String,
    },
}

impl Alert {
    /// Create a new success alert.
    pub fn success(message: &str, details: &str) -> Self {
        Self::Success {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a new error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert as markup targeting the alert container.
    pub fn into_html(self) -> Markup {
        let (message, details, color_style) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400",
            ),
        };

        html!(
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    class=(format!("flex items-start p-4 mb-4 rounded-lg shadow-lg {color_style}"))
                    role="alert"
                {
                    div class="flex-1"
                    {
                        p class="font-medium" { (message) }

                        @if !details.is_empty() {
                            p class="mt-1 text-sm" { (details) }
                        }
                    }

                    button
                        type="button"
                        class="ms-3 -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex items-center justify-center h-8 w-8"
                        aria-label="Close"
                        onclick="this.closest('#alert-container').classList.add('hidden')"
                    {
                        "✕"
                    }
                }
            }
        )
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
