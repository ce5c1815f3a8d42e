//! Message formatting utilities for the watch display.

use lapcast_shared::protocol::parse_crossing;

/// Formatter for frames received while watching
pub struct CrossingFormatter;

impl CrossingFormatter {
    /// Format a text frame from the server
    ///
    /// Crossing notifications get a boxed layout with the local receive
    /// time; anything else is shown raw.
    ///
    /// # Arguments
    ///
    /// * `text` - The text frame as received
    /// * `received_at` - Local receive time, already rendered
    pub fn format_text(text: &str, received_at: &str) -> String {
        match parse_crossing(text) {
            Some(crossing) => format!(
                "\n------------------------------------------------------------\n\
                 Car {} crossed at {}\n\
                 received at {}\n\
                 ------------------------------------------------------------\n",
                crossing.event_id, crossing.timestamp, received_at
            ),
            None => Self::format_raw_message(text),
        }
    }

    /// Format a binary frame notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
