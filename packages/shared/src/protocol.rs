//! Outbound text frame contract between the server and its clients.
//!
//! Every broadcast is a single text frame of the form
//! `Car <event-id> crossed at <timestamp>`. Clients parse this, so the
//! format must stay stable.

const PREFIX: &str = "Car ";
const SEPARATOR: &str = " crossed at ";

/// A parsed crossing notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crossing {
    pub event_id: String,
    pub timestamp: String,
}

/// Render the text frame for a crossing
pub fn format_crossing(event_id: &str, timestamp: &str) -> String {
    format!("{}{}{}{}", PREFIX, event_id, SEPARATOR, timestamp)
}

/// Parse a text frame produced by [`format_crossing`]
///
/// Returns `None` for any other text. The event id never contains the
/// separator, so the first occurrence splits id from timestamp.
pub fn parse_crossing(text: &str) -> Option<Crossing> {
    let rest = text.strip_prefix(PREFIX)?;
    let (event_id, timestamp) = rest.split_once(SEPARATOR)?;
    if event_id.is_empty() {
        return None;
    }
    Some(Crossing {
        event_id: event_id.to_string(),
        timestamp: timestamp.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_crossing() {
        // テスト項目: クライアントが期待する形式でテキストが生成される
        // given (前提条件):
        let event_id = "42";
        let timestamp = "2024-01-01T00:00:00Z";

        // when (操作):
        let text = format_crossing(event_id, timestamp);

        // then (期待する結果):
        assert_eq!(text, "Car 42 crossed at 2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_parse_crossing_with_empty_timestamp() {
        // テスト項目: タイムスタンプが空でもパースできる
        // given (前提条件):
        let text = "Car 7 crossed at ";

        // when (操作):
        let result = parse_crossing(text);

        // then (期待する結果):
        assert_eq!(
            result,
            Some(Crossing {
                event_id: "7".to_string(),
                timestamp: String::new(),
            })
        );
    }

    #[test]
    fn test_parse_crossing_rejects_other_text() {
        // テスト項目: 形式に合わないテキストは None になる
        // given (前提条件):
        let texts = ["hello", "Car  crossed at now", "Truck 1 crossed at now"];

        // when (操作):
        let results: Vec<_> = texts.iter().map(|t| parse_crossing(t)).collect();

        // then (期待する結果):
        assert!(results.iter().all(Option::is_none));
    }
}
