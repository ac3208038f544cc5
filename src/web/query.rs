//! Query-string parsing into a [`SelectionQuery`].
//!
//! The currency multi-select submits one `currency=` pair per choice, which
//! serde's struct deserializers do not collect, so the pairs are walked by hand.

use tracing::debug;

use crate::domain::SelectionQuery;

pub fn parse_selection_query(raw: Option<&str>) -> SelectionQuery {
    let mut query = SelectionQuery::default();
    let Some(raw) = raw else {
        return query;
    };

    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        match key.as_ref() {
            "currency" if !value.trim().is_empty() => query.currencies.push(value.trim().to_string()),
            "currency" => {}
            "start" => query.start = parse_index(&key, &value),
            "end" => query.end = parse_index(&key, &value),
            "series" => query.series = Some(value.into_owned()),
            "forecast" => query.forecast = Some(value.trim().to_string()),
            "prev" => {
                let previous = query.previous.get_or_insert_with(Vec::new);
                if !value.trim().is_empty() {
                    previous.push(value.trim().to_string());
                }
            }
            _ => debug!(key = %key, "ignoring unknown query parameter"),
        }
    }
    query
}

fn parse_index(key: &str, value: &str) -> Option<usize> {
    match value.trim().parse::<usize>() {
        Ok(v) => Some(v),
        Err(_) => {
            debug!(key, value, "ignoring non-numeric range index");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_currencies_keep_order() {
        let q = parse_selection_query(Some("currency=JPY&currency=AUD&start=5&end=2"));
        assert_eq!(q.currencies, vec!["JPY", "AUD"]);
        assert_eq!(q.start, Some(5));
        assert_eq!(q.end, Some(2));
        assert_eq!(q.forecast, None);
        assert_eq!(q.previous, None);
    }

    #[test]
    fn previous_marker_survives_an_empty_page() {
        let q = parse_selection_query(Some("prev=&currency=EUR&forecast="));
        assert_eq!(q.previous, Some(Vec::new()));

        let q = parse_selection_query(Some("prev=AUD&prev=&prev=EUR"));
        assert_eq!(q.previous, Some(vec!["AUD".to_string(), "EUR".to_string()]));
    }

    #[test]
    fn decodes_series_and_empty_forecast() {
        let q = parse_selection_query(Some(
            "series=Headline+Consumer+Price+Inflation&forecast=&currency=EURO%20AREA%20-%20EURO%2FUS%24",
        ));
        assert_eq!(q.series.as_deref(), Some("Headline Consumer Price Inflation"));
        assert_eq!(q.forecast.as_deref(), Some(""));
        assert_eq!(q.currencies, vec!["EURO AREA - EURO/US$"]);
    }

    #[test]
    fn missing_or_bad_values_fall_back() {
        assert!(parse_selection_query(None).is_empty());
        let q = parse_selection_query(Some("start=abc&foo=1"));
        assert_eq!(q.start, None);
        assert!(q.is_empty());
    }
}
