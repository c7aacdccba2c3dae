//! Property-based tests for decoding and query encoding.

use proptest::prelude::*;
use twitter_api_client::twitter_client::api::{HomeTimelineQuery, Tweet};
use twitter_api_client::twitter_client::decode::{encode_query, json_decode_str, parse_form};
use twitter_api_client::twitter_client::oauth::{encode_query_string, percent_encode};
use twitter_api_client::TwitterError;

/// Generates arbitrary tweet JSON that satisfies the tweet shape.
fn arb_tweet_json() -> impl Strategy<Value = serde_json::Value> {
    (
        prop::string::string_regex("[0-9]{1,19}").unwrap(),
        any::<String>(),
        prop::string::string_regex("[A-Za-z0-9_]{1,15}").unwrap(),
    )
        .prop_map(|(id, text, screen_name)| {
            serde_json::json!({
                "id_str": id,
                "created_at": "Wed Oct 10 20:19:24 +0000 2018",
                "text": text,
                "user": { "screen_name": screen_name },
            })
        })
}

proptest! {
    /// Decoding arbitrary text never panics; anything that is not JSON is a parsing error.
    #[test]
    fn prop_decode_is_total(input in any::<String>()) {
        let result = json_decode_str::<Vec<Tweet>>(&input);
        if serde_json::from_str::<serde_json::Value>(&input).is_err() {
            prop_assert!(matches!(result, Err(TwitterError::Parsing { .. })), "expected parsing error");
        } else {
            prop_assert!(!matches!(result, Err(TwitterError::Parsing { .. })), "valid JSON was reported as unparseable");
        }
    }

    /// Valid timeline JSON always decodes.
    #[test]
    fn prop_valid_timeline_decodes(tweets in prop::collection::vec(arb_tweet_json(), 0..8)) {
        let body = serde_json::Value::Array(tweets.clone()).to_string();
        let decoded = json_decode_str::<Vec<Tweet>>(&body).unwrap();
        prop_assert_eq!(decoded.len(), tweets.len());
        for (tweet, raw) in decoded.iter().zip(&tweets) {
            prop_assert_eq!(&tweet.id_str, raw["id_str"].as_str().unwrap());
            prop_assert_eq!(&tweet.text, raw["text"].as_str().unwrap());
        }
    }

    /// Dropping a required field is always reported at that field's path.
    #[test]
    fn prop_missing_field_is_reported(
        tweets in prop::collection::vec(arb_tweet_json(), 1..5),
        field in prop::sample::select(vec!["id_str", "created_at", "text", "user"]),
        index in any::<prop::sample::Index>(),
    ) {
        let mut tweets = tweets;
        let position = index.index(tweets.len());
        tweets[position].as_object_mut().unwrap().remove(field);

        let body = serde_json::Value::Array(tweets).to_string();
        match json_decode_str::<Vec<Tweet>>(&body) {
            Err(TwitterError::Validation(mismatches)) => {
                let path = format!("$[{position}].{field}");
                prop_assert!(mismatches.iter().any(|m| m.path == path));
            }
            other => prop_assert!(false, "expected validation error, got {:?}", other),
        }
    }

    /// Absent query fields never reach the wire; present ones always do.
    #[test]
    fn prop_query_keys_match_present_fields(
        count in prop::option::of(1u32..200),
        max_id in prop::option::of("[0-9]{1,19}"),
        since_id in prop::option::of("[0-9]{1,19}"),
    ) {
        let query = HomeTimelineQuery {
            count,
            max_id: max_id.clone(),
            since_id: since_id.clone(),
            ..Default::default()
        };
        let pairs = encode_query(&query).unwrap();
        let keys: Vec<&str> = pairs.iter().map(|(key, _)| key.as_str()).collect();

        prop_assert_eq!(keys.contains(&"count"), count.is_some());
        prop_assert_eq!(keys.contains(&"max_id"), max_id.is_some());
        prop_assert_eq!(keys.contains(&"since_id"), since_id.is_some());
        prop_assert!(!keys.contains(&"trim_user"));
    }

    /// The wire query string decodes back to the pairs that were signed.
    #[test]
    fn prop_query_string_round_trips_through_form_parsing(
        key in "[a-z_]{1,12}",
        value in any::<String>(),
    ) {
        let encoded = encode_query_string(&[(key.clone(), value.clone())]);
        let parsed = parse_form(&encoded).unwrap();
        prop_assert_eq!(parsed[key.as_str()].as_str().unwrap(), value.as_str());
        prop_assert!(!encoded.contains('+'));
        prop_assert_eq!(percent_encode(&key), key);
    }
}

#[test]
fn test_max_id_only_serializes_to_exactly_max_id() {
    let query = HomeTimelineQuery {
        max_id: Some("123".to_string()),
        ..Default::default()
    };
    let pairs = encode_query(&query).unwrap();
    assert_eq!(encode_query_string(&pairs), "max_id=123");
}
