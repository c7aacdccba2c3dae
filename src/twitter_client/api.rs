use crate::twitter_client::shape::{Shape, Shaped};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `created_at` format used throughout the v1.1 API, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
pub const TWITTER_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

//
// Entities
//

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TweetUser {
    pub screen_name: String,
}

impl Shaped for TweetUser {
    fn shape() -> Shape {
        Shape::object("TweetUser", [("screen_name", Shape::String)])
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub id_str: String,
    pub created_at: String,
    pub user: TweetUser,
    pub text: String,
}

impl Tweet {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_str(&self.created_at, TWITTER_DATE_FORMAT)
            .ok()
            .map(|created_at| created_at.with_timezone(&Utc))
    }
}

impl Shaped for Tweet {
    fn shape() -> Shape {
        Shape::object(
            "Tweet",
            [
                ("id_str", Shape::String),
                ("created_at", Shape::String),
                ("user", TweetUser::shape()),
                ("text", Shape::String),
            ],
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id_str: String,
    pub name: String,
    pub screen_name: String,
    pub description: Option<String>,
    pub followers_count: Option<u64>,
    pub friends_count: Option<u64>,
    pub statuses_count: Option<u64>,
    pub protected: Option<bool>,
    pub verified: Option<bool>,
}

impl Shaped for User {
    fn shape() -> Shape {
        Shape::object(
            "User",
            [
                ("id_str", Shape::String),
                ("name", Shape::String),
                ("screen_name", Shape::String),
                ("description", Shape::optional(Shape::String)),
                ("followers_count", Shape::optional(Shape::Integer)),
                ("friends_count", Shape::optional(Shape::Integer)),
                ("statuses_count", Shape::optional(Shape::Integer)),
                ("protected", Shape::optional(Shape::Boolean)),
                ("verified", Shape::optional(Shape::Boolean)),
            ],
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeZone {
    pub name: String,
    pub utc_offset: i64,
    pub tzinfo_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepTime {
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSettings {
    pub screen_name: String,
    pub language: String,
    pub protected: bool,
    pub geo_enabled: bool,
    pub time_zone: Option<TimeZone>,
    pub sleep_time: Option<SleepTime>,
}

impl Shaped for AccountSettings {
    fn shape() -> Shape {
        Shape::object(
            "AccountSettings",
            [
                ("screen_name", Shape::String),
                ("language", Shape::String),
                ("protected", Shape::Boolean),
                ("geo_enabled", Shape::Boolean),
                (
                    "time_zone",
                    Shape::optional(Shape::object(
                        "TimeZone",
                        [
                            ("name", Shape::String),
                            ("utc_offset", Shape::Integer),
                            ("tzinfo_name", Shape::String),
                        ],
                    )),
                ),
                (
                    "sleep_time",
                    Shape::optional(Shape::object("SleepTime", [("enabled", Shape::Boolean)])),
                ),
            ],
        )
    }
}

//
// OAuth responses (form encoded)
//

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTokenResponse {
    pub oauth_token: String,
    pub oauth_token_secret: String,
    pub oauth_callback_confirmed: String,
}

impl RequestTokenResponse {
    pub fn callback_confirmed(&self) -> bool {
        self.oauth_callback_confirmed == "true"
    }
}

impl Shaped for RequestTokenResponse {
    fn shape() -> Shape {
        Shape::object(
            "RequestTokenResponse",
            [
                ("oauth_token", Shape::String),
                ("oauth_token_secret", Shape::String),
                ("oauth_callback_confirmed", Shape::String),
            ],
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub oauth_token: String,
    pub oauth_token_secret: String,
    pub user_id: String,
    pub screen_name: String,
    pub x_auth_expires: Option<String>,
}

impl Shaped for AccessTokenResponse {
    fn shape() -> Shape {
        Shape::object(
            "AccessTokenResponse",
            [
                ("oauth_token", Shape::String),
                ("oauth_token_secret", Shape::String),
                ("user_id", Shape::String),
                ("screen_name", Shape::String),
                ("x_auth_expires", Shape::optional(Shape::String)),
            ],
        )
    }
}

//
// Errors
//

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorEntry {
    pub code: i64,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub errors: Vec<ApiErrorEntry>,
}

impl Shaped for ApiErrorBody {
    fn shape() -> Shape {
        Shape::object(
            "ApiErrorBody",
            [(
                "errors",
                Shape::array(Shape::object(
                    "ApiErrorEntry",
                    [("code", Shape::Integer), ("message", Shape::String)],
                )),
            )],
        )
    }
}

//
// Request parameters
//

/// https://developer.twitter.com/en/docs/twitter-api/v1/tweets/timelines/api-reference/get-statuses-home_timeline
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeTimelineQuery {
    pub count: Option<u32>,
    pub max_id: Option<String>,
    pub since_id: Option<String>,
    pub trim_user: Option<bool>,
    pub exclude_replies: Option<bool>,
    pub include_entities: Option<bool>,
}

impl Shaped for HomeTimelineQuery {
    fn shape() -> Shape {
        Shape::object(
            "HomeTimelineQuery",
            [
                ("count", Shape::optional(Shape::Integer)),
                ("max_id", Shape::optional(Shape::String)),
                ("since_id", Shape::optional(Shape::String)),
                ("trim_user", Shape::optional(Shape::Boolean)),
                ("exclude_replies", Shape::optional(Shape::Boolean)),
                ("include_entities", Shape::optional(Shape::Boolean)),
            ],
        )
    }
}
