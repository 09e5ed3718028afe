use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::{DebtError, Result};
use crate::remote::ApiReply;
use crate::session::SessionToken;

const SUCCESS_STATUS: &str = "success";

/// a well-formed `{status, data, message?, token?}` body, split by outcome
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success {
        data: Option<Value>,
        token: Option<SessionToken>,
    },
    Failure {
        message: String,
    },
}

impl Envelope {
    /// success payload, or the service's failure as an error
    pub fn into_success(self) -> Result<(Option<Value>, Option<SessionToken>)> {
        match self {
            Envelope::Success { data, token } => Ok((data, token)),
            Envelope::Failure { message } => Err(DebtError::remote(message)),
        }
    }

    /// decode the `data` member of a successful body
    pub fn into_data<D: DeserializeOwned>(self) -> Result<D> {
        let (data, _) = self.into_success()?;
        decode_data(data)
    }
}

/// judge a raw reply
///
/// non-2xx replies are failures whatever the body says. 2xx replies must be a
/// json object with a string `status`; anything else is malformed.
pub fn parse_reply(reply: &ApiReply) -> Result<Envelope> {
    let body: Value = match serde_json::from_str(&reply.body) {
        Ok(value) => value,
        Err(err) if reply.is_success() => {
            return Err(DebtError::malformed(format!("response body is not json: {err}")));
        }
        Err(_) => {
            return Ok(Envelope::Failure {
                message: generic_message(reply.status),
            });
        }
    };

    let Value::Object(mut fields) = body else {
        if reply.is_success() {
            return Err(DebtError::malformed("response body is not a json object"));
        }
        return Ok(Envelope::Failure {
            message: generic_message(reply.status),
        });
    };

    if !reply.is_success() {
        return Ok(Envelope::Failure {
            message: failure_message(&fields).unwrap_or_else(|| generic_message(reply.status)),
        });
    }

    let status = match fields.get("status") {
        Some(Value::String(status)) => status.clone(),
        Some(_) => return Err(DebtError::malformed("status field is not a string")),
        None => return Err(DebtError::malformed("response has no status field")),
    };

    if status != SUCCESS_STATUS {
        return Ok(Envelope::Failure {
            message: failure_message(&fields)
                .unwrap_or_else(|| format!("service reported status {status:?}")),
        });
    }

    let token = fields
        .get("token")
        .and_then(Value::as_str)
        .and_then(SessionToken::new);
    let data = fields.remove("data").filter(|v| !v.is_null());
    Ok(Envelope::Success { data, token })
}

pub fn decode_data<D: DeserializeOwned>(data: Option<Value>) -> Result<D> {
    let data = data.ok_or_else(|| DebtError::malformed("response has no data field"))?;
    serde_json::from_value(data)
        .map_err(|e| DebtError::malformed(format!("unexpected data shape: {e}")))
}

/// human-readable message, preferring `data` over `message`
fn failure_message(fields: &Map<String, Value>) -> Option<String> {
    ["data", "message"]
        .iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

fn generic_message(status: u16) -> String {
    format!("request failed with status {status}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(status: u16, body: Value) -> ApiReply {
        ApiReply::new(status, body.to_string())
    }

    #[test]
    fn test_success_with_data_and_token() {
        let env = parse_reply(&reply(200, json!({"status": "success", "data": [1, 2], "token": "t"}))).unwrap();
        match env {
            Envelope::Success { data, token } => {
                assert_eq!(data, Some(json!([1, 2])));
                assert_eq!(token.unwrap().as_str(), "t");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_http_error_prefers_data_message() {
        let env = parse_reply(&reply(400, json!({"status": "error", "data": "Email taken", "message": "Bad"}))).unwrap();
        assert_eq!(env, Envelope::Failure { message: "Email taken".into() });

        let env = parse_reply(&reply(400, json!({"status": "error", "data": {"x": 1}, "message": "Bad"}))).unwrap();
        assert_eq!(env, Envelope::Failure { message: "Bad".into() });

        let env = parse_reply(&reply(500, json!({}))).unwrap();
        assert_eq!(env, Envelope::Failure { message: "request failed with status 500".into() });
    }

    #[test]
    fn test_http_error_with_non_json_body() {
        let env = parse_reply(&ApiReply::new(502, "<html>bad gateway</html>")).unwrap();
        assert_eq!(env, Envelope::Failure { message: "request failed with status 502".into() });
    }

    #[test]
    fn test_ok_status_but_service_failure() {
        let env = parse_reply(&reply(200, json!({"status": "fail", "message": "Debt limit reached"}))).unwrap();
        let err = env.into_success().unwrap_err();
        assert!(matches!(err, DebtError::RemoteOperationFailed { ref message } if message == "Debt limit reached"));
    }

    #[test]
    fn test_malformed_bodies() {
        let cases = [
            ApiReply::new(200, "not json"),
            ApiReply::new(200, ""),
            reply(200, json!([1, 2, 3])),
            reply(200, json!({"data": []})),
            reply(200, json!({"status": true, "data": []})),
        ];
        for case in cases {
            let err = parse_reply(&case).unwrap_err();
            assert!(matches!(err, DebtError::MalformedResponse { .. }), "{case:?}");
        }
    }

    #[test]
    fn test_missing_or_mistyped_data() {
        let env = parse_reply(&reply(200, json!({"status": "success"}))).unwrap();
        let err = env.into_data::<Vec<u32>>().unwrap_err();
        assert!(matches!(err, DebtError::MalformedResponse { .. }));

        let env = parse_reply(&reply(200, json!({"status": "success", "data": "nope"}))).unwrap();
        let err = env.into_data::<Vec<u32>>().unwrap_err();
        assert!(matches!(err, DebtError::MalformedResponse { .. }));
    }
}
