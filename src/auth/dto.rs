use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::User;

/// Request body for user registration. Fields are optional so that missing
/// ones are reported per field instead of as a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "password_confirmation")]
    pub password2: Option<String>,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for logout and token refresh.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(alias = "refresh_token")]
    pub refresh: Option<String>,
}

/// Profile update. `email` and `password` are accepted only to be refused;
/// a key sent as `null` still counts as supplied.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "supplied")]
    pub email: Option<Value>,
    #[serde(default, deserialize_with = "supplied")]
    pub password: Option<Value>,
}

fn supplied<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(de).map(Some)
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: &'static str,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_joined: OffsetDateTime,
}

impl From<User> for ProfileResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            date_joined: u.date_joined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_exposes_only_public_fields() {
        let user = User {
            id: Uuid::new_v4(),
            email: "test@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            name: "Test User".into(),
            is_active: true,
            is_staff: false,
            is_email_verified: false,
            date_joined: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(ProfileResponse::from(user)).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["date_joined", "email", "id", "name"]);
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn signup_accepts_confirmation_alias() {
        let req: SignupRequest = serde_json::from_str(
            r#"{"email":"a@x.com","name":"A","password":"p","password_confirmation":"p"}"#,
        )
        .unwrap();
        assert_eq!(req.password2.as_deref(), Some("p"));
    }

    #[test]
    fn refresh_accepts_both_field_names() {
        let a: RefreshTokenRequest = serde_json::from_str(r#"{"refresh":"t"}"#).unwrap();
        let b: RefreshTokenRequest = serde_json::from_str(r#"{"refresh_token":"t"}"#).unwrap();
        let c: RefreshTokenRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(a.refresh.as_deref(), Some("t"));
        assert_eq!(b.refresh.as_deref(), Some("t"));
        assert!(c.refresh.is_none());
    }

    #[test]
    fn profile_update_counts_null_email_as_supplied() {
        let req: ProfileUpdateRequest =
            serde_json::from_str(r#"{"name":"N","email":null,"password":null}"#).unwrap();
        assert_eq!(req.email, Some(Value::Null));
        assert_eq!(req.password, Some(Value::Null));

        let req: ProfileUpdateRequest = serde_json::from_str(r#"{"name":"N"}"#).unwrap();
        assert!(req.email.is_none());
        assert!(req.password.is_none());
    }
}
