use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for registering a user together with their profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 1,
        max = 150,
        message = "Username must be between 1 and 150 characters"
    ))]
    pub username: String,

    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_validation() {
        let ok = CreateUserRequest {
            username: "lifter".to_string(),
            email: "lifter@example.com".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = CreateUserRequest {
            email: "not-an-email".to_string(),
            ..ok.clone()
        };
        assert!(bad_email.validate().is_err());

        let empty_name = CreateUserRequest {
            username: String::new(),
            ..ok
        };
        assert!(empty_name.validate().is_err());
    }
}
