use test_utils::builder::TestBuilder;

use crate::{
    model::user::UserDto,
    server::{
        error::{auth::AuthError, AppError},
        middleware::{
            auth::AuthGuard,
            session::{AuthSession, CsrfSession},
        },
    },
};


fn user(id: &str) -> UserDto {
    UserDto {
        id: id.to_string(),
        username: "tester".to_string(),
        global_name: Some("Tester".to_string()),
        avatar: None,
    }
}
