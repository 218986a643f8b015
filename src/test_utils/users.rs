use crate::{
    auth::password,
    schema::{NewUser, User},
    App,
};

/// Registers a user that cannot sign in with a password.
#[tracing::instrument(skip(app), name = "test_utils.users.register")]
pub async fn register(app: &App, username: &str) -> User {
    app.data
        .create_user(&NewUser {
            username,
            first_name: "",
            last_name: "",
            email: None,
            password_hash: "!",
        })
        .await
        .unwrap()
        .expect("username is already taken")
}

/// Registers a user that signs in with `password`.
#[tracing::instrument(skip(app, password), name = "test_utils.users.register_with_password")]
pub async fn register_with_password(app: &App, username: &str, password: &str) -> User {
    let password_hash = password::hash(password).unwrap();
    app.data
        .create_user(&NewUser {
            username,
            first_name: "Test",
            last_name: "User",
            email: None,
            password_hash: &password_hash,
        })
        .await
        .unwrap()
        .expect("username is already taken")
}
