use actix_web::{dev::Payload, web, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, LocalBoxFuture};
use std::ops::Deref;
use thiserror::Error;

use super::Error;
use crate::{auth::SESSION_COOKIE, schema::User, App};

/// Whoever sent the request.
#[derive(Debug, Clone)]
pub enum Actor {
    Anonymous,
    User(User),
}

impl Actor {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::User(user) => Some(user),
            Self::Anonymous => None,
        }
    }
}

#[derive(Debug, Error)]
#[error("The web app has no available configuration")]
struct NoConfig;

impl FromRequest for Actor {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // already resolved by another extractor of this request
        if let Some(actor) = req.extensions().get::<Actor>() {
            return Box::pin(ready(Ok(actor.clone())));
        }

        let Some(app) = req.app_data::<web::Data<App>>().cloned() else {
            return Box::pin(ready(Err(Error::from_context(
                crate::types::Error::Internal,
                NoConfig,
            ))));
        };

        let user_id = req
            .cookie(SESSION_COOKIE)
            .and_then(|cookie| app.sessions.verify(cookie.value()));

        let req = req.clone();
        Box::pin(async move {
            let actor = match user_id {
                Some(id) => app
                    .data
                    .find_user_by_id(id)
                    .await?
                    .map_or(Actor::Anonymous, Actor::User),
                None => Actor::Anonymous,
            };

            req.extensions_mut().insert(actor.clone());
            Ok(actor)
        })
    }
}

/// A signed in user. Anonymous requests are sent to the login page.
#[derive(Clone)]
pub struct SessionUser(User);

impl Deref for SessionUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Debug for SessionUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionUser")
            .field("id", &self.0.id)
            .finish_non_exhaustive()
    }
}

impl FromRequest for SessionUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let actor = Actor::from_request(req, payload);
        let next = req
            .uri()
            .path_and_query()
            .map_or_else(|| req.path().to_string(), ToString::to_string);

        Box::pin(async move {
            match actor.await? {
                Actor::User(user) => Ok(Self(user)),
                Actor::Anonymous => Err(Error::login_required(next)),
            }
        })
    }
}
