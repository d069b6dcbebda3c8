pub mod health;
pub mod history;
pub mod ideas;
pub mod journal;
pub mod spa;
pub mod tasks;
pub mod today;

use axum::extract::{FromRequest, FromRequestParts};
use axum::Extension;

use crate::auth::identity::Caller;
use crate::error::AppError;

/// `axum::Json` whose rejections answer with the API error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Path` whose rejections answer with the API error envelope.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// The caller attached by the identity middleware, if one resolved.
pub type MaybeCaller = Option<Extension<Caller>>;

pub(crate) fn caller_of(caller: &MaybeCaller) -> Option<&Caller> {
    caller.as_ref().map(|Extension(c)| c)
}
