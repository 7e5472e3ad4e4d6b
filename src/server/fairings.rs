// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-auth-gateway project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use log::info;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Request, Response};

/// Logs one line per handled request
///
/// Only the method, the path and the final status are written. Query strings
/// are left out because they may carry an `id_token`.
pub struct RequestLogger;

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Request logger",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        info!(
            "{} {} {}",
            request.method(),
            request.uri().path(),
            response.status()
        );
    }
}
