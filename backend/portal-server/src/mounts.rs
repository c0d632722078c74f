//! Mount points for in-process units.
//!
//! Each in-process unit owns `{route}/` on the portal. The handler answers
//! 200 so health probes aimed at the unit's check URL see a live mount; the
//! bare `{route}` redirects there.

use crate::AppState;

use axum::{Json, Router, response::Redirect, routing::get};
use serde_json::json;

pub fn mount_units(mut router: Router<AppState>, routes: &[(String, String)]) -> Router<AppState> {
    for (name, route) in routes {
        let base = format!("{route}/");
        let unit = name.clone();
        let page = get(move || {
            let unit = unit.clone();
            async move { Json(json!({ "success": true, "service": unit })) }
        });

        let target = base.clone();
        let redirect = get(move || {
            let target = target.clone();
            async move { Redirect::permanent(&target) }
        });

        log::debug!("Mounting in-process unit {} at {}", name, base);
        router = router.route(&base, page).route(route, redirect);
    }

    router
}
