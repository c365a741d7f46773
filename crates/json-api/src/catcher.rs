//! Error page rendering

use salvo::{
    catcher::Catcher,
    http::{HeaderValue, header::ACCEPT},
    prelude::*,
};

/// Render error pages as JSON unless the client asked for a specific format.
#[handler]
pub(crate) async fn prefer_json(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let unspecified = req
        .headers()
        .get(ACCEPT)
        .and_then(|accept| accept.to_str().ok())
        .is_none_or(|accept| accept.trim().is_empty() || accept.trim() == "*/*");

    if unspecified {
        req.headers_mut()
            .insert(ACCEPT, HeaderValue::from_static("application/json"));
    }

    ctrl.call_next(req, depot, res).await;
}

/// The catcher used by the server.
pub(crate) fn json_catcher() -> Catcher {
    Catcher::default().hoop(prefer_json)
}
