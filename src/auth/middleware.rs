use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

/// Gate for everything behind the login. Browser traffic bounces to the
/// login page; `/api` clients get a 401 JSON body they can surface as-is.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let signed_in = req.get_session().get::<i64>("user_id").unwrap_or(None).is_some();
    if signed_in {
        return next.call(req).await.map(|res| res.map_into_left_body());
    }

    let response = if req.path().starts_with("/api/") {
        HttpResponse::Unauthorized().json(serde_json::json!({"error": "Not signed in"}))
    } else {
        HttpResponse::SeeOther()
            .insert_header(("Location", "/login"))
            .finish()
    };
    Ok(req.into_response(response).map_into_right_body())
}
