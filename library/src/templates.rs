use actix_web::{error::ErrorInternalServerError, http::header, HttpResponse, Result};
use askama::Template;

/// One row of the api documentation page, rendered without html escaping
pub struct Endpoint {
    pub method: &'static str,
    pub path: &'static str,
    pub summary: &'static str,
    pub request: &'static str,
    pub response: &'static str,
    pub failure: &'static str,
}

pub const ENDPOINTS: &[Endpoint] = &[
    Endpoint {
        method: "POST",
        path: "/register/device",
        summary: "Register a device unless its mac is already known. Known devices are left untouched.",
        request: r#"{"mac": string, "nickname"?: string, "dangerThreshold"?: number}"#,
        response: r#"{"status": "ok", "message": "found" | "created"}"#,
        failure: "",
    },
    Endpoint {
        method: "POST",
        path: "/register/reading",
        summary: "Store a reading for a registered device.",
        request: r#"{"mac": string, "reading": number}"#,
        response: r#"{"status": "ok", "message": null}"#,
        failure: r#"406 {"detail": "device {mac} not found"}"#,
    },
    Endpoint {
        method: "POST",
        path: "/select/readings",
        summary: "List every reading stored for a device.",
        request: r#"{"mac": string}"#,
        response: r#"{"result": [{"mac": string, "readings": [{"created_at": timestamp, "reading": number}]}]}"#,
        failure: r#"406 {"detail": "device {mac} not found"}"#,
    },
];

#[derive(Template)]
#[template(path = "docs.html")]
struct Docs<'a> {
    endpoints: &'a [Endpoint],
}

pub async fn root() -> HttpResponse {
    HttpResponse::TemporaryRedirect()
        .header(header::LOCATION, "/docs")
        .finish()
}

pub async fn docs() -> Result<HttpResponse> {
    let s = Docs {
        endpoints: ENDPOINTS,
    }
    .render()
    .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(s))
}
