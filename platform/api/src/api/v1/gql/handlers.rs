use common::http::ext::*;
use hyper::{Body, Request, Response, StatusCode};
use routerify::prelude::RequestExt;
use serde_json::json;

use super::ext::RequestExt as _;
use super::MySchema;
use crate::api::error::Result;
use crate::api::request_context::RequestContext;
use crate::global::GlobalState;

pub async fn graphql_handler(mut req: Request<Body>) -> Result<Response<Body>> {
    if req.method() == hyper::Method::OPTIONS {
        // Preflight, the cors middleware adds the headers
        return Ok(hyper::Response::builder()
            .status(StatusCode::OK)
            .body(Body::empty())
            .expect("failed to build response"));
    }

    let schema = req
        .data::<MySchema>()
        .map_err_route("failed to get schema")?
        .clone();

    let global = req.get_global::<GlobalState>()?;

    let context: RequestContext = req.context().map_err_route("missing request context")?;

    // We need to parse the request body into a GraphQL request.
    // If the request is a post request, we need to parse the body as a GraphQL
    // request. If the request is a get request, we need to parse the query string
    // as a GraphQL request.
    let request = match *req.method() {
        hyper::Method::POST => {
            let body = hyper::body::to_bytes(req.body_mut())
                .await
                .map_err_route((StatusCode::BAD_REQUEST, "failed to read body"))?;

            if body.is_empty() {
                return Err((StatusCode::BAD_REQUEST, "missing request body").into());
            }

            let content_type = req.headers().get("content-type").and_then(|val| val.to_str().ok());

            async_graphql::http::receive_body(content_type, &*body, Default::default())
                .await
                .map_err_route((StatusCode::BAD_REQUEST, "failed to parse body"))?
        }
        hyper::Method::GET => {
            let query = req
                .uri()
                .query()
                .map_err_route((StatusCode::BAD_REQUEST, "missing query string"))?;
            async_graphql::http::parse_query_string(query)
                .map_err_route((StatusCode::BAD_REQUEST, "failed to parse query string"))?
        }
        _ => {
            return Err((StatusCode::METHOD_NOT_ALLOWED, "method not allowed").into());
        }
    }
    .provide_global(global)
    .provide_context(context);

    let response = schema.execute(request).await;

    let mut resp = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({
                "data": response.data,
                "errors": if response.errors.is_empty() {
                    None
                } else {
                    Some(response.errors)
                },
                "extensions": response.extensions,
            })
            .to_string(),
        ))
        .expect("failed to build response");

    (&response.http_headers).into_iter().for_each(|(key, value)| {
        resp.headers_mut().insert(key, value.clone());
    });

    Ok(resp)
}
