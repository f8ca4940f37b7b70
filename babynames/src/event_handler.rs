use std::collections::HashMap;

use aws_lambda_events::apigw::{ApiGatewayV2httpRequest, ApiGatewayV2httpResponse};
use aws_lambda_events::encodings::Body;
use http::header::{HeaderValue, CONTENT_TYPE};
use lambda_runtime::tracing::{info, warn};
use lambda_runtime::{Error, LambdaEvent};

use crate::error::LookupError;
use crate::gender::GenderFilter;
use crate::lookup::NameLookup;
use crate::render::{Page, PageContext, Pages};
use crate::store::NameStore;

/// Everything a request needs, built once in `main`.
pub struct Service<S> {
    lookup: NameLookup<S>,
    pages: Pages,
}

impl<S: NameStore> Service<S> {
    pub fn new(lookup: NameLookup<S>, pages: Pages) -> Self {
        Self { lookup, pages }
    }
}

#[derive(Debug, PartialEq)]
enum Route<'a> {
    Name { name: &'a str, gender: &'a str },
    Home,
    NotFound,
}

/// `/{name}/{gender}` or `/{proxy+}`.
fn route(params: &HashMap<String, String>) -> Result<Route<'_>, LookupError> {
    if let Some(name) = params.get("name") {
        let gender = params
            .get("gender")
            .ok_or_else(|| LookupError::MalformedRequest("missing gender path parameter".into()))?;
        return Ok(Route::Name { name, gender });
    }

    match params.get("proxy") {
        Some(proxy) if !proxy.is_empty() => Ok(Route::NotFound),
        _ => Ok(Route::Home),
    }
}

/// First character upper case, the rest lower case.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub(crate) async fn function_handler<S: NameStore>(
    service: &Service<S>,
    event: LambdaEvent<ApiGatewayV2httpRequest>,
) -> Result<ApiGatewayV2httpResponse, Error> {
    let params = &event.payload.path_parameters;
    info!(?params, "request");

    let context = match route(params)? {
        Route::Name { name, gender } => {
            let name = capitalize(name);
            let filter = GenderFilter::parse(&capitalize(gender));
            match service.lookup.resolve(&name, filter).await {
                Ok(result) => PageContext::lookup(Page::NameDetail, result),
                Err(err @ LookupError::NoQualifyingCandidate { .. }) => {
                    warn!(error = %err, "rendering random pick as no records");
                    PageContext::no_records(Page::NameDetail)
                }
                Err(err) => return Err(err.into()),
            }
        }
        Route::Home => PageContext::no_records(Page::Home),
        Route::NotFound => PageContext::no_records(Page::NotFound),
    };

    info!(page = context.page().template(), "rendering");
    let html = service.pages.render(&context)?;

    let mut response = ApiGatewayV2httpResponse::default();
    response.status_code = 200;
    response
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
    response.body = Some(Body::Text(html));
    Ok(response)
}
