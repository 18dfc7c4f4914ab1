use std::convert::Infallible;

use http::{header::InvalidHeaderName, HeaderMap, HeaderName};
use serde::Deserialize;

use crate::{reduce::Reducer, transform::ArgsTransformer};

/// Carries the named headers of each response into the next request.
///
/// Used both as the [`Reducer`] and the [`ArgsTransformer`] of a chainer,
/// with a [`HeaderMap`] as chain state. A listed header missing from a
/// response is dropped from the state. A link without a response keeps the
/// state it was given.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct HeaderPropagation {
    headers: Vec<HeaderName>,
}

impl HeaderPropagation {
    pub fn new(headers: impl IntoIterator<Item = HeaderName>) -> Self {
        Self {
            headers: headers.into_iter().collect(),
        }
    }

    pub fn try_from_names<I, N>(names: I) -> Result<Self, HeaderPropagationError>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let headers = names
            .into_iter()
            .map(|name| HeaderName::try_from(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(HeaderPropagationError::InvalidName)?;

        Ok(Self { headers })
    }

    pub fn headers(&self) -> &[HeaderName] {
        &self.headers
    }

    #[tracing::instrument(skip_all)]
    fn collect(&self, response: Option<&HeaderMap>, state: Option<&HeaderMap>) -> HeaderMap {
        let Some(response) = response else {
            return state.cloned().unwrap_or_default();
        };

        let mut propagated = HeaderMap::new();

        for name in &self.headers {
            for value in response.get_all(name) {
                propagated.append(name.clone(), value.clone());
            }
        }

        tracing::debug!(propagated = propagated.len(), "Collected headers");

        propagated
    }

    fn apply(&self, request: &mut HeaderMap, state: &HeaderMap) {
        for name in state.keys() {
            request.remove(name);

            for value in state.get_all(name) {
                request.append(name.clone(), value.clone());
            }
        }
    }
}

impl TryFrom<Vec<String>> for HeaderPropagation {
    type Error = HeaderPropagationError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::try_from_names(names)
    }
}

impl<B> Reducer<http::Response<B>, HeaderMap> for HeaderPropagation {
    type Error = Infallible;

    fn reduce(
        &self,
        response: Option<&http::Response<B>>,
        state: Option<&HeaderMap>,
    ) -> Result<HeaderMap, Self::Error> {
        Ok(self.collect(response.map(http::Response::headers), state))
    }
}

impl<B> ArgsTransformer<http::Request<B>, HeaderMap> for HeaderPropagation {
    type Error = Infallible;

    fn transform(
        &self,
        mut request: http::Request<B>,
        state: &HeaderMap,
    ) -> Result<http::Request<B>, Self::Error> {
        self.apply(request.headers_mut(), state);

        Ok(request)
    }
}

impl Reducer<reqwest::Response, HeaderMap> for HeaderPropagation {
    type Error = Infallible;

    fn reduce(
        &self,
        response: Option<&reqwest::Response>,
        state: Option<&HeaderMap>,
    ) -> Result<HeaderMap, Self::Error> {
        Ok(self.collect(response.map(reqwest::Response::headers), state))
    }
}

impl ArgsTransformer<reqwest::Request, HeaderMap> for HeaderPropagation {
    type Error = Infallible;

    fn transform(
        &self,
        mut request: reqwest::Request,
        state: &HeaderMap,
    ) -> Result<reqwest::Request, Self::Error> {
        self.apply(request.headers_mut(), state);

        Ok(request)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HeaderPropagationError {
    #[error("Invalid header name: {0}")]
    InvalidName(#[source] InvalidHeaderName),
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use http::{HeaderValue, Request, Response};

    use crate::{
        chain::{Chainer, ChainerConfig},
        test::{init_tracing, ApiError},
    };

    use super::*;

    fn response_with(headers: &[(&'static str, &'static str)]) -> Response<()> {
        let mut response = Response::new(());

        for (name, value) in headers {
            response
                .headers_mut()
                .append(*name, HeaderValue::from_static(*value));
        }

        response
    }

    #[test]
    fn zero_state_is_empty() {
        let propagation = HeaderPropagation::try_from_names(["x-value"]).unwrap();

        let state = Reducer::<Response<()>, _>::reduce(&propagation, None, None).unwrap();

        assert!(state.is_empty());
    }

    #[test]
    fn collects_only_listed_headers() {
        let propagation = HeaderPropagation::try_from_names(["x-value", "x-cursor"]).unwrap();

        let response = response_with(&[
            ("x-value", "1"),
            ("x-cursor", "a"),
            ("x-cursor", "b"),
            ("content-type", "text/plain"),
        ]);

        let state = propagation.reduce(Some(&response), Some(&HeaderMap::new())).unwrap();

        assert_eq!(state.len(), 3);
        assert_eq!(state["x-value"], "1");
        assert_eq!(state.get_all("x-cursor").iter().count(), 2);
        assert!(!state.contains_key("content-type"));
    }

    #[test]
    fn missing_header_is_dropped_and_no_response_keeps_state() {
        let propagation = HeaderPropagation::try_from_names(["x-value"]).unwrap();

        let prior = propagation
            .reduce(Some(&response_with(&[("x-value", "1")])), None)
            .unwrap();

        let kept = Reducer::<Response<()>, _>::reduce(&propagation, None, Some(&prior)).unwrap();

        assert_eq!(kept, prior);

        let cleared = propagation
            .reduce(Some(&response_with(&[])), Some(&prior))
            .unwrap();

        assert!(cleared.is_empty());
    }

    #[test]
    fn transform_overwrites_request_headers() {
        let propagation = HeaderPropagation::try_from_names(["x-value"]).unwrap();

        let mut state = HeaderMap::new();
        state.insert("x-value", HeaderValue::from_static("2"));

        let request = Request::get("http://example.com")
            .header("x-value", "stale")
            .header("accept", "application/json")
            .body(())
            .unwrap();

        let request = propagation.transform(request, &state).unwrap();

        assert_eq!(request.headers().get_all("x-value").iter().count(), 1);
        assert_eq!(request.headers()["x-value"], "2");
        assert_eq!(request.headers()["accept"], "application/json");
    }

    #[test]
    fn deserializes_from_header_names() {
        let propagation: HeaderPropagation =
            serde_json::from_str(r#"["x-value", "X-Session"]"#).unwrap();

        assert_eq!(
            propagation.headers(),
            [
                HeaderName::from_static("x-value"),
                HeaderName::from_static("x-session")
            ]
        );

        let invalid = serde_json::from_str::<HeaderPropagation>(r#"["not a header"]"#);

        assert!(invalid.is_err());
    }

    async fn mock_api(request: Request<()>) -> Result<Response<String>, ApiError> {
        let received = request
            .headers()
            .get("x-value")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let (expected, reply, delay) = match request.uri().path() {
            "/1/1" => (None, Some("1"), 10),
            "/1/2" => (Some("1"), Some("2"), 5),
            "/1/3" => (Some("2"), None, 0),
            _ => return Err(ApiError("unknown path")),
        };

        tokio::time::sleep(Duration::from_millis(delay)).await;

        if received.as_deref() != expected {
            return Err(ApiError("unexpected x-value"));
        }

        let mut response = Response::builder();

        if let Some(reply) = reply {
            response = response.header("x-value", reply);
        }

        response
            .body(request.uri().path().to_owned())
            .map_err(|_| ApiError("invalid response"))
    }

    #[tokio::test]
    async fn header_value_hops_across_three_calls() {
        init_tracing();

        let propagation = HeaderPropagation::try_from_names(["x-value"]).unwrap();

        let chainer: Chainer<Response<String>, HeaderMap, _, _> = Chainer::new(
            ChainerConfig::new()
                .reducer(propagation.clone())
                .args_transformer(propagation),
        )
        .expect("Failed to create chainer");

        let requests = ["/1/1", "/1/2", "/1/3"].map(|path| {
            let request = Request::get(format!("http://example.com{path}"))
                .body(())
                .unwrap();

            chainer.chain(mock_api, request)
        });

        let mut bodies = Vec::new();

        for request in requests {
            bodies.push(request.await.expect("Call failed").into_body());
        }

        assert_eq!(bodies, ["/1/1", "/1/2", "/1/3"]);
    }
}
