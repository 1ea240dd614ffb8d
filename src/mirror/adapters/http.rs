//! Response handling shared by the HTTP adapters.

use crate::mirror::ports::{RemoteError, RemoteResult};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

/// Sends a request and returns the response when its status is a success.
pub(super) async fn send(service: &'static str, request: RequestBuilder) -> RemoteResult<Response> {
    let response = request.send().await.map_err(RemoteError::transport)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Rejected {
        service,
        status: status.as_u16(),
        body,
    })
}

/// Sends a request and decodes a successful JSON body.
pub(super) async fn send_json<T: DeserializeOwned>(
    service: &'static str,
    request: RequestBuilder,
) -> RemoteResult<T> {
    let response = send(service, request).await?;
    response
        .json::<T>()
        .await
        .map_err(|err| RemoteError::decode(service, err.to_string()))
}
