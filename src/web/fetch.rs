use crate::transport::{Method, Request, Transport, TransportFailure};
use futures::future::{FutureExt, LocalBoxFuture};
use tracing::{debug, instrument};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Requests through `window.fetch`. Responses outside of 2xx are failures, like network errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl Transport for FetchTransport {
	fn request(&self, request: Request) -> LocalBoxFuture<'static, Result<String, TransportFailure>> {
		async move { fetch(request).await.map_err(|error| TransportFailure::new(error.as_string().unwrap_or_else(|| format!("{:?}", error)))) }.boxed_local()
	}
}

#[instrument(skip(request), fields(url = %request.url, method = request.method.as_str()))]
async fn fetch(request: Request) -> Result<String, JsValue> {
	let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window to fetch from."))?;

	let mut init = web_sys::RequestInit::new();
	#[allow(deprecated)]
	init.method(request.method.as_str());
	let body = (request.method != Method::Get).then(|| JsValue::from_str(&request.form_data()));
	#[allow(deprecated)]
	init.body(body.as_ref());

	let web_request = web_sys::Request::new_with_str_and_init(&request.effective_url(), &init)?;
	if body.is_some() {
		web_request.headers().set("Content-Type", "application/x-www-form-urlencoded; charset=UTF-8")?;
	}

	let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&web_request)).await?.dyn_into()?;
	debug!("Response status {}.", response.status());
	if !response.ok() {
		return Err(JsValue::from_str(&format!("{} {}", response.status(), response.status_text())));
	}
	let text = JsFuture::from(response.text()?).await?;
	text.as_string().ok_or_else(|| JsValue::from_str("The response body is not text."))
}
