//! `fetch()` backed [`Transport`].
//!
//! Timeouts are enforced with an `AbortController` armed by `setTimeout`;
//! the timer is cleared once the response body has been read.

use std::cell::Cell;
use std::rc::Rc;

use apphub_network::{HttpRequest, HttpResponse, HttpSuccess, NetworkError, Transport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestCredentials, RequestInit, Response, Window};

use crate::util::js_error_message;

/// Sends requests with the window's `fetch`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchTransport;

impl FetchTransport {
    /// Create a transport over the global `window`.
    pub fn new() -> Self {
        Self
    }
}

impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> HttpResponse {
        match fetch(&request).await {
            Ok(success) => HttpResponse::ok(success.status, success.headers, success.body),
            Err(e) => HttpResponse::err(e),
        }
    }
}

async fn fetch(request: &HttpRequest) -> Result<HttpSuccess, NetworkError> {
    let window = web_sys::window().ok_or(NetworkError::ServiceUnavailable)?;

    let init = RequestInit::new();
    init.set_method(request.method.as_str());
    if request.include_credentials {
        init.set_credentials(RequestCredentials::Include);
    }

    let headers = Headers::new().map_err(|e| other(&e))?;
    for (key, value) in &request.headers {
        headers.set(key, value).map_err(|e| other(&e))?;
    }
    init.set_headers(&headers);

    if let Some(body) = &request.body {
        let bytes = js_sys::Uint8Array::from(body.as_slice());
        init.set_body(&bytes);
    }

    let timeout = Timeout::arm(&window, &init, request.timeout_ms)?;
    let js_request = Request::new_with_str_and_init(&request.url, &init)
        .map_err(|_| NetworkError::InvalidUrl)?;

    let result = read_response(&window, &js_request).await;
    match (result, timeout) {
        (Err(_), Some(t)) if t.fired() => Err(NetworkError::Timeout),
        (result, _) => result,
    }
}

async fn read_response(window: &Window, request: &Request) -> Result<HttpSuccess, NetworkError> {
    let response: Response = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(|e| rejection(&e))?
        .dyn_into()
        .map_err(|_| NetworkError::Other(String::from("fetch did not resolve to a Response")))?;

    let status = response.status();
    let mut headers = Vec::new();
    if let Ok(Some(content_type)) = response.headers().get("content-type") {
        headers.push((String::from("Content-Type"), content_type));
    }

    let buffer = JsFuture::from(response.array_buffer().map_err(|e| other(&e))?)
        .await
        .map_err(|e| rejection(&e))?;
    let body = js_sys::Uint8Array::new(&buffer).to_vec();

    Ok(HttpSuccess {
        status,
        headers,
        body,
    })
}

/// Map a rejected fetch promise.
fn rejection(value: &JsValue) -> NetworkError {
    match value.dyn_ref::<web_sys::DomException>() {
        Some(dom) if dom.name() == "AbortError" => NetworkError::Aborted,
        // fetch rejects with a TypeError for DNS, CORS and connection failures
        _ => NetworkError::ConnectionFailed,
    }
}

fn other(value: &JsValue) -> NetworkError {
    NetworkError::Other(js_error_message(value))
}

/// Aborts the request when the timer fires. Cleared on drop.
struct Timeout {
    window: Window,
    handle: i32,
    fired: Rc<Cell<bool>>,
    _callback: Closure<dyn FnMut()>,
}

impl Timeout {
    fn arm(
        window: &Window,
        init: &RequestInit,
        timeout_ms: u32,
    ) -> Result<Option<Self>, NetworkError> {
        if timeout_ms == 0 {
            return Ok(None);
        }

        let controller = AbortController::new().map_err(|e| other(&e))?;
        init.set_signal(Some(&controller.signal()));

        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let callback = Closure::<dyn FnMut()>::new(move || {
            flag.set(true);
            controller.abort();
        });

        let delay = i32::try_from(timeout_ms).unwrap_or(i32::MAX);
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay,
            )
            .map_err(|e| other(&e))?;

        Ok(Some(Self {
            window: window.clone(),
            handle,
            fired,
            _callback: callback,
        }))
    }

    fn fired(&self) -> bool {
        self.fired.get()
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.window.clear_timeout_with_handle(self.handle);
    }
}
