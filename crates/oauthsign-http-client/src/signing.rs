use bytes::Bytes;
use futures_util::{FutureExt, future::BoxFuture};
use http::Request;
use http_body::Body as HttpBody;
use http_body_util::{BodyExt, Limited};
use oauth1_signatures::{Sign, Signer, crypto::pkcs12};
use std::{
    io::Read,
    task::{self, Poll},
};
use tower::BoxError;
use tower_layer::Layer;
use tower_service::Service;
use tracing::{Instrument, debug, debug_span};

/// Layer that wraps services into [`SigningService`]s
#[derive(Clone, Debug)]
pub struct SigningLayer<G = Signer> {
    signer: G,
    body_limit: Option<usize>,
}

impl<G> SigningLayer<G> {
    /// Create a new signing layer without a limit on the buffered request body
    #[must_use]
    pub fn new(signer: G) -> Self {
        Self {
            signer,
            body_limit: None,
        }
    }

    /// Limit the size of request bodies buffered for signing
    #[must_use]
    pub fn with_body_limit(self, body_limit: Option<usize>) -> Self {
        Self { body_limit, ..self }
    }
}

impl<S, G> Layer<S> for SigningLayer<G>
where
    G: Clone,
{
    type Service = SigningService<S, G>;

    fn layer(&self, inner: S) -> Self::Service {
        SigningService::new(inner, self.signer.clone()).with_body_limit(self.body_limit)
    }
}

/// Service that signs every request before handing it to the inner service
///
/// The request body is buffered since the body hash is part of the signature.
/// Responses and errors of the inner service are passed through untouched.
#[derive(Clone, Debug)]
pub struct SigningService<S, G = Signer> {
    inner: S,
    signer: G,
    body_limit: Option<usize>,
}

impl<S, G> SigningService<S, G> {
    /// Wrap the service with the signer
    #[must_use]
    pub fn new(inner: S, signer: G) -> Self {
        Self {
            inner,
            signer,
            body_limit: None,
        }
    }

    /// Limit the size of request bodies buffered for signing
    #[must_use]
    pub fn with_body_limit(self, body_limit: Option<usize>) -> Self {
        Self { body_limit, ..self }
    }

    /// Reference to the signer
    pub fn signer(&self) -> &G {
        &self.signer
    }

    /// Reference to the wrapped service
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Unwrap the inner service
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S> SigningService<S> {
    /// Wrap the service with a signer whose key is read from a PKCS#12 key store
    ///
    /// # Errors
    ///
    /// Loading the key failed, see [`pkcs12::load_from_reader`]
    pub fn from_reader<C, R>(
        inner: S,
        consumer_key: C,
        reader: R,
        password: &str,
    ) -> Result<Self, pkcs12::Error>
    where
        C: Into<String>,
        R: Read,
    {
        let signer = Signer::from_reader(consumer_key, reader, password)?;
        Ok(Self::new(inner, signer))
    }
}

async fn buffer<B>(body: B, limit: Option<usize>) -> Result<Bytes, BoxError>
where
    B: HttpBody,
    B::Error: Into<BoxError>,
{
    let collected = match limit {
        Some(limit) => Limited::new(body, limit).collect().await?,
        None => body.collect().await.map_err(Into::into)?,
    };

    Ok(collected.to_bytes())
}

impl<S, G, B> Service<Request<B>> for SigningService<S, G>
where
    S: Service<Request<B>> + Clone + Send + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send,
    S::Response: Send + 'static,
    G: Sign + Clone + Send + 'static,
    G::Error: Into<BoxError>,
    B: HttpBody + From<Bytes> + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Response = S::Response;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    #[inline]
    fn poll_ready(&mut self, cx: &mut task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let signer = self.signer.clone();
        let body_limit = self.body_limit;

        let span = debug_span!("sign_request", method = %req.method(), uri = %req.uri());

        async move {
            let (parts, body) = req.into_parts();
            let body = buffer(body, body_limit)
                .await
                .inspect_err(|error| debug!(?error, "failed to buffer request body"))?;

            let mut req = Request::from_parts(parts, body);
            signer.sign(&mut req).map_err(Into::into)?;
            debug!(body_len = req.body().len(), "signed request");

            inner.call(req.map(B::from)).await.map_err(Into::into)
        }
        .instrument(span)
        .boxed()
    }
}
