use bytes::Bytes;
use futures_util::{StreamExt, TryStream, TryStreamExt};
use http_body::{Frame, SizeHint};
use http_body_util::StreamBody;
use std::{
    borrow::Cow,
    fmt::{self, Debug},
    pin::Pin,
    task::{self, Poll},
};
use tower::BoxError;

mod body_def {
    #![allow(missing_docs)]

    use super::{BoxError, Bytes, Frame, StreamBody};
    use futures_util::stream::BoxStream;
    use pin_project_lite::pin_project;

    pin_project! {
        #[project = BodyProj]
        // Request body. Streams get buffered by the signing layer since the body hash covers the whole body.
        pub enum Body {
            // Empty body
            Empty,

            // Body consisting of a single chunk
            Full { data: Option<Bytes> },

            // Body backed by a `StreamBody`
            Stream {
                #[pin]
                stream: StreamBody<BoxStream<'static, Result<Frame<Bytes>, BoxError>>>
            },
        }
    }
}

pub use self::body_def::Body;
use self::body_def::BodyProj;

impl Default for Body {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl Body {
    /// Empty body
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty
    }

    /// Single byte chunk body
    #[inline]
    pub fn data<D>(data: D) -> Self
    where
        D: Into<Bytes>,
    {
        Self::Full {
            data: Some(data.into()),
        }
    }

    /// Stream body
    #[inline]
    pub fn stream<S>(stream: S) -> Self
    where
        S: TryStream + Send + 'static,
        S::Ok: Into<Bytes>,
        S::Error: Into<BoxError>,
    {
        let stream = stream
            .map_ok(|chunk| Frame::data(chunk.into()))
            .map_err(Into::into)
            .boxed();

        Self::Stream {
            stream: StreamBody::new(stream),
        }
    }
}

impl Debug for Body {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(std::any::type_name::<Self>())
            .finish_non_exhaustive()
    }
}

impl From<Bytes> for Body {
    #[inline]
    fn from(value: Bytes) -> Self {
        if value.is_empty() {
            Self::empty()
        } else {
            Self::data(value)
        }
    }
}

impl From<&'static str> for Body {
    #[inline]
    fn from(value: &'static str) -> Self {
        Self::from(Bytes::from_static(value.as_bytes()))
    }
}

impl From<Cow<'_, str>> for Body {
    #[inline]
    fn from(value: Cow<'_, str>) -> Self {
        Self::data(value.into_owned())
    }
}

impl From<String> for Body {
    #[inline]
    fn from(value: String) -> Self {
        Self::data(value)
    }
}

impl From<Vec<u8>> for Body {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self::data(value)
    }
}

impl http_body::Body for Body {
    type Data = Bytes;
    type Error = BoxError;

    #[inline]
    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            BodyProj::Empty => Poll::Ready(None),
            BodyProj::Full { data } => Poll::Ready(data.take().map(|data| Ok(Frame::data(data)))),
            BodyProj::Stream { stream } => stream.poll_frame(cx),
        }
    }

    #[inline]
    fn is_end_stream(&self) -> bool {
        match self {
            Self::Empty | Self::Full { data: None } => true,
            Self::Full { data: Some(..) } => false,
            Self::Stream { stream } => stream.is_end_stream(),
        }
    }

    #[inline]
    fn size_hint(&self) -> SizeHint {
        match self {
            Self::Empty | Self::Full { data: None } => SizeHint::with_exact(0),
            Self::Full { data: Some(data) } => SizeHint::with_exact(data.len() as u64),
            Self::Stream { stream } => stream.size_hint(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Body;
    use bytes::Bytes;
    use futures_util::stream;
    use http_body::Body as _;
    use http_body_util::BodyExt;
    use std::convert::Infallible;

    #[test]
    fn size_hints() {
        assert_eq!(Body::empty().size_hint().exact(), Some(0));
        assert_eq!(Body::from(Bytes::new()).size_hint().exact(), Some(0));
        assert_eq!(Body::from("hello").size_hint().exact(), Some(5));
        assert!(Body::empty().is_end_stream());
        assert!(!Body::from("hello").is_end_stream());
    }

    #[test]
    fn full_collects() {
        let collected = futures_util::FutureExt::now_or_never(Body::from("hello").collect())
            .unwrap()
            .unwrap()
            .to_bytes();
        assert_eq!(collected, "hello");

        let empty = futures_util::FutureExt::now_or_never(Body::empty().collect())
            .unwrap()
            .unwrap()
            .to_bytes();
        assert!(empty.is_empty());
    }

    #[test]
    fn stream_collects() {
        let chunks = stream::iter([Ok::<_, Infallible>("hel"), Ok("lo")]);
        let collected = futures_util::FutureExt::now_or_never(Body::stream(chunks).collect())
            .unwrap()
            .unwrap()
            .to_bytes();

        assert_eq!(collected, "hello");
    }
}
