// Chunked event streaming - length-prefixed JSON frames of dashboard events
use crate::application::engine_actor::DashboardEvent;
use crate::infrastructure::http_response::brotli_compress;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use tokio::sync::broadcast;

/// Create a chunked streaming response, one frame per event
pub fn chunked_event_stream<S>(stream: S, compress: bool) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = DashboardEvent> + Send + 'static,
{
    let byte_stream = stream.then(move |event| async move { serialize_frame(&event, compress).await });

    // Frames are compressed individually, so there is no Content-Encoding
    // for the response as a whole.
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::TRANSFER_ENCODING, "chunked")
        .body(Body::from_stream(byte_stream))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// 4-byte big-endian payload length followed by the (optionally
/// Brotli-compressed) JSON payload
pub async fn serialize_frame(event: &DashboardEvent, compress: bool) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(event).map_err(std::io::Error::other)?;

    let payload = if compress { brotli_compress(json).await? } else { json };

    let length = u32::try_from(payload.len()).map_err(std::io::Error::other)?;
    let mut frame = BytesMut::with_capacity(4 + payload.len());
    frame.put_u32(length);
    frame.put_slice(&payload);

    Ok(frame.freeze())
}

/// Stream every event from a broadcast subscription. A subscriber that falls
/// behind skips the events it missed; the next state event supersedes them.
pub fn stream_from_subscription(
    mut rx: broadcast::Receiver<DashboardEvent>,
    compress: bool,
) -> impl IntoResponse {
    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => yield event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event subscriber lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    match chunked_event_stream(stream, compress) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
